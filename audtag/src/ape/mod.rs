//! APE specific items
//!
//! ## Tag notes
//!
//! An APEv2 tag is a list of `key = value` items, surrounded by a 32 byte header and footer.
//! It usually sits at the end of the file, possibly followed by an ID3v1 tag.
//!
//! Only the items mapping onto [`Tuple`] fields are interpreted. All other items, including
//! binary ones such as cover art, are written back as they were.

pub(crate) mod header;
pub(crate) mod read;
pub(crate) mod write;

use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::module::TagModule;
use crate::picture::Picture;
use crate::tag_type::TagType;
use crate::tuple::Tuple;

use std::io::{Read, Seek, Write};

/// The APEv2 module
///
/// # Examples
///
/// ```rust
/// use audtag::ape::ApeModule;
/// use audtag::config::{ParseOptions, WriteOptions};
/// use audtag::module::TagModule;
/// use audtag::tuple::{IntField, Tuple};
/// use std::io::Cursor;
///
/// # fn main() -> audtag::error::Result<()> {
/// let mut tuple = Tuple::new();
/// tuple.set_int(IntField::Year, 2004);
///
/// let mut file = Cursor::new(b"MAC \x96\x0f\x00\x00".to_vec());
/// ApeModule::write(&mut file, &tuple, WriteOptions::new())?;
///
/// let mut read_back = Tuple::new();
/// ApeModule::read(&mut file, &mut read_back, ParseOptions::new())?;
/// assert_eq!(read_back.get_int(IntField::Year), Some(2004));
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ApeModule;

impl TagModule for ApeModule {
	const TAG_TYPE: TagType = TagType::Ape;

	fn can_handle<R>(reader: &mut R) -> Result<bool>
	where
		R: Read + Seek,
	{
		match header::find_ape(reader) {
			Ok(_) => Ok(true),
			Err(e) if e.is_format_mismatch() => Ok(false),
			Err(e) => Err(e),
		}
	}

	fn read<R>(reader: &mut R, tuple: &mut Tuple, parse_options: ParseOptions) -> Result<Option<Picture>>
	where
		R: Read + Seek,
	{
		let location = header::find_ape(reader)?;
		let items = read::read_items(reader, &location, parse_options.parsing_mode)?;

		read::apply_items(&items, tuple);

		// Cover art items are carried, but never decoded
		Ok(None)
	}

	fn render<R, W>(source: &mut R, dest: &mut W, tuple: &Tuple, _: WriteOptions) -> Result<()>
	where
		R: Read + Seek,
		W: Write + Seek,
	{
		write::write_ape(source, dest, tuple)
	}
}
