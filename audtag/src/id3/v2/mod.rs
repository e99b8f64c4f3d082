//! ID3v2 items and utilities
//!
//! ## Important notes
//!
//! Only the frames that map onto [`Tuple`] fields are decoded. Every other frame is carried as a
//! [`RawFrame`], and is written back untouched.
//!
//! Written tags never use unsynchronisation, an extended header, a footer, or frame flags.
//! ID3v2.2 tags can only be read.

mod frame;
pub(crate) mod header;
mod items;
pub(crate) mod read;
pub mod util;
mod v22;
pub(crate) mod write;

// Exports

pub use frame::{FrameDictionary, RawFrame};
pub use header::{Id3v2Version, TagLocation, locate, locate_v22};
pub use util::upgrade::upgrade_v2;
pub use v22::Id3v22Module;

use crate::config::{ParseOptions, ParsingMode, WriteOptions};
use crate::error::Result;
use crate::module::TagModule;
use crate::picture::Picture;
use crate::tag_type::TagType;
use crate::tuple::Tuple;

use std::io::{Read, Seek, Write};

/// The ID3v2.3 and ID3v2.4 module
///
/// # Examples
///
/// ```rust
/// use audtag::config::{ParseOptions, WriteOptions};
/// use audtag::id3::v2::Id3v2Module;
/// use audtag::module::TagModule;
/// use audtag::tuple::{StrField, Tuple};
/// use std::io::Cursor;
///
/// # fn main() -> audtag::error::Result<()> {
/// let mut tuple = Tuple::new();
/// tuple.set_str(StrField::Title, "Foo title");
///
/// // Tag some "audio"
/// let mut file = Cursor::new(b"\xFF\xFB\x90\x00".to_vec());
/// Id3v2Module::write(&mut file, &tuple, WriteOptions::new())?;
/// assert!(Id3v2Module::can_handle(&mut file)?);
///
/// let mut read_back = Tuple::new();
/// Id3v2Module::read(&mut file, &mut read_back, ParseOptions::new())?;
/// assert_eq!(read_back.get_str(StrField::Title), Some("Foo title"));
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Id3v2Module;

impl TagModule for Id3v2Module {
	const TAG_TYPE: TagType = TagType::Id3v2;

	fn can_handle<R>(reader: &mut R) -> Result<bool>
	where
		R: Read + Seek,
	{
		match locate(reader, ParsingMode::BestAttempt) {
			Ok(_) => Ok(true),
			Err(e) if e.is_format_mismatch() => Ok(false),
			Err(e) => Err(e),
		}
	}

	fn read<R>(reader: &mut R, tuple: &mut Tuple, parse_options: ParseOptions) -> Result<Option<Picture>>
	where
		R: Read + Seek,
	{
		let location = locate(reader, parse_options.parsing_mode)?;
		read::read_located(reader, &location, tuple, parse_options)
	}

	fn render<R, W>(
		source: &mut R,
		dest: &mut W,
		tuple: &Tuple,
		write_options: WriteOptions,
	) -> Result<()>
	where
		R: Read + Seek,
		W: Write + Seek,
	{
		write::write_id3v2(source, dest, tuple, write_options)
	}
}
