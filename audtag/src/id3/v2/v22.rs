use super::header::locate_v22;
use super::read::read_located;
use crate::config::{ParseOptions, ParsingMode, WriteOptions};
use crate::error::Result;
use crate::macros::err;
use crate::module::TagModule;
use crate::picture::Picture;
use crate::tag_type::TagType;
use crate::tuple::Tuple;

use std::io::{Read, Seek, Write};

/// The ID3v2.2 module
///
/// ID3v2.2 uses 3 character frame IDs, which are mapped onto their ID3v2.3 counterparts
/// (see [`upgrade_v2`](super::upgrade_v2)). Tags can only be read, writing fails with
/// [`ErrorKind::UnsupportedTag`](crate::error::ErrorKind::UnsupportedTag).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Id3v22Module;

impl TagModule for Id3v22Module {
	const TAG_TYPE: TagType = TagType::Id3v22;

	fn can_handle<R>(reader: &mut R) -> Result<bool>
	where
		R: Read + Seek,
	{
		match locate_v22(reader, ParsingMode::BestAttempt) {
			Ok(_) => Ok(true),
			Err(e) if e.is_format_mismatch() => Ok(false),
			Err(e) => Err(e),
		}
	}

	fn read<R>(reader: &mut R, tuple: &mut Tuple, parse_options: ParseOptions) -> Result<Option<Picture>>
	where
		R: Read + Seek,
	{
		let location = locate_v22(reader, parse_options.parsing_mode)?;
		read_located(reader, &location, tuple, parse_options)
	}

	fn render<R, W>(_: &mut R, _: &mut W, _: &Tuple, _: WriteOptions) -> Result<()>
	where
		R: Read + Seek,
		W: Write + Seek,
	{
		log::warn!("Attempted to write an ID3v2.2 tag");
		err!(UnsupportedTag)
	}
}
