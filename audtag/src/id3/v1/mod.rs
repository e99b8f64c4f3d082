//! ID3v1 items
//!
//! # ID3v1 notes
//!
//! An ID3v1 tag is a fixed 128 byte block at the very end of the file:
//!
//! ```text
//! "TAG" | title (30) | artist (30) | album (30) | year (4) | comment (30) | genre (1)
//! ```
//!
//! ID3v1.1 steals the last two bytes of the comment for a NUL and a track number. Text is
//! Latin-1, anything that doesn't fit is truncated.

pub(crate) mod read;
pub(crate) mod write;

use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::macros::err;
use crate::module::TagModule;
use crate::picture::Picture;
use crate::tag_type::TagType;
use crate::tuple::Tuple;

use std::io::{Read, Seek, SeekFrom, Write};

pub(crate) const ID3V1_TAG_MARKER: [u8; 3] = *b"TAG";
pub(crate) const ID3V1_TAG_LEN: u64 = 128;

/// Find the ID3v1 tag at the end of `reader`, returning its offset and contents
pub(crate) fn find_id3v1<R>(reader: &mut R) -> Result<Option<(u64, [u8; 128])>>
where
	R: Read + Seek,
{
	let file_len = reader.seek(SeekFrom::End(0))?;
	if file_len < ID3V1_TAG_LEN {
		return Ok(None);
	}

	let offset = reader.seek(SeekFrom::End(-(ID3V1_TAG_LEN as i64)))?;

	let mut block = [0; 128];
	reader.read_exact(&mut block)?;

	if block[..3] != ID3V1_TAG_MARKER {
		return Ok(None);
	}

	log::debug!("Found an ID3v1 tag at {offset}");
	Ok(Some((offset, block)))
}

/// The ID3v1 module
///
/// Reading fills the title, artist, album, year, comment, track, and genre. Genres are stored as an
/// index into [`GENRES`](crate::genre::GENRES), an unknown genre is written as 255.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Id3v1Module;

impl TagModule for Id3v1Module {
	const TAG_TYPE: TagType = TagType::Id3v1;

	fn can_handle<R>(reader: &mut R) -> Result<bool>
	where
		R: Read + Seek,
	{
		Ok(find_id3v1(reader)?.is_some())
	}

	fn read<R>(reader: &mut R, tuple: &mut Tuple, parse_options: ParseOptions) -> Result<Option<Picture>>
	where
		R: Read + Seek,
	{
		let Some((_, block)) = find_id3v1(reader)? else {
			err!(FormatMismatch);
		};

		read::parse_id3v1(&block, tuple, parse_options.parsing_mode)?;

		// No room for pictures
		Ok(None)
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
		write::write_id3v1(source, dest, tuple, write_options)
	}
}
