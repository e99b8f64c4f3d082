use super::frame::read::read_all_frames;
use super::frame::{FrameDictionary, RawFrame};
use super::header::{Id3v2Header, Id3v2Version, MAX_TAG_SIZE, locate};
use super::read::read_tag_data;
use super::util::synchsafe::SynchsafeInteger;
use crate::config::{ParseOptions, ParsingMode, WriteOptions};
use crate::error::{AudTagError, ErrorKind, Result};
use crate::macros::{err, try_vec};
use crate::tuple::{IntField, StrField, Tuple};
use crate::util::io::{copy_from, copy_range};

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, WriteBytesExt};

const TEXT_FRAMES: [(&str, StrField); 8] = [
	("TIT2", StrField::Title),
	("TPE1", StrField::Artist),
	("TALB", StrField::Album),
	("TPE2", StrField::AlbumArtist),
	("TCOM", StrField::Composer),
	("TPUB", StrField::Publisher),
	("TCOP", StrField::Copyright),
	("TCON", StrField::Genre),
];

const NUMBER_FRAMES: [(&str, IntField); 2] = [("TRCK", IntField::Track), ("TPOS", IntField::Disc)];

const MEMO_FRAMES: [(&str, StrField); 2] = [("COMM", StrField::Comment), ("USLT", StrField::Lyrics)];

/// Apply the fields of `tuple` to an existing set of frames
///
/// Frames for unset fields are removed. Frames we don't know about are left untouched.
pub(crate) fn overlay(frames: &mut FrameDictionary, tuple: &Tuple, version: Id3v2Version) {
	for (key, field) in TEXT_FRAMES {
		frames.replace_text(key, tuple.get_str(field));
	}

	for (key, field) in NUMBER_FRAMES {
		let number = tuple.get_int(field).map(|n| n.to_string());
		frames.replace_text(key, number.as_deref());
	}

	// TDRC replaced TYER in ID3v2.4
	let (year_key, outdated_year_key) = match version {
		Id3v2Version::V4 => ("TDRC", "TYER"),
		_ => ("TYER", "TDRC"),
	};

	let year = tuple.get_int(IntField::Year).map(|year| year.to_string());
	frames.remove(outdated_year_key);
	frames.replace_text(year_key, year.as_deref());

	for (key, field) in MEMO_FRAMES {
		frames.replace_memo(key, tuple.get_str(field));
	}
}

/// Write a single frame with no flags, returning the number of bytes written
fn write_frame<W>(writer: &mut W, frame: &RawFrame, version: Id3v2Version) -> Result<u32>
where
	W: Write,
{
	let key = frame.key();
	if key.len() != 4 {
		log::warn!("Discarding frame \"{key}\", not valid in ID3v2.{}", version.major());
		return Ok(0);
	}

	let payload = frame.payload();
	let Ok(len) = u32::try_from(payload.len()) else {
		err!(TooMuchData);
	};

	let size = match version {
		Id3v2Version::V4 => len.synch()?,
		_ => len,
	};

	writer.write_all(key.as_bytes())?;
	writer.write_u32::<BigEndian>(size)?;
	writer.write_u16::<BigEndian>(0)?;
	writer.write_all(payload)?;

	len.checked_add(10)
		.ok_or_else(|| AudTagError::new(ErrorKind::TooMuchData))
}

/// Write a new file to `dest`, made of the updated tag followed by the rest of `source`
///
/// An existing ID3v2.3/ID3v2.4 tag keeps its version and any frames that `tuple` doesn't cover.
/// A trailing tag is moved to the start of the file.
///
/// `dest` is expected to be positioned at the start of the new file.
pub(crate) fn write_id3v2<R, W>(
	source: &mut R,
	dest: &mut W,
	tuple: &Tuple,
	write_options: WriteOptions,
) -> Result<()>
where
	R: Read + Seek,
	W: Write + Seek,
{
	let location = match locate(source, ParsingMode::BestAttempt) {
		Ok(location) => Some(location),
		Err(e) if e.is_format_mismatch() => None,
		Err(e) => return Err(e),
	};

	let version = location.map_or(write_options.id3v2_version, |location| location.version);
	if version == Id3v2Version::V2 {
		log::warn!("Refusing to write an ID3v2.2 tag");
		err!(UnsupportedTag);
	}

	let mut frames = match &location {
		Some(location) => {
			let data = read_tag_data(source, location)?;
			read_all_frames(&data, version, ParseOptions::new())?
		},
		None => FrameDictionary::new(),
	};

	overlay(&mut frames, tuple, version);

	log::debug!(
		"Writing an ID3v2.{} tag with {} frames",
		version.major(),
		frames.len()
	);

	// Provisional header, the size is filled in once it's known
	let tag_start = dest.stream_position()?;
	dest.write_all(&Id3v2Header::render(version, 0)?)?;

	let mut size = 0u32;
	for frame in frames.iter() {
		size = size
			.checked_add(write_frame(dest, frame, version)?)
			.ok_or_else(|| AudTagError::new(ErrorKind::TooMuchData))?;
	}

	if let Some(padding) = write_options.preferred_padding {
		log::trace!("Adding {padding} bytes of padding");

		dest.write_all(&try_vec![0; padding as usize])?;
		size = size
			.checked_add(padding)
			.ok_or_else(|| AudTagError::new(ErrorKind::TooMuchData))?;
	}

	if size > MAX_TAG_SIZE {
		log::warn!("New tag would be {size} bytes, which is too large to read back");
		err!(TooMuchData);
	}

	match location {
		Some(location) if location.offset == 0 => {
			copy_from(source, dest, location.end())?;
		},
		Some(location) => copy_range(source, dest, 0, location.offset)?,
		None => {
			copy_from(source, dest, 0)?;
		},
	}

	let end = dest.stream_position()?;
	dest.seek(SeekFrom::Start(tag_start))?;
	dest.write_all(&Id3v2Header::render(version, size)?)?;
	dest.seek(SeekFrom::Start(end))?;

	Ok(())
}
