use super::frame::FrameDictionary;
use super::header::{Id3v2Version, TagLocation};
use super::items::comment::associate_memo;
use super::items::picture::{CoverSelector, decode_picture};
use super::items::rva2::associate_rva2;
use super::items::text::{associate_genre, associate_int, associate_length, associate_str};
use super::items::txxx::associate_txxx;
use super::util::synchsafe::unsynchronize;
use super::util::upgrade::upgrade_v2;
use crate::config::ParseOptions;
use crate::error::Result;
use crate::macros::parse_mode_choice;
use crate::picture::Picture;
use crate::tuple::{IntField, StrField, Tuple};
use crate::util::alloc::TryWithCapacity;

use std::io::{Read, Seek, SeekFrom};

/// What a frame means to a [`Tuple`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FrameKind {
	Str(StrField),
	Int(IntField),
	Length,
	Genre,
	Memo(StrField),
	UserText,
	Rva2,
	Picture,
	Unknown,
}

impl FrameKind {
	fn of(key: &str, version: Id3v2Version) -> Self {
		if version != Id3v2Version::V2 {
			return Self::from_key(key);
		}

		match key {
			// Not part of ID3v2.2, but written by some taggers in the RVA2 layout
			"RVA" => Self::Rva2,
			"LYR" => Self::Memo(StrField::Lyrics),
			_ => upgrade_v2(key).map_or(Self::Unknown, Self::from_key),
		}
	}

	fn from_key(key: &str) -> Self {
		match key {
			"TIT2" => Self::Str(StrField::Title),
			"TPE1" => Self::Str(StrField::Artist),
			"TALB" => Self::Str(StrField::Album),
			"TPE2" => Self::Str(StrField::AlbumArtist),
			"TCOM" => Self::Str(StrField::Composer),
			"TCOP" => Self::Str(StrField::Copyright),
			"TPUB" => Self::Str(StrField::Publisher),
			"TDAT" => Self::Str(StrField::Date),
			"TYER" | "TDRC" => Self::Int(IntField::Year),
			"TRCK" => Self::Int(IntField::Track),
			"TPOS" => Self::Int(IntField::Disc),
			"TLEN" => Self::Length,
			"TCON" => Self::Genre,
			"COMM" => Self::Memo(StrField::Comment),
			"USLT" => Self::Memo(StrField::Lyrics),
			"TXXX" => Self::UserText,
			"RVA2" => Self::Rva2,
			"APIC" => Self::Picture,
			_ => Self::Unknown,
		}
	}
}

/// Read the frame data region of a located tag
///
/// Tag-level unsynchronisation is removed. A file that ends early gives a shorter region.
pub(crate) fn read_tag_data<R>(reader: &mut R, location: &TagLocation) -> Result<Vec<u8>>
where
	R: Read + Seek,
{
	reader.seek(SeekFrom::Start(location.data_offset()))?;

	let mut data = Vec::try_with_capacity_bounded(location.data_len as usize)?;
	reader
		.take(u64::from(location.data_len))
		.read_to_end(&mut data)?;

	if data.len() < location.data_len as usize {
		log::warn!(
			"ID3v2 tag is truncated, expected {} bytes, got {}",
			location.data_len,
			data.len()
		);
	}

	if location.unsynchronised {
		log::trace!("Removing tag-level unsynchronisation");
		data = unsynchronize(&data);
	}

	Ok(data)
}

/// Fill `tuple` from a set of frames
///
/// Frames that fail to decode are skipped, unless the parsing mode is strict.
pub(crate) fn apply_frames(
	frames: &FrameDictionary,
	version: Id3v2Version,
	tuple: &mut Tuple,
	parse_options: ParseOptions,
) -> Result<Option<Picture>> {
	let parse_mode = parse_options.parsing_mode;

	let mut covers = CoverSelector::default();
	let mut rva2_frames = Vec::new();

	for frame in frames.iter() {
		let payload = frame.payload();

		let result = match FrameKind::of(frame.key(), version) {
			FrameKind::Str(field) => associate_str(tuple, field, payload),
			FrameKind::Int(field) => associate_int(tuple, field, payload),
			FrameKind::Length => associate_length(tuple, payload),
			FrameKind::Genre => associate_genre(tuple, payload),
			FrameKind::Memo(field) => associate_memo(tuple, field, payload),
			FrameKind::UserText => associate_txxx(tuple, payload),
			FrameKind::Rva2 => {
				rva2_frames.push(payload);
				Ok(())
			},
			FrameKind::Picture if parse_options.read_cover_art => {
				decode_picture(payload, version).map(|picture| covers.offer(picture))
			},
			FrameKind::Picture | FrameKind::Unknown => Ok(()),
		};

		if let Err(e) = result {
			parse_mode_choice!(
				parse_mode,
				STRICT: return Err(e),
				DEFAULT: log::warn!("Failed to decode frame \"{}\", skipping: {e}", frame.key())
			);
		}
	}

	// ReplayGain from TXXX frames takes precedence
	if !tuple.is_set(IntField::GainDivisor) && !tuple.is_set(IntField::PeakDivisor) {
		for payload in rva2_frames {
			associate_rva2(tuple, payload);
		}
	}

	Ok(covers.into_inner())
}

/// Read the tag at `location` into `tuple`
pub(crate) fn read_located<R>(
	reader: &mut R,
	location: &TagLocation,
	tuple: &mut Tuple,
	parse_options: ParseOptions,
) -> Result<Option<Picture>>
where
	R: Read + Seek,
{
	let data = read_tag_data(reader, location)?;
	let frames = super::frame::read::read_all_frames(&data, location.version, parse_options)?;

	apply_frames(&frames, location.version, tuple, parse_options)
}
