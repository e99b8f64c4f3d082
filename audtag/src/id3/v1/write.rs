use super::{ID3V1_TAG_MARKER, find_id3v1};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::genre::genre_index;
use crate::tuple::{IntField, StrField, Tuple};
use crate::util::io::{SeekStreamLen, copy_range};
use crate::util::text::latin1_encode;

use std::io::{Read, Seek, Write};

/// Copy `source` to `dest`, replacing or appending the ID3v1 tag
pub(crate) fn write_id3v1<R, W>(
	source: &mut R,
	dest: &mut W,
	tuple: &Tuple,
	write_options: WriteOptions,
) -> Result<()>
where
	R: Read + Seek,
	W: Write,
{
	let block = encode(tuple, write_options)?;

	let audio_len = match find_id3v1(source)? {
		Some((offset, _)) => offset,
		None => source.stream_length()?,
	};

	copy_range(source, dest, 0, audio_len)?;
	dest.write_all(&block)?;

	Ok(())
}

pub(super) fn encode(tuple: &Tuple, write_options: WriteOptions) -> Result<[u8; 128]> {
	fn resize_string(
		value: Option<&str>,
		dest: &mut [u8],
		write_options: WriteOptions,
	) -> Result<()> {
		if let Some(value) = value {
			let encoded = latin1_encode(value, write_options.lossy_text_encoding)?;
			let len = encoded.len().min(dest.len());
			dest[..len].copy_from_slice(&encoded[..len]);
		}

		Ok(())
	}

	let mut block = [0; 128];
	block[..3].copy_from_slice(&ID3V1_TAG_MARKER);

	resize_string(tuple.get_str(StrField::Title), &mut block[3..33], write_options)?;
	resize_string(tuple.get_str(StrField::Artist), &mut block[33..63], write_options)?;
	resize_string(tuple.get_str(StrField::Album), &mut block[63..93], write_options)?;

	if let Some(year) = tuple.get_int(IntField::Year).filter(|year| *year > 0) {
		let year = format!("{:04}", year.min(9999));
		block[93..97].copy_from_slice(year.as_bytes());
	}

	// Always ID3v1.1, the last two comment bytes are a NUL and the track number
	resize_string(tuple.get_str(StrField::Comment), &mut block[97..125], write_options)?;
	block[126] = tuple
		.get_int(IntField::Track)
		.and_then(|track| u8::try_from(track).ok())
		.unwrap_or(0);

	block[127] = tuple
		.get_str(StrField::Genre)
		.and_then(genre_index)
		.unwrap_or(255);

	Ok(block)
}
