use super::ID3V1_TAG_MARKER;
use crate::config::ParsingMode;
use crate::error::Result;
use crate::genre::genre_name;
use crate::macros::err;
use crate::tuple::{IntField, StrField, Tuple};
use crate::util::text::latin1_decode;

/// Fill `tuple` from a 128 byte ID3v1 block
///
/// Empty fields are left alone.
pub(crate) fn parse_id3v1(block: &[u8; 128], tuple: &mut Tuple, parse_mode: ParsingMode) -> Result<()> {
	if block[..3] != ID3V1_TAG_MARKER {
		err!(FormatMismatch);
	}

	let block = &block[3..];

	for (field, range) in [
		(StrField::Title, 0..30),
		(StrField::Artist, 30..60),
		(StrField::Album, 60..90),
	] {
		if let Some(text) = decode_text(&block[range]) {
			tuple.set_str(field, text);
		}
	}

	if let Some(year) = try_parse_year(&block[90..94], parse_mode)? {
		tuple.set_int(IntField::Year, year);
	}

	// A NUL 28 bytes into the comment, followed by a non-zero byte, makes this ID3v1.1
	let comment_range = if block[122] == 0 && block[123] != 0 {
		tuple.set_int(IntField::Track, i32::from(block[123]));
		94..122
	} else {
		94..124
	};

	if let Some(comment) = decode_text(&block[comment_range]) {
		tuple.set_str(StrField::Comment, comment);
	}

	match genre_name(i32::from(block[124])) {
		Some(genre) => tuple.set_str(StrField::Genre, genre),
		None => log::trace!("ID3v1 genre {} is not in the genre table", block[124]),
	}

	Ok(())
}

fn decode_text(data: &[u8]) -> Option<String> {
	let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());

	let text = latin1_decode(&data[..end]);
	let text = text.trim_end();
	if text.is_empty() {
		return None;
	}

	Some(text.to_owned())
}

fn try_parse_year(input: &[u8], parse_mode: ParsingMode) -> Result<Option<i32>> {
	if input.iter().all(|b| *b == 0) {
		return Ok(None);
	}

	if !input.iter().all(u8::is_ascii_digit) {
		// Most taggers write "\0\0\0\0" rather than "0000" for an empty year, which is
		// handled above. Anything else is garbage.
		if parse_mode == ParsingMode::Strict {
			err!(TextDecode("ID3v1 year field contains non-ASCII digit characters"));
		}

		log::warn!("Ignoring an invalid ID3v1 year");
		return Ok(None);
	}

	let year = input
		.iter()
		.fold(0, |year, digit| year * 10 + i32::from(digit - b'0'));

	Ok((year > 0).then_some(year))
}
