use super::split_encoding;
use crate::error::Result;
use crate::genre::genre_name;
use crate::tuple::{IntField, StrField, Tuple};
use crate::util::leading_int;
use crate::util::text::{TextDecodeOptions, decode_text};

/// Decode a text information frame, `encoding(1) + text`
///
/// Only the first string is kept, and empty strings are `None`.
pub(crate) fn decode_text_frame(payload: &[u8]) -> Result<Option<String>> {
	let (encoding, text) = split_encoding(payload)?;

	let decoded = decode_text(text, TextDecodeOptions::new().encoding(encoding))?;
	Ok(decoded.text_or_none())
}

pub(crate) fn associate_str(tuple: &mut Tuple, field: StrField, payload: &[u8]) -> Result<()> {
	if let Some(text) = decode_text_frame(payload)? {
		tuple.set_str(field, text);
	}

	Ok(())
}

/// Store the leading integer of a text frame, if it is positive
pub(crate) fn associate_int(tuple: &mut Tuple, field: IntField, payload: &[u8]) -> Result<()> {
	if let Some(text) = decode_text_frame(payload)? {
		let value = leading_int(&text);
		if value > 0 {
			tuple.set_int(field, value);
		}
	}

	Ok(())
}

/// Handle `TLEN`
///
/// Tagged lengths are often wrong, so an existing length (from the decoder) is only replaced by a
/// value within a factor of two of it.
pub(crate) fn associate_length(tuple: &mut Tuple, payload: &[u8]) -> Result<()> {
	let Some(text) = decode_text_frame(payload)? else {
		return Ok(());
	};

	let tagged_length = leading_int(&text);
	if tagged_length <= 0 {
		return Ok(());
	}

	if let Some(decoder_length) = tuple.get_int(IntField::Length).filter(|len| *len > 0) {
		let (tagged, decoded) = (i64::from(tagged_length), i64::from(decoder_length));
		if tagged <= decoded / 2 || tagged >= decoded * 2 {
			log::debug!("Ignoring TLEN of {tagged_length}ms, decoder reports {decoder_length}ms");
			return Ok(());
		}
	}

	tuple.set_int(IntField::Length, tagged_length);
	Ok(())
}

/// Handle `TCON`, which may reference the genre table as `"(n)"` or `"n"`
pub(crate) fn associate_genre(tuple: &mut Tuple, payload: &[u8]) -> Result<()> {
	let Some(text) = decode_text_frame(payload)? else {
		return Ok(());
	};

	let name = genre_number(&text).and_then(genre_name);
	match name {
		Some(name) => tuple.set_str(StrField::Genre, name),
		None => tuple.set_str(StrField::Genre, text),
	}

	Ok(())
}

fn genre_number(text: &str) -> Option<i32> {
	let text = text.trim_start();
	let number = text.strip_prefix('(').unwrap_or(text).trim_start();

	let unsigned = number.strip_prefix(['-', '+']).unwrap_or(number);
	if !unsigned.starts_with(|c: char| c.is_ascii_digit()) {
		return None;
	}

	Some(leading_int(number))
}
