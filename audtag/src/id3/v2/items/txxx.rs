use super::split_encoding;
use crate::error::Result;
use crate::tuple::{IntField, StrField, Tuple};
use crate::util::text::{TextDecodeOptions, decode_text};

/// Decode a user defined text frame, `encoding(1) + key(NUL) + value`
pub(crate) fn decode_txxx(payload: &[u8]) -> Result<(String, String)> {
	let (encoding, rest) = split_encoding(payload)?;

	let key = decode_text(
		rest,
		TextDecodeOptions::new().encoding(encoding).terminated(true),
	)?;
	let value = decode_text(
		&rest[key.bytes_read..],
		TextDecodeOptions::new().encoding(encoding).bom(key.bom),
	)?;

	Ok((key.content, value.content))
}

/// Handle the `TXXX` frames we know about
///
/// `CATALOGNUMBER` and the ReplayGain keys are recognized, anything else is ignored.
pub(crate) fn associate_txxx(tuple: &mut Tuple, payload: &[u8]) -> Result<()> {
	let (key, value) = decode_txxx(payload)?;

	let gain_fields = match key.to_ascii_uppercase().as_str() {
		"CATALOGNUMBER" => {
			if !value.is_empty() {
				tuple.set_str(StrField::CatalogNum, value);
			}
			return Ok(());
		},
		"REPLAYGAIN_TRACK_GAIN" => (IntField::TrackGain, IntField::GainDivisor),
		"REPLAYGAIN_TRACK_PEAK" => (IntField::TrackPeak, IntField::PeakDivisor),
		"REPLAYGAIN_ALBUM_GAIN" => (IntField::AlbumGain, IntField::GainDivisor),
		"REPLAYGAIN_ALBUM_PEAK" => (IntField::AlbumPeak, IntField::PeakDivisor),
		_ => {
			log::trace!("Ignoring TXXX frame \"{key}\"");
			return Ok(());
		},
	};

	let (field, unit_field) = gain_fields;
	tuple.set_gain(field, unit_field, &value);

	Ok(())
}
