use super::header::ApeTagLocation;
use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::{decode_err, err, parse_mode_choice};
use crate::tuple::{IntField, StrField, Tuple};
use crate::util::alloc::TryWithCapacity;
use crate::util::leading_int;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};

/// A single APE item
///
/// Values are kept as raw bytes, items that aren't mapped onto a [`Tuple`] are written back as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApeItem {
	pub(crate) key: String,
	pub(crate) flags: u32,
	pub(crate) value: Vec<u8>,
}

impl ApeItem {
	pub(crate) fn text(key: &str, value: &str) -> Self {
		Self {
			key: key.to_owned(),
			flags: 0,
			value: value.as_bytes().to_vec(),
		}
	}

	/// The value as text, up to the first NUL
	fn text_value(&self) -> Option<String> {
		let end = self
			.value
			.iter()
			.position(|b| *b == 0)
			.unwrap_or(self.value.len());

		let text = String::from_utf8_lossy(&self.value[..end]);
		if text.is_empty() {
			return None;
		}

		Some(text.into_owned())
	}
}

/// Read the items of the tag at `location`
///
/// Reading stops at the first malformed item, unless the parsing mode is strict.
pub(crate) fn read_items<R>(
	reader: &mut R,
	location: &ApeTagLocation,
	parse_mode: ParsingMode,
) -> Result<Vec<ApeItem>>
where
	R: Read + Seek,
{
	reader.seek(SeekFrom::Start(location.data_start))?;

	let mut data = Vec::try_with_capacity_bounded(location.data_len as usize)?;
	reader
		.take(u64::from(location.data_len))
		.read_to_end(&mut data)?;

	log::debug!("APE: Reading {} items", location.item_count);
	parse_items(&data, location.item_count, parse_mode)
}

pub(crate) fn parse_items(mut data: &[u8], item_count: u32, parse_mode: ParsingMode) -> Result<Vec<ApeItem>> {
	let mut items = Vec::new();

	for _ in 0..item_count {
		match parse_item(data) {
			Ok((item, remaining)) => {
				log::trace!("APE: Read item \"{}\" ({} bytes)", item.key, item.value.len());
				items.push(item);
				data = remaining;
			},
			Err(e) => parse_mode_choice!(
				parse_mode,
				STRICT: return Err(e),
				DEFAULT: {
					log::warn!("APE: Stopping at a malformed item: {e}");
					break;
				}
			),
		}
	}

	Ok(items)
}

// value_len (4) | flags (4) | key | NUL | value
fn parse_item(data: &[u8]) -> Result<(ApeItem, &[u8])> {
	if data.len() < 8 {
		decode_err!(@BAIL Ape, "Expected an item, but the tag ended");
	}

	let value_len = LittleEndian::read_u32(&data[..4]) as usize;
	let flags = LittleEndian::read_u32(&data[4..8]);

	let rest = &data[8..];
	let Some(key_len) = rest.iter().position(|b| *b == 0) else {
		decode_err!(@BAIL Ape, "Found an unterminated item key");
	};

	let key = std::str::from_utf8(&rest[..key_len])
		.map_err(|_| decode_err!(Ape, "APE tag item contains a non UTF-8 key"))?;

	let rest = &rest[key_len + 1..];
	if value_len > rest.len() {
		err!(SizeMismatch);
	}

	let (value, remaining) = rest.split_at(value_len);

	let item = ApeItem {
		key: key.to_owned(),
		flags,
		value: value.to_vec(),
	};

	Ok((item, remaining))
}

/// Fill `tuple` from a list of items
///
/// Keys are matched without regard to case.
pub(crate) fn apply_items(items: &[ApeItem], tuple: &mut Tuple) {
	for item in items {
		let Some(value) = item.text_value() else {
			continue;
		};

		let key = item.key.to_ascii_uppercase();
		match key.as_str() {
			"ARTIST" => tuple.set_str(StrField::Artist, value),
			"TITLE" => tuple.set_str(StrField::Title, value),
			"ALBUM" => tuple.set_str(StrField::Album, value),
			"COMMENT" => tuple.set_str(StrField::Comment, value),
			"GENRE" => tuple.set_str(StrField::Genre, value),
			"TRACK" => set_positive(tuple, IntField::Track, &value),
			"DISC" => set_positive(tuple, IntField::Disc, &value),
			"YEAR" => set_positive(tuple, IntField::Year, &value),
			"REPLAYGAIN_TRACK_GAIN" => {
				tuple.set_gain(IntField::TrackGain, IntField::GainDivisor, &value)
			},
			"REPLAYGAIN_TRACK_PEAK" => {
				tuple.set_gain(IntField::TrackPeak, IntField::PeakDivisor, &value)
			},
			"REPLAYGAIN_ALBUM_GAIN" => {
				tuple.set_gain(IntField::AlbumGain, IntField::GainDivisor, &value)
			},
			"REPLAYGAIN_ALBUM_PEAK" => {
				tuple.set_gain(IntField::AlbumPeak, IntField::PeakDivisor, &value)
			},
			_ => {},
		}
	}
}

fn set_positive(tuple: &mut Tuple, field: IntField, value: &str) {
	let value = leading_int(value);
	if value > 0 {
		tuple.set_int(field, value);
	}
}

#[cfg(test)]
mod tests {
	use super::{ApeItem, apply_items, parse_items};
	use crate::config::ParsingMode;
	use crate::error::ErrorKind;
	use crate::tag_type::TagType;
	use crate::tuple::{IntField, StrField, Tuple};

	fn raw_item(key: &str, value: &[u8]) -> Vec<u8> {
		let mut item = (value.len() as u32).to_le_bytes().to_vec();
		item.extend([0; 4]);
		item.extend(key.as_bytes());
		item.push(0);
		item.extend(value);
		item
	}

	#[test_log::test]
	fn items_in_order() {
		let mut data = raw_item("Title", b"Foo title");
		data.extend(raw_item("Cover Art (Front)", b"cover.jpg\x00\xFF\xD8"));

		let items = parse_items(&data, 2, ParsingMode::BestAttempt).unwrap();
		assert_eq!(items.len(), 2);
		assert_eq!(items[0], ApeItem::text("Title", "Foo title"));
		assert_eq!(items[1].key, "Cover Art (Front)");
		assert_eq!(items[1].value, b"cover.jpg\x00\xFF\xD8");
	}

	#[test_log::test]
	fn declared_count_honoured() {
		let mut data = raw_item("Title", b"Foo title");
		data.extend(raw_item("Artist", b"Foo artist"));

		let items = parse_items(&data, 1, ParsingMode::BestAttempt).unwrap();
		assert_eq!(items.len(), 1);
	}

	#[test_log::test]
	fn stops_at_malformed() {
		let mut data = raw_item("Title", b"Foo title");
		// Value longer than the tag
		data.extend(100u32.to_le_bytes());
		data.extend([0; 4]);
		data.extend(b"Artist\x00short");

		let items = parse_items(&data, 2, ParsingMode::BestAttempt).unwrap();
		assert_eq!(items, [ApeItem::text("Title", "Foo title")]);

		assert!(parse_items(&data, 2, ParsingMode::Strict).is_err());

		// Unterminated key
		let items = parse_items(b"\x01\x00\x00\x00\x00\x00\x00\x00Title", 1, ParsingMode::Relaxed).unwrap();
		assert!(items.is_empty());
	}

	#[test_log::test]
	fn non_utf8_key() {
		let mut data = raw_item("Title", b"Foo title");
		data.extend(b"\x03\x00\x00\x00\x00\x00\x00\x00Art\xFFist\x00Bar");

		let items = parse_items(&data, 2, ParsingMode::BestAttempt).unwrap();
		assert_eq!(items, [ApeItem::text("Title", "Foo title")]);

		let err = parse_items(&data, 2, ParsingMode::Strict).unwrap_err();
		assert!(matches!(
			err.kind(),
			ErrorKind::FileDecoding(e) if e.tag_type() == TagType::Ape
		));
	}

	#[test_log::test]
	fn tuple_mapping() {
		let items = [
			ApeItem::text("ARTIST", "Foo artist"),
			ApeItem::text("title", "Foo title"),
			ApeItem::text("Track", "3/12"),
			ApeItem::text("Year", "2004-05-01"),
			ApeItem::text("Disc", "0"),
			ApeItem::text("Genre", ""),
			ApeItem::text("REPLAYGAIN_TRACK_GAIN", "-6.50 dB"),
			ApeItem::text("Unknown", "Ignored"),
		];

		let mut tuple = Tuple::new();
		apply_items(&items, &mut tuple);

		assert_eq!(tuple.get_str(StrField::Artist), Some("Foo artist"));
		assert_eq!(tuple.get_str(StrField::Title), Some("Foo title"));
		assert_eq!(tuple.get_int(IntField::Track), Some(3));
		assert_eq!(tuple.get_int(IntField::Year), Some(2004));
		assert!(!tuple.is_set(IntField::Disc));
		assert!(!tuple.is_set(StrField::Genre));
		assert_eq!(tuple.get_int(IntField::TrackGain), Some(-6_500_000));
		assert_eq!(tuple.get_int(IntField::GainDivisor), Some(1_000_000));
	}
}
