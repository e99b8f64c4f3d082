use super::header::{APE_HEADER_LEN, ApeHeader, find_ape};
use super::read::{ApeItem, read_items};
use crate::config::ParsingMode;
use crate::error::Result;
use crate::id3::v1::find_id3v1;
use crate::macros::err;
use crate::tuple::{IntField, StrField, Tuple};
use crate::util::io::{SeekStreamLen, copy_from, copy_range};

use std::io::{Read, Seek, Write};

use byteorder::{LittleEndian, WriteBytesExt};

const STR_ITEMS: [(&str, StrField); 5] = [
	("Artist", StrField::Artist),
	("Title", StrField::Title),
	("Album", StrField::Album),
	("Comment", StrField::Comment),
	("Genre", StrField::Genre),
];

const INT_ITEMS: [(&str, IntField); 3] = [
	("Track", IntField::Track),
	("Disc", IntField::Disc),
	("Year", IntField::Year),
];

fn is_tuple_key(key: &str) -> bool {
	STR_ITEMS
		.iter()
		.map(|(k, _)| k)
		.chain(INT_ITEMS.iter().map(|(k, _)| k))
		.any(|k| k.eq_ignore_ascii_case(key))
}

/// The items of the new tag
///
/// Fields from `tuple` come first, followed by every existing item `tuple` doesn't cover.
pub(crate) fn merge_items(tuple: &Tuple, existing: Vec<ApeItem>) -> Vec<ApeItem> {
	let mut items = Vec::new();

	for (key, field) in STR_ITEMS {
		if let Some(value) = tuple.get_str(field) {
			items.push(ApeItem::text(key, value));
		}
	}

	for (key, field) in INT_ITEMS {
		if let Some(value) = tuple.get_int(field).filter(|value| *value > 0) {
			items.push(ApeItem::text(key, &value.to_string()));
		}
	}

	items.extend(existing.into_iter().filter(|item| !is_tuple_key(&item.key)));
	items
}

/// Create a complete tag, with a header and a footer
pub(crate) fn create_ape_tag(items: &[ApeItem]) -> Result<Vec<u8>> {
	let mut data = Vec::new();

	for item in items {
		let Ok(value_len) = u32::try_from(item.value.len()) else {
			err!(TooMuchData);
		};

		data.write_u32::<LittleEndian>(value_len)?;
		data.write_u32::<LittleEndian>(item.flags)?;
		data.write_all(item.key.as_bytes())?;
		data.write_u8(0)?;
		data.write_all(&item.value)?;
	}

	let Ok(data_len) = u32::try_from(data.len()) else {
		err!(TooMuchData);
	};

	if data_len.checked_add(APE_HEADER_LEN).is_none() {
		err!(TooMuchData);
	}

	let Ok(item_count) = u32::try_from(items.len()) else {
		err!(TooMuchData);
	};

	let mut tag = Vec::with_capacity(data.len() + 2 * APE_HEADER_LEN as usize);
	tag.extend(ApeHeader::render(data_len, item_count, true));
	tag.extend(data);
	tag.extend(ApeHeader::render(data_len, item_count, false));

	log::debug!("APE: Created a tag with {item_count} items, {data_len} bytes");
	Ok(tag)
}

/// Copy `source` to `dest` with an updated APE tag
///
/// An existing tag is replaced where it stands. A new tag goes before a trailing ID3v1 tag, or
/// at the end of the file.
pub(crate) fn write_ape<R, W>(source: &mut R, dest: &mut W, tuple: &Tuple) -> Result<()>
where
	R: Read + Seek,
	W: Write,
{
	let location = match find_ape(source) {
		Ok(location) => Some(location),
		Err(e) if e.is_format_mismatch() => None,
		Err(e) => return Err(e),
	};

	let existing = match &location {
		Some(location) => read_items(source, location, ParsingMode::BestAttempt)?,
		None => Vec::new(),
	};

	let tag = create_ape_tag(&merge_items(tuple, existing))?;

	let (tag_start, tag_end) = match location {
		Some(location) => (location.start, location.end()),
		None => {
			let position = match find_id3v1(source)? {
				Some((offset, _)) => offset,
				None => source.stream_length()?,
			};

			(position, position)
		},
	};

	copy_range(source, dest, 0, tag_start)?;
	dest.write_all(&tag)?;
	copy_from(source, dest, tag_end)?;

	Ok(())
}
