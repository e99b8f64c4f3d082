use crate::error::Result;
use crate::macros::err;
use crate::util::io::SeekStreamLen;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};

pub(crate) const APE_PREAMBLE: &[u8; 8] = b"APETAGEX";
pub(crate) const APE_HEADER_LEN: u32 = 32;
/// The APEv2 version number
pub(crate) const APE_VERSION: u32 = 2000;

pub(crate) const FLAG_HAS_HEADER: u32 = 1 << 31;
pub(crate) const FLAG_HAS_NO_FOOTER: u32 = 1 << 30;
pub(crate) const FLAG_IS_HEADER: u32 = 1 << 29;

// Room for an ID3v1 tag after the footer
const ID3V1_LEN: u64 = 128;

/// An APE header or footer, the two share a layout
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApeHeader {
	pub(crate) version: u32,
	/// The size of the items and the footer, excluding the header
	pub(crate) size: u32,
	pub(crate) item_count: u32,
	pub(crate) flags: u32,
}

impl ApeHeader {
	pub(crate) fn parse(bytes: &[u8; 32]) -> Option<Self> {
		if &bytes[..8] != APE_PREAMBLE {
			return None;
		}

		let header = Self {
			version: LittleEndian::read_u32(&bytes[8..12]),
			size: LittleEndian::read_u32(&bytes[12..16]),
			item_count: LittleEndian::read_u32(&bytes[16..20]),
			flags: LittleEndian::read_u32(&bytes[20..24]),
		};

		if header.size < APE_HEADER_LEN {
			log::warn!("APE: Found a tag with an impossible size ({})", header.size);
			return None;
		}

		Some(header)
	}

	/// Read a header at `pos`, if the file has room for one
	fn read_at<R>(reader: &mut R, pos: u64, file_len: u64) -> Result<Option<Self>>
	where
		R: Read + Seek,
	{
		if pos.saturating_add(u64::from(APE_HEADER_LEN)) > file_len {
			return Ok(None);
		}

		reader.seek(SeekFrom::Start(pos))?;

		let mut bytes = [0; 32];
		reader.read_exact(&mut bytes)?;

		Ok(Self::parse(&bytes))
	}

	/// Create a header (or footer) for `data_len` bytes of items
	pub(crate) fn render(data_len: u32, item_count: u32, is_header: bool) -> [u8; 32] {
		let flags = if is_header {
			FLAG_HAS_HEADER | FLAG_IS_HEADER
		} else {
			FLAG_HAS_HEADER
		};

		let mut bytes = [0; 32];
		bytes[..8].copy_from_slice(APE_PREAMBLE);
		LittleEndian::write_u32(&mut bytes[8..12], APE_VERSION);
		LittleEndian::write_u32(&mut bytes[12..16], data_len.saturating_add(APE_HEADER_LEN));
		LittleEndian::write_u32(&mut bytes[16..20], item_count);
		LittleEndian::write_u32(&mut bytes[20..24], flags);

		bytes
	}
}

/// Where an APE tag lives in a file
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApeTagLocation {
	/// The offset of the header, or the first item if there is no header
	pub(crate) start: u64,
	/// The length of the entire tag, including the header and footer
	pub(crate) len: u64,
	/// The offset of the first item
	pub(crate) data_start: u64,
	/// The length of the items
	pub(crate) data_len: u32,
	pub(crate) item_count: u32,
	pub(crate) version: u32,
}

impl ApeTagLocation {
	pub(crate) fn end(&self) -> u64 {
		self.start + self.len
	}
}

/// Find an APE tag
///
/// A header at the start of the file is checked first, then a footer at the end of the file, and
/// finally a footer right before an ID3v1 tag.
///
/// # Errors
///
/// * No valid tag was found ([`ErrorKind::FormatMismatch`](crate::error::ErrorKind::FormatMismatch))
/// * `reader` fails to seek or read
pub(crate) fn find_ape<R>(reader: &mut R) -> Result<ApeTagLocation>
where
	R: Read + Seek,
{
	let file_len = reader.stream_length()?;

	if let Some(header) = ApeHeader::read_at(reader, 0, file_len)? {
		log::debug!(
			"APE: Found a header at 0, size = {}, version = {}",
			header.size,
			header.version
		);
		return from_header(reader, header, file_len);
	}

	let footer_positions = [
		file_len.checked_sub(u64::from(APE_HEADER_LEN)),
		file_len.checked_sub(ID3V1_LEN + u64::from(APE_HEADER_LEN)),
	];

	for pos in footer_positions.into_iter().flatten() {
		if let Some(footer) = ApeHeader::read_at(reader, pos, file_len)? {
			log::debug!(
				"APE: Found a footer at {pos}, size = {}, version = {}",
				footer.size,
				footer.version
			);
			return from_footer(reader, footer, pos, file_len);
		}
	}

	log::trace!("APE: No header or footer found");
	err!(FormatMismatch)
}

fn from_header<R>(reader: &mut R, header: ApeHeader, file_len: u64) -> Result<ApeTagLocation>
where
	R: Read + Seek,
{
	if header.flags & FLAG_HAS_HEADER == 0 || header.flags & FLAG_IS_HEADER == 0 {
		log::warn!("APE: Invalid header flags ({:#x})", header.flags);
		err!(FormatMismatch);
	}

	let data_len = header.size - APE_HEADER_LEN;
	let data_start = u64::from(APE_HEADER_LEN);

	let mut len = data_start + u64::from(data_len);
	if header.flags & FLAG_HAS_NO_FOOTER == 0 {
		if ApeHeader::read_at(reader, len, file_len)?.is_none() {
			log::warn!("APE: Expected a footer, but found none");
			err!(FormatMismatch);
		}

		len += u64::from(APE_HEADER_LEN);
	}

	if len > file_len {
		log::warn!("APE: Header describes a tag larger than the file");
		err!(FormatMismatch);
	}

	Ok(ApeTagLocation {
		start: 0,
		len,
		data_start,
		data_len,
		item_count: header.item_count,
		version: header.version,
	})
}

fn from_footer<R>(
	reader: &mut R,
	footer: ApeHeader,
	footer_pos: u64,
	file_len: u64,
) -> Result<ApeTagLocation>
where
	R: Read + Seek,
{
	if footer.flags & (FLAG_HAS_NO_FOOTER | FLAG_IS_HEADER) != 0 {
		log::warn!("APE: Invalid footer flags ({:#x})", footer.flags);
		err!(FormatMismatch);
	}

	let end = footer_pos + u64::from(APE_HEADER_LEN);
	let Some(mut start) = end.checked_sub(u64::from(footer.size)) else {
		log::warn!("APE: Footer describes a tag larger than the file");
		err!(FormatMismatch);
	};

	let data_start = start;
	if footer.flags & FLAG_HAS_HEADER != 0 {
		let header_pos = start.checked_sub(u64::from(APE_HEADER_LEN));
		let header = match header_pos {
			Some(pos) => ApeHeader::read_at(reader, pos, file_len)?,
			None => None,
		};

		match (header_pos, header) {
			(Some(pos), Some(_)) => start = pos,
			_ => {
				log::warn!("APE: Expected a header, but found none");
				err!(FormatMismatch);
			},
		}
	}

	Ok(ApeTagLocation {
		start,
		len: end - start,
		data_start,
		data_len: footer.size - APE_HEADER_LEN,
		item_count: footer.item_count,
		version: footer.version,
	})
}

#[cfg(test)]
mod tests {
	use super::{ApeHeader, FLAG_HAS_HEADER, FLAG_HAS_NO_FOOTER, FLAG_IS_HEADER, find_ape};

	use std::io::Cursor;

	fn raw_header(size: u32, items: u32, flags: u32) -> Vec<u8> {
		let mut header = b"APETAGEX".to_vec();
		header.extend(2000u32.to_le_bytes());
		header.extend(size.to_le_bytes());
		header.extend(items.to_le_bytes());
		header.extend(flags.to_le_bytes());
		header.extend([0; 8]);
		header
	}

	fn tag(data: &[u8]) -> Vec<u8> {
		let data_len = data.len() as u32;

		let mut tag = ApeHeader::render(data_len, 1, true).to_vec();
		tag.extend(data);
		tag.extend(ApeHeader::render(data_len, 1, false));
		tag
	}

	#[test_log::test]
	fn footer_at_end() {
		let mut file = b"audio".to_vec();
		file.extend(tag(&[0; 20]));

		let location = find_ape(&mut Cursor::new(file)).unwrap();
		assert_eq!(location.start, 5);
		assert_eq!(location.data_start, 5 + 32);
		assert_eq!(location.data_len, 20);
		assert_eq!(location.len, 84);
		assert_eq!(location.item_count, 1);
	}

	#[test_log::test]
	fn footer_before_id3v1() {
		let mut file = b"audio".to_vec();
		file.extend(tag(&[0; 20]));

		let mut id3v1 = [0; 128];
		id3v1[..3].copy_from_slice(b"TAG");
		file.extend(id3v1);

		let location = find_ape(&mut Cursor::new(file)).unwrap();
		assert_eq!(location.start, 5);
		assert_eq!(location.end(), 5 + 84);
	}

	#[test_log::test]
	fn header_at_start() {
		let mut file = tag(&[0; 10]);
		file.extend(b"audio");

		let location = find_ape(&mut Cursor::new(file)).unwrap();
		assert_eq!(location.start, 0);
		assert_eq!(location.data_start, 32);
		assert_eq!(location.len, 74);

		// No footer
		let mut file = raw_header(42, 1, FLAG_HAS_HEADER | FLAG_IS_HEADER | FLAG_HAS_NO_FOOTER);
		file.extend([0; 10]);
		file.extend(b"audio");

		let location = find_ape(&mut Cursor::new(file)).unwrap();
		assert_eq!(location.len, 42);
	}

	#[test_log::test]
	fn footer_without_header() {
		let mut file = b"audio".to_vec();
		file.extend([0; 10]);
		file.extend(raw_header(42, 1, 0));

		let location = find_ape(&mut Cursor::new(file)).unwrap();
		assert_eq!(location.start, 5);
		assert_eq!(location.data_start, 5);
		assert_eq!(location.len, 42);
	}

	#[test_log::test]
	fn invalid_tags() {
		// A header flagged as a footer
		let mut file = raw_header(42, 1, FLAG_HAS_HEADER);
		file.extend([0; 10]);
		assert!(find_ape(&mut Cursor::new(file)).unwrap_err().is_format_mismatch());

		// A footer that claims a missing header
		let mut file = vec![0; 10];
		file.extend(raw_header(42, 1, FLAG_HAS_HEADER));
		assert!(find_ape(&mut Cursor::new(file)).unwrap_err().is_format_mismatch());

		// Too small to describe itself
		let file = raw_header(16, 0, 0);
		assert!(find_ape(&mut Cursor::new(file)).unwrap_err().is_format_mismatch());

		// Larger than the file
		let file = raw_header(4096, 0, FLAG_HAS_HEADER | FLAG_IS_HEADER | FLAG_HAS_NO_FOOTER);
		assert!(find_ape(&mut Cursor::new(file)).unwrap_err().is_format_mismatch());

		assert!(find_ape(&mut Cursor::new(Vec::new())).unwrap_err().is_format_mismatch());
	}
}
