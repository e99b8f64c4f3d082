use crate::error::{AudTagError, ErrorKind, Result};
use crate::macros::err;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// The most characters a single decoded string may hold
///
/// Longer strings are truncated.
const MAX_TEXT_CHARS: usize = 65_536;

const BOM_LE: [u8; 2] = [0xFF, 0xFE];
const BOM_BE: [u8; 2] = [0xFE, 0xFF];

/// The encoding byte at the start of ID3v2 text frames
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1, one byte per character
	Latin1 = 0,
	/// UTF-16, in the byte order given by a leading BOM
	UTF16 = 1,
	/// UTF-16 without a BOM, always big endian (ID3v2.4 only)
	UTF16BE = 2,
	/// UTF-8 (ID3v2.4 only)
	UTF8 = 3,
}

impl TextEncoding {
	/// Get a `TextEncoding` from its encoding byte
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::TextEncoding;
	///
	/// assert_eq!(TextEncoding::from_u8(3), Some(TextEncoding::UTF8));
	/// assert_eq!(TextEncoding::from_u8(4), None);
	/// ```
	pub fn from_u8(byte: u8) -> Option<Self> {
		Some(match byte {
			0 => Self::Latin1,
			1 => Self::UTF16,
			2 => Self::UTF16BE,
			3 => Self::UTF8,
			_ => return None,
		})
	}

	fn terminator_len(self) -> usize {
		match self {
			Self::Latin1 | Self::UTF8 => 1,
			Self::UTF16 | Self::UTF16BE => 2,
		}
	}
}

#[derive(Eq, PartialEq, Debug, Default)]
pub(crate) struct DecodedText {
	pub(crate) content: String,
	/// How far to advance past the string
	pub(crate) bytes_read: usize,
	/// The byte order the string was decoded with, only set for [`TextEncoding::UTF16`]
	pub(crate) bom: [u8; 2],
}

impl DecodedText {
	pub(crate) fn text_or_none(self) -> Option<String> {
		(!self.content.is_empty()).then_some(self.content)
	}
}

/// How to decode a string with [`decode_text`]
///
/// Defaults to unterminated UTF-8.
#[derive(Copy, Clone, Debug)]
pub(crate) struct TextDecodeOptions {
	pub encoding: TextEncoding,
	pub terminated: bool,
	pub bom: [u8; 2],
}

impl TextDecodeOptions {
	pub(crate) fn new() -> Self {
		Self {
			encoding: TextEncoding::UTF8,
			terminated: false,
			bom: [0, 0],
		}
	}

	pub(crate) fn encoding(mut self, encoding: TextEncoding) -> Self {
		self.encoding = encoding;
		self
	}

	/// Whether the string is followed by more data, making `bytes_read` stop after its terminator
	pub(crate) fn terminated(mut self, terminated: bool) -> Self {
		self.terminated = terminated;
		self
	}

	/// The byte order to assume for UTF-16 strings that carry no BOM of their own
	pub(crate) fn bom(mut self, bom: [u8; 2]) -> Self {
		self.bom = bom;
		self
	}
}

/// Decode a string from the start of `bytes`
///
/// Decoding always stops at the first terminator. When `options.terminated` is set, `bytes_read`
/// covers the string and its terminator, otherwise it covers all of `bytes`.
pub(crate) fn decode_text(bytes: &[u8], options: TextDecodeOptions) -> Result<DecodedText> {
	let encoding = options.encoding;

	let (raw, bytes_read) = match find_terminator(bytes, encoding) {
		Some(end) if options.terminated => (&bytes[..end], end + encoding.terminator_len()),
		Some(end) => (&bytes[..end], bytes.len()),
		None => (bytes, bytes.len()),
	};

	let mut decoded = DecodedText {
		bytes_read,
		..DecodedText::default()
	};

	if raw.is_empty() {
		return Ok(decoded);
	}

	decoded.content = match encoding {
		TextEncoding::Latin1 => latin1_decode(raw),
		TextEncoding::UTF16 => {
			let (bom, text) = match raw {
				[0xFE, 0xFF, rest @ ..] => (BOM_BE, rest),
				[0xFF, 0xFE, rest @ ..] => (BOM_LE, rest),
				// Borrow the byte order of an earlier string, falling back to big endian
				_ if options.bom == BOM_LE => (BOM_LE, raw),
				_ => (BOM_BE, raw),
			};

			decoded.bom = bom;
			if bom == BOM_LE {
				utf16_decode::<LittleEndian>(text)?
			} else {
				utf16_decode::<BigEndian>(text)?
			}
		},
		TextEncoding::UTF16BE => utf16_decode::<BigEndian>(raw)?,
		TextEncoding::UTF8 => std::str::from_utf8(raw)
			.map(str::to_owned)
			.map_err(|_| AudTagError::new(ErrorKind::TextDecode("Expected a UTF-8 string")))?,
	};

	if let Some((cutoff, _)) = decoded.content.char_indices().nth(MAX_TEXT_CHARS) {
		log::warn!("Truncating a string longer than {MAX_TEXT_CHARS} characters");
		decoded.content.truncate(cutoff);
	}

	Ok(decoded)
}

/// Find the index of the first terminator in `bytes`
///
/// UTF-16 terminators are only matched on code unit boundaries.
fn find_terminator(bytes: &[u8], encoding: TextEncoding) -> Option<usize> {
	match encoding {
		TextEncoding::Latin1 | TextEncoding::UTF8 => bytes.iter().position(|b| *b == 0),
		TextEncoding::UTF16 | TextEncoding::UTF16BE => bytes
			.chunks_exact(2)
			.position(|c| c == [0, 0])
			.map(|pos| pos * 2),
	}
}

/// Every byte is its own code point, trailing NULs are dropped
pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |pos| pos + 1);
	bytes[..end].iter().map(|b| char::from(*b)).collect()
}

/// Encode `text` as Latin-1
///
/// With `lossy`, characters above U+00FF become `?`. Otherwise they fail the encoding.
pub(crate) fn latin1_encode(text: &str, lossy: bool) -> Result<Vec<u8>> {
	text.chars()
		.map(|c| match u8::try_from(c) {
			Ok(byte) => Ok(byte),
			Err(_) if lossy => Ok(b'?'),
			Err(_) => err!(TextEncode("String contains characters outside of Latin-1")),
		})
		.collect()
}

fn utf16_decode<B: ByteOrder>(bytes: &[u8]) -> Result<String> {
	if bytes.len() % 2 != 0 {
		err!(TextDecode("UTF-16 string has an odd length"));
	}

	let units = bytes.chunks_exact(2).map(B::read_u16);
	let text = char::decode_utf16(units)
		.collect::<std::result::Result<String, _>>()
		.map_err(|_| AudTagError::new(ErrorKind::TextDecode("Given an invalid UTF-16 string")))?;

	Ok(text.trim_end_matches('\0').to_owned())
}

/// UTF-16 with a little endian BOM, the encoding of every written ID3v2 string
pub(crate) fn utf16le_with_bom(text: &str) -> Vec<u8> {
	let mut encoded = BOM_LE.to_vec();
	for unit in text.encode_utf16() {
		let mut buf = [0; 2];
		LittleEndian::write_u16(&mut buf, unit);
		encoded.extend(buf);
	}

	encoded
}
