//! Raw ID3v2 frames and their container

pub(crate) mod dict;
pub(crate) mod read;

use crate::util::text::{TextEncoding, utf16le_with_bom};

pub use dict::FrameDictionary;

/// A single undecoded frame
///
/// The payload is stored exactly as it will be written: any unsynchronisation, grouping, or
/// data length indicator has already been removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
	key: String,
	payload: Vec<u8>,
}

impl RawFrame {
	/// Create a new `RawFrame`
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::id3::v2::RawFrame;
	///
	/// let frame = RawFrame::new("TIT2", b"\x03Foo title".to_vec());
	/// assert_eq!(frame.key(), "TIT2");
	/// ```
	pub fn new(key: impl Into<String>, payload: Vec<u8>) -> Self {
		Self {
			key: key.into(),
			payload,
		}
	}

	/// Create a text frame, UTF-16 with a little endian BOM
	pub(crate) fn text(key: &str, text: &str) -> Self {
		let mut payload = vec![TextEncoding::UTF16 as u8];
		payload.extend(utf16le_with_bom(text));

		Self::new(key, payload)
	}

	/// Create a memo frame (`COMM`/`USLT`) with an empty description and a language of "eng"
	pub(crate) fn memo(key: &str, text: &str) -> Self {
		let mut payload = vec![TextEncoding::UTF16 as u8];
		payload.extend(b"eng");

		// Empty description, BOM included
		payload.extend([0xFF, 0xFE, 0x00, 0x00]);
		payload.extend(utf16le_with_bom(text));

		Self::new(key, payload)
	}

	/// The frame ID
	pub fn key(&self) -> &str {
		&self.key
	}

	/// The frame content
	pub fn payload(&self) -> &[u8] {
		&self.payload
	}

	/// Consume the frame, returning its content
	pub fn into_payload(self) -> Vec<u8> {
		self.payload
	}
}
