//! Errors returned by audtag
//!
//! Everything returns an [`AudTagError`], see [`AudTagError::kind`]. ID3v2 specific problems are
//! further described by an [`Id3v2Error`], and malformed APE or ID3v1 tags by a
//! [`FileDecodingError`].

use crate::tag_type::TagType;

use std::collections::TryReserveError;
use std::fmt::{self, Debug, Display, Formatter};

/// Alias for `Result<T, AudTagError>`
pub type Result<T> = std::result::Result<T, AudTagError>;

/// What went wrong
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Probing
	/// No tag module accepted the file, and none was selected for writing
	UnknownFormat,
	/// A tag header or footer failed validation
	///
	/// This is not fatal while probing, the next module will be tried.
	FormatMismatch,
	/// A write was attempted through a read-only module (ID3v2.2)
	UnsupportedTag,

	// Tag contents
	/// A size field is larger than anything audtag is willing to read or write
	TooMuchData,
	/// A size field doesn't fit within the data it describes
	SizeMismatch,
	/// A malformed APE or ID3v1 tag
	FileDecoding(FileDecodingError),
	/// A malformed ID3v2 tag or frame
	Id3v2(Id3v2Error),
	/// Text that can't be decoded in its declared encoding
	TextDecode(&'static str),
	/// Text that can't be represented in the target encoding
	TextEncode(&'static str),

	// Wrapped errors
	/// Reading, writing, or seeking failed
	Io(std::io::Error),
	/// A buffer couldn't be allocated
	Alloc(TryReserveError),
	/// Can't be constructed, only exists for `Infallible` conversions
	Infallible(std::convert::Infallible),
}

/// What went wrong with an ID3v2 tag
#[derive(Debug)]
#[non_exhaustive]
pub enum Id3v2ErrorKind {
	// Header
	/// The major version isn't 2, 3, or 4 (major, revision)
	BadId3v2Version(u8, u8),
	/// An ID3v2.2 tag with the compression flag set
	///
	/// No compression scheme was ever defined for ID3v2.2, such tags can't be read.
	V2Compression,
	/// The extended header size is out of bounds
	BadExtendedHeaderSize,
	/// The header announces a footer that doesn't validate
	MissingFooter,

	// Frame
	/// A frame ID with characters outside of `A-Z` and `0-9`
	BadFrameId(Vec<u8>),
	/// A frame too short for its own fields
	BadFrameLength,
	/// A compressed or encrypted frame that can't be decoded
	UnsupportedFrameFeature(&'static str),
	/// A text encoding byte outside of `0..=3`
	InvalidTextEncoding(u8),

	#[cfg(feature = "id3v2_compression_support")]
	/// A compressed frame that failed to inflate
	Decompression(flate2::DecompressError),
}

impl Display for Id3v2ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::BadId3v2Version(major, revision) => {
				write!(f, "Unsupported version 2.{major}.{revision}")
			},
			Self::V2Compression => f.write_str("Compressed ID3v2.2 tags can't be read"),
			Self::BadExtendedHeaderSize => f.write_str("Extended header size is out of bounds"),
			Self::MissingFooter => f.write_str("The header announces a footer, but there is none"),

			Self::BadFrameId(frame_id) => write!(f, "Invalid frame ID: {frame_id:x?}"),
			Self::BadFrameLength => f.write_str("Frame is too short for its contents"),
			Self::UnsupportedFrameFeature(feature) => write!(f, "Can't decode {feature} frames"),
			Self::InvalidTextEncoding(byte) => write!(f, "Invalid text encoding byte: {byte}"),

			#[cfg(feature = "id3v2_compression_support")]
			Self::Decompression(err) => write!(f, "Failed to inflate frame: {err}"),
		}
	}
}

/// A malformed ID3v2 tag, see [`Id3v2ErrorKind`]
pub struct Id3v2Error {
	kind: Id3v2ErrorKind,
}

impl Id3v2Error {
	/// Wrap an [`Id3v2ErrorKind`]
	#[must_use]
	pub const fn new(kind: Id3v2ErrorKind) -> Self {
		Self { kind }
	}

	/// What went wrong
	pub fn kind(&self) -> &Id3v2ErrorKind {
		&self.kind
	}
}

impl Debug for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Id3v2({:?})", self.kind)
	}
}

impl Display for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "ID3v2: {}", self.kind)
	}
}

/// A malformed APE or ID3v1 tag
pub struct FileDecodingError {
	tag_type: TagType,
	description: &'static str,
}

impl FileDecodingError {
	/// Create a `FileDecodingError` from a [`TagType`] and description
	#[must_use]
	pub const fn new(tag_type: TagType, description: &'static str) -> Self {
		Self {
			tag_type,
			description,
		}
	}

	/// The [`TagType`] of the malformed tag
	pub fn tag_type(&self) -> TagType {
		self.tag_type
	}

	/// What was wrong with the tag
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for FileDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}: {:?}", self.tag_type, self.description)
	}
}

impl Display for FileDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}: {}", self.tag_type, self.description)
	}
}

/// The error type of every fallible audtag operation
pub struct AudTagError {
	pub(crate) kind: ErrorKind,
}

impl AudTagError {
	/// Wrap an [`ErrorKind`]
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// What went wrong
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audtag::error::ErrorKind;
	/// use audtag::tuple::Tuple;
	///
	/// let mut tuple = Tuple::new();
	/// match audtag::read_from_path("test.mp3", &mut tuple) {
	/// 	Ok(_) => {},
	/// 	Err(e) if matches!(e.kind(), ErrorKind::UnknownFormat) => println!("No tag"),
	/// 	Err(e) => eprintln!("Failed to read the tag: {e}"),
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// Whether this error only means that a tag wasn't where it was expected
	///
	/// Unexpected EOFs count as a mismatch, since a file too short to hold a tag doesn't hold one.
	pub(crate) fn is_format_mismatch(&self) -> bool {
		match &self.kind {
			ErrorKind::FormatMismatch => true,
			ErrorKind::Io(err) => err.kind() == std::io::ErrorKind::UnexpectedEof,
			_ => false,
		}
	}
}

impl std::error::Error for AudTagError {}

impl Debug for AudTagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Debug::fmt(&self.kind, f)
	}
}

impl Display for AudTagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match &self.kind {
			ErrorKind::UnknownFormat => f.write_str("No tag module accepted the file"),
			ErrorKind::FormatMismatch => f.write_str("Expected a tag, found invalid data"),
			ErrorKind::UnsupportedTag => f.write_str("This tag type can only be read"),

			ErrorKind::TooMuchData => f.write_str("Refusing to handle an abnormally large size"),
			ErrorKind::SizeMismatch => f.write_str("An item size exceeds the data it belongs to"),
			ErrorKind::FileDecoding(err) => Display::fmt(err, f),
			ErrorKind::Id3v2(err) => Display::fmt(err, f),
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),
			ErrorKind::TextEncode(message) => write!(f, "Text encoding: {message}"),

			ErrorKind::Io(err) => Display::fmt(err, f),
			ErrorKind::Alloc(err) => Display::fmt(err, f),
			ErrorKind::Infallible(never) => match *never {},
		}
	}
}

macro_rules! impl_from {
	($($source:ty => $variant:ident),+ $(,)?) => {
		$(
			impl From<$source> for AudTagError {
				fn from(input: $source) -> Self {
					Self::new(ErrorKind::$variant(input))
				}
			}
		)+
	};
}

impl_from! {
	Id3v2Error => Id3v2,
	FileDecodingError => FileDecoding,
	std::io::Error => Io,
	TryReserveError => Alloc,
	std::convert::Infallible => Infallible,
}

// The temporary file is dropped along with the error, the original file is untouched
impl From<tempfile::PersistError> for AudTagError {
	fn from(input: tempfile::PersistError) -> Self {
		Self::new(ErrorKind::Io(input.error))
	}
}

#[cfg(test)]
mod tests {
	use super::{AudTagError, ErrorKind, Id3v2Error, Id3v2ErrorKind};

	#[test_log::test]
	fn format_mismatch() {
		assert!(AudTagError::new(ErrorKind::FormatMismatch).is_format_mismatch());

		let eof = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
		assert!(AudTagError::from(eof).is_format_mismatch());

		let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
		assert!(!AudTagError::from(denied).is_format_mismatch());

		let id3v2: AudTagError = Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into();
		assert!(!id3v2.is_format_mismatch());
	}

	#[test_log::test]
	fn display() {
		let err: AudTagError = Id3v2Error::new(Id3v2ErrorKind::BadId3v2Version(5, 0)).into();
		assert_eq!(err.to_string(), "ID3v2: Unsupported version 2.5.0");
	}
}
