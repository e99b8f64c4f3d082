//! The storage objects tags are read from and written to

use crate::error::{AudTagError, Result};

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

/// `Seek::stream_len` is unstable, this fills the gap
pub(crate) trait SeekStreamLen: Seek {
	/// The total length of the stream, leaving the position where it was
	fn stream_length(&mut self) -> Result<u64> {
		let pos = self.stream_position()?;
		let len = self.seek(SeekFrom::End(0))?;

		if pos != len {
			self.seek(SeekFrom::Start(pos))?;
		}

		Ok(len)
	}
}

impl<T> SeekStreamLen for T where T: Seek {}

/// Shrinks a storage object after a tag was rewritten
///
/// Part of [`FileLike`]. A new tag can be smaller than the old one, so after the new contents are
/// written, the object is cut down to their length.
///
/// An implementation that leaves trailing bytes in place **will** corrupt the file, since the old
/// audio data (or an old trailing tag) would be left behind.
pub trait Truncate {
	/// The error type of the truncation operation
	type Error: Into<AudTagError>;

	/// Cut the object down to `new_len` bytes
	///
	/// # Errors
	///
	/// Depends on the object, truncating a `Vec<u8>` can't fail.
	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error>;
}

/// Reports the length of a storage object
///
/// Part of [`FileLike`]. The length must be exact.
pub trait Length {
	/// The error type of the length operation
	type Error: Into<AudTagError>;

	/// The length of the object, in bytes
	///
	/// # Errors
	///
	/// Depends on the object, a `Vec<u8>` always knows its length.
	fn len(&self) -> std::result::Result<u64, Self::Error>;
}

impl Truncate for File {
	type Error = std::io::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.set_len(new_len)
	}
}

impl Length for File {
	type Error = std::io::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(self.metadata()?.len())
	}
}

impl Truncate for Vec<u8> {
	type Error = std::convert::Infallible;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		Vec::truncate(self, new_len as usize);
		Ok(())
	}
}

impl Length for Vec<u8> {
	type Error = std::convert::Infallible;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(Vec::len(self) as u64)
	}
}

// Wrappers forward to the object they hold
macro_rules! impl_forwarding {
	($($wrapper:ty => |$this:ident| $inner:expr, $inner_mut:expr);+ $(;)?) => {
		$(
			impl<T> Truncate for $wrapper
			where
				T: Truncate,
			{
				type Error = <T as Truncate>::Error;

				fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
					let $this = self;
					Truncate::truncate($inner_mut, new_len)
				}
			}

			impl<T> Length for $wrapper
			where
				T: Length,
			{
				type Error = <T as Length>::Error;

				fn len(&self) -> std::result::Result<u64, Self::Error> {
					let $this = self;
					Length::len($inner)
				}
			}
		)+
	};
}

impl_forwarding! {
	Cursor<T> => |this| this.get_ref(), this.get_mut();
	Box<T> => |this| &**this, &mut **this;
	&mut T => |this| &**this, &mut **this;
}

/// A storage object that tags can be written to
///
/// This is [`Read`] + [`Write`] + [`Seek`] + [`Truncate`] + [`Length`], and is implemented for
/// anything that has all of them. It is what [`TagModule::write`](crate::module::TagModule::write)
/// and [`write_to`](crate::write_to) take.
///
/// # Examples
///
/// ```rust
/// use audtag::config::WriteOptions;
/// use audtag::tag_type::TagType;
/// use audtag::tuple::{StrField, Tuple};
/// use std::io::Cursor;
///
/// # fn main() -> audtag::error::Result<()> {
/// let mut tuple = Tuple::new();
/// tuple.set_str(StrField::Title, "Foo title");
///
/// // An in-memory file
/// let mut file = Cursor::new(b"\xFF\xFB\x90\x00".to_vec());
/// audtag::write_to(&mut file, &tuple, TagType::Id3v1, WriteOptions::new())?;
///
/// assert_eq!(file.get_ref().len(), 4 + 128);
/// # Ok(()) }
/// ```
pub trait FileLike: Read + Write + Seek + Truncate + Length
where
	<Self as Truncate>::Error: Into<AudTagError>,
	<Self as Length>::Error: Into<AudTagError>,
{
}

impl<T> FileLike for T
where
	T: Read + Write + Seek + Truncate + Length,
	<T as Truncate>::Error: Into<AudTagError>,
	<T as Length>::Error: Into<AudTagError>,
{
}

/// Copy `len` bytes from `reader`, starting at `start`, into `writer`
///
/// Fails with an unexpected EOF if the reader runs out before `len` bytes were copied.
pub(crate) fn copy_range<R, W>(reader: &mut R, writer: &mut W, start: u64, len: u64) -> Result<()>
where
	R: Read + Seek,
	W: Write,
{
	reader.seek(SeekFrom::Start(start))?;

	let copied = std::io::copy(&mut reader.by_ref().take(len), writer)?;
	if copied != len {
		return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
	}

	Ok(())
}

/// Copy everything from `start` to the end of `reader` into `writer`
pub(crate) fn copy_from<R, W>(reader: &mut R, writer: &mut W, start: u64) -> Result<u64>
where
	R: Read + Seek,
	W: Write,
{
	reader.seek(SeekFrom::Start(start))?;
	Ok(std::io::copy(reader, writer)?)
}
