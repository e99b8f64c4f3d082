use crate::config::ParsingMode;
use crate::error::{AudTagError, ErrorKind, Result};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::macros::{err, id3v2_err};

use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

/// The size of an ID3v2 header or footer
pub(crate) const HEADER_LEN: u32 = 10;

/// Tags claiming to be larger than this are rejected
pub(crate) const MAX_TAG_SIZE: u32 = 16 * 1024 * 1024;

pub(crate) const ID3V2_MAGIC: &[u8; 3] = b"ID3";
pub(crate) const ID3V2_FOOTER_MAGIC: &[u8; 3] = b"3DI";

// Tag header flags
pub(crate) const FLAG_UNSYNCHRONISATION: u8 = 0x80;
pub(crate) const FLAG_EXTENDED_HEADER: u8 = 0x40;
pub(crate) const FLAG_FOOTER: u8 = 0x10;
// ID3v2.2 reused bit 6 for compression
pub(crate) const FLAG_V2_COMPRESSION: u8 = 0x40;

/// The ID3v2 version
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	V4,
}

impl Id3v2Version {
	/// The major version byte, as stored in the header
	pub fn major(self) -> u8 {
		match self {
			Self::V2 => 2,
			Self::V3 => 3,
			Self::V4 => 4,
		}
	}

	/// The size of a frame header in this version
	pub(crate) fn frame_header_len(self) -> usize {
		match self {
			Self::V2 => 6,
			Self::V3 | Self::V4 => 10,
		}
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Id3v2Header {
	pub version: Id3v2Version,
	pub revision: u8,
	pub flags: u8,
	/// The size of the tag contents (**DOES NOT INCLUDE THE HEADER/FOOTER**)
	pub size: u32,
}

impl Id3v2Header {
	pub(crate) fn parse(bytes: [u8; 10], magic: &[u8; 3]) -> Result<Self> {
		if &bytes[..3] != magic {
			err!(FormatMismatch);
		}

		// Version is stored as [major, minor], but here we don't care about minor revisions unless there's an error.
		let version = match bytes[3] {
			2 => Id3v2Version::V2,
			3 => Id3v2Version::V3,
			4 => Id3v2Version::V4,
			major => id3v2_err!(BadId3v2Version(major, bytes[4])),
		};

		let size = BigEndian::read_u32(&bytes[6..]).unsynch();
		if size > MAX_TAG_SIZE {
			log::warn!("ID3v2 tag claims a size of {size} bytes, rejecting");
			err!(TooMuchData);
		}

		Ok(Self {
			version,
			revision: bytes[4],
			flags: bytes[5],
			size,
		})
	}

	pub(crate) fn read<R>(reader: &mut R, magic: &[u8; 3]) -> Result<Self>
	where
		R: Read,
	{
		let mut bytes = [0; 10];
		reader.read_exact(&mut bytes)?;

		Self::parse(bytes, magic)
	}

	/// Serialize a header with no flags and a revision of 0
	pub(crate) fn render(version: Id3v2Version, size: u32) -> Result<[u8; 10]> {
		let mut bytes = [0; 10];
		bytes[..3].copy_from_slice(ID3V2_MAGIC);
		bytes[3] = version.major();
		BigEndian::write_u32(&mut bytes[6..], size.synch()?);

		Ok(bytes)
	}
}

/// Where an ID3v2 tag lives within a file
///
/// This is produced by [`locate`], and is only valid until the file is modified.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TagLocation {
	/// The offset of the tag header
	pub offset: u64,
	/// The size of the header, including any extended header
	pub header_len: u32,
	/// The size of the frame data, including padding
	pub data_len: u32,
	/// The size of the footer, 0 if there is none
	pub footer_len: u32,
	/// The tag version
	pub version: Id3v2Version,
	/// Whether the entire frame data region is unsynchronized
	pub unsynchronised: bool,
}

impl TagLocation {
	/// The offset of the first frame
	pub fn data_offset(&self) -> u64 {
		self.offset + u64::from(self.header_len)
	}

	/// The offset of the first byte after the tag
	pub fn end(&self) -> u64 {
		self.offset + self.total_len()
	}

	/// The size of the entire tag
	pub fn total_len(&self) -> u64 {
		u64::from(self.header_len) + u64::from(self.data_len) + u64::from(self.footer_len)
	}
}

/// Find an ID3v2.3 or ID3v2.4 tag
///
/// The tag is searched for at the start of the file, then by its footer at the end of the file.
/// The reader position is unspecified afterwards, and the file is never modified.
///
/// # Errors
///
/// * [`ErrorKind::FormatMismatch`] if no valid tag was found
/// * [`ErrorKind::Io`] if reading failed for any other reason than hitting EOF
/// * With [`ParsingMode::Strict`], the specific reason a tag was rejected, such as
///   [`Id3v2ErrorKind::BadExtendedHeaderSize`](crate::error::Id3v2ErrorKind::BadExtendedHeaderSize)
///
/// # Examples
///
/// ```rust
/// use audtag::config::ParsingMode;
/// use audtag::id3::v2::{Id3v2Version, locate};
/// use std::io::Cursor;
///
/// # fn main() -> audtag::error::Result<()> {
/// // An empty ID3v2.3 tag, followed by some audio
/// let mut file = Cursor::new(b"ID3\x03\x00\x00\x00\x00\x00\x00\xFF\xFB".to_vec());
///
/// let location = locate(&mut file, ParsingMode::BestAttempt)?;
/// assert_eq!(location.offset, 0);
/// assert_eq!(location.version, Id3v2Version::V3);
/// assert_eq!(location.end(), 10);
/// # Ok(()) }
/// ```
pub fn locate<R>(reader: &mut R, parsing_mode: ParsingMode) -> Result<TagLocation>
where
	R: Read + Seek,
{
	locate_v3_v4(reader, parsing_mode).map_err(|e| downgrade_error(e, parsing_mode))
}

/// Find an ID3v2.2 tag
///
/// ID3v2.2 tags are only recognized at the start of the file.
///
/// # Errors
///
/// See [`locate`]. A compressed tag is rejected with
/// [`Id3v2ErrorKind::V2Compression`](crate::error::Id3v2ErrorKind::V2Compression) in
/// [`ParsingMode::Strict`].
pub fn locate_v22<R>(reader: &mut R, parsing_mode: ParsingMode) -> Result<TagLocation>
where
	R: Read + Seek,
{
	let inner = |reader: &mut R| -> Result<TagLocation> {
		reader.seek(SeekFrom::Start(0))?;

		let header = Id3v2Header::read(reader, ID3V2_MAGIC)?;
		if header.version != Id3v2Version::V2 {
			err!(FormatMismatch);
		}

		check_revision(&header, parsing_mode)?;

		// At the time the ID3v2.2 specification was written, a compression scheme wasn't decided.
		// The format recommends just ignoring the tag in this case.
		if header.flags & FLAG_V2_COMPRESSION == FLAG_V2_COMPRESSION {
			id3v2_err!(V2Compression);
		}

		log::debug!("Found an ID3v2.2 tag, size: {}", header.size);

		Ok(TagLocation {
			offset: 0,
			header_len: HEADER_LEN,
			data_len: header.size,
			footer_len: 0,
			version: Id3v2Version::V2,
			unsynchronised: header.flags & FLAG_UNSYNCHRONISATION == FLAG_UNSYNCHRONISATION,
		})
	};

	inner(reader).map_err(|e| downgrade_error(e, parsing_mode))
}

fn locate_v3_v4<R>(reader: &mut R, parsing_mode: ParsingMode) -> Result<TagLocation>
where
	R: Read + Seek,
{
	reader.seek(SeekFrom::Start(0))?;

	let front = Id3v2Header::read(reader, ID3V2_MAGIC).and_then(|h| accept(h, parsing_mode));

	let (offset, header, footer_len) = match front {
		Ok(header) => {
			let mut footer_len = 0;
			if header.flags & FLAG_FOOTER == FLAG_FOOTER {
				reader.seek(SeekFrom::Start(u64::from(HEADER_LEN + header.size)))?;

				match Id3v2Header::read(reader, ID3V2_FOOTER_MAGIC) {
					Ok(footer) if footer.version == header.version => {},
					Err(e) if is_io_failure(&e) => return Err(e),
					_ => id3v2_err!(MissingFooter),
				}

				footer_len = HEADER_LEN;
			}

			(0, header, footer_len)
		},
		Err(e) if is_io_failure(&e) => return Err(e),
		Err(front_err) => match locate_by_footer(reader, parsing_mode) {
			Ok(found) => found,
			Err(e) if is_io_failure(&e) => return Err(e),
			// Report why the front of the file was rejected, unless there was nothing there at all
			Err(e) if front_err.is_format_mismatch() => return Err(e),
			Err(_) => return Err(front_err),
		},
	};

	let mut header_len = HEADER_LEN;
	let mut data_len = header.size;

	if header.flags & FLAG_EXTENDED_HEADER == FLAG_EXTENDED_HEADER {
		reader.seek(SeekFrom::Start(offset + u64::from(HEADER_LEN)))?;

		let raw_size = reader.read_u32::<BigEndian>()?;
		let extended_len = match header.version {
			// ID3v2.3 doesn't include the size field itself
			Id3v2Version::V3 => raw_size.checked_add(4),
			_ => Some(raw_size.unsynch()).filter(|size| *size >= 4),
		};

		match extended_len {
			Some(len) if len <= data_len => {
				log::debug!("Skipping an extended header of {len} bytes");

				header_len += len;
				data_len -= len;
			},
			_ => id3v2_err!(BadExtendedHeaderSize),
		}
	}

	// This flag indicates tag-level unsynchronisation in ID3v2.3
	// ID3v2.4 uses frame-level unsynchronisation, rendering this flag meaningless
	let unsynchronised = header.version == Id3v2Version::V3
		&& header.flags & FLAG_UNSYNCHRONISATION == FLAG_UNSYNCHRONISATION;

	let location = TagLocation {
		offset,
		header_len,
		data_len,
		footer_len,
		version: header.version,
		unsynchronised,
	};

	log::debug!("Found an ID3v2 tag: {location:?}");
	Ok(location)
}

fn locate_by_footer<R>(reader: &mut R, parsing_mode: ParsingMode) -> Result<(u64, Id3v2Header, u32)>
where
	R: Read + Seek,
{
	let file_len = reader.seek(SeekFrom::End(0))?;
	let Some(footer_pos) = file_len.checked_sub(u64::from(HEADER_LEN)) else {
		err!(FormatMismatch);
	};

	reader.seek(SeekFrom::Start(footer_pos))?;
	let footer = accept(Id3v2Header::read(reader, ID3V2_FOOTER_MAGIC)?, parsing_mode)?;

	let Some(offset) = footer_pos.checked_sub(u64::from(HEADER_LEN + footer.size)) else {
		err!(FormatMismatch);
	};

	reader.seek(SeekFrom::Start(offset))?;
	let header = accept(Id3v2Header::read(reader, ID3V2_MAGIC)?, parsing_mode)?;

	log::debug!("Found an ID3v2 footer, tag starts at {offset}");
	Ok((offset, header, HEADER_LEN))
}

// Only ID3v2.3 and ID3v2.4 are handled here, ID3v2.2 has its own module
fn accept(header: Id3v2Header, parsing_mode: ParsingMode) -> Result<Id3v2Header> {
	if header.version == Id3v2Version::V2 {
		err!(FormatMismatch);
	}

	check_revision(&header, parsing_mode)?;
	Ok(header)
}

fn check_revision(header: &Id3v2Header, parsing_mode: ParsingMode) -> Result<()> {
	if header.revision != 0 {
		if parsing_mode == ParsingMode::Relaxed {
			log::warn!("Accepting an ID3v2 tag with revision {}", header.revision);
			return Ok(());
		}

		log::debug!("Rejecting an ID3v2 tag with revision {}", header.revision);
		err!(FormatMismatch);
	}

	Ok(())
}

fn is_io_failure(err: &AudTagError) -> bool {
	matches!(err.kind(), ErrorKind::Io(e) if e.kind() != std::io::ErrorKind::UnexpectedEof)
}

// Outside of strict mode, every reason to reject a tag is just a mismatch
fn downgrade_error(err: AudTagError, parsing_mode: ParsingMode) -> AudTagError {
	if is_io_failure(&err) || (parsing_mode == ParsingMode::Strict && !err.is_format_mismatch())
	{
		return err;
	}

	if !err.is_format_mismatch() {
		log::debug!("Rejecting ID3v2 tag: {err}");
	}

	AudTagError::new(ErrorKind::FormatMismatch)
}
