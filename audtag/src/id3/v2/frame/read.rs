use super::{FrameDictionary, RawFrame};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, unsynchronize};
use crate::macros::{id3v2_err, parse_mode_choice};

use byteorder::{BigEndian, ByteOrder};

// Frame flags, as laid out in ID3v2.4
//
// ID3v2.3 frames are read with the same bits on purpose, so a v2.3 group flag is 0x0040 here too.
const FLAG_GROUPING_IDENTITY: u16 = 0x0040;
const FLAG_COMPRESSION: u16 = 0x0008;
const FLAG_ENCRYPTION: u16 = 0x0004;
const FLAG_UNSYNCHRONISATION: u16 = 0x0002;
const FLAG_DATA_LENGTH_INDICATOR: u16 = 0x0001;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ParsedFrame {
	/// A frame was read, the caller should advance by `size`
	Next { size: usize, frame: RawFrame },
	/// A frame was read but is unusable, the caller should advance by `size`
	Skip { size: usize },
	/// There are no more frames
	Eof,
}

impl ParsedFrame {
	/// Read the frame at the start of `data`
	///
	/// `data` is the rest of the frame region, so it also bounds the frame size.
	pub(crate) fn read(
		data: &[u8],
		version: Id3v2Version,
		parse_options: ParseOptions,
	) -> Result<Self> {
		let parse_mode = parse_options.parsing_mode;
		let header_len = version.frame_header_len();

		let Some((header, rest)) = data.split_at_checked(header_len) else {
			return Ok(Self::Eof);
		};

		// Assume we just started reading padding
		if header[0] == 0 {
			return Ok(Self::Eof);
		}

		let (id_bytes, size, flags) = match version {
			Id3v2Version::V2 => (&header[..3], BigEndian::read_u24(&header[3..]), 0),
			Id3v2Version::V3 => (
				&header[..4],
				BigEndian::read_u32(&header[4..8]),
				BigEndian::read_u16(&header[8..]),
			),
			Id3v2Version::V4 => (
				&header[..4],
				BigEndian::read_u32(&header[4..8]).unsynch(),
				BigEndian::read_u16(&header[8..]),
			),
		};

		let size = size as usize;
		if size == 0 || size > rest.len() {
			log::debug!(
				"Frame claims a size of {size}, with {} bytes remaining, stopping",
				rest.len()
			);
			return Ok(Self::Eof);
		}

		let frame_len = header_len + size;
		let mut content = &rest[..size];

		if !id_bytes
			.iter()
			.all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
		{
			parse_mode_choice!(
				parse_mode,
				STRICT: id3v2_err!(BadFrameId(id_bytes.to_vec())),
				DEFAULT: {
					log::warn!("Skipping a frame with an invalid ID: {id_bytes:x?}");
					return Ok(Self::Skip { size: frame_len });
				}
			);
		}

		let key = id_bytes.iter().copied().map(char::from).collect::<String>();

		if flags & FLAG_ENCRYPTION == FLAG_ENCRYPTION {
			return unsupported(key, "encrypted", frame_len, parse_mode);
		}

		let compressed = flags & FLAG_COMPRESSION == FLAG_COMPRESSION;
		if compressed && !cfg!(feature = "id3v2_compression_support") {
			return unsupported(key, "compressed", frame_len, parse_mode);
		}

		if flags & FLAG_GROUPING_IDENTITY == FLAG_GROUPING_IDENTITY {
			log::trace!("Skipping group identifier");
			content = content.get(1..).unwrap_or_default();
		}

		// Compressed frames always carry a data length indicator, even if the flag is missing
		let mut data_length = None;
		if flags & FLAG_DATA_LENGTH_INDICATOR == FLAG_DATA_LENGTH_INDICATOR || compressed {
			log::trace!("Reading data length indicator");

			data_length = content.get(..4).map(|len| BigEndian::read_u32(len).unsynch());
			content = content.get(4..).unwrap_or_default();
		}

		// Frames must have at least 1 byte, *after* all of the additional data flags can provide
		if content.is_empty() {
			parse_mode_choice!(
				parse_mode,
				STRICT: id3v2_err!(BadFrameLength),
				DEFAULT: {
					log::warn!("Frame \"{key}\" has no content past its prefixes, skipping");
					return Ok(Self::Skip { size: frame_len });
				}
			);
		}

		let mut payload = if version == Id3v2Version::V4
			&& flags & FLAG_UNSYNCHRONISATION == FLAG_UNSYNCHRONISATION
		{
			unsynchronize(content)
		} else {
			content.to_vec()
		};

		if compressed {
			payload = decompress(&payload, data_length.unwrap_or_default())?;
		}

		log::trace!("Read frame \"{key}\", size: {size}");
		Ok(Self::Next {
			size: frame_len,
			frame: RawFrame::new(key, payload),
		})
	}
}

fn unsupported(
	key: String,
	feature: &'static str,
	frame_len: usize,
	parse_mode: ParsingMode,
) -> Result<ParsedFrame> {
	if parse_mode == ParsingMode::Strict {
		id3v2_err!(UnsupportedFrameFeature(feature));
	}

	log::warn!("Skipping {feature} frame \"{key}\"");
	Ok(ParsedFrame::Skip { size: frame_len })
}

#[cfg(feature = "id3v2_compression_support")]
fn decompress(content: &[u8], decompressed_len: u32) -> Result<Vec<u8>> {
	use crate::error::{Id3v2Error, Id3v2ErrorKind};
	use crate::macros::err;
	use crate::util::alloc::{ALLOCATION_LIMIT, TryWithCapacity};

	use flate2::{Decompress, FlushDecompress, Status};

	// The data length indicator is only a hint, the output grows past it if needed
	let mut decompressed = Vec::try_with_capacity_bounded(decompressed_len as usize)?;
	let mut inflater = Decompress::new(true);
	loop {
		let consumed = usize::try_from(inflater.total_in()).unwrap_or(content.len());
		let status = inflater
			.decompress_vec(
				content.get(consumed..).unwrap_or_default(),
				&mut decompressed,
				FlushDecompress::Finish,
			)
			.map_err(|e| Id3v2Error::new(Id3v2ErrorKind::Decompression(e)))?;

		if status == Status::StreamEnd {
			break;
		}

		// Room left in the output, so the input ran out first
		if decompressed.len() < decompressed.capacity() {
			log::warn!("Compressed frame ended before the end of its zlib stream");
			break;
		}

		let additional = decompressed.capacity().max(64);
		if decompressed.capacity() + additional > ALLOCATION_LIMIT {
			err!(TooMuchData);
		}

		decompressed.try_reserve(additional)?;
	}

	if decompressed.len() != decompressed_len as usize {
		log::warn!(
			"Compressed frame inflated to {} bytes, expected {decompressed_len}",
			decompressed.len()
		);
	}

	Ok(decompressed)
}

#[cfg(not(feature = "id3v2_compression_support"))]
#[allow(clippy::unnecessary_wraps)]
fn decompress(content: &[u8], _: u32) -> Result<Vec<u8>> {
	Ok(content.to_vec())
}

/// Read every frame in a tag's data region, stopping at padding or the first broken frame
pub(crate) fn read_all_frames(
	data: &[u8],
	version: Id3v2Version,
	parse_options: ParseOptions,
) -> Result<FrameDictionary> {
	let mut frames = FrameDictionary::new();

	let mut pos = 0;
	while pos < data.len() {
		match ParsedFrame::read(&data[pos..], version, parse_options)? {
			ParsedFrame::Next { size, frame } => {
				frames.insert(frame);
				pos += size;
			},
			ParsedFrame::Skip { size } => pos += size,
			ParsedFrame::Eof => break,
		}
	}

	log::debug!("Read {} frames", frames.len());
	Ok(frames)
}

#[cfg(test)]
mod tests {
	use super::{ParsedFrame, read_all_frames};
	use crate::config::{ParseOptions, ParsingMode};
	use crate::error::{ErrorKind, Id3v2ErrorKind};
	use crate::id3::v2::RawFrame;
	use crate::id3::v2::header::Id3v2Version;

	fn v3_frame(key: &[u8; 4], flags: u16, content: &[u8]) -> Vec<u8> {
		let mut frame = key.to_vec();
		frame.extend((content.len() as u32).to_be_bytes());
		frame.extend(flags.to_be_bytes());
		frame.extend(content);
		frame
	}

	fn strict() -> ParseOptions {
		ParseOptions::new().parsing_mode(ParsingMode::Strict)
	}

	#[test_log::test]
	fn v3_frame_sizes() {
		let data = v3_frame(b"TIT2", 0, b"\x03Foo title");

		let parsed = ParsedFrame::read(&data, Id3v2Version::V3, ParseOptions::new()).unwrap();
		assert_eq!(
			parsed,
			ParsedFrame::Next {
				size: 20,
				frame: RawFrame::new("TIT2", b"\x03Foo title".to_vec()),
			}
		);
	}

	#[test_log::test]
	fn v4_sizes_are_synchsafe() {
		// 0x0101 synchsafe = 129
		let mut data = b"TXXX\x00\x00\x01\x01\x00\x00".to_vec();
		data.extend([b'a'; 129]);

		match ParsedFrame::read(&data, Id3v2Version::V4, ParseOptions::new()).unwrap() {
			ParsedFrame::Next { size, frame } => {
				assert_eq!(size, 139);
				assert_eq!(frame.payload().len(), 129);
			},
			other => panic!("Expected a frame, got {other:?}"),
		}
	}

	#[test_log::test]
	fn v2_frame() {
		let data = b"TT2\x00\x00\x04\x00Foo".to_vec();

		match ParsedFrame::read(&data, Id3v2Version::V2, ParseOptions::new()).unwrap() {
			ParsedFrame::Next { size, frame } => {
				assert_eq!(size, 10);
				assert_eq!(frame.key(), "TT2");
				assert_eq!(frame.payload(), b"\x00Foo");
			},
			other => panic!("Expected a frame, got {other:?}"),
		}
	}

	#[test_log::test]
	fn eof_conditions() {
		let options = ParseOptions::new();

		// Not enough for a header
		assert_eq!(
			ParsedFrame::read(b"TIT2", Id3v2Version::V3, options).unwrap(),
			ParsedFrame::Eof
		);

		// Padding
		assert_eq!(
			ParsedFrame::read(&[0; 20], Id3v2Version::V3, options).unwrap(),
			ParsedFrame::Eof
		);

		// Zero size
		let data = v3_frame(b"TIT2", 0, b"");
		assert_eq!(
			ParsedFrame::read(&data, Id3v2Version::V3, options).unwrap(),
			ParsedFrame::Eof
		);

		// Larger than what's left, even in strict mode
		let mut data = v3_frame(b"TIT2", 0, b"\x03Foo");
		data.truncate(12);
		assert_eq!(
			ParsedFrame::read(&data, Id3v2Version::V3, strict()).unwrap(),
			ParsedFrame::Eof
		);
	}

	#[test_log::test]
	fn bad_frame_id() {
		let data = v3_frame(b"Ti!2", 0, b"\x03Foo");

		assert_eq!(
			ParsedFrame::read(&data, Id3v2Version::V3, ParseOptions::new()).unwrap(),
			ParsedFrame::Skip { size: 14 }
		);

		let err = ParsedFrame::read(&data, Id3v2Version::V3, strict()).unwrap_err();
		assert!(matches!(
			err.kind(),
			ErrorKind::Id3v2(e) if matches!(e.kind(), Id3v2ErrorKind::BadFrameId(_))
		));
	}

	#[test_log::test]
	fn encrypted_frames_skipped() {
		let data = v3_frame(b"TIT2", 0x0004, b"\x80\x03Foo");

		assert_eq!(
			ParsedFrame::read(&data, Id3v2Version::V3, ParseOptions::new()).unwrap(),
			ParsedFrame::Skip { size: 15 }
		);

		let err = ParsedFrame::read(&data, Id3v2Version::V3, strict()).unwrap_err();
		assert!(matches!(
			err.kind(),
			ErrorKind::Id3v2(e) if matches!(e.kind(), Id3v2ErrorKind::UnsupportedFrameFeature(_))
		));
	}

	#[cfg(not(feature = "id3v2_compression_support"))]
	#[test_log::test]
	fn compressed_frames_skipped() {
		let data = v3_frame(b"TIT2", 0x0008, b"\x00\x00\x00\x04\x78\x9C");

		assert_eq!(
			ParsedFrame::read(&data, Id3v2Version::V3, ParseOptions::new()).unwrap(),
			ParsedFrame::Skip { size: 16 }
		);
	}

	#[cfg(feature = "id3v2_compression_support")]
	fn compressed(data_length: u32, content: &[u8]) -> Vec<u8> {
		use flate2::Compression;
		use flate2::write::ZlibEncoder;
		use std::io::Write;

		let mut encoder = ZlibEncoder::new(data_length.to_be_bytes().to_vec(), Compression::default());
		encoder.write_all(content).unwrap();
		encoder.finish().unwrap()
	}

	#[cfg(feature = "id3v2_compression_support")]
	#[test_log::test]
	fn compressed_frames_inflated() {
		let data = v3_frame(b"TIT2", 0x0008, &compressed(6, b"\x03Hello"));

		assert_eq!(
			ParsedFrame::read(&data, Id3v2Version::V4, ParseOptions::new()).unwrap(),
			ParsedFrame::Next {
				size: data.len(),
				frame: RawFrame::new("TIT2", b"\x03Hello".to_vec()),
			}
		);
	}

	#[cfg(feature = "id3v2_compression_support")]
	#[test_log::test]
	fn compressed_frames_ignore_data_length() {
		let title = b"\x03A title long enough to outgrow a small buffer, and then some more".repeat(4);

		// Zero, too small, and too large
		for data_length in [0, 2, 4096] {
			let data = v3_frame(b"TIT2", 0x0008, &compressed(data_length, &title));

			match ParsedFrame::read(&data, Id3v2Version::V3, ParseOptions::new()).unwrap() {
				ParsedFrame::Next { size, frame } => {
					assert_eq!(size, data.len());
					assert_eq!(frame.payload(), title.as_slice());
				},
				other => panic!("Expected a frame, got {other:?}"),
			}
		}
	}

	#[cfg(feature = "id3v2_compression_support")]
	#[test_log::test]
	fn corrupt_compressed_frame() {
		let data = v3_frame(b"TIT2", 0x0008, b"\x00\x00\x00\x06not zlib");

		let err = ParsedFrame::read(&data, Id3v2Version::V3, ParseOptions::new()).unwrap_err();
		assert!(matches!(
			err.kind(),
			ErrorKind::Id3v2(e) if matches!(e.kind(), Id3v2ErrorKind::Decompression(_))
		));
	}

	#[test_log::test]
	fn prefixes_removed() {
		// Group identifier + data length indicator
		let data = v3_frame(b"TIT2", 0x0041, b"\x01\x00\x00\x00\x04\x03Foo");

		match ParsedFrame::read(&data, Id3v2Version::V4, ParseOptions::new()).unwrap() {
			ParsedFrame::Next { size, frame } => {
				assert_eq!(size, 19);
				assert_eq!(frame.payload(), b"\x03Foo");
			},
			other => panic!("Expected a frame, got {other:?}"),
		}

		// ID3v2.3 frames use the same flag bits
		match ParsedFrame::read(&data, Id3v2Version::V3, ParseOptions::new()).unwrap() {
			ParsedFrame::Next { size, frame } => {
				assert_eq!(size, 19);
				assert_eq!(frame.payload(), b"\x03Foo");
			},
			other => panic!("Expected a frame, got {other:?}"),
		}

		// Nothing left after the prefix
		let data = v3_frame(b"TIT2", 0x0001, b"\x00\x00\x00\x04");
		assert_eq!(
			ParsedFrame::read(&data, Id3v2Version::V4, ParseOptions::new()).unwrap(),
			ParsedFrame::Skip { size: 14 }
		);
	}

	#[test_log::test]
	fn v4_frame_unsynchronisation() {
		let data = v3_frame(b"APIC", 0x0002, b"\x00\xFF\x00\xD8\xFF\x00\xE0");

		match ParsedFrame::read(&data, Id3v2Version::V4, ParseOptions::new()).unwrap() {
			ParsedFrame::Next { frame, .. } => {
				assert_eq!(frame.payload(), b"\x00\xFF\xD8\xFF\xE0");
			},
			other => panic!("Expected a frame, got {other:?}"),
		}

		// The flag means nothing in ID3v2.3
		match ParsedFrame::read(&data, Id3v2Version::V3, ParseOptions::new()).unwrap() {
			ParsedFrame::Next { frame, .. } => {
				assert_eq!(frame.payload(), b"\x00\xFF\x00\xD8\xFF\x00\xE0");
			},
			other => panic!("Expected a frame, got {other:?}"),
		}
	}

	#[test_log::test]
	fn read_all_keeps_order() {
		let mut data = v3_frame(b"TPE1", 0, b"\x00Artist");
		data.extend(v3_frame(b"Bad!", 0, b"\x00Skipped"));
		data.extend(v3_frame(b"TIT2", 0, b"\x00Title"));
		data.extend(v3_frame(b"TPE1", 0, b"\x00Second artist"));
		data.extend([0; 32]);

		let frames = read_all_frames(&data, Id3v2Version::V3, ParseOptions::new()).unwrap();
		assert_eq!(frames.len(), 3);

		let keys = frames.iter().map(RawFrame::key).collect::<Vec<_>>();
		assert_eq!(keys, ["TPE1", "TPE1", "TIT2"]);
	}

	#[test_log::test]
	fn oversized_frame_keeps_earlier_frames() {
		let mut data = v3_frame(b"TIT2", 0, b"\x00Title");
		data.extend(b"TALB\x7F\xFF\xFF\xFF\x00\x00\x00Album");

		let frames = read_all_frames(&data, Id3v2Version::V3, ParseOptions::new()).unwrap();
		assert_eq!(frames.len(), 1);
		assert!(frames.contains("TIT2"));
	}
}
