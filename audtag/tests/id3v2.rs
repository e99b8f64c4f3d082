#![allow(missing_docs)]

use audtag::config::{ParseOptions, ParsingMode, WriteOptions};
use audtag::id3::v2::{Id3v2Module, Id3v2Version, locate};
use audtag::module::TagModule;
use audtag::tuple::{IntField, StrField, Tuple};

use std::io::Cursor;

const AUDIO: &[u8] = b"\xFF\xFB\x90\x64 not really audio";

fn synchsafe(n: u32) -> [u8; 4] {
	[
		((n >> 21) & 0x7F) as u8,
		((n >> 14) & 0x7F) as u8,
		((n >> 7) & 0x7F) as u8,
		(n & 0x7F) as u8,
	]
}

fn frame(version: Id3v2Version, key: &[u8; 4], content: &[u8]) -> Vec<u8> {
	let size = content.len() as u32;

	let mut frame = key.to_vec();
	match version {
		Id3v2Version::V4 => frame.extend(synchsafe(size)),
		_ => frame.extend(size.to_be_bytes()),
	}
	frame.extend([0, 0]);
	frame.extend(content);
	frame
}

// A tag at the start of the file, padded up to `size`
fn tag(version: Id3v2Version, flags: u8, frames: &[Vec<u8>], size: u32) -> Vec<u8> {
	let mut data = frames.concat();
	assert!(data.len() <= size as usize);
	data.resize(size as usize, 0);

	let mut tag = b"ID3".to_vec();
	tag.extend([version.major(), 0, flags]);
	tag.extend(synchsafe(size));
	tag.extend(data);
	tag
}

fn file(version: Id3v2Version, frames: &[Vec<u8>]) -> Vec<u8> {
	let mut file = tag(version, 0, frames, 256);
	file.extend(AUDIO);
	file
}

fn read(file: Vec<u8>) -> Tuple {
	let mut tuple = Tuple::new();
	Id3v2Module::read(&mut Cursor::new(file), &mut tuple, ParseOptions::new()).unwrap();
	tuple
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
	haystack.windows(needle.len()).any(|w| w == needle)
}

#[test_log::test]
fn utf8_title() {
	let tit2 = frame(Id3v2Version::V3, b"TIT2", b"\x03Hello");
	let mut file = tag(Id3v2Version::V3, 0, &[tit2], 100);
	file.extend(AUDIO);

	assert_eq!(&file[6..10], &[0, 0, 0, 100]);

	let tuple = read(file);
	assert_eq!(tuple.get_str(StrField::Title), Some("Hello"));
}

#[test_log::test]
fn described_comments_ignored() {
	let file = file(
		Id3v2Version::V3,
		&[
			frame(Id3v2Version::V3, b"COMM", b"\x00engiTunNORM\x00 000001F4"),
			frame(Id3v2Version::V3, b"COMM", b"\x00eng\x00nice song"),
		],
	);

	let tuple = read(file);
	assert_eq!(tuple.get_str(StrField::Comment), Some("nice song"));
}

#[test_log::test]
fn new_track_frame() {
	let mut file = Cursor::new(file(
		Id3v2Version::V4,
		&[frame(Id3v2Version::V4, b"TIT2", b"\x00Foo title")],
	));

	let mut tuple = Tuple::new();
	Id3v2Module::read(&mut file, &mut tuple, ParseOptions::new()).unwrap();
	assert!(!tuple.is_set(IntField::Track));

	tuple.set_int(IntField::Track, 7);
	Id3v2Module::write(&mut file, &tuple, WriteOptions::new()).unwrap();

	let written = file.into_inner();
	assert!(contains(&written, b"TRCK"));

	let tuple = read(written);
	assert_eq!(tuple.get_int(IntField::Track), Some(7));
	assert_eq!(tuple.get_str(StrField::Title), Some("Foo title"));
}

#[test_log::test]
fn rva2_track_gain() {
	let file = file(
		Id3v2Version::V4,
		&[frame(Id3v2Version::V4, b"RVA2", b"track\x00\x01\xFF\x00\x00")],
	);

	let tuple = read(file);
	assert_eq!(tuple.replay_gain().track_gain, -0.5);
	assert!(!tuple.is_set(IntField::TrackPeak));
}

#[test_log::test]
fn unchanged_round_trip() {
	let priv_frame = frame(Id3v2Version::V4, b"PRIV", b"owner@example.com\x00\x01\x02\x03");
	let apic_frame = frame(
		Id3v2Version::V4,
		b"APIC",
		b"\x00image/jpeg\x00\x03Cover\x00\xFF\xD8\xFF\xE0",
	);
	let txxx_frame = frame(Id3v2Version::V4, b"TXXX", b"\x00MusicBrainz Album Id\x00abcd");

	let original = file(
		Id3v2Version::V4,
		&[
			frame(Id3v2Version::V4, b"TIT2", b"\x00Foo title"),
			frame(Id3v2Version::V4, b"TPE1", b"\x03Foo artist"),
			priv_frame.clone(),
			frame(Id3v2Version::V4, b"TRCK", b"\x003/12"),
			frame(Id3v2Version::V4, b"TDRC", b"\x002004"),
			apic_frame.clone(),
			frame(Id3v2Version::V4, b"TCON", b"\x00(17)"),
			txxx_frame.clone(),
			frame(Id3v2Version::V4, b"COMM", b"\x00eng\x00Foo comment"),
		],
	);

	let mut file = Cursor::new(original);

	let mut tuple = Tuple::new();
	let cover = Id3v2Module::read(&mut file, &mut tuple, ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(cover.mime_type, "image/jpeg");
	assert_eq!(cover.data, b"\xFF\xD8\xFF\xE0");

	Id3v2Module::write(&mut file, &tuple, WriteOptions::new()).unwrap();

	let written = file.into_inner();
	assert!(written.ends_with(AUDIO));
	// The version of an existing tag is kept
	assert_eq!(&written[..4], b"ID3\x04");

	// Unknown frames are carried over byte for byte
	assert!(contains(&written, &priv_frame));
	assert!(contains(&written, &apic_frame));
	assert!(contains(&written, &txxx_frame));

	assert_eq!(read(written), tuple);
}

#[test_log::test]
fn unset_fields_removed() {
	let mut file = Cursor::new(file(
		Id3v2Version::V3,
		&[
			frame(Id3v2Version::V3, b"TIT2", b"\x00Foo title"),
			frame(Id3v2Version::V3, b"TALB", b"\x00Foo album"),
		],
	));

	let mut tuple = Tuple::new();
	tuple.set_str(StrField::Title, "Bar title");
	Id3v2Module::write(&mut file, &tuple, WriteOptions::new()).unwrap();

	let written = file.into_inner();
	assert!(!contains(&written, b"TALB"));

	let read_back = read(written);
	assert_eq!(read_back.get_str(StrField::Title), Some("Bar title"));
	assert!(!read_back.is_set(StrField::Album));
}

#[test_log::test]
fn oversized_frame_stops_parsing() {
	let mut tpe1 = b"TPE1".to_vec();
	tpe1.extend(0x7FFF_FFFFu32.to_be_bytes());
	tpe1.extend([0, 0]);
	tpe1.extend(b"\x00Foo artist");

	let file = file(
		Id3v2Version::V3,
		&[frame(Id3v2Version::V3, b"TIT2", b"\x00Foo title"), tpe1],
	);

	let tuple = read(file);
	assert_eq!(tuple.get_str(StrField::Title), Some("Foo title"));
	assert!(!tuple.is_set(StrField::Artist));
}

#[test_log::test]
fn truncated_file() {
	let mut file = file(
		Id3v2Version::V3,
		&[frame(Id3v2Version::V3, b"TIT2", b"\x00Foo title")],
	);
	file.truncate(40);

	let tuple = read(file);
	assert_eq!(tuple.get_str(StrField::Title), Some("Foo title"));
}

#[test_log::test]
fn trailing_tag_moved_to_front() {
	let frames = [frame(Id3v2Version::V4, b"TIT2", b"\x00Foo title")];

	let mut trailing = tag(Id3v2Version::V4, 0x10, &frames, 64);
	let mut footer = trailing[..10].to_vec();
	footer[..3].copy_from_slice(b"3DI");
	trailing.extend(footer);

	let mut original = AUDIO.to_vec();
	original.extend(&trailing);

	let mut file = Cursor::new(original);
	let location = locate(&mut file, ParsingMode::Strict).unwrap();
	assert_eq!(location.offset, AUDIO.len() as u64);
	assert_eq!(location.footer_len, 10);

	let mut tuple = Tuple::new();
	Id3v2Module::read(&mut file, &mut tuple, ParseOptions::new()).unwrap();
	assert_eq!(tuple.get_str(StrField::Title), Some("Foo title"));

	Id3v2Module::write(&mut file, &tuple, WriteOptions::new()).unwrap();

	let written = file.into_inner();
	assert_eq!(&written[..3], b"ID3");
	assert!(written.ends_with(AUDIO));
	assert!(!contains(&written, b"3DI"));
	assert_eq!(read(written), tuple);
}

#[test_log::test]
fn padding() {
	let mut tuple = Tuple::new();
	tuple.set_str(StrField::Title, "Foo");

	let mut unpadded = Cursor::new(AUDIO.to_vec());
	Id3v2Module::write(&mut unpadded, &tuple, WriteOptions::new()).unwrap();

	let mut padded = Cursor::new(AUDIO.to_vec());
	Id3v2Module::write(
		&mut padded,
		&tuple,
		WriteOptions::new().preferred_padding(1024),
	)
	.unwrap();

	let (unpadded, padded) = (unpadded.into_inner(), padded.into_inner());
	assert_eq!(padded.len(), unpadded.len() + 1024);
	assert_eq!(read(padded), read(unpadded));
}

#[test_log::test]
fn new_v24_tag() {
	let mut tuple = Tuple::new();
	tuple.set_int(IntField::Year, 1999);

	let mut file = Cursor::new(AUDIO.to_vec());
	Id3v2Module::write(
		&mut file,
		&tuple,
		WriteOptions::new().id3v2_version(Id3v2Version::V4),
	)
	.unwrap();

	let written = file.into_inner();
	assert_eq!(&written[..4], b"ID3\x04");
	assert!(contains(&written, b"TDRC"));
	assert!(!contains(&written, b"TYER"));
	assert_eq!(read(written).get_int(IntField::Year), Some(1999));
}
