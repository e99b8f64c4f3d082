#![allow(missing_docs)]

use audtag::config::{ParseOptions, WriteOptions};
use audtag::error::ErrorKind;
use audtag::id3::v2::Id3v2Module;
use audtag::module::TagModule;
use audtag::probe::Probe;
use audtag::tag_type::TagType;
use audtag::tuple::{IntField, StrField, Tuple};

use std::io::{Cursor, Read, Seek, Write};

const AUDIO: &[u8] = b"\xFF\xFB\x90\x64 not really audio";

fn id3v1_block(title: &[u8]) -> Vec<u8> {
	let mut block = vec![0; 128];
	block[..3].copy_from_slice(b"TAG");
	block[3..3 + title.len()].copy_from_slice(title);
	block[127] = 255;
	block
}

#[test_log::test]
fn id3v2_mismatch_falls_through() {
	let mut file = AUDIO.to_vec();
	file.extend(id3v1_block(b"Foo title"));

	let mut reader = Cursor::new(file);

	let err = Id3v2Module::read(&mut reader, &mut Tuple::new(), ParseOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::FormatMismatch));

	let mut probe = Probe::new(reader).guess_tag_type().unwrap();
	assert_eq!(probe.tag_type(), Some(TagType::Id3v1));

	let mut tuple = Tuple::new();
	probe.read(&mut tuple).unwrap();
	assert_eq!(tuple.get_str(StrField::Title), Some("Foo title"));
}

#[test_log::test]
fn probe_order() {
	let mut tuple = Tuple::new();
	tuple.set_str(StrField::Title, "APE title");

	// APE, followed by ID3v1
	let mut file = Cursor::new(AUDIO.to_vec());
	TagType::Ape
		.write(&mut file, &tuple, WriteOptions::new())
		.unwrap();
	let mut file = file.into_inner();
	file.extend(id3v1_block(b"ID3v1 title"));

	let probe = Probe::new(Cursor::new(file.clone())).guess_tag_type().unwrap();
	assert_eq!(probe.tag_type(), Some(TagType::Ape));

	// ID3v2 takes precedence over everything
	let mut file = Cursor::new(file);
	tuple.set_str(StrField::Title, "ID3v2 title");
	TagType::Id3v2
		.write(&mut file, &tuple, WriteOptions::new())
		.unwrap();

	let mut probe = Probe::new(file).guess_tag_type().unwrap();
	assert_eq!(probe.tag_type(), Some(TagType::Id3v2));

	let mut read_back = Tuple::new();
	probe.read(&mut read_back).unwrap();
	assert_eq!(read_back.get_str(StrField::Title), Some("ID3v2 title"));

	// The other tags are untouched
	let file = probe.into_inner().into_inner();
	assert!(file.ends_with(&id3v1_block(b"ID3v1 title")));
	assert!(file.windows(8).any(|w| w == b"APETAGEX"));
}

#[test_log::test]
fn v22_is_read_only() {
	let mut tag = b"ID3\x02\x00\x00\x00\x00\x00\x20".to_vec();
	tag.extend(b"TT2\x00\x00\x04\x00Foo");
	tag.resize(10 + 32, 0);
	tag.extend(AUDIO);

	let mut probe = Probe::new(Cursor::new(tag.clone()))
		.guess_tag_type()
		.unwrap();
	assert_eq!(probe.tag_type(), Some(TagType::Id3v22));

	let mut tuple = Tuple::new();
	probe.read(&mut tuple).unwrap();
	assert_eq!(tuple.get_str(StrField::Title), Some("Foo"));

	let err = probe.write(&tuple, WriteOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::UnsupportedTag));
	assert_eq!(probe.into_inner().into_inner(), tag);
}

#[test_log::test]
fn write_to_file_handle() {
	let mut temp_file = tempfile::tempfile().unwrap();
	temp_file.write_all(AUDIO).unwrap();
	temp_file.rewind().unwrap();

	let mut tuple = Tuple::new();
	tuple.set_str(StrField::Artist, "Foo artist");
	tuple.set_int(IntField::Year, 2010);

	audtag::write_to(&mut temp_file, &tuple, TagType::Id3v2, WriteOptions::new()).unwrap();

	temp_file.rewind().unwrap();
	let mut read_back = Tuple::new();
	audtag::read_from(&mut temp_file, &mut read_back).unwrap();
	assert_eq!(read_back, tuple);

	// Shrinking the tag must not leave stale bytes behind
	tuple.unset(StrField::Artist);
	temp_file.rewind().unwrap();
	audtag::write_to(&mut temp_file, &tuple, TagType::Id3v2, WriteOptions::new()).unwrap();

	temp_file.rewind().unwrap();
	let mut contents = Vec::new();
	temp_file.read_to_end(&mut contents).unwrap();
	assert!(contents.ends_with(AUDIO));

	let mut read_back = Tuple::new();
	audtag::read_from(&mut temp_file, &mut read_back).unwrap();
	assert_eq!(read_back, tuple);
}

#[test_log::test]
fn write_to_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("test.mp3");
	std::fs::write(&path, AUDIO).unwrap();

	let mut tuple = Tuple::new();
	tuple.set_str(StrField::Title, "Foo title");
	tuple.set_str(StrField::Genre, "Rock");

	audtag::write_to_path(&path, &tuple, TagType::Ape, WriteOptions::new()).unwrap();

	let mut read_back = Tuple::new();
	audtag::read_from_path(&path, &mut read_back).unwrap();
	assert_eq!(read_back, tuple);

	let contents = std::fs::read(&path).unwrap();
	assert!(contents.starts_with(AUDIO));

	// No temporary files left behind
	assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test_log::test]
fn write_to_missing_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("missing.mp3");

	let err = audtag::write_to_path(&path, &Tuple::new(), TagType::Id3v2, WriteOptions::new())
		.unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::Io(_)));
}
