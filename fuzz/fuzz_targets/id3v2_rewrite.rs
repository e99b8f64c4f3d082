#![no_main]

use std::io::Cursor;

use audtag::config::{ParseOptions, WriteOptions};
use audtag::id3::v2::Id3v2Module;
use audtag::module::TagModule;
use audtag::tuple::Tuple;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
	let mut file = Cursor::new(data);
	let mut tuple = Tuple::new();
	if Id3v2Module::read(&mut file, &mut tuple, ParseOptions::new()).is_ok() {
		let _ = Id3v2Module::write(&mut file, &tuple, WriteOptions::new());
	}
});
