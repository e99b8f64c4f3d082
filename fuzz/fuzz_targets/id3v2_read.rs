#![no_main]

use std::io::Cursor;

use audtag::config::ParseOptions;
use audtag::id3::v2::Id3v2Module;
use audtag::module::TagModule;
use audtag::tuple::Tuple;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
	let _ = Id3v2Module::read(&mut Cursor::new(data), &mut Tuple::new(), ParseOptions::new());
});
