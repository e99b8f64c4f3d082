#![no_main]

use std::io::Cursor;

use audtag::ape::ApeModule;
use audtag::config::ParseOptions;
use audtag::module::TagModule;
use audtag::tuple::Tuple;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
	let _ = ApeModule::read(&mut Cursor::new(data), &mut Tuple::new(), ParseOptions::new());
});
