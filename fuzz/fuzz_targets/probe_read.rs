#![no_main]

use std::io::Cursor;

use audtag::probe::Probe;
use audtag::tuple::Tuple;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
	if let Ok(mut probe) = Probe::new(Cursor::new(data)).guess_tag_type() {
		let _ = probe.read(&mut Tuple::new());
	}
});
