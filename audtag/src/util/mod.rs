pub(crate) mod alloc;
pub mod io;
pub(crate) mod text;

/// Parse the leading decimal integer of `text`, like C's `atoi`
///
/// Leading whitespace and an optional sign are accepted. Parsing stops at the first non-digit,
/// so `"7/12"` gives 7 and `"2004-05-01"` gives 2004. Text without leading digits gives 0.
pub(crate) fn leading_int(text: &str) -> i32 {
	let text = text.trim_start();

	let (negative, digits) = match text.as_bytes().first() {
		Some(b'-') => (true, &text[1..]),
		Some(b'+') => (false, &text[1..]),
		_ => (false, text),
	};

	let mut value: i64 = 0;
	for b in digits.bytes().take_while(u8::is_ascii_digit) {
		value = value * 10 + i64::from(b - b'0');
		if value > i64::from(i32::MAX) {
			value = i64::from(i32::MAX);
			break;
		}
	}

	let value = value as i32;
	if negative { -value } else { value }
}
