// `vec![elem; size]` for sizes read from a file, see `util::alloc`
macro_rules! try_vec {
	($elem:expr; $size:expr) => {{ $crate::util::alloc::fallible_vec_from_element($elem, $size)? }};
}

// err!(Variant)           -> return Err(AudTagError::new(ErrorKind::Variant))
// err!(Variant("reason")) -> return Err(AudTagError::new(ErrorKind::Variant("reason")))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::AudTagError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($reason:literal)) => {
		return Err(crate::error::AudTagError::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
}

// id3v2_err!(Variant) or id3v2_err!(Variant(args..)), returning an `Id3v2Error`
macro_rules! id3v2_err {
	($variant:ident $(($($arg:expr),+))?) => {
		return Err(crate::error::Id3v2Error::new(
			crate::error::Id3v2ErrorKind::$variant $(($($arg),+))?,
		)
		.into())
	};
}

// decode_err!(TagType, "reason") builds an `AudTagError` from a `FileDecodingError`,
// decode_err!(@BAIL TagType, "reason") returns it
macro_rules! decode_err {
	($tag_ty:ident, $reason:literal) => {
		crate::error::AudTagError::from(crate::error::FileDecodingError::new(
			crate::tag_type::TagType::$tag_ty,
			$reason,
		))
	};
	(@BAIL $tag_ty:ident, $reason:literal) => {
		return Err(decode_err!($tag_ty, $reason))
	};
}

// Errors only surface in `ParsingMode::Strict`, the other modes take the `DEFAULT` branch
//
// parse_mode_choice!(
// 	parsing_mode,
// 	STRICT: expr,
// 	DEFAULT: expr
// )
macro_rules! parse_mode_choice {
	($parse_mode:ident, STRICT: $strict:expr, DEFAULT: $default:expr $(,)?) => {
		match $parse_mode {
			crate::config::ParsingMode::Strict => $strict,
			_ => $default,
		}
	};
}

pub(crate) use {decode_err, err, id3v2_err, parse_mode_choice, try_vec};
