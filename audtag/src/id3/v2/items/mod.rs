//! Decoders for the frames that map onto [`Tuple`](crate::tuple::Tuple) fields

pub(crate) mod comment;
pub(crate) mod picture;
pub(crate) mod rva2;
pub(crate) mod text;
pub(crate) mod txxx;

use crate::error::Result;
use crate::macros::id3v2_err;
use crate::util::text::TextEncoding;

/// Split the leading text encoding byte off of a frame
pub(crate) fn split_encoding(payload: &[u8]) -> Result<(TextEncoding, &[u8])> {
	let Some((&encoding_byte, rest)) = payload.split_first() else {
		id3v2_err!(BadFrameLength);
	};

	match TextEncoding::from_u8(encoding_byte) {
		Some(encoding) => Ok((encoding, rest)),
		None => id3v2_err!(InvalidTextEncoding(encoding_byte)),
	}
}
