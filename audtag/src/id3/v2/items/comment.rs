use super::split_encoding;
use crate::error::Result;
use crate::tuple::{StrField, Tuple};
use crate::util::text::{TextDecodeOptions, decode_text};

/// A decoded `COMM` or `USLT` frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Memo {
	pub(crate) language: [u8; 3],
	pub(crate) description: String,
	pub(crate) content: String,
}

/// Decode a memo frame, `encoding(1) + language(3) + description(NUL) + content`
///
/// Returns `None` if the frame is too short to hold a language.
pub(crate) fn decode_memo(payload: &[u8]) -> Result<Option<Memo>> {
	if payload.len() < 4 {
		log::warn!("Memo frame is too short, skipping");
		return Ok(None);
	}

	let (encoding, rest) = split_encoding(payload)?;
	let (language, rest) = rest.split_at(3);

	let description = decode_text(
		rest,
		TextDecodeOptions::new().encoding(encoding).terminated(true),
	)?;

	// A content without a BOM uses the byte order of the description
	let content = decode_text(
		&rest[description.bytes_read..],
		TextDecodeOptions::new()
			.encoding(encoding)
			.bom(description.bom),
	)?;

	Ok(Some(Memo {
		language: [language[0], language[1], language[2]],
		description: description.content,
		content: content.content,
	}))
}

/// Store the content of a memo frame, only if it has no description
///
/// Memos with a description are application specific (such as iTunes' `iTunNORM`).
pub(crate) fn associate_memo(tuple: &mut Tuple, field: StrField, payload: &[u8]) -> Result<()> {
	let Some(memo) = decode_memo(payload)? else {
		return Ok(());
	};

	if !memo.description.is_empty() {
		log::trace!("Ignoring memo with description \"{}\"", memo.description);
		return Ok(());
	}

	if !memo.content.is_empty() {
		tuple.set_str(field, memo.content);
	}

	Ok(())
}
