use super::split_encoding;
use crate::error::Result;
use crate::id3::v2::header::Id3v2Version;
use crate::macros::id3v2_err;
use crate::picture::{PICTURE_TYPE_FRONT_COVER, PICTURE_TYPE_OTHER, Picture};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text, latin1_decode};

/// Decode an `APIC` (or ID3v2.2 `PIC`) frame
///
/// APIC: `encoding(1) + MIME type(NUL) + picture type(1) + description(NUL) + data`
///
/// PIC: `encoding(1) + image format(3) + picture type(1) + description(NUL) + data`
pub(crate) fn decode_picture(payload: &[u8], version: Id3v2Version) -> Result<Picture> {
	let (encoding, rest) = split_encoding(payload)?;

	let (mime_type, rest) = if version == Id3v2Version::V2 {
		let Some((format, rest)) = rest.split_at_checked(3) else {
			id3v2_err!(BadFrameLength);
		};

		(latin1_decode(format), rest)
	} else {
		let mime_type = decode_text(
			rest,
			TextDecodeOptions::new()
				.encoding(TextEncoding::Latin1)
				.terminated(true),
		)?;

		(mime_type.content, &rest[mime_type.bytes_read..])
	};

	let Some((&pic_type, rest)) = rest.split_first() else {
		id3v2_err!(BadFrameLength);
	};

	let description = decode_text(
		rest,
		TextDecodeOptions::new().encoding(encoding).terminated(true),
	)?;

	Ok(Picture {
		pic_type,
		mime_type,
		description: description.content,
		data: rest[description.bytes_read..].to_vec(),
	})
}

/// Keeps the best cover found so far
///
/// A front cover beats an "other" picture, and the first picture of a type wins.
#[derive(Default)]
pub(crate) struct CoverSelector {
	best: Option<Picture>,
}

impl CoverSelector {
	pub(crate) fn offer(&mut self, picture: Picture) {
		if picture.pic_type != PICTURE_TYPE_FRONT_COVER && picture.pic_type != PICTURE_TYPE_OTHER {
			log::trace!("Ignoring picture of type {}", picture.pic_type);
			return;
		}

		let replace = match &self.best {
			None => true,
			Some(best) => !best.is_front_cover() && picture.is_front_cover(),
		};

		if replace {
			self.best = Some(picture);
		}
	}

	pub(crate) fn into_inner(self) -> Option<Picture> {
		self.best
	}
}

#[cfg(test)]
mod tests {
	use super::{CoverSelector, decode_picture};
	use crate::id3::v2::header::Id3v2Version;
	use crate::picture::Picture;

	#[test_log::test]
	fn apic() {
		let picture = decode_picture(
			b"\x00image/jpeg\x00\x03Cover\x00\xFF\xD8\xFF\xE0",
			Id3v2Version::V3,
		)
		.unwrap();

		assert_eq!(picture.mime_type, "image/jpeg");
		assert_eq!(picture.pic_type, 3);
		assert_eq!(picture.description, "Cover");
		assert_eq!(picture.data, b"\xFF\xD8\xFF\xE0");
	}

	#[test_log::test]
	fn pic() {
		let picture =
			decode_picture(b"\x00PNG\x00\x00\x89PNG", Id3v2Version::V2).unwrap();

		assert_eq!(picture.mime_type, "PNG");
		assert_eq!(picture.pic_type, 0);
		assert!(picture.description.is_empty());
		assert_eq!(picture.data, b"\x89PNG");

		assert!(decode_picture(b"\x00PN", Id3v2Version::V2).is_err());
	}

	fn picture(pic_type: u8, data: &[u8]) -> Picture {
		Picture {
			pic_type,
			data: data.to_vec(),
			..Picture::default()
		}
	}

	#[test_log::test]
	fn front_cover_preferred() {
		let mut selector = CoverSelector::default();
		selector.offer(picture(0, b"other"));
		selector.offer(picture(4, b"back cover"));
		selector.offer(picture(3, b"front"));
		selector.offer(picture(3, b"second front"));
		selector.offer(picture(0, b"second other"));

		assert_eq!(selector.into_inner(), Some(picture(3, b"front")));
	}
}
