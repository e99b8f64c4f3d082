//! Embedded cover art

/// The ID3v2 picture type of a front cover
pub const PICTURE_TYPE_FRONT_COVER: u8 = 3;
/// The ID3v2 picture type "other", which iTunes uses for covers
pub const PICTURE_TYPE_OTHER: u8 = 0;

/// A picture found in a tag
///
/// Only reads produce pictures, writes keep existing picture frames untouched.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Picture {
	/// The ID3v2 picture type
	pub pic_type: u8,
	/// The MIME type, or the three character image format of an ID3v2.2 `PIC` frame
	pub mime_type: String,
	/// The picture description
	pub description: String,
	/// The image data
	pub data: Vec<u8>,
}

impl Picture {
	/// Whether this picture is a front cover
	pub fn is_front_cover(&self) -> bool {
		self.pic_type == PICTURE_TYPE_FRONT_COVER
	}
}
