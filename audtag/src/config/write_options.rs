use crate::id3::v2::Id3v2Version;

/// Options for writing tags
///
/// Each option only concerns some of the tag formats, the others ignore it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) id3v2_version: Id3v2Version,
	pub(crate) preferred_padding: Option<u32>,
	pub(crate) lossy_text_encoding: bool,
}

impl WriteOptions {
	/// Default ID3v2 version for newly created tags
	pub const DEFAULT_ID3V2_VERSION: Id3v2Version = Id3v2Version::V3;

	/// Same as [`WriteOptions::default`], usable in `const` contexts
	pub const fn new() -> Self {
		Self {
			id3v2_version: Self::DEFAULT_ID3V2_VERSION,
			preferred_padding: None,
			lossy_text_encoding: true,
		}
	}

	/// The ID3v2 version to use when a file has no ID3v2 tag yet
	///
	/// Existing tags are always rewritten in their own version.
	///
	/// NOTE: [`Id3v2Version::V2`] is read-only, and will make the write fail.
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::config::WriteOptions;
	/// use audtag::id3::v2::Id3v2Version;
	///
	/// let options = WriteOptions::new().id3v2_version(Id3v2Version::V4);
	/// ```
	pub fn id3v2_version(mut self, version: Id3v2Version) -> Self {
		self.id3v2_version = version;
		self
	}

	/// Zero bytes to append to a written ID3v2 tag
	///
	/// Padding lets later edits grow the tag without moving the audio. `0` disables it, which is
	/// the default. APE and ID3v1 tags are never padded.
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::config::WriteOptions;
	///
	/// // Leave some room so the next edit can happen in place
	/// let options = WriteOptions::new().preferred_padding(2048);
	///
	/// // ...Or I don't want padding under any circumstances!
	/// let options = WriteOptions::new().preferred_padding(0);
	/// ```
	pub fn preferred_padding(mut self, preferred_padding: u32) -> Self {
		self.preferred_padding = (preferred_padding > 0).then_some(preferred_padding);
		self
	}

	/// Whether to replace characters that can't be represented in a Latin-1 tag with `?`
	///
	/// This only affects formats limited to Latin-1, such as ID3v1. If disabled, such characters
	/// make the write fail.
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::config::WriteOptions;
	///
	/// let options = WriteOptions::new().lossy_text_encoding(false);
	/// ```
	pub fn lossy_text_encoding(mut self, lossy_text_encoding: bool) -> Self {
		self.lossy_text_encoding = lossy_text_encoding;
		self
	}
}

impl Default for WriteOptions {
	/// New ID3v2 tags are ID3v2.3, unpadded, and Latin-1 text is encoded lossily
	fn default() -> Self {
		Self::new()
	}
}
