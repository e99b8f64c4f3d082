use super::RawFrame;
use crate::id3::v2::items::comment::decode_memo;

/// An ordered, multi-valued collection of [`RawFrame`]s
///
/// Frames are grouped by key. Keys keep the position of their first insertion, and frames within
/// a key keep their arrival order.
///
/// # Examples
///
/// ```rust
/// use audtag::id3::v2::{FrameDictionary, RawFrame};
///
/// let mut frames = FrameDictionary::new();
/// frames.insert(RawFrame::new("TPE1", b"\x00Foo artist".to_vec()));
/// frames.insert(RawFrame::new("TIT2", b"\x00Foo title".to_vec()));
/// frames.insert(RawFrame::new("TPE1", b"\x00Bar artist".to_vec()));
///
/// assert_eq!(frames.len(), 3);
/// assert_eq!(frames.get("TPE1").map(<[RawFrame]>::len), Some(2));
///
/// // Frames are visited key by key
/// let keys = frames.iter().map(RawFrame::key).collect::<Vec<_>>();
/// assert_eq!(keys, ["TPE1", "TPE1", "TIT2"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameDictionary {
	entries: Vec<(String, Vec<RawFrame>)>,
}

impl FrameDictionary {
	/// Create an empty `FrameDictionary`
	pub fn new() -> Self {
		Self::default()
	}

	/// The total number of frames
	pub fn len(&self) -> usize {
		self.entries.iter().map(|(_, frames)| frames.len()).sum()
	}

	/// Whether there are no frames
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn position(&self, key: &str) -> Option<usize> {
		self.entries.iter().position(|(k, _)| k == key)
	}

	/// Append a frame
	pub fn insert(&mut self, frame: RawFrame) {
		match self.position(frame.key()) {
			Some(pos) => self.entries[pos].1.push(frame),
			None => self
				.entries
				.push((frame.key().to_owned(), vec![frame])),
		}
	}

	/// Get all frames with `key`
	pub fn get(&self, key: &str) -> Option<&[RawFrame]> {
		self.entries
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, frames)| frames.as_slice())
	}

	/// Get all frames with `key`, mutably
	///
	/// NOTE: Changing the key of a frame through this will not move it.
	pub fn get_mut(&mut self, key: &str) -> Option<&mut Vec<RawFrame>> {
		self.entries
			.iter_mut()
			.find(|(k, _)| k == key)
			.map(|(_, frames)| frames)
	}

	/// Whether any frame has `key`
	pub fn contains(&self, key: &str) -> bool {
		self.position(key).is_some()
	}

	/// Remove all frames with `key`
	pub fn remove(&mut self, key: &str) -> Option<Vec<RawFrame>> {
		let pos = self.position(key)?;
		Some(self.entries.remove(pos).1)
	}

	/// Replace all frames with `key`
	///
	/// The key keeps its position if it exists, otherwise it is appended. An empty `frames`
	/// removes the key.
	pub fn replace(&mut self, key: &str, frames: Vec<RawFrame>) {
		if frames.is_empty() {
			self.remove(key);
			return;
		}

		match self.position(key) {
			Some(pos) => self.entries[pos].1 = frames,
			None => self.entries.push((key.to_owned(), frames)),
		}
	}

	/// Replace all frames with `key` with a single text frame, or remove them
	pub(crate) fn replace_text(&mut self, key: &str, text: Option<&str>) {
		match text {
			Some(text) => self.replace(key, vec![RawFrame::text(key, text)]),
			None => {
				self.remove(key);
			},
		}
	}

	/// Replace the memo frames with an empty description, or remove them
	///
	/// Memo frames with a description are left as they are.
	pub(crate) fn replace_memo(&mut self, key: &str, text: Option<&str>) {
		let frames = self.get(key).map(<[RawFrame]>::to_vec).unwrap_or_default();

		let mut replacement = text.map(|text| RawFrame::memo(key, text));
		let mut kept = Vec::with_capacity(frames.len() + 1);
		for frame in frames {
			if !has_empty_description(&frame) {
				kept.push(frame);
				continue;
			}

			// The new frame takes the place of the first frame it replaces
			if let Some(new_frame) = replacement.take() {
				kept.push(new_frame);
			}
		}

		kept.extend(replacement);
		self.replace(key, kept);
	}

	/// Iterate over all frames
	pub fn iter(&self) -> impl Iterator<Item = &RawFrame> {
		self.entries.iter().flat_map(|(_, frames)| frames)
	}
}

fn has_empty_description(frame: &RawFrame) -> bool {
	match decode_memo(frame.payload()) {
		Ok(Some(memo)) => memo.description.is_empty(),
		// Undecodable frames are left alone
		_ => false,
	}
}
