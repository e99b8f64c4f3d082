//! The metadata record filled by tag reads and consumed by tag writes

use crate::util::leading_int;

use std::collections::HashMap;

/// A textual field of a [`Tuple`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[allow(missing_docs)]
pub enum StrField {
	Title,
	Artist,
	Album,
	AlbumArtist,
	Comment,
	Genre,
	Composer,
	Copyright,
	Publisher,
	/// A free-form date, as opposed to [`IntField::Year`]
	Date,
	CatalogNum,
	Lyrics,
}

/// A numeric field of a [`Tuple`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IntField {
	/// The release year
	Year,
	/// The track number
	Track,
	/// The disc number
	Disc,
	/// The length of the audio, in milliseconds
	Length,
	/// The track gain, to be divided by [`IntField::GainDivisor`]
	TrackGain,
	/// The album gain, to be divided by [`IntField::GainDivisor`]
	AlbumGain,
	/// The track peak, to be divided by [`IntField::PeakDivisor`]
	TrackPeak,
	/// The album peak, to be divided by [`IntField::PeakDivisor`]
	AlbumPeak,
	/// The unit of the gain fields
	GainDivisor,
	/// The unit of the peak fields
	PeakDivisor,
}

/// Any field of a [`Tuple`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Field {
	/// A textual field
	Str(StrField),
	/// A numeric field
	Int(IntField),
}

impl From<StrField> for Field {
	fn from(input: StrField) -> Self {
		Self::Str(input)
	}
}

impl From<IntField> for Field {
	fn from(input: IntField) -> Self {
		Self::Int(input)
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Value {
	Str(String),
	Int(i32),
}

/// ReplayGain values as floating point numbers
///
/// See [`Tuple::replay_gain`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct ReplayGain {
	pub track_gain: f32,
	pub album_gain: f32,
	pub track_peak: f32,
	pub album_peak: f32,
}

/// A typed store of metadata fields
///
/// The caller owns the `Tuple`. Tag reads only ever set fields they found, and tag writes only
/// read from it.
///
/// # Examples
///
/// ```rust
/// use audtag::tuple::{IntField, StrField, Tuple};
///
/// let mut tuple = Tuple::new();
/// tuple.set_str(StrField::Title, "Foo title");
/// tuple.set_int(IntField::Track, 3);
///
/// assert_eq!(tuple.get_str(StrField::Title), Some("Foo title"));
/// assert_eq!(tuple.get_int(IntField::Track), Some(3));
/// assert!(!tuple.is_set(StrField::Artist));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tuple {
	values: HashMap<Field, Value>,
}

impl Tuple {
	/// Create an empty `Tuple`
	pub fn new() -> Self {
		Self::default()
	}

	/// Get a textual field
	pub fn get_str(&self, field: StrField) -> Option<&str> {
		match self.values.get(&Field::Str(field)) {
			Some(Value::Str(value)) => Some(value.as_str()),
			_ => None,
		}
	}

	/// Set a textual field, replacing any previous value
	pub fn set_str(&mut self, field: StrField, value: impl Into<String>) {
		self.values
			.insert(Field::Str(field), Value::Str(value.into()));
	}

	/// Get a numeric field
	pub fn get_int(&self, field: IntField) -> Option<i32> {
		match self.values.get(&Field::Int(field)) {
			Some(Value::Int(value)) => Some(*value),
			_ => None,
		}
	}

	/// Set a numeric field, replacing any previous value
	pub fn set_int(&mut self, field: IntField, value: i32) {
		self.values.insert(Field::Int(field), Value::Int(value));
	}

	/// Remove a field
	pub fn unset(&mut self, field: impl Into<Field>) {
		self.values.remove(&field.into());
	}

	/// Whether a field holds a value
	pub fn is_set(&self, field: impl Into<Field>) -> bool {
		self.values.contains_key(&field.into())
	}

	/// Whether no field holds a value
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Store a decimal gain or peak value
	///
	/// `text` is parsed as a decimal number (trailing units such as `" dB"` are ignored), then stored
	/// in `field` scaled by 1,000,000. `unit_field` is set to 1,000,000.
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::tuple::{IntField, Tuple};
	///
	/// let mut tuple = Tuple::new();
	/// tuple.set_gain(IntField::TrackGain, IntField::GainDivisor, "-6.5 dB");
	///
	/// assert_eq!(tuple.get_int(IntField::TrackGain), Some(-6_500_000));
	/// assert_eq!(tuple.get_int(IntField::GainDivisor), Some(1_000_000));
	/// ```
	pub fn set_gain(&mut self, field: IntField, unit_field: IntField, text: &str) {
		const UNIT: i32 = 1_000_000;

		let value = (leading_decimal(text) * f64::from(UNIT)).round();
		self.set_int(field, value.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32);
		self.set_int(unit_field, UNIT);
	}

	/// Get the ReplayGain values
	///
	/// A missing album value is filled in from the track value, and the other way around.
	/// Without a positive divisor, the gains (or peaks) are all zero.
	pub fn replay_gain(&self) -> ReplayGain {
		let mut gain = ReplayGain::default();

		if let Some(unit) = self.get_int(IntField::GainDivisor).filter(|unit| *unit > 0) {
			(gain.track_gain, gain.album_gain) =
				self.scaled_pair(IntField::TrackGain, IntField::AlbumGain, unit);
		}

		if let Some(unit) = self.get_int(IntField::PeakDivisor).filter(|unit| *unit > 0) {
			(gain.track_peak, gain.album_peak) =
				self.scaled_pair(IntField::TrackPeak, IntField::AlbumPeak, unit);
		}

		gain
	}

	fn scaled_pair(&self, track: IntField, album: IntField, unit: i32) -> (f32, f32) {
		let track = self.get_int(track).map(|v| v as f32 / unit as f32);
		let album = self.get_int(album).map(|v| v as f32 / unit as f32);

		match (track, album) {
			(Some(track), Some(album)) => (track, album),
			(Some(track), None) => (track, track),
			(None, Some(album)) => (album, album),
			(None, None) => (0.0, 0.0),
		}
	}
}

// Parses "[+-]digits[.digits]", stopping at the first character that doesn't fit
fn leading_decimal(text: &str) -> f64 {
	let text = text.trim_start();
	let bytes = text.as_bytes();

	let mut end = 0;
	if matches!(bytes.first(), Some(b'-' | b'+')) {
		end += 1;
	}

	while bytes.get(end).is_some_and(u8::is_ascii_digit) {
		end += 1;
	}

	let int_part = f64::from(leading_int(&text[..end]));
	if bytes.get(end) != Some(&b'.') {
		return int_part;
	}

	let frac_start = end + 1;
	let mut frac_end = frac_start;
	while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
		frac_end += 1;
	}

	let frac_digits = &text[frac_start..frac_end];
	if frac_digits.is_empty() {
		return int_part;
	}

	let fraction = frac_digits.parse::<f64>().unwrap_or(0.0) / 10f64.powi(frac_digits.len() as i32);

	// "-0.5" has an integer part of zero, so the sign has to come from the text
	if bytes.first() == Some(&b'-') {
		int_part - fraction
	} else {
		int_part + fraction
	}
}

#[cfg(test)]
mod tests {
	use super::{IntField, ReplayGain, StrField, Tuple, leading_decimal};

	#[test_log::test]
	fn set_and_unset() {
		let mut tuple = Tuple::new();
		assert!(tuple.is_empty());

		tuple.set_str(StrField::Artist, "Foo artist");
		tuple.set_int(IntField::Year, 1984);

		assert_eq!(tuple.get_str(StrField::Artist), Some("Foo artist"));
		assert_eq!(tuple.get_int(IntField::Year), Some(1984));
		assert!(tuple.is_set(IntField::Year));

		tuple.unset(StrField::Artist);
		assert!(!tuple.is_set(StrField::Artist));
		assert_eq!(tuple.get_str(StrField::Artist), None);
	}

	#[test_log::test]
	fn decimal_parsing() {
		assert_eq!(leading_decimal("-6.50 dB"), -6.5);
		assert_eq!(leading_decimal("+2.25"), 2.25);
		assert_eq!(leading_decimal("-0.5"), -0.5);
		assert_eq!(leading_decimal("0.988"), 0.988);
		assert_eq!(leading_decimal("3"), 3.0);
		assert_eq!(leading_decimal("junk"), 0.0);
	}

	#[test_log::test]
	fn set_gain_scales() {
		let mut tuple = Tuple::new();
		tuple.set_gain(IntField::AlbumPeak, IntField::PeakDivisor, "0.988");

		assert_eq!(tuple.get_int(IntField::AlbumPeak), Some(988_000));
		assert_eq!(tuple.get_int(IntField::PeakDivisor), Some(1_000_000));
	}

	#[test_log::test]
	fn replay_gain_fills_missing() {
		let mut tuple = Tuple::new();
		assert_eq!(tuple.replay_gain(), ReplayGain::default());

		tuple.set_gain(IntField::TrackGain, IntField::GainDivisor, "-3.5 dB");
		tuple.set_gain(IntField::AlbumPeak, IntField::PeakDivisor, "0.5");

		let gain = tuple.replay_gain();
		assert_eq!(gain.track_gain, -3.5);
		assert_eq!(gain.album_gain, -3.5);
		assert_eq!(gain.album_peak, 0.5);
		assert_eq!(gain.track_peak, 0.5);
	}
}
