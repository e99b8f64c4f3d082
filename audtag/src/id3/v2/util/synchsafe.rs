//! Utilities for working with synchsafe integers and unsynchronized ID3v2 content
//!
//! ID3v2 avoids false MPEG frame syncs (`0xFF` followed by a byte with its top 3 bits set) in two ways:
//!
//! * Sizes are stored as synchsafe integers, where the most significant bit of every byte is zero.
//! * Tags or frames may be *unsynchronized*, where a `0x00` is inserted after every `0xFF`.

use crate::error::Result;
use crate::macros::err;

/// Undo unsynchronization by dropping every `0x00` that follows an `0xFF`
///
/// A trailing `0xFF` is kept as-is. The input is never modified, a new buffer is returned.
///
/// # Examples
///
/// ```rust
/// use audtag::id3::v2::util::synchsafe::unsynchronize;
///
/// // `0xFF 0xE0` would look like an MPEG sync, so it was stored as `0xFF 0x00 0xE0`
/// let stored = [0x01, 0xFF, 0x00, 0xE0, 0xFF];
/// assert_eq!(unsynchronize(&stored), [0x01, 0xFF, 0xE0, 0xFF]);
/// ```
pub fn unsynchronize(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len());

	let mut after_ff = false;
	for &byte in content {
		if after_ff && byte == 0 {
			after_ff = false;
			continue;
		}

		out.push(byte);
		after_ff = byte == 0xFF;
	}

	out
}

/// Conversion between plain integers and their synchsafe form (7 value bits per byte)
pub trait SynchsafeInteger: Sized {
	/// The next larger integer, see [`SynchsafeInteger::widening_synch`]
	type WideningType;

	/// Encode `self` as a synchsafe integer
	///
	/// # Errors
	///
	/// `self` needs more than 7 bits per byte of the type (28 bits for a `u32`)
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// # fn main() -> audtag::error::Result<()> {
	/// // A 257 byte tag
	/// assert_eq!(257_u32.synch()?.to_be_bytes(), [0x00, 0x00, 0x02, 0x01]);
	///
	/// // The largest ID3v2 tag size
	/// assert_eq!(0xFFF_FFFF_u32.synch()?, 0x7F7F_7F7F);
	/// assert!(0x1000_0000_u32.synch().is_err());
	/// # Ok(()) }
	/// ```
	fn synch(self) -> Result<Self>;

	/// Encode `self` as a synchsafe integer of the next larger type, which can't overflow
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// let synched = u8::MAX.widening_synch();
	/// assert_eq!(synched, 0x017F_u16);
	/// assert_eq!(synched.unsynch(), 255);
	/// ```
	fn widening_synch(self) -> Self::WideningType;

	/// Decode a synchsafe integer
	///
	/// The most significant bit of every byte is ignored.
	///
	/// # Examples
	///
	/// ```rust
	/// use audtag::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// // A tag size as found in an ID3v2 header
	/// let size = u32::from_be_bytes([0x00, 0x00, 0x02, 0x01]);
	/// assert_eq!(size.unsynch(), 257);
	/// ```
	fn unsynch(self) -> Self;
}

// Every byte of a synchsafe integer holds 7 bits of the value, least significant group first
macro_rules! impl_synchsafe {
	($($ty:ty => $widening_ty:ty),+ $(,)?) => {
		$(
			impl SynchsafeInteger for $ty {
				type WideningType = $widening_ty;

				fn synch(self) -> Result<Self> {
					const MAXIMUM_INTEGER: $ty = <$ty>::MAX >> size_of::<$ty>();

					if self > MAXIMUM_INTEGER {
						err!(TooMuchData);
					}

					let mut synched: $ty = 0;
					let mut rest = self;
					for byte in 0..size_of::<$ty>() {
						synched |= (rest & 0x7F) << (byte * 8);
						rest >>= 7;
					}

					Ok(synched)
				}

				fn widening_synch(self) -> Self::WideningType {
					let mut synched: $widening_ty = 0;
					let mut rest = <$widening_ty>::from(self);
					for byte in 0..size_of::<$widening_ty>() {
						synched |= (rest & 0x7F) << (byte * 8);
						rest >>= 7;
					}

					synched
				}

				fn unsynch(self) -> Self {
					let mut value: $ty = 0;
					for byte in 0..size_of::<$ty>() {
						value |= ((self >> (byte * 8)) & 0x7F) << (byte * 7);
					}

					value
				}
			}
		)+
	};
}

impl_synchsafe!(u8 => u16, u16 => u32, u32 => u64, u64 => u128);
