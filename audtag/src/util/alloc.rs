//! Allocations sized by untrusted length fields

use crate::error::Result;
use crate::macros::err;

/// The largest single buffer audtag will allocate while reading or writing a tag
///
/// This matches the largest ID3v2 tag that will be read, anything bigger is a corrupt size field.
pub(crate) const ALLOCATION_LIMIT: usize = 16 * 1024 * 1024;

fn check_size(size: usize) -> Result<()> {
	if size > ALLOCATION_LIMIT {
		log::warn!("Refusing to allocate {size} bytes (limit: {ALLOCATION_LIMIT})");
		err!(TooMuchData);
	}

	Ok(())
}

/// Backs [`try_vec!`](crate::macros::try_vec), which should be used instead
pub(crate) fn fallible_vec_from_element<T>(element: T, len: usize) -> Result<Vec<T>>
where
	T: Clone,
{
	let mut v = Vec::try_with_capacity_bounded(len)?;
	v.resize(len, element);

	Ok(v)
}

/// `Vec::with_capacity`, checked against [`ALLOCATION_LIMIT`]
pub(crate) trait TryWithCapacity: Sized {
	fn try_with_capacity_bounded(capacity: usize) -> Result<Self>;
}

impl<T> TryWithCapacity for Vec<T> {
	fn try_with_capacity_bounded(capacity: usize) -> Result<Self> {
		check_size(capacity)?;

		let mut v = Vec::new();
		v.try_reserve_exact(capacity)?;

		Ok(v)
	}
}
