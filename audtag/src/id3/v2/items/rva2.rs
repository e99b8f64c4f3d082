use crate::tuple::{IntField, Tuple};
use crate::util::text::latin1_decode;

use byteorder::{BigEndian, ByteOrder};

/// The unit of an RVA2 volume adjustment, in dB
const ADJUSTMENT_UNIT: i32 = 512;

const CHANNEL_MASTER_VOLUME: u8 = 1;

/// Apply a `RVA2` frame, `identification(NUL) + channel blocks`
///
/// Each block is `channel(1) + adjustment(2) + peak_bits(1) + peak`. Only the master volume is
/// used, and the identification picks between the track and album fields.
pub(crate) fn associate_rva2(tuple: &mut Tuple, payload: &[u8]) {
	let Some(nul) = payload.iter().position(|b| *b == 0) else {
		log::warn!("RVA2 frame has no identification, skipping");
		return;
	};

	let identification = latin1_decode(&payload[..nul]);
	let (gain_field, peak_field) = if identification.eq_ignore_ascii_case("album") {
		(IntField::AlbumGain, IntField::AlbumPeak)
	} else if identification.eq_ignore_ascii_case("track") {
		(IntField::TrackGain, IntField::TrackPeak)
	} else {
		log::debug!("Ignoring RVA2 frame \"{identification}\"");
		return;
	};

	let mut blocks = &payload[nul + 1..];
	while let Some((block, rest)) = blocks.split_at_checked(4) {
		let channel = block[0];
		let adjustment = i32::from(BigEndian::read_i16(&block[1..3]));
		let peak_bits = block[3];

		let peak_len = usize::from(peak_bits).div_ceil(8);
		let Some((peak_bytes, rest)) = rest.split_at_checked(peak_len) else {
			log::warn!("RVA2 peak is truncated, stopping");
			break;
		};
		blocks = rest;

		if channel != CHANNEL_MASTER_VOLUME {
			log::trace!("Skipping RVA2 channel {channel}");
			continue;
		}

		let gain = match tuple.get_int(IntField::GainDivisor) {
			Some(divisor) => rescale(i64::from(adjustment), divisor, ADJUSTMENT_UNIT.into()),
			None => {
				tuple.set_int(IntField::GainDivisor, ADJUSTMENT_UNIT);
				adjustment
			},
		};
		tuple.set_int(gain_field, gain);

		if !(1..32).contains(&peak_bits) {
			continue;
		}

		let peak = peak_bytes
			.iter()
			.fold(0i64, |peak, byte| (peak << 8) | i64::from(*byte));
		let peak_unit = 1i64 << peak_bits;

		let peak = match tuple.get_int(IntField::PeakDivisor) {
			Some(divisor) => rescale(peak, divisor, peak_unit),
			None => match i32::try_from(peak_unit) {
				Ok(unit) => {
					tuple.set_int(IntField::PeakDivisor, unit);
					i32::try_from(peak).unwrap_or(i32::MAX)
				},
				Err(_) => {
					log::warn!("RVA2 peak is too wide to store, skipping");
					continue;
				},
			},
		};
		tuple.set_int(peak_field, peak);
	}
}

// Convert `value`, in units of 1/`unit`, to units of 1/`divisor`
fn rescale(value: i64, divisor: i32, unit: i64) -> i32 {
	let scaled = value * i64::from(divisor) / unit;
	scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
