//! Numeric conversions between the three JSON number representations and Rust types.
//!
//! The generic JSON number type is split into `Integer` (i64), `Unsigned` (u64)
//! and `Float` (f64). The `to_*` casts move between them: any number casts to
//! `f64`, while casts to the integer types succeed only if no information is
//! lost. Float exactness is decided on the IEEE-754 bit pattern, not by
//! round-tripping through arithmetic.

use super::JsonValue;

const MANTISSA_BITS: u32 = 52;
const EXPONENT_BIAS: i32 = 1023;

/// Decompose a finite binary64 value into `(negative, magnitude)` if and only
/// if it denotes a mathematical integer whose magnitude fits in a `u64`.
fn float_decompose(value: f64) -> Option<(bool, u64)> {
	let bits = value.to_bits();
	let negative = bits >> 63 != 0;
	let exponent = ((bits >> MANTISSA_BITS) & 0x7ff) as i32;
	let fraction = bits & ((1u64 << MANTISSA_BITS) - 1);
	if exponent == 0x7ff {
		return None; // NaN or infinity
	}
	if exponent == 0 {
		// zero is exact, subnormal magnitudes are all below one
		return if fraction == 0 { Some((negative, 0)) } else { None };
	}
	let mantissa = (1u64 << MANTISSA_BITS) | fraction;
	let shift = exponent - EXPONENT_BIAS - MANTISSA_BITS as i32;
	if shift >= 0 {
		// mantissa has 53 significant bits; anything shifted past bit 63 overflows
		if shift > 63 - MANTISSA_BITS as i32 {
			return None;
		}
		Some((negative, mantissa << shift))
	} else {
		let down = shift.unsigned_abs();
		if down > 63 || mantissa & ((1u64 << down) - 1) != 0 {
			return None;
		}
		Some((negative, mantissa >> down))
	}
}

fn float_to_i64(value: f64) -> Option<i64> {
	let (negative, magnitude) = float_decompose(value)?;
	if negative {
		if magnitude > 1u64 << 63 {
			return None;
		}
		Some(magnitude.wrapping_neg() as i64)
	} else {
		if magnitude > i64::MAX as u64 {
			return None;
		}
		Some(magnitude as i64)
	}
}

fn float_to_u64(value: f64) -> Option<u64> {
	let (negative, magnitude) = float_decompose(value)?;
	if negative && magnitude != 0 {
		return None;
	}
	Some(magnitude)
}

impl JsonValue {
	/// Cast any numeric kind to a signed 64-bit integer, if no information is lost.
	///
	/// `Integer` always succeeds, `Unsigned` succeeds up to `i64::MAX`, and
	/// `Float` succeeds only when its bit pattern denotes an exact signed
	/// 64-bit integer. All other kinds return `None`.
	#[must_use]
	pub fn to_i64(&self) -> Option<i64> {
		match self {
			JsonValue::Integer(value) => Some(*value),
			JsonValue::Unsigned(value) => i64::try_from(*value).ok(),
			JsonValue::Float(value) => float_to_i64(*value),
			_ => None,
		}
	}

	/// Cast any numeric kind to an unsigned 64-bit integer, if no information is lost.
	#[must_use]
	pub fn to_u64(&self) -> Option<u64> {
		match self {
			JsonValue::Integer(value) => u64::try_from(*value).ok(),
			JsonValue::Unsigned(value) => Some(*value),
			JsonValue::Float(value) => float_to_u64(*value),
			_ => None,
		}
	}

	/// Cast any numeric kind to a double. Loss of magnitude or precision is accepted.
	#[must_use]
	pub fn to_f64(&self) -> Option<f64> {
		match self {
			JsonValue::Integer(value) => Some(*value as f64),
			JsonValue::Unsigned(value) => Some(*value as f64),
			JsonValue::Float(value) => Some(*value),
			_ => None,
		}
	}
}

impl From<f64> for JsonValue {
	fn from(input: f64) -> Self {
		debug_assert!(input.is_finite());
		JsonValue::Float(input)
	}
}

impl From<i32> for JsonValue {
	fn from(input: i32) -> Self {
		JsonValue::Integer(input as i64)
	}
}

impl From<i64> for JsonValue {
	fn from(input: i64) -> Self {
		JsonValue::Integer(input)
	}
}

impl From<u32> for JsonValue {
	fn from(input: u32) -> Self {
		JsonValue::Unsigned(input as u64)
	}
}

impl From<u64> for JsonValue {
	fn from(input: u64) -> Self {
		JsonValue::Unsigned(input)
	}
}
