//! Recursive structural equality with numeric tolerance.
//!
//! Containers, strings, booleans and null compare only across identical kinds;
//! numbers compare across all three representations. Two exact integers are
//! equal iff they denote the same mathematical integer, while any pair
//! involving a float promotes the other operand to `f64` and applies the
//! relative-tolerance rule. A `Raw` operand is parsed back to a value first;
//! if its encoding does not parse, the comparison is false.

use crate::parse::parse_json_slice;
use crate::types::{JIT_SIZE_LIMIT, JsonArray, JsonObject, JsonValue};

/// Return true if and only if `a` and `b` are recursively equal.
///
/// `tolerance` is the maximum magnitude of the relative difference under which
/// two floats still compare equal: `x == y || |x - y| / max(|x|, |y|) <
/// tolerance`. A tolerance of `0` recovers strict equality. Object fields
/// compare regardless of their order.
#[must_use]
pub fn json_equal(a: &JsonValue, b: &JsonValue, tolerance: f64) -> bool {
	if let JsonValue::Raw(encoding) = b {
		return match parse_json_slice(encoding.as_bytes()) {
			Ok(decoded) => json_equal(a, &decoded, tolerance),
			Err(_) => false,
		};
	}
	match a {
		JsonValue::Array(array) => matches!(b, JsonValue::Array(other) if equal_arrays(array, other, tolerance)),
		JsonValue::Object(object) => matches!(b, JsonValue::Object(other) if equal_objects(object, other, tolerance)),
		JsonValue::String(text) => matches!(b, JsonValue::String(other) if text == other),
		JsonValue::Integer(value) => equal_to_integer(*value, b, tolerance),
		JsonValue::Unsigned(value) => equal_to_unsigned(*value, b, tolerance),
		JsonValue::Float(value) => equal_to_float(*value, b, tolerance),
		JsonValue::Boolean(value) => matches!(b, JsonValue::Boolean(other) if value == other),
		JsonValue::Null => matches!(b, JsonValue::Null),
		JsonValue::Raw(_) => json_equal(b, a, tolerance),
	}
}

fn equal_arrays(a: &JsonArray, b: &JsonArray, tolerance: f64) -> bool {
	a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| json_equal(x, y, tolerance))
}

fn equal_objects(a: &JsonObject, b: &JsonObject, tolerance: f64) -> bool {
	if a.len() != b.len() {
		return false;
	}
	if b.len() >= JIT_SIZE_LIMIT {
		b.ensure_index();
	}
	a.iter().all(|(key, value)| match b.get(key) {
		Some(other) => json_equal(value, other, tolerance),
		None => false,
	})
}

fn equal_doubles(a: f64, b: f64, tolerance: f64) -> bool {
	a == b || (b - a).abs() / f64::max(a.abs(), b.abs()) < tolerance
}

fn equal_to_integer(n: i64, b: &JsonValue, tolerance: f64) -> bool {
	match b {
		JsonValue::Integer(other) => n == *other,
		JsonValue::Unsigned(other) => n >= 0 && n as u64 == *other,
		JsonValue::Float(other) => equal_doubles(n as f64, *other, tolerance),
		_ => false,
	}
}

fn equal_to_unsigned(n: u64, b: &JsonValue, tolerance: f64) -> bool {
	match b {
		JsonValue::Integer(other) => *other >= 0 && n == *other as u64,
		JsonValue::Unsigned(other) => n == *other,
		JsonValue::Float(other) => equal_doubles(n as f64, *other, tolerance),
		_ => false,
	}
}

fn equal_to_float(n: f64, b: &JsonValue, tolerance: f64) -> bool {
	match b {
		JsonValue::Integer(other) => equal_doubles(n, *other as f64, tolerance),
		JsonValue::Unsigned(other) => equal_doubles(n, *other as f64, tolerance),
		JsonValue::Float(other) => equal_doubles(n, *other, tolerance),
		_ => false,
	}
}
