//! JSON value enum representing any valid JSON data and utilities for parsing, serializing, and converting.

use crate::json_equal;
use crate::parse::{parse_json_slice, parse_json_str};
use crate::stringify::{encode_into, prettyprint_into, stringify, stringify_pretty};
use crate::types::{JsonArray, JsonObject};
use anyhow::{Result, bail};

/// Represents any JSON data: arrays, objects, strings, numbers, booleans and null,
/// plus pre-encoded raw fragments.
///
/// The generic JSON number type is split three ways: `Integer` (signed 64-bit),
/// `Unsigned` (unsigned 64-bit) and `Float` (finite binary64). The decoder picks
/// the exact representation whenever the textual form denotes an integer that
/// fits; see [`crate::parse_json_slice`].
///
/// `Raw` embeds a caller-supplied, already-encoded JSON fragment. It is emitted
/// verbatim and never produced by decoding; its validity is the caller's
/// responsibility.
#[derive(Clone, Debug, PartialEq)]
pub enum JsonValue {
	Array(JsonArray),
	Object(JsonObject),
	String(String),
	Integer(i64),
	Unsigned(u64),
	Float(f64),
	Boolean(bool),
	Null,
	Raw(String),
}

impl JsonValue {
	/// Parse a JSON string into a `JsonValue`.
	///
	/// # Errors
	/// Returns an error if the JSON is invalid.
	pub fn parse_str(json: &str) -> Result<JsonValue> {
		parse_json_str(json)
	}

	/// Parse a byte slice containing JSON text into a `JsonValue`.
	///
	/// # Errors
	/// Returns an error if the JSON is invalid.
	pub fn parse_slice(json: &[u8]) -> Result<JsonValue> {
		parse_json_slice(json)
	}

	/// Return the JSON type as a lowercase string (`"array"`, `"object"`, etc.).
	#[must_use]
	pub fn type_as_str(&self) -> &'static str {
		use JsonValue::*;
		match self {
			Array(_) => "array",
			Object(_) => "object",
			String(_) => "string",
			Integer(_) => "integer",
			Unsigned(_) => "unsigned",
			Float(_) => "float",
			Boolean(_) => "boolean",
			Null => "null",
			Raw(_) => "raw",
		}
	}

	/// Serialize the `JsonValue` to a compact JSON string without unnecessary whitespace.
	#[must_use]
	pub fn stringify(&self) -> String {
		stringify(self)
	}

	/// Serialize the `JsonValue` to a multi-line, pretty-printed JSON string.
	///
	/// `left_margin` is the base indentation of the output; `indentation` is the
	/// per-level step. The first line is not indented and the output does not end
	/// with a newline.
	#[must_use]
	pub fn stringify_pretty(&self, left_margin: usize, indentation: usize) -> String {
		stringify_pretty(self, left_margin, indentation)
	}

	/// Write as much of the NUL-terminated compact encoding into `buffer` as fits
	/// and return the length of the complete encoding. See [`crate::encode_into`].
	pub fn encode_into(&self, buffer: &mut [u8]) -> usize {
		encode_into(self, buffer)
	}

	/// Like [`JsonValue::encode_into`] but pretty-printed. See [`crate::prettyprint_into`].
	pub fn prettyprint_into(&self, buffer: &mut [u8], left_margin: usize, indentation: usize) -> usize {
		prettyprint_into(self, buffer, left_margin, indentation)
	}

	/// Compare two values structurally, treating numbers of different
	/// representations as comparable. See [`crate::json_equal`].
	#[must_use]
	pub fn equals(&self, other: &JsonValue, tolerance: f64) -> bool {
		json_equal(self, other, tolerance)
	}

	/// Create a new empty JSON array value.
	#[must_use]
	pub fn new_array() -> JsonValue {
		JsonValue::Array(JsonArray::default())
	}

	/// Create a new empty JSON object value.
	#[must_use]
	pub fn new_object() -> JsonValue {
		JsonValue::Object(JsonObject::default())
	}

	/// Borrow the `JsonArray` if this value is an array.
	///
	/// # Errors
	/// Returns an error if not an array.
	pub fn as_array(&self) -> Result<&JsonArray> {
		if let JsonValue::Array(array) = self {
			Ok(array)
		} else {
			bail!("expected an array, found a {}", self.type_as_str())
		}
	}

	/// Consume the `JsonValue` and extract the `JsonArray` if it is an array.
	///
	/// # Errors
	/// Returns an error if not an array.
	pub fn into_array(self) -> Result<JsonArray> {
		if let JsonValue::Array(array) = self {
			Ok(array)
		} else {
			bail!("expected an array, found a {}", self.type_as_str())
		}
	}

	/// Borrow the `JsonObject` if this value is an object.
	///
	/// # Errors
	/// Returns an error if not an object.
	pub fn as_object(&self) -> Result<&JsonObject> {
		if let JsonValue::Object(object) = self {
			Ok(object)
		} else {
			bail!("expected an object, found a {}", self.type_as_str())
		}
	}

	/// Consume the `JsonValue` and extract the `JsonObject` if it is an object.
	///
	/// # Errors
	/// Returns an error if not an object.
	pub fn into_object(self) -> Result<JsonObject> {
		if let JsonValue::Object(object) = self {
			Ok(object)
		} else {
			bail!("expected an object, found a {}", self.type_as_str())
		}
	}

	/// Return a string slice if this value is a JSON string.
	///
	/// # Errors
	/// Returns an error if the value is not a JSON string.
	pub fn as_str(&self) -> Result<&str> {
		match self {
			JsonValue::String(text) => Ok(text),
			_ => bail!("expected a string, found a {}", self.type_as_str()),
		}
	}

	/// Return the string value as `String`, cloning if necessary.
	///
	/// # Errors
	/// Returns an error if the value is not a JSON string.
	pub fn as_string(&self) -> Result<String> {
		self.as_str().map(str::to_owned)
	}

	/// Return the signed integer value.
	///
	/// # Errors
	/// Returns an error if the value is not a JSON integer. Use
	/// [`JsonValue::to_i64`] for a lossless cast across numeric kinds.
	pub fn as_integer(&self) -> Result<i64> {
		if let JsonValue::Integer(value) = self {
			Ok(*value)
		} else {
			bail!("expected an integer, found a {}", self.type_as_str())
		}
	}

	/// Return the unsigned integer value.
	///
	/// # Errors
	/// Returns an error if the value is not a JSON unsigned integer.
	pub fn as_unsigned(&self) -> Result<u64> {
		if let JsonValue::Unsigned(value) = self {
			Ok(*value)
		} else {
			bail!("expected an unsigned integer, found a {}", self.type_as_str())
		}
	}

	/// Return the floating-point value.
	///
	/// # Errors
	/// Returns an error if the value is not a JSON float. Use
	/// [`JsonValue::to_f64`] for a cast across numeric kinds.
	pub fn as_float(&self) -> Result<f64> {
		if let JsonValue::Float(value) = self {
			Ok(*value)
		} else {
			bail!("expected a float, found a {}", self.type_as_str())
		}
	}

	/// Return the boolean value.
	///
	/// # Errors
	/// Returns an error if the value is not a JSON boolean.
	pub fn as_boolean(&self) -> Result<bool> {
		if let JsonValue::Boolean(value) = self {
			Ok(*value)
		} else {
			bail!("expected a boolean, found a {}", self.type_as_str())
		}
	}

	/// Return the pre-encoded fragment of a raw value.
	///
	/// # Errors
	/// Returns an error if the value is not a raw fragment.
	pub fn as_raw(&self) -> Result<&str> {
		if let JsonValue::Raw(encoding) = self {
			Ok(encoding)
		} else {
			bail!("expected a raw encoding, found a {}", self.type_as_str())
		}
	}

	/// Descend through nested objects, one key per step.
	///
	/// Returns `None` the first time a key is missing or a non-object is
	/// encountered. An empty key list returns the value itself.
	#[must_use]
	pub fn dig(&self, keys: &[&str]) -> Option<&JsonValue> {
		let mut current = self;
		for key in keys {
			match current {
				JsonValue::Object(object) => current = object.get(key)?,
				_ => return None,
			}
		}
		Some(current)
	}
}

impl From<&str> for JsonValue {
	fn from(input: &str) -> Self {
		JsonValue::String(input.to_string())
	}
}

impl From<&String> for JsonValue {
	fn from(input: &String) -> Self {
		JsonValue::String(input.to_string())
	}
}

/// Adopts the string buffer without copying.
impl From<String> for JsonValue {
	fn from(input: String) -> Self {
		JsonValue::String(input)
	}
}

impl From<bool> for JsonValue {
	fn from(input: bool) -> Self {
		JsonValue::Boolean(input)
	}
}

impl From<&JsonValue> for JsonValue {
	fn from(input: &JsonValue) -> Self {
		input.clone()
	}
}

impl<I> From<I> for JsonValue
where
	JsonArray: From<I>,
{
	fn from(input: I) -> Self {
		JsonValue::Array(input.into())
	}
}

impl From<JsonObject> for JsonValue {
	fn from(input: JsonObject) -> Self {
		JsonValue::Object(input)
	}
}
