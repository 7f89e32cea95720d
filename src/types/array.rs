//! JSON array type and utilities for accessing and converting its elements.

use super::{JsonObject, JsonValue};
use std::fmt::Debug;

/// A JSON array, backed by a `Vec<JsonValue>`.
///
/// Elements are owned; pushing a value moves it into the array. Positional
/// access via [`JsonArray::get`] is constant-time.
#[derive(Clone, Default, PartialEq)]
pub struct JsonArray(pub Vec<JsonValue>);

impl JsonArray {
	/// Append an element, taking ownership of it.
	pub fn push(&mut self, value: impl Into<JsonValue>) {
		self.0.push(value.into());
	}

	/// Number of elements.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Get a reference to the element at `index`, or `None` past the end.
	#[must_use]
	pub fn get(&self, index: usize) -> Option<&JsonValue> {
		self.0.get(index)
	}

	/// Iterate over the elements in order.
	pub fn iter(&self) -> impl Iterator<Item = &JsonValue> {
		self.0.iter()
	}

	/// Get a reference to the underlying `Vec<JsonValue>`.
	#[must_use]
	pub fn as_vec(&self) -> &Vec<JsonValue> {
		&self.0
	}

	/// Get the array at `index`, or `None` if missing or not an array.
	#[must_use]
	pub fn get_array(&self, index: usize) -> Option<&JsonArray> {
		match self.get(index)? {
			JsonValue::Array(array) => Some(array),
			_ => None,
		}
	}

	/// Get the object at `index`, or `None` if missing or not an object.
	#[must_use]
	pub fn get_object(&self, index: usize) -> Option<&JsonObject> {
		match self.get(index)? {
			JsonValue::Object(object) => Some(object),
			_ => None,
		}
	}

	/// Get the string at `index`, or `None` if missing or not a string.
	#[must_use]
	pub fn get_string(&self, index: usize) -> Option<&str> {
		match self.get(index)? {
			JsonValue::String(text) => Some(text),
			_ => None,
		}
	}

	/// Get the element at `index` as a signed integer, or `None` if missing or
	/// not losslessly convertible.
	#[must_use]
	pub fn get_integer(&self, index: usize) -> Option<i64> {
		self.get(index)?.to_i64()
	}

	/// Get the element at `index` as an unsigned integer, or `None` if missing
	/// or not losslessly convertible.
	#[must_use]
	pub fn get_unsigned(&self, index: usize) -> Option<u64> {
		self.get(index)?.to_u64()
	}

	/// Get the element at `index` as a double, or `None` if missing or not numeric.
	#[must_use]
	pub fn get_double(&self, index: usize) -> Option<f64> {
		self.get(index)?.to_f64()
	}

	/// Get the boolean at `index`, or `None` if missing or not a boolean.
	#[must_use]
	pub fn get_boolean(&self, index: usize) -> Option<bool> {
		match self.get(index)? {
			JsonValue::Boolean(value) => Some(*value),
			_ => None,
		}
	}
}

impl Debug for JsonArray {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.0)
	}
}

impl<T> From<Vec<T>> for JsonArray
where
	JsonValue: From<T>,
{
	fn from(input: Vec<T>) -> Self {
		JsonArray(Vec::from_iter(input.into_iter().map(JsonValue::from)))
	}
}

impl<T, const N: usize> From<&[T; N]> for JsonArray
where
	JsonValue: From<T>,
	T: Copy,
{
	fn from(input: &[T; N]) -> Self {
		JsonArray(Vec::from_iter(input.iter().map(|v| JsonValue::from(*v))))
	}
}
