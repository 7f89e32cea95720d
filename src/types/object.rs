//! JSON object type: ordered key/value pairs with an adaptive hash index.
//!
//! Fields are kept as an ordered sequence so that iteration and encoding
//! preserve insertion order. Key lookup is a linear scan until the object is
//! both large and hot: once at least [`JIT_SIZE_LIMIT`] fields have been
//! scanned often enough that the accumulated cost crosses
//! [`JIT_ACCESS_LIMIT`], a hash index from key to field position is built
//! behind the scenes and all further lookups go through it. The index is a
//! pure cache: it is discarded (and the cost counter reset) before any
//! mutation becomes visible, and its presence is unobservable except through
//! lookup speed and the duplicate-key tie-break below.
//!
//! Key uniqueness is the constructor's responsibility ([`JsonObject::set`]
//! replaces in place, but the decoder appends fields verbatim). If duplicate
//! keys exist, the linear scan returns the first match while the index, being
//! built front to back with later entries replacing earlier ones, returns the
//! last.

use super::{JsonArray, JsonValue};
use std::{
	cell::{Cell, RefCell},
	collections::HashMap,
	fmt::{Debug, Display},
};

/// Container size below which lookups stay linear and uncounted.
pub const JIT_SIZE_LIMIT: usize = 30;

/// Accumulated scan cost at which the hash index is built.
pub const JIT_ACCESS_LIMIT: u64 = 1000;

/// A JSON object: ordered key/value pairs with lazily indexed lookup.
pub struct JsonObject {
	entries: Vec<(String, JsonValue)>,
	access_counter: Cell<u64>,
	index: RefCell<Option<HashMap<String, usize>>>,
}

impl JsonObject {
	/// Create a new, empty `JsonObject`.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of fields, duplicates included.
	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Get a reference to the raw `JsonValue` for the specified key, if present.
	#[must_use]
	pub fn get(&self, key: &str) -> Option<&JsonValue> {
		{
			let index = self.index.borrow();
			if let Some(map) = index.as_ref() {
				return map.get(key).map(|&position| &self.entries[position].1);
			}
		}
		if self.entries.len() >= JIT_SIZE_LIMIT {
			for (name, value) in &self.entries {
				self.access_counter.set(self.access_counter.get() + 1);
				if self.access_counter.get() >= JIT_ACCESS_LIMIT {
					self.build_index();
					return self.get(key);
				}
				if name == key {
					return Some(value);
				}
			}
			None
		} else {
			self.entries.iter().find(|(name, _)| name == key).map(|(_, value)| value)
		}
	}

	/// Set the specified key to the given value, converting it into a `JsonValue`.
	///
	/// Replaces the value in place if the key already exists, keeping its
	/// position; appends otherwise.
	pub fn set(&mut self, key: &str, value: impl Into<JsonValue>) {
		self.clobber_index();
		if let Some(entry) = self.entries.iter_mut().find(|(name, _)| name == key) {
			entry.1 = value.into();
		} else {
			self.entries.push((key.to_string(), value.into()));
		}
	}

	/// Remove the specified field and return its value, or `None` if missing.
	///
	/// With duplicate keys, the first occurrence is removed.
	pub fn pop(&mut self, key: &str) -> Option<JsonValue> {
		self.clobber_index();
		let position = self.entries.iter().position(|(name, _)| name == key)?;
		Some(self.entries.remove(position).1)
	}

	/// Return an iterator over key-value pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
		self.entries.iter().map(|(name, value)| (name.as_str(), value))
	}

	/// Get the array under `key`, or `None` if missing or not an array.
	#[must_use]
	pub fn get_array(&self, key: &str) -> Option<&JsonArray> {
		match self.get(key)? {
			JsonValue::Array(array) => Some(array),
			_ => None,
		}
	}

	/// Get the object under `key`, or `None` if missing or not an object.
	#[must_use]
	pub fn get_object(&self, key: &str) -> Option<&JsonObject> {
		match self.get(key)? {
			JsonValue::Object(object) => Some(object),
			_ => None,
		}
	}

	/// Get the string under `key`, or `None` if missing or not a string.
	#[must_use]
	pub fn get_string(&self, key: &str) -> Option<&str> {
		match self.get(key)? {
			JsonValue::String(text) => Some(text),
			_ => None,
		}
	}

	/// Get the field under `key` as a signed integer, or `None` if missing or
	/// not losslessly convertible.
	#[must_use]
	pub fn get_integer(&self, key: &str) -> Option<i64> {
		self.get(key)?.to_i64()
	}

	/// Get the field under `key` as an unsigned integer, or `None` if missing
	/// or not losslessly convertible.
	#[must_use]
	pub fn get_unsigned(&self, key: &str) -> Option<u64> {
		self.get(key)?.to_u64()
	}

	/// Get the field under `key` as a double, or `None` if missing or not numeric.
	#[must_use]
	pub fn get_double(&self, key: &str) -> Option<f64> {
		self.get(key)?.to_f64()
	}

	/// Get the boolean under `key`, or `None` if missing or not a boolean.
	#[must_use]
	pub fn get_boolean(&self, key: &str) -> Option<bool> {
		match self.get(key)? {
			JsonValue::Boolean(value) => Some(*value),
			_ => None,
		}
	}

	/// Append a field without looking for an existing key.
	///
	/// Decoder-only entry point: decoded documents keep duplicate keys.
	pub(crate) fn append_entry(&mut self, key: String, value: JsonValue) {
		self.clobber_index();
		self.entries.push((key, value));
	}

	/// Build the index now if the object is large enough to ever qualify.
	pub(crate) fn ensure_index(&self) {
		if self.entries.len() >= JIT_SIZE_LIMIT && self.index.borrow().is_none() {
			self.build_index();
		}
	}

	fn build_index(&self) {
		let mut map = HashMap::with_capacity(self.entries.len());
		for (position, (name, _)) in self.entries.iter().enumerate() {
			// later duplicates replace earlier ones
			map.insert(name.clone(), position);
		}
		*self.index.borrow_mut() = Some(map);
	}

	fn clobber_index(&mut self) {
		self.index.get_mut().take();
		self.access_counter.set(0);
	}

	#[cfg(test)]
	pub(crate) fn is_indexed(&self) -> bool {
		self.index.borrow().is_some()
	}
}

impl Default for JsonObject {
	fn default() -> Self {
		JsonObject {
			entries: Vec::new(),
			access_counter: Cell::new(0),
			index: RefCell::new(None),
		}
	}
}

impl Clone for JsonObject {
	fn clone(&self) -> Self {
		// the index is a cache and stays behind
		JsonObject {
			entries: self.entries.clone(),
			access_counter: Cell::new(0),
			index: RefCell::new(None),
		}
	}
}

impl PartialEq for JsonObject {
	fn eq(&self, other: &Self) -> bool {
		self.entries == other.entries
	}
}

impl Debug for JsonObject {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl Display for JsonObject {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", crate::stringify::stringify_object(self))
	}
}

/// Convert a `Vec<(&str, T)>` into a `JsonValue::Object` by converting into a `JsonObject`.
impl<T> From<Vec<(&str, T)>> for JsonValue
where
	JsonValue: From<T>,
{
	fn from(input: Vec<(&str, T)>) -> Self {
		JsonValue::Object(JsonObject::from(input))
	}
}

/// Convert a `Vec<(&str, T)>` into a `JsonObject`, consuming the vector of key-value pairs.
impl<T> From<Vec<(&str, T)>> for JsonObject
where
	JsonValue: From<T>,
{
	fn from(input: Vec<(&str, T)>) -> Self {
		let mut object = JsonObject::default();
		for (key, value) in input {
			object.set(key, value);
		}
		object
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn big_object(fields: usize) -> JsonObject {
		let mut object = JsonObject::default();
		for i in 0..fields {
			object.set(&format!("key{i}"), i as u32);
		}
		object
	}

	#[test]
	fn test_set_and_get() {
		let mut obj = JsonObject::default();
		obj.set("key", "value");

		assert_eq!(obj.get("key"), Some(&JsonValue::from("value")));
		assert_eq!(obj.get("missing"), None);
	}

	#[test]
	fn test_set_replaces_in_place() {
		let mut obj = JsonObject::from(vec![("a", 1), ("b", 2), ("c", 3)]);
		obj.set("b", 20);

		let keys: Vec<&str> = obj.iter().map(|(k, _)| k).collect();
		assert_eq!(keys, vec!["a", "b", "c"]);
		assert_eq!(obj.get_integer("b"), Some(20));
	}

	#[test]
	fn test_pop() {
		let mut obj = JsonObject::from(vec![("a", 1), ("b", 2)]);

		assert_eq!(obj.pop("a"), Some(JsonValue::Integer(1)));
		assert_eq!(obj.pop("a"), None);
		assert_eq!(obj.len(), 1);
		assert_eq!(obj.get("b"), Some(&JsonValue::Integer(2)));
	}

	#[test]
	fn test_typed_getters() {
		let obj = JsonObject::from(vec![
			("int", JsonValue::Integer(-7)),
			("uns", JsonValue::Unsigned(7)),
			("flt", JsonValue::Float(0.5)),
			("txt", JsonValue::from("text")),
			("yes", JsonValue::Boolean(true)),
			("arr", JsonValue::new_array()),
			("obj", JsonValue::new_object()),
		]);

		assert_eq!(obj.get_integer("int"), Some(-7));
		assert_eq!(obj.get_unsigned("int"), None);
		assert_eq!(obj.get_unsigned("uns"), Some(7));
		assert_eq!(obj.get_double("flt"), Some(0.5));
		assert_eq!(obj.get_double("int"), Some(-7.0));
		assert_eq!(obj.get_string("txt"), Some("text"));
		assert_eq!(obj.get_boolean("yes"), Some(true));
		assert!(obj.get_array("arr").is_some());
		assert!(obj.get_object("obj").is_some());

		// wrong kind and missing key are both plain misses
		assert_eq!(obj.get_string("int"), None);
		assert_eq!(obj.get_boolean("nope"), None);
	}

	#[test]
	fn test_iter_preserves_insertion_order() {
		let obj = JsonObject::from(vec![("x", "y"), ("z", "w"), ("a", "b")]);
		let keys: Vec<&str> = obj.iter().map(|(k, _)| k).collect();
		assert_eq!(keys, vec!["x", "z", "a"]);
	}

	#[test]
	fn test_index_builds_after_hot_access() {
		let object = big_object(JIT_SIZE_LIMIT);
		assert!(!object.is_indexed());

		// every miss scans all 30 fields, so 34 misses cross the limit of 1000
		for _ in 0..34 {
			assert_eq!(object.get("absent"), None);
		}
		assert!(object.is_indexed());

		// results are unchanged once indexed
		assert_eq!(object.get_integer("key0"), Some(0));
		assert_eq!(object.get_integer("key29"), Some(29));
		assert_eq!(object.get("absent"), None);
	}

	#[test]
	fn test_small_objects_never_index() {
		let object = big_object(JIT_SIZE_LIMIT - 1);
		for _ in 0..10_000 {
			assert_eq!(object.get("absent"), None);
		}
		assert!(!object.is_indexed());
	}

	#[test]
	fn test_mutation_discards_index_and_counter() {
		let mut object = big_object(JIT_SIZE_LIMIT);
		for _ in 0..34 {
			object.get("absent");
		}
		assert!(object.is_indexed());

		object.set("one more", 1);
		assert!(!object.is_indexed());
		assert_eq!(object.access_counter.get(), 0);

		// the slow path is taken again until the counter crosses the limit anew
		for _ in 0..20 {
			object.get("absent");
		}
		assert!(!object.is_indexed());
		for _ in 0..20 {
			object.get("absent");
		}
		assert!(object.is_indexed());

		let mut object = big_object(JIT_SIZE_LIMIT);
		for _ in 0..34 {
			object.get("absent");
		}
		object.pop("key0");
		assert!(!object.is_indexed());
	}

	#[test]
	fn test_duplicate_key_tie_break() {
		// decoded documents may carry duplicate keys
		let mut object = big_object(JIT_SIZE_LIMIT);
		object.append_entry("key3".to_string(), JsonValue::from("shadow"));

		// linear scan: first occurrence wins
		assert_eq!(object.get_integer("key3"), Some(3));

		for _ in 0..40 {
			object.get("absent");
		}
		assert!(object.is_indexed());

		// indexed: the last-inserted duplicate wins
		assert_eq!(object.get_string("key3"), Some("shadow"));
	}

	#[test]
	fn test_clone_drops_index() {
		let object = big_object(JIT_SIZE_LIMIT);
		for _ in 0..34 {
			object.get("absent");
		}
		assert!(object.is_indexed());

		let copy = object.clone();
		assert!(!copy.is_indexed());
		assert_eq!(copy, object);
	}

	#[test]
	fn test_display_stringifies() {
		let obj = JsonObject::from(vec![("key", "value")]);
		assert_eq!(format!("{obj}"), r#"{"key":"value"}"#);
	}
}
