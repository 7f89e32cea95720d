//! Convenience macros.

/// Fetch a value from nested JSON objects, one key per argument.
///
/// A variadic shorthand for [`JsonValue::dig`](crate::JsonValue::dig):
/// `json_fetch!(value, "a", "b")` returns `Some(&value)` only if every key
/// leads through an object.
///
/// # Example
/// ```
/// use jitjson::{JsonValue, json_fetch};
/// let json = JsonValue::parse_str(r#"{"a": {"b": 7}}"#).unwrap();
/// assert_eq!(json_fetch!(json, "a", "b"), Some(&JsonValue::Integer(7)));
/// assert_eq!(json_fetch!(json, "a", "x"), None);
/// ```
#[macro_export]
macro_rules! json_fetch {
	($value:expr $(, $key:expr)+ $(,)?) => {
		$value.dig(&[$($key),+])
	};
}
