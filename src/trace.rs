//! Capped-size value rendering for trace lines.
//!
//! Meant for use with the `log` facade: `log::trace!("cfg={}",
//! trace_repr(&config))`. The rendering is the compact encoding truncated to a
//! process-wide size limit so that a huge document cannot blow up a trace
//! line. The limit is sticky for a single call: [`trace_max_size`] raises or
//! lowers it for the next [`trace_repr`], which resets it to the default.

use crate::stringify::encode_into;
use crate::types::JsonValue;
use std::sync::atomic::{AtomicUsize, Ordering};

const TRACE_DEFAULT_SIZE: usize = 2048;

static TRACE_MAX_SIZE: AtomicUsize = AtomicUsize::new(TRACE_DEFAULT_SIZE);

/// Set the size limit for the next [`trace_repr`] call, in bytes.
pub fn trace_max_size(size: usize) {
	TRACE_MAX_SIZE.store(size, Ordering::Relaxed);
}

/// Render the compact encoding of `json`, truncated to the current size limit
/// (2048 bytes unless [`trace_max_size`] was called first).
///
/// Truncation is byte-based; a multi-byte character cut at the boundary is
/// replaced with U+FFFD.
#[must_use]
pub fn trace_repr(json: &JsonValue) -> String {
	let max_size = TRACE_MAX_SIZE.swap(TRACE_DEFAULT_SIZE, Ordering::Relaxed);
	let size = encode_into(json, &mut []).min(max_size);
	let mut buffer = vec![0u8; size + 1];
	encode_into(json, &mut buffer);
	buffer.truncate(size);
	String::from_utf8_lossy(&buffer).into_owned()
}

/// The kind name of `json`, for trace lines.
#[must_use]
pub fn trace_kind(json: &JsonValue) -> &'static str {
	json.type_as_str()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parse_json_str;
	use anyhow::Result;

	// one test, not several: the size limit is process-wide state and the
	// test harness runs in parallel
	#[test]
	fn test_trace_repr() -> Result<()> {
		let json = parse_json_str(r#"{"key": [1, 2, 3]}"#)?;
		assert_eq!(trace_repr(&json), r#"{"key":[1,2,3]}"#);

		trace_max_size(7);
		assert_eq!(trace_repr(&json), r#"{"key":"#);

		// the limit snapped back to the default
		assert_eq!(trace_repr(&json), r#"{"key":[1,2,3]}"#);

		// truncation is byte-based; a severed multi-byte character is replaced
		trace_max_size(2);
		assert_eq!(trace_repr(&JsonValue::from("π")), "\"\u{fffd}");
		Ok(())
	}

	#[test]
	fn test_trace_kind() {
		assert_eq!(trace_kind(&JsonValue::Null), "null");
		assert_eq!(trace_kind(&JsonValue::Unsigned(1)), "unsigned");
		assert_eq!(trace_kind(&JsonValue::new_object()), "object");
		assert_eq!(trace_kind(&JsonValue::Raw("1".to_string())), "raw");
	}
}
