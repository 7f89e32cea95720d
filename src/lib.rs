//! JSON decoding, encoding and structural comparison, with adaptively indexed
//! containers.
//!
//! The crate is built around [`JsonValue`], a closed enum over the JSON kinds
//! with the generic number type split into `Integer`, `Unsigned` and `Float`
//! so that exact values stay exact. Around it:
//!
//! - [`parse_json_slice`] / [`parse_json_str`] decode UTF-8 text with strict
//!   validation and a nesting limit,
//! - [`stringify`] / [`stringify_pretty`] and the probing [`encode_into`] /
//!   [`prettyprint_into`] encode values back out,
//! - [`json_equal`] compares trees structurally with a numeric tolerance,
//! - [`decode_file`] / [`dump_file`] read and write JSON files,
//! - [`JsonObject`] transparently builds a hash index for large, hot objects.
//!
//! # Example
//!
//! ```
//! use jitjson::{JsonValue, json_equal};
//!
//! let json = JsonValue::parse_str(r#"{"name": "pi", "value": 3.14159265}"#).unwrap();
//! assert_eq!(json.as_object().unwrap().get_string("name"), Some("pi"));
//!
//! let reencoded = JsonValue::parse_str(&json.stringify()).unwrap();
//! assert!(json_equal(&json, &reencoded, 1e-12));
//! ```

mod equal;
mod macros;
mod parse;
mod read;
mod stringify;
mod trace;
mod types;

pub use equal::json_equal;
pub use parse::{MAX_DECODE_NESTING_LEVELS, parse_json_slice, parse_json_str};
pub use read::{DecodeFileError, decode_file, decode_reader, dump_file, dump_writer};
pub use stringify::{encode_into, prettyprint_into, stringify, stringify_pretty};
pub use trace::{trace_kind, trace_max_size, trace_repr};
pub use types::{JIT_ACCESS_LIMIT, JIT_SIZE_LIMIT, JsonArray, JsonObject, JsonValue};
