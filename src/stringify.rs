//! Compact and pretty-printing JSON encoders.
//!
//! Both encoders share one emission path and never fail; the only variable is
//! where the bytes go. [`stringify`] and [`stringify_pretty`] allocate a
//! `String`, while [`encode_into`] and [`prettyprint_into`] follow a
//! `snprintf`-style probing contract: they write as much of the NUL-terminated
//! encoding as fits into the caller's buffer, always NUL-terminate a non-empty
//! buffer, and return the length of the complete encoding excluding the
//! terminator. A return value at or above the buffer size means the output was
//! truncated, and an empty buffer turns the call into a pure size probe.

use crate::types::JsonValue;

const FLOAT_SIGNIFICANT_DIGITS: usize = 21;

trait JsonSink {
	fn push_str(&mut self, text: &str);
	fn push_char(&mut self, c: char);
}

impl JsonSink for String {
	fn push_str(&mut self, text: &str) {
		String::push_str(self, text);
	}

	fn push_char(&mut self, c: char) {
		self.push(c);
	}
}

/// Writes into a fixed buffer, counting the complete encoding regardless of
/// how much of it fits. One byte is reserved for the NUL terminator.
struct CountingSink<'a> {
	buffer: &'a mut [u8],
	limit: usize,
	length: usize,
}

impl<'a> CountingSink<'a> {
	fn new(buffer: &'a mut [u8]) -> Self {
		let limit = buffer.len().saturating_sub(1);
		CountingSink {
			buffer,
			limit,
			length: 0,
		}
	}

	fn finish(self) -> usize {
		if !self.buffer.is_empty() {
			self.buffer[self.length.min(self.limit)] = 0;
		}
		self.length
	}
}

impl JsonSink for CountingSink<'_> {
	fn push_str(&mut self, text: &str) {
		for &byte in text.as_bytes() {
			if self.length < self.limit {
				self.buffer[self.length] = byte;
			}
			self.length += 1;
		}
	}

	fn push_char(&mut self, c: char) {
		let mut buf = [0u8; 4];
		self.push_str(c.encode_utf8(&mut buf));
	}
}

/// Serialize a `JsonValue` to a compact JSON string without unnecessary whitespace.
#[must_use]
pub fn stringify(json: &JsonValue) -> String {
	let mut out = String::new();
	write_value(json, &mut out);
	out
}

/// Serialize a `JsonValue` to a multi-line, pretty-printed JSON string.
///
/// The first line is not indented; every following line starts with
/// `left_margin` plus one `indentation` step per nesting level. The output
/// does not end with a newline. Empty containers render as `[]` and `{}`.
#[must_use]
pub fn stringify_pretty(json: &JsonValue, left_margin: usize, indentation: usize) -> String {
	let mut out = String::new();
	write_value_pretty(json, &mut out, left_margin, indentation);
	out
}

/// Write as much of the NUL-terminated compact encoding into `buffer` as fits
/// and return the length of the complete encoding, excluding the terminator.
///
/// Calling with an empty buffer computes the exact space requirement:
/// `encode_into(&value, &mut [])` equals `stringify(&value).len()`.
pub fn encode_into(json: &JsonValue, buffer: &mut [u8]) -> usize {
	let mut sink = CountingSink::new(buffer);
	write_value(json, &mut sink);
	sink.finish()
}

/// Like [`encode_into`] but pretty-printed; see [`stringify_pretty`] for the layout.
pub fn prettyprint_into(json: &JsonValue, buffer: &mut [u8], left_margin: usize, indentation: usize) -> usize {
	let mut sink = CountingSink::new(buffer);
	write_value_pretty(json, &mut sink, left_margin, indentation);
	sink.finish()
}

/// The compact encoding of a bare object, for its `Display` impl.
pub(crate) fn stringify_object(object: &crate::types::JsonObject) -> String {
	let mut out = String::new();
	write_object(object, &mut out);
	out
}

fn write_array(array: &crate::types::JsonArray, out: &mut impl JsonSink) {
	out.push_char('[');
	for (i, element) in array.iter().enumerate() {
		if i > 0 {
			out.push_char(',');
		}
		write_value(element, out);
	}
	out.push_char(']');
}

fn write_object(object: &crate::types::JsonObject, out: &mut impl JsonSink) {
	out.push_char('{');
	for (i, (key, value)) in object.iter().enumerate() {
		if i > 0 {
			out.push_char(',');
		}
		write_string(key, out);
		out.push_char(':');
		write_value(value, out);
	}
	out.push_char('}');
}

fn write_value(json: &JsonValue, out: &mut impl JsonSink) {
	match json {
		JsonValue::Array(array) => write_array(array, out),
		JsonValue::Object(object) => write_object(object, out),
		JsonValue::String(text) => write_string(text, out),
		JsonValue::Integer(value) => out.push_str(&value.to_string()),
		JsonValue::Unsigned(value) => out.push_str(&value.to_string()),
		JsonValue::Float(value) => out.push_str(&format_float(*value)),
		JsonValue::Boolean(value) => out.push_str(if *value { "true" } else { "false" }),
		JsonValue::Null => out.push_str("null"),
		JsonValue::Raw(encoding) => out.push_str(encoding),
	}
}

fn write_value_pretty(json: &JsonValue, out: &mut impl JsonSink, left_margin: usize, indentation: usize) {
	match json {
		JsonValue::Array(array) if !array.is_empty() => {
			let deeper = left_margin + indentation;
			out.push_char('[');
			for (i, element) in array.iter().enumerate() {
				if i > 0 {
					out.push_char(',');
				}
				out.push_char('\n');
				push_indent(out, deeper);
				write_value_pretty(element, out, deeper, indentation);
			}
			out.push_char('\n');
			push_indent(out, left_margin);
			out.push_char(']');
		}
		JsonValue::Object(object) if !object.is_empty() => {
			let deeper = left_margin + indentation;
			out.push_char('{');
			for (i, (key, value)) in object.iter().enumerate() {
				if i > 0 {
					out.push_char(',');
				}
				out.push_char('\n');
				push_indent(out, deeper);
				write_string(key, out);
				out.push_str(": ");
				write_value_pretty(value, out, deeper, indentation);
			}
			out.push_char('\n');
			push_indent(out, left_margin);
			out.push_char('}');
		}
		other => write_value(other, out),
	}
}

fn push_indent(out: &mut impl JsonSink, width: usize) {
	for _ in 0..width {
		out.push_char(' ');
	}
}

/// Quote and escape a string value. `\b \f \n \r \t`, backslash and quote use
/// their short escapes. Every other control character is written as `\u00XX`;
/// `char::is_control` covers exactly `U+0000..=U+001F`, `U+007F` and
/// `U+0080..=U+009F`. All other characters pass through as UTF-8.
fn write_string(text: &str, out: &mut impl JsonSink) {
	out.push_char('"');
	for c in text.chars() {
		match c {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			'\u{08}' => out.push_str("\\b"),
			'\u{0c}' => out.push_str("\\f"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
			c => out.push_char(c),
		}
	}
	out.push_char('"');
}

/// Render a float the way C's `%.21g` does, minus its locale sensitivity:
/// 21 significant digits, trailing zeros trimmed, positional notation while
/// the exponent lies in `[-4, 21)` and scientific notation outside.
///
/// 21 digits are more than the 17 needed to round-trip any binary64 value,
/// so `decode(encode(v))` restores the exact bit pattern.
fn format_float(value: f64) -> String {
	let formatted = format!("{:.*e}", FLOAT_SIGNIFICANT_DIGITS - 1, value);
	let Some((mantissa, exponent)) = formatted.split_once('e') else {
		return formatted;
	};
	let Ok(exponent) = exponent.parse::<i32>() else {
		return formatted;
	};
	let (sign, mantissa) = match mantissa.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", mantissa),
	};
	let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
	let digits = digits.trim_end_matches('0');
	if digits.is_empty() {
		return format!("{sign}0");
	}

	if (-4..FLOAT_SIGNIFICANT_DIGITS as i32).contains(&exponent) {
		if exponent >= 0 {
			let point = exponent as usize + 1;
			if digits.len() <= point {
				format!("{sign}{digits}{}", "0".repeat(point - digits.len()))
			} else {
				format!("{sign}{}.{}", &digits[..point], &digits[point..])
			}
		} else {
			format!("{sign}0.{}{}", "0".repeat((-exponent - 1) as usize), digits)
		}
	} else {
		let (leading, rest) = digits.split_at(1);
		if rest.is_empty() {
			format!("{sign}{leading}e{exponent:+03}")
		} else {
			format!("{sign}{leading}.{rest}e{exponent:+03}")
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parse::parse_json_str;
	use anyhow::Result;

	const CLASSIC_DOCUMENT: &str = r#"
{
  "string" : "\t\"¿xyzzy? \uD852\udf62",
  "truth" : true,
  "lie" : false,
  "nothing" : null,
  "year" : 2017,
  "months" : [ 1, 3, 5, 7, 8, 10, 12 ],
  "π" : 31415.9265e-4
}
"#;

	const CLASSIC_COMPACT: &str = r#"{"string":"\t\"¿xyzzy? 𤭢","truth":true,"lie":false,"nothing":null,"year":2017,"months":[1,3,5,7,8,10,12],"π":3.14159265000000020862}"#;

	#[test]
	fn test_classic_document_compact() -> Result<()> {
		let json = parse_json_str(CLASSIC_DOCUMENT)?;
		assert_eq!(stringify(&json), CLASSIC_COMPACT);
		Ok(())
	}

	#[test]
	fn test_classic_document_pretty() -> Result<()> {
		let expected = [
			"{",
			"    \"string\": \"\\t\\\"¿xyzzy? 𤭢\",",
			"    \"truth\": true,",
			"    \"lie\": false,",
			"    \"nothing\": null,",
			"    \"year\": 2017,",
			"    \"months\": [",
			"        1,",
			"        3,",
			"        5,",
			"        7,",
			"        8,",
			"        10,",
			"        12",
			"    ],",
			"    \"π\": 3.14159265000000020862",
			"}",
		]
		.join("\n");
		let json = parse_json_str(CLASSIC_DOCUMENT)?;
		assert_eq!(stringify_pretty(&json, 0, 4), expected);
		Ok(())
	}

	#[test]
	fn test_stringify_primitives() {
		assert_eq!(stringify(&JsonValue::Null), "null");
		assert_eq!(stringify(&JsonValue::Boolean(true)), "true");
		assert_eq!(stringify(&JsonValue::Boolean(false)), "false");
		assert_eq!(stringify(&JsonValue::Integer(-42)), "-42");
		assert_eq!(stringify(&JsonValue::Integer(i64::MIN)), "-9223372036854775808");
		assert_eq!(stringify(&JsonValue::Unsigned(u64::MAX)), "18446744073709551615");
		assert_eq!(stringify(&JsonValue::from("hello")), "\"hello\"");
	}

	#[test]
	fn test_stringify_containers() {
		assert_eq!(stringify(&JsonValue::new_array()), "[]");
		assert_eq!(stringify(&JsonValue::new_object()), "{}");
		assert_eq!(
			stringify(&JsonValue::from(vec![("key", JsonValue::from(vec![1, 2]))])),
			r#"{"key":[1,2]}"#
		);
	}

	#[test]
	fn test_string_escaping() {
		let escape = |text: &str| stringify(&JsonValue::from(text));

		assert_eq!(escape("Line1\nLine2\rTab\tBackslash\\"), r#""Line1\nLine2\rTab\tBackslash\\""#);
		assert_eq!(escape("quote\"backspace\u{8}formfeed\u{c}"), r#""quote\"backspace\bformfeed\f""#);
		// ASCII controls, DEL and the C1 range are written as \u00XX
		assert_eq!(escape("\u{1}\u{1f}"), r#""\u0001\u001f""#);
		assert_eq!(escape("\u{7f}"), r#""\u007f""#);
		assert_eq!(escape("\u{80}\u{9f}"), r#""\u0080\u009f""#);
		assert_eq!(escape("\u{0}"), r#""\u0000""#);
		// U+00A0 is no longer a control character
		assert_eq!(escape("\u{a0}"), "\"\u{a0}\"");
		// multi-byte UTF-8 passes through
		assert_eq!(escape("😊π𤭢"), "\"😊π𤭢\"");
	}

	#[test]
	fn test_raw_emitted_verbatim() {
		let mut object = crate::types::JsonObject::default();
		object.set("x", JsonValue::Raw("[ 1,2 , 3]".to_string()));
		assert_eq!(stringify(&JsonValue::Object(object)), r#"{"x":[ 1,2 , 3]}"#);
	}

	#[test]
	fn test_float_formatting() {
		let float = |v: f64| stringify(&JsonValue::Float(v));

		assert_eq!(float(0.0), "0");
		assert_eq!(float(2.0), "2");
		assert_eq!(float(-2.5), "-2.5");
		assert_eq!(float(0.1), "0.100000000000000005551");
		assert_eq!(float(3.14159265), "3.14159265000000020862");
		assert_eq!(float(1.8446744073709552e19), "18446744073709551616");
		assert_eq!(float(1e-5), "1e-05");
		assert_eq!(float(-1e-5), "-1e-05");
		assert_eq!(float(1e300), "1.0000000000000000525e+300");
		assert_eq!(float(0.0001), "0.000100000000000000004792");
	}

	#[test]
	fn test_float_round_trips_exactly() -> Result<()> {
		for value in [0.1, 1.0 / 3.0, 3.14159265, 1e-300, 123456.789e11, 5e-324, f64::MAX] {
			let encoded = format_float(value);
			let decoded: f64 = encoded.parse()?;
			assert_eq!(decoded.to_bits(), value.to_bits(), "round-tripping {value} via {encoded}");
		}
		Ok(())
	}

	#[test]
	fn test_size_probe_contract() -> Result<()> {
		let json = parse_json_str(CLASSIC_DOCUMENT)?;
		let size = encode_into(&json, &mut []);
		assert_eq!(size, CLASSIC_COMPACT.len());
		assert_eq!(size, stringify(&json).len());

		// a large enough buffer holds the whole encoding plus NUL
		let mut buffer = vec![0xffu8; size + 1];
		assert_eq!(encode_into(&json, &mut buffer), size);
		assert_eq!(&buffer[..size], CLASSIC_COMPACT.as_bytes());
		assert_eq!(buffer[size], 0);
		Ok(())
	}

	#[test]
	fn test_encode_truncation() {
		let json = JsonValue::from("hello world");
		let full = stringify(&json);
		assert_eq!(full.len(), 13);

		// truncated output is NUL-terminated, the return value is unchanged
		let mut buffer = [0xffu8; 6];
		assert_eq!(encode_into(&json, &mut buffer), 13);
		assert_eq!(&buffer, b"\"hell\0");

		// a single byte only holds the terminator
		let mut tiny = [0xffu8; 1];
		assert_eq!(encode_into(&json, &mut tiny), 13);
		assert_eq!(tiny, [0]);
	}

	#[test]
	fn test_prettyprint_probe_matches() -> Result<()> {
		let json = parse_json_str(CLASSIC_DOCUMENT)?;
		let pretty = stringify_pretty(&json, 3, 2);
		assert_eq!(prettyprint_into(&json, &mut [], 3, 2), pretty.len());

		let mut buffer = vec![0u8; pretty.len() + 1];
		assert_eq!(prettyprint_into(&json, &mut buffer, 3, 2), pretty.len());
		assert_eq!(&buffer[..pretty.len()], pretty.as_bytes());
		Ok(())
	}

	#[test]
	fn test_pretty_left_margin() -> Result<()> {
		let json = parse_json_str(r#"{"a":[1],"b":{}}"#)?;
		let expected = "{\n      \"a\": [\n        1\n      ],\n      \"b\": {}\n    }";
		assert_eq!(stringify_pretty(&json, 4, 2), expected);
		Ok(())
	}

	#[test]
	fn test_pretty_strips_to_compact() -> Result<()> {
		// removing the inserted layout whitespace outside strings restores the
		// compact encoding
		let json = parse_json_str(CLASSIC_DOCUMENT)?;
		let pretty = stringify_pretty(&json, 2, 4);

		let mut compact = String::new();
		let mut in_string = false;
		let mut escaped = false;
		for c in pretty.chars() {
			if in_string {
				compact.push(c);
				if escaped {
					escaped = false;
				} else if c == '\\' {
					escaped = true;
				} else if c == '"' {
					in_string = false;
				}
			} else if c == '"' {
				compact.push(c);
				in_string = true;
			} else if c == ':' {
				compact.push(c);
			} else if !c.is_whitespace() {
				compact.push(c);
			}
		}
		assert_eq!(compact, stringify(&json));
		Ok(())
	}

	#[test]
	fn test_compact_round_trip() -> Result<()> {
		for text in [
			"null",
			"[]",
			"{}",
			r#"[1,-2,9223372036854775808,"x",true,null]"#,
			r#"{"a":{"b":[{"c":null}]}}"#,
		] {
			assert_eq!(stringify(&parse_json_str(text)?), text);
		}
		Ok(())
	}
}
