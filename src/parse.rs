//! Byte-level JSON decoder.
//!
//! Parses a byte slice into a [`JsonValue`] tree. The grammar follows RFC 8259
//! with strict UTF-8 validation (multi-byte sequences are checked from their
//! length prefix, overlong encodings fail) and full UTF-16 surrogate-pair
//! handling in `\uXXXX` escapes. Nesting is limited to
//! [`MAX_DECODE_NESTING_LEVELS`].
//!
//! Numbers are split three ways: a textual form that denotes an integer
//! exactly (including fractional/exponent spellings like `0.0001E4`) becomes
//! `Integer` or `Unsigned` if its magnitude fits 64 bits; everything else goes
//! through Rust's locale-independent float parser. NaN and infinity fail,
//! zeros and subnormals collapse to `Float(0.0)`.
//!
//! All errors report the byte position with a snippet of the surrounding
//! input; no partial value is ever returned.

use crate::types::{JsonArray, JsonObject, JsonValue};
use anyhow::{Context, Error, Result, anyhow};
use std::num::FpCategory;

/// The decoder refuses input nested deeper than this many containers.
pub const MAX_DECODE_NESTING_LEVELS: u32 = 200;

const ERROR_CONTEXT_BYTES: usize = 16;

/// A cursor over the input slice with support for peeking and error reporting.
pub(crate) struct ByteIterator<'a> {
	input: &'a [u8],
	position: usize,
}

impl<'a> ByteIterator<'a> {
	pub fn from_slice(input: &'a [u8]) -> Self {
		ByteIterator { input, position: 0 }
	}

	/// Peek at the current byte without consuming it.
	#[inline]
	pub fn peek(&self) -> Option<u8> {
		self.input.get(self.position).copied()
	}

	/// Step over the current byte.
	#[inline]
	pub fn advance(&mut self) {
		self.position += 1;
	}

	/// Consume and return the current byte.
	#[inline]
	pub fn consume(&mut self) -> Option<u8> {
		let byte = self.peek();
		if byte.is_some() {
			self.position += 1;
		}
		byte
	}

	/// Consume the current byte, failing at the end of the input.
	#[inline]
	pub fn expect_next_byte(&mut self) -> Result<u8> {
		self.consume().ok_or_else(|| self.format_error("unexpected end"))
	}

	/// Return the current byte without advancing, failing at the end of the input.
	#[inline]
	pub fn expect_peeked_byte(&self) -> Result<u8> {
		self.peek().ok_or_else(|| self.format_error("unexpected end"))
	}

	/// Skip the inter-token whitespace bytes: space, tab, CR and LF.
	pub fn skip_whitespace(&mut self) {
		while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek() {
			self.advance();
		}
	}

	/// Format an error message with the current byte position and a snippet of
	/// the most recently read input.
	#[must_use]
	pub fn format_error(&self, msg: &str) -> Error {
		let end = self.position.min(self.input.len());
		let start = end.saturating_sub(ERROR_CONTEXT_BYTES);
		let mut snippet = String::from_utf8_lossy(&self.input[start..end]).into_owned();
		if self.position >= self.input.len() {
			snippet.push_str("<EOF>");
		}
		anyhow!("{msg} at position {}: {snippet}", self.position)
	}
}

/// Parse a JSON string into a `JsonValue`.
///
/// # Errors
/// Returns an error if the JSON is invalid.
pub fn parse_json_str(json: &str) -> Result<JsonValue> {
	parse_json_slice(json.as_bytes()).with_context(|| format!("while parsing JSON '{json}'"))
}

/// Parse a byte slice containing a single JSON value into a `JsonValue`.
///
/// Only trailing whitespace is allowed after the value.
///
/// # Errors
/// Returns an error if the JSON is invalid.
pub fn parse_json_slice(json: &[u8]) -> Result<JsonValue> {
	let mut iter = ByteIterator::from_slice(json);
	let value = parse_value(&mut iter, MAX_DECODE_NESTING_LEVELS)?;
	iter.skip_whitespace();
	if iter.peek().is_some() {
		return Err(iter.format_error("trailing characters after JSON value"));
	}
	Ok(value)
}

fn parse_value(iter: &mut ByteIterator, levels: u32) -> Result<JsonValue> {
	if levels == 0 {
		return Err(iter.format_error("too many nesting levels"));
	}
	iter.skip_whitespace();
	match iter.expect_peeked_byte()? {
		b'[' => parse_array(iter, levels),
		b'{' => parse_object(iter, levels),
		b'"' => parse_quoted_json_string(iter).map(JsonValue::String),
		b'-' | b'0'..=b'9' => parse_number(iter),
		b't' => parse_tag(iter, "true").map(|()| JsonValue::Boolean(true)),
		b'f' => parse_tag(iter, "false").map(|()| JsonValue::Boolean(false)),
		b'n' => parse_tag(iter, "null").map(|()| JsonValue::Null),
		c => Err(iter.format_error(&format!("unexpected character '{}'", c as char))),
	}
}

fn parse_tag(iter: &mut ByteIterator, tag: &str) -> Result<()> {
	for c in tag.bytes() {
		if iter.expect_next_byte()? != c {
			return Err(iter.format_error(&format!("unexpected character while parsing tag '{tag}'")));
		}
	}
	Ok(())
}

fn parse_array(iter: &mut ByteIterator, levels: u32) -> Result<JsonValue> {
	iter.advance(); // '['

	let mut array = JsonArray::default();
	iter.skip_whitespace();
	if let Some(b']') = iter.peek() {
		iter.advance();
		return Ok(JsonValue::Array(array));
	}

	array.push(parse_value(iter, levels - 1)?);
	loop {
		iter.skip_whitespace();
		match iter.expect_next_byte()? {
			b']' => break,
			b',' => array.push(parse_value(iter, levels - 1)?),
			_ => return Err(iter.format_error("parsing array, expected ',' or ']'")),
		}
	}
	Ok(JsonValue::Array(array))
}

fn parse_object(iter: &mut ByteIterator, levels: u32) -> Result<JsonValue> {
	iter.advance(); // '{'

	let mut object = JsonObject::default();
	loop {
		iter.skip_whitespace();
		match iter.expect_peeked_byte()? {
			b'}' => {
				iter.advance();
				break;
			}
			b'"' => {
				let key = parse_quoted_json_string(iter)?;

				iter.skip_whitespace();
				if iter.expect_next_byte()? != b':' {
					return Err(iter.format_error("expected ':'"));
				}

				// decoded documents keep duplicate keys verbatim
				object.append_entry(key, parse_value(iter, levels - 1)?);

				iter.skip_whitespace();
				match iter.expect_next_byte()? {
					b',' => {
						iter.skip_whitespace();
						if iter.expect_peeked_byte()? != b'"' {
							return Err(iter.format_error("parsing object, expected '\"'"));
						}
					}
					b'}' => break,
					_ => return Err(iter.format_error("expected ',' or '}'")),
				}
			}
			_ => return Err(iter.format_error("parsing object, expected '\"' or '}'")),
		}
	}
	Ok(JsonValue::Object(object))
}

pub(crate) fn parse_quoted_json_string(iter: &mut ByteIterator) -> Result<String> {
	iter.skip_whitespace();
	if iter.expect_next_byte()? != b'"' {
		return Err(iter.format_error("expected '\"' while parsing a string"));
	}

	let mut text = String::with_capacity(32);
	loop {
		match iter.expect_next_byte()? {
			b'"' => break,
			b'\\' => match iter.expect_next_byte()? {
				b'"' => text.push('"'),
				b'\\' => text.push('\\'),
				b'/' => text.push('/'),
				b'b' => text.push('\u{08}'),
				b'f' => text.push('\u{0C}'),
				b'n' => text.push('\n'),
				b'r' => text.push('\r'),
				b't' => text.push('\t'),
				b'u' => text.push(parse_utf16_escape(iter)?),
				_ => return Err(iter.format_error("invalid escape sequence")),
			},
			c if c < 0x80 => text.push(c as char),
			c => push_utf8_sequence(iter, c, &mut text)?,
		}
	}
	Ok(text)
}

/// Read the continuation bytes of a multi-byte UTF-8 sequence and append the
/// validated sequence. The expected length comes from the leading byte;
/// `std::str::from_utf8` rejects bad continuations, overlong encodings and
/// encoded surrogates.
fn push_utf8_sequence(iter: &mut ByteIterator, lead: u8, text: &mut String) -> Result<()> {
	let length = if lead & 0xe0 == 0xc0 {
		2
	} else if lead & 0xf0 == 0xe0 {
		3
	} else if lead & 0xf8 == 0xf0 {
		4
	} else {
		return Err(iter.format_error("invalid UTF-8 leading byte"));
	};
	let mut sequence = [lead, 0, 0, 0];
	for slot in sequence.iter_mut().take(length).skip(1) {
		*slot = iter.expect_next_byte()?;
	}
	match std::str::from_utf8(&sequence[..length]) {
		Ok(s) => {
			text.push_str(s);
			Ok(())
		}
		Err(_) => Err(iter.format_error("invalid UTF-8 sequence")),
	}
}

fn parse_hex4(iter: &mut ByteIterator) -> Result<u16> {
	let mut value: u16 = 0;
	for _ in 0..4 {
		let digit = match iter.expect_next_byte()? {
			b @ b'0'..=b'9' => b - b'0',
			b @ b'a'..=b'f' => b - b'a' + 10,
			b @ b'A'..=b'F' => b - b'A' + 10,
			_ => return Err(iter.format_error("invalid unicode escape digit")),
		};
		value = value << 4 | digit as u16;
	}
	Ok(value)
}

/// Scan the hex digits of a `\uXXXX` escape, pairing surrogates.
///
/// A high surrogate must be directly followed by an escaped low surrogate;
/// the pair combines into a code point in `0x10000..=0x10FFFF`. Lone
/// surrogates of either kind fail.
fn parse_utf16_escape(iter: &mut ByteIterator) -> Result<char> {
	let unit = parse_hex4(iter)?;
	if (0xdc00..=0xdfff).contains(&unit) {
		return Err(iter.format_error("lone low surrogate"));
	}
	if (0xd800..=0xdbff).contains(&unit) {
		if iter.expect_next_byte()? != b'\\' || iter.expect_next_byte()? != b'u' {
			return Err(iter.format_error("high surrogate not followed by '\\u'"));
		}
		let low = parse_hex4(iter)?;
		if !(0xdc00..=0xdfff).contains(&low) {
			return Err(iter.format_error("high surrogate not followed by a low surrogate"));
		}
		let code_point = 0x10000 + ((unit as u32 - 0xd800) << 10 | (low as u32 - 0xdc00));
		return char::from_u32(code_point).ok_or_else(|| iter.format_error("invalid unicode code point"));
	}
	char::from_u32(unit as u32).ok_or_else(|| iter.format_error("invalid unicode code point"))
}

/// Append the decimal digits at the cursor to `digits`. Returns false if there
/// was none.
fn parse_digits(iter: &mut ByteIterator, digits: &mut String) -> bool {
	let start = digits.len();
	while let Some(byte @ b'0'..=b'9') = iter.peek() {
		digits.push(byte as char);
		iter.advance();
	}
	digits.len() > start
}

fn parse_number(iter: &mut ByteIterator) -> Result<JsonValue> {
	let negative = matches!(iter.peek(), Some(b'-'));
	if negative {
		iter.advance();
	}

	let mut integral = String::with_capacity(20);
	if !parse_digits(iter, &mut integral) {
		return Err(iter.format_error("expected digits in number"));
	}

	let mut fraction = String::new();
	let mut has_fraction = false;
	if let Some(b'.') = iter.peek() {
		iter.advance();
		has_fraction = true;
		if !parse_digits(iter, &mut fraction) {
			return Err(iter.format_error("expected digits after decimal point"));
		}
	}

	let mut exponent = String::new();
	let mut has_exponent = false;
	let mut exponent_negative = false;
	if let Some(b'e' | b'E') = iter.peek() {
		iter.advance();
		has_exponent = true;
		match iter.peek() {
			Some(b'+') => iter.advance(),
			Some(b'-') => {
				exponent_negative = true;
				iter.advance();
			}
			_ => {}
		}
		if !parse_digits(iter, &mut exponent) {
			return Err(iter.format_error("expected digits after exponent"));
		}
	}

	let magnitude = if has_fraction || has_exponent {
		exact_decimal_magnitude(&integral, &fraction, &exponent, exponent_negative)
	} else {
		accumulate_u64(integral.as_bytes())
	};
	if let Some(magnitude) = magnitude {
		return Ok(classify_integer(magnitude, negative));
	}

	// rebuild the lexical span for the float fallback
	let mut span = String::with_capacity(integral.len() + fraction.len() + exponent.len() + 3);
	if negative {
		span.push('-');
	}
	span.push_str(&integral);
	if has_fraction {
		span.push('.');
		span.push_str(&fraction);
	}
	if has_exponent {
		span.push('e');
		if exponent_negative {
			span.push('-');
		}
		span.push_str(&exponent);
	}
	parse_float(iter, &span)
}

fn accumulate_u64(digits: &[u8]) -> Option<u64> {
	let mut value: u64 = 0;
	for byte in digits {
		value = value.checked_mul(10)?.checked_add((byte - b'0') as u64)?;
	}
	Some(value)
}

/// Shift the decimal point out of the digit string and return the magnitude if
/// the number denotes an integer that fits 64 bits. The shift stays in the
/// decimal domain, so `922337203685477580.7E1` yields `i64::MAX` exactly even
/// though no binary64 value does.
fn exact_decimal_magnitude(integral: &str, fraction: &str, exponent: &str, exponent_negative: bool) -> Option<u64> {
	let exponent: i64 = if exponent.is_empty() {
		0
	} else {
		exponent.parse().ok()?
	};
	let exponent = if exponent_negative { -exponent } else { exponent };

	let mut digits: Vec<u8> = Vec::with_capacity(integral.len() + fraction.len());
	digits.extend(integral.bytes());
	digits.extend(fraction.bytes());

	// dropping trailing zeros instead of dividing keeps the value exact
	let mut shift = exponent.checked_sub(fraction.len() as i64)?;
	while shift < 0 {
		match digits.pop() {
			Some(b'0') => shift += 1,
			_ => return None,
		}
	}

	let mut value = accumulate_u64(&digits)?;
	if value == 0 {
		return Some(0);
	}
	while shift > 0 {
		value = value.checked_mul(10)?;
		shift -= 1;
	}
	Some(value)
}

/// Apply the sign to an exact magnitude and pick the narrowest representation.
///
/// Unsigned magnitudes up to `i64::MAX` become `Integer`. A negative magnitude
/// of exactly 2^63 is `i64::MIN`; anything larger falls back to `Float`.
fn classify_integer(magnitude: u64, negative: bool) -> JsonValue {
	if negative {
		if magnitude <= 1 << 63 {
			JsonValue::Integer(magnitude.wrapping_neg() as i64)
		} else {
			JsonValue::Float(-(magnitude as f64))
		}
	} else if magnitude <= i64::MAX as u64 {
		JsonValue::Integer(magnitude as i64)
	} else {
		JsonValue::Unsigned(magnitude)
	}
}

fn parse_float(iter: &ByteIterator, span: &str) -> Result<JsonValue> {
	// str::parse is locale-independent, unlike strtod
	let value: f64 = span.parse().map_err(|_| iter.format_error("invalid number"))?;
	match value.classify() {
		FpCategory::Nan | FpCategory::Infinite => Err(iter.format_error("number out of range")),
		FpCategory::Zero | FpCategory::Subnormal => Ok(JsonValue::Float(0.0)),
		FpCategory::Normal => Ok(JsonValue::Float(value)),
	}
}
