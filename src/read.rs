//! Reading JSON from readers and files, and dumping values back out.
//!
//! The reader-level decoder slurps the input up front (bounded by a byte cap)
//! and hands the bytes to the slice decoder; it never returns a partial value.
//! Failures are discriminable: I/O errors, an interrupted read, input past the
//! cap, and syntax errors are separate variants, and an empty input is a
//! syntax error like any other.

use crate::parse::parse_json_slice;
use crate::stringify::stringify_pretty;
use crate::types::JsonValue;
use anyhow::{Context, Result};
use std::{
	fs::File,
	io::{ErrorKind, Read, Write},
	path::Path,
};

const READ_CHUNK_SIZE: usize = 4096;

/// Why a reader- or file-level decode failed.
#[derive(Debug, thiserror::Error)]
pub enum DecodeFileError {
	#[error("I/O error while reading JSON")]
	Io(#[source] std::io::Error),
	#[error("read interrupted by a signal")]
	Interrupted,
	#[error("JSON input exceeds the maximum of {0} bytes")]
	TooLarge(usize),
	#[error("syntax error: {0}")]
	Syntax(String),
}

/// Read at most `max_size` bytes of JSON text from `reader` and decode it.
///
/// # Errors
/// [`DecodeFileError::TooLarge`] if the input exceeds `max_size` bytes,
/// [`DecodeFileError::Interrupted`] if a read is interrupted by a signal,
/// [`DecodeFileError::Io`] on any other read error and
/// [`DecodeFileError::Syntax`] if the input is not valid JSON.
pub fn decode_reader(reader: &mut impl Read, max_size: usize) -> Result<JsonValue, DecodeFileError> {
	let mut buffer = Vec::new();
	let mut chunk = [0u8; READ_CHUNK_SIZE];
	loop {
		let count = match reader.read(&mut chunk) {
			Ok(0) => break,
			Ok(count) => count,
			Err(error) if error.kind() == ErrorKind::Interrupted => return Err(DecodeFileError::Interrupted),
			Err(error) => return Err(DecodeFileError::Io(error)),
		};
		if count > max_size - buffer.len() {
			return Err(DecodeFileError::TooLarge(max_size));
		}
		buffer.extend_from_slice(&chunk[..count]);
	}
	parse_json_slice(&buffer).map_err(|error| DecodeFileError::Syntax(error.to_string()))
}

/// Decode the JSON file at `path`, reading at most `max_size` bytes.
///
/// # Errors
/// See [`decode_reader`]; failures to open the file report as
/// [`DecodeFileError::Io`].
pub fn decode_file(path: &Path, max_size: usize) -> Result<JsonValue, DecodeFileError> {
	let mut file = File::open(path).map_err(DecodeFileError::Io)?;
	let value = decode_reader(&mut file, max_size)?;
	log::debug!("decoded JSON value from {path:?}");
	Ok(value)
}

/// Pretty-print `json` to `writer` with an indent step of 2 and terminate the
/// output with a newline.
///
/// # Errors
/// Returns an error if writing fails.
pub fn dump_writer(json: &JsonValue, writer: &mut impl Write) -> Result<()> {
	writer.write_all(stringify_pretty(json, 0, 2).as_bytes())?;
	writer.write_all(b"\n")?;
	Ok(())
}

/// Pretty-print `json` into the file at `path`; see [`dump_writer`].
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn dump_file(json: &JsonValue, path: &Path) -> Result<()> {
	let mut file = File::create(path).with_context(|| format!("failed to create {path:?}"))?;
	dump_writer(json, &mut file).with_context(|| format!("failed to write {path:?}"))
}
