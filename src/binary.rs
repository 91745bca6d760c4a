//! Binary primitives (spec §4.1): zig-zag varints, little-endian floats, and
//! length-delimited framing for `bytes`/`string`/`fixed`.

use crate::error::{AvroError, ErrorKind, Result};
use integer_encoding::{VarInt, VarIntReader, VarIntWriter};
use std::io::{Read, Write};

/// Write a zig-zag-encoded varint `long`
pub fn write_long(value: i64, out: &mut impl Write) -> Result<()> {
	out.write_varint(value).map_err(AvroError::io)?;
	Ok(())
}

/// Write a zig-zag-encoded varint `int`
pub fn write_int(value: i32, out: &mut impl Write) -> Result<()> {
	write_long(value as i64, out)
}

/// Read a zig-zag-encoded varint `long`
pub fn read_long(input: &mut impl Read) -> Result<i64> {
	input.read_varint().map_err(|_| AvroError::eof())
}

/// Read a zig-zag-encoded varint `int`, checking it actually fits in 32 bits
pub fn read_int(input: &mut impl Read) -> Result<i32> {
	let long = read_long(input)?;
	i32::try_from(long)
		.map_err(|_| AvroError::new(ErrorKind::ValueMismatch, format!("long value {long} does not fit in an int")))
}

/// Encode a `long` to its zig-zag varint bytes, without an output sink
pub fn encode_long(value: i64) -> Vec<u8> {
	value.encode_var_vec()
}

/// Write a `float` (IEEE-754 single precision, little-endian)
pub fn write_float(value: f32, out: &mut impl Write) -> Result<()> {
	out.write_all(&value.to_le_bytes()).map_err(AvroError::io)
}

/// Write a `double` (IEEE-754 double precision, little-endian)
pub fn write_double(value: f64, out: &mut impl Write) -> Result<()> {
	out.write_all(&value.to_le_bytes()).map_err(AvroError::io)
}

/// Read a `float`
pub fn read_float(input: &mut impl Read) -> Result<f32> {
	let mut buf = [0u8; 4];
	input.read_exact(&mut buf).map_err(|_| AvroError::eof())?;
	Ok(f32::from_le_bytes(buf))
}

/// Read a `double`
pub fn read_double(input: &mut impl Read) -> Result<f64> {
	let mut buf = [0u8; 8];
	input.read_exact(&mut buf).map_err(|_| AvroError::eof())?;
	Ok(f64::from_le_bytes(buf))
}

/// Write a `boolean`
pub fn write_boolean(value: bool, out: &mut impl Write) -> Result<()> {
	out.write_all(&[value as u8]).map_err(AvroError::io)
}

/// Read a `boolean`
pub fn read_boolean(input: &mut impl Read) -> Result<bool> {
	let mut buf = [0u8; 1];
	input.read_exact(&mut buf).map_err(|_| AvroError::eof())?;
	Ok(buf[0] != 0)
}

/// Write length-delimited bytes: a `long` byte count followed by the bytes
/// (used for both `bytes` and `string`)
pub fn write_length_delimited(bytes: &[u8], out: &mut impl Write) -> Result<()> {
	write_long(bytes.len() as i64, out)?;
	out.write_all(bytes).map_err(AvroError::io)
}

/// Read length-delimited bytes
pub fn read_length_delimited(input: &mut impl Read) -> Result<Vec<u8>> {
	let len = read_long(input)?;
	let len = usize::try_from(len)
		.map_err(|_| AvroError::new(ErrorKind::CorruptFrame, format!("negative byte length {len}")))?;
	let mut buf = vec![0u8; len];
	input.read_exact(&mut buf).map_err(|_| AvroError::eof())?;
	Ok(buf)
}

/// Write exactly `size` bytes with no length prefix (used for `fixed`)
pub fn write_fixed(bytes: &[u8], out: &mut impl Write) -> Result<()> {
	out.write_all(bytes).map_err(AvroError::io)
}

/// Read exactly `size` bytes with no length prefix
pub fn read_fixed(size: usize, input: &mut impl Read) -> Result<Vec<u8>> {
	let mut buf = vec![0u8; size];
	input.read_exact(&mut buf).map_err(|_| AvroError::eof())?;
	Ok(buf)
}

/// How unicode-decoding failures on a `string` datum should be handled
/// (spec §4.6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Utf8ErrorMode {
	/// Fail decoding with [`crate::error::ErrorKind::InvalidUtf8`]
	#[default]
	Strict,
	/// Substitute `U+FFFD REPLACEMENT CHARACTER` for invalid sequences
	Replace,
	/// Drop invalid bytes silently
	Ignore,
}

/// Turn length-delimited bytes into a `String`, honoring `mode`
pub fn bytes_to_string(bytes: Vec<u8>, mode: Utf8ErrorMode) -> Result<String> {
	match String::from_utf8(bytes) {
		Ok(s) => Ok(s),
		Err(e) => match mode {
			Utf8ErrorMode::Strict => Err(AvroError::with_source(ErrorKind::InvalidUtf8, "invalid utf-8 string", e)),
			Utf8ErrorMode::Replace => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
			Utf8ErrorMode::Ignore => {
				Ok(e.into_bytes().into_iter().filter(|b| b.is_ascii()).map(|b| b as char).collect())
			}
		},
	}
}
