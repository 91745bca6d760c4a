//! Schemaless and single-object encoding (spec §4.8)
//!
//! Grounded on the teacher's `single_object_encoding` module for the marker
//! bytes and fingerprint placement; retargeted to the `Value`-based
//! encode/decode path.

use crate::de::{decode_with, DecodeOptions};
use crate::error::{AvroError, ErrorKind, Result};
use crate::schema::{FingerprintKind, Schema};
use crate::ser::{encode_with, EncodeOptions};
use crate::value::Value;
use std::io::Read;

/// The two marker bytes every single-object-encoded payload starts with
pub const MARKER: [u8; 2] = [0xC3, 0x01];

/// Encode `value` with no framing at all: just the raw datum bytes, as
/// produced by [`crate::ser::encode`]. Provided here under its spec name for
/// discoverability.
pub fn encode_schemaless(value: &Value, schema: &Schema, out: &mut Vec<u8>) -> Result<()> {
	crate::ser::encode(value, schema, out)
}

/// Decode a schemaless datum with no framing (the inverse of
/// [`encode_schemaless`])
pub fn decode_schemaless(input: &mut impl Read, schema: &Schema) -> Result<Value> {
	crate::de::decode(input, schema)
}

/// Encode `value` using the single-object encoding: `0xC3 0x01` followed by
/// the little-endian 64-bit Rabin fingerprint of `schema`, followed by the
/// plain datum.
pub fn encode_single_object(value: &Value, schema: &Schema, out: &mut Vec<u8>) -> Result<()> {
	encode_single_object_with(value, schema, &EncodeOptions::default(), out)
}

/// [`encode_single_object`] with full control over encoding strictness
/// (logical type hooks are process-wide; see
/// [`crate::logical::register_writer`]).
pub fn encode_single_object_with(value: &Value, schema: &Schema, opts: &EncodeOptions, out: &mut Vec<u8>) -> Result<()> {
	out.extend_from_slice(&MARKER);
	let fingerprint = schema.fingerprint(FingerprintKind::Rabin);
	out.extend_from_slice(
		&fingerprint
			.as_rabin_u64()
			.expect("fingerprint() with FingerprintKind::Rabin always yields a rabin fingerprint")
			.to_le_bytes(),
	);
	encode_with(value, schema, opts, out)
}

/// Decode a single-object-encoded payload, checking that its embedded
/// fingerprint matches `schema`.
pub fn decode_single_object(input: &mut impl Read, schema: &Schema) -> Result<Value> {
	decode_single_object_with(input, schema, &DecodeOptions::default())
}

/// [`decode_single_object`] with full control over decoding shape (logical
/// type hooks are process-wide; see [`crate::logical::register_reader`]).
pub fn decode_single_object_with(input: &mut impl Read, schema: &Schema, opts: &DecodeOptions) -> Result<Value> {
	let mut marker = [0u8; 2];
	input.read_exact(&mut marker).map_err(|_| AvroError::eof())?;
	if marker != MARKER {
		return Err(AvroError::new(ErrorKind::CorruptFrame, "missing single-object encoding marker"));
	}
	let mut fingerprint_bytes = [0u8; 8];
	input.read_exact(&mut fingerprint_bytes).map_err(|_| AvroError::eof())?;
	let expected = schema
		.fingerprint(FingerprintKind::Rabin)
		.as_rabin_u64()
		.expect("fingerprint() with FingerprintKind::Rabin always yields a rabin fingerprint");
	if u64::from_le_bytes(fingerprint_bytes) != expected {
		return Err(AvroError::new(
			ErrorKind::SchemaResolution,
			"single-object payload's schema fingerprint does not match the supplied schema",
		));
	}
	decode_with(input, schema, opts)
}
