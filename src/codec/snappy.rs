//! Avro's `snappy` codec: a raw Snappy block followed by the big-endian
//! CRC32 checksum of the *uncompressed* data (spec §4.7).

use crate::error::{AvroError, ErrorKind, Result};

pub(super) fn compress(data: &[u8]) -> Result<Vec<u8>> {
	let mut out = snap::raw::Encoder::new()
		.compress_vec(data)
		.map_err(|e| AvroError::with_source(ErrorKind::Io, "snappy compression failed", e))?;
	out.extend_from_slice(&crc32fast::hash(data).to_be_bytes());
	Ok(out)
}

pub(super) fn decompress(data: &[u8]) -> Result<Vec<u8>> {
	if data.len() < 4 {
		return Err(AvroError::new(ErrorKind::CorruptFrame, "snappy block too short for its CRC32 trailer"));
	}
	let (body, trailer) = data.split_at(data.len() - 4);
	let expected_crc = u32::from_be_bytes(trailer.try_into().expect("exactly 4 bytes"));
	let out = snap::raw::Decoder::new()
		.decompress_vec(body)
		.map_err(|e| AvroError::with_source(ErrorKind::CorruptFrame, "corrupt snappy block", e))?;
	if crc32fast::hash(&out) != expected_crc {
		return Err(AvroError::new(ErrorKind::CorruptFrame, "snappy block failed its CRC32 check"));
	}
	Ok(out)
}
