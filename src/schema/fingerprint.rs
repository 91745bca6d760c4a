//! Schema fingerprinting (spec §4.2): the Avro "Rabin" fingerprint (really a
//! CRC-64 variant keyed by a fixed polynomial, as specified by the Avro spec
//! itself) plus MD5 and SHA-256 over the Parsing Canonical Form.

use md5::Digest as _;
use sha2::Digest as _;
use std::sync::OnceLock;

/// Which hash to compute a [`Fingerprint`] with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintKind {
	/// The 64-bit Rabin fingerprint the Avro spec defines for single-object
	/// encoding and schema identification
	Rabin,
	/// MD5 of the canonical form
	Md5,
	/// SHA-256 of the canonical form
	Sha256,
}

/// The result of fingerprinting a schema's canonical form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
	pub(super) kind: FingerprintKind,
	pub(super) bytes: Vec<u8>,
}

impl Fingerprint {
	/// Which algorithm produced this fingerprint
	pub fn kind(&self) -> FingerprintKind {
		self.kind
	}

	/// The raw fingerprint bytes
	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// The fingerprint as a little-endian `u64`, as used in the single-object
	/// encoding header. Only meaningful for [`FingerprintKind::Rabin`].
	pub fn as_rabin_u64(&self) -> Option<u64> {
		if self.kind != FingerprintKind::Rabin {
			return None;
		}
		<[u8; 8]>::try_from(self.bytes.as_slice()).ok().map(u64::from_le_bytes)
	}
}

impl std::fmt::Display for Fingerprint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for byte in &self.bytes {
			write!(f, "{byte:02x}")?;
		}
		Ok(())
	}
}

pub(super) fn fingerprint(canonical_form: &str, kind: FingerprintKind) -> Fingerprint {
	let bytes = match kind {
		FingerprintKind::Rabin => rabin_fingerprint(canonical_form.as_bytes()).to_le_bytes().to_vec(),
		FingerprintKind::Md5 => md5::Md5::digest(canonical_form.as_bytes()).to_vec(),
		FingerprintKind::Sha256 => sha2::Sha256::digest(canonical_form.as_bytes()).to_vec(),
	};
	Fingerprint { kind, bytes }
}

const EMPTY: u64 = 0xc15d213aa4d7a795;

fn fp_table() -> &'static [u64; 256] {
	static TABLE: OnceLock<[u64; 256]> = OnceLock::new();
	TABLE.get_or_init(|| {
		let mut table = [0u64; 256];
		for (i, slot) in table.iter_mut().enumerate() {
			let mut fp = i as u64;
			for _ in 0..8 {
				let mask = if fp & 1 == 1 { u64::MAX } else { 0 };
				fp = (fp >> 1) ^ (EMPTY & mask);
			}
			*slot = fp;
		}
		table
	})
}

/// The Avro spec's "Schema Fingerprints" algorithm: a 64-bit Rabin-style
/// fingerprint computed byte-by-byte against a 256-entry lookup table seeded
/// from the fixed constant [`EMPTY`].
fn rabin_fingerprint(buf: &[u8]) -> u64 {
	let table = fp_table();
	let mut fp = EMPTY;
	for &byte in buf {
		fp = (fp >> 8) ^ table[((fp ^ byte as u64) & 0xff) as usize];
	}
	fp
}
