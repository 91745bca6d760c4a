//! Block compression codecs used by object container files (spec §4.7)
//!
//! Shape (the `Compression`/`CompressionLevel` split, the per-algorithm
//! feature gates) is grounded on the teacher's
//! `object_container_file_encoding::Compression`; the registry on top, which
//! lets applications plug in codecs the container format doesn't know about
//! natively, is new — the teacher has no such extension point since it only
//! ships the fixed built-in set.

mod registry;
#[cfg(feature = "snappy")]
mod snappy;

pub use registry::{register, CodecHooks};

use crate::error::{AvroError, ErrorKind, Result};
use std::num::NonZeroU8;

/// The compression codec (and level, where applicable) a container file
/// block is written with.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Codec {
	/// Passes data through uncompressed
	Null,
	/// [RFC 1951](https://www.rfc-editor.org/rfc/rfc1951) deflate, no zlib
	/// header/checksum
	#[cfg(feature = "deflate")]
	Deflate {
		/// Compression level (1-9, or [`CompressionLevel::default`])
		level: CompressionLevel,
	},
	/// [bzip2](https://sourceware.org/bzip2/)
	#[cfg(feature = "bzip2")]
	Bzip2 {
		/// Compression level (1-9, or [`CompressionLevel::default`])
		level: CompressionLevel,
	},
	/// [Snappy](http://google.github.io/snappy/), block followed by a
	/// 4-byte big-endian CRC32 of the uncompressed data
	#[cfg(feature = "snappy")]
	Snappy,
	/// [xz](https://tukaani.org/xz/)
	#[cfg(feature = "xz")]
	Xz {
		/// Compression level (0-9, or [`CompressionLevel::default`])
		level: CompressionLevel,
	},
	/// [Zstandard](https://facebook.github.io/zstd/)
	#[cfg(feature = "zstandard")]
	Zstandard {
		/// Compression level (1-22, or [`CompressionLevel::default`])
		level: CompressionLevel,
	},
	/// [LZ4](https://lz4.org/) block format. Not part of the Avro
	/// specification's codec list; offered as a pluggable enrichment the way
	/// an application would register its own custom codec.
	#[cfg(feature = "lz4")]
	Lz4,
	/// A codec registered through [`crate::codec::register`], identified by
	/// its on-wire name
	Custom(String),
}

impl Codec {
	/// Reconstruct the codec an existing container file's `avro.codec`
	/// metadata entry names, at that algorithm's default compression level.
	/// The level itself isn't part of the on-wire format (only the name is),
	/// so appending to a file compressed at a specific level simply resumes
	/// at the default level for blocks written from here on.
	pub(crate) fn from_name(name: &str) -> Result<Self> {
		match name {
			"null" => Ok(Codec::Null),
			#[cfg(feature = "deflate")]
			"deflate" => Ok(Codec::Deflate { level: CompressionLevel::default() }),
			#[cfg(feature = "bzip2")]
			"bzip2" => Ok(Codec::Bzip2 { level: CompressionLevel::default() }),
			#[cfg(feature = "snappy")]
			"snappy" => Ok(Codec::Snappy),
			#[cfg(feature = "xz")]
			"xz" => Ok(Codec::Xz { level: CompressionLevel::default() }),
			#[cfg(feature = "zstandard")]
			"zstandard" => Ok(Codec::Zstandard { level: CompressionLevel::default() }),
			#[cfg(feature = "lz4")]
			"lz4" => Ok(Codec::Lz4),
			other => match registry::custom(other) {
				Some(_) => Ok(Codec::Custom(other.to_owned())),
				None => Err(codec_unavailable(other)),
			},
		}
	}

	/// The name written into a container file's `avro.codec` metadata entry
	pub fn name(&self) -> &str {
		match self {
			Codec::Null => "null",
			#[cfg(feature = "deflate")]
			Codec::Deflate { .. } => "deflate",
			#[cfg(feature = "bzip2")]
			Codec::Bzip2 { .. } => "bzip2",
			#[cfg(feature = "snappy")]
			Codec::Snappy => "snappy",
			#[cfg(feature = "xz")]
			Codec::Xz { .. } => "xz",
			#[cfg(feature = "zstandard")]
			Codec::Zstandard { .. } => "zstandard",
			#[cfg(feature = "lz4")]
			Codec::Lz4 => "lz4",
			Codec::Custom(name) => name,
		}
	}

	pub(crate) fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
		match self {
			Codec::Null => Ok(data.to_vec()),
			#[cfg(feature = "deflate")]
			Codec::Deflate { level } => {
				use std::io::Write;
				let mut encoder = flate2::write::DeflateEncoder::new(
					Vec::new(),
					flate2::Compression::new(level.instantiate_nb(6u8) as u32),
				);
				encoder.write_all(data).map_err(AvroError::io)?;
				encoder.finish().map_err(AvroError::io)
			}
			#[cfg(feature = "bzip2")]
			Codec::Bzip2 { level } => {
				use std::io::Write;
				let mut encoder = bzip2::write::BzEncoder::new(
					Vec::new(),
					bzip2::Compression::new(level.instantiate_nb(9u8) as u32),
				);
				encoder.write_all(data).map_err(AvroError::io)?;
				encoder.finish().map_err(AvroError::io)
			}
			#[cfg(feature = "snappy")]
			Codec::Snappy => snappy::compress(data),
			#[cfg(feature = "xz")]
			Codec::Xz { level } => {
				use std::io::Write;
				let mut encoder = xz2::write::XzEncoder::new(Vec::new(), level.instantiate_nb(6u8) as u32);
				encoder.write_all(data).map_err(AvroError::io)?;
				encoder.finish().map_err(AvroError::io)
			}
			#[cfg(feature = "zstandard")]
			Codec::Zstandard { level } => {
				zstd::stream::encode_all(data, level.instantiate_nb(3u8) as i32).map_err(AvroError::io)
			}
			#[cfg(feature = "lz4")]
			Codec::Lz4 => Ok(lz4_flex::block::compress_prepend_size(data)),
			Codec::Custom(name) => registry::custom(name)
				.ok_or_else(|| codec_unavailable(name))
				.and_then(|hooks| hooks.compress(data)),
		}
	}

	pub(crate) fn decompress(name: &str, data: &[u8]) -> Result<Vec<u8>> {
		match name {
			"null" => Ok(data.to_vec()),
			#[cfg(feature = "deflate")]
			"deflate" => {
				use std::io::Read;
				let mut out = Vec::new();
				flate2::read::DeflateDecoder::new(data).read_to_end(&mut out).map_err(AvroError::io)?;
				Ok(out)
			}
			#[cfg(feature = "bzip2")]
			"bzip2" => {
				use std::io::Read;
				let mut out = Vec::new();
				bzip2::read::BzDecoder::new(data).read_to_end(&mut out).map_err(AvroError::io)?;
				Ok(out)
			}
			#[cfg(feature = "snappy")]
			"snappy" => snappy::decompress(data),
			#[cfg(feature = "xz")]
			"xz" => {
				use std::io::Read;
				let mut out = Vec::new();
				xz2::read::XzDecoder::new(data).read_to_end(&mut out).map_err(AvroError::io)?;
				Ok(out)
			}
			#[cfg(feature = "zstandard")]
			"zstandard" => zstd::stream::decode_all(data).map_err(AvroError::io),
			#[cfg(feature = "lz4")]
			"lz4" => lz4_flex::block::decompress_size_prepended(data)
				.map_err(|e| AvroError::with_source(ErrorKind::CorruptFrame, "corrupt lz4 block", e)),
			other => match registry::custom(other) {
				Some(hooks) => hooks.decompress(data),
				None => Err(codec_unavailable(other)),
			},
		}
	}
}

fn codec_unavailable(name: &str) -> AvroError {
	AvroError::new(ErrorKind::CodecUnavailable, format!("no codec registered or compiled in for \"{name}\""))
}

/// Compression level to use for an algorithm that takes one.
///
/// Either a specific numeric level or [`CompressionLevel::default`], which
/// defers to whatever the underlying compression library considers its
/// default.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressionLevel {
	repr: NonZeroU8,
}

impl CompressionLevel {
	/// A specific compression level. `level` is clipped into whatever range
	/// the chosen algorithm supports.
	///
	/// # Panics
	/// If `level` is `0`.
	pub const fn new(mut level: u8) -> Self {
		if level == u8::MAX {
			level -= 1;
		}
		match NonZeroU8::new(level) {
			Some(n) => Self { repr: n },
			None => panic!("compression level must be greater than 0"),
		}
	}

	/// The underlying algorithm's own default level
	pub const fn default() -> Self {
		Self {
			repr: match NonZeroU8::new(u8::MAX) {
				Some(n) => n,
				None => unreachable!(),
			},
		}
	}

	fn instantiate_nb(self, default: u8) -> u8 {
		match self.repr.get() {
			u8::MAX => default,
			specified => specified,
		}
	}
}

impl Default for CompressionLevel {
	fn default() -> Self {
		CompressionLevel::default()
	}
}

impl std::fmt::Debug for CompressionLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.repr.get() {
			u8::MAX => write!(f, "Default"),
			level => write!(f, "{level}"),
		}
	}
}
