//! Object container file [`Writer`]

use super::{metadata_keys, Reader, MAGIC};
use crate::binary;
use crate::codec::Codec;
use crate::error::{AvroError, ErrorKind, Result};
use crate::schema::Schema;
use crate::ser::{encode_with, EncodeOptions};
use crate::value::Value;
use rand::RngCore;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom, Write};

const DEFAULT_APPROX_BLOCK_SIZE: u32 = 64 * 1024;

/// Builds a [`Writer`], configuring compression, block size, and any extra
/// metadata the header should carry.
pub struct WriterBuilder<'s> {
	schema: &'s Schema,
	codec: Codec,
	approx_block_size: u32,
	sync_marker: Option<[u8; 16]>,
	extra_metadata: HashMap<String, Vec<u8>>,
	encode_options: EncodeOptions,
}

impl<'s> WriterBuilder<'s> {
	/// Start building a writer for `schema`, defaulting to no compression
	pub fn new(schema: &'s Schema) -> Self {
		Self {
			schema,
			codec: Codec::Null,
			approx_block_size: DEFAULT_APPROX_BLOCK_SIZE,
			sync_marker: None,
			extra_metadata: HashMap::new(),
			encode_options: EncodeOptions::default(),
		}
	}

	/// Compression codec for data blocks
	pub fn codec(mut self, codec: Codec) -> Self {
		self.codec = codec;
		self
	}

	/// Roughly how large (in uncompressed bytes) each block should grow
	/// before it's flushed. Not a hard cap: a single oversized record still
	/// gets its own block.
	pub fn approx_block_size(mut self, size: u32) -> Self {
		self.approx_block_size = size;
		self
	}

	/// Force a specific 16-byte sync marker instead of a randomly generated
	/// one (mostly useful for reproducible tests)
	pub fn sync_marker(mut self, marker: [u8; 16]) -> Self {
		self.sync_marker = Some(marker);
		self
	}

	/// Add a user metadata entry to the header
	pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
		self.extra_metadata.insert(key.into(), value.into());
		self
	}

	/// Override the default [`EncodeOptions`] used for every appended value
	pub fn encode_options(mut self, options: EncodeOptions) -> Self {
		self.encode_options = options;
		self
	}

	/// Write the header and return a ready-to-use [`Writer`]
	pub fn build<W: Write>(self, mut dest: W) -> Result<Writer<'s, W>> {
		let sync_marker = self.sync_marker.unwrap_or_else(random_sync_marker);

		dest.write_all(MAGIC).map_err(AvroError::io)?;

		let mut metadata = self.extra_metadata;
		metadata.insert(metadata_keys::SCHEMA.to_owned(), self.schema.original_json().as_bytes().to_vec());
		metadata.insert(metadata_keys::CODEC.to_owned(), self.codec.name().as_bytes().to_vec());
		write_metadata(&metadata, &mut dest)?;

		dest.write_all(&sync_marker).map_err(AvroError::io)?;

		Ok(Writer {
			dest,
			schema: Cow::Borrowed(self.schema),
			codec: self.codec,
			approx_block_size: self.approx_block_size,
			sync_marker,
			encode_options: self.encode_options,
			pending: Vec::new(),
			pending_count: 0,
		})
	}

	/// Resume writing onto an existing object container file instead of
	/// starting a fresh one (spec §4.7's "Append"): read the existing header
	/// to learn its sync marker, codec, and writer schema (by running
	/// [`Reader::from_reader`] over `dest`), reject if `self.schema` doesn't
	/// match that writer schema, then drain the existing blocks so `dest`'s
	/// read cursor lands at end-of-stream and resume writing new blocks
	/// there using the file's own sync marker and codec.
	///
	/// [`Self::codec`], [`Self::sync_marker`], and [`Self::encode_options`]'s
	/// metadata portion are ignored here: an appended block must use the
	/// same codec and sync marker as the rest of the file to stay one valid
	/// container. [`Self::approx_block_size`] and [`Self::encode_options`]
	/// still apply to blocks written from this point on.
	pub fn append_to<S: Read + Write + Seek>(self, mut dest: S) -> Result<Writer<'static, S>> {
		let (file_schema, codec, sync_marker) = {
			let mut reader = Reader::from_reader(&mut dest)?;
			if reader.writer_schema().canonical_form() != self.schema.canonical_form() {
				return Err(AvroError::new(
					ErrorKind::SchemaResolution,
					"cannot append: schema does not match the existing file's writer schema",
				));
			}
			for block in reader.blocks() {
				block?;
			}
			(reader.writer_schema().clone(), Codec::from_name(reader.codec_name())?, reader.sync_marker())
		};
		dest.seek(SeekFrom::End(0)).map_err(AvroError::io)?;

		Ok(Writer {
			dest,
			schema: Cow::Owned(file_schema),
			codec,
			approx_block_size: self.approx_block_size,
			sync_marker,
			encode_options: self.encode_options,
			pending: Vec::new(),
			pending_count: 0,
		})
	}
}

fn random_sync_marker() -> [u8; 16] {
	let mut marker = [0u8; 16];
	rand::thread_rng().fill_bytes(&mut marker);
	marker
}

fn write_metadata(metadata: &HashMap<String, Vec<u8>>, dest: &mut impl Write) -> Result<()> {
	if !metadata.is_empty() {
		binary::write_long(metadata.len() as i64, dest)?;
		for (key, value) in metadata {
			binary::write_length_delimited(key.as_bytes(), dest)?;
			binary::write_length_delimited(value, dest)?;
		}
	}
	binary::write_long(0, dest)
}

/// Writes a stream of [`Value`]s into an object container file.
///
/// Buffers appended values into a block, flushing (compressing and writing
/// out) once [`WriterBuilder::approx_block_size`] worth of uncompressed data
/// has accumulated. Call [`Writer::flush`] to force out a partial block, e.g.
/// before dropping the writer or handing the underlying stream to something
/// else.
#[derive(Debug)]
pub struct Writer<'s, W: Write> {
	dest: W,
	schema: Cow<'s, Schema>,
	codec: Codec,
	approx_block_size: u32,
	sync_marker: [u8; 16],
	encode_options: EncodeOptions,
	pending: Vec<u8>,
	pending_count: u64,
}

impl<'s, W: Write> Writer<'s, W> {
	/// The sync marker this file was written with
	pub fn sync_marker(&self) -> [u8; 16] {
		self.sync_marker
	}

	/// Encode `value` and buffer it into the current block, flushing first if
	/// the block has grown past the configured approximate size.
	pub fn append(&mut self, value: &Value) -> Result<()> {
		encode_with(value, self.schema.as_ref(), &self.encode_options, &mut self.pending)?;
		self.pending_count += 1;
		if self.pending.len() as u32 >= self.approx_block_size {
			self.flush()?;
		}
		Ok(())
	}

	/// Append every value in `values`
	pub fn append_all<'v>(&mut self, values: impl IntoIterator<Item = &'v Value>) -> Result<()> {
		for value in values {
			self.append(value)?;
		}
		Ok(())
	}

	/// Force out a block containing everything buffered so far, if any.
	pub fn flush(&mut self) -> Result<()> {
		if self.pending.is_empty() {
			return Ok(());
		}
		let compressed = self.codec.compress(&self.pending)?;
		tracing::trace!(
			records = self.pending_count,
			uncompressed_bytes = self.pending.len(),
			compressed_bytes = compressed.len(),
			"flushing object container file block"
		);
		binary::write_long(self.pending_count as i64, &mut self.dest)?;
		binary::write_long(compressed.len() as i64, &mut self.dest)?;
		self.dest.write_all(&compressed).map_err(AvroError::io)?;
		self.dest.write_all(&self.sync_marker).map_err(AvroError::io)?;
		self.pending.clear();
		self.pending_count = 0;
		Ok(())
	}

	/// Flush any pending block and return the underlying writer
	pub fn into_inner(mut self) -> Result<W> {
		self.flush()?;
		// `Writer` implements `Drop`, so `self.dest` can't be moved out directly.
		// Take it via `ManuallyDrop` and drop the remaining fields explicitly to
		// avoid leaking them, without running `Writer::drop` (which would flush
		// again on a now-empty `pending`, which is harmless, but also re-touch
		// `self.dest` after it's been moved).
		let mut this = std::mem::ManuallyDrop::new(self);
		// Safety: `this.dest` is read once and never accessed again; the other
		// fields are explicitly dropped below, and `this` itself is never used
		// or dropped afterwards.
		let dest = unsafe { std::ptr::read(&this.dest) };
		unsafe {
			std::ptr::drop_in_place(&mut this.schema);
			std::ptr::drop_in_place(&mut this.codec);
			std::ptr::drop_in_place(&mut this.encode_options);
			std::ptr::drop_in_place(&mut this.pending);
		}
		Ok(dest)
	}
}

impl<'s, W: Write> Drop for Writer<'s, W> {
	fn drop(&mut self) {
		let _ = self.flush();
	}
}
