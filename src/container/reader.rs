//! Object container file [`Reader`]

use super::MAGIC;
use crate::binary;
use crate::de::DecodeOptions;
use crate::error::{AvroError, ErrorKind, Result};
use crate::resolution::resolve_decode_with;
use crate::schema::Schema;
use crate::value::Value;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, SeekFrom};

/// Metadata about one data block, yielded by [`Reader::blocks`] or observed
/// after the fact via [`Reader::current_block_info`], mirroring what
/// `fastavro`'s block iterator exposes.
#[derive(Debug, Clone)]
pub struct BlockInfo {
	/// Number of records in this block
	pub num_records: u64,
	/// Compressed byte size of this block, as written on the wire
	pub size: u64,
	/// Name of the codec this block was compressed with
	pub codec: String,
	/// Byte offset of this block's first byte (the record-count varint) in
	/// the underlying stream. Remember this to resume reading at this block
	/// later via [`Reader::seek_to_block`].
	pub offset: u64,
	/// The block's decompressed bytes
	pub bytes: Vec<u8>,
	/// The schema the file was written with
	pub writer_schema: Schema,
	/// The schema records in this block are resolved against, if different
	/// from `writer_schema`
	pub reader_schema: Option<Schema>,
}

/// Reads the records out of an object container file, optionally resolving
/// them against a different reader schema than the one the file was written
/// with (spec §4.5, §4.7).
pub struct Reader<R> {
	input: R,
	writer_schema: Schema,
	reader_schema: Option<Schema>,
	codec_name: String,
	sync_marker: [u8; 16],
	decode_options: DecodeOptions,
	current_block: Cursor<Vec<u8>>,
	remaining_in_block: u64,
	current_block_info: Option<BlockInfo>,
	bytes_consumed: u64,
	finished: bool,
}

impl<R: Read> Reader<R> {
	/// Read and validate the header, positioning the reader at the first
	/// data block.
	pub fn from_reader(mut input: R) -> Result<Self> {
		let mut magic = [0u8; 4];
		input.read_exact(&mut magic).map_err(|_| AvroError::eof())?;
		if &magic != MAGIC {
			return Err(AvroError::new(ErrorKind::CorruptFrame, "missing object container file magic"));
		}

		let metadata = read_metadata(&mut input)?;
		let schema_json = metadata
			.get(super::metadata_keys::SCHEMA)
			.ok_or_else(|| AvroError::new(ErrorKind::CorruptFrame, "container file header has no writer schema"))?;
		let schema_json = String::from_utf8(schema_json.clone())
			.map_err(|e| AvroError::with_source(ErrorKind::InvalidUtf8, "writer schema is not valid utf-8", e))?;
		let writer_schema = Schema::parse(&schema_json)?;

		let codec_name = match metadata.get(super::metadata_keys::CODEC) {
			Some(bytes) => String::from_utf8(bytes.clone())
				.map_err(|e| AvroError::with_source(ErrorKind::InvalidUtf8, "codec name is not valid utf-8", e))?,
			None => "null".to_owned(),
		};

		let mut sync_marker = [0u8; 16];
		input.read_exact(&mut sync_marker).map_err(|_| AvroError::eof())?;

		Ok(Self {
			input,
			writer_schema,
			reader_schema: None,
			codec_name,
			sync_marker,
			decode_options: DecodeOptions::default(),
			current_block: Cursor::new(Vec::new()),
			remaining_in_block: 0,
			current_block_info: None,
			bytes_consumed: 0,
			finished: false,
		})
	}

	/// Resolve every record against `schema` instead of the file's own
	/// writer schema
	pub fn with_reader_schema(mut self, schema: Schema) -> Self {
		self.reader_schema = Some(schema);
		self
	}

	/// Control [`DecodeOptions`] (record name tagging, utf-8 error handling)
	pub fn decode_options(mut self, options: DecodeOptions) -> Self {
		self.decode_options = options;
		self
	}

	/// The schema the file was written with
	pub fn writer_schema(&self) -> &Schema {
		&self.writer_schema
	}

	/// The schema records are being resolved against, if different from the
	/// writer schema
	pub fn reader_schema(&self) -> Option<&Schema> {
		self.reader_schema.as_ref()
	}

	/// Metadata about the block the most recently yielded record came from
	pub fn current_block_info(&self) -> Option<&BlockInfo> {
		self.current_block_info.as_ref()
	}

	/// The name of the codec data blocks were compressed with
	pub fn codec_name(&self) -> &str {
		&self.codec_name
	}

	/// The sync marker this file was written with
	pub fn sync_marker(&self) -> [u8; 16] {
		self.sync_marker
	}

	/// Iterate over the file's blocks without decoding individual records,
	/// yielding each block's metadata and decompressed bytes (spec §4.7's
	/// "block iterator" mode). Remember a yielded [`BlockInfo::offset`] to
	/// resume at that block later via [`Reader::seek_to_block`].
	pub fn blocks(&mut self) -> Blocks<'_, R> {
		Blocks { reader: self }
	}

	fn advance_block(&mut self) -> Result<bool> {
		let offset = self.bytes_consumed;
		let count = match read_long_or_eof(&mut self.input)? {
			Some(count) => count,
			None => return Ok(false),
		};
		let size = binary::read_long(&mut self.input)?;
		let size = u64::try_from(size)
			.map_err(|_| AvroError::new(ErrorKind::CorruptFrame, "negative block size"))?;
		let mut compressed = vec![0u8; size as usize];
		self.input.read_exact(&mut compressed).map_err(|_| AvroError::eof())?;

		let mut marker = [0u8; 16];
		self.input.read_exact(&mut marker).map_err(|_| AvroError::eof())?;
		if marker != self.sync_marker {
			return Err(AvroError::new(ErrorKind::CorruptFrame, "block sync marker does not match the header's"));
		}

		let count_varint_len = binary::encode_long(count).len() as u64;
		let size_varint_len = binary::encode_long(size as i64).len() as u64;
		self.bytes_consumed = offset + count_varint_len + size_varint_len + size + 16;
		let bytes = crate::codec::Codec::decompress(&self.codec_name, &compressed)?;

		self.current_block_info = Some(BlockInfo {
			num_records: count as u64,
			size,
			codec: self.codec_name.clone(),
			offset,
			bytes: bytes.clone(),
			writer_schema: self.writer_schema.clone(),
			reader_schema: self.reader_schema.clone(),
		});
		self.current_block = Cursor::new(bytes);
		self.remaining_in_block = count as u64;
		Ok(true)
	}
}

impl<R: Read + Seek> Reader<R> {
	/// Resume reading at a block boundary remembered from an earlier
	/// [`BlockInfo::offset`] (spec §4.7's random-access resume). `offset` must
	/// be a value this reader (or one constructed identically, over the same
	/// file) previously yielded; seeking to an arbitrary byte offset produces
	/// a [`crate::error::ErrorKind::CorruptFrame`] error on the next read.
	pub fn seek_to_block(&mut self, offset: u64) -> Result<()> {
		self.input.seek(SeekFrom::Start(offset)).map_err(AvroError::io)?;
		self.bytes_consumed = offset;
		self.current_block = Cursor::new(Vec::new());
		self.remaining_in_block = 0;
		self.current_block_info = None;
		self.finished = false;
		Ok(())
	}
}

/// Iterator over a file's blocks without decoding individual records, made by
/// [`Reader::blocks`].
pub struct Blocks<'r, R> {
	reader: &'r mut Reader<R>,
}

impl<'r, R: Read> Iterator for Blocks<'r, R> {
	type Item = Result<BlockInfo>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.reader.finished {
			return None;
		}
		match self.reader.advance_block() {
			Ok(true) => {
				self.reader.remaining_in_block = 0;
				self.reader.current_block_info.clone().map(Ok)
			}
			Ok(false) => {
				self.reader.finished = true;
				None
			}
			Err(e) => {
				self.reader.finished = true;
				Some(Err(e))
			}
		}
	}
}

fn read_long_or_eof(input: &mut impl Read) -> Result<Option<i64>> {
	let mut first = [0u8; 1];
	match input.read(&mut first) {
		Ok(0) => return Ok(None),
		Ok(_) => {}
		Err(e) => return Err(AvroError::io(e)),
	}
	let mut chained = Cursor::new(first).chain(input);
	binary::read_long(&mut chained).map(Some)
}

fn read_metadata(input: &mut impl Read) -> Result<HashMap<String, Vec<u8>>> {
	let mut metadata = HashMap::new();
	loop {
		let count = binary::read_long(input)?;
		if count == 0 {
			break;
		}
		let count = if count < 0 {
			let _byte_size = binary::read_long(input)?;
			(-count) as usize
		} else {
			count as usize
		};
		for _ in 0..count {
			let key = binary::read_length_delimited(input)?;
			let key = String::from_utf8(key)
				.map_err(|e| AvroError::with_source(ErrorKind::InvalidUtf8, "metadata key is not valid utf-8", e))?;
			let value = binary::read_length_delimited(input)?;
			metadata.insert(key, value);
		}
	}
	Ok(metadata)
}

impl<R: Read> Iterator for Reader<R> {
	type Item = Result<Value>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}
		if self.remaining_in_block == 0 {
			match self.advance_block() {
				Ok(true) => {}
				Ok(false) => {
					self.finished = true;
					return None;
				}
				Err(e) => {
					self.finished = true;
					return Some(Err(e));
				}
			}
		}
		self.remaining_in_block -= 1;
		let result = match &self.reader_schema {
			Some(reader_schema) => resolve_decode_with(
				&mut self.current_block,
				&self.writer_schema,
				self.writer_schema.root_key(),
				reader_schema,
				reader_schema.root_key(),
				&self.decode_options,
			),
			None => crate::de::decode_with(&mut self.current_block, &self.writer_schema, &self.decode_options),
		};
		if result.is_err() {
			self.finished = true;
		}
		Some(result)
	}
}
