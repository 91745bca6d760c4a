//! Schema-driven decoding of Avro binary into a [`Value`] (spec §4.4)

use crate::binary::{self, Utf8ErrorMode};
use crate::error::{AvroError, ErrorKind, PathSegment, Result};
use crate::logical::finalize_after_decoding;
use crate::schema::{RegularType, Schema, SchemaKey};
use crate::value::Value;
use indexmap::IndexMap;
use std::io::Read;

const MAX_DEPTH: usize = 512;

/// Options controlling [`decode`]'s output shape (spec §4.4/§4.6)
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
	/// Tag a record decoded as a union branch with a
	/// [`Value::RECORD_NAME_KEY`] entry naming its fullname, the way
	/// `fastavro`'s `return_record_name` does. Needed to round-trip a union
	/// of records back through the encoder unambiguously. Only applies to
	/// records reached through a union branch selection, not every record
	/// in the schema.
	pub return_record_name: bool,
	/// Like [`Self::return_record_name`], except when the union is a
	/// nullable-of-single-record (`[null, record]` in either order), in
	/// which case the record is returned unwrapped, untagged, the way
	/// `fastavro`'s `return_record_name_override` does.
	pub return_record_name_override: bool,
	/// How to handle a `string` datum that isn't valid UTF-8
	pub utf8_error_mode: Utf8ErrorMode,
}

/// Decode one datum from `input`, according to `schema`.
pub fn decode(input: &mut impl Read, schema: &Schema) -> Result<Value> {
	decode_with(input, schema, &DecodeOptions::default())
}

/// Decode one datum, with full control over output shape (logical type hooks
/// are process-wide; see [`crate::logical::register_reader`]).
pub fn decode_with(input: &mut impl Read, schema: &Schema, opts: &DecodeOptions) -> Result<Value> {
	decode_node(input, schema, schema.root_key(), opts, 0)
}

fn decode_node(
	input: &mut impl Read,
	schema: &Schema,
	key: SchemaKey,
	opts: &DecodeOptions,
	depth: usize,
) -> Result<Value> {
	if depth > MAX_DEPTH {
		return Err(AvroError::new(ErrorKind::CorruptFrame, "schema nesting exceeds the maximum allowed depth"));
	}
	let node = schema.node(key);

	let value = match &node.type_ {
		RegularType::Null => Value::Null,
		RegularType::Boolean => Value::Boolean(binary::read_boolean(input)?),
		RegularType::Int => Value::Int(binary::read_int(input)?),
		RegularType::Long => Value::Long(binary::read_long(input)?),
		RegularType::Float => Value::Float(binary::read_float(input)?),
		RegularType::Double => Value::Double(binary::read_double(input)?),
		RegularType::Bytes => Value::Bytes(binary::read_length_delimited(input)?),
		RegularType::String => {
			Value::String(binary::bytes_to_string(binary::read_length_delimited(input)?, opts.utf8_error_mode)?)
		}
		RegularType::Fixed(f) => Value::Fixed(binary::read_fixed(f.size, input)?),
		RegularType::Enum(e) => {
			let index = binary::read_long(input)?;
			let symbol = usize::try_from(index)
				.ok()
				.and_then(|idx| e.symbols.get(idx))
				.ok_or_else(|| {
					AvroError::new(ErrorKind::CorruptFrame, format!("enum {} has no symbol at index {index}", e.name))
				})?;
			Value::Enum(symbol.clone())
		}
		RegularType::Array(a) => {
			let mut items = Vec::new();
			loop {
				let count = binary::read_long(input)?;
				if count == 0 {
					break;
				}
				let count = if count < 0 {
					// negative block count is followed by its byte size, which we
					// don't need since we always fully decode each item
					let _byte_size = binary::read_long(input)?;
					(-count) as usize
				} else {
					count as usize
				};
				for idx in 0..count {
					items.push(
						decode_node(input, schema, a.items, opts, depth + 1)
							.map_err(|e| e.push_path(PathSegment::Index(items.len() + idx)))?,
					);
				}
			}
			Value::Array(items)
		}
		RegularType::Map(m) => {
			let mut entries = IndexMap::new();
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
					let key_bytes = binary::read_length_delimited(input)?;
					let key_str = binary::bytes_to_string(key_bytes, opts.utf8_error_mode)?;
					let value = decode_node(input, schema, m.values, opts, depth + 1)
						.map_err(|e| e.push_path(PathSegment::MapKey(key_str.clone())))?;
					entries.insert(key_str, value);
				}
			}
			Value::Map(entries)
		}
		RegularType::Record(r) => {
			let mut fields = IndexMap::with_capacity(r.fields.len());
			for field in &r.fields {
				let value = decode_node(input, schema, field.type_, opts, depth + 1)
					.map_err(|e| e.push_path(PathSegment::Field(field.name.clone())))?;
				fields.insert(field.name.clone(), value);
			}
			Value::Record(fields)
		}
		RegularType::Union(u) => {
			let index = binary::read_long(input)?;
			let branch = usize::try_from(index)
				.ok()
				.and_then(|idx| u.variants.get(idx))
				.copied()
				.ok_or_else(|| {
					AvroError::new(ErrorKind::CorruptFrame, format!("union has no branch at index {index}"))
				})?;
			let decoded = decode_node(input, schema, branch, opts, depth + 1)
				.map_err(|e| e.push_path(PathSegment::UnionBranch(branch_name(schema, branch))))?;
			tag_union_record_name(schema, &u.variants, branch, opts, decoded)
		}
	};

	match &node.logical_type {
		Some(logical) => finalize_after_decoding(value, logical),
		None => Ok(value),
	}
}

/// Apply [`DecodeOptions::return_record_name`]/
/// [`DecodeOptions::return_record_name_override`] to a value just decoded as
/// the union branch `selected` out of `variants`.
fn tag_union_record_name(schema: &Schema, variants: &[SchemaKey], selected: SchemaKey, opts: &DecodeOptions, value: Value) -> Value {
	if !opts.return_record_name && !opts.return_record_name_override {
		return value;
	}
	let Value::Record(mut fields) = value else { return value };
	if opts.return_record_name_override && is_nullable_single_record(schema, variants) {
		return Value::Record(fields);
	}
	let RegularType::Record(r) = &schema.node(selected).type_ else {
		return Value::Record(fields);
	};
	fields.insert(Value::RECORD_NAME_KEY.to_owned(), Value::String(r.name.fully_qualified_name().to_owned()));
	let last = fields.len() - 1;
	fields.move_index(last, 0);
	Value::Record(fields)
}

/// Is `variants` exactly `[null, record]` or `[record, null]`?
fn is_nullable_single_record(schema: &Schema, variants: &[SchemaKey]) -> bool {
	let [a, b] = variants else { return false };
	let (a, b) = (&schema.node(*a).type_, &schema.node(*b).type_);
	matches!(
		(a, b),
		(RegularType::Null, RegularType::Record(_)) | (RegularType::Record(_), RegularType::Null)
	)
}

fn branch_name(schema: &Schema, key: SchemaKey) -> String {
	let type_ = &schema.node(key).type_;
	match type_.name() {
		Some(name) => name.fully_qualified_name().to_owned(),
		None => type_.type_name().to_owned(),
	}
}
