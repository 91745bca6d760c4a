//! Writer/reader schema resolution (spec §4.5): decode bytes written
//! according to one schema into a [`Value`] shaped like a different,
//! compatible schema.

use crate::binary;
use crate::defaults::json_to_value;
use crate::de::DecodeOptions;
use crate::error::{AvroError, ErrorKind, PathSegment, Result};
use crate::logical::finalize_after_decoding;
use crate::schema::{RegularType, Schema, SchemaKey};
use crate::skip::skip;
use crate::value::Value;
use indexmap::IndexMap;
use std::io::Read;

const MAX_DEPTH: usize = 512;

/// Decode one datum written according to `writer`/`writer_key`, producing a
/// [`Value`] shaped like `reader`/`reader_key`.
pub fn resolve_decode(
	input: &mut impl Read,
	writer: &Schema,
	writer_key: SchemaKey,
	reader: &Schema,
	reader_key: SchemaKey,
) -> Result<Value> {
	resolve_decode_with(input, writer, writer_key, reader, reader_key, &DecodeOptions::default())
}

/// [`resolve_decode`] with full control over output shape (logical type
/// hooks are process-wide; see [`crate::logical::register_reader`]).
pub fn resolve_decode_with(
	input: &mut impl Read,
	writer: &Schema,
	writer_key: SchemaKey,
	reader: &Schema,
	reader_key: SchemaKey,
	opts: &DecodeOptions,
) -> Result<Value> {
	resolve_node(input, writer, writer_key, reader, reader_key, opts, 0)
}

fn incompatible(writer: &RegularType, reader: &RegularType) -> AvroError {
	AvroError::new(
		ErrorKind::SchemaResolution,
		format!(
			"writer type \"{}\" cannot be resolved against reader type \"{}\"",
			writer.type_name(),
			reader.type_name()
		),
	)
}

fn names_match(writer: &RegularType, reader: &RegularType) -> bool {
	let (Some(w), Some(r)) = (writer.name(), reader.name()) else {
		return false;
	};
	w.fully_qualified_name() == r.fully_qualified_name()
		|| reader.aliases().iter().any(|a| a == w.fully_qualified_name())
}

#[allow(clippy::too_many_arguments)]
fn resolve_node(
	input: &mut impl Read,
	writer: &Schema,
	writer_key: SchemaKey,
	reader: &Schema,
	reader_key: SchemaKey,
	opts: &DecodeOptions,
	depth: usize,
) -> Result<Value> {
	if depth > MAX_DEPTH {
		return Err(AvroError::new(ErrorKind::CorruptFrame, "schema nesting exceeds the maximum allowed depth"));
	}
	let writer_node = writer.node(writer_key);
	let reader_node = reader.node(reader_key);

	// A reader union resolves against a non-union writer by finding the one
	// branch the writer's value resolves against; a writer union always
	// carries its own branch index irrespective of the reader's shape.
	if let RegularType::Union(wu) = &writer_node.type_ {
		let index = binary::read_long(input)?;
		let branch = usize::try_from(index)
			.ok()
			.and_then(|idx| wu.variants.get(idx))
			.copied()
			.ok_or_else(|| AvroError::new(ErrorKind::CorruptFrame, format!("union has no branch at index {index}")))?;
		let value = resolve_node(input, writer, branch, reader, reader_key, opts, depth + 1)?;
		return Ok(tag_union_record_name(writer, &wu.variants, branch, opts, value));
	}

	if let RegularType::Union(ru) = &reader_node.type_ {
		for &candidate in &ru.variants {
			if resolvable(&writer_node.type_, &reader.node(candidate).type_) {
				let value = resolve_node(input, writer, writer_key, reader, candidate, opts, depth + 1)?;
				return Ok(tag_union_record_name(reader, &ru.variants, candidate, opts, value));
			}
		}
		return Err(AvroError::new(
			ErrorKind::SchemaResolution,
			"no branch of the reader union can resolve the writer's schema",
		));
	}

	let value = match (&writer_node.type_, &reader_node.type_) {
		(RegularType::Null, RegularType::Null) => Value::Null,
		(RegularType::Boolean, RegularType::Boolean) => Value::Boolean(binary::read_boolean(input)?),
		(RegularType::Int, RegularType::Int) => Value::Int(binary::read_int(input)?),
		(RegularType::Int, RegularType::Long) => Value::Long(binary::read_int(input)? as i64),
		(RegularType::Int, RegularType::Float) => Value::Float(binary::read_int(input)? as f32),
		(RegularType::Int, RegularType::Double) => Value::Double(binary::read_int(input)? as f64),
		(RegularType::Long, RegularType::Long) => Value::Long(binary::read_long(input)?),
		(RegularType::Long, RegularType::Float) => Value::Float(binary::read_long(input)? as f32),
		(RegularType::Long, RegularType::Double) => Value::Double(binary::read_long(input)? as f64),
		(RegularType::Float, RegularType::Float) => Value::Float(binary::read_float(input)?),
		(RegularType::Float, RegularType::Double) => Value::Double(binary::read_float(input)? as f64),
		(RegularType::Double, RegularType::Double) => Value::Double(binary::read_double(input)?),
		(RegularType::Bytes, RegularType::Bytes) => Value::Bytes(binary::read_length_delimited(input)?),
		(RegularType::Bytes, RegularType::String) => {
			Value::String(binary::bytes_to_string(binary::read_length_delimited(input)?, opts.utf8_error_mode)?)
		}
		(RegularType::String, RegularType::String) => {
			Value::String(binary::bytes_to_string(binary::read_length_delimited(input)?, opts.utf8_error_mode)?)
		}
		(RegularType::String, RegularType::Bytes) => Value::Bytes(binary::read_length_delimited(input)?),
		(RegularType::Fixed(wf), RegularType::Fixed(rf)) if names_match(&writer_node.type_, &reader_node.type_) => {
			if wf.size != rf.size {
				return Err(AvroError::new(
					ErrorKind::SchemaResolution,
					format!("fixed {} size differs between writer ({}) and reader ({})", rf.name, wf.size, rf.size),
				));
			}
			Value::Fixed(binary::read_fixed(rf.size, input)?)
		}
		(RegularType::Enum(we), RegularType::Enum(re)) if names_match(&writer_node.type_, &reader_node.type_) => {
			let index = binary::read_long(input)?;
			let writer_symbol = usize::try_from(index)
				.ok()
				.and_then(|idx| we.symbols.get(idx))
				.ok_or_else(|| AvroError::new(ErrorKind::CorruptFrame, format!("enum has no symbol at index {index}")))?;
			if re.symbols.contains(writer_symbol) {
				Value::Enum(writer_symbol.clone())
			} else {
				match &re.default {
					Some(default) => Value::Enum(default.clone()),
					None => {
						return Err(AvroError::new(
							ErrorKind::SchemaResolution,
							format!("reader enum {} has no symbol \"{writer_symbol}\" and no default", re.name),
						))
					}
				}
			}
		}
		(RegularType::Array(wa), RegularType::Array(ra)) => {
			let mut items = Vec::new();
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
				for idx in 0..count {
					items.push(
						resolve_node(input, writer, wa.items, reader, ra.items, opts, depth + 1)
							.map_err(|e| e.push_path(PathSegment::Index(items.len() + idx)))?,
					);
				}
			}
			Value::Array(items)
		}
		(RegularType::Map(wm), RegularType::Map(rm)) => {
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
					let value = resolve_node(input, writer, wm.values, reader, rm.values, opts, depth + 1)
						.map_err(|e| e.push_path(PathSegment::MapKey(key_str.clone())))?;
					entries.insert(key_str, value);
				}
			}
			Value::Map(entries)
		}
		(RegularType::Record(wr), RegularType::Record(rr)) if names_or_unnamed_match(&writer_node.type_, &reader_node.type_) => {
			let mut decoded: IndexMap<String, Value> = IndexMap::with_capacity(wr.fields.len());
			for wfield in &wr.fields {
				let matching_reader_field = rr
					.fields
					.iter()
					.find(|rf| rf.name == wfield.name || rf.aliases.iter().any(|a| a == &wfield.name));
				match matching_reader_field {
					Some(rfield) => {
						let value = resolve_node(input, writer, wfield.type_, reader, rfield.type_, opts, depth + 1)
							.map_err(|e| e.push_path(PathSegment::Field(rfield.name.clone())))?;
						decoded.insert(rfield.name.clone(), value);
					}
					None => skip(input, writer, wfield.type_)?,
				}
			}
			for rfield in &rr.fields {
				if !decoded.contains_key(&rfield.name) {
					let has_writer_source = wr
						.fields
						.iter()
						.any(|wf| wf.name == rfield.name || rfield.aliases.iter().any(|a| a == &wf.name));
					if has_writer_source {
						continue;
					}
					match &rfield.default {
						Some(default) => {
							let value = json_to_value(default, reader, rfield.type_)?;
							decoded.insert(rfield.name.clone(), value);
						}
						None => {
							return Err(AvroError::new(
								ErrorKind::SchemaResolution,
								format!("reader field \"{}\" has no writer source and no default", rfield.name),
							))
						}
					}
				}
			}
			Value::Record(decoded)
		}
		_ => return Err(incompatible(&writer_node.type_, &reader_node.type_)),
	};

	match &reader_node.logical_type {
		Some(logical) => finalize_after_decoding(value, logical),
		None => Ok(value),
	}
}

/// Apply [`DecodeOptions::return_record_name`]/
/// [`DecodeOptions::return_record_name_override`] to a value just resolved
/// as the union branch `selected` out of `variants` (of whichever schema,
/// writer or reader, actually carried the union).
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

fn names_or_unnamed_match(writer: &RegularType, reader: &RegularType) -> bool {
	match (writer.name(), reader.name()) {
		(Some(_), Some(_)) => names_match(writer, reader),
		_ => true,
	}
}

fn resolvable(writer: &RegularType, reader: &RegularType) -> bool {
	use RegularType::*;
	match (writer, reader) {
		(Null, Null)
		| (Boolean, Boolean)
		| (Int, Int | Long | Float | Double)
		| (Long, Long | Float | Double)
		| (Float, Float | Double)
		| (Double, Double)
		| (Bytes, Bytes | String)
		| (String, String | Bytes)
		| (Array(_), Array(_))
		| (Map(_), Map(_)) => true,
		(Fixed(_), Fixed(_)) | (Enum(_), Enum(_)) | (Record(_), Record(_)) => names_match(writer, reader),
		_ => false,
	}
}
