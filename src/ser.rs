//! Schema-driven encoding of a [`Value`] into Avro binary (spec §4.4)

use crate::binary;
use crate::defaults::json_to_value;
use crate::error::{AvroError, ErrorKind, PathSegment, Result};
use crate::logical::prepare_for_encoding;
use crate::schema::{RegularType, Schema, SchemaKey};
use crate::validate::select_union_branch;
use crate::value::Value;

const MAX_DEPTH: usize = 512;

/// Options controlling how strictly [`encode`] checks values against the
/// schema (spec §4.4/§4.6).
#[derive(Debug, Clone)]
pub struct EncodeOptions {
	/// Reject values that don't exactly match the schema's shape rather than
	/// coercing them (e.g. a record missing a field is always an error, even
	/// one with a default, unless `strict_allow_default` is also set).
	pub strict: bool,
	/// Only meaningful alongside `strict`: missing record fields may still be
	/// filled from their schema-declared default.
	pub strict_allow_default: bool,
	/// Reject the explicit `(branch, value)` tuple hint ([`Value::Union`]) as
	/// a union-disambiguation mechanism, forcing callers to rely on the
	/// record `"-type"` attribute or structural inference instead.
	pub disable_tuple_notation: bool,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self {
			strict: false,
			strict_allow_default: true,
			disable_tuple_notation: false,
		}
	}
}

/// Encode `value` against the schema rooted at `schema`, appending the
/// result to `out`.
pub fn encode(value: &Value, schema: &Schema, out: &mut Vec<u8>) -> Result<()> {
	encode_with(value, schema, &EncodeOptions::default(), out)
}

/// Encode `value`, with full control over strictness (logical type hooks are
/// process-wide; see [`crate::logical::register_writer`]).
pub fn encode_with(value: &Value, schema: &Schema, opts: &EncodeOptions, out: &mut Vec<u8>) -> Result<()> {
	encode_node(value, schema, schema.root_key(), opts, out, 0)
}

fn encode_node(
	value: &Value,
	schema: &Schema,
	key: SchemaKey,
	opts: &EncodeOptions,
	out: &mut Vec<u8>,
	depth: usize,
) -> Result<()> {
	if depth > MAX_DEPTH {
		return Err(AvroError::new(ErrorKind::ValueMismatch, "schema nesting exceeds the maximum allowed depth"));
	}
	let node = schema.node(key);

	if !matches!(node.type_, RegularType::Union(_)) {
		if let Value::Union(branch, _) = value {
			if opts.disable_tuple_notation {
				return Err(AvroError::new(
					ErrorKind::ValueMismatch,
					format!("tuple union hint \"{branch}\" given for a non-union schema position"),
				));
			}
		}
	}

	let value = match (&node.type_, value) {
		(RegularType::Union(_), _) => value,
		(_, Value::Union(_, _)) => value.unwrap_union_hint(),
		_ => value,
	};

	let value = match &node.logical_type {
		Some(logical) if !matches!(node.type_, RegularType::Union(_)) => prepare_for_encoding(value, logical)?,
		_ => value.clone(),
	};

	match (&node.type_, &value) {
		(RegularType::Null, Value::Null) => Ok(()),
		(RegularType::Boolean, Value::Boolean(b)) => binary::write_boolean(*b, out),
		(RegularType::Int, Value::Int(i)) => binary::write_int(*i, out),
		(RegularType::Long, Value::Long(l)) => binary::write_long(*l, out),
		(RegularType::Long, Value::Int(i)) if !opts.strict => binary::write_long(*i as i64, out),
		(RegularType::Float, Value::Float(f)) => binary::write_float(*f, out),
		(RegularType::Float, Value::Int(i)) if !opts.strict => binary::write_float(*i as f32, out),
		(RegularType::Float, Value::Long(l)) if !opts.strict => binary::write_float(*l as f32, out),
		(RegularType::Double, Value::Double(d)) => binary::write_double(*d, out),
		(RegularType::Double, Value::Float(f)) if !opts.strict => binary::write_double(*f as f64, out),
		(RegularType::Double, Value::Int(i)) if !opts.strict => binary::write_double(*i as f64, out),
		(RegularType::Double, Value::Long(l)) if !opts.strict => binary::write_double(*l as f64, out),
		(RegularType::Bytes, Value::Bytes(b)) => binary::write_length_delimited(b, out),
		(RegularType::String, Value::String(s)) => binary::write_length_delimited(s.as_bytes(), out),
		(RegularType::Fixed(f), Value::Fixed(b)) => {
			if b.len() != f.size {
				return Err(AvroError::new(
					ErrorKind::ValueMismatch,
					format!("fixed {} expects {} bytes, found {}", f.name, f.size, b.len()),
				));
			}
			binary::write_fixed(b, out)
		}
		(RegularType::Enum(e), Value::Enum(symbol)) => match e.symbols.iter().position(|s| s == symbol) {
			Some(idx) => binary::write_long(idx as i64, out),
			None => Err(AvroError::new(
				ErrorKind::ValueMismatch,
				format!("\"{symbol}\" is not a symbol of enum {}", e.name),
			)),
		},
		(RegularType::Array(a), Value::Array(items)) => {
			if !items.is_empty() {
				binary::write_long(items.len() as i64, out)?;
				for (idx, item) in items.iter().enumerate() {
					encode_node(item, schema, a.items, opts, out, depth + 1)
						.map_err(|e| e.push_path(PathSegment::Index(idx)))?;
				}
			}
			binary::write_long(0, out)
		}
		(RegularType::Map(m), Value::Map(entries)) => {
			if !entries.is_empty() {
				binary::write_long(entries.len() as i64, out)?;
				for (k, v) in entries {
					binary::write_length_delimited(k.as_bytes(), out)?;
					encode_node(v, schema, m.values, opts, out, depth + 1)
						.map_err(|e| e.push_path(PathSegment::MapKey(k.clone())))?;
				}
			}
			binary::write_long(0, out)
		}
		(RegularType::Record(r), Value::Record(fields)) => {
			for field in &r.fields {
				match fields.get(&field.name) {
					Some(v) => encode_node(v, schema, field.type_, opts, out, depth + 1)
						.map_err(|e| e.push_path(PathSegment::Field(field.name.clone())))?,
					None => {
						let allow_default = !opts.strict || opts.strict_allow_default;
						match (&field.default, allow_default) {
							(Some(default), true) => {
								let default_value = json_to_value(default, schema, field.type_)?;
								encode_node(&default_value, schema, field.type_, opts, out, depth + 1)
									.map_err(|e| e.push_path(PathSegment::Field(field.name.clone())))?
							}
							_ => {
								return Err(AvroError::new(
									ErrorKind::ValueMismatch,
									format!("record {} is missing required field \"{}\"", r.name, field.name),
								))
							}
						}
					}
				}
			}
			Ok(())
		}
		(RegularType::Union(_), _) => {
			let branch = select_union_branch(schema, key, &value).ok_or_else(|| {
				AvroError::new(ErrorKind::UnionMatch, format!("no union branch at this position accepts {value:?}"))
			})?;
			let index = match &node.type_ {
				RegularType::Union(u) => u.variants.iter().position(|&v| v == branch).unwrap(),
				_ => unreachable!(),
			};
			binary::write_long(index as i64, out)?;
			let inner = value.unwrap_union_hint();
			encode_node(inner, schema, branch, opts, out, depth + 1)
				.map_err(|e| e.push_path(PathSegment::UnionBranch(branch_name(schema, branch))))
		}
		_ => Err(mismatch(&node.type_, &value)),
	}
}

fn branch_name(schema: &Schema, key: SchemaKey) -> String {
	let type_ = &schema.node(key).type_;
	match type_.name() {
		Some(name) => name.fully_qualified_name().to_owned(),
		None => type_.type_name().to_owned(),
	}
}

fn mismatch(type_: &RegularType, value: &Value) -> AvroError {
	AvroError::new(
		ErrorKind::ValueMismatch,
		format!("value {value:?} does not match schema type \"{}\"", type_.type_name()),
	)
}
