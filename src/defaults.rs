//! Converting a schema-declared JSON default value into a [`Value`] (used
//! both by the encoder, to fill a missing writer field, and by the
//! resolution engine, to fill a reader field the writer's data doesn't
//! have).
//!
//! Per the Avro spec, a default for a `union`-typed field is always encoded
//! as JSON matching the union's *first* branch, never a JSON representation
//! that names the branch.

use crate::error::{AvroError, ErrorKind, Result};
use crate::schema::{RegularType, Schema, SchemaKey};
use crate::value::Value;
use indexmap::IndexMap;
use serde_json::Value as Json;

fn err(msg: impl Into<String>) -> AvroError {
	AvroError::new(ErrorKind::SchemaResolution, msg.into())
}

/// Convert a default's JSON representation into a [`Value`] for the schema
/// position at `key`.
pub fn json_to_value(json: &Json, schema: &Schema, key: SchemaKey) -> Result<Value> {
	let node = schema.node(key);
	Ok(match &node.type_ {
		RegularType::Null => Value::Null,
		RegularType::Boolean => Value::Boolean(json.as_bool().ok_or_else(|| err("expected a boolean default"))?),
		RegularType::Int => Value::Int(
			json.as_i64()
				.and_then(|v| i32::try_from(v).ok())
				.ok_or_else(|| err("expected an int default"))?,
		),
		RegularType::Long => Value::Long(json.as_i64().ok_or_else(|| err("expected a long default"))?),
		RegularType::Float => Value::Float(json.as_f64().ok_or_else(|| err("expected a float default"))? as f32),
		RegularType::Double => Value::Double(json.as_f64().ok_or_else(|| err("expected a double default"))?),
		RegularType::Bytes => Value::Bytes(string_to_bytes(json)?),
		RegularType::Fixed(_) => Value::Fixed(string_to_bytes(json)?),
		RegularType::String => Value::String(json.as_str().ok_or_else(|| err("expected a string default"))?.to_owned()),
		RegularType::Enum(_) => Value::Enum(json.as_str().ok_or_else(|| err("expected an enum symbol default"))?.to_owned()),
		RegularType::Array(a) => {
			let items = json.as_array().ok_or_else(|| err("expected an array default"))?;
			Value::Array(
				items
					.iter()
					.map(|item| json_to_value(item, schema, a.items))
					.collect::<Result<_>>()?,
			)
		}
		RegularType::Map(m) => {
			let entries = json.as_object().ok_or_else(|| err("expected a map default"))?;
			let mut out = IndexMap::with_capacity(entries.len());
			for (k, v) in entries {
				out.insert(k.clone(), json_to_value(v, schema, m.values)?);
			}
			Value::Map(out)
		}
		RegularType::Record(r) => {
			let obj = json.as_object().ok_or_else(|| err("expected a record default"))?;
			let mut out = IndexMap::with_capacity(r.fields.len());
			for field in &r.fields {
				let value = match obj.get(&field.name) {
					Some(v) => json_to_value(v, schema, field.type_)?,
					None => match &field.default {
						Some(d) => json_to_value(d, schema, field.type_)?,
						None => return Err(err(format!("default record is missing field \"{}\"", field.name))),
					},
				};
				out.insert(field.name.clone(), value);
			}
			Value::Record(out)
		}
		RegularType::Union(u) => {
			let first = *u
				.variants
				.first()
				.ok_or_else(|| err("union has no branches to default against"))?;
			json_to_value(json, schema, first)?
		}
	})
}

fn string_to_bytes(json: &Json) -> Result<Vec<u8>> {
	let s = json.as_str().ok_or_else(|| err("expected a bytes/fixed default string"))?;
	s.chars()
		.map(|c| u8::try_from(c as u32).map_err(|_| err("bytes/fixed default contains a non-byte code point")))
		.collect()
}
