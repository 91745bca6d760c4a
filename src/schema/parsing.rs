//! Recursive-descent schema parser (spec §4.2)
//!
//! Schemas are parsed directly off a [`serde_json::Value`] tree rather than
//! through a custom `serde::Deserialize` visitor, since the downstream types
//! need owned `String`s anyway (there's no borrowed-JSON fast path to
//! preserve once everything funnels into a `Value`-based runtime).

use super::nodes::{
	Array, Decimal, Enum, Fixed, LogicalType, Map, Record, RecordField, RegularType, SchemaNode,
	Union,
};
use super::{Name, SchemaKey, SchemaMut};
use crate::error::{AvroError, ErrorKind, Result};
use serde_json::Value as Json;
use std::collections::{HashMap, HashSet};

pub(super) fn parse(value: &Json) -> Result<SchemaMut> {
	let mut nodes = Vec::new();
	let mut named: HashMap<String, usize> = HashMap::new();
	parse_node(value, None, &mut nodes, &mut named)?;
	Ok(SchemaMut::from_nodes(nodes))
}

fn err(msg: impl Into<String>) -> AvroError {
	AvroError::new(ErrorKind::SchemaParse, msg.into())
}

/// Parses a schema node, pushes it (and anything it needs) onto `nodes`, and
/// returns the key it landed at.
fn parse_node(
	value: &Json,
	enclosing_namespace: Option<&str>,
	nodes: &mut Vec<SchemaNode>,
	named: &mut HashMap<String, usize>,
) -> Result<SchemaKey> {
	match value {
		Json::String(s) => parse_named_or_primitive(s, enclosing_namespace, nodes, named),
		Json::Array(variants) => parse_union(variants, enclosing_namespace, nodes, named),
		Json::Object(obj) => parse_object(obj, enclosing_namespace, nodes, named),
		_ => Err(err(format!("expected a schema, found {value}"))),
	}
}

fn push(nodes: &mut Vec<SchemaNode>, node: SchemaNode) -> SchemaKey {
	let key = SchemaKey::from_idx(nodes.len());
	nodes.push(node);
	key
}

fn parse_named_or_primitive(
	s: &str,
	enclosing_namespace: Option<&str>,
	nodes: &mut Vec<SchemaNode>,
	named: &mut HashMap<String, usize>,
) -> Result<SchemaKey> {
	if let Some(primitive) = primitive_type(s) {
		return Ok(push(nodes, SchemaNode::new(primitive)));
	}
	let (namespace, name) = Name::resolve_reference(s, enclosing_namespace);
	let fullname = Name::new(namespace, name).fully_qualified_name().to_owned();
	match named.get(&fullname) {
		Some(&idx) => Ok(SchemaKey::from_idx(idx)),
		None => Err(AvroError::new(
			ErrorKind::UnknownType,
			format!("no definition found for referenced type \"{s}\""),
		)),
	}
}

fn primitive_type(name: &str) -> Option<RegularType> {
	Some(match name {
		"null" => RegularType::Null,
		"boolean" => RegularType::Boolean,
		"int" => RegularType::Int,
		"long" => RegularType::Long,
		"float" => RegularType::Float,
		"double" => RegularType::Double,
		"bytes" => RegularType::Bytes,
		"string" => RegularType::String,
		_ => return None,
	})
}

fn parse_union(
	variants: &[Json],
	enclosing_namespace: Option<&str>,
	nodes: &mut Vec<SchemaNode>,
	named: &mut HashMap<String, usize>,
) -> Result<SchemaKey> {
	let mut seen = HashSet::new();
	let mut keys = Vec::with_capacity(variants.len());
	for variant in variants {
		if variant.is_array() {
			return Err(err("unions may not immediately contain other unions"));
		}
		let key = parse_node(variant, enclosing_namespace, nodes, named)?;
		let discriminant = union_discriminant(&nodes[key.idx()].type_);
		if !seen.insert(discriminant.clone()) {
			return Err(err(format!(
				"union contains more than one schema with type \"{discriminant}\""
			)));
		}
		keys.push(key);
	}
	Ok(push(nodes, SchemaNode::new(Union { variants: keys }.into())))
}

fn union_discriminant(type_: &RegularType) -> String {
	match type_.name() {
		Some(name) => name.fully_qualified_name().to_owned(),
		None => type_.type_name().to_owned(),
	}
}

fn parse_object(
	obj: &serde_json::Map<String, Json>,
	enclosing_namespace: Option<&str>,
	nodes: &mut Vec<SchemaNode>,
	named: &mut HashMap<String, usize>,
) -> Result<SchemaKey> {
	let type_str = obj
		.get("type")
		.and_then(Json::as_str)
		.ok_or_else(|| err("schema object is missing its \"type\" field"))?;

	let key = match type_str {
		"array" => {
			let items = obj
				.get("items")
				.ok_or_else(|| err("array schema is missing \"items\""))?;
			let items = parse_node(items, enclosing_namespace, nodes, named)?;
			push(nodes, SchemaNode::new(Array { items }.into()))
		}
		"map" => {
			let values = obj
				.get("values")
				.ok_or_else(|| err("map schema is missing \"values\""))?;
			let values = parse_node(values, enclosing_namespace, nodes, named)?;
			push(nodes, SchemaNode::new(Map { values }.into()))
		}
		"record" | "error" => parse_record(obj, enclosing_namespace, nodes, named)?,
		"enum" => parse_enum(obj, enclosing_namespace, named, nodes)?,
		"fixed" => parse_fixed(obj, enclosing_namespace, named, nodes)?,
		other => {
			if let Some(primitive) = primitive_type(other) {
				push(nodes, SchemaNode::new(primitive))
			} else {
				return parse_named_or_primitive(other, enclosing_namespace, nodes, named);
			}
		}
	};

	if let Some(Json::String(logical_type)) = obj.get("logicalType") {
		if let Some(logical) = resolve_logical_type(logical_type, obj, &nodes[key.idx()].type_)? {
			nodes[key.idx()].logical_type = Some(logical);
		}
	}

	Ok(key)
}

fn namespace_of<'a>(
	obj: &'a serde_json::Map<String, Json>,
	enclosing_namespace: Option<&'a str>,
) -> Option<&'a str> {
	match obj.get("namespace").and_then(Json::as_str) {
		Some(ns) => Some(ns),
		None => enclosing_namespace,
	}
}

fn name_and_namespace<'a>(
	obj: &'a serde_json::Map<String, Json>,
	enclosing_namespace: Option<&'a str>,
) -> Result<(&'a str, Option<&'a str>)> {
	let raw_name = obj
		.get("name")
		.and_then(Json::as_str)
		.ok_or_else(|| err("named schema is missing \"name\""))?;
	validate_identifier(raw_name)?;
	if raw_name.contains('.') {
		let (ns, name) = Name::resolve_reference(raw_name, enclosing_namespace);
		return Ok((name, ns));
	}
	Ok((raw_name, namespace_of(obj, enclosing_namespace)))
}

fn validate_identifier(name: &str) -> Result<()> {
	let base = name.rsplit('.').next().unwrap_or(name);
	let mut chars = base.chars();
	let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
	let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
	if base.is_empty() || !valid_start || !valid_rest {
		return Err(err(format!("invalid name: \"{name}\"")));
	}
	Ok(())
}

fn parse_aliases(obj: &serde_json::Map<String, Json>) -> Result<Vec<String>> {
	match obj.get("aliases") {
		None => Ok(Vec::new()),
		Some(Json::Array(items)) => items
			.iter()
			.map(|v| {
				v.as_str()
					.map(str::to_owned)
					.ok_or_else(|| err("\"aliases\" entries must be strings"))
			})
			.collect(),
		Some(_) => Err(err("\"aliases\" must be an array of strings")),
	}
}

fn doc_of(obj: &serde_json::Map<String, Json>) -> Option<String> {
	obj.get("doc").and_then(Json::as_str).map(str::to_owned)
}

fn parse_record(
	obj: &serde_json::Map<String, Json>,
	enclosing_namespace: Option<&str>,
	nodes: &mut Vec<SchemaNode>,
	named: &mut HashMap<String, usize>,
) -> Result<SchemaKey> {
	let (name, namespace) = name_and_namespace(obj, enclosing_namespace)?;
	let full_name = Name::new(namespace, name);
	let aliases = parse_aliases(obj)?;
	let doc = doc_of(obj);

	let key = push(
		nodes,
		SchemaNode::new(
			Record {
				name: full_name.clone(),
				aliases: aliases.clone(),
				doc: doc.clone(),
				fields: Vec::new(),
			}
			.into(),
		),
	);
	if named
		.insert(full_name.fully_qualified_name().to_owned(), key.idx())
		.is_some()
	{
		return Err(err(format!("duplicate type name: {full_name}")));
	}

	let fields_json = obj
		.get("fields")
		.and_then(Json::as_array)
		.ok_or_else(|| err("record schema is missing \"fields\""))?;

	let mut field_names = HashSet::new();
	let mut fields = Vec::with_capacity(fields_json.len());
	for field in fields_json {
		let field = field
			.as_object()
			.ok_or_else(|| err("record field must be an object"))?;
		let field_name = field
			.get("name")
			.and_then(Json::as_str)
			.ok_or_else(|| err("record field is missing \"name\""))?;
		validate_identifier(field_name)?;
		if !field_names.insert(field_name.to_owned()) {
			return Err(err(format!(
				"duplicate field name \"{field_name}\" in record {full_name}"
			)));
		}
		let field_type = field
			.get("type")
			.ok_or_else(|| err(format!("field \"{field_name}\" is missing \"type\"")))?;
		let type_ = parse_node(field_type, namespace, nodes, named)?;
		fields.push(RecordField {
			name: field_name.to_owned(),
			aliases: parse_aliases(field)?,
			doc: doc_of(field),
			type_,
			default: field.get("default").cloned(),
		});
	}

	match &mut nodes[key.idx()].type_ {
		RegularType::Record(r) => r.fields = fields,
		_ => unreachable!(),
	}
	Ok(key)
}

fn parse_enum(
	obj: &serde_json::Map<String, Json>,
	enclosing_namespace: Option<&str>,
	named: &mut HashMap<String, usize>,
	nodes: &mut Vec<SchemaNode>,
) -> Result<SchemaKey> {
	let (name, namespace) = name_and_namespace(obj, enclosing_namespace)?;
	let full_name = Name::new(namespace, name);
	let symbols_json = obj
		.get("symbols")
		.and_then(Json::as_array)
		.ok_or_else(|| err("enum schema is missing \"symbols\""))?;
	let mut seen = HashSet::new();
	let mut symbols = Vec::with_capacity(symbols_json.len());
	for symbol in symbols_json {
		let symbol = symbol
			.as_str()
			.ok_or_else(|| err("enum symbols must be strings"))?;
		validate_identifier(symbol)?;
		if !seen.insert(symbol.to_owned()) {
			return Err(err(format!("duplicate enum symbol \"{symbol}\"")));
		}
		symbols.push(symbol.to_owned());
	}
	let default = match obj.get("default") {
		Some(Json::String(s)) => {
			if !symbols.contains(s) {
				return Err(err(format!(
					"enum default \"{s}\" is not one of its symbols"
				)));
			}
			Some(s.clone())
		}
		Some(_) => return Err(err("enum \"default\" must be a string")),
		None => None,
	};
	let key = push(
		nodes,
		SchemaNode::new(
			Enum {
				name: full_name.clone(),
				aliases: parse_aliases(obj)?,
				doc: doc_of(obj),
				symbols,
				default,
			}
			.into(),
		),
	);
	if named
		.insert(full_name.fully_qualified_name().to_owned(), key.idx())
		.is_some()
	{
		return Err(err(format!("duplicate type name: {full_name}")));
	}
	Ok(key)
}

fn parse_fixed(
	obj: &serde_json::Map<String, Json>,
	enclosing_namespace: Option<&str>,
	named: &mut HashMap<String, usize>,
	nodes: &mut Vec<SchemaNode>,
) -> Result<SchemaKey> {
	let (name, namespace) = name_and_namespace(obj, enclosing_namespace)?;
	let full_name = Name::new(namespace, name);
	let size = obj
		.get("size")
		.and_then(Json::as_u64)
		.ok_or_else(|| err("fixed schema is missing a numeric \"size\""))? as usize;
	let key = push(
		nodes,
		SchemaNode::new(
			Fixed {
				name: full_name.clone(),
				aliases: parse_aliases(obj)?,
				size,
			}
			.into(),
		),
	);
	if named
		.insert(full_name.fully_qualified_name().to_owned(), key.idx())
		.is_some()
	{
		return Err(err(format!("duplicate type name: {full_name}")));
	}
	Ok(key)
}

/// Resolves a `logicalType` annotation against the base type it's attached
/// to. Per spec, an annotation that doesn't fit its base type (wrong base
/// type, invalid parameters) is dropped rather than treated as an error: the
/// node falls back to behaving as its plain underlying type.
fn resolve_logical_type(
	logical_type: &str,
	obj: &serde_json::Map<String, Json>,
	base: &RegularType,
) -> Result<Option<LogicalType>> {
	Ok(match (logical_type, base) {
		("decimal", RegularType::Bytes) => Some(decimal(obj, None)?),
		("decimal", RegularType::Fixed(f)) => Some(decimal(obj, Some(f.size))?),
		("uuid", RegularType::String) => Some(LogicalType::Uuid),
		("date", RegularType::Int) => Some(LogicalType::Date),
		("time-millis", RegularType::Int) => Some(LogicalType::TimeMillis),
		("time-micros", RegularType::Long) => Some(LogicalType::TimeMicros),
		("timestamp-millis", RegularType::Long) => Some(LogicalType::TimestampMillis),
		("timestamp-micros", RegularType::Long) => Some(LogicalType::TimestampMicros),
		("local-timestamp-millis", RegularType::Long) => Some(LogicalType::LocalTimestampMillis),
		("local-timestamp-micros", RegularType::Long) => Some(LogicalType::LocalTimestampMicros),
		(other, RegularType::Bytes | RegularType::Fixed(_) | RegularType::String | RegularType::Int | RegularType::Long) => {
			Some(LogicalType::Unknown(other.to_owned()))
		}
		_ => None,
	})
}

fn decimal(obj: &serde_json::Map<String, Json>, fixed_size: Option<usize>) -> Result<LogicalType> {
	let precision = obj
		.get("precision")
		.and_then(Json::as_u64)
		.ok_or_else(|| err("decimal logical type requires \"precision\""))? as usize;
	if precision == 0 {
		return Err(err("decimal \"precision\" must be positive"));
	}
	if let Some(size) = fixed_size {
		let max_precision = ((2f64.powi(8 * size as i32 - 1) - 1.0).log10()).floor() as usize;
		if precision > max_precision {
			return Err(err(format!(
				"decimal precision {precision} exceeds the maximum {max_precision} representable in a fixed({size})"
			)));
		}
	}
	let scale = match obj.get("scale") {
		Some(v) => v
			.as_u64()
			.ok_or_else(|| err("decimal \"scale\" must be a non-negative integer"))? as u32,
		None => 0,
	};
	if scale as usize > precision {
		return Err(err("decimal \"scale\" may not exceed \"precision\""));
	}
	Ok(LogicalType::Decimal(Decimal { scale, precision }))
}
