//! Structural validation of a [`Value`] against a [`Schema`] position, and
//! union branch selection (spec §4.3).
//!
//! Grounded on the shape of `Value::validate` in the retrieval pack's
//! `avro-rs` fork (a recursive structural match), generalized to the
//! arena-based schema and extended with the three union disambiguation
//! strategies the spec calls for: an explicit tuple hint, a record's
//! `"-type"` attribute, and structural shape inference.

use crate::schema::{RegularType, Schema, SchemaKey};
use crate::value::Value;

/// Does `value` structurally match the schema at `key`, ignoring union branch
/// ambiguity (a union matches if *any* branch matches)?
pub fn validates(value: &Value, schema: &Schema, key: SchemaKey) -> bool {
	let node = schema.node(key);
	match (&node.type_, value) {
		(RegularType::Null, Value::Null) => true,
		(RegularType::Boolean, Value::Boolean(_)) => true,
		(RegularType::Int, Value::Int(_)) => true,
		(RegularType::Long, Value::Long(_) | Value::Int(_)) => true,
		(RegularType::Float, Value::Float(_) | Value::Int(_) | Value::Long(_)) => true,
		(RegularType::Double, Value::Double(_) | Value::Float(_) | Value::Int(_) | Value::Long(_)) => true,
		(RegularType::Bytes, Value::Bytes(_)) => true,
		(RegularType::String, Value::String(_)) => true,
		(RegularType::Fixed(f), Value::Fixed(bytes)) => bytes.len() == f.size,
		(RegularType::Enum(e), Value::Enum(symbol)) => e.symbols.contains(symbol),
		(RegularType::Array(a), Value::Array(items)) => {
			items.iter().all(|item| validates(item, schema, a.items))
		}
		(RegularType::Map(m), Value::Map(entries)) => {
			entries.values().all(|v| validates(v, schema, m.values))
		}
		(RegularType::Record(r), Value::Record(fields)) => r.fields.iter().all(|f| {
			fields
				.get(&f.name)
				.map(|v| validates(v, schema, f.type_))
				.unwrap_or_else(|| f.default.is_some())
		}),
		(RegularType::Union(u), Value::Union(branch, inner)) => u
			.variants
			.iter()
			.any(|&v| branch_matches(schema, v, branch) && validates(inner, schema, v)),
		(RegularType::Union(u), other) => u.variants.iter().any(|&v| validates(other, schema, v)),
		(_, Value::Union(_, inner)) => validates(inner, schema, key),
		_ => false,
	}
}

fn branch_matches(schema: &Schema, key: SchemaKey, branch: &str) -> bool {
	let type_ = &schema.node(key).type_;
	match type_.name() {
		Some(name) => name.fully_qualified_name() == branch || type_.aliases().iter().any(|a| a == branch),
		None => type_.type_name() == branch,
	}
}

/// Pick which member of a union `value` should be encoded as, per spec
/// §4.3's three strategies, tried in order:
///
/// 1. An explicit [`Value::Union`] branch hint.
/// 2. A `Value::Record` carrying a [`Value::RECORD_NAME_KEY`] attribute
///    naming the target record's fullname.
/// 3. Structural shape inference: the first branch the (unwrapped) value
///    validates against, preferring `double` over `float` when both numeric
///    widenings apply (falling back to `float` if no `double` branch
///    exists), and for records preferring the branch with the most
///    overlapping field names, first-seen wins on a tie.
pub fn select_union_branch(
	schema: &Schema,
	union_key: SchemaKey,
	value: &Value,
) -> Option<SchemaKey> {
	let RegularType::Union(u) = &schema.node(union_key).type_ else {
		return None;
	};

	if let Value::Union(branch, inner) = value {
		return u
			.variants
			.iter()
			.copied()
			.find(|&v| branch_matches(schema, v, branch) && validates(inner, schema, v));
	}

	if let Value::Record(fields) = value {
		if let Some(Value::String(type_name)) = fields.get(Value::RECORD_NAME_KEY) {
			if let Some(&v) = u.variants.iter().find(|&&v| branch_matches(schema, v, type_name)) {
				return Some(v);
			}
		}
	}

	let candidates: Vec<SchemaKey> = u
		.variants
		.iter()
		.copied()
		.filter(|&v| validates(value, schema, v))
		.collect();

	match candidates.len() {
		0 => None,
		1 => Some(candidates[0]),
		_ => pick_best_candidate(schema, &candidates, value),
	}
}

fn pick_best_candidate(schema: &Schema, candidates: &[SchemaKey], value: &Value) -> Option<SchemaKey> {
	if matches!(value, Value::Float(_) | Value::Int(_) | Value::Long(_)) {
		let mut float_branch = None;
		for &c in candidates {
			match schema.node(c).type_ {
				RegularType::Double => return Some(c),
				RegularType::Float if float_branch.is_none() => float_branch = Some(c),
				_ => {}
			}
		}
		if let Some(c) = float_branch {
			return Some(c);
		}
	}

	if let Value::Record(fields) = value {
		let mut best: Option<(SchemaKey, usize)> = None;
		for &c in candidates {
			let overlap = match &schema.node(c).type_ {
				RegularType::Record(r) => r.fields.iter().filter(|f| fields.contains_key(&f.name)).count(),
				_ => 0,
			};
			let is_better = match best {
				Some((_, best_overlap)) => overlap > best_overlap,
				None => true,
			};
			if is_better {
				best = Some((c, overlap));
			}
		}
		return best.map(|(c, _)| c);
	}

	candidates.first().copied()
}
