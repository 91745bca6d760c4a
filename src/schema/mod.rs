//! Schema model: parsing, canonicalization, fingerprinting (spec §3, §4.2)

mod canonical_form;
mod directory;
mod fingerprint;
mod name;
mod nodes;
mod parsing;

pub use name::Name;
pub use nodes::{
	Array, Decimal, Enum, Fixed, LogicalType, Map, Record, RecordField, RegularType, SchemaKey,
	SchemaMut, SchemaNode, Union,
};

pub use fingerprint::{Fingerprint, FingerprintKind};

use crate::error::{AvroError, ErrorKind, Result};
use std::collections::HashMap;

/// A fully resolved, immutable Avro schema.
///
/// Build one with [`Schema::parse`] (or [`str::parse`], since this type also
/// implements [`std::str::FromStr`]).
#[derive(Clone, Debug)]
pub struct Schema {
	mutable: SchemaMut,
	/// Fully qualified name -> node, for every named type declared anywhere in
	/// the schema (including ones only reachable through a union branch that's
	/// never otherwise visited).
	named: HashMap<String, SchemaKey>,
	/// The schema exactly as originally parsed, used for fingerprinting error
	/// messages and [`Schema::original_json`].
	original_json: String,
}

impl Schema {
	/// Parse a schema from its canonical JSON text representation (spec §4.2)
	pub fn parse(json: &str) -> Result<Self> {
		let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
			AvroError::with_source(ErrorKind::SchemaParse, "invalid JSON", e)
		})?;
		let mutable = parsing::parse(&value)?;
		Self::freeze(mutable, json.to_owned())
	}

	/// Load every `*.avsc` file in a directory, each parsed independently,
	/// keyed by file stem (spec §4.2, "Loading schemas from a directory of
	/// `<name>.avsc` files")
	pub fn load_directory(dir: impl AsRef<std::path::Path>) -> Result<HashMap<String, Schema>> {
		directory::load_directory(dir.as_ref())
	}

	/// Finish building a [`SchemaMut`] into an immutable, indexed [`Schema`],
	/// validating the invariants that a bare node graph doesn't enforce on its
	/// own (no dangling [`SchemaKey`]s, no duplicate named-type fullnames).
	pub fn freeze(mutable: SchemaMut, original_json: String) -> Result<Self> {
		let mut named = HashMap::new();
		for (idx, node) in mutable.nodes().iter().enumerate() {
			if let Some(name) = node.type_.name() {
				if named
					.insert(name.fully_qualified_name().to_owned(), SchemaKey::from_idx(idx))
					.is_some()
				{
					return Err(AvroError::new(
						ErrorKind::SchemaParse,
						format!("duplicate named type definition: {name}"),
					));
				}
			}
		}
		for node in mutable.nodes() {
			validate_node_keys(node, &mutable)?;
		}
		Ok(Self {
			mutable,
			named,
			original_json,
		})
	}

	/// The root node of the schema
	pub fn root(&self) -> &SchemaNode {
		self.mutable.root()
	}

	/// The key of the root node — always [`SchemaKey::root`], provided for
	/// symmetry with APIs that take a starting [`SchemaKey`]
	pub fn root_key(&self) -> SchemaKey {
		SchemaKey::root()
	}

	/// Look up any node by key
	pub fn node(&self, key: SchemaKey) -> &SchemaNode {
		&self.mutable[key]
	}

	/// Look up a named type (record/enum/fixed) by its fully qualified name
	pub fn named_type(&self, fully_qualified_name: &str) -> Option<SchemaKey> {
		self.named.get(fully_qualified_name).copied()
	}

	/// All nodes, in declaration order (index == [`SchemaKey::idx`])
	pub fn nodes(&self) -> &[SchemaNode] {
		self.mutable.nodes()
	}

	/// The underlying editable representation
	pub fn as_mut(&self) -> &SchemaMut {
		&self.mutable
	}

	/// The schema's Parsing Canonical Form (spec §4.2)
	pub fn canonical_form(&self) -> String {
		canonical_form::canonical_form(self, self.root_key())
	}

	/// The schema's fingerprint, computed over its [`Schema::canonical_form`]
	pub fn fingerprint(&self, kind: fingerprint::FingerprintKind) -> Fingerprint {
		fingerprint::fingerprint(&self.canonical_form(), kind)
	}

	/// The schema exactly as originally supplied
	pub fn original_json(&self) -> &str {
		&self.original_json
	}
}

impl std::str::FromStr for Schema {
	type Err = AvroError;
	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

fn validate_node_keys(node: &SchemaNode, schema: &SchemaMut) -> Result<()> {
	let check = |key: SchemaKey| -> Result<()> {
		if schema.get(key).is_none() {
			return Err(AvroError::new(
				ErrorKind::UnknownType,
				format!("schema node references out-of-range key {}", key.idx()),
			));
		}
		Ok(())
	};
	match &node.type_ {
		RegularType::Array(a) => check(a.items)?,
		RegularType::Map(m) => check(m.values)?,
		RegularType::Union(u) => {
			for &v in &u.variants {
				check(v)?;
			}
		}
		RegularType::Record(r) => {
			for f in &r.fields {
				check(f.type_)?;
			}
		}
		_ => {}
	}
	Ok(())
}
