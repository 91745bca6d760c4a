//! The dynamic runtime value tree (spec §9 design notes)
//!
//! Unlike the teacher, which serializes arbitrary `T: serde::Serialize`, this
//! crate works against a concrete tagged-variant tree, in the manner of
//! `apache-avro`/`avrow`/`fastavro`'s in-memory representations. Named types
//! keep field order with [`IndexMap`] rather than a sorted map, since Avro
//! field order is semantically part of the record schema.

use indexmap::IndexMap;

/// A dynamically typed Avro value.
///
/// `Record`/`Map` preserve insertion order. [`Value::Union`] is not a "real"
/// shape produced during ordinary decoding; it's the explicit branch-hint
/// mechanism used to disambiguate which union member to encode a value as
/// when more than one member could structurally match (spec §4.3). Decoding
/// a union datum yields the selected branch's value directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// `null`
	Null,
	/// `boolean`
	Boolean(bool),
	/// `int`
	Int(i32),
	/// `long`
	Long(i64),
	/// `float`
	Float(f32),
	/// `double`
	Double(f64),
	/// `bytes`
	Bytes(Vec<u8>),
	/// `string`
	String(String),
	/// `fixed` (size is implied by the target schema, not carried here)
	Fixed(Vec<u8>),
	/// `enum` (the chosen symbol)
	Enum(String),
	/// `array`
	Array(Vec<Value>),
	/// `map`
	Map(IndexMap<String, Value>),
	/// `record`
	Record(IndexMap<String, Value>),
	/// An explicit union branch selection: `(branch name, inner value)`.
	///
	/// The branch name matches a non-named union member's type name (e.g.
	/// `"string"`, `"array"`) or a named member's fullname. Encoding a plain,
	/// unwrapped value into a union schema falls back to the record
	/// `"-type"` attribute convention or to structural inference — see
	/// [`crate::validate`].
	Union(String, Box<Value>),
}

impl Value {
	/// The key fastavro/apache-avro-rs-style tooling inserts into decoded
	/// records to disambiguate which branch of an ambiguous union the record
	/// came from, when the decoder is configured with `return_record_name`.
	pub const RECORD_NAME_KEY: &'static str = "-type";

	/// `true` for [`Value::Null`]
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Unwrap one level of explicit [`Value::Union`] branch-hint wrapping, if
	/// present. Used by the encoder when the target schema position isn't
	/// itself a union: a caller-supplied hint that doesn't apply there is
	/// simply irrelevant, not an error.
	pub fn unwrap_union_hint(&self) -> &Value {
		match self {
			Value::Union(_, inner) => inner.unwrap_union_hint(),
			other => other,
		}
	}

	/// Construct an explicit union branch hint (the "tuple hint" form from
	/// spec §4.3): `(branch_name, value)`.
	pub fn union(branch: impl Into<String>, value: impl Into<Value>) -> Value {
		Value::Union(branch.into(), Box::new(value.into()))
	}
}

macro_rules! from_impl {
	($ty:ty, $variant:ident) => {
		impl From<$ty> for Value {
			fn from(v: $ty) -> Value {
				Value::$variant(v.into())
			}
		}
	};
}
from_impl!(bool, Boolean);
from_impl!(i32, Int);
from_impl!(i64, Long);
from_impl!(f32, Float);
from_impl!(f64, Double);
from_impl!(String, String);
from_impl!(Vec<u8>, Bytes);

impl From<&str> for Value {
	fn from(v: &str) -> Value {
		Value::String(v.to_owned())
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Value {
		match v {
			Some(v) => v.into(),
			None => Value::Null,
		}
	}
}

