//! The editable, arena-based representation of a schema
//!
//! Avro schemas can reference earlier-declared named types by name, which
//! makes the natural representation a possibly-cyclic graph rather than a
//! tree. Rather than fight the borrow checker with `Rc`/`Weak` cycles, every
//! node lives in a flat `Vec`, and references between nodes are plain
//! `usize`-backed [`SchemaKey`]s indexing into that `Vec`.

use super::Name;

/// An editable representation of an Avro schema
///
/// References to other nodes are represented as [`SchemaKey`], indexing into
/// [`SchemaMut::nodes`].
#[derive(Clone, Debug)]
pub struct SchemaMut {
	/// First node in the array is the root
	pub(super) nodes: Vec<SchemaNode>,
}

impl SchemaMut {
	/// Obtain the underlying graph storage. The first node (index `0`) is the
	/// root of the schema.
	pub fn nodes(&self) -> &[SchemaNode] {
		&self.nodes
	}

	/// Obtain the underlying graph storage mutably
	pub fn nodes_mut(&mut self) -> &mut Vec<SchemaNode> {
		&mut self.nodes
	}

	/// The root of the schema (index `0`)
	///
	/// # Panics
	/// If the `nodes` `Vec` is empty.
	pub fn root(&self) -> &SchemaNode {
		self.nodes
			.first()
			.expect("SchemaMut should always have at least a root node")
	}

	/// Initialize a [`SchemaMut`] from a set of nodes. The first node (index
	/// `0`) is the root of the schema.
	pub fn from_nodes(nodes: Vec<SchemaNode>) -> Self {
		Self { nodes }
	}

	/// Try to get the node at the given [`SchemaKey`]
	pub fn get(&self, key: SchemaKey) -> Option<&SchemaNode> {
		self.nodes.get(key.idx)
	}
}

impl std::ops::Index<SchemaKey> for SchemaMut {
	type Output = SchemaNode;
	fn index(&self, key: SchemaKey) -> &Self::Output {
		&self.nodes[key.idx]
	}
}

/// The location of a node in a [`SchemaMut`]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaKey {
	pub(super) idx: usize,
}

impl SchemaKey {
	/// Construct a [`SchemaKey`] from a raw index into [`SchemaMut::nodes`]
	pub const fn from_idx(idx: usize) -> Self {
		Self { idx }
	}
	/// The index in [`SchemaMut::nodes`] this key points to
	pub const fn idx(self) -> usize {
		self.idx
	}
	/// The root of any schema is always node `0`
	pub const fn root() -> Self {
		Self { idx: 0 }
	}
}

impl std::fmt::Debug for SchemaKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Debug::fmt(&self.idx, f)
	}
}

/// A node of an Avro schema, stored in a [`SchemaMut`].
#[derive(Clone, Debug)]
pub struct SchemaNode {
	/// The underlying Avro type of this node
	pub type_: RegularType,
	/// Logical type this node is annotated with, if any
	pub logical_type: Option<LogicalType>,
}

impl SchemaNode {
	/// Build a node with no logical type annotation
	pub fn new(type_: RegularType) -> Self {
		type_.into()
	}

	/// Build a node with a logical type annotation
	pub fn with_logical_type(type_: RegularType, logical_type: LogicalType) -> Self {
		Self {
			type_,
			logical_type: Some(logical_type),
		}
	}
}

impl From<RegularType> for SchemaNode {
	fn from(type_: RegularType) -> Self {
		Self {
			type_,
			logical_type: None,
		}
	}
}

/// A primitive or complex Avro type
#[derive(Clone, Debug)]
pub enum RegularType {
	/// `null`
	Null,
	/// `boolean`
	Boolean,
	/// `int` (32-bit signed)
	Int,
	/// `long` (64-bit signed)
	Long,
	/// `float` (32-bit IEEE-754)
	Float,
	/// `double` (64-bit IEEE-754)
	Double,
	/// `bytes`
	Bytes,
	/// `string` (UTF-8)
	String,
	/// `array`
	Array(Array),
	/// `map` (keys are always UTF-8 strings)
	Map(Map),
	/// `union`
	Union(Union),
	/// `record`
	Record(Record),
	/// `enum`
	Enum(Enum),
	/// `fixed`
	Fixed(Fixed),
}

impl RegularType {
	/// If this is a named type, its [`Name`]
	pub fn name(&self) -> Option<&Name> {
		match self {
			RegularType::Record(r) => Some(&r.name),
			RegularType::Enum(e) => Some(&e.name),
			RegularType::Fixed(f) => Some(&f.name),
			_ => None,
		}
	}

	/// If this is a named type, its declared `aliases`
	pub fn aliases(&self) -> &[String] {
		match self {
			RegularType::Record(r) => &r.aliases,
			RegularType::Enum(e) => &e.aliases,
			RegularType::Fixed(f) => &f.aliases,
			_ => &[],
		}
	}

	/// A short discriminant for error messages / union hint matching of
	/// non-named types (e.g. `"string"`, `"array"`)
	pub fn type_name(&self) -> &'static str {
		match self {
			RegularType::Null => "null",
			RegularType::Boolean => "boolean",
			RegularType::Int => "int",
			RegularType::Long => "long",
			RegularType::Float => "float",
			RegularType::Double => "double",
			RegularType::Bytes => "bytes",
			RegularType::String => "string",
			RegularType::Array(_) => "array",
			RegularType::Map(_) => "map",
			RegularType::Union(_) => "union",
			RegularType::Record(_) => "record",
			RegularType::Enum(_) => "enum",
			RegularType::Fixed(_) => "fixed",
		}
	}
}

/// `array` component
#[derive(Clone, Debug)]
pub struct Array {
	/// Key of the items' schema
	pub items: SchemaKey,
}

/// `map` component (keys are always UTF-8 strings)
#[derive(Clone, Debug)]
pub struct Map {
	/// Key of the values' schema
	pub values: SchemaKey,
}

/// `union` component
#[derive(Clone, Debug)]
pub struct Union {
	/// Keys of each union member's schema, in declared order
	pub variants: Vec<SchemaKey>,
}

/// `record` component
#[derive(Clone, Debug)]
pub struct Record {
	/// Fully qualified name
	pub name: Name,
	/// Declared aliases (other fullnames a writer schema may use for this type)
	pub aliases: Vec<String>,
	/// Documentation string, if any
	pub doc: Option<String>,
	/// Ordered fields
	pub fields: Vec<RecordField>,
}

/// A field of a [`Record`]
#[derive(Clone, Debug)]
pub struct RecordField {
	/// Field name
	pub name: String,
	/// Declared aliases for this field (matched against a writer's field name
	/// during schema resolution)
	pub aliases: Vec<String>,
	/// Documentation string, if any
	pub doc: Option<String>,
	/// Key of this field's schema
	pub type_: SchemaKey,
	/// The field's default value, as originally-written JSON, if any
	pub default: Option<serde_json::Value>,
}

/// `enum` component
#[derive(Clone, Debug)]
pub struct Enum {
	/// Fully qualified name
	pub name: Name,
	/// Declared aliases
	pub aliases: Vec<String>,
	/// Documentation string, if any
	pub doc: Option<String>,
	/// Ordered symbols
	pub symbols: Vec<String>,
	/// Default symbol used by a reader when a writer's symbol is unknown
	pub default: Option<String>,
}

/// `fixed` component
#[derive(Clone, Debug)]
pub struct Fixed {
	/// Fully qualified name
	pub name: Name,
	/// Declared aliases
	pub aliases: Vec<String>,
	/// Size in bytes
	pub size: usize,
}

/// A logical type annotation (spec §3)
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum LogicalType {
	/// `decimal`, on `bytes` or `fixed`
	Decimal(Decimal),
	/// `uuid`, on `string`
	Uuid,
	/// `date`, on `int` (days since the unix epoch)
	Date,
	/// `time-millis`, on `int`
	TimeMillis,
	/// `time-micros`, on `long`
	TimeMicros,
	/// `timestamp-millis`, on `long` (since the UTC epoch)
	TimestampMillis,
	/// `timestamp-micros`, on `long` (since the UTC epoch)
	TimestampMicros,
	/// `local-timestamp-millis`, on `long` (naive wall clock)
	LocalTimestampMillis,
	/// `local-timestamp-micros`, on `long` (naive wall clock)
	LocalTimestampMicros,
	/// An unrecognized logical type, passed through as its base avro type
	Unknown(String),
}

impl LogicalType {
	/// The name used in schema JSON to refer to this logical type
	pub fn as_str(&self) -> &str {
		match self {
			LogicalType::Decimal(_) => "decimal",
			LogicalType::Uuid => "uuid",
			LogicalType::Date => "date",
			LogicalType::TimeMillis => "time-millis",
			LogicalType::TimeMicros => "time-micros",
			LogicalType::TimestampMillis => "timestamp-millis",
			LogicalType::TimestampMicros => "timestamp-micros",
			LogicalType::LocalTimestampMillis => "local-timestamp-millis",
			LogicalType::LocalTimestampMicros => "local-timestamp-micros",
			LogicalType::Unknown(name) => name,
		}
	}
}

/// `decimal` logical type parameters
#[derive(Clone, Copy, Debug)]
pub struct Decimal {
	/// Number of digits to the right of the decimal point
	pub scale: u32,
	/// Number of significant digits
	pub precision: usize,
}

macro_rules! impl_froms {
	($($variant:ident)*) => {
		$(
			impl From<$variant> for RegularType {
				fn from(v: $variant) -> Self {
					RegularType::$variant(v)
				}
			}
			impl From<$variant> for SchemaNode {
				fn from(v: $variant) -> Self {
					SchemaNode { type_: RegularType::$variant(v), logical_type: None }
				}
			}
		)*
	};
}
impl_froms! { Array Map Union Record Enum Fixed }
