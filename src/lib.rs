//! A fast, dynamic implementation of [Apache Avro](https://avro.apache.org/)
//! binary (de)serialization.
//!
//! Unlike schema-to-Rust-type derive-based Avro libraries, this crate works
//! against a dynamic [`Value`] tree, the way `fastavro` or `apache-avro-rs`
//! do: useful when the schema isn't known at compile time, or when the same
//! process handles many different schemas.
//!
//! # Getting started
//!
//! ```
//! use avro_core::{Schema, Value};
//!
//! let schema: Schema = r#"
//! {
//!     "type": "record",
//!     "name": "test.Test",
//!     "fields": [
//!         { "name": "field", "type": "string" }
//!     ]
//! }
//! "#
//! .parse()
//! .expect("failed to parse schema");
//!
//! let mut record = indexmap::IndexMap::new();
//! record.insert("field".to_owned(), Value::from("foo"));
//! let value = Value::Record(record);
//!
//! let mut datum = Vec::new();
//! avro_core::encode(&value, &schema, &mut datum).expect("failed to encode");
//! assert_eq!(datum, &[6, b'f', b'o', b'o']);
//!
//! let decoded = avro_core::decode(&mut &datum[..], &schema).expect("failed to decode");
//! assert_eq!(decoded, value);
//! ```
//!
//! # Object container files
//!
//! "Avro files" bundle a schema header with a sequence of compressed blocks
//! of records. See the [`container`] module.
//!
//! # Schema resolution
//!
//! A datum written with one schema (the "writer schema") can be read back
//! against a different, compatible schema (the "reader schema"); see
//! [`resolution::resolve_decode`].
//!
//! # Logical types
//! See the [`logical`] module for built-in logical type handling
//! (`decimal`, `uuid`, `date`, the `time-*`/`timestamp-*` family) and for
//! registering custom ones.

#![warn(missing_docs)]

pub mod binary;
pub mod codec;
pub mod container;
mod defaults;
pub mod de;
pub mod error;
pub mod logical;
pub mod resolution;
pub mod schema;
pub mod ser;
mod skip;
pub mod single_object;
pub mod validate;
mod value;

pub use de::{decode, decode_with, DecodeOptions};
pub use error::{AvroError, Result};
pub use schema::Schema;
pub use ser::{encode, encode_with, EncodeOptions};
pub use single_object::{
	decode_schemaless, decode_single_object, decode_single_object_with, encode_schemaless,
	encode_single_object, encode_single_object_with,
};
pub use skip::skip;
pub use value::Value;
