//! Object container files (spec §4.7)
//!
//! Shape (separate [`Writer`]/[`WriterBuilder`] types, block-buffering
//! behavior triggered by an approximate block size) is grounded on the
//! teacher's `object_container_file_encoding::writer`/`reader` modules,
//! retargeted from serializing `T: Serialize` to encoding/decoding owned
//! [`Value`]s, and without the teacher's zero-copy, self-referential
//! `Reader` machinery — there's no borrowed data to preserve once everything
//! is a `Value`.
//!
//! [`WriterBuilder::append_to`] and [`Reader::blocks`] have no teacher
//! counterpart (the teacher ships neither append nor block-level iteration);
//! they're grounded instead on this module's own header-parsing code,
//! reused rather than duplicated.

mod reader;
mod writer;

pub use reader::{BlockInfo, Blocks, Reader};
pub use writer::{Writer, WriterBuilder};

/// The 4-byte magic every object container file starts with
pub const MAGIC: &[u8; 4] = b"Obj\x01";

/// Well-known container file metadata keys
pub mod metadata_keys {
	/// The writer schema, as JSON text
	pub const SCHEMA: &str = "avro.schema";
	/// The codec name data blocks are compressed with
	pub const CODEC: &str = "avro.codec";
}
