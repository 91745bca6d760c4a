//! Skipping a datum's bytes without materializing a [`Value`] — needed by
//! the resolution engine to discard writer fields the reader schema doesn't
//! care about (spec §4.5).

use crate::binary;
use crate::error::Result;
use crate::schema::{RegularType, Schema, SchemaKey};
use std::io::Read;

/// Consume (and discard) one datum written according to the schema at `key`.
pub fn skip(input: &mut impl Read, schema: &Schema, key: SchemaKey) -> Result<()> {
	match &schema.node(key).type_ {
		RegularType::Null => Ok(()),
		RegularType::Boolean => binary::read_boolean(input).map(drop),
		RegularType::Int => binary::read_int(input).map(drop),
		RegularType::Long => binary::read_long(input).map(drop),
		RegularType::Float => binary::read_float(input).map(drop),
		RegularType::Double => binary::read_double(input).map(drop),
		RegularType::Bytes | RegularType::String => binary::read_length_delimited(input).map(drop),
		RegularType::Fixed(f) => binary::read_fixed(f.size, input).map(drop),
		RegularType::Enum(_) => binary::read_long(input).map(drop),
		RegularType::Array(a) => {
			loop {
				let count = binary::read_long(input)?;
				if count == 0 {
					break;
				}
				if count < 0 {
					skip_sized_block(input)?;
					continue;
				}
				for _ in 0..count {
					skip(input, schema, a.items)?;
				}
			}
			Ok(())
		}
		RegularType::Map(m) => {
			loop {
				let count = binary::read_long(input)?;
				if count == 0 {
					break;
				}
				if count < 0 {
					skip_sized_block(input)?;
					continue;
				}
				for _ in 0..count {
					binary::read_length_delimited(input)?;
					skip(input, schema, m.values)?;
				}
			}
			Ok(())
		}
		RegularType::Record(r) => {
			for field in &r.fields {
				skip(input, schema, field.type_)?;
			}
			Ok(())
		}
		RegularType::Union(u) => {
			let index = binary::read_long(input)?;
			match u.variants.get(index as usize) {
				Some(&branch) => skip(input, schema, branch),
				None => Err(crate::error::AvroError::new(
					crate::error::ErrorKind::CorruptFrame,
					format!("union has no branch at index {index}"),
				)),
			}
		}
	}
}

/// A negative array/map block count is immediately followed by the byte size
/// of the block, letting a reader skip the whole block in one read instead
/// of decoding item-by-item.
fn skip_sized_block(input: &mut impl Read) -> Result<()> {
	let byte_size = binary::read_long(input)?;
	let mut buf = vec![0u8; byte_size as usize];
	input.read_exact(&mut buf).map_err(crate::error::AvroError::io)
}
