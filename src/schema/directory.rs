//! Loading a directory of `<name>.avsc` files into independently parsed
//! schemas (spec §4.2).

use super::Schema;
use crate::error::{AvroError, ErrorKind, Result};
use std::collections::HashMap;
use std::path::Path;

pub(super) fn load_directory(dir: &Path) -> Result<HashMap<String, Schema>> {
	let mut schemas = HashMap::new();
	let entries = std::fs::read_dir(dir).map_err(AvroError::io)?;
	for entry in entries {
		let entry = entry.map_err(AvroError::io)?;
		let path = entry.path();
		if path.extension().and_then(|e| e.to_str()) != Some("avsc") {
			continue;
		}
		let stem = path
			.file_stem()
			.and_then(|s| s.to_str())
			.ok_or_else(|| AvroError::new(ErrorKind::SchemaParse, format!("non-UTF-8 file name: {}", path.display())))?
			.to_owned();
		let contents = std::fs::read_to_string(&path).map_err(AvroError::io)?;
		let schema = Schema::parse(&contents)?;
		schemas.insert(stem, schema);
	}
	Ok(schemas)
}
