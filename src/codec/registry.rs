//! Registration point for codecs the built-in [`super::Codec`] set doesn't
//! know about (spec §4.7). Process-wide, per spec §9 design notes ("Global
//! registries"): register custom codecs once at startup, before any
//! concurrent encoding/decoding begins.

use crate::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// A pair of compress/decompress hooks for a custom codec
pub trait CodecHooks: Send + Sync {
	/// Compress a whole container file block
	fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;
	/// Decompress a whole container file block
	fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

impl<C, D> CodecHooks for (C, D)
where
	C: Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync,
	D: Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync,
{
	fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
		(self.0)(data)
	}
	fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
		(self.1)(data)
	}
}

fn registry() -> &'static RwLock<HashMap<String, Arc<dyn CodecHooks>>> {
	static REGISTRY: OnceLock<RwLock<HashMap<String, Arc<dyn CodecHooks>>>> = OnceLock::new();
	REGISTRY.get_or_init(Default::default)
}

/// Register a codec under `name`, given its compress/decompress hooks, for
/// every subsequent `Codec::Custom(name)` use in this process.
pub fn register(
	name: impl Into<String>,
	compress: impl Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync + 'static,
	decompress: impl Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync + 'static,
) {
	registry()
		.write()
		.expect("codec registry poisoned")
		.insert(name.into(), Arc::new((compress, decompress)));
}

pub(crate) fn custom(name: &str) -> Option<Arc<dyn CodecHooks>> {
	registry().read().expect("codec registry poisoned").get(name).cloned()
}
