/// A fully qualified Avro name: `"<namespace>.<name>"`.
///
/// Every named type (`record`, `enum`, `fixed`) carries one of these. An
/// unqualified name written in the schema JSON inherits the enclosing
/// namespace at the point it was declared.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Name {
	fully_qualified_name: String,
	namespace_delimiter_idx: Option<usize>,
}

impl std::fmt::Debug for Name {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Debug::fmt(&self.fully_qualified_name, f)
	}
}

impl std::fmt::Display for Name {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.fully_qualified_name)
	}
}

impl Name {
	/// The rightmost component of the fully qualified name (e.g. in `a.b.c`,
	/// it's `c`)
	pub fn name(&self) -> &str {
		match self.namespace_delimiter_idx {
			None => &self.fully_qualified_name,
			Some(idx) => &self.fully_qualified_name[idx + 1..],
		}
	}

	/// The namespace component (e.g. in `a.b.c`, it's `a.b`)
	pub fn namespace(&self) -> Option<&str> {
		self.namespace_delimiter_idx
			.map(|idx| &self.fully_qualified_name[..idx])
	}

	/// The fully qualified name (e.g. `a.b.c`)
	pub fn fully_qualified_name(&self) -> &str {
		&self.fully_qualified_name
	}

	/// Build a [`Name`] by joining a namespace and an unqualified name
	pub fn new(namespace: Option<&str>, name: &str) -> Self {
		match namespace {
			None => Name {
				fully_qualified_name: name.to_owned(),
				namespace_delimiter_idx: None,
			},
			Some(namespace) => Name {
				fully_qualified_name: format!("{namespace}.{name}"),
				namespace_delimiter_idx: Some(namespace.len()),
			},
		}
	}

	/// Build a [`Name`] from an already-fully-qualified name
	pub fn from_fully_qualified_name(fully_qualified_name: impl Into<String>) -> Self {
		let fully_qualified_name = fully_qualified_name.into();
		let namespace_delimiter_idx = fully_qualified_name.rfind('.');
		Name {
			fully_qualified_name,
			namespace_delimiter_idx,
		}
	}

	/// Split a (possibly dotted) reference string into `(namespace, name)`,
	/// falling back to `enclosing_namespace` when the reference carries none.
	pub(crate) fn resolve_reference<'a>(
		reference: &'a str,
		enclosing_namespace: Option<&'a str>,
	) -> (Option<&'a str>, &'a str) {
		match reference.rsplit_once('.') {
			Some((namespace, name)) => (Some(namespace).filter(|s| !s.is_empty()), name),
			None => (enclosing_namespace, reference),
		}
	}
}
