//! The error taxonomy this crate publishes (spec §7)

use std::borrow::Cow;

/// The kind of failure that occurred.
///
/// This is the taxonomy described in the Avro core's error handling design:
/// every error the crate returns is tagged with one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
	/// Malformed schema tree (missing `name`, duplicate definition, invalid
	/// decimal precision/scale, non-list aliases, ...)
	SchemaParse,
	/// A name reference with no definition
	UnknownType,
	/// A value fails structural validation against its schema
	ValueMismatch,
	/// No branch of a union accepts the value
	UnionMatch,
	/// Reader/writer schemas are incompatible at a specific position
	SchemaResolution,
	/// Requested codec has no registered implementation
	CodecUnavailable,
	/// Missing magic, wrong sync marker, truncated block
	CorruptFrame,
	/// Byte source exhausted mid-value
	Eof,
	/// String content is not valid UTF-8 (under strict mode)
	InvalidUtf8,
	/// Failure while reading/writing the underlying byte source
	Io,
	/// Raised by a user-supplied logical type or codec hook
	Custom,
}

impl std::fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			ErrorKind::SchemaParse => "schema parse error",
			ErrorKind::UnknownType => "unknown type reference",
			ErrorKind::ValueMismatch => "value does not match schema",
			ErrorKind::UnionMatch => "no union branch accepts the value",
			ErrorKind::SchemaResolution => "reader/writer schema resolution failure",
			ErrorKind::CodecUnavailable => "codec unavailable",
			ErrorKind::CorruptFrame => "corrupt container file frame",
			ErrorKind::Eof => "unexpected end of input",
			ErrorKind::InvalidUtf8 => "invalid utf-8 in string content",
			ErrorKind::Io => "io error",
			ErrorKind::Custom => "custom hook error",
		};
		f.write_str(s)
	}
}

/// One segment of the path from the root of a schema to the position an error
/// occurred at.
#[derive(Debug, Clone)]
pub enum PathSegment {
	/// Stepped into a record field by name
	Field(String),
	/// Stepped into an array/map element at this index
	Index(usize),
	/// Stepped into a union, having selected this branch
	UnionBranch(String),
	/// Stepped into a map entry by key
	MapKey(String),
}

impl std::fmt::Display for PathSegment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			PathSegment::Field(name) => write!(f, ".{name}"),
			PathSegment::Index(idx) => write!(f, "[{idx}]"),
			PathSegment::UnionBranch(name) => write!(f, "<{name}>"),
			PathSegment::MapKey(key) => write!(f, "{{{key}}}"),
		}
	}
}

/// Any error that may happen while parsing schemas, validating values,
/// encoding, decoding, resolving schemas, or reading/writing container files.
pub struct AvroError {
	inner: Box<ErrorInner>,
}

impl std::error::Error for AvroError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.inner
			.source
			.as_deref()
			.map(|e| e as &(dyn std::error::Error + 'static))
	}
}

struct ErrorInner {
	kind: ErrorKind,
	message: Cow<'static, str>,
	path: Vec<PathSegment>,
	source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl AvroError {
	/// Build an error from a user-supplied logical type or codec hook
	/// (registered through [`crate::logical::register_writer`],
	/// [`crate::logical::register_reader`], or [`crate::codec::register`]).
	pub fn custom(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::Custom, message.into())
	}

	/// The category this error belongs to
	pub fn kind(&self) -> ErrorKind {
		self.inner.kind
	}

	/// The path, from the schema root, to the position this error occurred at
	pub fn path(&self) -> &[PathSegment] {
		&self.inner.path
	}

	pub(crate) fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
		Self {
			inner: Box::new(ErrorInner {
				kind,
				message: message.into(),
				path: Vec::new(),
				source: None,
			}),
		}
	}

	pub(crate) fn msg(kind: ErrorKind, args: std::fmt::Arguments<'_>) -> Self {
		Self::new(kind, args.to_string())
	}

	pub(crate) fn with_source(
		kind: ErrorKind,
		message: impl Into<Cow<'static, str>>,
		source: impl std::error::Error + Send + Sync + 'static,
	) -> Self {
		Self {
			inner: Box::new(ErrorInner {
				kind,
				message: message.into(),
				path: Vec::new(),
				source: Some(Box::new(source)),
			}),
		}
	}

	pub(crate) fn io(source: std::io::Error) -> Self {
		Self::with_source(ErrorKind::Io, "io error", source)
	}

	pub(crate) fn eof() -> Self {
		Self::new(ErrorKind::Eof, "unexpected end of input while decoding")
	}

	/// Prepend a path segment (innermost-first as constructed; reversed on
	/// display), used while unwinding out of recursive encode/decode/validate
	/// calls so the final path reads root-to-leaf.
	pub(crate) fn push_path(mut self, segment: PathSegment) -> Self {
		self.inner.path.push(segment);
		self
	}
}

impl std::fmt::Display for AvroError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.inner.kind, self.inner.message)?;
		if !self.inner.path.is_empty() {
			write!(f, " (at $")?;
			for segment in self.inner.path.iter().rev() {
				write!(f, "{segment}")?;
			}
			write!(f, ")")?;
		}
		Ok(())
	}
}

impl std::fmt::Debug for AvroError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Display::fmt(self, f)
	}
}

/// Convenient alias for this crate's `Result`
pub type Result<T, E = AvroError> = std::result::Result<T, E>;
