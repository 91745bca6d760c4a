//! Logical type registry: converting between a [`Value`] and the richer Rust
//! types logical type annotations imply (spec §6).
//!
//! The built-in transforms here cover every logical type in
//! [`crate::schema::LogicalType`]. Applications can layer custom handling on
//! top by calling [`register_writer`]/[`register_reader`] for `Unknown`
//! logical type names. Per spec §9 design notes ("Global registries"), this
//! registry is process-wide: populate it during startup and treat it as
//! frozen once encoding/decoding starts concurrently — registering mid-stream
//! is not guaranteed to be visible to in-flight calls.

use crate::error::{AvroError, ErrorKind, Result};
use crate::schema::{Decimal, LogicalType};
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal as RustDecimal;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};
use uuid::Uuid;

/// A writer-side hook: turn an application value into the [`Value`] that
/// will actually be encoded against the base type.
pub type WriterHook = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;
/// A reader-side hook: turn a just-decoded base [`Value`] into the richer
/// value applications should see.
pub type ReaderHook = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

fn writers() -> &'static RwLock<HashMap<String, WriterHook>> {
	static WRITERS: OnceLock<RwLock<HashMap<String, WriterHook>>> = OnceLock::new();
	WRITERS.get_or_init(Default::default)
}

fn readers() -> &'static RwLock<HashMap<String, ReaderHook>> {
	static READERS: OnceLock<RwLock<HashMap<String, ReaderHook>>> = OnceLock::new();
	READERS.get_or_init(Default::default)
}

/// Register a writer-side hook for a logical type name, process-wide.
pub fn register_writer(logical_type: impl Into<String>, hook: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static) {
	writers()
		.write()
		.expect("logical type writer registry poisoned")
		.insert(logical_type.into(), Arc::new(hook));
}

/// Register a reader-side hook for a logical type name, process-wide.
pub fn register_reader(logical_type: impl Into<String>, hook: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static) {
	readers()
		.write()
		.expect("logical type reader registry poisoned")
		.insert(logical_type.into(), Arc::new(hook));
}

fn custom_writer(name: &str) -> Option<WriterHook> {
	writers().read().expect("logical type writer registry poisoned").get(name).cloned()
}

fn custom_reader(name: &str) -> Option<ReaderHook> {
	readers().read().expect("logical type reader registry poisoned").get(name).cloned()
}

fn err(msg: impl Into<String>) -> AvroError {
	AvroError::new(ErrorKind::ValueMismatch, msg.into())
}

/// Turn an application-facing value into the base-typed [`Value`] that will
/// be passed to the encoder, applying any built-in transform for `logical`.
/// Unknown logical types are left untouched (the base value is encoded
/// as-is) unless a custom writer hook is registered.
pub fn prepare_for_encoding(value: &Value, logical: &LogicalType) -> Result<Value> {
	match logical {
		LogicalType::Decimal(d) => decimal_to_value(value, *d),
		LogicalType::Uuid => match value {
			Value::String(_) => Ok(value.clone()),
			other => Err(err(format!("uuid logical type expects a string value, found {other:?}"))),
		},
		LogicalType::Date => match value {
			Value::Int(_) => Ok(value.clone()),
			other => date_to_days(other),
		},
		LogicalType::TimeMillis => match value {
			Value::Int(_) => Ok(value.clone()),
			other => Err(err(format!("time-millis expects an int value, found {other:?}"))),
		},
		LogicalType::TimeMicros => match value {
			Value::Long(_) => Ok(value.clone()),
			other => Err(err(format!("time-micros expects a long value, found {other:?}"))),
		},
		LogicalType::TimestampMillis
		| LogicalType::TimestampMicros
		| LogicalType::LocalTimestampMillis
		| LogicalType::LocalTimestampMicros => match value {
			Value::Long(_) => Ok(value.clone()),
			other => Err(err(format!("timestamp logical type expects a long value, found {other:?}"))),
		},
		LogicalType::Unknown(name) => match custom_writer(name) {
			Some(hook) => hook(value),
			None => {
				tracing::trace!(logical_type = %name, "no registered writer hook; encoding the base value unchanged");
				Ok(value.clone())
			}
		},
	}
}

/// Turn a just-decoded base [`Value`] into the richer application value, for
/// logical types whose natural Rust representation differs from the base
/// type (currently just `uuid`, which is validated as a well-formed UUID
/// string). Other built-in logical types are returned unchanged: callers
/// that want `chrono`/`rust_decimal` types reconstruct them from the plain
/// int/long/bytes value using [`days_to_date`], [`bytes_to_decimal`], and
/// friends.
pub fn finalize_after_decoding(value: Value, logical: &LogicalType) -> Result<Value> {
	match logical {
		LogicalType::Uuid => match &value {
			Value::String(s) => {
				Uuid::parse_str(s).map_err(|e| AvroError::with_source(ErrorKind::ValueMismatch, "invalid uuid", e))?;
				Ok(value)
			}
			_ => Ok(value),
		},
		LogicalType::Unknown(name) => match custom_reader(name) {
			Some(hook) => hook(&value),
			None => {
				tracing::trace!(logical_type = %name, "no registered reader hook; returning the base value unchanged");
				Ok(value)
			}
		},
		_ => Ok(value),
	}
}

/// Convert an unscaled decimal magnitude into the two's-complement
/// `bytes`/`fixed` encoding `decimal` uses on the wire. Exposed for
/// applications building a `Value::Bytes`/`Value::Fixed` from a
/// `rust_decimal::Decimal` by hand.
pub fn unscaled_to_be_bytes(unscaled: i128, min_len: Option<usize>) -> Vec<u8> {
	let mut bytes = unscaled.to_be_bytes().to_vec();
	// Strip redundant leading sign-extension bytes, but keep at least one.
	while bytes.len() > 1
		&& ((bytes[0] == 0x00 && bytes[1] & 0x80 == 0) || (bytes[0] == 0xff && bytes[1] & 0x80 != 0))
	{
		bytes.remove(0);
	}
	if let Some(min_len) = min_len {
		if bytes.len() < min_len {
			let pad = if bytes[0] & 0x80 != 0 { 0xffu8 } else { 0x00 };
			let mut padded = vec![pad; min_len - bytes.len()];
			padded.extend_from_slice(&bytes);
			bytes = padded;
		}
	}
	bytes
}

/// Inverse of [`unscaled_to_be_bytes`]: read a two's-complement big-endian
/// byte string back into an `i128` unscaled value.
pub fn unscaled_from_be_bytes(bytes: &[u8]) -> i128 {
	let negative = bytes.first().is_some_and(|b| b & 0x80 != 0);
	let mut buf = [if negative { 0xffu8 } else { 0 }; 16];
	let start = 16 - bytes.len();
	buf[start.min(16)..].copy_from_slice(&bytes[bytes.len().saturating_sub(16)..]);
	i128::from_be_bytes(buf)
}

fn decimal_to_value(value: &Value, _decimal: Decimal) -> Result<Value> {
	match value {
		Value::Bytes(_) | Value::Fixed(_) => Ok(value.clone()),
		other => Err(err(format!(
			"decimal logical type expects a bytes or fixed value, found {other:?}"
		))),
	}
}

/// Reconstruct a `rust_decimal::Decimal` from a decoded `decimal` logical
/// type's unscaled big-endian two's-complement bytes and the schema's scale,
/// the way the teacher turns the same bytes into a `Decimal` via
/// `try_from_i128_with_scale`.
pub fn bytes_to_decimal(bytes: &[u8], scale: u32) -> Result<RustDecimal> {
	let unscaled = unscaled_from_be_bytes(bytes);
	RustDecimal::try_from_i128_with_scale(unscaled, scale)
		.map_err(|e| AvroError::with_source(ErrorKind::ValueMismatch, "decimal out of range for rust_decimal", e))
}

/// Inverse of [`bytes_to_decimal`]: turn a `rust_decimal::Decimal` into the
/// unscaled two's-complement bytes the `decimal` logical type uses on the
/// wire, padded to at least `min_len` bytes (required for a `fixed` base
/// type).
pub fn decimal_to_bytes(decimal: RustDecimal, min_len: Option<usize>) -> Vec<u8> {
	unscaled_to_be_bytes(decimal.mantissa(), min_len)
}

fn date_to_days(value: &Value) -> Result<Value> {
	match value {
		Value::String(s) => {
			let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
				.map_err(|e| AvroError::with_source(ErrorKind::ValueMismatch, "invalid date", e))?;
			let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch date");
			Ok(Value::Int((date - epoch).num_days() as i32))
		}
		other => Err(err(format!("date logical type expects an int or date string, found {other:?}"))),
	}
}

/// Reconstruct a `chrono::NaiveDate` from a decoded `date` (`int` days since
/// the epoch).
pub fn days_to_date(days: i32) -> NaiveDate {
	NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch date") + chrono::Duration::days(days as i64)
}

/// Reconstruct a UTC `chrono::DateTime` from a decoded `timestamp-millis`.
pub fn millis_to_timestamp(millis: i64) -> Result<DateTime<Utc>> {
	DateTime::from_timestamp_millis(millis).ok_or_else(|| err("timestamp-millis value out of range"))
}

/// Reconstruct a UTC `chrono::DateTime` from a decoded `timestamp-micros`.
pub fn micros_to_timestamp(micros: i64) -> Result<DateTime<Utc>> {
	DateTime::from_timestamp_micros(micros).ok_or_else(|| err("timestamp-micros value out of range"))
}

/// Reconstruct a naive (no-timezone) `chrono::NaiveDateTime` from a decoded
/// `local-timestamp-millis`.
pub fn millis_to_local_timestamp(millis: i64) -> Result<NaiveDateTime> {
	DateTime::from_timestamp_millis(millis)
		.map(|dt| dt.naive_utc())
		.ok_or_else(|| err("local-timestamp-millis value out of range"))
}

/// Reconstruct a naive (no-timezone) `chrono::NaiveDateTime` from a decoded
/// `local-timestamp-micros`.
pub fn micros_to_local_timestamp(micros: i64) -> Result<NaiveDateTime> {
	DateTime::from_timestamp_micros(micros)
		.map(|dt| dt.naive_utc())
		.ok_or_else(|| err("local-timestamp-micros value out of range"))
}
