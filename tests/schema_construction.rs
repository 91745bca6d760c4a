use avro_core::schema::{FingerprintKind, Schema};
use pretty_assertions::assert_eq;

#[test]
fn weather_record_canonical_form() {
	let schema: Schema = r#"
		{
			"type": "record",
			"name": "Weather",
			"namespace": "test",
			"doc": "A weather reading.",
			"fields": [
				{"name": "station", "type": "string"},
				{"name": "time", "type": "long"},
				{"name": "temp", "type": "int"}
			]
		}
	"#
	.parse()
	.unwrap();

	assert_eq!(
		schema.canonical_form(),
		r#"{"name":"test.Weather","type":"record","fields":[{"name":"station","type":"string"},{"name":"time","type":"long"},{"name":"temp","type":"int"}]}"#
	);
}

#[test]
fn canonical_form_strips_docs_and_aliases_and_order() {
	let with_extras: Schema = r#"
		{
			"type": "record",
			"name": "R",
			"doc": "ignored",
			"fields": [
				{"name": "a", "type": "int", "doc": "ignored", "default": 0, "aliases": ["old_a"]}
			]
		}
	"#
	.parse()
	.unwrap();
	let without_extras: Schema = r#"
		{"type": "record", "name": "R", "fields": [{"name": "a", "type": "int"}]}
	"#
	.parse()
	.unwrap();

	assert_eq!(with_extras.canonical_form(), without_extras.canonical_form());
	assert_eq!(
		with_extras.fingerprint(FingerprintKind::Rabin).as_rabin_u64(),
		without_extras.fingerprint(FingerprintKind::Rabin).as_rabin_u64()
	);
}

#[test]
fn canonical_form_drops_logical_type_annotations() {
	let plain: Schema = r#"{"type": "bytes"}"#.parse().unwrap();
	let decimal: Schema = r#"{"type": "bytes", "logicalType": "decimal", "precision": 4, "scale": 2}"#
		.parse()
		.unwrap();
	assert_eq!(plain.canonical_form(), decimal.canonical_form());
}

#[test]
fn self_referential_record_parses() {
	let schema: Schema = r#"
		{
			"type": "record",
			"name": "LinkedNode",
			"fields": [
				{"name": "value", "type": "long"},
				{"name": "next", "type": ["null", "LinkedNode"]}
			]
		}
	"#
	.parse()
	.unwrap();
	assert!(schema.named_type("LinkedNode").is_some());
}

#[test]
fn duplicate_named_type_is_rejected() {
	let err = r#"
		{
			"type": "record",
			"name": "Dup",
			"fields": [
				{"name": "a", "type": {"type": "enum", "name": "Dup", "symbols": ["X"]}}
			]
		}
	"#
	.parse::<Schema>()
	.unwrap_err();
	assert!(err.to_string().contains("duplicate"));
}

#[test]
fn decimal_precision_exceeding_fixed_size_is_rejected() {
	let err = r#"
		{"type": "fixed", "name": "Money", "size": 2, "logicalType": "decimal", "precision": 10, "scale": 0}
	"#
	.parse::<Schema>()
	.unwrap_err();
	assert!(err.to_string().contains("precision"));
}

#[test]
fn fingerprint_kinds_are_stable_across_parses() {
	let a: Schema = r#""long""#.parse().unwrap();
	let b: Schema = r#""long""#.parse().unwrap();
	assert_eq!(a.fingerprint(FingerprintKind::Rabin).as_rabin_u64(), b.fingerprint(FingerprintKind::Rabin).as_rabin_u64());
	assert_eq!(a.fingerprint(FingerprintKind::Md5).as_bytes(), b.fingerprint(FingerprintKind::Md5).as_bytes());
	assert_eq!(a.fingerprint(FingerprintKind::Sha256).as_bytes(), b.fingerprint(FingerprintKind::Sha256).as_bytes());
}
