use avro_core::single_object::{decode_single_object, encode_single_object, MARKER};
use avro_core::{Schema, Value};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

const SCHEMA_STR: &str = r#"
	{
		"type": "record",
		"name": "TestSingleObject",
		"fields": [
			{"name": "a", "type": "long"},
			{"name": "b", "type": "double"},
			{"name": "c", "type": {"type": "array", "items": "string"}}
		]
	}
"#;

fn sample_value() -> Value {
	let mut fields = IndexMap::new();
	fields.insert("a".to_owned(), Value::Long(1));
	fields.insert("b".to_owned(), Value::Double(2.0));
	fields.insert("c".to_owned(), Value::Array(vec![Value::from("foo"), Value::from("bar")]));
	Value::Record(fields)
}

#[test]
fn marker_and_fingerprint_round_trip() {
	let schema: Schema = SCHEMA_STR.parse().unwrap();
	let value = sample_value();

	let mut out = Vec::new();
	encode_single_object(&value, &schema, &mut out).unwrap();

	assert_eq!(&out[..2], &MARKER);
	let decoded = decode_single_object(&mut &out[..], &schema).unwrap();
	assert_eq!(decoded, value);
}

#[test]
fn missing_marker_is_rejected() {
	let schema: Schema = SCHEMA_STR.parse().unwrap();
	let garbage = [0u8; 10];
	let err = decode_single_object(&mut &garbage[..], &schema).unwrap_err();
	assert!(err.to_string().contains("marker"));
}

#[test]
fn fingerprint_mismatch_is_rejected() {
	let schema: Schema = SCHEMA_STR.parse().unwrap();
	let other_schema: Schema = r#"{"type": "record", "name": "Other", "fields": [{"name": "x", "type": "int"}]}"#
		.parse()
		.unwrap();

	let mut out = Vec::new();
	encode_single_object(&sample_value(), &schema, &mut out).unwrap();

	let err = decode_single_object(&mut &out[..], &other_schema).unwrap_err();
	assert!(err.to_string().contains("fingerprint"));
}
