use avro_core::resolution::{resolve_decode, resolve_decode_with};
use avro_core::{encode, DecodeOptions, Schema, Value};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

fn record(fields: &[(&str, Value)]) -> Value {
	let mut map = IndexMap::new();
	for (k, v) in fields {
		map.insert((*k).to_owned(), v.clone());
	}
	Value::Record(map)
}

#[test]
fn field_resolved_by_alias() {
	let writer: Schema = r#"
		{"type": "record", "name": "User", "fields": [{"name": "id", "type": "long"}]}
	"#
	.parse()
	.unwrap();
	let reader: Schema = r#"
		{"type": "record", "name": "User", "fields": [{"name": "user_id", "type": "long", "aliases": ["id"]}]}
	"#
	.parse()
	.unwrap();

	let mut bytes = Vec::new();
	encode(&record(&[("id", Value::Long(7))]), &writer, &mut bytes).unwrap();

	let decoded = resolve_decode(&mut &bytes[..], &writer, writer.root_key(), &reader, reader.root_key()).unwrap();
	assert_eq!(decoded, record(&[("user_id", Value::Long(7))]));
}

#[test]
fn int_promotes_to_double() {
	let writer: Schema = r#""int""#.parse().unwrap();
	let reader: Schema = r#""double""#.parse().unwrap();

	let mut bytes = Vec::new();
	encode(&Value::Int(42), &writer, &mut bytes).unwrap();

	let decoded = resolve_decode(&mut &bytes[..], &writer, writer.root_key(), &reader, reader.root_key()).unwrap();
	assert_eq!(decoded, Value::Double(42.0));
}

#[test]
fn incompatible_promotion_is_rejected() {
	let writer: Schema = r#""string""#.parse().unwrap();
	let reader: Schema = r#""long""#.parse().unwrap();
	let mut bytes = Vec::new();
	encode(&Value::from("x"), &writer, &mut bytes).unwrap();
	let err = resolve_decode(&mut &bytes[..], &writer, writer.root_key(), &reader, reader.root_key()).unwrap_err();
	assert!(err.to_string().contains("string"));
}

#[test]
fn unknown_writer_enum_symbol_falls_back_to_reader_default() {
	let writer: Schema = r#"{"type": "enum", "name": "Suit", "symbols": ["SPADES", "HEARTS"]}"#.parse().unwrap();
	let reader: Schema =
		r#"{"type": "enum", "name": "Suit", "symbols": ["SPADES"], "default": "SPADES"}"#.parse().unwrap();

	let mut bytes = Vec::new();
	encode(&Value::Enum("HEARTS".to_owned()), &writer, &mut bytes).unwrap();

	let decoded = resolve_decode(&mut &bytes[..], &writer, writer.root_key(), &reader, reader.root_key()).unwrap();
	assert_eq!(decoded, Value::Enum("SPADES".to_owned()));
}

#[test]
fn reader_field_without_writer_source_uses_default() {
	let writer: Schema = r#"{"type": "record", "name": "R", "fields": [{"name": "a", "type": "int"}]}"#.parse().unwrap();
	let reader: Schema = r#"
		{"type": "record", "name": "R", "fields": [
			{"name": "a", "type": "int"},
			{"name": "b", "type": "string", "default": "new"}
		]}
	"#
	.parse()
	.unwrap();

	let mut bytes = Vec::new();
	encode(&record(&[("a", Value::Int(1))]), &writer, &mut bytes).unwrap();

	let decoded = resolve_decode(&mut &bytes[..], &writer, writer.root_key(), &reader, reader.root_key()).unwrap();
	assert_eq!(decoded, record(&[("a", Value::Int(1)), ("b", Value::from("new"))]));
}

#[test]
fn writer_field_absent_from_reader_is_skipped() {
	let writer: Schema = r#"
		{"type": "record", "name": "R", "fields": [
			{"name": "a", "type": "int"},
			{"name": "extra", "type": "string"}
		]}
	"#
	.parse()
	.unwrap();
	let reader: Schema = r#"{"type": "record", "name": "R", "fields": [{"name": "a", "type": "int"}]}"#.parse().unwrap();

	let mut bytes = Vec::new();
	encode(&record(&[("a", Value::Int(5)), ("extra", Value::from("ignored"))]), &writer, &mut bytes).unwrap();

	let decoded = resolve_decode(&mut &bytes[..], &writer, writer.root_key(), &reader, reader.root_key()).unwrap();
	assert_eq!(decoded, record(&[("a", Value::Int(5))]));
}

#[test]
fn return_record_name_tags_record_selected_via_reader_union() {
	let writer: Schema = r#"
		{"type": "record", "name": "B", "fields": [{"name": "x", "type": "int"}]}
	"#
	.parse()
	.unwrap();
	let reader: Schema = r#"
		[
			{"type": "record", "name": "A", "fields": [{"name": "x", "type": "int"}]},
			{"type": "record", "name": "B", "fields": [{"name": "x", "type": "int"}]}
		]
	"#
	.parse()
	.unwrap();

	let mut bytes = Vec::new();
	encode(&record(&[("x", Value::Int(1))]), &writer, &mut bytes).unwrap();

	let opts = DecodeOptions { return_record_name: true, ..Default::default() };
	let decoded =
		resolve_decode_with(&mut &bytes[..], &writer, writer.root_key(), &reader, reader.root_key(), &opts).unwrap();
	let Value::Record(fields) = decoded else { panic!("expected record") };
	assert_eq!(fields.get(Value::RECORD_NAME_KEY).unwrap(), &Value::from("B"));
}

#[test]
fn nullable_union_resolves_against_non_union_reader() {
	let writer: Schema = r#"["null", "long"]"#.parse().unwrap();
	let reader: Schema = r#""long""#.parse().unwrap();

	let mut bytes = Vec::new();
	encode(&Value::Long(9), &writer, &mut bytes).unwrap();
	let decoded = resolve_decode(&mut &bytes[..], &writer, writer.root_key(), &reader, reader.root_key()).unwrap();
	assert_eq!(decoded, Value::Long(9));
}
