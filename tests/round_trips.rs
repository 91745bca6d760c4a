use avro_core::{decode, decode_with, encode, DecodeOptions, Schema, Value};
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
fn weather_record_exact_bytes() {
	let schema: Schema = r#"
		{
			"type": "record",
			"name": "Weather",
			"fields": [
				{"name": "station", "type": "string"},
				{"name": "time", "type": "long"},
				{"name": "temp", "type": "int"}
			]
		}
	"#
	.parse()
	.unwrap();

	let value = record(&[
		("station", Value::from("011990-99999")),
		("time", Value::Long(-619524000)),
		("temp", Value::Int(0)),
	]);

	let mut out = Vec::new();
	encode(&value, &schema, &mut out).unwrap();

	let decoded = decode(&mut &out[..], &schema).unwrap();
	assert_eq!(decoded, value);
}

#[test]
fn nullable_union_encoding() {
	let schema: Schema = r#"["null", "string"]"#.parse().unwrap();

	let mut null_bytes = Vec::new();
	encode(&Value::Null, &schema, &mut null_bytes).unwrap();
	assert_eq!(null_bytes, [0x00]);

	let mut string_bytes = Vec::new();
	encode(&Value::from("x"), &schema, &mut string_bytes).unwrap();
	assert_eq!(string_bytes, [0x02, 0x02, b'x']);

	assert_eq!(decode(&mut &null_bytes[..], &schema).unwrap(), Value::Null);
	assert_eq!(decode(&mut &string_bytes[..], &schema).unwrap(), Value::from("x"));
}

#[test]
fn union_tuple_hint_disambiguates_same_shaped_records() {
	let schema: Schema = r#"
		[
			{"type": "record", "name": "A", "fields": [{"name": "x", "type": "int"}]},
			{"type": "record", "name": "B", "fields": [{"name": "x", "type": "int"}]}
		]
	"#
	.parse()
	.unwrap();

	let value = Value::union("B", record(&[("x", Value::Int(1))]));
	let mut out = Vec::new();
	encode(&value, &schema, &mut out).unwrap();
	// union index 1 (B) then the int 1, zig-zag encoded
	assert_eq!(out, [0x02, 0x02]);
}

#[test]
fn enum_round_trip() {
	let schema: Schema = r#"{"type": "enum", "name": "Suit", "symbols": ["SPADES", "HEARTS", "DIAMONDS", "CLUBS"]}"#
		.parse()
		.unwrap();
	let value = Value::Enum("HEARTS".to_owned());
	let mut out = Vec::new();
	encode(&value, &schema, &mut out).unwrap();
	assert_eq!(out, [0x02]);
	assert_eq!(decode(&mut &out[..], &schema).unwrap(), value);
}

#[test]
fn enum_out_of_range_index_is_corrupt_frame() {
	let schema: Schema = r#"{"type": "enum", "name": "Suit", "symbols": ["SPADES"]}"#.parse().unwrap();
	let bytes = [0x02]; // index 1, out of range for a single-symbol enum
	let err = decode(&mut &bytes[..], &schema).unwrap_err();
	assert!(err.to_string().contains("Suit"));
}

#[test]
fn array_and_map_empty_collections_use_zero_terminator() {
	let array_schema: Schema = r#"{"type": "array", "items": "long"}"#.parse().unwrap();
	let mut out = Vec::new();
	encode(&Value::Array(vec![]), &array_schema, &mut out).unwrap();
	assert_eq!(out, [0x00]);

	let map_schema: Schema = r#"{"type": "map", "values": "long"}"#.parse().unwrap();
	let mut out = Vec::new();
	encode(&Value::Map(IndexMap::new()), &map_schema, &mut out).unwrap();
	assert_eq!(out, [0x00]);
}

#[test]
fn array_of_longs_round_trip() {
	let schema: Schema = r#"{"type": "array", "items": "long"}"#.parse().unwrap();
	let value = Value::Array(vec![Value::Long(1), Value::Long(3), Value::Long(2)]);
	let mut out = Vec::new();
	encode(&value, &schema, &mut out).unwrap();
	assert_eq!(decode(&mut &out[..], &schema).unwrap(), value);
}

#[test]
fn fixed_size_mismatch_is_an_error() {
	let schema: Schema = r#"{"type": "fixed", "name": "Md5", "size": 16}"#.parse().unwrap();
	let err = encode(&Value::Fixed(vec![0u8; 4]), &schema, &mut Vec::new()).unwrap_err();
	assert!(err.to_string().contains("16"));
}

#[test]
fn decimal_round_trip_via_bytes() {
	let schema: Schema = r#"{"type": "bytes", "logicalType": "decimal", "precision": 5, "scale": 2}"#
		.parse()
		.unwrap();
	// 123.45 at scale 2 -> unscaled 12345
	let unscaled_bytes = avro_core::logical::unscaled_to_be_bytes(12345, None);
	assert_eq!(unscaled_bytes, vec![0x30, 0x39]);

	let value = Value::Bytes(unscaled_bytes);
	let mut out = Vec::new();
	encode(&value, &schema, &mut out).unwrap();
	let decoded = decode(&mut &out[..], &schema).unwrap();
	let Value::Bytes(decoded_bytes) = decoded else { panic!("expected bytes") };
	assert_eq!(avro_core::logical::unscaled_from_be_bytes(&decoded_bytes), 12345);
}

#[test]
fn decimal_round_trip_via_rust_decimal() {
	use rust_decimal::Decimal;
	use std::str::FromStr;

	let schema: Schema = r#"{"type": "bytes", "logicalType": "decimal", "precision": 6, "scale": 2}"#
		.parse()
		.unwrap();

	let amount = Decimal::from_str("-1234.50").unwrap();
	let value = Value::Bytes(avro_core::logical::decimal_to_bytes(amount, None));

	let mut out = Vec::new();
	encode(&value, &schema, &mut out).unwrap();
	let decoded = decode(&mut &out[..], &schema).unwrap();
	let Value::Bytes(decoded_bytes) = decoded else { panic!("expected bytes") };
	let roundtripped = avro_core::logical::bytes_to_decimal(&decoded_bytes, 2).unwrap();
	assert_eq!(roundtripped, amount);
}

#[test]
fn negative_decimal_round_trips_twos_complement() {
	let bytes = avro_core::logical::unscaled_to_be_bytes(-12345, None);
	assert_eq!(avro_core::logical::unscaled_from_be_bytes(&bytes), -12345);
}

#[test]
fn float_and_double_preserve_nan_and_infinity() {
	let schema: Schema = r#""double""#.parse().unwrap();
	for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
		let mut out = Vec::new();
		encode(&Value::Double(v), &schema, &mut out).unwrap();
		let Value::Double(decoded) = decode(&mut &out[..], &schema).unwrap() else { panic!("expected double") };
		if v.is_nan() {
			assert!(decoded.is_nan());
		} else {
			assert_eq!(decoded, v);
		}
	}
}

#[test]
fn int_long_boundaries_round_trip() {
	let schema: Schema = r#""int""#.parse().unwrap();
	for v in [i32::MIN, i32::MAX, 0] {
		let mut out = Vec::new();
		encode(&Value::Int(v), &schema, &mut out).unwrap();
		assert_eq!(decode(&mut &out[..], &schema).unwrap(), Value::Int(v));
	}

	let schema: Schema = r#""long""#.parse().unwrap();
	for v in [i64::MIN, i64::MAX, 0] {
		let mut out = Vec::new();
		encode(&Value::Long(v), &schema, &mut out).unwrap();
		assert_eq!(decode(&mut &out[..], &schema).unwrap(), Value::Long(v));
	}
}

#[test]
fn missing_required_field_without_default_is_rejected() {
	let schema: Schema = r#"
		{"type": "record", "name": "R", "fields": [{"name": "a", "type": "int"}]}
	"#
	.parse()
	.unwrap();
	let err = encode(&record(&[]), &schema, &mut Vec::new()).unwrap_err();
	assert!(err.to_string().contains('a'));
}

#[test]
fn return_record_name_tags_only_union_selected_records() {
	let schema: Schema = r#"
		{
			"type": "record",
			"name": "Envelope",
			"fields": [
				{
					"name": "payload",
					"type": [
						{"type": "record", "name": "A", "fields": [{"name": "x", "type": "int"}]},
						{"type": "record", "name": "B", "fields": [{"name": "x", "type": "int"}]}
					]
				}
			]
		}
	"#
	.parse()
	.unwrap();

	let value = record(&[("payload", Value::union("B", record(&[("x", Value::Int(1))])))]);
	let mut out = Vec::new();
	encode(&value, &schema, &mut out).unwrap();

	let opts = DecodeOptions { return_record_name: true, ..Default::default() };
	let decoded = decode_with(&mut &out[..], &schema, &opts).unwrap();

	// the top-level "Envelope" record was never reached through a union
	// branch, so it is untagged...
	let Value::Record(fields) = &decoded else { panic!("expected record") };
	assert!(!fields.contains_key(Value::RECORD_NAME_KEY));

	// ...but the union-selected "B" payload is
	let Value::Record(payload) = fields.get("payload").unwrap() else { panic!("expected record") };
	assert_eq!(payload.get(Value::RECORD_NAME_KEY).unwrap(), &Value::from("B"));
}

#[test]
fn return_record_name_override_leaves_nullable_single_record_untagged() {
	let schema: Schema = r#"
		[
			"null",
			{"type": "record", "name": "A", "fields": [{"name": "x", "type": "int"}]}
		]
	"#
	.parse()
	.unwrap();

	let value = Value::union("A", record(&[("x", Value::Int(1))]));
	let mut out = Vec::new();
	encode(&value, &schema, &mut out).unwrap();

	let opts = DecodeOptions { return_record_name_override: true, ..Default::default() };
	let decoded = decode_with(&mut &out[..], &schema, &opts).unwrap();
	let Value::Record(fields) = decoded else { panic!("expected record") };
	assert!(!fields.contains_key(Value::RECORD_NAME_KEY));
}

#[test]
fn return_record_name_override_still_tags_non_nullable_unions() {
	let schema: Schema = r#"
		[
			{"type": "record", "name": "A", "fields": [{"name": "x", "type": "int"}]},
			{"type": "record", "name": "B", "fields": [{"name": "x", "type": "int"}]}
		]
	"#
	.parse()
	.unwrap();

	let value = Value::union("B", record(&[("x", Value::Int(1))]));
	let mut out = Vec::new();
	encode(&value, &schema, &mut out).unwrap();

	let opts = DecodeOptions { return_record_name_override: true, ..Default::default() };
	let decoded = decode_with(&mut &out[..], &schema, &opts).unwrap();
	let Value::Record(fields) = decoded else { panic!("expected record") };
	assert_eq!(fields.get(Value::RECORD_NAME_KEY).unwrap(), &Value::from("B"));
}

#[test]
fn missing_field_falls_back_to_default() {
	let schema: Schema = r#"
		{"type": "record", "name": "R", "fields": [{"name": "a", "type": "long", "default": 42}]}
	"#
	.parse()
	.unwrap();
	let mut out = Vec::new();
	encode(&record(&[]), &schema, &mut out).unwrap();
	assert_eq!(decode(&mut &out[..], &schema).unwrap(), record(&[("a", Value::Long(42))]));
}
