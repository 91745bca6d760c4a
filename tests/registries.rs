use avro_core::{codec, decode, encode, logical, Schema, Value};

#[test]
fn custom_logical_type_hooks_round_trip() {
	logical::register_writer("money-cents", |v| match v {
		Value::Long(cents) => Ok(Value::Long(*cents)),
		other => Err(avro_core::AvroError::custom(format!("expected a long, found {other:?}"))),
	});
	logical::register_reader("money-cents", |v| Ok(v.clone()));

	let schema: Schema = r#"{"type": "long", "logicalType": "money-cents"}"#.parse().unwrap();
	let mut out = Vec::new();
	encode(&Value::Long(4999), &schema, &mut out).unwrap();
	assert_eq!(decode(&mut &out[..], &schema).unwrap(), Value::Long(4999));
}

#[test]
fn custom_codec_round_trips_through_the_global_registry() {
	codec::register(
		"reverse",
		|data: &[u8]| Ok(data.iter().rev().copied().collect()),
		|data: &[u8]| Ok(data.iter().rev().copied().collect()),
	);

	let schema: Schema = r#""string""#.parse().unwrap();
	let mut file = Vec::new();
	let mut writer = avro_core::container::WriterBuilder::new(&schema)
		.codec(avro_core::codec::Codec::Custom("reverse".to_owned()))
		.build(&mut file)
		.unwrap();
	writer.append(&Value::from("hello")).unwrap();
	writer.into_inner().unwrap();

	let reader = avro_core::container::Reader::from_reader(&file[..]).unwrap();
	let decoded: Vec<Value> = reader.map(Result::unwrap).collect();
	assert_eq!(decoded, vec![Value::from("hello")]);
}
