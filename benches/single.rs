//! Benches encode/decode of a single datum against a small and a "big"
//! record schema, the way the teacher's own single-value benches compared
//! small vs. big schemas.

#![allow(missing_docs)]

use avro_core::{decode, encode, Schema, Value};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use indexmap::IndexMap;

const RAW_SMALL_SCHEMA: &str = r#"
{
	"namespace": "test",
	"type": "record",
	"name": "Test",
	"fields": [
		{
			"type": "string",
			"name": "field"
		}
	]
}
"#;

const RAW_BIG_SCHEMA: &str = r#"
{
	"namespace": "my.example",
	"type": "record",
	"name": "userInfo",
	"fields": [
		{
			"default": "NONE",
			"type": "string",
			"name": "username"
		},
		{
			"default": -1,
			"type": "int",
			"name": "age"
		},
		{
			"default": "NONE",
			"type": "string",
			"name": "phone"
		},
		{
			"default": "NONE",
			"type": "string",
			"name": "housenum"
		},
		{
			"default": {},
			"type": {
				"fields": [
					{
						"default": "NONE",
						"type": "string",
						"name": "street"
					},
					{
						"default": "NONE",
						"type": "string",
						"name": "city"
					},
					{
						"default": "NONE",
						"type": "string",
						"name": "state_prov"
					},
					{
						"default": "NONE",
						"type": "string",
						"name": "country"
					},
					{
						"default": "NONE",
						"type": "string",
						"name": "zip"
					}
				],
				"type": "record",
				"name": "mailing_address"
			},
			"name": "address"
		}
	]
}
"#;

fn small_record() -> Value {
	let mut fields = IndexMap::new();
	fields.insert("field".to_owned(), Value::from("foo"));
	Value::Record(fields)
}

fn big_record() -> Value {
	let mut address = IndexMap::new();
	address.insert("street".to_owned(), Value::from("street"));
	address.insert("city".to_owned(), Value::from("city"));
	address.insert("state_prov".to_owned(), Value::from("state_prov"));
	address.insert("country".to_owned(), Value::from("country"));
	address.insert("zip".to_owned(), Value::from("zip"));

	let mut fields = IndexMap::new();
	fields.insert("username".to_owned(), Value::from("username"));
	fields.insert("age".to_owned(), Value::Int(10));
	fields.insert("phone".to_owned(), Value::from("000000000"));
	fields.insert("housenum".to_owned(), Value::from("0000"));
	fields.insert("address".to_owned(), Value::Record(address));
	Value::Record(fields)
}

fn bench_small_schema(c: &mut Criterion) {
	let schema: Schema = RAW_SMALL_SCHEMA.parse().unwrap();
	let record = small_record();
	let mut datum = Vec::new();
	encode(&record, &schema, &mut datum).unwrap();

	c.bench_with_input(
		BenchmarkId::new("avro_core_encode", "small"),
		&record,
		|b, record| {
			b.iter(|| {
				let mut out = Vec::new();
				encode(record, &schema, &mut out).unwrap();
				out
			})
		},
	);
	c.bench_with_input(
		BenchmarkId::new("avro_core_decode", "small"),
		&datum.as_slice(),
		|b, &datum| b.iter(|| decode(&mut &*datum, &schema).unwrap()),
	);
}

fn bench_big_schema(c: &mut Criterion) {
	let schema: Schema = RAW_BIG_SCHEMA.parse().unwrap();
	let record = big_record();
	let mut datum = Vec::new();
	encode(&record, &schema, &mut datum).unwrap();

	c.bench_with_input(
		BenchmarkId::new("avro_core_encode", "big"),
		&record,
		|b, record| {
			b.iter(|| {
				let mut out = Vec::new();
				encode(record, &schema, &mut out).unwrap();
				out
			})
		},
	);
	c.bench_with_input(
		BenchmarkId::new("avro_core_decode", "big"),
		&datum.as_slice(),
		|b, &datum| b.iter(|| decode(&mut &*datum, &schema).unwrap()),
	);
}

criterion_group!(benches, bench_small_schema, bench_big_schema);
criterion_main!(benches);
