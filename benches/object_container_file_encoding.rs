//! Benches writing and reading an object container file across every
//! compiled-in codec, the way the teacher's own container-file bench swept
//! `Compression` variants.

#![allow(missing_docs)]

use avro_core::codec::Codec;
use avro_core::container::{Reader, WriterBuilder};
use avro_core::{Schema, Value};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use indexmap::IndexMap;

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

fn record(i: i32) -> Value {
	let mut address = IndexMap::new();
	address.insert("street".to_owned(), Value::from("123 Fake St"));
	address.insert("city".to_owned(), Value::from("Springfield"));
	address.insert("state_prov".to_owned(), Value::from("IL"));
	address.insert("country".to_owned(), Value::from("USA"));
	address.insert("zip".to_owned(), Value::from("12345"));

	let mut fields = IndexMap::new();
	fields.insert("username".to_owned(), Value::from("John Doe"));
	fields.insert("age".to_owned(), Value::Int(i));
	fields.insert("phone".to_owned(), Value::from("555-555-5555"));
	fields.insert("housenum".to_owned(), Value::from("123"));
	fields.insert("address".to_owned(), Value::Record(address));
	Value::Record(fields)
}

fn codecs() -> Vec<(&'static str, Codec)> {
	vec![
		("null", Codec::Null),
		#[cfg(feature = "deflate")]
		("deflate", Codec::Deflate { level: Default::default() }),
		#[cfg(feature = "bzip2")]
		("bzip2", Codec::Bzip2 { level: Default::default() }),
		#[cfg(feature = "snappy")]
		("snappy", Codec::Snappy),
		#[cfg(feature = "xz")]
		("xz", Codec::Xz { level: Default::default() }),
		#[cfg(feature = "zstandard")]
		("zstandard", Codec::Zstandard { level: Default::default() }),
	]
}

fn bench_write(c: &mut Criterion) {
	let schema: Schema = RAW_BIG_SCHEMA.parse().unwrap();
	let records: Vec<Value> = (0..100_000).map(record).collect();

	for (name, codec) in codecs() {
		c.bench_with_input(
			BenchmarkId::new("avro_core_object_container_file_write", name),
			&records,
			|b, records| {
				b.iter(|| {
					let mut out = Vec::new();
					let mut writer =
						WriterBuilder::new(&schema).codec(codec.clone()).build(&mut out).unwrap();
					writer.append_all(records.iter()).unwrap();
					writer.into_inner().unwrap();
					out
				})
			},
		);
	}
}

fn bench_read(c: &mut Criterion) {
	let schema: Schema = RAW_BIG_SCHEMA.parse().unwrap();
	let records: Vec<Value> = (0..100_000).map(record).collect();

	for (name, codec) in codecs() {
		let mut file = Vec::new();
		let mut writer = WriterBuilder::new(&schema).codec(codec).build(&mut file).unwrap();
		writer.append_all(records.iter()).unwrap();
		writer.into_inner().unwrap();

		c.bench_with_input(
			BenchmarkId::new("avro_core_object_container_file_read", name),
			&file,
			|b, file| {
				b.iter(|| {
					let mut age_sum = 0i64;
					for value in Reader::from_reader(file.as_slice()).unwrap() {
						if let Value::Record(fields) = value.unwrap() {
							if let Some(Value::Int(age)) = fields.get("age") {
								age_sum += i64::from(*age);
							}
						}
					}
					age_sum
				})
			},
		);
	}
}

criterion_group!(benches, bench_write, bench_read);
criterion_main!(benches);
