//! Parsing Canonical Form (spec §4.2, following the Avro specification's
//! `[PRIMITIVES]`/`[FULLNAMES]`/`[STRIP]`/`[ORDER]`/`[STRINGS]`/`[INTEGERS]`/
//! `[UNIONS]` transform rules).

use super::nodes::RegularType;
use super::{Schema, SchemaKey};

pub(super) fn canonical_form(schema: &Schema, key: SchemaKey) -> String {
	let mut out = String::new();
	write_node(schema, key, &mut out);
	out
}

fn json_string(s: &str) -> String {
	serde_json::Value::String(s.to_owned()).to_string()
}

fn write_node(schema: &Schema, key: SchemaKey, out: &mut String) {
	// Logical type annotations are not part of PCF (AVRO-1721): only the base
	// type's shape matters here.
	match &schema.node(key).type_ {
		RegularType::Null => out.push_str("\"null\""),
		RegularType::Boolean => out.push_str("\"boolean\""),
		RegularType::Int => out.push_str("\"int\""),
		RegularType::Long => out.push_str("\"long\""),
		RegularType::Float => out.push_str("\"float\""),
		RegularType::Double => out.push_str("\"double\""),
		RegularType::Bytes => out.push_str("\"bytes\""),
		RegularType::String => out.push_str("\"string\""),
		RegularType::Array(a) => {
			out.push_str("{\"type\":\"array\",\"items\":");
			write_node(schema, a.items, out);
			out.push('}');
		}
		RegularType::Map(m) => {
			out.push_str("{\"type\":\"map\",\"values\":");
			write_node(schema, m.values, out);
			out.push('}');
		}
		RegularType::Union(u) => {
			out.push('[');
			for (i, &variant) in u.variants.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				write_node(schema, variant, out);
			}
			out.push(']');
		}
		RegularType::Record(r) => {
			out.push_str("{\"name\":");
			out.push_str(&json_string(r.name.fully_qualified_name()));
			out.push_str(",\"type\":\"record\",\"fields\":[");
			for (i, field) in r.fields.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				out.push_str("{\"name\":");
				out.push_str(&json_string(&field.name));
				out.push_str(",\"type\":");
				write_node(schema, field.type_, out);
				out.push('}');
			}
			out.push_str("]}");
		}
		RegularType::Enum(e) => {
			out.push_str("{\"name\":");
			out.push_str(&json_string(e.name.fully_qualified_name()));
			out.push_str(",\"type\":\"enum\",\"symbols\":[");
			for (i, symbol) in e.symbols.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				out.push_str(&json_string(symbol));
			}
			out.push_str("]}");
		}
		RegularType::Fixed(f) => {
			out.push_str("{\"name\":");
			out.push_str(&json_string(f.name.fully_qualified_name()));
			out.push_str(",\"type\":\"fixed\",\"size\":");
			out.push_str(&f.size.to_string());
			out.push('}');
		}
	}
}
