use avro_core::{decode, Schema};
use std::io::Read;

#[test]
fn decode_stops_at_max_depth_instead_of_overflowing_the_stack() {
	let schema: Schema = r#"
		{
			"type": "record",
			"name": "Node",
			"fields": [
				{"name": "next", "type": ["null", "Node"]}
			]
		}
	"#
	.parse()
	.unwrap();

	struct InfiniteBranches;
	impl Read for InfiniteBranches {
		fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
			// zig-zag-encoded 1 selects the "Node" branch of the union forever
			buf.fill(0x02);
			Ok(buf.len())
		}
	}

	let err = decode(&mut InfiniteBranches, &schema).unwrap_err();
	assert!(err.to_string().contains("depth"));
}
