#![allow(missing_docs)]

use bytelayout::layout::factory::{constant, cstr, prefix_structure, structure, u16, u32, u8, utf8, utf8_max};
use bytelayout::layout::{value_to_json, BoundLayout, FromRecord, LayoutError, Record, Result, ToRecord, Value};

#[test]
fn cstring_round_trips_with_terminator() {
	let layout = cstr();
	let bytes = [0x68, 0x69, 0x00, 0xff];

	assert_eq!(layout.decode(&bytes, 0).expect("decode succeeds"), Value::Str("hi".into()));
	assert_eq!(layout.get_span(&bytes, 0).expect("span resolves"), 3);

	let mut buf = [0_u8; 3];
	let wrote = layout.encode(&Value::Str("hi".into()), &mut buf, 0).expect("encode succeeds");
	assert_eq!(wrote, 3);
	assert_eq!(buf, [0x68, 0x69, 0x00]);
}

#[test]
fn utf8_consumes_the_buffer_remainder() {
	let layout = utf8();
	let bytes = [0x61, 0x62, 0x63];

	assert_eq!(layout.decode(&bytes, 1).expect("decode succeeds"), Value::Str("bc".into()));
	assert_eq!(layout.get_span(&bytes, 1).expect("span resolves"), 2);

	let bounded = utf8_max(2);
	let err = bounded
		.encode(&Value::Str("abc".into()), &mut [0_u8; 8], 0)
		.expect_err("three bytes exceed the ceiling");
	assert!(matches!(err, LayoutError::MaxSpanExceeded { len: 3, max: 2 }));
}

#[test]
fn decode_prefixes_stops_cleanly_at_the_buffer_end() {
	let layout = prefix_structure(vec![u8().named("a"), u16().named("b"), u32().named("c")], "rec").expect("structure builds");

	let decoded = layout.decode(&[0x01, 0x02, 0x00], 0).expect("decode succeeds");
	assert_eq!(decoded, record(vec![("a", Value::U64(1)), ("b", Value::U64(2))]));
}

#[test]
fn exhausting_the_buffer_without_prefix_mode_fails() {
	let layout = structure(vec![u8().named("a"), u16().named("b"), u32().named("c")]).expect("structure builds");

	let err = layout.decode(&[0x01, 0x02, 0x00], 0).expect_err("seven bytes are required");
	assert!(matches!(err, LayoutError::UnexpectedEof { .. }));
}

#[test]
fn constants_occupy_no_bytes() {
	let layout = structure(vec![constant(Value::U64(2)).named("version"), u8().named("id")]).expect("structure builds");
	assert_eq!(layout.fixed_span().expect("span is fixed"), 1);

	let decoded = layout.decode(&[0x63], 0).expect("decode succeeds");
	assert_eq!(decoded, record(vec![("version", Value::U64(2)), ("id", Value::U64(0x63))]));

	let mut buf = [0xaa_u8; 1];
	let wrote = layout
		.encode(&record(vec![("id", Value::U64(1))]), &mut buf, 0)
		.expect("encode succeeds");
	assert_eq!(wrote, 1);
}

#[derive(Debug, PartialEq)]
struct Header {
	tag: u64,
	length: u64,
}

impl FromRecord for Header {
	fn from_record(record: &Record) -> Result<Self> {
		let field = |name: &str| -> Result<u64> {
			record
				.get(name)
				.and_then(Value::as_count)
				.ok_or(LayoutError::MissingField { field: name.into() })
		};
		Ok(Self {
			tag: field("tag")?,
			length: field("length")?,
		})
	}
}

impl ToRecord for Header {
	fn to_record(&self) -> Record {
		let mut record = Record::new();
		record.set("tag", Value::U64(self.tag));
		record.set("length", Value::U64(self.length));
		record
	}
}

#[test]
fn bound_layout_round_trips_a_user_type() {
	let layout = structure(vec![u16().named("tag"), u32().named("length")]).expect("structure builds");
	let bound: BoundLayout<Header> = BoundLayout::new(layout);

	let header = Header { tag: 7, length: 512 };
	let mut buf = [0_u8; 6];
	let wrote = bound.encode(&header, &mut buf, 0).expect("encode succeeds");
	assert_eq!(wrote, 6);

	let back = bound.decode(&buf, 0).expect("decode succeeds");
	assert_eq!(back, header);
}

#[test]
fn json_view_renders_records_in_field_order() {
	let layout = structure(vec![u8().named("id"), cstr().named("name")]).expect("structure builds");
	let bytes = [0x07, 0x68, 0x69, 0x00];

	let decoded = layout.decode(&bytes, 0).expect("decode succeeds");
	let json = value_to_json(&decoded);
	assert_eq!(json, serde_json::json!({ "id": 7, "name": "hi" }));

	let keys: Vec<&String> = json.as_object().expect("record renders as object").keys().collect();
	assert_eq!(keys, ["id", "name"]);
}

fn record(fields: Vec<(&str, Value)>) -> Value {
	let mut dest = Record::new();
	for (name, value) in fields {
		dest.set(name, value);
	}
	Value::Record(dest)
}
