#![allow(missing_docs)]

use bytelayout::layout::factory::{cstr, s16, structure, u16, u32, u8};
use bytelayout::layout::{Record, Value};

#[test]
fn sensor_record_decodes_packed_bytes() {
	let layout = sensor_layout();
	let bytes = [0x05, 0x17, 0x00, 0x00, 0x00, 0xde, 0x26, 0x2d, 0x56];

	let decoded = layout.decode(&bytes, 0).expect("decode succeeds");
	assert_eq!(
		decoded,
		record(vec![
			("sensor_id", Value::U64(5)),
			("t_cel", Value::I64(23)),
			("rh_pph", Value::U64(0)),
			("timestamp_posix", Value::U64(1_445_799_646)),
		])
	);
}

#[test]
fn sensor_record_encodes_packed_bytes() {
	let layout = sensor_layout();
	let src = record(vec![
		("sensor_id", Value::U64(7)),
		("t_cel", Value::I64(-5)),
		("rh_pph", Value::U64(16)),
		("timestamp_posix", Value::U64(1_445_799_694)),
	]);

	let mut buf = [0_u8; 9];
	let wrote = layout.encode(&src, &mut buf, 0).expect("encode succeeds");
	assert_eq!(wrote, 9);
	assert_eq!(buf, [0x07, 0xfb, 0xff, 0x10, 0x00, 0x0e, 0x4e, 0x2d, 0x56]);
}

#[test]
fn encode_count_matches_span() {
	let layout = sensor_layout();
	assert_eq!(layout.fixed_span().expect("span is fixed"), 9);

	let mut buf = [0_u8; 9];
	let wrote = layout
		.encode(&record(vec![("sensor_id", Value::U64(1))]), &mut buf, 0)
		.expect("encode succeeds");
	assert_eq!(wrote, layout.get_span(&buf, 0).expect("span resolves"));
}

#[test]
fn missing_fields_leave_their_bytes_untouched() {
	let layout = sensor_layout();
	let mut buf = [0xaa_u8; 9];

	layout
		.encode(&record(vec![("sensor_id", Value::U64(1))]), &mut buf, 0)
		.expect("encode succeeds");
	assert_eq!(buf[0], 0x01);
	assert!(buf[1..].iter().all(|byte| *byte == 0xaa), "unaddressed field bytes survive");
}

#[test]
fn offset_of_reports_static_offsets_only() {
	let layout = sensor_layout();
	let fields = layout.as_struct().expect("layout is a structure");

	assert_eq!(fields.offset_of("sensor_id"), Some(0));
	assert_eq!(fields.offset_of("timestamp_posix"), Some(5));
	assert_eq!(fields.offset_of("missing"), None);
	assert!(fields.layout_for("rh_pph").is_some());

	let tailed = structure(vec![cstr().named("name"), u16().named("code")]).expect("structure builds");
	let tailed = tailed.as_struct().expect("layout is a structure");
	assert_eq!(tailed.offset_of("name"), Some(0));
	assert_eq!(tailed.offset_of("code"), None, "offset after a variable-span sibling is not static");
}

#[test]
fn from_values_pairs_positional_values_with_named_fields() {
	let layout = sensor_layout();
	let paired = layout
		.from_values(vec![Value::U64(9), Value::I64(-1), Value::U64(3), Value::U64(4), Value::U64(99)])
		.expect("structures are record-producing");

	assert_eq!(paired.get("sensor_id"), Some(&Value::U64(9)));
	assert_eq!(paired.get("timestamp_posix"), Some(&Value::U64(4)));
	assert_eq!(paired.len(), 4, "extra positional values are ignored");
}

#[test]
fn replicate_renames_without_touching_the_original() {
	let layout = u16().named("first");
	let renamed = layout.replicate("second");

	assert_eq!(layout.property(), Some("first"));
	assert_eq!(renamed.property(), Some("second"));

	let bytes = [0x34, 0x12];
	assert_eq!(
		renamed.decode(&bytes, 0).expect("decode succeeds"),
		layout.decode(&bytes, 0).expect("decode succeeds"),
	);
}

fn sensor_layout() -> bytelayout::layout::Layout {
	structure(vec![
		u8().named("sensor_id"),
		s16().named("t_cel"),
		u16().named("rh_pph"),
		u32().named("timestamp_posix"),
	])
	.expect("structure builds")
}

fn record(fields: Vec<(&str, Value)>) -> Value {
	let mut dest = Record::new();
	for (name, value) in fields {
		dest.set(name, value);
	}
	Value::Record(dest)
}
