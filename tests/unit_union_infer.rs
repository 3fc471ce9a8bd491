#![allow(missing_docs)]

use bytelayout::layout::factory::{blob, offset, structure, u16, u32, u8};
use bytelayout::layout::{LayoutError, Record, UnionBuilder, Value};

#[test]
fn prefix_tag_union_decodes_registered_variants() {
	let layout = point_union();
	let bytes = [0x01, 0x0a, 0x00, 0x14, 0x00];

	let decoded = layout.decode(&bytes, 0).expect("decode succeeds");
	assert_eq!(
		decoded,
		record(vec![(
			"pos",
			record(vec![("x", Value::U64(10)), ("y", Value::U64(20))]),
		)])
	);
}

#[test]
fn encode_infers_the_variant_from_the_source_shape() {
	let layout = point_union();
	let mut buf = [0_u8; 5];

	let wrote = layout
		.encode(&record(vec![("a", Value::U64(0xdead_beef))]), &mut buf, 0)
		.expect("encode succeeds");
	assert_eq!(wrote, 5);
	assert_eq!(buf, [0x00, 0xef, 0xbe, 0xad, 0xde]);
}

#[test]
fn consistent_variant_spans_make_the_union_fixed() {
	let layout = point_union();
	assert_eq!(layout.fixed_span().expect("span is fixed"), 5);
}

#[test]
fn unknown_tag_without_default_fails() {
	let layout = point_union();
	let bytes = [0x07, 0x00, 0x00, 0x00, 0x00];

	let err = layout.decode(&bytes, 0).expect_err("tag 7 is unregistered");
	assert!(matches!(err, LayoutError::UnknownVariant { tag: 7 }));
}

#[test]
fn unregistered_tag_falls_back_to_the_default_layout() {
	let layout = UnionBuilder::prefix(u8().named("tag"))
		.expect("u8 is a valid prefix tag")
		.default_layout(u32())
		.variant(1, u16(), "half")
		.build()
		.expect("union builds");

	let bytes = [0x09, 0x44, 0x33, 0x22, 0x11];
	let decoded = layout.decode(&bytes, 0).expect("decode succeeds");
	assert_eq!(
		decoded,
		record(vec![("tag", Value::U64(9)), ("content", Value::U64(0x1122_3344))])
	);
}

#[test]
fn discriminator_plus_content_always_takes_the_default_path() {
	let layout = UnionBuilder::prefix(u8().named("tag"))
		.expect("u8 is a valid prefix tag")
		.default_layout(u32())
		.variant(1, u16(), "half")
		.build()
		.expect("union builds");

	// Tag 1 names a registered variant, but the content property wins.
	let src = record(vec![("tag", Value::U64(1)), ("content", Value::U64(0xa1b2_c3d4))]);
	let mut buf = [0_u8; 5];
	let wrote = layout.encode(&src, &mut buf, 0).expect("encode succeeds");
	assert_eq!(wrote, 5);
	assert_eq!(buf, [0x01, 0xd4, 0xc3, 0xb2, 0xa1]);
}

#[test]
fn tag_only_variants_round_trip_through_the_discriminator_property() {
	let layout = UnionBuilder::prefix(u8().named("op"))
		.expect("u8 is a valid prefix tag")
		.tag_variant(4, "halt")
		.variant(5, u16(), "jump")
		.build()
		.expect("union builds");

	let decoded = layout.decode(&[0x04], 0).expect("decode succeeds");
	assert_eq!(decoded, Value::Record(Record::new()), "tag-only variants decode to the empty record");

	// Rule 2: the discriminator property alone picks a tag-only variant.
	let mut buf = [0xff_u8; 1];
	let union = layout.as_union().expect("layout is a union");
	let wrote = union
		.variant(4)
		.expect("variant 4 is registered")
		.encode(&Value::Record(Record::new()), &mut buf, 0)
		.expect("encode succeeds");
	assert_eq!(wrote, 1);
	assert_eq!(buf, [0x04]);

	let inferred = layout.encode(&record(vec![("op", Value::U64(4))]), &mut buf, 0).expect("encode succeeds");
	assert_eq!(inferred, 1);
}

#[test]
fn ambiguous_sources_are_rejected() {
	let layout = point_union();

	let err = layout
		.encode(&record(vec![("other", Value::U64(1))]), &mut [0_u8; 5], 0)
		.expect_err("no variant property matches");
	assert!(matches!(err, LayoutError::AmbiguousVariant));

	let err = layout
		.encode(
			&record(vec![
				("a", Value::U64(1)),
				("pos", record(vec![("x", Value::U64(0)), ("y", Value::U64(0))])),
			]),
			&mut [0_u8; 5],
			0,
		)
		.expect_err("two variant properties match");
	assert!(matches!(err, LayoutError::AmbiguousVariant));
}

#[test]
fn external_discriminator_reads_the_tag_outside_the_union() {
	let union = UnionBuilder::external(offset(u8(), -1).named("kind"))
		.expect("displaced u8 is a count")
		.variant(0, u16(), "short")
		.variant(1, u32(), "wide")
		.build()
		.expect("union builds");
	let layout = structure(vec![u8().named("kind"), union.named("body")]).expect("structure builds");

	let bytes = [0x01, 0x44, 0x33, 0x22, 0x11];
	let decoded = layout.decode(&bytes, 0).expect("decode succeeds");
	assert_eq!(
		decoded,
		record(vec![
			("kind", Value::U64(1)),
			("body", record(vec![("wide", Value::U64(0x1122_3344))])),
		])
	);

	let src = record(vec![("kind", Value::U64(0)), ("body", record(vec![("short", Value::U64(0x0102))]))]);
	let mut buf = [0_u8; 5];
	layout.encode(&src, &mut buf, 0).expect("encode succeeds");
	assert_eq!(buf[..3], [0x00, 0x02, 0x01]);
}

#[test]
fn builder_schema_violations_surface_at_build() {
	let err = UnionBuilder::prefix(u8())
		.expect("u8 is a valid prefix tag")
		.variant(1, u16(), "a")
		.variant(1, u32(), "b")
		.build()
		.expect_err("duplicate tags are rejected");
	assert!(matches!(err, LayoutError::DuplicateVariant { tag: 1 }));

	let err = UnionBuilder::prefix(u8())
		.expect("u8 is a valid prefix tag")
		.default_layout(u32())
		.variant(2, blob(4), "big")
		.build()
		.expect_err("variant larger than the default payload is rejected");
	assert!(matches!(err, LayoutError::VariantSpanExceedsDefault { tag: 2, span: 4, max: 3 }));

	let err = UnionBuilder::prefix(u8())
		.expect("u8 is a valid prefix tag")
		.default_layout(u32().named("payload"))
		.variant(3, u16(), "payload")
		.build()
		.expect_err("variant property colliding with the content property is rejected");
	assert!(matches!(err, LayoutError::PropertyCollision { .. }));

	let err = UnionBuilder::prefix(u16().named("tag"))
		.expect("u16 is a valid prefix tag")
		.default_layout(structure(vec![cstr_field()]).expect("structure builds"))
		.build()
		.expect_err("variable-span default layout is rejected");
	assert!(matches!(err, LayoutError::DefaultNotFixed));
}

fn point_union() -> bytelayout::layout::Layout {
	let pos = structure(vec![u16().named("x"), u16().named("y")]).expect("structure builds");
	UnionBuilder::prefix(u8())
		.expect("u8 is a valid prefix tag")
		.variant(0, u32(), "a")
		.variant(1, pos, "pos")
		.build()
		.expect("union builds")
}

fn cstr_field() -> bytelayout::layout::Layout {
	bytelayout::layout::factory::cstr().named("name")
}

fn record(fields: Vec<(&str, Value)>) -> Value {
	let mut dest = Record::new();
	for (name, value) in fields {
		dest.set(name, value);
	}
	Value::Record(dest)
}
