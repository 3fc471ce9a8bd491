//! Ergonomic constructors, one per node kind.
//!
//! Leaf factories return unnamed nodes; attach a property with
//! [`Layout::named`] where the node lands inside a container.

use crate::layout::external::{GreedyLayout, OffsetLayout};
use crate::layout::int::{Endian, FloatLayout, IntLayout, NearIntLayout};
use crate::layout::node::{Layout, LayoutKind};
use crate::layout::seq::{SeqCount, Sequence};
use crate::layout::structure::Structure;
use crate::layout::text::{BlobLayout, CStringLayout, ConstantLayout, Utf8Layout};
use crate::layout::{Result, Value};

fn int_fixed(width: usize, signed: bool, endian: Endian) -> Layout {
	Layout::new(LayoutKind::Int(IntLayout::fixed(width, signed, endian)))
}

/// Integer leaf of arbitrary supported width and signedness.
pub fn int(width: usize, signed: bool, endian: Endian) -> Result<Layout> {
	Ok(Layout::new(LayoutKind::Int(IntLayout::new(width, signed, endian)?)))
}

/// Unsigned 8-bit integer.
pub fn u8() -> Layout {
	int_fixed(1, false, Endian::Little)
}

/// Unsigned 16-bit little-endian integer.
pub fn u16() -> Layout {
	int_fixed(2, false, Endian::Little)
}

/// Unsigned 16-bit big-endian integer.
pub fn u16be() -> Layout {
	int_fixed(2, false, Endian::Big)
}

/// Unsigned 24-bit little-endian integer.
pub fn u24() -> Layout {
	int_fixed(3, false, Endian::Little)
}

/// Unsigned 24-bit big-endian integer.
pub fn u24be() -> Layout {
	int_fixed(3, false, Endian::Big)
}

/// Unsigned 32-bit little-endian integer.
pub fn u32() -> Layout {
	int_fixed(4, false, Endian::Little)
}

/// Unsigned 32-bit big-endian integer.
pub fn u32be() -> Layout {
	int_fixed(4, false, Endian::Big)
}

/// Unsigned 40-bit little-endian integer.
pub fn u40() -> Layout {
	int_fixed(5, false, Endian::Little)
}

/// Unsigned 40-bit big-endian integer.
pub fn u40be() -> Layout {
	int_fixed(5, false, Endian::Big)
}

/// Unsigned 48-bit little-endian integer.
pub fn u48() -> Layout {
	int_fixed(6, false, Endian::Little)
}

/// Unsigned 48-bit big-endian integer.
pub fn u48be() -> Layout {
	int_fixed(6, false, Endian::Big)
}

/// Unsigned near-64 little-endian integer, decoded as a double.
pub fn nu64() -> Layout {
	Layout::new(LayoutKind::NearInt(NearIntLayout::new(false, Endian::Little)))
}

/// Unsigned near-64 big-endian integer, decoded as a double.
pub fn nu64be() -> Layout {
	Layout::new(LayoutKind::NearInt(NearIntLayout::new(false, Endian::Big)))
}

/// Signed 8-bit integer.
pub fn s8() -> Layout {
	int_fixed(1, true, Endian::Little)
}

/// Signed 16-bit little-endian integer.
pub fn s16() -> Layout {
	int_fixed(2, true, Endian::Little)
}

/// Signed 16-bit big-endian integer.
pub fn s16be() -> Layout {
	int_fixed(2, true, Endian::Big)
}

/// Signed 24-bit little-endian integer.
pub fn s24() -> Layout {
	int_fixed(3, true, Endian::Little)
}

/// Signed 24-bit big-endian integer.
pub fn s24be() -> Layout {
	int_fixed(3, true, Endian::Big)
}

/// Signed 32-bit little-endian integer.
pub fn s32() -> Layout {
	int_fixed(4, true, Endian::Little)
}

/// Signed 32-bit big-endian integer.
pub fn s32be() -> Layout {
	int_fixed(4, true, Endian::Big)
}

/// Signed 40-bit little-endian integer.
pub fn s40() -> Layout {
	int_fixed(5, true, Endian::Little)
}

/// Signed 40-bit big-endian integer.
pub fn s40be() -> Layout {
	int_fixed(5, true, Endian::Big)
}

/// Signed 48-bit little-endian integer.
pub fn s48() -> Layout {
	int_fixed(6, true, Endian::Little)
}

/// Signed 48-bit big-endian integer.
pub fn s48be() -> Layout {
	int_fixed(6, true, Endian::Big)
}

/// Signed near-64 little-endian integer, decoded as a double.
pub fn ns64() -> Layout {
	Layout::new(LayoutKind::NearInt(NearIntLayout::new(true, Endian::Little)))
}

/// Signed near-64 big-endian integer, decoded as a double.
pub fn ns64be() -> Layout {
	Layout::new(LayoutKind::NearInt(NearIntLayout::new(true, Endian::Big)))
}

/// IEEE-754 single-precision float, little-endian.
pub fn f32() -> Layout {
	Layout::new(LayoutKind::Float(FloatLayout::new(false, Endian::Little)))
}

/// IEEE-754 single-precision float, big-endian.
pub fn f32be() -> Layout {
	Layout::new(LayoutKind::Float(FloatLayout::new(false, Endian::Big)))
}

/// IEEE-754 double-precision float, little-endian.
pub fn f64() -> Layout {
	Layout::new(LayoutKind::Float(FloatLayout::new(true, Endian::Little)))
}

/// IEEE-754 double-precision float, big-endian.
pub fn f64be() -> Layout {
	Layout::new(LayoutKind::Float(FloatLayout::new(true, Endian::Big)))
}

/// Raw bytes of a fixed length.
pub fn blob(length: usize) -> Layout {
	Layout::new(LayoutKind::Blob(BlobLayout::fixed(length)))
}

/// Raw bytes whose length is read through a count-valued external node.
pub fn blob_external(length: Layout) -> Result<Layout> {
	Ok(Layout::new(LayoutKind::Blob(BlobLayout::external(length)?)))
}

/// NUL-terminated UTF-8 string.
pub fn cstr() -> Layout {
	Layout::new(LayoutKind::CString(CStringLayout))
}

/// UTF-8 string occupying the buffer remainder.
pub fn utf8() -> Layout {
	Layout::new(LayoutKind::Utf8(Utf8Layout::new(None)))
}

/// UTF-8 string occupying the buffer remainder, with an encode ceiling.
pub fn utf8_max(max_span: usize) -> Layout {
	Layout::new(LayoutKind::Utf8(Utf8Layout::new(Some(max_span))))
}

/// Span-0 leaf decoding to a preset value.
pub fn constant(value: Value) -> Layout {
	Layout::new(LayoutKind::Constant(ConstantLayout::new(value)))
}

/// Count of whole `element_span`-sized elements fitting in the buffer
/// remainder.
pub fn greedy(element_span: usize) -> Result<Layout> {
	Ok(Layout::new(LayoutKind::Greedy(GreedyLayout::new(element_span)?)))
}

/// Indirect reference to `target` at a signed displacement from the
/// consumer's base offset.
pub fn offset(target: Layout, delta: isize) -> Layout {
	Layout::new(LayoutKind::Offset(OffsetLayout::new(target, delta)))
}

/// Repetition of `element` a fixed number of times.
pub fn seq(element: Layout, count: usize) -> Result<Layout> {
	Ok(Layout::new(LayoutKind::Seq(Sequence::new(element, SeqCount::Fixed(count), false)?)))
}

/// Fixed-count repetition that rejects oversized sources instead of
/// dropping the tail.
pub fn seq_strict(element: Layout, count: usize) -> Result<Layout> {
	Ok(Layout::new(LayoutKind::Seq(Sequence::new(element, SeqCount::Fixed(count), true)?)))
}

/// Repetition whose count is read through a count-valued external node.
pub fn seq_external(element: Layout, count: Layout) -> Result<Layout> {
	Ok(Layout::new(LayoutKind::Seq(Sequence::new(element, SeqCount::External(Box::new(count)), false)?)))
}

/// Ordered named fields.
pub fn structure(fields: Vec<Layout>) -> Result<Layout> {
	Ok(Layout::new(LayoutKind::Struct(Structure::new(fields, false)?)))
}

/// Ordered named fields under a property name.
pub fn structure_named(fields: Vec<Layout>, name: &str) -> Result<Layout> {
	Ok(structure(fields)?.named(name))
}

/// Structure that stops decoding cleanly at the end of a short buffer.
pub fn prefix_structure(fields: Vec<Layout>, name: &str) -> Result<Layout> {
	Ok(Layout::new(LayoutKind::Struct(Structure::new(fields, true)?)).named(name))
}
