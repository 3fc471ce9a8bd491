use crate::layout::bits::BitStructure;
use crate::layout::external::{GreedyLayout, OffsetLayout};
use crate::layout::int::{FloatLayout, IntLayout, NearIntLayout};
use crate::layout::seq::Sequence;
use crate::layout::structure::Structure;
use crate::layout::text::{BlobLayout, CStringLayout, ConstantLayout, Utf8Layout};
use crate::layout::union::Union;
use crate::layout::{LayoutError, Record, Result, Value};

/// Encoded byte length classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
	/// Construction-time constant, independent of value and buffer.
	Fixed(usize),
	/// Depends on buffer content or the encoded value.
	Variable,
}

impl Span {
	/// The constant length, if any.
	pub fn fixed(self) -> Option<usize> {
		match self {
			Self::Fixed(span) => Some(span),
			Self::Variable => None,
		}
	}

	/// Whether the span is a construction-time constant.
	pub fn is_fixed(self) -> bool {
		matches!(self, Self::Fixed(_))
	}
}

/// Closed set of layout node variants.
#[derive(Debug, Clone)]
pub enum LayoutKind {
	/// 1-6 byte signed or unsigned integer.
	Int(IntLayout),
	/// 8-byte integer decoded as a double.
	NearInt(NearIntLayout),
	/// IEEE-754 single or double float.
	Float(FloatLayout),
	/// Raw bytes of fixed or externally-sourced length.
	Blob(BlobLayout),
	/// NUL-terminated UTF-8 string.
	CString(CStringLayout),
	/// Length-implicit UTF-8 string.
	Utf8(Utf8Layout),
	/// Span-0 preset value.
	Constant(ConstantLayout),
	/// Buffer-remainder element count.
	Greedy(GreedyLayout),
	/// Indirect reference at a signed displacement.
	Offset(OffsetLayout),
	/// Ordered named fields.
	Struct(Structure),
	/// Repeated element layout.
	Seq(Sequence),
	/// Bit-packed integer word.
	Bits(BitStructure),
	/// Tagged union.
	Union(Union),
}

/// One node of a layout tree.
///
/// Nodes are immutable after construction; [`Layout::replicate`] is the
/// only renaming mechanism.
#[derive(Debug, Clone)]
pub struct Layout {
	property: Option<Box<str>>,
	kind: LayoutKind,
}

impl Layout {
	pub(crate) fn new(kind: LayoutKind) -> Self {
		Self { property: None, kind }
	}

	/// The node's variant.
	pub fn kind(&self) -> &LayoutKind {
		&self.kind
	}

	/// Property name used when the node appears inside a container.
	pub fn property(&self) -> Option<&str> {
		self.property.as_deref()
	}

	/// Attach a property name at a construction site.
	pub fn named(mut self, property: &str) -> Self {
		self.property = Some(property.into());
		self
	}

	/// Shallow replica with the property replaced.
	pub fn replicate(&self, property: &str) -> Self {
		self.clone().named(property)
	}

	/// Span classification of the node.
	pub fn span(&self) -> Span {
		match &self.kind {
			LayoutKind::Int(int) => Span::Fixed(int.width()),
			LayoutKind::NearInt(_) => Span::Fixed(NearIntLayout::SPAN),
			LayoutKind::Float(float) => Span::Fixed(float.span()),
			LayoutKind::Blob(blob) => blob.span(),
			LayoutKind::CString(_) | LayoutKind::Utf8(_) => Span::Variable,
			LayoutKind::Constant(_) | LayoutKind::Greedy(_) => Span::Fixed(0),
			LayoutKind::Offset(offset) => offset.span(),
			LayoutKind::Struct(structure) => structure.span(),
			LayoutKind::Seq(seq) => seq.span(),
			LayoutKind::Bits(bits) => Span::Fixed(bits.word_span()),
			LayoutKind::Union(union) => union.span(),
		}
	}

	/// The fixed span, or `UnresolvedSpan` for variable-span nodes.
	pub fn fixed_span(&self) -> Result<usize> {
		self.span().fixed().ok_or(LayoutError::UnresolvedSpan)
	}

	/// Exact encoded length of one instance at `offset`.
	///
	/// Fixed-span nodes answer without inspecting the buffer.
	pub fn get_span(&self, buf: &[u8], offset: usize) -> Result<usize> {
		if let Span::Fixed(span) = self.span() {
			return Ok(span);
		}

		match &self.kind {
			LayoutKind::Blob(blob) => blob.get_span(buf, offset),
			LayoutKind::CString(cstr) => cstr.get_span(buf, offset),
			LayoutKind::Utf8(utf8) => utf8.get_span(buf, offset),
			LayoutKind::Offset(external) => external.get_span(buf, offset),
			LayoutKind::Struct(structure) => structure.get_span(buf, offset),
			LayoutKind::Seq(seq) => seq.get_span(buf, offset),
			LayoutKind::Union(union) => union.get_span(buf, offset),
			// Remaining kinds are always fixed-span.
			_ => self.fixed_span(),
		}
	}

	/// Decode the structured value these bytes denote.
	pub fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		match &self.kind {
			LayoutKind::Int(int) => int.decode(buf, offset),
			LayoutKind::NearInt(near) => near.decode(buf, offset),
			LayoutKind::Float(float) => float.decode(buf, offset),
			LayoutKind::Blob(blob) => blob.decode(buf, offset),
			LayoutKind::CString(cstr) => cstr.decode(buf, offset),
			LayoutKind::Utf8(utf8) => utf8.decode(buf, offset),
			LayoutKind::Constant(constant) => Ok(constant.decode()),
			LayoutKind::Greedy(greedy) => Ok(greedy.decode(buf, offset)),
			LayoutKind::Offset(external) => external.decode(buf, offset),
			LayoutKind::Struct(structure) => structure.decode(buf, offset),
			LayoutKind::Seq(seq) => seq.decode(buf, offset),
			LayoutKind::Bits(bits) => bits.decode(buf, offset),
			LayoutKind::Union(union) => union.decode(buf, offset),
		}
	}

	/// Encode a structured value, returning the bytes written.
	///
	/// The count excludes bytes written by external nodes on the node's
	/// behalf (externally-stored lengths and tags).
	pub fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		match &self.kind {
			LayoutKind::Int(int) => int.encode(src, buf, offset),
			LayoutKind::NearInt(near) => near.encode(src, buf, offset),
			LayoutKind::Float(float) => float.encode(src, buf, offset),
			LayoutKind::Blob(blob) => blob.encode(src, buf, offset),
			LayoutKind::CString(cstr) => cstr.encode(src, buf, offset),
			LayoutKind::Utf8(utf8) => utf8.encode(src, buf, offset),
			LayoutKind::Constant(_) | LayoutKind::Greedy(_) => Ok(0),
			LayoutKind::Offset(external) => external.encode(src, buf, offset),
			LayoutKind::Struct(structure) => structure.encode(src, buf, offset),
			LayoutKind::Seq(seq) => seq.encode(src, buf, offset),
			LayoutKind::Bits(bits) => bits.encode(src, buf, offset),
			LayoutKind::Union(union) => union.encode(src, buf, offset),
		}
	}

	/// Whether the node decodes to a non-negative integer usable as a
	/// count, length, or discriminator.
	pub fn is_count(&self) -> bool {
		match &self.kind {
			LayoutKind::Greedy(_) => true,
			LayoutKind::Offset(external) => external.is_count(),
			_ => false,
		}
	}

	/// Pair positional values with named children, for record-producing
	/// nodes.
	pub fn from_values(&self, values: Vec<Value>) -> Option<Record> {
		match &self.kind {
			LayoutKind::Struct(structure) => Some(structure.from_values(values)),
			LayoutKind::Bits(bits) => Some(bits.from_values(values)),
			_ => None,
		}
	}

	/// Borrow the structure payload, if this node is one.
	pub fn as_struct(&self) -> Option<&Structure> {
		match &self.kind {
			LayoutKind::Struct(structure) => Some(structure),
			_ => None,
		}
	}

	/// Borrow the union payload, if this node is one.
	pub fn as_union(&self) -> Option<&Union> {
		match &self.kind {
			LayoutKind::Union(union) => Some(union),
			_ => None,
		}
	}

	/// Borrow the bit-structure payload, if this node is one.
	pub fn as_bits(&self) -> Option<&BitStructure> {
		match &self.kind {
			LayoutKind::Bits(bits) => Some(bits),
			_ => None,
		}
	}
}
