use crate::layout::bytes::displace;
use crate::layout::node::{Layout, LayoutKind, Span};
use crate::layout::{LayoutError, Result, Value};

/// Count of whole elements fitting in the buffer remainder.
///
/// Occupies no space of its own: decode derives the count from the
/// buffer's length, encode is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct GreedyLayout {
	element_span: usize,
}

impl GreedyLayout {
	pub(crate) fn new(element_span: usize) -> Result<Self> {
		if element_span == 0 {
			return Err(LayoutError::ZeroElementSpan);
		}
		Ok(Self { element_span })
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Value {
		let rem = buf.len().saturating_sub(offset);
		Value::U64((rem / self.element_span) as u64)
	}
}

/// Indirect reference to a target layout at a signed displacement.
///
/// The displacement is resolved against the offset handed to the node's
/// consumer, so a count byte stored just before a sequence is reached
/// with a displacement of `-1` and a field later in the parent with a
/// positive one.
#[derive(Debug, Clone)]
pub struct OffsetLayout {
	target: Box<Layout>,
	delta: isize,
}

impl OffsetLayout {
	pub(crate) fn new(target: Layout, delta: isize) -> Self {
		Self {
			target: Box::new(target),
			delta,
		}
	}

	/// The wrapped layout.
	pub fn target(&self) -> &Layout {
		&self.target
	}

	pub(crate) fn span(&self) -> Span {
		self.target.span()
	}

	pub(crate) fn is_count(&self) -> bool {
		match self.target.kind() {
			LayoutKind::Int(int) => !int.signed(),
			_ => self.target.is_count(),
		}
	}

	pub(crate) fn get_span(&self, buf: &[u8], offset: usize) -> Result<usize> {
		self.target.get_span(buf, displace(offset, self.delta)?)
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		self.target.decode(buf, displace(offset, self.delta)?)
	}

	pub(crate) fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		self.target.encode(src, buf, displace(offset, self.delta)?)
	}
}
