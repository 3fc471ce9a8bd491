use crate::layout::node::{Layout, Span};
use crate::layout::{LayoutError, Result, Value};

/// Count source for a sequence.
#[derive(Debug, Clone)]
pub enum SeqCount {
	/// Construction-time constant count.
	Fixed(usize),
	/// Count-valued external node resolved at decode/encode time.
	External(Box<Layout>),
}

/// Repetition of one element layout.
#[derive(Debug, Clone)]
pub struct Sequence {
	element: Box<Layout>,
	count: SeqCount,
	strict: bool,
	span: Span,
}

impl Sequence {
	pub(crate) fn new(element: Layout, count: SeqCount, strict: bool) -> Result<Self> {
		if let SeqCount::External(external) = &count {
			if !external.is_count() {
				return Err(LayoutError::InvalidCount);
			}
		}

		let span = match (&count, element.span()) {
			(SeqCount::Fixed(count), Span::Fixed(element_span)) => {
				Span::Fixed(count.checked_mul(element_span).ok_or(LayoutError::SpanOverflow)?)
			}
			_ => Span::Variable,
		};

		Ok(Self {
			element: Box::new(element),
			count,
			strict,
			span,
		})
	}

	/// The repeated element layout.
	pub fn element(&self) -> &Layout {
		&self.element
	}

	/// The count source.
	pub fn count(&self) -> &SeqCount {
		&self.count
	}

	fn resolve_count(&self, buf: &[u8], offset: usize) -> Result<usize> {
		match &self.count {
			SeqCount::Fixed(count) => Ok(*count),
			SeqCount::External(external) => {
				let value = external.decode(buf, offset)?;
				let count = value.as_count().ok_or(LayoutError::TypeMismatch {
					expected: "count",
					got: value.kind(),
				})?;
				usize::try_from(count).map_err(|_| LayoutError::SpanOverflow)
			}
		}
	}

	pub(crate) fn span(&self) -> Span {
		self.span
	}

	pub(crate) fn get_span(&self, buf: &[u8], offset: usize) -> Result<usize> {
		if let Span::Fixed(span) = self.span {
			return Ok(span);
		}

		let count = self.resolve_count(buf, offset)?;
		if let Span::Fixed(element_span) = self.element.span() {
			return count.checked_mul(element_span).ok_or(LayoutError::SpanOverflow);
		}

		let mut pos = offset;
		for _ in 0..count {
			let span = self.element.get_span(buf, pos)?;
			pos = pos.checked_add(span).ok_or(LayoutError::SpanOverflow)?;
		}
		Ok(pos - offset)
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		let count = self.resolve_count(buf, offset)?;
		let mut items = Vec::new();
		let mut pos = offset;
		for _ in 0..count {
			let span = self.element.get_span(buf, pos)?;
			items.push(self.element.decode(buf, pos)?);
			pos = pos.checked_add(span).ok_or(LayoutError::SpanOverflow)?;
		}
		Ok(Value::List(items))
	}

	pub(crate) fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let items = src.as_list().ok_or(LayoutError::TypeMismatch {
			expected: "list",
			got: src.kind(),
		})?;

		let written = match &self.count {
			SeqCount::Fixed(count) => {
				if self.strict && items.len() > *count {
					return Err(LayoutError::SequenceOverflow {
						len: items.len(),
						count: *count,
					});
				}
				// Extra source elements past the fixed count are dropped.
				&items[..items.len().min(*count)]
			}
			SeqCount::External(_) => items,
		};

		let mut pos = offset;
		for item in written {
			let wrote = self.element.encode(item, buf, pos)?;
			pos = pos.checked_add(wrote).ok_or(LayoutError::SpanOverflow)?;
		}

		// The stored count is finalised after the elements and excluded
		// from the returned byte count.
		if let SeqCount::External(external) = &self.count {
			external.encode(&Value::U64(items.len() as u64), buf, offset)?;
		}

		Ok(pos - offset)
	}
}
