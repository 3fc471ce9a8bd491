use crate::layout::bytes::{take, take_mut};
use crate::layout::node::{Layout, Span};
use crate::layout::{LayoutError, Result, Value};

/// Length source for a blob leaf.
#[derive(Debug, Clone)]
pub enum BlobLen {
	/// Construction-time constant length.
	Fixed(usize),
	/// Count-valued external node consulted at decode/encode time.
	External(Box<Layout>),
}

/// Raw byte region of fixed or externally-sourced length.
#[derive(Debug, Clone)]
pub struct BlobLayout {
	length: BlobLen,
}

impl BlobLayout {
	pub(crate) fn fixed(length: usize) -> Self {
		Self {
			length: BlobLen::Fixed(length),
		}
	}

	/// Create a blob whose length is read through a count-valued external node.
	pub(crate) fn external(length: Layout) -> Result<Self> {
		if !length.is_count() {
			return Err(LayoutError::InvalidCount);
		}
		Ok(Self {
			length: BlobLen::External(Box::new(length)),
		})
	}

	pub(crate) fn span(&self) -> Span {
		match &self.length {
			BlobLen::Fixed(length) => Span::Fixed(*length),
			BlobLen::External(_) => Span::Variable,
		}
	}

	pub(crate) fn get_span(&self, buf: &[u8], offset: usize) -> Result<usize> {
		match &self.length {
			BlobLen::Fixed(length) => Ok(*length),
			BlobLen::External(external) => {
				let count = external.decode(buf, offset)?;
				let length = count.as_count().ok_or(LayoutError::TypeMismatch {
					expected: "count",
					got: count.kind(),
				})?;
				usize::try_from(length).map_err(|_| LayoutError::SpanOverflow)
			}
		}
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		let length = self.get_span(buf, offset)?;
		Ok(Value::Bytes(take(buf, offset, length)?.to_vec()))
	}

	pub(crate) fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let bytes = src.as_bytes().ok_or(LayoutError::TypeMismatch {
			expected: "bytes",
			got: src.kind(),
		})?;

		if let BlobLen::Fixed(expected) = self.length {
			if bytes.len() != expected {
				return Err(LayoutError::LengthMismatch {
					len: bytes.len(),
					expected,
				});
			}
		}

		take_mut(buf, offset, bytes.len())?.copy_from_slice(bytes);

		// The stored length is finalised after the payload bytes and is
		// excluded from the returned count.
		if let BlobLen::External(external) = &self.length {
			external.encode(&Value::U64(bytes.len() as u64), buf, offset)?;
		}
		Ok(bytes.len())
	}
}

/// NUL-terminated UTF-8 string.
///
/// An interior NUL in the source string is written verbatim and truncates
/// the value on the next decode; round-tripping such strings is not
/// guaranteed.
#[derive(Debug, Clone, Copy)]
pub struct CStringLayout;

impl CStringLayout {
	pub(crate) fn get_span(&self, buf: &[u8], offset: usize) -> Result<usize> {
		let rem = buf.get(offset..).unwrap_or_default();
		let terminator = rem.iter().position(|byte| *byte == 0).ok_or(LayoutError::UnexpectedEof {
			at: offset,
			need: 1,
			rem: rem.len(),
		})?;
		Ok(terminator + 1)
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		let span = self.get_span(buf, offset)?;
		let bytes = take(buf, offset, span - 1)?;
		let text = std::str::from_utf8(bytes).map_err(|_| LayoutError::InvalidUtf8 { at: offset })?;
		Ok(Value::Str(text.into()))
	}

	pub(crate) fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let text = src.as_str().ok_or(LayoutError::TypeMismatch {
			expected: "str",
			got: src.kind(),
		})?;

		let out = take_mut(buf, offset, text.len() + 1)?;
		out[..text.len()].copy_from_slice(text.as_bytes());
		out[text.len()] = 0;
		Ok(text.len() + 1)
	}
}

/// Length-implicit UTF-8 string occupying the remainder of the buffer.
#[derive(Debug, Clone, Copy)]
pub struct Utf8Layout {
	max_span: Option<usize>,
}

impl Utf8Layout {
	pub(crate) fn new(max_span: Option<usize>) -> Self {
		Self { max_span }
	}

	pub(crate) fn get_span(&self, buf: &[u8], offset: usize) -> Result<usize> {
		if offset > buf.len() {
			return Err(LayoutError::UnexpectedEof {
				at: offset,
				need: 0,
				rem: 0,
			});
		}
		Ok(buf.len() - offset)
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		let span = self.get_span(buf, offset)?;
		let bytes = take(buf, offset, span)?;
		let text = std::str::from_utf8(bytes).map_err(|_| LayoutError::InvalidUtf8 { at: offset })?;
		Ok(Value::Str(text.into()))
	}

	pub(crate) fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let text = src.as_str().ok_or(LayoutError::TypeMismatch {
			expected: "str",
			got: src.kind(),
		})?;

		if let Some(max) = self.max_span {
			if text.len() > max {
				return Err(LayoutError::MaxSpanExceeded { len: text.len(), max });
			}
		}

		take_mut(buf, offset, text.len())?.copy_from_slice(text.as_bytes());
		Ok(text.len())
	}
}

/// Span-0 leaf decoding to a preset value.
#[derive(Debug, Clone)]
pub struct ConstantLayout {
	value: Box<Value>,
}

impl ConstantLayout {
	pub(crate) fn new(value: Value) -> Self {
		Self { value: Box::new(value) }
	}

	pub(crate) fn decode(&self) -> Value {
		(*self.value).clone()
	}
}
