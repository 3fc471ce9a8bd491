use crate::layout::node::{Layout, Span};
use crate::layout::{LayoutError, Record, Result, Value};

/// Ordered list of named fields decoded and encoded at running offsets.
#[derive(Debug, Clone)]
pub struct Structure {
	fields: Vec<Layout>,
	decode_prefixes: bool,
	span: Span,
}

impl Structure {
	/// Create a structure, rejecting unnamed variable-span fields.
	pub(crate) fn new(fields: Vec<Layout>, decode_prefixes: bool) -> Result<Self> {
		let mut total = 0_usize;
		let mut fixed = true;
		for (index, field) in fields.iter().enumerate() {
			match field.span() {
				Span::Fixed(span) => {
					total = total.checked_add(span).ok_or(LayoutError::SpanOverflow)?;
				}
				Span::Variable => {
					if field.property().is_none() {
						return Err(LayoutError::UnnamedVariableField { index });
					}
					fixed = false;
				}
			}
		}

		Ok(Self {
			fields,
			decode_prefixes,
			span: if fixed { Span::Fixed(total) } else { Span::Variable },
		})
	}

	/// Child layouts in declaration order.
	pub fn fields(&self) -> &[Layout] {
		&self.fields
	}

	/// Whether decoding stops cleanly at the end of a short buffer.
	pub fn decode_prefixes(&self) -> bool {
		self.decode_prefixes
	}

	/// Look up a child layout by property name.
	pub fn layout_for(&self, name: &str) -> Option<&Layout> {
		self.fields.iter().find(|field| field.property() == Some(name))
	}

	/// Statically-known byte offset of a named field.
	///
	/// `None` once any variable-span sibling precedes the field, or when
	/// no field carries the name.
	pub fn offset_of(&self, name: &str) -> Option<usize> {
		let mut at = 0_usize;
		for field in &self.fields {
			if field.property() == Some(name) {
				return Some(at);
			}
			at += field.span().fixed()?;
		}
		None
	}

	pub(crate) fn span(&self) -> Span {
		self.span
	}

	pub(crate) fn get_span(&self, buf: &[u8], offset: usize) -> Result<usize> {
		if let Span::Fixed(span) = self.span {
			return Ok(span);
		}

		let mut pos = offset;
		for field in &self.fields {
			let span = field.get_span(buf, pos)?;
			pos = pos.checked_add(span).ok_or(LayoutError::SpanOverflow)?;
		}
		Ok(pos - offset)
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		let mut dest = Record::new();
		let mut pos = offset;

		for field in &self.fields {
			if self.decode_prefixes {
				// A field that would run past the buffer end stops the
				// decode cleanly with the prefix assembled so far.
				match field.get_span(buf, pos) {
					Ok(span) if pos.checked_add(span).is_some_and(|end| end <= buf.len()) => {}
					Ok(_) | Err(LayoutError::UnexpectedEof { .. }) => break,
					Err(err) => return Err(err),
				}
			}

			let span = field.get_span(buf, pos)?;
			if let Some(property) = field.property() {
				dest.set(property, field.decode(buf, pos)?);
			}
			pos = pos.checked_add(span).ok_or(LayoutError::SpanOverflow)?;
		}

		Ok(Value::Record(dest))
	}

	pub(crate) fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let record = src.as_record().ok_or(LayoutError::TypeMismatch {
			expected: "record",
			got: src.kind(),
		})?;

		let mut pos = offset;
		for field in &self.fields {
			let advance = match field.property() {
				Some(property) => match record.get(property) {
					Some(value) => {
						field.encode(value, buf, pos)?;
						// Fixed-span fields reserve their full span even
						// when a union variant wrote fewer bytes.
						match field.span() {
							Span::Fixed(span) => span,
							Span::Variable => field.get_span(buf, pos)?,
						}
					}
					// Missing fields leave their bytes untouched.
					None => field.get_span(buf, pos)?,
				},
				None => field.fixed_span()?,
			};
			pos = pos.checked_add(advance).ok_or(LayoutError::SpanOverflow)?;
		}

		Ok(pos - offset)
	}

	pub(crate) fn from_values(&self, values: Vec<Value>) -> Record {
		let mut dest = Record::new();
		let mut values = values.into_iter();
		for field in &self.fields {
			let Some(property) = field.property() else { continue };
			let Some(value) = values.next() else { break };
			dest.set(property, value);
		}
		dest
	}
}
