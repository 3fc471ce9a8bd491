use crate::layout::int::{Endian, IntLayout};
use crate::layout::node::{Layout, LayoutKind};
use crate::layout::{LayoutError, Record, Result, Value};

/// One sub-word field inside a bit structure.
#[derive(Debug, Clone)]
pub struct BitField {
	bits: u32,
	start: u32,
	value_mask: u32,
	word_mask: u32,
	property: Option<Box<str>>,
	boolean: bool,
}

impl BitField {
	/// Bit width of the field.
	pub fn bits(&self) -> u32 {
		self.bits
	}

	/// Least-significant bit position inside the word.
	pub fn start(&self) -> u32 {
		self.start
	}

	/// Mask over the field's value range.
	pub fn value_mask(&self) -> u32 {
		self.value_mask
	}

	/// Value mask shifted to the field's word position.
	pub fn word_mask(&self) -> u32 {
		self.word_mask
	}

	/// Property name, `None` for padding fields.
	pub fn property(&self) -> Option<&str> {
		self.property.as_deref()
	}
}

/// Multiple sub-byte fields packed inside one 1-4 byte integer word.
#[derive(Debug, Clone)]
pub struct BitStructure {
	word: IntLayout,
	msb_first: bool,
	fields: Vec<BitField>,
}

impl BitStructure {
	/// Fields in registration order.
	pub fn fields(&self) -> &[BitField] {
		&self.fields
	}

	/// Whether the first-added field occupies the most-significant bits.
	pub fn msb_first(&self) -> bool {
		self.msb_first
	}

	/// Byte span of the backing word.
	pub fn word_span(&self) -> usize {
		self.word.width()
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		let word = self.word.read_raw(buf, offset)? as u32;
		let mut dest = Record::new();
		for field in &self.fields {
			let Some(property) = field.property() else { continue };
			let value = (word >> field.start) & field.value_mask;
			let value = if field.boolean { Value::Bool(value != 0) } else { Value::U64(u64::from(value)) };
			dest.set(property, value);
		}
		Ok(Value::Record(dest))
	}

	pub(crate) fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let record = src.as_record().ok_or(LayoutError::TypeMismatch {
			expected: "record",
			got: src.kind(),
		})?;

		// Absent fields and unused bits keep whatever the buffer holds.
		let mut word = self.word.read_raw(buf, offset)? as u32;
		for field in &self.fields {
			let Some(property) = field.property() else { continue };
			let Some(value) = record.get(property) else { continue };

			let bits = if field.boolean {
				match value {
					Value::Bool(flag) => u32::from(*flag),
					other => {
						let raw = other.as_count().ok_or(LayoutError::TypeMismatch {
							expected: "bool",
							got: other.kind(),
						})?;
						u32::from(raw != 0)
					}
				}
			} else {
				let raw = value.as_count().ok_or(LayoutError::TypeMismatch {
					expected: "integer",
					got: value.kind(),
				})?;
				let narrowed = u32::try_from(raw).map_err(|_| LayoutError::BitValueOutOfRange {
					value: raw,
					bits: field.bits,
				})?;
				if narrowed & !field.value_mask != 0 {
					return Err(LayoutError::BitValueOutOfRange {
						value: raw,
						bits: field.bits,
					});
				}
				narrowed
			};

			word = (word & !field.word_mask) | ((bits & field.value_mask) << field.start);
		}

		self.word.write_raw(u64::from(word), buf, offset)?;
		Ok(self.word.width())
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

/// Accumulates bit fields, then freezes an immutable [`BitStructure`].
#[derive(Debug, Clone)]
pub struct BitStructureBuilder {
	word: IntLayout,
	word_bits: u32,
	msb_first: bool,
	used: u32,
	fields: Vec<(u32, Option<Box<str>>, bool)>,
}

impl BitStructureBuilder {
	/// Start a bit structure over an unsigned word of 1-4 bytes.
	pub fn new(word_span: usize, endian: Endian) -> Result<Self> {
		if word_span == 0 || word_span > 4 {
			return Err(LayoutError::InvalidWordSpan { span: word_span });
		}
		Ok(Self {
			word: IntLayout::fixed(word_span, false, endian),
			word_bits: 8 * word_span as u32,
			msb_first: false,
			used: 0,
			fields: Vec::new(),
		})
	}

	/// Let the first-added field occupy the most-significant bits.
	pub fn msb_first(mut self) -> Self {
		self.msb_first = true;
		self
	}

	/// Append a named field of the given bit width.
	pub fn add_field(self, bits: u32, property: &str) -> Result<Self> {
		self.push(bits, Some(property.into()), false)
	}

	/// Append a single-bit field decoding to a two-valued logical.
	pub fn add_boolean(self, property: &str) -> Result<Self> {
		self.push(1, Some(property.into()), true)
	}

	/// Append anonymous padding bits, preserved across encode.
	pub fn add_padding(self, bits: u32) -> Result<Self> {
		self.push(bits, None, false)
	}

	fn push(mut self, bits: u32, property: Option<Box<str>>, boolean: bool) -> Result<Self> {
		if bits == 0 || bits > 32 {
			return Err(LayoutError::BitFieldTooWide { bits });
		}
		if self.used + bits > self.word_bits {
			return Err(LayoutError::BitFieldOverflow {
				bits,
				used: self.used,
				word_bits: self.word_bits,
			});
		}
		self.used += bits;
		self.fields.push((bits, property, boolean));
		Ok(self)
	}

	/// Freeze the accumulated fields into a layout node.
	pub fn build(self) -> Layout {
		let mut consumed = 0_u32;
		let mut fields = Vec::with_capacity(self.fields.len());
		for (bits, property, boolean) in self.fields {
			let start = if self.msb_first {
				self.word_bits - consumed - bits
			} else {
				consumed
			};
			consumed += bits;

			let value_mask = if bits == 32 { u32::MAX } else { (1 << bits) - 1 };
			fields.push(BitField {
				bits,
				start,
				value_mask,
				word_mask: value_mask << start,
				property,
				boolean,
			});
		}

		Layout::new(LayoutKind::Bits(BitStructure {
			word: self.word,
			msb_first: self.msb_first,
			fields,
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::BitStructureBuilder;
	use crate::layout::int::Endian;
	use crate::layout::{LayoutError, Record, Value};

	fn record(fields: &[(&str, u64)]) -> Value {
		let mut dest = Record::new();
		for (name, value) in fields {
			dest.set(name, Value::U64(*value));
		}
		Value::Record(dest)
	}

	#[test]
	fn lsb_first_packs_from_the_low_bits() {
		let bits = BitStructureBuilder::new(2, Endian::Little)
			.expect("word span 2 is valid")
			.add_field(3, "a")
			.expect("a fits")
			.add_field(5, "b")
			.expect("b fits")
			.add_field(8, "c")
			.expect("c fits")
			.build();

		let mut buf = [0_u8; 2];
		bits.encode(&record(&[("a", 5), ("b", 17), ("c", 0xa5)]), &mut buf, 0).expect("encodes");
		assert_eq!(buf, [0x8d, 0xa5]);
		assert_eq!(bits.decode(&buf, 0).expect("decodes"), record(&[("a", 5), ("b", 17), ("c", 0xa5)]));
	}

	#[test]
	fn msb_first_packs_from_the_high_bits() {
		let bits = BitStructureBuilder::new(1, Endian::Little)
			.expect("word span 1 is valid")
			.msb_first()
			.add_field(3, "a")
			.expect("a fits")
			.add_field(5, "b")
			.expect("b fits")
			.build();

		let mut buf = [0_u8; 1];
		bits.encode(&record(&[("a", 0b101), ("b", 0b10001)]), &mut buf, 0).expect("encodes");
		assert_eq!(buf, [0b101_10001]);
	}

	#[test]
	fn encode_preserves_unaddressed_bits() {
		let bits = BitStructureBuilder::new(1, Endian::Little)
			.expect("word span 1 is valid")
			.add_field(4, "low")
			.expect("low fits")
			.add_field(4, "high")
			.expect("high fits")
			.build();

		let mut buf = [0xff_u8];
		bits.encode(&record(&[("low", 0)]), &mut buf, 0).expect("encodes");
		assert_eq!(buf, [0xf0], "bits of the absent field survive");
	}

	#[test]
	fn overflowing_field_is_rejected_at_registration() {
		let builder = BitStructureBuilder::new(1, Endian::Little)
			.expect("word span 1 is valid")
			.add_field(6, "a")
			.expect("a fits");
		let err = builder.add_field(3, "b").expect_err("9 bits exceed the byte");
		assert!(matches!(
			err,
			LayoutError::BitFieldOverflow {
				bits: 3,
				used: 6,
				word_bits: 8
			}
		));
	}

	#[test]
	fn boolean_decodes_any_nonzero_bit_pattern_as_true() {
		let bits = BitStructureBuilder::new(1, Endian::Little)
			.expect("word span 1 is valid")
			.add_boolean("flag")
			.expect("flag fits")
			.add_padding(7)
			.expect("padding fits")
			.build();

		let mut expected = Record::new();
		expected.set("flag", Value::Bool(true));
		assert_eq!(bits.decode(&[0x01], 0).expect("decodes"), Value::Record(expected));

		let mut buf = [0_u8];
		let mut src = Record::new();
		src.set("flag", Value::Bool(true));
		bits.encode(&Value::Record(src), &mut buf, 0).expect("encodes");
		assert_eq!(buf, [0x01]);
	}
}
