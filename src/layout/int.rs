use crate::layout::bytes::{take, take_mut};
use crate::layout::{LayoutError, Result, Value};

/// Byte order declared per numeric leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
	/// Least-significant byte first.
	Little,
	/// Most-significant byte first.
	Big,
}

/// Integer leaf of 1-6 bytes in either byte order.
#[derive(Debug, Clone, Copy)]
pub struct IntLayout {
	width: usize,
	signed: bool,
	endian: Endian,
}

impl IntLayout {
	/// Create an integer leaf, rejecting widths outside 1-6 bytes.
	pub fn new(width: usize, signed: bool, endian: Endian) -> Result<Self> {
		if width == 0 || width > 6 {
			return Err(LayoutError::InvalidWidth { width });
		}
		Ok(Self { width, signed, endian })
	}

	pub(crate) fn fixed(width: usize, signed: bool, endian: Endian) -> Self {
		Self { width, signed, endian }
	}

	/// Declared byte width.
	pub fn width(&self) -> usize {
		self.width
	}

	/// Declared signedness.
	pub fn signed(&self) -> bool {
		self.signed
	}

	/// Read the raw unsigned word without sign extension.
	pub(crate) fn read_raw(&self, buf: &[u8], offset: usize) -> Result<u64> {
		let bytes = take(buf, offset, self.width)?;
		let mut raw = 0_u64;
		match self.endian {
			Endian::Little => {
				for byte in bytes.iter().rev() {
					raw = raw << 8 | u64::from(*byte);
				}
			}
			Endian::Big => {
				for byte in bytes {
					raw = raw << 8 | u64::from(*byte);
				}
			}
		}
		Ok(raw)
	}

	/// Write the low `width` bytes of a raw word.
	pub(crate) fn write_raw(&self, raw: u64, buf: &mut [u8], offset: usize) -> Result<()> {
		let bytes = take_mut(buf, offset, self.width)?;
		for (index, slot) in bytes.iter_mut().enumerate() {
			let shift = match self.endian {
				Endian::Little => 8 * index,
				Endian::Big => 8 * (self.width - 1 - index),
			};
			*slot = (raw >> shift) as u8;
		}
		Ok(())
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		let raw = self.read_raw(buf, offset)?;
		if !self.signed {
			return Ok(Value::U64(raw));
		}

		let shift = 64 - 8 * self.width as u32;
		Ok(Value::I64(((raw << shift) as i64) >> shift))
	}

	pub(crate) fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let value = src.as_i128().ok_or(LayoutError::TypeMismatch {
			expected: "integer",
			got: src.kind(),
		})?;

		let bits = 8 * self.width as u32;
		let in_range = if self.signed {
			let bound = 1_i128 << (bits - 1);
			value >= -bound && value < bound
		} else {
			value >= 0 && value < 1_i128 << bits
		};
		if !in_range {
			return Err(LayoutError::ValueOutOfRange {
				value,
				width: self.width,
				signed: self.signed,
			});
		}

		self.write_raw(value as u64, buf, offset)?;
		Ok(self.width)
	}
}

/// Eight-byte integer leaf decoded as a double.
///
/// Values above 2^53 in magnitude lose precision in the conversion; that
/// loss is documented behavior, not an error.
#[derive(Debug, Clone, Copy)]
pub struct NearIntLayout {
	signed: bool,
	endian: Endian,
}

impl NearIntLayout {
	pub(crate) const SPAN: usize = 8;

	pub(crate) fn new(signed: bool, endian: Endian) -> Self {
		Self { signed, endian }
	}

	fn word(&self) -> IntLayout {
		IntLayout::fixed(Self::SPAN, false, self.endian)
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		let raw = self.word().read_raw(buf, offset)?;
		if self.signed {
			Ok(Value::F64(raw as i64 as f64))
		} else {
			Ok(Value::F64(raw as f64))
		}
	}

	pub(crate) fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let value = src.as_f64().ok_or(LayoutError::TypeMismatch {
			expected: "integer",
			got: src.kind(),
		})?;
		if !value.is_finite() || value.fract() != 0.0 {
			return Err(LayoutError::NearIntNotEncodable { value, signed: self.signed });
		}

		let raw = if self.signed {
			if value < -(2_f64.powi(63)) || value >= 2_f64.powi(63) {
				return Err(LayoutError::NearIntNotEncodable { value, signed: self.signed });
			}
			value as i64 as u64
		} else {
			if value < 0.0 || value >= 2_f64.powi(64) {
				return Err(LayoutError::NearIntNotEncodable { value, signed: self.signed });
			}
			value as u64
		};

		self.word().write_raw(raw, buf, offset)?;
		Ok(Self::SPAN)
	}
}

/// IEEE-754 float leaf, single or double precision.
#[derive(Debug, Clone, Copy)]
pub struct FloatLayout {
	double: bool,
	endian: Endian,
}

impl FloatLayout {
	pub(crate) fn new(double: bool, endian: Endian) -> Self {
		Self { double, endian }
	}

	pub(crate) fn span(&self) -> usize {
		if self.double { 8 } else { 4 }
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		if self.double {
			let mut raw = [0_u8; 8];
			raw.copy_from_slice(take(buf, offset, 8)?);
			let value = match self.endian {
				Endian::Little => f64::from_le_bytes(raw),
				Endian::Big => f64::from_be_bytes(raw),
			};
			Ok(Value::F64(value))
		} else {
			let mut raw = [0_u8; 4];
			raw.copy_from_slice(take(buf, offset, 4)?);
			let value = match self.endian {
				Endian::Little => f32::from_le_bytes(raw),
				Endian::Big => f32::from_be_bytes(raw),
			};
			Ok(Value::F64(f64::from(value)))
		}
	}

	pub(crate) fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let value = src.as_f64().ok_or(LayoutError::TypeMismatch {
			expected: "float",
			got: src.kind(),
		})?;

		if self.double {
			let raw = match self.endian {
				Endian::Little => value.to_le_bytes(),
				Endian::Big => value.to_be_bytes(),
			};
			take_mut(buf, offset, 8)?.copy_from_slice(&raw);
			Ok(8)
		} else {
			let raw = match self.endian {
				Endian::Little => (value as f32).to_le_bytes(),
				Endian::Big => (value as f32).to_be_bytes(),
			};
			take_mut(buf, offset, 4)?.copy_from_slice(&raw);
			Ok(4)
		}
	}
}
