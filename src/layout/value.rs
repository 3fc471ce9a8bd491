/// Decoded value and encode-input model shared by every layout node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Two-valued logical, produced by single-bit boolean fields.
	Bool(bool),
	/// Non-negative integer scalar.
	U64(u64),
	/// Signed integer scalar.
	I64(i64),
	/// IEEE-754 double, including near-64 integer decodes.
	F64(f64),
	/// Raw byte sequence.
	Bytes(Vec<u8>),
	/// Text string.
	Str(Box<str>),
	/// Ordered list, produced by sequences.
	List(Vec<Value>),
	/// Record keyed by field name, produced by structures, bit
	/// structures, and union variants.
	Record(Record),
}

/// Ordered map from property name to value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
	fields: Vec<(Box<str>, Value)>,
}

impl Value {
	/// Stable lowercase label for the value's logical kind.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::U64(_) => "u64",
			Self::I64(_) => "i64",
			Self::F64(_) => "f64",
			Self::Bytes(_) => "bytes",
			Self::Str(_) => "str",
			Self::List(_) => "list",
			Self::Record(_) => "record",
		}
	}

	/// Interpret the value as a non-negative count or tag.
	///
	/// Accepts `U64`, non-negative `I64`, and integral non-negative `F64`.
	pub fn as_count(&self) -> Option<u64> {
		match self {
			Self::U64(v) => Some(*v),
			Self::I64(v) => u64::try_from(*v).ok(),
			Self::F64(v) if v.is_finite() && v.fract() == 0.0 && *v >= 0.0 && *v < u64::MAX as f64 => Some(*v as u64),
			_ => None,
		}
	}

	/// Interpret the value as a signed integer wide enough for any leaf.
	pub fn as_i128(&self) -> Option<i128> {
		match self {
			Self::U64(v) => Some(i128::from(*v)),
			Self::I64(v) => Some(i128::from(*v)),
			Self::F64(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i128),
			_ => None,
		}
	}

	/// Interpret the value as a double.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::U64(v) => Some(*v as f64),
			Self::I64(v) => Some(*v as f64),
			Self::F64(v) => Some(*v),
			_ => None,
		}
	}

	/// Borrow the record payload, if any.
	pub fn as_record(&self) -> Option<&Record> {
		match self {
			Self::Record(record) => Some(record),
			_ => None,
		}
	}

	/// Borrow the list payload, if any.
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	/// Borrow the byte payload, if any.
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::Bytes(bytes) => Some(bytes),
			_ => None,
		}
	}

	/// Borrow the string payload, if any.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(text) => Some(text),
			_ => None,
		}
	}
}

impl Record {
	/// Create an empty record.
	pub fn new() -> Self {
		Self { fields: Vec::new() }
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the record has no fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Look up a field by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|(field, _)| &**field == name).map(|(_, value)| value)
	}

	/// Whether a field with this name exists.
	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Insert a field, replacing an existing one in place.
	pub fn set(&mut self, name: &str, value: Value) {
		if let Some(slot) = self.fields.iter_mut().find(|(field, _)| &**field == name) {
			slot.1 = value;
			return;
		}
		self.fields.push((name.into(), value));
	}

	/// Iterate fields in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
		self.fields.iter().map(|(name, value)| (&**name, value))
	}
}

impl FromIterator<(Box<str>, Value)> for Record {
	fn from_iter<I: IntoIterator<Item = (Box<str>, Value)>>(iter: I) -> Self {
		Self {
			fields: iter.into_iter().collect(),
		}
	}
}
