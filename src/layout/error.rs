use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors produced while constructing layouts and while decoding or
/// encoding byte regions through them.
#[derive(Debug, Error)]
pub enum LayoutError {
	/// Not enough bytes remained for a requested read or write.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the access was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Integer input does not fit the declared width and signedness.
	#[error("value {value} does not fit {width}-byte integer (signed={signed})")]
	ValueOutOfRange {
		/// Offending input value.
		value: i128,
		/// Declared byte width.
		width: usize,
		/// Declared signedness.
		signed: bool,
	},
	/// Near-64 input is not an encodable integral double.
	#[error("value {value} is not an encodable 64-bit integer (signed={signed})")]
	NearIntNotEncodable {
		/// Offending input value.
		value: f64,
		/// Declared signedness.
		signed: bool,
	},
	/// Encoded UTF-8 length exceeded the configured ceiling.
	#[error("encoded length {len} exceeds maximum span {max}")]
	MaxSpanExceeded {
		/// Encoded byte length of the input.
		len: usize,
		/// Configured maximum span.
		max: usize,
	},
	/// Bit-field input does not fit the declared bit width.
	#[error("value {value} does not fit {bits}-bit field")]
	BitValueOutOfRange {
		/// Offending input value.
		value: u64,
		/// Declared bit width.
		bits: u32,
	},
	/// Strict sequence encode saw more source elements than the fixed count.
	#[error("sequence source length {len} exceeds fixed count {count}")]
	SequenceOverflow {
		/// Source element count.
		len: usize,
		/// Declared fixed count.
		count: usize,
	},
	/// Fixed-length blob source did not match the configured length.
	#[error("blob length {len} does not match fixed length {expected}")]
	LengthMismatch {
		/// Source byte length.
		len: usize,
		/// Configured fixed length.
		expected: usize,
	},
	/// Relative displacement resolved before the start of the buffer.
	#[error("offset {base} displaced by {delta} is out of bounds")]
	NegativeOffset {
		/// Base offset handed to the consumer.
		base: usize,
		/// Signed displacement.
		delta: isize,
	},
	/// Span arithmetic overflowed.
	#[error("span arithmetic overflowed")]
	SpanOverflow,
	/// A fixed span was requested from a variable-span node without buffer context.
	#[error("span is not resolvable without buffer context")]
	UnresolvedSpan,
	/// Union decode saw an unregistered tag and no default layout exists.
	#[error("unknown union variant tag {tag}")]
	UnknownVariant {
		/// Tag read through the discriminator.
		tag: u64,
	},
	/// No unique variant could be inferred from a structured source value.
	#[error("cannot infer union variant from source value")]
	AmbiguousVariant,
	/// Integer leaf width outside the supported 1-6 byte range.
	#[error("unsupported integer width {width} (expected 1-6)")]
	InvalidWidth {
		/// Requested byte width.
		width: usize,
	},
	/// A structure contains an unnamed variable-span field.
	#[error("unnamed variable-span field at index {index}")]
	UnnamedVariableField {
		/// Position of the offending field.
		index: usize,
	},
	/// Greedy count constructed with a zero element span.
	#[error("greedy element span must be at least 1")]
	ZeroElementSpan,
	/// Sequence count source is neither an integer nor a count-valued external.
	#[error("sequence count layout does not decode to a count")]
	InvalidCount,
	/// Bit-structure word span outside the supported 1-4 byte range.
	#[error("unsupported bit-structure word span {span} (expected 1-4)")]
	InvalidWordSpan {
		/// Requested word byte span.
		span: usize,
	},
	/// Bit field width outside the supported 1-32 bit range.
	#[error("unsupported bit field width {bits} (expected 1-32)")]
	BitFieldTooWide {
		/// Requested bit width.
		bits: u32,
	},
	/// Bit field does not fit the remaining word bits.
	#[error("bit field of {bits} bits does not fit word: {used} of {word_bits} bits used")]
	BitFieldOverflow {
		/// Requested bit width.
		bits: u32,
		/// Bits already allocated.
		used: u32,
		/// Total bits in the word.
		word_bits: u32,
	},
	/// Union default layout is variable-span.
	#[error("union default layout must be fixed-span")]
	DefaultNotFixed,
	/// Variant tag registered twice on one union.
	#[error("duplicate union variant tag {tag}")]
	DuplicateVariant {
		/// Repeated tag value.
		tag: u64,
	},
	/// Variant inner layout does not fit the union's default span.
	#[error("variant {tag} span {span} exceeds available {max} bytes")]
	VariantSpanExceedsDefault {
		/// Variant tag.
		tag: u64,
		/// Inner layout span.
		span: usize,
		/// Bytes available inside the default layout.
		max: usize,
	},
	/// Two union properties would collide during source-variant inference.
	#[error("union property collision on {property}")]
	PropertyCollision {
		/// Colliding property name.
		property: Box<str>,
	},
	/// Input value has the wrong shape for the target layout.
	#[error("type mismatch: expected {expected}, got {got}")]
	TypeMismatch {
		/// Expected logical value kind.
		expected: &'static str,
		/// Actual logical value kind.
		got: &'static str,
	},
	/// A required record field was missing from the source value.
	#[error("missing field {field}")]
	MissingField {
		/// Missing field name.
		field: Box<str>,
	},
	/// Decoded bytes were not valid UTF-8.
	#[error("invalid utf-8 at offset {at}")]
	InvalidUtf8 {
		/// Offset of the decoded region.
		at: usize,
	},
}
