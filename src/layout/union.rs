use std::fmt;
use std::sync::Arc;

use crate::layout::node::{Layout, LayoutKind, Span};
use crate::layout::{LayoutError, Record, Result, Value};

const DEFAULT_DISCR_PROPERTY: &str = "variant";
const DEFAULT_CONTENT_PROPERTY: &str = "content";

/// Reads and writes a union's variant tag.
///
/// A *prefix* discriminator is an unsigned integer leaf physically stored
/// at the union's start; an *external* discriminator reads a count-valued
/// node whose bytes live outside the union's own span.
#[derive(Debug, Clone)]
pub struct Discriminator {
	layout: Box<Layout>,
	prefix: bool,
	property: Box<str>,
}

impl Discriminator {
	/// Discriminator stored at the union's start.
	///
	/// The tag layout must be an unsigned integer leaf; its property
	/// defaults to `"variant"` when it carries none.
	pub fn prefix(tag: Layout) -> Result<Self> {
		let unsigned = matches!(tag.kind(), LayoutKind::Int(int) if !int.signed());
		if !unsigned {
			return Err(LayoutError::InvalidCount);
		}

		let property = tag.property().unwrap_or(DEFAULT_DISCR_PROPERTY).into();
		Ok(Self {
			layout: Box::new(tag),
			prefix: true,
			property,
		})
	}

	/// Discriminator read through a count-valued external node.
	pub fn external(source: Layout) -> Result<Self> {
		if !source.is_count() {
			return Err(LayoutError::InvalidCount);
		}

		let property = source.property().unwrap_or(DEFAULT_DISCR_PROPERTY).into();
		Ok(Self {
			layout: Box::new(source),
			prefix: false,
			property,
		})
	}

	/// Whether the tag occupies the union's leading bytes.
	pub fn is_prefix(&self) -> bool {
		self.prefix
	}

	/// Property name the tag appears under in default-path records.
	pub fn property(&self) -> &str {
		&self.property
	}

	/// Bytes the tag occupies inside the union.
	pub fn span(&self) -> usize {
		if self.prefix {
			self.layout.span().fixed().unwrap_or(0)
		} else {
			0
		}
	}

	/// Read the tag at a union starting at `offset`.
	pub fn read(&self, buf: &[u8], offset: usize) -> Result<u64> {
		let value = self.layout.decode(buf, offset)?;
		value.as_count().ok_or(LayoutError::TypeMismatch {
			expected: "count",
			got: value.kind(),
		})
	}

	/// Write the tag for a union starting at `offset`.
	///
	/// Returns the bytes occupied inside the union, zero for an external
	/// tag (its bytes are written elsewhere and excluded from encode
	/// totals).
	pub fn write(&self, tag: u64, buf: &mut [u8], offset: usize) -> Result<usize> {
		self.layout.encode(&Value::U64(tag), buf, offset)?;
		Ok(self.span())
	}
}

/// Replaceable source-variant chooser.
///
/// Receives the union and the source record; returns the variant the
/// record should encode through, or `None` for the default-layout path.
/// [`Union::default_source_variant`] is available for chaining.
pub type SourceVariantFn = Arc<dyn Fn(&Union, &Record) -> Result<Option<Arc<VariantLayout>>> + Send + Sync>;

/// Tagged-union node: a discriminator source, an optional default
/// layout, and a registry of variants.
#[derive(Clone)]
pub struct Union {
	discr: Arc<Discriminator>,
	default_layout: Option<Box<Layout>>,
	variants: Vec<Arc<VariantLayout>>,
	chooser: Option<SourceVariantFn>,
	span: Span,
}

impl fmt::Debug for Union {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Union")
			.field("discr", &self.discr)
			.field("default_layout", &self.default_layout)
			.field("variants", &self.variants)
			.field("span", &self.span)
			.finish_non_exhaustive()
	}
}

impl Union {
	/// The discriminator source.
	pub fn discriminator(&self) -> &Discriminator {
		&self.discr
	}

	/// The fallback layout for unregistered tags, if any.
	pub fn default_layout(&self) -> Option<&Layout> {
		self.default_layout.as_deref()
	}

	/// Registered variants in registration order.
	pub fn variants(&self) -> impl Iterator<Item = &VariantLayout> + '_ {
		self.variants.iter().map(|variant| &**variant)
	}

	/// Look up a registered variant by tag.
	pub fn variant(&self, tag: u64) -> Option<&VariantLayout> {
		self.variants.iter().find(|variant| variant.tag == tag).map(|variant| &**variant)
	}

	fn variant_rc(&self, tag: u64) -> Option<&Arc<VariantLayout>> {
		self.variants.iter().find(|variant| variant.tag == tag)
	}

	/// Read the tag at `offset` and resolve the registered variant.
	pub fn variant_at(&self, buf: &[u8], offset: usize) -> Result<&VariantLayout> {
		let tag = self.discr.read(buf, offset)?;
		self.variant(tag).ok_or(LayoutError::UnknownVariant { tag })
	}

	fn content_property(&self) -> &str {
		self.default_layout
			.as_deref()
			.and_then(Layout::property)
			.unwrap_or(DEFAULT_CONTENT_PROPERTY)
	}

	pub(crate) fn span(&self) -> Span {
		self.span
	}

	pub(crate) fn get_span(&self, buf: &[u8], offset: usize) -> Result<usize> {
		if let Span::Fixed(span) = self.span {
			return Ok(span);
		}

		let tag = self.discr.read(buf, offset)?;
		let variant = self.variant_rc(tag).ok_or(LayoutError::UnknownVariant { tag })?;
		variant.get_span(buf, offset)
	}

	pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		let tag = self.discr.read(buf, offset)?;
		if let Some(variant) = self.variant_rc(tag) {
			return variant.decode(buf, offset);
		}

		let Some(default_layout) = self.default_layout.as_deref() else {
			return Err(LayoutError::UnknownVariant { tag });
		};

		let mut dest = Record::new();
		dest.set(self.discr.property(), Value::U64(tag));
		dest.set(self.content_property(), default_layout.decode(buf, offset + self.discr.span())?);
		Ok(Value::Record(dest))
	}

	pub(crate) fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let record = src.as_record().ok_or(LayoutError::TypeMismatch {
			expected: "record",
			got: src.kind(),
		})?;

		let chosen = match &self.chooser {
			Some(chooser) => chooser(self, record)?,
			None => self.default_source_variant(record)?,
		};

		match chosen {
			Some(variant) => variant.encode(src, buf, offset),
			None => self.encode_default(record, buf, offset),
		}
	}

	fn encode_default(&self, record: &Record, buf: &mut [u8], offset: usize) -> Result<usize> {
		let default_layout = self.default_layout.as_deref().ok_or(LayoutError::AmbiguousVariant)?;

		let tag_value = record.get(self.discr.property()).ok_or_else(|| LayoutError::MissingField {
			field: self.discr.property().into(),
		})?;
		let tag = tag_value.as_count().ok_or(LayoutError::TypeMismatch {
			expected: "count",
			got: tag_value.kind(),
		})?;

		let content = record.get(self.content_property()).ok_or_else(|| LayoutError::MissingField {
			field: self.content_property().into(),
		})?;

		let prefix = self.discr.write(tag, buf, offset)?;
		let wrote = default_layout.encode(content, buf, offset + prefix)?;
		Ok(prefix + wrote)
	}

	/// Default source-variant inference; first matching rule wins.
	///
	/// 1. Discriminator property and default content property both
	///    present: the default-layout path.
	/// 2. Discriminator property names a registered variant that is
	///    tag-only or whose property is present: that variant.
	/// 3. No discriminator property, but exactly one variant's property
	///    present: that variant.
	pub fn default_source_variant(&self, src: &Record) -> Result<Option<Arc<VariantLayout>>> {
		if src.contains(self.discr.property()) {
			if self.default_layout.is_some() && src.contains(self.content_property()) {
				return Ok(None);
			}

			if let Some(tag) = src.get(self.discr.property()).and_then(Value::as_count) {
				if let Some(variant) = self.variant_rc(tag) {
					if variant.inner.is_none() || src.contains(&variant.property) {
						return Ok(Some(Arc::clone(variant)));
					}
				}
			}
			return Err(LayoutError::AmbiguousVariant);
		}

		let mut matched = None;
		for variant in &self.variants {
			if src.contains(&variant.property) {
				if matched.is_some() {
					return Err(LayoutError::AmbiguousVariant);
				}
				matched = Some(Arc::clone(variant));
			}
		}
		matched.map(Some).ok_or(LayoutError::AmbiguousVariant)
	}
}

/// One alternative interpretation of a union's payload.
///
/// Holds a non-owning handle to the union's discriminator for
/// encode-time tag writes.
#[derive(Debug, Clone)]
pub struct VariantLayout {
	tag: u64,
	inner: Option<Box<Layout>>,
	property: Box<str>,
	discr: Arc<Discriminator>,
	span: Span,
}

impl VariantLayout {
	/// Tag selecting this variant.
	pub fn tag(&self) -> u64 {
		self.tag
	}

	/// Inner payload layout, `None` for tag-only variants.
	pub fn inner(&self) -> Option<&Layout> {
		self.inner.as_deref()
	}

	/// Property the payload appears under in decoded records.
	pub fn property(&self) -> &str {
		&self.property
	}

	/// Span of one instance of this variant.
	pub fn span(&self) -> Span {
		self.span
	}

	/// Resolve the span against a buffer.
	pub fn get_span(&self, buf: &[u8], offset: usize) -> Result<usize> {
		if let Span::Fixed(span) = self.span {
			return Ok(span);
		}

		let prefix = self.discr.span();
		let inner = match self.inner.as_deref() {
			Some(inner) => inner.get_span(buf, offset + prefix)?,
			None => 0,
		};
		Ok(prefix + inner)
	}

	/// Decode the payload, wrapped under the variant's property.
	///
	/// Tag-only variants decode to the empty record.
	pub fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		let mut dest = Record::new();
		if let Some(inner) = self.inner.as_deref() {
			dest.set(&self.property, inner.decode(buf, offset + self.discr.span())?);
		}
		Ok(Value::Record(dest))
	}

	/// Write the tag through the discriminator, then the payload.
	pub fn encode(&self, src: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let record = src.as_record().ok_or(LayoutError::TypeMismatch {
			expected: "record",
			got: src.kind(),
		})?;

		let prefix = self.discr.write(self.tag, buf, offset)?;
		let Some(inner) = self.inner.as_deref() else {
			return Ok(prefix);
		};

		let payload = record.get(&self.property).ok_or_else(|| LayoutError::MissingField {
			field: self.property.clone(),
		})?;
		let wrote = inner.encode(payload, buf, offset + prefix)?;
		Ok(prefix + wrote)
	}

	/// Pair positional values with the inner layout's named children.
	pub fn from_values(&self, values: Vec<Value>) -> Option<Record> {
		self.inner.as_deref()?.from_values(values)
	}
}

/// Accumulates discriminator, default layout, and variants, then freezes
/// an immutable [`Union`].
pub struct UnionBuilder {
	discr: Discriminator,
	default_layout: Option<Layout>,
	variants: Vec<(u64, Option<Layout>, Box<str>)>,
	chooser: Option<SourceVariantFn>,
}

impl fmt::Debug for UnionBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UnionBuilder")
			.field("discr", &self.discr)
			.field("default_layout", &self.default_layout)
			.field("variants", &self.variants)
			.finish_non_exhaustive()
	}
}

impl UnionBuilder {
	/// Start a union with a prefix discriminator.
	pub fn prefix(tag: Layout) -> Result<Self> {
		Ok(Self::with_discriminator(Discriminator::prefix(tag)?))
	}

	/// Start a union with an external discriminator.
	pub fn external(source: Layout) -> Result<Self> {
		Ok(Self::with_discriminator(Discriminator::external(source)?))
	}

	/// Start a union with a pre-built discriminator, used verbatim.
	pub fn with_discriminator(discr: Discriminator) -> Self {
		Self {
			discr,
			default_layout: None,
			variants: Vec::new(),
			chooser: None,
		}
	}

	/// Install the fallback layout for unregistered tags.
	pub fn default_layout(mut self, layout: Layout) -> Self {
		self.default_layout = Some(layout);
		self
	}

	/// Register a variant with an inner payload layout.
	pub fn variant(mut self, tag: u64, inner: Layout, property: &str) -> Self {
		self.variants.push((tag, Some(inner), property.into()));
		self
	}

	/// Register a tag-only variant.
	pub fn tag_variant(mut self, tag: u64, property: &str) -> Self {
		self.variants.push((tag, None, property.into()));
		self
	}

	/// Replace the source-variant chooser.
	pub fn source_variant(mut self, chooser: SourceVariantFn) -> Self {
		self.chooser = Some(chooser);
		self
	}

	/// Check all schema invariants and freeze the union.
	pub fn build(self) -> Result<Layout> {
		let prefix = self.discr.span();

		let default_span = match self.default_layout.as_ref() {
			Some(layout) => Some(layout.span().fixed().ok_or(LayoutError::DefaultNotFixed)?),
			None => None,
		};

		let content_property = self
			.default_layout
			.as_ref()
			.map(|layout| layout.property().unwrap_or(DEFAULT_CONTENT_PROPERTY).to_owned());

		let discr = Arc::new(self.discr);
		let mut variants: Vec<Arc<VariantLayout>> = Vec::with_capacity(self.variants.len());

		for (tag, inner, property) in self.variants {
			if variants.iter().any(|variant| variant.tag == tag) {
				return Err(LayoutError::DuplicateVariant { tag });
			}
			if content_property.as_deref() == Some(&*property) {
				return Err(LayoutError::PropertyCollision { property });
			}

			let span = match (default_span, inner.as_ref()) {
				(Some(total), Some(layout)) => {
					let max = total.saturating_sub(prefix);
					let inner_span = layout.span().fixed().ok_or(LayoutError::UnresolvedSpan)?;
					if inner_span > max {
						return Err(LayoutError::VariantSpanExceedsDefault {
							tag,
							span: inner_span,
							max,
						});
					}
					Span::Fixed(prefix + total)
				}
				(Some(total), None) => Span::Fixed(prefix + total),
				(None, Some(layout)) => match layout.span() {
					Span::Fixed(inner_span) => Span::Fixed(prefix + inner_span),
					Span::Variable => Span::Variable,
				},
				(None, None) => Span::Fixed(prefix),
			};

			variants.push(Arc::new(VariantLayout {
				tag,
				inner: inner.map(Box::new),
				property,
				discr: Arc::clone(&discr),
				span,
			}));
		}

		let span = match default_span {
			Some(total) => Span::Fixed(prefix + total),
			None => {
				let mut inferred = None;
				let mut consistent = !variants.is_empty();
				for variant in &variants {
					match (variant.span.fixed(), inferred) {
						(Some(span), None) => inferred = Some(span),
						(Some(span), Some(seen)) if span == seen => {}
						_ => {
							consistent = false;
							break;
						}
					}
				}
				match (consistent, inferred) {
					(true, Some(span)) => Span::Fixed(span),
					_ => Span::Variable,
				}
			}
		};

		Ok(Layout::new(LayoutKind::Union(Union {
			discr,
			default_layout: self.default_layout.map(Box::new),
			variants,
			chooser: self.chooser,
			span,
		})))
	}
}
