mod bind;
mod bits;
mod bytes;
mod error;
mod external;
mod int;
mod json;
mod node;
mod seq;
mod structure;
mod text;
mod union;
mod value;

/// Ergonomic per-kind constructors.
pub mod factory;

/// Typed construct/destructure binding.
pub use bind::{BoundLayout, FromRecord, ToRecord};
/// Bit-packed word container and builder.
pub use bits::{BitField, BitStructure, BitStructureBuilder};
/// Error and result aliases.
pub use error::{LayoutError, Result};
/// External count and indirect reference nodes.
pub use external::{GreedyLayout, OffsetLayout};
/// Numeric leaf types and byte order.
pub use int::{Endian, FloatLayout, IntLayout, NearIntLayout};
/// JSON inspection view.
pub use json::value_to_json;
/// Layout node, variant set, and span model.
pub use node::{Layout, LayoutKind, Span};
/// Sequence repetition types.
pub use seq::{SeqCount, Sequence};
/// Ordered-field container.
pub use structure::Structure;
/// Byte and string leaf types.
pub use text::{BlobLayout, BlobLen, CStringLayout, ConstantLayout, Utf8Layout};
/// Tagged-union algebra.
pub use union::{Discriminator, SourceVariantFn, Union, UnionBuilder, VariantLayout};
/// Decoded value model.
pub use value::{Record, Value};
