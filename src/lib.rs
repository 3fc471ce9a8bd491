//! Declarative byte-layout descriptions with symmetric decode and encode.
//!
//! Programs compose a tree of layout nodes describing packed C-style
//! structures, tagged unions, bit-packed words, and length-prefixed
//! sequences, then use that tree to decode caller-supplied byte regions
//! into structured values and to encode structured values back into bytes.

/// Layout node algebra, value model, factories, and binding helpers.
pub mod layout;
