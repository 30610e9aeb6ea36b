//! Single-pass JSON parsing onto a flat, index-addressed tape.
//!
//! One linear scan over a writable UTF-8 buffer checks the grammar, decodes
//! string escapes in place, and packs the whole document into an array of
//! 32-bit tagged words — no per-node allocations, no intermediate strings.
//! The result is a read-only tree whose values either inline a small
//! integer or index into the tape.
//!
//! The caller picks one of two storage strategies: hand the parser a fixed
//! word buffer ([`Allocation::Single`]), or let it grow its own
//! ([`Allocation::Dynamic`]). Both produce identical documents.
//!
//! The root of a document must be an array or an object; the accepted
//! syntax is otherwise RFC 8259 JSON.
//!
//! # Examples
//!
//! ```
//! use jsontape::{parse, Allocation, ValueType};
//!
//! let mut text = br#"{ "name": "tape", "sizes": [1, 2.5] }"#.to_vec();
//! let doc = parse(Allocation::Dynamic, &mut text)?;
//! let root = doc.root();
//! assert_eq!(root.value_type(), ValueType::Object);
//! assert_eq!(root.value_of_key("name").unwrap().as_str(), "tape");
//! assert_eq!(root.value_of_key("sizes").unwrap().length(), 2);
//! # Ok::<(), jsontape::ParseError>(())
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod allocator;
mod document;
mod error;
mod input;
mod parser;
mod tape;
mod value;

pub use allocator::Allocation;
pub use document::Document;
pub use error::{ErrorCode, ParseError};
pub use parser::parse;
pub use tape::ValueType;
pub use value::Value;

#[cfg(test)]
mod tests;
