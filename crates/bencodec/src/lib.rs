//! A bencode codec built around a flat parse index.
//!
//! Decoding makes a single pass over the buffer and records one descriptor
//! per value instead of building a tree; [`BView`] and friends then read
//! straight out of the original bytes without copying. Integer digit runs go
//! through a word-parallel fast path with a serial fallback that reports
//! identical results, errors included.
//!
//! ```
//! use bencodec::{decode_view, encode, Pointer};
//!
//! let table = decode_view(b"d4:infod6:lengthi42eee")?;
//! let length = Pointer::parse("/info/length")?
//!     .evaluate(table.root())
//!     .unwrap();
//! assert_eq!(length.as_integer().unwrap().value(), 42);
//!
//! // Re-encoding a view reproduces the input bytes.
//! assert_eq!(encode(&table.root()), b"d4:infod6:lengthi42eee");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! When the source buffer cannot be kept around, [`decode_value`] produces
//! an owning [`Value`] instead; both representations speak the same
//! [`EventProducer`]/[`EventConsumer`] protocol, so builders, encoders and
//! custom consumers work with either.

mod build;
mod decoder;
mod descriptor;
mod encode;
mod error;
mod events;
mod from_chars;
mod kind;
mod pointer;
mod value;
mod view;

pub use build::{to_value, BuildError, ValueBuilder};
pub use decoder::{
    decode_value, decode_view, decode_view_with, DecodeOptions, DescriptorTable,
    DEFAULT_RECURSION_LIMIT,
};
pub use encode::{encode, Encoder};
pub use error::{ParsingError, ParsingErrorKind};
pub use events::{Discard, EventConsumer, EventProducer};
pub use from_chars::Strategy;
pub use kind::Kind;
pub use pointer::{Pointer, PointerError, PointerParseError, PointerTarget};
pub use value::{Dict, Value};
pub use view::{BView, DictIter, DictView, IntegerView, ListIter, ListView, StringView};
