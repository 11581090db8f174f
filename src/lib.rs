//! Streaming decoders for wavefront's `.obj` and `.mtl` file formats.
//!
//! Resources are read one logical line at a time. Each line is turned into
//! typed events by a scanner ([`obj::scanner`], [`mtl::scanner`]) and the
//! decoders ([`obj::decode`], [`mtl::decode`]) fold those events into a
//! document, refusing to grow any collection past its configured limit.
//!
//! Only the commonly exported subset of the formats is understood. Free-form
//! geometry, groups, smoothing groups and non-RGB colors are skipped.
#![deny(missing_docs)]
#![deny(unreachable_pub)]

pub use error::{Error, ParseError, Result};
pub use lex::{Line, LineReader, ReferenceSet};

mod error;
mod lex;
mod util;

pub mod mtl;
pub mod obj;
