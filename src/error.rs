//! Error types shared by the scanners and decoders.
use std::fmt;
use std::io;

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A malformed logical line.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
  /// The physical line on which the offending logical line started.
  pub line_number: usize,
  /// A message describing the problem.
  pub message: String,
}

impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "line {}: {}", self.line_number, self.message)
  }
}

impl std::error::Error for ParseError {}

/// Everything that can abort a scan or a decode.
#[derive(Debug, Error)]
pub enum Error {
  /// The underlying byte source failed.
  #[error(transparent)]
  Io(#[from] io::Error),

  /// A line could not be parsed for its command.
  #[error(transparent)]
  Parse(#[from] ParseError),

  /// The events were well formed but describe malformed geometry.
  #[error("malformed input: {0}")]
  Malformed(String),

  /// A declaration appeared outside of the context it belongs to.
  #[error("invalid construct: {0}")]
  InvalidStructure(&'static str),

  /// A bounded collection would have grown past its configured limit.
  #[error("safety limits exceeded: at most {limit} {collection} allowed")]
  LimitsExceeded {
    /// Which collection hit its limit.
    collection: &'static str,
    /// The configured maximum.
    limit: usize,
  },
}

impl Error {
  /// Whether this error was caused by a decode limit.
  pub fn is_limits_exceeded(&self) -> bool {
    matches!(self, Error::LimitsExceeded { .. })
  }

  /// Whether this error was caused by a declaration outside of its context.
  pub fn is_invalid_structure(&self) -> bool {
    matches!(self, Error::InvalidStructure(_))
  }
}
