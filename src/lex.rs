//! Logical line reading for Wavefront resources.
//!
//! A logical line is one or more physical lines, where every physical line
//! but the last ends with a backslash. The reader only ever holds the line
//! being assembled in memory.
use std::io::{self, BufRead};
use std::ops::Range;

use crate::error::ParseError;

/// A single logical line of a Wavefront resource.
///
/// Instances are owned by a [`LineReader`] and are overwritten by every call
/// to [`LineReader::scan`].
#[derive(Clone, Debug, Default)]
pub struct Line {
  text: String,
  tokens: Vec<Range<usize>>,
  comment: bool,
  line_number: usize,
}

impl Line {
  fn assign(&mut self, line_number: usize) {
    let end = self.text.trim_end().len();
    self.text.truncate(end);
    let start = self.text.len() - self.text.trim_start().len();
    self.text.replace_range(..start, "");

    self.line_number = line_number;
    self.comment = self.text.starts_with('#');
    self.tokens.clear();
    if !self.comment {
      tokenize(&self.text, &mut self.tokens);
    }
  }

  /// The trimmed text of this line, continuations already merged.
  pub fn text(&self) -> &str {
    &self.text
  }

  /// The physical line number (starting at 1) on which this line began.
  pub fn line_number(&self) -> usize {
    self.line_number
  }

  /// Whether the line holds nothing but whitespace.
  pub fn is_blank(&self) -> bool {
    self.text.is_empty()
  }

  /// Whether the line is a `#` comment.
  pub fn is_comment(&self) -> bool {
    self.comment
  }

  /// The comment text following `#`, trimmed. `None` for non-comment lines.
  pub fn comment(&self) -> Option<&str> {
    if self.comment {
      Some(self.text[1..].trim())
    } else {
      None
    }
  }

  /// Whether the line holds a command (e.g. `v`, `usemtl`, `Kd`).
  pub fn is_command(&self) -> bool {
    !self.tokens.is_empty()
  }

  /// The command name, if this line is a command.
  pub fn command_name(&self) -> Option<&str> {
    self.token(0)
  }

  /// Checks whether this line is the command `name`.
  pub fn has_command_name(&self, name: &str) -> bool {
    self.command_name() == Some(name)
  }

  /// Number of parameters following the command name.
  pub fn param_count(&self) -> usize {
    self.tokens.len().saturating_sub(1)
  }

  /// All parameters, in order.
  pub fn params(&self) -> impl Iterator<Item = &str> + '_ {
    self.tokens.iter().skip(1).map(move |r| &self.text[r.clone()])
  }

  /// The parameter at `index`, or `None` if there are not that many.
  pub fn param(&self, index: usize) -> Option<&str> {
    self.token(index + 1)
  }

  /// The parameter at `index` as a string.
  pub fn string_param(&self, index: usize) -> Result<&str, ParseError> {
    self
      .param(index)
      .ok_or_else(|| self.error(format!("Expected parameter {} but got end of line.", index)))
  }

  /// The parameter at `index` parsed as an integer.
  pub fn int_param(&self, index: usize) -> Result<i64, ParseError> {
    let s = self.string_param(index)?;
    parse_int(s).map_err(|message| self.error(message))
  }

  /// The parameter at `index` parsed as a float.
  pub fn float_param(&self, index: usize) -> Result<f64, ParseError> {
    let s = self.string_param(index)?;
    parse_float(s).map_err(|message| self.error(message))
  }

  /// The parameter at `index` split into its `/` separated references.
  pub fn reference_set_param(&self, index: usize) -> Result<ReferenceSet<'_>, ParseError> {
    let s = self.string_param(index)?;
    Ok(ReferenceSet {
      line_number: self.line_number,
      references: s.split('/').collect(),
    })
  }

  /// Builds an error pointing at this line.
  pub fn error<S: Into<String>>(&self, message: S) -> ParseError {
    ParseError {
      line_number: self.line_number,
      message: message.into(),
    }
  }

  fn token(&self, index: usize) -> Option<&str> {
    self.tokens.get(index).map(|r| &self.text[r.clone()])
  }
}

/// A face corner such as `1`, `1/2`, `1//3` or `1/2/3`, split on `/`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceSet<'a> {
  line_number: usize,
  references: Vec<&'a str>,
}

impl<'a> ReferenceSet<'a> {
  /// Number of slots, blank ones included.
  pub fn count(&self) -> usize {
    self.references.len()
  }

  /// Whether the slot at `index` is empty (or absent).
  pub fn is_blank(&self, index: usize) -> bool {
    self.references.get(index).map_or(true, |s| s.is_empty())
  }

  /// The raw text of the slot at `index`.
  pub fn string_reference(&self, index: usize) -> Option<&'a str> {
    self.references.get(index).copied()
  }

  /// The slot at `index` parsed as an integer.
  pub fn int_reference(&self, index: usize) -> Result<i64, ParseError> {
    parse_int(self.string_reference(index).unwrap_or("")).map_err(|message| self.error(message))
  }

  /// The slot at `index` parsed as a float.
  pub fn float_reference(&self, index: usize) -> Result<f64, ParseError> {
    parse_float(self.string_reference(index).unwrap_or("")).map_err(|message| self.error(message))
  }

  pub(crate) fn error<S: Into<String>>(&self, message: S) -> ParseError {
    ParseError {
      line_number: self.line_number,
      message: message.into(),
    }
  }
}

/// Reads a byte stream one logical line at a time.
///
/// ```
/// use wavefront_stream::LineReader;
///
/// let mut reader = LineReader::new("v 1 2 \\\n 3\n".as_bytes());
/// assert!(reader.scan());
/// assert_eq!(reader.line().text(), "v 1 2  3");
/// assert!(!reader.scan());
/// assert!(reader.err().is_none());
/// ```
pub struct LineReader<R> {
  reader: R,
  physical: Vec<u8>,
  physical_line: usize,
  line: Line,
  failed: bool,
  err: Option<io::Error>,
}

impl<R: BufRead> LineReader<R> {
  /// Wraps `reader`.
  pub fn new(reader: R) -> Self {
    LineReader {
      reader,
      physical: Vec::new(),
      physical_line: 0,
      line: Line::default(),
      failed: false,
      err: None,
    }
  }

  /// Advances to the next logical line.
  ///
  /// Returns `false` at the end of the stream or when reading failed; use
  /// [`err`](Self::err) to tell the two apart. Once reading failed, every
  /// further call returns `false`.
  ///
  /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`.
  pub fn scan(&mut self) -> bool {
    if self.failed {
      return false;
    }

    let start = self.physical_line + 1;
    let mut iterations = 0;
    self.line.text.clear();
    loop {
      self.physical.clear();
      match self.reader.read_until(b'\n', &mut self.physical) {
        Ok(0) => break,
        Ok(_) => {}
        Err(err) => {
          self.failed = true;
          self.err = Some(err);
          return false;
        }
      }
      iterations += 1;
      self.physical_line += 1;

      let decoded = String::from_utf8_lossy(&self.physical);
      let physical = strip_line_ending(&decoded);
      match physical.strip_suffix('\\') {
        Some(continued) => self.line.text.push_str(continued),
        None => {
          self.line.text.push_str(physical);
          break;
        }
      }
    }

    if iterations == 0 {
      return false;
    }
    self.line.assign(start);
    true
  }

  /// The most recently scanned logical line.
  pub fn line(&self) -> &Line {
    &self.line
  }

  /// The read failure that stopped scanning, if any.
  pub fn err(&self) -> Option<&io::Error> {
    self.err.as_ref()
  }

  /// Takes ownership of the read failure that stopped scanning, if any.
  pub fn take_err(&mut self) -> Option<io::Error> {
    self.err.take()
  }
}

fn strip_line_ending(s: &str) -> &str {
  let s = s.strip_suffix('\n').unwrap_or(s);
  s.strip_suffix('\r').unwrap_or(s)
}

fn tokenize(text: &str, tokens: &mut Vec<Range<usize>>) {
  let mut start = None;
  for (i, c) in text.char_indices() {
    match (c.is_whitespace(), start) {
      (true, Some(s)) => {
        tokens.push(s..i);
        start = None;
      }
      (false, None) => start = Some(i),
      _ => {}
    }
  }
  if let Some(s) = start {
    tokens.push(s..text.len());
  }
}

fn parse_int(s: &str) -> Result<i64, String> {
  lexical::parse::<i64, _>(s).map_err(|_| format!("Expected integer but got `{}`.", s))
}

fn parse_float(s: &str) -> Result<f64, String> {
  lexical::parse::<f64, _>(s).map_err(|_| format!("Expected f64 but got `{}`.", s))
}
