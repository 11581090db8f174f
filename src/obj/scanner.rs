//! Event based scanning of `.obj` resources.
//!
//! The scanner does not build anything by itself: every recognized
//! declaration is turned into one or more [`Event`]s that are handed to a
//! caller supplied handler. Returning an error from the handler stops the
//! scan and that error is returned from [`scan`] unchanged.
use std::io::BufRead;

use tracing::trace;

use crate::error::Error;
use crate::lex::{Line, LineReader, ReferenceSet};

/// Something that has been scanned in an `.obj` resource.
///
/// String payloads borrow from the logical line currently being scanned and
/// are only valid for the duration of the handler call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event<'a> {
  /// A `#` comment, without the `#`.
  Comment(&'a str),
  /// A material library dependency (`mtllib`). One event per file path.
  MaterialLibrary(&'a str),
  /// A vertex declaration (`v`). `w` defaults to `1.0`.
  Vertex {
    /// X coordinate.
    x: f64,
    /// Y coordinate.
    y: f64,
    /// Z coordinate.
    z: f64,
    /// W coordinate.
    w: f64,
  },
  /// A texture coordinate declaration (`vt`). `v` and `w` default to `0.0`.
  TexCoord {
    /// U coordinate.
    u: f64,
    /// V coordinate.
    v: f64,
    /// W coordinate.
    w: f64,
  },
  /// A normal declaration (`vn`).
  Normal {
    /// X coordinate.
    x: f64,
    /// Y coordinate.
    y: f64,
    /// Z coordinate.
    z: f64,
  },
  /// An object declaration (`o`).
  Object(&'a str),
  /// A material reference (`usemtl`). Empty when no name was given.
  MaterialReference(&'a str),
  /// A face declaration (`f`) begins.
  FaceStart,
  /// The face declaration has been fully scanned.
  FaceEnd,
  /// A face corner (e.g. `1/2/3`) begins.
  ReferenceSetStart,
  /// The face corner has been fully scanned.
  ReferenceSetEnd,
  /// The vertex slot of a face corner, exactly as written (1-based or
  /// relative).
  VertexReference(i64),
  /// The texture coordinate slot of a face corner, as written.
  TexCoordReference(i64),
  /// The normal slot of a face corner, as written.
  NormalReference(i64),
}

/// Scans an `.obj` resource, passing every event to `handler`.
///
/// Scanning stops at the first read failure, malformed line or handler
/// error. Commands this scanner does not know about are skipped.
pub fn scan<R, F, E>(reader: R, mut handler: F) -> Result<(), E>
where
  R: BufRead,
  F: FnMut(Event<'_>) -> Result<(), E>,
  E: From<Error>,
{
  let mut lines = LineReader::new(reader);
  while lines.scan() {
    let line = lines.line();
    if let Some(comment) = line.comment() {
      handler(Event::Comment(comment))?;
    } else if line.is_command() {
      process_command(line, &mut handler)?;
    }
  }

  match lines.take_err() {
    Some(err) => Err(Error::Io(err).into()),
    None => Ok(()),
  }
}

fn process_command<F, E>(line: &Line, handler: &mut F) -> Result<(), E>
where
  F: FnMut(Event<'_>) -> Result<(), E>,
  E: From<Error>,
{
  match line.command_name().unwrap_or("") {
    "mtllib" => process_material_library(line, handler),
    "v" => handler(parse_vertex(line)?),
    "vt" => handler(parse_tex_coord(line)?),
    "vn" => handler(parse_normal(line)?),
    "o" => handler(parse_object(line)?),
    "usemtl" => handler(Event::MaterialReference(line.param(0).unwrap_or(""))),
    "f" => process_face(line, handler),
    other => {
      trace!(
        command = other,
        line = line.line_number(),
        "skipping unsupported obj command"
      );
      Ok(())
    }
  }
}

fn process_material_library<F, E>(line: &Line, handler: &mut F) -> Result<(), E>
where
  F: FnMut(Event<'_>) -> Result<(), E>,
{
  for path in line.params() {
    handler(Event::MaterialLibrary(path))?;
  }
  Ok(())
}

fn parse_vertex(line: &Line) -> Result<Event<'static>, Error> {
  if line.param_count() < 3 {
    return Err(line.error("Insufficient vertex data.").into());
  }
  let x = line.float_param(0)?;
  let y = line.float_param(1)?;
  let z = line.float_param(2)?;
  let w = if line.param_count() >= 4 {
    line.float_param(3)?
  } else {
    1.0
  };
  Ok(Event::Vertex { x, y, z, w })
}

fn parse_tex_coord(line: &Line) -> Result<Event<'static>, Error> {
  if line.param_count() == 0 {
    return Err(line.error("Insufficient texture coordinate data.").into());
  }
  let u = line.float_param(0)?;
  let v = if line.param_count() >= 2 {
    line.float_param(1)?
  } else {
    0.0
  };
  let w = if line.param_count() >= 3 {
    line.float_param(2)?
  } else {
    0.0
  };
  Ok(Event::TexCoord { u, v, w })
}

fn parse_normal(line: &Line) -> Result<Event<'static>, Error> {
  if line.param_count() != 3 {
    return Err(
      line
        .error(format!(
          "Expected 3 normal coordinates but got {}.",
          line.param_count()
        ))
        .into(),
    );
  }
  Ok(Event::Normal {
    x: line.float_param(0)?,
    y: line.float_param(1)?,
    z: line.float_param(2)?,
  })
}

fn parse_object(line: &Line) -> Result<Event<'_>, Error> {
  match line.param(0) {
    Some(name) => Ok(Event::Object(name)),
    None => Err(line.error("No name specified for object.").into()),
  }
}

fn process_face<F, E>(line: &Line, handler: &mut F) -> Result<(), E>
where
  F: FnMut(Event<'_>) -> Result<(), E>,
  E: From<Error>,
{
  handler(Event::FaceStart)?;
  for i in 0..line.param_count() {
    let references = line.reference_set_param(i).map_err(Error::from)?;
    process_reference_set(&references, handler)?;
  }
  handler(Event::FaceEnd)
}

fn process_reference_set<F, E>(references: &ReferenceSet<'_>, handler: &mut F) -> Result<(), E>
where
  F: FnMut(Event<'_>) -> Result<(), E>,
  E: From<Error>,
{
  handler(Event::ReferenceSetStart)?;

  if references.is_blank(0) {
    return Err(Error::from(references.error("Reference set has no vertex reference.")).into());
  }
  let vertex = references.int_reference(0).map_err(Error::from)?;
  handler(Event::VertexReference(vertex))?;

  if !references.is_blank(1) {
    let tex_coord = references.int_reference(1).map_err(Error::from)?;
    handler(Event::TexCoordReference(tex_coord))?;
  }

  if !references.is_blank(2) {
    let normal = references.int_reference(2).map_err(Error::from)?;
    handler(Event::NormalReference(normal))?;
  }

  handler(Event::ReferenceSetEnd)
}
