//! Event based scanning of `.mtl` resources.
use std::io::BufRead;

use tracing::trace;

use super::RgbColor;
use crate::error::Error;
use crate::lex::{Line, LineReader};

/// Something that has been scanned in an `.mtl` resource.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event<'a> {
  /// A `#` comment, without the `#`.
  Comment(&'a str),
  /// A material declaration (`newmtl`).
  Material(&'a str),
  /// Ambient color (`Ka`).
  AmbientColor(RgbColor),
  /// Diffuse color (`Kd`).
  DiffuseColor(RgbColor),
  /// Specular color (`Ks`).
  SpecularColor(RgbColor),
  /// Emissive color (`Ke`).
  EmissiveColor(RgbColor),
  /// Transmission filter (`Tf`).
  TransmissionFilter(RgbColor),
  /// Specular exponent (`Ns`).
  SpecularExponent(f64),
  /// Dissolve (`d`); `1.0` is fully opaque.
  Dissolve(f64),
  /// Illumination model (`illum`).
  Illum(i64),
  /// Ambient texture (`map_Ka`).
  AmbientTexture(&'a str),
  /// Diffuse texture (`map_Kd`).
  DiffuseTexture(&'a str),
  /// Specular texture (`map_Ks`).
  SpecularTexture(&'a str),
  /// Emissive texture (`map_Ke`).
  EmissiveTexture(&'a str),
  /// Specular exponent texture (`map_Ns`).
  SpecularExponentTexture(&'a str),
  /// Dissolve texture (`map_d`).
  DissolveTexture(&'a str),
  /// Bump texture (`map_Bump`, also written `map_bump` or `bump`).
  BumpTexture(&'a str),
}

/// Scans an `.mtl` resource, passing every event to `handler`.
///
/// Colors given in the `spectral` or `xyz` color models are skipped without
/// an event, as are commands this scanner does not know about.
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
    "newmtl" => match line.param(0) {
      Some(name) => handler(Event::Material(name)),
      None => Err(Error::from(line.error("Material declaration lacks name.")).into()),
    },
    "Ka" => process_color(line, handler, Event::AmbientColor),
    "Kd" => process_color(line, handler, Event::DiffuseColor),
    "Ks" => process_color(line, handler, Event::SpecularColor),
    "Ke" => process_color(line, handler, Event::EmissiveColor),
    "Tf" => process_color(line, handler, Event::TransmissionFilter),
    "Ns" => {
      let amount = single_param(line)?.float_param(0).map_err(Error::from)?;
      handler(Event::SpecularExponent(amount))
    }
    "d" => {
      let amount = single_param(line)?.float_param(0).map_err(Error::from)?;
      handler(Event::Dissolve(amount))
    }
    "illum" => {
      let model = single_param(line)?.int_param(0).map_err(Error::from)?;
      handler(Event::Illum(model))
    }
    "map_Ka" => process_texture(line, handler, Event::AmbientTexture),
    "map_Kd" => process_texture(line, handler, Event::DiffuseTexture),
    "map_Ks" => process_texture(line, handler, Event::SpecularTexture),
    "map_Ke" => process_texture(line, handler, Event::EmissiveTexture),
    "map_Ns" => process_texture(line, handler, Event::SpecularExponentTexture),
    "map_d" => process_texture(line, handler, Event::DissolveTexture),
    "map_Bump" | "map_bump" | "bump" => process_texture(line, handler, Event::BumpTexture),
    other => {
      trace!(
        command = other,
        line = line.line_number(),
        "skipping unsupported mtl command"
      );
      Ok(())
    }
  }
}

fn process_color<'a, F, E>(
  line: &'a Line,
  handler: &mut F,
  event: fn(RgbColor) -> Event<'a>,
) -> Result<(), E>
where
  F: FnMut(Event<'_>) -> Result<(), E>,
  E: From<Error>,
{
  match parse_color(line)? {
    Some(color) => handler(event(color)),
    None => Ok(()),
  }
}

/// Reads `r [g b]`. Returns `None` for the spectral and xyz color models.
fn parse_color(line: &Line) -> Result<Option<RgbColor>, Error> {
  match line.param(0) {
    None => return Err(line.error("Color declaration lacks parameters.").into()),
    Some(model @ "spectral") | Some(model @ "xyz") => {
      trace!(
        model,
        line = line.line_number(),
        "skipping unsupported color model"
      );
      return Ok(None);
    }
    Some(_) => {}
  }

  let r = line.float_param(0)?;
  match line.param_count() {
    1 => Ok(Some(RgbColor { r, g: r, b: r })),
    2 => Err(
      line
        .error("Color declaration needs either one or three components.")
        .into(),
    ),
    _ => Ok(Some(RgbColor {
      r,
      g: line.float_param(1)?,
      b: line.float_param(2)?,
    })),
  }
}

fn process_texture<'a, F, E>(
  line: &'a Line,
  handler: &mut F,
  event: fn(&'a str) -> Event<'a>,
) -> Result<(), E>
where
  F: FnMut(Event<'_>) -> Result<(), E>,
  E: From<Error>,
{
  let path = single_param(line)?.string_param(0).map_err(Error::from)?;
  handler(event(path))
}

fn single_param(line: &Line) -> Result<&Line, Error> {
  if line.param_count() != 1 {
    return Err(
      line
        .error(format!(
          "`{}` expects exactly one parameter but got {}.",
          line.command_name().unwrap_or(""),
          line.param_count()
        ))
        .into(),
    );
  }
  Ok(line)
}
