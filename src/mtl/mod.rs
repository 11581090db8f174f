//! Decoding of Wavefront's `.mtl` material library format.
//!
//! ```
//! use wavefront_stream::mtl;
//!
//! let library = mtl::parse("newmtl Red\nKd 1 0 0\nmap_Kd red.png\n").unwrap();
//! let red = library.find_material("Red").unwrap();
//! assert_eq!(red.diffuse_color, mtl::RgbColor { r: 1.0, g: 0.0, b: 0.0 });
//! assert_eq!(red.diffuse_texture, "red.png");
//! assert_eq!(red.dissolve, 1.0);
//! ```
use std::cmp::Ordering;
use std::io::{BufReader, Read};

use tracing::debug;

use crate::error::Result;
use crate::util::fuzzy_cmp_all;

mod context;
pub mod scanner;

use self::context::Context;

/// Upper bounds on what a decode may allocate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
  /// Maximum number of `newmtl` declarations.
  pub max_material_count: usize,
}

impl Default for DecodeLimits {
  fn default() -> Self {
    DecodeLimits {
      max_material_count: 512,
    }
  }
}

/// A color made of red, green and blue, usually each in `0.0..=1.0`.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub struct RgbColor {
  pub r: f64,
  pub g: f64,
  pub b: f64,
}

impl RgbColor {
  /// Opaque white.
  pub const WHITE: RgbColor = RgbColor { r: 1.0, g: 1.0, b: 1.0 };
  /// Black.
  pub const BLACK: RgbColor = RgbColor { r: 0.0, g: 0.0, b: 0.0 };
}

impl PartialEq for RgbColor {
  fn eq(&self, other: &RgbColor) -> bool {
    self.partial_cmp(other) == Some(Ordering::Equal)
  }
}

impl PartialOrd for RgbColor {
  fn partial_cmp(&self, other: &RgbColor) -> Option<Ordering> {
    Some(fuzzy_cmp_all(
      &[self.r, self.g, self.b],
      &[other.r, other.g, other.b],
    ))
  }
}

/// How a surface should be rendered.
///
/// Texture paths are empty when the material does not declare them.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
  /// Name given by `newmtl`.
  pub name: String,
  /// `Ka`. Defaults to white.
  pub ambient_color: RgbColor,
  /// `Kd`. Defaults to white.
  pub diffuse_color: RgbColor,
  /// `Ks`. Defaults to black.
  pub specular_color: RgbColor,
  /// `Ke`. Defaults to black.
  pub emissive_color: RgbColor,
  /// `Tf`. Defaults to white.
  pub transmission_filter: RgbColor,
  /// `Ns`: sharpness of the specular highlight, usually `0.0..=1000.0`.
  pub specular_exponent: f64,
  /// `d`: `1.0` is fully opaque, `0.0` fully transparent.
  pub dissolve: f64,
  /// `illum`: the illumination model, `0..=10`.
  pub illum: i64,
  /// `map_Ka`.
  pub ambient_texture: String,
  /// `map_Kd`.
  pub diffuse_texture: String,
  /// `map_Ks`.
  pub specular_texture: String,
  /// `map_Ke`.
  pub emissive_texture: String,
  /// `map_Ns`.
  pub specular_exponent_texture: String,
  /// `map_d`.
  pub dissolve_texture: String,
  /// `map_Bump`.
  pub bump_texture: String,
}

impl Default for Material {
  fn default() -> Self {
    Material {
      name: String::new(),
      ambient_color: RgbColor::WHITE,
      diffuse_color: RgbColor::WHITE,
      specular_color: RgbColor::BLACK,
      emissive_color: RgbColor::BLACK,
      transmission_filter: RgbColor::WHITE,
      specular_exponent: 0.0,
      dissolve: 1.0,
      illum: 0,
      ambient_texture: String::new(),
      diffuse_texture: String::new(),
      specular_texture: String::new(),
      emissive_texture: String::new(),
      specular_exponent_texture: String::new(),
      dissolve_texture: String::new(),
      bump_texture: String::new(),
    }
  }
}

/// The materials of a single `.mtl` resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Library {
  /// All materials, in declaration order.
  pub materials: Vec<Material>,
}

impl Library {
  /// Finds the first material called `name`.
  pub fn find_material(&self, name: &str) -> Option<&Material> {
    self.materials.iter().find(|material| material.name == name)
  }
}

/// Decodes an `.mtl` resource from `reader`.
pub fn decode<R: Read>(reader: R, limits: DecodeLimits) -> Result<Library> {
  let mut context = Context::new(limits);
  scanner::scan(BufReader::new(reader), |event| context.handle_event(event))?;
  let library = context.finish();
  debug!(materials = library.materials.len(), "decoded mtl library");
  Ok(library)
}

/// Decodes an in-memory `.mtl` resource with the default limits.
pub fn parse<S: AsRef<str>>(input: S) -> Result<Library> {
  decode(input.as_ref().as_bytes(), DecodeLimits::default())
}
