use tracing::warn;

use super::scanner::Event;
use super::{DecodeLimits, Library, Material};
use crate::error::{Error, Result};

/// Mutable state of a single `.mtl` decode.
pub(crate) struct Context {
  limits: DecodeLimits,
  library: Library,
  current_material: Option<usize>,
}

impl Context {
  pub(crate) fn new(limits: DecodeLimits) -> Self {
    Context {
      limits,
      library: Library::default(),
      current_material: None,
    }
  }

  pub(crate) fn finish(self) -> Library {
    self.library
  }

  pub(crate) fn handle_event(&mut self, event: Event<'_>) -> Result<()> {
    match event {
      Event::Comment(_) => {}
      Event::Material(name) => self.add_material(name)?,
      Event::AmbientColor(color) => self.current()?.ambient_color = color,
      Event::DiffuseColor(color) => self.current()?.diffuse_color = color,
      Event::SpecularColor(color) => self.current()?.specular_color = color,
      Event::EmissiveColor(color) => self.current()?.emissive_color = color,
      Event::TransmissionFilter(color) => self.current()?.transmission_filter = color,
      Event::SpecularExponent(amount) => self.current()?.specular_exponent = amount,
      Event::Dissolve(amount) => self.current()?.dissolve = amount,
      Event::Illum(model) => self.current()?.illum = model,
      Event::AmbientTexture(path) => self.current()?.ambient_texture = path.to_owned(),
      Event::DiffuseTexture(path) => self.current()?.diffuse_texture = path.to_owned(),
      Event::SpecularTexture(path) => self.current()?.specular_texture = path.to_owned(),
      Event::EmissiveTexture(path) => self.current()?.emissive_texture = path.to_owned(),
      Event::SpecularExponentTexture(path) => {
        self.current()?.specular_exponent_texture = path.to_owned()
      }
      Event::DissolveTexture(path) => self.current()?.dissolve_texture = path.to_owned(),
      Event::BumpTexture(path) => self.current()?.bump_texture = path.to_owned(),
    }
    Ok(())
  }

  fn add_material(&mut self, name: &str) -> Result<()> {
    let limit = self.limits.max_material_count;
    if self.library.materials.len() >= limit {
      warn!(limit, "mtl decode limit reached");
      return Err(Error::LimitsExceeded {
        collection: "materials",
        limit,
      });
    }
    self.library.materials.push(Material {
      name: name.to_owned(),
      ..Material::default()
    });
    self.current_material = Some(self.library.materials.len() - 1);
    Ok(())
  }

  fn current(&mut self) -> Result<&mut Material> {
    match self.current_material {
      Some(index) => Ok(&mut self.library.materials[index]),
      None => Err(Error::InvalidStructure(
        "declaration requires a material to be defined first",
      )),
    }
  }
}
