use tracing::warn;

use super::scanner::Event;
use super::{
  DecodeLimits, Face, Mesh, Model, Normal, Object, Reference, TexCoord, Vertex,
  DEFAULT_OBJECT_NAME,
};
use crate::error::{Error, Result};

/// A face corner whose slots are still being filled in.
#[derive(Default)]
struct PendingReference {
  vertex_index: Option<usize>,
  tex_coord_index: Option<usize>,
  normal_index: Option<usize>,
}

/// Mutable state of a single `.obj` decode.
///
/// The "current" object and mesh are indices into the model being built, so
/// the model stays the single owner of everything decoded so far.
pub(crate) struct Context {
  limits: DecodeLimits,
  model: Model,

  current_object: Option<usize>,
  current_mesh: Option<usize>,
  current_face: Option<Face>,
  current_reference: Option<PendingReference>,
}

impl Context {
  pub(crate) fn new(limits: DecodeLimits) -> Self {
    Context {
      limits,
      model: Model::default(),
      current_object: None,
      current_mesh: None,
      current_face: None,
      current_reference: None,
    }
  }

  pub(crate) fn finish(self) -> Model {
    self.model
  }

  pub(crate) fn handle_event(&mut self, event: Event<'_>) -> Result<()> {
    match event {
      Event::Comment(_) => Ok(()),
      Event::MaterialLibrary(path) => self.add_material_library(path),
      Event::Vertex { x, y, z, w } => self.add_vertex(Vertex { x, y, z, w }),
      Event::TexCoord { u, v, w } => self.add_tex_coord(TexCoord { u, v, w }),
      Event::Normal { x, y, z } => self.add_normal(Normal { x, y, z }),
      Event::Object(name) => self.add_object(name).map(|_| ()),
      Event::MaterialReference(name) => self.use_material(name),
      Event::FaceStart => self.start_face(),
      Event::FaceEnd => self.end_face(),
      Event::ReferenceSetStart => self.start_reference(),
      Event::ReferenceSetEnd => self.end_reference(),
      Event::VertexReference(index) => {
        let index = resolve(index, self.model.vertices.len(), "vertex")?;
        self.pending_reference()?.vertex_index = Some(index);
        Ok(())
      }
      Event::TexCoordReference(index) => {
        let index = resolve(index, self.model.tex_coords.len(), "texture coordinate")?;
        self.pending_reference()?.tex_coord_index = Some(index);
        Ok(())
      }
      Event::NormalReference(index) => {
        let index = resolve(index, self.model.normals.len(), "normal")?;
        self.pending_reference()?.normal_index = Some(index);
        Ok(())
      }
    }
  }

  fn add_material_library(&mut self, path: &str) -> Result<()> {
    check_limit(
      self.model.material_libraries.len(),
      self.limits.max_material_library_count,
      "material libraries",
    )?;
    self.model.material_libraries.push(path.to_owned());
    Ok(())
  }

  fn add_vertex(&mut self, v: Vertex) -> Result<()> {
    check_limit(
      self.model.vertices.len(),
      self.limits.max_vertex_count,
      "vertices",
    )?;
    self.model.vertices.push(v);
    Ok(())
  }

  fn add_tex_coord(&mut self, t: TexCoord) -> Result<()> {
    check_limit(
      self.model.tex_coords.len(),
      self.limits.max_tex_coord_count,
      "texture coordinates",
    )?;
    self.model.tex_coords.push(t);
    Ok(())
  }

  fn add_normal(&mut self, n: Normal) -> Result<()> {
    check_limit(
      self.model.normals.len(),
      self.limits.max_normal_count,
      "normals",
    )?;
    self.model.normals.push(n);
    Ok(())
  }

  fn add_object(&mut self, name: &str) -> Result<usize> {
    check_limit(
      self.model.objects.len(),
      self.limits.max_object_count,
      "objects",
    )?;
    self.model.objects.push(Object {
      name: name.to_owned(),
      meshes: Vec::new(),
    });
    let index = self.model.objects.len() - 1;
    self.current_object = Some(index);
    self.current_mesh = None;
    Ok(index)
  }

  /// Looks up the mesh for `material_name` in the current object, creating
  /// it (and the object) when needed.
  fn use_material(&mut self, material_name: &str) -> Result<()> {
    let object_index = self.assure_current_object()?;
    let object = &mut self.model.objects[object_index];
    let mesh_index = match object
      .meshes
      .iter()
      .position(|mesh| mesh.material_name == material_name)
    {
      Some(index) => index,
      None => {
        check_limit(
          object.meshes.len(),
          self.limits.max_material_reference_count,
          "material references",
        )?;
        object.meshes.push(Mesh {
          material_name: material_name.to_owned(),
          faces: Vec::new(),
        });
        object.meshes.len() - 1
      }
    };
    self.current_mesh = Some(mesh_index);
    Ok(())
  }

  fn assure_current_object(&mut self) -> Result<usize> {
    match self.current_object {
      Some(index) => Ok(index),
      None => self.add_object(DEFAULT_OBJECT_NAME),
    }
  }

  fn assure_current_mesh(&mut self) -> Result<&mut Mesh> {
    if self.current_mesh.is_none() {
      self.use_material("")?;
    }
    self.current_mesh_mut()
  }

  fn current_mesh_mut(&mut self) -> Result<&mut Mesh> {
    match (self.current_object, self.current_mesh) {
      (Some(object), Some(mesh)) => Ok(&mut self.model.objects[object].meshes[mesh]),
      _ => Err(Error::InvalidStructure("face is not part of a mesh")),
    }
  }

  fn start_face(&mut self) -> Result<()> {
    let max_face_count = self.limits.max_face_count;
    let mesh = self.assure_current_mesh()?;
    check_limit(mesh.faces.len(), max_face_count, "faces")?;
    self.current_face = Some(Face::default());
    Ok(())
  }

  fn end_face(&mut self) -> Result<()> {
    let face = self
      .current_face
      .take()
      .ok_or(Error::InvalidStructure("face end without face start"))?;
    if face.references.len() < 3 {
      return Err(Error::Malformed(format!(
        "face needs at least three references but has {}",
        face.references.len()
      )));
    }
    self.current_mesh_mut()?.faces.push(face);
    Ok(())
  }

  fn start_reference(&mut self) -> Result<()> {
    let face = self
      .current_face
      .as_ref()
      .ok_or(Error::InvalidStructure("reference set outside of a face"))?;
    check_limit(
      face.references.len(),
      self.limits.max_reference_count,
      "references",
    )?;
    self.current_reference = Some(PendingReference::default());
    Ok(())
  }

  fn end_reference(&mut self) -> Result<()> {
    let pending = self
      .current_reference
      .take()
      .ok_or(Error::InvalidStructure("reference set end without start"))?;
    let vertex_index = pending
      .vertex_index
      .ok_or(Error::InvalidStructure("reference set without vertex reference"))?;
    let face = self
      .current_face
      .as_mut()
      .ok_or(Error::InvalidStructure("reference set outside of a face"))?;
    face.references.push(Reference {
      vertex_index,
      tex_coord_index: pending.tex_coord_index,
      normal_index: pending.normal_index,
    });
    Ok(())
  }

  fn pending_reference(&mut self) -> Result<&mut PendingReference> {
    self
      .current_reference
      .as_mut()
      .ok_or(Error::InvalidStructure("reference outside of a reference set"))
  }
}

fn check_limit(len: usize, limit: usize, collection: &'static str) -> Result<()> {
  if len >= limit {
    warn!(collection, limit, "obj decode limit reached");
    return Err(Error::LimitsExceeded { collection, limit });
  }
  Ok(())
}

/// Turns an index as written in a face into a zero based one.
///
/// Positive indices are 1-based. Everything else counts back from the end
/// of the pool as it is at this point of the resource, so `-1` is the most
/// recently declared element.
fn resolve(index: i64, pool_len: usize, pool: &str) -> Result<usize> {
  let resolved = if index > 0 {
    usize::try_from(index - 1).ok()
  } else {
    i64::try_from(pool_len)
      .ok()
      .and_then(|len| usize::try_from(len + index).ok())
  };
  resolved.ok_or_else(|| {
    Error::Malformed(format!(
      "{} index {} is out of range ({} declared so far)",
      pool, index, pool_len
    ))
  })
}
