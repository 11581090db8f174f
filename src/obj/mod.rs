//! Decoding of Wavefront's `.obj` file format for storing 3D meshes.
//!
//! ```
//! use wavefront_stream::obj::{self, DecodeLimits};
//!
//! let input = "\
//! mtllib cube.mtl
//! v 0 0 0
//! v 1 0 0
//! v 1 1 0
//! usemtl Red
//! f 1 2 -1
//! ";
//! let model = obj::decode(input.as_bytes(), DecodeLimits::default()).unwrap();
//! assert_eq!(model.material_libraries, vec!["cube.mtl"]);
//! let object = model.find_object("Default").unwrap();
//! let mesh = object.find_mesh("Red").unwrap();
//! assert_eq!(mesh.faces[0].references[2].vertex_index, 2);
//! ```
use std::cmp::Ordering;
use std::io::{BufReader, Read};

use tracing::debug;

use crate::error::Result;
use crate::util::fuzzy_cmp_all;

mod context;
pub mod scanner;

use self::context::Context;

/// Name given to the object that is created when faces appear before any
/// `o` declaration.
pub const DEFAULT_OBJECT_NAME: &str = "Default";

/// Upper bounds on every collection a decode can grow.
///
/// Exceeding any of them aborts the decode with
/// [`Error::LimitsExceeded`](crate::Error::LimitsExceeded).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
  /// Maximum number of vertices.
  pub max_vertex_count: usize,
  /// Maximum number of texture coordinates.
  pub max_tex_coord_count: usize,
  /// Maximum number of normals.
  pub max_normal_count: usize,
  /// Maximum number of objects.
  pub max_object_count: usize,
  /// Maximum number of faces per mesh.
  pub max_face_count: usize,
  /// Maximum number of references per face.
  pub max_reference_count: usize,
  /// Maximum number of material library dependencies.
  pub max_material_library_count: usize,
  /// Maximum number of distinct material references (meshes) per object.
  pub max_material_reference_count: usize,
}

impl Default for DecodeLimits {
  fn default() -> Self {
    DecodeLimits {
      max_vertex_count: 65536,
      max_tex_coord_count: 65536,
      max_normal_count: 65536,
      max_object_count: 1024,
      max_face_count: 65536,
      max_reference_count: 16,
      max_material_library_count: 32,
      max_material_reference_count: 64,
    }
  }
}

/// The contents of a single `.obj` resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
  /// All vertices, in declaration order.
  pub vertices: Vec<Vertex>,
  /// All normals, in declaration order.
  pub normals: Vec<Normal>,
  /// All texture coordinates, in declaration order.
  pub tex_coords: Vec<TexCoord>,
  /// All objects, in declaration order.
  pub objects: Vec<Object>,
  /// Paths of the `.mtl` resources this model depends on.
  pub material_libraries: Vec<String>,
}

impl Model {
  /// Finds the first object called `name`.
  pub fn find_object(&self, name: &str) -> Option<&Object> {
    self.objects.iter().find(|object| object.name == name)
  }

  /// The vertex a reference points at.
  pub fn vertex(&self, reference: &Reference) -> Option<&Vertex> {
    self.vertices.get(reference.vertex_index)
  }

  /// The texture coordinate a reference points at, if it has one.
  pub fn tex_coord(&self, reference: &Reference) -> Option<&TexCoord> {
    reference
      .tex_coord_index
      .and_then(|index| self.tex_coords.get(index))
  }

  /// The normal a reference points at, if it has one.
  pub fn normal(&self, reference: &Reference) -> Option<&Normal> {
    reference.normal_index.and_then(|index| self.normals.get(index))
  }
}

/// A single point in space. `w` is `1.0` unless declared otherwise.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
  pub x: f64,
  pub y: f64,
  pub z: f64,
  pub w: f64,
}

/// A direction, as declared by `vn`.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub struct Normal {
  pub x: f64,
  pub y: f64,
  pub z: f64,
}

/// A single point on a texture. Missing `v` and `w` are `0.0`.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub struct TexCoord {
  pub u: f64,
  pub v: f64,
  pub w: f64,
}

impl PartialEq for Vertex {
  fn eq(&self, other: &Vertex) -> bool {
    self.partial_cmp(other) == Some(Ordering::Equal)
  }
}

impl PartialOrd for Vertex {
  fn partial_cmp(&self, other: &Vertex) -> Option<Ordering> {
    Some(fuzzy_cmp_all(
      &[self.x, self.y, self.z, self.w],
      &[other.x, other.y, other.z, other.w],
    ))
  }
}

impl PartialEq for Normal {
  fn eq(&self, other: &Normal) -> bool {
    self.partial_cmp(other) == Some(Ordering::Equal)
  }
}

impl PartialOrd for Normal {
  fn partial_cmp(&self, other: &Normal) -> Option<Ordering> {
    Some(fuzzy_cmp_all(
      &[self.x, self.y, self.z],
      &[other.x, other.y, other.z],
    ))
  }
}

impl PartialEq for TexCoord {
  fn eq(&self, other: &TexCoord) -> bool {
    self.partial_cmp(other) == Some(Ordering::Equal)
  }
}

impl PartialOrd for TexCoord {
  fn partial_cmp(&self, other: &TexCoord) -> Option<Ordering> {
    Some(fuzzy_cmp_all(
      &[self.u, self.v, self.w],
      &[other.u, other.v, other.w],
    ))
  }
}

/// A named object, split into one mesh per material.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
  /// The name given by the `o` declaration.
  pub name: String,
  /// The meshes of this object, one per distinct material name.
  pub meshes: Vec<Mesh>,
}

impl Object {
  /// Finds the mesh that uses `material_name`.
  pub fn find_mesh(&self, material_name: &str) -> Option<&Mesh> {
    self
      .meshes
      .iter()
      .find(|mesh| mesh.material_name == material_name)
  }
}

/// All faces of an object that share a material.
///
/// Meshes are not an `.obj` construct; they group faces by `usemtl` so
/// that a renderer can draw each material in one go.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
  /// The material used by this mesh. Empty when none was referenced.
  pub material_name: String,
  /// The faces of this mesh.
  pub faces: Vec<Face>,
}

/// A polygon. Always has at least three references.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Face {
  /// The corners of the polygon.
  pub references: Vec<Reference>,
}

/// An index into [`Model::vertices`].
pub type VertexIndex = usize;

/// An index into [`Model::tex_coords`].
pub type TextureIndex = usize;

/// An index into [`Model::normals`].
pub type NormalIndex = usize;

/// A corner of a face. All indices are zero based and absolute.
///
/// Indices are not checked against their pools, since a corner may refer to
/// data declared further down the resource. Use [`Model::vertex`] and
/// friends for checked access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reference {
  /// Position of this corner.
  pub vertex_index: VertexIndex,
  /// Texture coordinate of this corner, if any.
  pub tex_coord_index: Option<TextureIndex>,
  /// Normal of this corner, if any.
  pub normal_index: Option<NormalIndex>,
}

impl Reference {
  /// Whether this corner carries a texture coordinate.
  pub fn has_tex_coord(&self) -> bool {
    self.tex_coord_index.is_some()
  }

  /// Whether this corner carries a normal.
  pub fn has_normal(&self) -> bool {
    self.normal_index.is_some()
  }
}

/// Decodes an `.obj` resource from `reader`.
///
/// The first failure aborts decoding; nothing of the partially built model
/// is returned in that case.
pub fn decode<R: Read>(reader: R, limits: DecodeLimits) -> Result<Model> {
  let mut context = Context::new(limits);
  scanner::scan(BufReader::new(reader), |event| context.handle_event(event))?;
  let model = context.finish();
  debug!(
    vertices = model.vertices.len(),
    tex_coords = model.tex_coords.len(),
    normals = model.normals.len(),
    objects = model.objects.len(),
    material_libraries = model.material_libraries.len(),
    "decoded obj model"
  );
  Ok(model)
}

/// Decodes an in-memory `.obj` resource with the default limits.
pub fn parse<S: AsRef<str>>(input: S) -> Result<Model> {
  decode(input.as_ref().as_bytes(), DecodeLimits::default())
}
