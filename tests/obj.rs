use std::io::{self, Read};

use wavefront_stream::obj::{self, DecodeLimits, Model, Normal, Reference, TexCoord, Vertex};
use wavefront_stream::Error;

static BASIC: &'static str = r#"
# Exported for testing
mtllib materials.mtl

v 0.1 0.2 0.3
v 0.4 0.5 0.6
v 0.7 0.8 0.9
v 1.0 0.9 0.8

vt 0.1 0.2 0.3
vt 0.4 0.5 0.6
vt 0.7 0.8 0.9
vt 1.0 0.9 0.8

vn 0.0 1.0 0.0
vn 1.0 0.0 0.0
vn 0.0 0.0 1.0

o MyObject
usemtl BlueMaterial
f 1/4/1 2/1/1 3/3/2
f 2/1/3 3/2/3 \
  4/4/3
"#;

fn decode(input: &str) -> Result<Model, Error> {
  obj::decode(input.as_bytes(), DecodeLimits::default())
}

fn decode_with(input: &str, limits: DecodeLimits) -> Result<Model, Error> {
  obj::decode(input.as_bytes(), limits)
}

fn reference(vertex: usize, tex_coord: Option<usize>, normal: Option<usize>) -> Reference {
  Reference {
    vertex_index: vertex,
    tex_coord_index: tex_coord,
    normal_index: normal,
  }
}

#[test]
fn basic_model() {
  let model = decode(BASIC).unwrap();

  assert_eq!(model.material_libraries, vec!["materials.mtl"]);
  assert_eq!(
    model.vertices,
    vec![
      Vertex { x: 0.1, y: 0.2, z: 0.3, w: 1.0 },
      Vertex { x: 0.4, y: 0.5, z: 0.6, w: 1.0 },
      Vertex { x: 0.7, y: 0.8, z: 0.9, w: 1.0 },
      Vertex { x: 1.0, y: 0.9, z: 0.8, w: 1.0 },
    ]
  );
  assert_eq!(
    model.tex_coords,
    vec![
      TexCoord { u: 0.1, v: 0.2, w: 0.3 },
      TexCoord { u: 0.4, v: 0.5, w: 0.6 },
      TexCoord { u: 0.7, v: 0.8, w: 0.9 },
      TexCoord { u: 1.0, v: 0.9, w: 0.8 },
    ]
  );
  assert_eq!(
    model.normals,
    vec![
      Normal { x: 0.0, y: 1.0, z: 0.0 },
      Normal { x: 1.0, y: 0.0, z: 0.0 },
      Normal { x: 0.0, y: 0.0, z: 1.0 },
    ]
  );

  assert_eq!(model.objects.len(), 1);
  let object = &model.objects[0];
  assert_eq!(object.name, "MyObject");
  assert_eq!(object.meshes.len(), 1);
  let mesh = &object.meshes[0];
  assert_eq!(mesh.material_name, "BlueMaterial");
  assert_eq!(mesh.faces.len(), 2);
  assert_eq!(
    mesh.faces[0].references,
    vec![
      reference(0, Some(3), Some(0)),
      reference(1, Some(0), Some(0)),
      reference(2, Some(2), Some(1)),
    ]
  );
  assert_eq!(
    mesh.faces[1].references,
    vec![
      reference(1, Some(0), Some(2)),
      reference(2, Some(1), Some(2)),
      reference(3, Some(3), Some(2)),
    ]
  );

  let corner = &mesh.faces[0].references[2];
  assert_eq!(model.vertex(corner), Some(&model.vertices[2]));
  assert_eq!(model.tex_coord(corner), Some(&model.tex_coords[2]));
  assert_eq!(model.normal(corner), Some(&model.normals[1]));
}

#[test]
fn optional_reference_slots() {
  let model = decode("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1 2//1 3\n").unwrap();
  let face = &model.objects[0].meshes[0].faces[0];
  assert_eq!(
    face.references,
    vec![
      reference(0, None, None),
      reference(1, None, Some(0)),
      reference(2, None, None),
    ]
  );
  assert!(!face.references[1].has_tex_coord());
  assert!(face.references[1].has_normal());
}

#[test]
fn vertex_and_tex_coord_defaults() {
  let model = decode("v 1 2 3\nv 4 5 6 7\nvt 0.5\nvt 0.5 0.25\n").unwrap();
  assert_eq!(model.vertices[0].w, 1.0);
  assert_eq!(model.vertices[1].w, 7.0);
  assert_eq!(model.tex_coords[0], TexCoord { u: 0.5, v: 0.0, w: 0.0 });
  assert_eq!(model.tex_coords[1], TexCoord { u: 0.5, v: 0.25, w: 0.0 });
}

#[test]
fn relative_indices_use_the_pool_size_at_the_face() {
  let model = decode(
    "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\nv 0 0 1\nv 1 1 1\nf -1 -2 -5\n",
  )
  .unwrap();
  let faces = &model.objects[0].meshes[0].faces;
  let vertices = |i: usize| -> Vec<usize> {
    faces[i].references.iter().map(|r| r.vertex_index).collect()
  };
  assert_eq!(vertices(0), vec![0, 1, 2]);
  assert_eq!(vertices(1), vec![4, 3, 0]);
}

#[test]
fn relative_indices_resolve_before_the_face_is_checked() {
  match decode("v 0.1 0.2 0.3\nv 0.4 0.5 0.6\nf -1 -2\n") {
    Err(Error::Malformed(message)) => {
      assert_eq!(message, "face needs at least three references but has 2")
    }
    other => panic!("unexpected result {:?}", other),
  }
}

#[test]
fn relative_indices_before_the_first_element_fail() {
  match decode("v 0 0 0\nf -1 -2 -3\n") {
    Err(Error::Malformed(_)) => {}
    other => panic!("unexpected result {:?}", other),
  }
}

#[test]
fn positive_indices_may_point_forward() {
  let model = decode("f 1 2 3\nv 0 0 0\nv 1 0 0\nv 0 1 0\n").unwrap();
  let face = &model.objects[0].meshes[0].faces[0];
  assert_eq!(face.references[2].vertex_index, 2);
  assert_eq!(model.vertex(&face.references[2]), Some(&model.vertices[2]));
}

#[test]
fn faces_without_object_land_in_default_object() {
  let model = decode("v 0 0 0\nf 1 1 1\no Named\nf 1 1 1\n").unwrap();
  assert_eq!(model.objects.len(), 2);
  assert_eq!(model.objects[0].name, "Default");
  assert_eq!(model.objects[0].meshes[0].material_name, "");
  assert_eq!(model.objects[0].meshes[0].faces.len(), 1);
  assert_eq!(model.objects[1].name, "Named");
  assert_eq!(model.objects[1].meshes[0].faces.len(), 1);
}

#[test]
fn meshes_are_reused_per_material() {
  let model = decode(
    "v 0 0 0\no Thing\nusemtl Red\nf 1 1 1\nusemtl Blue\nf 1 1 1\nusemtl Red\nf 1 1 1\nf 1 1 1\nusemtl\nf 1 1 1\n",
  )
  .unwrap();
  let object = model.find_object("Thing").unwrap();
  assert_eq!(object.meshes.len(), 3);
  assert_eq!(object.find_mesh("Red").unwrap().faces.len(), 3);
  assert_eq!(object.find_mesh("Blue").unwrap().faces.len(), 1);
  assert_eq!(object.find_mesh("").unwrap().faces.len(), 1);
}

#[test]
fn usemtl_before_any_object_creates_default_object() {
  let model = decode("usemtl Red\n").unwrap();
  assert_eq!(model.objects.len(), 1);
  assert_eq!(model.objects[0].name, "Default");
  assert_eq!(model.objects[0].meshes[0].material_name, "Red");
  assert!(model.objects[0].meshes[0].faces.is_empty());
}

#[test]
fn new_objects_start_without_a_mesh() {
  let model = decode("v 0 0 0\no A\nusemtl Red\nf 1 1 1\no B\nf 1 1 1\n").unwrap();
  assert_eq!(model.objects[1].meshes.len(), 1);
  assert_eq!(model.objects[1].meshes[0].material_name, "");
}

#[test]
fn unsupported_commands_are_ignored() {
  let model = decode("v 0 0 0\ng group\ns off\nl 1 1\ncstype bezier\nf 1 1 1\n").unwrap();
  assert_eq!(model.vertices.len(), 1);
  assert_eq!(model.objects[0].meshes[0].faces.len(), 1);
}

#[test]
fn malformed_lines_report_their_line_number() {
  match decode("v 0 0 0\n\nv 1 zero 0\n") {
    Err(Error::Parse(err)) => {
      assert_eq!(err.line_number, 3);
      assert_eq!(err.message, "Expected f64 but got `zero`.");
    }
    other => panic!("unexpected result {:?}", other),
  }
}

fn assert_limits_exceeded(result: Result<Model, Error>, expected: &str) {
  match result {
    Err(Error::LimitsExceeded { collection, .. }) => assert_eq!(collection, expected),
    other => panic!("unexpected result {:?}", other),
  }
}

#[test]
fn object_limit() {
  let limits = DecodeLimits {
    max_object_count: 1,
    ..DecodeLimits::default()
  };
  assert!(decode_with("o First\n", limits).is_ok());
  assert_limits_exceeded(decode_with("o First\no Second\n", limits), "objects");
}

#[test]
fn pool_limits() {
  let limits = DecodeLimits {
    max_vertex_count: 1,
    max_tex_coord_count: 1,
    max_normal_count: 1,
    ..DecodeLimits::default()
  };
  assert!(decode_with("v 1 2 3\nvt 0\nvn 0 0 1\n", limits).is_ok());
  assert_limits_exceeded(decode_with("v 1 2 3\nv 4 5 6\n", limits), "vertices");
  assert_limits_exceeded(decode_with("vt 0\nvt 1\n", limits), "texture coordinates");
  assert_limits_exceeded(decode_with("vn 0 0 1\nvn 0 1 0\n", limits), "normals");
}

#[test]
fn face_and_reference_limits() {
  let limits = DecodeLimits {
    max_face_count: 1,
    max_reference_count: 3,
    ..DecodeLimits::default()
  };
  assert!(decode_with("v 0 0 0\nf 1 1 1\n", limits).is_ok());
  assert_limits_exceeded(decode_with("v 0 0 0\nf 1 1 1\nf 1 1 1\n", limits), "faces");
  assert_limits_exceeded(decode_with("v 0 0 0\nf 1 1 1 1\n", limits), "references");

  // The face limit is per mesh.
  let model = decode_with(
    "v 0 0 0\nusemtl A\nf 1 1 1\nusemtl B\nf 1 1 1\n",
    limits,
  )
  .unwrap();
  assert_eq!(model.objects[0].meshes.len(), 2);
}

#[test]
fn material_limits() {
  let limits = DecodeLimits {
    max_material_library_count: 2,
    max_material_reference_count: 2,
    ..DecodeLimits::default()
  };
  assert!(decode_with("mtllib a.mtl b.mtl\n", limits).is_ok());
  assert_limits_exceeded(
    decode_with("mtllib a.mtl b.mtl\nmtllib c.mtl\n", limits),
    "material libraries",
  );
  assert!(decode_with("usemtl A\nusemtl B\nusemtl A\n", limits).is_ok());
  assert_limits_exceeded(
    decode_with("usemtl A\nusemtl B\nusemtl C\n", limits),
    "material references",
  );
}

#[test]
fn read_failures_propagate() {
  struct FailingReader;
  impl Read for FailingReader {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
      Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"))
    }
  }

  match obj::decode(FailingReader, DecodeLimits::default()) {
    Err(Error::Io(err)) => {
      assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
      assert_eq!(err.to_string(), "truncated");
    }
    other => panic!("unexpected result {:?}", other),
  }
}

#[test]
fn parse_uses_default_limits() {
  let model = obj::parse("o Only\n").unwrap();
  assert_eq!(model.objects[0].name, "Only");
}

#[test]
fn latin1_comments_do_not_abort() {
  let input: &[u8] = b"# Cr\xE9\xE9 par Blender\nv 0 0 0\nf 1 1 1\n";
  let model = obj::decode(input, DecodeLimits::default()).unwrap();
  assert_eq!(model.vertices.len(), 1);
  assert_eq!(model.objects[0].meshes[0].faces.len(), 1);

  match obj::decode(&b"v 0 \xE9 0\n"[..], DecodeLimits::default()) {
    Err(Error::Parse(err)) => assert_eq!(err.line_number, 1),
    other => panic!("unexpected result {:?}", other),
  }
}

#[test]
fn implicit_mesh_counts_as_a_material_reference() {
  let limits = DecodeLimits {
    max_material_reference_count: 1,
    ..DecodeLimits::default()
  };
  assert!(decode_with("v 0 0 0\nf 1 1 1\n", limits).is_ok());
  assert!(decode_with("v 0 0 0\nusemtl Red\nf 1 1 1\n", limits).is_ok());
  assert_limits_exceeded(
    decode_with("v 0 0 0\nf 1 1 1\nusemtl Red\n", limits),
    "material references",
  );

  let none = DecodeLimits {
    max_material_reference_count: 0,
    ..DecodeLimits::default()
  };
  assert_limits_exceeded(decode_with("v 0 0 0\nf 1 1 1\n", none), "material references");
}
