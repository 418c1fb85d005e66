use crate::float_types::Real;
use crate::mesh::IndexedMesh;
use nalgebra::Point3;
use std::io::Cursor;

/// Export to ASCII STL
/// Convert a mesh to an **ASCII STL** string with the given `name`.
///
/// Facet normals are computed from each triangle's winding.
///
/// ```rust
/// # use cagegen::{Boundary, stitch::close_boundary_simple};
/// let cap = close_boundary_simple(&Boundary::square(1.0), false).unwrap();
/// let text = cagegen::io::stl::to_stl_ascii(&cap, "cap");
/// assert!(text.starts_with("solid cap"));
/// ```
pub fn to_stl_ascii(mesh: &IndexedMesh, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    for (face, tri) in mesh.triangles().enumerate() {
        let n = mesh.face_normal(face);
        out.push_str(&format!("  facet normal {:.6} {:.6} {:.6}\n", n.x, n.y, n.z));
        out.push_str("    outer loop\n");
        for p in &tri {
            out.push_str(&format!("      vertex {:.6} {:.6} {:.6}\n", p.x, p.y, p.z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// Coordinates are narrowed to `f32`, as the format requires.
pub fn to_stl_binary(mesh: &IndexedMesh) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let triangles: Vec<Triangle> = mesh
        .triangles()
        .enumerate()
        .map(|(face, tri)| {
            let n = mesh.face_normal(face);
            Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            }
        })
        .collect();

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// Reads binary or ASCII STL data back into a triangle soup: three fresh
/// vertices per facet, nothing merged.
pub fn from_stl(stl_data: &[u8]) -> std::io::Result<IndexedMesh> {
    let mut cursor = Cursor::new(stl_data);
    let reader = stl_io::create_stl_reader(&mut cursor)?;

    let mut mesh = IndexedMesh::new();
    for tri in reader {
        let tri = tri?;
        let base = mesh.push_vertices(tri.vertices.iter().map(|v| {
            Point3::new(v[0] as Real, v[1] as Real, v[2] as Real)
        }));
        mesh.push_triangle([base, base + 1, base + 2]);
    }
    Ok(mesh)
}

impl IndexedMesh {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }
}
