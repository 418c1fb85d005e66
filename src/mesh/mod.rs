//! `IndexedMesh`: the vertex/face accumulator every stitching operation writes into.

use crate::errors::CageError;
use crate::float_types::Real;
use crate::transform::Transform;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "hashmap")]
pub mod manifold;

/// A triangle mesh stored as a vertex list and index triples into it.
///
/// Every face index must be `< vertices.len()`; [`IndexedMesh::validate`] checks this.
/// Vertices are never merged implicitly. Two faces share a vertex only when they
/// were built with the same index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex positions
    pub vertices: Vec<Point3<Real>>,
    /// Triangles as indices into `vertices`
    pub faces: Vec<[usize; 3]>,
}

impl IndexedMesh {
    /// An empty mesh.
    pub const fn new() -> Self {
        IndexedMesh {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Empty mesh with room for `vertices` points and `faces` triangles.
    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        IndexedMesh {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Builds a mesh and checks every face index.
    pub fn from_parts(
        vertices: Vec<Point3<Real>>,
        faces: Vec<[usize; 3]>,
    ) -> Result<Self, CageError> {
        let mesh = IndexedMesh { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    /// Reports the first face index that points past the vertex list.
    pub fn validate(&self) -> Result<(), CageError> {
        let vertex_count = self.vertices.len();
        for (face, tri) in self.faces.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i >= vertex_count) {
                return Err(CageError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// `self` followed by `other`, with `other`'s face indices re-based.
    pub fn concat(&self, other: &IndexedMesh) -> IndexedMesh {
        let mut out = IndexedMesh::with_capacity(
            self.vertices.len() + other.vertices.len(),
            self.faces.len() + other.faces.len(),
        );
        out.append(self);
        out.append(other);
        out
    }

    /// Concatenates all meshes in order. Same result as folding [`IndexedMesh::concat`]
    /// from the left, but sizes are summed first so each buffer is allocated once.
    pub fn concat_many(meshes: &[IndexedMesh]) -> IndexedMesh {
        let (nv, nf) = meshes.iter().fold((0, 0), |(nv, nf), m| {
            (nv + m.vertices.len(), nf + m.faces.len())
        });
        let mut out = IndexedMesh::with_capacity(nv, nf);
        for mesh in meshes {
            out.append(mesh);
        }
        out
    }

    /// Appends `other` in place, re-basing its faces onto the current vertex count.
    pub fn append(&mut self, other: &IndexedMesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|&[a, b, c]| [a + offset, b + offset, c + offset]),
        );
    }

    /// A copy with every vertex mapped through `xf`. Faces are unchanged.
    pub fn transform(&self, xf: &Transform) -> IndexedMesh {
        IndexedMesh {
            vertices: xf.apply_to(&self.vertices),
            faces: self.faces.clone(),
        }
    }

    /// A copy with every triangle's winding reversed.
    pub fn flip_winding(&self) -> IndexedMesh {
        IndexedMesh {
            vertices: self.vertices.clone(),
            faces: self.faces.iter().map(|&[a, b, c]| [b, a, c]).collect(),
        }
    }

    /// `(mins, maxs)` over all vertices, or `None` for a mesh without vertices.
    pub fn bounding_box(&self) -> Option<(Point3<Real>, Point3<Real>)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(mins, maxs), p| {
                    (mins.inf(p), maxs.sup(p))
                }),
        )
    }

    /// Iterator over the corner positions of every face.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<Real>; 3]> + '_ {
        self.faces
            .iter()
            .map(|&[a, b, c]| [self.vertices[a], self.vertices[b], self.vertices[c]])
    }

    /// Unit normal of face `face` following its winding, zero for a sliver.
    pub fn face_normal(&self, face: usize) -> Vector3<Real> {
        let [a, b, c] = self.faces[face];
        let (a, b, c) = (self.vertices[a], self.vertices[b], self.vertices[c]);
        (b - a).cross(&(c - a)).try_normalize(Real::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    // Accumulator API, used when indices must be tracked while building
    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

    /// Pushes points and returns the index of the first one.
    pub fn push_vertices<I>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = Point3<Real>>,
    {
        let base = self.vertices.len();
        self.vertices.extend(points);
        base
    }

    pub fn push_triangle(&mut self, tri: [usize; 3]) {
        debug_assert!(tri.iter().all(|&i| i < self.vertices.len()));
        self.faces.push(tri);
    }

    /// Quad `a b c d` as the triangles `a b c` and `a c d`.
    pub fn push_quad(&mut self, a: usize, b: usize, c: usize, d: usize) {
        self.push_triangle([a, b, c]);
        self.push_triangle([a, c, d]);
    }

    /// Convex polygon as a fan around its first index. Fewer than three indices adds nothing.
    pub fn push_polygon(&mut self, indices: &[usize]) {
        if let Some((&first, rest)) = indices.split_first() {
            for pair in rest.windows(2) {
                self.push_triangle([first, pair[0], pair[1]]);
            }
        }
    }
}

impl FromIterator<IndexedMesh> for IndexedMesh {
    fn from_iter<T: IntoIterator<Item = IndexedMesh>>(iter: T) -> Self {
        let meshes: Vec<IndexedMesh> = iter.into_iter().collect();
        IndexedMesh::concat_many(&meshes)
    }
}
