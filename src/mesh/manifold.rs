use crate::float_types::{Real, tolerance};
use crate::mesh::IndexedMesh;
use hashbrown::HashMap;
use nalgebra::Point3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct QuantizedPoint(i64, i64, i64);

fn quantize_point(p: &Point3<Real>, step: Real) -> QuantizedPoint {
    QuantizedPoint(
        (p.x / step).round() as i64,
        (p.y / step).round() as i64,
        (p.z / step).round() as i64,
    )
}

/// Edge statistics of a triangle soup, matched by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeAnalysis {
    /// Undirected edges used by exactly one triangle
    pub boundary_edges: usize,
    /// Undirected edges used by more than two triangles
    pub non_manifold_edges: usize,
    /// Edges traversed twice in the same direction (neighbours disagree on winding)
    pub inconsistent_edges: usize,
    /// Edges whose endpoints coincide, skipped by the counts above
    pub degenerate_edges: usize,
}

impl EdgeAnalysis {
    /// No holes, no fins, consistent winding.
    pub const fn is_closed(&self) -> bool {
        self.boundary_edges == 0 && self.non_manifold_edges == 0 && self.inconsistent_edges == 0
    }
}

impl IndexedMesh {
    /// Counts open, over-shared and mis-wound edges.
    ///
    /// Stitched pieces do not share indices with their neighbours, so vertices are
    /// matched by position, quantized to the crate [`tolerance`]. The mesh itself is
    /// not modified.
    pub fn analyze_edges(&self) -> EdgeAnalysis {
        let step = tolerance();
        let keys: Vec<QuantizedPoint> = self
            .vertices
            .iter()
            .map(|p| quantize_point(p, step))
            .collect();

        let mut directed: HashMap<(QuantizedPoint, QuantizedPoint), usize> = HashMap::new();
        let mut analysis = EdgeAnalysis::default();

        for &[a, b, c] in &self.faces {
            for (i0, i1) in [(a, b), (b, c), (c, a)] {
                let (p0, p1) = (keys[i0], keys[i1]);
                if p0 == p1 {
                    analysis.degenerate_edges += 1;
                    continue;
                }
                *directed.entry((p0, p1)).or_insert(0) += 1;
            }
        }

        for (&(p0, p1), &forward) in &directed {
            // visit each undirected edge once, from its smaller endpoint
            let backward = directed.get(&(p1, p0)).copied().unwrap_or(0);
            if backward > 0 && p1 < p0 {
                continue;
            }
            match forward + backward {
                1 => analysis.boundary_edges += 1,
                2 => {},
                _ => analysis.non_manifold_edges += 1,
            }
            if forward > 1 || backward > 1 {
                analysis.inconsistent_edges += 1;
            }
        }

        analysis
    }

    /// Returns `true` if every edge is shared by exactly two consistently wound triangles.
    pub fn is_closed(&self) -> bool {
        self.analyze_edges().is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lone_triangle_is_open() {
        let mesh = IndexedMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();
        let analysis = mesh.analyze_edges();
        assert_eq!(analysis.boundary_edges, 3);
        assert!(!analysis.is_closed());
    }

    #[test]
    fn tetrahedron_is_closed() {
        let mesh = IndexedMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        )
        .unwrap();
        assert!(mesh.is_closed());
        assert!(!mesh.flip_winding().concat(&mesh).is_closed());
    }
}
