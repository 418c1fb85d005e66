//! `Cage`: one step of a cross-section sequence, holding one or more boundaries.

use crate::boundary::{Boundary, centroid, midpoint};
use crate::errors::CageError;
use crate::float_types::{Real, tolerance};
use crate::fork::ForkLayout;
use crate::transform::Transform;
use nalgebra::Point3;

/// An ordered set of boundaries sharing one vertex buffer.
///
/// `splits[i]` is the row of `vertices` where boundary `i` begins; boundary `i`
/// ends where boundary `i + 1` begins (or at the end of the buffer). Several
/// boundaries in one cage are parallel branches that advance in lockstep.
#[derive(Debug, Clone, PartialEq)]
pub struct Cage {
    vertices: Vec<Point3<Real>>,
    splits: Vec<usize>,
}

/// How a vertex of a candidate cage relates to a reference cage, see
/// [`Cage::classify_overlap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapClass {
    /// None of the below
    Free,
    /// Lies on an edge of the reference cage
    OnEdge,
    /// Coincides with a different vertex among the candidates
    Shared,
    /// Coincides with a vertex of the reference cage
    OnVertex,
}

impl Cage {
    /// Packs boundaries into one buffer, recording where each begins.
    pub fn from_boundaries<I>(boundaries: I) -> Result<Self, CageError>
    where
        I: IntoIterator<Item = Boundary>,
    {
        let mut vertices = Vec::new();
        let mut splits = Vec::new();
        for boundary in boundaries {
            splits.push(vertices.len());
            vertices.extend(boundary.into_points());
        }
        if splits.is_empty() {
            return Err(CageError::EmptyBoundary);
        }
        Ok(Cage { vertices, splits })
    }

    /// Raw constructor for callers that already maintain the split invariant.
    pub(crate) fn from_parts(vertices: Vec<Point3<Real>>, splits: Vec<usize>) -> Self {
        debug_assert!(!splits.is_empty() && splits.windows(2).all(|w| w[0] <= w[1]));
        Cage { vertices, splits }
    }

    /// A cage with a single boundary.
    pub fn single(boundary: Boundary) -> Self {
        Cage {
            vertices: boundary.into_points(),
            splits: vec![0],
        }
    }

    pub fn boundary_count(&self) -> usize {
        self.splits.len()
    }

    pub fn vertices(&self) -> &[Point3<Real>] {
        &self.vertices
    }

    pub fn splits(&self) -> &[usize] {
        &self.splits
    }

    fn range(&self, i: usize) -> std::ops::Range<usize> {
        let start = self.splits[i];
        let end = self.splits.get(i + 1).copied().unwrap_or(self.vertices.len());
        start..end
    }

    /// Points of boundary `i`.
    ///
    /// # Panics
    /// If `i >= self.boundary_count()`.
    pub fn boundary_points(&self, i: usize) -> &[Point3<Real>] {
        &self.vertices[self.range(i)]
    }

    /// Boundary `i` as an owned [`Boundary`], or `None` if out of range.
    pub fn boundary(&self, i: usize) -> Option<Boundary> {
        if i >= self.splits.len() {
            return None;
        }
        Boundary::new(self.boundary_points(i).to_vec()).ok()
    }

    /// All boundaries, in order. Zero-length segments are reported as errors.
    pub fn boundaries(&self) -> impl Iterator<Item = Result<Boundary, CageError>> + '_ {
        (0..self.splits.len()).map(|i| Boundary::new(self.boundary_points(i).to_vec()))
    }

    /// Applies `xf` to every vertex. Splits are unchanged.
    pub fn transform(&self, xf: &Transform) -> Cage {
        Cage {
            vertices: xf.apply_to(&self.vertices),
            splits: self.splits.clone(),
        }
    }

    fn single_boundary(&self) -> Result<&[Point3<Real>], CageError> {
        if self.splits.len() != 1 {
            return Err(CageError::ForkFromMultipleBoundaries {
                found: self.splits.len(),
            });
        }
        let points = self.boundary_points(0);
        if points.len() < 3 {
            return Err(CageError::TooFewPoints {
                needed: 3,
                found: points.len(),
            });
        }
        Ok(points)
    }

    /// Splits a single n-gon boundary into `n` quads meeting at its centroid.
    ///
    /// Child `i` is `[v_i, m_i, c, m_{i-1}]` rolled right by `i mod 4`, where `m_i` is
    /// the midpoint of edge `(i, i+1)` and `c` the centroid; for a square every child
    /// then starts at the same corner role as the parent. The transition set
    /// interleaves corners and midpoints, `[v_0, m_0, v_1, m_1, …]`, and parent vertex
    /// `i` is adjacent to transition vertices `[2i-1, 2i, 2i+1]` (mod `2n`).
    pub fn subdivide(&self) -> Result<ForkLayout, CageError> {
        let points = self.single_boundary()?;
        let n = points.len();
        let c = centroid(points);
        let mids: Vec<Point3<Real>> = (0..n)
            .map(|i| midpoint(&points[i], &points[(i + 1) % n]))
            .collect();

        let children = (0..n)
            .map(|i| {
                let quad = Boundary::new(vec![points[i], mids[i], c, mids[(i + n - 1) % n]])?;
                Ok(Cage::single(quad.roll((i % 4) as isize)))
            })
            .collect::<Result<Vec<_>, CageError>>()?;

        Ok(ForkLayout::new(
            children,
            interleave(points, &mids),
            corner_adjacency(n),
        ))
    }

    /// Splits a single quad boundary into two halves across edges 0 and 2:
    /// `[v_0, m_0, m_2, v_3]` and `[m_0, v_1, v_2, m_2]`.
    ///
    /// Uses the same transition set and adjacency as [`Cage::subdivide`].
    pub fn bisect(&self) -> Result<ForkLayout, CageError> {
        let points = self.single_boundary()?;
        if points.len() != 4 {
            return Err(CageError::BoundaryLengthMismatch {
                left: points.len(),
                right: 4,
            });
        }
        let mids: Vec<Point3<Real>> = (0..4)
            .map(|i| midpoint(&points[i], &points[(i + 1) % 4]))
            .collect();

        let children = vec![
            Cage::single(Boundary::new(vec![points[0], mids[0], mids[2], points[3]])?),
            Cage::single(Boundary::new(vec![mids[0], points[1], points[2], mids[2]])?),
        ];

        Ok(ForkLayout::new(
            children,
            interleave(points, &mids),
            corner_adjacency(4),
        ))
    }

    /// Classifies every vertex of every cage in `cages` against `self`.
    ///
    /// Result `v[i][j]` describes vertex `j` of `cages[i]`. Categories are tested in
    /// the order `OnVertex`, `OnEdge`, `Shared`; the first that applies wins. Mainly
    /// used to check that the first cages of a fork tile their parent.
    pub fn classify_overlap(&self, cages: &[Cage]) -> Vec<Vec<OverlapClass>> {
        let tol = tolerance();
        let same = |a: &Point3<Real>, b: &Point3<Real>| (a - b).norm() <= tol;

        cages
            .iter()
            .enumerate()
            .map(|(i, cage)| {
                cage.vertices
                    .iter()
                    .enumerate()
                    .map(|(j, vert)| {
                        if self.vertices.iter().any(|v| same(v, vert)) {
                            return OverlapClass::OnVertex;
                        }
                        if self.lies_on_edge(vert, tol) {
                            return OverlapClass::OnEdge;
                        }
                        let shared = cages.iter().enumerate().any(|(i2, other)| {
                            other
                                .vertices
                                .iter()
                                .enumerate()
                                .any(|(j2, v)| (i, j) != (i2, j2) && same(v, vert))
                        });
                        if shared {
                            OverlapClass::Shared
                        } else {
                            OverlapClass::Free
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn lies_on_edge(&self, p: &Point3<Real>, tol: Real) -> bool {
        (0..self.splits.len()).any(|b| {
            let poly = self.boundary_points(b);
            let n = poly.len();
            (0..n).any(|k| {
                let (a, c) = (&poly[k], &poly[(k + 1) % n]);
                let d = (c - a).norm();
                let d1 = (p - a).norm();
                let d2 = (p - c).norm();
                ((d1 + d2) - d).abs() <= tol
            })
        })
    }
}

impl From<Boundary> for Cage {
    fn from(boundary: Boundary) -> Self {
        Cage::single(boundary)
    }
}

fn interleave(points: &[Point3<Real>], mids: &[Point3<Real>]) -> Vec<Point3<Real>> {
    points
        .iter()
        .zip(mids)
        .flat_map(|(v, m)| [*v, *m])
        .collect()
}

fn corner_adjacency(n: usize) -> Vec<Vec<usize>> {
    let m = 2 * n;
    (0..n)
        .map(|i| vec![(2 * i + m - 1) % m, 2 * i, (2 * i + 1) % m])
        .collect()
}
