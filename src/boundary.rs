//! Boundaries: ordered, cyclic polygon loops that serve as cross-sections.

use crate::errors::CageError;
use crate::float_types::{Real, TAU};
use crate::transform::Transform;
use nalgebra::{Point3, Vector3};
use std::ops::Index;

/// An ordered cyclic loop of points.
///
/// The winding direction decides which way faces built from the boundary face.
/// A boundary always holds at least one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    points: Vec<Point3<Real>>,
}

impl Boundary {
    /// Builds a boundary, rejecting an empty point list.
    pub fn new(points: Vec<Point3<Real>>) -> Result<Self, CageError> {
        if points.is_empty() {
            return Err(CageError::EmptyBoundary);
        }
        Ok(Boundary { points })
    }

    /// Builds a boundary from raw coordinate triples.
    pub fn from_coords(coords: &[[Real; 3]]) -> Result<Self, CageError> {
        Self::new(coords.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect())
    }

    /// Axis-aligned square of side `size` centred on the origin in the XY plane,
    /// wound counter-clockwise seen from +Z.
    pub fn square(size: Real) -> Self {
        let h = size * 0.5;
        Boundary {
            points: vec![
                Point3::new(-h, -h, 0.0),
                Point3::new(h, -h, 0.0),
                Point3::new(h, h, 0.0),
                Point3::new(-h, h, 0.0),
            ],
        }
    }

    /// Square of side `size` centred on the origin in the XZ plane.
    pub fn square_xz(size: Real) -> Self {
        let h = size * 0.5;
        Boundary {
            points: vec![
                Point3::new(-h, 0.0, -h),
                Point3::new(h, 0.0, -h),
                Point3::new(h, 0.0, h),
                Point3::new(-h, 0.0, h),
            ],
        }
    }

    /// Regular `sides`-gon of circumradius `radius` in the XY plane, first vertex on +X.
    pub fn regular_polygon(sides: usize, radius: Real) -> Result<Self, CageError> {
        if sides < 3 {
            return Err(CageError::TooFewPoints {
                needed: 3,
                found: sides,
            });
        }
        let points = (0..sides)
            .map(|i| {
                let theta = TAU * (i as Real) / (sides as Real);
                Point3::new(radius * theta.cos(), radius * theta.sin(), 0.0)
            })
            .collect();
        Ok(Boundary { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point3<Real>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point3<Real>> {
        self.points
    }

    /// Iterator over `(start, end)` point pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (&Point3<Real>, &Point3<Real>)> + '_ {
        self.points
            .iter()
            .zip(self.points.iter().cycle().skip(1))
    }

    /// Arithmetic mean of the points.
    pub fn centroid(&self) -> Point3<Real> {
        centroid(&self.points)
    }

    /// Cyclic shift: element `j` of the result is element `(j - k) mod n` of `self`.
    pub fn roll(&self, k: isize) -> Boundary {
        let n = self.points.len() as isize;
        let shift = k.rem_euclid(n) as usize;
        let mut points = self.points.clone();
        points.rotate_right(shift);
        Boundary { points }
    }

    /// Same loop, opposite winding.
    pub fn reversed(&self) -> Boundary {
        let mut points = self.points.clone();
        points.reverse();
        Boundary { points }
    }

    /// The boundary moved by `xf`.
    pub fn transform(&self, xf: &Transform) -> Boundary {
        Boundary {
            points: xf.apply_to(&self.points),
        }
    }

    /// Inserts the midpoint of every edge: original vertices land on even indices,
    /// the midpoint of edge `(i, i+1)` on index `2i + 1`.
    pub fn subdivide(&self) -> Boundary {
        let mut points = Vec::with_capacity(self.points.len() * 2);
        for (a, b) in self.edges() {
            points.push(*a);
            points.push(midpoint(a, b));
        }
        Boundary { points }
    }

    /// Polygon normal by Newell's method, not normalized. Zero for degenerate loops.
    pub fn newell_normal(&self) -> Vector3<Real> {
        let mut normal = Vector3::zeros();
        for (a, b) in self.edges() {
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        normal
    }
}

impl Index<usize> for Boundary {
    type Output = Point3<Real>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl TryFrom<Vec<Point3<Real>>> for Boundary {
    type Error = CageError;

    fn try_from(points: Vec<Point3<Real>>) -> Result<Self, Self::Error> {
        Boundary::new(points)
    }
}

/// Mean of a non-empty point slice. Returns the origin for an empty slice.
pub(crate) fn centroid(points: &[Point3<Real>]) -> Point3<Real> {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as Real)
}

#[inline]
pub(crate) fn midpoint(a: &Point3<Real>, b: &Point3<Real>) -> Point3<Real> {
    Point3::from((a.coords + b.coords) * 0.5)
}
