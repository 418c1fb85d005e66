//! Test support library
//! Provides various helper functions & utilities for tests.

use cagegen::{Boundary, Cage, CageGen, IndexedMesh, Transform, float_types::Real};
use nalgebra::Point3;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Same as [`approx_eq`] for points.
pub fn approx_point(a: &Point3<Real>, b: &Point3<Real>, eps: Real) -> bool {
    (a - b).norm() < eps
}

/// Boundary from raw coordinates, for tests that spell points out.
pub fn boundary(points: &[[Real; 3]]) -> Boundary {
    Boundary::from_coords(points).unwrap()
}

/// Unit square in the XY plane lifted to height `z`.
pub fn square_at(z: Real) -> Boundary {
    Boundary::square(1.0).transform(&Transform::translation(0.0, 0.0, z))
}

/// Finite tube of `steps` unit squares, one unit apart along +Z.
pub fn square_tube(steps: usize) -> CageGen<'static> {
    CageGen::new((0..steps).map(|i| Cage::single(square_at(i as Real))))
}

/// Endless tube of unit squares along +Z.
pub fn endless_tube() -> CageGen<'static> {
    CageGen::new((0..).map(|i| Cage::single(square_at(i as Real))))
}

/// Number of distinct vertex positions, matched exactly.
pub fn distinct_positions(mesh: &IndexedMesh) -> usize {
    let mut seen: Vec<[u64; 3]> = mesh
        .vertices
        .iter()
        .map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
        .collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}
