//! Cage-sequence combinators.
//!
//! Each combinator takes a stream of cages and returns a new lazy stream,
//! so they nest freely: twist a stream, twist the result again, then sweep it
//! around a torus. Wrap the final iterator in [`CageGen::new`](crate::CageGen::new)
//! to traverse it.

use crate::cage::Cage;
use crate::errors::CageError;
use crate::float_types::{Real, TAU};
use crate::transform::Transform;
use nalgebra::{Point3, Vector3};
use std::iter;

/// `cage` placed by `seed`, then by `incr ∘ seed`, `incr ∘ incr ∘ seed`, …
///
/// `incr` acts in the cage's local frame, before the accumulated transform.
/// The stream never ends.
pub fn iterate(cage: Cage, seed: Transform, incr: Transform) -> impl Iterator<Item = Cage> {
    iter::successors(Some(seed), move |xf| Some(incr.compose(xf))).map(move |xf| cage.transform(&xf))
}

/// Replicates the boundaries of every incoming cage into `count` copies spaced
/// evenly around the Y axis at distance `dx0`. Each copy spins about Y by a
/// further `angle` at every step, so the copies wind around each other.
///
/// Incoming boundaries are expected to lie roughly in the XZ plane. Copy `i`
/// of boundary `b` lands at index `i * k + b` of the outgoing cage, where `k`
/// is the incoming boundary count.
pub fn twisted<I>(
    cages: I,
    count: usize,
    dx0: Real,
    angle: Real,
) -> Result<impl Iterator<Item = Cage>, CageError>
where
    I: IntoIterator<Item = Cage>,
{
    if count == 0 {
        return Err(CageError::InvalidParameter("twisted needs at least one copy"));
    }
    let mut xfs: Vec<Transform> = (0..count)
        .map(|i| {
            Transform::translation(dx0, 0.0, 0.0)
                .rotate(Vector3::y(), TAU * (i as Real) / (count as Real))
        })
        .collect();

    Ok(cages.into_iter().map(move |cage| {
        let mut vertices = Vec::with_capacity(cage.vertices().len() * count);
        let mut splits = Vec::with_capacity(cage.boundary_count() * count);
        for xf in xfs.iter_mut() {
            for b in 0..cage.boundary_count() {
                splits.push(vertices.len());
                vertices.extend(xf.apply_to(cage.boundary_points(b)));
            }
            *xf = xf.rotate(Vector3::y(), angle);
        }
        Cage::from_parts(vertices, splits)
    }))
}

/// Translates the `i`-th incoming cage by `i * (dx, dy, dz)`.
pub fn stepped<I>(cages: I, dx: Real, dy: Real, dz: Real) -> impl Iterator<Item = Cage>
where
    I: IntoIterator<Item = Cage>,
{
    let step = Transform::translation(dx, dy, dz);
    cages
        .into_iter()
        .scan(Transform::identity(), move |xf, cage| {
            let placed = cage.transform(xf);
            *xf = xf.compose(&step);
            Some(placed)
        })
}

/// Sweeps incoming cages around the Z axis: each is pushed out to `radius`
/// along X, then turned by `2π / frames` more than the one before. Takes at
/// most `frames` cages, so one full turn ends where it began; pair with a
/// looped traversal to close the ring.
pub fn torus_xy<I>(cages: I, radius: Real, frames: usize) -> impl Iterator<Item = Cage>
where
    I: IntoIterator<Item = Cage>,
{
    let angle = TAU / frames.max(1) as Real;
    cages
        .into_iter()
        .take(frames)
        .scan(Transform::translation(radius, 0.0, 0.0), move |xf, cage| {
            let placed = cage.transform(xf);
            *xf = xf.rotate(Vector3::z(), angle);
            Some(placed)
        })
}

/// Endless copies of `cage`, the usual input to the other combinators.
pub fn repeat(cage: Cage) -> impl Iterator<Item = Cage> {
    iter::repeat(cage)
}

/// Centroid of every boundary in `cage`, in order. Handy for checking where a
/// combinator has placed things.
pub fn boundary_centroids(cage: &Cage) -> Vec<Point3<Real>> {
    (0..cage.boundary_count())
        .map(|b| crate::boundary::centroid(cage.boundary_points(b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Boundary;

    fn unit_cage() -> Cage {
        Cage::single(Boundary::square_xz(1.0))
    }

    #[test]
    fn iterate_accumulates_increment() {
        let cages: Vec<Cage> = iterate(
            Cage::single(Boundary::square(1.0)),
            Transform::identity(),
            Transform::translation(0.0, 0.0, 2.0),
        )
        .take(3)
        .collect();
        assert_eq!(boundary_centroids(&cages[2])[0], Point3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn twisted_replicates_around_y() {
        let cage = twisted(repeat(unit_cage()), 4, 2.0, 0.1)
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(cage.boundary_count(), 4);
        let centroids = boundary_centroids(&cage);
        for c in &centroids {
            assert!((c.coords.norm() - 2.0).abs() < 1e-12);
            assert!(c.y.abs() < 1e-12);
        }
        assert!(twisted(repeat(unit_cage()), 0, 2.0, 0.1).is_err());
    }

    #[test]
    fn stepped_and_torus_place_cages() {
        let cages: Vec<Cage> = stepped(repeat(unit_cage()), 0.0, 0.5, 0.0).take(3).collect();
        assert_eq!(boundary_centroids(&cages[2])[0], Point3::new(0.0, 1.0, 0.0));

        let ring: Vec<Cage> = torus_xy(repeat(unit_cage()), 3.0, 8).collect();
        assert_eq!(ring.len(), 8);
        let quarter = boundary_centroids(&ring[2])[0];
        assert!((quarter - Point3::new(0.0, 3.0, 0.0)).norm() < 1e-9);
    }
}
