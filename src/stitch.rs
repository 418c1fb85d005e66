//! Stitching primitives: join two boundaries with a band of triangles, or cap one.
//!
//! Every primitive returns a fresh [`IndexedMesh`] holding its own copy of the
//! boundary points; pieces are combined later with [`IndexedMesh::concat_many`].

use crate::boundary::Boundary;
use crate::errors::CageError;
use crate::float_types::{Real, tolerance};
use crate::mesh::IndexedMesh;

/// Which join primitive the traversal engine uses between consecutive boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinFn {
    /// [`join_boundary_simple`]: vertex `i` meets vertex `i`
    #[default]
    Simple,
    /// [`join_boundary_optim`]: best cyclic alignment first
    Optim,
}

impl JoinFn {
    pub fn join(self, b1: &Boundary, b2: &Boundary) -> Result<IndexedMesh, CageError> {
        match self {
            JoinFn::Simple => join_boundary_simple(b1, b2),
            JoinFn::Optim => join_boundary_optim(b1, b2),
        }
    }
}

fn check_join(b1: &Boundary, b2: &Boundary) -> Result<usize, CageError> {
    if b1.is_empty() || b2.is_empty() {
        return Err(CageError::EmptyBoundary);
    }
    if b1.len() != b2.len() {
        return Err(CageError::BoundaryLengthMismatch {
            left: b1.len(),
            right: b2.len(),
        });
    }
    Ok(b1.len())
}

/// Connects vertex `i` of `b1` to vertices `i` and `i+1` of `b2` with two triangles
/// per edge. Winding follows the direction of `b1`.
///
/// The result has `2n` vertices (`b1` then `b2`) and `2n` faces.
pub fn join_boundary_simple(b1: &Boundary, b2: &Boundary) -> Result<IndexedMesh, CageError> {
    let n = check_join(b1, b2)?;

    let mut mesh = IndexedMesh::with_capacity(2 * n, 2 * n);
    mesh.push_vertices(b1.points().iter().copied());
    mesh.push_vertices(b2.points().iter().copied());

    // 0..n are b1, n..2n are b2
    for v0 in 0..n {
        let v1 = (v0 + 1) % n;
        mesh.push_triangle([n + v1, n + v0, v1]);
        mesh.push_triangle([v1, n + v0, v0]);
    }
    Ok(mesh)
}

/// Like [`join_boundary_simple`], but first rolls `b2` by the cyclic offset that
/// minimises the total squared distance to `b1`.
///
/// Keeps a band from twisting when the start vertex of successive cross-sections
/// has drifted. Ties go to the smallest offset.
pub fn join_boundary_optim(b1: &Boundary, b2: &Boundary) -> Result<IndexedMesh, CageError> {
    let n = check_join(b1, b2)?;
    check_edges(b1)?;
    check_edges(b2)?;

    let p1 = b1.points();
    let p2 = b2.points();
    let error = |k: usize| -> Real {
        // rolled[j] = b2[(j - k) mod n]
        (0..n)
            .map(|j| (p1[j] - p2[(j + n - k) % n]).norm_squared())
            .sum()
    };

    let mut best = 0;
    let mut best_error = error(0);
    for k in 1..n {
        let e = error(k);
        if e < best_error {
            best = k;
            best_error = e;
        }
    }
    log::trace!("join_boundary_optim: n={n}, offset={best}, error={best_error:e}");

    join_boundary_simple(b1, &b2.roll(best as isize))
}

fn check_edges(boundary: &Boundary) -> Result<(), CageError> {
    if boundary.len() < 2 {
        return Ok(());
    }
    let tol = tolerance();
    for (edge, (a, b)) in boundary.edges().enumerate() {
        let length = (b - a).norm();
        if length < tol {
            return Err(CageError::DegenerateEdge { edge, length });
        }
    }
    Ok(())
}

/// Caps a convex boundary with a fan of `n` triangles around its centroid.
///
/// The centroid is appended as vertex `n`. With `reverse == false` the cap faces
/// away from the direction a band built by [`join_boundary_simple`] advances, which
/// is right for the first cross-section of a sequence. `reverse == true` swaps the
/// first two indices of every face, for the last cross-section.
pub fn close_boundary_simple(boundary: &Boundary, reverse: bool) -> Result<IndexedMesh, CageError> {
    let n = boundary.len();
    if n == 0 {
        return Err(CageError::EmptyBoundary);
    }
    if n < 3 {
        return Err(CageError::TooFewPoints { needed: 3, found: n });
    }
    check_convex(boundary)?;

    let mut mesh = IndexedMesh::with_capacity(n + 1, n);
    mesh.push_vertices(boundary.points().iter().copied());
    let centroid = mesh.push_vertices([boundary.centroid()]);

    for i in 0..n {
        let j = (i + 1) % n;
        if reverse {
            mesh.push_triangle([i, j, centroid]);
        } else {
            mesh.push_triangle([j, i, centroid]);
        }
    }
    Ok(mesh)
}

/// Rejects loops whose centroid falls outside one of their edges.
///
/// Edges are tested against the Newell normal, so this works for any planar or
/// nearly planar loop regardless of orientation in space.
fn check_convex(boundary: &Boundary) -> Result<(), CageError> {
    let normal = boundary.newell_normal();
    let scale = boundary
        .edges()
        .map(|(a, b)| (b - a).norm_squared())
        .fold(0.0, Real::max);
    let tol = tolerance();
    if normal.norm() <= tol * scale.max(tol) {
        return Err(CageError::DegenerateBoundary);
    }

    let centroid = boundary.centroid();
    for (edge, (a, b)) in boundary.edges().enumerate() {
        let side = (b - a).cross(&(centroid - a)).dot(&normal);
        if side < -tol * normal.norm() * scale.sqrt() {
            return Err(CageError::NonConvexBoundary { edge });
        }
    }
    Ok(())
}
