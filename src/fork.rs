//! Forks: the point where one cross-section sequence splits into several.
//!
//! A [`CageFork`] holds the child sequences together with a *transition set*:
//! a ring of points, plus one adjacency list per vertex of the parent boundary
//! naming the transition points that parent vertex connects to. The transition
//! mesh built by [`transition_from`] bridges the parent boundary onto that ring,
//! so it works even when the parent has fewer vertices than the children cover
//! between them.
//!
//! # Coverage
//!
//! For a parent of `p` vertices the adjacency lists must satisfy:
//!
//! * there are exactly `p` lists and each holds at least two indices,
//! * every index is below the number of transition points,
//! * the last index of list `j` equals the first index of list `(j + 1) % p`,
//! * dropping the last index of every list leaves each transition point named
//!   exactly once.
//!
//! [`CageFork::validate`] checks all four.

use crate::boundary::Boundary;
use crate::cage::Cage;
use crate::errors::CageError;
use crate::float_types::Real;
use crate::generator::CageGen;
use crate::mesh::IndexedMesh;
use crate::transform::Transform;
use nalgebra::Point3;

/// Terminal element of a [`CageGen`]: child sequences plus the transition
/// set that adapts the parent's last boundary to them.
pub struct CageFork<'a> {
    children: Vec<CageGen<'a>>,
    transition: Vec<Point3<Real>>,
    adjacency: Vec<Vec<usize>>,
}

impl<'a> CageFork<'a> {
    /// Builds a fork. Nothing is checked until the fork meets its parent; see
    /// [`CageFork::validate`].
    pub fn new(
        children: Vec<CageGen<'a>>,
        transition: Vec<Point3<Real>>,
        adjacency: Vec<Vec<usize>>,
    ) -> Self {
        CageFork {
            children,
            transition,
            adjacency,
        }
    }

    pub fn children(&self) -> &[CageGen<'a>] {
        &self.children
    }

    pub fn transition(&self) -> &[Point3<Real>] {
        &self.transition
    }

    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    pub fn into_children(self) -> Vec<CageGen<'a>> {
        self.children
    }

    /// Checks the coverage rules against a parent boundary of `parent_len` vertices.
    pub fn validate(&self, parent_len: usize) -> Result<(), CageError> {
        validate_adjacency(&self.adjacency, self.transition.len(), parent_len)
    }
}

impl std::fmt::Debug for CageFork<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CageFork")
            .field("children", &self.children.len())
            .field("transition", &self.transition)
            .field("adjacency", &self.adjacency)
            .finish()
    }
}

pub(crate) fn validate_adjacency(
    adjacency: &[Vec<usize>],
    transition_len: usize,
    parent_len: usize,
) -> Result<(), CageError> {
    if adjacency.len() != parent_len {
        return Err(CageError::InvalidAdjacency(format!(
            "{} adjacency lists for a parent of {} vertices",
            adjacency.len(),
            parent_len
        )));
    }
    for (j, adjs) in adjacency.iter().enumerate() {
        if adjs.len() < 2 {
            return Err(CageError::InvalidAdjacency(format!(
                "list {j} has {} entries, at least 2 are required",
                adjs.len()
            )));
        }
        if let Some(&index) = adjs.iter().find(|&&i| i >= transition_len) {
            return Err(CageError::InvalidAdjacency(format!(
                "list {j} names transition vertex {index}, only {transition_len} exist"
            )));
        }
    }

    let mut seen = vec![0usize; transition_len];
    for (j, adjs) in adjacency.iter().enumerate() {
        let next = &adjacency[(j + 1) % parent_len];
        let (last, head) = match adjs.split_last() {
            Some(split) => split,
            None => continue,
        };
        if Some(last) != next.first() {
            return Err(CageError::TransitionCoverage(format!(
                "list {j} ends at {last} but list {} starts at {}",
                (j + 1) % parent_len,
                next[0]
            )));
        }
        for &i in head {
            seen[i] += 1;
        }
    }
    if let Some((vertex, &times)) = seen.iter().enumerate().find(|&(_, &c)| c != 1) {
        return Err(CageError::TransitionCoverage(format!(
            "transition vertex {vertex} is covered {times} times"
        )));
    }
    Ok(())
}

/// Bridges `parent` onto the fork's transition ring.
///
/// Vertices are `parent ++ transition`. For parent vertex `j` with list `adjs`
/// of length `k`, emits the fan `(j, p + adjs[m + 1], p + adjs[m])` for
/// `m < k - 1`, then the closing triangle `(j, (j + 1) % p, p + adjs[k - 1])`,
/// where `p = parent.len()`.
pub fn transition_from(parent: &Boundary, fork: &CageFork<'_>) -> Result<IndexedMesh, CageError> {
    let p = parent.len();
    fork.validate(p)?;

    let faces_total: usize = fork.adjacency.iter().map(Vec::len).sum();
    let mut mesh = IndexedMesh::with_capacity(p + fork.transition.len(), faces_total);
    mesh.push_vertices(parent.points().iter().copied());
    let offset = mesh.push_vertices(fork.transition.iter().copied());

    for (j, adjs) in fork.adjacency.iter().enumerate() {
        for pair in adjs.windows(2) {
            mesh.push_triangle([j, offset + pair[1], offset + pair[0]]);
        }
        if let Some(&last) = adjs.last() {
            mesh.push_triangle([j, (j + 1) % p, offset + last]);
        }
    }
    log::trace!(
        "transition_from: parent={p}, transition={}, faces={}",
        fork.transition.len(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// The geometric part of a fork: first cages for each child plus the
/// transition set, before any child sequence has been attached.
///
/// Produced by [`Cage::subdivide`] and [`Cage::bisect`].
#[derive(Debug, Clone, PartialEq)]
pub struct ForkLayout {
    children: Vec<Cage>,
    transition: Vec<Point3<Real>>,
    adjacency: Vec<Vec<usize>>,
}

impl ForkLayout {
    pub fn new(
        children: Vec<Cage>,
        transition: Vec<Point3<Real>>,
        adjacency: Vec<Vec<usize>>,
    ) -> Self {
        ForkLayout {
            children,
            transition,
            adjacency,
        }
    }

    pub fn children(&self) -> &[Cage] {
        &self.children
    }

    pub fn transition(&self) -> &[Point3<Real>] {
        &self.transition
    }

    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    /// Children, transition points and adjacency, in that order.
    pub fn into_parts(self) -> (Vec<Cage>, Vec<Point3<Real>>, Vec<Vec<usize>>) {
        (self.children, self.transition, self.adjacency)
    }

    /// Moves the child cages and the transition ring by `xf`.
    pub fn transform(&self, xf: &Transform) -> ForkLayout {
        ForkLayout {
            children: self.children.iter().map(|c| c.transform(xf)).collect(),
            transition: xf.apply_to(&self.transition),
            adjacency: self.adjacency.clone(),
        }
    }

    /// Turns the layout into a fork, asking `child_gen` for the sequence that
    /// starts at each child cage.
    pub fn into_fork<'a, F>(self, mut child_gen: F) -> CageFork<'a>
    where
        F: FnMut(usize, Cage) -> CageGen<'a>,
    {
        let children = self
            .children
            .into_iter()
            .enumerate()
            .map(|(i, cage)| child_gen(i, cage))
            .collect();
        CageFork::new(children, self.transition, self.adjacency)
    }
}
