//! The traversal engine: pulls a [`CageGen`] and stitches it into one mesh.
//!
//! Every consecutive pair of cages is joined boundary by boundary. A fork
//! ends the sequence: the last boundary is bridged onto the fork's transition
//! ring, then each child sequence is traversed depth-first with whatever step
//! budget is left. Optional caps close the first and last cross-sections, and
//! a looped sequence joins its last cage back onto its first.

use crate::boundary::Boundary;
use crate::cage::Cage;
use crate::errors::CageError;
use crate::fork::transition_from;
use crate::generator::{CageGen, CageStep};
use crate::mesh::IndexedMesh;
use crate::stitch::{JoinFn, close_boundary_simple};

/// Options for [`to_mesh`].
///
/// ```
/// use cagegen::{JoinFn, ToMeshOptions};
///
/// let opts = ToMeshOptions::default()
///     .count(Some(64))
///     .close_first(true)
///     .close_last(true)
///     .join(JoinFn::Optim);
/// assert_eq!(opts.count, Some(64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToMeshOptions {
    /// Maximum number of stitches (pairs of consecutive cages). `None` requires
    /// a sequence known to be finite.
    pub count: Option<usize>,
    /// Join `(current, previous)` instead of `(previous, current)`, flipping
    /// the winding of every band.
    pub flip_order: bool,
    /// Join the last cage back onto the first.
    pub looped: bool,
    /// Cap every boundary of the first cage.
    pub close_first: bool,
    /// Cap every boundary of the last cage, wound opposite to the first cap.
    /// Under `flip_order` both caps flip along with the bands: the last cap is
    /// then `close_boundary_simple(b, false)`, not the fixed `reverse = true`
    /// cap, and the first cap is the reversed one.
    pub close_last: bool,
    /// Primitive used for every join.
    pub join: JoinFn,
}

impl ToMeshOptions {
    pub fn count(mut self, count: Option<usize>) -> Self {
        self.count = count;
        self
    }

    pub fn flip_order(mut self, flip_order: bool) -> Self {
        self.flip_order = flip_order;
        self
    }

    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    pub fn close_first(mut self, close_first: bool) -> Self {
        self.close_first = close_first;
        self
    }

    pub fn close_last(mut self, close_last: bool) -> Self {
        self.close_last = close_last;
        self
    }

    pub fn join(mut self, join: JoinFn) -> Self {
        self.join = join;
        self
    }

    fn check(&self) -> Result<(), CageError> {
        if self.looped && (self.close_first || self.close_last) {
            return Err(CageError::ConflictingOptions(
                "a looped sequence has no first or last section to cap",
            ));
        }
        Ok(())
    }
}

/// How a single (sub)sequence stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    Exhausted,
    Truncated,
    Forked,
}

/// Traverses `cage_gen` and returns the stitched mesh.
///
/// # Errors
/// * `ConflictingOptions` when `looped` is combined with a cap flag.
/// * `UnboundedSequence` when `count` is `None` and the sequence is not known to end.
/// * `EmptySequence` / `ForkAtStart` when the sequence has no usable first cage.
/// * `CageCountMismatch` when consecutive cages disagree on their boundary count.
/// * `ForkFromMultipleBoundaries` when a fork follows a cage with several boundaries.
/// * Any error of the join, cap or transition primitives.
pub fn to_mesh(cage_gen: CageGen<'_>, opts: &ToMeshOptions) -> Result<IndexedMesh, CageError> {
    opts.check()?;
    log::debug!("to_mesh: {opts:?}");

    let mut pieces = Vec::new();
    traverse(cage_gen, opts, opts.count, opts.close_first, 0, &mut pieces)?;

    let mesh = IndexedMesh::concat_many(&pieces);
    log::debug!(
        "to_mesh: {} pieces, {} vertices, {} faces",
        pieces.len(),
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

impl CageGen<'_> {
    /// See [`to_mesh`].
    pub fn to_mesh(self, opts: &ToMeshOptions) -> Result<IndexedMesh, CageError> {
        to_mesh(self, opts)
    }
}

fn traverse(
    mut cage_gen: CageGen<'_>,
    opts: &ToMeshOptions,
    count: Option<usize>,
    close_first: bool,
    depth: usize,
    pieces: &mut Vec<IndexedMesh>,
) -> Result<(), CageError> {
    if count.is_none() && !cage_gen.is_finite() {
        return Err(CageError::UnboundedSequence);
    }

    let first = match cage_gen.next().transpose()? {
        None => return Err(CageError::EmptySequence),
        Some(CageStep::Fork(_)) => return Err(CageError::ForkAtStart),
        Some(CageStep::Cage(cage)) => cage,
    };
    let first_boundaries = boundaries_of(&first)?;

    if close_first {
        for b in &first_boundaries {
            pieces.push(close_boundary_simple(b, opts.flip_order)?);
        }
    }

    let mut prev = first_boundaries.clone();
    let mut stitches = 0usize;
    let termination = loop {
        if count.is_some_and(|c| stitches >= c) {
            break Termination::Truncated;
        }
        match cage_gen.next().transpose()? {
            None => break Termination::Exhausted,
            Some(CageStep::Cage(cage)) => {
                if cage.boundary_count() != prev.len() {
                    return Err(CageError::CageCountMismatch {
                        step: stitches + 1,
                        expected: prev.len(),
                        found: cage.boundary_count(),
                    });
                }
                let cur = boundaries_of(&cage)?;
                for (b_prev, b_cur) in prev.iter().zip(&cur) {
                    pieces.push(join_pair(opts, b_prev, b_cur)?);
                }
                stitches += 1;
                log::trace!("depth {depth}: stitch {stitches}, {} boundaries", cur.len());
                prev = cur;
            },
            Some(CageStep::Fork(fork)) => {
                let parent = match prev.as_slice() {
                    [single] => single,
                    _ => {
                        return Err(CageError::ForkFromMultipleBoundaries { found: prev.len() });
                    },
                };
                pieces.push(transition_from(parent, &fork)?);

                let remaining = count.map(|c| c - stitches);
                let children = fork.into_children();
                log::debug!(
                    "depth {depth}: fork into {} children after {stitches} stitches, budget {remaining:?}",
                    children.len()
                );
                for child in children {
                    traverse(child, opts, remaining, false, depth + 1, pieces)?;
                }
                break Termination::Forked;
            },
        }
    };
    log::trace!("depth {depth}: {termination:?} after {stitches} stitches");

    if termination == Termination::Forked {
        return Ok(());
    }
    if opts.looped && stitches > 0 {
        for (b_last, b_first) in prev.iter().zip(&first_boundaries) {
            pieces.push(join_pair(opts, b_last, b_first)?);
        }
    }
    if opts.close_last {
        for b in &prev {
            pieces.push(close_boundary_simple(b, !opts.flip_order)?);
        }
    }
    Ok(())
}

/// Joins `earlier` to `later`, or the other way round under `flip_order`.
fn join_pair(opts: &ToMeshOptions, earlier: &Boundary, later: &Boundary) -> Result<IndexedMesh, CageError> {
    if opts.flip_order {
        opts.join.join(later, earlier)
    } else {
        opts.join.join(earlier, later)
    }
}

fn boundaries_of(cage: &Cage) -> Result<Vec<Boundary>, CageError> {
    cage.boundaries().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    fn tube(steps: usize) -> CageGen<'static> {
        CageGen::new((0..steps).map(|i| {
            Cage::single(Boundary::square(1.0).transform(&Transform::translation(0.0, 0.0, i as f64)))
        }))
    }

    #[test]
    fn three_sections_with_caps() {
        let opts = ToMeshOptions::default().close_first(true).close_last(true);
        let mesh = tube(3).to_mesh(&opts).unwrap();
        // two bands of 8 plus two caps of 4; pieces keep their own vertices
        assert_eq!(mesh.face_count(), 24);
        assert_eq!(mesh.vertex_count(), 2 * 8 + 2 * 5);
    }

    #[test]
    fn loop_and_caps_conflict() {
        let opts = ToMeshOptions::default().looped(true).close_last(true);
        assert!(matches!(
            tube(3).to_mesh(&opts),
            Err(CageError::ConflictingOptions(_))
        ));
    }

    #[test]
    fn empty_sequence_is_an_error() {
        assert_eq!(
            tube(0).to_mesh(&ToMeshOptions::default()),
            Err(CageError::EmptySequence)
        );
    }
}
