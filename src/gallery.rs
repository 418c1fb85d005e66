//! Sample structures built on the engine.
//!
//! Each function returns a finished mesh and doubles as a worked example of one
//! way to drive [`CageGen`] or the branch builder.

use crate::boundary::Boundary;
use crate::branch::{BarbKind, BarbRule, BranchBuilder, BranchConfig, TreeRule};
use crate::cage::Cage;
use crate::errors::CageError;
use crate::float_types::{FRAC_PI_2, FRAC_PI_6, Real, TAU};
use crate::fork::CageFork;
use crate::generator::CageGen;
use crate::mesh::IndexedMesh;
use crate::sequences::{iterate, repeat, stepped, torus_xy, twisted};
use crate::transform::Transform;
use crate::traversal::ToMeshOptions;
use nalgebra::Vector3;

fn horn_incr() -> Transform {
    Transform::uniform_scaling(0.9)
        .rotate(Vector3::new(-1.0, 0.0, 1.0), 0.3)
        .translate(0.0, 0.0, 0.8)
}

/// A unit cube whose top face splits into four horns that curl and shrink.
///
/// `count` bounds the number of stitches along every path.
pub fn ram_horn(count: usize) -> Result<IndexedMesh, CageError> {
    let cage0 = Cage::single(Boundary::square(1.0));
    let cage1 = cage0.transform(&Transform::translation(0.0, 0.0, 1.0));

    // each quarter of the top face, turned so its corner sits at the cube's centre line
    let opening = |i: usize| {
        Transform::translation(0.0, 0.0, -1.0)
            .scale_uniform(0.5)
            .translate(0.25, 0.25, 1.0)
            .rotate(Vector3::z(), i as Real * FRAC_PI_2)
    };
    let (_, transition, adjacency) = cage1.subdivide()?.into_parts();
    let horns = (0..4)
        .map(|i| CageGen::new(iterate(cage1.clone(), opening(i), horn_incr())))
        .collect();
    let fork = CageFork::new(horns, transition, adjacency);

    CageGen::with_fork(vec![cage0, cage1], fork).to_mesh(
        &ToMeshOptions::default()
            .count(Some(count))
            .close_first(true)
            .close_last(true),
    )
}

fn tilt(i: usize) -> Transform {
    let (dx, dy) = [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)][i % 4];
    Transform::translation(0.0, 0.0, 0.5).rotate(Vector3::new(-dy, dx, 0.0), -FRAC_PI_6)
}

/// `first`, then `local` placed by `incr^k ∘ xf` for `k` in `1..segment`,
/// then a fork that splits `local` into quarters at `incr^segment ∘ xf` and
/// starts the same pattern again from each quarter, tilted outwards.
fn horn_segment(
    first: Cage,
    local: Cage,
    xf: Transform,
    incr: Transform,
    segment: usize,
) -> CageGen<'static> {
    let mut cages = Vec::with_capacity(segment.max(1));
    cages.push(first);
    let mut fork_xf = xf;
    for k in 1..=segment {
        fork_xf = incr.compose(&fork_xf);
        if k < segment {
            cages.push(local.transform(&fork_xf));
        }
    }

    CageGen::from_cages(cages).then_fork(move || {
        let (quarters, transition, adjacency) = local.subdivide()?.into_parts();
        let children = quarters
            .into_iter()
            .enumerate()
            .map(|(i, quarter)| {
                let first = quarter.transform(&fork_xf);
                horn_segment(first, quarter, tilt(i).compose(&fork_xf), incr, segment)
            })
            .collect();
        Ok(CageFork::new(
            children,
            fork_xf.apply_to(&transition),
            adjacency,
        ))
    })
}

/// A horn that splits into four smaller horns every `segment` steps, until
/// `count` stitches have been made along each path.
pub fn ram_horn_branch(segment: usize, count: usize) -> Result<IndexedMesh, CageError> {
    // a one-step segment forks before stitching anything, so the budget never shrinks
    if segment < 2 {
        return Err(CageError::InvalidParameter("segment must span at least two steps"));
    }
    let cage0 = Cage::single(Boundary::square(1.0));
    horn_segment(
        cage0.clone(),
        cage0,
        Transform::identity(),
        horn_incr(),
        segment,
    )
    .to_mesh(
        &ToMeshOptions::default()
            .count(Some(count))
            .close_first(true)
            .close_last(true),
    )
}

/// Square in the XZ plane with every edge halved `splits` times.
fn fine_square_xz(size: Real, splits: usize) -> Cage {
    let mut b = Boundary::square_xz(size);
    for _ in 0..splits {
        b = b.subdivide();
    }
    Cage::single(b)
}

/// `count` tubes twisting `turns` times around each other while their common
/// centre line sweeps a full circle of `radius` in `frames` steps.
///
/// The result has no caps: the last frame is stitched back onto the first.
pub fn twisty_torus(
    frames: usize,
    turns: usize,
    count: usize,
    radius: Real,
) -> Result<IndexedMesh, CageError> {
    if frames < 3 {
        return Err(CageError::InvalidParameter("a torus needs at least three frames"));
    }
    let angle = TAU * turns as Real / frames as Real;
    let strands = twisted(repeat(fine_square_xz(1.0, 3)), count, 2.0, angle)?;
    CageGen::new(torus_xy(strands, radius, frames)).to_mesh(
        &ToMeshOptions::default().flip_order(true).looped(true),
    )
}

/// Strands twisting around each other, in groups that twist around each other
/// in turn, rising along Y. `count` is the number of steps.
pub fn spiral_nested(count: usize) -> Result<IndexedMesh, CageError> {
    let strand = fine_square_xz(1.0, 2).transform(&Transform::uniform_scaling(0.3));
    let inner = twisted(repeat(strand), 4, 0.5, -0.2)?;
    let outer = twisted(inner, 4, 1.0, 0.05)?;
    CageGen::new(stepped(outer, 0.0, 0.1, 0.0)).to_mesh(
        &ToMeshOptions::default()
            .count(Some(count))
            .flip_order(true)
            .close_first(true)
            .close_last(true),
    )
}

/// A curling stem with barbs sprouting from all four sides of every segment,
/// grown until parts shrink below `scale_min`.
pub fn barbs(scale_min: Real) -> Result<IndexedMesh, CageError> {
    let config = BranchConfig {
        scale_min,
        max_depth: None,
    };
    let (mesh, stats) =
        BranchBuilder::new(BarbRule::base(), config)?.run(&BarbRule::default(), BarbKind::Stem)?;
    log::debug!("barbs: {stats:?}");
    Ok(mesh)
}

/// A leaning trunk that splits into four quadrants every `segment` rings,
/// recursively, until the branches shrink below `scale_min`.
pub fn tree(segment: usize, scale_min: Real) -> Result<IndexedMesh, CageError> {
    let config = BranchConfig {
        scale_min,
        max_depth: None,
    };
    let rule = TreeRule {
        segment,
        ..TreeRule::default()
    };
    let (mesh, stats) = BranchBuilder::new(TreeRule::base(), config)?.run(&rule, segment)?;
    log::debug!("tree: {stats:?}");
    Ok(mesh)
}

/// Every gallery entry at a moderate size, paired with a file stem.
pub fn all() -> Result<Vec<(&'static str, IndexedMesh)>, CageError> {
    Ok(vec![
        ("ram_horn", ram_horn(128)?),
        ("ram_horn_branch", ram_horn_branch(8, 32)?),
        ("twisty_torus", twisty_torus(200, 4, 4, 4.0)?),
        ("spiral_nested", spiral_nested(250)?),
        ("barbs", barbs(0.02)?),
        ("tree", tree(10, 0.02)?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ram_horn_has_four_horns_of_equal_length() {
        // 1 stitch on the cube, then 4 horns with the remaining 3
        let mesh = ram_horn(4).unwrap();
        let band = 8;
        let cap = 4;
        let transition = 12;
        assert_eq!(
            mesh.face_count(),
            cap + band + transition + 4 * (3 * band + cap)
        );
    }

    #[test]
    fn branch_segment_must_advance() {
        assert!(ram_horn_branch(0, 8).is_err());
        assert!(ram_horn_branch(1, 8).is_err());
    }
}
