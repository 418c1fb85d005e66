#![cfg(feature = "hashmap")]

mod support;

use cagegen::{
    Boundary, Cage, CageError, CageFork, CageGen, JoinFn, ToMeshOptions, Transform,
    float_types::Real, gallery,
};
use support::{distinct_positions, endless_tube, square_at, square_tube};

fn capped() -> ToMeshOptions {
    ToMeshOptions::default().close_first(true).close_last(true)
}

/// The four quarters of the unit square at height 1, lifted by half a unit,
/// each continued for one more unit.
fn quarter_fork() -> CageFork<'static> {
    Cage::single(square_at(1.0))
        .subdivide()
        .unwrap()
        .transform(&Transform::translation(0.0, 0.0, 0.5))
        .into_fork(|_, cage| {
            let next = cage.transform(&Transform::translation(0.0, 0.0, 1.0));
            CageGen::from_cages(vec![cage, next])
        })
}

#[test]
fn capped_tube_of_three_sections() {
    let mesh = square_tube(3).to_mesh(&capped()).unwrap();

    // two bands of 2n faces plus two fans of n
    assert_eq!(mesh.face_count(), 2 * 8 + 2 * 4);
    // pieces keep their own copies: 2 * 8 band vertices + 2 * 5 cap vertices
    assert_eq!(mesh.vertex_count(), 26);
    // 12 ring corners and the two cap centroids
    assert_eq!(distinct_positions(&mesh), 14);
    assert!(mesh.validate().is_ok());
    assert!(mesh.is_closed());
}

#[test]
fn open_tube_has_two_holes() {
    let mesh = square_tube(3).to_mesh(&ToMeshOptions::default()).unwrap();
    assert_eq!(mesh.face_count(), 16);
    assert_eq!(mesh.analyze_edges().boundary_edges, 8);
}

#[test]
fn flip_order_keeps_caps_consistent() {
    let opts = capped().flip_order(true);
    let mesh = square_tube(4).to_mesh(&opts).unwrap();
    assert_eq!(mesh.face_count(), 3 * 8 + 2 * 4);
    assert!(mesh.is_closed());

    // plain caps face outwards, flipped ones inwards
    let plain = square_tube(4).to_mesh(&capped()).unwrap();
    assert!(plain.face_normal(0).z < 0.0);
    assert!(mesh.face_normal(0).z > 0.0);
}

#[test]
fn optimised_join_matches_simple_on_aligned_sections() {
    let simple = square_tube(3).to_mesh(&capped()).unwrap();
    let optim = square_tube(3)
        .to_mesh(&capped().join(JoinFn::Optim))
        .unwrap();
    assert_eq!(simple, optim);
}

#[test]
fn count_truncates_an_endless_sequence() {
    let mesh = endless_tube()
        .to_mesh(&capped().count(Some(5)))
        .unwrap();
    assert_eq!(mesh.face_count(), 5 * 8 + 2 * 4);
    assert!(mesh.is_closed());

    let (_, maxs) = mesh.bounding_box().unwrap();
    assert!(support::approx_eq(maxs.z, 5.0, 1e-12));
}

#[test]
fn count_larger_than_sequence_stops_at_its_end() {
    let mesh = square_tube(3)
        .to_mesh(&capped().count(Some(100)))
        .unwrap();
    assert_eq!(mesh.face_count(), 24);
}

#[test]
fn zero_count_leaves_only_caps() {
    let mesh = endless_tube()
        .to_mesh(&capped().count(Some(0)))
        .unwrap();
    assert_eq!(mesh.face_count(), 8);
}

#[test]
fn endless_sequence_needs_a_count() {
    assert_eq!(
        endless_tube().to_mesh(&capped()),
        Err(CageError::UnboundedSequence)
    );
    // taking a prefix makes it finite
    let mesh = endless_tube().take(4).to_mesh(&capped()).unwrap();
    assert_eq!(mesh.face_count(), 3 * 8 + 2 * 4);
    // so does vouching for an iterator that can't report its length
    let mut z = 0;
    let sections = std::iter::from_fn(move || {
        (z < 3).then(|| {
            z += 1;
            Cage::single(square_at((z - 1) as Real))
        })
    });
    let cage_gen = CageGen::new(sections);
    assert!(!cage_gen.is_finite());
    let mesh = cage_gen.assume_finite().to_mesh(&capped()).unwrap();
    assert_eq!(mesh.face_count(), 24);
}

#[test]
fn fork_bridges_parent_onto_children() {
    let cage_gen = CageGen::with_fork(
        vec![Cage::single(square_at(0.0)), Cage::single(square_at(1.0))],
        quarter_fork(),
    );
    let mesh = cage_gen.to_mesh(&capped()).unwrap();

    let first_cap = 4;
    let band = 8;
    let transition = 12;
    let child = 8 + 4;
    assert_eq!(mesh.face_count(), first_cap + band + transition + 4 * child);
    assert!(mesh.is_closed());
}

#[test]
fn children_share_the_remaining_budget() {
    let cage_gen = CageGen::with_fork(
        vec![Cage::single(square_at(0.0)), Cage::single(square_at(1.0))],
        Cage::single(square_at(1.0))
            .subdivide()
            .unwrap()
            .transform(&Transform::translation(0.0, 0.0, 0.5))
            .into_fork(|_, cage| {
                CageGen::new(cagegen::sequences::iterate(
                    cage,
                    Transform::identity(),
                    Transform::translation(0.0, 0.0, 1.0),
                ))
            }),
    );
    // one stitch on the parent, three on each child
    let mesh = cage_gen.to_mesh(&capped().count(Some(4))).unwrap();
    assert_eq!(mesh.face_count(), 4 + 8 + 12 + 4 * (3 * 8 + 4));
    assert!(mesh.is_closed());
}

#[test]
fn fork_beyond_the_budget_is_never_built() {
    let cage_gen = CageGen::from_cages(vec![
        Cage::single(square_at(0.0)),
        Cage::single(square_at(1.0)),
    ])
    .then_fork(|| panic!("fork built past the step budget"));
    let mesh = cage_gen.to_mesh(&capped().count(Some(1))).unwrap();
    assert_eq!(mesh.face_count(), 16);
}

#[test]
fn failing_fork_aborts_the_traversal() {
    let cage_gen = CageGen::from_cages(vec![
        Cage::single(square_at(0.0)),
        Cage::single(square_at(1.0)),
    ])
    .then_fork(|| Err(CageError::DegenerateBoundary));
    assert_eq!(
        cage_gen.to_mesh(&capped()),
        Err(CageError::DegenerateBoundary)
    );
}

#[test]
fn invalid_fork_adjacency_is_reported() {
    let fork = CageFork::new(Vec::new(), vec![], vec![vec![0, 1]; 3]);
    let cage_gen = CageGen::with_fork(vec![Cage::single(square_at(0.0))], fork);
    assert!(matches!(
        cage_gen.to_mesh(&capped()),
        Err(CageError::InvalidAdjacency(_))
    ));
}

#[test]
fn boundary_count_must_not_change() {
    let two = Cage::from_boundaries([square_at(1.0), square_at(1.0).transform(
        &Transform::translation(3.0, 0.0, 0.0),
    )])
    .unwrap();
    let cage_gen = CageGen::from_cages(vec![Cage::single(square_at(0.0)), two]);
    assert_eq!(
        cage_gen.to_mesh(&capped()),
        Err(CageError::CageCountMismatch {
            step: 1,
            expected: 1,
            found: 2
        })
    );
}

#[test]
fn sequence_must_open_with_a_cage() {
    assert_eq!(
        CageGen::with_fork(Vec::new(), quarter_fork()).to_mesh(&capped()),
        Err(CageError::ForkAtStart)
    );
    assert_eq!(
        square_tube(0).to_mesh(&capped()),
        Err(CageError::EmptySequence)
    );
}

#[test]
fn fork_needs_a_single_parent_boundary() {
    let two = |z: Real| {
        Cage::from_boundaries([
            square_at(z),
            square_at(z).transform(&Transform::translation(3.0, 0.0, 0.0)),
        ])
        .unwrap()
    };
    let cage_gen = CageGen::with_fork(vec![two(0.0), two(1.0)], quarter_fork());
    assert_eq!(
        cage_gen.to_mesh(&capped()),
        Err(CageError::ForkFromMultipleBoundaries { found: 2 })
    );
}

#[test]
fn multi_boundary_cages_are_stitched_independently() {
    let pair = |z: Real| {
        Cage::from_boundaries([
            square_at(z),
            square_at(z).transform(&Transform::translation(3.0, 0.0, 0.0)),
        ])
        .unwrap()
    };
    let mesh = CageGen::from_cages(vec![pair(0.0), pair(1.0), pair(2.0)])
        .to_mesh(&capped())
        .unwrap();
    assert_eq!(mesh.face_count(), 2 * 24);
    assert!(mesh.is_closed());
}

#[test]
fn looped_sequence_closes_on_itself() {
    let frames = 12;
    let ring = (0..frames).map(|i| {
        let xf = Transform::translation(3.0, 0.0, 0.0)
            .rotate(nalgebra::Vector3::z(), cagegen::float_types::TAU * i as Real / frames as Real);
        Cage::single(Boundary::square_xz(1.0).transform(&xf))
    });
    let mesh = CageGen::new(ring)
        .to_mesh(&ToMeshOptions::default().looped(true))
        .unwrap();
    assert_eq!(mesh.face_count(), frames * 8);
    assert!(mesh.is_closed());
}

#[test]
fn looping_a_single_section_adds_nothing() {
    let mesh = square_tube(1)
        .to_mesh(&ToMeshOptions::default().looped(true))
        .unwrap();
    assert!(mesh.is_empty());
}

#[test]
fn looped_with_caps_is_rejected() {
    assert!(matches!(
        square_tube(3).to_mesh(&ToMeshOptions::default().looped(true).close_first(true)),
        Err(CageError::ConflictingOptions(_))
    ));
}

#[test]
fn twisty_torus_is_closed() {
    let mesh = gallery::twisty_torus(24, 1, 2, 4.0).unwrap();
    // 2 strands of 32 points, 24 bands each including the loop join
    assert_eq!(mesh.face_count(), 24 * 2 * 2 * 32);
    assert!(mesh.is_closed());
}

#[test]
fn join_errors_propagate() {
    let cage_gen = CageGen::from_cages(vec![
        Cage::single(square_at(0.0)),
        Cage::single(Boundary::regular_polygon(5, 1.0).unwrap()),
    ]);
    assert_eq!(
        cage_gen.to_mesh(&ToMeshOptions::default()),
        Err(CageError::BoundaryLengthMismatch { left: 4, right: 5 })
    );
}
