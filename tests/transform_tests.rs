mod support;

use cagegen::{
    Transform,
    float_types::{FRAC_PI_2, Real},
};
use nalgebra::{Point3, Vector3};
use support::{approx_eq, approx_point};

#[test]
fn compose_applies_left_operand_first() {
    let a = Transform::rotation(Vector3::z(), FRAC_PI_2);
    let b = Transform::translation(1.0, 0.0, 0.0);
    let p = Point3::new(1.0, 0.0, 0.0);

    // rotate, then translate
    let rt = a.compose(&b).apply_point(&p);
    assert!(approx_point(&rt, &Point3::new(1.0, 1.0, 0.0), 1e-12));

    // translate, then rotate
    let tr = b.compose(&a).apply_point(&p);
    assert!(approx_point(&tr, &Point3::new(0.0, 2.0, 0.0), 1e-12));

    assert_eq!(*a.compose(&b).matrix(), b.matrix() * a.matrix());
}

#[test]
fn chaining_reads_in_application_order() {
    let chained = Transform::identity()
        .scale_uniform(2.0)
        .rotate(Vector3::z(), FRAC_PI_2)
        .translate(0.0, 0.0, 3.0);
    let composed = Transform::uniform_scaling(2.0)
        .compose(&Transform::rotation(Vector3::z(), FRAC_PI_2))
        .compose(&Transform::translation(0.0, 0.0, 3.0));
    assert_eq!(chained, composed);

    let p = chained.apply_point(&Point3::new(1.0, 0.0, 0.0));
    assert!(approx_point(&p, &Point3::new(0.0, 2.0, 3.0), 1e-12));
}

#[test]
fn apply_to_keeps_point_order() {
    let xf = Transform::translation(0.0, 0.0, 1.0);
    let pts: Vec<Point3<Real>> = (0..5).map(|i| Point3::new(i as Real, 0.0, 0.0)).collect();
    let moved = xf.apply_to(&pts);
    for (i, p) in moved.iter().enumerate() {
        assert_eq!(*p, Point3::new(i as Real, 0.0, 1.0));
    }
}

#[test]
fn repeated_scaling_decays_geometrically() {
    let incr = Transform::uniform_scaling(0.95).translate(0.0, 0.0, 1.0);
    let mut xf = Transform::identity();
    for _ in 0..10 {
        xf = incr.compose(&xf);
    }
    assert!(approx_eq(xf.max_scale(), (0.95 as Real).powi(10), 1e-12));
}

#[test]
fn reflection_chain_mirrors_and_rejects_zero_axis() {
    let xf = Transform::translation(1.0, 0.0, 0.0)
        .reflect(Vector3::x())
        .unwrap();
    let p = xf.apply_point(&Point3::origin());
    assert!(approx_point(&p, &Point3::new(-1.0, 0.0, 0.0), 1e-12));
    assert!(Transform::identity().reflect(Vector3::zeros()).unwrap_err().is_degeneracy());
}
