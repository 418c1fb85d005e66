//! Affine transform algebra on 4×4 homogeneous matrices.
//!
//! A [`Transform`] is an immutable value. Every operation returns a new transform,
//! and chaining reads in the order effects are applied:
//!
//! ```
//! use cagegen::transform::Transform;
//! use nalgebra::Point3;
//!
//! // scale first, then move up by one
//! let xf = Transform::identity().scale_uniform(0.5).translate(0.0, 0.0, 1.0);
//! let p = xf.apply_point(&Point3::new(1.0, 0.0, 0.0));
//! assert!((p - Point3::new(0.5, 0.0, 1.0)).norm() < 1e-12);
//! ```

use crate::errors::CageError;
use crate::float_types::Real;
use nalgebra::{Matrix3, Matrix4, Point3, Unit, UnitQuaternion, Vector3};

/// A 4×4 homogeneous affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4<Real>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix4<Real>> for Transform {
    fn from(matrix: Matrix4<Real>) -> Self {
        Transform { matrix }
    }
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Transform {
            matrix: Matrix4::identity(),
        }
    }

    /// Wraps an existing homogeneous matrix.
    pub const fn from_matrix(matrix: Matrix4<Real>) -> Self {
        Transform { matrix }
    }

    /// Translation by `(x, y, z)`.
    pub fn translation(x: Real, y: Real, z: Real) -> Self {
        Transform {
            matrix: Matrix4::new_translation(&Vector3::new(x, y, z)),
        }
    }

    /// Per-axis scaling.
    pub fn scaling(sx: Real, sy: Real, sz: Real) -> Self {
        Transform {
            matrix: Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)),
        }
    }

    /// Uniform scaling by `s` on every axis.
    pub fn uniform_scaling(s: Real) -> Self {
        Self::scaling(s, s, s)
    }

    /// Rotation by `angle` radians about `axis`, built from the axis-angle quaternion.
    ///
    /// The axis does not need to be normalized. A zero axis has no direction to turn
    /// about and gives the identity.
    pub fn rotation(axis: Vector3<Real>, angle: Real) -> Self {
        match Unit::try_new(axis, Real::EPSILON) {
            Some(axis) => Transform {
                matrix: UnitQuaternion::from_axis_angle(&axis, angle).to_homogeneous(),
            },
            None => Self::identity(),
        }
    }

    /// Reflection through the plane through the origin with normal `axis`.
    ///
    /// `axis` is normalized here; a zero axis is rejected.
    pub fn reflection(axis: Vector3<Real>) -> Result<Self, CageError> {
        let n = Unit::try_new(axis, Real::EPSILON)
            .ok_or(CageError::DegenerateAxis)?
            .into_inner();

        // R = I - 2 n n^T
        let mut reflect_4 = Matrix4::identity();
        let reflect_3 = Matrix3::identity() - 2.0 * n * n.transpose();
        reflect_4.fixed_view_mut::<3, 3>(0, 0).copy_from(&reflect_3);

        Ok(Transform { matrix: reflect_4 })
    }

    /// The underlying matrix.
    pub const fn matrix(&self) -> &Matrix4<Real> {
        &self.matrix
    }

    /// Applies `self` first, then `next`.
    ///
    /// Pre-multiplication: the result's matrix is `next * self`. Operands do not
    /// commute in general (rotations and translations don't).
    pub fn compose(&self, next: &Transform) -> Transform {
        Transform {
            matrix: next.matrix * self.matrix,
        }
    }

    /// `self` followed by a translation.
    pub fn translate(&self, x: Real, y: Real, z: Real) -> Transform {
        self.compose(&Self::translation(x, y, z))
    }

    /// `self` followed by a per-axis scale.
    pub fn scale(&self, sx: Real, sy: Real, sz: Real) -> Transform {
        self.compose(&Self::scaling(sx, sy, sz))
    }

    /// `self` followed by a uniform scale.
    pub fn scale_uniform(&self, s: Real) -> Transform {
        self.compose(&Self::uniform_scaling(s))
    }

    /// `self` followed by a rotation about `axis`.
    pub fn rotate(&self, axis: Vector3<Real>, angle: Real) -> Transform {
        self.compose(&Self::rotation(axis, angle))
    }

    /// `self` followed by a reflection through the plane normal to `axis`.
    pub fn reflect(&self, axis: Vector3<Real>) -> Result<Transform, CageError> {
        Ok(self.compose(&Self::reflection(axis)?))
    }

    /// Maps one point. The homogeneous component is dropped, not divided out.
    #[inline]
    pub fn apply_point(&self, point: &Point3<Real>) -> Point3<Real> {
        let h = self.matrix * point.to_homogeneous();
        Point3::new(h.x, h.y, h.z)
    }

    /// Maps an ordered sequence of points, preserving order.
    pub fn apply_to(&self, points: &[Point3<Real>]) -> Vec<Point3<Real>> {
        points.iter().map(|p| self.apply_point(p)).collect()
    }

    /// Per-axis scale: the column norms of the linear part.
    ///
    /// Used as the decay metric for recursive generators.
    pub fn scale_factors(&self) -> Vector3<Real> {
        let linear = self.matrix.fixed_view::<3, 3>(0, 0);
        Vector3::new(
            linear.column(0).norm(),
            linear.column(1).norm(),
            linear.column(2).norm(),
        )
    }

    /// Largest of the per-axis scales.
    pub fn max_scale(&self) -> Real {
        self.scale_factors().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::FRAC_PI_2;

    fn close(a: &Point3<Real>, b: &Point3<Real>) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn quarter_turn_about_z() {
        let xf = Transform::rotation(Vector3::z(), FRAC_PI_2);
        let p = xf.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(close(&p, &Point3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn rotation_axis_need_not_be_unit() {
        let a = Transform::rotation(Vector3::new(0.0, 0.0, 5.0), 0.7);
        let b = Transform::rotation(Vector3::z(), 0.7);
        assert!((a.matrix() - b.matrix()).norm() < 1e-12);
    }

    #[test]
    fn zero_rotation_axis_is_identity() {
        let xf = Transform::rotation(Vector3::zeros(), 1.0);
        assert_eq!(xf, Transform::identity());
    }

    #[test]
    fn reflection_flips_along_axis() {
        let xf = Transform::reflection(Vector3::new(0.0, 2.0, 0.0)).unwrap();
        let p = xf.apply_point(&Point3::new(1.0, 3.0, -2.0));
        assert!(close(&p, &Point3::new(1.0, -3.0, -2.0)));
        assert_eq!(
            Transform::reflection(Vector3::zeros()),
            Err(CageError::DegenerateAxis)
        );
    }

    #[test]
    fn scale_factors_read_linear_part_only() {
        let xf = Transform::scaling(2.0, 3.0, 4.0)
            .rotate(Vector3::new(1.0, 1.0, 0.0), 0.4)
            .translate(10.0, -5.0, 7.0);
        let s = xf.scale_factors();
        assert!((s - Vector3::new(2.0, 3.0, 4.0)).norm() < 1e-12);
    }

    #[test]
    fn compose_is_pre_multiplication() {
        let a = Transform::translation(1.0, 0.0, 0.0);
        let b = Transform::uniform_scaling(2.0);
        assert_eq!(*a.compose(&b).matrix(), b.matrix() * a.matrix());
    }
}
