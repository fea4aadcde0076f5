/*
  Copyright 2017 Takashi Ogura

  Licensed under the Apache License, Version 2.0 (the "License");
  you may not use this file except in compliance with the License.
  You may obtain a copy of the License at

      http://www.apache.org/licenses/LICENSE-2.0

  Unless required by applicable law or agreed to in writing, software
  distributed under the License is distributed on an "AS IS" BASIS,
  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
  See the License for the specific language governing permissions and
  limitations under the License.
*/
//! Operations on a single rigid body pose stored as a 4x4 homogeneous matrix
//!
//! The approximate variants produce matrices whose rotation block is not
//! orthonormal, so everything here works on `Matrix4` rather than `Isometry3`.
use crate::denavit_hartenberg::DenavitHartenberg;
use crate::errors::*;
use na::{Matrix3, Matrix4, RealField, Rotation3, UnitQuaternion, Vector3, Vector6};
use nalgebra as na;
use simba::scalar::SubsetOf;

fn rotation_block<T: RealField + Copy>(m: &Matrix4<T>) -> Matrix3<T> {
    m.fixed_view::<3, 3>(0, 0).into_owned()
}

fn translation_block<T: RealField + Copy>(m: &Matrix4<T>) -> Vector3<T> {
    m.fixed_view::<3, 1>(0, 3).into_owned()
}

fn quaternion_of<T: RealField + Copy>(m: &Matrix4<T>) -> UnitQuaternion<T> {
    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation_block(m)))
}

/// Combined translation and rotation distance between two poses
///
/// `sqrt(|p_b - p_a|^2 + weight * angle(R_a, R_b)^2)`, where the angle is the
/// shortest path between the two orientations as unit quaternions.
///
/// # Examples
///
/// ```
/// use kmodel::pose;
/// let a = nalgebra::Matrix4::<f64>::identity();
/// let mut b = a;
/// b[(0, 3)] = 3.0;
/// b[(1, 3)] = 4.0;
/// assert!((pose::distance(&a, &b, 1.0) - 5.0).abs() < 1e-12);
/// assert!(pose::distance(&b, &b, 1.0).abs() < 1e-12);
/// ```
pub fn distance<T: RealField + Copy>(a: &Matrix4<T>, b: &Matrix4<T>, weight: T) -> T {
    let translation = translation_block(b) - translation_block(a);
    let angle = quaternion_of(a).angle_to(&quaternion_of(b));
    (translation.norm_squared() + weight * angle * angle).sqrt()
}

/// Apply a spatial delta `[x, y, z, a, b, c]` to `base`
///
/// The exact version converts the rotation vector `[a, b, c]` to a rotation
/// matrix `R` and returns `[R, R * [x, y, z]] * base`.
///
/// With `use_approximation` the rotation is applied as a first order update
/// of the columns of `base`. This is only valid for rotations of a few degrees
/// and completely wrong beyond 90 degrees.
pub fn from_delta<T: RealField + Copy>(
    base: &Matrix4<T>,
    delta: &Vector6<T>,
    use_approximation: bool,
) -> Matrix4<T> {
    if use_approximation {
        let mut m = *base;
        for c in 0..3 {
            m[(0, c)] = base[(0, c)] - delta[5] * base[(1, c)] + delta[4] * base[(2, c)];
            m[(1, c)] = base[(1, c)] + delta[5] * base[(0, c)] - delta[3] * base[(2, c)];
            m[(2, c)] = base[(2, c)] - delta[4] * base[(0, c)] + delta[3] * base[(1, c)];
        }
        for r in 0..3 {
            m[(r, 3)] = base[(r, 3)] + delta[r];
        }
        m.fixed_view_mut::<1, 4>(3, 0)
            .copy_from_slice(&[T::zero(), T::zero(), T::zero(), T::one()]);
        m
    } else {
        let rotation = Rotation3::new(delta.fixed_rows::<3>(3).into_owned());
        let mut t = rotation.to_homogeneous();
        t.fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&(rotation * delta.fixed_rows::<3>(0).into_owned()));
        t * base
    }
}

/// Spatial delta from `base` to `other`, the inverse of [`from_delta`]
///
/// The exact version extracts the axis-angle of `R_other * R_base^T`.
/// The approximation is accurate up to 1e-9 for rotation angles below 1e-3
/// and invalid near or above 90 degrees.
///
/// # Examples
///
/// ```
/// use kmodel::pose;
/// use nalgebra::{Matrix4, Vector6};
///
/// let base = Matrix4::<f64>::identity();
/// let delta = Vector6::new(0.0, 0.0, 0.0, 0.1, -0.2, 0.3);
/// let moved = pose::from_delta(&base, &delta, false);
/// let back = pose::to_delta(&base, &moved, false);
/// assert!((back - delta).norm() < 1e-10);
/// ```
pub fn to_delta<T: RealField + Copy>(
    base: &Matrix4<T>,
    other: &Matrix4<T>,
    use_approximation: bool,
) -> Vector6<T> {
    let translation = translation_block(other) - translation_block(base);
    let rotation = if use_approximation {
        let half: T = na::convert(0.5);
        let mut sum = Vector3::zeros();
        for c in 0..3 {
            let b = base.fixed_view::<3, 1>(0, c).into_owned();
            let o = other.fixed_view::<3, 1>(0, c).into_owned();
            sum += b.cross(&o);
        }
        sum * half
    } else {
        let relative = rotation_block(other) * rotation_block(base).transpose();
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(relative))
            .scaled_axis()
    };
    Vector6::new(
        translation.x,
        translation.y,
        translation.z,
        rotation.x,
        rotation.y,
        rotation.z,
    )
}

/// First order twist stored in `m`: its translation and the skew part of its
/// rotation block, without any trigonometric call.
pub fn skew_delta<T: RealField + Copy>(m: &Matrix4<T>) -> Vector6<T> {
    let half: T = na::convert(0.5);
    Vector6::new(
        m[(0, 3)],
        m[(1, 3)],
        m[(2, 3)],
        (m[(2, 1)] - m[(1, 2)]) * half,
        (m[(0, 2)] - m[(2, 0)]) * half,
        (m[(1, 0)] - m[(0, 1)]) * half,
    )
}

/// Homogeneous matrix whose rotation block is the skew matrix of the angular
/// part of `delta`, the counterpart of [`skew_delta`].
pub fn from_skew_delta<T: RealField + Copy>(delta: &Vector6<T>) -> Matrix4<T> {
    let zero = T::zero();
    #[rustfmt::skip]
    let m = Matrix4::new(
        zero, -delta[5], delta[4], delta[0],
        delta[5], zero, -delta[3], delta[1],
        -delta[4], delta[3], zero, delta[2],
        zero, zero, zero, T::one(),
    );
    m
}

/// Transform of the Denavit-Hartenberg parameters (Paul convention)
#[inline]
pub fn from_denavit_hartenberg_paul<T: RealField + Copy>(d: T, theta: T, a: T, alpha: T) -> Matrix4<T> {
    DenavitHartenberg::new(d, theta, a, alpha).to_homogeneous()
}

/// Denavit-Hartenberg parameters (Paul convention) of `m`
#[inline]
pub fn to_denavit_hartenberg_paul<T>(m: &Matrix4<T>) -> Result<DenavitHartenberg<T>, Error>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    DenavitHartenberg::from_homogeneous(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use na::{Isometry3, Translation3};

    fn sample_pose() -> Matrix4<f64> {
        Isometry3::from_parts(
            Translation3::new(0.3, -0.2, 1.0),
            UnitQuaternion::from_euler_angles(0.4, -0.1, 1.2),
        )
        .to_homogeneous()
    }

    #[test]
    fn test_distance_same_pose() {
        let m = sample_pose();
        assert!(distance(&m, &m, 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_rotation_weight() {
        let a: Matrix4<f64> = Matrix4::identity();
        let b = UnitQuaternion::from_euler_angles(0.0, 0.0, 0.5).to_homogeneous();
        assert!((distance(&a, &b, 1.0) - 0.5).abs() < 1e-12);
        assert!((distance(&a, &b, 4.0) - 1.0).abs() < 1e-12);
        assert!((distance(&a, &b, 0.0)).abs() < 1e-12);
        assert!((distance(&a, &b, 2.0) - distance(&b, &a, 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_skew_delta() {
        let delta = Vector6::new(1.0, 2.0, 3.0, 0.1, 0.2, 0.3);
        let m = from_skew_delta(&delta);
        assert_eq!(m[(3, 3)], 1.0);
        assert_eq!(m[(0, 0)], 0.0);
        assert_eq!(skew_delta(&m), delta);
    }

    #[test]
    fn test_from_delta_zero_rotation() {
        let base = sample_pose();
        let delta = Vector6::new(0.1, 0.2, 0.3, 0.0, 0.0, 0.0);
        let moved = from_delta(&base, &delta, false);
        assert!((moved[(0, 3)] - 0.4).abs() < 1e-12);
        assert!((moved[(1, 3)] - 0.0).abs() < 1e-12);
        assert!((moved[(2, 3)] - 1.3).abs() < 1e-12);
        assert!((rotation_block(&moved) - rotation_block(&base)).norm() < 1e-12);
    }

    #[test]
    fn test_approximation_matches_exact_for_small_angle() {
        let base = sample_pose();
        let delta = Vector6::new(0.01, -0.02, 0.03, 2e-4, -3e-4, 1e-4);
        let exact = from_delta(&base, &delta, false);
        let approx = from_delta(&base, &delta, true);
        assert!((rotation_block(&exact) - rotation_block(&approx)).norm() < 1e-6);
        let exact_delta = to_delta(&base, &exact, false);
        let approx_delta = to_delta(&base, &exact, true);
        for i in 3..6 {
            assert!((exact_delta[i] - approx_delta[i]).abs() < 1e-9);
        }
    }
}
