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
use super::joint_type::*;
use super::range::*;
use super::units::*;
use crate::errors::*;
use na::{DVector, Isometry3, Quaternion, RealField, Translation3, UnitQuaternion, Vector3};
use nalgebra as na;
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt::{self, Display};

/// Parameterized transform between two frames
///
/// The position has `dof_position()` components, while velocity, acceleration,
/// torque and speed have `dof()` components. They differ for `Spherical`.
#[derive(Debug, Clone)]
pub struct Joint<T: RealField> {
    /// Type of this joint
    pub joint_type: JointType<T>,
    /// local origin transform of joint, applied before the joint motion
    origin: Isometry3<T>,
    position: DVector<T>,
    velocity: DVector<T>,
    acceleration: DVector<T>,
    torque: DVector<T>,
    /// maximum speed per velocity coordinate
    pub(super) speed: DVector<T>,
    pub(super) min: DVector<T>,
    pub(super) max: DVector<T>,
    /// coordinates which wrap around at their limits (e.g. continuous joints)
    pub wraparound: Vec<bool>,
}

macro_rules! def_vector_accessors {
    ($getter:ident, $setter:ident, $member:ident, $dim:ident) => {
        #[inline]
        pub fn $getter(&self) -> &DVector<T> {
            &self.$member
        }
        pub fn $setter(&mut self, values: &[T]) -> Result<(), Error> {
            check_size(values.len(), self.$dim())?;
            self.$member = DVector::from_column_slice(values);
            Ok(())
        }
    };
}

impl<T> Joint<T>
where
    T: RealField + Copy,
{
    /// Create new Joint with type and the default limits
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra as na;
    ///
    /// let rot = kmodel::Joint::<f64>::new(kmodel::JointType::Revolute { axis: na::Vector3::y_axis() });
    /// assert_eq!(rot.dof(), 1);
    /// assert_eq!(rot.position()[0], 0.0);
    ///
    /// let ball = kmodel::Joint::<f64>::new(kmodel::JointType::Spherical);
    /// assert_eq!(ball.dof(), 3);
    /// assert_eq!(ball.position().as_slice(), &[0.0, 0.0, 0.0, 1.0]);
    /// ```
    pub fn new(joint_type: JointType<T>) -> Joint<T> {
        let dof = joint_type.dof();
        let dof_position = joint_type.dof_position();
        let (position, min, max) = match joint_type {
            JointType::Revolute { .. } => (
                DVector::zeros(1),
                DVector::from_element(1, -T::pi()),
                DVector::from_element(1, T::pi()),
            ),
            JointType::Prismatic { .. } => (
                DVector::zeros(1),
                DVector::from_element(1, -T::one()),
                DVector::from_element(1, T::one()),
            ),
            JointType::Spherical => (
                DVector::from_column_slice(&[T::zero(), T::zero(), T::zero(), T::one()]),
                DVector::from_element(dof_position, -T::one()),
                DVector::from_element(dof_position, T::one()),
            ),
        };
        Joint {
            joint_type,
            origin: Isometry3::identity(),
            position,
            velocity: DVector::zeros(dof),
            acceleration: DVector::zeros(dof),
            torque: DVector::zeros(dof),
            speed: DVector::zeros(dof),
            min,
            max,
            wraparound: vec![false; dof],
        }
    }

    #[inline]
    pub fn dof(&self) -> usize {
        self.joint_type.dof()
    }

    #[inline]
    pub fn dof_position(&self) -> usize {
        self.joint_type.dof_position()
    }

    #[inline]
    pub fn origin(&self) -> &Isometry3<T> {
        &self.origin
    }

    #[inline]
    pub fn set_origin(&mut self, origin: Isometry3<T>) {
        self.origin = origin;
    }

    def_vector_accessors!(position, set_position, position, dof_position);
    def_vector_accessors!(velocity, set_velocity, velocity, dof);
    def_vector_accessors!(acceleration, set_acceleration, acceleration, dof);
    def_vector_accessors!(torque, set_torque, torque, dof);
    def_vector_accessors!(speed, set_speed, speed, dof);
    def_vector_accessors!(min, set_min, min, dof_position);
    def_vector_accessors!(max, set_max, max, dof_position);

    /// Limits of the coordinate `i` of the position
    ///
    /// Inverted limits are kept as they are, nothing is valid within them.
    pub fn range(&self, i: usize) -> Range<T> {
        Range {
            min: self.min[i],
            max: self.max[i],
        }
    }

    /// Check if the position is within the limits
    ///
    /// Coordinates marked as wraparound are always valid. Wraparound flags
    /// are ignored for `Spherical`, whose quaternion components do not wrap.
    pub fn is_valid(&self, position: &[T]) -> bool {
        position.len() == self.dof_position()
            && position.iter().enumerate().all(|(i, &q)| {
                let wraps = match self.joint_type {
                    JointType::Spherical => false,
                    _ => self.wraparound.get(i).copied().unwrap_or(false),
                };
                wraps || self.range(i).is_valid(q)
            })
    }

    pub fn position_units(&self) -> Vec<Units> {
        match self.joint_type {
            JointType::Revolute { .. } => vec![Units::Radian],
            JointType::Prismatic { .. } => vec![Units::Meter],
            JointType::Spherical => vec![Units::None; 4],
        }
    }

    pub fn velocity_units(&self) -> Vec<Units> {
        match self.joint_type {
            JointType::Prismatic { .. } => vec![Units::MeterPerSecond],
            _ => vec![Units::RadianPerSecond; self.dof()],
        }
    }

    pub fn acceleration_units(&self) -> Vec<Units> {
        match self.joint_type {
            JointType::Prismatic { .. } => vec![Units::MeterPerSecondSquared],
            _ => vec![Units::RadianPerSecondSquared; self.dof()],
        }
    }

    #[inline]
    pub fn speed_units(&self) -> Vec<Units> {
        self.velocity_units()
    }

    pub fn torque_units(&self) -> Vec<Units> {
        match self.joint_type {
            JointType::Prismatic { .. } => vec![Units::Newton],
            _ => vec![Units::Newtonmeter; self.dof()],
        }
    }

    /// Transform from the input frame to the output frame, `origin * motion`
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra as na;
    ///
    /// // Create linear joint with X-axis
    /// let mut lin = kmodel::Joint::<f64>::new(kmodel::JointType::Prismatic { axis: na::Vector3::x_axis() });
    /// assert_eq!(lin.local_transform().translation.vector.x, 0.0);
    /// lin.set_position(&[-1.0]).unwrap();
    /// assert_eq!(lin.local_transform().translation.vector.x, -1.0);
    /// ```
    pub fn local_transform(&self) -> Isometry3<T> {
        let joint_transform = match self.joint_type {
            JointType::Revolute { axis } => Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(&axis, self.position[0]),
            ),
            JointType::Prismatic { axis } => Isometry3::from_parts(
                Translation3::from(axis.into_inner() * self.position[0]),
                UnitQuaternion::identity(),
            ),
            JointType::Spherical => Isometry3::from_parts(
                Translation3::identity(),
                quaternion_from_position(self.position.as_slice()),
            ),
        };
        self.origin * joint_transform
    }

    /// Uniformly distributed position from one sample in `[0, 1)` per velocity
    /// coordinate
    ///
    /// `Revolute` and `Prismatic` interpolate between the limits, `Spherical`
    /// draws a uniformly distributed orientation.
    pub fn generate_position_uniform(&self, rand: &[T]) -> Result<DVector<T>, Error> {
        check_size(rand.len(), self.dof())?;
        Ok(match self.joint_type {
            JointType::Spherical => {
                let two_pi = T::two_pi();
                let (s1, s2) = ((T::one() - rand[0]).sqrt(), rand[0].sqrt());
                let (t1, t2) = (two_pi * rand[1], two_pi * rand[2]);
                DVector::from_column_slice(&[
                    s1 * t1.sin(),
                    s1 * t1.cos(),
                    s2 * t2.sin(),
                    s2 * t2.cos(),
                ])
            }
            _ => DVector::from_fn(1, |i, _| self.range(i).interpolate(rand[i])),
        })
    }

    /// Uniformly distributed position within `min` and `max`, both given in the
    /// velocity coordinates
    ///
    /// For `Spherical` the bounds limit the components of a rotation vector.
    pub fn generate_position_uniform_bounded(
        &self,
        rand: &[T],
        min: &[T],
        max: &[T],
    ) -> Result<DVector<T>, Error> {
        check_size(rand.len(), self.dof())?;
        check_size(min.len(), self.dof())?;
        check_size(max.len(), self.dof())?;
        let sampled = (0..self.dof())
            .map(|i| {
                Range {
                    min: min[i],
                    max: max[i],
                }
                .interpolate(rand[i])
            })
            .collect::<Vec<_>>();
        Ok(match self.joint_type {
            JointType::Spherical => position_from_quaternion(&UnitQuaternion::from_scaled_axis(
                Vector3::from_column_slice(&sampled),
            )),
            _ => DVector::from_vec(sampled),
        })
    }

    /// Normally distributed position around `mean` (position coordinates) with
    /// standard deviation `sigma` (velocity coordinates)
    ///
    /// Each sample in `[0, 1)` is mapped through the quantile function of the
    /// standard normal distribution. `Revolute` and `Prismatic` results are
    /// clamped into the limits.
    pub fn generate_position_gaussian(
        &self,
        rand: &[T],
        mean: &[T],
        sigma: &[T],
    ) -> Result<DVector<T>, Error> {
        check_size(rand.len(), self.dof())?;
        check_size(mean.len(), self.dof_position())?;
        check_size(sigma.len(), self.dof())?;
        Ok(match self.joint_type {
            JointType::Spherical => {
                let rotation = Vector3::from_fn(|i, _| sigma[i] * standard_normal_quantile(rand[i]));
                let mean = quaternion_from_position(mean);
                position_from_quaternion(&(mean * UnitQuaternion::from_scaled_axis(rotation)))
            }
            _ => DVector::from_fn(1, |i, _| {
                self.range(i)
                    .clamp(mean[i] + sigma[i] * standard_normal_quantile(rand[i]))
            }),
        })
    }
}

fn quaternion_from_position<T: RealField + Copy>(q: &[T]) -> UnitQuaternion<T> {
    let quaternion = Quaternion::new(q[3], q[0], q[1], q[2]);
    if quaternion.norm() <= T::default_epsilon() {
        UnitQuaternion::identity()
    } else {
        UnitQuaternion::from_quaternion(quaternion)
    }
}

fn position_from_quaternion<T: RealField + Copy>(q: &UnitQuaternion<T>) -> DVector<T> {
    DVector::from_column_slice(q.coords.as_slice())
}

/// Standard normal value below which the fraction `p` of samples fall
fn standard_normal_quantile<T: RealField + Copy>(p: T) -> T {
    let eps = T::default_epsilon();
    let p = na::try_convert::<T, f64>(p.max(eps).min(T::one() - eps)).unwrap_or(0.5);
    na::convert(Normal::standard().inverse_cdf(p))
}

impl<T: RealField> Display for Joint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joint_type)
    }
}
