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
use super::joint::*;
use super::joint_type::*;
use super::range::*;
use crate::transform::Transform;
use na::{Isometry3, RealField, Translation3, UnitQuaternion, Vector3};
use nalgebra as na;

/// Build a `Joint<T>`
///
/// # Examples
///
/// ```
/// use kmodel::*;
/// let j0 = JointBuilder::new()
///     .joint_type(JointType::Revolute { axis: Vector3::y_axis() })
///     .translation(Translation3::new(0.0, 0.1, 0.0))
///     .limits(Some((-1.0..=1.0).into()))
///     .finalize();
/// assert_eq!(j0.max()[0], 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct JointBuilder<T: RealField> {
    joint_type: JointType<T>,
    limits: Option<Range<T>>,
    speed: Option<T>,
    wraparound: bool,
    origin: Isometry3<T>,
}

impl<T> Default for JointBuilder<T>
where
    T: RealField + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JointBuilder<T>
where
    T: RealField + Copy,
{
    /// Revolute joint around z without origin offset
    pub fn new() -> JointBuilder<T> {
        JointBuilder {
            joint_type: JointType::Revolute {
                axis: Vector3::z_axis(),
            },
            limits: None,
            speed: None,
            wraparound: false,
            origin: Isometry3::identity(),
        }
    }
    /// Set the type of the joint
    pub fn joint_type(mut self, joint_type: JointType<T>) -> JointBuilder<T> {
        self.joint_type = joint_type;
        self
    }
    /// Set the limits of every position coordinate
    pub fn limits(mut self, limits: Option<Range<T>>) -> JointBuilder<T> {
        self.limits = limits;
        self
    }
    /// Set the maximum speed of every velocity coordinate
    pub fn speed(mut self, speed: T) -> JointBuilder<T> {
        self.speed = Some(speed);
        self
    }
    /// Mark every coordinate as wrapping around at its limits
    pub fn wraparound(mut self, wraparound: bool) -> JointBuilder<T> {
        self.wraparound = wraparound;
        self
    }
    /// Set the origin transform of this joint
    pub fn origin(mut self, origin: Isometry3<T>) -> JointBuilder<T> {
        self.origin = origin;
        self
    }
    /// Set the translation of the origin transform of this joint
    pub fn translation(mut self, translation: Translation3<T>) -> JointBuilder<T> {
        self.origin.translation = translation;
        self
    }
    /// Set the rotation of the origin transform of this joint
    pub fn rotation(mut self, rotation: UnitQuaternion<T>) -> JointBuilder<T> {
        self.origin.rotation = rotation;
        self
    }
    /// Create `Joint` instance
    pub fn finalize(self) -> Joint<T> {
        let mut joint = Joint::new(self.joint_type);
        joint.set_origin(self.origin);
        let dof = joint.dof();
        let dof_position = joint.dof_position();
        if let Some(range) = self.limits {
            joint.min = na::DVector::from_element(dof_position, range.min);
            joint.max = na::DVector::from_element(dof_position, range.max);
        }
        if let Some(speed) = self.speed {
            joint.speed = na::DVector::from_element(dof, speed);
        }
        joint.wraparound = vec![self.wraparound; dof];
        joint
    }
    /// Create a named `Transform` holding the joint
    pub fn into_transform(self, name: &str) -> Transform<T> {
        Transform::joint(name, self.finalize())
    }
}
