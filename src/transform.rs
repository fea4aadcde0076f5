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
//! Edges of the kinematic graph
use crate::graph::{FrameId, TransformId};
use crate::joint::Joint;
use na::{Isometry3, RealField};
use nalgebra as na;
use std::fmt::{self, Display};

/// Kind of a transform
#[derive(Debug, Clone)]
pub enum TransformKind<T: RealField> {
    /// Constant pose
    Fixed,
    /// Pose parameterized by the joint position
    Joint(Joint<T>),
}

/// Pose relation from the `input` frame to the `output` frame
#[derive(Debug, Clone)]
pub struct Transform<T: RealField> {
    pub name: String,
    pub kind: TransformKind<T>,
    /// Relative pose. Constant for `Fixed`, recomputed from the joint by
    /// `Model::forward_position` otherwise.
    pub pose: Isometry3<T>,
    id: Option<TransformId>,
    input: Option<FrameId>,
    output: Option<FrameId>,
}

impl<T> Transform<T>
where
    T: RealField + Copy,
{
    fn with_kind(name: &str, kind: TransformKind<T>, pose: Isometry3<T>) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            pose,
            id: None,
            input: None,
            output: None,
        }
    }
    /// Fixed transform with constant pose
    pub fn fixed(name: &str, pose: Isometry3<T>) -> Self {
        Self::with_kind(name, TransformKind::Fixed, pose)
    }
    /// Transform driven by `joint`
    pub fn joint(name: &str, joint: Joint<T>) -> Self {
        let pose = joint.local_transform();
        Self::with_kind(name, TransformKind::Joint(joint), pose)
    }
    /// Current relative pose, computed from the joint position for joints
    pub fn local_transform(&self) -> Isometry3<T> {
        match &self.kind {
            TransformKind::Fixed => self.pose,
            TransformKind::Joint(joint) => joint.local_transform(),
        }
    }
}

impl<T> Transform<T>
where
    T: RealField,
{
    pub fn is_joint(&self) -> bool {
        matches!(self.kind, TransformKind::Joint(_))
    }
    pub fn as_joint(&self) -> Option<&Joint<T>> {
        match &self.kind {
            TransformKind::Joint(joint) => Some(joint),
            TransformKind::Fixed => None,
        }
    }
    pub fn as_joint_mut(&mut self) -> Option<&mut Joint<T>> {
        match &mut self.kind {
            TransformKind::Joint(joint) => Some(joint),
            TransformKind::Fixed => None,
        }
    }
    /// Edge of this transform, `None` until it is added to a model
    #[inline]
    pub fn id(&self) -> Option<TransformId> {
        self.id
    }
    #[inline]
    pub(crate) fn set_id(&mut self, id: Option<TransformId>) {
        self.id = id;
    }
    /// Frame this transform starts from, as of the last `Model::update`
    #[inline]
    pub fn input(&self) -> Option<FrameId> {
        self.input
    }
    /// Frame this transform leads to, as of the last `Model::update`
    #[inline]
    pub fn output(&self) -> Option<FrameId> {
        self.output
    }
    pub(crate) fn set_frames(&mut self, input: FrameId, output: FrameId) {
        self.input = Some(input);
        self.output = Some(output);
    }
}

impl<T: RealField> Display for Transform<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TransformKind::Fixed => write!(f, "{} [⚓]", self.name),
            TransformKind::Joint(joint) => write!(f, "{} {}", self.name, joint),
        }
    }
}

#[test]
fn test_joint_transform() {
    use crate::joint::JointType;
    use na::{Translation3, Vector3};

    let fixed = Transform::fixed("base", Isometry3::translation(0.0, 0.0, 0.5));
    assert!(!fixed.is_joint());
    assert_eq!(fixed.local_transform().translation.vector.z, 0.5);
    assert_eq!(format!("{}", fixed), "base [⚓]");

    let mut joint = Joint::new(JointType::Prismatic {
        axis: Vector3::z_axis(),
    });
    joint.set_origin(Isometry3::from_parts(
        Translation3::new(1.0, 0.0, 0.0),
        na::UnitQuaternion::identity(),
    ));
    let mut slider = Transform::joint("slider", joint);
    assert!(slider.is_joint());
    slider.as_joint_mut().unwrap().set_position(&[0.25]).unwrap();
    let local = slider.local_transform();
    assert_eq!(local.translation.vector.x, 1.0);
    assert_eq!(local.translation.vector.z, 0.25);
    assert_eq!(format!("{}", slider), "slider [↕+Z]");
}
