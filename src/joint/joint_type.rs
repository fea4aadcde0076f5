/*
  Copyright 2020 Takashi Ogura

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
use nalgebra::{RealField, Unit, Vector3};
use std::fmt::{self, Display};

/// Type of Joint, `Revolute`, `Prismatic` and `Spherical` are supported
#[derive(Copy, Debug, Clone, PartialEq)]
pub enum JointType<T: RealField> {
    /// Rotation around axis. The position is an angle [rad].
    Revolute {
        /// axis of the joint
        axis: Unit<Vector3<T>>,
    },
    /// Translation along axis. The position is a length [m].
    Prismatic {
        /// axis of the joint
        axis: Unit<Vector3<T>>,
    },
    /// Free rotation. The position is a quaternion `[x, y, z, w]`, the
    /// velocity is an angular velocity.
    Spherical,
}

impl<T> JointType<T>
where
    T: RealField,
{
    /// Dimension of the velocity, acceleration and torque space
    pub fn dof(&self) -> usize {
        match self {
            JointType::Revolute { .. } | JointType::Prismatic { .. } => 1,
            JointType::Spherical => 3,
        }
    }
    /// Dimension of the position space
    pub fn dof_position(&self) -> usize {
        match self {
            JointType::Revolute { .. } | JointType::Prismatic { .. } => 1,
            JointType::Spherical => 4,
        }
    }
}

fn axis_to_string<T: RealField>(axis: &Unit<Vector3<T>>) -> &str {
    if *axis == Vector3::x_axis() {
        "+X"
    } else if *axis == Vector3::y_axis() {
        "+Y"
    } else if *axis == Vector3::z_axis() {
        "+Z"
    } else if *axis == -Vector3::x_axis() {
        "-X"
    } else if *axis == -Vector3::y_axis() {
        "-Y"
    } else if *axis == -Vector3::z_axis() {
        "-Z"
    } else {
        ""
    }
}

impl<T: RealField> Display for JointType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JointType::Revolute { axis } => write!(f, "[⚙{}]", axis_to_string(axis)),
            JointType::Prismatic { axis } => write!(f, "[↕{}]", axis_to_string(axis)),
            JointType::Spherical => write!(f, "[◎]"),
        }
    }
}

#[test]
fn test_dof() {
    let revolute = JointType::<f64>::Revolute {
        axis: Vector3::z_axis(),
    };
    assert_eq!(revolute.dof(), 1);
    assert_eq!(revolute.dof_position(), 1);
    assert_eq!(format!("{}", revolute), "[⚙+Z]");
    let spherical = JointType::<f64>::Spherical;
    assert_eq!(spherical.dof(), 3);
    assert_eq!(spherical.dof_position(), 4);
}
