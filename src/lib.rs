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
//! # Kinematic tree model using [nalgebra](http://nalgebra.org).
//!
//! `kmodel` has below functionalities
//!
//! 1. Pose algebra (distance, spatial deltas, Denavit-Hartenberg parameters)
//! 1. Tree of frames connected by fixed transforms and joints
//! 1. Joint space accessors with a generalized coordinate mapping
//! 1. Forward kinematics of poses and velocities
//! 1. Seedable sampling of joint positions
//!
//! See `Model` as the top level interface.
//!
//! ```
//! use kmodel::*;
//!
//! let mut model = Model::<f64>::with_seed(0);
//! let world = model.add_frame(Frame::world("world")).unwrap();
//! let base = model.add_frame(Frame::body("base")).unwrap();
//! let arm = model.add_frame(Frame::body("arm")).unwrap();
//! model
//!     .add_transform(Transform::fixed("mount", Isometry3::identity()), world, base)
//!     .unwrap();
//! let shoulder = JointBuilder::new()
//!     .joint_type(JointType::Revolute { axis: Vector3::z_axis() })
//!     .translation(Translation3::new(0.0, 0.0, 0.3))
//!     .into_transform("shoulder");
//! model.add_transform(shoulder, base, arm).unwrap();
//! model.update().unwrap();
//!
//! model.set_position(&[0.2]).unwrap();
//! model.forward_position();
//! assert_eq!(model.operational_position(0).translation.vector.z, 0.3);
//! ```
mod denavit_hartenberg;
mod errors;
mod model;
use nalgebra as na;
pub mod frame;
pub mod graph;
pub mod iterator;
pub mod joint;
pub mod pose;
pub mod spatial;
pub mod transform;

pub use self::denavit_hartenberg::DenavitHartenberg;
pub use self::errors::*;
pub use self::frame::{Body, Frame, FrameKind};
pub use self::graph::{Element, FrameId, KinematicGraph, TransformId};
pub use self::joint::{Joint, JointBuilder, JointType, Range, Units};
pub use self::model::Model;
pub use self::spatial::{Twist, Wrench};
pub use self::transform::{Transform, TransformKind};

// re-export from nalgebra
pub use na::{Isometry3, RealField, Translation3, UnitQuaternion, Vector3};
pub use simba::scalar::{SubsetOf, SupersetOf};
