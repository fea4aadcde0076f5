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
//! Nodes of the kinematic graph
use crate::graph::FrameId;
use crate::spatial::*;
use na::{Isometry3, RealField, Vector3};
use nalgebra as na;
use std::collections::BTreeSet;
use std::fmt::{self, Display};

/// Rigid body attached to a frame
///
/// Collision checking itself is done elsewhere, a body only tells whether it
/// should be checked against another body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    /// `false` disables every collision check of this body
    pub collision: bool,
    ignored: BTreeSet<FrameId>,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            collision: true,
            ignored: BTreeSet::new(),
        }
    }
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }
    /// Skip collision checks against the body at `other`
    pub fn ignore(&mut self, other: FrameId) {
        self.ignored.insert(other);
    }
    pub fn unignore(&mut self, other: FrameId) {
        self.ignored.remove(&other);
    }
    /// Whether this body has to be checked against the body at `other`
    ///
    /// This is not symmetric, see `Model::are_colliding`.
    pub fn collides_with(&self, other: FrameId) -> bool {
        self.collision && !self.ignored.contains(&other)
    }
}

/// Kind of a frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameKind<T: RealField> {
    /// Root of the model
    World { gravity: Vector3<T> },
    Body(Body),
    /// Plain coordinate frame
    Frame,
}

/// Named coordinate frame with its kinematic state
///
/// `pose`, `velocity` and `acceleration` are expressed in world coordinates.
#[derive(Debug, Clone)]
pub struct Frame<T: RealField> {
    pub name: String,
    pub kind: FrameKind<T>,
    pub pose: Isometry3<T>,
    pub velocity: Twist<T>,
    pub acceleration: Twist<T>,
    pub force: Wrench<T>,
    id: Option<FrameId>,
}

impl<T> Frame<T>
where
    T: RealField + Copy,
{
    fn with_kind(name: &str, kind: FrameKind<T>) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            pose: Isometry3::identity(),
            velocity: Twist::zero(),
            acceleration: Twist::zero(),
            force: Wrench::zero(),
            id: None,
        }
    }
    /// Plain frame without payload
    pub fn new(name: &str) -> Self {
        Self::with_kind(name, FrameKind::Frame)
    }
    /// World frame with standard gravity along -z
    ///
    /// # Examples
    ///
    /// ```
    /// let world = kmodel::Frame::<f64>::world("world");
    /// assert!(world.is_world());
    /// assert_eq!(world.gravity().unwrap().z, -9.80665);
    /// ```
    pub fn world(name: &str) -> Self {
        Self::with_kind(
            name,
            FrameKind::World {
                gravity: Vector3::new(T::zero(), T::zero(), na::convert(-9.80665)),
            },
        )
    }
    /// Body which collides with every other body
    pub fn body(name: &str) -> Self {
        Self::with_kind(name, FrameKind::Body(Body::new()))
    }
}

impl<T> Frame<T>
where
    T: RealField,
{
    /// Vertex of this frame, `None` until it is added to a model
    #[inline]
    pub fn id(&self) -> Option<FrameId> {
        self.id
    }
    #[inline]
    pub(crate) fn set_id(&mut self, id: Option<FrameId>) {
        self.id = id;
    }
    pub fn is_world(&self) -> bool {
        matches!(self.kind, FrameKind::World { .. })
    }
    pub fn as_body(&self) -> Option<&Body> {
        match &self.kind {
            FrameKind::Body(body) => Some(body),
            _ => None,
        }
    }
    pub fn as_body_mut(&mut self) -> Option<&mut Body> {
        match &mut self.kind {
            FrameKind::Body(body) => Some(body),
            _ => None,
        }
    }
    pub fn gravity(&self) -> Option<&Vector3<T>> {
        match &self.kind {
            FrameKind::World { gravity } => Some(gravity),
            _ => None,
        }
    }
    pub fn gravity_mut(&mut self) -> Option<&mut Vector3<T>> {
        match &mut self.kind {
            FrameKind::World { gravity } => Some(gravity),
            _ => None,
        }
    }
}

impl<T: RealField> Display for Frame<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FrameKind::World { .. } => write!(f, "<{}>", self.name),
            FrameKind::Body(_) => write!(f, "/{}/", self.name),
            FrameKind::Frame => write!(f, "{}", self.name),
        }
    }
}
