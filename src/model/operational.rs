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
//! Leaf, world and body state
use super::Model;
use crate::frame::Frame;
use crate::joint::{Joint, JointType};
use crate::spatial::*;
use na::{Isometry3, RealField, Vector3};
use nalgebra as na;

impl<T> Model<T>
where
    T: RealField,
{
    fn leaf(&self, i: usize) -> &Frame<T> {
        assert!(i < self.leaves.len(), "operational index {} out of range", i);
        &self.graph[self.leaves[i]]
    }

    fn leaf_mut(&mut self, i: usize) -> &mut Frame<T> {
        assert!(i < self.leaves.len(), "operational index {} out of range", i);
        &mut self.graph[self.leaves[i]]
    }

    /// Frame of leaf `i`
    pub fn operational_frame(&self, i: usize) -> &Frame<T> {
        self.leaf(i)
    }
    /// World pose of leaf `i`
    pub fn operational_position(&self, i: usize) -> &Isometry3<T> {
        &self.leaf(i).pose
    }
    pub fn operational_velocity(&self, i: usize) -> &Twist<T> {
        &self.leaf(i).velocity
    }
    pub fn set_operational_velocity(&mut self, i: usize, velocity: Twist<T>) {
        self.leaf_mut(i).velocity = velocity;
    }
    pub fn operational_acceleration(&self, i: usize) -> &Twist<T> {
        &self.leaf(i).acceleration
    }
    pub fn operational_force(&self, i: usize) -> &Wrench<T> {
        &self.leaf(i).force
    }

    /// Relative pose of tool transform `i`
    pub fn tool(&self, i: usize) -> &Isometry3<T> {
        assert!(i < self.tools.len(), "tool index {} out of range", i);
        &self.graph[self.tools[i]].pose
    }
    pub fn tool_mut(&mut self, i: usize) -> &mut Isometry3<T> {
        assert!(i < self.tools.len(), "tool index {} out of range", i);
        &mut self.graph[self.tools[i]].pose
    }

    /// World pose of body `i`
    pub fn body_frame(&self, i: usize) -> &Isometry3<T> {
        &self.body(i).pose
    }

    /// Whether body `i` takes part in collision checks at all
    pub fn is_colliding(&self, i: usize) -> bool {
        self.body(i).as_body().map_or(false, |body| body.collision)
    }

    /// Whether bodies `i` and `j` have to be checked against each other
    ///
    /// Symmetric even if only one of the bodies ignores the other.
    pub fn are_colliding(&self, i: usize, j: usize) -> bool {
        let (a, b) = (self.body(i), self.body(j));
        let checks = |x: &Frame<T>, y: &Frame<T>| match (x.as_body(), y.id()) {
            (Some(body), Some(other)) => body.collides_with(other),
            _ => false,
        };
        checks(a, b) || checks(b, a)
    }

    fn world_frame(&self) -> &Frame<T> {
        let root = self.root.expect("model has no world frame");
        &self.graph[root]
    }

    fn world_frame_mut(&mut self) -> &mut Frame<T> {
        let root = self.root.expect("model has no world frame");
        &mut self.graph[root]
    }

    /// Pose of the world frame
    pub fn world(&self) -> &Isometry3<T> {
        &self.world_frame().pose
    }
    pub fn world_mut(&mut self) -> &mut Isometry3<T> {
        &mut self.world_frame_mut().pose
    }

    pub fn world_gravity(&self) -> &Vector3<T> {
        self.world_frame()
            .gravity()
            .expect("root is a world frame")
    }
    pub fn set_world_gravity(&mut self, gravity: Vector3<T>) {
        if let Some(g) = self.world_frame_mut().gravity_mut() {
            *g = gravity;
        }
    }
}

impl<T> Model<T>
where
    T: RealField + Copy,
{
    /// Update the world pose of every frame from the joint positions
    ///
    /// Frames are visited in traversal order starting from the pose of the
    /// world frame.
    ///
    /// # Examples
    ///
    /// ```
    /// use kmodel::*;
    ///
    /// let mut model = Model::<f64>::with_seed(0);
    /// let world = model.add_frame(Frame::world("world")).unwrap();
    /// let slider = model.add_frame(Frame::body("slider")).unwrap();
    /// let joint = JointBuilder::new()
    ///     .joint_type(JointType::Prismatic { axis: Vector3::x_axis() })
    ///     .translation(Translation3::new(0.0, 0.0, 1.0))
    ///     .into_transform("joint");
    /// model.add_transform(joint, world, slider).unwrap();
    /// model.update().unwrap();
    /// model.set_position(&[0.5]).unwrap();
    /// model.forward_position();
    /// let pose = model.operational_position(0);
    /// assert_eq!(pose.translation.vector, Vector3::new(0.5, 0.0, 1.0));
    /// ```
    pub fn forward_position(&mut self) {
        for &id in &self.transforms {
            let transform = &mut self.graph[id];
            if let Some(pose) = transform.as_joint().map(Joint::local_transform) {
                transform.pose = pose;
            }
            let local = transform.pose;
            let (input, output) = match (transform.input(), transform.output()) {
                (Some(input), Some(output)) => (input, output),
                _ => continue,
            };
            let pose = self.graph[input].pose * local;
            self.graph[output].pose = pose;
        }
    }

    /// Update the world aligned velocity of every frame from the joint
    /// velocities
    ///
    /// Needs the poses of `forward_position()`. The velocity of the world
    /// frame is taken as is.
    pub fn forward_velocity(&mut self) {
        for &id in &self.transforms {
            let transform = &self.graph[id];
            let (input, output) = match (transform.input(), transform.output()) {
                (Some(input), Some(output)) => (input, output),
                _ => continue,
            };
            let parent = &self.graph[input];
            let pose = self.graph[output].pose;
            let lever = pose.translation.vector - parent.pose.translation.vector;
            let mut velocity = Twist::new(
                parent.velocity.translation + parent.velocity.rotation.cross(&lever),
                parent.velocity.rotation,
            );
            if let Some(joint) = transform.as_joint() {
                let qd = joint.velocity();
                match joint.joint_type {
                    JointType::Revolute { axis } => {
                        velocity.rotation += pose.rotation * axis.into_inner() * qd[0];
                    }
                    JointType::Prismatic { axis } => {
                        velocity.translation += pose.rotation * axis.into_inner() * qd[0];
                    }
                    JointType::Spherical => {
                        velocity.rotation += pose.rotation * Vector3::new(qd[0], qd[1], qd[2]);
                    }
                }
            }
            self.graph[output].velocity = velocity;
        }
    }
}
