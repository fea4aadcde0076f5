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
use na::{RealField, Vector3, Vector6};
use nalgebra as na;

/// Motion of a frame (velocity or acceleration), world aligned
#[derive(Copy, Debug, Clone, PartialEq, Default)]
pub struct Twist<T: RealField> {
    pub translation: Vector3<T>,
    pub rotation: Vector3<T>,
}

impl<T> Twist<T>
where
    T: RealField + Copy,
{
    pub fn new(translation: Vector3<T>, rotation: Vector3<T>) -> Self {
        Self {
            translation,
            rotation,
        }
    }
    pub fn zero() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }
    /// `[translation, rotation]` as a spatial delta
    pub fn to_vector(&self) -> Vector6<T> {
        Vector6::new(
            self.translation.x,
            self.translation.y,
            self.translation.z,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }
}

/// Force and torque acting on a frame
#[derive(Copy, Debug, Clone, PartialEq, Default)]
pub struct Wrench<T: RealField> {
    pub force: Vector3<T>,
    pub torque: Vector3<T>,
}

impl<T> Wrench<T>
where
    T: RealField + Copy,
{
    pub fn new(force: Vector3<T>, torque: Vector3<T>) -> Self {
        Self { force, torque }
    }
    pub fn zero() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }
}
