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
//! Random joint positions
//!
//! Every sampler draws one number in `[0, 1)` per velocity coordinate and
//! hands each joint its own segment. The `_from` variants take these numbers
//! from the caller and are deterministic. Results are joint positions, not
//! generalized ones.
use super::Model;
use crate::errors::*;
use crate::joint::Joint;
use na::{DVector, RealField};
use nalgebra as na;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops;

impl<T> Model<T>
where
    T: RealField + Copy,
{
    /// Restart the sampler from `seed`
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    fn draw(&mut self) -> Vec<T> {
        let dof = self.dof();
        (0..dof)
            .map(|_| na::convert(self.rng.gen::<f64>()))
            .collect()
    }

    fn sample_joints(
        &self,
        mut sample: impl FnMut(&Joint<T>, ops::Range<usize>, ops::Range<usize>) -> Result<DVector<T>, Error>,
    ) -> Result<DVector<T>, Error> {
        let mut position = Vec::with_capacity(self.dof_position());
        let (mut velocity_offset, mut position_offset) = (0, 0);
        for joint in self.joint_iter() {
            let (dof, dof_position) = (joint.dof(), joint.dof_position());
            let segment = sample(
                joint,
                velocity_offset..velocity_offset + dof,
                position_offset..position_offset + dof_position,
            )?;
            position.extend(segment.iter().copied());
            velocity_offset += dof;
            position_offset += dof_position;
        }
        Ok(DVector::from_vec(position))
    }

    /// Uniformly distributed position within the joint limits
    pub fn generate_position_uniform(&mut self) -> Result<DVector<T>, Error> {
        let rand = self.draw();
        self.generate_position_uniform_from(&rand)
    }

    /// Uniformly distributed position from `rand`, one number in `[0, 1)` per
    /// velocity coordinate
    ///
    /// # Examples
    ///
    /// ```
    /// use kmodel::*;
    ///
    /// let mut model = Model::<f64>::with_seed(0);
    /// let world = model.add_frame(Frame::world("world")).unwrap();
    /// let link = model.add_frame(Frame::body("link")).unwrap();
    /// let joint = JointBuilder::new()
    ///     .limits(Some((0.0..=2.0).into()))
    ///     .into_transform("joint");
    /// model.add_transform(joint, world, link).unwrap();
    /// model.update().unwrap();
    /// assert_eq!(model.generate_position_uniform_from(&[0.25]).unwrap()[0], 0.5);
    /// ```
    pub fn generate_position_uniform_from(&self, rand: &[T]) -> Result<DVector<T>, Error> {
        check_size(rand.len(), self.dof())?;
        self.sample_joints(|joint, v, _| joint.generate_position_uniform(&rand[v]))
    }

    /// Uniformly distributed position within `min` and `max`, given per
    /// velocity coordinate
    pub fn generate_position_uniform_bounded(
        &mut self,
        min: &[T],
        max: &[T],
    ) -> Result<DVector<T>, Error> {
        let rand = self.draw();
        self.generate_position_uniform_bounded_from(&rand, min, max)
    }

    pub fn generate_position_uniform_bounded_from(
        &self,
        rand: &[T],
        min: &[T],
        max: &[T],
    ) -> Result<DVector<T>, Error> {
        let dof = self.dof();
        check_size(rand.len(), dof)?;
        check_size(min.len(), dof)?;
        check_size(max.len(), dof)?;
        self.sample_joints(|joint, v, _| {
            joint.generate_position_uniform_bounded(&rand[v.clone()], &min[v.clone()], &max[v])
        })
    }

    /// Normally distributed position around `mean` (joint position) with
    /// standard deviation `sigma` (per velocity coordinate)
    pub fn generate_position_gaussian(
        &mut self,
        mean: &[T],
        sigma: &[T],
    ) -> Result<DVector<T>, Error> {
        let rand = self.draw();
        self.generate_position_gaussian_from(&rand, mean, sigma)
    }

    pub fn generate_position_gaussian_from(
        &self,
        rand: &[T],
        mean: &[T],
        sigma: &[T],
    ) -> Result<DVector<T>, Error> {
        check_size(rand.len(), self.dof())?;
        check_size(mean.len(), self.dof_position())?;
        check_size(sigma.len(), self.dof())?;
        self.sample_joints(|joint, v, p| {
            joint.generate_position_gaussian(&rand[v.clone()], &mean[p], &sigma[v])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::joint::{JointBuilder, JointType};
    use na::Vector3;

    fn model(seed: u64) -> Model<f64> {
        let mut model = Model::with_seed(seed);
        let world = model.add_frame(Frame::world("world")).unwrap();
        let a = model.add_frame(Frame::body("a")).unwrap();
        let b = model.add_frame(Frame::body("b")).unwrap();
        model
            .add_transform(
                JointBuilder::new()
                    .joint_type(JointType::Prismatic {
                        axis: Vector3::x_axis(),
                    })
                    .limits(Some((-0.5..=0.5).into()))
                    .into_transform("slider"),
                world,
                a,
            )
            .unwrap();
        model
            .add_transform(
                JointBuilder::new()
                    .joint_type(JointType::Spherical)
                    .into_transform("ball"),
                a,
                b,
            )
            .unwrap();
        model.update().unwrap();
        model
    }

    #[test]
    fn test_seeded_sampling_repeats() {
        let mut first = model(42);
        let mut second = model(42);
        for _ in 0..5 {
            let q = first.generate_position_uniform().unwrap();
            assert_eq!(q, second.generate_position_uniform().unwrap());
            assert_eq!(q.len(), 5);
            assert!(first.is_valid(q.as_slice()));
            assert!((q.rows(1, 4).norm() - 1.0).abs() < 1e-12);
        }
        first.seed(7);
        second.seed(7);
        assert_eq!(
            first.generate_position_gaussian(&[0.0, 0.0, 0.0, 0.0, 1.0], &[0.1; 4]).unwrap(),
            second.generate_position_gaussian(&[0.0, 0.0, 0.0, 0.0, 1.0], &[0.1; 4]).unwrap()
        );
    }

    #[test]
    fn test_explicit_samples() {
        let model = model(0);
        let rand = [0.75, 0.1, 0.2, 0.3];
        let q = model.generate_position_uniform_from(&rand).unwrap();
        assert_eq!(q, model.generate_position_uniform_from(&rand).unwrap());
        assert_eq!(q[0], 0.25);
        assert!(model.generate_position_uniform_from(&rand[..3]).is_err());

        let q = model
            .generate_position_gaussian_from(&[0.5; 4], &[0.1, 0.0, 0.0, 0.0, 1.0], &[1.0; 4])
            .unwrap();
        assert!((q[0] - 0.1).abs() < 1e-9);
        assert!((q[4] - 1.0).abs() < 1e-9);

        let q = model
            .generate_position_uniform_bounded_from(
                &[0.5, 0.5, 0.5, 1.0],
                &[-0.2, 0.0, 0.0, 0.0],
                &[0.4, 0.0, 0.0, std::f64::consts::PI],
            )
            .unwrap();
        assert!((q[0] - 0.1).abs() < 1e-12);
        // half turn around z, stored as [x, y, z, w]
        assert!(q[1].abs() < 1e-12);
        assert!(q[2].abs() < 1e-12);
        assert!((q[3] - 1.0).abs() < 1e-12);
        assert!(q[4].abs() < 1e-12);
    }
}
