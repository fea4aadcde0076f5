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
//! Joint space accessors and the generalized coordinate mapping
use super::Model;
use crate::errors::*;
use crate::joint::{Joint, Units};
use crate::transform::Transform;
use na::{DMatrix, DVector, RealField};
use nalgebra as na;

/// Which joint dimension a flattened vector is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// `dof_position()` components per joint
    Position,
    /// `dof()` components per joint
    Velocity,
}

macro_rules! def_raw_accessors {
    ($getter:ident, $setter:ident, $joint_getter:ident, $joint_setter:ident, $layout:expr) => {
        /// Concatenation over all joints in traversal order
        pub fn $getter(&self) -> DVector<T> {
            self.gather(Joint::$joint_getter)
        }
        pub fn $setter(&mut self, values: &[T]) -> Result<(), Error> {
            self.scatter(values, $layout, Joint::$joint_setter)
        }
    };
}

macro_rules! def_units_accessor {
    ($getter:ident, $joint_getter:ident) => {
        pub fn $getter(&self) -> Vec<Units> {
            self.joint_iter()
                .flat_map(|joint| joint.$joint_getter())
                .collect()
        }
    };
}

impl<T> Model<T>
where
    T: RealField + Copy,
{
    fn layout_size(&self, layout: Layout) -> usize {
        match layout {
            Layout::Position => self.dof_position(),
            Layout::Velocity => self.dof(),
        }
    }

    fn gather(&self, get: impl Fn(&Joint<T>) -> &DVector<T>) -> DVector<T> {
        DVector::from_vec(
            self.joint_iter()
                .flat_map(|joint| get(joint).iter().copied())
                .collect(),
        )
    }

    fn scatter<V>(
        &mut self,
        values: &[V],
        layout: Layout,
        mut set: impl FnMut(&mut Joint<T>, &[V]) -> Result<(), Error>,
    ) -> Result<(), Error> {
        check_size(values.len(), self.layout_size(layout))?;
        let mut offset = 0;
        for &id in &self.joints {
            if let Some(joint) = self.graph.transform_mut(id).and_then(Transform::as_joint_mut) {
                let size = match layout {
                    Layout::Position => joint.dof_position(),
                    Layout::Velocity => joint.dof(),
                };
                set(joint, &values[offset..offset + size])?;
                offset += size;
            }
        }
        Ok(())
    }

    /// Generalized position, `inv(gamma_position) * q`
    ///
    /// # Examples
    ///
    /// ```
    /// use kmodel::*;
    ///
    /// let mut model = Model::<f64>::with_seed(0);
    /// let world = model.add_frame(Frame::world("world")).unwrap();
    /// let ball = model.add_frame(Frame::body("ball")).unwrap();
    /// let joint = JointBuilder::new().joint_type(JointType::Spherical).into_transform("ball");
    /// model.add_transform(joint, world, ball).unwrap();
    /// model.update().unwrap();
    /// assert_eq!(model.position().as_slice(), &[0.0, 0.0, 0.0, 1.0]);
    /// assert_eq!(model.velocity().len(), 3);
    /// ```
    pub fn position(&self) -> DVector<T> {
        &self.inv_gamma_position * self.gather(Joint::position)
    }

    /// Set the generalized position `y`, the joints get `gamma_position * y`
    pub fn set_position(&mut self, position: &[T]) -> Result<(), Error> {
        check_size(position.len(), self.gamma_position.ncols())?;
        let q = &self.gamma_position * DVector::from_column_slice(position);
        self.scatter(q.as_slice(), Layout::Position, Joint::set_position)
    }

    /// Generalized velocity, `inv(gamma_velocity) * qd`
    pub fn velocity(&self) -> DVector<T> {
        &self.inv_gamma_velocity * self.gather(Joint::velocity)
    }

    /// Set the generalized velocity `yd`, the joints get `gamma_velocity * yd`
    pub fn set_velocity(&mut self, velocity: &[T]) -> Result<(), Error> {
        check_size(velocity.len(), self.gamma_velocity.ncols())?;
        let qd = &self.gamma_velocity * DVector::from_column_slice(velocity);
        self.scatter(qd.as_slice(), Layout::Velocity, Joint::set_velocity)
    }

    /// Generalized acceleration, `inv(gamma_velocity) * qdd`
    pub fn acceleration(&self) -> DVector<T> {
        &self.inv_gamma_velocity * self.gather(Joint::acceleration)
    }

    /// Set the generalized acceleration `ydd`, the joints get
    /// `gamma_velocity * ydd`
    pub fn set_acceleration(&mut self, acceleration: &[T]) -> Result<(), Error> {
        check_size(acceleration.len(), self.gamma_velocity.ncols())?;
        let qdd = &self.gamma_velocity * DVector::from_column_slice(acceleration);
        self.scatter(qdd.as_slice(), Layout::Velocity, Joint::set_acceleration)
    }

    def_raw_accessors!(torque, set_torque, torque, set_torque, Layout::Velocity);
    def_raw_accessors!(speed, set_speed, speed, set_speed, Layout::Velocity);
    def_raw_accessors!(minimum, set_minimum, min, set_min, Layout::Position);
    def_raw_accessors!(maximum, set_maximum, max, set_max, Layout::Position);

    def_units_accessor!(position_units, position_units);
    def_units_accessor!(velocity_units, velocity_units);
    def_units_accessor!(acceleration_units, acceleration_units);
    def_units_accessor!(speed_units, speed_units);
    def_units_accessor!(torque_units, torque_units);

    /// Wraparound flag of every velocity coordinate
    pub fn wraparounds(&self) -> Vec<bool> {
        self.joint_iter()
            .flat_map(|joint| joint.wraparound.iter().copied())
            .collect()
    }

    pub fn set_wraparounds(&mut self, wraparounds: &[bool]) -> Result<(), Error> {
        self.scatter(wraparounds, Layout::Velocity, |joint, flags| {
            joint.wraparound = flags.to_vec();
            Ok(())
        })
    }

    /// Check the joint position `q` (not the generalized one) against the
    /// limits of every joint
    pub fn is_valid(&self, q: &[T]) -> bool {
        if q.len() != self.dof_position() {
            return false;
        }
        let mut offset = 0;
        self.joint_iter().all(|joint| {
            let size = joint.dof_position();
            let valid = joint.is_valid(&q[offset..offset + size]);
            offset += size;
            valid
        })
    }

    /// Map from generalized to joint positions
    pub fn gamma_position(&self) -> &DMatrix<T> {
        &self.gamma_position
    }
    pub fn gamma_position_inverse(&self) -> &DMatrix<T> {
        &self.inv_gamma_position
    }
    /// Map from generalized to joint velocities
    pub fn gamma_velocity(&self) -> &DMatrix<T> {
        &self.gamma_velocity
    }
    pub fn gamma_velocity_inverse(&self) -> &DMatrix<T> {
        &self.inv_gamma_velocity
    }

    /// Set the map `q = G y` and store its pseudo inverse
    ///
    /// `G` needs `dof_position()` rows, its column count becomes the size of
    /// the generalized position. Singular values up to machine epsilon are
    /// dropped from the inverse.
    ///
    /// # Examples
    ///
    /// ```
    /// use kmodel::*;
    /// use nalgebra::DMatrix;
    ///
    /// let mut model = Model::<f64>::with_seed(0);
    /// let world = model.add_frame(Frame::world("world")).unwrap();
    /// let a = model.add_frame(Frame::body("a")).unwrap();
    /// let b = model.add_frame(Frame::body("b")).unwrap();
    /// model.add_transform(JointBuilder::new().into_transform("ja"), world, a).unwrap();
    /// model.add_transform(JointBuilder::new().into_transform("jb"), a, b).unwrap();
    /// model.update().unwrap();
    ///
    /// // both joints driven by one coordinate
    /// model.set_gamma_position(DMatrix::from_column_slice(2, 1, &[1.0, 1.0])).unwrap();
    /// model.set_position(&[0.25]).unwrap();
    /// assert_eq!(model.joint(1).position()[0], 0.25);
    /// assert!((model.position()[0] - 0.25).abs() < 1e-12);
    /// ```
    pub fn set_gamma_position(&mut self, gamma: DMatrix<T>) -> Result<(), Error> {
        check_size(gamma.nrows(), self.dof_position())?;
        self.inv_gamma_position = pseudo_inverse(&gamma)?;
        self.gamma_position = gamma;
        Ok(())
    }

    /// Set the map `qd = G yd` and store its pseudo inverse
    pub fn set_gamma_velocity(&mut self, gamma: DMatrix<T>) -> Result<(), Error> {
        check_size(gamma.nrows(), self.dof())?;
        self.inv_gamma_velocity = pseudo_inverse(&gamma)?;
        self.gamma_velocity = gamma;
        Ok(())
    }

    /// Joint position the model rests at
    pub fn home_position(&self) -> &DVector<T> {
        &self.home_position
    }

    pub fn set_home_position(&mut self, home: &[T]) -> Result<(), Error> {
        check_size(home.len(), self.dof_position())?;
        self.home_position = DVector::from_column_slice(home);
        Ok(())
    }
}

fn pseudo_inverse<T: RealField + Copy>(gamma: &DMatrix<T>) -> Result<DMatrix<T>, Error> {
    gamma
        .clone()
        .pseudo_inverse(T::default_epsilon())
        .map_err(|e| Error::PseudoInverseError(e.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::joint::{JointBuilder, JointType};
    use na::Vector3;

    fn chain() -> Model<f64> {
        let mut model = Model::with_seed(3);
        let world = model.add_frame(Frame::world("world")).unwrap();
        let a = model.add_frame(Frame::body("a")).unwrap();
        let b = model.add_frame(Frame::body("b")).unwrap();
        let c = model.add_frame(Frame::body("c")).unwrap();
        let revolute = JointBuilder::new()
            .joint_type(JointType::Revolute {
                axis: Vector3::z_axis(),
            })
            .limits(Some((-2.0..=2.0).into()));
        model
            .add_transform(revolute.clone().into_transform("j1"), world, a)
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
        model
            .add_transform(revolute.wraparound(true).into_transform("j3"), b, c)
            .unwrap();
        model.update().unwrap();
        model
    }

    #[test]
    fn test_dof_layout() {
        let model = chain();
        assert_eq!(model.dof(), 5);
        assert_eq!(model.dof_position(), 6);
        assert_eq!(model.position().len(), 6);
        assert_eq!(model.velocity().len(), 5);
        assert_eq!(model.minimum().len(), 6);
        assert_eq!(model.torque().len(), 5);
        assert_eq!(model.position_units().len(), 6);
        assert_eq!(model.velocity_units()[0], Units::RadianPerSecond);
        assert_eq!(model.torque_units().len(), 5);
        assert_eq!(
            model.wraparounds(),
            vec![false, false, false, false, true]
        );
        assert_eq!(model.gamma_position().shape(), (6, 6));
        assert_eq!(model.gamma_velocity_inverse().shape(), (5, 5));
        assert_eq!(model.home_position().len(), 6);
    }

    #[test]
    fn test_scatter() {
        let mut model = chain();
        let q = [0.5, 0.0, 0.0, 0.0, 1.0, -1.5];
        model.set_position(&q).unwrap();
        assert_eq!(model.position().as_slice(), &q);
        assert_eq!(model.joint(1).position().as_slice(), &q[1..5]);
        assert_eq!(model.joint(2).position()[0], -1.5);
        assert!(model.is_valid(&q));
        assert!(!model.is_valid(&[3.0, 0.0, 0.0, 0.0, 1.0, 0.0]));
        // wraparound joint is never out of range
        assert!(model.is_valid(&[0.0, 0.0, 0.0, 0.0, 1.0, 9.0]));

        let qd = [0.1, 0.2, 0.3, 0.4, 0.5];
        model.set_velocity(&qd).unwrap();
        assert_eq!(model.velocity().as_slice(), &qd);
        assert_eq!(model.joint(1).velocity().as_slice(), &qd[1..4]);

        model.set_torque(&qd).unwrap();
        assert_eq!(model.torque().as_slice(), &qd);

        model
            .set_wraparounds(&[true, false, false, false, false])
            .unwrap();
        assert!(model.joint(0).wraparound[0]);
        assert!(!model.joint(2).wraparound[0]);
    }

    #[test]
    fn test_size_mismatch() {
        let mut model = chain();
        assert!(matches!(
            model.set_position(&[0.0; 5]),
            Err(Error::SizeMismatchError {
                input: 5,
                required: 6
            })
        ));
        assert!(model.set_acceleration(&[0.0; 6]).is_err());
        assert!(model.set_wraparounds(&[true]).is_err());
        assert!(model.set_home_position(&[0.0; 5]).is_err());
        assert!(model
            .set_gamma_velocity(DMatrix::identity(4, 4))
            .is_err());
    }

    #[test]
    fn test_gamma_inverse() {
        let mut model = chain();
        #[rustfmt::skip]
        let gamma = DMatrix::from_row_slice(5, 5, &[
            2.0, 0.0, 0.0, 0.0, 1.0,
            0.0, 1.0, 0.5, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0, 0.0,
            1.0, 0.0, 0.0, 3.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 1.0,
        ]);
        model.set_gamma_velocity(gamma.clone()).unwrap();
        let product = model.gamma_velocity_inverse() * &gamma;
        assert!((product - DMatrix::<f64>::identity(5, 5)).norm() < 1e-10);

        let yd = [0.1, -0.2, 0.3, 0.0, 1.0];
        model.set_velocity(&yd).unwrap();
        let back = model.velocity();
        for (a, b) in back.iter().zip(yd.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn test_rank_deficient_gamma() {
        let mut model = chain();
        #[rustfmt::skip]
        let gamma = DMatrix::from_row_slice(5, 2, &[
            1.0, 0.0,
            0.0, 0.0,
            0.0, 0.0,
            0.0, 0.0,
            1.0, 0.0,
        ]);
        model.set_gamma_velocity(gamma).unwrap();
        let inverse = model.gamma_velocity_inverse();
        assert_eq!(inverse.shape(), (2, 5));
        assert!(inverse.row(1).iter().all(|v| v.abs() < 1e-12));
        assert!((inverse[(0, 0)] - 0.5).abs() < 1e-12);
        assert!((inverse[(0, 4)] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_coupled_velocity_and_acceleration() {
        let mut model = Model::<f64>::with_seed(3);
        let world = model.add_frame(Frame::world("world")).unwrap();
        let a = model.add_frame(Frame::body("a")).unwrap();
        let b = model.add_frame(Frame::body("b")).unwrap();
        model
            .add_transform(JointBuilder::new().into_transform("ja"), world, a)
            .unwrap();
        model
            .add_transform(JointBuilder::new().into_transform("jb"), a, b)
            .unwrap();
        model.update().unwrap();
        model
            .set_gamma_velocity(DMatrix::from_column_slice(2, 1, &[1.0, 1.0]))
            .unwrap();

        model.set_velocity(&[0.5]).unwrap();
        model.set_acceleration(&[0.5]).unwrap();
        assert_eq!(model.velocity().len(), 1);
        assert_eq!(model.acceleration().len(), 1);
        assert!((model.acceleration()[0] - 0.5).abs() < 1e-12);
        assert_eq!(model.joint(0).acceleration()[0], 0.5);
        assert_eq!(model.joint(1).acceleration()[0], 0.5);
        assert!(matches!(
            model.set_acceleration(&[0.5, 0.5]),
            Err(Error::SizeMismatchError {
                input: 2,
                required: 1
            })
        ));

        // torque stays in joint coordinates
        model.set_torque(&[1.0, 2.0]).unwrap();
        assert_eq!(model.torque().as_slice(), &[1.0, 2.0]);
    }
}
