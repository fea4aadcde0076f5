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
use crate::errors::*;
use na::{Matrix4, RealField};
use nalgebra as na;
use simba::scalar::SubsetOf;

/// Denavit-Hartenberg link parameters in the Paul convention
#[derive(Copy, Debug, Clone, PartialEq)]
pub struct DenavitHartenberg<T: RealField> {
    /// translation along z
    pub d: T,
    /// rotation around z
    pub theta: T,
    /// translation along x
    pub a: T,
    /// rotation around x (link twist)
    pub alpha: T,
}

impl<T> DenavitHartenberg<T>
where
    T: RealField + Copy,
{
    pub fn new(d: T, theta: T, a: T, alpha: T) -> Self {
        Self { d, theta, a, alpha }
    }

    /// Build the homogeneous transform of these parameters
    ///
    /// # Examples
    ///
    /// ```
    /// let dh = kmodel::DenavitHartenberg::new(0.1, 0.0, 0.5, 0.0);
    /// let m = dh.to_homogeneous();
    /// assert_eq!(m[(0, 3)], 0.5);
    /// assert_eq!(m[(2, 3)], 0.1);
    /// ```
    pub fn to_homogeneous(&self) -> Matrix4<T> {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_alpha, cos_alpha) = self.alpha.sin_cos();
        let zero = T::zero();
        #[rustfmt::skip]
        let m = Matrix4::new(
            cos_theta, -cos_alpha * sin_theta, sin_alpha * sin_theta, self.a * cos_theta,
            sin_theta, cos_alpha * cos_theta, -sin_alpha * cos_theta, self.a * sin_theta,
            zero, sin_alpha, cos_alpha, self.d,
            zero, zero, zero, T::one(),
        );
        m
    }
}

impl<T> DenavitHartenberg<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    /// Extract the parameters from a homogeneous transform
    ///
    /// The (2, 0) entry must be within machine epsilon of zero, otherwise the
    /// transform has no Denavit-Hartenberg representation and this fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use kmodel::DenavitHartenberg;
    ///
    /// let dh = DenavitHartenberg::<f64>::new(0.2, 0.3, 0.5, -1.0);
    /// let back = DenavitHartenberg::from_homogeneous(&dh.to_homogeneous()).unwrap();
    /// assert!((back.a - 0.5).abs() < 1e-12);
    /// assert!((back.alpha + 1.0).abs() < 1e-12);
    ///
    /// let tilted = nalgebra::UnitQuaternion::from_euler_angles(0.0, 0.5, 0.0).to_homogeneous();
    /// assert!(DenavitHartenberg::from_homogeneous(&tilted).is_err());
    /// ```
    pub fn from_homogeneous(m: &Matrix4<T>) -> Result<Self, Error> {
        let eps = T::default_epsilon();
        if m[(2, 0)].abs() > eps {
            return Err(Error::NotDenavitHartenbergError {
                value: na::convert(m[(2, 0)]),
            });
        }
        let half: T = na::convert(0.5);
        let d = m[(2, 3)];
        let theta = m[(1, 0)].atan2(m[(0, 0)]);
        let a = if m[(0, 0)].abs() <= eps {
            m[(1, 3)] / m[(1, 0)]
        } else if m[(1, 0)].abs() <= eps {
            m[(0, 3)] / m[(0, 0)]
        } else {
            (m[(1, 3)] / m[(1, 0)] + m[(0, 3)] / m[(0, 0)]) * half
        };
        let alpha = m[(2, 1)].atan2(m[(2, 2)]);
        Ok(Self { d, theta, a, alpha })
    }
}
