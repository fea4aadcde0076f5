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
use std::fmt::{self, Display};

/// Measurement unit of a single joint coordinate
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Units {
    /// dimensionless, e.g. a quaternion component
    None,
    Meter,
    MeterPerSecond,
    MeterPerSecondSquared,
    Newton,
    Newtonmeter,
    Radian,
    RadianPerSecond,
    RadianPerSecondSquared,
}

impl Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Units::None => "",
            Units::Meter => "m",
            Units::MeterPerSecond => "m/s",
            Units::MeterPerSecondSquared => "m/s²",
            Units::Newton => "N",
            Units::Newtonmeter => "N·m",
            Units::Radian => "rad",
            Units::RadianPerSecond => "rad/s",
            Units::RadianPerSecondSquared => "rad/s²",
        };
        f.write_str(s)
    }
}
