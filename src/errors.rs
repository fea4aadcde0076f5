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
use thiserror::Error;

/// The reason of the failure of a model operation
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("size mismatch input = {input}, required = {required}")]
    SizeMismatchError { input: usize, required: usize },
    #[error("model has no world frame at its root")]
    NoWorldError,
    #[error("world frame {name} added while another world is the root")]
    MultipleWorldsError { name: String },
    #[error("frame not found in the model")]
    FrameNotFoundError,
    #[error("transform not found in the model")]
    TransformNotFoundError,
    #[error("frame {frame} breaks the tree structure: {message}")]
    NotTreeError { frame: String, message: String },
    #[error("transform is not Denavit-Hartenberg representable, (2, 0) = {value}")]
    NotDenavitHartenbergError { value: f64 },
    #[error("failed to compute pseudo inverse: {0}")]
    PseudoInverseError(String),
}

pub(crate) fn check_size(input: usize, required: usize) -> Result<(), Error> {
    if input != required {
        return Err(Error::SizeMismatchError { input, required });
    }
    Ok(())
}

#[test]
fn test_error_message() {
    let err = Error::SizeMismatchError {
        input: 3,
        required: 2,
    };
    assert_eq!(err.to_string(), "size mismatch input = 3, required = 2");
}
