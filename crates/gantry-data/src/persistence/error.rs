// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use gantry_core::ContraptionError;
use std::fmt;

use super::PersistenceFormat;

/// The underlying failure reported by a serialization backend.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// An error that can occur while saving or restoring a record.
#[derive(Debug)]
pub enum PersistenceError {
    /// The record could not be written.
    Encode {
        /// The target format.
        format: PersistenceFormat,
        /// What the codec reported.
        source: CodecError,
    },
    /// The bytes could not be read as a record.
    Decode {
        /// The source format.
        format: PersistenceFormat,
        /// What the codec reported.
        source: CodecError,
    },
    /// The record was read but describes an impossible structure.
    Invalid(ContraptionError),
    /// The record holds non-finite bounds.
    InvalidBounds,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Encode { format, source } => {
                write!(f, "Failed to encode {format} record: {source}")
            }
            PersistenceError::Decode { format, source } => {
                write!(f, "Failed to decode {format} record: {source}")
            }
            PersistenceError::Invalid(e) => write!(f, "Invalid record: {e}"),
            PersistenceError::InvalidBounds => write!(f, "Invalid record: non-finite bounds"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Encode { source, .. } | PersistenceError::Decode { source, .. } => {
                Some(source.as_ref())
            }
            PersistenceError::Invalid(e) => Some(e),
            PersistenceError::InvalidBounds => None,
        }
    }
}

impl From<ContraptionError> for PersistenceError {
    fn from(e: ContraptionError) -> Self {
        PersistenceError::Invalid(e)
    }
}
