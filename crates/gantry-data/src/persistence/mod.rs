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

//! Persistent records of contraptions and their drivers.
//!
//! A live [`Contraption`](crate::Contraption) is converted to a plain
//! [`ContraptionRecord`] before being written with one of the codecs selected by
//! [`PersistenceFormat`]. Restoring a record re-checks every structural invariant,
//! so a corrupted file never yields a simulatable structure.

mod codec;
mod error;
mod record;

pub use self::codec::{decode, encode};
pub use self::error::{CodecError, PersistenceError};
pub use self::record::{ContraptionEntityRecord, ContraptionRecord};

use serde::{Deserialize, Serialize};

/// The on-disk format of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersistenceFormat {
    /// Compact binary, for saves and network snapshots.
    Binary,
    /// Pretty-printed RON, for humans.
    Readable,
    /// JSON, for tooling.
    Json,
}

impl std::fmt::Display for PersistenceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceFormat::Binary => write!(f, "binary"),
            PersistenceFormat::Readable => write!(f, "RON"),
            PersistenceFormat::Json => write!(f, "JSON"),
        }
    }
}

/// Which parts of a structure a record keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordMode {
    /// Everything, for saving.
    #[default]
    Full,
    /// What a freshly spawned replica needs. Container contents and the actors'
    /// movement history are left out.
    Spawn,
}
