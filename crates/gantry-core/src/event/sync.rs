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

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entity::EntityId;
use crate::math::{StructureTransform, Vec3};

/// A message sent from the authoritative driver to the replicas tracking it.
///
/// Every message carries full state, never a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncMessage {
    /// The complete seat mapping after a change.
    SeatMapping {
        /// The driver the mapping belongs to.
        driver: EntityId,
        /// Rider to seat index.
        mapping: BTreeMap<EntityId, usize>,
    },
    /// The stalled flag, sent whenever it differs from the last sent value.
    StalledFlag {
        /// The driver.
        driver: EntityId,
        /// Whether the structure is stalled.
        stalled: bool,
    },
    /// One-time notification that the structure just stalled.
    Stall {
        /// The driver.
        driver: EntityId,
        /// The anchor at the moment of stalling.
        position: Vec3,
        /// The angle the structure stalled at, in degrees.
        angle: f64,
    },
    /// The structure was placed into the world with this transform.
    Disassembly {
        /// The driver.
        driver: EntityId,
        /// The placement applied to every block.
        transform: StructureTransform,
    },
}

impl SyncMessage {
    /// The driver this message is about.
    pub fn driver(&self) -> EntityId {
        match self {
            SyncMessage::SeatMapping { driver, .. }
            | SyncMessage::StalledFlag { driver, .. }
            | SyncMessage::Stall { driver, .. }
            | SyncMessage::Disassembly { driver, .. } => *driver,
        }
    }
}
