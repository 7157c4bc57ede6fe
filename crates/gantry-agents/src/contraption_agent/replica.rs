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

//! Applying replication messages on the observing side.

use gantry_core::event::SyncMessage;
use gantry_core::world::WorldAccess;

use super::entity::{ContraptionEntity, Lifecycle};

impl ContraptionEntity {
    /// Applies a message sent by the authoritative copy of this driver.
    ///
    /// Messages for other drivers are ignored. A disassembly moves the entities this
    /// replica saw colliding with the structure, then dissolves the replica.
    pub fn apply_sync(&mut self, message: &SyncMessage, world: &mut dyn WorldAccess) {
        if message.driver() != self.id {
            return;
        }
        match message {
            SyncMessage::SeatMapping { mapping, .. } => {
                if let Some(contraption) = self.contraption.as_mut() {
                    contraption.replace_seat_mapping(mapping.clone());
                }
            }
            SyncMessage::StalledFlag { stalled, .. } => {
                self.synced_stalled = *stalled;
            }
            SyncMessage::Stall { position, angle, .. } => {
                self.handle_stall_information(position.x, position.y, position.z, *angle);
            }
            SyncMessage::Disassembly { transform, .. } => {
                self.move_colliding_entities(world, transform);
                self.lifecycle = Lifecycle::Dissolved;
                log::debug!("Replica {} dissolved at {}", self.id, transform.offset);
            }
        }
    }
}
