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

//! Turning a moving structure back into world blocks.

use gantry_core::event::SyncMessage;
use gantry_core::math::{StructureTransform, Vec3};
use gantry_core::world::WorldAccess;

use super::entity::{ContraptionEntity, Lifecycle, SubContraptions};

impl ContraptionEntity {
    /// Places the structure into the world and releases everything it carries.
    ///
    /// Runs as one synchronous step: the driver leaves the simulation, the placement
    /// is broadcast, blocks are placed, seated riders are re-seated on their placed
    /// seats, nested structures are disassembled where they land, every rider is
    /// released, and colliding entities are moved along with the blocks.
    ///
    /// Returns the placement used, or `None` if there was nothing to do: the driver
    /// is already gone, has no structure, or is a replica.
    pub fn disassemble(
        &mut self,
        world: &mut dyn WorldAccess,
        subs: &mut dyn SubContraptions,
    ) -> Option<StructureTransform> {
        if !self.is_alive() || self.contraption.is_none() {
            return None;
        }
        if !self.settings.side.is_server() {
            log::debug!("Replica {} ignores disassembly; waiting for the server", self.id);
            return None;
        }

        self.mark_removed();

        let transform =
            StructureTransform::from_rotation_state(self.anchor, &self.rotation, self.settings.rotation_pivot);
        self.broadcast(SyncMessage::Disassembly {
            driver: self.id,
            transform,
        });

        let (placed, nested) = match self.contraption.as_ref() {
            Some(contraption) => {
                let placed = contraption.add_blocks_to_world(world, &transform);
                contraption.add_passengers_to_world(world, &transform);
                let nested: Vec<_> = self
                    .passengers
                    .iter()
                    .filter(|rider| rider.is_contraption())
                    .filter_map(|rider| {
                        contraption
                            .sub_contraption_pos(rider.id)
                            .map(|connected| (rider.id, transform.apply_block(connected).as_vec3()))
                    })
                    .collect();
                (placed, nested)
            }
            None => (0, Vec::new()),
        };

        for (id, anchor) in nested {
            subs.disassemble_at(world, id, anchor);
        }

        self.remove_all_passengers(world);
        self.move_colliding_entities(world, &transform);

        self.lifecycle = Lifecycle::Dissolved;
        log::info!("Driver {} disassembled: {placed} blocks placed at {}", self.id, transform.offset);
        Some(transform)
    }

    /// Moves every colliding entity by the same placement as the blocks, lifted a
    /// little so they do not end up inside them.
    pub(super) fn move_colliding_entities(&self, world: &mut dyn WorldAccess, transform: &StructureTransform) {
        let previous = self.previous_transform();
        let lift = Vec3::new(0.0, self.settings.disassembly_lift, 0.0);
        for &id in self.colliding_entities.keys() {
            let Some(position) = world.entity_position(id) else {
                continue;
            };
            let placed = transform.apply_vec(previous.to_local(position));
            world.set_entity_position(id, placed + lift);
        }
    }

    /// Handles a behaviour bringing the driver down mid-tick.
    pub(super) fn halt(&mut self, world: &mut dyn WorldAccess, subs: &mut dyn SubContraptions) {
        if self.settings.side.is_server() {
            self.disassemble(world, subs);
        }
        self.remove();
        if let Some(contraption) = self.contraption.as_mut() {
            contraption.stop(&self.registry);
        }
        self.ticking = false;
    }
}
