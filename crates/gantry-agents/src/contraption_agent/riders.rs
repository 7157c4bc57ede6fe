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

//! Riders: seated entities and nested structures.

use gantry_core::event::SyncMessage;
use gantry_core::math::{BlockPos, Vec3};
use gantry_core::world::WorldAccess;
use gantry_core::{ContraptionError, EntityId};

use super::entity::ContraptionEntity;

/// What kind of rider an entity is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiderKind {
    /// An ordinary entity sitting on a seat.
    Entity {
        /// Height of the entity's bounding box.
        height: f64,
        /// Vertical offset of the entity when riding.
        riding_offset: f64,
        /// Players cannot be pushed off a seat by another player.
        is_player: bool,
    },
    /// Another moving structure, linked to a cell of this one.
    Contraption,
}

/// An entity riding a structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rider {
    /// The rider's id.
    pub id: EntityId,
    /// What it is.
    pub kind: RiderKind,
}

impl Rider {
    /// A player of the given height.
    pub fn player(id: EntityId, height: f64) -> Self {
        Self {
            id,
            kind: RiderKind::Entity {
                height,
                riding_offset: 0.0,
                is_player: true,
            },
        }
    }

    /// A non-player entity.
    pub fn entity(id: EntityId, height: f64, riding_offset: f64) -> Self {
        Self {
            id,
            kind: RiderKind::Entity {
                height,
                riding_offset,
                is_player: false,
            },
        }
    }

    /// A nested structure.
    pub fn contraption(id: EntityId) -> Self {
        Self {
            id,
            kind: RiderKind::Contraption,
        }
    }

    /// Returns `true` for players.
    pub fn is_player(&self) -> bool {
        matches!(self.kind, RiderKind::Entity { is_player: true, .. })
    }

    /// Returns `true` for nested structures.
    pub fn is_contraption(&self) -> bool {
        self.kind == RiderKind::Contraption
    }
}

impl ContraptionEntity {
    /// Everyone currently riding, in boarding order.
    pub fn passengers(&self) -> &[Rider] {
        &self.passengers
    }

    /// Returns `true` if `id` rides this structure.
    pub fn is_passenger(&self, id: EntityId) -> bool {
        self.passengers.iter().any(|rider| rider.id == id)
    }

    /// Returns `true` if `rider` may board.
    pub fn can_fit_passenger(&self, rider: &Rider) -> bool {
        self.contraption
            .as_ref()
            .is_some_and(|c| c.can_accept_passenger(rider.is_contraption()))
    }

    fn board(&mut self, rider: Rider) {
        match self.passengers.iter_mut().find(|p| p.id == rider.id) {
            Some(existing) => *existing = rider,
            None => self.passengers.push(rider),
        }
    }

    /// Seats `rider` on seat `seat_index` and broadcasts the new seat mapping.
    ///
    /// Whether the seat is already taken is not checked here; see
    /// [`Self::handle_player_interaction`]. A replica only records the rider.
    pub fn add_sitting_passenger(&mut self, rider: Rider, seat_index: usize) -> Result<(), ContraptionError> {
        let contraption = self.contraption.as_mut().ok_or(ContraptionError::InvalidState)?;
        if self.settings.side.is_server() {
            contraption.mount(rider.id, seat_index)?;
            let mapping = contraption.seat_mapping().clone();
            self.board(rider);
            self.broadcast(SyncMessage::SeatMapping {
                driver: self.id,
                mapping,
            });
        } else {
            self.board(rider);
        }
        Ok(())
    }

    /// Links a nested structure riding on the local cell `pos`.
    pub fn attach_sub_contraption(&mut self, id: EntityId, pos: BlockPos) -> Result<(), ContraptionError> {
        let contraption = self.contraption.as_mut().ok_or(ContraptionError::InvalidState)?;
        contraption.link_sub_contraption(id, pos);
        self.board(Rider::contraption(id));
        log::debug!("Nested structure {id} linked at {pos} on {}", self.id);
        Ok(())
    }

    /// Forgets a nested structure that left without going through this one.
    ///
    /// Returns `true` if `id` was linked or riding here.
    pub fn detach_sub_contraption(&mut self, id: EntityId) -> bool {
        let linked = self
            .contraption
            .as_mut()
            .and_then(|c| c.unlink_sub_contraption(id))
            .is_some();
        let before = self.passengers.len();
        self.passengers.retain(|rider| rider.id != id);
        let detached = linked || before != self.passengers.len();
        if detached {
            log::debug!("Nested structure {id} detached from {}", self.id);
        }
        detached
    }

    /// Releases a rider.
    ///
    /// On the authoritative side its dismount location is recorded, its seat freed,
    /// and the new seat mapping broadcast.
    pub fn remove_passenger(&mut self, id: EntityId, world: &mut dyn WorldAccess) -> Result<(), ContraptionError> {
        let index = self
            .passengers
            .iter()
            .position(|rider| rider.id == id)
            .ok_or(ContraptionError::MissingRider(id))?;
        let dismount = self.passenger_position(&self.passengers[index]);
        self.passengers.remove(index);
        if !self.settings.side.is_server() {
            return Ok(());
        }

        if let Some(location) = dismount {
            world.set_dismount_location(id, location);
        }
        if let Some(contraption) = self.contraption.as_mut() {
            contraption.unmount(id);
            let mapping = contraption.seat_mapping().clone();
            self.broadcast(SyncMessage::SeatMapping {
                driver: self.id,
                mapping,
            });
        }
        Ok(())
    }

    pub(super) fn remove_all_passengers(&mut self, world: &mut dyn WorldAccess) {
        let ids: Vec<_> = self.passengers.iter().map(|rider| rider.id).collect();
        for id in ids {
            if let Err(e) = self.remove_passenger(id, world) {
                log::warn!("Driver {}: {e}", self.id);
            }
        }
    }

    /// Where `rider` should be in the world, given its seat or attachment point.
    pub fn passenger_position(&self, rider: &Rider) -> Option<Vec3> {
        let contraption = self.contraption.as_ref()?;
        let transform = self.transform();
        let origin_center = BlockPos::ZERO.center();

        if rider.is_contraption() {
            if let Some(pos) = contraption.sub_contraption_pos(rider.id) {
                return Some(transform.to_global(pos.center()) + origin_center - Vec3::new(0.5, 1.0, 0.5));
            }
        }

        let (height, riding_offset) = match rider.kind {
            RiderKind::Entity {
                height,
                riding_offset,
                ..
            } => (height, riding_offset),
            RiderKind::Contraption => (0.0, 0.0),
        };
        let seat = contraption.seat_of(rider.id)?;
        let seated = seat
            .as_vec3()
            .add_xyz(0.5, riding_offset + height - self.settings.seat_height_offset, 0.5);
        Some(transform.to_global(seated) + origin_center - Vec3::new(0.5, height, 0.5))
    }

    /// Moves every rider to its seat or attachment point.
    pub fn update_passenger_positions(&self, world: &mut dyn WorldAccess) {
        for rider in &self.passengers {
            if let Some(position) = self.passenger_position(rider) {
                world.set_entity_position(rider.id, position);
            }
        }
    }

    /// A player interacts with the local cell `local_pos`.
    ///
    /// Returns `false` if the cell is not a seat or a player already sits there.
    /// Any other occupant is pushed off the seat, then the player takes it.
    pub fn handle_player_interaction(
        &mut self,
        player: Rider,
        local_pos: BlockPos,
        world: &mut dyn WorldAccess,
    ) -> bool {
        let Some(contraption) = self.contraption.as_ref() else {
            return false;
        };
        let Some(seat_index) = contraption.seat_index_at(local_pos) else {
            return false;
        };

        let mut to_dismount = None;
        for (&rider_id, &index) in contraption.seat_mapping() {
            if index != seat_index {
                continue;
            }
            if let Some(rider) = self.passengers.iter().find(|p| p.id == rider_id) {
                if rider.is_player() {
                    return false;
                }
                to_dismount = Some(*rider);
            }
        }

        if !self.settings.side.is_server() {
            return true;
        }

        if let Some(occupant) = to_dismount {
            let position = self.passenger_position(&occupant);
            if let Err(e) = self.remove_passenger(occupant.id, world) {
                log::warn!("Driver {}: {e}", self.id);
            }
            if let Some(position) = position {
                world.set_entity_position(occupant.id, position);
            }
        }

        match self.add_sitting_passenger(player, seat_index) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Driver {}: could not seat {}: {e}", self.id, player.id);
                false
            }
        }
    }
}
