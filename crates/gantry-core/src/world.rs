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

//! Contracts between the simulation and the world hosting it.
//!
//! The simulation never owns world state. It reads entity information and writes
//! block placements and entity positions through [`WorldAccess`], which the host
//! implements.

use serde::{Deserialize, Serialize};

use crate::block::{BlockData, BlockState};
use crate::entity::EntityId;
use crate::math::{BlockPos, Vec3};

/// The world placement service.
pub trait WorldAccess {
    /// Places a block at a world cell.
    fn place_block(&mut self, pos: BlockPos, state: &BlockState, data: &BlockData);

    /// Returns the position of an entity, if it exists.
    fn entity_position(&self, id: EntityId) -> Option<Vec3>;

    /// Moves an entity.
    fn set_entity_position(&mut self, id: EntityId, pos: Vec3);

    /// Records where a rider should be put once it leaves its seat.
    fn set_dismount_location(&mut self, _id: EntityId, _pos: Vec3) {}

    /// Seats an entity on the seat block placed at `pos`.
    fn seat_entity(&mut self, id: EntityId, pos: BlockPos) {
        self.set_entity_position(id, pos.as_vec3().add_xyz(0.5, 0.0, 0.5));
    }

    /// Returns the entity `id` is riding, if any.
    fn vehicle_of(&self, id: EntityId) -> Option<EntityId>;
}

/// How an entity reacts to being pushed by a moving structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PushReaction {
    /// Pushed along.
    #[default]
    Normal,
    /// Destroyed on contact.
    Destroy,
    /// Blocks the structure.
    Block,
    /// Not affected.
    Ignore,
    /// Only pushed, never carried.
    PushOnly,
}

/// The broad category of an entity, as far as collision filtering cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A player.
    Player {
        /// Spectating players never collide.
        spectator: bool,
    },
    /// A decorative entity hanging on a block face.
    Hanging,
    /// A rail vehicle.
    Minecart,
    /// A structural glue marker.
    Glue,
    /// A seat marker.
    Seat,
    /// A projectile.
    Projectile,
    /// Another moving structure.
    Contraption,
    /// Anything else.
    Other,
}

/// A read-only view of an entity, handed to the collision filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    /// The entity's id.
    pub id: EntityId,
    /// The entity's category.
    pub kind: EntityKind,
    /// Whether the entity opted out of physics.
    pub no_physics: bool,
    /// The entity it rides, if any.
    pub vehicle: Option<EntityId>,
    /// How it reacts to pushes.
    pub push_reaction: PushReaction,
}

impl EntityView {
    /// A physical, unmounted entity of the given kind.
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            no_physics: false,
            vehicle: None,
            push_reaction: PushReaction::Normal,
        }
    }

    /// Returns `true` for a spectating player.
    pub fn is_spectator(&self) -> bool {
        matches!(self.kind, EntityKind::Player { spectator: true })
    }
}
