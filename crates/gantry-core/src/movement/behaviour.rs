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

use super::MovementContext;
use crate::math::{BlockPos, SpatialTransform, Vec3};
use crate::settings::Side;
use crate::world::WorldAccess;

/// What the actor loop should do after a behaviour callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorFlow {
    /// Keep going.
    Continue,
    /// The callback brought the driver down. The loop stops at once and the
    /// structure is stopped and placed back into the world.
    Halt,
}

/// What a behaviour callback gets to see besides its own context.
///
/// The transform is the structure's mapping for the current tick, handed over by
/// value so that nothing outlives the tick.
pub struct MovementFrame<'a> {
    /// The local-to-world mapping of the structure this tick.
    pub transform: SpatialTransform,
    /// The hosting world.
    pub world: &'a mut dyn WorldAccess,
    /// The role of the simulation running the callback.
    pub side: Side,
}

impl MovementFrame<'_> {
    /// Rotates a local direction into world orientation.
    pub fn rotate(&self, local: Vec3) -> Vec3 {
        self.transform.rotate(local)
    }
}

/// How a block reacts to being carried.
///
/// Every callback has a default, so a behaviour only overrides what it needs.
pub trait MovementBehaviour: Send + Sync {
    /// Returns `false` to skip this actor entirely for the current tick.
    fn is_active(&self, _ctx: &MovementContext) -> bool {
        true
    }

    /// Offset from the actor's cell centre to the point that is tracked.
    fn active_area_offset(&self, _ctx: &MovementContext) -> Vec3 {
        Vec3::ZERO
    }

    /// Called once, when the structure starts moving.
    fn start_moving(&self, _ctx: &mut MovementContext) {}

    /// Called when the actor enters a new world cell.
    fn visit_new_position(
        &self,
        _ctx: &mut MovementContext,
        _pos: BlockPos,
        _frame: &mut MovementFrame<'_>,
    ) -> ActorFlow {
        ActorFlow::Continue
    }

    /// Called when the actor's motion differs from the previous tick.
    fn on_speed_changed(
        &self,
        _ctx: &mut MovementContext,
        _old_motion: Vec3,
        _new_motion: Vec3,
        _frame: &mut MovementFrame<'_>,
    ) -> ActorFlow {
        ActorFlow::Continue
    }

    /// Called every tick while the actor is active.
    fn tick(&self, _ctx: &mut MovementContext, _frame: &mut MovementFrame<'_>) -> ActorFlow {
        ActorFlow::Continue
    }

    /// Called when the structure stops.
    fn stop_moving(&self, _ctx: &mut MovementContext) {}
}
