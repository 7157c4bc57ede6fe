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

//! The per-tick actor loop.

use gantry_core::event::SyncMessage;
use gantry_core::math::{BlockPos, SpatialTransform, Vec3};
use gantry_core::movement::{ActorFlow, MovementContext, MovementFrame};
use gantry_core::world::WorldAccess;
use gantry_core::ContraptionError;
use std::sync::Arc;

use super::entity::{ContraptionEntity, SubContraptions, TickOutcome};

impl ContraptionEntity {
    /// Runs every actor once, in structure order, then settles the stalled flag.
    pub(super) fn tick_actors(
        &mut self,
        world: &mut dyn WorldAccess,
        subs: &mut dyn SubContraptions,
    ) -> TickOutcome {
        let transform = self.transform();
        let registry = Arc::clone(&self.registry);
        let side = self.settings.side;
        let Some(contraption) = self.contraption.as_mut() else {
            return TickOutcome::Removed;
        };

        let stalled_previously = contraption.stalled;
        if side.is_server() {
            contraption.stalled = false;
        }

        self.ticking = true;
        let mut any_stall = false;
        let mut halted = false;
        for ctx in contraption.actors_mut() {
            let Some(behaviour) = registry.resolve(&ctx.state) else {
                continue;
            };

            let old_motion = ctx.motion;
            let actor_position =
                transform.to_global(ctx.local_pos.center() + behaviour.active_area_offset(ctx));
            let grid_position = BlockPos::containing(actor_position);
            let new_pos_visited =
                !ctx.stall && should_actor_trigger(ctx, &transform, actor_position, grid_position);
            ctx.position = Some(actor_position);

            if !behaviour.is_active(ctx) {
                continue;
            }
            log::trace!("Actor {} at {grid_position}", ctx.local_pos);

            let mut frame = MovementFrame {
                transform,
                world: &mut *world,
                side,
            };
            if new_pos_visited && !ctx.stall {
                if behaviour.visit_new_position(ctx, grid_position, &mut frame) == ActorFlow::Halt {
                    halted = true;
                    break;
                }
                ctx.first_movement = false;
            }
            if old_motion != ctx.motion {
                let new_motion = ctx.motion;
                if behaviour.on_speed_changed(ctx, old_motion, new_motion, &mut frame) == ActorFlow::Halt {
                    halted = true;
                    break;
                }
            }
            if behaviour.tick(ctx, &mut frame) == ActorFlow::Halt {
                halted = true;
                break;
            }
            any_stall |= ctx.stall;
        }
        contraption.stalled |= any_stall;

        if halted {
            log::warn!("Driver {}: {}", self.id, ContraptionError::DeadDuringCallback);
            self.halt(world, subs);
            return TickOutcome::Halted;
        }
        self.ticking = false;

        let nested_stalled = {
            let contraption = self.contraption.as_ref();
            self.passengers
                .iter()
                .filter(|rider| rider.is_contraption())
                .filter(|rider| contraption.is_some_and(|c| c.sub_contraption_pos(rider.id).is_some()))
                .any(|rider| subs.is_stalled(rider.id))
        };

        let Some(contraption) = self.contraption.as_mut() else {
            return TickOutcome::Ticked;
        };
        if nested_stalled {
            contraption.stalled = true;
        }

        if side.is_server() {
            let stalled = contraption.stalled;
            if !stalled_previously && stalled {
                self.on_contraption_stalled();
            }
            if self.synced_stalled != stalled {
                self.synced_stalled = stalled;
                self.broadcast(SyncMessage::StalledFlag {
                    driver: self.id,
                    stalled,
                });
            }
        } else {
            contraption.stalled = self.synced_stalled;
        }
        TickOutcome::Ticked
    }

    fn on_contraption_stalled(&self) {
        log::debug!("Driver {} stalled at {:?}", self.id, self.anchor);
        self.broadcast(SyncMessage::Stall {
            driver: self.id,
            position: self.anchor,
            angle: self.stalled_angle(),
        });
    }
}

/// Updates the actor's motion and decides whether it entered a new cell.
///
/// An actor triggers when its cell changed since the last tick, or when it is still
/// waiting for its first movement and has moved at all.
fn should_actor_trigger(
    ctx: &mut MovementContext,
    transform: &SpatialTransform,
    actor_position: Vec3,
    grid_position: BlockPos,
) -> bool {
    let Some(previous_position) = ctx.position else {
        return false;
    };

    ctx.motion = actor_position - previous_position;
    ctx.relative_motion = transform.reverse_rotate(ctx.motion);
    BlockPos::containing(previous_position) != grid_position
        || ctx.relative_motion.length() > 0.0 && ctx.first_movement
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::block::BlockState;
    use gantry_core::math::RotationState;

    fn ctx_at(position: Option<Vec3>) -> MovementContext {
        let mut ctx = MovementContext::new(BlockPos::ZERO, BlockState::new("drill"));
        ctx.position = position;
        ctx
    }

    fn identity() -> SpatialTransform {
        SpatialTransform::new(Vec3::ZERO, &RotationState::NONE, Vec3::splat(0.5))
    }

    #[test]
    fn never_triggers_before_a_position_is_known() {
        let mut ctx = ctx_at(None);
        let here = Vec3::new(0.5, 0.5, 0.5);
        assert!(!should_actor_trigger(&mut ctx, &identity(), here, BlockPos::containing(here)));
        assert_eq!(ctx.motion, Vec3::ZERO);
    }

    #[test]
    fn first_motion_inside_a_cell_triggers() {
        let mut ctx = ctx_at(Some(Vec3::new(0.5, 0.5, 0.5)));
        let here = Vec3::new(0.6, 0.5, 0.5);
        assert!(should_actor_trigger(&mut ctx, &identity(), here, BlockPos::containing(here)));
        assert!(ctx.motion.x > 0.0);

        ctx.first_movement = false;
        ctx.position = Some(here);
        let next = Vec3::new(0.7, 0.5, 0.5);
        assert!(!should_actor_trigger(&mut ctx, &identity(), next, BlockPos::containing(next)));
    }

    #[test]
    fn first_movement_without_motion_does_not_trigger() {
        let here = Vec3::new(0.5, 0.5, 0.5);
        let mut ctx = ctx_at(Some(here));
        assert!(!should_actor_trigger(&mut ctx, &identity(), here, BlockPos::containing(here)));
    }

    #[test]
    fn crossing_a_cell_boundary_triggers() {
        let mut ctx = ctx_at(Some(Vec3::new(0.9, 0.5, 0.5)));
        ctx.first_movement = false;
        let here = Vec3::new(1.1, 0.5, 0.5);
        assert!(should_actor_trigger(&mut ctx, &identity(), here, BlockPos::containing(here)));
    }

    #[test]
    fn relative_motion_is_in_local_orientation() {
        let transform = SpatialTransform::new(Vec3::ZERO, &RotationState::new(0.0, 90.0, 0.0), Vec3::splat(0.5));
        let mut ctx = ctx_at(Some(Vec3::new(0.5, 0.5, 0.5)));
        let here = Vec3::new(0.5, 0.5, 0.25);
        should_actor_trigger(&mut ctx, &transform, here, BlockPos::containing(here));
        approx::assert_abs_diff_eq!(ctx.relative_motion, Vec3::new(0.25, 0.0, 0.0), epsilon = 1e-12);
    }
}
