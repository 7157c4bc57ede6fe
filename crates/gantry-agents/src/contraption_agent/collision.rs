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

//! Colliding entities: which entities a structure pushes, and how it moves them.

use gantry_core::math::Vec3;
use gantry_core::world::{EntityKind, EntityView, PushReaction, WorldAccess};
use gantry_core::EntityId;
use gantry_data::ContraptionKind;
use std::collections::{HashMap, HashSet};

use super::entity::ContraptionEntity;

impl ContraptionEntity {
    /// Remembers that `id` touched the structure this tick.
    pub fn record_collision(&mut self, id: EntityId) {
        self.colliding_entities.insert(id, 0);
    }

    /// Entities currently remembered as touching the structure, with the number of
    /// ticks since their last contact.
    pub fn colliding_entities(&self) -> &HashMap<EntityId, u32> {
        &self.colliding_entities
    }

    /// Forgets entities that have not touched the structure for longer than the
    /// configured time to live.
    pub(super) fn age_colliding_entities(&mut self) {
        let ttl = self.settings.colliding_entity_ttl;
        self.colliding_entities.retain(|_, age| {
            *age += 1;
            *age <= ttl
        });
    }

    /// Returns `true` if the structure should push `other` around.
    pub fn can_collide_with(&self, other: &EntityView, world: &dyn WorldAccess) -> bool {
        if other.is_spectator() || other.no_physics {
            return false;
        }
        match other.kind {
            EntityKind::Hanging | EntityKind::Glue | EntityKind::Seat | EntityKind::Projectile => return false,
            // Carts answer only to the mount kind, whoever rides them.
            EntityKind::Minecart => {
                return !self
                    .contraption
                    .as_ref()
                    .is_some_and(|c| c.kind() == ContraptionKind::Mounted);
            }
            EntityKind::Player { .. } | EntityKind::Contraption | EntityKind::Other => {}
        }
        if other.vehicle.is_some() {
            return false;
        }

        // Our own vehicle chain, which may loop in a broken world.
        let mut visited = HashSet::new();
        let mut riding = self.vehicle;
        while let Some(vehicle) = riding {
            if vehicle == other.id {
                return false;
            }
            if !visited.insert(vehicle) {
                break;
            }
            riding = world.vehicle_of(vehicle);
        }

        other.push_reaction == PushReaction::Normal
    }

    /// The velocity the structure imparts at the world point `point` this tick.
    ///
    /// Combines the rotation since the start of the tick with the anchor's
    /// translation. Zero before the first tick.
    pub fn contact_point_motion(&self, point: Vec3) -> Vec3 {
        let Some(prev_anchor) = self.prev_anchor else {
            return Vec3::ZERO;
        };
        let local = self.previous_transform().to_local(point);
        let rotated = self.transform().to_global(local);
        rotated - point + (self.anchor - prev_anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use gantry_core::block::{BlockData, BlockState};
    use gantry_core::math::{BlockPos, RotationState};
    use gantry_core::movement::BehaviourRegistry;
    use gantry_core::SimulationSettings;
    use gantry_data::ContraptionBuilder;
    use std::sync::Arc;

    #[derive(Default)]
    struct Vehicles(HashMap<EntityId, EntityId>);

    impl WorldAccess for Vehicles {
        fn place_block(&mut self, _pos: BlockPos, _state: &BlockState, _data: &BlockData) {}
        fn entity_position(&self, _id: EntityId) -> Option<Vec3> {
            None
        }
        fn set_entity_position(&mut self, _id: EntityId, _pos: Vec3) {}
        fn vehicle_of(&self, id: EntityId) -> Option<EntityId> {
            self.0.get(&id).copied()
        }
    }

    fn driver(kind: ContraptionKind) -> ContraptionEntity {
        let registry = Arc::new(BehaviourRegistry::new());
        let contraption = ContraptionBuilder::new(kind)
            .add_block(BlockPos::ZERO, BlockState::new("planks"))
            .build(&registry)
            .expect("valid structure");
        ContraptionEntity::new(
            EntityId::from_name("driver"),
            contraption,
            Vec3::ZERO,
            registry,
            SimulationSettings::default(),
        )
    }

    #[test]
    fn colliding_entities_expire_after_their_ttl() {
        let mut driver = driver(ContraptionKind::Translating);
        let id = EntityId::from_name("pig");
        driver.record_collision(id);
        for _ in 0..3 {
            driver.age_colliding_entities();
            assert!(driver.colliding_entities().contains_key(&id));
        }
        driver.age_colliding_entities();
        assert!(driver.colliding_entities().is_empty());
    }

    #[test]
    fn filters_attachments_and_riders() {
        let driver = driver(ContraptionKind::Translating);
        let world = Vehicles::default();
        let id = EntityId::from_name("other");

        assert!(driver.can_collide_with(&EntityView::new(id, EntityKind::Other), &world));
        assert!(driver.can_collide_with(&EntityView::new(id, EntityKind::Player { spectator: false }), &world));
        assert!(driver.can_collide_with(&EntityView::new(id, EntityKind::Minecart), &world));
        for kind in [
            EntityKind::Player { spectator: true },
            EntityKind::Hanging,
            EntityKind::Glue,
            EntityKind::Seat,
            EntityKind::Projectile,
        ] {
            assert!(!driver.can_collide_with(&EntityView::new(id, kind), &world), "{kind:?}");
        }

        let mut ghost = EntityView::new(id, EntityKind::Other);
        ghost.no_physics = true;
        assert!(!driver.can_collide_with(&ghost, &world));

        let mut riding = EntityView::new(id, EntityKind::Other);
        riding.vehicle = Some(EntityId::from_name("boat"));
        assert!(!driver.can_collide_with(&riding, &world));

        let mut immovable = EntityView::new(id, EntityKind::Other);
        immovable.push_reaction = PushReaction::Block;
        assert!(!driver.can_collide_with(&immovable, &world));
    }

    #[test]
    fn minecarts_pass_through_mounted_structures() {
        let driver = driver(ContraptionKind::Mounted);
        let cart = EntityView::new(EntityId::from_name("cart"), EntityKind::Minecart);
        assert!(!driver.can_collide_with(&cart, &Vehicles::default()));
    }

    #[test]
    fn minecarts_collide_with_other_structures_even_when_occupied() {
        let translating = driver(ContraptionKind::Translating);
        let mounted = driver(ContraptionKind::Mounted);
        let mut cart = EntityView::new(EntityId::from_name("cart"), EntityKind::Minecart);
        cart.vehicle = Some(EntityId::from_name("train"));
        cart.push_reaction = PushReaction::Ignore;
        assert!(translating.can_collide_with(&cart, &Vehicles::default()));
        assert!(!mounted.can_collide_with(&cart, &Vehicles::default()));
    }

    #[test]
    fn never_collides_with_its_own_vehicle_chain() {
        let mut driver = driver(ContraptionKind::Mounted);
        let cart = EntityId::from_name("cart");
        let train = EntityId::from_name("train");
        driver.set_vehicle(Some(cart));
        let mut world = Vehicles::default();
        world.0.insert(cart, train);
        world.0.insert(train, cart);

        assert!(!driver.can_collide_with(&EntityView::new(train, EntityKind::Other), &world));
        assert!(driver.can_collide_with(&EntityView::new(EntityId::from_name("cow"), EntityKind::Other), &world));
    }

    #[test]
    fn contact_motion_combines_translation_and_rotation() {
        let mut driver = driver(ContraptionKind::Translating);
        let point = Vec3::new(1.5, 0.5, 0.5);
        assert_eq!(driver.contact_point_motion(point), Vec3::ZERO);

        driver.prev_anchor = Some(Vec3::ZERO);
        driver.prev_rotation = RotationState::NONE;
        driver.set_position(Vec3::new(0.0, 0.0, 2.0));
        driver.set_rotation(RotationState::new(0.0, 90.0, 0.0));

        // The point sits one unit east of the pivot; a quarter yaw swings it north.
        let expected = Vec3::new(-1.0, 0.0, 1.0);
        assert_abs_diff_eq!(driver.contact_point_motion(point + Vec3::new(0.0, 0.0, 2.0)), expected, epsilon = 1e-9);
    }
}
