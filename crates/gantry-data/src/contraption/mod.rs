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

//! The assembled structure: its members, actors, seats and riders.
//!
//! A [`Contraption`] is owned exclusively by the driver moving it. It knows nothing
//! about where it is in the world; every world-space question goes through the
//! transforms the driver hands in.

mod builder;
mod kind;

pub use self::builder::ContraptionBuilder;
pub use self::kind::ContraptionKind;

use gantry_core::block::{BlockData, BlockState};
use gantry_core::math::{Aabb, BlockPos, StructureTransform};
use gantry_core::movement::{BehaviourRegistry, MovementContext};
use gantry_core::world::WorldAccess;
use gantry_core::{ContraptionError, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One cell of a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockMember {
    /// Position relative to the structure's local origin.
    pub pos: BlockPos,
    /// The block type and orientation.
    pub state: BlockState,
    /// Auxiliary data, such as container contents.
    pub data: BlockData,
}

impl BlockMember {
    /// Creates a member without auxiliary data.
    pub fn new(pos: BlockPos, state: BlockState) -> Self {
        Self {
            pos,
            state,
            data: BlockData::default(),
        }
    }

    /// Attaches auxiliary data.
    pub fn with_data(mut self, data: BlockData) -> Self {
        self.data = data;
        self
    }
}

/// An assembled rigid cluster of blocks, with its actors and riders.
///
/// Invariants, checked whenever a contraption is built or restored:
/// - every actor sits on a member cell;
/// - every seat sits on a member cell;
/// - the seat mapping never holds more entries than there are seats, and every
///   mapped index is a valid seat.
#[derive(Debug, Clone, PartialEq)]
pub struct Contraption {
    kind: ContraptionKind,
    members: BTreeMap<BlockPos, BlockMember>,
    actors: Vec<MovementContext>,
    seats: Vec<BlockPos>,
    seat_mapping: BTreeMap<EntityId, usize>,
    stabilized_sub_contraptions: BTreeMap<EntityId, BlockPos>,
    bounds: Aabb,
    /// `true` while an actor, or a nested structure riding this one, is blocked.
    pub stalled: bool,
}

impl Contraption {
    pub(crate) fn from_parts(
        kind: ContraptionKind,
        members: BTreeMap<BlockPos, BlockMember>,
        actors: Vec<MovementContext>,
        seats: Vec<BlockPos>,
        bounds: Aabb,
    ) -> Result<Self, ContraptionError> {
        let contraption = Self {
            kind,
            members,
            actors,
            seats,
            seat_mapping: BTreeMap::new(),
            stabilized_sub_contraptions: BTreeMap::new(),
            bounds,
            stalled: false,
        };
        contraption.validate()?;
        Ok(contraption)
    }

    /// Checks the structural invariants.
    pub fn validate(&self) -> Result<(), ContraptionError> {
        if let Some(actor) = self
            .actors
            .iter()
            .find(|ctx| !self.members.contains_key(&ctx.local_pos))
        {
            return Err(ContraptionError::InvalidActor {
                pos: actor.local_pos,
            });
        }
        if let Some(seat) = self.seats.iter().find(|pos| !self.members.contains_key(pos)) {
            return Err(ContraptionError::MissingSeat(*seat));
        }
        if self.seat_mapping.len() > self.seats.len() {
            return Err(ContraptionError::SeatsFull);
        }
        if let Some(&index) = self.seat_mapping.values().find(|&&i| i >= self.seats.len()) {
            return Err(ContraptionError::SeatOutOfRange {
                index,
                seats: self.seats.len(),
            });
        }
        Ok(())
    }

    /// How the structure is moved.
    pub fn kind(&self) -> ContraptionKind {
        self.kind
    }

    /// All members, keyed by local position.
    pub fn members(&self) -> &BTreeMap<BlockPos, BlockMember> {
        &self.members
    }

    /// The member at a local position.
    pub fn member(&self, pos: BlockPos) -> Option<&BlockMember> {
        self.members.get(&pos)
    }

    /// The actors, in processing order.
    pub fn actors(&self) -> &[MovementContext] {
        &self.actors
    }

    /// Mutable access to the actors, in processing order.
    pub fn actors_mut(&mut self) -> &mut [MovementContext] {
        &mut self.actors
    }

    /// Local positions of the seats, by seat index.
    pub fn seats(&self) -> &[BlockPos] {
        &self.seats
    }

    /// The bounding box in local space.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    // --- Seats ---

    /// The current rider to seat index mapping.
    pub fn seat_mapping(&self) -> &BTreeMap<EntityId, usize> {
        &self.seat_mapping
    }

    /// Records that `rider` sits on seat `seat_index`.
    ///
    /// This is an upsert: whether the seat is already taken by someone else is for
    /// the caller to check beforehand. It only refuses indices that do not exist and
    /// new riders once every seat is mapped.
    pub fn mount(&mut self, rider: EntityId, seat_index: usize) -> Result<(), ContraptionError> {
        if seat_index >= self.seats.len() {
            return Err(ContraptionError::SeatOutOfRange {
                index: seat_index,
                seats: self.seats.len(),
            });
        }
        if !self.seat_mapping.contains_key(&rider) && self.seat_mapping.len() >= self.seats.len() {
            return Err(ContraptionError::SeatsFull);
        }
        self.seat_mapping.insert(rider, seat_index);
        log::debug!("Rider {rider} mounted on seat {seat_index}");
        Ok(())
    }

    /// Removes `rider` from the seat mapping, returning the seat it held.
    pub fn unmount(&mut self, rider: EntityId) -> Option<usize> {
        let seat = self.seat_mapping.remove(&rider);
        if let Some(index) = seat {
            log::debug!("Rider {rider} left seat {index}");
        }
        seat
    }

    /// Replaces the whole seat mapping, dropping entries that point at no seat.
    pub fn replace_seat_mapping(&mut self, mapping: BTreeMap<EntityId, usize>) {
        let seats = self.seats.len();
        self.seat_mapping = mapping
            .into_iter()
            .filter(|&(rider, index)| {
                let valid = index < seats;
                if !valid {
                    log::warn!("Dropping rider {rider} mapped to missing seat {index}");
                }
                valid
            })
            .take(seats)
            .collect();
    }

    /// Returns `true` if another rider may board.
    ///
    /// Nested structures attach through a separate link and are always accepted.
    pub fn can_accept_passenger(&self, is_nested_contraption: bool) -> bool {
        is_nested_contraption || self.seat_mapping.len() < self.seats.len()
    }

    /// The seat index held by `rider`.
    pub fn seat_index_of(&self, rider: EntityId) -> Option<usize> {
        self.seat_mapping.get(&rider).copied()
    }

    /// The local seat position held by `rider`.
    pub fn seat_of(&self, rider: EntityId) -> Option<BlockPos> {
        self.seat_index_of(rider)
            .and_then(|index| self.seats.get(index).copied())
    }

    /// The seat index at a local position.
    pub fn seat_index_at(&self, pos: BlockPos) -> Option<usize> {
        self.seats.iter().position(|&seat| seat == pos)
    }

    /// The rider sitting on seat `index`.
    pub fn rider_at_seat(&self, index: usize) -> Option<EntityId> {
        self.seat_mapping
            .iter()
            .find_map(|(&rider, &seat)| (seat == index).then_some(rider))
    }

    // --- Nested structures ---

    /// Links a nested structure riding this one at a local position.
    pub fn link_sub_contraption(&mut self, rider: EntityId, pos: BlockPos) {
        self.stabilized_sub_contraptions.insert(rider, pos);
    }

    /// Unlinks a nested structure, returning where it was attached.
    pub fn unlink_sub_contraption(&mut self, rider: EntityId) -> Option<BlockPos> {
        self.stabilized_sub_contraptions.remove(&rider)
    }

    /// Where a nested structure is attached, if `rider` is one.
    pub fn sub_contraption_pos(&self, rider: EntityId) -> Option<BlockPos> {
        self.stabilized_sub_contraptions.get(&rider).copied()
    }

    /// Every nested structure and its attachment point.
    pub fn stabilized_sub_contraptions(&self) -> &BTreeMap<EntityId, BlockPos> {
        &self.stabilized_sub_contraptions
    }

    // --- Lifecycle ---

    /// Notifies every actor that the structure starts moving.
    pub fn start_moving(&mut self, registry: &BehaviourRegistry) {
        for ctx in &mut self.actors {
            if let Some(behaviour) = registry.resolve(&ctx.state) {
                behaviour.start_moving(ctx);
            }
        }
    }

    /// Notifies every actor that the structure stops.
    pub fn stop(&mut self, registry: &BehaviourRegistry) {
        for ctx in &mut self.actors {
            if let Some(behaviour) = registry.resolve(&ctx.state) {
                behaviour.stop_moving(ctx);
            }
        }
        log::debug!("Stopped {} actors", self.actors.len());
    }

    /// Places every member into the world, returning how many were placed.
    pub fn add_blocks_to_world(
        &self,
        world: &mut dyn WorldAccess,
        transform: &StructureTransform,
    ) -> usize {
        for member in self.members.values() {
            world.place_block(
                transform.apply_block(member.pos),
                &member.state.rotated(transform),
                &member.data,
            );
        }
        self.members.len()
    }

    /// Seats every seated rider on its placed seat, returning who was seated.
    ///
    /// Nested structures are left alone.
    pub fn add_passengers_to_world(
        &self,
        world: &mut dyn WorldAccess,
        transform: &StructureTransform,
    ) -> Vec<EntityId> {
        let mut seated = Vec::new();
        for (&rider, &index) in &self.seat_mapping {
            if self.stabilized_sub_contraptions.contains_key(&rider) {
                continue;
            }
            let Some(&seat) = self.seats.get(index) else {
                continue;
            };
            world.seat_entity(rider, transform.apply_block(seat));
            seated.push(rider);
        }
        seated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::math::{RotationState, Vec3};
    use gantry_core::movement::MovementBehaviour;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn seated_cart() -> Contraption {
        let mut builder = ContraptionBuilder::new(ContraptionKind::Translating);
        builder
            .add_block(BlockPos::new(0, 0, 0), BlockState::new("planks"))
            .add_block(BlockPos::new(1, 0, 0), BlockState::new("seat"))
            .add_block(BlockPos::new(2, 0, 0), BlockState::new("seat"))
            .add_seat(BlockPos::new(1, 0, 0))
            .add_seat(BlockPos::new(2, 0, 0));
        builder.build(&BehaviourRegistry::new()).expect("valid structure")
    }

    #[derive(Default)]
    struct Placements(Vec<(BlockPos, BlockState)>, Vec<(EntityId, BlockPos)>);

    impl WorldAccess for Placements {
        fn place_block(&mut self, pos: BlockPos, state: &BlockState, _data: &BlockData) {
            self.0.push((pos, state.clone()));
        }
        fn entity_position(&self, _id: EntityId) -> Option<Vec3> {
            None
        }
        fn set_entity_position(&mut self, _id: EntityId, _pos: Vec3) {}
        fn seat_entity(&mut self, id: EntityId, pos: BlockPos) {
            self.1.push((id, pos));
        }
        fn vehicle_of(&self, _id: EntityId) -> Option<EntityId> {
            None
        }
    }

    #[test]
    fn mapping_never_outgrows_seats() {
        let mut cart = seated_cart();
        let riders: Vec<_> = (0..4).map(|i| EntityId::from_name(&format!("r{i}"))).collect();

        assert!(cart.mount(riders[0], 0).is_ok());
        assert!(cart.mount(riders[1], 1).is_ok());
        assert_eq!(cart.mount(riders[2], 0), Err(ContraptionError::SeatsFull));
        assert_eq!(
            cart.mount(riders[3], 7),
            Err(ContraptionError::SeatOutOfRange { index: 7, seats: 2 })
        );
        assert!(cart.seat_mapping().len() <= cart.seats().len());

        // Moving an existing rider is always allowed.
        assert!(cart.mount(riders[0], 1).is_ok());
        assert_eq!(cart.seat_mapping().len(), 2);
    }

    #[test]
    fn unmount_is_benign_for_strangers() {
        let mut cart = seated_cart();
        let rider = EntityId::from_name("rider");
        assert_eq!(cart.unmount(rider), None);
        cart.mount(rider, 1).expect("free seat");
        assert_eq!(cart.seat_of(rider), Some(BlockPos::new(2, 0, 0)));
        assert_eq!(cart.rider_at_seat(1), Some(rider));
        assert_eq!(cart.unmount(rider), Some(1));
        assert_eq!(cart.rider_at_seat(1), None);
    }

    #[test]
    fn nested_structures_are_always_accepted() {
        let mut cart = seated_cart();
        cart.mount(EntityId::from_name("a"), 0).expect("free seat");
        cart.mount(EntityId::from_name("b"), 1).expect("free seat");
        assert!(!cart.can_accept_passenger(false));
        assert!(cart.can_accept_passenger(true));
    }

    #[test]
    fn replace_seat_mapping_drops_missing_seats() {
        let mut cart = seated_cart();
        let mapping = BTreeMap::from([
            (EntityId::from_name("a"), 0),
            (EntityId::from_name("b"), 9),
        ]);
        cart.replace_seat_mapping(mapping);
        assert_eq!(cart.seat_mapping().len(), 1);
        assert_eq!(cart.seat_index_of(EntityId::from_name("a")), Some(0));
        assert!(cart.validate().is_ok());
    }

    #[test]
    fn blocks_and_riders_follow_the_placement() {
        let mut cart = seated_cart();
        let rider = EntityId::from_name("rider");
        let nested = EntityId::from_name("nested");
        cart.mount(rider, 0).expect("free seat");
        cart.link_sub_contraption(nested, BlockPos::new(0, 1, 0));

        let transform = StructureTransform::from_rotation_state(
            Vec3::new(10.0, 64.0, 10.0),
            &RotationState::NONE,
            Vec3::splat(0.5),
        );
        let mut world = Placements::default();
        assert_eq!(cart.add_blocks_to_world(&mut world, &transform), 3);
        let placed: Vec<_> = world.0.iter().map(|(pos, _)| *pos).collect();
        assert_eq!(
            placed,
            vec![BlockPos::new(10, 64, 10), BlockPos::new(11, 64, 10), BlockPos::new(12, 64, 10)]
        );

        assert_eq!(cart.add_passengers_to_world(&mut world, &transform), vec![rider]);
        assert_eq!(world.1, vec![(rider, BlockPos::new(11, 64, 10))]);
    }

    struct Counting(Arc<AtomicUsize>, Arc<AtomicUsize>);

    impl MovementBehaviour for Counting {
        fn start_moving(&self, _ctx: &mut MovementContext) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn stop_moving(&self, _ctx: &mut MovementContext) {
            self.1.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn start_and_stop_reach_every_actor() {
        let started = Arc::new(AtomicUsize::new(0));
        let stopped = Arc::new(AtomicUsize::new(0));
        let mut registry = BehaviourRegistry::new();
        registry.register("drill", Counting(started.clone(), stopped.clone()));

        let mut builder = ContraptionBuilder::new(ContraptionKind::Translating);
        builder
            .add_block(BlockPos::new(0, 0, 0), BlockState::new("drill"))
            .add_block(BlockPos::new(0, 1, 0), BlockState::new("drill"))
            .add_block(BlockPos::new(0, 2, 0), BlockState::new("planks"));
        let mut contraption = builder.build(&registry).expect("valid structure");

        contraption.start_moving(&registry);
        contraption.stop(&registry);
        assert_eq!(started.load(Ordering::SeqCst), 2);
        assert_eq!(stopped.load(Ordering::SeqCst), 2);
    }
}
