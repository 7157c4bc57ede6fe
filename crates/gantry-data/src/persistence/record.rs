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

use gantry_core::math::{Aabb, BlockPos, RotationState, Vec3};
use gantry_core::movement::MovementContext;
use gantry_core::EntityId;
use serde::{Deserialize, Serialize};

use super::{decode, encode, PersistenceError, PersistenceFormat, RecordMode};
use crate::contraption::{BlockMember, Contraption, ContraptionKind};

/// The persisted form of a [`Contraption`].
///
/// Maps are stored as ordered pair lists so that every codec can write them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContraptionRecord {
    /// How the structure moves.
    pub kind: ContraptionKind,
    /// Every member, ordered by position.
    pub members: Vec<BlockMember>,
    /// Actor contexts, in processing order.
    pub actors: Vec<MovementContext>,
    /// Seat positions, by index.
    pub seats: Vec<BlockPos>,
    /// Rider to seat index.
    pub seat_mapping: Vec<(EntityId, usize)>,
    /// Nested structures and their attachment points.
    pub sub_contraptions: Vec<(EntityId, BlockPos)>,
    /// Local bounds.
    pub bounds: Aabb,
    /// The stalled flag.
    pub stalled: bool,
}

impl ContraptionRecord {
    /// Writes the record.
    pub fn encode(&self, format: PersistenceFormat) -> Result<Vec<u8>, PersistenceError> {
        encode(self, format)
    }

    /// Reads a record. The result is not validated until it is turned back into a
    /// [`Contraption`].
    pub fn decode(bytes: &[u8], format: PersistenceFormat) -> Result<Self, PersistenceError> {
        decode(bytes, format)
    }
}

impl Contraption {
    /// Captures this structure as a record.
    pub fn to_record(&self, mode: RecordMode) -> ContraptionRecord {
        let members = self
            .members()
            .values()
            .map(|member| match mode {
                RecordMode::Full => member.clone(),
                RecordMode::Spawn => BlockMember {
                    data: member.data.without_storage(),
                    ..member.clone()
                },
            })
            .collect();
        let actors = self
            .actors()
            .iter()
            .map(|ctx| {
                let mut ctx = ctx.clone();
                if mode == RecordMode::Spawn {
                    ctx.reset_history();
                }
                ctx
            })
            .collect();

        ContraptionRecord {
            kind: self.kind(),
            members,
            actors,
            seats: self.seats().to_vec(),
            seat_mapping: self.seat_mapping().iter().map(|(&k, &v)| (k, v)).collect(),
            sub_contraptions: self
                .stabilized_sub_contraptions()
                .iter()
                .map(|(&k, &v)| (k, v))
                .collect(),
            bounds: self.bounds(),
            stalled: self.stalled,
        }
    }

    /// Restores a structure from a record, re-checking every invariant.
    pub fn from_record(record: ContraptionRecord) -> Result<Self, PersistenceError> {
        let finite = |v: Vec3| v.x.is_finite() && v.y.is_finite() && v.z.is_finite();
        if !finite(record.bounds.min) || !finite(record.bounds.max) {
            return Err(PersistenceError::InvalidBounds);
        }

        let members = record.members.into_iter().map(|m| (m.pos, m)).collect();
        let mut contraption =
            Contraption::from_parts(record.kind, members, record.actors, record.seats, record.bounds)?;
        for (rider, pos) in record.sub_contraptions {
            contraption.link_sub_contraption(rider, pos);
        }
        for (rider, index) in record.seat_mapping {
            contraption.mount(rider, index)?;
        }
        contraption.stalled = record.stalled;
        contraption.validate()?;
        Ok(contraption)
    }

    /// Encodes this structure directly.
    pub fn save(&self, mode: RecordMode, format: PersistenceFormat) -> Result<Vec<u8>, PersistenceError> {
        self.to_record(mode).encode(format)
    }

    /// Decodes and validates a structure written by [`Contraption::save`].
    pub fn load(bytes: &[u8], format: PersistenceFormat) -> Result<Self, PersistenceError> {
        Self::from_record(ContraptionRecord::decode(bytes, format)?)
    }
}

/// The persisted form of a driver and the structure it moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContraptionEntityRecord {
    /// The driver's id.
    pub id: EntityId,
    /// The driver's anchor in world space.
    pub anchor: Vec3,
    /// The driver's orientation.
    pub rotation: RotationState,
    /// Whether the structure's actors were already started.
    pub initialized: bool,
    /// The last stalled flag sent to replicas.
    pub synced_stalled: bool,
    /// The structure itself.
    pub contraption: ContraptionRecord,
}

impl ContraptionEntityRecord {
    /// Writes the record.
    pub fn encode(&self, format: PersistenceFormat) -> Result<Vec<u8>, PersistenceError> {
        encode(self, format)
    }

    /// Reads a record.
    pub fn decode(bytes: &[u8], format: PersistenceFormat) -> Result<Self, PersistenceError> {
        decode(bytes, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contraption::ContraptionBuilder;
    use gantry_core::block::{BlockData, BlockState, ItemStack};
    use gantry_core::math::Direction;
    use gantry_core::movement::{BehaviourRegistry, MovementBehaviour};
    use gantry_core::ContraptionError;

    struct Inert;
    impl MovementBehaviour for Inert {}

    fn registry() -> BehaviourRegistry {
        let mut registry = BehaviourRegistry::new();
        registry.register("drill", Inert);
        registry
    }

    fn sample() -> Contraption {
        let chest = BlockData {
            storage: vec![ItemStack::new("coal", 12)],
            ..BlockData::default()
        }
        .with_property("label", "fuel");
        let mut builder = ContraptionBuilder::new(ContraptionKind::Bearing {
            axis: gantry_core::math::Axis::Y,
        });
        builder
            .add_block(BlockPos::new(0, 0, 0), BlockState::new("planks"))
            .add_block(BlockPos::new(1, 0, 0), BlockState::facing("drill", Direction::East))
            .add_block_with_data(BlockPos::new(0, 1, 0), BlockState::new("chest"), chest)
            .add_block(BlockPos::new(0, 0, 1), BlockState::new("seat"))
            .add_seat(BlockPos::new(0, 0, 1));
        let mut contraption = builder.build(&registry()).expect("valid structure");
        contraption
            .mount(EntityId::from_name("rider"), 0)
            .expect("free seat");
        contraption.link_sub_contraption(EntityId::from_name("nested"), BlockPos::new(0, 1, 0));
        let actor = &mut contraption.actors_mut()[0];
        actor.position = Some(Vec3::new(3.0, 4.0, 5.0));
        actor.first_movement = false;
        actor.data.insert("progress".into(), "7".into());
        contraption.stalled = true;
        contraption
    }

    #[test]
    fn full_records_restore_an_equal_structure() {
        let original = sample();
        for format in [PersistenceFormat::Binary, PersistenceFormat::Readable, PersistenceFormat::Json] {
            let bytes = original.save(RecordMode::Full, format).expect("encodes");
            let restored = Contraption::load(&bytes, format).expect("decodes");
            assert_eq!(restored, original, "{format} lost information");
        }
    }

    #[test]
    fn spawn_records_drop_storage_and_history() {
        let record = sample().to_record(RecordMode::Spawn);
        let chest = record
            .members
            .iter()
            .find(|m| m.pos == BlockPos::new(0, 1, 0))
            .expect("chest is a member");
        assert!(chest.data.storage.is_empty());
        assert_eq!(chest.data.properties.get("label").map(String::as_str), Some("fuel"));

        let actor = &record.actors[0];
        assert_eq!(actor.position, None);
        assert!(actor.first_movement);
        assert_eq!(actor.data.get("progress").map(String::as_str), Some("7"));
        assert_eq!(record.seat_mapping.len(), 1);
    }

    #[test]
    fn dangling_actor_is_rejected() {
        let mut record = sample().to_record(RecordMode::Full);
        record.actors[0].local_pos = BlockPos::new(9, 9, 9);
        assert!(matches!(
            Contraption::from_record(record),
            Err(PersistenceError::Invalid(ContraptionError::InvalidActor { .. }))
        ));
    }

    #[test]
    fn oversized_seat_mapping_is_rejected() {
        let mut record = sample().to_record(RecordMode::Full);
        record.seat_mapping.push((EntityId::from_name("stowaway"), 0));
        assert!(matches!(
            Contraption::from_record(record),
            Err(PersistenceError::Invalid(ContraptionError::SeatsFull))
        ));

        let mut record = sample().to_record(RecordMode::Full);
        record.seat_mapping[0].1 = 3;
        assert!(matches!(
            Contraption::from_record(record),
            Err(PersistenceError::Invalid(ContraptionError::SeatOutOfRange { index: 3, .. }))
        ));
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        let mut record = sample().to_record(RecordMode::Full);
        record.bounds.max.y = f64::NAN;
        assert!(matches!(
            Contraption::from_record(record),
            Err(PersistenceError::InvalidBounds)
        ));
    }

    #[test]
    fn entity_record_survives_every_codec() {
        let record = ContraptionEntityRecord {
            id: EntityId::from_name("driver"),
            anchor: Vec3::new(10.0, 64.0, 10.0),
            rotation: RotationState::new(0.0, 45.0, 0.0),
            initialized: true,
            synced_stalled: false,
            contraption: sample().to_record(RecordMode::Full),
        };
        for format in [PersistenceFormat::Binary, PersistenceFormat::Readable, PersistenceFormat::Json] {
            let bytes = record.encode(format).expect("encodes");
            assert_eq!(ContraptionEntityRecord::decode(&bytes, format).expect("decodes"), record);
        }
    }
}
