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

//! Error types shared by the simulation layers.

use std::fmt;

use crate::entity::EntityId;
use crate::math::BlockPos;

/// Error type for contraption operations.
///
/// None of these is retried. Lookups that find nothing are reported to the caller
/// and otherwise leave the simulation untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContraptionError {
    /// A driver was asked to act without an assigned structure.
    InvalidState,
    /// A behaviour callback halted the driver in the middle of its actor loop.
    DeadDuringCallback,
    /// The position does not hold a seat.
    MissingSeat(BlockPos),
    /// The entity is not riding this structure.
    MissingRider(EntityId),
    /// An actor references a position that is not a member of the structure.
    InvalidActor {
        /// The dangling actor position.
        pos: BlockPos,
    },
    /// A seat index outside the seat list.
    SeatOutOfRange {
        /// The requested index.
        index: usize,
        /// How many seats the structure has.
        seats: usize,
    },
    /// Every seat is already taken.
    SeatsFull,
}

impl fmt::Display for ContraptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContraptionError::InvalidState => write!(f, "Driver has no contraption"),
            ContraptionError::DeadDuringCallback => {
                write!(f, "Driver was halted by a movement callback")
            }
            ContraptionError::MissingSeat(pos) => write!(f, "No seat at {pos}"),
            ContraptionError::MissingRider(id) => write!(f, "Entity {id} is not a rider"),
            ContraptionError::InvalidActor { pos } => {
                write!(f, "Actor at {pos} does not reference a member block")
            }
            ContraptionError::SeatOutOfRange { index, seats } => {
                write!(f, "Seat index {index} out of range ({seats} seats)")
            }
            ContraptionError::SeatsFull => write!(f, "All seats are taken"),
        }
    }
}

impl std::error::Error for ContraptionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = ContraptionError::SeatOutOfRange { index: 4, seats: 2 };
        assert_eq!(err.to_string(), "Seat index 4 out of range (2 seats)");
        let err = ContraptionError::InvalidActor {
            pos: BlockPos::new(1, 2, 3),
        };
        assert!(err.to_string().contains("[1, 2, 3]"));
    }
}
