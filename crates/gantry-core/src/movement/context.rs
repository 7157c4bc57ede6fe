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

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::block::BlockState;
use crate::math::{BlockPos, Vec3};

/// The working state of one actor.
///
/// Created when the actor joins its structure and mutated every tick, both by the
/// driver and by the actor's own behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementContext {
    /// The actor's cell in structure-local space.
    pub local_pos: BlockPos,
    /// The actor's block state.
    pub state: BlockState,
    /// Behaviour-owned scratch data. Persisted with the structure.
    pub data: BTreeMap<String, String>,
    /// World-space displacement of the actor during the last tick.
    pub motion: Vec3,
    /// `motion` expressed in the structure's local orientation.
    pub relative_motion: Vec3,
    /// World position of the actor at the last tick, if it was ever observed.
    pub position: Option<Vec3>,
    /// Set by the behaviour while the actor is blocked.
    pub stall: bool,
    /// `true` until the actor has visited its first cell.
    pub first_movement: bool,
}

impl MovementContext {
    /// Creates the context of an actor that has not moved yet.
    pub fn new(local_pos: BlockPos, state: BlockState) -> Self {
        Self {
            local_pos,
            state,
            data: BTreeMap::new(),
            motion: Vec3::ZERO,
            relative_motion: Vec3::ZERO,
            position: None,
            stall: false,
            first_movement: true,
        }
    }

    /// Forgets everything learnt from past movement, keeping behaviour data.
    pub fn reset_history(&mut self) {
        self.motion = Vec3::ZERO;
        self.relative_motion = Vec3::ZERO;
        self.position = None;
        self.first_movement = true;
    }
}
