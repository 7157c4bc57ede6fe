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

use gantry_core::block::{BlockData, BlockState};
use gantry_core::math::{Aabb, BlockPos};
use gantry_core::movement::{BehaviourRegistry, MovementContext};
use gantry_core::ContraptionError;
use std::collections::BTreeMap;

use super::{BlockMember, Contraption, ContraptionKind};

/// Assembles a [`Contraption`] cell by cell.
///
/// Insertion order matters: it becomes the order actors are processed in, every
/// tick, for the whole life of the structure.
#[derive(Debug, Clone)]
pub struct ContraptionBuilder {
    kind: ContraptionKind,
    members: Vec<BlockMember>,
    seats: Vec<BlockPos>,
}

impl ContraptionBuilder {
    /// Starts an empty structure.
    pub fn new(kind: ContraptionKind) -> Self {
        Self {
            kind,
            members: Vec::new(),
            seats: Vec::new(),
        }
    }

    /// Adds a block without auxiliary data.
    pub fn add_block(&mut self, pos: BlockPos, state: BlockState) -> &mut Self {
        self.add_member(BlockMember::new(pos, state))
    }

    /// Adds a block with auxiliary data.
    pub fn add_block_with_data(
        &mut self,
        pos: BlockPos,
        state: BlockState,
        data: BlockData,
    ) -> &mut Self {
        self.add_member(BlockMember::new(pos, state).with_data(data))
    }

    /// Adds a member. A second member at the same position replaces the first one
    /// but keeps its place in the order.
    pub fn add_member(&mut self, member: BlockMember) -> &mut Self {
        match self.members.iter_mut().find(|m| m.pos == member.pos) {
            Some(existing) => {
                log::warn!("Replacing member at {}", member.pos);
                *existing = member;
            }
            None => self.members.push(member),
        }
        self
    }

    /// Marks a member cell as a seat. Seats are indexed in the order they are added.
    pub fn add_seat(&mut self, pos: BlockPos) -> &mut Self {
        if !self.seats.contains(&pos) {
            self.seats.push(pos);
        }
        self
    }

    /// Builds the structure, turning every block with a registered behaviour into
    /// an actor.
    ///
    /// # Errors
    ///
    /// Fails with [`ContraptionError::MissingSeat`] if a seat is not a member.
    pub fn build(&self, registry: &BehaviourRegistry) -> Result<Contraption, ContraptionError> {
        let actors = self
            .members
            .iter()
            .filter(|member| registry.is_actor(&member.state))
            .map(|member| MovementContext::new(member.pos, member.state.clone()))
            .collect::<Vec<_>>();
        let bounds = Aabb::enclosing_blocks(self.members.iter().map(|m| m.pos)).unwrap_or_default();
        let members = self
            .members
            .iter()
            .map(|m| (m.pos, m.clone()))
            .collect::<BTreeMap<_, _>>();

        let contraption =
            Contraption::from_parts(self.kind, members, actors, self.seats.clone(), bounds)?;
        log::info!(
            "Assembled {:?} contraption: {} blocks, {} actors, {} seats",
            self.kind,
            contraption.members().len(),
            contraption.actors().len(),
            contraption.seats().len()
        );
        Ok(contraption)
    }
}
