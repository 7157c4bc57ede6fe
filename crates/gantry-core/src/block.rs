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

//! Block descriptors carried by the members of a structure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::math::{Direction, StructureTransform};

/// The type and orientation of a block.
///
/// `kind` is an opaque key; it is also what the behaviour registry resolves against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    /// The block type key.
    pub kind: String,
    /// The face the block points towards, for oriented blocks.
    pub facing: Option<Direction>,
}

impl BlockState {
    /// Creates an unoriented block state.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            facing: None,
        }
    }

    /// Creates a block state facing `facing`.
    pub fn facing(kind: impl Into<String>, facing: Direction) -> Self {
        Self {
            kind: kind.into(),
            facing: Some(facing),
        }
    }

    /// Returns this state re-oriented by a placement transform.
    pub fn rotated(&self, transform: &StructureTransform) -> Self {
        Self {
            kind: self.kind.clone(),
            facing: self.facing.map(|facing| transform.apply_direction(facing)),
        }
    }
}

/// A stack of items held in a container block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// The item key.
    pub item: String,
    /// How many items the stack holds.
    pub count: u32,
}

impl ItemStack {
    /// Creates a stack.
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }
}

/// Auxiliary data attached to a block, such as container contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockData {
    /// Container contents.
    pub storage: Vec<ItemStack>,
    /// Free-form block properties.
    pub properties: BTreeMap<String, String>,
}

impl BlockData {
    /// Returns `true` if there is nothing attached.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty() && self.properties.is_empty()
    }

    /// Returns a copy without container contents.
    pub fn without_storage(&self) -> Self {
        Self {
            storage: Vec::new(),
            properties: self.properties.clone(),
        }
    }

    /// Sets a property, returning `self` for chaining.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{RotationState, Vec3};

    #[test]
    fn rotation_follows_the_structure() {
        let transform = StructureTransform::from_rotation_state(
            Vec3::ZERO,
            &RotationState::new(0.0, 180.0, 0.0),
            Vec3::splat(0.5),
        );
        let piston = BlockState::facing("piston", Direction::North);
        assert_eq!(piston.rotated(&transform).facing, Some(Direction::South));
        assert_eq!(BlockState::new("planks").rotated(&transform).facing, None);
    }

    #[test]
    fn without_storage_keeps_properties() {
        let data = BlockData {
            storage: vec![ItemStack::new("coal", 12)],
            ..BlockData::default()
        }
        .with_property("lit", "true");
        let stripped = data.without_storage();
        assert!(stripped.storage.is_empty());
        assert_eq!(stripped.properties.get("lit").map(String::as_str), Some("true"));
        assert!(!stripped.is_empty());
        assert!(BlockData::default().is_empty());
    }
}
