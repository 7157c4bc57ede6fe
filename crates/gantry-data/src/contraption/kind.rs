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

use gantry_core::math::Axis;
use serde::{Deserialize, Serialize};

/// How a structure is being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContraptionKind {
    /// Pushed or pulled in a straight line. Never rotates.
    #[default]
    Translating,
    /// Spun around a fixed axis.
    Bearing {
        /// The axis of rotation.
        axis: Axis,
    },
    /// Carried by a vehicle riding rails.
    Mounted,
    /// Kept level while riding another structure.
    Stabilized,
}

impl ContraptionKind {
    /// Returns `true` if the structure should be stopped by terrain.
    pub fn supports_terrain_collision(self) -> bool {
        matches!(self, ContraptionKind::Translating)
    }

    /// Returns `true` for structures carried by a rail vehicle.
    pub fn is_mounted(self) -> bool {
        matches!(self, ContraptionKind::Mounted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_translation_collides_with_terrain() {
        assert!(ContraptionKind::Translating.supports_terrain_collision());
        assert!(!ContraptionKind::Bearing { axis: Axis::Y }.supports_terrain_collision());
        assert!(!ContraptionKind::Mounted.supports_terrain_collision());
        assert!(!ContraptionKind::Stabilized.supports_terrain_collision());
    }
}
