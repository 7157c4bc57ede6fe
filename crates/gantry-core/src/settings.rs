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

//! Tunable constants of the simulation.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Which role a simulation instance plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    /// The authoritative simulation; the only one mutating shared state.
    #[default]
    Server,
    /// An observing replica, fed by synchronization messages.
    Client,
}

impl Side {
    /// Returns `true` for the authoritative side.
    pub fn is_server(self) -> bool {
        self == Side::Server
    }
}

/// Settings shared by every driver of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Local point structures rotate around.
    pub rotation_pivot: Vec3,
    /// Ticks a colliding entity is remembered after its last contact.
    pub colliding_entity_ttl: u32,
    /// Vertical offset applied to colliding entities when their structure is placed.
    pub disassembly_lift: f64,
    /// Eye-height correction for seated riders.
    pub seat_height_offset: f64,
    /// The role of this simulation.
    pub side: Side,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            rotation_pivot: Vec3::splat(0.5),
            colliding_entity_ttl: 3,
            disassembly_lift: 1.0 / 16.0,
            seat_height_offset: 0.15,
            side: Side::Server,
        }
    }
}

impl SimulationSettings {
    /// Default settings for the given side.
    pub fn for_side(side: Side) -> Self {
        Self {
            side,
            ..Self::default()
        }
    }

    /// Parses settings from RON text. Missing fields keep their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_centre_the_pivot() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.rotation_pivot, Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(settings.colliding_entity_ttl, 3);
        assert!(settings.side.is_server());
    }

    #[test]
    fn ron_overrides_only_given_fields() {
        let settings =
            SimulationSettings::from_ron_str("(side: Client, colliding_entity_ttl: 5)").expect("valid RON");
        assert_eq!(settings.side, Side::Client);
        assert_eq!(settings.colliding_entity_ttl, 5);
        assert_eq!(settings.disassembly_lift, 1.0 / 16.0);
    }

    #[test]
    fn malformed_ron_is_an_error() {
        assert!(SimulationSettings::from_ron_str("(side: Sideways)").is_err());
    }
}
