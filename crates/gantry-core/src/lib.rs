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

//! # Gantry Core
//!
//! Foundational crate containing the math, coordinate-space transforms, core types,
//! and interface contracts shared by every layer of the moving-structure simulation.

#![warn(missing_docs)]

pub mod block;
pub mod entity;
pub mod error;
pub mod event;
pub mod math;
pub mod movement;
pub mod settings;
pub mod world;

pub use entity::EntityId;
pub use error::ContraptionError;
pub use settings::{Side, SimulationSettings};
