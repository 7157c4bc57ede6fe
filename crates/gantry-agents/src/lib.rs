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

//! # Gantry Agents
//!
//! The simulation drivers. A [`ContraptionEntity`] owns one
//! [`Contraption`](gantry_data::Contraption) and advances it once per tick; the
//! [`ContraptionAgent`] owns every driver of a simulation and ticks them in a
//! stable order.

#![warn(missing_docs)]

pub mod contraption_agent;

pub use contraption_agent::{
    AgentError, ContraptionAgent, ContraptionEntity, Lifecycle, NoSubContraptions, Rider, RiderKind,
    SubContraptions, TickOutcome,
};
