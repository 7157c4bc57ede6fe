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

//! Drives moving structures through their lifecycle.
//!
//! A driver is `Assembled` while it ticks. Disassembly moves it through a transient
//! `Disassembling` step, during which its blocks are placed back into the world and
//! its riders released, to the terminal `Dissolved` state. Dissolved drivers are
//! dropped by the [`ContraptionAgent`] at the end of the tick.

mod actors;
mod agent;
mod collision;
mod disassembly;
mod entity;
mod replica;
mod riders;

pub use self::agent::{AgentError, ContraptionAgent};
pub use self::entity::{ContraptionEntity, Lifecycle, NoSubContraptions, SubContraptions, TickOutcome};
pub use self::riders::{Rider, RiderKind};
