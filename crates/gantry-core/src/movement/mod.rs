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

//! Per-block reactions to being carried by a moving structure.
//!
//! Blocks that react to movement are *actors*. Each actor owns a [`MovementContext`]
//! and is dispatched, by block kind, to a [`MovementBehaviour`] looked up in the
//! [`BehaviourRegistry`].
//!
//! # Example
//!
//! ```rust
//! use gantry_core::movement::{ActorFlow, BehaviourRegistry, MovementBehaviour, MovementContext, MovementFrame};
//! use gantry_core::block::BlockState;
//!
//! struct Drill;
//!
//! impl MovementBehaviour for Drill {
//!     fn tick(&self, ctx: &mut MovementContext, _frame: &mut MovementFrame<'_>) -> ActorFlow {
//!         ctx.data.insert("spinning".into(), "true".into());
//!         ActorFlow::Continue
//!     }
//! }
//!
//! let mut registry = BehaviourRegistry::new();
//! registry.register("drill", Drill);
//! assert!(registry.resolve(&BlockState::new("drill")).is_some());
//! ```

mod behaviour;
mod context;
mod registry;

pub use self::behaviour::{ActorFlow, MovementBehaviour, MovementFrame};
pub use self::context::MovementContext;
pub use self::registry::BehaviourRegistry;
