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

use std::collections::HashMap;
use std::sync::Arc;

use super::MovementBehaviour;
use crate::block::BlockState;

/// Resolves block states to the behaviour that drives them, keyed by block kind.
///
/// A block whose kind is registered becomes an actor when its structure is assembled.
#[derive(Default, Clone)]
pub struct BehaviourRegistry {
    behaviours: HashMap<String, Arc<dyn MovementBehaviour>>,
}

impl BehaviourRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            behaviours: HashMap::new(),
        }
    }

    /// Registers the behaviour for a block kind, replacing any previous one.
    pub fn register<B: MovementBehaviour + 'static>(&mut self, kind: impl Into<String>, behaviour: B) {
        self.register_shared(kind, Arc::new(behaviour));
    }

    /// Registers an already shared behaviour.
    pub fn register_shared(&mut self, kind: impl Into<String>, behaviour: Arc<dyn MovementBehaviour>) {
        let kind = kind.into();
        if self.behaviours.insert(kind.clone(), behaviour).is_some() {
            log::debug!("Replaced movement behaviour for '{kind}'");
        }
    }

    /// Returns the behaviour driving `state`, if any.
    #[must_use]
    pub fn resolve(&self, state: &BlockState) -> Option<Arc<dyn MovementBehaviour>> {
        self.behaviours.get(&state.kind).cloned()
    }

    /// Returns `true` if `state` is driven by a behaviour.
    #[must_use]
    pub fn is_actor(&self, state: &BlockState) -> bool {
        self.behaviours.contains_key(&state.kind)
    }

    /// Returns the number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.behaviours.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.behaviours.is_empty()
    }
}

impl std::fmt::Debug for BehaviourRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.behaviours.keys().collect();
        kinds.sort();
        f.debug_struct("BehaviourRegistry").field("kinds", &kinds).finish()
    }
}
