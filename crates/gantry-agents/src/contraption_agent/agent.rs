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

//! Defines the `ContraptionAgent`, owner of every driver in a simulation.

use gantry_core::event::{ReplicationBus, SyncMessage};
use gantry_core::math::{BlockPos, StructureTransform, Vec3};
use gantry_core::movement::BehaviourRegistry;
use gantry_core::world::WorldAccess;
use gantry_core::{ContraptionError, EntityId, SimulationSettings};
use gantry_data::persistence::{ContraptionEntityRecord, PersistenceError, PersistenceFormat, RecordMode};
use gantry_data::Contraption;
use std::collections::HashMap;
use std::sync::Arc;

use super::entity::{ContraptionEntity, Lifecycle, SubContraptions, TickOutcome};

/// An error that can occur within the `ContraptionAgent`.
#[derive(Debug)]
pub enum AgentError {
    /// No driver with this id is managed by the agent.
    UnknownDriver(EntityId),
    /// A driver rejected the operation.
    Contraption(ContraptionError),
    /// Saving or loading a driver failed.
    Persistence(PersistenceError),
}

impl std::fmt::Display for AgentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentError::UnknownDriver(id) => write!(f, "Unknown driver: {id}"),
            AgentError::Contraption(e) => write!(f, "Contraption error: {e}"),
            AgentError::Persistence(e) => write!(f, "Persistence error: {e}"),
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentError::UnknownDriver(_) => None,
            AgentError::Contraption(e) => Some(e),
            AgentError::Persistence(e) => Some(e),
        }
    }
}

impl From<ContraptionError> for AgentError {
    fn from(e: ContraptionError) -> Self {
        AgentError::Contraption(e)
    }
}

impl From<PersistenceError> for AgentError {
    fn from(e: PersistenceError) -> Self {
        AgentError::Persistence(e)
    }
}

/// Owns every driver of one simulation and ticks them in spawn order.
///
/// Drivers refer to each other by id only. While a driver ticks it is taken out of
/// the agent, and the remaining drivers are reachable through a [`SubContraptions`]
/// view for nested structures.
pub struct ContraptionAgent {
    drivers: HashMap<EntityId, ContraptionEntity>,
    order: Vec<EntityId>,
    registry: Arc<BehaviourRegistry>,
    settings: SimulationSettings,
    bus: ReplicationBus,
}

impl ContraptionAgent {
    /// Creates an agent with no drivers.
    pub fn new(registry: Arc<BehaviourRegistry>, settings: SimulationSettings) -> Self {
        log::info!("ContraptionAgent created on the {:?} side", settings.side);
        Self {
            drivers: HashMap::new(),
            order: Vec::new(),
            registry,
            settings,
            bus: ReplicationBus::new(),
        }
    }

    /// The bus drivers publish replication messages on.
    pub fn bus(&self) -> &ReplicationBus {
        &self.bus
    }

    /// The settings every driver is created with.
    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Creates a driver for `contraption` at `anchor` and returns its id.
    pub fn spawn(&mut self, contraption: Contraption, anchor: Vec3) -> EntityId {
        let id = EntityId::new();
        let driver = ContraptionEntity::new(
            id,
            contraption,
            anchor,
            Arc::clone(&self.registry),
            self.settings.clone(),
        );
        self.insert(driver);
        id
    }

    /// Adds an existing driver, replacing any driver with the same id.
    ///
    /// The driver publishes on this agent's bus from now on.
    pub fn insert(&mut self, driver: ContraptionEntity) {
        let id = driver.id();
        let driver = driver.with_sync(self.bus.sender());
        if self.drivers.insert(id, driver).is_none() {
            self.order.push(id);
        }
        log::debug!("Driver {id} added ({} managed)", self.drivers.len());
    }

    /// The driver `id`.
    pub fn get(&self, id: EntityId) -> Option<&ContraptionEntity> {
        self.drivers.get(&id)
    }

    /// Mutable access to the driver `id`.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut ContraptionEntity> {
        self.drivers.get_mut(&id)
    }

    /// The number of managed drivers.
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Returns `true` if no driver is managed.
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Driver ids, in tick order.
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Makes `child` ride `parent`, linked to the local cell `pos` of the parent.
    pub fn attach_sub_contraption(
        &mut self,
        parent: EntityId,
        child: EntityId,
        pos: BlockPos,
    ) -> Result<(), AgentError> {
        if !self.drivers.contains_key(&child) {
            return Err(AgentError::UnknownDriver(child));
        }
        self.drivers
            .get_mut(&parent)
            .ok_or(AgentError::UnknownDriver(parent))?
            .attach_sub_contraption(child, pos)?;
        if let Some(child) = self.drivers.get_mut(&child) {
            child.set_vehicle(Some(parent));
        }
        Ok(())
    }

    /// Ticks every driver once, then drops the dissolved ones.
    pub fn tick(&mut self, world: &mut dyn WorldAccess) -> Vec<(EntityId, TickOutcome)> {
        let mut outcomes = Vec::with_capacity(self.order.len());
        for id in self.order.clone() {
            let Some(mut driver) = self.drivers.remove(&id) else {
                continue;
            };
            let outcome = driver.tick(world, &mut ArenaView::new(&mut self.drivers));
            self.drivers.insert(id, driver);
            outcomes.push((id, outcome));
        }
        self.prune();
        outcomes
    }

    /// Disassembles the driver `id` and every structure riding it.
    ///
    /// Returns the placement used, or `None` if the driver had nothing to place.
    pub fn disassemble(
        &mut self,
        id: EntityId,
        world: &mut dyn WorldAccess,
    ) -> Result<Option<StructureTransform>, AgentError> {
        let mut driver = self.drivers.remove(&id).ok_or(AgentError::UnknownDriver(id))?;
        let transform = driver.disassemble(world, &mut ArenaView::new(&mut self.drivers));
        self.drivers.insert(id, driver);
        self.prune();
        Ok(transform)
    }

    /// Releases every rider of `id` and removes it without placing its blocks.
    pub fn kill(&mut self, id: EntityId, world: &mut dyn WorldAccess) -> Result<(), AgentError> {
        self.drivers
            .get_mut(&id)
            .ok_or(AgentError::UnknownDriver(id))?
            .kill(world);
        self.prune();
        Ok(())
    }

    /// Routes a replication message to the driver it is about.
    ///
    /// Returns `false` if no such driver is managed.
    pub fn apply_sync(&mut self, message: &SyncMessage, world: &mut dyn WorldAccess) -> bool {
        let Some(driver) = self.drivers.get_mut(&message.driver()) else {
            log::trace!("Dropping sync message for unknown driver {}", message.driver());
            return false;
        };
        driver.apply_sync(message, world);
        self.prune();
        true
    }

    /// Encodes the driver `id`.
    pub fn save(&self, id: EntityId, mode: RecordMode, format: PersistenceFormat) -> Result<Vec<u8>, AgentError> {
        let driver = self.drivers.get(&id).ok_or(AgentError::UnknownDriver(id))?;
        let bytes = driver.to_record(mode)?.encode(format)?;
        log::debug!("Saved driver {id} as {format} ({} bytes)", bytes.len());
        Ok(bytes)
    }

    /// Decodes a driver and adds it to the simulation.
    pub fn load(&mut self, bytes: &[u8], format: PersistenceFormat) -> Result<EntityId, AgentError> {
        let record = ContraptionEntityRecord::decode(bytes, format)?;
        let driver = ContraptionEntity::from_record(record, Arc::clone(&self.registry), self.settings.clone())?;
        let id = driver.id();
        self.insert(driver);
        Ok(id)
    }

    /// Drops dissolved drivers and unlinks them from whatever they rode or carried.
    fn prune(&mut self) {
        let dissolved: Vec<_> = self
            .drivers
            .values()
            .filter(|driver| driver.lifecycle() == Lifecycle::Dissolved)
            .map(|driver| (driver.id(), driver.vehicle()))
            .collect();
        if dissolved.is_empty() {
            return;
        }

        for &(id, vehicle) in &dissolved {
            self.drivers.remove(&id);
            if let Some(parent) = vehicle.and_then(|parent| self.drivers.get_mut(&parent)) {
                parent.detach_sub_contraption(id);
            }
        }
        for driver in self.drivers.values_mut() {
            if dissolved.iter().any(|&(id, _)| driver.vehicle() == Some(id)) {
                driver.set_vehicle(None);
            }
        }
        let drivers = &self.drivers;
        self.order.retain(|id| drivers.contains_key(id));
        log::debug!("Dropped {} dissolved driver(s)", dissolved.len());
    }
}

impl std::fmt::Debug for ContraptionAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContraptionAgent")
            .field("drivers", &self.order)
            .field("side", &self.settings.side)
            .finish()
    }
}

/// The drivers not currently ticking, seen from the one that is.
struct ArenaView<'a> {
    drivers: &'a mut HashMap<EntityId, ContraptionEntity>,
}

impl<'a> ArenaView<'a> {
    fn new(drivers: &'a mut HashMap<EntityId, ContraptionEntity>) -> Self {
        Self { drivers }
    }
}

impl SubContraptions for ArenaView<'_> {
    fn is_stalled(&self, id: EntityId) -> bool {
        self.drivers.get(&id).is_some_and(ContraptionEntity::is_stalled)
    }

    fn disassemble_at(&mut self, world: &mut dyn WorldAccess, id: EntityId, anchor: Vec3) {
        let Some(mut driver) = self.drivers.remove(&id) else {
            log::warn!("Nested structure {id} has no driver; nothing to disassemble");
            return;
        };
        driver.set_position(anchor);
        driver.disassemble(world, self);
        self.drivers.insert(id, driver);
    }
}
