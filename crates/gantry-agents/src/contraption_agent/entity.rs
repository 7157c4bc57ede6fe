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

//! Defines the `ContraptionEntity`, the driver owning and ticking one structure.

use gantry_core::event::SyncMessage;
use gantry_core::math::{Aabb, Axis, RotationState, SpatialTransform, Vec3};
use gantry_core::movement::BehaviourRegistry;
use gantry_core::world::WorldAccess;
use gantry_core::{ContraptionError, EntityId, SimulationSettings};
use gantry_data::persistence::{ContraptionEntityRecord, PersistenceError, RecordMode};
use gantry_data::{Contraption, ContraptionKind};
use std::collections::HashMap;
use std::sync::Arc;

use super::riders::Rider;

/// Where a driver is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Ticking.
    Assembled,
    /// Placing its structure back into the world.
    Disassembling,
    /// Gone. Never ticks again.
    Dissolved,
}

/// What happened during a call to [`ContraptionEntity::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The structure was advanced normally.
    Ticked,
    /// A behaviour brought the driver down; the structure was stopped and dissolved.
    Halted,
    /// The driver had no structure and removed itself.
    Removed,
    /// The driver was already dissolved; nothing happened.
    Inactive,
}

/// Access to the other drivers of the simulation, for structures riding this one.
pub trait SubContraptions {
    /// Returns `true` if the driver `id` exists and its structure is stalled.
    fn is_stalled(&self, id: EntityId) -> bool;

    /// Moves the driver `id` to `anchor` and disassembles it.
    fn disassemble_at(&mut self, world: &mut dyn WorldAccess, id: EntityId, anchor: Vec3);
}

/// A [`SubContraptions`] for drivers that never carry other structures.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSubContraptions;

impl SubContraptions for NoSubContraptions {
    fn is_stalled(&self, _id: EntityId) -> bool {
        false
    }

    fn disassemble_at(&mut self, _world: &mut dyn WorldAccess, id: EntityId, _anchor: Vec3) {
        log::warn!("No driver to disassemble for nested structure {id}");
    }
}

/// The driver of one moving structure.
///
/// It exclusively owns its [`Contraption`], maps between local and world space, keeps
/// track of riders and colliding entities, and tears the structure down on
/// disassembly. Controllers move it between ticks with [`Self::set_position`] and
/// [`Self::set_rotation`].
pub struct ContraptionEntity {
    pub(super) id: EntityId,
    pub(super) contraption: Option<Contraption>,
    pub(super) anchor: Vec3,
    pub(super) prev_anchor: Option<Vec3>,
    pub(super) rotation: RotationState,
    pub(super) prev_rotation: RotationState,
    pub(super) bounding_box: Aabb,
    pub(super) passengers: Vec<Rider>,
    pub(super) vehicle: Option<EntityId>,
    pub(super) colliding_entities: HashMap<EntityId, u32>,
    pub(super) lifecycle: Lifecycle,
    pub(super) initialized: bool,
    pub(super) ticking: bool,
    pub(super) synced_stalled: bool,
    pub(super) registry: Arc<BehaviourRegistry>,
    pub(super) settings: SimulationSettings,
    pub(super) sync: Option<flume::Sender<SyncMessage>>,
}

impl ContraptionEntity {
    /// Creates a driver for `contraption`, anchored at `anchor`.
    pub fn new(
        id: EntityId,
        contraption: Contraption,
        anchor: Vec3,
        registry: Arc<BehaviourRegistry>,
        settings: SimulationSettings,
    ) -> Self {
        let mut entity = Self::empty(id, registry, settings);
        entity.contraption = Some(contraption);
        entity.set_position(anchor);
        entity
    }

    /// Creates a driver with no structure. Its first tick removes it.
    pub fn empty(id: EntityId, registry: Arc<BehaviourRegistry>, settings: SimulationSettings) -> Self {
        Self {
            id,
            contraption: None,
            anchor: Vec3::ZERO,
            prev_anchor: None,
            rotation: RotationState::NONE,
            prev_rotation: RotationState::NONE,
            bounding_box: Aabb::default(),
            passengers: Vec::new(),
            vehicle: None,
            colliding_entities: HashMap::new(),
            lifecycle: Lifecycle::Assembled,
            initialized: false,
            ticking: false,
            synced_stalled: false,
            registry,
            settings,
            sync: None,
        }
    }

    /// Attaches the channel replication messages are sent on.
    pub fn with_sync(mut self, sender: flume::Sender<SyncMessage>) -> Self {
        self.sync = Some(sender);
        self
    }

    pub(super) fn broadcast(&self, message: SyncMessage) {
        if let Some(sender) = &self.sync {
            if let Err(e) = sender.send(message) {
                log::error!("Failed to send sync message for {}: {e}", self.id);
            }
        }
    }

    // --- Accessors ---

    /// The driver's id.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The structure, unless the driver has none.
    pub fn contraption(&self) -> Option<&Contraption> {
        self.contraption.as_ref()
    }

    /// Mutable access to the structure.
    pub fn contraption_mut(&mut self) -> Option<&mut Contraption> {
        self.contraption.as_mut()
    }

    /// The lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Returns `true` while the driver is assembled.
    pub fn is_alive(&self) -> bool {
        self.lifecycle == Lifecycle::Assembled
    }

    /// Returns `true` once the structure's actors were started.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The last stalled flag exchanged with replicas.
    pub fn is_stalled(&self) -> bool {
        self.synced_stalled
    }

    /// The world position of the structure's local origin.
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    /// The anchor at the start of the current tick, or the current anchor before
    /// the first tick.
    pub fn prev_anchor(&self) -> Vec3 {
        self.prev_anchor.unwrap_or(self.anchor)
    }

    /// The orientation.
    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// The world-space bounding box.
    pub fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }

    /// The entity this driver rides, if any.
    pub fn vehicle(&self) -> Option<EntityId> {
        self.vehicle
    }

    /// Sets the entity this driver rides.
    pub fn set_vehicle(&mut self, vehicle: Option<EntityId>) {
        self.vehicle = vehicle;
    }

    /// The shared simulation settings.
    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Returns `true` if the structure should be stopped by terrain.
    pub fn supports_terrain_collision(&self) -> bool {
        self.contraption
            .as_ref()
            .is_some_and(|c| c.kind().supports_terrain_collision())
    }

    // --- Space ---

    /// The current local-to-world mapping.
    pub fn transform(&self) -> SpatialTransform {
        SpatialTransform::new(self.anchor, &self.rotation, self.settings.rotation_pivot)
    }

    /// The mapping at the start of the tick: current anchor, previous orientation.
    pub(super) fn previous_transform(&self) -> SpatialTransform {
        SpatialTransform::new(self.anchor, &self.prev_rotation, self.settings.rotation_pivot)
    }

    /// Maps a local point to world space.
    pub fn to_global(&self, local: Vec3) -> Vec3 {
        self.transform().to_global(local)
    }

    /// Maps a world point to local space.
    pub fn to_local(&self, global: Vec3) -> Vec3 {
        self.transform().to_local(global)
    }

    /// Moves the anchor, and the bounding box with it.
    pub fn set_position(&mut self, anchor: Vec3) {
        self.anchor = anchor;
        if let Some(contraption) = &self.contraption {
            self.bounding_box = contraption.bounds().offset(anchor);
        }
    }

    /// Moves the anchor by `delta`.
    pub fn move_by(&mut self, delta: Vec3) {
        self.set_position(self.anchor + delta);
    }

    /// Sets the orientation.
    pub fn set_rotation(&mut self, rotation: RotationState) {
        self.rotation = rotation;
    }

    // --- Stalling ---

    /// The angle the structure is held at while stalled, in degrees.
    pub fn stalled_angle(&self) -> f64 {
        match self.contraption.as_ref().map(Contraption::kind) {
            Some(ContraptionKind::Mounted | ContraptionKind::Stabilized) => self.rotation.y(),
            Some(ContraptionKind::Bearing { axis }) => match axis {
                Axis::X => self.rotation.x(),
                Axis::Y => self.rotation.y(),
                Axis::Z => self.rotation.z(),
            },
            Some(ContraptionKind::Translating) | None => 0.0,
        }
    }

    /// Snaps a replica to where the authoritative structure stalled.
    pub fn handle_stall_information(&mut self, x: f64, y: f64, z: f64, angle: f64) {
        self.set_position(Vec3::new(x, y, z));
        match self.contraption.as_ref().map(Contraption::kind) {
            Some(ContraptionKind::Mounted | ContraptionKind::Stabilized) => self.rotation.set_y(angle),
            Some(ContraptionKind::Bearing { axis }) => match axis {
                Axis::X => self.rotation.set_x(angle),
                Axis::Y => self.rotation.set_y(angle),
                Axis::Z => self.rotation.set_z(angle),
            },
            Some(ContraptionKind::Translating) | None => {}
        }
    }

    // --- Ticking ---

    /// Advances the structure by one tick.
    ///
    /// `subs` gives access to structures riding this one, for stall propagation and
    /// for disassembly.
    pub fn tick(&mut self, world: &mut dyn WorldAccess, subs: &mut dyn SubContraptions) -> TickOutcome {
        if !self.is_alive() {
            return TickOutcome::Inactive;
        }
        if self.contraption.is_none() {
            log::warn!("Removing driver {}: {}", self.id, ContraptionError::InvalidState);
            self.remove();
            return TickOutcome::Removed;
        }

        self.age_colliding_entities();

        self.prev_anchor = Some(self.anchor);
        self.prev_rotation = self.rotation.clone();

        if !self.initialized {
            self.initialize();
        }

        self.tick_actors(world, subs)
    }

    fn initialize(&mut self) {
        if self.settings.side.is_server() {
            if let Some(contraption) = self.contraption.as_mut() {
                contraption.start_moving(&self.registry);
            }
        }
        self.initialized = true;
        log::debug!("Driver {} initialized", self.id);
    }

    // --- Removal ---

    /// Takes the driver out of the simulation without placing its structure.
    ///
    /// An authoritative driver stops its actors, unless it is in the middle of
    /// ticking them.
    pub fn remove(&mut self) {
        if self.lifecycle == Lifecycle::Dissolved {
            return;
        }
        self.mark_removed();
        self.lifecycle = Lifecycle::Dissolved;
    }

    /// Releases every rider, then removes the driver.
    pub fn kill(&mut self, world: &mut dyn WorldAccess) {
        self.remove_all_passengers(world);
        self.remove();
    }

    pub(super) fn mark_removed(&mut self) {
        if self.is_alive() && self.settings.side.is_server() && !self.ticking {
            if let Some(contraption) = self.contraption.as_mut() {
                contraption.stop(&self.registry);
            }
        }
        if self.lifecycle == Lifecycle::Assembled {
            self.lifecycle = Lifecycle::Disassembling;
        }
        log::info!("Driver {} removed from the simulation", self.id);
    }

    // --- Persistence ---

    /// Captures the driver and its structure.
    ///
    /// # Errors
    ///
    /// Fails with [`ContraptionError::InvalidState`] if the driver has no structure.
    pub fn to_record(&self, mode: RecordMode) -> Result<ContraptionEntityRecord, ContraptionError> {
        let contraption = self.contraption.as_ref().ok_or(ContraptionError::InvalidState)?;
        Ok(ContraptionEntityRecord {
            id: self.id,
            anchor: self.anchor,
            rotation: self.rotation.clone(),
            initialized: self.initialized,
            synced_stalled: self.synced_stalled,
            contraption: contraption.to_record(mode),
        })
    }

    /// Restores a driver. Riders are not part of the record and must board again.
    pub fn from_record(
        record: ContraptionEntityRecord,
        registry: Arc<BehaviourRegistry>,
        settings: SimulationSettings,
    ) -> Result<Self, PersistenceError> {
        let contraption = Contraption::from_record(record.contraption)?;
        let mut entity = Self::new(record.id, contraption, record.anchor, registry, settings);
        entity.rotation = record.rotation.clone();
        entity.prev_rotation = record.rotation;
        entity.initialized = record.initialized;
        entity.synced_stalled = record.synced_stalled;
        Ok(entity)
    }
}

impl std::fmt::Debug for ContraptionEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContraptionEntity")
            .field("id", &self.id)
            .field("lifecycle", &self.lifecycle)
            .field("anchor", &self.anchor)
            .field("rotation", &self.rotation)
            .field("passengers", &self.passengers.len())
            .field("stalled", &self.synced_stalled)
            .finish()
    }
}
