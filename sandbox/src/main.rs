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

// Gantry Sandbox
// Drives a small drilling cart along a line, then places it back into the world.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use gantry_agents::{ContraptionAgent, ContraptionEntity, Rider};
use gantry_core::block::{BlockData, BlockState};
use gantry_core::math::{BlockPos, Direction, Vec3};
use gantry_core::movement::{ActorFlow, BehaviourRegistry, MovementBehaviour, MovementContext, MovementFrame};
use gantry_core::world::WorldAccess;
use gantry_core::{EntityId, Side, SimulationSettings};
use gantry_data::persistence::{PersistenceFormat, RecordMode};
use gantry_data::{ContraptionBuilder, ContraptionKind};

/// A world that only remembers blocks and entity positions.
#[derive(Default)]
struct SandboxWorld {
    blocks: BTreeMap<BlockPos, BlockState>,
    entities: BTreeMap<EntityId, Vec3>,
}

impl WorldAccess for SandboxWorld {
    fn place_block(&mut self, pos: BlockPos, state: &BlockState, _data: &BlockData) {
        self.blocks.insert(pos, state.clone());
    }

    fn entity_position(&self, id: EntityId) -> Option<Vec3> {
        self.entities.get(&id).copied()
    }

    fn set_entity_position(&mut self, id: EntityId, pos: Vec3) {
        self.entities.insert(id, pos);
    }

    fn vehicle_of(&self, _id: EntityId) -> Option<EntityId> {
        None
    }
}

/// Counts the cells it bores through in its context data.
struct Drill;

impl MovementBehaviour for Drill {
    fn visit_new_position(
        &self,
        ctx: &mut MovementContext,
        pos: BlockPos,
        _frame: &mut MovementFrame<'_>,
    ) -> ActorFlow {
        let bored = ctx
            .data
            .get("bored")
            .and_then(|count| count.parse::<u32>().ok())
            .unwrap_or(0);
        ctx.data.insert("bored".into(), (bored + 1).to_string());
        log::info!("Drill at {} bores into {pos}", ctx.local_pos);
        ActorFlow::Continue
    }
}

fn load_settings() -> Result<SimulationSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            Ok(SimulationSettings::from_ron_str(&text)?)
        }
        None => Ok(SimulationSettings::default()),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    let mut registry = BehaviourRegistry::new();
    registry.register("drill", Drill);
    let registry = Arc::new(registry);

    let cart = ContraptionBuilder::new(ContraptionKind::Translating)
        .add_block(BlockPos::new(0, 0, 0), BlockState::new("chassis"))
        .add_block(BlockPos::new(0, 1, 0), BlockState::new("seat"))
        .add_block(BlockPos::new(1, 0, 0), BlockState::facing("drill", Direction::East))
        .add_seat(BlockPos::new(0, 1, 0))
        .build(&registry)?;

    let mut server = ContraptionAgent::new(Arc::clone(&registry), settings.clone());
    let mut client = ContraptionAgent::new(
        Arc::clone(&registry),
        SimulationSettings {
            side: Side::Client,
            ..settings
        },
    );
    let mut world = SandboxWorld::default();
    let mut client_world = SandboxWorld::default();

    let id = server.spawn(cart.clone(), Vec3::new(0.0, 64.0, 0.0));
    client.insert(ContraptionEntity::new(
        id,
        cart,
        Vec3::new(0.0, 64.0, 0.0),
        Arc::clone(&registry),
        client.settings().clone(),
    ));

    let player = EntityId::from_name("player");
    let seated = server
        .get_mut(id)
        .context("cart vanished")?
        .handle_player_interaction(Rider::player(player, 1.8), BlockPos::new(0, 1, 0), &mut world);
    log::info!("Player seated: {seated}");

    for _ in 0..20 {
        if let Some(driver) = server.get_mut(id) {
            driver.move_by(Vec3::new(0.25, 0.0, 0.0));
            driver.update_passenger_positions(&mut world);
        }
        server.tick(&mut world);
        client.tick(&mut client_world);
        for message in server.bus().drain() {
            client.apply_sync(&message, &mut client_world);
        }
    }

    let saved = server.save(id, RecordMode::Full, PersistenceFormat::Readable)?;
    log::info!("Saved cart:\n{}", String::from_utf8_lossy(&saved));

    if let Some(transform) = server.disassemble(id, &mut world)? {
        log::info!("Cart placed at {}", transform.offset);
    }
    for message in server.bus().drain() {
        client.apply_sync(&message, &mut client_world);
    }

    for (pos, state) in &world.blocks {
        log::info!("{pos}: {}", state.kind);
    }
    log::info!(
        "{} server drivers, {} client drivers left",
        server.len(),
        client.len()
    );
    Ok(())
}
