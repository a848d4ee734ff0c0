// Copyright 2025 John Brosnihan
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
//! Counter demo
//!
//! Registers a single counter component and a system that increments every
//! matching counter until it reaches a limit, logging each value.
//!
//! Run with `RUST_LOG=debug cargo run --example counter` to also see the
//! coordinator's own lifecycle events.

use ecs_core::ecs::{
    Component, Components, Coordinator, EcsResult, Entity, Requirements, System,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Counter payload
struct Counter {
    value: u32,
}

impl Component for Counter {}

/// Increments counters below `limit`
struct CountSystem {
    limit: u32,
}

impl System for CountSystem {
    fn requirements(&self, req: &mut Requirements<'_>) -> EcsResult<()> {
        req.require::<Counter>()?;
        Ok(())
    }

    fn update(&mut self, entities: &[Entity], components: &mut Components<'_>) {
        for &entity in entities {
            if let Ok(counter) = components.get_mut::<Counter>(entity) {
                if counter.value < self.limit {
                    info!(%entity, value = counter.value, "tick");
                    counter.value += 1;
                }
            }
        }
    }
}

fn main() -> EcsResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut coordinator = Coordinator::new();
    coordinator.register_component::<Counter>()?;

    let player = coordinator.create_entity()?;
    coordinator.add_component(player, Counter { value: 10 })?;

    let system = coordinator.register_system(CountSystem { limit: 100 })?;
    info!(
        managed = coordinator.system_entities(system).len(),
        "system registered"
    );

    while coordinator.get_component::<Counter>(player)?.value < 100 {
        coordinator.update_systems();
    }

    info!(
        final_value = coordinator.get_component::<Counter>(player)?.value,
        "done"
    );
    Ok(())
}
