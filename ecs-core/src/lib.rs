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
//! # ECS Core
//!
//! A minimal Entity-Component-System data core. Entities are recyclable integer
//! handles, components are typed values stored in densely packed per-type
//! arrays, and systems are subscribers that track every entity whose component
//! signature exactly matches the one they require.
//!
//! ## Features
//!
//! - **Entity recycling**: FIFO free list over a fixed capacity
//! - **Signatures**: one bitmask per entity recording which components it has
//! - **Dense storage**: O(1) insert and swap-remove per component type
//! - **Live membership**: adding or removing a component re-evaluates every system
//! - **Parallelization**: optional Rayon iteration over a store's dense array
//!
//! ## Example
//!
//! ```rust
//! use ecs_core::ecs::{
//!     Component, Components, Coordinator, EcsResult, Entity, Requirements, System,
//! };
//!
//! struct Counter(u32);
//! impl Component for Counter {}
//!
//! struct CountUp;
//!
//! impl System for CountUp {
//!     fn requirements(&self, req: &mut Requirements<'_>) -> EcsResult<()> {
//!         req.require::<Counter>()?;
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, entities: &[Entity], components: &mut Components<'_>) {
//!         for &entity in entities {
//!             if let Ok(counter) = components.get_mut::<Counter>(entity) {
//!                 counter.0 += 1;
//!             }
//!         }
//!     }
//! }
//!
//! let mut coordinator = Coordinator::new();
//! coordinator.register_component::<Counter>().unwrap();
//! let system = coordinator.register_system(CountUp).unwrap();
//!
//! let entity = coordinator.create_entity().unwrap();
//! coordinator.add_component(entity, Counter(0)).unwrap();
//! assert_eq!(coordinator.system_entities(system), &[entity]);
//!
//! coordinator.update_systems();
//! assert_eq!(coordinator.get_component::<Counter>(entity).unwrap().0, 1);
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

pub use ecs::{Coordinator, EcsError, EcsResult, Entity};
