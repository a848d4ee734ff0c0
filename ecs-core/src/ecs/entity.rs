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
//! Entity management
//!
//! Entities are plain integer handles with no payload. The [`EntityManager`]
//! hands them out from a FIFO free list, remembers which ones are live, and
//! stores one [`Signature`] per slot.

use crate::ecs::{EcsError, EcsResult, Resource, Signature, MAX_ENTITIES};
use std::collections::VecDeque;
use std::fmt;
use tracing::trace;

/// Handle for an entity
///
/// Unique among live entities only. Once destroyed, the same value may be
/// handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u32);

impl Entity {
    /// Create an entity handle from a raw id
    pub fn new(id: u32) -> Self {
        Entity(id)
    }

    /// Get the raw id
    pub fn id(&self) -> u32 {
        self.0
    }

    /// The id as a slot index
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Owns entity identity and per-entity signatures
pub struct EntityManager {
    free: VecDeque<Entity>,
    signatures: Box<[Signature]>,
    alive: Box<[bool]>,
    live_count: usize,
}

impl EntityManager {
    /// Create a manager with every id in `[0, MAX_ENTITIES)` available
    pub fn new() -> Self {
        EntityManager {
            free: (0..MAX_ENTITIES as u32).map(Entity::new).collect(),
            signatures: vec![Signature::EMPTY; MAX_ENTITIES].into_boxed_slice(),
            alive: vec![false; MAX_ENTITIES].into_boxed_slice(),
            live_count: 0,
        }
    }

    /// Take the oldest free id
    pub fn create(&mut self) -> EcsResult<Entity> {
        let entity = self.free.pop_front().ok_or(EcsError::CapacityExceeded {
            resource: Resource::Entities,
            limit: MAX_ENTITIES,
        })?;

        self.alive[entity.index()] = true;
        self.signatures[entity.index()] = Signature::EMPTY;
        self.live_count += 1;
        trace!(%entity, live = self.live_count, "entity created");

        Ok(entity)
    }

    /// Return a live id to the free list and zero its signature
    pub fn destroy(&mut self, entity: Entity) -> EcsResult<()> {
        self.check_range(entity)?;
        if !self.alive[entity.index()] {
            return Err(EcsError::EntityNotAlive(entity));
        }

        self.signatures[entity.index()] = Signature::EMPTY;
        self.alive[entity.index()] = false;
        self.free.push_back(entity);
        self.live_count -= 1;
        trace!(%entity, live = self.live_count, "entity destroyed");

        Ok(())
    }

    /// Overwrite the signature stored for a live `entity`
    ///
    /// Free ids keep an empty signature.
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> EcsResult<()> {
        self.check_range(entity)?;
        if !self.alive[entity.index()] {
            return Err(EcsError::EntityNotAlive(entity));
        }
        self.signatures[entity.index()] = signature;
        Ok(())
    }

    /// Read the signature stored for `entity`
    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        self.check_range(entity)?;
        Ok(self.signatures[entity.index()])
    }

    /// Check if an entity is alive
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Whether no entity is live
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Live entities in ascending id order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(id, _)| Entity::new(id as u32))
    }

    fn check_range(&self, entity: Entity) -> EcsResult<()> {
        if entity.index() < MAX_ENTITIES {
            Ok(())
        } else {
            Err(EcsError::InvalidEntity(entity))
        }
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}
