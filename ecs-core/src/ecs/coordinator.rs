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
//! Coordinator
//!
//! The single entry point for application code. It composes the
//! [`EntityManager`], [`ComponentRegistry`] and [`SystemRegistry`] and keeps
//! their views of which components an entity has in sync: every component
//! add or remove updates the entity's signature and re-evaluates system
//! membership.

use crate::ecs::component::component_name;
use crate::ecs::{
    Component, ComponentRegistry, ComponentTypeId, Components, EcsError, EcsResult, Entity,
    EntityManager, Membership, Requirements, Signature, System, SystemHandle, SystemRegistry,
};
use tracing::{debug, warn};

/// The ECS facade
///
/// # Example
///
/// ```
/// use ecs_core::ecs::{Component, Coordinator};
///
/// #[derive(Debug, PartialEq)]
/// struct Score(u32);
/// impl Component for Score {}
///
/// let mut coordinator = Coordinator::new();
/// coordinator.register_component::<Score>().unwrap();
///
/// let player = coordinator.create_entity().unwrap();
/// coordinator.add_component(player, Score(10)).unwrap();
/// assert_eq!(coordinator.get_component::<Score>(player).unwrap(), &Score(10));
/// ```
pub struct Coordinator {
    entities: EntityManager,
    components: ComponentRegistry,
    systems: SystemRegistry,
}

impl Coordinator {
    /// Create an empty coordinator
    pub fn new() -> Self {
        Coordinator {
            entities: EntityManager::new(),
            components: ComponentRegistry::new(),
            systems: SystemRegistry::new(),
        }
    }

    /// Create a new entity with an empty signature
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        self.entities.create().map_err(|err| {
            warn!(%err, "entity creation rejected");
            err
        })
    }

    /// Destroy an entity, its components and its system memberships
    ///
    /// The id becomes reusable once this returns.
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.entities.destroy(entity)?;
        self.components.on_entity_destroyed(entity);
        self.systems.broadcast_destroyed(entity);
        debug!(%entity, live = self.entities.len(), "entity destroyed");
        Ok(())
    }

    /// Create the store for component type `T`
    pub fn register_component<T: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        self.components.register::<T>()
    }

    /// Attach `component` to a live entity
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        self.check_alive(entity)?;
        self.components.add(entity, component)?;
        let id = self.components.component_type::<T>()?;

        let mut signature = self.entities.signature(entity)?;
        signature.set(id);
        self.entities.set_signature(entity, signature)?;
        self.systems.broadcast_evaluate(entity, signature);
        Ok(())
    }

    /// Detach and return `entity`'s component of type `T`
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        let id = self
            .components
            .type_id_of::<T>()
            .ok_or(EcsError::UnregisteredComponent(component_name::<T>()))?;
        let component = self.components.remove::<T>(entity)?;

        let mut signature = self.entities.signature(entity)?;
        signature.clear(id);
        self.entities.set_signature(entity, signature)?;
        self.systems.broadcast_evaluate(entity, signature);
        Ok(component)
    }

    /// Get `entity`'s component of type `T`
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.components.get::<T>(entity)
    }

    /// Get `entity`'s component of type `T` mutably
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.components.get_mut::<T>(entity)
    }

    /// Whether `entity` has a component of type `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components.contains::<T>(entity)
    }

    /// Id of component type `T`, assigned on first use
    pub fn component_type<T: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        self.components.component_type::<T>()
    }

    /// Current signature of `entity`
    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        self.entities.signature(entity)
    }

    /// Register a system
    ///
    /// The system's requirements are collected first. Every live entity is then
    /// evaluated so the system starts with the entities that already match.
    ///
    /// If `requirements` fails, type ids it handed out are released again.
    pub fn register_system<S: System>(&mut self, system: S) -> EcsResult<SystemHandle<S>> {
        let mut membership = Membership::new();
        let type_mark = self.components.type_count();
        let requirements = system.requirements(&mut Requirements::new(
            &mut self.components,
            &mut membership,
        ));
        if let Err(err) = requirements {
            self.components.release_types_from(type_mark);
            warn!(system = system.name(), %err, "system registration rejected");
            return Err(err);
        }

        for entity in self.entities.entities() {
            let signature = self.entities.signature(entity)?;
            membership.evaluate(entity, signature);
        }

        Ok(self.systems.register(system, membership))
    }

    /// Explicitly add `entity` to a system
    ///
    /// Fails with `SignatureMismatch` unless the entity's signature equals the
    /// system's exactly, and with `UnknownSystem` if `handle` came from another
    /// coordinator.
    pub fn register_entity<S: System>(
        &mut self,
        handle: SystemHandle<S>,
        entity: Entity,
    ) -> EcsResult<()> {
        self.check_alive(entity)?;
        let signature = self.entities.signature(entity)?;
        let membership = self
            .systems
            .membership_mut(handle)
            .ok_or(EcsError::UnknownSystem(handle.index()))?;
        membership.register_entity(entity, signature)?;
        debug!(%entity, system = handle.index(), "entity registered with system");
        Ok(())
    }

    /// Borrow a registered system
    pub fn system<S: System>(&self, handle: SystemHandle<S>) -> Option<&S> {
        self.systems.get(handle)
    }

    /// Mutably borrow a registered system
    pub fn system_mut<S: System>(&mut self, handle: SystemHandle<S>) -> Option<&mut S> {
        self.systems.get_mut(handle)
    }

    /// Entities currently managed by a system
    pub fn system_entities<S: System>(&self, handle: SystemHandle<S>) -> &[Entity] {
        self.systems
            .membership(handle)
            .map(Membership::entities)
            .unwrap_or(&[])
    }

    /// Run every system's update hook, in registration order
    pub fn update_systems(&mut self) {
        self.systems.update_all(&mut self.components);
    }

    /// Check if an entity is alive
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Get the number of alive entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Get the number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Read access to the component stores
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Write access to component values
    ///
    /// Values can be changed in place. Use [`Coordinator::add_component`] and
    /// [`Coordinator::remove_component`] to attach or detach components.
    pub fn components_mut(&mut self) -> Components<'_> {
        self.components.view()
    }

    fn check_alive(&self, entity: Entity) -> EcsResult<()> {
        self.entities.signature(entity)?;
        if self.entities.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::EntityNotAlive(entity))
        }
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}
