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
//! Component registry
//!
//! Maps each component type to a dense [`ComponentTypeId`] and owns one
//! type-erased [`ComponentStore`] per registered type. Typed calls are routed
//! to the right store through a single checked downcast.
//!
//! Systems get a [`Components`] view instead, which can read and modify
//! existing values but cannot attach or detach them.

use crate::ecs::component::component_name;
use crate::ecs::{
    Component, ComponentStore, ComponentTypeId, EcsError, EcsResult, Entity, ErasedStore,
    Resource, MAX_COMPONENTS,
};
use std::any::TypeId;
use std::collections::HashMap;
use tracing::debug;

/// Owns every component store, keyed by component type id
pub struct ComponentRegistry {
    type_ids: HashMap<TypeId, ComponentTypeId>,
    type_names: Vec<&'static str>,
    stores: HashMap<ComponentTypeId, Box<dyn ErasedStore>>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        ComponentRegistry {
            type_ids: HashMap::new(),
            type_names: Vec::new(),
            stores: HashMap::new(),
        }
    }

    /// Create the store for `T`
    ///
    /// Fails with `DuplicateRegistration` if `T` already has a store.
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        let id = self.component_type::<T>()?;
        if self.stores.contains_key(&id) {
            return Err(EcsError::DuplicateRegistration(component_name::<T>()));
        }

        self.stores.insert(id, Box::new(ComponentStore::<T>::new()));
        debug!(component = component_name::<T>(), %id, "component registered");
        Ok(id)
    }

    /// Id of `T`, assigning the next free one on first use
    pub fn component_type<T: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        let type_id = TypeId::of::<T>();
        if let Some(&id) = self.type_ids.get(&type_id) {
            return Ok(id);
        }

        let id = ComponentTypeId::new(self.type_names.len()).ok_or(
            EcsError::CapacityExceeded {
                resource: Resource::ComponentTypes,
                limit: MAX_COMPONENTS,
            },
        )?;
        self.type_ids.insert(type_id, id);
        self.type_names.push(component_name::<T>());
        Ok(id)
    }

    /// Id of `T` if one was already assigned
    pub fn type_id_of<T: Component>(&self) -> Option<ComponentTypeId> {
        self.type_ids.get(&TypeId::of::<T>()).copied()
    }

    /// Name of the type behind `id`, for diagnostics
    pub fn type_name(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.type_names.get(id.index()).copied()
    }

    /// Whether `T` has a store
    pub fn is_registered<T: Component>(&self) -> bool {
        self.type_id_of::<T>()
            .map(|id| self.stores.contains_key(&id))
            .unwrap_or(false)
    }

    /// Typed access to the store for `T`
    pub fn store<T: Component>(&self) -> EcsResult<&ComponentStore<T>> {
        self.type_id_of::<T>()
            .and_then(|id| self.stores.get(&id))
            .and_then(|store| store.as_any().downcast_ref::<ComponentStore<T>>())
            .ok_or(EcsError::UnregisteredComponent(component_name::<T>()))
    }

    /// Typed mutable access to the store for `T`
    pub fn store_mut<T: Component>(&mut self) -> EcsResult<&mut ComponentStore<T>> {
        let id = self.type_id_of::<T>();
        id.and_then(|id| self.stores.get_mut(&id))
            .and_then(|store| store.as_any_mut().downcast_mut::<ComponentStore<T>>())
            .ok_or(EcsError::UnregisteredComponent(component_name::<T>()))
    }

    /// Insert `component` for `entity` into the store for `T`
    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        self.store_mut::<T>()?.insert(entity, component)
    }

    /// Remove and return `entity`'s component of type `T`
    pub fn remove<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        self.store_mut::<T>()?.remove(entity)
    }

    /// Get `entity`'s component of type `T`
    pub fn get<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.store::<T>()?.get(entity)
    }

    /// Get `entity`'s component of type `T` mutably
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.store_mut::<T>()?.get_mut(entity)
    }

    /// Whether `entity` has a component of type `T`
    pub fn contains<T: Component>(&self, entity: Entity) -> bool {
        self.store::<T>()
            .map(|store| store.contains(entity))
            .unwrap_or(false)
    }

    /// View that can mutate values but not attach or detach components
    pub(crate) fn view(&mut self) -> Components<'_> {
        Components { registry: self }
    }

    /// Number of type ids handed out so far
    pub(crate) fn type_count(&self) -> usize {
        self.type_names.len()
    }

    /// Forget every type id at or above `len`
    ///
    /// Only ids without a store may be released.
    pub(crate) fn release_types_from(&mut self, len: usize) {
        debug_assert!(self.stores.keys().all(|id| id.index() < len));
        self.type_ids.retain(|_, id| id.index() < len);
        self.type_names.truncate(len);
    }

    /// Drop `entity`'s components from every store
    pub fn on_entity_destroyed(&mut self, entity: Entity) {
        for store in self.stores.values_mut() {
            store.on_entity_destroyed(entity);
        }
    }

    /// Number of registered stores
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Whether no store is registered
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Value-level access to the component stores
///
/// Handed to [`System::update`] and returned by
/// [`Coordinator::components_mut`]. Components can be read and modified in
/// place, but attaching or detaching them has to go through the coordinator so
/// signatures and system membership stay in step.
///
/// ```compile_fail
/// use ecs_core::ecs::{Component, Coordinator};
///
/// struct Tag;
/// impl Component for Tag {}
///
/// let mut coordinator = Coordinator::new();
/// let entity = coordinator.create_entity().unwrap();
/// coordinator.components_mut().remove::<Tag>(entity);
/// ```
///
/// [`System::update`]: crate::ecs::System::update
/// [`Coordinator::components_mut`]: crate::ecs::Coordinator::components_mut
pub struct Components<'a> {
    registry: &'a mut ComponentRegistry,
}

impl<'a> Components<'a> {
    /// Get `entity`'s component of type `T`
    pub fn get<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.registry.get::<T>(entity)
    }

    /// Get `entity`'s component of type `T` mutably
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.registry.get_mut::<T>(entity)
    }

    /// Whether `entity` has a component of type `T`
    pub fn contains<T: Component>(&self, entity: Entity) -> bool {
        self.registry.contains::<T>(entity)
    }

    /// Read-only access to the store for `T`
    pub fn store<T: Component>(&self) -> EcsResult<&ComponentStore<T>> {
        self.registry.store::<T>()
    }

    /// The dense value array for `T`, mutably
    pub fn values_mut<T: Component>(&mut self) -> EcsResult<&mut [T]> {
        Ok(self.registry.store_mut::<T>()?.values_mut())
    }

    /// Parallel mutable iteration over the dense value array for `T`
    #[cfg(feature = "parallel")]
    pub fn par_values_mut<T: Component>(&mut self) -> EcsResult<rayon::slice::IterMut<'_, T>> {
        Ok(self.registry.store_mut::<T>()?.par_values_mut())
    }
}
