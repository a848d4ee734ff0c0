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
//! Component storage
//!
//! Components are data containers attached to entities. Each component type
//! lives in its own [`ComponentStore`], a densely packed array kept gap-free by
//! swap-with-last removal.

use crate::ecs::{EcsError, EcsResult, Entity, MAX_ENTITIES};
use std::any::Any;
use std::collections::HashMap;

/// Trait that all components must implement
///
/// Components should be plain data structures without behavior.
pub trait Component: 'static + Send + Sync {}

/// Short type name used in errors and logs
///
/// Drops the module path of the outer type and keeps any generic arguments,
/// so `game::Wrapper<game::Hp>` becomes `Wrapper<game::Hp>`.
pub(crate) fn component_name<T: Component>() -> &'static str {
    let full = std::any::type_name::<T>();
    let head_end = full.find('<').unwrap_or(full.len());
    match full[..head_end].rfind("::") {
        Some(sep) => &full[sep + 2..],
        None => full,
    }
}

/// Densely packed storage for one component type
///
/// The occupied slots are always exactly `[0, len)`. Slot order is not
/// insertion order: removing a value moves the last one into its slot.
///
/// # Example
///
/// ```
/// use ecs_core::ecs::{Component, ComponentStore, Entity};
///
/// struct Health(u32);
/// impl Component for Health {}
///
/// let mut store = ComponentStore::<Health>::new();
/// store.insert(Entity::new(4), Health(10)).unwrap();
/// assert_eq!(store.get(Entity::new(4)).unwrap().0, 10);
/// ```
pub struct ComponentStore<T: Component> {
    /// Mapping from Entity to dense array index
    entity_to_index: HashMap<Entity, usize>,
    /// Mapping from dense array index back to Entity
    index_to_entity: Vec<Entity>,
    components: Vec<T>,
}

impl<T: Component> ComponentStore<T> {
    /// Create an empty store with room for every entity slot
    pub fn new() -> Self {
        ComponentStore {
            entity_to_index: HashMap::with_capacity(MAX_ENTITIES),
            index_to_entity: Vec::with_capacity(MAX_ENTITIES),
            components: Vec::with_capacity(MAX_ENTITIES),
        }
    }

    /// Append `component` for `entity`
    ///
    /// Fails with `InvalidEntity` for ids outside `[0, MAX_ENTITIES)`, which
    /// keeps the store within its pre-allocated capacity.
    pub fn insert(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        if entity.index() >= MAX_ENTITIES {
            return Err(EcsError::InvalidEntity(entity));
        }
        if self.entity_to_index.contains_key(&entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: component_name::<T>(),
            });
        }

        let new_index = self.components.len();
        self.components.push(component);
        self.entity_to_index.insert(entity, new_index);
        self.index_to_entity.push(entity);

        debug_assert_eq!(self.entity_to_index.len(), self.index_to_entity.len());
        debug_assert_eq!(self.entity_to_index.len(), self.components.len());
        Ok(())
    }

    /// Remove and return the component for `entity`
    ///
    /// The last value in the dense array moves into the vacated slot.
    pub fn remove(&mut self, entity: Entity) -> EcsResult<T> {
        let index = self
            .entity_to_index
            .remove(&entity)
            .ok_or_else(|| self.missing(entity))?;

        let last_index = self.components.len() - 1;
        if index != last_index {
            let moved = self.index_to_entity[last_index];
            self.entity_to_index.insert(moved, index);
        }
        self.index_to_entity.swap_remove(index);
        let component = self.components.swap_remove(index);

        debug_assert_eq!(self.entity_to_index.len(), self.index_to_entity.len());
        debug_assert_eq!(self.entity_to_index.len(), self.components.len());
        Ok(component)
    }

    /// Get a reference to the component for `entity`
    pub fn get(&self, entity: Entity) -> EcsResult<&T> {
        match self.entity_to_index.get(&entity) {
            Some(&index) => Ok(&self.components[index]),
            None => Err(self.missing(entity)),
        }
    }

    /// Get a mutable reference to the component for `entity`
    pub fn get_mut(&mut self, entity: Entity) -> EcsResult<&mut T> {
        match self.entity_to_index.get(&entity) {
            Some(&index) => Ok(&mut self.components[index]),
            None => Err(self.missing(entity)),
        }
    }

    /// Drop the component for a destroyed entity, if it has one
    pub fn on_entity_destroyed(&mut self, entity: Entity) {
        if self.contains(entity) {
            // Presence was just checked.
            let _ = self.remove(entity);
        }
    }

    /// Check if an entity has this component
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    /// Get the number of components stored
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Dense slot currently holding `entity`'s component
    pub fn slot_of(&self, entity: Entity) -> Option<usize> {
        self.entity_to_index.get(&entity).copied()
    }

    /// Entity owning the component in `slot`
    pub fn entity_at(&self, slot: usize) -> Option<Entity> {
        self.index_to_entity.get(slot).copied()
    }

    /// Entities with this component, in slot order
    pub fn entities(&self) -> &[Entity] {
        &self.index_to_entity
    }

    /// The dense component array
    pub fn values(&self) -> &[T] {
        &self.components
    }

    /// The dense component array, mutably
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.components
    }

    /// Iterate over `(entity, component)` pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.index_to_entity.iter().copied().zip(self.components.iter())
    }

    /// Parallel mutable iteration over the dense component array
    #[cfg(feature = "parallel")]
    pub fn par_values_mut(&mut self) -> rayon::slice::IterMut<'_, T> {
        use rayon::prelude::*;
        self.components.par_iter_mut()
    }

    fn missing(&self, entity: Entity) -> EcsError {
        EcsError::MissingComponent {
            entity,
            component: component_name::<T>(),
        }
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentStore`]
///
/// Lets the registry hold stores of different component types in one map and
/// broadcast entity destruction without knowing their types.
pub trait ErasedStore: Any {
    /// Drop the destroyed entity's component, if present
    fn on_entity_destroyed(&mut self, entity: Entity);

    /// Whether the entity has a component in this store
    fn contains_entity(&self, entity: Entity) -> bool;

    /// Number of components stored
    fn len(&self) -> usize;

    /// Name of the stored component type
    fn component_name(&self) -> &'static str;

    /// Converts to Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Converts to mutable Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStore for ComponentStore<T> {
    fn on_entity_destroyed(&mut self, entity: Entity) {
        ComponentStore::on_entity_destroyed(self, entity)
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn len(&self) -> usize {
        ComponentStore::len(self)
    }

    fn component_name(&self) -> &'static str {
        component_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
