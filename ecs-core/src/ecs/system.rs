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
//! System framework
//!
//! A system is a subscriber interested in every entity whose signature exactly
//! equals the signature it requires. Behavior lives in the [`System`] trait;
//! the bookkeeping of which entities currently match lives in [`Membership`].
//! The [`SystemRegistry`] owns both and broadcasts entity events to them.

use crate::ecs::{
    Component, ComponentRegistry, ComponentTypeId, Components, EcsError, EcsResult, Entity,
    Signature,
};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Trait for systems driven by the coordinator
///
/// # Example
///
/// ```
/// use ecs_core::ecs::{Component, Components, EcsResult, Entity, Requirements, System};
///
/// struct Health(u32);
/// impl Component for Health {}
///
/// struct Regen;
///
/// impl System for Regen {
///     fn requirements(&self, req: &mut Requirements<'_>) -> EcsResult<()> {
///         req.require::<Health>()?;
///         Ok(())
///     }
///
///     fn update(&mut self, entities: &[Entity], components: &mut Components<'_>) {
///         for &entity in entities {
///             if let Ok(health) = components.get_mut::<Health>(entity) {
///                 health.0 += 1;
///             }
///         }
///     }
/// }
/// ```
pub trait System: 'static {
    /// Declare the component types this system requires
    ///
    /// Called once, when the system is registered.
    fn requirements(&self, req: &mut Requirements<'_>) -> EcsResult<()>;

    /// Per-frame hook, given the entities currently matching this system
    ///
    /// Component values may be changed in place. Attaching or detaching
    /// components is left to the coordinator.
    fn update(&mut self, entities: &[Entity], components: &mut Components<'_>);

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Builder handed to [`System::requirements`]
pub struct Requirements<'a> {
    components: &'a mut ComponentRegistry,
    membership: &'a mut Membership,
}

impl<'a> Requirements<'a> {
    pub(crate) fn new(
        components: &'a mut ComponentRegistry,
        membership: &'a mut Membership,
    ) -> Self {
        Requirements {
            components,
            membership,
        }
    }

    /// Require component type `T`
    pub fn require<T: Component>(&mut self) -> EcsResult<&mut Self> {
        let id = self.components.component_type::<T>()?;
        self.membership.require(id);
        Ok(self)
    }

    /// Require a component type by id
    pub fn require_id(&mut self, id: ComponentTypeId) -> &mut Self {
        self.membership.require(id);
        self
    }

    /// Signature required so far
    pub fn signature(&self) -> Signature {
        self.membership.signature()
    }
}

/// Required signature plus the entities currently matching it exactly
#[derive(Debug, Default, Clone)]
pub struct Membership {
    signature: Signature,
    entities: Vec<Entity>,
    index: HashMap<Entity, usize>,
}

impl Membership {
    /// Membership requiring no components
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership requiring exactly `signature`
    pub fn with_signature(signature: Signature) -> Self {
        Membership {
            signature,
            ..Self::default()
        }
    }

    /// Add `id` to the required signature
    ///
    /// Meant for construction time. Entities already managed are not
    /// re-checked.
    pub fn require(&mut self, id: ComponentTypeId) {
        self.signature.set(id);
    }

    /// The required signature
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Whether `signature` is an exact match
    pub fn matches(&self, signature: Signature) -> bool {
        signature == self.signature
    }

    /// Re-check `entity` against its current `signature`
    ///
    /// Adds the entity on an exact match and drops it otherwise. Returns
    /// whether membership changed.
    pub fn evaluate(&mut self, entity: Entity, signature: Signature) -> bool {
        if self.matches(signature) {
            self.insert(entity)
        } else {
            self.remove(entity)
        }
    }

    /// Drop a destroyed entity
    pub fn notify_destroyed(&mut self, entity: Entity) -> bool {
        self.remove(entity)
    }

    /// Explicitly add `entity`, which must match exactly
    ///
    /// Registering an entity that is already managed is a no-op.
    pub fn register_entity(&mut self, entity: Entity, signature: Signature) -> EcsResult<()> {
        if !self.matches(signature) {
            return Err(EcsError::SignatureMismatch {
                entity,
                expected: self.signature,
                actual: signature,
            });
        }
        self.insert(entity);
        Ok(())
    }

    /// Whether `entity` is managed
    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// Managed entities, in no particular order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of managed entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity is managed
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn insert(&mut self, entity: Entity) -> bool {
        if self.index.contains_key(&entity) {
            return false;
        }
        self.index.insert(entity, self.entities.len());
        self.entities.push(entity);
        true
    }

    fn remove(&mut self, entity: Entity) -> bool {
        let Some(slot) = self.index.remove(&entity) else {
            return false;
        };
        self.entities.swap_remove(slot);
        if let Some(&moved) = self.entities.get(slot) {
            self.index.insert(moved, slot);
        }
        true
    }
}

/// Typed handle to a registered system
pub struct SystemHandle<S> {
    index: usize,
    _marker: PhantomData<fn() -> S>,
}

impl<S> SystemHandle<S> {
    fn new(index: usize) -> Self {
        SystemHandle {
            index,
            _marker: PhantomData,
        }
    }

    /// Registration position of the system
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<S> Clone for SystemHandle<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for SystemHandle<S> {}

impl<S> PartialEq for SystemHandle<S> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<S> Eq for SystemHandle<S> {}

impl<S> fmt::Debug for SystemHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemHandle")
            .field("index", &self.index)
            .field("system", &std::any::type_name::<S>())
            .finish()
    }
}

/// Object-safe view of a boxed system that can also be downcast
trait AnySystem {
    fn as_system_mut(&mut self) -> &mut dyn System;
    fn system_name(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> AnySystem for S {
    fn as_system_mut(&mut self) -> &mut dyn System {
        self
    }

    fn system_name(&self) -> &str {
        self.name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct RegisteredSystem {
    system: Box<dyn AnySystem>,
    membership: Membership,
}

/// Owns every registered system and its membership
///
/// Systems are kept in registration order; [`SystemRegistry::update_all`] runs
/// them in that order.
pub struct SystemRegistry {
    systems: Vec<RegisteredSystem>,
}

impl SystemRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        SystemRegistry {
            systems: Vec::new(),
        }
    }

    /// Take ownership of `system` with its prepared membership
    pub fn register<S: System>(&mut self, system: S, membership: Membership) -> SystemHandle<S> {
        let handle = SystemHandle::new(self.systems.len());
        debug!(
            system = system.name(),
            signature = %membership.signature(),
            "system registered"
        );
        self.systems.push(RegisteredSystem {
            system: Box::new(system),
            membership,
        });
        handle
    }

    /// Tell every system that `entity` was destroyed
    pub fn broadcast_destroyed(&mut self, entity: Entity) {
        for entry in &mut self.systems {
            if entry.membership.notify_destroyed(entity) {
                trace!(system = entry.system.system_name(), %entity, "entity left system");
            }
        }
    }

    /// Re-check `entity` against every system
    pub fn broadcast_evaluate(&mut self, entity: Entity, signature: Signature) {
        for entry in &mut self.systems {
            if entry.membership.evaluate(entity, signature) {
                trace!(
                    system = entry.system.system_name(),
                    %entity,
                    joined = entry.membership.contains(entity),
                    "membership changed"
                );
            }
        }
    }

    /// Run every system's update hook in registration order
    pub fn update_all(&mut self, components: &mut ComponentRegistry) {
        for entry in &mut self.systems {
            entry
                .system
                .as_system_mut()
                .update(entry.membership.entities(), &mut components.view());
        }
    }

    /// Borrow a registered system
    pub fn get<S: System>(&self, handle: SystemHandle<S>) -> Option<&S> {
        self.systems
            .get(handle.index)
            .and_then(|entry| entry.system.as_any().downcast_ref::<S>())
    }

    /// Mutably borrow a registered system
    pub fn get_mut<S: System>(&mut self, handle: SystemHandle<S>) -> Option<&mut S> {
        self.systems
            .get_mut(handle.index)
            .and_then(|entry| entry.system.as_any_mut().downcast_mut::<S>())
    }

    /// Membership of a registered system
    ///
    /// `None` unless the handle points at a system of type `S` in this
    /// registry.
    pub fn membership<S: System>(&self, handle: SystemHandle<S>) -> Option<&Membership> {
        self.systems
            .get(handle.index)
            .filter(|entry| entry.system.as_any().is::<S>())
            .map(|entry| &entry.membership)
    }

    /// Mutable membership of a registered system
    pub fn membership_mut<S: System>(
        &mut self,
        handle: SystemHandle<S>,
    ) -> Option<&mut Membership> {
        self.systems
            .get_mut(handle.index)
            .filter(|entry| entry.system.as_any().is::<S>())
            .map(|entry| &mut entry.membership)
    }

    /// Names of registered systems, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|entry| entry.system.system_name())
    }

    /// Get the number of registered systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether no system is registered
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn id(i: usize) -> ComponentTypeId {
        ComponentTypeId::new(i).unwrap()
    }

    fn sig(ids: &[usize]) -> Signature {
        ids.iter().map(|&i| id(i)).collect()
    }

    struct TestSystem {
        run_count: usize,
        log: Rc<RefCell<Vec<&'static str>>>,
        label: &'static str,
    }

    impl TestSystem {
        fn new(label: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Self {
            TestSystem {
                run_count: 0,
                log: Rc::clone(log),
                label,
            }
        }
    }

    impl System for TestSystem {
        fn requirements(&self, _req: &mut Requirements<'_>) -> EcsResult<()> {
            Ok(())
        }

        fn update(&mut self, _entities: &[Entity], _components: &mut Components<'_>) {
            self.run_count += 1;
            self.log.borrow_mut().push(self.label);
        }

        fn name(&self) -> &str {
            self.label
        }
    }

    #[test]
    fn test_register_entity_requires_exact_match() {
        let mut membership = Membership::with_signature(sig(&[0]));
        let entity = Entity::new(1);

        let err = membership.register_entity(entity, sig(&[0, 1])).unwrap_err();
        assert_eq!(
            err,
            EcsError::SignatureMismatch {
                entity,
                expected: sig(&[0]),
                actual: sig(&[0, 1]),
            }
        );
        assert!(!membership.contains(entity));

        membership.register_entity(entity, sig(&[0])).unwrap();
        membership.register_entity(entity, sig(&[0])).unwrap();
        assert_eq!(membership.entities(), &[entity]);
    }

    #[test]
    fn test_evaluate_drops_entity_that_gained_a_bit() {
        let mut membership = Membership::new();
        membership.require(id(0));
        let entity = Entity::new(2);

        assert!(membership.evaluate(entity, sig(&[0])));
        assert!(membership.contains(entity));

        assert!(membership.evaluate(entity, sig(&[0, 1])));
        assert!(!membership.contains(entity));

        // Already absent: nothing changes.
        assert!(!membership.evaluate(entity, sig(&[0, 1])));
    }

    #[test]
    fn test_notify_destroyed_keeps_index_consistent() {
        let mut membership = Membership::with_signature(sig(&[3]));
        let entities: Vec<Entity> = (0..4).map(Entity::new).collect();
        for &e in &entities {
            membership.evaluate(e, sig(&[3]));
        }

        assert!(membership.notify_destroyed(entities[1]));
        assert!(!membership.notify_destroyed(entities[1]));
        assert_eq!(membership.len(), 3);
        for &e in &[entities[0], entities[2], entities[3]] {
            assert!(membership.contains(e));
        }

        // Removal after a swap still finds the moved entity.
        assert!(membership.notify_destroyed(entities[3]));
        assert_eq!(membership.len(), 2);
        assert!(membership.contains(entities[2]));
    }

    #[test]
    fn test_registry_broadcasts() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SystemRegistry::new();
        let a = registry.register(
            TestSystem::new("a", &log),
            Membership::with_signature(sig(&[0])),
        );
        let b = registry.register(
            TestSystem::new("b", &log),
            Membership::with_signature(sig(&[0, 1])),
        );
        let entity = Entity::new(5);

        registry.broadcast_evaluate(entity, sig(&[0]));
        assert!(registry.membership(a).unwrap().contains(entity));
        assert!(!registry.membership(b).unwrap().contains(entity));

        registry.broadcast_evaluate(entity, sig(&[0, 1]));
        assert!(!registry.membership(a).unwrap().contains(entity));
        assert!(registry.membership(b).unwrap().contains(entity));

        registry.broadcast_destroyed(entity);
        assert!(registry.membership(a).unwrap().is_empty());
        assert!(registry.membership(b).unwrap().is_empty());
    }

    #[test]
    fn test_update_runs_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SystemRegistry::new();
        let first = registry.register(TestSystem::new("first", &log), Membership::new());
        registry.register(TestSystem::new("second", &log), Membership::new());
        registry.register(TestSystem::new("third", &log), Membership::new());

        let mut components = ComponentRegistry::new();
        registry.update_all(&mut components);
        registry.update_all(&mut components);

        assert_eq!(
            *log.borrow(),
            vec!["first", "second", "third", "first", "second", "third"]
        );
        assert_eq!(registry.get(first).unwrap().run_count, 2);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_handle_downcast() {
        struct Other;
        impl System for Other {
            fn requirements(&self, _req: &mut Requirements<'_>) -> EcsResult<()> {
                Ok(())
            }
            fn update(&mut self, _entities: &[Entity], _components: &mut Components<'_>) {}
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SystemRegistry::new();
        let test = registry.register(TestSystem::new("t", &log), Membership::new());
        let other = registry.register(Other, Membership::new());

        registry.get_mut(test).unwrap().run_count = 7;
        assert_eq!(registry.get(test).unwrap().run_count, 7);
        assert!(registry.get(other).is_some());
        assert_eq!(other.index(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_membership_rejects_foreign_handle() {
        struct Other;
        impl System for Other {
            fn requirements(&self, _req: &mut Requirements<'_>) -> EcsResult<()> {
                Ok(())
            }
            fn update(&mut self, _entities: &[Entity], _components: &mut Components<'_>) {}
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut first = SystemRegistry::new();
        let test = first.register(TestSystem::new("t", &log), Membership::new());

        let mut second = SystemRegistry::new();
        assert!(second.membership(test).is_none());

        second.register(Other, Membership::with_signature(sig(&[1])));
        assert!(second.membership(test).is_none());
        assert!(second.membership_mut(test).is_none());
        assert!(first.membership(test).is_some());
    }

    #[test]
    fn test_requirements_builder() {
        struct Tag;
        impl Component for Tag {}

        let mut components = ComponentRegistry::new();
        let mut membership = Membership::new();
        let mut req = Requirements::new(&mut components, &mut membership);
        req.require::<Tag>().unwrap().require_id(id(4));
        assert_eq!(req.signature(), sig(&[0, 4]));
        assert_eq!(membership.signature(), sig(&[0, 4]));
    }
}
