//! Entity Component System (ECS) core implementation
//!
//! This module provides the bookkeeping layer of the ECS:
//! - Entity identity and recycling
//! - Per-entity component signatures
//! - Densely packed per-type component storage
//! - Signature-routed system membership
//! - The [`Coordinator`] facade tying them together

mod component;
mod config;
mod coordinator;
mod entity;
mod error;
mod registry;
mod signature;
mod system;

pub use component::{Component, ComponentStore, ErasedStore};
pub use config::{MAX_COMPONENTS, MAX_ENTITIES};
pub use coordinator::Coordinator;
pub use entity::{Entity, EntityManager};
pub use error::{EcsError, EcsResult, Resource};
pub use registry::{ComponentRegistry, Components};
pub use signature::{ComponentTypeId, Signature};
pub use system::{Membership, Requirements, System, SystemHandle, SystemRegistry};
