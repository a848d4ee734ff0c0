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
//! Error types for ECS operations
//!
//! Every variant describes a misuse of the API's preconditions. Operations that
//! fail leave the entity, component and system indices untouched.

use crate::ecs::{Entity, Signature};
use thiserror::Error;

/// Which fixed-capacity resource ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Live entity slots
    Entities,
    /// Distinct component type ids
    ComponentTypes,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Entities => f.write_str("entities"),
            Resource::ComponentTypes => f.write_str("component types"),
        }
    }
}

/// Errors raised by the entity manager, component registry and systems
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A fixed capacity limit was reached.
    #[error("capacity exceeded: at most {limit} {resource}")]
    CapacityExceeded {
        /// The exhausted resource.
        resource: Resource,
        /// The build-time limit.
        limit: usize,
    },

    /// The entity id lies outside `[0, MAX_ENTITIES)`.
    #[error("{0} is out of range")]
    InvalidEntity(Entity),

    /// The entity id is in range but not currently live.
    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    /// The entity already has a component of this type.
    #[error("{entity} already has a {component} component")]
    DuplicateComponent {
        /// Target entity.
        entity: Entity,
        /// Component type name.
        component: &'static str,
    },

    /// The entity has no component of this type.
    #[error("{entity} has no {component} component")]
    MissingComponent {
        /// Target entity.
        entity: Entity,
        /// Component type name.
        component: &'static str,
    },

    /// The component type was registered twice.
    #[error("component type {0} is already registered")]
    DuplicateRegistration(&'static str),

    /// The component type has no store.
    #[error("component type {0} is not registered")]
    UnregisteredComponent(&'static str),

    /// Explicit system registration with a signature that is not an exact match.
    #[error("{entity} has signature {actual} but the system requires {expected}")]
    SignatureMismatch {
        /// Entity being registered.
        entity: Entity,
        /// The system's required signature.
        expected: Signature,
        /// The entity's signature.
        actual: Signature,
    },

    /// The system handle does not belong to this coordinator.
    #[error("no matching system registered at index {0}")]
    UnknownSystem(usize),
}

/// Result type for ECS operations
pub type EcsResult<T> = Result<T, EcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EcsError::MissingComponent {
            entity: Entity::new(3),
            component: "Health",
        };
        assert_eq!(err.to_string(), "Entity(3) has no Health component");

        let err = EcsError::CapacityExceeded {
            resource: Resource::Entities,
            limit: 4,
        };
        assert_eq!(err.to_string(), "capacity exceeded: at most 4 entities");
    }

    #[test]
    fn test_signature_mismatch_message() {
        let err = EcsError::SignatureMismatch {
            entity: Entity::new(1),
            expected: Signature::from_bits(0b01),
            actual: Signature::from_bits(0b11),
        };
        assert!(err.to_string().contains("requires"));
    }

    #[test]
    fn test_unknown_system_message() {
        assert_eq!(
            EcsError::UnknownSystem(3).to_string(),
            "no matching system registered at index 3"
        );
    }
}
