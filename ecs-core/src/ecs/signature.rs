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
//! Component signatures
//!
//! A [`Signature`] is a fixed-width bitmask where bit `i` means "has the
//! component type whose [`ComponentTypeId`] is `i`". Entities carry one
//! signature each, systems carry the signature they require.

use crate::ecs::MAX_COMPONENTS;
use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Dense identifier for a registered component type
///
/// Ids are handed out from zero in first-use order and never exceed
/// `MAX_COMPONENTS - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    /// Create an id from its raw index
    ///
    /// Returns `None` if the index does not fit in a signature.
    pub fn new(index: usize) -> Option<Self> {
        if index < MAX_COMPONENTS {
            Some(ComponentTypeId(index as u8))
        } else {
            None
        }
    }

    /// Bit position of this type within a signature
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentType({})", self.0)
    }
}

/// Bitmask of component types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature(u32);

impl Signature {
    /// The empty signature
    pub const EMPTY: Signature = Signature(0);

    /// Build a signature from raw bits
    pub fn from_bits(bits: u32) -> Self {
        Signature(bits)
    }

    /// Raw bits
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Set the bit for `id`
    pub fn set(&mut self, id: ComponentTypeId) {
        self.0 |= 1 << id.index();
    }

    /// Clear the bit for `id`
    pub fn clear(&mut self, id: ComponentTypeId) {
        self.0 &= !(1 << id.index());
    }

    /// Copy of this signature with the bit for `id` set
    pub fn with(mut self, id: ComponentTypeId) -> Self {
        self.set(id);
        self
    }

    /// Whether the bit for `id` is set
    pub fn contains(&self, id: ComponentTypeId) -> bool {
        self.0 & (1 << id.index()) != 0
    }

    /// Whether every bit of `other` is also set here
    pub fn is_superset_of(&self, other: Signature) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bit is set
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of set bits
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Reset every bit
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Iterate over the component type ids present, lowest first
    pub fn ids(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        let bits = self.0;
        (0..MAX_COMPONENTS)
            .filter(move |i| bits & (1 << i) != 0)
            .map(|i| ComponentTypeId(i as u8))
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(self, rhs: Signature) -> Signature {
        Signature(self.0 | rhs.0)
    }
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(self, rhs: Signature) -> Signature {
        Signature(self.0 & rhs.0)
    }
}

impl FromIterator<ComponentTypeId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentTypeId>>(iter: I) -> Self {
        iter.into_iter().fold(Signature::EMPTY, Signature::with)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.0, width = MAX_COMPONENTS)
    }
}
