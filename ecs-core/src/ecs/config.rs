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
//! Build-time capacity limits
//!
//! Both limits are fixed when the crate is compiled. Storage for every
//! entity slot is reserved up front, so nothing grows past these bounds.

/// Maximum number of simultaneously live entities
pub const MAX_ENTITIES: usize = 1028;

/// Maximum number of distinct component types, and the width of a [`Signature`]
///
/// [`Signature`]: crate::ecs::Signature
pub const MAX_COMPONENTS: usize = 32;

// Signature is backed by a u32.
const _: () = assert!(MAX_COMPONENTS <= u32::BITS as usize);
const _: () = assert!(MAX_ENTITIES <= u32::MAX as usize);
