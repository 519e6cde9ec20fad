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
//! Entity Component System
//!
//! Entities are plain ids. Every component is a structure-of-arrays record
//! describing all elements of one entity, kept in a per-kind
//! [`ComponentManager`]. Systems visit the entities whose components they
//! need and mutate those records by checking them out and writing them back.

mod component;
pub mod components;
mod entity;
pub mod scheduler;
mod system;
pub mod systems;
mod world;

pub use component::{Component, ComponentManager};
pub use entity::Entity;
pub use system::System;
pub use world::{Stores, World};
