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
//! # Terrain ECS
//!
//! A data-oriented entity component system kernel that steps thousands of
//! ball and particle elements against a heightfield terrain.
//!
//! ## Features
//!
//! - **Structure-of-arrays components**: one record per entity holds the
//!   attribute arrays of all its elements
//! - **Terrain collision**: sub-stepped gravity integration with a
//!   configurable contact response
//! - **Lifecycles**: timers that respawn or retire elements
//! - **Parallelization**: optional Rayon integration for the physics system
//! - **Render sync**: a host-facing frame of visible elements after each tick
//!
//! ## Example
//!
//! ```rust
//! use glam::Vec3;
//! use terrain_ecs::ecs::World;
//! use terrain_ecs::ecs::components::{Movement, Position};
//! use terrain_ecs::ecs::systems::MovementSystem;
//!
//! let mut world = World::new();
//! let entity = world.create_entity();
//! world.stores_mut().positions.add(entity, Position::zeroed(2));
//! world
//!     .stores_mut()
//!     .movements
//!     .add(entity, Movement::from_velocities(&[Vec3::X, Vec3::Z]));
//!
//! let mut movement = MovementSystem::default();
//! let (entities, stores) = world.split_mut();
//! movement.update(entities, stores, 0.5);
//!
//! let position = world.stores().positions.get(entity).unwrap();
//! assert_eq!(position.get(0), Vec3::new(0.5, 0.0, 0.0));
//! ```

#![warn(missing_docs)]

/// Simulation configuration
pub mod config;

/// Entity Component System implementation
pub mod ecs;

/// Error types
pub mod error;

/// Seeded spawning of elements
pub mod spawn;

/// Simulation driver
pub mod simulation;

/// Terrain queries
pub mod terrain;

pub use config::SimulationConfig;
pub use ecs::{Entity, World};
pub use error::{Error, Result};
pub use simulation::Simulation;
pub use terrain::{Heightfield, TerrainQuery};
