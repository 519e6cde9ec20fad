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
//! Staged system scheduler
//!
//! Systems are grouped into stages that execute in ascending order; systems
//! sharing a stage run in the order they were added. The kernel's own
//! systems are held in the [`KernelSystem`] enum and dispatched statically,
//! while host-defined systems can be added through the boxed variant.

use crate::ecs::systems::{MovementSystem, PhysicsSystem, TimerSystem};
use crate::ecs::{Entity, Stores, System};
use crate::terrain::TerrainQuery;
use log::trace;

/// Stage identifier for grouping systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StageId(pub usize);

impl StageId {
    /// Create a new stage ID
    pub fn new(id: usize) -> Self {
        StageId(id)
    }
}

/// Standard stages of a kernel tick
pub mod stages {
    use super::StageId;

    /// Movement and physics integration
    pub const MOTION: StageId = StageId(0);

    /// Timer countdown, respawn and expiry
    pub const LIFECYCLE: StageId = StageId(1);
}

/// Any system the scheduler can hold
pub enum KernelSystem<T: TerrainQuery> {
    /// Constant-velocity movement
    Movement(MovementSystem),
    /// Terrain-colliding ball physics
    Physics(PhysicsSystem<T>),
    /// Lifetime countdown
    Timer(TimerSystem),
    /// Host-defined system
    Custom(Box<dyn System>),
}

impl<T: TerrainQuery> System for KernelSystem<T> {
    fn run(&mut self, entities: &[Entity], stores: &mut Stores, dt: f32) -> usize {
        match self {
            KernelSystem::Movement(system) => system.run(entities, stores, dt),
            KernelSystem::Physics(system) => system.run(entities, stores, dt),
            KernelSystem::Timer(system) => system.run(entities, stores, dt),
            KernelSystem::Custom(system) => system.run(entities, stores, dt),
        }
    }

    fn name(&self) -> &str {
        match self {
            KernelSystem::Movement(system) => system.name(),
            KernelSystem::Physics(system) => system.name(),
            KernelSystem::Timer(system) => system.name(),
            KernelSystem::Custom(system) => system.name(),
        }
    }
}

impl<T: TerrainQuery> From<MovementSystem> for KernelSystem<T> {
    fn from(system: MovementSystem) -> Self {
        KernelSystem::Movement(system)
    }
}

impl<T: TerrainQuery> From<PhysicsSystem<T>> for KernelSystem<T> {
    fn from(system: PhysicsSystem<T>) -> Self {
        KernelSystem::Physics(system)
    }
}

impl<T: TerrainQuery> From<TimerSystem> for KernelSystem<T> {
    fn from(system: TimerSystem) -> Self {
        KernelSystem::Timer(system)
    }
}

impl<T: TerrainQuery> From<Box<dyn System>> for KernelSystem<T> {
    fn from(system: Box<dyn System>) -> Self {
        KernelSystem::Custom(system)
    }
}

struct ScheduledSystem<T: TerrainQuery> {
    system: KernelSystem<T>,
    stage: StageId,
}

/// Runs systems stage by stage over one world
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use terrain_ecs::ecs::scheduler::{stages, Scheduler};
/// use terrain_ecs::ecs::systems::{MovementSystem, PhysicsSystem};
/// use terrain_ecs::ecs::World;
/// use terrain_ecs::terrain::Heightfield;
///
/// let terrain = Heightfield::flat(4, 4, Vec3::ZERO, 0.0).unwrap();
/// let mut scheduler: Scheduler<Heightfield> = Scheduler::new();
/// scheduler.add_system(MovementSystem::default(), stages::MOTION);
/// scheduler.add_system(PhysicsSystem::new(terrain), stages::MOTION);
///
/// let mut world = World::new();
/// let (entities, stores) = world.split_mut();
/// scheduler.run(entities, stores, 1.0 / 60.0);
/// assert_eq!(scheduler.system_count(), 2);
/// ```
pub struct Scheduler<T: TerrainQuery> {
    systems: Vec<ScheduledSystem<T>>,
}

impl<T: TerrainQuery> Scheduler<T> {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Scheduler {
            systems: Vec::new(),
        }
    }

    /// Add a system to `stage`, after any system already in that stage
    pub fn add_system<S: Into<KernelSystem<T>>>(&mut self, system: S, stage: StageId) {
        let at = self.systems.partition_point(|s| s.stage <= stage);
        self.systems.insert(
            at,
            ScheduledSystem {
                system: system.into(),
                stage,
            },
        );
    }

    /// Get the number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Get the number of stages in use, counting from stage 0
    pub fn stage_count(&self) -> usize {
        self.systems.last().map_or(0, |s| s.stage.0 + 1)
    }

    /// Names of the registered systems in execution order
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.system.name()).collect()
    }

    /// Registered systems in execution order
    pub fn systems_mut(&mut self) -> impl Iterator<Item = &mut KernelSystem<T>> + '_ {
        self.systems.iter_mut().map(|s| &mut s.system)
    }

    /// Run every system once, returning the total entities processed
    pub fn run(&mut self, entities: &[Entity], stores: &mut Stores, dt: f32) -> usize {
        let mut processed = 0;
        for scheduled in &mut self.systems {
            let count = scheduled.system.run(entities, stores, dt);
            trace!(
                "stage {}: {} processed {count} entities",
                scheduled.stage.0,
                scheduled.system.name()
            );
            processed += count;
        }
        processed
    }

    /// Remove all systems
    pub fn clear(&mut self) {
        self.systems.clear();
    }
}

impl<T: TerrainQuery> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
