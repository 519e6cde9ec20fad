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
//! Simulation driver
//!
//! Owns a [`World`], the scheduled kernel systems and the latest
//! [`RenderFrame`]. The host calls [`Simulation::init`] once and then
//! [`Simulation::tick`] every frame:
//!
//! ```
//! use glam::Vec3;
//! use terrain_ecs::config::SimulationConfig;
//! use terrain_ecs::simulation::Simulation;
//! use terrain_ecs::terrain::Heightfield;
//!
//! let terrain = Heightfield::flat(20, 20, Vec3::ZERO, 0.0).unwrap();
//! let mut sim = Simulation::new(SimulationConfig::default(), terrain).unwrap();
//! sim.init();
//! for _ in 0..10 {
//!     sim.tick();
//! }
//! assert_eq!(sim.tick_count(), 10);
//! assert_eq!(sim.render_frame().len(), 200);
//! ```

use crate::config::{SimulationConfig, SimulationMode};
use crate::ecs::scheduler::{stages, KernelSystem, Scheduler};
use crate::ecs::systems::{MovementSystem, PhysicsSystem, RenderFrame, RenderSync, TimerSystem};
use crate::ecs::World;
use crate::error::ConfigError;
use crate::spawn::{BallBundle, ParticleBundle, Spawner};
use crate::terrain::TerrainQuery;
use log::{debug, info};

/// Offset between the spawn seed and the respawn seed
const RESPAWN_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// A configured world plus the systems that advance it
pub struct Simulation<T: TerrainQuery> {
    config: SimulationConfig,
    world: World,
    scheduler: Scheduler<T>,
    render_sync: RenderSync,
    frame: RenderFrame,
    tick_count: u64,
    elapsed: f64,
}

impl<T: TerrainQuery> Simulation<T> {
    /// Validate `config` and set up the systems for its mode
    ///
    /// Balls are stepped by the physics system against `terrain`. Particles
    /// are moved by the movement system. Both modes run the timer system in
    /// the lifecycle stage, which only acts on entities carrying a timer.
    pub fn new(config: SimulationConfig, terrain: T) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut scheduler: Scheduler<T> = Scheduler::new();
        match config.mode {
            SimulationMode::Balls => {
                let physics = PhysicsSystem::new(terrain).with_response(config.contact_response);
                scheduler.add_system(physics, stages::MOTION);
            }
            SimulationMode::Particles => {
                scheduler.add_system(MovementSystem::default(), stages::MOTION);
            }
        }
        scheduler.add_system(TimerSystem::new(respawner(&config)), stages::LIFECYCLE);

        Ok(Simulation {
            config,
            world: World::new(),
            scheduler,
            render_sync: RenderSync::new(),
            frame: RenderFrame::default(),
            tick_count: 0,
            elapsed: 0.0,
        })
    }

    /// Discard any previous state and spawn the configured entities
    ///
    /// Both random streams restart from the configured seed, so a re-initialized
    /// simulation replays exactly like a freshly built one.
    pub fn init(&mut self) {
        self.world.clear();
        self.tick_count = 0;
        self.elapsed = 0.0;
        for system in self.scheduler.systems_mut() {
            if let KernelSystem::Timer(timer) = system {
                timer.reseed(respawner(&self.config));
            }
        }

        let mut spawner = Spawner::from_config(&self.config);
        let size = self.config.elements_per_entity;
        for _ in 0..self.config.entity_count {
            let entity = self.world.create_entity();
            let stores = self.world.stores_mut();
            match self.config.mode {
                SimulationMode::Balls => {
                    BallBundle::spawn(&mut spawner, size, self.config.sim_steps).insert(stores, entity)
                }
                SimulationMode::Particles => {
                    ParticleBundle::spawn(&mut spawner, size, self.config.respawn).insert(stores, entity)
                }
            }
        }

        self.render_sync.sync_into(self.world.stores(), &mut self.frame);
        info!(
            "Simulation initialized: {} {:?} entities with {} elements each, seed {}",
            self.config.entity_count, self.config.mode, size, self.config.seed
        );
    }

    /// Advance by the configured timestep
    pub fn tick(&mut self) {
        self.tick_with(self.config.timestep);
    }

    /// Advance by `dt` seconds: motion, then lifecycle, then render sync
    pub fn tick_with(&mut self, dt: f32) {
        let (entities, stores) = self.world.split_mut();
        let processed = self.scheduler.run(entities, stores, dt);
        self.render_sync.sync_into(self.world.stores(), &mut self.frame);

        self.tick_count += 1;
        self.elapsed += f64::from(dt);
        debug!(
            "tick {}: dt {dt}, {processed} system updates, {} visible instances",
            self.tick_count,
            self.frame.len()
        );
    }

    /// Configuration in use
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Entities and components
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access for hosts that edit components between ticks
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Scheduled systems
    pub fn scheduler(&self) -> &Scheduler<T> {
        &self.scheduler
    }

    /// Render data produced by the last `init` or tick
    pub fn render_frame(&self) -> &RenderFrame {
        &self.frame
    }

    /// Ticks since `init`
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated seconds since `init`
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

fn respawner(config: &SimulationConfig) -> Spawner {
    Spawner::new(config.seed.wrapping_add(RESPAWN_SEED_OFFSET), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValueRange;
    use crate::ecs::Component;
    use crate::terrain::Heightfield;
    use glam::Vec3;

    fn ground() -> Heightfield {
        Heightfield::flat(20, 20, Vec3::ZERO, 0.0).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimulationConfig {
            entity_count: 0,
            ..Default::default()
        };
        assert!(Simulation::new(config, ground()).is_err());
    }

    #[test]
    fn test_ball_mode_systems() {
        let sim = Simulation::new(SimulationConfig::default(), ground()).unwrap();
        assert_eq!(sim.scheduler().system_names(), vec!["PhysicsSystem", "TimerSystem"]);
    }

    #[test]
    fn test_init_spawns_configured_entities() {
        let config = SimulationConfig {
            entity_count: 3,
            elements_per_entity: 7,
            ..Default::default()
        };
        let mut sim = Simulation::new(config, ground()).unwrap();
        sim.init();

        assert_eq!(sim.world().entity_count(), 3);
        for &entity in sim.world().entities() {
            assert_eq!(sim.world().stores().balls.get(entity).unwrap().size(), 7);
        }
        assert_eq!(sim.render_frame().len(), 21);

        sim.init();
        assert_eq!(sim.world().entity_count(), 3);
    }

    #[test]
    fn test_balls_fall() {
        let mut sim = Simulation::new(SimulationConfig::default(), ground()).unwrap();
        sim.init();
        let before: Vec<f32> = sim.render_frame().instances.iter().map(|i| i.position.y).collect();
        sim.tick();
        let after: Vec<f32> = sim.render_frame().instances.iter().map(|i| i.position.y).collect();

        assert_eq!(before.len(), after.len());
        assert!(before.iter().zip(&after).all(|(b, a)| a < b));
    }

    #[test]
    fn test_particles_expire_without_respawn() {
        let config = SimulationConfig {
            mode: SimulationMode::Particles,
            elements_per_entity: 10,
            time_to_live: ValueRange::new(0.1, 0.3),
            respawn: false,
            ..Default::default()
        };
        let mut sim = Simulation::new(config, ground()).unwrap();
        sim.init();
        assert_eq!(sim.render_frame().len(), 20);

        for _ in 0..4 {
            sim.tick_with(0.1);
        }
        assert!(sim.render_frame().is_empty());
        assert_eq!(sim.tick_count(), 4);
        assert!((sim.elapsed() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_frames() {
        let config = SimulationConfig {
            mode: SimulationMode::Particles,
            time_to_live: ValueRange::new(0.05, 0.2),
            ..Default::default()
        };
        let mut a = Simulation::new(config.clone(), ground()).unwrap();
        let mut b = Simulation::new(config, ground()).unwrap();
        a.init();
        b.init();
        for _ in 0..20 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.render_frame(), b.render_frame());
    }

    #[test]
    fn test_reinit_replays_fresh_run() {
        let config = SimulationConfig {
            mode: SimulationMode::Particles,
            entity_count: 1,
            elements_per_entity: 20,
            time_to_live: ValueRange::new(0.1, 0.3),
            ..Default::default()
        };
        let mut reused = Simulation::new(config.clone(), ground()).unwrap();
        reused.init();
        for _ in 0..60 {
            reused.tick();
        }

        reused.init();
        let mut fresh = Simulation::new(config, ground()).unwrap();
        fresh.init();
        assert_eq!(reused.render_frame(), fresh.render_frame());
        for _ in 0..60 {
            reused.tick();
            fresh.tick();
            assert_eq!(reused.render_frame(), fresh.render_frame());
        }
    }
}
