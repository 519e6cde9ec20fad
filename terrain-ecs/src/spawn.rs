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
//! Element spawning
//!
//! A [`Spawner`] draws every random quantity from one seeded ChaCha stream,
//! so two spawners built from the same configuration produce the same
//! sequence of positions, radii and lifetimes.

use crate::config::{SimulationConfig, SpawnBounds, ValueRange};
use crate::ecs::components::{Movement, PhysicsBall, Position, RenderIntent, Timer};
use crate::ecs::{Entity, Stores};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded sampler for spawn and respawn values
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: ChaCha8Rng,
    bounds: SpawnBounds,
    radius: ValueRange,
    time_to_live: ValueRange,
    gravity: f32,
}

impl Spawner {
    /// Create a spawner with an explicit seed
    pub fn new(seed: u64, config: &SimulationConfig) -> Self {
        Spawner {
            rng: ChaCha8Rng::seed_from_u64(seed),
            bounds: config.spawn_bounds,
            radius: config.radius,
            time_to_live: config.time_to_live,
            gravity: config.gravity,
        }
    }

    /// Create a spawner seeded with `config.seed`
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.seed, config)
    }

    /// Uniform point inside the spawn bounds
    pub fn sample_position(&mut self) -> Vec3 {
        Vec3::new(
            self.bounds.x.sample(&mut self.rng),
            self.bounds.y.sample(&mut self.rng),
            self.bounds.z.sample(&mut self.rng),
        )
    }

    /// Uniform radius inside the radius range
    pub fn sample_radius(&mut self) -> f32 {
        self.radius.sample(&mut self.rng)
    }

    /// Uniform lifetime inside the time-to-live range
    pub fn sample_lifetime(&mut self) -> f32 {
        self.time_to_live.sample(&mut self.rng)
    }

    /// Starting velocity of the element at `index`
    ///
    /// Elements fan out on a circle of radius 0.5 in the horizontal plane
    /// while falling at `gravity` units per second.
    pub fn initial_velocity(&self, index: usize) -> Vec3 {
        let angle = index as f32;
        Vec3::new(angle.sin() / 2.0, -self.gravity, angle.cos() / 2.0)
    }

    fn sample_points(&mut self, size: usize) -> Vec<Vec3> {
        (0..size).map(|_| self.sample_position()).collect()
    }

    fn initial_velocities(&self, size: usize) -> Vec<Vec3> {
        (0..size).map(|i| self.initial_velocity(i)).collect()
    }
}

/// Components of one ball entity
#[derive(Debug, Clone)]
pub struct BallBundle {
    /// Ball centers
    pub position: Position,
    /// Ball velocities
    pub movement: Movement,
    /// Radii, sub-steps and gravity
    pub ball: PhysicsBall,
    /// Sphere intents sized by radius
    pub render: RenderIntent,
}

impl BallBundle {
    /// Sample `size` balls
    pub fn spawn(spawner: &mut Spawner, size: usize, sim_steps: u32) -> Self {
        let points = spawner.sample_points(size);
        let radii: Vec<f32> = (0..size).map(|_| spawner.sample_radius()).collect();
        let velocities = spawner.initial_velocities(size);

        let mut ball = PhysicsBall::uniform(size, 0.0, sim_steps, spawner.gravity);
        ball.radius_mut().copy_from_slice(&radii);

        BallBundle {
            position: Position::from_points(&points),
            movement: Movement::from_velocities(&velocities),
            ball,
            render: RenderIntent::spheres(&radii),
        }
    }

    /// Attach every component to `entity`
    pub fn insert(self, stores: &mut Stores, entity: Entity) {
        stores.positions.add(entity, self.position);
        stores.movements.add(entity, self.movement);
        stores.balls.add(entity, self.ball);
        stores.renders.add(entity, self.render);
    }
}

/// Components of one particle entity
#[derive(Debug, Clone)]
pub struct ParticleBundle {
    /// Particle positions
    pub position: Position,
    /// Particle velocities
    pub movement: Movement,
    /// Lifetimes and respawn flags
    pub timer: Timer,
    /// Sphere intents sized from the radius range
    pub render: RenderIntent,
}

impl ParticleBundle {
    /// Sample `size` particles
    pub fn spawn(spawner: &mut Spawner, size: usize, respawn: bool) -> Self {
        let points = spawner.sample_points(size);
        let velocities = spawner.initial_velocities(size);
        let lifetimes: Vec<f32> = (0..size).map(|_| spawner.sample_lifetime()).collect();
        let scales: Vec<f32> = (0..size).map(|_| spawner.sample_radius()).collect();

        ParticleBundle {
            position: Position::from_points(&points),
            movement: Movement::from_velocities(&velocities),
            timer: Timer::from_lifetimes(&lifetimes, respawn),
            render: RenderIntent::spheres(&scales),
        }
    }

    /// Attach every component to `entity`
    pub fn insert(self, stores: &mut Stores, entity: Entity) {
        stores.positions.add(entity, self.position);
        stores.movements.add(entity, self.movement);
        stores.timers.add(entity, self.timer);
        stores.renders.add(entity, self.render);
    }
}
