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
//! Simulation configuration
//!
//! Every option has a default, so a TOML document only needs the keys it
//! changes:
//!
//! ```toml
//! seed = 7
//! mode = "particles"
//! elements_per_entity = 500
//!
//! [time_to_live]
//! min = 0.5
//! max = 2.0
//! ```

use crate::ecs::systems::ContactResponse;
use crate::error::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Accepted number of entities
pub const ENTITY_COUNT_RANGE: (usize, usize) = (1, 10);
/// Accepted elements per ball entity
pub const BALL_ELEMENTS_RANGE: (usize, usize) = (1, 200);
/// Accepted elements per particle entity
pub const PARTICLE_ELEMENTS_RANGE: (usize, usize) = (1, 1000);
/// Accepted physics sub-steps per tick
pub const SIM_STEPS_RANGE: (usize, usize) = (1, 10);

/// Closed interval `[min, max]` sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lower end
    pub min: f32,
    /// Upper end
    pub max: f32,
}

impl ValueRange {
    /// Create a range
    pub const fn new(min: f32, max: f32) -> Self {
        ValueRange { min, max }
    }

    /// A range holding a single value
    pub const fn fixed(value: f32) -> Self {
        ValueRange {
            min: value,
            max: value,
        }
    }

    /// Both ends finite and ordered, with a finite span
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min <= self.max
            && (self.max - self.min).is_finite()
    }

    /// Draw a value; a single-valued or invalid range yields `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if !self.is_valid() || self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Axis-aligned box new elements are placed in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBounds {
    /// World x range
    pub x: ValueRange,
    /// World y range
    pub y: ValueRange,
    /// World z range
    pub z: ValueRange,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        SpawnBounds {
            x: ValueRange::new(0.0, 20.0),
            y: ValueRange::new(5.0, 10.0),
            z: ValueRange::new(0.0, 20.0),
        }
    }
}

/// Which kind of entities a simulation spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// Terrain-colliding spheres stepped by the physics system
    #[default]
    Balls,
    /// Short-lived points moved by the movement system and recycled by timers
    Particles,
}

impl SimulationMode {
    /// Accepted `elements_per_entity` bounds for this mode
    pub fn element_range(self) -> (usize, usize) {
        match self {
            SimulationMode::Balls => BALL_ELEMENTS_RANGE,
            SimulationMode::Particles => PARTICLE_ELEMENTS_RANGE,
        }
    }
}

/// Options for a [`Simulation`](crate::simulation::Simulation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed of the spawn sampler
    pub seed: u64,
    /// Seconds advanced by `Simulation::tick`
    pub timestep: f32,
    /// Kind of entities to spawn
    pub mode: SimulationMode,
    /// Number of entities
    pub entity_count: usize,
    /// Elements held by every entity
    pub elements_per_entity: usize,
    /// Downward acceleration, >= 0
    pub gravity: f32,
    /// Physics sub-steps per tick
    pub sim_steps: u32,
    /// Ball radius range
    pub radius: ValueRange,
    /// Where elements are placed on spawn and respawn
    pub spawn_bounds: SpawnBounds,
    /// Particle lifetime range in seconds
    pub time_to_live: ValueRange,
    /// Whether expired particles come back
    pub respawn: bool,
    /// Contact handling of the physics system
    pub contact_response: ContactResponse,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seed: 0,
            timestep: 1.0 / 60.0,
            mode: SimulationMode::Balls,
            entity_count: 2,
            elements_per_entity: 100,
            gravity: 10.0,
            sim_steps: 5,
            radius: ValueRange::new(0.1, 1.0),
            spawn_bounds: SpawnBounds::default(),
            time_to_live: ValueRange::new(1.0, 3.0),
            respawn: true,
            contact_response: ContactResponse::Reference,
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every option against its accepted range
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_count("entity_count", self.entity_count, ENTITY_COUNT_RANGE)?;
        check_count(
            "elements_per_entity",
            self.elements_per_entity,
            self.mode.element_range(),
        )?;
        check_count("sim_steps", self.sim_steps as usize, SIM_STEPS_RANGE)?;

        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "timestep",
                value: self.timestep,
                reason: "must be finite and positive",
            });
        }
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "gravity",
                value: self.gravity,
                reason: "must be finite and non-negative",
            });
        }

        self.radius.check("radius")?;
        if self.radius.min < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "radius.min",
                value: self.radius.min,
                reason: "must be non-negative",
            });
        }
        self.time_to_live.check("time_to_live")?;
        if self.time_to_live.min < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "time_to_live.min",
                value: self.time_to_live.min,
                reason: "must be non-negative",
            });
        }
        self.spawn_bounds.x.check("spawn_bounds.x")?;
        self.spawn_bounds.y.check("spawn_bounds.y")?;
        self.spawn_bounds.z.check("spawn_bounds.z")?;
        Ok(())
    }
}

fn check_count(field: &'static str, value: usize, (min, max): (usize, usize)) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
