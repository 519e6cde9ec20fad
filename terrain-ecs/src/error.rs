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
//! Error types
//!
//! The per-tick systems never fail: missing components, size mismatches and
//! off-terrain probes are soft skips. Errors only surface at the edges of the
//! kernel, when components, terrains or configurations are constructed.

use crate::ecs::Entity;
use thiserror::Error;

/// Errors raised by entity/component storage and component construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EcsError {
    /// The entity has no component of the requested kind
    #[error("{entity} has no {component} component")]
    ComponentNotFound {
        /// Entity that was queried
        entity: Entity,
        /// Name of the component type
        component: &'static str,
    },

    /// The attribute arrays of a structure-of-arrays component differ in length
    #[error("{component} arrays must share one length: expected {expected}, found {found}")]
    LengthMismatch {
        /// Name of the component type
        component: &'static str,
        /// Length of the first array
        expected: usize,
        /// Length of the offending array
        found: usize,
    },
}

/// Errors raised while building a heightfield
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    /// The grid has no quads along one of its axes
    #[error("heightfield must have at least one quad per axis, got {size_x}x{size_z}")]
    EmptyGrid {
        /// Quads along x
        size_x: usize,
        /// Quads along z
        size_z: usize,
    },

    /// The height array does not hold one value per vertex
    #[error("heightfield expects {expected} vertex heights, got {found}")]
    VertexCount {
        /// (size_x + 1) * (size_z + 1)
        expected: usize,
        /// Supplied count
        found: usize,
    },

    /// The normal array does not hold one value per vertex
    #[error("heightfield expects {expected} vertex normals, got {found}")]
    NormalCount {
        /// (size_x + 1) * (size_z + 1)
        expected: usize,
        /// Supplied count
        found: usize,
    },
}

/// Errors raised while loading or validating a simulation configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML text could not be parsed into a configuration
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// An integer option is outside its accepted range
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Option name
        field: &'static str,
        /// Supplied value
        value: usize,
        /// Inclusive lower bound
        min: usize,
        /// Inclusive upper bound
        max: usize,
    },

    /// A (min, max) range option has min > max or non-finite ends
    #[error("{field} range [{min}, {max}] is invalid")]
    InvalidRange {
        /// Option name
        field: &'static str,
        /// Lower end
        min: f32,
        /// Upper end
        max: f32,
    },

    /// A scalar option is non-finite or has the wrong sign
    #[error("{field} = {value} is invalid: {reason}")]
    InvalidValue {
        /// Option name
        field: &'static str,
        /// Supplied value
        value: f32,
        /// What the value must satisfy
        reason: &'static str,
    },
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    /// Storage or component construction error
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Heightfield construction error
    #[error(transparent)]
    Terrain(#[from] TerrainError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias using the crate-level [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity_and_component() {
        let err = EcsError::ComponentNotFound {
            entity: Entity::new(7),
            component: "Position",
        };
        assert_eq!(err.to_string(), "Entity(7) has no Position component");
    }

    #[test]
    fn test_crate_error_wraps_config_error() {
        let err: Error = ConfigError::OutOfRange {
            field: "sim_steps",
            value: 0,
            min: 1,
            max: 10,
        }
        .into();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "sim_steps = 0 is outside [1, 10]");
    }
}
