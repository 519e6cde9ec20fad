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
//! System execution framework
//!
//! Systems hold the per-tick logic. Each call receives the live entity
//! sequence and the component stores, visits every entity that carries the
//! components it needs, and leaves the rest untouched.

use crate::ecs::{Entity, Stores};

/// Per-tick operation over the entities sharing a set of components
///
/// Systems keep no references into the stores between calls; whatever
/// state they hold (terrain handle, random source) is their own.
pub trait System: Send + Sync {
    /// Advance the system by `dt` seconds
    ///
    /// Returns the number of entities the system updated.
    fn run(&mut self, entities: &[Entity], stores: &mut Stores, dt: f32) -> usize;

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;

    struct CountingSystem {
        run_count: usize,
    }

    impl System for CountingSystem {
        fn run(&mut self, entities: &[Entity], _stores: &mut Stores, _dt: f32) -> usize {
            self.run_count += 1;
            entities.len()
        }

        fn name(&self) -> &str {
            "CountingSystem"
        }
    }

    #[test]
    fn test_system_sees_every_entity() {
        let mut world = World::new();
        world.create_entity();
        world.create_entity();

        let mut system = CountingSystem { run_count: 0 };
        let (entities, stores) = world.split_mut();
        assert_eq!(system.run(entities, stores, 0.016), 2);
        assert_eq!(system.run_count, 1);
        assert_eq!(system.name(), "CountingSystem");
    }
}
