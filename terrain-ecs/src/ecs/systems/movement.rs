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
//! Movement system
//!
//! Explicit Euler position update from velocity: `p' = p + v * dt`.

use crate::ecs::components::Position;
use crate::ecs::systems::{live_mask, report_skip};
use crate::ecs::{Component, Entity, Stores, System};
use log::debug;

/// Integrates element positions from their velocities
///
/// Requires `Position` and `Movement` with equal element counts. Elements
/// marked not live by a matching `Timer` are left where they are.
#[derive(Debug, Clone, Default)]
pub struct MovementSystem {
    /// Log skipped entities at warn level instead of trace
    pub warn_on_skip: bool,
}

impl MovementSystem {
    /// Create a movement system
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance all eligible entities by `dt`; returns the number updated
    pub fn update(&mut self, entities: &[Entity], stores: &mut Stores, dt: f32) -> usize {
        let mut updated = 0;

        for &entity in entities {
            let (Some(pos), Some(mov)) = (
                stores.positions.try_get(entity),
                stores.movements.try_get(entity),
            ) else {
                report_skip(self.warn_on_skip, "MovementSystem", entity, "missing Position or Movement");
                continue;
            };
            if pos.size() != mov.size() {
                report_skip(self.warn_on_skip, "MovementSystem", entity, "element count mismatch");
                continue;
            }

            let Some(mut pos) = stores.positions.take(entity) else {
                continue;
            };
            if let Ok(mov) = stores.movements.get(entity) {
                let live = live_mask(&stores.timers, entity, pos.size());
                integrate(&mut pos, mov.x_velocity(), mov.y_velocity(), mov.z_velocity(), live, dt);
            }
            stores.positions.add(entity, pos);
            updated += 1;
        }

        debug!("MovementSystem: moved {updated} of {} entities", entities.len());
        updated
    }
}

fn integrate(
    pos: &mut Position,
    vx: &[f32],
    vy: &[f32],
    vz: &[f32],
    live: Option<&[bool]>,
    dt: f32,
) {
    let is_live = |i: usize| live.map_or(true, |l| l[i]);

    for (i, (x, v)) in pos.x_mut().iter_mut().zip(vx).enumerate() {
        if is_live(i) {
            *x += v * dt;
        }
    }
    for (i, (y, v)) in pos.y_mut().iter_mut().zip(vy).enumerate() {
        if is_live(i) {
            *y += v * dt;
        }
    }
    for (i, (z, v)) in pos.z_mut().iter_mut().zip(vz).enumerate() {
        if is_live(i) {
            *z += v * dt;
        }
    }
}

impl System for MovementSystem {
    fn run(&mut self, entities: &[Entity], stores: &mut Stores, dt: f32) -> usize {
        self.update(entities, stores, dt)
    }

    fn name(&self) -> &str {
        "MovementSystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Movement, Position, Timer};
    use crate::ecs::World;
    use glam::Vec3;

    #[test]
    fn test_position_advances_by_velocity_times_dt() {
        let mut world = World::new();
        let entity = world.create_entity();
        let start = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.5, 8.0)];
        let velocity = [Vec3::new(0.5, -1.0, 2.0), Vec3::new(3.0, 0.0, -0.25)];
        world.stores_mut().positions.add(entity, Position::from_points(&start));
        world.stores_mut().movements.add(entity, Movement::from_velocities(&velocity));

        let dt = 0.125;
        let (entities, stores) = world.split_mut();
        assert_eq!(MovementSystem::new().update(entities, stores, dt), 1);

        let pos = world.stores().positions.get(entity).unwrap();
        for i in 0..2 {
            assert_eq!(pos.x()[i], start[i].x + velocity[i].x * dt);
            assert_eq!(pos.y()[i], start[i].y + velocity[i].y * dt);
            assert_eq!(pos.z()[i], start[i].z + velocity[i].z * dt);
        }
    }

    #[test]
    fn test_mismatched_sizes_are_left_untouched() {
        let mut world = World::new();
        let entity = world.create_entity();
        let pos = Position::from_points(&[Vec3::ONE, Vec3::ONE]);
        let mov = Movement::from_velocities(&[Vec3::X]);
        world.stores_mut().positions.add(entity, pos.clone());
        world.stores_mut().movements.add(entity, mov.clone());

        let (entities, stores) = world.split_mut();
        assert_eq!(MovementSystem::new().update(entities, stores, 1.0), 0);

        assert_eq!(world.stores().positions.get(entity), Ok(&pos));
        assert_eq!(world.stores().movements.get(entity), Ok(&mov));
    }

    #[test]
    fn test_missing_movement_is_skipped() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.stores_mut().positions.add(entity, Position::zeroed(1));

        let (entities, stores) = world.split_mut();
        assert_eq!(MovementSystem { warn_on_skip: true }.update(entities, stores, 1.0), 0);
        assert_eq!(world.stores().positions.get(entity), Ok(&Position::zeroed(1)));
    }

    #[test]
    fn test_dead_elements_do_not_move() {
        let mut world = World::new();
        let entity = world.create_entity();
        let mut timer = Timer::from_lifetimes(&[1.0, 1.0], false);
        timer.kill(0);
        world.stores_mut().positions.add(entity, Position::zeroed(2));
        world.stores_mut().movements.add(entity, Movement::from_velocities(&[Vec3::X, Vec3::X]));
        world.stores_mut().timers.add(entity, timer);

        let (entities, stores) = world.split_mut();
        MovementSystem::new().update(entities, stores, 1.0);

        let pos = world.stores().positions.get(entity).unwrap();
        assert_eq!(pos.get(0), Vec3::ZERO);
        assert_eq!(pos.get(1), Vec3::X);
    }
}
