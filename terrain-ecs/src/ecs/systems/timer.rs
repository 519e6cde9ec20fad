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
//! Lifetime countdown and respawning

use crate::ecs::components::Timer;
use crate::ecs::systems::{report_skip, take_matching};
use crate::ecs::{Component, Entity, Stores, System};
use crate::spawn::Spawner;
use log::debug;

/// Counters of one timer pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerStats {
    /// Entities whose timer was advanced
    pub entities: usize,
    /// Elements that expired and were respawned
    pub respawned: usize,
    /// Elements that expired for good
    pub expired: usize,
}

/// Counts down live elements and recycles or retires them at zero
///
/// A respawned element gets a fresh lifetime, and when the entity carries a
/// matching `Position`/`Movement` also a new spawn position and its initial
/// velocity. A retired element is marked not live and its render intent, if
/// any, is hidden. Retired elements are never advanced again.
#[derive(Debug, Clone)]
pub struct TimerSystem {
    spawner: Spawner,
    /// Log skipped entities at warn level instead of trace
    pub warn_on_skip: bool,
}

impl TimerSystem {
    /// Create a timer system drawing respawn values from `spawner`
    pub fn new(spawner: Spawner) -> Self {
        TimerSystem {
            spawner,
            warn_on_skip: false,
        }
    }

    /// Replace the respawn sampler, restarting its random stream
    pub fn reseed(&mut self, spawner: Spawner) {
        self.spawner = spawner;
    }

    /// Advance every timer by `dt`
    pub fn update(&mut self, entities: &[Entity], stores: &mut Stores, dt: f32) -> TimerStats {
        let mut stats = TimerStats::default();

        for &entity in entities {
            let Some(mut timer) = stores.timers.take(entity) else {
                report_skip(self.warn_on_skip, "TimerSystem", entity, "missing Timer");
                continue;
            };
            let size = timer.size();
            let mut position = take_matching(&mut stores.positions, entity, size);
            let mut movement = take_matching(&mut stores.movements, entity, size);
            let mut render = take_matching(&mut stores.renders, entity, size);

            for i in 0..size {
                if !timer.is_live()[i] {
                    continue;
                }
                timer.timer_mut()[i] -= dt;
                if timer.timer()[i] > 0.0 {
                    continue;
                }

                if timer.respawnable()[i] {
                    self.respawn(&mut timer, i);
                    if let Some(position) = position.as_mut() {
                        position.set(i, self.spawner.sample_position());
                    }
                    if let Some(movement) = movement.as_mut() {
                        movement.set(i, self.spawner.initial_velocity(i));
                    }
                    stats.respawned += 1;
                } else {
                    timer.kill(i);
                    if let Some(render) = render.as_mut() {
                        render.visible_mut()[i] = false;
                    }
                    stats.expired += 1;
                }
            }

            stores.timers.add(entity, timer);
            if let Some(position) = position {
                stores.positions.add(entity, position);
            }
            if let Some(movement) = movement {
                stores.movements.add(entity, movement);
            }
            if let Some(render) = render {
                stores.renders.add(entity, render);
            }
            stats.entities += 1;
        }

        debug!(
            "TimerSystem: {} entities, {} respawned, {} expired",
            stats.entities, stats.respawned, stats.expired
        );
        stats
    }

    fn respawn(&mut self, timer: &mut Timer, index: usize) {
        let lifetime = self.spawner.sample_lifetime();
        timer.restart(index, lifetime);
    }
}

impl System for TimerSystem {
    fn run(&mut self, entities: &[Entity], stores: &mut Stores, dt: f32) -> usize {
        self.update(entities, stores, dt).entities
    }

    fn name(&self) -> &str {
        "TimerSystem"
    }
}
