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
//! Terrain-aware ball physics
//!
//! Each element is advanced with gravity applied once per tick followed by
//! `sim_steps` equal explicit sub-steps. After every sub-step the lowest
//! point of the ball is probed against the terrain; a probe at or below the
//! surface counts as a contact and triggers a response.
//!
//! # Contact response
//!
//! [`ContactResponse::Reference`] is a geometric correction heuristic, not
//! an elastic collision law. Given penetration depth `d`, velocity `v` and
//! sub-step count `n`:
//!
//! ```text
//! p.y += d
//! c    = v * d / |v|             (skipped when |v| is ~0)
//! p   += c / n * dt
//! v.y += c.y + g * dt
//! v.x += c.x,  v.z += c.z
//! ```
//!
//! The correction follows the incoming velocity, not the surface normal,
//! and gravity is handed back on every contacting sub-step. With several
//! sub-steps a dropped ball ends up hovering just above the surface. With a
//! single sub-step and a coarse `dt` the correction feeds on itself and a
//! resting ball sinks through the ground at an ever growing speed. The
//! behavior is kept as-is for compatibility. [`ContactResponse::Stabilized`]
//! replaces it with a projection that removes the into-surface velocity
//! component, which lets balls come to rest.
//!
//! No restitution, friction or mass is modeled in either mode.

use crate::ecs::components::{Movement, PhysicsBall, Position};
use crate::ecs::systems::{live_mask, report_skip};
use crate::ecs::{Component, Entity, Stores, System};
use crate::terrain::TerrainQuery;
use glam::Vec3;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Speed below which the reference correction is skipped
pub const MIN_CORRECTION_SPEED: f32 = 1e-6;

/// How a ball reacts once its probe reaches the terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactResponse {
    /// Velocity-aligned correction heuristic, reproduced exactly
    ///
    /// Does not hold a resting contact with a single sub-step: a point mass
    /// dropped on flat ground with `sim_steps = 1`, `g = 10`, `dt = 1/60`
    /// tunnels through the surface and keeps accelerating. Use
    /// [`ContactResponse::Stabilized`] when balls must come to rest.
    #[default]
    Reference,
    /// Push out, then cancel the velocity component pointing into the surface
    Stabilized,
}

/// Outcome of one contacting sub-step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Terrain height minus probe height, always >= 0
    pub depth: f32,
    /// Terrain normal at the probe
    pub normal: Vec3,
    /// Direction of `velocity + normal`, zero when that sum vanishes
    pub deflected: Vec3,
}

/// Steps `PhysicsBall` entities against a terrain
///
/// Requires `Position`, `Movement` and `PhysicsBall` with equal element
/// counts. Entities are independent, so with the `parallel` feature they are
/// processed on the rayon pool; the result is identical to a sequential run.
///
/// # Example
///
/// ```
/// use glam::Vec3;
/// use terrain_ecs::ecs::World;
/// use terrain_ecs::ecs::components::{Movement, PhysicsBall, Position};
/// use terrain_ecs::ecs::systems::PhysicsSystem;
/// use terrain_ecs::terrain::Heightfield;
///
/// let terrain = Heightfield::flat(8, 8, Vec3::ZERO, 0.0).unwrap();
/// let mut physics = PhysicsSystem::new(terrain);
///
/// let mut world = World::new();
/// let ball = world.create_entity();
/// let stores = world.stores_mut();
/// stores.positions.add(ball, Position::from_points(&[Vec3::new(2.0, 5.0, 2.0)]));
/// stores.movements.add(ball, Movement::zeroed(1));
/// stores.balls.add(ball, PhysicsBall::uniform(1, 0.5, 4, 9.81));
///
/// let (entities, stores) = world.split_mut();
/// physics.update(entities, stores, 1.0 / 60.0);
///
/// assert!(world.stores().positions.get(ball).unwrap().y()[0] < 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct PhysicsSystem<T: TerrainQuery> {
    terrain: T,
    response: ContactResponse,
    /// Log skipped entities at warn level instead of trace
    pub warn_on_skip: bool,
}

impl<T: TerrainQuery> PhysicsSystem<T> {
    /// Create a physics system using the reference contact response
    pub fn new(terrain: T) -> Self {
        PhysicsSystem {
            terrain,
            response: ContactResponse::default(),
            warn_on_skip: false,
        }
    }

    /// Use a different contact response
    pub fn with_response(mut self, response: ContactResponse) -> Self {
        self.response = response;
        self
    }

    /// Contact response in use
    pub fn response(&self) -> ContactResponse {
        self.response
    }

    /// Terrain the balls collide with
    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    /// Advance all eligible entities by `dt`; returns the number updated
    pub fn update(&mut self, entities: &[Entity], stores: &mut Stores, dt: f32) -> usize {
        let mut jobs: Vec<(Entity, Position, Movement)> = Vec::with_capacity(entities.len());

        for &entity in entities {
            let (Some(pos), Some(mov), Some(ball)) = (
                stores.positions.try_get(entity),
                stores.movements.try_get(entity),
                stores.balls.try_get(entity),
            ) else {
                report_skip(
                    self.warn_on_skip,
                    "PhysicsSystem",
                    entity,
                    "missing Position, Movement or PhysicsBall",
                );
                continue;
            };
            if pos.size() != mov.size() || pos.size() != ball.size() {
                report_skip(self.warn_on_skip, "PhysicsSystem", entity, "element count mismatch");
                continue;
            }

            if let (Some(pos), Some(mov)) = (
                stores.positions.take(entity),
                stores.movements.take(entity),
            ) {
                jobs.push((entity, pos, mov));
            }
        }

        let balls = &stores.balls;
        let timers = &stores.timers;
        let this = &*self;
        let step = |(entity, pos, mov): &mut (Entity, Position, Movement)| -> usize {
            match balls.try_get(*entity) {
                Some(ball) => {
                    let live = live_mask(timers, *entity, pos.size());
                    this.integrate_entity(pos, mov, ball, live, dt)
                }
                None => 0,
            }
        };

        #[cfg(feature = "parallel")]
        let contacts: usize = jobs.par_iter_mut().map(step).sum();
        #[cfg(not(feature = "parallel"))]
        let contacts: usize = jobs.iter_mut().map(step).sum();

        let updated = jobs.len();
        for (entity, pos, mov) in jobs {
            stores.positions.add(entity, pos);
            stores.movements.add(entity, mov);
        }

        debug!(
            "PhysicsSystem: stepped {updated} of {} entities, {contacts} elements touched the terrain",
            entities.len()
        );
        updated
    }

    /// Step every live element of one entity; returns how many touched the terrain
    fn integrate_entity(
        &self,
        pos: &mut Position,
        mov: &mut Movement,
        ball: &PhysicsBall,
        live: Option<&[bool]>,
        dt: f32,
    ) -> usize {
        let mut contacts = 0;
        for i in 0..pos.size() {
            if live.map_or(false, |l| !l[i]) {
                continue;
            }
            let mut position = pos.get(i);
            let mut velocity = mov.get(i);
            let contact = self.step_element(
                &mut position,
                &mut velocity,
                ball.radius()[i],
                ball.sim_steps()[i],
                ball.gravity(),
                dt,
            );
            if contact.is_some() {
                contacts += 1;
            }
            pos.set(i, position);
            mov.set(i, velocity);
        }
        contacts
    }

    /// Advance one ball through a full tick
    ///
    /// Applies gravity once, then `sim_steps` sub-steps of `velocity / sim_steps * dt`,
    /// resolving terrain contact after each. Returns the last contact of the
    /// tick, if any. With `sim_steps == 0` only gravity is applied.
    pub fn step_element(
        &self,
        position: &mut Vec3,
        velocity: &mut Vec3,
        radius: f32,
        sim_steps: u32,
        gravity: f32,
        dt: f32,
    ) -> Option<Contact> {
        velocity.y -= gravity * dt;

        let steps = sim_steps as f32;
        let mut last_contact = None;
        for _ in 0..sim_steps {
            *position += (*velocity / steps) * dt;

            let probe = Vec3::new(position.x, position.y - radius, position.z);
            if !self.terrain.in_bounds(probe) {
                continue;
            }
            let height = self.terrain.height_at(probe);
            if height < probe.y {
                continue;
            }

            let depth = height - probe.y;
            position.y += depth;
            let normal = self.terrain.normal_at(probe);
            let contact = match self.response {
                ContactResponse::Reference => {
                    reference_response(position, velocity, depth, normal, steps, gravity, dt)
                }
                ContactResponse::Stabilized => stabilized_response(velocity, depth, normal),
            };
            trace!(
                "contact at {probe}: depth {depth}, normal {normal}, deflected {}",
                contact.deflected
            );
            last_contact = Some(contact);
        }
        last_contact
    }
}

fn reference_response(
    position: &mut Vec3,
    velocity: &mut Vec3,
    depth: f32,
    normal: Vec3,
    steps: f32,
    gravity: f32,
    dt: f32,
) -> Contact {
    let deflected = (*velocity + normal).normalize_or_zero();

    let speed = velocity.dot(*velocity).sqrt();
    if speed > MIN_CORRECTION_SPEED {
        let correction = *velocity * (depth / speed);
        *position += (correction / steps) * dt;
        velocity.y += correction.y + gravity * dt;
        velocity.x += correction.x;
        velocity.z += correction.z;
    } else {
        velocity.y += gravity * dt;
    }

    Contact {
        depth,
        normal,
        deflected,
    }
}

fn stabilized_response(velocity: &mut Vec3, depth: f32, normal: Vec3) -> Contact {
    let normal = normal.try_normalize().unwrap_or(Vec3::Y);
    let deflected = (*velocity + normal).normalize_or_zero();

    let into_surface = velocity.dot(normal);
    if into_surface < 0.0 {
        *velocity -= normal * into_surface;
    }

    Contact {
        depth,
        normal,
        deflected,
    }
}

impl<T: TerrainQuery> System for PhysicsSystem<T> {
    fn run(&mut self, entities: &[Entity], stores: &mut Stores, dt: f32) -> usize {
        self.update(entities, stores, dt)
    }

    fn name(&self) -> &str {
        "PhysicsSystem"
    }
}
