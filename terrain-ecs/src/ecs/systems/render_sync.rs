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
//! Render sync
//!
//! Flattens positions and render intents into a [`RenderFrame`] the host
//! can draw from. The kernel itself never draws anything.

use crate::ecs::components::Shape;
use crate::ecs::systems::{live_mask, report_skip};
use crate::ecs::{Component, Entity, Stores};
use glam::Vec3;
use log::debug;

/// One drawable element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderInstance {
    /// Owning entity
    pub entity: Entity,
    /// Element index inside the entity
    pub element: usize,
    /// World position
    pub position: Vec3,
    /// Shape to draw
    pub shape: Shape,
    /// Direction or size, interpreted per shape
    pub dir_size: Vec3,
    /// Draw as wireframe
    pub wireframe: bool,
    /// Lifetime progress when the entity has a timer, 0 just spawned and 1 expired
    pub progress: Option<f32>,
}

/// Everything visible after one tick, ordered by entity then element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    /// Visible instances
    pub instances: Vec<RenderInstance>,
}

impl RenderFrame {
    /// Number of visible instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True when nothing is visible
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instances belonging to `entity`
    pub fn instances_of(&self, entity: Entity) -> impl Iterator<Item = &RenderInstance> + '_ {
        self.instances.iter().filter(move |instance| instance.entity == entity)
    }
}

/// Collects visible, live elements of every entity with a render intent
#[derive(Debug, Clone, Default)]
pub struct RenderSync {
    /// Log skipped entities at warn level instead of trace
    pub warn_on_skip: bool,
}

impl RenderSync {
    /// Create a render sync step
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh frame
    pub fn sync(&self, stores: &Stores) -> RenderFrame {
        let mut frame = RenderFrame::default();
        self.sync_into(stores, &mut frame);
        frame
    }

    /// Refill `frame`, reusing its allocation
    pub fn sync_into(&self, stores: &Stores, frame: &mut RenderFrame) {
        frame.instances.clear();

        for (&entity, render) in stores.renders.all_components() {
            let Some(position) = stores.positions.try_get(entity) else {
                report_skip(self.warn_on_skip, "RenderSync", entity, "missing Position");
                continue;
            };
            let size = render.size();
            if position.size() != size {
                report_skip(self.warn_on_skip, "RenderSync", entity, "element count mismatch");
                continue;
            }

            let live = live_mask(&stores.timers, entity, size);
            let timer = stores.timers.try_get(entity).filter(|t| t.size() == size);

            for i in 0..size {
                if !render.visible()[i] || live.map_or(false, |l| !l[i]) {
                    continue;
                }
                frame.instances.push(RenderInstance {
                    entity,
                    element: i,
                    position: position.get(i),
                    shape: render.shape()[i],
                    dir_size: render.dir_size()[i],
                    wireframe: render.wireframe()[i],
                    progress: timer.map(|t| t.progress(i)),
                });
            }
        }

        frame
            .instances
            .sort_unstable_by_key(|instance| (instance.entity, instance.element));
        debug!("RenderSync: {} visible instances", frame.instances.len());
    }
}
