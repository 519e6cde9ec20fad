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
//! Kernel systems
//!
//! Every system follows the same soft-failure policy: an entity that lacks
//! a required component, or whose co-located components disagree on their
//! element count, is skipped for this tick without touching its data. When a
//! system's `warn_on_skip` flag is set the skip is logged at warn level,
//! otherwise at trace level.

mod movement;
mod physics;
mod render_sync;
mod timer;

pub use movement::MovementSystem;
pub use physics::{Contact, ContactResponse, PhysicsSystem, MIN_CORRECTION_SPEED};
pub use render_sync::{RenderFrame, RenderInstance, RenderSync};
pub use timer::{TimerStats, TimerSystem};

use crate::ecs::components::Timer;
use crate::ecs::{Component, ComponentManager, Entity};
use log::{trace, warn};

/// Log an entity being skipped by `system`
pub(crate) fn report_skip(warn_on_skip: bool, system: &str, entity: Entity, reason: &str) {
    if warn_on_skip {
        warn!("{system}: skipping {entity}: {reason}");
    } else {
        trace!("{system}: skipping {entity}: {reason}");
    }
}

/// Live flags of `entity`, when it has a timer covering `size` elements
pub(crate) fn live_mask<'a>(
    timers: &'a ComponentManager<Timer>,
    entity: Entity,
    size: usize,
) -> Option<&'a [bool]> {
    timers
        .try_get(entity)
        .filter(|timer| timer.size() == size)
        .map(Timer::is_live)
}

/// Check out the component of `entity` only if it holds exactly `size` elements
pub(crate) fn take_matching<T: Component>(
    store: &mut ComponentManager<T>,
    entity: Entity,
    size: usize,
) -> Option<T> {
    if store.try_get(entity).map_or(false, |c| c.size() == size) {
        store.take(entity)
    } else {
        None
    }
}
