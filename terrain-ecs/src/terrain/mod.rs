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
//! Terrain query interface
//!
//! The physics system only needs three questions answered about the ground
//! beneath a ball: is this point over the terrain, how high is the terrain
//! here, and which way does it face. [`TerrainQuery`] is that contract;
//! [`Heightfield`] answers it for a regular vertex grid.
//!
//! Terrain data is read-only to the kernel. Whoever generates it owns it.

mod barycentric;
mod heightfield;

pub use barycentric::barycentric_weights;
pub use heightfield::Heightfield;

use glam::Vec3;

/// Slack allowed on the horizontal bounds test, in grid units
pub const BOUNDS_TOLERANCE: f32 = 1e-4;

/// Read-only terrain queries consumed by the physics system
///
/// Implementations must be shareable across threads because physics may
/// process entities in parallel.
pub trait TerrainQuery: Send + Sync {
    /// Whether the horizontal coordinates of `point` lie over the terrain
    fn in_bounds(&self, point: Vec3) -> bool;

    /// Terrain height beneath `point`
    fn height_at(&self, point: Vec3) -> f32;

    /// Surface normal near `point`
    fn normal_at(&self, point: Vec3) -> Vec3;
}

impl<T: TerrainQuery + ?Sized> TerrainQuery for &T {
    fn in_bounds(&self, point: Vec3) -> bool {
        (**self).in_bounds(point)
    }

    fn height_at(&self, point: Vec3) -> f32 {
        (**self).height_at(point)
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        (**self).normal_at(point)
    }
}

impl<T: TerrainQuery + ?Sized> TerrainQuery for Box<T> {
    fn in_bounds(&self, point: Vec3) -> bool {
        (**self).in_bounds(point)
    }

    fn height_at(&self, point: Vec3) -> f32 {
        (**self).height_at(point)
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        (**self).normal_at(point)
    }
}
