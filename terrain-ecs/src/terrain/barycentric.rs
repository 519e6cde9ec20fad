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
//! Barycentric coordinates on the terrain plane

use glam::{Vec2, Vec3};

/// Barycentric weights of `point` with respect to the triangle `(a, b, c)`
///
/// The returned vector holds the weight of `a`, `b` and `c` in `x`, `y`, `z`.
/// Weights sum to one; a weight is negative when `point` lies outside the
/// triangle on the far side of the opposite edge. Returns `None` for a
/// degenerate (zero-area) triangle.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use terrain_ecs::terrain::barycentric_weights;
///
/// let w = barycentric_weights(Vec2::new(0.25, 0.25), Vec2::ZERO, Vec2::X, Vec2::Y).unwrap();
/// assert!((w.x - 0.5).abs() < 1e-6);
/// assert!((w.y - 0.25).abs() < 1e-6);
/// assert!((w.z - 0.25).abs() < 1e-6);
/// ```
pub fn barycentric_weights(point: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<Vec3> {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = point - a;

    let dot00 = v0.dot(v0);
    let dot01 = v0.dot(v1);
    let dot02 = v0.dot(v2);
    let dot11 = v1.dot(v1);
    let dot12 = v1.dot(v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < f32::EPSILON {
        return None;
    }

    let inv_denom = 1.0 / denom;
    let weight_c = (dot11 * dot02 - dot01 * dot12) * inv_denom;
    let weight_b = (dot00 * dot12 - dot01 * dot02) * inv_denom;
    let weight_a = 1.0 - weight_c - weight_b;

    Some(Vec3::new(weight_a, weight_b, weight_c))
}
