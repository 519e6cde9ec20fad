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
//! Heightfield terrain
//!
//! A regular grid of `(size_x + 1) * (size_z + 1)` vertices, one unit apart,
//! placed at a world-space origin. Vertex `(ix, iz)` lives at index
//! `iz * (size_x + 1) + ix`. Each grid cell is split into two triangles:
//!
//! ```text
//!  v3 ------ v4        first triangle:  v1, v3, v2
//!   |  \      |        second triangle: v3, v2, v4
//!   |    \    |
//!   |      \  |
//!  v1 ------ v2
//! ```
//!
//! Height queries interpolate across the triangle containing the point.

use crate::error::TerrainError;
use crate::terrain::{barycentric_weights, TerrainQuery, BOUNDS_TOLERANCE};
use glam::{Vec2, Vec3};

/// Read-only heightfield answering [`TerrainQuery`]
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use terrain_ecs::terrain::{Heightfield, TerrainQuery};
///
/// let terrain = Heightfield::flat(10, 10, Vec3::ZERO, 2.0).unwrap();
/// assert_eq!(terrain.height_at(Vec3::new(3.5, 100.0, 4.25)), 2.0);
/// assert!(terrain.in_bounds(Vec3::new(9.0, 0.0, 9.0)));
/// assert!(!terrain.in_bounds(Vec3::new(-1.0, 0.0, 0.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Heightfield {
    size_x: usize,
    size_z: usize,
    origin: Vec3,
    heights: Vec<f32>,
    normals: Vec<Vec3>,
}

impl Heightfield {
    /// Build from vertex heights, deriving per-vertex normals from the mesh
    ///
    /// Each vertex normal is the area-weighted sum of the face normals of the
    /// triangles sharing it, normalized.
    pub fn new(
        size_x: usize,
        size_z: usize,
        origin: Vec3,
        heights: Vec<f32>,
    ) -> Result<Self, TerrainError> {
        Self::check_heights(size_x, size_z, &heights)?;
        let normals = compute_normals(size_x, size_z, &heights);
        Ok(Heightfield {
            size_x,
            size_z,
            origin,
            heights,
            normals,
        })
    }

    /// Build from vertex heights and externally produced vertex normals
    pub fn with_normals(
        size_x: usize,
        size_z: usize,
        origin: Vec3,
        heights: Vec<f32>,
        normals: Vec<Vec3>,
    ) -> Result<Self, TerrainError> {
        Self::check_heights(size_x, size_z, &heights)?;
        if normals.len() != heights.len() {
            return Err(TerrainError::NormalCount {
                expected: heights.len(),
                found: normals.len(),
            });
        }
        Ok(Heightfield {
            size_x,
            size_z,
            origin,
            heights,
            normals,
        })
    }

    /// A level terrain at `height`
    pub fn flat(size_x: usize, size_z: usize, origin: Vec3, height: f32) -> Result<Self, TerrainError> {
        Self::from_fn(size_x, size_z, origin, |_, _| height)
    }

    /// Build by evaluating `height(ix, iz)` at every vertex
    pub fn from_fn<F>(size_x: usize, size_z: usize, origin: Vec3, height: F) -> Result<Self, TerrainError>
    where
        F: Fn(usize, usize) -> f32,
    {
        let mut heights = Vec::with_capacity((size_x + 1) * (size_z + 1));
        for iz in 0..=size_z {
            for ix in 0..=size_x {
                heights.push(height(ix, iz));
            }
        }
        Self::new(size_x, size_z, origin, heights)
    }

    fn check_heights(size_x: usize, size_z: usize, heights: &[f32]) -> Result<(), TerrainError> {
        if size_x == 0 || size_z == 0 {
            return Err(TerrainError::EmptyGrid { size_x, size_z });
        }
        let expected = (size_x + 1) * (size_z + 1);
        if heights.len() != expected {
            return Err(TerrainError::VertexCount {
                expected,
                found: heights.len(),
            });
        }
        Ok(())
    }

    /// Quads along x and z
    pub fn size(&self) -> (usize, usize) {
        (self.size_x, self.size_z)
    }

    /// World-space position of vertex (0, 0), minus its height
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Vertex heights in row-major (z-major) order
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Vertex normals in the same order as [`heights`](Self::heights)
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Index of vertex `(ix, iz)` in the vertex arrays
    pub fn vertex_index(&self, ix: usize, iz: usize) -> usize {
        iz * (self.size_x + 1) + ix
    }

    /// Height of vertex `(ix, iz)`
    ///
    /// # Panics
    ///
    /// Panics if the vertex is outside the grid.
    pub fn vertex_height(&self, ix: usize, iz: usize) -> f32 {
        self.heights[self.vertex_index(ix, iz)]
    }

    fn local(&self, point: Vec3) -> Vec2 {
        let local = point - self.origin;
        Vec2::new(local.x, local.z)
    }
}

impl TerrainQuery for Heightfield {
    /// True when the point is within `[0, size_x - 1] x [0, size_z - 1]` in
    /// terrain-local space, give or take [`BOUNDS_TOLERANCE`].
    fn in_bounds(&self, point: Vec3) -> bool {
        let local = self.local(point);
        let max_x = (self.size_x - 1) as f32;
        let max_z = (self.size_z - 1) as f32;
        local.x >= -BOUNDS_TOLERANCE
            && local.x <= max_x + BOUNDS_TOLERANCE
            && local.y >= -BOUNDS_TOLERANCE
            && local.y <= max_z + BOUNDS_TOLERANCE
    }

    /// Barycentric interpolation over the cell containing the point
    ///
    /// The point is clamped into `[0, size_x - 1] x [0, size_z - 1]` first.
    /// The first triangle is used only when all three of its weights are
    /// strictly positive; anything else, including points on its edges,
    /// is evaluated on the plane of the second triangle without clamping its
    /// weights. On non-planar cells this yields a step along the first
    /// triangle's outer edges.
    fn height_at(&self, point: Vec3) -> f32 {
        let local = self.local(point);
        let p = Vec2::new(
            local.x.clamp(0.0, (self.size_x - 1) as f32),
            local.y.clamp(0.0, (self.size_z - 1) as f32),
        );
        let ix = p.x as usize;
        let iz = p.y as usize;

        let v1 = Vec2::new(ix as f32, iz as f32);
        let v2 = v1 + Vec2::X;
        let v3 = v1 + Vec2::Y;
        let v4 = v1 + Vec2::ONE;

        let h1 = self.vertex_height(ix, iz);
        let h2 = self.vertex_height(ix + 1, iz);
        let h3 = self.vertex_height(ix, iz + 1);
        let h4 = self.vertex_height(ix + 1, iz + 1);

        if let Some(w) = barycentric_weights(p, v1, v3, v2) {
            if w.x > 0.0 && w.y > 0.0 && w.z > 0.0 {
                return h1 * w.x + h3 * w.y + h2 * w.z;
            }
        }
        match barycentric_weights(p, v3, v2, v4) {
            Some(w) => h3 * w.x + h2 * w.y + h4 * w.z,
            None => h1,
        }
    }

    /// Normal of the vertex found by truncating the local coordinates
    fn normal_at(&self, point: Vec3) -> Vec3 {
        let local = self.local(point);
        let ix = (local.x.max(0.0) as usize).min(self.size_x);
        let iz = (local.y.max(0.0) as usize).min(self.size_z);
        self.normals[self.vertex_index(ix, iz)]
    }
}

fn compute_normals(size_x: usize, size_z: usize, heights: &[f32]) -> Vec<Vec3> {
    let row = size_x + 1;
    let vertex = |i: usize| Vec3::new((i % row) as f32, heights[i], (i / row) as f32);
    let mut normals = vec![Vec3::ZERO; heights.len()];

    for iz in 0..size_z {
        for ix in 0..size_x {
            let v = iz * row + ix;
            for [a, b, c] in [[v, v + row, v + 1], [v + 1, v + row, v + row + 1]] {
                let (pa, pb, pc) = (vertex(a), vertex(b), vertex(c));
                let face = (pb - pa).cross(pc - pa);
                normals[a] += face;
                normals[b] += face;
                normals[c] += face;
            }
        }
    }

    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bump() -> Heightfield {
        // 2x2 quads, everything at 0 except the centre vertex (1, 1)
        Heightfield::from_fn(2, 2, Vec3::ZERO, |ix, iz| if (ix, iz) == (1, 1) { 1.0 } else { 0.0 }).unwrap()
    }

    #[test]
    fn test_flat_terrain_is_zero_everywhere() {
        let terrain = Heightfield::flat(2, 2, Vec3::ZERO, 0.0).unwrap();
        for p in [
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(0.3, 0.0, 0.2),
            Vec3::new(0.8, 0.0, 0.9),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-4.0, 0.0, 12.0),
        ] {
            assert_eq!(terrain.height_at(p), 0.0, "at {p}");
        }
    }

    #[test]
    fn test_planar_terrain_interpolates_exactly() {
        let terrain =
            Heightfield::from_fn(4, 4, Vec3::ZERO, |ix, iz| 0.5 * ix as f32 + 0.25 * iz as f32).unwrap();

        // First triangle of cell (1, 2)
        assert_relative_eq!(terrain.height_at(Vec3::new(1.3, 0.0, 2.2)), 1.2, epsilon = 1e-5);
        // Second triangle of cell (1, 2)
        assert_relative_eq!(terrain.height_at(Vec3::new(1.7, 0.0, 2.8)), 1.55, epsilon = 1e-5);
        // On a vertex, where the second triangle's plane is extrapolated
        assert_relative_eq!(terrain.height_at(Vec3::new(2.0, 0.0, 1.0)), 1.25, epsilon = 1e-5);
    }

    #[test]
    fn test_first_triangle_interior() {
        let terrain = bump();
        assert_relative_eq!(terrain.height_at(Vec3::new(0.25, 0.0, 0.25)), 0.0);
    }

    #[test]
    fn test_second_triangle_interior() {
        let terrain = bump();
        // Weight of v4 = (1, 1) is fx + fz - 1
        assert_relative_eq!(terrain.height_at(Vec3::new(0.75, 0.0, 0.75)), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_continuous_across_cell_diagonal() {
        let terrain = bump();
        let below = terrain.height_at(Vec3::new(0.499, 0.0, 0.499));
        let above = terrain.height_at(Vec3::new(0.501, 0.0, 0.501));
        assert!((below - above).abs() < 0.01, "{below} vs {above}");
    }

    #[test]
    fn test_step_on_first_triangle_edge() {
        let terrain = bump();
        // Vertex (0, 0) lies on the first triangle's boundary, so the second
        // triangle's plane is extrapolated: h2 + h3 - h4 = 0 + 0 - 1.
        assert_relative_eq!(terrain.height_at(Vec3::ZERO), -1.0, epsilon = 1e-6);
        // Just inside the first triangle the true value is recovered.
        assert!(terrain.height_at(Vec3::new(0.01, 0.0, 0.01)).abs() < 1e-6);
    }

    #[test]
    fn test_height_clamps_to_grid() {
        let terrain =
            Heightfield::from_fn(3, 3, Vec3::ZERO, |ix, iz| (ix + iz) as f32).unwrap();
        let clamped = terrain.height_at(Vec3::new(-10.0, 0.0, -10.0));
        let corner = terrain.height_at(Vec3::ZERO);
        assert_eq!(clamped, corner);
    }

    #[test]
    fn test_origin_offset_translates_queries() {
        let origin = Vec3::new(10.0, 0.0, -5.0);
        let terrain = Heightfield::from_fn(4, 4, origin, |ix, _| ix as f32).unwrap();

        assert!(terrain.in_bounds(origin));
        assert!(!terrain.in_bounds(Vec3::ZERO));
        assert_relative_eq!(
            terrain.height_at(origin + Vec3::new(2.5, 0.0, 1.25)),
            2.5,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_in_bounds_edges() {
        let terrain = Heightfield::flat(5, 3, Vec3::ZERO, 0.0).unwrap();

        assert!(terrain.in_bounds(Vec3::ZERO));
        assert!(terrain.in_bounds(Vec3::new(4.0, 0.0, 2.0)));
        assert!(terrain.in_bounds(Vec3::new(4.0 + BOUNDS_TOLERANCE * 0.5, 0.0, 2.0)));
        assert!(terrain.in_bounds(Vec3::new(-BOUNDS_TOLERANCE * 0.5, 0.0, 0.0)));

        assert!(!terrain.in_bounds(Vec3::new(4.1, 0.0, 1.0)));
        assert!(!terrain.in_bounds(Vec3::new(1.0, 0.0, 2.1)));
        assert!(!terrain.in_bounds(Vec3::new(-0.1, 0.0, 1.0)));
        assert!(!terrain.in_bounds(Vec3::new(f32::NAN, 0.0, 1.0)));
    }

    #[test]
    fn test_flat_normals_point_up() {
        let terrain = Heightfield::flat(3, 3, Vec3::ZERO, 1.0).unwrap();
        assert!(terrain.normals().iter().all(|n| (*n - Vec3::Y).length() < 1e-6));
        assert!((terrain.normal_at(Vec3::new(1.7, 0.0, 2.2)) - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_sloped_normals_lean_downhill() {
        // Rises along +x, so normals tilt toward -x
        let terrain = Heightfield::from_fn(3, 3, Vec3::ZERO, |ix, _| ix as f32).unwrap();
        let n = terrain.normal_at(Vec3::new(1.5, 0.0, 1.5));
        let expected = Vec3::new(-1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(n.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(n.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(n.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn test_normal_lookup_truncates() {
        let mut normals = vec![Vec3::Y; 9];
        normals[4] = Vec3::X; // vertex (1, 1)
        let terrain = Heightfield::with_normals(2, 2, Vec3::ZERO, vec![0.0; 9], normals).unwrap();

        assert_eq!(terrain.normal_at(Vec3::new(1.9, 0.0, 1.9)), Vec3::X);
        assert_eq!(terrain.normal_at(Vec3::new(0.9, 0.0, 1.9)), Vec3::Y);
        // Far outside clamps to the last vertex
        assert_eq!(terrain.normal_at(Vec3::new(50.0, 0.0, 50.0)), Vec3::Y);
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            Heightfield::new(0, 3, Vec3::ZERO, vec![]),
            Err(TerrainError::EmptyGrid { size_x: 0, size_z: 3 })
        );
        assert_eq!(
            Heightfield::new(2, 2, Vec3::ZERO, vec![0.0; 4]),
            Err(TerrainError::VertexCount { expected: 9, found: 4 })
        );
        assert_eq!(
            Heightfield::with_normals(1, 1, Vec3::ZERO, vec![0.0; 4], vec![Vec3::Y; 3]),
            Err(TerrainError::NormalCount { expected: 4, found: 3 })
        );
    }
}
