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
//! Terrain query behavior seen from outside the crate

use approx::assert_relative_eq;
use glam::Vec3;
use terrain_ecs::ecs::systems::PhysicsSystem;
use terrain_ecs::error::TerrainError;
use terrain_ecs::terrain::{Heightfield, TerrainQuery};

fn tilted(origin: Vec3) -> Heightfield {
    Heightfield::from_fn(8, 6, origin, |ix, iz| 1.0 + 0.3 * ix as f32 - 0.2 * iz as f32).unwrap()
}

#[test]
fn test_planar_terrain_reproduces_plane() {
    let origin = Vec3::new(-4.0, 0.0, 10.0);
    let terrain = tilted(origin);

    for i in 0..50 {
        let lx = (i as f32 * 0.37) % 7.0;
        let lz = (i as f32 * 0.53) % 5.0;
        let point = origin + Vec3::new(lx, 100.0, lz);
        assert!(terrain.in_bounds(point));
        assert_relative_eq!(terrain.height_at(point), 1.0 + 0.3 * lx - 0.2 * lz, epsilon = 1e-4);
    }
}

#[test]
fn test_planar_terrain_normal() {
    let terrain = tilted(Vec3::ZERO);
    let expected = Vec3::new(-0.3, 1.0, 0.2).normalize();

    for point in [Vec3::new(0.5, 0.0, 0.5), Vec3::new(3.9, 0.0, 2.1), Vec3::new(8.0, 0.0, 6.0)] {
        let n = terrain.normal_at(point);
        assert_relative_eq!(n.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(n.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(n.z, expected.z, epsilon = 1e-5);
    }
}

#[test]
fn test_bounds_use_last_full_row() {
    let terrain = Heightfield::flat(4, 4, Vec3::ZERO, 0.0).unwrap();
    assert!(terrain.in_bounds(Vec3::new(0.0, 0.0, 0.0)));
    assert!(terrain.in_bounds(Vec3::new(3.0, 0.0, 3.0)));
    assert!(!terrain.in_bounds(Vec3::new(3.5, 0.0, 1.0)));
    assert!(!terrain.in_bounds(Vec3::new(1.0, 0.0, -0.01)));
}

#[test]
fn test_height_clamped_outside_grid() {
    let terrain = tilted(Vec3::ZERO);
    assert_relative_eq!(
        terrain.height_at(Vec3::new(-5.0, 0.0, 2.0)),
        terrain.height_at(Vec3::new(0.0, 0.0, 2.0)),
        epsilon = 1e-6
    );
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
}

/// Infinite horizontal plane at a fixed height
struct Floor(f32);

impl TerrainQuery for Floor {
    fn in_bounds(&self, _point: Vec3) -> bool {
        true
    }

    fn height_at(&self, _point: Vec3) -> f32 {
        self.0
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        Vec3::Y
    }
}

#[test]
fn test_physics_accepts_any_terrain() {
    let boxed: Box<dyn TerrainQuery> = Box::new(Floor(2.0));
    let physics = PhysicsSystem::new(boxed);

    let mut position = Vec3::new(1000.0, 2.05, -1000.0);
    let mut velocity = Vec3::new(0.0, -1.0, 0.0);
    let contact = physics.step_element(&mut position, &mut velocity, 0.0, 1, 10.0, 0.1);

    assert!(contact.is_some());
    assert!(position.y < 2.0);

    let heightfield = tilted(Vec3::ZERO);
    let borrowed = PhysicsSystem::new(&heightfield);
    assert_relative_eq!(borrowed.terrain().height_at(Vec3::ZERO), 1.0, epsilon = 1e-5);
}
