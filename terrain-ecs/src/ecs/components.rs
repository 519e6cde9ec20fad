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
//! Kernel component kinds
//!
//! Every component is a structure-of-arrays record: one contiguous array per
//! attribute, all of the same length, indexed by element. Arrays are only
//! handed out as slices so a record's element count is fixed once built.
//!
//! Single precision is used throughout; the kernel targets thousands of
//! small bodies per frame rather than long-horizon accuracy.

use crate::ecs::Component;
use crate::error::EcsError;
use glam::Vec3;

fn check_len(component: &'static str, expected: usize, found: usize) -> Result<(), EcsError> {
    if expected == found {
        Ok(())
    } else {
        Err(EcsError::LengthMismatch {
            component,
            expected,
            found,
        })
    }
}

/// Per-element world-space positions
///
/// # Examples
///
/// ```
/// use terrain_ecs::ecs::components::Position;
/// use glam::Vec3;
///
/// let mut pos = Position::new(vec![0.0, 1.0], vec![2.0, 3.0], vec![4.0, 5.0]).unwrap();
/// assert_eq!(pos.get(1), Vec3::new(1.0, 3.0, 5.0));
///
/// pos.set(0, Vec3::ONE);
/// assert_eq!(pos.x()[0], 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    x: Vec<f32>,
    y: Vec<f32>,
    z: Vec<f32>,
}

impl Position {
    /// Build from one array per axis
    ///
    /// Fails with [`EcsError::LengthMismatch`] unless all arrays share a length.
    pub fn new(x: Vec<f32>, y: Vec<f32>, z: Vec<f32>) -> Result<Self, EcsError> {
        check_len(Self::NAME, x.len(), y.len())?;
        check_len(Self::NAME, x.len(), z.len())?;
        Ok(Position { x, y, z })
    }

    /// `size` elements at the origin
    pub fn zeroed(size: usize) -> Self {
        Position {
            x: vec![0.0; size],
            y: vec![0.0; size],
            z: vec![0.0; size],
        }
    }

    /// Build from a list of points
    pub fn from_points(points: &[Vec3]) -> Self {
        Position {
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
            z: points.iter().map(|p| p.z).collect(),
        }
    }

    /// X coordinates
    pub fn x(&self) -> &[f32] {
        &self.x
    }

    /// Y coordinates
    pub fn y(&self) -> &[f32] {
        &self.y
    }

    /// Z coordinates
    pub fn z(&self) -> &[f32] {
        &self.z
    }

    /// Mutable X coordinates
    pub fn x_mut(&mut self) -> &mut [f32] {
        &mut self.x
    }

    /// Mutable Y coordinates
    pub fn y_mut(&mut self) -> &mut [f32] {
        &mut self.y
    }

    /// Mutable Z coordinates
    pub fn z_mut(&mut self) -> &mut [f32] {
        &mut self.z
    }

    /// Position of element `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= size()`.
    pub fn get(&self, index: usize) -> Vec3 {
        Vec3::new(self.x[index], self.y[index], self.z[index])
    }

    /// Overwrite the position of element `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= size()`.
    pub fn set(&mut self, index: usize, value: Vec3) {
        self.x[index] = value.x;
        self.y[index] = value.y;
        self.z[index] = value.z;
    }

    /// Check that every coordinate is finite
    pub fn is_valid(&self) -> bool {
        self.x
            .iter()
            .chain(&self.y)
            .chain(&self.z)
            .all(|v| v.is_finite())
    }
}

impl Component for Position {
    const NAME: &'static str = "Position";

    fn size(&self) -> usize {
        self.x.len()
    }
}

/// Per-element velocities in units per second
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    x_velocity: Vec<f32>,
    y_velocity: Vec<f32>,
    z_velocity: Vec<f32>,
}

impl Movement {
    /// Build from one array per axis
    pub fn new(
        x_velocity: Vec<f32>,
        y_velocity: Vec<f32>,
        z_velocity: Vec<f32>,
    ) -> Result<Self, EcsError> {
        check_len(Self::NAME, x_velocity.len(), y_velocity.len())?;
        check_len(Self::NAME, x_velocity.len(), z_velocity.len())?;
        Ok(Movement {
            x_velocity,
            y_velocity,
            z_velocity,
        })
    }

    /// `size` elements at rest
    pub fn zeroed(size: usize) -> Self {
        Movement {
            x_velocity: vec![0.0; size],
            y_velocity: vec![0.0; size],
            z_velocity: vec![0.0; size],
        }
    }

    /// Build from a list of velocity vectors
    pub fn from_velocities(velocities: &[Vec3]) -> Self {
        Movement {
            x_velocity: velocities.iter().map(|v| v.x).collect(),
            y_velocity: velocities.iter().map(|v| v.y).collect(),
            z_velocity: velocities.iter().map(|v| v.z).collect(),
        }
    }

    /// X velocities
    pub fn x_velocity(&self) -> &[f32] {
        &self.x_velocity
    }

    /// Y velocities
    pub fn y_velocity(&self) -> &[f32] {
        &self.y_velocity
    }

    /// Z velocities
    pub fn z_velocity(&self) -> &[f32] {
        &self.z_velocity
    }

    /// Mutable X velocities
    pub fn x_velocity_mut(&mut self) -> &mut [f32] {
        &mut self.x_velocity
    }

    /// Mutable Y velocities
    pub fn y_velocity_mut(&mut self) -> &mut [f32] {
        &mut self.y_velocity
    }

    /// Mutable Z velocities
    pub fn z_velocity_mut(&mut self) -> &mut [f32] {
        &mut self.z_velocity
    }

    /// Velocity of element `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= size()`.
    pub fn get(&self, index: usize) -> Vec3 {
        Vec3::new(
            self.x_velocity[index],
            self.y_velocity[index],
            self.z_velocity[index],
        )
    }

    /// Overwrite the velocity of element `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= size()`.
    pub fn set(&mut self, index: usize, value: Vec3) {
        self.x_velocity[index] = value.x;
        self.y_velocity[index] = value.y;
        self.z_velocity[index] = value.z;
    }
}

impl Component for Movement {
    const NAME: &'static str = "Movement";

    fn size(&self) -> usize {
        self.x_velocity.len()
    }
}

/// Ball parameters consumed by the physics system
///
/// `gravity` is a magnitude applied along -Y and is shared by every element
/// of the record. `sim_steps` is the number of sub-steps taken per tick for
/// each element.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBall {
    radius: Vec<f32>,
    sim_steps: Vec<u32>,
    gravity: f32,
}

impl PhysicsBall {
    /// Build from per-element radii and sub-step counts
    pub fn new(radius: Vec<f32>, sim_steps: Vec<u32>, gravity: f32) -> Result<Self, EcsError> {
        check_len(Self::NAME, radius.len(), sim_steps.len())?;
        Ok(PhysicsBall {
            radius,
            sim_steps,
            gravity,
        })
    }

    /// `size` identical balls
    pub fn uniform(size: usize, radius: f32, sim_steps: u32, gravity: f32) -> Self {
        PhysicsBall {
            radius: vec![radius; size],
            sim_steps: vec![sim_steps; size],
            gravity,
        }
    }

    /// Ball radii
    pub fn radius(&self) -> &[f32] {
        &self.radius
    }

    /// Sub-step counts
    pub fn sim_steps(&self) -> &[u32] {
        &self.sim_steps
    }

    /// Gravity magnitude
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Mutable ball radii
    pub fn radius_mut(&mut self) -> &mut [f32] {
        &mut self.radius
    }

    /// Mutable sub-step counts
    pub fn sim_steps_mut(&mut self) -> &mut [u32] {
        &mut self.sim_steps
    }

    /// Replace the gravity magnitude
    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }
}

impl Component for PhysicsBall {
    const NAME: &'static str = "PhysicsBall";

    fn size(&self) -> usize {
        self.radius.len()
    }
}

/// Countdown lifecycle of each element
///
/// An element is ticked while `is_live`; when its countdown reaches zero it
/// either respawns (`respawnable`) or dies for good. `lifetime` keeps the
/// duration the countdown started from.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    timer: Vec<f32>,
    lifetime: Vec<f32>,
    is_live: Vec<bool>,
    respawnable: Vec<bool>,
}

impl Timer {
    /// Build from countdowns and flags; each countdown is also the element's lifetime
    pub fn new(timer: Vec<f32>, is_live: Vec<bool>, respawnable: Vec<bool>) -> Result<Self, EcsError> {
        check_len(Self::NAME, timer.len(), is_live.len())?;
        check_len(Self::NAME, timer.len(), respawnable.len())?;
        Ok(Timer {
            lifetime: timer.clone(),
            timer,
            is_live,
            respawnable,
        })
    }

    /// Every element live with the given lifetimes
    pub fn from_lifetimes(lifetimes: &[f32], respawnable: bool) -> Self {
        Timer {
            timer: lifetimes.to_vec(),
            lifetime: lifetimes.to_vec(),
            is_live: vec![true; lifetimes.len()],
            respawnable: vec![respawnable; lifetimes.len()],
        }
    }

    /// Remaining time per element
    pub fn timer(&self) -> &[f32] {
        &self.timer
    }

    /// Mutable remaining time per element
    pub fn timer_mut(&mut self) -> &mut [f32] {
        &mut self.timer
    }

    /// Duration each countdown started from
    pub fn lifetime(&self) -> &[f32] {
        &self.lifetime
    }

    /// Live flags
    pub fn is_live(&self) -> &[bool] {
        &self.is_live
    }

    /// Mutable live flags
    pub fn is_live_mut(&mut self) -> &mut [bool] {
        &mut self.is_live
    }

    /// Respawn flags
    pub fn respawnable(&self) -> &[bool] {
        &self.respawnable
    }

    /// Mutable respawn flags
    pub fn respawnable_mut(&mut self) -> &mut [bool] {
        &mut self.respawnable
    }

    /// Restart element `index` with a fresh lifetime and mark it live
    pub fn restart(&mut self, index: usize, lifetime: f32) {
        self.timer[index] = lifetime;
        self.lifetime[index] = lifetime;
        self.is_live[index] = true;
    }

    /// Mark element `index` permanently not live
    pub fn kill(&mut self, index: usize) {
        self.is_live[index] = false;
    }

    /// Fraction of the lifetime used up, 0 when just (re)spawned and 1 when expired
    pub fn progress(&self, index: usize) -> f32 {
        let lifetime = self.lifetime[index];
        if lifetime <= 0.0 {
            return 1.0;
        }
        ((lifetime - self.timer[index]) / lifetime).clamp(0.0, 1.0)
    }

    /// Number of live elements
    pub fn live_count(&self) -> usize {
        self.is_live.iter().filter(|live| **live).count()
    }
}

impl Component for Timer {
    const NAME: &'static str = "Timer";

    fn size(&self) -> usize {
        self.timer.len()
    }
}

/// Visual primitive a render collaborator should draw for an element
///
/// The set is closed: every consumer handles all variants exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Sphere, radius in `dir_size.x`
    Sphere,
    /// Axis-aligned box, edge lengths in `dir_size`
    Cube,
    /// Host-provided mesh, scale in `dir_size`
    Mesh,
    /// Line segment from the element position along `dir_size`
    Line,
}

/// Host-facing description of how each element should be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct RenderIntent {
    shape: Vec<Shape>,
    dir_size: Vec<Vec3>,
    visible: Vec<bool>,
    wireframe: Vec<bool>,
}

impl RenderIntent {
    /// Build from per-element arrays
    pub fn new(
        shape: Vec<Shape>,
        dir_size: Vec<Vec3>,
        visible: Vec<bool>,
        wireframe: Vec<bool>,
    ) -> Result<Self, EcsError> {
        check_len(Self::NAME, shape.len(), dir_size.len())?;
        check_len(Self::NAME, shape.len(), visible.len())?;
        check_len(Self::NAME, shape.len(), wireframe.len())?;
        Ok(RenderIntent {
            shape,
            dir_size,
            visible,
            wireframe,
        })
    }

    /// One visible solid sphere per radius
    pub fn spheres(radii: &[f32]) -> Self {
        RenderIntent {
            shape: vec![Shape::Sphere; radii.len()],
            dir_size: radii.iter().map(|r| Vec3::new(*r, 0.0, 0.0)).collect(),
            visible: vec![true; radii.len()],
            wireframe: vec![false; radii.len()],
        }
    }

    /// `size` visible solid elements sharing one shape and size vector
    pub fn uniform(size: usize, shape: Shape, dir_size: Vec3) -> Self {
        RenderIntent {
            shape: vec![shape; size],
            dir_size: vec![dir_size; size],
            visible: vec![true; size],
            wireframe: vec![false; size],
        }
    }

    /// Shapes
    pub fn shape(&self) -> &[Shape] {
        &self.shape
    }

    /// Direction (lines) or size (spheres, cubes, meshes)
    pub fn dir_size(&self) -> &[Vec3] {
        &self.dir_size
    }

    /// Visibility flags
    pub fn visible(&self) -> &[bool] {
        &self.visible
    }

    /// Mutable visibility flags
    pub fn visible_mut(&mut self) -> &mut [bool] {
        &mut self.visible
    }

    /// Wireframe flags
    pub fn wireframe(&self) -> &[bool] {
        &self.wireframe
    }
}

impl Component for RenderIntent {
    const NAME: &'static str = "RenderIntent";

    fn size(&self) -> usize {
        self.shape.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_rejects_uneven_arrays() {
        let err = Position::new(vec![0.0; 3], vec![0.0; 3], vec![0.0; 2]).unwrap_err();
        assert_eq!(
            err,
            EcsError::LengthMismatch {
                component: "Position",
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_position_accessors() {
        let mut pos = Position::zeroed(3);
        assert_eq!(pos.size(), 3);

        pos.set(2, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pos.get(2), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pos.y(), &[0.0f32, 0.0, 2.0]);

        pos.x_mut()[0] = f32::NAN;
        assert!(!pos.is_valid());
    }

    #[test]
    fn test_movement_from_velocities() {
        let mov = Movement::from_velocities(&[Vec3::X, Vec3::NEG_Y]);
        assert_eq!(mov.size(), 2);
        assert_eq!(mov.x_velocity(), &[1.0f32, 0.0]);
        assert_eq!(mov.get(1), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_movement_rejects_uneven_arrays() {
        assert!(Movement::new(vec![0.0], vec![], vec![0.0]).is_err());
    }

    #[test]
    fn test_physics_ball_construction() {
        let ball = PhysicsBall::new(vec![0.5, 1.0], vec![5, 5], 9.81).unwrap();
        assert_eq!(ball.size(), 2);
        assert_eq!(ball.gravity(), 9.81);
        assert!(PhysicsBall::new(vec![0.5], vec![5, 5], 9.81).is_err());
    }

    #[test]
    fn test_timer_progress_and_restart() {
        let mut timer = Timer::from_lifetimes(&[2.0, 4.0], false);
        assert_eq!(timer.live_count(), 2);
        assert_eq!(timer.progress(0), 0.0);

        timer.timer_mut()[0] = 0.5;
        assert_eq!(timer.progress(0), 0.75);

        timer.kill(1);
        assert_eq!(timer.live_count(), 1);

        timer.restart(1, 3.0);
        assert!(timer.is_live()[1]);
        assert_eq!(timer.timer()[1], 3.0);
        assert_eq!(timer.lifetime()[1], 3.0);
    }

    #[test]
    fn test_timer_zero_lifetime_progress_is_complete() {
        let timer = Timer::from_lifetimes(&[0.0], true);
        assert_eq!(timer.progress(0), 1.0);
    }

    #[test]
    fn test_render_intent_spheres() {
        let intent = RenderIntent::spheres(&[0.25, 0.5]);
        assert_eq!(intent.size(), 2);
        assert_eq!(intent.shape(), &[Shape::Sphere, Shape::Sphere]);
        assert_eq!(intent.dir_size()[1], Vec3::new(0.5, 0.0, 0.0));
        assert!(intent.visible().iter().all(|v| *v));
    }

    #[test]
    fn test_render_intent_rejects_uneven_arrays() {
        let result = RenderIntent::new(
            vec![Shape::Line],
            vec![Vec3::X],
            vec![true, true],
            vec![false],
        );
        assert!(result.is_err());
    }
}
