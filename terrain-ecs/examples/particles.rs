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
//! Particle fountain demo
//!
//! Spawns short-lived particles that fall from the spawn box and are
//! recycled when their timers run out.
//!
//! ```text
//! cargo run --example particles
//! ```

use glam::Vec3;
use terrain_ecs::config::{SimulationConfig, SimulationMode, ValueRange};
use terrain_ecs::{Heightfield, Simulation};

fn main() -> Result<(), terrain_ecs::Error> {
    env_logger::init();

    println!("Terrain ECS - Particles");
    println!("=======================\n");

    let config = SimulationConfig {
        mode: SimulationMode::Particles,
        entity_count: 4,
        elements_per_entity: 1000,
        time_to_live: ValueRange::new(0.5, 1.5),
        gravity: 4.0,
        seed: 2025,
        ..Default::default()
    };
    let respawn = config.respawn;

    let terrain = Heightfield::flat(20, 20, Vec3::ZERO, 0.0)?;
    let mut sim = Simulation::new(config, terrain)?;
    sim.init();
    println!("Spawned {} particles (respawn: {respawn})\n", sim.render_frame().len());

    for _ in 0..10 {
        for _ in 0..12 {
            sim.tick();
        }

        let frame = sim.render_frame();
        let mean_progress = frame
            .instances
            .iter()
            .filter_map(|instance| instance.progress)
            .sum::<f32>()
            / frame.len().max(1) as f32;
        let centroid = frame
            .instances
            .iter()
            .map(|instance| instance.position)
            .sum::<Vec3>()
            / frame.len().max(1) as f32;

        println!(
            "t = {:.2}s  visible {:>5}  mean progress {:.2}  centroid {:.2}",
            sim.elapsed(),
            frame.len(),
            mean_progress,
            centroid
        );
    }

    Ok(())
}
