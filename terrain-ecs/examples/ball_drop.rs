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
//! Ball drop demo
//!
//! Drops balls onto a rolling heightfield and prints how many have reached
//! the ground. Pass a TOML file to override the defaults:
//!
//! ```text
//! cargo run --example ball_drop -- drop.toml
//! ```
//!
//! Set `RUST_LOG=debug` to see per-tick system summaries.

use glam::Vec3;
use terrain_ecs::config::SimulationConfig;
use terrain_ecs::{Heightfield, Simulation, TerrainQuery};

fn main() -> Result<(), terrain_ecs::Error> {
    env_logger::init();

    println!("Terrain ECS - Ball Drop");
    println!("=======================\n");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading configuration from {path}");
            SimulationConfig::load(path)?
        }
        None => SimulationConfig::default(),
    };

    let terrain = Heightfield::from_fn(24, 24, Vec3::ZERO, |ix, iz| {
        (ix as f32 * 0.4).sin() * 0.8 + (iz as f32 * 0.25).cos() * 0.5
    })?;
    let probe = terrain.clone();

    let mut sim = Simulation::new(config, terrain)?;
    sim.init();
    println!(
        "Spawned {} entities, {} balls, contact response {:?}\n",
        sim.world().entity_count(),
        sim.render_frame().len(),
        sim.config().contact_response
    );

    for second in 1..=5 {
        for _ in 0..60 {
            sim.tick();
        }

        let frame = sim.render_frame();
        let grounded = frame
            .instances
            .iter()
            .filter(|instance| {
                let radius = instance.dir_size.x;
                let below = instance.position - Vec3::new(0.0, radius + 0.05, 0.0);
                probe.in_bounds(below) && probe.height_at(below) >= below.y
            })
            .count();
        let lowest = frame
            .instances
            .iter()
            .map(|instance| instance.position.y)
            .fold(f32::INFINITY, f32::min);

        println!(
            "t = {:.2}s  grounded {:>4}/{}  lowest y {:.3}",
            sim.elapsed(),
            grounded,
            frame.len(),
            lowest
        );
        if second == 5 {
            if let Some(first) = frame.instances.first() {
                println!("\nFirst ball: {} #{} at {:.3}", first.entity, first.element, first.position);
            }
        }
    }

    #[cfg(feature = "parallel")]
    println!("\n[Physics ran on the Rayon thread pool]");

    #[cfg(not(feature = "parallel"))]
    println!("\n[Physics ran sequentially]");

    Ok(())
}
