use std::time::Instant;

use crate::simulation::collision::{Collider, IntersectTest};
use crate::simulation::engine::Simulation;
use crate::simulation::params::Parameters;
use crate::simulation::sampling::sphere_points;
use crate::simulation::scenario::{MeteorShower, Obstacle, ShowerSettings};
use crate::simulation::states::{Body, Drawable, MaterialHandle, MeshHandle, NMat4, NVec3, ShapeKind};

/// Time `Simulation::step` with one obstacle and a growing meteorite count
pub fn bench_step() -> anyhow::Result<()> {
    let ns = [50, 100, 200, 400, 800, 1600];
    let frames = 200;
    let frame_time = 1.0 / 60.0;

    for n in ns {
        let settings = ShowerSettings {
            gravity: NVec3::new(0.0, -9.81, 0.0),
            spawn_interval: 1.0e9, // no spawning, bodies are placed up front
            max_meteorites: n,
            spawn_min: NVec3::zeros(),
            spawn_max: NVec3::zeros(),
            speed_min: 0.0,
            speed_max: 0.0,
            size_min: 0.1,
            size_max: 0.1,
            spin_max: 0.0,
            kill_height: f64::NEG_INFINITY,
        };
        let collider = Collider::new(IntersectTest::Sphere, sphere_points(1), 0.0)
            .with_other_scale(NVec3::new(1.0, 1.5, 1.0));
        let hook = MeteorShower::new(settings, collider, vec![Obstacle { index: 0, bounce: 0.8 }], 42);
        let mut sim = Simulation::new(Parameters::new(0.01), hook)?;

        let mut obstacle = Body::new(
            NVec3::new(1.0, 2.0, 1.0),
            Drawable::new(ShapeKind::Model("obstacle".into()), MeshHandle(2), MaterialHandle(0)),
        );
        obstacle.emplace(&NMat4::identity(), NVec3::zeros(), 0.0, None);
        sim.add_body(obstacle);

        for i in 0..n {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let center = NVec3::new(
                (i_f * 0.37).sin() * 5.0,
                3.0 + (i_f * 0.13).cos() * 5.0,
                (i_f * 0.07).sin() * 5.0,
            );
            let mut body = Body::new(
                NVec3::repeat(0.1),
                Drawable::new(ShapeKind::Sphere, MeshHandle(0), MaterialHandle(0)),
            );
            body.emplace(&NMat4::new_translation(&center), NVec3::zeros(), 1.0, Some(NVec3::y()));
            sim.add_body(body);
        }

        let t0 = Instant::now();
        for _ in 0..frames {
            sim.step(frame_time)?;
        }
        let elapsed = t0.elapsed().as_secs_f64();

        println!(
            "N = {:5}, {} steps: total = {:.6} s, per frame = {:.6} ms",
            n,
            sim.steps_taken(),
            elapsed,
            elapsed * 1000.0 / frames as f64,
        );
    }
    Ok(())
}
