//! Host side of the frame loop without a window.
//!
//! The physics never draws anything; once per frame the host hands each
//! body's `drawn_location` to an external [`Renderer`]. This module holds
//! that collaborator trait, a renderer that only logs, and the frame driver
//! used by the binary.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::SimulationError;
use crate::simulation::engine::{Simulation, UpdateState};
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Drawable, NMat4};

/// External rendering collaborator, called once per body per frame
pub trait Renderer {
    fn render(&mut self, drawable: &Drawable, transform: &NMat4);
}

/// Renderer that logs every draw call at debug level
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub draw_calls: u64,
}

impl Renderer for LogRenderer {
    fn render(&mut self, drawable: &Drawable, transform: &NMat4) {
        self.draw_calls += 1;
        debug!(
            "draw {:?} mesh {} material {} at ({:.3}, {:.3}, {:.3})",
            drawable.shape,
            drawable.mesh.0,
            drawable.material.0,
            transform[(0, 3)],
            transform[(1, 3)],
            transform[(2, 3)],
        );
    }
}

/// Draw every body with the transform blended by the last `step()`
pub fn render_frame<H: UpdateState, R: Renderer + ?Sized>(sim: &Simulation<H>, renderer: &mut R) {
    for body in sim.bodies() {
        renderer.render(body.drawable(), body.drawn_location());
    }
}

/// Frame pacing for the wall clock driver, about 60 fps
const FRAME_PACING: Duration = Duration::from_micros(16_667);

/// Where frame times come from
#[derive(Debug, Clone, Copy)]
pub enum FrameClock {
    /// Every frame takes this many seconds
    Fixed(f64),
    /// Measure real elapsed time between frames, paced at about 60 fps
    WallClock,
}

/// Summary of a headless run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    pub frames: u64,
    pub steps: u64,
    pub sim_time: f64,
    pub bodies: usize,
}

/// Drive `scenario` for `frames` frames: step, then render every body
pub fn run_headless<R: Renderer + ?Sized>(
    scenario: &mut Scenario,
    frames: u64,
    clock: FrameClock,
    renderer: &mut R,
) -> Result<RunStats, SimulationError> {
    let sim = &mut scenario.simulation;
    info!("run_headless: {frames} frames, {} bodies, {clock:?}", sim.len());

    let mut last = Instant::now();
    for frame in 0..frames {
        let frame_time = match clock {
            FrameClock::Fixed(seconds) => seconds,
            FrameClock::WallClock => {
                thread::sleep(FRAME_PACING);
                let now = Instant::now();
                let elapsed = now.duration_since(last).as_secs_f64();
                last = now;
                elapsed
            }
        };

        let report = sim.step(frame_time)?;
        render_frame(sim, renderer);
        debug!(
            "frame {frame}: {} steps, alpha {:.3}, {} bodies",
            report.steps, report.alpha, report.bodies
        );
    }

    let stats = RunStats {
        frames,
        steps: sim.steps_taken(),
        sim_time: sim.time(),
        bodies: sim.len(),
    };
    info!(
        "run_headless: done, {} steps, t = {:.3}s, {} bodies, {} meteorites spawned",
        stats.steps,
        stats.sim_time,
        stats.bodies,
        sim.hook().spawned()
    );
    Ok(stats)
}
