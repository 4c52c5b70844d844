//! Fixed-timestep simulation driver
//!
//! The host calls [`Simulation::step`] once per rendered frame with the real
//! elapsed time. Time is scaled, clamped and accumulated; every whole `dt`
//! in the accumulator runs one fixed step (hook, retention, `advance` on
//! every body). Whatever is left over becomes the interpolation factor used
//! to blend each body's last two states into its draw transform.
//!
//! The frame clamp is the only bound on catch-up work: at most
//! `max_frame_time / dt` fixed steps run per call.

use log::{debug, trace};

use crate::error::SimulationError;
use super::params::Parameters;
use super::states::Body;

/// Per-step update hook supplied by the caller.
///
/// Runs once per fixed step before any body is advanced, so every body sees
/// the same snapshot of positions. It may change velocities, push new
/// bodies, and run collision queries. It must not call `advance` or
/// `blend_state` itself, those belong to the simulation.
pub trait UpdateState {
    /// Apply forces, spawn bodies, resolve collisions for one step of `dt`.
    /// `dt` is negative while playing backwards.
    fn update_state(&mut self, bodies: &mut Vec<Body>, dt: f64) -> anyhow::Result<()>;

    /// Bodies for which this returns `false` are removed after the hook runs
    fn retain(&self, _body: &Body) -> bool {
        true
    }
}

impl<F> UpdateState for F
where
    F: FnMut(&mut Vec<Body>, f64) -> anyhow::Result<()>,
{
    fn update_state(&mut self, bodies: &mut Vec<Body>, dt: f64) -> anyhow::Result<()> {
        self(bodies, dt)
    }
}

/// What one call to [`Simulation::step`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub steps: u32, // fixed steps taken this frame
    pub alpha: f64, // interpolation factor used for drawing
    pub bodies: usize, // bodies alive after the frame
}

pub struct Simulation<H: UpdateState> {
    bodies: Vec<Body>,
    params: Parameters,
    hook: H,
    time_accumulator: f64,
    t: f64,
    steps_taken: u64,
}

impl<H: UpdateState> Simulation<H> {
    /// Create an empty simulation. Fails if `params` are degenerate.
    pub fn new(params: Parameters, hook: H) -> Result<Self, SimulationError> {
        params.validate()?;
        debug!("simulation created: dt = {}, time scale = {}", params.dt, params.time_scale);
        Ok(Self {
            bodies: Vec::new(),
            params,
            hook,
            time_accumulator: 0.0,
            t: 0.0,
            steps_taken: 0,
        })
    }

    pub fn builder(params: Parameters) -> SimulationBuilder<H> {
        SimulationBuilder::new(params)
    }

    /// Add a body and return its current index
    pub fn add_body(&mut self, body: Body) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable access between frames (e.g. to kick a body from input)
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn hook_mut(&mut self) -> &mut H {
        &mut self.hook
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn dt(&self) -> f64 {
        self.params.dt
    }

    /// Simulation clock
    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn time_accumulator(&self) -> f64 {
        self.time_accumulator
    }

    /// Fraction of a pending step held in the accumulator, in `[0, 1)`
    pub fn alpha(&self) -> f64 {
        self.time_accumulator.abs() / self.params.dt
    }

    pub fn time_scale(&self) -> f64 {
        self.params.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f64) -> Result<(), SimulationError> {
        if !time_scale.is_finite() {
            return Err(SimulationError::InvalidTimeScale(time_scale));
        }
        self.params.time_scale = time_scale;
        Ok(())
    }

    /// Advance by one rendered frame of `frame_time` seconds.
    ///
    /// If the hook fails the error is returned immediately: the failed step
    /// is not integrated and the frame is not blended. The accumulator keeps
    /// the unconsumed time, so after an `Err` it may still hold a full step
    /// or more; `|time_accumulator| < dt` only holds when `step` returns `Ok`.
    ///
    /// A `NonFiniteState` error comes after the step was integrated: bodies,
    /// `time()`, `steps_taken()` and the accumulator all include that step.
    pub fn step(&mut self, frame_time: f64) -> Result<StepReport, SimulationError> {
        let scaled = frame_time * self.params.time_scale;
        let scaled = if scaled.is_finite() { scaled } else { 0.0 };
        let max = self.params.max_frame_time;
        let clamped = scaled.clamp(-max, max);
        if clamped != scaled {
            debug!("frame time {scaled:.4}s clamped to {clamped:.4}s");
        }
        self.time_accumulator += clamped;

        let dt = self.params.dt;
        let mut steps = 0;
        while self.time_accumulator.abs() >= dt {
            // signed step, negative when playing backwards
            let h = dt.copysign(self.time_accumulator);
            self.fixed_step(h)?;
            steps += 1;
        }

        let alpha = self.alpha();
        for body in self.bodies.iter_mut() {
            body.blend_state(alpha);
        }

        trace!(
            "frame: {steps} steps, alpha = {alpha:.3}, t = {:.4}, {} bodies",
            self.t,
            self.bodies.len()
        );

        Ok(StepReport {
            steps,
            alpha,
            bodies: self.bodies.len(),
        })
    }

    // one fixed step: refresh caches, hook, retention, then integrate everyone
    fn fixed_step(&mut self, h: f64) -> Result<(), SimulationError> {
        for body in self.bodies.iter_mut() {
            body.refresh_inverse();
        }

        let step = self.steps_taken;
        self.hook
            .update_state(&mut self.bodies, h)
            .map_err(|source| SimulationError::Hook { step, source })?;

        let hook = &self.hook;
        let before = self.bodies.len();
        self.bodies.retain(|body| hook.retain(body));
        if self.bodies.len() != before {
            debug!("step {step}: removed {} bodies", before - self.bodies.len());
        }

        for body in self.bodies.iter_mut() {
            body.advance(h);
        }
        // the clock moves with the bodies, even if the step turns out non-finite
        self.steps_taken += 1;
        self.t += h;
        self.time_accumulator -= h;

        match self
            .bodies
            .iter()
            .position(|b| !b.center.iter().all(|c| c.is_finite()))
        {
            Some(index) => Err(SimulationError::NonFiniteState {
                index,
                step: self.steps_taken,
            }),
            None => Ok(()),
        }
    }
}

/// Builder for [`Simulation`]; building without a hook is an error
pub struct SimulationBuilder<H: UpdateState> {
    params: Parameters,
    hook: Option<H>,
    bodies: Vec<Body>,
}

impl<H: UpdateState> SimulationBuilder<H> {
    pub fn new(params: Parameters) -> Self {
        Self {
            params,
            hook: None,
            bodies: Vec::new(),
        }
    }

    pub fn hook(mut self, hook: H) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.bodies.push(body);
        self
    }

    pub fn bodies<I: IntoIterator<Item = Body>>(mut self, bodies: I) -> Self {
        self.bodies.extend(bodies);
        self
    }

    pub fn build(self) -> Result<Simulation<H>, SimulationError> {
        let hook = self.hook.ok_or(SimulationError::MissingHook)?;
        let mut sim = Simulation::new(self.params, hook)?;
        sim.bodies = self.bodies;
        Ok(sim)
    }
}
