//! Numerical parameters for the fixed-step loop
//!
//! `Parameters` holds runtime settings:
//! - fixed step size `dt`,
//! - the multiplier applied to incoming frame time,
//! - the per-frame clamp that bounds catch-up steps

use crate::error::SimulationError;

/// Largest frame time accepted per `step()` call, in seconds
pub const DEFAULT_MAX_FRAME_TIME: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub dt: f64, // fixed step size
    pub time_scale: f64, // multiplier on frame time, negative plays backwards
    pub max_frame_time: f64, // clamp on a single frame's contribution
}

impl Parameters {
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            time_scale: 1.0,
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
        }
    }

    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_max_frame_time(mut self, max_frame_time: f64) -> Self {
        self.max_frame_time = max_frame_time;
        self
    }

    /// Reject degenerate settings up front instead of stepping with them
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimulationError::InvalidTimestep(self.dt));
        }
        if !self.time_scale.is_finite() {
            return Err(SimulationError::InvalidTimeScale(self.time_scale));
        }
        if !self.max_frame_time.is_finite() || self.max_frame_time <= 0.0 {
            return Err(SimulationError::InvalidFrameClamp(self.max_frame_time));
        }
        Ok(())
    }
}
