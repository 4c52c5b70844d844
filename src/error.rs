//! Error types for meteorsim.

use thiserror::Error;

/// Errors raised while building or stepping a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Fixed step is zero, negative or not finite.
    #[error("invalid fixed timestep: {0} (must be finite and > 0)")]
    InvalidTimestep(f64),

    /// Time scale is not finite.
    #[error("invalid time scale: {0}")]
    InvalidTimeScale(f64),

    /// Frame clamp is zero, negative or not finite.
    #[error("invalid frame time clamp: {0} (must be finite and > 0)")]
    InvalidFrameClamp(f64),

    /// A simulation was built without a per-step update hook.
    #[error("no per-step update hook supplied")]
    MissingHook,

    /// The per-step update hook failed.
    #[error("update hook failed at step {step}")]
    Hook {
        /// Value of the step counter when the hook ran.
        step: u64,
        /// Error returned by the hook.
        #[source]
        source: anyhow::Error,
    },

    /// A body's position stopped being finite after integration.
    #[error("body {index} has a non-finite position after step {step}")]
    NonFiniteState {
        /// Index of the body in the simulation.
        index: usize,
        /// Value of the step counter after the failed step.
        step: u64,
    },

    /// Scenario configuration is inconsistent.
    #[error("invalid scenario configuration: {0}")]
    Config(String),
}
