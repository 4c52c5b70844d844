pub mod error;
pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use error::SimulationError;

pub use simulation::states::{Body, Pose, Drawable, ShapeKind, MeshHandle, MaterialHandle, NVec3, NMat3, NMat4};
pub use simulation::engine::{Simulation, SimulationBuilder, StepReport, UpdateState};
pub use simulation::params::Parameters;
pub use simulation::collision::{intersect_cube, intersect_sphere, check_if_colliding, Collider, IntersectTest};
pub use simulation::sampling::{sphere_points, cube_points};
pub use simulation::scenario::{Scenario, MeteorShower, Obstacle, ShowerSettings};

pub use configuration::config::{ScenarioConfig, SimulationConfig, CollisionConfig, SceneConfig, BodyConfig, ShapeConfig};

pub use visualization::headless::{run_headless, render_frame, Renderer, LogRenderer, FrameClock, RunStats};

pub use benchmark::benchmark::bench_step;
