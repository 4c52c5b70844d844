//! Configuration types for loading scenes from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scene. A scenario consists of:
//!
//! - [`SimulationConfig`] – fixed step, time scale and frame clamp
//! - [`CollisionConfig`]  – how meteorites are sampled against obstacles
//! - [`SceneConfig`]      – gravity and meteorite spawning
//! - [`BodyConfig`]       – static scene bodies (character, background, ...)
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! simulation:
//!   dt: 0.01                # fixed physics step, seconds
//!   time_scale: 1.0         # optional, negative plays backwards
//!   max_frame_time: 0.1     # optional, clamp per frame
//!
//! collision:
//!   volume: "sphere"        # obstacle volume, or "cube"
//!   sampling: "sphere"      # meteorite point cloud, or "cube"
//!   subdivisions: 1
//!   leeway: 0.0
//!   other_scale: [1.0, 1.5, 1.0]
//!
//! scene:
//!   gravity: [0.0, -9.81, 0.0]
//!   seed: 42
//!   spawn_interval: 0.25
//!   max_meteorites: 64
//!   spawn_min: [-4.0, 8.0, -4.0]
//!   spawn_max: [ 4.0, 10.0, 4.0]
//!   speed_min: 0.5
//!   speed_max: 3.0
//!   size_min: 0.1
//!   size_max: 0.4
//!   spin_max: 3.0
//!   kill_height: -10.0
//!
//! bodies:
//!   - name: "character"
//!     model: "character"
//!     center: [0.0, 1.0, 0.0]
//!     size: [0.6, 1.0, 0.4]
//!     angular_velocity: 0.5
//!     spin_axis: [0.0, 1.0, 0.0]
//!     bounce: 0.8
//! ```

use serde::Deserialize;

use crate::simulation::params::DEFAULT_MAX_FRAME_TIME;

/// Canonical shape, used both for an obstacle's volume and for the point
/// cloud sampled on a meteorite's surface
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum ShapeConfig {
    #[serde(rename = "sphere")] // unit sphere / subdivided icosphere points
    Sphere,

    #[serde(rename = "cube")] // unit cube / grid over the cube faces
    Cube,
}

/// Fixed-step loop settings
#[derive(Deserialize, Debug, Clone)]
pub struct SimulationConfig {
    pub dt: f64, // fixed step size
    #[serde(default = "default_time_scale")]
    pub time_scale: f64, // frame time multiplier
    #[serde(default = "default_max_frame_time")]
    pub max_frame_time: f64, // clamp on one frame's contribution
}

/// Collision sampling settings
#[derive(Deserialize, Debug, Clone)]
pub struct CollisionConfig {
    #[serde(default = "default_volume")]
    pub volume: ShapeConfig, // obstacle volume points are tested against
    pub sampling: ShapeConfig, // point cloud on the sampled body
    #[serde(default = "default_subdivisions")]
    pub subdivisions: u32, // icosphere rounds or cube cells per edge
    #[serde(default)]
    pub leeway: f64, // margin added to the canonical volume
    #[serde(default = "default_other_scale")]
    pub other_scale: Vec<f64>, // scale on the sampled body
}

/// Meteorite shower settings
#[derive(Deserialize, Debug, Clone)]
pub struct SceneConfig {
    pub gravity: Vec<f64>,
    #[serde(default)]
    pub seed: u64, // deterministic seed to make runs reproducible
    pub spawn_interval: f64, // seconds of simulation time between spawns
    pub max_meteorites: usize,
    pub spawn_min: Vec<f64>, // spawn box corner
    pub spawn_max: Vec<f64>, // opposite spawn box corner
    pub speed_min: f64,
    pub speed_max: f64,
    pub size_min: f64,
    pub size_max: f64,
    #[serde(default)]
    pub spin_max: f64, // max angular speed, radians per second
    pub kill_height: f64, // meteorites below this are removed
}

/// A static scene body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String,
    pub model: String, // renderer model name
    pub center: Vec<f64>,
    pub size: Vec<f64>,
    #[serde(default)]
    pub rotation: Option<Vec<f64>>, // roll, pitch, yaw in radians
    #[serde(default)]
    pub linear_velocity: Option<Vec<f64>>,
    #[serde(default)]
    pub angular_velocity: f64,
    #[serde(default)]
    pub spin_axis: Option<Vec<f64>>,
    #[serde(default)]
    pub bounce: Option<f64>, // makes the body an obstacle for meteorites
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub simulation: SimulationConfig,
    pub collision: CollisionConfig,
    pub scene: SceneConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_max_frame_time() -> f64 {
    DEFAULT_MAX_FRAME_TIME
}

fn default_volume() -> ShapeConfig {
    ShapeConfig::Sphere
}

fn default_subdivisions() -> u32 {
    1
}

fn default_other_scale() -> Vec<f64> {
    vec![1.0, 1.5, 1.0]
}
