//! Build a fully-initialized meteor shower scene from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! (`Scenario`) containing:
//! - the `Simulation` with the static scene bodies at t = 0
//! - the `MeteorShower` per-step hook that drives it
//!
//! Every step the hook spawns meteorites on a timer, pulls them down with
//! gravity and bounces them off the obstacle bodies. Meteorites that fall
//! below the kill height fail retention and are removed by the simulation.

use nalgebra::Rotation3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{BodyConfig, CollisionConfig, SceneConfig, ScenarioConfig, ShapeConfig};
use crate::error::SimulationError;
use super::collision::{Collider, IntersectTest};
use super::engine::{Simulation, UpdateState};
use super::params::Parameters;
use super::sampling::{cube_points, sphere_points};
use super::states::{random_unit_vector, Body, Drawable, MaterialHandle, MeshHandle, NMat4, NVec3, ShapeKind};

/// Meshes the renderer preloads for meteorites
pub const SPHERE_MESH: MeshHandle = MeshHandle(0);
pub const CUBE_MESH: MeshHandle = MeshHandle(1);
/// Scene models get mesh handles from here on, in configuration order
const FIRST_MODEL_MESH: u32 = 2;

/// Meteorite materials, picked at random
const METEOR_MATERIALS: u32 = 4;

/// A body meteorites bounce off, checked in configuration order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub index: usize, // index into the simulation's bodies
    pub bounce: f64, // fraction of speed kept after a hit
}

/// Spawning and gravity settings with vectors already resolved
#[derive(Debug, Clone)]
pub struct ShowerSettings {
    pub gravity: NVec3,
    pub spawn_interval: f64,
    pub max_meteorites: usize,
    pub spawn_min: NVec3,
    pub spawn_max: NVec3,
    pub speed_min: f64,
    pub speed_max: f64,
    pub size_min: f64,
    pub size_max: f64,
    pub spin_max: f64,
    pub kill_height: f64,
}

impl ShowerSettings {
    pub fn from_config(cfg: &SceneConfig) -> Result<Self, SimulationError> {
        let settings = Self {
            gravity: vec3(&cfg.gravity, "scene.gravity")?,
            spawn_interval: cfg.spawn_interval,
            max_meteorites: cfg.max_meteorites,
            spawn_min: vec3(&cfg.spawn_min, "scene.spawn_min")?,
            spawn_max: vec3(&cfg.spawn_max, "scene.spawn_max")?,
            speed_min: cfg.speed_min,
            speed_max: cfg.speed_max,
            size_min: cfg.size_min,
            size_max: cfg.size_max,
            spin_max: cfg.spin_max,
            kill_height: cfg.kill_height,
        };
        settings.validate()?;
        Ok(settings)
    }

    // rand's inclusive ranges panic on min > max, catch that here
    fn validate(&self) -> Result<(), SimulationError> {
        if !(self.spawn_interval > 0.0) {
            return Err(SimulationError::Config(format!(
                "scene.spawn_interval must be > 0, got {}",
                self.spawn_interval
            )));
        }
        let ordered = [
            ("spawn_min.x..spawn_max.x", self.spawn_min.x, self.spawn_max.x),
            ("spawn_min.y..spawn_max.y", self.spawn_min.y, self.spawn_max.y),
            ("spawn_min.z..spawn_max.z", self.spawn_min.z, self.spawn_max.z),
            ("speed_min..speed_max", self.speed_min, self.speed_max),
            ("size_min..size_max", self.size_min, self.size_max),
            ("0..spin_max", 0.0, self.spin_max),
        ];
        for (name, lo, hi) in ordered {
            if !(lo <= hi) {
                return Err(SimulationError::Config(format!("scene.{name} is empty ({lo} > {hi})")));
            }
        }
        Ok(())
    }
}

/// Per-step hook for the meteor shower scene
pub struct MeteorShower {
    settings: ShowerSettings,
    collider: Collider,
    obstacles: Vec<Obstacle>,
    rng: StdRng,
    spawn_timer: f64,
    spawned: u64,
    bounces: u64,
}

impl MeteorShower {
    pub fn new(settings: ShowerSettings, collider: Collider, obstacles: Vec<Obstacle>, seed: u64) -> Self {
        Self {
            settings,
            collider,
            obstacles,
            rng: StdRng::seed_from_u64(seed),
            spawn_timer: 0.0,
            spawned: 0,
            bounces: 0,
        }
    }

    pub fn settings(&self) -> &ShowerSettings {
        &self.settings
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Meteorites spawned so far, including removed ones
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Obstacle hits resolved so far
    pub fn bounces(&self) -> u64 {
        self.bounces
    }

    fn spawn_meteorite(&mut self) -> Body {
        let s = &self.settings;
        let rng = &mut self.rng;

        let (shape, mesh) = if rng.gen_bool(0.5) {
            (ShapeKind::Sphere, SPHERE_MESH)
        } else {
            (ShapeKind::Cube, CUBE_MESH)
        };
        let material = MaterialHandle(rng.gen_range(0..METEOR_MATERIALS));
        let size = NVec3::repeat(rng.gen_range(s.size_min..=s.size_max));

        let position = NVec3::new(
            rng.gen_range(s.spawn_min.x..=s.spawn_max.x),
            rng.gen_range(s.spawn_min.y..=s.spawn_max.y),
            rng.gen_range(s.spawn_min.z..=s.spawn_max.z),
        );
        let mut direction = random_unit_vector(rng);
        direction.y = -direction.y.abs();
        let velocity = direction * rng.gen_range(s.speed_min..=s.speed_max);
        let spin = rng.gen_range(0.0..=s.spin_max);
        let axis = random_unit_vector(rng);

        let mut body = Body::new(size, Drawable::new(shape, mesh, material));
        body.emplace_with_rng(&NMat4::new_translation(&position), velocity, spin, Some(axis), rng);
        body
    }

    fn meteorite_count(bodies: &[Body]) -> usize {
        bodies.iter().filter(|b| b.drawable().shape.is_primitive()).count()
    }
}

impl UpdateState for MeteorShower {
    fn update_state(&mut self, bodies: &mut Vec<Body>, dt: f64) -> anyhow::Result<()> {
        // spawn on simulation time, never while rewinding
        if dt > 0.0 {
            self.spawn_timer += dt;
            while self.spawn_timer >= self.settings.spawn_interval {
                self.spawn_timer -= self.settings.spawn_interval;
                if Self::meteorite_count(bodies) < self.settings.max_meteorites {
                    let body = self.spawn_meteorite();
                    log::debug!("spawned {:?} at {:?}", body.drawable().shape, body.center.as_slice());
                    bodies.push(body);
                    self.spawned += 1;
                }
            }
        }

        let gravity = self.settings.gravity * dt;
        for body in bodies.iter_mut().filter(|b| b.drawable().shape.is_primitive()) {
            body.linear_velocity += gravity;
        }

        // resolve against this step's snapshot, then apply
        let mut hits: Vec<(usize, NVec3)> = Vec::new();
        for (i, meteor) in bodies.iter().enumerate() {
            if !meteor.drawable().shape.is_primitive() {
                continue;
            }
            for obstacle in &self.obstacles {
                let Some(target) = bodies.get(obstacle.index) else {
                    continue;
                };
                if !target.check_if_colliding(meteor, &self.collider) {
                    continue;
                }
                let away = (meteor.center - target.center)
                    .try_normalize(1.0e-9)
                    .unwrap_or_else(NVec3::y);
                // already separating, leave it alone
                if meteor.linear_velocity.dot(&away) < 0.0 {
                    let speed = meteor.linear_velocity.norm() * obstacle.bounce;
                    hits.push((i, away * speed));
                }
                break;
            }
        }

        for (i, velocity) in hits {
            bodies[i].linear_velocity = velocity;
            self.bounces += 1;
        }
        Ok(())
    }

    fn retain(&self, body: &Body) -> bool {
        !(body.drawable().shape.is_primitive() && body.center.y < self.settings.kill_height)
    }
}

/// Fully-initialized meteor shower scene
///
/// This is the main "runtime bundle" constructed from a [`ScenarioConfig`]:
/// the simulation with its static bodies and the hook that drives it, plus
/// the names of the static bodies for diagnostics
pub struct Scenario {
    pub simulation: Simulation<MeteorShower>,
    pub names: Vec<String>,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, SimulationError> {
        let parameters = Parameters::new(cfg.simulation.dt)
            .with_time_scale(cfg.simulation.time_scale)
            .with_max_frame_time(cfg.simulation.max_frame_time);

        let settings = ShowerSettings::from_config(&cfg.scene)?;
        let collider = build_collider(&cfg.collision)?;

        // Bodies: map `BodyConfig` -> runtime `Body`, obstacles keep their index
        let mut bodies = Vec::with_capacity(cfg.bodies.len());
        let mut obstacles = Vec::new();
        for (i, bc) in cfg.bodies.iter().enumerate() {
            bodies.push(build_body(bc, i as u32)?);
            if let Some(bounce) = bc.bounce {
                obstacles.push(Obstacle { index: i, bounce });
            }
        }
        let names = cfg.bodies.iter().map(|bc| bc.name.clone()).collect();

        log::info!(
            "scenario: {} static bodies, {} obstacles, dt = {}",
            bodies.len(),
            obstacles.len(),
            parameters.dt
        );

        let hook = MeteorShower::new(settings, collider, obstacles, cfg.scene.seed);
        let simulation = Simulation::<MeteorShower>::builder(parameters).hook(hook).bodies(bodies).build()?;

        Ok(Self { simulation, names })
    }
}

/// Collider from configuration: obstacle volume, meteorite point cloud
pub fn build_collider(cfg: &CollisionConfig) -> Result<Collider, SimulationError> {
    let test = match cfg.volume {
        ShapeConfig::Sphere => IntersectTest::Sphere,
        ShapeConfig::Cube => IntersectTest::Cube,
    };
    let points = match cfg.sampling {
        ShapeConfig::Sphere => sphere_points(cfg.subdivisions),
        ShapeConfig::Cube => cube_points(cfg.subdivisions),
    };
    let other_scale = vec3(&cfg.other_scale, "collision.other_scale")?;
    Ok(Collider::new(test, points, cfg.leeway).with_other_scale(other_scale))
}

fn build_body(bc: &BodyConfig, slot: u32) -> Result<Body, SimulationError> {
    let center = vec3(&bc.center, "bodies.center")?;
    let size = vec3(&bc.size, "bodies.size")?;
    let rotation = match &bc.rotation {
        Some(angles) => {
            let a = vec3(angles, "bodies.rotation")?;
            Rotation3::from_euler_angles(a.x, a.y, a.z)
        }
        None => Rotation3::identity(),
    };
    let linear_velocity = match &bc.linear_velocity {
        Some(v) => vec3(v, "bodies.linear_velocity")?,
        None => NVec3::zeros(),
    };
    // static bodies spin about +Y unless told otherwise
    let spin_axis = match &bc.spin_axis {
        Some(axis) => vec3(axis, "bodies.spin_axis")?,
        None => NVec3::y(),
    };

    let drawable = Drawable::new(
        ShapeKind::Model(bc.model.clone()),
        MeshHandle(FIRST_MODEL_MESH + slot),
        MaterialHandle(METEOR_MATERIALS + slot),
    );
    let pose = NMat4::new_translation(&center) * rotation.to_homogeneous();

    let mut body = Body::new(size, drawable);
    body.emplace(&pose, linear_velocity, bc.angular_velocity, Some(spin_axis));
    Ok(body)
}

fn vec3(v: &[f64], field: &str) -> Result<NVec3, SimulationError> {
    match v {
        [x, y, z] => Ok(NVec3::new(*x, *y, *z)),
        _ => Err(SimulationError::Config(format!(
            "{field} needs 3 components, got {}",
            v.len()
        ))),
    }
}
