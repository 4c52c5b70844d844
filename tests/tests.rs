use std::cell::RefCell;
use std::f64::consts::FRAC_PI_2;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::rc::Rc;

use nalgebra::Rotation3;

use meteorsim::simulation::collision::{check_if_colliding, intersect_cube, intersect_sphere, Collider, IntersectTest};
use meteorsim::simulation::engine::{Simulation, UpdateState};
use meteorsim::simulation::params::Parameters;
use meteorsim::simulation::sampling::{cube_points, sphere_points};
use meteorsim::simulation::scenario::{MeteorShower, Obstacle, Scenario, ShowerSettings};
use meteorsim::simulation::states::{Body, Drawable, MaterialHandle, MeshHandle, NMat3, NMat4, NVec3, ShapeKind};
use meteorsim::{run_headless, FrameClock, LogRenderer, ScenarioConfig, SimulationError};

const EPS: f64 = 1e-9;

/// Hook that does nothing, bodies coast
pub struct Coast;

impl UpdateState for Coast {
    fn update_state(&mut self, _bodies: &mut Vec<Body>, _dt: f64) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Build a body at `center` with velocity `v` and no spin
pub fn moving_body(center: [f64; 3], v: [f64; 3], size: f64) -> Body {
    let mut b = Body::new(
        NVec3::repeat(size),
        Drawable::new(ShapeKind::Sphere, MeshHandle(0), MaterialHandle(0)),
    );
    b.emplace(&NMat4::new_translation(&NVec3::from(center)), NVec3::from(v), 0.0, Some(NVec3::y()));
    b
}

/// A static model body that never moves
pub fn model_body(center: [f64; 3], size: f64) -> Body {
    let mut b = Body::new(
        NVec3::repeat(size),
        Drawable::new(ShapeKind::Model("obstacle".into()), MeshHandle(2), MaterialHandle(4)),
    );
    b.emplace(&NMat4::new_translation(&NVec3::from(center)), NVec3::zeros(), 0.0, Some(NVec3::y()));
    b
}

pub fn coasting_sim(dt: f64) -> Simulation<Coast> {
    Simulation::new(Parameters::new(dt), Coast).expect("valid parameters")
}

fn translation(m: &NMat4) -> NVec3 {
    NVec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

fn assert_close(a: &NVec3, b: &NVec3) {
    assert!((a - b).norm() < 1e-9, "expected {:?}, got {:?}", b, a);
}

fn quiet_settings() -> ShowerSettings {
    ShowerSettings {
        gravity: NVec3::zeros(),
        spawn_interval: 1.0e9,
        max_meteorites: 16,
        spawn_min: NVec3::zeros(),
        spawn_max: NVec3::zeros(),
        speed_min: 0.0,
        speed_max: 0.0,
        size_min: 0.1,
        size_max: 0.1,
        spin_max: 0.0,
        kill_height: -10.0,
    }
}

fn load_scenario(file_name: &str) -> ScenarioConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let reader = BufReader::new(File::open(path).expect("scenario file"));
    serde_yaml::from_reader(reader).expect("scenario parses")
}

// ==================================================================================
// Accumulator tests
// ==================================================================================

#[test]
fn step_takes_two_steps_and_leaves_alpha() {
    // raise the clamp so the whole 0.12s frame is accumulated
    let params = Parameters::new(0.05).with_max_frame_time(0.2);
    let mut sim = Simulation::new(params, Coast).unwrap();

    let report = sim.step(0.12).unwrap();

    assert_eq!(report.steps, 2);
    assert_eq!(sim.steps_taken(), 2);
    assert!((sim.time_accumulator() - 0.02).abs() < EPS);
    assert!((report.alpha - 0.4).abs() < 1e-6, "alpha = {}", report.alpha);
    assert!((sim.time() - 0.1).abs() < EPS);
}

#[test]
fn default_clamp_caps_frame_contribution() {
    let mut sim = coasting_sim(0.05);

    // 0.12 is clamped to 0.1: exactly two steps, nothing left over
    let report = sim.step(0.12).unwrap();
    assert_eq!(report.steps, 2);
    assert!(sim.time_accumulator().abs() < EPS);

    // a stalled host cannot force more than 0.1 / dt steps
    let mut sim = coasting_sim(0.01);
    let report = sim.step(5.0).unwrap();
    assert_eq!(report.steps, 10);
}

#[test]
fn accumulator_stays_below_one_step() {
    let mut sim = coasting_sim(0.016);
    let frames = [0.0, 0.001, 0.016, 0.033, 0.25, 0.007, 0.1, 0.05, 1.0, 0.0159];

    for f in frames {
        sim.step(f).unwrap();
        assert!(sim.time_accumulator().abs() < sim.dt(), "accumulator {}", sim.time_accumulator());
        assert!((0.0..1.0).contains(&sim.alpha()));
    }
}

#[test]
fn step_count_tracks_elapsed_time() {
    let dt = 0.01;
    let mut sim = coasting_sim(dt);
    let frame = 1.0 / 60.0;
    let frames = 1000;

    for _ in 0..frames {
        sim.step(frame).unwrap();
    }

    let total = frame * frames as f64;
    let drift = (sim.steps_taken() as f64 * dt - total).abs();
    assert!(drift < dt, "drift {} over {} steps", drift, sim.steps_taken());
    assert!((sim.time() - sim.steps_taken() as f64 * dt).abs() < 1e-6);
}

#[test]
fn zero_frame_time_still_blends() {
    let mut sim = Simulation::new(Parameters::new(0.1).with_max_frame_time(0.2), Coast).unwrap();
    sim.add_body(moving_body([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0));

    sim.step(0.15).unwrap(); // one step, alpha 0.5
    let before = translation(sim.bodies()[0].drawn_location());
    assert_close(&before, &NVec3::new(0.05, 0.0, 0.0));

    let report = sim.step(0.0).unwrap();
    assert_eq!(report.steps, 0);
    assert_close(&translation(sim.bodies()[0].drawn_location()), &before);
}

#[test]
fn negative_time_scale_plays_backwards() {
    let params = Parameters::new(0.05).with_time_scale(-1.0).with_max_frame_time(0.2);
    let mut sim = Simulation::new(params, Coast).unwrap();
    sim.add_body(moving_body([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0));

    let report = sim.step(0.12).unwrap();

    assert_eq!(report.steps, 2);
    assert!((sim.time() + 0.1).abs() < EPS);
    assert!((sim.time_accumulator() + 0.02).abs() < EPS);
    assert!((report.alpha - 0.4).abs() < 1e-6);
    assert_close(&sim.bodies()[0].center, &NVec3::new(-0.1, 0.0, 0.0));
}

#[test]
fn time_scale_can_change_at_runtime() {
    let mut sim = coasting_sim(0.01);
    sim.set_time_scale(0.5).unwrap();
    sim.step(0.04).unwrap();
    assert_eq!(sim.steps_taken(), 2);

    assert!(matches!(sim.set_time_scale(f64::NAN), Err(SimulationError::InvalidTimeScale(_))));
    assert_eq!(sim.time_scale(), 0.5);
}

// ==================================================================================
// Construction and hook tests
// ==================================================================================

#[test]
fn degenerate_parameters_are_rejected() {
    for dt in [0.0, -0.01, f64::NAN, f64::INFINITY] {
        let err = Simulation::new(Parameters::new(dt), Coast).err();
        assert!(matches!(err, Some(SimulationError::InvalidTimestep(_))), "dt = {dt}");
    }
    let err = Simulation::new(Parameters::new(0.01).with_max_frame_time(0.0), Coast).err();
    assert!(matches!(err, Some(SimulationError::InvalidFrameClamp(_))));
}

#[test]
fn building_without_hook_fails_fast() {
    let err = Simulation::<Coast>::builder(Parameters::new(0.01)).build().err();
    assert!(matches!(err, Some(SimulationError::MissingHook)));

    let sim = Simulation::builder(Parameters::new(0.01))
        .hook(Coast)
        .body(moving_body([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0))
        .build()
        .unwrap();
    assert_eq!(sim.len(), 1);
}

#[test]
fn closures_work_as_hooks() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&calls);
    let hook = move |_bodies: &mut Vec<Body>, dt: f64| -> anyhow::Result<()> {
        seen.borrow_mut().push(dt);
        Ok(())
    };
    let mut sim = Simulation::new(Parameters::new(0.02), hook).unwrap();

    sim.step(0.05).unwrap();

    assert_eq!(calls.borrow().len(), 2);
    assert!(calls.borrow().iter().all(|dt| (dt - 0.02).abs() < EPS));
}

#[test]
fn hook_error_stops_the_frame() {
    let hook = |bodies: &mut Vec<Body>, _dt: f64| -> anyhow::Result<()> {
        if bodies[0].center.x > 0.05 {
            anyhow::bail!("body left the arena");
        }
        Ok(())
    };
    let mut sim = Simulation::new(Parameters::new(0.1), hook).unwrap();
    sim.add_body(moving_body([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0));

    sim.step(0.1).unwrap();
    let err = sim.step(0.1).unwrap_err();

    assert!(matches!(err, SimulationError::Hook { step: 1, .. }));
    // the failed step was not integrated
    assert_eq!(sim.steps_taken(), 1);
    assert_close(&sim.bodies()[0].center, &NVec3::new(0.1, 0.0, 0.0));
    // and its time is still owed
    assert!((sim.time() - 0.1).abs() < EPS);
    assert!(sim.time_accumulator() >= sim.dt() - EPS);
}

#[test]
fn every_body_sees_the_same_step_snapshot() {
    let observed = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&observed);
    let hook = move |bodies: &mut Vec<Body>, _dt: f64| -> anyhow::Result<()> {
        let xs: Vec<f64> = bodies.iter().map(|b| b.center.x).collect();
        log.borrow_mut().push(xs);
        Ok(())
    };
    // binary fractions keep the step count exact
    let dt = 1.0 / 64.0;
    let mut sim = Simulation::new(Parameters::new(dt), hook).unwrap();
    for _ in 0..3 {
        sim.add_body(moving_body([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0));
    }

    sim.step(5.0 * dt).unwrap();

    let observed = observed.borrow();
    assert_eq!(observed.len(), 5);
    for (k, xs) in observed.iter().enumerate() {
        assert_eq!(xs.len(), 3);
        for x in xs {
            assert!((x - k as f64 * dt).abs() < EPS, "step {k}: {xs:?}");
        }
    }
}

struct KillBelow(f64);

impl UpdateState for KillBelow {
    fn update_state(&mut self, bodies: &mut Vec<Body>, dt: f64) -> anyhow::Result<()> {
        for b in bodies.iter_mut() {
            b.linear_velocity.y -= 10.0 * dt;
        }
        Ok(())
    }

    fn retain(&self, body: &Body) -> bool {
        body.center.y >= self.0
    }
}

#[test]
fn bodies_failing_retention_are_removed_in_order() {
    let mut sim = Simulation::new(Parameters::new(0.01), KillBelow(-1.0)).unwrap();
    sim.add_body(moving_body([0.0, -0.995, 0.0], [0.0, -1.0, 0.0], 1.0));
    sim.add_body(moving_body([1.0, 5.0, 0.0], [0.0, 0.0, 0.0], 1.0));
    sim.add_body(moving_body([2.0, 5.0, 0.0], [0.0, 0.0, 0.0], 1.0));

    sim.step(0.05).unwrap();

    assert_eq!(sim.len(), 2);
    assert_eq!(sim.bodies()[0].center.x, 1.0);
    assert_eq!(sim.bodies()[1].center.x, 2.0);
}

#[test]
fn non_finite_positions_are_reported() {
    let mut sim = coasting_sim(0.01);
    sim.add_body(moving_body([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0));
    sim.add_body(moving_body([0.0, 0.0, 0.0], [f64::NAN, 0.0, 0.0], 1.0));

    let err = sim.step(0.01).unwrap_err();
    assert!(matches!(err, SimulationError::NonFiniteState { index: 1, .. }));
}

#[test]
fn non_finite_step_keeps_the_clock_in_sync() {
    let dt = 0.01;
    let mut sim = coasting_sim(dt);
    sim.add_body(moving_body([0.0, 0.0, 0.0], [f64::INFINITY, 0.0, 0.0], 1.0));
    sim.add_body(moving_body([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0));

    let err = sim.step(dt).unwrap_err();
    assert!(matches!(err, SimulationError::NonFiniteState { index: 0, step: 1 }));

    // the step that produced the bad state is fully accounted for
    assert_eq!(sim.steps_taken(), 1);
    assert!((sim.time() - dt).abs() < EPS);
    assert!(sim.time_accumulator().abs() < dt);
    assert!((sim.bodies()[1].center.x - dt).abs() < EPS);

    // an empty frame must not replay that time
    let _ = sim.step(0.0);
    assert_eq!(sim.steps_taken(), 1);
    assert!((sim.bodies()[1].center.x - dt).abs() < EPS);
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn advance_records_previous_then_integrates() {
    let mut b = moving_body([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0);

    b.advance(0.1);

    assert_close(&b.previous.center, &NVec3::zeros());
    assert_close(&b.center, &NVec3::new(0.1, 0.0, 0.0));

    let drawn = *b.blend_state(0.5);
    assert_close(&translation(&drawn), &NVec3::new(0.05, 0.0, 0.0));
}

#[test]
fn coasting_body_moves_linearly() {
    let v = NVec3::new(0.3, -1.2, 2.0);
    let start = NVec3::new(1.0, 2.0, 3.0);
    let mut sim = coasting_sim(0.01);
    sim.add_body(moving_body([1.0, 2.0, 3.0], [0.3, -1.2, 2.0], 1.0));

    for _ in 0..100 {
        sim.step(0.016).unwrap();
    }

    let n = sim.steps_taken() as f64;
    assert_close(&sim.bodies()[0].center, &(start + v * (n * 0.01)));
}

#[test]
fn spin_rotates_in_world_space() {
    let mut b = Body::new(
        NVec3::repeat(1.0),
        Drawable::new(ShapeKind::Cube, MeshHandle(1), MaterialHandle(0)),
    );
    b.emplace(&NMat4::identity(), NVec3::zeros(), FRAC_PI_2, Some(NVec3::z()));

    b.advance(1.0);

    // quarter turn about +Z takes +X to +Y
    assert_close(&(b.rotation * NVec3::x()), &NVec3::y());
    assert_close(&(b.previous.rotation * NVec3::x()), &NVec3::x());
}

#[test]
fn blend_endpoints_reproduce_both_states() {
    let mut b = Body::new(
        NVec3::new(1.0, 2.0, 0.5),
        Drawable::new(ShapeKind::Cube, MeshHandle(1), MaterialHandle(0)),
    );
    b.emplace(&NMat4::new_translation(&NVec3::new(1.0, 0.0, 0.0)), NVec3::new(0.0, 2.0, 0.0), 0.7, Some(NVec3::x()));
    b.advance(0.25);

    let previous = b.previous.to_transform(&b.size);
    let current = b.pose().to_transform(&b.size);

    assert!((*b.blend_state(0.0) - previous).norm() < EPS);
    assert!((*b.blend_state(1.0) - current).norm() < EPS);
}

#[test]
fn emplace_splits_rotated_pose() {
    let mut b = Body::new(
        NVec3::new(1.0, 2.0, 0.5),
        Drawable::new(ShapeKind::Cube, MeshHandle(1), MaterialHandle(0)),
    );
    let pose = NMat4::new_translation(&NVec3::new(1.0, 2.0, 3.0))
        * Rotation3::from_axis_angle(&NVec3::z_axis(), FRAC_PI_2).to_homogeneous();
    b.emplace(&pose, NVec3::zeros(), 0.0, Some(NVec3::y()));

    assert_close(&b.center, &NVec3::new(1.0, 2.0, 3.0));
    assert_close(&(b.rotation * NVec3::x()), &NVec3::y());
    assert_close(&(b.rotation * NVec3::z()), &NVec3::z());

    // nothing has moved yet, so both states agree
    assert_close(&b.previous.center, &b.center);
    assert!((b.previous.rotation - b.rotation).norm() < EPS);

    let expected = pose * NMat4::new_nonuniform_scaling(&b.size);
    assert!((b.drawn_location() - expected).norm() < EPS);
    assert!((*b.blend_state(0.3) - expected).norm() < EPS);
}

#[test]
fn rotation_blend_is_entrywise() {
    let mut b = Body::new(
        NVec3::repeat(1.0),
        Drawable::new(ShapeKind::Cube, MeshHandle(1), MaterialHandle(0)),
    );
    b.emplace(&NMat4::identity(), NVec3::zeros(), std::f64::consts::PI, Some(NVec3::z()));
    b.advance(1.0);

    // halfway through a half turn the entry-wise blend collapses x and y
    let mid: NMat3 = b.blend_rotation(0.5);
    assert!((mid * NVec3::x()).norm() < EPS);
    assert!((mid * NVec3::z() - NVec3::z()).norm() < EPS);
}

#[test]
fn zero_spin_axis_means_no_spin() {
    let mut b = Body::new(
        NVec3::repeat(1.0),
        Drawable::new(ShapeKind::Sphere, MeshHandle(0), MaterialHandle(0)),
    );
    b.emplace(&NMat4::identity(), NVec3::zeros(), 3.0, Some(NVec3::zeros()));

    assert_eq!(b.angular_velocity, 0.0);
    b.advance(1.0);
    assert!((b.rotation - NMat3::identity()).norm() < EPS);
}

#[test]
fn default_spin_axis_is_unit() {
    let mut b = Body::new(
        NVec3::repeat(1.0),
        Drawable::new(ShapeKind::Sphere, MeshHandle(0), MaterialHandle(0)),
    );
    b.emplace(&NMat4::identity(), NVec3::zeros(), 1.0, None);
    assert!((b.spin_axis.norm() - 1.0).abs() < EPS);
}

// ==================================================================================
// Collision tests
// ==================================================================================

#[test]
fn sphere_predicate() {
    assert!(intersect_sphere(&NVec3::zeros(), 0.0));
    assert!(!intersect_sphere(&NVec3::new(1.0, 1.0, 1.0), 0.0));
    assert!(!intersect_sphere(&NVec3::new(1.0, 0.0, 0.0), 0.0));
    assert!(intersect_sphere(&NVec3::new(1.0, 0.0, 0.0), 0.01));
}

#[test]
fn cube_predicate_is_boundary_inclusive() {
    assert!(intersect_cube(&NVec3::new(1.0, 1.0, 1.0), 0.0));
    assert!(intersect_cube(&NVec3::new(-1.0, 0.5, 1.0), 0.0));
    assert!(!intersect_cube(&NVec3::new(1.01, 0.0, 0.0), 0.0));
    assert!(intersect_cube(&NVec3::new(1.01, 0.0, 0.0), 0.02));
}

#[test]
fn body_never_collides_with_itself() {
    let a = moving_body([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
    let collider = Collider::new(IntersectTest::Sphere, sphere_points(1), 0.5);
    assert!(!check_if_colliding(&a, &a, &collider));
}

#[test]
fn collision_check_is_asymmetric() {
    let big = model_body([0.0, 0.0, 0.0], 2.0);
    let small = moving_body([1.5, 0.0, 0.0], [0.0, 0.0, 0.0], 0.1);
    let collider = Collider::new(IntersectTest::Sphere, sphere_points(1), 0.0);

    // small's surface samples sit inside big's volume...
    assert!(big.check_if_colliding(&small, &collider));
    // ...but none of big's surface samples reach inside small
    assert!(!small.check_if_colliding(&big, &collider));
}

#[test]
fn collision_follows_the_blended_state() {
    let mut a = moving_body([0.0, 0.0, 0.0], [10.0, 0.0, 0.0], 1.0);
    let b = moving_body([10.0, 0.0, 0.0], [0.0, 0.0, 0.0], 0.5);
    let collider = Collider::new(IntersectTest::Sphere, sphere_points(1), 0.0);
    assert!(!a.check_if_colliding(&b, &collider));

    a.advance(1.0);
    a.blend_state(1.0);

    // a is now drawn on top of b
    assert_close(&translation(a.drawn_location()), &NVec3::new(10.0, 0.0, 0.0));
    assert!(a.check_if_colliding(&b, &collider));
}

#[test]
fn separated_bodies_do_not_collide() {
    let a = model_body([0.0, 0.0, 0.0], 1.0);
    let b = moving_body([3.0, 0.0, 0.0], [0.0, 0.0, 0.0], 0.5);
    let collider = Collider::new(IntersectTest::Cube, cube_points(2), 0.0);
    assert!(!a.check_if_colliding(&b, &collider));
}

#[test]
fn other_scale_stretches_the_sampled_body() {
    let a = model_body([0.0, 0.0, 0.0], 1.0);
    let b = moving_body([0.0, 1.35, 0.0], [0.0, 0.0, 0.0], 0.3);
    let points = vec![NVec3::new(0.0, -1.0, 0.0)];

    let plain = Collider::new(IntersectTest::Sphere, points.clone(), 0.0);
    let stretched = Collider::new(IntersectTest::Sphere, points, 0.0).with_other_scale(NVec3::new(1.0, 1.5, 1.0));

    // bottom sample at y = 1.05 without stretch, y = 0.9 with it
    assert!(!a.check_if_colliding(&b, &plain));
    assert!(a.check_if_colliding(&b, &stretched));
}

#[test]
fn sampling_point_clouds() {
    assert_eq!(sphere_points(0).len(), 12);
    assert_eq!(sphere_points(1).len(), 42);
    assert_eq!(sphere_points(2).len(), 162);
    assert!(sphere_points(2).iter().all(|p| (p.norm() - 1.0).abs() < EPS));

    assert_eq!(cube_points(1).len(), 8);
    assert_eq!(cube_points(2).len(), 26);
    assert!(cube_points(3).iter().all(|p| (p.amax() - 1.0).abs() < EPS));
}

// ==================================================================================
// Scene tests
// ==================================================================================

#[test]
fn meteorite_bounces_off_obstacle() {
    let collider = Collider::new(IntersectTest::Sphere, sphere_points(1), 0.0);
    let hook = MeteorShower::new(quiet_settings(), collider, vec![Obstacle { index: 0, bounce: 0.8 }], 7);
    let mut sim = Simulation::new(Parameters::new(0.01), hook).unwrap();
    sim.add_body(model_body([0.0, 0.0, 0.0], 1.0));
    sim.add_body(moving_body([0.0, 0.95, 0.0], [0.0, -1.0, 0.0], 0.1));

    sim.step(0.01).unwrap();

    assert_eq!(sim.hook().bounces(), 1);
    assert_close(&sim.bodies()[1].linear_velocity, &NVec3::new(0.0, 0.8, 0.0));
}

#[test]
fn meteorites_spawn_fall_and_are_removed() {
    let mut settings = quiet_settings();
    settings.gravity = NVec3::new(0.0, -9.81, 0.0);
    settings.spawn_interval = 0.05;
    settings.spawn_min = NVec3::new(-1.0, 2.0, -1.0);
    settings.spawn_max = NVec3::new(1.0, 3.0, 1.0);
    settings.speed_max = 1.0;
    settings.kill_height = 0.0;
    let collider = Collider::new(IntersectTest::Sphere, sphere_points(0), 0.0);
    let mut sim = Simulation::new(Parameters::new(0.01), MeteorShower::new(settings, collider, Vec::new(), 1)).unwrap();

    for _ in 0..20 {
        sim.step(0.05).unwrap();
    }
    assert!(sim.hook().spawned() > 0);
    assert!(sim.bodies().iter().all(|b| b.center.y >= 0.0 - 0.5));

    // keep going well past the fall time, nothing stays alive for long
    let spawned = sim.hook().spawned();
    for _ in 0..200 {
        sim.step(0.05).unwrap();
    }
    assert!(sim.hook().spawned() > spawned);
    assert!(sim.len() < sim.hook().spawned() as usize);
}

#[test]
fn scenario_loads_and_runs() {
    let cfg = load_scenario("meteor_shower.yaml");
    let mut scenario = Scenario::build_scenario(cfg).unwrap();
    assert_eq!(scenario.names, vec!["character".to_string(), "background".to_string()]);
    assert_eq!(scenario.simulation.hook().obstacles().len(), 2);

    let mut renderer = LogRenderer::default();
    let stats = run_headless(&mut scenario, 120, FrameClock::Fixed(1.0 / 60.0), &mut renderer).unwrap();

    assert_eq!(stats.frames, 120);
    assert!(stats.steps >= 199 && stats.steps <= 200, "steps = {}", stats.steps);
    assert!(scenario.simulation.hook().spawned() > 0);
    assert!(renderer.draw_calls >= 120 * 2);

    // static bodies stay first and in place
    let bodies = scenario.simulation.bodies();
    assert_eq!(bodies[0].drawable().shape, ShapeKind::Model("character".into()));
    assert_eq!(bodies[1].drawable().shape, ShapeKind::Model("cylinder".into()));
    assert_close(&bodies[0].center, &NVec3::new(0.0, 1.0, 0.0));
}

#[test]
fn scenario_rejects_bad_vectors() {
    let mut cfg = load_scenario("meteor_shower.yaml");
    cfg.bodies[0].center = vec![0.0, 1.0];
    let err = Scenario::build_scenario(cfg).err();
    assert!(matches!(err, Some(SimulationError::Config(_))));

    let mut cfg = load_scenario("meteor_shower.yaml");
    cfg.scene.size_min = 1.0;
    cfg.scene.size_max = 0.5;
    assert!(matches!(Scenario::build_scenario(cfg).err(), Some(SimulationError::Config(_))));

    let mut cfg = load_scenario("meteor_shower.yaml");
    cfg.simulation.dt = 0.0;
    assert!(matches!(Scenario::build_scenario(cfg).err(), Some(SimulationError::InvalidTimestep(_))));
}
