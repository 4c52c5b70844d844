//! Core state types for the fixed-step simulation.
//!
//! Defines the kinematic state of one simulated object:
//! - `Pose`     the `{center, rotation}` pair captured before a step
//! - `Body`     current pose, velocities, interpolated draw transform
//! - `Drawable` opaque renderer handles tagged with the kind of shape
//!
//! Integration and interpolation live in `integrator`, point tests in
//! `collision`; `Body` exposes both as methods.

use nalgebra::{Matrix3, Matrix4, Unit, Vector3};
use rand::Rng;

pub type NVec3 = Vector3<f64>;
pub type NMat3 = Matrix3<f64>;
pub type NMat4 = Matrix4<f64>;

/// Spin axes shorter than this are treated as "no spin"
const MIN_AXIS_NORM: f64 = 1.0e-12;

/// Opaque mesh handle owned by the external renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Opaque material handle owned by the external renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

/// What a body looks like, as far as the scene cares
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Sphere,
    Cube,
    /// A loaded model (character, background cylinder, ...)
    Model(String),
}

impl ShapeKind {
    /// Spawned meteorites are the primitive shapes
    pub fn is_primitive(&self) -> bool {
        matches!(self, ShapeKind::Sphere | ShapeKind::Cube)
    }
}

/// Renderer-side identity of a body. Never interpreted by the physics.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub shape: ShapeKind,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
}

impl Drawable {
    pub fn new(shape: ShapeKind, mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self { shape, mesh, material }
    }
}

/// Position and orientation of a body at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub center: NVec3,
    pub rotation: NMat3,
}

impl Pose {
    pub fn identity() -> Self {
        Self {
            center: NVec3::zeros(),
            rotation: NMat3::identity(),
        }
    }

    /// Split a world transform into translation and the remaining 3x3 block
    pub fn from_transform(m: &NMat4) -> Self {
        Self {
            center: m.fixed_view::<3, 1>(0, 3).into_owned(),
            rotation: m.fixed_view::<3, 3>(0, 0).into_owned(),
        }
    }

    /// `translate(center) * rotation * scale(size)`
    pub fn to_transform(&self, size: &NVec3) -> NMat4 {
        NMat4::new_translation(&self.center)
            * self.rotation.to_homogeneous()
            * NMat4::new_nonuniform_scaling(size)
    }
}

/// One simulated rigid object.
///
/// `previous` holds the pose from before the latest `advance`, `center` and
/// `rotation` the pose after it. `drawn_location` is recomputed every frame
/// by `blend_state` and is never read by the integration step.
#[derive(Debug, Clone)]
pub struct Body {
    pub size: NVec3,
    pub center: NVec3,
    pub rotation: NMat3,
    pub previous: Pose,
    pub linear_velocity: NVec3,
    pub angular_velocity: f64, // speed about spin_axis, radians per second
    pub spin_axis: Unit<NVec3>,
    pub(crate) drawn_location: NMat4,
    pub(crate) inverse: Option<NMat4>, // cached inverse of drawn_location
    drawable: Drawable,
}

impl Body {
    /// Create a body at the origin, at rest
    pub fn new(size: NVec3, drawable: Drawable) -> Self {
        let mut body = Self {
            size,
            center: NVec3::zeros(),
            rotation: NMat3::identity(),
            previous: Pose::identity(),
            linear_velocity: NVec3::zeros(),
            angular_velocity: 0.0,
            spin_axis: NVec3::y_axis(),
            drawn_location: NMat4::identity(),
            inverse: None,
            drawable,
        };
        body.sync_drawn_location();
        body
    }

    /// Place the body and set its velocities.
    ///
    /// `previous` is set to the same pose so the first frame does not blend
    /// from a stale state. A missing `spin_axis` picks a random unit vector.
    pub fn emplace(
        &mut self,
        pose: &NMat4,
        linear_velocity: NVec3,
        angular_velocity: f64,
        spin_axis: Option<NVec3>,
    ) -> &mut Self {
        self.emplace_with_rng(pose, linear_velocity, angular_velocity, spin_axis, &mut rand::thread_rng())
    }

    /// Same as [`Body::emplace`], drawing the default spin axis from `rng`
    pub fn emplace_with_rng<R: Rng + ?Sized>(
        &mut self,
        pose: &NMat4,
        linear_velocity: NVec3,
        angular_velocity: f64,
        spin_axis: Option<NVec3>,
        rng: &mut R,
    ) -> &mut Self {
        let Pose { center, rotation } = Pose::from_transform(pose);
        self.center = center;
        self.rotation = rotation;
        self.previous = Pose { center, rotation };
        self.linear_velocity = linear_velocity;

        let axis = spin_axis.unwrap_or_else(|| random_unit_vector(rng));
        match Unit::try_new(axis, MIN_AXIS_NORM) {
            Some(axis) => {
                self.spin_axis = axis;
                self.angular_velocity = angular_velocity;
            }
            None => {
                log::warn!("zero-length spin axis, body will not rotate");
                self.spin_axis = NVec3::y_axis();
                self.angular_velocity = 0.0;
            }
        }

        self.sync_drawn_location();
        self
    }

    pub fn pose(&self) -> Pose {
        Pose {
            center: self.center,
            rotation: self.rotation,
        }
    }

    pub fn drawable(&self) -> &Drawable {
        &self.drawable
    }

    /// The transform handed to the renderer this frame
    pub fn drawn_location(&self) -> &NMat4 {
        &self.drawn_location
    }

    /// Cached inverse of `drawn_location`; `None` if singular or never computed
    pub fn inverse(&self) -> Option<&NMat4> {
        self.inverse.as_ref()
    }

    /// Recompute the cached inverse from the current `drawn_location`
    pub fn refresh_inverse(&mut self) {
        self.inverse = self.drawn_location.try_inverse();
    }

    // drawn_location and its inverse straight from the current pose
    fn sync_drawn_location(&mut self) {
        self.drawn_location = self.pose().to_transform(&self.size);
        self.refresh_inverse();
    }
}

/// Uniform random direction, by rejection sampling inside the unit ball
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> NVec3 {
    loop {
        let v = NVec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let n2 = v.norm_squared();
        if n2 > 1.0e-6 && n2 <= 1.0 {
            return v / n2.sqrt();
        }
    }
}
