//! Fixed-step integration and display interpolation for a single `Body`
//!
//! `advance` is first-order explicit Euler: one step, no clamping, no
//! substeps. `blend_rotation` lerps matrix entries, which is not a true
//! rotation interpolation and can shear for large angular deltas between
//! two steps; both are accepted approximations.

use nalgebra::Rotation3;

use super::states::{Body, NMat3, NMat4, Pose};

/// Advance `body` by one step `dt` with explicit Euler.
/// The pre-step pose is copied into `body.previous` before any mutation.
pub fn advance(body: &mut Body, dt: f64) {
    body.previous = body.pose();

    // x_n+1 = x_n + dt v_n
    body.center += body.linear_velocity * dt;

    // R_n+1 = rot(w dt, axis) R_n, applied in world space
    let spin = Rotation3::from_axis_angle(&body.spin_axis, body.angular_velocity * dt);
    body.rotation = spin.matrix() * body.rotation;
}

/// Entry-wise blend of the previous and current rotation blocks
pub fn blend_rotation(body: &Body, alpha: f64) -> NMat3 {
    body.previous.rotation * (1.0 - alpha) + body.rotation * alpha
}

/// Interpolated draw transform at fraction `alpha` between the two states:
/// `translate(lerp(prev, center)) * blend_rotation * scale(size)`
pub fn blend_transform(body: &Body, alpha: f64) -> NMat4 {
    let blended = Pose {
        center: body.previous.center.lerp(&body.center, alpha),
        rotation: blend_rotation(body, alpha),
    };
    blended.to_transform(&body.size)
}

/// Recompute `body.drawn_location` for this frame and its cached inverse
pub fn blend_state(body: &mut Body, alpha: f64) {
    body.drawn_location = blend_transform(body, alpha);
    body.refresh_inverse();
}

impl Body {
    /// See [`advance`]
    pub fn advance(&mut self, dt: f64) {
        advance(self, dt);
    }

    /// See [`blend_rotation`]
    pub fn blend_rotation(&self, alpha: f64) -> NMat3 {
        blend_rotation(self, alpha)
    }

    /// See [`blend_state`]
    pub fn blend_state(&mut self, alpha: f64) -> &NMat4 {
        blend_state(self, alpha);
        &self.drawn_location
    }
}
