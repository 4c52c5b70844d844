//! Point-sampled collision tests between bodies.
//!
//! A candidate body is approximated by a fixed cloud of sample points on its
//! canonical surface. The points are mapped into the testing body's local
//! frame, where that body occupies the canonical unit sphere or cube, and
//! the test reports whether any point lands inside. Only a hit/no-hit
//! answer is produced, no contact point or normal.
//!
//! The test is asymmetric: `a.check_if_colliding(b, ..)` samples `b`'s
//! points against `a`'s volume, which generally differs from the reverse.

use nalgebra::Point3;

use super::states::{Body, NMat4, NVec3};

/// Point in the cube `[-1-margin, 1+margin]^3`, boundary inclusive
pub fn intersect_cube(p: &NVec3, margin: f64) -> bool {
    let bound = 1.0 + margin;
    p.iter().all(|c| (-bound..=bound).contains(c))
}

/// Point strictly inside the sphere `p.p < 1 + margin`
pub fn intersect_sphere(p: &NVec3, margin: f64) -> bool {
    p.dot(p) < 1.0 + margin
}

/// Which canonical volume a body occupies for collision purposes
#[derive(Debug, Clone, Copy)]
pub enum IntersectTest {
    Sphere,
    Cube,
    Custom(fn(&NVec3, f64) -> bool),
}

impl IntersectTest {
    pub fn contains(&self, p: &NVec3, margin: f64) -> bool {
        match self {
            IntersectTest::Sphere => intersect_sphere(p, margin),
            IntersectTest::Cube => intersect_cube(p, margin),
            IntersectTest::Custom(test) => test(p, margin),
        }
    }
}

/// Host-supplied collision descriptor
#[derive(Debug, Clone)]
pub struct Collider {
    pub test: IntersectTest,
    pub points: Vec<NVec3>,
    pub leeway: f64,
    /// Scale applied to the candidate body before it is mapped into the
    /// testing body's frame. Scene tuning, not a general policy.
    pub other_scale: NVec3,
}

impl Collider {
    pub fn new(test: IntersectTest, points: Vec<NVec3>, leeway: f64) -> Self {
        Self {
            test,
            points,
            leeway,
            other_scale: NVec3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_other_scale(mut self, other_scale: NVec3) -> Self {
        self.other_scale = other_scale;
        self
    }
}

/// Transform taking `other`'s canonical points into `this`'s local frame,
/// or `None` when `this` has no usable inverse
pub fn relative_transform(this: &Body, other: &Body, other_scale: &NVec3) -> Option<NMat4> {
    let inverse = this.inverse()?;
    Some(inverse * other.drawn_location() * NMat4::new_nonuniform_scaling(other_scale))
}

/// Does any sample point of `other` fall inside `this`'s canonical volume?
/// A body never collides with itself.
pub fn check_if_colliding(this: &Body, other: &Body, collider: &Collider) -> bool {
    if std::ptr::eq(this, other) {
        return false;
    }
    let Some(t) = relative_transform(this, other, &collider.other_scale) else {
        return false;
    };

    collider.points.iter().any(|p| {
        let q = t.transform_point(&Point3::from(*p)).coords;
        collider.test.contains(&q, collider.leeway)
    })
}

impl Body {
    /// See [`check_if_colliding`]
    pub fn check_if_colliding(&self, other: &Body, collider: &Collider) -> bool {
        check_if_colliding(self, other, collider)
    }
}
