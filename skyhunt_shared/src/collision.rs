//! Ray-sphere intersection.
//!
//! The ray is `origin + t * direction`; substituting into the sphere equation
//! gives `a t^2 + b t + c = 0` with
//!
//! ```text
//! L = origin - center
//! a = d.d    b = 2 d.L    c = L.L - r^2
//! ```
//!
//! The discriminant is taken in perpendicular-distance form,
//! `4 a (r^2 - |P|^2)` where `P` is the part of `L` orthogonal to `d`, so it
//! keeps its precision when the sphere is far from the ray origin.
//!
//! Both roots are reported whether they lie in front of the origin or behind
//! it. Callers that only care about targets ahead must filter with
//! [`Intersection::in_front`].

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Rays whose squared miss distance `|P|^2` lies within this fraction of
/// `r^2` below the radius count as a tangent hit.
pub const TANGENT_TOLERANCE: f32 = 1.0e-6;

/// Half-line used for hit tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parametric distance `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    pub fn intersect(&self, sphere: &Sphere) -> Option<Intersection> {
        intersect(self, sphere)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// The two parametric distances along the ray, `t0 <= t1`.
/// A tangent hit has `t0 == t1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub t0: f32,
    pub t1: f32,
}

impl Intersection {
    /// True if the near intersection is at or ahead of the ray origin.
    pub fn in_front(&self) -> bool {
        self.t0 >= 0.0
    }

    pub fn is_tangent(&self) -> bool {
        self.t0 == self.t1
    }
}

/// Real roots of `a x^2 + b x + c`, sorted ascending.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    let discr = b * b - 4.0 * a * c;
    if discr < 0.0 {
        return None;
    }
    Some(stable_roots(a, b, c, discr.sqrt()))
}

/// Roots from a precomputed `sqrt(discriminant)`.
///
/// Uses the numerically stable form: the root that would suffer cancellation
/// is recovered from the product of roots (`c / q`). A zero discriminant
/// yields the double root `-b / 2a`.
fn stable_roots(a: f32, b: f32, c: f32, sqrt_discr: f32) -> (f32, f32) {
    if sqrt_discr == 0.0 {
        let x = -0.5 * b / a;
        return (x, x);
    }
    let q = if b > 0.0 {
        -0.5 * (b + sqrt_discr)
    } else {
        -0.5 * (b - sqrt_discr)
    };
    let (x0, x1) = (q / a, c / q);
    if x0 > x1 {
        (x1, x0)
    } else {
        (x0, x1)
    }
}

/// Intersects `ray` with `sphere`. `None` means a clean miss.
///
/// A ray with a zero-length direction never hits.
pub fn intersect(ray: &Ray, sphere: &Sphere) -> Option<Intersection> {
    let d = ray.direction;
    let l = ray.origin - sphere.center;
    let a = d.dot(d);
    if a <= f32::EPSILON {
        return None;
    }
    let dl = d.dot(l);
    let b = 2.0 * dl;
    let r2 = sphere.radius * sphere.radius;
    let c = l.dot(l) - r2;

    let perp = l - d * (dl / a);
    let gap = r2 - perp.len_sq();
    if gap < 0.0 {
        return None;
    }
    let sqrt_discr = if gap <= TANGENT_TOLERANCE * r2 {
        0.0
    } else {
        2.0 * (a * gap).sqrt()
    };

    let (t0, t1) = stable_roots(a, b, c, sqrt_discr);
    Some(Intersection { t0, t1 })
}
