use glam::Vec3;

use super::{Ray, EPSILON};

/// An infinite plane `normal · p + distance = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal pointing into the positive half-space.
    pub normal: Vec3,
    /// Signed distance from origin (`n · p + d = 0`).
    pub distance: f32,
}

impl Plane {
    /// Plane through `point` with the given normal (normalized here).
    #[must_use]
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Signed distance of `point`; positive on the side the normal faces.
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Where `ray` meets the plane, if it does in front of its origin.
    ///
    /// A ray lying inside the plane hits at its origin; a ray parallel to
    /// (but off) the plane, or pointing away from it, misses.
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < EPSILON {
            if self.distance_to_point(ray.origin).abs() < EPSILON {
                return Some(ray.origin);
            }
            return None;
        }
        let t = -self.distance_to_point(ray.origin) / denom;
        (t >= 0.0).then(|| ray.at(t))
    }
}
