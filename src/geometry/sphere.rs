use glam::Vec3;

use super::Ray;

/// A sphere used for rotation-based anchoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// World-space center.
    pub center: Vec3,
    /// Radius (non-negative).
    pub radius: f32,
}

impl Sphere {
    /// Create a sphere.
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Nearest intersection at or in front of the ray origin.
    ///
    /// When the origin is inside the sphere the exit point is returned.
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Vec3> {
        let to_center = self.center - ray.origin;
        let tca = to_center.dot(ray.direction);
        let d2 = to_center.length_squared() - tca * tca;
        let r2 = self.radius * self.radius;
        if d2 > r2 {
            return None;
        }
        let thc = (r2 - d2).sqrt();
        let t0 = tca - thc;
        let t1 = tca + thc;
        if t1 < 0.0 {
            return None;
        }
        Some(ray.at(if t0 < 0.0 { t1 } else { t0 }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_near_side() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(sphere.intersect_ray(&ray), Some(Vec3::Z));
    }

    #[test]
    fn origin_inside_returns_exit() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(sphere.intersect_ray(&ray), Some(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn misses_and_behind() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        let wide = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(sphere.intersect_ray(&wide), None);
        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert_eq!(sphere.intersect_ray(&behind), None);
    }
}
