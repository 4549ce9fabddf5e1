use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::{Ray, Sphere, EPSILON};

/// Hit-test geometry in an object's local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned box centered on the local origin.
    Cuboid {
        /// Half size along each local axis.
        half_extents: Vec3,
    },
    /// Sphere centered on the local origin.
    Sphere {
        /// Radius.
        radius: f32,
    },
}

impl Shape {
    /// Unit cube (edge length 1).
    pub const UNIT_CUBE: Self = Self::Cuboid {
        half_extents: Vec3::splat(0.5),
    };

    /// Ray parameter of the nearest non-negative hit. `origin` and
    /// `direction` are in local space; `direction` need not be normalized,
    /// so the parameter is shared with the world-space ray.
    pub(crate) fn intersect_local(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        match *self {
            Self::Cuboid { half_extents } => {
                intersect_slabs(origin, direction, half_extents)
            }
            Self::Sphere { radius } => {
                let length = direction.length();
                if length < EPSILON {
                    return None;
                }
                let ray = Ray::new(origin, direction);
                Sphere::new(Vec3::ZERO, radius)
                    .intersect_ray(&ray)
                    .map(|point| point.distance(origin) / length)
            }
        }
    }
}

fn intersect_slabs(origin: Vec3, direction: Vec3, half: Vec3) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < EPSILON {
            if o < -half[axis] || o > half[axis] {
                return None;
            }
            continue;
        }
        let t1 = (-half[axis] - o) / d;
        let t2 = (half[axis] - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }
    if t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}
