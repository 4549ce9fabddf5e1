//! Ray, plane and sphere primitives used to turn 2D pointer motion into 3D
//! world-space deltas.
//!
//! Every query returns `Option`; a miss is a soft no-op for the caller.

mod angle;
mod plane;
mod ray;
mod sphere;

pub use angle::{clamp_angle, wrap_angle, yaw_pitch_arc};
pub use plane::Plane;
pub use ray::Ray;
pub use sphere::Sphere;

/// Tolerance used for parallel/degenerate checks throughout the crate.
pub const EPSILON: f32 = 1e-6;
