//! Rotation fragments.
//!
//! Both variants rotate the camera/target pair about an origin: the target
//! in orbit mode, the camera in look mode, or a raycast hit when a dynamic
//! origin is configured.

mod fixed_up;
mod free_up;

pub use fixed_up::{FixedUpRotation, VERTICAL_EPSILON};
pub use free_up::FreeUpRotation;
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::input::pointer::{mean_delta, start_centroid};
use crate::input::ActivePointer;
use crate::options::RotateOptions;

/// Radians per NDC unit at speed 1 (a full-height drag turns by π).
pub(crate) const RADIANS_PER_NDC: f32 = std::f32::consts::FRAC_PI_2;

/// What stays fixed while rotating. Chosen at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Camera circles the target.
    #[default]
    Orbit,
    /// Target circles the camera.
    Look,
}

/// Rotation origin for a gesture starting at `pointers`.
pub(crate) fn resolve_origin(
    options: &RotateOptions,
    mode: RotationMode,
    pointers: &[ActivePointer],
    camera: &Camera,
    target: Vec3,
) -> Vec3 {
    let nominal = match mode {
        RotationMode::Orbit => target,
        RotationMode::Look => camera.position,
    };
    let Some(dynamic) = &options.dynamic_origin else {
        return nominal;
    };
    if pointers.is_empty() {
        return nominal;
    }
    let ray = camera.ray_from_ndc(start_centroid(pointers));
    dynamic
        .source
        .first_hit(&ray, dynamic.visible_only)
        .unwrap_or_else(|| {
            log::trace!("dynamic origin missed; rotating about {nominal}");
            nominal
        })
}

/// Angular delta (horizontal, vertical) for the latest pointer motion.
/// The horizontal component is scaled by the viewport aspect ratio.
pub(crate) fn angle_delta(
    pointers: &[ActivePointer],
    camera: &Camera,
    speed: f32,
) -> Vec2 {
    let delta = mean_delta(pointers);
    Vec2::new(delta.x * camera.aspect(), delta.y) * speed * RADIANS_PER_NDC
}

/// Rotate camera position and target about `origin`.
pub(crate) fn rotate_about(
    rotation: Quat,
    origin: Vec3,
    camera: &mut Camera,
    target: &mut Vec3,
) {
    camera.position = origin + rotation * (camera.position - origin);
    *target = origin + rotation * (*target - origin);
}
