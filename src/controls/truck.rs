//! Truck (pan) fragment.

use glam::Vec3;

use super::fragment::{signed_speed, PointerInputHandler};
use crate::camera::Camera;
use crate::geometry::{Plane, EPSILON};
use crate::input::pointer::{centroid, mean_delta, primary_type};
use crate::input::ActivePointer;
use crate::options::{TruckLock, TruckMode, TruckOptions, TruckPatch};

/// Snapshot for [`TruckMode::Exact`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct ExactState {
    plane: Plane,
    /// World point that should stay under the pointer.
    reference: Option<Vec3>,
}

/// Snapshot for [`TruckMode::Approximate`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct ApproximateState {
    right: Vec3,
    up: Vec3,
    /// World units per NDC unit vertically, fixed for the gesture.
    half_height: f32,
}

/// Moves camera and target together, parallel to the view plane or along a
/// configured lock.
#[derive(Debug, Clone)]
pub struct Truck {
    options: TruckOptions,
    exact: Option<ExactState>,
    approximate: Option<ApproximateState>,
}

impl Truck {
    /// Create a truck fragment.
    #[must_use]
    pub fn new(options: TruckOptions) -> Self {
        Self {
            options,
            exact: None,
            approximate: None,
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn options(&self) -> &TruckOptions {
        &self.options
    }

    /// Merge a partial configuration. The current snapshot is kept until
    /// the next gesture starts.
    pub fn update_options(&mut self, patch: &TruckPatch) {
        self.options = self.options.merged(patch);
    }

    /// Snapshot the pan plane (exact) or the screen axes (approximate).
    pub fn update_start_values(
        &mut self,
        pointers: &[ActivePointer],
        camera: &Camera,
        target: Vec3,
    ) {
        match self.options.mode {
            TruckMode::Exact => {
                let plane = Plane::from_normal_and_point(
                    pan_normal(camera, target, self.options.lock.as_ref()),
                    target,
                );
                let reference = if pointers.is_empty() {
                    None
                } else {
                    plane.intersect_ray(&camera.ray_from_ndc(centroid(pointers)))
                };
                self.exact = Some(ExactState { plane, reference });
                self.approximate = None;
            }
            TruckMode::Approximate => {
                let forward = (target - camera.position)
                    .try_normalize()
                    .unwrap_or_else(|| camera.forward());
                let right = forward.cross(camera.up);
                let right = if right.length_squared() < EPSILON {
                    camera.screen_right()
                } else {
                    right.normalize()
                };
                let up = right.cross(forward);
                let (right, up) = match &self.options.lock {
                    Some(lock) => (lock.constrain(right), lock.constrain(up)),
                    None => (right, up),
                };
                let distance = camera.position.distance(target);
                self.approximate = Some(ApproximateState {
                    right,
                    up,
                    half_height: camera.half_height_at(distance),
                });
                self.exact = None;
            }
        }
    }

    fn exact_offset(
        &mut self,
        pointers: &[ActivePointer],
        camera: &Camera,
        speed: f32,
    ) -> Option<Vec3> {
        let lock = self.options.lock;
        let state = self.exact.as_mut()?;
        let Some(hit) = state
            .plane
            .intersect_ray(&camera.ray_from_ndc(centroid(pointers)))
        else {
            log::trace!("truck plane missed");
            return None;
        };
        let Some(reference) = state.reference else {
            state.reference = Some(hit);
            return None;
        };
        let diff = hit - reference;
        let diff = lock.map_or(diff, |l| l.constrain(diff));
        let offset = -diff * speed;
        // After the move the pointer ray meets the plane at `hit + offset`.
        state.reference = Some(hit + offset);
        Some(offset)
    }

    fn approximate_offset(
        &self,
        pointers: &[ActivePointer],
        camera: &Camera,
        speed: f32,
    ) -> Option<Vec3> {
        let state = self.approximate?;
        let delta = mean_delta(pointers);
        let offset = state.right * (delta.x * state.half_height * camera.aspect())
            + state.up * (delta.y * state.half_height);
        Some(-offset * speed)
    }
}

impl PointerInputHandler for Truck {
    fn handle_pointer_input(
        &mut self,
        pointers: &[ActivePointer],
        camera: &mut Camera,
        target: &mut Vec3,
    ) {
        if pointers.is_empty() {
            return;
        }
        let speed = signed_speed(
            &self.options.speed,
            &self.options.invert,
            primary_type(pointers),
        );
        let offset = match self.options.mode {
            TruckMode::Exact => self.exact_offset(pointers, camera, speed),
            TruckMode::Approximate => {
                self.approximate_offset(pointers, camera, speed)
            }
        };
        if let Some(offset) = offset.filter(|o| o.is_finite()) {
            camera.position += offset;
            *target += offset;
        }
    }
}

/// Normal of the pan plane through the target.
///
/// Without a lock the plane faces the camera. An axis lock picks the plane
/// containing the axis that faces the camera most; a plane lock uses the
/// locked plane itself.
fn pan_normal(camera: &Camera, target: Vec3, lock: Option<&TruckLock>) -> Vec3 {
    let view = (target - camera.position)
        .try_normalize()
        .unwrap_or_else(|| camera.forward());
    match lock.map(|l| (l, l.vector())) {
        Some((TruckLock::Axis(_), Some(axis))) => (view - axis * view.dot(axis))
            .try_normalize()
            .unwrap_or_else(|| axis.any_orthonormal_vector()),
        Some((TruckLock::Plane(_), Some(normal))) => normal,
        _ => view,
    }
}
