use glam::{Quat, Vec2, Vec3};

use super::{angle_delta, resolve_origin, rotate_about, RotationMode};
use crate::camera::Camera;
use crate::controls::fragment::{signed_speed, PointerInputHandler};
use crate::geometry::EPSILON;
use crate::input::pointer::primary_type;
use crate::input::ActivePointer;
use crate::options::{RotateOptions, RotatePatch};

/// Trackball-style rotation about axes derived from the current view.
///
/// No angles are tracked and no bounds apply; the camera's up vector
/// rotates along with the view and drifts freely.
#[derive(Debug, Clone)]
pub struct FreeUpRotation {
    mode: RotationMode,
    options: RotateOptions,
    origin: Vec3,
}

impl FreeUpRotation {
    /// Create a rotation fragment. The mode cannot change afterwards.
    #[must_use]
    pub fn new(mode: RotationMode, options: RotateOptions) -> Self {
        Self {
            mode,
            options,
            origin: Vec3::ZERO,
        }
    }

    /// Orbit or look.
    #[must_use]
    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    /// Current configuration. Angle bounds and `up` are ignored.
    #[must_use]
    pub fn options(&self) -> &RotateOptions {
        &self.options
    }

    /// Merge a partial configuration.
    pub fn update_options(&mut self, patch: &RotatePatch) {
        self.options = self.options.merged(patch);
    }

    /// Pivot of the current gesture.
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Pick the pivot for the gesture.
    pub fn update_start_values(
        &mut self,
        pointers: &[ActivePointer],
        camera: &Camera,
        target: Vec3,
    ) {
        self.origin =
            resolve_origin(&self.options, self.mode, pointers, camera, target);
    }
}

impl PointerInputHandler for FreeUpRotation {
    fn handle_pointer_input(
        &mut self,
        pointers: &[ActivePointer],
        camera: &mut Camera,
        target: &mut Vec3,
    ) {
        let speed = signed_speed(
            &self.options.speed,
            &self.options.invert,
            primary_type(pointers),
        );
        let delta = angle_delta(pointers, camera, speed);
        if delta == Vec2::ZERO {
            return;
        }
        let forward = (*target - camera.position)
            .try_normalize()
            .unwrap_or_else(|| camera.forward());
        let right = forward.cross(camera.up);
        let right = if right.length_squared() < EPSILON {
            camera.screen_right()
        } else {
            right.normalize()
        };
        let up = right.cross(forward);

        let rotation = Quat::from_axis_angle(up, -delta.x)
            * Quat::from_axis_angle(right, delta.y);
        rotate_about(rotation, self.origin, camera, target);
        camera.up = (rotation * up).normalize();
    }
}
