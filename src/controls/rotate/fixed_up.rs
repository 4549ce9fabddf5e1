use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec2, Vec3};

use super::{angle_delta, resolve_origin, rotate_about, RotationMode};
use crate::camera::Camera;
use crate::controls::fragment::{signed_speed, PointerInputHandler};
use crate::geometry::{clamp_angle, wrap_angle};
use crate::input::pointer::primary_type;
use crate::input::ActivePointer;
use crate::options::{RotateOptions, RotatePatch};

/// Distance kept from the poles so the view never flips over the up axis.
pub const VERTICAL_EPSILON: f32 = 1e-4;

/// Rotation with explicit horizontal (azimuth) and vertical (elevation)
/// angles relative to a configurable up axis.
///
/// The horizontal angle is wrapped into `[-π, π]`; the vertical angle never
/// leaves `±(π/2 - VERTICAL_EPSILON)` whatever the configured bounds.
#[derive(Debug, Clone)]
pub struct FixedUpRotation {
    mode: RotationMode,
    options: RotateOptions,
    horizontal: f32,
    vertical: f32,
    /// Maps world `+Y` onto the configured up axis.
    basis: Quat,
    origin: Vec3,
}

impl FixedUpRotation {
    /// Create a rotation fragment. The mode cannot change afterwards.
    #[must_use]
    pub fn new(mode: RotationMode, options: RotateOptions) -> Self {
        let basis = Quat::from_rotation_arc(Vec3::Y, options.up_axis());
        Self {
            mode,
            options,
            horizontal: 0.0,
            vertical: 0.0,
            basis,
            origin: Vec3::ZERO,
        }
    }

    /// Orbit or look.
    #[must_use]
    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    /// Current configuration.
    #[must_use]
    pub fn options(&self) -> &RotateOptions {
        &self.options
    }

    /// Merge a partial configuration. The view direction and origin are
    /// kept; a new up axis re-expresses the angles against it.
    pub fn update_options(&mut self, patch: &RotatePatch) {
        let previous_up = self.options.up_axis();
        self.options = self.options.merged(patch);
        if self.options.up_axis() != previous_up {
            let back = self.orientation() * Vec3::Z;
            self.basis = Quat::from_rotation_arc(Vec3::Y, self.options.up_axis());
            self.read_angles(back);
        }
    }

    /// Current horizontal angle in radians.
    #[must_use]
    pub fn horizontal_angle(&self) -> f32 {
        self.horizontal
    }

    /// Current vertical angle in radians.
    #[must_use]
    pub fn vertical_angle(&self) -> f32 {
        self.vertical
    }

    /// Pivot of the current gesture.
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Re-derive the angles from the camera/target pair and pick the pivot.
    pub fn update_start_values(
        &mut self,
        pointers: &[ActivePointer],
        camera: &Camera,
        target: Vec3,
    ) {
        self.basis = Quat::from_rotation_arc(Vec3::Y, self.options.up_axis());
        self.origin =
            resolve_origin(&self.options, self.mode, pointers, camera, target);
        let back = (camera.position - target)
            .try_normalize()
            .unwrap_or_else(|| -camera.forward());
        self.read_angles(back);
    }

    fn read_angles(&mut self, back: Vec3) {
        let local = self.basis.inverse() * back;
        self.horizontal = local.x.atan2(local.z);
        self.vertical = local.y.clamp(-1.0, 1.0).asin();
    }

    fn orientation(&self) -> Quat {
        self.basis
            * Quat::from_rotation_y(self.horizontal)
            * Quat::from_rotation_x(-self.vertical)
    }

    fn clamp_horizontal(&self, angle: f32) -> f32 {
        match (
            self.options.min_horizontal_angle,
            self.options.max_horizontal_angle,
        ) {
            (None, None) => angle,
            (min, max) => {
                clamp_angle(angle, min.unwrap_or(-PI), max.unwrap_or(PI))
            }
        }
    }

    fn clamp_vertical(&self, angle: f32) -> f32 {
        let limit = FRAC_PI_2 - VERTICAL_EPSILON;
        let min = self.options.min_vertical_angle.map_or(-limit, |m| m.max(-limit));
        let max = self.options.max_vertical_angle.map_or(limit, |m| m.min(limit));
        clamp_angle(angle, min, max).clamp(-limit, limit)
    }
}

impl PointerInputHandler for FixedUpRotation {
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
        let before = self.orientation();
        self.horizontal = self.clamp_horizontal(wrap_angle(self.horizontal - delta.x));
        self.vertical = self.clamp_vertical(self.vertical - delta.y);
        let rotation = self.orientation() * before.inverse();
        rotate_about(rotation, self.origin, camera, target);
        camera.up = self.options.up_axis();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::controls::test_support::{camera_at, dragged};
    use crate::geometry::Ray;
    use crate::options::{DeviceValue, DynamicOrigin};

    fn started(
        mode: RotationMode,
        options: RotateOptions,
        camera: &Camera,
        target: Vec3,
    ) -> FixedUpRotation {
        let mut rotation = FixedUpRotation::new(mode, options);
        rotation.update_start_values(&[], camera, target);
        rotation
    }

    #[test]
    fn start_values_read_angles_from_camera() {
        let camera = camera_at(Vec3::new(10.0, 10.0, 0.0), Vec3::ZERO);
        let rotation =
            started(RotationMode::Orbit, RotateOptions::default(), &camera, Vec3::ZERO);
        assert!((rotation.horizontal_angle() - FRAC_PI_2).abs() < 1e-5);
        assert!((rotation.vertical_angle() - PI / 4.0).abs() < 1e-5);
    }

    #[test]
    fn drag_right_orbits_camera_left() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let mut rotation =
            started(RotationMode::Orbit, RotateOptions::default(), &camera, target);
        rotation.handle_pointer_input(
            &[dragged(Vec2::ZERO, Vec2::new(0.2, 0.0))],
            &mut camera,
            &mut target,
        );
        assert!(camera.position.x < 0.0);
        assert!((camera.position.length() - 10.0).abs() < 1e-4);
        assert_eq!(target, Vec3::ZERO);
    }

    #[test]
    fn invert_reverses_direction() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let options = RotateOptions {
            invert: DeviceValue::Scalar(true),
            ..RotateOptions::default()
        };
        let mut rotation = started(RotationMode::Orbit, options, &camera, target);
        rotation.handle_pointer_input(
            &[dragged(Vec2::ZERO, Vec2::new(0.2, 0.0))],
            &mut camera,
            &mut target,
        );
        assert!(camera.position.x > 0.0);
    }

    #[test]
    fn horizontal_angle_wraps_around() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let mut rotation =
            started(RotationMode::Orbit, RotateOptions::default(), &camera, target);
        // 0.5 NDC at aspect 1 is π/4 per step.
        for step in 1..=20 {
            rotation.handle_pointer_input(
                &[dragged(Vec2::ZERO, Vec2::new(0.5, 0.0))],
                &mut camera,
                &mut target,
            );
            let h = rotation.horizontal_angle();
            assert!((-PI..=PI).contains(&h), "step {step}: {h}");
            if step == 8 {
                assert!(camera.position.distance(Vec3::new(0.0, 0.0, 10.0)) < 1e-3);
            }
        }
    }

    #[test]
    fn vertical_angle_stays_off_the_pole() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let options = RotateOptions {
            max_vertical_angle: Some(3.0),
            ..RotateOptions::default()
        };
        let mut rotation = started(RotationMode::Orbit, options, &camera, target);
        for _ in 0..4 {
            rotation.handle_pointer_input(
                &[dragged(Vec2::ZERO, Vec2::new(0.0, -2.0))],
                &mut camera,
                &mut target,
            );
            assert!(rotation.vertical_angle() <= FRAC_PI_2 - VERTICAL_EPSILON);
        }
        camera.look_at(target);
        assert!(camera.position.is_finite());
        assert!(camera.rotation.is_finite());
        assert!(camera.position.y > 9.99);
        assert!(camera.position.z > 0.0);
    }

    #[test]
    fn configured_vertical_bounds_clamp() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let options = RotateOptions {
            min_vertical_angle: Some(-0.1),
            max_vertical_angle: Some(0.3),
            ..RotateOptions::default()
        };
        let mut rotation = started(RotationMode::Orbit, options, &camera, target);
        rotation.handle_pointer_input(
            &[dragged(Vec2::ZERO, Vec2::new(0.0, -1.0))],
            &mut camera,
            &mut target,
        );
        assert!((rotation.vertical_angle() - 0.3).abs() < 1e-6);
        rotation.handle_pointer_input(
            &[dragged(Vec2::ZERO, Vec2::new(0.0, 1.0))],
            &mut camera,
            &mut target,
        );
        assert!((rotation.vertical_angle() + 0.1).abs() < 1e-6);
    }

    #[test]
    fn inverted_horizontal_bounds_exclude_the_gap() {
        // Allowed: [3.0, π] ∪ [-π, -3.0]; camera starts at h = π.
        let mut camera = camera_at(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let options = RotateOptions {
            min_horizontal_angle: Some(3.0),
            max_horizontal_angle: Some(-3.0),
            ..RotateOptions::default()
        };
        let mut rotation = started(RotationMode::Orbit, options, &camera, target);
        rotation.handle_pointer_input(
            &[dragged(Vec2::ZERO, Vec2::new(0.2, 0.0))],
            &mut camera,
            &mut target,
        );
        assert!((rotation.horizontal_angle() - 3.0).abs() < 1e-6);
        // crossing ±π stays allowed
        rotation.handle_pointer_input(
            &[dragged(Vec2::ZERO, Vec2::new(-0.2, 0.0))],
            &mut camera,
            &mut target,
        );
        let h = rotation.horizontal_angle();
        assert!(h >= 3.0 || h <= -3.0);
    }

    #[test]
    fn look_mode_keeps_camera_in_place() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let mut camera = camera_at(start, Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let distance = start.length();
        let mut rotation =
            started(RotationMode::Look, RotateOptions::default(), &camera, target);
        rotation.handle_pointer_input(
            &[dragged(Vec2::ZERO, Vec2::new(0.3, 0.1))],
            &mut camera,
            &mut target,
        );
        assert!(camera.position.distance(start) < 1e-5);
        assert!((target.distance(start) - distance).abs() < 1e-4);
        assert!(target.distance(Vec3::ZERO) > 1e-3);
    }

    #[test]
    fn dynamic_origin_pivots_about_hit() {
        let hit = Vec3::new(2.0, 0.0, 0.0);
        let options = RotateOptions {
            dynamic_origin: Some(DynamicOrigin {
                source: Rc::new(move |_: &Ray, _: bool| Some(hit)),
                visible_only: true,
            }),
            ..RotateOptions::default()
        };
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let pointer = dragged(Vec2::ZERO, Vec2::ZERO);
        let mut rotation = FixedUpRotation::new(RotationMode::Orbit, options);
        rotation.update_start_values(&[pointer], &camera, target);
        assert_eq!(rotation.origin(), hit);

        let before = camera.position.distance(hit);
        rotation.handle_pointer_input(
            &[dragged(Vec2::ZERO, Vec2::new(0.3, 0.0))],
            &mut camera,
            &mut target,
        );
        assert!((camera.position.distance(hit) - before).abs() < 1e-4);
        assert!((target.distance(hit) - 2.0).abs() < 1e-5);
        assert!(target.distance(Vec3::ZERO) > 1e-3);
    }

    #[test]
    fn changing_up_axis_mid_gesture_orbits_about_the_new_axis() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let mut rotation =
            started(RotationMode::Orbit, RotateOptions::default(), &camera, target);
        let back = rotation.orientation() * Vec3::Z;
        rotation.update_options(&RotatePatch {
            up: Some([1.0, 0.0, 0.0]),
            ..RotatePatch::default()
        });
        assert!((rotation.orientation() * Vec3::Z).distance(back) < 1e-5);

        rotation.handle_pointer_input(
            &[dragged(Vec2::ZERO, Vec2::new(0.2, 0.0))],
            &mut camera,
            &mut target,
        );
        assert!(camera.position.x.abs() < 1e-5, "{}", camera.position);
        assert!(camera.position.y.abs() > 1e-2);
        assert!((camera.position.length() - 10.0).abs() < 1e-4);
        assert_eq!(camera.up, Vec3::X);
    }
}
