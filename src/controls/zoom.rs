//! Zoom/dolly fragment.
//!
//! Deltas map to multipliers asymmetrically so opposite deltas cancel:
//!
//! ```text
//! f(d) = 1 + d          d >= 0
//! f(d) = 1 / (1 - d)    d <  0
//! ```
//!
//! Dolly multiplies the camera–target distance by `f(d)`; zoom divides the
//! camera zoom by it. Positive deltas move away. Internally the effect is
//! tracked as `ln f(d)` relative to the gesture-start snapshot.

use glam::{Vec2, Vec3};

use super::fragment::{signed_speed, PointerInputHandler, WheelInputHandler};
use crate::camera::Camera;
use crate::geometry::{yaw_pitch_arc, Plane, Sphere, EPSILON};
use crate::input::pointer::{centroid, primary_type, start_centroid};
use crate::input::ActivePointer;
use crate::options::{SecondaryMotion, ZoomKind, ZoomOptions, ZoomPatch};

/// Multiplier for a signed delta.
#[must_use]
pub fn delta_multiplier(delta: f32) -> f32 {
    if delta >= 0.0 {
        1.0 + delta
    } else {
        1.0 / (1.0 - delta)
    }
}

/// `ln(delta_multiplier(delta))`.
fn log_scale(delta: f32) -> f32 {
    delta.signum() * delta.abs().ln_1p()
}

/// Scales the camera zoom, moves the camera along the view axis, or both.
#[derive(Debug, Clone)]
pub struct ZoomDolly {
    options: ZoomOptions,
    /// NDC point the secondary motion keeps fixed.
    anchor: Vec2,
    start_zoom: f32,
    start_distance: f32,
    /// Achieved `ln(start_zoom / zoom)` since the snapshot.
    zoom_log: f32,
    /// Achieved `ln(distance / start_distance)` since the snapshot.
    dolly_log: f32,
}

impl ZoomDolly {
    /// Create a zoom/dolly fragment.
    #[must_use]
    pub fn new(options: ZoomOptions) -> Self {
        Self {
            options,
            anchor: Vec2::ZERO,
            start_zoom: 1.0,
            start_distance: 0.0,
            zoom_log: 0.0,
            dolly_log: 0.0,
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn options(&self) -> &ZoomOptions {
        &self.options
    }

    /// Merge a partial configuration. The snapshot is kept.
    pub fn update_options(&mut self, patch: &ZoomPatch) {
        self.options = self.options.merged(patch);
    }

    /// Zoom at the last snapshot.
    #[must_use]
    pub fn start_zoom(&self) -> f32 {
        self.start_zoom
    }

    /// Camera–target distance at the last snapshot.
    #[must_use]
    pub fn start_distance(&self) -> f32 {
        self.start_distance
    }

    /// Snapshot zoom, distance and the gesture anchor.
    pub fn update_start_values(
        &mut self,
        pointers: &[ActivePointer],
        camera: &Camera,
        target: Vec3,
    ) {
        self.anchor = start_centroid(pointers);
        self.start_zoom = camera.zoom;
        self.start_distance = camera.position.distance(target);
        self.zoom_log = 0.0;
        self.dolly_log = 0.0;
    }

    /// Apply one step of `ln f(d)` plus the configured secondary motion.
    fn step(&mut self, log_delta: f32, anchor: Vec2, camera: &mut Camera, target: &mut Vec3) {
        if log_delta == 0.0 || !log_delta.is_finite() {
            return;
        }
        let plane = Plane::from_normal_and_point(camera.forward(), *target);
        let anchor_point = match self.options.secondary_motion {
            SecondaryMotion::None => None,
            _ => plane.intersect_ray(&camera.ray_from_ndc(anchor)),
        };

        self.apply_core(log_delta, camera, *target);

        let Some(before) = anchor_point else {
            return;
        };
        match self.options.secondary_motion {
            SecondaryMotion::None => {}
            SecondaryMotion::Truck => {
                if let Some(after) = plane.intersect_ray(&camera.ray_from_ndc(anchor)) {
                    let offset = before - after;
                    camera.position += offset;
                    *target += offset;
                }
            }
            SecondaryMotion::Orbit => {
                let radius = before.distance(*target);
                if radius < EPSILON {
                    return;
                }
                camera.look_at(*target);
                let sphere = Sphere::new(*target, radius);
                let Some(after) = sphere.intersect_ray(&camera.ray_from_ndc(anchor))
                else {
                    log::trace!("orbit anchor sphere missed");
                    return;
                };
                let rotation = yaw_pitch_arc(
                    after - *target,
                    before - *target,
                    camera.up,
                    camera.screen_right(),
                );
                camera.position = *target + rotation * (camera.position - *target);
                camera.look_at(*target);
            }
            SecondaryMotion::Rotate => {
                camera.look_at(*target);
                let rotation = yaw_pitch_arc(
                    camera.ray_from_ndc(anchor).direction,
                    before - camera.position,
                    camera.up,
                    camera.screen_right(),
                );
                *target = camera.position + rotation * (*target - camera.position);
                camera.look_at(*target);
            }
        }
    }

    fn apply_core(&mut self, log_delta: f32, camera: &mut Camera, target: Vec3) {
        match self.options.kind {
            ZoomKind::Zoom => {
                let zoom = self.clamped_zoom(self.zoom_log + log_delta);
                self.set_zoom(zoom, camera);
            }
            ZoomKind::Dolly => {
                let distance = self.clamped_distance(self.dolly_log + log_delta);
                self.set_distance(distance, camera, target);
            }
            ZoomKind::ZoomAndDolly => {
                let ratio = self.options.dolly_ratio.clamp(0.0, 1.0);
                let dolly_log = self.dolly_log + log_delta * ratio;
                let zoom_log = self.zoom_log + log_delta * (1.0 - ratio);
                let mut distance = self.clamped_distance(dolly_log);
                let mut zoom = self.clamped_zoom(zoom_log);

                let achieved = self.log_of_distance(distance) - self.dolly_log
                    + self.log_of_zoom(zoom)
                    - self.zoom_log;
                let remainder = log_delta - achieved;
                if remainder.abs() > EPSILON {
                    // Hand the clamped-away part to whichever limit bit less.
                    let dolly_miss = (self.log_of_distance(distance) - dolly_log).abs();
                    let zoom_miss = (self.log_of_zoom(zoom) - zoom_log).abs();
                    if dolly_miss <= zoom_miss {
                        distance = self.clamped_distance(
                            self.log_of_distance(distance) + remainder,
                        );
                    } else {
                        zoom = self.clamped_zoom(self.log_of_zoom(zoom) + remainder);
                    }
                }
                self.set_distance(distance, camera, target);
                self.set_zoom(zoom, camera);
            }
        }
    }

    fn clamped_zoom(&self, zoom_log: f32) -> f32 {
        (self.start_zoom * (-zoom_log).exp())
            .clamp(self.options.min_zoom, self.options.max_zoom.max(self.options.min_zoom))
    }

    fn clamped_distance(&self, dolly_log: f32) -> f32 {
        (self.start_distance * dolly_log.exp()).clamp(
            self.options.min_distance,
            self.options.max_distance.max(self.options.min_distance),
        )
    }

    fn log_of_zoom(&self, zoom: f32) -> f32 {
        if self.start_zoom <= 0.0 || zoom <= 0.0 {
            return self.zoom_log;
        }
        (self.start_zoom / zoom).ln()
    }

    fn log_of_distance(&self, distance: f32) -> f32 {
        if self.start_distance < EPSILON || distance < EPSILON {
            return self.dolly_log;
        }
        (distance / self.start_distance).ln()
    }

    fn set_zoom(&mut self, zoom: f32, camera: &mut Camera) {
        if self.start_zoom <= 0.0 || zoom <= 0.0 {
            log::trace!("zoom step skipped at zoom {zoom}");
            return;
        }
        camera.zoom = zoom;
        self.zoom_log = self.log_of_zoom(zoom);
    }

    fn set_distance(&mut self, distance: f32, camera: &mut Camera, target: Vec3) {
        let Some(direction) = (camera.position - target).try_normalize() else {
            log::trace!("dolly step skipped: camera sits on the target");
            return;
        };
        if self.start_distance < EPSILON {
            return;
        }
        camera.position = target + direction * distance;
        self.dolly_log = self.log_of_distance(distance);
    }
}

impl PointerInputHandler for ZoomDolly {
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
        match pointers {
            [] => {}
            [pointer] => {
                let log_delta = log_scale(-pointer.delta.y * speed);
                self.step(log_delta, self.anchor, camera, target);
            }
            [a, b, ..] => {
                let previous = a.previous_coords().distance(b.previous_coords());
                let current = a.coords.distance(b.coords);
                if previous < EPSILON || current < EPSILON {
                    return;
                }
                let log_delta = (previous / current).ln() * speed;
                self.step(log_delta, centroid(pointers), camera, target);
            }
        }
    }
}

impl WheelInputHandler for ZoomDolly {
    fn handle_wheel_input(
        &mut self,
        delta: f32,
        pointer: &ActivePointer,
        camera: &mut Camera,
        target: &mut Vec3,
    ) {
        let speed = signed_speed(
            &self.options.speed,
            &self.options.invert,
            pointer.pointer_type,
        );
        self.step(log_scale(delta * speed), pointer.coords, camera, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::test_support::{camera_at, dragged, ray_miss};
    use crate::input::{PointerType, MOUSE_POINTER_ID};

    fn wheel_at(coords: Vec2) -> ActivePointer {
        ActivePointer::at(MOUSE_POINTER_ID, PointerType::Mouse, coords)
    }

    fn wheel(
        zoom: &mut ZoomDolly,
        delta: f32,
        coords: Vec2,
        camera: &mut Camera,
        target: &mut Vec3,
    ) {
        let pointer = wheel_at(coords);
        zoom.update_start_values(&[pointer], camera, *target);
        zoom.handle_wheel_input(delta, &pointer, camera, target);
    }

    #[test]
    fn multiplier_is_inverse_symmetric() {
        for d in [0.1_f32, 0.5, 2.0, 10.0] {
            assert!((delta_multiplier(d) * delta_multiplier(-d) - 1.0).abs() < 1e-6);
        }
        assert!(delta_multiplier(-1000.0) > 0.0);
    }

    #[test]
    fn inverse_zoom_deltas_cancel() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        camera.zoom = 2.0;
        let mut target = Vec3::ZERO;
        let mut zoom = ZoomDolly::new(ZoomOptions {
            kind: ZoomKind::Zoom,
            ..ZoomOptions::default()
        });
        wheel(&mut zoom, 0.3, Vec2::ZERO, &mut camera, &mut target);
        assert!((camera.zoom - 2.0 / 1.3).abs() < 1e-5);
        wheel(&mut zoom, -0.3, Vec2::ZERO, &mut camera, &mut target);
        assert!((camera.zoom - 2.0).abs() < 1e-5);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn inverse_dolly_deltas_cancel() {
        let mut camera = camera_at(Vec3::new(0.0, 6.0, 8.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let mut zoom = ZoomDolly::new(ZoomOptions::default());
        wheel(&mut zoom, 0.25, Vec2::ZERO, &mut camera, &mut target);
        assert!((camera.position.length() - 12.5).abs() < 1e-4);
        wheel(&mut zoom, -0.25, Vec2::ZERO, &mut camera, &mut target);
        assert!(camera.position.distance(Vec3::new(0.0, 6.0, 8.0)) < 1e-4);
        assert_eq!(camera.zoom, 1.0);
    }

    #[test]
    fn distance_limits_are_hard() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let mut zoom = ZoomDolly::new(ZoomOptions {
            min_distance: 4.0,
            max_distance: 20.0,
            ..ZoomOptions::default()
        });
        wheel(&mut zoom, -5.0, Vec2::ZERO, &mut camera, &mut target);
        assert!((camera.position.z - 4.0).abs() < 1e-5);
        wheel(&mut zoom, 50.0, Vec2::ZERO, &mut camera, &mut target);
        assert!((camera.position.z - 20.0).abs() < 1e-4);
    }

    #[test]
    fn clamp_during_drag_has_no_dead_zone() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let mut zoom = ZoomDolly::new(ZoomOptions {
            max_distance: 11.0,
            ..ZoomOptions::default()
        });
        zoom.update_start_values(&[dragged(Vec2::ZERO, Vec2::ZERO)], &camera, target);
        // drag down far past the limit, then back up a little
        zoom.handle_pointer_input(
            &[dragged(Vec2::ZERO, Vec2::new(0.0, -1.0))],
            &mut camera,
            &mut target,
        );
        assert!((camera.position.z - 11.0).abs() < 1e-4);
        zoom.handle_pointer_input(
            &[dragged(Vec2::new(0.0, -1.0), Vec2::new(0.0, 0.1))],
            &mut camera,
            &mut target,
        );
        assert!((camera.position.z - 10.0).abs() < 1e-4);
    }

    #[test]
    fn zoom_and_dolly_redistributes_clamped_part() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let mut zoom = ZoomDolly::new(ZoomOptions {
            kind: ZoomKind::ZoomAndDolly,
            min_distance: 8.0,
            ..ZoomOptions::default()
        });
        // f(-1) = 1/2: half split would reach distance 7.07 and zoom 1.41;
        // the distance limit holds at 8 and zoom takes the rest.
        wheel(&mut zoom, -1.0, Vec2::ZERO, &mut camera, &mut target);
        assert!((camera.position.z - 8.0).abs() < 1e-4);
        assert!((camera.zoom - 1.6).abs() < 1e-4);
        let effect = camera.position.z / 10.0 / camera.zoom;
        assert!((effect - 0.5).abs() < 1e-4);
    }

    #[test]
    fn zoom_and_dolly_both_clamped_stays_within_limits() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let mut zoom = ZoomDolly::new(ZoomOptions {
            kind: ZoomKind::ZoomAndDolly,
            min_distance: 9.0,
            max_zoom: 1.2,
            ..ZoomOptions::default()
        });
        wheel(&mut zoom, -3.0, Vec2::ZERO, &mut camera, &mut target);
        assert!((camera.position.z - 9.0).abs() < 1e-4);
        assert!((camera.zoom - 1.2).abs() < 1e-5);
    }

    #[test]
    fn pinch_spread_moves_closer() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let mut zoom = ZoomDolly::new(ZoomOptions::default());
        let a = ActivePointer::at(1, PointerType::Touch, Vec2::new(-0.1, 0.0));
        let b = ActivePointer::at(2, PointerType::Touch, Vec2::new(0.1, 0.0));
        zoom.update_start_values(&[a, b], &camera, target);
        let moved = ActivePointer {
            coords: Vec2::new(0.3, 0.0),
            delta: Vec2::new(0.2, 0.0),
            ..b
        };
        // span 0.2 -> 0.4 halves the distance
        zoom.handle_pointer_input(&[a, moved], &mut camera, &mut target);
        assert!((camera.position.z - 5.0).abs() < 1e-4);
    }

    #[test]
    fn truck_secondary_keeps_point_under_cursor() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let anchor = Vec2::new(0.5, 0.5);
        let plane = Plane::from_normal_and_point(Vec3::Z, Vec3::ZERO);
        let before = plane.intersect_ray(&camera.ray_from_ndc(anchor)).unwrap();
        let mut zoom = ZoomDolly::new(ZoomOptions {
            secondary_motion: SecondaryMotion::Truck,
            ..ZoomOptions::default()
        });
        wheel(&mut zoom, -0.5, anchor, &mut camera, &mut target);
        camera.look_at(target);
        let after = plane.intersect_ray(&camera.ray_from_ndc(anchor)).unwrap();
        assert!(after.distance(before) < 1e-4, "{after} vs {before}");
        assert!((camera.position.distance(target) - 10.0 / 1.5).abs() < 1e-4);
        assert!(target.x > 0.0 && target.y > 0.0);
    }

    #[test]
    fn rotate_secondary_turns_view_toward_anchor() {
        for anchor in [Vec2::new(0.5, 0.0), Vec2::new(0.5, 0.5), Vec2::new(0.8, 0.8)] {
            let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
            let mut target = Vec3::ZERO;
            let plane = Plane::from_normal_and_point(Vec3::Z, Vec3::ZERO);
            let before = plane.intersect_ray(&camera.ray_from_ndc(anchor)).unwrap();
            let mut zoom = ZoomDolly::new(ZoomOptions {
                kind: ZoomKind::Zoom,
                secondary_motion: SecondaryMotion::Rotate,
                ..ZoomOptions::default()
            });
            wheel(&mut zoom, -1.0, anchor, &mut camera, &mut target);
            camera.look_at(target);
            assert!((camera.zoom - 2.0).abs() < 1e-5);
            let miss = ray_miss(&camera.ray_from_ndc(anchor), before);
            assert!(miss < 1e-3, "anchor {anchor}: missed by {miss}");
            assert_eq!(camera.position, Vec3::new(0.0, 0.0, 10.0));
            assert!(camera.screen_right().dot(Vec3::Y).abs() < 1e-5);
        }
    }

    #[test]
    fn orbit_secondary_keeps_anchor_under_cursor() {
        for anchor in [Vec2::new(0.4, 0.0), Vec2::new(0.5, 0.5), Vec2::new(0.8, 0.8)] {
            let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
            let mut target = Vec3::ZERO;
            let plane = Plane::from_normal_and_point(Vec3::Z, Vec3::ZERO);
            let before = plane.intersect_ray(&camera.ray_from_ndc(anchor)).unwrap();
            let mut zoom = ZoomDolly::new(ZoomOptions {
                secondary_motion: SecondaryMotion::Orbit,
                ..ZoomOptions::default()
            });
            wheel(&mut zoom, -0.5, anchor, &mut camera, &mut target);
            camera.look_at(target);
            assert_eq!(target, Vec3::ZERO);
            assert!((camera.position.length() - 10.0 / 1.5).abs() < 1e-4);
            let miss = ray_miss(&camera.ray_from_ndc(anchor), before);
            assert!(miss < 1e-3, "anchor {anchor}: missed by {miss}");
        }
    }

    #[test]
    fn zoom_and_dolly_tie_leaves_both_at_their_limits() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        // f(-1) = 1/2 splits into ln(1/sqrt 2) each; both limits stop at
        // ln(0.8), so both parts miss by the same amount.
        let mut zoom = ZoomDolly::new(ZoomOptions {
            kind: ZoomKind::ZoomAndDolly,
            min_distance: 8.0,
            max_zoom: 1.25,
            ..ZoomOptions::default()
        });
        wheel(&mut zoom, -1.0, Vec2::ZERO, &mut camera, &mut target);
        assert!((camera.position.z - 8.0).abs() < 1e-4);
        assert!((camera.zoom - 1.25).abs() < 1e-5);

        // the next step out is not held back by the clamped remainder
        wheel(&mut zoom, 0.1, Vec2::ZERO, &mut camera, &mut target);
        assert!(camera.position.z > 8.0);
        assert!(camera.zoom < 1.25);
    }

    #[test]
    fn zoom_and_dolly_gives_zoom_clamp_remainder_to_dolly() {
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let mut target = Vec3::ZERO;
        let mut zoom = ZoomDolly::new(ZoomOptions {
            kind: ZoomKind::ZoomAndDolly,
            max_zoom: 1.25,
            ..ZoomOptions::default()
        });
        // zoom holds at 1.25, dolly covers the rest of the halving
        wheel(&mut zoom, -1.0, Vec2::ZERO, &mut camera, &mut target);
        assert!((camera.zoom - 1.25).abs() < 1e-5);
        assert!((camera.position.z - 6.25).abs() < 1e-3);
    }
}
