//! Perspective ↔ orthographic camera synchronization.
//!
//! Both directions keep the visible height at the target plane identical:
//!
//! ```text
//! ortho.zoom = (top - bottom) * persp.zoom / (2 * d * tan(fov / 2))
//! d          = (top - bottom) * persp.zoom / (2 * tan(fov / 2) * ortho.zoom)
//! ```
//!
//! where `d` is the camera–target distance.

use glam::Vec3;

use super::core::{Camera, Projection};
use crate::geometry::EPSILON;

/// Copy `persp`'s pose onto `ortho` and pick the orthographic zoom (and
/// frustum width) that shows the same slab of the target plane.
///
/// Does nothing unless the cameras have the expected projection kinds.
pub fn sync_orthographic_from_perspective(
    persp: &Camera,
    ortho: &mut Camera,
    target: Vec3,
) {
    let Projection::Perspective { fov_y_deg, aspect } = persp.projection else {
        return;
    };
    let Projection::Orthographic {
        left,
        right,
        top,
        bottom,
    } = &mut ortho.projection
    else {
        return;
    };

    let height = *top - *bottom;
    let center_x = (*left + *right) * 0.5;
    let half_width = height * aspect * 0.5;
    *left = center_x - half_width;
    *right = center_x + half_width;

    let distance = persp.position.distance(target);
    let tan_half = (fov_y_deg.to_radians() * 0.5).tan();
    if distance > EPSILON && tan_half > EPSILON {
        ortho.zoom = height * persp.zoom / (2.0 * distance * tan_half);
    }

    ortho.position = persp.position;
    ortho.rotation = persp.rotation;
    ortho.up = persp.up;
    ortho.update_projection_matrix();
}

/// Place `persp` on the line from `target` through `ortho`'s position at
/// the distance that matches the orthographic visible height.
///
/// Does nothing unless the cameras have the expected projection kinds.
pub fn sync_perspective_from_orthographic(
    ortho: &Camera,
    persp: &mut Camera,
    target: Vec3,
) {
    let Projection::Orthographic { top, bottom, .. } = ortho.projection else {
        return;
    };
    let ortho_aspect = ortho.aspect();
    let Projection::Perspective { fov_y_deg, aspect } = &mut persp.projection
    else {
        return;
    };
    *aspect = ortho_aspect;

    let tan_half = (fov_y_deg.to_radians() * 0.5).tan();
    let offset = ortho.position - target;
    if tan_half > EPSILON && ortho.zoom > EPSILON {
        let distance =
            (top - bottom) * persp.zoom / (2.0 * tan_half * ortho.zoom);
        let dir = if offset.length_squared() > EPSILON {
            offset.normalize()
        } else {
            ortho.rotation * Vec3::Z
        };
        persp.position = target + dir * distance;
    } else {
        persp.position = ortho.position;
    }

    persp.rotation = ortho.rotation;
    persp.up = ortho.up;
    persp.update_projection_matrix();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perspective_at(position: Vec3, target: Vec3, fov: f32, zoom: f32) -> Camera {
        let mut camera =
            Camera::perspective(fov, 1.5, 0.1, 1000.0).with_position(position);
        camera.zoom = zoom;
        camera.look_at(target);
        camera
    }

    fn default_ortho() -> Camera {
        Camera::orthographic(-1.0, 1.0, 1.0, -1.0, 0.1, 1000.0)
    }

    #[test]
    fn default_orthographic_to_perspective_vector() {
        let target = Vec3::new(3.0, 2.0, 1.0);
        let mut ortho =
            default_ortho().with_position(Vec3::new(30.0, 40.0, 50.0));
        ortho.look_at(target);
        let mut persp = perspective_at(Vec3::ZERO, target, 55.0, 1.0);

        sync_perspective_from_orthographic(&ortho, &mut persp, target);

        let expected = Vec3::new(3.7669, 3.07934, 2.39178);
        assert!(persp.position.distance(expected) < 1e-4);
        assert_eq!(persp.aspect(), 1.0);
    }

    #[test]
    fn round_trip_restores_position() {
        let target = Vec3::new(3.0, 2.0, 1.0);
        for (fov, zoom, pos) in [
            (55.0, 1.0, Vec3::new(30.0, 40.0, 50.0)),
            (30.0, 2.0, Vec3::new(-5.0, 1.0, 8.0)),
            (90.0, 0.5, Vec3::new(3.0, 12.0, 1.5)),
        ] {
            let persp = perspective_at(pos, target, fov, zoom);
            let mut ortho = default_ortho();
            sync_orthographic_from_perspective(&persp, &mut ortho, target);

            let mut back = perspective_at(Vec3::ZERO, target, fov, zoom);
            sync_perspective_from_orthographic(&ortho, &mut back, target);

            let tolerance = 1e-5 * pos.distance(target).max(1.0) * 10.0;
            assert!(back.position.distance(pos) < tolerance);
            assert!((back.aspect() - 1.5).abs() < 1e-5);
        }
    }

    #[test]
    fn orthographic_zoom_matches_visible_height() {
        let target = Vec3::ZERO;
        let persp = perspective_at(Vec3::new(0.0, 0.0, 10.0), target, 60.0, 1.0);
        let mut ortho = default_ortho();
        sync_orthographic_from_perspective(&persp, &mut ortho, target);

        let persp_half = persp.half_height_at(10.0);
        let ortho_half = ortho.half_height_at(10.0);
        assert!((persp_half - ortho_half).abs() < 1e-4);
        assert_eq!(ortho.position, persp.position);
    }

    #[test]
    fn mismatched_kinds_are_ignored() {
        let persp = perspective_at(Vec3::Z, Vec3::ZERO, 50.0, 1.0);
        let mut other = perspective_at(Vec3::X, Vec3::ZERO, 50.0, 1.0);
        let before = other.clone();
        sync_orthographic_from_perspective(&persp, &mut other, Vec3::ZERO);
        assert_eq!(other, before);
    }
}
