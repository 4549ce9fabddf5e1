use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};

use super::EPSILON;

/// Wrap an angle into `[-π, π]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid maps exactly π to -π; keep the caller's sign there.
    if wrapped == -PI && angle > 0.0 {
        PI
    } else {
        wrapped
    }
}

/// Restrict an angle to `[min, max]`.
///
/// With `min <= max` this is a plain clamp. With `min > max` the allowed
/// range wraps around through ±π: angles in `(max, min)` are excluded and
/// snap to whichever bound is angularly closer.
#[must_use]
pub fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    if min <= max {
        return angle.clamp(min, max);
    }
    if angle >= min || angle <= max {
        return angle;
    }
    let to_min = (min - angle).abs();
    let to_max = (angle - max).abs();
    if to_min < to_max {
        min
    } else {
        max
    }
}

/// Rotation taking the direction of `from` onto the direction of `to`,
/// composed of a pitch about `right` followed by a yaw about `up`.
///
/// `right` must be perpendicular to `up`. Unlike a shortest arc, the result
/// never introduces roll, so a camera re-aimed with `look_at` and the same
/// up vector keeps the rotated orientation. When the elevation of `to` is
/// out of reach the pitch stops at the closest reachable elevation.
#[must_use]
pub fn yaw_pitch_arc(from: Vec3, to: Vec3, up: Vec3, right: Vec3) -> Quat {
    let (Some(from), Some(to), Some(up), Some(right)) = (
        from.try_normalize(),
        to.try_normalize(),
        up.try_normalize(),
        right.try_normalize(),
    ) else {
        return Quat::IDENTITY;
    };

    // Elevation after pitching by b: A cos b + B sin b.
    let a = up.dot(from);
    let b = up.dot(right.cross(from));
    let reach = a.hypot(b);
    let pitch_angle = if reach < EPSILON {
        0.0
    } else {
        let phase = b.atan2(a);
        let offset = (up.dot(to) / reach).clamp(-1.0, 1.0).acos();
        let first = wrap_angle(phase + offset);
        let second = wrap_angle(phase - offset);
        if first.abs() <= second.abs() {
            first
        } else {
            second
        }
    };
    let pitch = Quat::from_axis_angle(right, pitch_angle);

    let pitched = pitch * from;
    let flat_from = pitched - up * up.dot(pitched);
    let flat_to = to - up * up.dot(to);
    if flat_from.length_squared() < EPSILON || flat_to.length_squared() < EPSILON {
        return pitch;
    }
    let yaw_angle = up.dot(flat_from.cross(flat_to)).atan2(flat_from.dot(flat_to));
    Quat::from_axis_angle(up, yaw_angle) * pitch
}
