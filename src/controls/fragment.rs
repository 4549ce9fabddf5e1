//! The fragment contract and the closed set of fragment kinds.

use glam::Vec3;

use super::rotate::{FixedUpRotation, FreeUpRotation};
use super::truck::Truck;
use super::zoom::ZoomDolly;
use crate::camera::Camera;
use crate::input::{ActivePointer, PointerType};
use crate::options::{ControlOptions, DeviceValue, RotatePatch, TruckPatch, ZoomPatch};

/// Fragments driven by 2D pointer deltas.
pub trait PointerInputHandler {
    /// Apply the latest pointer deltas to `camera` and `target` in place.
    fn handle_pointer_input(
        &mut self,
        pointers: &[ActivePointer],
        camera: &mut Camera,
        target: &mut Vec3,
    );
}

/// Fragments driven by a scalar wheel delta.
pub trait WheelInputHandler {
    /// Apply a wheel step anchored at `pointer` to `camera` and `target`.
    fn handle_wheel_input(
        &mut self,
        delta: f32,
        pointer: &ActivePointer,
        camera: &mut Camera,
        target: &mut Vec3,
    );
}

/// One independently pluggable camera behavior.
#[derive(Debug, Clone)]
pub enum Fragment {
    /// Orbit/look rotation with explicit angles about a fixed up axis.
    FixedUpRotation(FixedUpRotation),
    /// Trackball-style rotation that lets the up vector drift.
    FreeUpRotation(FreeUpRotation),
    /// Lateral panning.
    Truck(Truck),
    /// Zoom and/or dolly.
    ZoomDolly(ZoomDolly),
}

impl Fragment {
    /// Snapshot gesture-start reference geometry.
    ///
    /// `pointers` is empty for programmatic initialization (attach, camera
    /// swap).
    pub fn update_start_values(
        &mut self,
        pointers: &[ActivePointer],
        camera: &Camera,
        target: Vec3,
    ) {
        match self {
            Self::FixedUpRotation(f) => {
                f.update_start_values(pointers, camera, target);
            }
            Self::FreeUpRotation(f) => {
                f.update_start_values(pointers, camera, target);
            }
            Self::Truck(f) => f.update_start_values(pointers, camera, target),
            Self::ZoomDolly(f) => {
                f.update_start_values(pointers, camera, target);
            }
        }
    }

    /// Whether the fragment reacts to pointer deltas.
    #[must_use]
    pub fn supports_pointer_input(&self) -> bool {
        match self {
            Self::FixedUpRotation(_)
            | Self::FreeUpRotation(_)
            | Self::Truck(_)
            | Self::ZoomDolly(_) => true,
        }
    }

    /// Whether the fragment reacts to wheel deltas.
    #[must_use]
    pub fn supports_wheel_input(&self) -> bool {
        matches!(self, Self::ZoomDolly(_))
    }

    /// Pointer capability, if any.
    pub fn as_pointer_handler(&mut self) -> Option<&mut dyn PointerInputHandler> {
        match self {
            Self::FixedUpRotation(f) => Some(f),
            Self::FreeUpRotation(f) => Some(f),
            Self::Truck(f) => Some(f),
            Self::ZoomDolly(f) => Some(f),
        }
    }

    /// Wheel capability, if any.
    pub fn as_wheel_handler(&mut self) -> Option<&mut dyn WheelInputHandler> {
        match self {
            Self::ZoomDolly(f) => Some(f),
            _ => None,
        }
    }

    /// Merge the matching section of `options` into the fragment's
    /// configuration. Transient gesture state is kept.
    pub fn apply_options(&mut self, options: &ControlOptions) {
        match self {
            Self::FixedUpRotation(f) => {
                f.update_options(&RotatePatch::from(&options.rotate));
            }
            Self::FreeUpRotation(f) => {
                f.update_options(&RotatePatch::from(&options.rotate));
            }
            Self::Truck(f) => f.update_options(&TruckPatch::from(&options.truck)),
            Self::ZoomDolly(f) => f.update_options(&ZoomPatch::from(&options.zoom)),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Speed with the invert flag folded into its sign.
pub(crate) fn signed_speed(
    speed: &DeviceValue<f32>,
    invert: &DeviceValue<bool>,
    pointer_type: PointerType,
) -> f32 {
    let speed = speed.get(pointer_type);
    if invert.get(pointer_type) {
        -speed
    } else {
        speed
    }
}
