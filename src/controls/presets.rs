use glam::Vec3;

use super::base::CameraControls;
use super::fragment::Fragment;
use super::rotate::{FixedUpRotation, FreeUpRotation, RotationMode};
use super::truck::Truck;
use super::zoom::ZoomDolly;
use crate::camera::SharedCamera;
use crate::input::{InputMapping, InputMappings, Movement, MouseButtons, TouchGesture};
use crate::options::{
    RotateOptions, SecondaryMotion, TruckMode, TruckOptions, ZoomKind, ZoomOptions,
};

/// Orbit about the target with a fixed up axis.
///
/// Primary drag orbits, secondary (or shift+primary) drag pans with the
/// grabbed point held under the cursor, auxiliary drag and the wheel dolly
/// toward the cursor.
#[must_use]
pub fn orbit_controls(camera: SharedCamera, target: Vec3) -> CameraControls {
    CameraControls::new(camera, target)
        .with_fragment(
            Movement::Rotate,
            Fragment::FixedUpRotation(FixedUpRotation::new(
                RotationMode::Orbit,
                RotateOptions::default(),
            )),
        )
        .with_fragment(
            Movement::Truck,
            Fragment::Truck(Truck::new(TruckOptions::default())),
        )
        .with_fragment(
            Movement::Zoom,
            Fragment::ZoomDolly(ZoomDolly::new(ZoomOptions {
                kind: ZoomKind::Dolly,
                secondary_motion: SecondaryMotion::Truck,
                ..ZoomOptions::default()
            })),
        )
}

/// Unconstrained trackball rotation.
///
/// The up vector follows the drag, panning uses screen-space deltas and the
/// wheel changes the zoom factor rather than the distance.
#[must_use]
pub fn trackball_controls(camera: SharedCamera, target: Vec3) -> CameraControls {
    CameraControls::new(camera, target)
        .with_fragment(
            Movement::Rotate,
            Fragment::FreeUpRotation(FreeUpRotation::new(
                RotationMode::Orbit,
                RotateOptions::default(),
            )),
        )
        .with_fragment(
            Movement::Truck,
            Fragment::Truck(Truck::new(TruckOptions {
                mode: TruckMode::Approximate,
                ..TruckOptions::default()
            })),
        )
        .with_fragment(
            Movement::Zoom,
            Fragment::ZoomDolly(ZoomDolly::new(ZoomOptions {
                kind: ZoomKind::Zoom,
                ..ZoomOptions::default()
            })),
        )
}

/// Look around from a fixed position.
///
/// Primary drag turns the view about the camera, secondary drag pans and
/// the wheel dollies. One finger looks, two fingers pan and pinch.
#[must_use]
pub fn first_person_controls(camera: SharedCamera, target: Vec3) -> CameraControls {
    let mut controls = CameraControls::new(camera, target)
        .with_fragment(
            Movement::Rotate,
            Fragment::FixedUpRotation(FixedUpRotation::new(
                RotationMode::Look,
                RotateOptions::default(),
            )),
        )
        .with_fragment(
            Movement::Truck,
            Fragment::Truck(Truck::new(TruckOptions::default())),
        )
        .with_fragment(
            Movement::Zoom,
            Fragment::ZoomDolly(ZoomDolly::new(ZoomOptions::default())),
        );
    controls.set_input_mappings(
        InputMappings::new()
            .with(
                Movement::Rotate,
                vec![
                    InputMapping::buttons(MouseButtons::PRIMARY),
                    InputMapping::gesture(TouchGesture::One),
                ],
            )
            .with(
                Movement::Truck,
                vec![
                    InputMapping::buttons(MouseButtons::SECONDARY),
                    InputMapping::gesture(TouchGesture::Two),
                ],
            )
            .with(Movement::Zoom, vec![InputMapping::gesture(TouchGesture::Two)]),
    );
    controls
}
