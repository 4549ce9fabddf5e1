//! Camera controls: fragments and the orchestrator that drives them.
//!
//! A [`CameraControls`] owns a target point and one [`Fragment`] per
//! [`Movement`](crate::input::Movement). Raw events go through the input
//! classifier; the resulting pointer deltas and wheel steps are forwarded to
//! the fragments of the active movements, in rotate → truck → zoom order.
//! After each mutation the camera looks at the target again.
//!
//! Ready-made setups live in [`presets`].

mod base;
mod fragment;
/// Orbit, trackball and first-person setups.
pub mod presets;
mod rotate;
mod truck;
mod zoom;

pub use base::{CameraControls, ControlEvent, ControlEventKind, ControlListenerId};
pub use fragment::{Fragment, PointerInputHandler, WheelInputHandler};
pub use rotate::{FixedUpRotation, FreeUpRotation, RotationMode, VERTICAL_EPSILON};
pub use truck::Truck;
pub use zoom::{delta_multiplier, ZoomDolly};
