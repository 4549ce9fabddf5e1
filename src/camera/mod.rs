//! Camera model consumed by the controls and the event dispatcher.
//!
//! Provides a perspective/orthographic [`Camera`] with look-at and
//! NDC-ray helpers, and the perspective ↔ orthographic sync utility.

/// Camera struct and projection parameters.
pub mod core;
/// Perspective ↔ orthographic synchronization.
pub mod sync;

use std::cell::RefCell;
use std::rc::Rc;

pub use self::core::{Camera, Projection};
pub use self::sync::{
    sync_orthographic_from_perspective, sync_perspective_from_orthographic,
};

/// A camera owned by the application and shared with controls.
///
/// Controls borrow it mutably only for the duration of one input event.
pub type SharedCamera = Rc<RefCell<Camera>>;

/// Wrap a camera for sharing with [`CameraControls`](crate::controls::CameraControls).
#[must_use]
pub fn shared(camera: Camera) -> SharedCamera {
    Rc::new(RefCell::new(camera))
}
