//! Input handling: event types, input mappings, and the input processor
//! that turns raw pointer/wheel events into active pointers and an active
//! control set.

/// Platform-agnostic input events.
pub mod event;
/// Movement mapping rules and the active control set.
pub mod mapping;
/// Tracked pointer state.
pub mod pointer;
/// Classifies raw events for the control orchestrator.
pub mod processor;
/// The hosting element abstraction.
pub mod surface;
/// Logarithmic wheel delta conversion.
pub mod wheel;
/// Adapter from winit window events.
#[cfg(feature = "winit")]
pub mod winit_adapter;

pub use event::{
    InputEvent, Modifiers, MouseButtons, PointerId, PointerInput, PointerType,
    WheelInput, MOUSE_POINTER_ID,
};
pub use mapping::{
    ActiveControls, InputMapping, InputMappings, InputState, Movement,
    TouchGesture,
};
pub use pointer::ActivePointer;
pub use processor::{InputOutcome, InputProcessor};
pub use surface::{HeadlessSurface, InputSurface, TouchAction, ViewportRect};
pub use wheel::wheel_delta;
