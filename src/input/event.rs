use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifier of a pointer, stable from down to up/cancel.
pub type PointerId = u32;

/// Pointer id used for wheel events and mouse input without an explicit id.
pub const MOUSE_POINTER_ID: PointerId = 1;

bitflags! {
    /// Pressed mouse buttons, using the DOM `buttons` bit layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MouseButtons: u8 {
        /// Primary (usually left) button.
        const PRIMARY = 1;
        /// Secondary (usually right) button.
        const SECONDARY = 1 << 1;
        /// Auxiliary (wheel/middle) button.
        const AUXILIARY = 1 << 2;
        /// Browser back button.
        const BACK = 1 << 3;
        /// Browser forward button.
        const FORWARD = 1 << 4;
    }
}

bitflags! {
    /// Held keyboard modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        /// Control key.
        const CTRL = 1;
        /// Shift key.
        const SHIFT = 1 << 1;
        /// Alt/Option key.
        const ALT = 1 << 2;
        /// Meta/Command/Windows key.
        const META = 1 << 3;
    }
}

/// Device that produced a pointer event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PointerType {
    /// Mouse.
    #[default]
    Mouse,
    /// Pen/stylus.
    Pen,
    /// Touch contact.
    Touch,
}

/// Payload of pointer-style events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerInput {
    /// Pointer identifier.
    pub pointer_id: PointerId,
    /// Producing device.
    pub pointer_type: PointerType,
    /// Position relative to the viewport, in CSS/logical pixels.
    pub client: Vec2,
    /// Buttons held after this event.
    pub buttons: MouseButtons,
    /// Modifiers held during this event.
    pub modifiers: Modifiers,
}

impl Default for PointerInput {
    fn default() -> Self {
        Self {
            pointer_id: MOUSE_POINTER_ID,
            pointer_type: PointerType::Mouse,
            client: Vec2::ZERO,
            buttons: MouseButtons::empty(),
            modifiers: Modifiers::empty(),
        }
    }
}

impl PointerInput {
    /// Mouse input at a client position.
    #[must_use]
    pub fn mouse(client: Vec2, buttons: MouseButtons) -> Self {
        Self {
            client,
            buttons,
            ..Self::default()
        }
    }

    /// Touch contact at a client position.
    #[must_use]
    pub fn touch(pointer_id: PointerId, client: Vec2) -> Self {
        Self {
            pointer_id,
            pointer_type: PointerType::Touch,
            client,
            buttons: MouseButtons::PRIMARY,
            modifiers: Modifiers::empty(),
        }
    }

    /// Builder-style modifier setter.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Payload of wheel events.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelInput {
    /// Cursor position relative to the viewport.
    pub client: Vec2,
    /// Horizontal scroll amount in pixels.
    pub delta_x: f32,
    /// Vertical scroll amount in pixels (positive = scroll down).
    pub delta_y: f32,
    /// Modifiers held during this event.
    pub modifiers: Modifiers,
}

/// Platform-agnostic input events.
///
/// These are fed into a [`CameraControls`](crate::controls::CameraControls)
/// or an [`EventDispatcher`](crate::events::EventDispatcher).
///
/// # Example
///
/// ```ignore
/// controls.handle_event(
///     &InputEvent::PointerDown(PointerInput::mouse(
///         Vec2::new(100.0, 200.0),
///         MouseButtons::PRIMARY,
///     )),
///     &mut surface,
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "input", rename_all = "snake_case")]
pub enum InputEvent {
    /// A pointer became active.
    PointerDown(PointerInput),
    /// A pointer moved.
    PointerMove(PointerInput),
    /// A pointer was released.
    PointerUp(PointerInput),
    /// The platform cancelled a pointer.
    PointerCancel(PointerInput),
    /// Press and release on the same spot.
    Click(PointerInput),
    /// Second click in quick succession.
    DoubleClick(PointerInput),
    /// Context-menu request (usually the secondary button).
    ContextMenu(PointerInput),
    /// Scroll wheel or trackpad scroll.
    Wheel(WheelInput),
}

impl InputEvent {
    /// Pointer payload, if this is a pointer-style event.
    #[must_use]
    pub fn pointer(&self) -> Option<&PointerInput> {
        match self {
            Self::PointerDown(p)
            | Self::PointerMove(p)
            | Self::PointerUp(p)
            | Self::PointerCancel(p)
            | Self::Click(p)
            | Self::DoubleClick(p)
            | Self::ContextMenu(p) => Some(p),
            Self::Wheel(_) => None,
        }
    }

    /// Client position carried by the event.
    #[must_use]
    pub fn client(&self) -> Vec2 {
        match self {
            Self::Wheel(w) => w.client,
            _ => self.pointer().map_or(Vec2::ZERO, |p| p.client),
        }
    }

    /// Modifiers carried by the event.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::Wheel(w) => w.modifiers,
            _ => self.pointer().map_or(Modifiers::empty(), |p| p.modifiers),
        }
    }
}
