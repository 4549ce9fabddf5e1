use std::fmt;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::input::{InputEvent, PointerId};
use crate::scene::{Intersection, ObjectId};

/// Kinds of events delivered to scene objects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A pointer became active over the object.
    PointerDown,
    /// A pointer moved over the object.
    PointerMove,
    /// A pointer was released over the object.
    PointerUp,
    /// The platform cancelled a pointer.
    PointerCancel,
    /// The object became the hovered object.
    PointerOver,
    /// The object stopped being the hovered object.
    PointerOut,
    /// The pointer entered the object or one of its descendants.
    PointerEnter,
    /// The pointer left the object and all of its descendants.
    PointerLeave,
    /// Press and release.
    Click,
    /// Double click.
    DoubleClick,
    /// Context-menu request.
    ContextMenu,
    /// Scroll wheel.
    Wheel,
}

impl EventType {
    /// Type of the event produced by a native input event.
    #[must_use]
    pub const fn from_input(input: &InputEvent) -> Self {
        match input {
            InputEvent::PointerDown(_) => Self::PointerDown,
            InputEvent::PointerMove(_) => Self::PointerMove,
            InputEvent::PointerUp(_) => Self::PointerUp,
            InputEvent::PointerCancel(_) => Self::PointerCancel,
            InputEvent::Click(_) => Self::Click,
            InputEvent::DoubleClick(_) => Self::DoubleClick,
            InputEvent::ContextMenu(_) => Self::ContextMenu,
            InputEvent::Wheel(_) => Self::Wheel,
        }
    }

    /// Whether the event runs a bubbling phase.
    #[must_use]
    pub const fn bubbles(self) -> bool {
        !matches!(self, Self::PointerEnter | Self::PointerLeave)
    }

    /// DOM-style event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::PointerCancel => "pointercancel",
            Self::PointerOver => "pointerover",
            Self::PointerOut => "pointerout",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
            Self::Click => "click",
            Self::DoubleClick => "dblclick",
            Self::ContextMenu => "contextmenu",
            Self::Wheel => "wheel",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Propagation phase a listener is invoked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Not being dispatched.
    #[default]
    None,
    /// Walking from the root toward the target.
    Capturing,
    /// At the target object.
    AtTarget,
    /// Walking from the target back to the root.
    Bubbling,
}

/// Event delivered to scene-object listeners.
///
/// One value is shared by every listener of a native event, so propagation
/// flags set by one listener are seen by the next.
#[derive(Debug, Clone)]
pub struct SceneEvent {
    event_type: EventType,
    input: InputEvent,
    ndc: Vec2,
    intersections: Rc<[Intersection]>,
    pub(crate) target: Option<ObjectId>,
    pub(crate) current_target: Option<ObjectId>,
    pub(crate) phase: Phase,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    default_prevented: bool,
}

impl SceneEvent {
    pub(crate) fn new(
        event_type: EventType,
        input: InputEvent,
        ndc: Vec2,
        intersections: Rc<[Intersection]>,
    ) -> Self {
        Self {
            event_type,
            input,
            ndc,
            intersections,
            target: None,
            current_target: None,
            phase: Phase::None,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Event kind.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// The native event this was derived from.
    #[must_use]
    pub fn input(&self) -> &InputEvent {
        &self.input
    }

    /// Pointer identifier, `None` for wheel events.
    #[must_use]
    pub fn pointer_id(&self) -> Option<PointerId> {
        self.input.pointer().map(|p| p.pointer_id)
    }

    /// Pointer position in normalized device coordinates.
    #[must_use]
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    /// Object the event is aimed at.
    #[must_use]
    pub fn target(&self) -> Option<ObjectId> {
        self.target
    }

    /// Object whose listener is currently running.
    #[must_use]
    pub fn current_target(&self) -> Option<ObjectId> {
        self.current_target
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether this event bubbles.
    #[must_use]
    pub fn bubbles(&self) -> bool {
        self.event_type.bubbles()
    }

    /// All visible hits of the pointer ray, nearest first.
    #[must_use]
    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    /// Nearest hit on the target object itself.
    #[must_use]
    pub fn intersection(&self) -> Option<&Intersection> {
        let target = self.target?;
        self.intersections.iter().find(|hit| hit.object == target)
    }

    /// Stop after the listeners of the current object.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop right after the running listener.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Ask the host to skip its default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether [`stop_propagation`](Self::stop_propagation) was called.
    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Whether [`stop_immediate_propagation`](Self::stop_immediate_propagation)
    /// was called.
    #[must_use]
    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    /// Whether [`prevent_default`](Self::prevent_default) was called.
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{MouseButtons, PointerInput};

    #[test]
    fn enter_and_leave_do_not_bubble() {
        assert!(!EventType::PointerEnter.bubbles());
        assert!(!EventType::PointerLeave.bubbles());
        assert!(EventType::PointerOver.bubbles());
        assert!(EventType::Wheel.bubbles());
    }

    #[test]
    fn immediate_stop_implies_stop() {
        let input = InputEvent::PointerDown(PointerInput::mouse(
            Vec2::ZERO,
            MouseButtons::PRIMARY,
        ));
        let mut event =
            SceneEvent::new(EventType::from_input(&input), input, Vec2::ZERO, Rc::from([]));
        assert_eq!(event.event_type(), EventType::PointerDown);
        assert_eq!(event.pointer_id(), Some(crate::input::MOUSE_POINTER_ID));
        event.stop_immediate_propagation();
        assert!(event.propagation_stopped());
        assert!(event.immediate_propagation_stopped());
        assert!(!event.default_prevented());
    }
}
