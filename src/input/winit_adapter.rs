//! Converts `winit` window events into [`InputEvent`]s.
//!
//! Positions are reported in physical pixels; size the
//! [`ViewportRect`](super::ViewportRect) of your surface the same way.

use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::ModifiersState;

use super::event::{
    InputEvent, Modifiers, MouseButtons, PointerId, PointerInput, PointerType,
    WheelInput,
};

/// Pixels per scrolled line for line-based wheel deltas.
const LINE_HEIGHT: f32 = 40.0;

/// Touch ids are shifted so they never collide with the mouse pointer id.
const TOUCH_ID_OFFSET: PointerId = 2;

/// Tracks cursor position, held buttons and modifiers across winit events.
#[derive(Debug, Clone, Default)]
pub struct WinitInputAdapter {
    cursor: Vec2,
    buttons: MouseButtons,
    modifiers: Modifiers,
}

impl WinitInputAdapter {
    /// Create an adapter with no buttons held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one window event. Returns `None` for events with no
    /// pointer/wheel meaning (modifier changes are absorbed).
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(self.cursor_moved(*position)),
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_button(*state, *button)
            }
            WindowEvent::MouseWheel { delta, .. } => Some(self.wheel(delta)),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.set_modifiers(modifiers.state());
                None
            }
            WindowEvent::Touch(touch) => {
                Some(self.handle_touch(touch.id, touch.phase, touch.location))
            }
            _ => None,
        }
    }

    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> InputEvent {
        self.cursor = Vec2::new(position.x as f32, position.y as f32);
        InputEvent::PointerMove(self.mouse_input())
    }

    fn wheel(&self, delta: &MouseScrollDelta) -> InputEvent {
        let delta_y = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
        };
        InputEvent::Wheel(WheelInput {
            client: self.cursor,
            delta_x: 0.0,
            delta_y,
            modifiers: self.modifiers,
        })
    }

    fn set_modifiers(&mut self, state: ModifiersState) {
        let mut next = Modifiers::empty();
        next.set(Modifiers::CTRL, state.control_key());
        next.set(Modifiers::SHIFT, state.shift_key());
        next.set(Modifiers::ALT, state.alt_key());
        next.set(Modifiers::META, state.super_key());
        self.modifiers = next;
    }

    fn handle_button(
        &mut self,
        state: ElementState,
        button: MouseButton,
    ) -> Option<InputEvent> {
        let bit = match button {
            MouseButton::Left => MouseButtons::PRIMARY,
            MouseButton::Right => MouseButtons::SECONDARY,
            MouseButton::Middle => MouseButtons::AUXILIARY,
            MouseButton::Back => MouseButtons::BACK,
            MouseButton::Forward => MouseButtons::FORWARD,
            MouseButton::Other(_) => return None,
        };
        let was_empty = self.buttons.is_empty();
        self.buttons.set(bit, state == ElementState::Pressed);
        let input = self.mouse_input();
        // Chorded presses/releases surface as moves, like DOM pointer events.
        Some(match (state, was_empty, self.buttons.is_empty()) {
            (ElementState::Pressed, true, _) => InputEvent::PointerDown(input),
            (ElementState::Released, _, true) => InputEvent::PointerUp(input),
            _ => InputEvent::PointerMove(input),
        })
    }

    fn handle_touch(
        &self,
        id: u64,
        phase: TouchPhase,
        location: PhysicalPosition<f64>,
    ) -> InputEvent {
        let input = PointerInput {
            pointer_id: (id as PointerId).wrapping_add(TOUCH_ID_OFFSET),
            pointer_type: PointerType::Touch,
            client: Vec2::new(location.x as f32, location.y as f32),
            buttons: MouseButtons::PRIMARY,
            modifiers: self.modifiers,
        };
        match phase {
            TouchPhase::Started => InputEvent::PointerDown(input),
            TouchPhase::Moved => InputEvent::PointerMove(input),
            TouchPhase::Ended => InputEvent::PointerUp(PointerInput {
                buttons: MouseButtons::empty(),
                ..input
            }),
            TouchPhase::Cancelled => InputEvent::PointerCancel(input),
        }
    }

    fn mouse_input(&self) -> PointerInput {
        PointerInput {
            client: self.cursor,
            buttons: self.buttons,
            modifiers: self.modifiers,
            ..PointerInput::default()
        }
    }
}

#[cfg(all(test, feature = "winit"))]
mod tests {
    use super::*;
    use crate::input::MOUSE_POINTER_ID;

    fn buttons_of(event: &InputEvent) -> MouseButtons {
        event.pointer().map_or(MouseButtons::empty(), |p| p.buttons)
    }

    #[test]
    fn chorded_buttons_surface_as_moves() {
        let mut adapter = WinitInputAdapter::new();
        let _ = adapter.cursor_moved(PhysicalPosition::new(10.0, 20.0));

        let down = adapter.handle_button(ElementState::Pressed, MouseButton::Left);
        assert!(matches!(down, Some(InputEvent::PointerDown(_))));
        let chord = adapter.handle_button(ElementState::Pressed, MouseButton::Right);
        assert!(matches!(chord, Some(InputEvent::PointerMove(_))));
        let chord = chord.as_ref().map(buttons_of);
        assert_eq!(chord, Some(MouseButtons::PRIMARY | MouseButtons::SECONDARY));

        let partial = adapter.handle_button(ElementState::Released, MouseButton::Left);
        assert!(matches!(partial, Some(InputEvent::PointerMove(_))));
        let up = adapter.handle_button(ElementState::Released, MouseButton::Right);
        match up {
            Some(InputEvent::PointerUp(input)) => {
                assert!(input.buttons.is_empty());
                assert_eq!(input.client, Vec2::new(10.0, 20.0));
            }
            other => panic!("expected pointer up, got {other:?}"),
        }

        assert!(adapter.handle_button(ElementState::Pressed, MouseButton::Other(9)).is_none());
    }

    #[test]
    fn wheel_lines_scale_and_flip_sign() {
        let adapter = WinitInputAdapter::new();
        match adapter.wheel(&MouseScrollDelta::LineDelta(0.0, 1.0)) {
            InputEvent::Wheel(wheel) => assert_eq!(wheel.delta_y, -LINE_HEIGHT),
            other => panic!("expected wheel, got {other:?}"),
        }
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -12.0));
        match adapter.wheel(&pixels) {
            InputEvent::Wheel(wheel) => assert_eq!(wheel.delta_y, 12.0),
            other => panic!("expected wheel, got {other:?}"),
        }
    }

    #[test]
    fn touch_ids_do_not_collide_with_the_mouse() {
        let adapter = WinitInputAdapter::new();
        let start = adapter.handle_touch(0, TouchPhase::Started, PhysicalPosition::new(5.0, 6.0));
        match start {
            InputEvent::PointerDown(input) => {
                assert_eq!(input.pointer_id, TOUCH_ID_OFFSET);
                assert_ne!(input.pointer_id, MOUSE_POINTER_ID);
                assert_eq!(input.pointer_type, PointerType::Touch);
                assert_eq!(input.buttons, MouseButtons::PRIMARY);
            }
            other => panic!("expected pointer down, got {other:?}"),
        }
        let end = adapter.handle_touch(0, TouchPhase::Ended, PhysicalPosition::new(5.0, 6.0));
        match end {
            InputEvent::PointerUp(input) => assert!(input.buttons.is_empty()),
            other => panic!("expected pointer up, got {other:?}"),
        }
        let cancel = adapter.handle_touch(3, TouchPhase::Cancelled, PhysicalPosition::new(0.0, 0.0));
        assert!(matches!(cancel, InputEvent::PointerCancel(_)));
    }

    #[test]
    fn modifier_changes_are_absorbed_and_applied() {
        let mut adapter = WinitInputAdapter::new();
        let changed = WindowEvent::ModifiersChanged((ModifiersState::SHIFT | ModifiersState::CONTROL).into());
        assert!(adapter.handle_window_event(&changed).is_none());

        let moved = adapter.cursor_moved(PhysicalPosition::new(1.0, 1.0));
        let modifiers = moved.pointer().map(|p| p.modifiers);
        assert_eq!(modifiers, Some(Modifiers::SHIFT | Modifiers::CTRL));
        match adapter.wheel(&MouseScrollDelta::LineDelta(0.0, -1.0)) {
            InputEvent::Wheel(wheel) => assert_eq!(wheel.modifiers, Modifiers::SHIFT | Modifiers::CTRL),
            other => panic!("expected wheel, got {other:?}"),
        }

        adapter.set_modifiers(ModifiersState::empty());
        let moved = adapter.cursor_moved(PhysicalPosition::new(2.0, 1.0));
        assert_eq!(moved.pointer().map(|p| p.modifiers), Some(Modifiers::empty()));
    }
}
