//! Classifies raw pointer and wheel events into active pointers and an
//! active control set.
//!
//! The `InputProcessor` owns all transient input state (tracked pointers,
//! the currently active movements, whether the surface is attached) and the
//! input-mapping table. It is the only thing that sits between raw
//! [`InputEvent`]s and the control orchestrator.

use glam::Vec2;

use super::event::{InputEvent, MouseButtons, PointerInput, PointerType, WheelInput};
use super::mapping::{ActiveControls, InputMappings, InputState};
use super::pointer::ActivePointer;
use super::surface::{InputSurface, TouchAction};
use super::wheel::wheel_delta;
use crate::input::MOUSE_POINTER_ID;
use crate::options::WheelOptions;

/// What changed while processing one event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputOutcome {
    /// The active control set changed; every pointer's `start_coords` was
    /// reset to its current coordinates.
    pub active_changed: bool,
    /// A pointer moved while at least one movement was active.
    pub pointers_moved: bool,
    /// Wheel delta and the synthetic pointer sample at the cursor.
    pub wheel: Option<(f32, ActivePointer)>,
    /// The host should suppress its default action (context menu).
    pub prevent_default: bool,
}

/// Converts raw pointer/wheel events into [`ActivePointer`]s and an
/// [`ActiveControls`] set.
///
/// # Usage
///
/// ```ignore
/// processor.attach(&mut surface);
/// let outcome = processor.handle_event(&event, &mut surface);
/// if outcome.active_changed {
///     // snapshot fragments entering processor.active()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct InputProcessor {
    /// Currently pressed pointers, in press order.
    pointers: Vec<ActivePointer>,
    /// Movement → rules table.
    mappings: InputMappings,
    /// Wheel conversion parameters.
    wheel: WheelOptions,
    /// Movements matching the live input.
    active: ActiveControls,
    /// Whether native listeners are installed.
    attached: bool,
    /// Whether move/up/cancel listeners are installed (a pointer is down).
    tracking: bool,
    /// Touch-action to restore on detach.
    saved_touch_action: Option<TouchAction>,
}

impl InputProcessor {
    /// Create a detached processor.
    #[must_use]
    pub fn new(mappings: InputMappings, wheel: WheelOptions) -> Self {
        Self {
            pointers: Vec::new(),
            mappings,
            wheel,
            active: ActiveControls::new(),
            attached: false,
            tracking: false,
            saved_touch_action: None,
        }
    }

    /// Currently tracked pointers.
    #[must_use]
    pub fn pointers(&self) -> &[ActivePointer] {
        &self.pointers
    }

    /// Movements matching the live input.
    #[must_use]
    pub fn active(&self) -> &ActiveControls {
        &self.active
    }

    /// Whether the processor is attached to a surface.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a gesture is in progress (move/up listeners installed).
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Read-only access to the mapping table.
    #[must_use]
    pub fn mappings(&self) -> &InputMappings {
        &self.mappings
    }

    /// Replace the mapping table. Takes effect at the next event.
    pub fn set_mappings(&mut self, mappings: InputMappings) {
        self.mappings = mappings;
    }

    /// Wheel parameters.
    #[must_use]
    pub fn wheel_options(&self) -> &WheelOptions {
        &self.wheel
    }

    /// Replace the wheel parameters.
    pub fn set_wheel_options(&mut self, wheel: WheelOptions) {
        self.wheel = wheel;
    }

    /// Start listening on `surface` and suppress its default touch
    /// gestures. Attaching twice is a no-op.
    pub fn attach(&mut self, surface: &mut dyn InputSurface) {
        if self.attached {
            return;
        }
        self.saved_touch_action = Some(surface.touch_action());
        surface.set_touch_action(TouchAction::None);
        self.attached = true;
        log::debug!("input processor attached");
    }

    /// Stop listening, restore the touch-action and abandon any gesture in
    /// progress (no end notification is produced).
    pub fn detach(&mut self, surface: &mut dyn InputSurface) {
        if !self.attached {
            return;
        }
        for pointer in &self.pointers {
            surface.release_pointer_capture(pointer.id);
        }
        if let Some(action) = self.saved_touch_action.take() {
            surface.set_touch_action(action);
        }
        self.pointers.clear();
        self.active.clear();
        self.tracking = false;
        self.attached = false;
        log::debug!("input processor detached");
    }

    /// Process one raw event.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        surface: &mut dyn InputSurface,
    ) -> InputOutcome {
        if !self.attached {
            return InputOutcome::default();
        }
        match event {
            InputEvent::PointerDown(input) => {
                self.handle_pointer_down(input, surface)
            }
            InputEvent::PointerMove(input) => {
                self.handle_pointer_move(input, surface)
            }
            InputEvent::PointerUp(input) | InputEvent::PointerCancel(input) => {
                self.handle_pointer_up(input, surface)
            }
            InputEvent::ContextMenu(_) => InputOutcome {
                prevent_default: self.tracking,
                ..InputOutcome::default()
            },
            InputEvent::Wheel(input) => self.handle_wheel(input, surface),
            InputEvent::Click(_) | InputEvent::DoubleClick(_) => {
                InputOutcome::default()
            }
        }
    }

    fn handle_pointer_down(
        &mut self,
        input: &PointerInput,
        surface: &mut dyn InputSurface,
    ) -> InputOutcome {
        let coords = surface.rect().to_ndc(input.client);
        if !self.pointers.iter().any(|p| p.id == input.pointer_id) {
            self.pointers.push(ActivePointer::at(
                input.pointer_id,
                input.pointer_type,
                coords,
            ));
            surface.set_pointer_capture(input.pointer_id);
            if !self.tracking {
                self.tracking = true;
                log::trace!("gesture tracking started");
            }
        }
        InputOutcome {
            active_changed: self.recompute(input),
            ..InputOutcome::default()
        }
    }

    fn handle_pointer_move(
        &mut self,
        input: &PointerInput,
        surface: &mut dyn InputSurface,
    ) -> InputOutcome {
        if !self.tracking
            || !self.pointers.iter().any(|p| p.id == input.pointer_id)
        {
            return InputOutcome::default();
        }
        let active_changed = self.recompute(input);
        let mut pointers_moved = false;
        if !self.active.is_empty() {
            let coords = surface.rect().to_ndc(input.client);
            for pointer in &mut self.pointers {
                if pointer.id == input.pointer_id {
                    pointer.delta = coords - pointer.coords;
                    pointer.coords = coords;
                } else {
                    pointer.delta = Vec2::ZERO;
                }
            }
            pointers_moved = true;
        }
        InputOutcome {
            active_changed,
            pointers_moved,
            ..InputOutcome::default()
        }
    }

    fn handle_pointer_up(
        &mut self,
        input: &PointerInput,
        surface: &mut dyn InputSurface,
    ) -> InputOutcome {
        let Some(index) =
            self.pointers.iter().position(|p| p.id == input.pointer_id)
        else {
            return InputOutcome::default();
        };
        surface.release_pointer_capture(input.pointer_id);
        let _ = self.pointers.remove(index);
        let released = PointerInput {
            buttons: if self.pointers.is_empty() {
                MouseButtons::empty()
            } else {
                input.buttons
            },
            ..*input
        };
        let active_changed = self.recompute(&released);
        if self.pointers.is_empty() {
            self.tracking = false;
            log::trace!("gesture tracking stopped");
        }
        InputOutcome {
            active_changed,
            ..InputOutcome::default()
        }
    }

    fn handle_wheel(
        &self,
        input: &WheelInput,
        surface: &dyn InputSurface,
    ) -> InputOutcome {
        let Some(delta) = wheel_delta(input.delta_y, &self.wheel) else {
            return InputOutcome::default();
        };
        let coords = surface.rect().to_ndc(input.client);
        InputOutcome {
            wheel: Some((
                delta,
                ActivePointer::at(MOUSE_POINTER_ID, PointerType::Mouse, coords),
            )),
            ..InputOutcome::default()
        }
    }

    /// Re-evaluate the mapping table. Returns whether the set changed.
    fn recompute(&mut self, input: &PointerInput) -> bool {
        let next = if self.pointers.is_empty() {
            ActiveControls::new()
        } else {
            let state = InputState {
                pointer_type: input.pointer_type,
                buttons: input.buttons,
                modifiers: input.modifiers,
                touch_count: self
                    .pointers
                    .iter()
                    .filter(|p| p.pointer_type == PointerType::Touch)
                    .count(),
            };
            self.mappings.resolve(&state)
        };
        if next == self.active {
            return false;
        }
        for pointer in &mut self.pointers {
            pointer.start_coords = pointer.coords;
        }
        log::debug!("active controls: {:?} -> {:?}", self.active, next);
        self.active = next;
        true
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new(InputMappings::default(), WheelOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{HeadlessSurface, Modifiers, Movement};

    fn attached() -> (InputProcessor, HeadlessSurface) {
        let mut surface = HeadlessSurface::new(200.0, 100.0);
        let mut processor = InputProcessor::default();
        processor.attach(&mut surface);
        (processor, surface)
    }

    #[test]
    fn attach_suppresses_touch_action_and_detach_restores() {
        let (mut processor, mut surface) = attached();
        assert_eq!(surface.touch_action, TouchAction::None);
        processor.detach(&mut surface);
        assert_eq!(surface.touch_action, TouchAction::Auto);
        assert!(!processor.is_attached());
    }

    #[test]
    fn detached_processor_ignores_input() {
        let mut surface = HeadlessSurface::new(200.0, 100.0);
        let mut processor = InputProcessor::default();
        let outcome = processor.handle_event(
            &InputEvent::PointerDown(PointerInput::mouse(
                Vec2::ZERO,
                MouseButtons::PRIMARY,
            )),
            &mut surface,
        );
        assert_eq!(outcome, InputOutcome::default());
        assert!(processor.pointers().is_empty());
    }

    #[test]
    fn press_drag_release_cycle() {
        let (mut processor, mut surface) = attached();
        let down = PointerInput::mouse(Vec2::new(100.0, 50.0), MouseButtons::PRIMARY);
        let outcome =
            processor.handle_event(&InputEvent::PointerDown(down), &mut surface);
        assert!(outcome.active_changed);
        assert!(processor.is_tracking());
        assert!(surface.captured.contains(&MOUSE_POINTER_ID));
        assert_eq!(processor.active(), &ActiveControls::from([Movement::Rotate]));

        let moved = PointerInput {
            client: Vec2::new(150.0, 50.0),
            ..down
        };
        let outcome =
            processor.handle_event(&InputEvent::PointerMove(moved), &mut surface);
        assert!(!outcome.active_changed);
        assert!(outcome.pointers_moved);
        let pointer = processor.pointers()[0];
        assert_eq!(pointer.delta, Vec2::new(0.5, 0.0));
        assert_eq!(pointer.start_coords, Vec2::ZERO);

        let up = PointerInput {
            buttons: MouseButtons::empty(),
            ..moved
        };
        let outcome =
            processor.handle_event(&InputEvent::PointerUp(up), &mut surface);
        assert!(outcome.active_changed);
        assert!(processor.active().is_empty());
        assert!(!processor.is_tracking());
        assert!(surface.captured.is_empty());
    }

    #[test]
    fn modifier_change_mid_drag_switches_movement_and_resets_start() {
        let (mut processor, mut surface) = attached();
        let down = PointerInput::mouse(Vec2::new(100.0, 50.0), MouseButtons::PRIMARY);
        let _ = processor.handle_event(&InputEvent::PointerDown(down), &mut surface);
        let _ = processor.handle_event(
            &InputEvent::PointerMove(PointerInput {
                client: Vec2::new(120.0, 50.0),
                ..down
            }),
            &mut surface,
        );
        let outcome = processor.handle_event(
            &InputEvent::PointerMove(
                PointerInput {
                    client: Vec2::new(140.0, 50.0),
                    ..down
                }
                .with_modifiers(Modifiers::SHIFT),
            ),
            &mut surface,
        );
        assert!(outcome.active_changed);
        assert_eq!(processor.active(), &ActiveControls::from([Movement::Truck]));
        // start reset happens before the move is applied
        let pointer = processor.pointers()[0];
        assert!((pointer.start_coords.x - 0.2).abs() < 1e-6);
        assert!((pointer.coords.x - 0.4).abs() < 1e-6);
    }

    #[test]
    fn hover_moves_without_press_are_ignored() {
        let (mut processor, mut surface) = attached();
        let outcome = processor.handle_event(
            &InputEvent::PointerMove(PointerInput::mouse(
                Vec2::new(10.0, 10.0),
                MouseButtons::empty(),
            )),
            &mut surface,
        );
        assert_eq!(outcome, InputOutcome::default());
    }

    #[test]
    fn second_finger_switches_to_two_finger_gesture() {
        let (mut processor, mut surface) = attached();
        let _ = processor.handle_event(
            &InputEvent::PointerDown(PointerInput::touch(7, Vec2::new(50.0, 50.0))),
            &mut surface,
        );
        assert_eq!(processor.active(), &ActiveControls::from([Movement::Rotate]));
        let outcome = processor.handle_event(
            &InputEvent::PointerDown(PointerInput::touch(8, Vec2::new(150.0, 50.0))),
            &mut surface,
        );
        assert!(outcome.active_changed);
        assert_eq!(
            processor.active(),
            &ActiveControls::from([Movement::Truck, Movement::Zoom])
        );
        let _ = processor.handle_event(
            &InputEvent::PointerCancel(PointerInput::touch(8, Vec2::new(150.0, 50.0))),
            &mut surface,
        );
        assert_eq!(processor.active(), &ActiveControls::from([Movement::Rotate]));
        assert_eq!(processor.pointers().len(), 1);
    }

    #[test]
    fn context_menu_suppressed_only_during_gesture() {
        let (mut processor, mut surface) = attached();
        let menu = InputEvent::ContextMenu(PointerInput::default());
        assert!(!processor.handle_event(&menu, &mut surface).prevent_default);
        let _ = processor.handle_event(
            &InputEvent::PointerDown(PointerInput::mouse(
                Vec2::ZERO,
                MouseButtons::SECONDARY,
            )),
            &mut surface,
        );
        assert!(processor.handle_event(&menu, &mut surface).prevent_default);
    }

    #[test]
    fn wheel_produces_pointer_sample_at_cursor() {
        let (mut processor, mut surface) = attached();
        let outcome = processor.handle_event(
            &InputEvent::Wheel(WheelInput {
                client: Vec2::new(200.0, 0.0),
                delta_y: 100.0,
                ..WheelInput::default()
            }),
            &mut surface,
        );
        let (delta, pointer) = outcome.wheel.unwrap();
        assert!(delta > 0.0);
        assert_eq!(pointer.coords, Vec2::new(1.0, 1.0));
    }
}
