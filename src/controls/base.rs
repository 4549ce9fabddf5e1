//! The control orchestrator.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::slice;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::fragment::Fragment;
use crate::camera::{Camera, SharedCamera};
use crate::input::{
    ActiveControls, ActivePointer, InputEvent, InputMappings, InputOutcome,
    InputProcessor, InputSurface, Movement,
};
use crate::options::{ControlOptions, WheelOptions};

// ---------------------------------------------------------------------------
// Control events
// ---------------------------------------------------------------------------

/// Notification kinds emitted by [`CameraControls`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlEventKind {
    /// A gesture began (or a discrete mutation is about to happen).
    Start,
    /// Camera or target changed.
    Change,
    /// A gesture ended (or a discrete mutation finished).
    End,
}

/// Payload delivered to control listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlEvent {
    /// What happened.
    pub kind: ControlEventKind,
    /// Camera position after the event.
    pub position: Vec3,
    /// Target after the event.
    pub target: Vec3,
    /// Camera zoom after the event.
    pub zoom: f32,
}

/// Handle returned by [`CameraControls::add_event_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlListenerId(u64);

type ControlListener = Box<dyn FnMut(&ControlEvent)>;

// ---------------------------------------------------------------------------
// CameraControls
// ---------------------------------------------------------------------------

/// Owns a target point, the fragments and the input classifier, and drives
/// a caller-owned camera.
///
/// After every mutation the camera is re-aimed at the target and its
/// projection refreshed, so fragments never have to.
pub struct CameraControls {
    camera: SharedCamera,
    target: Vec3,
    fragments: BTreeMap<Movement, Fragment>,
    processor: InputProcessor,
    enabled: bool,
    /// Movements active as of the last classifier pass.
    active: ActiveControls,
    listeners: Vec<(ControlListenerId, ControlEventKind, ControlListener)>,
    next_listener_id: u64,
}

impl fmt::Debug for CameraControls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraControls")
            .field("target", &self.target)
            .field("fragments", &self.fragments)
            .field("enabled", &self.enabled)
            .field("active", &self.active)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl CameraControls {
    /// Controls with no fragments and the default input mappings.
    #[must_use]
    pub fn new(camera: SharedCamera, target: Vec3) -> Self {
        Self {
            camera,
            target,
            fragments: BTreeMap::new(),
            processor: InputProcessor::default(),
            enabled: true,
            active: ActiveControls::new(),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Builder-style fragment registration.
    #[must_use]
    pub fn with_fragment(mut self, movement: Movement, fragment: Fragment) -> Self {
        let _ = self.set_fragment(movement, fragment);
        self
    }

    // -- Fragments --

    /// Install `fragment` for `movement`, returning the one it replaces.
    pub fn set_fragment(
        &mut self,
        movement: Movement,
        mut fragment: Fragment,
    ) -> Option<Fragment> {
        if let Ok(camera) = self.camera.try_borrow() {
            fragment.update_start_values(&[], &camera, self.target);
        }
        self.fragments.insert(movement, fragment)
    }

    /// Remove the fragment of `movement`.
    pub fn remove_fragment(&mut self, movement: Movement) -> Option<Fragment> {
        self.fragments.remove(&movement)
    }

    /// Fragment of `movement`.
    #[must_use]
    pub fn fragment(&self, movement: Movement) -> Option<&Fragment> {
        self.fragments.get(&movement)
    }

    /// Mutable fragment of `movement` (e.g. to update its options).
    pub fn fragment_mut(&mut self, movement: Movement) -> Option<&mut Fragment> {
        self.fragments.get_mut(&movement)
    }

    // -- Camera / target --

    /// The controlled camera.
    #[must_use]
    pub fn camera(&self) -> SharedCamera {
        Rc::clone(&self.camera)
    }

    /// Swap the controlled camera. Fragments are kept and re-snapshotted.
    pub fn set_camera(&mut self, camera: SharedCamera) {
        self.camera = camera;
        if let Ok(mut camera) = self.camera.try_borrow_mut() {
            finish_mutation(&mut camera, self.target);
        }
        self.snapshot_all();
        self.emit_discrete();
    }

    /// Current target point.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Move the target. With `keep_relative` the camera moves along so the
    /// camera–target offset is preserved; otherwise the camera stays and
    /// re-aims.
    pub fn set_target(&mut self, target: Vec3, keep_relative: bool) {
        {
            let Ok(mut camera) = self.camera.try_borrow_mut() else {
                log::warn!("camera is borrowed; set_target ignored");
                return;
            };
            if keep_relative {
                let offset = camera.position - self.target;
                camera.position = target + offset;
            }
            self.target = target;
            finish_mutation(&mut camera, target);
        }
        self.snapshot_active();
        self.emit_discrete();
    }

    /// Camera–target distance.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.camera
            .try_borrow()
            .map_or(0.0, |camera| camera.position.distance(self.target))
    }

    /// Move the camera along its current offset to `distance` from the
    /// target.
    pub fn set_distance(&mut self, distance: f32) {
        {
            let Ok(mut camera) = self.camera.try_borrow_mut() else {
                log::warn!("camera is borrowed; set_distance ignored");
                return;
            };
            let direction = (camera.position - self.target)
                .try_normalize()
                .unwrap_or_else(|| -camera.forward());
            camera.position = self.target + direction * distance.max(0.0);
            finish_mutation(&mut camera, self.target);
        }
        self.snapshot_active();
        self.emit_discrete();
    }

    /// Camera zoom.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.camera.try_borrow().map_or(1.0, |camera| camera.zoom)
    }

    /// Set the camera zoom and refresh its projection.
    pub fn set_zoom(&mut self, zoom: f32) {
        {
            let Ok(mut camera) = self.camera.try_borrow_mut() else {
                log::warn!("camera is borrowed; set_zoom ignored");
                return;
            };
            camera.zoom = zoom;
            finish_mutation(&mut camera, self.target);
        }
        self.snapshot_active();
        self.emit_discrete();
    }

    // -- Enable / attach --

    /// Whether input is forwarded to fragments.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Suppress or resume input forwarding. Listeners stay installed; a
    /// gesture in progress ends (disable) or starts (enable).
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.active = self.processor.active().clone();
            self.snapshot_active();
            if !self.active.is_empty() {
                self.emit(ControlEventKind::Start);
            }
        } else if !self.active.is_empty() {
            self.active.clear();
            self.emit(ControlEventKind::End);
        }
    }

    /// Start listening on `surface` and synchronize fragments and camera.
    pub fn attach(&mut self, surface: &mut dyn InputSurface) {
        self.processor.attach(surface);
        if let Ok(mut camera) = self.camera.try_borrow_mut() {
            finish_mutation(&mut camera, self.target);
        }
        self.snapshot_all();
        log::debug!(
            "camera controls attached ({} fragments)",
            self.fragments.len()
        );
    }

    /// Stop listening. A gesture in progress is abandoned without an end
    /// event.
    pub fn detach(&mut self, surface: &mut dyn InputSurface) {
        self.processor.detach(surface);
        self.active.clear();
        log::debug!("camera controls detached");
    }

    /// Whether attached to a surface.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.processor.is_attached()
    }

    // -- Input configuration --

    /// Movements currently driven by input.
    #[must_use]
    pub fn active_controls(&self) -> &ActiveControls {
        &self.active
    }

    /// Currently pressed pointers.
    #[must_use]
    pub fn pointers(&self) -> &[ActivePointer] {
        self.processor.pointers()
    }

    /// Movement → input rules.
    #[must_use]
    pub fn input_mappings(&self) -> &InputMappings {
        self.processor.mappings()
    }

    /// Replace the input rules. Takes effect at the next event.
    pub fn set_input_mappings(&mut self, mappings: InputMappings) {
        self.processor.set_mappings(mappings);
    }

    /// Wheel parameters.
    #[must_use]
    pub fn wheel_options(&self) -> &WheelOptions {
        self.processor.wheel_options()
    }

    /// Replace the wheel parameters.
    pub fn set_wheel_options(&mut self, wheel: WheelOptions) {
        self.processor.set_wheel_options(wheel);
    }

    /// Apply a full option set: enabled flag, mappings, wheel, and each
    /// installed fragment's section. Fragment transient state is kept.
    pub fn apply_options(&mut self, options: &ControlOptions) {
        self.set_input_mappings(options.input_mappings.clone());
        self.set_wheel_options(options.wheel.clone());
        for fragment in self.fragments.values_mut() {
            fragment.apply_options(options);
        }
        self.set_enabled(options.enabled);
    }

    /// Current configuration gathered from the installed fragments.
    /// Sections without a fragment hold defaults.
    #[must_use]
    pub fn options(&self) -> ControlOptions {
        let mut options = ControlOptions {
            enabled: self.enabled,
            wheel: self.processor.wheel_options().clone(),
            input_mappings: self.processor.mappings().clone(),
            ..ControlOptions::default()
        };
        for fragment in self.fragments.values() {
            match fragment {
                Fragment::FixedUpRotation(f) => options.rotate = f.options().clone(),
                Fragment::FreeUpRotation(f) => options.rotate = f.options().clone(),
                Fragment::Truck(f) => options.truck = f.options().clone(),
                Fragment::ZoomDolly(f) => options.zoom = f.options().clone(),
            }
        }
        options
    }

    // -- Listeners --

    /// Register a listener for `kind`.
    pub fn add_event_listener(
        &mut self,
        kind: ControlEventKind,
        listener: impl FnMut(&ControlEvent) + 'static,
    ) -> ControlListenerId {
        let id = ControlListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn remove_event_listener(&mut self, id: ControlListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _, _)| *listener_id != id);
        self.listeners.len() != before
    }

    // -- Input --

    /// Process one raw event. The returned outcome tells the host whether
    /// to suppress the platform default action.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        surface: &mut dyn InputSurface,
    ) -> InputOutcome {
        let outcome = self.processor.handle_event(event, surface);
        if !self.enabled {
            return outcome;
        }
        if outcome.active_changed {
            self.on_active_changed();
        }
        if outcome.pointers_moved {
            self.on_pointers_moved();
        }
        if let Some((delta, pointer)) = outcome.wheel {
            self.on_wheel(delta, &pointer);
        }
        outcome
    }

    /// Re-aim the camera at the target and refresh its projection.
    pub fn update(&mut self) {
        if let Ok(mut camera) = self.camera.try_borrow_mut() {
            finish_mutation(&mut camera, self.target);
        }
    }

    fn on_active_changed(&mut self) {
        let next = self.processor.active().clone();
        let was_idle = self.active.is_empty();
        let entering: Vec<Movement> =
            next.difference(&self.active).copied().collect();
        self.active = next;

        if let Ok(camera) = self.camera.try_borrow() {
            for movement in entering {
                if let Some(fragment) = self.fragments.get_mut(&movement) {
                    fragment.update_start_values(
                        self.processor.pointers(),
                        &camera,
                        self.target,
                    );
                }
            }
        }

        match (was_idle, self.active.is_empty()) {
            (true, false) => self.emit(ControlEventKind::Start),
            (false, true) => self.emit(ControlEventKind::End),
            _ => {}
        }
    }

    fn on_pointers_moved(&mut self) {
        if self.active.is_empty() {
            return;
        }
        {
            let Ok(mut camera) = self.camera.try_borrow_mut() else {
                log::warn!("camera is borrowed; pointer input dropped");
                return;
            };
            let pointers = self.processor.pointers();
            for movement in &self.active {
                if let Some(handler) = self
                    .fragments
                    .get_mut(movement)
                    .and_then(Fragment::as_pointer_handler)
                {
                    handler.handle_pointer_input(
                        pointers,
                        &mut camera,
                        &mut self.target,
                    );
                }
            }
            finish_mutation(&mut camera, self.target);
        }
        self.emit(ControlEventKind::Change);
    }

    fn on_wheel(&mut self, delta: f32, pointer: &ActivePointer) {
        let Some(movement) = self.processor.wheel_options().movement else {
            return;
        };
        if !self
            .fragments
            .get(&movement)
            .is_some_and(Fragment::supports_wheel_input)
        {
            log::trace!("no wheel-capable fragment for {movement:?}");
            return;
        }
        let standalone = self.active.is_empty();
        if standalone {
            self.emit(ControlEventKind::Start);
        }
        if let Ok(mut camera) = self.camera.try_borrow_mut() {
            if let Some(fragment) = self.fragments.get_mut(&movement) {
                fragment.update_start_values(
                    slice::from_ref(pointer),
                    &camera,
                    self.target,
                );
                if let Some(handler) = fragment.as_wheel_handler() {
                    handler.handle_wheel_input(
                        delta,
                        pointer,
                        &mut camera,
                        &mut self.target,
                    );
                }
                if self.active.contains(&movement) {
                    fragment.update_start_values(
                        self.processor.pointers(),
                        &camera,
                        self.target,
                    );
                }
            }
            finish_mutation(&mut camera, self.target);
        } else {
            log::warn!("camera is borrowed; wheel input dropped");
        }
        self.emit(ControlEventKind::Change);
        if standalone {
            self.emit(ControlEventKind::End);
        }
    }

    /// Re-snapshot the fragments of the active movements.
    fn snapshot_active(&mut self) {
        let Ok(camera) = self.camera.try_borrow() else {
            return;
        };
        for movement in &self.active {
            if let Some(fragment) = self.fragments.get_mut(movement) {
                fragment.update_start_values(
                    self.processor.pointers(),
                    &camera,
                    self.target,
                );
            }
        }
    }

    /// Re-snapshot every fragment (initialization, camera swap).
    fn snapshot_all(&mut self) {
        let Ok(camera) = self.camera.try_borrow() else {
            return;
        };
        for (movement, fragment) in &mut self.fragments {
            let pointers = if self.active.contains(movement) {
                self.processor.pointers()
            } else {
                &[]
            };
            fragment.update_start_values(pointers, &camera, self.target);
        }
    }

    fn emit_discrete(&mut self) {
        self.emit(ControlEventKind::Start);
        self.emit(ControlEventKind::Change);
        self.emit(ControlEventKind::End);
    }

    fn emit(&mut self, kind: ControlEventKind) {
        let event = {
            let Ok(camera) = self.camera.try_borrow() else {
                log::warn!("camera is borrowed; {kind:?} event dropped");
                return;
            };
            ControlEvent {
                kind,
                position: camera.position,
                target: self.target,
                zoom: camera.zoom,
            }
        };
        for (_, listener_kind, listener) in &mut self.listeners {
            if *listener_kind == kind {
                listener(&event);
            }
        }
    }
}

/// Look at the target and refresh the projection.
fn finish_mutation(camera: &mut Camera, target: Vec3) {
    camera.look_at(target);
    camera.update_projection_matrix();
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use glam::Vec2;

    use super::*;
    use crate::camera;
    use crate::controls::rotate::{FixedUpRotation, RotationMode};
    use crate::controls::truck::Truck;
    use crate::controls::zoom::ZoomDolly;
    use crate::input::{
        HeadlessSurface, MouseButtons, PointerInput, WheelInput,
    };
    use crate::options::{RotateOptions, TruckOptions, ZoomKind, ZoomOptions};

    fn controls_at(position: Vec3) -> (CameraControls, HeadlessSurface) {
        let camera = camera::shared(
            Camera::perspective(60.0, 1.0, 0.1, 1000.0).with_position(position),
        );
        let mut controls = CameraControls::new(camera, Vec3::ZERO)
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
                Fragment::ZoomDolly(ZoomDolly::new(ZoomOptions::default())),
            );
        let mut surface = HeadlessSurface::new(200.0, 200.0);
        controls.attach(&mut surface);
        (controls, surface)
    }

    fn record(controls: &mut CameraControls) -> Rc<RefCell<Vec<ControlEventKind>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [
            ControlEventKind::Start,
            ControlEventKind::Change,
            ControlEventKind::End,
        ] {
            let log = Rc::clone(&log);
            let _ = controls.add_event_listener(kind, move |event| {
                log.borrow_mut().push(event.kind);
            });
        }
        log
    }

    #[test]
    fn set_target_keeping_relative_offset_preserves_distance() {
        let (mut controls, _) = controls_at(Vec3::new(3.0, 4.0, 12.0));
        assert!((controls.distance() - 13.0).abs() < 1e-5);
        controls.set_target(Vec3::new(-3.0, -4.0, -12.0), true);
        assert!((controls.distance() - 13.0).abs() < 1e-5);
        assert!(controls.camera().borrow().position.length() < 1e-5);
    }

    #[test]
    fn set_target_without_offset_re_aims() {
        let (mut controls, _) = controls_at(Vec3::new(3.0, 4.0, 12.0));
        controls.set_target(Vec3::new(-3.0, -4.0, -12.0), false);
        assert!((controls.distance() - 26.0).abs() < 1e-4);
        let camera = controls.camera();
        let forward = camera.borrow().forward();
        let expected = Vec3::new(-6.0, -8.0, -24.0).normalize();
        assert!(forward.distance(expected) < 1e-5);
    }

    #[test]
    fn discrete_mutations_fire_start_change_end() {
        let (mut controls, _) = controls_at(Vec3::new(0.0, 0.0, 10.0));
        let log = record(&mut controls);
        controls.set_distance(5.0);
        controls.set_zoom(2.0);
        assert_eq!(log.borrow().len(), 6);
        assert_eq!(
            log.borrow()[..3],
            [
                ControlEventKind::Start,
                ControlEventKind::Change,
                ControlEventKind::End
            ]
        );
        assert!((controls.distance() - 5.0).abs() < 1e-5);
        assert_eq!(controls.zoom(), 2.0);
    }

    #[test]
    fn drag_gesture_lifecycle() {
        let (mut controls, mut surface) = controls_at(Vec3::new(0.0, 0.0, 10.0));
        let log = record(&mut controls);
        let down = PointerInput::mouse(Vec2::new(100.0, 100.0), MouseButtons::PRIMARY);
        let _ = controls.handle_event(&InputEvent::PointerDown(down), &mut surface);
        assert_eq!(controls.active_controls(), &ActiveControls::from([Movement::Rotate]));
        let _ = controls.handle_event(
            &InputEvent::PointerMove(PointerInput {
                client: Vec2::new(140.0, 100.0),
                ..down
            }),
            &mut surface,
        );
        let _ = controls.handle_event(
            &InputEvent::PointerUp(PointerInput {
                client: Vec2::new(140.0, 100.0),
                buttons: MouseButtons::empty(),
                ..down
            }),
            &mut surface,
        );
        assert_eq!(
            *log.borrow(),
            vec![
                ControlEventKind::Start,
                ControlEventKind::Change,
                ControlEventKind::End
            ]
        );
        let camera = controls.camera();
        let camera = camera.borrow();
        assert!(camera.position.x < 0.0);
        assert!((camera.position.length() - 10.0).abs() < 1e-4);
        // look-at invariant
        assert!(camera.forward().distance(-camera.position.normalize()) < 1e-5);
    }

    #[test]
    fn wheel_is_a_full_cycle_and_inverse_steps_cancel() {
        let (mut controls, mut surface) = controls_at(Vec3::new(0.0, 0.0, 10.0));
        let log = record(&mut controls);
        let wheel = |dy: f32| {
            InputEvent::Wheel(WheelInput {
                client: Vec2::new(100.0, 100.0),
                delta_y: dy,
                ..WheelInput::default()
            })
        };
        let _ = controls.handle_event(&wheel(100.0), &mut surface);
        assert!(controls.distance() > 10.0);
        let _ = controls.handle_event(&wheel(-100.0), &mut surface);
        assert!((controls.distance() - 10.0).abs() < 1e-4);
        assert_eq!(log.borrow().len(), 6);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let (mut controls, mut surface) = controls_at(Vec3::new(0.0, 0.0, 10.0));
        controls.set_enabled(false);
        let _ = controls.handle_event(
            &InputEvent::Wheel(WheelInput {
                delta_y: 100.0,
                ..WheelInput::default()
            }),
            &mut surface,
        );
        assert!((controls.distance() - 10.0).abs() < 1e-6);
        assert!(controls.is_attached());
    }

    #[test]
    fn disabling_mid_gesture_ends_it() {
        let (mut controls, mut surface) = controls_at(Vec3::new(0.0, 0.0, 10.0));
        let log = record(&mut controls);
        let _ = controls.handle_event(
            &InputEvent::PointerDown(PointerInput::mouse(
                Vec2::new(100.0, 100.0),
                MouseButtons::PRIMARY,
            )),
            &mut surface,
        );
        controls.set_enabled(false);
        assert_eq!(
            *log.borrow(),
            vec![ControlEventKind::Start, ControlEventKind::End]
        );
        assert!(controls.active_controls().is_empty());
    }

    #[test]
    fn removed_listener_is_not_called() {
        let (mut controls, _) = controls_at(Vec3::new(0.0, 0.0, 10.0));
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let id = controls.add_event_listener(ControlEventKind::Change, move |_| {
            *counter.borrow_mut() += 1;
        });
        controls.set_zoom(1.5);
        assert!(controls.remove_event_listener(id));
        assert!(!controls.remove_event_listener(id));
        controls.set_zoom(2.0);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn apply_options_updates_fragments_and_round_trips() {
        let (mut controls, _) = controls_at(Vec3::new(0.0, 0.0, 10.0));
        let mut options = ControlOptions::default();
        options.zoom.kind = ZoomKind::Zoom;
        options.zoom.max_zoom = 8.0;
        options.rotate.max_vertical_angle = Some(0.5);
        controls.apply_options(&options);
        assert_eq!(controls.options(), options);
    }

    #[test]
    fn swapping_camera_keeps_fragments() {
        let (mut controls, _) = controls_at(Vec3::new(0.0, 0.0, 10.0));
        let other = camera::shared(
            Camera::orthographic(-1.0, 1.0, 1.0, -1.0, 0.1, 100.0)
                .with_position(Vec3::new(5.0, 0.0, 0.0)),
        );
        controls.set_camera(Rc::clone(&other));
        assert!(Rc::ptr_eq(&controls.camera(), &other));
        assert!(controls.fragment(Movement::Rotate).is_some());
        assert!(other.borrow().forward().distance(Vec3::NEG_X) < 1e-5);
    }
}
