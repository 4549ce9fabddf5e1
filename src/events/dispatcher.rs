use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use rustc_hash::FxHashSet;

use super::event::{EventType, Phase, SceneEvent};
use super::hover;
use super::registry::{ListenerEntry, ListenerId, ListenerOptions, Registry};
use crate::camera::Camera;
use crate::input::{InputEvent, PointerId, ViewportRect, MOUSE_POINTER_ID};
use crate::scene::{Intersection, ObjectId, SceneGraph};

// ---------------------------------------------------------------------------
// DispatcherHandle
// ---------------------------------------------------------------------------

/// Clonable access to a dispatcher's listeners and pointer captures.
///
/// Listeners capture a handle to register, remove or capture while an event
/// is being dispatched.
#[derive(Debug, Clone, Default)]
pub struct DispatcherHandle {
    registry: Rc<RefCell<Registry>>,
}

impl DispatcherHandle {
    /// Listen for `event_type` on `object`.
    pub fn add_event_listener(
        &self,
        object: ObjectId,
        event_type: EventType,
        listener: impl FnMut(&mut SceneEvent) + 'static,
        options: ListenerOptions,
    ) -> ListenerId {
        self.registry.borrow_mut().add(
            object,
            event_type,
            Rc::new(RefCell::new(listener)),
            options,
        )
    }

    /// Remove a listener of `object`. Returns whether it was registered.
    pub fn remove_event_listener(&self, object: ObjectId, id: ListenerId) -> bool {
        self.registry.borrow_mut().remove(object, id)
    }

    /// Listen for `event_type` whatever the target. Capturing global
    /// listeners run before any object, the others after all objects.
    pub fn add_global_event_listener(
        &self,
        event_type: EventType,
        listener: impl FnMut(&mut SceneEvent) + 'static,
        options: ListenerOptions,
    ) -> ListenerId {
        self.registry.borrow_mut().add_global(
            event_type,
            Rc::new(RefCell::new(listener)),
            options,
        )
    }

    /// Remove a global listener. Returns whether it was registered.
    pub fn remove_global_event_listener(&self, id: ListenerId) -> bool {
        self.registry.borrow_mut().remove_global(id)
    }

    /// Whether `object` has any listener.
    #[must_use]
    pub fn has_listeners(&self, object: ObjectId) -> bool {
        self.registry.borrow().has_listeners(object)
    }

    /// Route every event of `pointer_id` to `object` until released or
    /// the pointer goes up.
    pub fn set_pointer_capture(&self, object: ObjectId, pointer_id: PointerId) {
        let previous = self
            .registry
            .borrow_mut()
            .captures
            .insert(pointer_id, object);
        log::debug!(
            "pointer {pointer_id} captured by {object:?} (was {previous:?})"
        );
    }

    /// Release a capture held by `object`. Returns whether one was held.
    pub fn release_pointer_capture(&self, object: ObjectId, pointer_id: PointerId) -> bool {
        let mut registry = self.registry.borrow_mut();
        if registry.captures.get(&pointer_id) != Some(&object) {
            return false;
        }
        let _ = registry.captures.remove(&pointer_id);
        log::debug!("pointer {pointer_id} released by {object:?}");
        true
    }

    /// Whether `object` holds the capture of `pointer_id`.
    #[must_use]
    pub fn has_pointer_capture(&self, object: ObjectId, pointer_id: PointerId) -> bool {
        self.registry.borrow().captures.get(&pointer_id) == Some(&object)
    }
}

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

/// Last native pointer sample, replayed by [`EventDispatcher::update`].
#[derive(Debug, Clone, Copy)]
struct PointerSample {
    input: InputEvent,
    ndc: Vec2,
}

/// Objects already visited in one phase while dispatching one native
/// event over several hit objects.
#[derive(Debug, Default)]
struct Handled {
    capture: FxHashSet<ObjectId>,
    bubble: FxHashSet<ObjectId>,
}

/// Hit-tests native events against a scene and dispatches them to object
/// listeners through capture, target and bubble phases.
///
/// Hover events (over/out, enter/leave) are synthesized from pointer moves
/// and wheel events, and again from [`update`](Self::update) when the
/// camera or scene changes under a still pointer.
#[derive(Debug)]
pub struct EventDispatcher {
    handle: DispatcherHandle,
    last: Option<PointerSample>,
    intersections: Rc<[Intersection]>,
    targets: Vec<ObjectId>,
}

impl EventDispatcher {
    /// Dispatcher with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handle: DispatcherHandle::default(),
            last: None,
            intersections: Rc::from(Vec::new()),
            targets: Vec::new(),
        }
    }

    /// Shared handle for use inside listeners.
    #[must_use]
    pub fn handle(&self) -> DispatcherHandle {
        self.handle.clone()
    }

    /// See [`DispatcherHandle::add_event_listener`].
    pub fn add_event_listener(
        &self,
        object: ObjectId,
        event_type: EventType,
        listener: impl FnMut(&mut SceneEvent) + 'static,
        options: ListenerOptions,
    ) -> ListenerId {
        self.handle
            .add_event_listener(object, event_type, listener, options)
    }

    /// See [`DispatcherHandle::remove_event_listener`].
    pub fn remove_event_listener(&self, object: ObjectId, id: ListenerId) -> bool {
        self.handle.remove_event_listener(object, id)
    }

    /// See [`DispatcherHandle::add_global_event_listener`].
    pub fn add_global_event_listener(
        &self,
        event_type: EventType,
        listener: impl FnMut(&mut SceneEvent) + 'static,
        options: ListenerOptions,
    ) -> ListenerId {
        self.handle
            .add_global_event_listener(event_type, listener, options)
    }

    /// See [`DispatcherHandle::remove_global_event_listener`].
    pub fn remove_global_event_listener(&self, id: ListenerId) -> bool {
        self.handle.remove_global_event_listener(id)
    }

    /// See [`DispatcherHandle::set_pointer_capture`].
    pub fn set_pointer_capture(&self, object: ObjectId, pointer_id: PointerId) {
        self.handle.set_pointer_capture(object, pointer_id);
    }

    /// See [`DispatcherHandle::release_pointer_capture`].
    pub fn release_pointer_capture(&self, object: ObjectId, pointer_id: PointerId) -> bool {
        self.handle.release_pointer_capture(object, pointer_id)
    }

    /// See [`DispatcherHandle::has_pointer_capture`].
    #[must_use]
    pub fn has_pointer_capture(&self, object: ObjectId, pointer_id: PointerId) -> bool {
        self.handle.has_pointer_capture(object, pointer_id)
    }

    /// Visible hits of the last raycast, nearest first.
    #[must_use]
    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    /// Distinct objects of [`intersections`](Self::intersections) in
    /// first-hit order.
    #[must_use]
    pub fn target_objects(&self) -> &[ObjectId] {
        &self.targets
    }

    /// Hit-test and dispatch one native event. Returns whether a listener
    /// called [`SceneEvent::prevent_default`].
    pub fn handle_event<S: SceneGraph + ?Sized>(
        &mut self,
        input: &InputEvent,
        scene: &S,
        camera: &Camera,
        rect: ViewportRect,
    ) -> bool {
        let sample = PointerSample {
            input: *input,
            ndc: rect.to_ndc(input.client()),
        };
        self.raycast(scene, camera, sample.ndc);
        self.last = Some(sample);

        let event_type = EventType::from_input(input);
        if matches!(event_type, EventType::PointerMove | EventType::Wheel) {
            self.refresh_hover(scene, sample);
        }
        self.dispatch_native(scene, sample)
    }

    /// Re-run the last raycast and hover update without a new native
    /// event, e.g. after the camera or scene moved.
    pub fn update<S: SceneGraph + ?Sized>(&mut self, scene: &S, camera: &Camera) {
        let Some(sample) = self.last else {
            return;
        };
        self.raycast(scene, camera, sample.ndc);
        self.refresh_hover(scene, sample);
    }

    fn raycast<S: SceneGraph + ?Sized>(&mut self, scene: &S, camera: &Camera, ndc: Vec2) {
        let hits: Vec<Intersection> = scene
            .raycast(&camera.ray_from_ndc(ndc))
            .into_iter()
            .filter(|hit| scene.is_effectively_visible(hit.object))
            .collect();
        let mut targets = Vec::new();
        for hit in &hits {
            if !targets.contains(&hit.object) {
                targets.push(hit.object);
            }
        }
        self.intersections = hits.into();
        self.targets = targets;
    }

    fn refresh_hover<S: SceneGraph + ?Sized>(&self, scene: &S, sample: PointerSample) {
        let pointer_id = sample
            .input
            .pointer()
            .map_or(MOUSE_POINTER_ID, |p| p.pointer_id);
        let transitions = {
            let mut registry = self.handle.registry.borrow_mut();
            registry.prune();
            let captured = registry.captures.get(&pointer_id).copied();
            let over = hover::over_target(scene, &self.targets, captured, |o| {
                registry.is_registered(o)
            });
            let entered =
                hover::entered_objects(scene, &self.targets, |o| registry.is_registered(o));
            hover::apply(&mut registry, over, &entered)
        };
        if transitions.is_empty() {
            return;
        }
        log::trace!("hover transitions: {transitions:?}");
        for object in transitions.out {
            self.dispatch_synthetic(scene, EventType::PointerOut, object, sample);
        }
        for object in transitions.leave {
            self.dispatch_synthetic(scene, EventType::PointerLeave, object, sample);
        }
        if let Some(object) = transitions.over {
            self.dispatch_synthetic(scene, EventType::PointerOver, object, sample);
        }
        for object in transitions.enter {
            self.dispatch_synthetic(scene, EventType::PointerEnter, object, sample);
        }
    }

    fn dispatch_synthetic<S: SceneGraph + ?Sized>(
        &self,
        scene: &S,
        event_type: EventType,
        target: ObjectId,
        sample: PointerSample,
    ) {
        let mut event = SceneEvent::new(
            event_type,
            sample.input,
            sample.ndc,
            Rc::clone(&self.intersections),
        );
        self.fire_global(&mut event, true);
        if !event.propagation_stopped() {
            if event_type.bubbles() {
                self.dispatch_path(scene, target, &mut event, &mut Handled::default());
            } else {
                self.dispatch_target(target, &mut event);
            }
        }
        if !event.immediate_propagation_stopped() {
            self.fire_global(&mut event, false);
        }
    }

    fn dispatch_native<S: SceneGraph + ?Sized>(&self, scene: &S, sample: PointerSample) -> bool {
        let event_type = EventType::from_input(&sample.input);
        let pointer_id = sample.input.pointer().map(|p| p.pointer_id);
        let ends_capture =
            matches!(event_type, EventType::PointerUp | EventType::PointerCancel);
        let captured = {
            let mut registry = self.handle.registry.borrow_mut();
            registry.prune();
            pointer_id.and_then(|id| registry.captures.get(&id).copied())
        };

        let mut event = SceneEvent::new(
            event_type,
            sample.input,
            sample.ndc,
            Rc::clone(&self.intersections),
        );
        self.fire_global(&mut event, true);
        if !event.propagation_stopped() {
            match captured {
                Some(target) if ends_capture => {
                    self.dispatch_path(scene, target, &mut event, &mut Handled::default());
                }
                Some(target) => self.dispatch_target(target, &mut event),
                None => {
                    let mut handled = Handled::default();
                    for &target in &self.targets {
                        if event.propagation_stopped() {
                            break;
                        }
                        self.dispatch_path(scene, target, &mut event, &mut handled);
                    }
                }
            }
        }
        if ends_capture {
            if let Some(id) = pointer_id {
                if let Some(object) = self.handle.registry.borrow_mut().captures.remove(&id) {
                    log::debug!("pointer {id} capture by {object:?} ended");
                }
            }
        }
        if !event.immediate_propagation_stopped() {
            self.fire_global(&mut event, false);
        }
        event.default_prevented()
    }

    /// Capture phase from the root, the target itself, then the bubble
    /// phase back to the root. Objects in `handled` are skipped.
    fn dispatch_path<S: SceneGraph + ?Sized>(
        &self,
        scene: &S,
        target: ObjectId,
        event: &mut SceneEvent,
        handled: &mut Handled,
    ) {
        let chain = scene.ancestry(target);
        event.target = Some(target);

        for &ancestor in chain.iter().skip(1).rev() {
            if handled.capture.insert(ancestor) {
                self.fire(ancestor, Phase::Capturing, Some(true), event);
                if event.propagation_stopped() {
                    return;
                }
            }
        }

        if handled.capture.insert(target) {
            self.fire(target, Phase::AtTarget, Some(true), event);
        }
        if handled.bubble.insert(target) {
            self.fire(target, Phase::AtTarget, Some(false), event);
        }
        if event.propagation_stopped() || !event.bubbles() {
            return;
        }

        for &ancestor in chain.iter().skip(1) {
            if handled.bubble.insert(ancestor) {
                self.fire(ancestor, Phase::Bubbling, Some(false), event);
                if event.propagation_stopped() {
                    return;
                }
            }
        }
    }

    /// Listeners of `target` only, capturing ones first.
    fn dispatch_target(&self, target: ObjectId, event: &mut SceneEvent) {
        event.target = Some(target);
        self.fire(target, Phase::AtTarget, Some(true), event);
        self.fire(target, Phase::AtTarget, Some(false), event);
    }

    fn fire(
        &self,
        object: ObjectId,
        phase: Phase,
        capture: Option<bool>,
        event: &mut SceneEvent,
    ) {
        let listeners =
            self.handle
                .registry
                .borrow()
                .snapshot(object, event.event_type(), capture);
        event.phase = phase;
        event.current_target = Some(object);
        self.invoke_all(&listeners, event);
        event.current_target = None;
        event.phase = Phase::None;
    }

    fn fire_global(&self, event: &mut SceneEvent, capture: bool) {
        let listeners = self
            .handle
            .registry
            .borrow()
            .global_snapshot(event.event_type(), capture);
        event.phase = if capture {
            Phase::Capturing
        } else {
            Phase::Bubbling
        };
        event.current_target = None;
        self.invoke_all(&listeners, event);
        event.phase = Phase::None;
    }

    fn invoke_all(&self, listeners: &[ListenerEntry], event: &mut SceneEvent) {
        for listener in listeners {
            if event.immediate_propagation_stopped() {
                break;
            }
            if listener.is_dead() {
                continue;
            }
            if listener.once {
                self.handle.registry.borrow_mut().remove_any(listener.id);
            }
            match listener.callback.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(event),
                Err(_) => log::warn!(
                    "listener {:?} is already running; {} skipped",
                    listener.id,
                    event.event_type()
                ),
            }
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
