//! Listener storage shared between the dispatcher and its handles.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::abort::AbortSignal;
use super::event::{EventType, SceneEvent};
use crate::input::PointerId;
use crate::scene::ObjectId;

/// Boxed listener callback.
pub type Listener = dyn FnMut(&mut SceneEvent);

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Registration flags, as in `addEventListener`.
#[derive(Debug, Clone, Default)]
pub struct ListenerOptions {
    /// Run during the capturing phase instead of the bubbling phase.
    pub capture: bool,
    /// Remove after the first invocation.
    pub once: bool,
    /// Remove once the signal aborts.
    pub signal: Option<AbortSignal>,
}

impl ListenerOptions {
    /// Capturing listener.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            capture: true,
            ..Self::default()
        }
    }

    /// One-shot listener.
    #[must_use]
    pub fn once() -> Self {
        Self {
            once: true,
            ..Self::default()
        }
    }

    /// Builder-style signal setter.
    #[must_use]
    pub fn with_signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// One registered listener. Cloning shares the callback and the removed
/// flag, which is how dispatch snapshots observe removals.
#[derive(Clone)]
pub(crate) struct ListenerEntry {
    pub(crate) id: ListenerId,
    pub(crate) event_type: EventType,
    pub(crate) capture: bool,
    pub(crate) once: bool,
    signal: Option<AbortSignal>,
    removed: Rc<Cell<bool>>,
    pub(crate) callback: Rc<RefCell<Listener>>,
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .field("capture", &self.capture)
            .field("once", &self.once)
            .field("removed", &self.removed.get())
            .finish_non_exhaustive()
    }
}

impl ListenerEntry {
    /// Removed explicitly, consumed as `once`, or aborted.
    pub(crate) fn is_dead(&self) -> bool {
        self.removed.get() || self.signal.as_ref().is_some_and(AbortSignal::aborted)
    }

    fn kill(&self) {
        self.removed.set(true);
    }
}

/// Listeners and hover flags of one registered object.
#[derive(Debug, Default)]
pub(crate) struct ObjectEntry {
    pub(crate) listeners: Vec<ListenerEntry>,
    /// Stamp of the enter transition while entered; orders leave events.
    pub(crate) entered: Option<u64>,
    pub(crate) over: bool,
}

impl ObjectEntry {
    /// No listeners and no hover state left to unwind.
    pub(crate) fn is_unused(&self) -> bool {
        self.listeners.is_empty() && self.entered.is_none() && !self.over
    }
}

/// Per-object and global listeners plus the pointer capture map.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    pub(crate) objects: FxHashMap<ObjectId, ObjectEntry>,
    pub(crate) global: Vec<ListenerEntry>,
    pub(crate) captures: FxHashMap<PointerId, ObjectId>,
    next_id: u64,
    pub(crate) enter_stamp: u64,
}

impl Registry {
    fn entry(
        &mut self,
        event_type: EventType,
        callback: Rc<RefCell<Listener>>,
        options: ListenerOptions,
    ) -> ListenerEntry {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        ListenerEntry {
            id,
            event_type,
            capture: options.capture,
            once: options.once,
            signal: options.signal,
            removed: Rc::new(Cell::new(false)),
            callback,
        }
    }

    pub(crate) fn add(
        &mut self,
        object: ObjectId,
        event_type: EventType,
        callback: Rc<RefCell<Listener>>,
        options: ListenerOptions,
    ) -> ListenerId {
        let entry = self.entry(event_type, callback, options);
        let id = entry.id;
        if entry.is_dead() {
            log::trace!("listener for {event_type} added with an aborted signal");
            return id;
        }
        self.objects.entry(object).or_default().listeners.push(entry);
        id
    }

    pub(crate) fn add_global(
        &mut self,
        event_type: EventType,
        callback: Rc<RefCell<Listener>>,
        options: ListenerOptions,
    ) -> ListenerId {
        let entry = self.entry(event_type, callback, options);
        let id = entry.id;
        if !entry.is_dead() {
            self.global.push(entry);
        }
        id
    }

    pub(crate) fn remove(&mut self, object: ObjectId, id: ListenerId) -> bool {
        let Some(entry) = self.objects.get_mut(&object) else {
            return false;
        };
        let removed = retain_live(&mut entry.listeners, |l| l.id != id);
        if entry.is_unused() {
            let _ = self.objects.remove(&object);
        }
        removed
    }

    pub(crate) fn remove_global(&mut self, id: ListenerId) -> bool {
        retain_live(&mut self.global, |l| l.id != id)
    }

    /// Remove a listener wherever it is registered.
    pub(crate) fn remove_any(&mut self, id: ListenerId) {
        if self.remove_global(id) {
            return;
        }
        let owner = self
            .objects
            .iter()
            .find(|(_, entry)| entry.listeners.iter().any(|l| l.id == id))
            .map(|(object, _)| *object);
        if let Some(object) = owner {
            let _ = self.remove(object, id);
        }
    }

    /// Drop aborted listeners and objects left without listeners or hover
    /// state.
    pub(crate) fn prune(&mut self) {
        let _ = retain_live(&mut self.global, |l| !l.is_dead());
        for entry in self.objects.values_mut() {
            let _ = retain_live(&mut entry.listeners, |l| !l.is_dead());
        }
        self.objects.retain(|_, entry| !entry.is_unused());
    }

    /// Has listeners or is still hovered.
    pub(crate) fn is_registered(&self, object: ObjectId) -> bool {
        self.objects.contains_key(&object)
    }

    pub(crate) fn has_listeners(&self, object: ObjectId) -> bool {
        self.objects
            .get(&object)
            .is_some_and(|entry| !entry.listeners.is_empty())
    }

    /// Live listeners of `object` for `event_type`, optionally filtered by
    /// the capture flag, in insertion order.
    pub(crate) fn snapshot(
        &self,
        object: ObjectId,
        event_type: EventType,
        capture: Option<bool>,
    ) -> Vec<ListenerEntry> {
        self.objects
            .get(&object)
            .map(|entry| select(&entry.listeners, event_type, capture))
            .unwrap_or_default()
    }

    pub(crate) fn global_snapshot(
        &self,
        event_type: EventType,
        capture: bool,
    ) -> Vec<ListenerEntry> {
        select(&self.global, event_type, Some(capture))
    }
}

fn select(
    listeners: &[ListenerEntry],
    event_type: EventType,
    capture: Option<bool>,
) -> Vec<ListenerEntry> {
    listeners
        .iter()
        .filter(|l| {
            let phase_matches = match capture {
                Some(capture) => capture == l.capture,
                None => true,
            };
            l.event_type == event_type && phase_matches && !l.is_dead()
        })
        .cloned()
        .collect()
}

/// `Vec::retain` that marks dropped entries as removed so in-flight
/// snapshots skip them. Returns whether anything was dropped.
fn retain_live(
    listeners: &mut Vec<ListenerEntry>,
    mut keep: impl FnMut(&ListenerEntry) -> bool,
) -> bool {
    let before = listeners.len();
    listeners.retain(|l| {
        let kept = keep(l);
        if !kept {
            l.kill();
        }
        kept
    });
    listeners.len() != before
}
