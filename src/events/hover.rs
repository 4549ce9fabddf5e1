//! Over/out and enter/leave bookkeeping.
//!
//! Over/out tracks a single hovered object; enter/leave tracks every
//! registered object that contains a hit, so nested objects can be entered
//! at the same time.

use super::registry::Registry;
use crate::scene::{ObjectId, SceneGraph};

/// Hover events to fire after one raycast update, in firing order:
/// outs, leaves, over, enters.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct HoverTransitions {
    pub(crate) out: Vec<ObjectId>,
    pub(crate) leave: Vec<ObjectId>,
    pub(crate) over: Option<ObjectId>,
    pub(crate) enter: Vec<ObjectId>,
}

impl HoverTransitions {
    pub(crate) fn is_empty(&self) -> bool {
        self.out.is_empty()
            && self.leave.is_empty()
            && self.over.is_none()
            && self.enter.is_empty()
    }
}

/// The hovered object: the capture target if any, else the first
/// registered object found walking up from each hit in hit order.
pub(crate) fn over_target<S: SceneGraph + ?Sized>(
    scene: &S,
    hits: &[ObjectId],
    captured: Option<ObjectId>,
    is_registered: impl Fn(ObjectId) -> bool,
) -> Option<ObjectId> {
    if captured.is_some() {
        return captured;
    }
    hits.iter()
        .find_map(|&hit| scene.ancestry(hit).into_iter().find(|&o| is_registered(o)))
}

/// Registered objects that are a hit or an ancestor of one. Each hit chain
/// contributes bottom-up, chains in hit order, without duplicates.
pub(crate) fn entered_objects<S: SceneGraph + ?Sized>(
    scene: &S,
    hits: &[ObjectId],
    is_registered: impl Fn(ObjectId) -> bool,
) -> Vec<ObjectId> {
    let mut entered = Vec::new();
    for &hit in hits {
        for object in scene.ancestry(hit) {
            if is_registered(object) && !entered.contains(&object) {
                entered.push(object);
            }
        }
    }
    entered
}

/// Update the registry's hover flags and return the events to fire.
/// Objects whose listeners are all gone are dropped once they are no
/// longer hovered.
pub(crate) fn apply(
    registry: &mut Registry,
    over: Option<ObjectId>,
    entered: &[ObjectId],
) -> HoverTransitions {
    let mut transitions = HoverTransitions::default();

    let mut out: Vec<ObjectId> = registry
        .objects
        .iter()
        .filter(|(object, entry)| entry.over && Some(**object) != over)
        .map(|(object, _)| *object)
        .collect();
    out.sort_unstable();
    for object in &out {
        if let Some(entry) = registry.objects.get_mut(object) {
            entry.over = false;
        }
    }
    transitions.out = out;

    let mut leaving: Vec<(u64, ObjectId)> = registry
        .objects
        .iter()
        .filter_map(|(object, entry)| {
            entry
                .entered
                .filter(|_| !entered.contains(object))
                .map(|stamp| (stamp, *object))
        })
        .collect();
    leaving.sort_unstable();
    for (_, object) in &leaving {
        if let Some(entry) = registry.objects.get_mut(object) {
            entry.entered = None;
        }
    }
    transitions.leave = leaving.into_iter().map(|(_, object)| object).collect();

    if let Some(object) = over {
        if let Some(entry) = registry.objects.get_mut(&object) {
            if !entry.over {
                entry.over = true;
                transitions.over = Some(object);
            }
        }
    }

    for &object in entered {
        let stamp = registry.enter_stamp;
        if let Some(entry) = registry.objects.get_mut(&object) {
            if entry.entered.is_none() {
                entry.entered = Some(stamp);
                registry.enter_stamp += 1;
                transitions.enter.push(object);
            }
        }
    }

    registry.objects.retain(|_, entry| !entry.is_unused());
    transitions
}
