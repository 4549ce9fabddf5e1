//! Scene-graph collaborator: object handles, the [`SceneGraph`] trait the
//! event dispatcher and dynamic rotation origins raycast against, and a
//! small arena implementation.
//!
//! The crate never constructs or destroys a caller's objects; [`Scene`]
//! exists so headless users and tests have something to hit.

mod arena;
mod origin;
mod shape;

pub use arena::Scene;
use glam::Vec3;
pub use origin::SceneOriginSource;
use serde::{Deserialize, Serialize};
pub use shape::Shape;

use crate::geometry::Ray;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Stable handle of a scene object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ObjectId(pub u32);

/// One ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Object whose geometry was hit.
    pub object: ObjectId,
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
}

// ---------------------------------------------------------------------------
// SceneGraph
// ---------------------------------------------------------------------------

/// Hierarchical scene the dispatcher and dynamic origins query.
pub trait SceneGraph {
    /// Parent of `id`, `None` for roots and unknown objects.
    fn parent(&self, id: ObjectId) -> Option<ObjectId>;

    /// The object's own visibility flag (ancestors not considered).
    fn is_visible(&self, id: ObjectId) -> bool;

    /// Every intersection along `ray`, nearest first. Invisible objects are
    /// included; callers filter.
    fn raycast(&self, ray: &Ray) -> Vec<Intersection>;

    /// Visible with every ancestor visible.
    fn is_effectively_visible(&self, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(object) = current {
            if !self.is_visible(object) {
                return false;
            }
            current = self.parent(object);
        }
        true
    }

    /// `id` followed by its ancestors up to the root.
    fn ancestry(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut chain = vec![id];
        let mut current = self.parent(id);
        while let Some(object) = current {
            if chain.contains(&object) {
                log::warn!("cycle in scene hierarchy at {object:?}");
                break;
            }
            chain.push(object);
            current = self.parent(object);
        }
        chain
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        self.ancestry(id).contains(&ancestor)
    }
}
