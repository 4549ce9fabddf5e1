use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use super::{ObjectId, SceneGraph};
use crate::geometry::Ray;
use crate::options::OriginSource;

/// Dynamic rotation origin backed by a shared scene: the first hit on any of
/// `objects` (or their descendants).
#[derive(Debug)]
pub struct SceneOriginSource<S> {
    scene: Rc<RefCell<S>>,
    objects: Vec<ObjectId>,
}

impl<S: SceneGraph> SceneOriginSource<S> {
    /// Raycast source over `objects` in `scene`.
    #[must_use]
    pub fn new(scene: Rc<RefCell<S>>, objects: Vec<ObjectId>) -> Self {
        Self { scene, objects }
    }
}

impl<S: SceneGraph> OriginSource for SceneOriginSource<S> {
    fn first_hit(&self, ray: &Ray, visible_only: bool) -> Option<Vec3> {
        let Ok(scene) = self.scene.try_borrow() else {
            log::warn!("scene is mutably borrowed; skipping dynamic origin");
            return None;
        };
        scene
            .raycast(ray)
            .into_iter()
            .filter(|hit| {
                self.objects
                    .iter()
                    .any(|root| scene.is_ancestor_or_self(*root, hit.object))
            })
            .find(|hit| !visible_only || scene.is_effectively_visible(hit.object))
            .map(|hit| hit.point)
    }
}
