use glam::{Affine3A, Vec3};

use super::{Intersection, ObjectId, SceneGraph, Shape};
use crate::geometry::Ray;

/// One node of a [`Scene`].
#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    /// Transform relative to the parent.
    transform: Affine3A,
    visible: bool,
    shape: Option<Shape>,
}

/// Arena scene graph with hierarchical transforms and simple hit shapes.
///
/// Objects are never removed; hide them instead.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object without geometry (a group).
    pub fn add_group(
        &mut self,
        name: &str,
        parent: Option<ObjectId>,
        transform: Affine3A,
    ) -> ObjectId {
        self.insert(name, parent, transform, None)
    }

    /// Add an object with hit-test geometry.
    pub fn add_shape(
        &mut self,
        name: &str,
        parent: Option<ObjectId>,
        transform: Affine3A,
        shape: Shape,
    ) -> ObjectId {
        self.insert(name, parent, transform, Some(shape))
    }

    fn insert(
        &mut self,
        name: &str,
        parent: Option<ObjectId>,
        transform: Affine3A,
        shape: Option<Shape>,
    ) -> ObjectId {
        let id = ObjectId(self.nodes.len() as u32);
        let parent = parent.filter(|p| self.node(*p).is_some());
        if let Some(node) = parent.and_then(|p| self.node_mut(p)) {
            node.children.push(id);
        }
        self.nodes.push(Node {
            name: name.to_owned(),
            parent,
            children: Vec::new(),
            transform,
            visible: true,
            shape,
        });
        id
    }

    fn node(&self, id: ObjectId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: ObjectId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Object name (empty for unknown ids).
    #[must_use]
    pub fn name(&self, id: ObjectId) -> &str {
        self.node(id).map_or("", |n| n.name.as_str())
    }

    /// Direct children of `id`.
    #[must_use]
    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// `id` and every object below it, depth first.
    #[must_use]
    pub fn descendants(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.node(current).is_none() {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Replace the parent-relative transform.
    pub fn set_transform(&mut self, id: ObjectId, transform: Affine3A) {
        if let Some(node) = self.node_mut(id) {
            node.transform = transform;
        }
    }

    /// Move the object to `translation`, keeping rotation and scale.
    pub fn set_translation(&mut self, id: ObjectId, translation: Vec3) {
        if let Some(node) = self.node_mut(id) {
            node.transform.translation = translation.into();
        }
    }

    /// Show or hide the object (and, effectively, its descendants).
    pub fn set_visible(&mut self, id: ObjectId, visible: bool) {
        if let Some(node) = self.node_mut(id) {
            node.visible = visible;
        }
    }

    /// Replace the hit-test geometry.
    pub fn set_shape(&mut self, id: ObjectId, shape: Option<Shape>) {
        if let Some(node) = self.node_mut(id) {
            node.shape = shape;
        }
    }

    /// Local → world transform.
    #[must_use]
    pub fn world_transform(&self, id: ObjectId) -> Affine3A {
        let mut transform = Affine3A::IDENTITY;
        for object in self.ancestry(id) {
            if let Some(node) = self.node(object) {
                transform = node.transform * transform;
            }
        }
        transform
    }

    /// Intersect one object's own geometry.
    #[must_use]
    pub fn intersect_object(&self, id: ObjectId, ray: &Ray) -> Option<Intersection> {
        let shape = self.node(id)?.shape?;
        let world = self.world_transform(id);
        if world.matrix3.determinant().abs() < f32::EPSILON {
            return None;
        }
        let inverse = world.inverse();
        let local_origin = inverse.transform_point3(ray.origin);
        let local_direction = inverse.transform_vector3(ray.direction);
        let t = shape.intersect_local(local_origin, local_direction)?;
        Some(Intersection {
            object: id,
            point: ray.at(t),
            distance: t,
        })
    }
}

impl SceneGraph for Scene {
    fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.node(id)?.parent
    }

    fn is_visible(&self, id: ObjectId) -> bool {
        self.node(id).is_some_and(|n| n.visible)
    }

    fn raycast(&self, ray: &Ray) -> Vec<Intersection> {
        let mut hits: Vec<Intersection> = (0..self.nodes.len() as u32)
            .filter_map(|i| self.intersect_object(ObjectId(i), ray))
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
