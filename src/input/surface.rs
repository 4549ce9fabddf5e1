//! The element that hosts the rendered scene and receives raw input.

use glam::Vec2;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::event::PointerId;

/// Bounding rectangle of the hosting element in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width (must be positive for NDC conversion).
    pub width: f32,
    /// Height (must be positive for NDC conversion).
    pub height: f32,
}

impl ViewportRect {
    /// Rectangle anchored at the client origin.
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Convert a client position into normalized device coordinates
    /// (`x` right, `y` up, both in `[-1, 1]` across the rectangle).
    #[must_use]
    pub fn to_ndc(&self, client: Vec2) -> Vec2 {
        let width = self.width.max(f32::EPSILON);
        let height = self.height.max(f32::EPSILON);
        Vec2::new(
            (client.x - self.left) / width * 2.0 - 1.0,
            -(client.y - self.top) / height * 2.0 + 1.0,
        )
    }

    /// Width / height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(f32::EPSILON)
    }
}

/// CSS-like `touch-action` value of the hosting element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchAction {
    /// Platform handles panning/zooming gestures.
    #[default]
    Auto,
    /// Platform gesture handling is suppressed.
    None,
}

/// The hosting element as seen by the input classifier.
///
/// Implementations forward capture requests to the windowing layer. All
/// calls are synchronous.
pub trait InputSurface {
    /// Current bounding rectangle.
    fn rect(&self) -> ViewportRect;
    /// Current touch-action.
    fn touch_action(&self) -> TouchAction;
    /// Replace the touch-action.
    fn set_touch_action(&mut self, action: TouchAction);
    /// Route all events of `pointer_id` to this surface.
    fn set_pointer_capture(&mut self, pointer_id: PointerId);
    /// Undo [`set_pointer_capture`](Self::set_pointer_capture).
    fn release_pointer_capture(&mut self, pointer_id: PointerId);
}

/// In-memory surface for headless use and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSurface {
    /// Reported rectangle.
    pub rect: ViewportRect,
    /// Current touch-action.
    pub touch_action: TouchAction,
    /// Pointers currently captured.
    pub captured: FxHashSet<PointerId>,
}

impl HeadlessSurface {
    /// Surface of the given size at the client origin.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            rect: ViewportRect::sized(width, height),
            touch_action: TouchAction::Auto,
            captured: FxHashSet::default(),
        }
    }
}

impl InputSurface for HeadlessSurface {
    fn rect(&self) -> ViewportRect {
        self.rect
    }

    fn touch_action(&self) -> TouchAction {
        self.touch_action
    }

    fn set_touch_action(&mut self, action: TouchAction) {
        self.touch_action = action;
    }

    fn set_pointer_capture(&mut self, pointer_id: PointerId) {
        let _ = self.captured.insert(pointer_id);
    }

    fn release_pointer_capture(&mut self, pointer_id: PointerId) {
        let _ = self.captured.remove(&pointer_id);
    }
}
