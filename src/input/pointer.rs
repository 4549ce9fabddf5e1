use glam::Vec2;

use super::event::{PointerId, PointerType};

/// One pressed/tracked pointer, in normalized device coordinates.
///
/// Created on pointer-down, updated on pointer-move, dropped on
/// pointer-up/cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePointer {
    /// Pointer identifier.
    pub id: PointerId,
    /// Producing device.
    pub pointer_type: PointerType,
    /// Current position.
    pub coords: Vec2,
    /// Position when the current gesture (active set) started.
    pub start_coords: Vec2,
    /// Motion of the last move event.
    pub delta: Vec2,
}

impl ActivePointer {
    /// Pointer at rest at `coords`.
    #[must_use]
    pub fn at(id: PointerId, pointer_type: PointerType, coords: Vec2) -> Self {
        Self {
            id,
            pointer_type,
            coords,
            start_coords: coords,
            delta: Vec2::ZERO,
        }
    }

    /// Position before the last move.
    #[must_use]
    pub fn previous_coords(&self) -> Vec2 {
        self.coords - self.delta
    }
}

/// Average of the pointers' current positions.
#[must_use]
pub fn centroid(pointers: &[ActivePointer]) -> Vec2 {
    average(pointers.iter().map(|p| p.coords))
}

/// Average of the pointers' gesture-start positions.
#[must_use]
pub fn start_centroid(pointers: &[ActivePointer]) -> Vec2 {
    average(pointers.iter().map(|p| p.start_coords))
}

/// Average of the pointers' last deltas.
///
/// This is the displacement of the centroid over the last move. One finger
/// of a resting pair moving by `d` pans by `d / 2`, the same as a
/// centroid-based exact truck.
#[must_use]
pub fn mean_delta(pointers: &[ActivePointer]) -> Vec2 {
    average(pointers.iter().map(|p| p.delta))
}

/// Device of the first pointer (mouse when empty).
#[must_use]
pub fn primary_type(pointers: &[ActivePointer]) -> PointerType {
    pointers.first().map_or(PointerType::Mouse, |p| p.pointer_type)
}

fn average(points: impl ExactSizeIterator<Item = Vec2>) -> Vec2 {
    let n = points.len();
    if n == 0 {
        return Vec2::ZERO;
    }
    points.sum::<Vec2>() / n as f32
}
