use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::DeviceValue;

/// How pointer motion is converted into a pan offset.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TruckMode {
    /// Keep the world point under the pointer fixed (ray/plane based).
    #[default]
    Exact,
    /// Scale screen deltas by a distance snapshot (no raycasting).
    Approximate,
}

/// Constrains truck motion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(tag = "kind", content = "vector", rename_all = "snake_case")]
pub enum TruckLock {
    /// Only move along this world axis.
    Axis([f32; 3]),
    /// Only move inside the plane with this world normal.
    Plane([f32; 3]),
}

impl TruckLock {
    /// Normalized lock vector, if non-degenerate.
    #[must_use]
    pub fn vector(&self) -> Option<Vec3> {
        let (Self::Axis(v) | Self::Plane(v)) = self;
        Vec3::from_array(*v).try_normalize()
    }

    /// Restrict a world-space offset to the lock.
    #[must_use]
    pub fn constrain(&self, offset: Vec3) -> Vec3 {
        match (self, self.vector()) {
            (Self::Axis(_), Some(axis)) => axis * offset.dot(axis),
            (Self::Plane(_), Some(normal)) => {
                offset - normal * offset.dot(normal)
            }
            (_, None) => offset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Truck", inline)]
#[serde(default)]
/// Truck (pan) fragment parameters.
pub struct TruckOptions {
    /// Exact or approximate panning.
    #[schemars(title = "Mode")]
    pub mode: TruckMode,
    /// Pan speed multiplier.
    #[schemars(skip)]
    pub speed: DeviceValue<f32>,
    /// Reverse the drag direction.
    #[schemars(skip)]
    pub invert: DeviceValue<bool>,
    /// Optional axis/plane constraint.
    #[schemars(skip)]
    pub lock: Option<TruckLock>,
}

impl Default for TruckOptions {
    fn default() -> Self {
        Self {
            mode: TruckMode::Exact,
            speed: DeviceValue::Scalar(1.0),
            invert: DeviceValue::Scalar(false),
            lock: None,
        }
    }
}

impl TruckOptions {
    /// Return a copy with every field set in `patch` replaced.
    #[must_use]
    pub fn merged(&self, patch: &TruckPatch) -> Self {
        Self {
            mode: patch.mode.unwrap_or(self.mode),
            speed: patch.speed.unwrap_or(self.speed),
            invert: patch.invert.unwrap_or(self.invert),
            lock: patch.lock.unwrap_or(self.lock),
        }
    }
}

/// Partial update for [`TruckOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TruckPatch {
    /// New mode.
    pub mode: Option<TruckMode>,
    /// New speed.
    pub speed: Option<DeviceValue<f32>>,
    /// New invert flag.
    pub invert: Option<DeviceValue<bool>>,
    /// New lock; `Some(None)` removes it.
    pub lock: Option<Option<TruckLock>>,
}

impl From<&TruckOptions> for TruckPatch {
    fn from(options: &TruckOptions) -> Self {
        Self {
            mode: Some(options.mode),
            speed: Some(options.speed),
            invert: Some(options.invert),
            lock: Some(options.lock),
        }
    }
}
