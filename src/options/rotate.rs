use std::fmt;
use std::rc::Rc;

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::DeviceValue;
use crate::geometry::Ray;

/// Anything that can answer "what does this ray hit first?".
///
/// Used to place a per-gesture rotation pivot under the pointer.
pub trait OriginSource {
    /// First hit point along `ray`, optionally ignoring hidden objects.
    fn first_hit(&self, ray: &Ray, visible_only: bool) -> Option<Vec3>;
}

impl<F> OriginSource for F
where
    F: Fn(&Ray, bool) -> Option<Vec3>,
{
    fn first_hit(&self, ray: &Ray, visible_only: bool) -> Option<Vec3> {
        self(ray, visible_only)
    }
}

/// Raycast-derived rotation pivot.
#[derive(Clone)]
pub struct DynamicOrigin {
    /// Objects to raycast against.
    pub source: Rc<dyn OriginSource>,
    /// Skip hits on hidden objects.
    pub visible_only: bool,
}

impl DynamicOrigin {
    /// Wrap a raycast source.
    pub fn new(source: impl OriginSource + 'static, visible_only: bool) -> Self {
        Self {
            source: Rc::new(source),
            visible_only,
        }
    }
}

impl fmt::Debug for DynamicOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicOrigin")
            .field("source", &"<raycast source>")
            .field("visible_only", &self.visible_only)
            .finish()
    }
}

impl PartialEq for DynamicOrigin {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.source, &other.source)
            && self.visible_only == other.visible_only
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Rotate", inline)]
#[serde(default)]
/// Rotation fragment parameters.
pub struct RotateOptions {
    /// Radians per NDC unit of pointer travel.
    #[schemars(skip)]
    pub speed: DeviceValue<f32>,
    /// Reverse the drag direction.
    #[schemars(skip)]
    pub invert: DeviceValue<bool>,
    /// Lower azimuth bound in radians (unbounded when absent).
    #[schemars(title = "Min Horizontal Angle")]
    pub min_horizontal_angle: Option<f32>,
    /// Upper azimuth bound in radians (unbounded when absent).
    #[schemars(title = "Max Horizontal Angle")]
    pub max_horizontal_angle: Option<f32>,
    /// Lower polar bound in radians, 0 = horizon.
    #[schemars(title = "Min Vertical Angle")]
    pub min_vertical_angle: Option<f32>,
    /// Upper polar bound in radians, 0 = horizon.
    #[schemars(title = "Max Vertical Angle")]
    pub max_vertical_angle: Option<f32>,
    /// World up axis for fixed-up rotation.
    #[schemars(skip)]
    pub up: [f32; 3],
    /// Raycast pivot; not serialized.
    #[serde(skip)]
    #[schemars(skip)]
    pub dynamic_origin: Option<DynamicOrigin>,
}

impl Default for RotateOptions {
    fn default() -> Self {
        Self {
            speed: DeviceValue::Scalar(1.0),
            invert: DeviceValue::Scalar(false),
            min_horizontal_angle: None,
            max_horizontal_angle: None,
            min_vertical_angle: None,
            max_vertical_angle: None,
            up: [0.0, 1.0, 0.0],
            dynamic_origin: None,
        }
    }
}

impl RotateOptions {
    /// Up axis as a unit vector (falls back to `+Y`).
    #[must_use]
    pub fn up_axis(&self) -> Vec3 {
        Vec3::from_array(self.up).try_normalize().unwrap_or(Vec3::Y)
    }

    /// Return a copy with every field set in `patch` replaced.
    #[must_use]
    pub fn merged(&self, patch: &RotatePatch) -> Self {
        Self {
            speed: patch.speed.unwrap_or(self.speed),
            invert: patch.invert.unwrap_or(self.invert),
            min_horizontal_angle: patch
                .min_horizontal_angle
                .unwrap_or(self.min_horizontal_angle),
            max_horizontal_angle: patch
                .max_horizontal_angle
                .unwrap_or(self.max_horizontal_angle),
            min_vertical_angle: patch
                .min_vertical_angle
                .unwrap_or(self.min_vertical_angle),
            max_vertical_angle: patch
                .max_vertical_angle
                .unwrap_or(self.max_vertical_angle),
            up: patch.up.unwrap_or(self.up),
            dynamic_origin: patch
                .dynamic_origin
                .clone()
                .unwrap_or_else(|| self.dynamic_origin.clone()),
        }
    }
}

/// Partial update for [`RotateOptions`]; `None` leaves a field untouched.
///
/// Bounds are `Option<Option<f32>>` so a patch can clear a limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RotatePatch {
    /// New speed.
    pub speed: Option<DeviceValue<f32>>,
    /// New invert flag.
    pub invert: Option<DeviceValue<bool>>,
    /// New lower azimuth bound.
    pub min_horizontal_angle: Option<Option<f32>>,
    /// New upper azimuth bound.
    pub max_horizontal_angle: Option<Option<f32>>,
    /// New lower polar bound.
    pub min_vertical_angle: Option<Option<f32>>,
    /// New upper polar bound.
    pub max_vertical_angle: Option<Option<f32>>,
    /// New up axis.
    pub up: Option<[f32; 3]>,
    /// New raycast pivot.
    pub dynamic_origin: Option<Option<DynamicOrigin>>,
}

/// A raycast pivot is carried over only when `options` has one, so options
/// loaded from TOML never drop a pivot installed in code.
impl From<&RotateOptions> for RotatePatch {
    fn from(options: &RotateOptions) -> Self {
        Self {
            speed: Some(options.speed),
            invert: Some(options.invert),
            min_horizontal_angle: Some(options.min_horizontal_angle),
            max_horizontal_angle: Some(options.max_horizontal_angle),
            min_vertical_angle: Some(options.min_vertical_angle),
            max_vertical_angle: Some(options.max_vertical_angle),
            up: Some(options.up),
            dynamic_origin: options.dynamic_origin.clone().map(Some),
        }
    }
}
