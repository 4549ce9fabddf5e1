use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::DeviceValue;

/// Which camera quantity a zoom gesture changes.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ZoomKind {
    /// Scale the camera zoom factor.
    Zoom,
    /// Move the camera along the view direction.
    #[default]
    Dolly,
    /// Split the effect between zoom and dolly.
    ZoomAndDolly,
}

/// Extra motion applied alongside a zoom step.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryMotion {
    /// Zoom toward the target only.
    #[default]
    None,
    /// Translate so the point under the anchor stays put.
    Truck,
    /// Rotate the camera about the target so the point under the anchor
    /// stays put.
    Orbit,
    /// Rotate the view direction about the camera so the point under the
    /// anchor stays put.
    Rotate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Zoom", inline)]
#[serde(default)]
/// Zoom/dolly fragment parameters.
pub struct ZoomOptions {
    /// Zoom, dolly or both.
    #[serde(rename = "type")]
    #[schemars(title = "Type")]
    pub kind: ZoomKind,
    /// Delta multiplier.
    #[schemars(skip)]
    pub speed: DeviceValue<f32>,
    /// Reverse the gesture direction.
    #[schemars(skip)]
    pub invert: DeviceValue<bool>,
    /// Anchor-preserving motion.
    #[schemars(title = "Secondary Motion")]
    pub secondary_motion: SecondaryMotion,
    /// Closest camera–target distance.
    #[schemars(title = "Min Distance", range(min = 0.0))]
    pub min_distance: f32,
    /// Farthest camera–target distance.
    #[schemars(title = "Max Distance")]
    pub max_distance: f32,
    /// Smallest zoom factor.
    #[schemars(title = "Min Zoom", range(min = 0.0))]
    pub min_zoom: f32,
    /// Largest zoom factor.
    #[schemars(title = "Max Zoom")]
    pub max_zoom: f32,
    /// Share of the effect given to dolly in `zoom_and_dolly` mode.
    #[schemars(title = "Dolly Ratio", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub dolly_ratio: f32,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            kind: ZoomKind::Dolly,
            speed: DeviceValue::Scalar(1.0),
            invert: DeviceValue::Scalar(false),
            secondary_motion: SecondaryMotion::None,
            min_distance: 0.0,
            max_distance: f32::MAX,
            min_zoom: 0.0,
            max_zoom: f32::MAX,
            dolly_ratio: 0.5,
        }
    }
}

impl ZoomOptions {
    /// Return a copy with every field set in `patch` replaced.
    #[must_use]
    pub fn merged(&self, patch: &ZoomPatch) -> Self {
        Self {
            kind: patch.kind.unwrap_or(self.kind),
            speed: patch.speed.unwrap_or(self.speed),
            invert: patch.invert.unwrap_or(self.invert),
            secondary_motion: patch
                .secondary_motion
                .unwrap_or(self.secondary_motion),
            min_distance: patch.min_distance.unwrap_or(self.min_distance),
            max_distance: patch.max_distance.unwrap_or(self.max_distance),
            min_zoom: patch.min_zoom.unwrap_or(self.min_zoom),
            max_zoom: patch.max_zoom.unwrap_or(self.max_zoom),
            dolly_ratio: patch.dolly_ratio.unwrap_or(self.dolly_ratio),
        }
    }
}

/// Partial update for [`ZoomOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZoomPatch {
    /// New kind.
    pub kind: Option<ZoomKind>,
    /// New speed.
    pub speed: Option<DeviceValue<f32>>,
    /// New invert flag.
    pub invert: Option<DeviceValue<bool>>,
    /// New secondary motion.
    pub secondary_motion: Option<SecondaryMotion>,
    /// New minimum distance.
    pub min_distance: Option<f32>,
    /// New maximum distance.
    pub max_distance: Option<f32>,
    /// New minimum zoom.
    pub min_zoom: Option<f32>,
    /// New maximum zoom.
    pub max_zoom: Option<f32>,
    /// New dolly share.
    pub dolly_ratio: Option<f32>,
}

impl From<&ZoomOptions> for ZoomPatch {
    fn from(options: &ZoomOptions) -> Self {
        Self {
            kind: Some(options.kind),
            speed: Some(options.speed),
            invert: Some(options.invert),
            secondary_motion: Some(options.secondary_motion),
            min_distance: Some(options.min_distance),
            max_distance: Some(options.max_distance),
            min_zoom: Some(options.min_zoom),
            max_zoom: Some(options.max_zoom),
            dolly_ratio: Some(options.dolly_ratio),
        }
    }
}
