//! Centralized control options with TOML preset support.
//!
//! All tweakable settings (rotation, truck, zoom, wheel, input mappings) are
//! consolidated here. Options serialize to/from TOML so control presets can
//! live next to an application's other configuration.

mod device;
mod rotate;
mod truck;
mod wheel;
mod zoom;

use std::path::Path;

pub use device::DeviceValue;
pub use rotate::{DynamicOrigin, OriginSource, RotateOptions, RotatePatch};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use truck::{TruckLock, TruckMode, TruckOptions, TruckPatch};
pub use wheel::WheelOptions;
pub use zoom::{SecondaryMotion, ZoomKind, ZoomOptions, ZoomPatch};

use crate::error::VantageError;
use crate::input::InputMappings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[zoom]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ControlOptions {
    /// Whether input is forwarded to fragments at all.
    pub enabled: bool,
    /// Rotation parameters.
    pub rotate: RotateOptions,
    /// Truck parameters.
    pub truck: TruckOptions,
    /// Zoom/dolly parameters.
    pub zoom: ZoomOptions,
    /// Wheel parameters.
    pub wheel: WheelOptions,
    /// Movement → input rules.
    #[schemars(skip)]
    pub input_mappings: InputMappings,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate: RotateOptions::default(),
            truck: TruckOptions::default(),
            zoom: ZoomOptions::default(),
            wheel: WheelOptions::default(),
            input_mappings: InputMappings::default(),
        }
    }
}

impl ControlOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ControlOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, VantageError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| VantageError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), VantageError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VantageError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
