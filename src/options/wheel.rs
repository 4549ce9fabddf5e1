use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::input::Movement;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Wheel", inline)]
#[serde(default)]
/// Scroll wheel parameters.
pub struct WheelOptions {
    /// `K` in `sign(dy) * ln(1 + |dy|) / K`.
    #[schemars(title = "Divisor", range(min = 1.0, max = 200.0), extend("step" = 1.0))]
    pub divisor: f32,
    /// Reverse the scroll direction.
    #[schemars(title = "Invert")]
    pub invert: bool,
    /// Movement driven by the wheel; `None` disables wheel input.
    #[schemars(skip)]
    pub movement: Option<Movement>,
}

impl WheelOptions {
    /// Default `K`.
    pub const DEFAULT_DIVISOR: f32 = 40.0;
}

impl Default for WheelOptions {
    fn default() -> Self {
        Self {
            divisor: Self::DEFAULT_DIVISOR,
            invert: false,
            movement: Some(Movement::Zoom),
        }
    }
}
