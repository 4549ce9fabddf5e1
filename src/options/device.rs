use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::input::PointerType;

/// A setting that is either shared by every device or split between
/// mouse/pen pointers and touch.
///
/// Serializes untagged so TOML stays short:
/// ```toml
/// speed = 1.0
/// # or
/// speed = { pointer = 1.0, touch = 2.0 }
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum DeviceValue<T> {
    /// One value for every device.
    Scalar(T),
    /// Separate values per device type.
    PerDevice {
        /// Mouse and pen.
        pointer: T,
        /// Touch.
        touch: T,
    },
}

impl<T: Copy> DeviceValue<T> {
    /// Value for the given pointer type.
    #[must_use]
    pub fn get(&self, pointer_type: PointerType) -> T {
        match *self {
            Self::Scalar(value) => value,
            Self::PerDevice { pointer, touch } => {
                if pointer_type == PointerType::Touch {
                    touch
                } else {
                    pointer
                }
            }
        }
    }
}

impl<T: Default> Default for DeviceValue<T> {
    fn default() -> Self {
        Self::Scalar(T::default())
    }
}

impl<T> From<T> for DeviceValue<T> {
    fn from(value: T) -> Self {
        Self::Scalar(value)
    }
}
