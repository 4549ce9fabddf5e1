//! Declarative input mappings from button/gesture/modifier combinations to
//! camera movements.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::event::{Modifiers, MouseButtons, PointerType};

/// Logical camera movement a fragment implements.
///
/// Ordering is significant: fragments are updated in this order every
/// frame (rotate, then truck, then zoom).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    /// Orbit/look rotation.
    Rotate,
    /// Lateral panning.
    Truck,
    /// Zoom and/or dolly.
    Zoom,
}

/// Set of movements whose mapping currently matches the live input.
pub type ActiveControls = BTreeSet<Movement>;

/// Touch finger count a mapping rule requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchGesture {
    /// Exactly one finger.
    One,
    /// Exactly two fingers.
    Two,
}

impl TouchGesture {
    /// Number of active touch pointers this gesture requires.
    #[must_use]
    pub const fn finger_count(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// One rule; all configured fields must match (AND).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputMapping {
    /// Mouse buttons; any overlap with the pressed buttons matches.
    pub buttons: Option<MouseButtons>,
    /// Touch finger count.
    pub gesture: Option<TouchGesture>,
    /// Exact modifier set required for mouse input.
    pub modifiers: Modifiers,
}

impl InputMapping {
    /// Rule matching the given mouse buttons with no modifiers.
    #[must_use]
    pub const fn buttons(buttons: MouseButtons) -> Self {
        Self {
            buttons: Some(buttons),
            gesture: None,
            modifiers: Modifiers::empty(),
        }
    }

    /// Rule matching a touch finger count.
    #[must_use]
    pub const fn gesture(gesture: TouchGesture) -> Self {
        Self {
            buttons: None,
            gesture: Some(gesture),
            modifiers: Modifiers::empty(),
        }
    }

    /// Builder-style modifier setter.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this rule matches the current input state.
    ///
    /// Mouse/pen input matches on button overlap plus an exact modifier
    /// match (unset modifiers must be released). Touch input matches on
    /// finger count only.
    #[must_use]
    pub fn matches(&self, state: &InputState) -> bool {
        if state.pointer_type == PointerType::Touch {
            return self
                .gesture
                .is_some_and(|g| g.finger_count() == state.touch_count);
        }
        self.buttons.is_some_and(|b| b.intersects(state.buttons))
            && self.modifiers == state.modifiers
    }
}

/// Snapshot of the input state a mapping is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    /// Device of the triggering event.
    pub pointer_type: PointerType,
    /// Pressed mouse buttons.
    pub buttons: MouseButtons,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Number of active touch pointers.
    pub touch_count: usize,
}

/// Movement → rules table. Rules for one movement are OR-combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputMappings {
    rules: BTreeMap<Movement, Vec<InputMapping>>,
}

impl Default for InputMappings {
    /// Orbit-style defaults: primary drag rotates, secondary or
    /// shift+primary drag trucks, auxiliary drag zooms; one finger
    /// rotates, two fingers truck and pinch-zoom.
    fn default() -> Self {
        Self::new()
            .with(
                Movement::Rotate,
                vec![
                    InputMapping::buttons(MouseButtons::PRIMARY),
                    InputMapping::gesture(TouchGesture::One),
                ],
            )
            .with(
                Movement::Truck,
                vec![
                    InputMapping::buttons(MouseButtons::SECONDARY),
                    InputMapping::buttons(MouseButtons::PRIMARY)
                        .with_modifiers(Modifiers::SHIFT),
                    InputMapping::gesture(TouchGesture::Two),
                ],
            )
            .with(
                Movement::Zoom,
                vec![
                    InputMapping::buttons(MouseButtons::AUXILIARY),
                    InputMapping::gesture(TouchGesture::Two),
                ],
            )
    }
}

impl InputMappings {
    /// Empty table (nothing ever activates).
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Builder-style rule list setter.
    #[must_use]
    pub fn with(mut self, movement: Movement, rules: Vec<InputMapping>) -> Self {
        self.set(movement, rules);
        self
    }

    /// Replace the rules of one movement.
    pub fn set(&mut self, movement: Movement, rules: Vec<InputMapping>) {
        let _ = self.rules.insert(movement, rules);
    }

    /// Remove a movement from the table.
    pub fn remove(&mut self, movement: Movement) {
        let _ = self.rules.remove(&movement);
    }

    /// Rules of one movement.
    #[must_use]
    pub fn get(&self, movement: Movement) -> &[InputMapping] {
        self.rules.get(&movement).map_or(&[], Vec::as_slice)
    }

    /// Every movement with at least one matching rule.
    #[must_use]
    pub fn resolve(&self, state: &InputState) -> ActiveControls {
        self.rules
            .iter()
            .filter(|(_, rules)| rules.iter().any(|r| r.matches(state)))
            .map(|(movement, _)| *movement)
            .collect()
    }
}
