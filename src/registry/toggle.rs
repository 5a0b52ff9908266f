// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Toggles: per-request bindings from bulb names to brightness overrides.

use serde::{Deserialize, Serialize};

use crate::types::{RgbColor, palette};

/// The lamp that reads too bright at full RGB values.
pub const BLACK_LAMP: &str = "Black Lamp";
pub const WHITE_LAMP: &str = "White Lamp";
pub const WOOD_LAMP: &str = "Wood Lamp";
pub const DEN_LIGHT: &str = "Den Light";

/// Bulbs whose names contain this marker are ceiling lights rather than lamps.
pub const LIGHT_MARKER: &str = "Light";

/// Bulbs that take part in the default lightning storm, strike order first.
pub const LIGHTNING_BULBS: [&str; 4] = [DEN_LIGHT, WHITE_LAMP, WOOD_LAMP, BLACK_LAMP];

const fn default_multiplier() -> f64 {
    1.0
}

const fn default_enabled() -> bool {
    true
}

/// Returns the default brightness multiplier for a bulb name.
///
/// ```
/// use tuya_scenes::registry::classify;
///
/// assert_eq!(classify("Black Lamp"), 0.5);
/// assert_eq!(classify("Den Light"), 2.0);
/// assert_eq!(classify("Wood Lamp"), 1.0);
/// ```
#[must_use]
pub fn classify(name: &str) -> f64 {
    if name == BLACK_LAMP {
        0.5
    } else if is_light(name) {
        2.0
    } else {
        1.0
    }
}

/// Returns true if the bulb is a ceiling light rather than a lamp.
#[must_use]
pub fn is_light(name: &str) -> bool {
    name.contains(LIGHT_MARKER)
}

/// A named binding between a bulb and a brightness override.
///
/// Toggles refer to bulbs by name only; a toggle naming an unknown bulb is
/// skipped when dispatched. The serde names match the request bodies:
///
/// ```
/// use tuya_scenes::registry::Toggle;
///
/// let toggle: Toggle =
///     serde_json::from_str(r#"{"name": "Den Light", "bright_mul": 2.0, "toggle": false}"#).unwrap();
/// assert_eq!(toggle.multiplier, 2.0);
/// assert!(!toggle.enabled);
///
/// let defaulted: Toggle = serde_json::from_str(r#"{"name": "Wood Lamp"}"#).unwrap();
/// assert_eq!(defaulted, Toggle::new("Wood Lamp", 1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toggle {
    /// Name of the bulb.
    pub name: String,
    /// Brightness multiplier applied to colors sent to this bulb.
    #[serde(rename = "bright_mul", default = "default_multiplier")]
    pub multiplier: f64,
    /// Whether the bulb takes part at all.
    #[serde(rename = "toggle", default = "default_enabled")]
    pub enabled: bool,
}

impl Toggle {
    /// Creates an enabled toggle.
    #[must_use]
    pub fn new(name: impl Into<String>, multiplier: f64) -> Self {
        Self {
            name: name.into(),
            multiplier,
            enabled: true,
        }
    }

    /// Creates an enabled toggle with the multiplier [`classify`] picks.
    #[must_use]
    pub fn classified(name: impl Into<String>) -> Self {
        let name = name.into();
        let multiplier = classify(&name);
        Self::new(name, multiplier)
    }

    /// Returns the toggle with `enabled` cleared.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A toggle carrying its own color, for per-bulb color commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiColorToggle {
    #[serde(flatten)]
    pub toggle: Toggle,
    #[serde(flatten)]
    pub color: RgbColor,
}

/// The default toggle sets derived from the roster at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToggleSets {
    /// One classified toggle per bulb, for immediate commands.
    pub commands: Vec<Toggle>,
    /// One black toggle per bulb, for the multi-color command.
    pub multi_color: Vec<MultiColorToggle>,
    /// Two groups for the grouped cycle: adjusted bulbs first, the rest second.
    pub scene_groups: Vec<Vec<Toggle>>,
    /// Bulbs for the lightning storm, in roster order.
    pub lightning: Vec<String>,
}

impl ToggleSets {
    /// Derives the default sets from bulb names in roster order.
    pub fn derive<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut sets = Self {
            scene_groups: vec![Vec::new(), Vec::new()],
            ..Self::default()
        };

        for name in names {
            let toggle = Toggle::classified(name);
            sets.multi_color.push(MultiColorToggle {
                toggle: Toggle::new(name, 1.0),
                color: palette::BLACK,
            });
            if name == BLACK_LAMP || is_light(name) {
                sets.scene_groups[0].push(toggle.clone());
            } else {
                sets.scene_groups[1].push(toggle.clone());
            }
            sets.commands.push(toggle);
            if LIGHTNING_BULBS.contains(&name) {
                sets.lightning.push(name.to_string());
            }
        }

        sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: [&str; 6] = [
        "White Lamp",
        "Wood Lamp",
        "Black Lamp",
        "Den Light",
        "Chair Light",
        "Sofa Light",
    ];

    #[test]
    fn classification_rules() {
        assert!((classify("Black Lamp") - 0.5).abs() < f64::EPSILON);
        assert!((classify("Chair Light") - 2.0).abs() < f64::EPSILON);
        assert!((classify("White Lamp") - 1.0).abs() < f64::EPSILON);
        // exact match only
        assert!((classify("Black Lamp 2") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn derive_command_toggles() {
        let sets = ToggleSets::derive(ROSTER);
        assert_eq!(sets.commands.len(), 6);
        assert_eq!(sets.commands[2], Toggle::new("Black Lamp", 0.5));
        assert_eq!(sets.commands[3], Toggle::new("Den Light", 2.0));
        assert!(sets.commands.iter().all(|t| t.enabled));
    }

    #[test]
    fn derive_scene_groups() {
        let sets = ToggleSets::derive(ROSTER);
        let names = |group: &[Toggle]| group.iter().map(|t| t.name.clone()).collect::<Vec<_>>();
        assert_eq!(
            names(&sets.scene_groups[0]),
            ["Black Lamp", "Den Light", "Chair Light", "Sofa Light"]
        );
        assert_eq!(names(&sets.scene_groups[1]), ["White Lamp", "Wood Lamp"]);
    }

    #[test]
    fn derive_lightning_in_roster_order() {
        let sets = ToggleSets::derive(ROSTER);
        assert_eq!(
            sets.lightning,
            ["White Lamp", "Wood Lamp", "Black Lamp", "Den Light"]
        );
    }

    #[test]
    fn multi_color_defaults_to_black() {
        let sets = ToggleSets::derive(ROSTER);
        assert!(sets.multi_color.iter().all(|t| t.color == palette::BLACK));
    }

    #[test]
    fn multi_color_toggle_is_flat_on_the_wire() {
        let toggle: MultiColorToggle = serde_json::from_str(
            r#"{"name": "Den Light", "toggle": true, "red": 10, "green": 20, "blue": 30}"#,
        )
        .unwrap();
        assert_eq!(toggle.toggle.name, "Den Light");
        assert_eq!(toggle.color, RgbColor::new(10, 20, 30));
    }
}
