// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed request bodies.
//!
//! Field names follow the JSON bodies the command surface accepts. Every
//! field that may be omitted has a serde default; omitted toggle lists are
//! `None` and resolve to the registry's default sets.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::registry::{MultiColorToggle, Toggle, ToggleSets};
use crate::scene::{
    AlternatingScene, GroupedCycleScene, LightningParams, LightningScene, RandomPerBulbScene,
};
use crate::types::{Brightness, RgbColor, palette};

/// Inter-tick wait used when a scene request omits `wait_time`, in seconds.
pub const DEFAULT_WAIT_TIME: f64 = 600.0;

const fn default_wait_time() -> f64 {
    DEFAULT_WAIT_TIME
}

const fn default_power() -> bool {
    true
}

fn default_grouped_colors() -> Vec<RgbColor> {
    palette::GROUPED_CYCLE_COLORS.to_vec()
}

fn default_random_colors() -> Vec<RgbColor> {
    palette::ALL_COLORS.to_vec()
}

const fn default_strike_color() -> RgbColor {
    palette::WHITE
}

const fn default_percent_chance() -> u8 {
    20
}

const fn default_strike_length() -> f64 {
    0.4
}

const fn default_ambient_level() -> u8 {
    10
}

const fn default_storm_range() -> [u8; 2] {
    [15, 50]
}

const fn default_wait_range() -> [f64; 2] {
    [0.25, 1.0]
}

/// Converts seconds from a request body into a [`Duration`].
///
/// # Errors
///
/// Returns `ConfigurationError::InvalidDuration` for negative, infinite or
/// NaN values.
pub fn seconds(value: f64) -> Result<Duration, ConfigurationError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigurationError::InvalidDuration(value))
}

/// Converts seconds to whole milliseconds, truncating.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncated_millis(value: f64) -> Result<u64, ConfigurationError> {
    seconds(value)?;
    Ok((value * 1000.0) as u64)
}

/// Switch bulbs on or off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerRequest {
    /// Target power state.
    #[serde(default = "default_power")]
    pub power: bool,
    /// Bulbs to switch; defaults to every bulb.
    #[serde(default)]
    pub toggles: Option<Vec<Toggle>>,
}

impl PowerRequest {
    /// Switches every bulb to `power`.
    #[must_use]
    pub fn all(power: bool) -> Self {
        Self {
            power,
            toggles: None,
        }
    }
}

/// Set one color on many bulbs, scaled per toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRequest {
    #[serde(flatten)]
    pub color: RgbColor,
    #[serde(default)]
    pub toggles: Option<Vec<Toggle>>,
}

impl ColorRequest {
    /// Sends `color` to every bulb with its default multiplier.
    #[must_use]
    pub fn all(color: RgbColor) -> Self {
        Self {
            color,
            toggles: None,
        }
    }
}

/// Set a distinct color per bulb.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiColorRequest {
    #[serde(default)]
    pub toggles: Option<Vec<MultiColorToggle>>,
}

/// Set the white-channel brightness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrightnessRequest {
    pub brightness: Brightness,
    #[serde(default)]
    pub toggles: Option<Vec<Toggle>>,
}

impl BrightnessRequest {
    /// Sets `brightness` on every bulb.
    #[must_use]
    pub fn all(brightness: Brightness) -> Self {
        Self {
            brightness,
            toggles: None,
        }
    }
}

/// Start the red/green alternating scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternatingRequest {
    /// Seconds between swaps.
    #[serde(default = "default_wait_time")]
    pub wait_time: f64,
}

impl Default for AlternatingRequest {
    fn default() -> Self {
        Self {
            wait_time: DEFAULT_WAIT_TIME,
        }
    }
}

impl AlternatingRequest {
    /// Builds the scene.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidDuration` for a bad `wait_time`.
    pub fn into_scene(self) -> Result<AlternatingScene, ConfigurationError> {
        Ok(AlternatingScene::new(seconds(self.wait_time)?))
    }
}

/// Start the grouped color cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedCycleRequest {
    #[serde(default = "default_wait_time")]
    pub wait_time: f64,
    /// Bulb groups; defaults to the registry's scene groups.
    #[serde(default)]
    pub bulb_lists: Option<Vec<Vec<Toggle>>>,
    #[serde(rename = "colour_list", default = "default_grouped_colors")]
    pub colors: Vec<RgbColor>,
}

impl Default for GroupedCycleRequest {
    fn default() -> Self {
        Self {
            wait_time: DEFAULT_WAIT_TIME,
            bulb_lists: None,
            colors: default_grouped_colors(),
        }
    }
}

impl GroupedCycleRequest {
    /// Builds the scene, filling omitted groups from `defaults`.
    ///
    /// # Errors
    ///
    /// Returns the scene's validation error, or `InvalidDuration`.
    pub fn into_scene(self, defaults: &ToggleSets) -> Result<GroupedCycleScene, ConfigurationError> {
        let groups = self
            .bulb_lists
            .unwrap_or_else(|| defaults.scene_groups.clone());
        GroupedCycleScene::new(groups, self.colors, seconds(self.wait_time)?)
    }
}

/// Start the per-bulb random color cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomCycleRequest {
    #[serde(default = "default_wait_time")]
    pub wait_time: f64,
    #[serde(default)]
    pub toggles: Option<Vec<Toggle>>,
    #[serde(rename = "colour_list", default = "default_random_colors")]
    pub colors: Vec<RgbColor>,
}

impl Default for RandomCycleRequest {
    fn default() -> Self {
        Self {
            wait_time: DEFAULT_WAIT_TIME,
            toggles: None,
            colors: default_random_colors(),
        }
    }
}

impl RandomCycleRequest {
    /// Builds the scene, filling omitted toggles from `defaults`.
    ///
    /// # Errors
    ///
    /// Returns the scene's validation error, or `InvalidDuration`.
    pub fn into_scene(self, defaults: &ToggleSets) -> Result<RandomPerBulbScene, ConfigurationError> {
        let toggles = self.toggles.unwrap_or_else(|| defaults.commands.clone());
        RandomPerBulbScene::new(toggles, self.colors, seconds(self.wait_time)?)
    }
}

/// Start the lightning storm.
///
/// Ranges are half-open `[low, high)`. The wait range is given in seconds
/// and sampled in whole milliseconds, so sub-millisecond precision is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightningRequest {
    #[serde(rename = "lightning_colour", default = "default_strike_color")]
    pub strike_color: RgbColor,
    #[serde(rename = "lightning_percent_chance", default = "default_percent_chance")]
    pub percent_chance: u8,
    /// Strike length in seconds.
    #[serde(rename = "lightning_length", default = "default_strike_length")]
    pub strike_length: f64,
    /// Ambient grey level of the lead bulb.
    #[serde(rename = "default_brightness", default = "default_ambient_level")]
    pub ambient_level: u8,
    #[serde(default = "default_storm_range")]
    pub storm_brightness_range: [u8; 2],
    /// Inter-tick wait range in seconds.
    #[serde(default = "default_wait_range")]
    pub wait_time_range: [f64; 2],
    /// Storm bulbs, lead first; defaults to the registry's lightning set.
    #[serde(default)]
    pub toggles: Option<Vec<Toggle>>,
}

impl Default for LightningRequest {
    fn default() -> Self {
        Self {
            strike_color: default_strike_color(),
            percent_chance: default_percent_chance(),
            strike_length: default_strike_length(),
            ambient_level: default_ambient_level(),
            storm_brightness_range: default_storm_range(),
            wait_time_range: default_wait_range(),
            toggles: None,
        }
    }
}

impl LightningRequest {
    /// Converts the request into scene parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDuration` for a bad length or wait bound. Range and
    /// chance checks happen when the scene is built.
    pub fn params(&self) -> Result<LightningParams, ConfigurationError> {
        let [storm_low, storm_high] = self.storm_brightness_range;
        let [wait_low, wait_high] = self.wait_time_range;
        Ok(LightningParams {
            strike_color: self.strike_color,
            percent_chance: self.percent_chance,
            strike_length: seconds(self.strike_length)?,
            ambient_level: self.ambient_level,
            storm_brightness: storm_low..storm_high,
            wait_ms: truncated_millis(wait_low)?..truncated_millis(wait_high)?,
        })
    }

    /// Returns the enabled storm bulb names, or `defaults` when omitted.
    #[must_use]
    pub fn bulb_names(&self, defaults: &ToggleSets) -> Vec<String> {
        match &self.toggles {
            Some(toggles) => toggles
                .iter()
                .filter(|t| t.enabled)
                .map(|t| t.name.clone())
                .collect(),
            None => defaults.lightning.clone(),
        }
    }
}
