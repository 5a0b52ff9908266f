// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-known bulb state.
//!
//! Tuya bulbs are written to far more often than they are read, so the state
//! kept here is what this process last delivered successfully, not what the
//! bulb reports.

use crate::command::BulbCommand;
use crate::types::{Brightness, RgbColor};

/// The last values successfully delivered to one bulb.
///
/// # Examples
///
/// ```
/// use tuya_scenes::command::BulbCommand;
/// use tuya_scenes::state::BulbState;
/// use tuya_scenes::types::palette;
///
/// let mut state = BulbState::new();
/// assert_eq!(state.power(), None);
///
/// state.apply(BulbCommand::Power(true));
/// state.apply(BulbCommand::Color(palette::CYAN));
/// assert_eq!(state.power(), Some(true));
/// assert_eq!(state.color(), Some(palette::CYAN));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct BulbState {
    power: Option<bool>,
    color: Option<RgbColor>,
    brightness: Option<Brightness>,
}

impl BulbState {
    /// Creates an empty state where nothing has been delivered yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a delivered command.
    pub fn apply(&mut self, command: BulbCommand) {
        match command {
            BulbCommand::Power(on) => self.power = Some(on),
            BulbCommand::Color(color) => self.color = Some(color),
            BulbCommand::Brightness(level) => self.brightness = Some(level),
        }
    }

    /// Returns the last delivered power state.
    #[must_use]
    pub fn power(&self) -> Option<bool> {
        self.power
    }

    /// Returns the last delivered color.
    #[must_use]
    pub fn color(&self) -> Option<RgbColor> {
        self.color
    }

    /// Returns the last delivered brightness.
    #[must_use]
    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_commands_overwrite_earlier_ones() {
        let mut state = BulbState::new();
        state.apply(BulbCommand::Power(true));
        state.apply(BulbCommand::Power(false));
        state.apply(BulbCommand::Brightness(Brightness::MAX));
        assert_eq!(state.power(), Some(false));
        assert_eq!(state.brightness(), Some(Brightness::MAX));
        assert_eq!(state.color(), None);
    }
}
