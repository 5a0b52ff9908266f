// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Primitive bulb commands.
//!
//! Every write this crate makes to a bulb is one of the three primitives the
//! vendor SDK accepts: power, color or brightness. Immediate commands and
//! scene ticks both build batches of `(bulb, BulbCommand)` pairs and hand them
//! to [`DeviceRegistry::dispatch`](crate::registry::DeviceRegistry::dispatch).
//!
//! # Examples
//!
//! ```
//! use tuya_scenes::command::BulbCommand;
//! use tuya_scenes::types::{palette, Brightness};
//!
//! let on = BulbCommand::Power(true);
//! assert_eq!(on.name(), "turn_on");
//!
//! let red = BulbCommand::Color(palette::RED);
//! assert_eq!(red.to_string(), "set_colour (255, 0, 0)");
//!
//! let dim = BulbCommand::Brightness(Brightness::MIN);
//! assert_eq!(dim.to_string(), "set_brightness 10");
//! ```

use std::fmt;

use crate::types::{Brightness, RgbColor};

/// A single command addressed to one bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulbCommand {
    /// Switch the bulb on (`true`) or off (`false`).
    Power(bool),
    /// Switch the bulb to color mode with this color.
    Color(RgbColor),
    /// Set the white-channel brightness.
    Brightness(Brightness),
}

impl BulbCommand {
    /// Returns the SDK name of the primitive this command maps to.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Power(true) => "turn_on",
            Self::Power(false) => "turn_off",
            Self::Color(_) => "set_colour",
            Self::Brightness(_) => "set_brightness",
        }
    }
}

impl fmt::Display for BulbCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Power(_) => f.write_str(self.name()),
            Self::Color(color) => write!(f, "{} {color}", self.name()),
            Self::Brightness(level) => write!(f, "{} {level}", self.name()),
        }
    }
}

impl From<RgbColor> for BulbCommand {
    fn from(color: RgbColor) -> Self {
        Self::Color(color)
    }
}

impl From<Brightness> for BulbCommand {
    fn from(level: Brightness) -> Self {
        Self::Brightness(level)
    }
}
