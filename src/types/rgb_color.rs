// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type.
//!
//! Bulbs take colors as three 8-bit channels. Request bodies carry them as
//! `{"red": .., "green": .., "blue": ..}` objects, which is exactly the serde
//! representation of [`RgbColor`].

use std::fmt;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use tuya_scenes::types::RgbColor;
///
/// let color = RgbColor::new(255, 128, 0);
/// assert_eq!(color.red(), 255);
/// assert_eq!(color.max_channel(), 255);
/// assert_eq!(color.min_nonzero_channel(), Some(128));
/// assert_eq!(color.to_string(), "(255, 128, 0)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Creates a grey with every channel set to `level`.
    ///
    /// Bulbs without a separate white channel are dimmed this way during the
    /// lightning scene.
    #[must_use]
    pub const fn grey(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the channels as a `[red, green, blue]` array.
    #[must_use]
    pub const fn channels(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Returns the brightest channel value.
    #[must_use]
    pub fn max_channel(&self) -> u8 {
        self.red.max(self.green).max(self.blue)
    }

    /// Returns the dimmest channel that is not zero, if any.
    #[must_use]
    pub fn min_nonzero_channel(&self) -> Option<u8> {
        self.channels().into_iter().filter(|&c| c != 0).min()
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        super::palette::WHITE
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_helpers() {
        let color = RgbColor::new(10, 5, 0);
        assert_eq!(color.max_channel(), 10);
        assert_eq!(color.min_nonzero_channel(), Some(5));
        assert_eq!(color.channels(), [10, 5, 0]);
        assert_eq!(RgbColor::grey(0).min_nonzero_channel(), None);
        assert_eq!(RgbColor::grey(7), RgbColor::new(7, 7, 7));
    }

    #[test]
    fn display_as_triple() {
        assert_eq!(RgbColor::new(128, 64, 0).to_string(), "(128, 64, 0)");
    }

    #[test]
    fn serde_uses_channel_names() {
        let color: RgbColor =
            serde_json::from_str(r#"{"red": 255, "green": 128, "blue": 0}"#).unwrap();
        assert_eq!(color, RgbColor::new(255, 128, 0));

        let json = serde_json::to_value(RgbColor::new(1, 2, 3)).unwrap();
        assert_eq!(json, serde_json::json!({"red": 1, "green": 2, "blue": 3}));
    }

    #[test]
    fn serde_rejects_out_of_range_channel() {
        let result = serde_json::from_str::<RgbColor>(r#"{"red": 256, "green": 0, "blue": 0}"#);
        assert!(result.is_err());
    }
}
