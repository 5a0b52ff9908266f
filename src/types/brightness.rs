// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for the bulb's white channel.
//!
//! Tuya colour bulbs take brightness on a 10-1000 scale; values outside that
//! range are rejected by the device, so they are rejected here first.

use std::fmt;

use crate::error::ValueError;

/// Brightness level on the bulb's native 10-1000 scale.
///
/// # Examples
///
/// ```
/// use tuya_scenes::types::Brightness;
///
/// let level = Brightness::new(500).unwrap();
/// assert_eq!(level.value(), 500);
///
/// assert!(Brightness::new(5).is_err());
/// assert_eq!(Brightness::clamped(5000), Brightness::MAX);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct Brightness(u16);

impl Brightness {
    /// Dimmest value the bulb accepts.
    pub const MIN: Self = Self(10);

    /// Brightest value the bulb accepts.
    pub const MAX: Self = Self(1000);

    /// Creates a new brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside 10-1000.
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if !(Self::MIN.0..=Self::MAX.0).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: Self::MIN.0,
                max: Self::MAX.0,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Creates a brightness value, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u16) -> Self {
        if value < Self::MIN.0 {
            Self::MIN
        } else if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Returns the raw brightness value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Brightness {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Brightness> for u16 {
    fn from(value: Brightness) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_bounds() {
        assert_eq!(Brightness::new(10).unwrap(), Brightness::MIN);
        assert_eq!(Brightness::new(1000).unwrap(), Brightness::MAX);
        assert!(Brightness::new(9).is_err());
        assert!(Brightness::new(1001).is_err());
    }

    #[test]
    fn brightness_clamped() {
        assert_eq!(Brightness::clamped(0), Brightness::MIN);
        assert_eq!(Brightness::clamped(400).value(), 400);
        assert_eq!(Brightness::clamped(u16::MAX), Brightness::MAX);
    }

    #[test]
    fn brightness_deserialize_validates() {
        let ok: Brightness = serde_json::from_str("250").unwrap();
        assert_eq!(ok.value(), 250);
        assert!(serde_json::from_str::<Brightness>("2").is_err());
    }
}
