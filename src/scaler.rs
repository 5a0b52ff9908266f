// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-bulb brightness scaling of RGB colors.
//!
//! Some bulbs are visibly dimmer or brighter than others at the same RGB
//! value, so every toggle carries a multiplier. Scaling keeps the hue: all
//! channels move by the same factor, and that factor is clamped so that
//! brightening never pushes the brightest channel past 255 and dimming never
//! rounds the dimmest non-zero channel down to zero.

use crate::error::ConfigurationError;
use crate::types::RgbColor;

/// Scales `color` by `multiplier`.
///
/// - `multiplier == 1`: the color is returned unchanged.
/// - `multiplier > 1`: the factor is capped at `round(256 / peak, 2)` where
///   `peak` is the brightest channel; channels saturate at 255. A black
///   color has nothing to brighten and is returned unchanged.
/// - `multiplier < 1`: the factor is floored at `round(1 / low, 2)` where
///   `low` is the dimmest non-zero channel.
///
/// Channel results are truncated toward zero.
///
/// # Errors
///
/// Returns [`ConfigurationError::ZeroColor`] when dimming a black color, and
/// [`ConfigurationError::InvalidMultiplier`] for negative or non-finite
/// multipliers.
///
/// # Examples
///
/// ```
/// use tuya_scenes::scaler::scale;
/// use tuya_scenes::types::RgbColor;
///
/// let doubled = scale(RgbColor::new(128, 64, 0), 2.0).unwrap();
/// assert_eq!(doubled, RgbColor::new(255, 128, 0));
///
/// let halved = scale(RgbColor::new(200, 100, 0), 0.5).unwrap();
/// assert_eq!(halved, RgbColor::new(100, 50, 0));
/// ```
pub fn scale(color: RgbColor, multiplier: f64) -> Result<RgbColor, ConfigurationError> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(ConfigurationError::InvalidMultiplier(multiplier));
    }

    if multiplier > 1.0 {
        let peak = color.max_channel();
        if peak == 0 {
            return Ok(color);
        }
        let max_mul = round_hundredths(256.0 / f64::from(peak));
        Ok(apply(color, multiplier.min(max_mul)))
    } else if multiplier < 1.0 {
        let low = color
            .min_nonzero_channel()
            .ok_or(ConfigurationError::ZeroColor)?;
        let min_mul = round_hundredths(1.0 / f64::from(low));
        Ok(apply(color, multiplier.max(min_mul)))
    } else {
        Ok(color)
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn apply(color: RgbColor, factor: f64) -> RgbColor {
    let [r, g, b] = color
        .channels()
        .map(|c| (f64::from(c) * factor).clamp(0.0, 255.0) as u8);
    RgbColor::new(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::palette;

    #[test]
    fn unit_multiplier_is_identity() {
        let color = RgbColor::new(12, 34, 56);
        assert_eq!(scale(color, 1.0).unwrap(), color);
        assert_eq!(scale(palette::BLACK, 1.0).unwrap(), palette::BLACK);
    }

    #[test]
    fn brightening_saturates_at_255() {
        let scaled = scale(RgbColor::new(200, 100, 0), 3.0).unwrap();
        assert_eq!(scaled, RgbColor::new(255, 128, 0));
    }

    #[test]
    fn brightening_never_dims() {
        for peak in 1..=255u8 {
            for multiplier in [1.01, 1.5, 2.0, 10.0, 1000.0] {
                let scaled = scale(RgbColor::new(peak, peak / 2, 0), multiplier).unwrap();
                assert!(scaled.red() >= peak);
                assert!(scaled.green() >= peak / 2);
            }
        }
    }

    #[test]
    fn brightening_black_is_unchanged() {
        assert_eq!(scale(palette::BLACK, 2.0).unwrap(), palette::BLACK);
    }

    #[test]
    fn dimming_respects_the_floor() {
        let scaled = scale(RgbColor::new(10, 5, 0), 0.1).unwrap();
        assert_eq!(scaled, RgbColor::new(2, 1, 0));
        assert_ne!(scaled.red(), 0);
    }

    #[test]
    fn dimming_below_the_floor_stops_at_the_floor() {
        for multiplier in [0.0, 0.001, 0.1, 0.2] {
            let scaled = scale(RgbColor::new(10, 5, 0), multiplier).unwrap();
            assert_eq!(scaled, RgbColor::new(2, 1, 0), "multiplier {multiplier}");
        }
    }

    #[test]
    fn dimming_black_is_a_configuration_error() {
        assert_eq!(
            scale(palette::BLACK, 0.5),
            Err(ConfigurationError::ZeroColor)
        );
    }

    #[test]
    fn halving_a_lamp_color() {
        assert_eq!(
            scale(palette::ORANGE, 0.5).unwrap(),
            RgbColor::new(127, 64, 0)
        );
    }

    #[test]
    fn rejects_bad_multipliers() {
        assert!(scale(palette::RED, -1.0).is_err());
        assert!(scale(palette::RED, f64::NAN).is_err());
        assert!(scale(palette::RED, f64::INFINITY).is_err());
    }
}
