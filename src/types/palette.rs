// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named colors used as request defaults and scene inputs.

use super::RgbColor;

pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);
pub const WHITE: RgbColor = RgbColor::new(255, 255, 255);
pub const RED: RgbColor = RgbColor::new(255, 0, 0);
pub const GREEN: RgbColor = RgbColor::new(0, 255, 0);
pub const BLUE: RgbColor = RgbColor::new(0, 0, 255);
pub const ROSE: RgbColor = RgbColor::new(255, 0, 128);
pub const MAGENTA: RgbColor = RgbColor::new(255, 0, 255);
pub const VIOLET: RgbColor = RgbColor::new(128, 0, 255);
pub const AZURE: RgbColor = RgbColor::new(0, 128, 255);
pub const CYAN: RgbColor = RgbColor::new(0, 255, 255);
pub const SPRING_GREEN: RgbColor = RgbColor::new(0, 255, 128);
pub const CHARTREUSE: RgbColor = RgbColor::new(128, 255, 0);
pub const YELLOW: RgbColor = RgbColor::new(255, 255, 0);
pub const ORANGE: RgbColor = RgbColor::new(255, 128, 0);

/// Every chromatic palette entry. Black and white are left out.
pub const ALL_COLORS: [RgbColor; 12] = [
    RED,
    GREEN,
    BLUE,
    ROSE,
    MAGENTA,
    VIOLET,
    AZURE,
    CYAN,
    SPRING_GREEN,
    CHARTREUSE,
    YELLOW,
    ORANGE,
];

/// Colors cycled by the grouped scene when a request names none.
pub const GROUPED_CYCLE_COLORS: [RgbColor; 5] = [ORANGE, ROSE, AZURE, CHARTREUSE, VIOLET];
