// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for bulb control.
//!
//! - [`RgbColor`] - 8-bit RGB triple
//! - [`Brightness`] - white-channel brightness (10-1000)
//! - [`palette`] - named colors and default color lists

mod brightness;
pub mod palette;
mod rgb_color;

pub use brightness::Brightness;
pub use rgb_color::RgbColor;
