// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb roster, default toggles and command dispatch.
//!
//! A [`DeviceRegistry`] is built once at startup, usually from a
//! [`Snapshot`], and shared by `Arc` between the controller and every scene.
//! It owns the bulbs; everything else refers to them by name through
//! [`Toggle`]s.

mod device_registry;
mod snapshot;
mod toggle;

pub use device_registry::{Batch, DeviceRegistry, DispatchReport, FanOut};
pub use snapshot::{ConnectionSettings, Snapshot, SnapshotDevice};
pub use toggle::{
    BLACK_LAMP, DEN_LIGHT, LIGHT_MARKER, LIGHTNING_BULBS, MultiColorToggle, Toggle, ToggleSets,
    WHITE_LAMP, WOOD_LAMP, classify, is_light,
};
