// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `tuya_scenes` - Commands and lighting scenes for a room of smart bulbs.
//!
//! This library sits between a command surface (HTTP, CLI, anything that can
//! produce the typed requests in [`controller`]) and the vendor SDK that
//! talks to each bulb. It provides:
//!
//! - **Immediate commands**: power, color, per-bulb colors and brightness
//! - **Per-bulb brightness correction**: colors are scaled by each bulb's
//!   multiplier so lamps and ceiling lights look alike
//! - **Scenes**: alternating red/green, grouped color cycle, per-bulb random
//!   colors and a lightning storm
//! - **A single-slot scheduler**: starting a scene preempts the running one
//!   cleanly, and every wait is cancellable within one poll interval
//!
//! The bulb protocol itself is not part of this crate. Implement
//! [`BulbClient`] over your SDK and build a [`DeviceRegistry`] from the bulbs.
//!
//! # Quick Start
//!
//! ```no_run
//! use tuya_scenes::device::{BulbClient, BulbInfo};
//! use tuya_scenes::error::DeviceError;
//! use tuya_scenes::types::{Brightness, RgbColor};
//! use tuya_scenes::{
//!     ColorRequest, ConnectionSettings, Controller, DeviceRegistry, LightningRequest, Snapshot,
//! };
//!
//! struct SdkClient {
//!     address: String,
//! }
//!
//! impl BulbClient for SdkClient {
//!     async fn turn_on(&self) -> Result<(), DeviceError> {
//!         Ok(())
//!     }
//!     async fn turn_off(&self) -> Result<(), DeviceError> {
//!         Ok(())
//!     }
//!     async fn set_color(&self, _color: RgbColor) -> Result<(), DeviceError> {
//!         Ok(())
//!     }
//!     async fn set_brightness(&self, _level: Brightness) -> Result<(), DeviceError> {
//!         Ok(())
//!     }
//!     fn set_retry_limit(&self, _limit: u32) {}
//! }
//!
//! #[tokio::main]
//! async fn main() -> tuya_scenes::Result<()> {
//!     let snapshot = Snapshot::load("snapshot.json")?;
//!     let registry =
//!         DeviceRegistry::from_snapshot(&snapshot, &ConnectionSettings::new(), |info: &BulbInfo| {
//!             SdkClient {
//!                 address: info.address.clone(),
//!             }
//!         })?;
//!     let controller = Controller::new(registry);
//!
//!     controller.set_color(ColorRequest::all(RgbColor::new(255, 120, 0))).await?;
//!     controller.start_lightning_scene(LightningRequest::default()).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! Everything is reported through [`tracing`]. The library never installs a
//! subscriber.

pub mod command;
pub mod controller;
pub mod device;
pub mod error;
pub mod registry;
pub mod scaler;
pub mod scene;
pub mod scheduler;
pub mod state;
pub mod types;

pub use command::BulbCommand;
pub use controller::{
    AlternatingRequest, BrightnessRequest, ColorRequest, Controller, GroupedCycleRequest,
    LightningRequest, MultiColorRequest, PowerRequest, RandomCycleRequest,
};
pub use device::{Bulb, BulbClient, BulbInfo};
pub use error::{ConfigurationError, DeviceError, Error, Result, SnapshotError, ValueError};
pub use registry::{
    ConnectionSettings, DeviceRegistry, DispatchReport, FanOut, MultiColorToggle, Snapshot,
    Toggle, ToggleSets,
};
pub use scene::{SceneDescriptor, SceneKind};
pub use scheduler::{SceneInfo, SceneScheduler, SceneToken, SchedulerConfig};
pub use state::BulbState;
pub use types::{Brightness, RgbColor};
