// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulbs and the client seam to the vendor SDK.
//!
//! The wire protocol spoken to the bulbs lives outside this crate. A
//! [`BulbClient`] is whatever owns the persistent socket to one bulb: it takes
//! the four SDK primitives and a retry limit, and handles connection timeouts
//! and retries itself. This crate never retries a failed call.
//!
//! Every bulb has its own client, so calls to different bulbs may run
//! concurrently.

#[cfg(test)]
pub(crate) mod mock;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use parking_lot::RwLock;

use crate::command::BulbCommand;
use crate::error::DeviceError;
use crate::state::BulbState;
use crate::types::{Brightness, RgbColor};

/// Connection to a single bulb.
///
/// Implementations wrap the vendor SDK's device object. Each call blocks the
/// returned future until the bulb acknowledges, the SDK's own retries are
/// exhausted, or the connection timeout fires.
pub trait BulbClient: Send + Sync + 'static {
    /// Switches the bulb on.
    fn turn_on(&self) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Switches the bulb off.
    fn turn_off(&self) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Switches the bulb to color mode with the given color.
    fn set_color(&self, color: RgbColor) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Sets the white-channel brightness.
    fn set_brightness(
        &self,
        brightness: Brightness,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Sets how many times the SDK retries a command on a dropped socket.
    fn set_retry_limit(&self, limit: u32);
}

/// Static identity and connection parameters of a bulb.
#[derive(Clone, PartialEq, Eq)]
pub struct BulbInfo {
    /// Unique display name, used to address the bulb in toggles.
    pub name: String,
    /// Vendor device id.
    pub device_id: String,
    /// Network address of the bulb.
    pub address: String,
    /// Local encryption key.
    pub local_key: String,
    /// Protocol version string, e.g. `"3.3"`.
    pub version: String,
    /// Socket connection timeout.
    pub connection_timeout: Duration,
    /// Retry limit applied when the bulb is registered.
    pub retry_limit: u32,
}

impl fmt::Debug for BulbInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulbInfo")
            .field("name", &self.name)
            .field("device_id", &self.device_id)
            .field("address", &self.address)
            .field("local_key", &"<redacted>")
            .field("version", &self.version)
            .field("connection_timeout", &self.connection_timeout)
            .field("retry_limit", &self.retry_limit)
            .finish()
    }
}

/// A registered bulb: its identity, its client and its last delivered state.
pub struct Bulb<C> {
    info: BulbInfo,
    client: C,
    state: RwLock<BulbState>,
}

impl<C: BulbClient> Bulb<C> {
    /// Creates a bulb and applies `info.retry_limit` to its client.
    pub fn new(info: BulbInfo, client: C) -> Self {
        client.set_retry_limit(info.retry_limit);
        Self {
            info,
            client,
            state: RwLock::new(BulbState::new()),
        }
    }

    /// Returns the bulb's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Returns the bulb's identity and connection parameters.
    #[must_use]
    pub fn info(&self) -> &BulbInfo {
        &self.info
    }

    /// Returns the underlying client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns a snapshot of the last delivered state.
    #[must_use]
    pub fn state(&self) -> BulbState {
        *self.state.read()
    }

    /// Sends one command and records it on success.
    ///
    /// # Errors
    ///
    /// Returns the client's [`DeviceError`] unchanged.
    pub async fn send(&self, command: BulbCommand) -> Result<(), DeviceError> {
        match command {
            BulbCommand::Power(true) => self.client.turn_on().await,
            BulbCommand::Power(false) => self.client.turn_off().await,
            BulbCommand::Color(color) => self.client.set_color(color).await,
            BulbCommand::Brightness(level) => self.client.set_brightness(level).await,
        }?;
        self.state.write().apply(command);
        Ok(())
    }

    pub(crate) fn set_retry_limit(&self, limit: u32) {
        self.client.set_retry_limit(limit);
    }
}

impl<C> fmt::Debug for Bulb<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bulb")
            .field("info", &self.info)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}
