// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The bulb roster and command dispatch.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::command::BulbCommand;
use crate::device::{Bulb, BulbClient, BulbInfo};
use crate::error::{DeviceError, Error, SnapshotError};
use crate::types::{Brightness, RgbColor};

use super::snapshot::{ConnectionSettings, Snapshot};
use super::toggle::{Toggle, ToggleSets};

/// How a batch of commands is issued to its bulbs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FanOut {
    /// One bulb at a time, in batch order.
    Sequential,
    /// All bulbs at once, joined before the batch completes.
    #[default]
    Concurrent,
}

/// Outcome of a dispatched batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Number of commands the bulbs acknowledged.
    pub delivered: usize,
    /// Names of bulbs whose command failed.
    pub failed: Vec<String>,
}

impl DispatchReport {
    /// Returns true if no command in the batch failed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A batch of commands, one entry per bulb write.
pub type Batch<C> = Vec<(Arc<Bulb<C>>, BulbCommand)>;

/// Roster of bulbs shared by the controller and every scene.
///
/// The roster is fixed for the lifetime of the registry. Bulbs are looked up
/// by name; the default toggle sets are derived from the names once, when
/// the registry is built.
///
/// # Examples
///
/// ```no_run
/// use tuya_scenes::registry::{ConnectionSettings, DeviceRegistry, Snapshot};
/// # use tuya_scenes::device::{BulbClient, BulbInfo};
/// # fn example<C: BulbClient>(connect: impl FnMut(&BulbInfo) -> C) -> tuya_scenes::Result<()> {
/// let snapshot = Snapshot::load("snapshot.json")?;
/// let registry = DeviceRegistry::from_snapshot(&snapshot, &ConnectionSettings::new(), connect)?;
/// println!("{} bulbs", registry.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DeviceRegistry<C> {
    bulbs: Vec<Arc<Bulb<C>>>,
    toggles: ToggleSets,
    baseline_retry_limit: u32,
    fan_out: FanOut,
}

impl<C: BulbClient> DeviceRegistry<C> {
    /// Creates a registry from already connected bulbs.
    ///
    /// `baseline_retry_limit` is the retry limit restored whenever a scene
    /// ends.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::DuplicateName` if two bulbs share a name.
    pub fn new(bulbs: Vec<Bulb<C>>, baseline_retry_limit: u32) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        if let Some(dup) = bulbs.iter().find(|b| !seen.insert(b.name().to_string())) {
            return Err(SnapshotError::DuplicateName(dup.name().to_string()).into());
        }

        let toggles = ToggleSets::derive(bulbs.iter().map(Bulb::name));
        let bulbs: Vec<_> = bulbs.into_iter().map(Arc::new).collect();
        tracing::debug!(count = bulbs.len(), "Registered bulbs");

        Ok(Self {
            bulbs,
            toggles,
            baseline_retry_limit,
            fan_out: FanOut::default(),
        })
    }

    /// Creates a registry from a snapshot, connecting each bulb with `connect`.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::DuplicateName` if two devices share a name.
    pub fn from_snapshot<F>(
        snapshot: &Snapshot,
        settings: &ConnectionSettings,
        mut connect: F,
    ) -> Result<Self, Error>
    where
        F: FnMut(&BulbInfo) -> C,
    {
        let bulbs = snapshot
            .devices
            .iter()
            .map(|device| {
                let info = device.to_info(settings);
                let client = connect(&info);
                Bulb::new(info, client)
            })
            .collect();
        Self::new(bulbs, settings.retry_limit())
    }

    /// Sets how batches are issued.
    #[must_use]
    pub fn with_fan_out(mut self, fan_out: FanOut) -> Self {
        self.fan_out = fan_out;
        self
    }

    /// Returns every bulb in roster order.
    #[must_use]
    pub fn bulbs(&self) -> &[Arc<Bulb<C>>] {
        &self.bulbs
    }

    /// Returns the number of registered bulbs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bulbs.len()
    }

    /// Returns true if no bulbs are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bulbs.is_empty()
    }

    /// Looks a bulb up by name.
    ///
    /// # Errors
    ///
    /// Returns `Error::BulbNotFound` if no bulb has this name.
    pub fn find(&self, name: &str) -> Result<&Arc<Bulb<C>>, Error> {
        self.bulbs
            .iter()
            .find(|b| b.name() == name)
            .ok_or_else(|| Error::BulbNotFound(name.to_string()))
    }

    /// Returns the default toggle sets.
    #[must_use]
    pub fn toggles(&self) -> &ToggleSets {
        &self.toggles
    }

    /// Returns the configured fan-out.
    #[must_use]
    pub fn fan_out(&self) -> FanOut {
        self.fan_out
    }

    /// Pairs every enabled toggle with its bulb.
    ///
    /// Toggles naming unknown bulbs are skipped.
    #[must_use]
    pub fn resolve<'t>(&self, toggles: &'t [Toggle]) -> Vec<(Arc<Bulb<C>>, &'t Toggle)> {
        self.resolve_by(toggles, |toggle| toggle)
    }

    /// Like [`resolve`](Self::resolve), for items that carry a toggle.
    #[must_use]
    pub fn resolve_by<'t, T, F>(&self, items: &'t [T], toggle: F) -> Vec<(Arc<Bulb<C>>, &'t T)>
    where
        F: Fn(&T) -> &Toggle,
    {
        items
            .iter()
            .filter(|item| toggle(item).enabled)
            .filter_map(|item| self.lookup(&toggle(item).name).map(|bulb| (bulb, item)))
            .collect()
    }

    /// Looks up bulbs by name, skipping unknown names.
    #[must_use]
    pub fn resolve_names<S: AsRef<str>>(&self, names: &[S]) -> Vec<Arc<Bulb<C>>> {
        names
            .iter()
            .filter_map(|name| self.lookup(name.as_ref()))
            .collect()
    }

    fn lookup(&self, name: &str) -> Option<Arc<Bulb<C>>> {
        match self.find(name) {
            Ok(bulb) => Some(Arc::clone(bulb)),
            Err(_) => {
                tracing::debug!(bulb = %name, "Skipping unknown bulb");
                None
            }
        }
    }

    // =========================================================================
    // Retry limits
    // =========================================================================

    /// Returns the retry limit restored when scenes end.
    #[must_use]
    pub fn baseline_retry_limit(&self) -> u32 {
        self.baseline_retry_limit
    }

    /// Applies a retry limit to every bulb's connection.
    pub fn set_global_retry_limit(&self, limit: u32) {
        tracing::debug!(limit, "Setting retry limit on all bulbs");
        for bulb in &self.bulbs {
            bulb.set_retry_limit(limit);
        }
    }

    /// Restores the baseline retry limit on every bulb.
    pub fn restore_retry_limit(&self) {
        self.set_global_retry_limit(self.baseline_retry_limit);
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Sends a color to one bulb.
    ///
    /// # Errors
    ///
    /// Returns the client's `DeviceError`; the failure is also logged.
    pub async fn send_color(&self, bulb: &Bulb<C>, color: RgbColor) -> Result<(), DeviceError> {
        send_logged(bulb, BulbCommand::Color(color)).await
    }

    /// Switches one bulb on or off.
    ///
    /// # Errors
    ///
    /// Returns the client's `DeviceError`; the failure is also logged.
    pub async fn send_power(&self, bulb: &Bulb<C>, on: bool) -> Result<(), DeviceError> {
        send_logged(bulb, BulbCommand::Power(on)).await
    }

    /// Sends a brightness to one bulb.
    ///
    /// # Errors
    ///
    /// Returns the client's `DeviceError`; the failure is also logged.
    pub async fn send_brightness(
        &self,
        bulb: &Bulb<C>,
        brightness: Brightness,
    ) -> Result<(), DeviceError> {
        send_logged(bulb, BulbCommand::Brightness(brightness)).await
    }

    /// Sends every command in `batch`.
    ///
    /// A failing bulb never stops the others: failures are logged and
    /// counted in the report.
    pub async fn dispatch(&self, batch: Batch<C>) -> DispatchReport {
        let mut report = DispatchReport::default();

        match self.fan_out {
            FanOut::Sequential => {
                for (bulb, command) in batch {
                    record(&mut report, bulb.name(), send_logged(&*bulb, command).await);
                }
            }
            FanOut::Concurrent => {
                let mut tasks = JoinSet::new();
                for (bulb, command) in batch {
                    tasks.spawn(async move {
                        let result = send_logged(&*bulb, command).await;
                        (bulb, result)
                    });
                }
                while let Some(joined) = tasks.join_next().await {
                    match joined {
                        Ok((bulb, result)) => record(&mut report, bulb.name(), result),
                        Err(e) => tracing::warn!(error = %e, "Bulb command task failed"),
                    }
                }
            }
        }

        report
    }
}

async fn send_logged<C: BulbClient>(
    bulb: &Bulb<C>,
    command: BulbCommand,
) -> Result<(), DeviceError> {
    let result = bulb.send(command).await;
    match &result {
        Ok(()) => tracing::debug!(bulb = %bulb.name(), %command, "Command delivered"),
        Err(e) => tracing::warn!(bulb = %bulb.name(), %command, error = %e, "Command failed"),
    }
    result
}

fn record(report: &mut DispatchReport, name: &str, result: Result<(), DeviceError>) {
    match result {
        Ok(()) => report.delivered += 1,
        Err(_) => report.failed.push(name.to_string()),
    }
}
