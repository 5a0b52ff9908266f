// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory bulb client for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::{BulbClient, BulbInfo};
use crate::error::DeviceError;
use crate::registry::DeviceRegistry;
use crate::types::{Brightness, RgbColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    Power(bool),
    Color(RgbColor),
    Brightness(Brightness),
}

/// Ordered record of every call made to every client sharing it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<(String, Call)>>>);

impl Journal {
    pub(crate) fn entries(&self) -> Vec<(String, Call)> {
        self.0.lock().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub(crate) fn calls_to(&self, name: &str) -> Vec<Call> {
        self.0
            .lock()
            .iter()
            .filter(|(bulb, _)| bulb == name)
            .map(|(_, call)| *call)
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.0.lock().clear();
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RecordingClient {
    name: String,
    journal: Journal,
    offline: Arc<AtomicBool>,
    retry_limit: Arc<AtomicU32>,
    latency: Arc<Mutex<Duration>>,
}

impl RecordingClient {
    pub(crate) fn new(name: &str) -> Self {
        Self::with_journal(name, &Journal::default())
    }

    pub(crate) fn with_journal(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            offline: Arc::new(AtomicBool::new(false)),
            retry_limit: Arc::new(AtomicU32::new(0)),
            latency: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.journal.calls_to(&self.name)
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(crate) fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    pub(crate) fn retry_limit(&self) -> u32 {
        self.retry_limit.load(Ordering::SeqCst)
    }

    async fn record(&self, call: Call) -> Result<(), DeviceError> {
        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(DeviceError::Unreachable {
                bulb: self.name.clone(),
                reason: "connection refused".to_string(),
            });
        }
        self.journal.0.lock().push((self.name.clone(), call));
        Ok(())
    }
}

impl BulbClient for RecordingClient {
    async fn turn_on(&self) -> Result<(), DeviceError> {
        self.record(Call::Power(true)).await
    }

    async fn turn_off(&self) -> Result<(), DeviceError> {
        self.record(Call::Power(false)).await
    }

    async fn set_color(&self, color: RgbColor) -> Result<(), DeviceError> {
        self.record(Call::Color(color)).await
    }

    async fn set_brightness(&self, brightness: Brightness) -> Result<(), DeviceError> {
        self.record(Call::Brightness(brightness)).await
    }

    fn set_retry_limit(&self, limit: u32) {
        self.retry_limit.store(limit, Ordering::SeqCst);
    }
}

pub(crate) fn info(name: &str) -> BulbInfo {
    BulbInfo {
        name: name.to_string(),
        device_id: format!("id-{}", name.to_lowercase().replace(' ', "-")),
        address: "192.168.1.50".to_string(),
        local_key: "0123456789abcdef".to_string(),
        version: "3.3".to_string(),
        connection_timeout: Duration::from_secs(10),
        retry_limit: 1,
    }
}

/// Builds a registry of recording bulbs that all write to one journal.
pub(crate) fn registry(names: &[&str]) -> (DeviceRegistry<RecordingClient>, Journal) {
    let journal = Journal::default();
    let bulbs = names
        .iter()
        .map(|name| {
            super::Bulb::new(info(name), RecordingClient::with_journal(name, &journal))
        })
        .collect();
    let registry = DeviceRegistry::new(bulbs, 1).expect("test bulb names are unique");
    (registry, journal)
}
