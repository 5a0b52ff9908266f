// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loading the bulb roster from a device snapshot.
//!
//! The snapshot is the JSON file produced by the vendor's network scan:
//!
//! ```json
//! { "devices": [ { "name": "Den Light", "id": "...", "ip": "192.168.1.50",
//!                  "key": "...", "ver": "3.3" } ] }
//! ```
//!
//! Extra fields written by the scanner are ignored. The file is read once at
//! startup and never written back.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::device::BulbInfo;
use crate::error::SnapshotError;

/// A parsed device snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Devices in roster order.
    pub devices: Vec<SnapshotDevice>,
}

/// One device entry of a snapshot.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDevice {
    /// Display name.
    pub name: String,
    /// Vendor device id.
    pub id: String,
    /// Network address.
    pub ip: String,
    /// Local encryption key.
    pub key: String,
    /// Protocol version. Scanners write it as either `"3.3"` or `3.3`.
    #[serde(deserialize_with = "version_string")]
    pub ver: String,
}

impl std::fmt::Debug for SnapshotDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotDevice")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("ip", &self.ip)
            .field("key", &"<redacted>")
            .field("ver", &self.ver)
            .finish()
    }
}

fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Version {
        Text(String),
        Number(f64),
    }

    Ok(match Version::deserialize(deserializer)? {
        Version::Text(text) => text,
        Version::Number(number) => number.to_string(),
    })
}

impl Snapshot {
    /// Parses and validates a snapshot from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Json` for malformed JSON, and
    /// `SnapshotError::EmptyName` / `SnapshotError::DuplicateName` when bulb
    /// names cannot serve as unique keys.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reads, parses and validates a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Io` if the file cannot be read, otherwise the
    /// same errors as [`from_json`](Self::from_json).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let snapshot = Self::from_json(&contents)?;
        tracing::info!(
            path = %path.display(),
            devices = snapshot.devices.len(),
            "Loaded bulb snapshot"
        );
        Ok(snapshot)
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.name.trim().is_empty() {
                return Err(SnapshotError::EmptyName);
            }
            if !seen.insert(device.name.as_str()) {
                return Err(SnapshotError::DuplicateName(device.name.clone()));
            }
        }
        Ok(())
    }
}

impl SnapshotDevice {
    /// Builds the bulb identity for this entry.
    #[must_use]
    pub fn to_info(&self, settings: &ConnectionSettings) -> BulbInfo {
        BulbInfo {
            name: self.name.clone(),
            device_id: self.id.clone(),
            address: self.ip.clone(),
            local_key: self.key.clone(),
            version: self.ver.clone(),
            connection_timeout: settings.connection_timeout(),
            retry_limit: settings.retry_limit(),
        }
    }
}

/// Connection parameters shared by every bulb built from a snapshot.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tuya_scenes::registry::ConnectionSettings;
///
/// let settings = ConnectionSettings::new()
///     .with_connection_timeout(Duration::from_secs(2))
///     .with_retry_limit(3);
/// assert_eq!(settings.retry_limit(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    connection_timeout: Duration,
    retry_limit: u32,
}

impl ConnectionSettings {
    /// Default socket connection timeout.
    pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default retry limit outside scenes.
    pub const DEFAULT_RETRY_LIMIT: u32 = 1;

    /// Creates settings with the default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connection_timeout: Self::DEFAULT_CONNECTION_TIMEOUT,
            retry_limit: Self::DEFAULT_RETRY_LIMIT,
        }
    }

    /// Sets the socket connection timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Sets the baseline retry limit.
    #[must_use]
    pub fn with_retry_limit(mut self, limit: u32) -> Self {
        self.retry_limit = limit;
        self
    }

    /// Returns the socket connection timeout.
    #[must_use]
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Returns the baseline retry limit.
    #[must_use]
    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "timestamp": 1700000000,
        "devices": [
            {"name": "Den Light", "id": "bf01", "ip": "192.168.1.50", "key": "k1", "ver": "3.3", "mac": "aa"},
            {"name": "Wood Lamp", "id": "bf02", "ip": "192.168.1.51", "key": "k2", "ver": 3.4}
        ]
    }"#;

    #[test]
    fn parses_devices_in_order() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
        assert_eq!(snapshot.devices.len(), 2);
        assert_eq!(snapshot.devices[0].name, "Den Light");
        assert_eq!(snapshot.devices[1].ip, "192.168.1.51");
    }

    #[test]
    fn numeric_version_becomes_text() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
        assert_eq!(snapshot.devices[0].ver, "3.3");
        assert_eq!(snapshot.devices[1].ver, "3.4");
    }

    #[test]
    fn rejects_duplicate_names() {
        let json = r#"{"devices": [
            {"name": "Den Light", "id": "a", "ip": "1", "key": "k", "ver": "3.3"},
            {"name": "Den Light", "id": "b", "ip": "2", "key": "k", "ver": "3.3"}
        ]}"#;
        assert!(matches!(
            Snapshot::from_json(json),
            Err(SnapshotError::DuplicateName(name)) if name == "Den Light"
        ));
    }

    #[test]
    fn rejects_empty_names() {
        let json = r#"{"devices": [{"name": " ", "id": "a", "ip": "1", "key": "k", "ver": "3.3"}]}"#;
        assert!(matches!(
            Snapshot::from_json(json),
            Err(SnapshotError::EmptyName)
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        let json = r#"{"devices": [{"name": "Den Light"}]}"#;
        assert!(matches!(Snapshot::from_json(json), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("tuya_scenes_missing_snapshot.json");
        assert!(matches!(Snapshot::load(&path), Err(SnapshotError::Io(_))));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "tuya_scenes_snapshot_{}.json",
            uuid::Uuid::new_v4()
        ));
        fs::write(&path, SNAPSHOT).unwrap();
        let snapshot = Snapshot::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(snapshot.devices.len(), 2);
    }

    #[test]
    fn to_info_applies_settings() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
        let settings = ConnectionSettings::new()
            .with_connection_timeout(Duration::from_secs(2))
            .with_retry_limit(4);
        let info = snapshot.devices[0].to_info(&settings);
        assert_eq!(info.name, "Den Light");
        assert_eq!(info.device_id, "bf01");
        assert_eq!(info.local_key, "k1");
        assert_eq!(info.connection_timeout, Duration::from_secs(2));
        assert_eq!(info.retry_limit, 4);
    }
}
