// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `tuya_scenes` library.
//!
//! The hierarchy separates input problems that are reported before anything
//! touches a bulb (configuration and value errors) from per-device failures
//! that are logged and absorbed by the batch that produced them.

use std::time::Duration;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Scene or command input was rejected before any device was touched.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A single command to a single bulb failed.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// A constrained value was out of range.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The bulb snapshot could not be loaded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// No bulb with this name is registered.
    #[error("bulb not found: {0}")]
    BulbNotFound(String),
}

/// Malformed scene or command input.
///
/// These are always surfaced to the caller before a scene starts, so a
/// rejected request never stops the scene that is currently running.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The same bulb was listed in more than one group of a grouped scene.
    #[error("{0} appears on multiple lists")]
    DuplicateBulb(String),

    /// A color with every channel at zero cannot be scaled down.
    #[error("cannot scale down an all-zero color")]
    ZeroColor,

    /// A brightness multiplier was negative or not a finite number.
    #[error("invalid brightness multiplier: {0}")]
    InvalidMultiplier(f64),

    /// A scene was given an empty color list.
    #[error("color list is empty")]
    EmptyColorList,

    /// None of the referenced bulbs exist in the registry.
    #[error("no known bulbs selected")]
    NoBulbs,

    /// Strike chance must be a percentage in `1..=100`.
    #[error("strike chance {0}% is out of range [1, 100]")]
    InvalidChance(u8),

    /// A half-open `[min, max)` range was empty.
    #[error("{name} range [{min}, {max}) is empty")]
    InvalidRange {
        /// Which request field held the range.
        name: &'static str,
        /// Inclusive lower bound.
        min: u64,
        /// Exclusive upper bound.
        max: u64,
    },

    /// A duration in seconds was negative or not a finite number.
    #[error("invalid duration: {0} s")]
    InvalidDuration(f64),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },
}

/// Failures reported by the bulb client for one command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The bulb could not be reached after the client's own retries.
    #[error("{bulb} is unreachable: {reason}")]
    Unreachable {
        /// Name of the bulb.
        bulb: String,
        /// Description reported by the client.
        reason: String,
    },

    /// The bulb did not answer within the connection timeout.
    #[error("{bulb} timed out after {} ms", .after.as_millis())]
    Timeout {
        /// Name of the bulb.
        bulb: String,
        /// The connection timeout that elapsed.
        after: Duration,
    },
}

impl DeviceError {
    /// Returns the name of the bulb that failed.
    #[must_use]
    pub fn bulb(&self) -> &str {
        match self {
            Self::Unreachable { bulb, .. } | Self::Timeout { bulb, .. } => bulb,
        }
    }
}

/// Errors raised while loading a bulb snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read.
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot is not valid JSON or misses required fields.
    #[error("failed to parse snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Two devices share the same name.
    #[error("duplicate bulb name in snapshot: {0}")]
    DuplicateName(String),

    /// A device entry has an empty name.
    #[error("snapshot contains a device with an empty name")]
    EmptyName,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
