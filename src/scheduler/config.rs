// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scheduler timing and retry configuration.

use std::time::Duration;

/// Configuration for a [`SceneScheduler`](super::SceneScheduler).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tuya_scenes::scheduler::SchedulerConfig;
///
/// let config = SchedulerConfig::new()
///     .with_grace_period(Duration::from_secs(1))
///     .with_poll_interval(Duration::from_millis(50))
///     .with_scene_retry_limit(5);
/// assert_eq!(config.poll_interval(), Duration::from_millis(50));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    grace_period: Duration,
    poll_interval: Duration,
    scene_retry_limit: u32,
}

impl SchedulerConfig {
    /// Default upper bound on waiting for a stopped scene to clean up.
    pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(2);
    /// Default slice between liveness checks while a scene waits.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
    /// Default retry limit while a scene runs.
    pub const DEFAULT_SCENE_RETRY_LIMIT: u32 = 10;

    const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

    /// Creates a configuration with the default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grace_period: Self::DEFAULT_GRACE_PERIOD,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            scene_retry_limit: Self::DEFAULT_SCENE_RETRY_LIMIT,
        }
    }

    /// Sets how long stopping a scene waits for its loop to finish.
    #[must_use]
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Sets the polling slice. Values below one millisecond are raised to it.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Self::MIN_POLL_INTERVAL);
        self
    }

    /// Sets the retry limit applied to every bulb while a scene runs.
    #[must_use]
    pub fn with_scene_retry_limit(mut self, limit: u32) -> Self {
        self.scene_retry_limit = limit;
        self
    }

    /// Returns the grace period.
    #[must_use]
    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Returns the polling slice.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the retry limit used while a scene runs.
    #[must_use]
    pub fn scene_retry_limit(&self) -> u32 {
        self.scene_retry_limit
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.grace_period(), Duration::from_secs(2));
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.scene_retry_limit(), 10);
    }

    #[test]
    fn zero_poll_interval_is_raised() {
        let config = SchedulerConfig::new().with_poll_interval(Duration::ZERO);
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
    }
}
