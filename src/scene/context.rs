// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::device::BulbClient;
use crate::registry::{Batch, DeviceRegistry, DispatchReport};
use crate::scheduler::{SceneInfo, SceneToken};

/// What a running scene sees of the world.
///
/// The context pairs the scene's own token with a view of the scheduler's
/// active token. Once they differ the scene is stopped: [`dispatch`] sends
/// nothing and [`wait`] returns early.
///
/// [`dispatch`]: SceneContext::dispatch
/// [`wait`]: SceneContext::wait
#[derive(Debug)]
pub struct SceneContext<C> {
    token: SceneToken,
    active: watch::Receiver<Option<SceneInfo>>,
    registry: Arc<DeviceRegistry<C>>,
    poll_interval: Duration,
}

impl<C: BulbClient> SceneContext<C> {
    pub(crate) fn new(
        token: SceneToken,
        active: watch::Receiver<Option<SceneInfo>>,
        registry: Arc<DeviceRegistry<C>>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            token,
            active,
            registry,
            poll_interval,
        }
    }

    /// Returns this scene's token.
    #[must_use]
    pub fn token(&self) -> SceneToken {
        self.token
    }

    /// Returns the shared bulb registry.
    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry<C> {
        &self.registry
    }

    /// Returns the slice between liveness checks.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns true while this scene's token is the active one.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.active
            .borrow()
            .as_ref()
            .is_some_and(|info| info.token == self.token)
    }

    /// Sleeps for `duration` in poll-interval slices.
    ///
    /// Returns `false` as soon as the scene is no longer live, `true` if the
    /// full duration elapsed.
    pub async fn wait(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if !self.is_live() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            tokio::time::sleep((deadline - now).min(self.poll_interval)).await;
        }
    }

    /// Sends `batch` if the scene is still live.
    ///
    /// Returns `None` without touching any bulb once the scene is stopped.
    pub async fn dispatch(&self, batch: Batch<C>) -> Option<DispatchReport> {
        if !self.is_live() {
            tracing::debug!(token = %self.token, "Dropping batch from stopped scene");
            return None;
        }
        if batch.is_empty() {
            return Some(DispatchReport::default());
        }
        Some(self.registry.dispatch(batch).await)
    }
}
