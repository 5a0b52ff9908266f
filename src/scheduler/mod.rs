// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The single-slot scene scheduler.
//!
//! At most one scene runs at a time. The scheduler owns the active
//! [`SceneToken`] in a `watch` channel; each running scene holds a receiver
//! and keeps looping only while the channel still carries its own token.
//! Stopping a scene never aborts its task: the token is cleared and the
//! scene notices at its next check and returns.
//!
//! The scheduler alone raises and restores the registry retry limit. The
//! limit is raised when a scene is spawned and restored to the baseline only
//! when the scheduler goes idle, so a preempted loop stuck in a slow bulb
//! call cannot lower it under its successor.
//!
//! # State machine
//!
//! ```text
//!            start(d)                 start(d')
//!   Idle ─────────────▶ Running(t) ─────────────▶ Running(t')
//!    ▲                     │
//!    └──────── stop() ─────┘
//! ```
//!
//! Transitions are serialized. On every transition out of `Running` the
//! scheduler joins the old task for at most the grace period before going
//! on.

mod config;
mod token;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::device::BulbClient;
use crate::registry::DeviceRegistry;
use crate::scene::{self, SceneContext, SceneDescriptor, SceneKind};

pub use config::SchedulerConfig;
pub use token::SceneToken;

/// Inspection record of a running scene.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SceneInfo {
    /// Token of this execution.
    pub token: SceneToken,
    /// Kind of scene.
    pub kind: SceneKind,
    /// When the scene was started.
    pub started_at: DateTime<Utc>,
}

impl SceneInfo {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(token: SceneToken, kind: SceneKind) -> Self {
        Self {
            token,
            kind,
            started_at: Utc::now(),
        }
    }
}

/// Runs at most one scene at a time over a shared registry.
///
/// Dropping the scheduler clears the active token, so a detached scene loop
/// winds down on its own, and restores the baseline retry limit if a scene
/// was running.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use tuya_scenes::device::BulbClient;
/// use tuya_scenes::registry::DeviceRegistry;
/// use tuya_scenes::scene::AlternatingScene;
/// use tuya_scenes::scheduler::{SceneScheduler, SchedulerConfig};
///
/// # async fn example<C: BulbClient>(registry: DeviceRegistry<C>) {
/// let scheduler = SceneScheduler::new(Arc::new(registry), SchedulerConfig::default());
/// let token = scheduler.start(AlternatingScene::new(Duration::from_secs(600)).into()).await;
/// assert_eq!(scheduler.current().map(|info| info.token), Some(token));
/// assert!(scheduler.stop().await);
/// # }
/// ```
#[derive(Debug)]
pub struct SceneScheduler<C: BulbClient> {
    registry: Arc<DeviceRegistry<C>>,
    config: SchedulerConfig,
    active: watch::Sender<Option<SceneInfo>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<C: BulbClient> SceneScheduler<C> {
    /// Creates an idle scheduler.
    #[must_use]
    pub fn new(registry: Arc<DeviceRegistry<C>>, config: SchedulerConfig) -> Self {
        let (active, _) = watch::channel(None);
        Self {
            registry,
            config,
            active,
            task: Mutex::new(None),
        }
    }

    /// Returns the shared registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<DeviceRegistry<C>> {
        &self.registry
    }

    /// Returns the scheduler configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns the running scene, if any.
    #[must_use]
    pub fn current(&self) -> Option<SceneInfo> {
        self.active.borrow().clone()
    }

    /// Returns true if a scene holds the active token.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active.borrow().is_some()
    }

    /// Starts `descriptor`, preempting the running scene.
    ///
    /// The previous scene's token is cleared and its task is given up to the
    /// grace period to finish before the new scene is spawned.
    pub async fn start(&self, descriptor: SceneDescriptor) -> SceneToken {
        let mut task = self.task.lock().await;
        self.retire(&mut task).await;

        let token = SceneToken::new();
        let info = SceneInfo::new(token, descriptor.kind());
        tracing::debug!(%token, scene = %info.kind, "Activating scene");
        self.active.send_replace(Some(info));

        self.registry.set_global_retry_limit(self.config.scene_retry_limit());
        let ctx = SceneContext::new(
            token,
            self.active.subscribe(),
            Arc::clone(&self.registry),
            self.config.poll_interval(),
        );
        *task = Some(self.spawn(descriptor, ctx));
        token
    }

    /// Stops the running scene.
    ///
    /// Returns `false` if no scene was running.
    pub async fn stop(&self) -> bool {
        let mut task = self.task.lock().await;
        let stopped = self.retire(&mut task).await;
        if stopped {
            self.registry.restore_retry_limit();
        }
        stopped
    }

    fn spawn(&self, descriptor: SceneDescriptor, ctx: SceneContext<C>) -> JoinHandle<()> {
        match descriptor {
            SceneDescriptor::Alternating(s) => tokio::spawn(scene::drive(s, ctx)),
            SceneDescriptor::GroupedCycle(s) => tokio::spawn(scene::drive(s, ctx)),
            SceneDescriptor::RandomPerBulb(s) => tokio::spawn(scene::drive(s, ctx)),
            SceneDescriptor::Lightning(s) => tokio::spawn(scene::drive(s, ctx)),
        }
    }

    /// Clears the active token and joins the old task within the grace period.
    async fn retire(&self, task: &mut Option<JoinHandle<()>>) -> bool {
        let previous = self.active.send_replace(None);
        let Some(handle) = task.take() else {
            return previous.is_some();
        };

        if let Some(info) = &previous {
            tracing::info!(token = %info.token, scene = %info.kind, "Stopping scene");
        }

        match tokio::time::timeout(self.config.grace_period(), handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Scene task failed"),
            Err(_) => tracing::warn!(
                grace_ms = self.config.grace_period().as_millis(),
                "Scene did not stop within the grace period"
            ),
        }
        previous.is_some()
    }
}

impl<C: BulbClient> Drop for SceneScheduler<C> {
    fn drop(&mut self) {
        if self.active.send_replace(None).is_some() {
            self.registry.restore_retry_limit();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::device::mock::{self, Call, RecordingClient};
    use crate::scene::{AlternatingScene, LightningParams, LightningScene};

    fn scheduler(names: &[&str]) -> (SceneScheduler<RecordingClient>, mock::Journal) {
        let (registry, journal) = mock::registry(names);
        (
            SceneScheduler::new(Arc::new(registry), SchedulerConfig::default()),
            journal,
        )
    }

    fn alternating(wait_secs: u64) -> SceneDescriptor {
        AlternatingScene::new(Duration::from_secs(wait_secs)).into()
    }

    #[tokio::test(start_paused = true)]
    async fn idle_stop_is_a_no_op() {
        let (scheduler, journal) = scheduler(&["Den Light"]);
        assert!(!scheduler.is_running());
        assert!(!scheduler.stop().await);
        assert!(scheduler.current().is_none());
        assert_eq!(journal.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_runs_and_reports_current() {
        let (scheduler, journal) = scheduler(&["Den Light", "White Lamp"]);
        let token = scheduler.start(alternating(600)).await;

        let info = scheduler.current().unwrap();
        assert_eq!(info.token, token);
        assert_eq!(info.kind, SceneKind::Alternating);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(journal.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_clears_token_and_restores_retry_limit() {
        let (scheduler, _) = scheduler(&["Den Light", "White Lamp"]);
        scheduler.start(alternating(600)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let registry = Arc::clone(scheduler.registry());
        assert!(registry.bulbs().iter().all(|b| b.client().retry_limit() == 10));

        assert!(scheduler.stop().await);
        assert!(!scheduler.is_running());
        assert!(registry.bulbs().iter().all(|b| b.client().retry_limit() == 1));
        assert!(!scheduler.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_interrupts_a_long_wait_within_one_slice() {
        let (scheduler, _) = scheduler(&["Den Light"]);
        scheduler.start(alternating(600)).await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        let started = tokio::time::Instant::now();
        assert!(scheduler.stop().await);
        assert!(started.elapsed() <= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn preemption_leaves_one_scene_running() {
        let (scheduler, journal) = scheduler(&["Den Light", "White Lamp", "Wood Lamp"]);

        let first = scheduler.start(alternating(1)).await;
        tokio::time::sleep(Duration::from_millis(2500)).await;

        let params = LightningParams {
            percent_chance: 100,
            ..LightningParams::default()
        };
        let bulbs = vec!["Den Light".to_string()];
        let second = scheduler
            .start(LightningScene::new(bulbs, params).unwrap().into())
            .await;
        assert_ne!(first, second);
        assert_eq!(scheduler.current().unwrap().kind, SceneKind::Lightning);

        journal.clear();
        tokio::time::sleep(Duration::from_secs(10)).await;

        // only the lightning bulb is touched after the swap
        assert!(!journal.is_empty());
        assert!(journal.calls_to("White Lamp").is_empty());
        assert!(journal.calls_to("Wood Lamp").is_empty());
        assert!(
            journal
                .calls_to("Den Light")
                .iter()
                .all(|call| matches!(call, Call::Color(_)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_bulb_bounds_the_grace_wait() {
        let (scheduler, _) = scheduler(&["Den Light"]);
        let registry = Arc::clone(scheduler.registry());
        registry.bulbs()[0].client().set_latency(Duration::from_secs(30));

        scheduler.start(alternating(600)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let started = tokio::time::Instant::now();
        assert!(scheduler.stop().await);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(2100), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn preempted_slow_scene_keeps_successor_retry_limit() {
        let (scheduler, _) = scheduler(&["Den Light", "White Lamp"]);
        let registry = Arc::clone(scheduler.registry());
        registry.bulbs()[0].client().set_latency(Duration::from_secs(30));

        scheduler.start(alternating(600)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        // the first loop is still inside its 30 s call when the grace wait ends
        scheduler.start(alternating(600)).await;
        assert!(registry.bulbs().iter().all(|b| b.client().retry_limit() == 10));

        tokio::time::sleep(Duration::from_secs(40)).await;
        assert!(scheduler.is_running());
        assert!(registry.bulbs().iter().all(|b| b.client().retry_limit() == 10));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_restores_retry_limit_without_waiting_for_a_stuck_loop() {
        let (scheduler, _) = scheduler(&["Den Light"]);
        let registry = Arc::clone(scheduler.registry());
        registry.bulbs()[0].client().set_latency(Duration::from_secs(30));

        scheduler.start(alternating(600)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(scheduler.stop().await);
        assert_eq!(registry.bulbs()[0].client().retry_limit(), 1);

        // the detached loop finishing later leaves the baseline alone
        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(registry.bulbs()[0].client().retry_limit(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_ends_the_loop() {
        let (scheduler, journal) = scheduler(&["Den Light"]);
        let registry = Arc::clone(scheduler.registry());
        scheduler.start(alternating(1)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(scheduler);
        assert_eq!(registry.bulbs()[0].client().retry_limit(), 1);

        let settled = journal.len();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(journal.len(), settled);
    }
}
