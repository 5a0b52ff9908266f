// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Long-running lighting scenes.
//!
//! A scene is a loop of ticks. Each tick builds one or more command batches,
//! hands them to the [`SceneContext`] and waits. The context refuses to
//! dispatch once the scene's token is no longer active, and every wait is
//! cut short when that happens, so a stopped scene winds down within one
//! poll interval plus the bulb call in flight.
//!
//! Scenes validate their inputs when constructed. A tick never fails: bulb
//! errors are logged by the registry and the loop carries on.
//!
//! | Scene | Behavior |
//! |-------|----------|
//! | [`AlternatingScene`] | Swaps red and green between ceiling lights and lamps |
//! | [`GroupedCycleScene`] | Rotates a color list across groups of bulbs |
//! | [`RandomPerBulbScene`] | Gives every bulb a random color from a list |
//! | [`LightningScene`] | Dim storm flicker with random white strikes |

mod alternating;
mod context;
mod grouped_cycle;
mod lightning;
mod random_per_bulb;

use std::fmt;
use std::future::Future;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::device::BulbClient;

pub use alternating::AlternatingScene;
pub use context::SceneContext;
pub use grouped_cycle::GroupedCycleScene;
pub use lightning::{LightningParams, LightningScene};
pub use random_per_bulb::RandomPerBulbScene;

/// A scene loop body.
pub trait Scene: Send + 'static {
    /// Which kind of scene this is.
    fn kind(&self) -> SceneKind;

    /// Runs one iteration, including its trailing wait.
    fn tick<C: BulbClient>(&mut self, ctx: &SceneContext<C>) -> impl Future<Output = ()> + Send;
}

/// The kinds of scene the scheduler can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    Alternating,
    GroupedCycle,
    RandomPerBulb,
    Lightning,
}

impl SceneKind {
    /// Returns the human-readable scene name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Alternating => "Alternating",
            Self::GroupedCycle => "Grouped cycle",
            Self::RandomPerBulb => "Random per bulb",
            Self::Lightning => "Lightning",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fully validated scene, ready to be started.
#[derive(Debug)]
pub enum SceneDescriptor {
    Alternating(AlternatingScene),
    GroupedCycle(GroupedCycleScene),
    RandomPerBulb(RandomPerBulbScene),
    Lightning(LightningScene),
}

impl SceneDescriptor {
    /// Returns the kind of the wrapped scene.
    #[must_use]
    pub fn kind(&self) -> SceneKind {
        match self {
            Self::Alternating(scene) => scene.kind(),
            Self::GroupedCycle(scene) => scene.kind(),
            Self::RandomPerBulb(scene) => scene.kind(),
            Self::Lightning(scene) => scene.kind(),
        }
    }
}

impl From<AlternatingScene> for SceneDescriptor {
    fn from(scene: AlternatingScene) -> Self {
        Self::Alternating(scene)
    }
}

impl From<GroupedCycleScene> for SceneDescriptor {
    fn from(scene: GroupedCycleScene) -> Self {
        Self::GroupedCycle(scene)
    }
}

impl From<RandomPerBulbScene> for SceneDescriptor {
    fn from(scene: RandomPerBulbScene) -> Self {
        Self::RandomPerBulb(scene)
    }
}

impl From<LightningScene> for SceneDescriptor {
    fn from(scene: LightningScene) -> Self {
        Self::Lightning(scene)
    }
}

/// Drives `scene` until its token is replaced.
///
/// Retry limits are left to the scheduler; a loop that outlives its token
/// never touches them.
pub(crate) async fn drive<S: Scene, C: BulbClient>(mut scene: S, ctx: SceneContext<C>) {
    let kind = scene.kind();
    tracing::info!(token = %ctx.token(), scene = %kind, "Scene started");

    while ctx.is_live() {
        scene.tick(&ctx).await;
        tokio::task::yield_now().await;
    }

    tracing::info!(token = %ctx.token(), scene = %kind, "Scene stopped");
}

fn rng_from(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}
