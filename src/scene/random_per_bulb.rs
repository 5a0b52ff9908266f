// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::command::BulbCommand;
use crate::device::BulbClient;
use crate::error::ConfigurationError;
use crate::registry::{Batch, Toggle};
use crate::scaler;
use crate::types::RgbColor;

use super::{Scene, SceneContext, SceneKind, rng_from};

/// Every enabled bulb picks a random color from the list each tick.
///
/// Picks are independent, so two bulbs may land on the same color.
#[derive(Debug, Clone)]
pub struct RandomPerBulbScene {
    toggles: Vec<Toggle>,
    colors: Vec<RgbColor>,
    wait_time: Duration,
    rng: StdRng,
}

impl RandomPerBulbScene {
    /// Creates the scene.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::EmptyColorList` for an empty list, or the
    /// scaling error of the first color an enabled toggle cannot take.
    pub fn new(
        toggles: Vec<Toggle>,
        colors: Vec<RgbColor>,
        wait_time: Duration,
    ) -> Result<Self, ConfigurationError> {
        if colors.is_empty() {
            return Err(ConfigurationError::EmptyColorList);
        }
        for toggle in toggles.iter().filter(|t| t.enabled) {
            for &color in &colors {
                scaler::scale(color, toggle.multiplier)?;
            }
        }
        Ok(Self {
            toggles,
            colors,
            wait_time,
            rng: rng_from(None),
        })
    }

    /// Replaces the random source with one seeded from `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = rng_from(Some(seed));
        self
    }

    /// Returns the delay between ticks.
    #[must_use]
    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    fn frame<C: BulbClient>(&mut self, ctx: &SceneContext<C>) -> Batch<C> {
        let mut batch = Vec::new();
        for (bulb, toggle) in ctx.registry().resolve(&self.toggles) {
            let Some(&color) = self.colors.choose(&mut self.rng) else {
                continue;
            };
            match scaler::scale(color, toggle.multiplier) {
                Ok(scaled) => batch.push((bulb, BulbCommand::Color(scaled))),
                Err(e) => tracing::warn!(bulb = %bulb.name(), error = %e, "Skipping color"),
            }
        }
        batch
    }
}

impl Scene for RandomPerBulbScene {
    fn kind(&self) -> SceneKind {
        SceneKind::RandomPerBulb
    }

    async fn tick<C: BulbClient>(&mut self, ctx: &SceneContext<C>) {
        let batch = self.frame(ctx);
        ctx.dispatch(batch).await;
        ctx.wait(self.wait_time).await;
    }
}
