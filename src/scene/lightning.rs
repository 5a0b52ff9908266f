// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use tokio::time::Instant;

use crate::command::BulbCommand;
use crate::device::{Bulb, BulbClient};
use crate::error::ConfigurationError;
use crate::types::{RgbColor, palette};

use super::{Scene, SceneContext, SceneKind, rng_from};

/// Grey level the trailing bulbs settle at after a strike or a rumble.
const AFTERGLOW_LEVEL: u8 = 1;

/// Fraction of the tick wait the lead bulb spends at storm brightness.
const FLICKER_DIVISOR: u32 = 6;

/// Tuning for [`LightningScene`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightningParams {
    /// Color every bulb flashes to on a strike.
    pub strike_color: RgbColor,
    /// Chance of a strike per tick, in percent (`1..=100`).
    pub percent_chance: u8,
    /// How long a strike lasts before the bulbs fade.
    pub strike_length: Duration,
    /// Grey level the lead bulb rests at between flickers.
    pub ambient_level: u8,
    /// Grey levels the lead bulb flickers to, half-open.
    pub storm_brightness: Range<u8>,
    /// Inter-tick wait in milliseconds, half-open.
    pub wait_ms: Range<u64>,
}

impl Default for LightningParams {
    fn default() -> Self {
        Self {
            strike_color: palette::WHITE,
            percent_chance: 20,
            strike_length: Duration::from_millis(400),
            ambient_level: 10,
            storm_brightness: 15..50,
            wait_ms: 250..1000,
        }
    }
}

/// A dim storm over an ordered set of bulbs, with occasional strikes.
///
/// The first bulb leads: it carries the flicker and is the last to fade
/// after a strike.
#[derive(Debug, Clone)]
pub struct LightningScene {
    bulbs: Vec<String>,
    params: LightningParams,
    rng: StdRng,
}

impl LightningScene {
    /// Creates the scene over `bulbs`, lead bulb first.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError::NoBulbs` if `bulbs` is empty
    /// - `ConfigurationError::InvalidChance` if the chance is outside `1..=100`
    /// - `ConfigurationError::InvalidRange` if either range is empty
    pub fn new(bulbs: Vec<String>, params: LightningParams) -> Result<Self, ConfigurationError> {
        if bulbs.is_empty() {
            return Err(ConfigurationError::NoBulbs);
        }
        if !(1..=100).contains(&params.percent_chance) {
            return Err(ConfigurationError::InvalidChance(params.percent_chance));
        }
        if params.storm_brightness.is_empty() {
            return Err(ConfigurationError::InvalidRange {
                name: "storm_brightness_range",
                min: u64::from(params.storm_brightness.start),
                max: u64::from(params.storm_brightness.end),
            });
        }
        if params.wait_ms.is_empty() {
            return Err(ConfigurationError::InvalidRange {
                name: "wait_time_range",
                min: params.wait_ms.start,
                max: params.wait_ms.end,
            });
        }
        Ok(Self {
            bulbs,
            params,
            rng: rng_from(None),
        })
    }

    /// Replaces the random source with one seeded from `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = rng_from(Some(seed));
        self
    }

    /// Returns the bulb names, lead bulb first.
    #[must_use]
    pub fn bulbs(&self) -> &[String] {
        &self.bulbs
    }

    /// Returns the tuning.
    #[must_use]
    pub fn params(&self) -> &LightningParams {
        &self.params
    }

    /// One in `100 / percent_chance` ticks strikes.
    fn strike_odds(&self) -> u8 {
        100 / self.params.percent_chance
    }

    async fn strike<C: BulbClient>(&self, ctx: &SceneContext<C>, bulbs: &[Arc<Bulb<C>>]) {
        let flash = bulbs
            .iter()
            .map(|bulb| (Arc::clone(bulb), BulbCommand::Color(self.params.strike_color)))
            .collect();
        ctx.dispatch(flash).await;

        // Bulb i fades after length / (i + 1), so the lead bulb fades last.
        let struck_at = Instant::now();
        for (index, bulb) in bulbs.iter().enumerate().rev() {
            let divisor = u32::try_from(index + 1).unwrap_or(u32::MAX);
            let fade_at = self.params.strike_length / divisor;
            if !ctx.wait(fade_at.saturating_sub(struck_at.elapsed())).await {
                return;
            }
            let level = if index == 0 {
                self.params.ambient_level
            } else {
                AFTERGLOW_LEVEL
            };
            ctx.dispatch(vec![(Arc::clone(bulb), BulbCommand::Color(RgbColor::grey(level)))])
                .await;
        }

        ctx.wait(self.params.strike_length).await;
    }

    async fn rumble<C: BulbClient>(
        &self,
        ctx: &SceneContext<C>,
        bulbs: &[Arc<Bulb<C>>],
        storm_level: u8,
        wait: Duration,
    ) {
        let Some((lead, rest)) = bulbs.split_first() else {
            return;
        };

        ctx.dispatch(vec![(Arc::clone(lead), BulbCommand::Color(RgbColor::grey(storm_level)))])
            .await;
        if !ctx.wait(wait / FLICKER_DIVISOR).await {
            return;
        }

        let mut settle = vec![(
            Arc::clone(lead),
            BulbCommand::Color(RgbColor::grey(self.params.ambient_level)),
        )];
        settle.extend(
            rest.iter()
                .map(|bulb| (Arc::clone(bulb), BulbCommand::Color(RgbColor::grey(AFTERGLOW_LEVEL)))),
        );
        ctx.dispatch(settle).await;

        ctx.wait(wait).await;
    }
}

impl Scene for LightningScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Lightning
    }

    async fn tick<C: BulbClient>(&mut self, ctx: &SceneContext<C>) {
        let storm_level = self.rng.gen_range(self.params.storm_brightness.clone());
        let wait = Duration::from_millis(self.rng.gen_range(self.params.wait_ms.clone()));
        let odds = self.strike_odds();
        let struck = self.rng.gen_range(0..odds) == 0;

        let bulbs = ctx.registry().resolve_names(&self.bulbs);
        if bulbs.is_empty() {
            ctx.wait(wait).await;
            return;
        }

        tracing::debug!(storm_level, wait_ms = wait.as_millis(), struck, "Lightning tick");
        if struck {
            self.strike(ctx, &bulbs).await;
        } else {
            self.rumble(ctx, &bulbs, storm_level, wait).await;
        }
    }
}
