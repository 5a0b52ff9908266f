// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;
use std::time::Duration;

use crate::command::BulbCommand;
use crate::device::BulbClient;
use crate::registry::{Batch, DeviceRegistry, is_light};
use crate::types::RgbColor;

use super::{Scene, SceneContext, SceneKind};

/// Bright red for ceiling lights in the red phase.
pub(crate) const LIGHT_RED: RgbColor = RgbColor::new(255, 0, 0);
/// Dim green for lamps in the red phase.
pub(crate) const LAMP_GREEN: RgbColor = RgbColor::new(0, 100, 0);
/// Bright green for ceiling lights in the green phase.
pub(crate) const LIGHT_GREEN: RgbColor = RgbColor::new(0, 255, 0);
/// Dim red for lamps in the green phase.
pub(crate) const LAMP_RED: RgbColor = RgbColor::new(100, 0, 0);

/// Holiday scene: ceiling lights and lamps swap red and green every tick.
///
/// Every registered bulb takes part. The first tick puts the lights on red.
#[derive(Debug, Clone)]
pub struct AlternatingScene {
    wait_time: Duration,
    lights_red: bool,
}

impl AlternatingScene {
    /// Creates the scene with the given delay between swaps.
    #[must_use]
    pub fn new(wait_time: Duration) -> Self {
        Self {
            wait_time,
            lights_red: true,
        }
    }

    /// Returns the delay between swaps.
    #[must_use]
    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    /// Builds the batch for one phase over every bulb in `registry`.
    ///
    /// With `lights_red`, lights get bright red and lamps dim green;
    /// otherwise lights get bright green and lamps dim red.
    #[must_use]
    pub fn frame<C: BulbClient>(registry: &DeviceRegistry<C>, lights_red: bool) -> Batch<C> {
        let (light, lamp) = if lights_red {
            (LIGHT_RED, LAMP_GREEN)
        } else {
            (LIGHT_GREEN, LAMP_RED)
        };
        registry
            .bulbs()
            .iter()
            .map(|bulb| {
                let color = if is_light(bulb.name()) { light } else { lamp };
                (Arc::clone(bulb), BulbCommand::Color(color))
            })
            .collect()
    }
}

impl Scene for AlternatingScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Alternating
    }

    async fn tick<C: BulbClient>(&mut self, ctx: &SceneContext<C>) {
        let batch = Self::frame(ctx.registry(), self.lights_red);
        ctx.dispatch(batch).await;
        tracing::debug!(lights_red = self.lights_red, "Alternating swap");
        self.lights_red = !self.lights_red;
        ctx.wait(self.wait_time).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::{self, Call};
    use crate::scene::SceneKind;
    use crate::scheduler::{SceneInfo, SceneToken};

    #[test]
    fn frame_splits_lights_and_lamps() {
        let (registry, _) = mock::registry(&["Den Light", "White Lamp"]);

        let red = AlternatingScene::frame(&registry, true);
        assert_eq!(red[0].1, BulbCommand::Color(LIGHT_RED));
        assert_eq!(red[1].1, BulbCommand::Color(LAMP_GREEN));

        let green = AlternatingScene::frame(&registry, false);
        assert_eq!(green[0].1, BulbCommand::Color(LIGHT_GREEN));
        assert_eq!(green[1].1, BulbCommand::Color(LAMP_RED));
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_alternate() {
        let (registry, journal) = mock::registry(&["Den Light", "White Lamp"]);
        let token = SceneToken::new();
        let (_tx, rx) =
            tokio::sync::watch::channel(Some(SceneInfo::new(token, SceneKind::Alternating)));
        let ctx = SceneContext::new(token, rx, Arc::new(registry), Duration::from_millis(100));

        let mut scene = AlternatingScene::new(Duration::from_secs(1));
        scene.tick(&ctx).await;
        scene.tick(&ctx).await;

        assert_eq!(
            journal.calls_to("Den Light"),
            vec![Call::Color(LIGHT_RED), Call::Color(LIGHT_GREEN)]
        );
        assert_eq!(
            journal.calls_to("White Lamp"),
            vec![Call::Color(LAMP_GREEN), Call::Color(LAMP_RED)]
        );
    }
}
