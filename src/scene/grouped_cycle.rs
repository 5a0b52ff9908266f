// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::time::Duration;

use crate::command::BulbCommand;
use crate::device::BulbClient;
use crate::error::ConfigurationError;
use crate::registry::{Batch, Toggle};
use crate::scaler;
use crate::types::{RgbColor, palette};

use super::{Scene, SceneContext, SceneKind};

/// Rotates a color list across groups of bulbs.
///
/// Group `i` starts on color `i`. Each tick every group shows its current
/// color, scaled per toggle, and then moves one step along the list. When
/// there are fewer colors than groups the list is padded with white.
///
/// ```
/// use std::time::Duration;
/// use tuya_scenes::registry::Toggle;
/// use tuya_scenes::scene::GroupedCycleScene;
/// use tuya_scenes::types::palette;
///
/// let groups = vec![
///     vec![Toggle::new("Den Light", 2.0)],
///     vec![Toggle::new("Den Light", 1.0)],
/// ];
/// let err = GroupedCycleScene::new(groups, vec![palette::RED], Duration::from_secs(1));
/// assert!(err.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct GroupedCycleScene {
    groups: Vec<Vec<Toggle>>,
    colors: Vec<RgbColor>,
    offsets: Vec<usize>,
    wait_time: Duration,
}

impl GroupedCycleScene {
    /// Creates the scene.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::DuplicateBulb` if a bulb appears in more
    /// than one group, or the scaling error of the first color an enabled
    /// toggle cannot take.
    pub fn new(
        groups: Vec<Vec<Toggle>>,
        mut colors: Vec<RgbColor>,
        wait_time: Duration,
    ) -> Result<Self, ConfigurationError> {
        if let Some(name) = find_duplicate(&groups) {
            return Err(ConfigurationError::DuplicateBulb(name));
        }

        if colors.len() < groups.len() {
            colors.resize(groups.len(), palette::WHITE);
        }

        for toggle in groups.iter().flatten().filter(|t| t.enabled) {
            for &color in &colors {
                scaler::scale(color, toggle.multiplier)?;
            }
        }

        let offsets = (0..groups.len()).collect();
        Ok(Self {
            groups,
            colors,
            offsets,
            wait_time,
        })
    }

    /// Returns the color list after padding.
    #[must_use]
    pub fn colors(&self) -> &[RgbColor] {
        &self.colors
    }

    /// Returns the delay between ticks.
    #[must_use]
    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    fn frame<C: BulbClient>(&self, ctx: &SceneContext<C>) -> Batch<C> {
        let mut batch = Vec::new();
        for (group, &offset) in self.groups.iter().zip(&self.offsets) {
            let color = self.colors[offset];
            for (bulb, toggle) in ctx.registry().resolve(group) {
                match scaler::scale(color, toggle.multiplier) {
                    Ok(scaled) => batch.push((bulb, BulbCommand::Color(scaled))),
                    Err(e) => tracing::warn!(bulb = %bulb.name(), error = %e, "Skipping color"),
                }
            }
        }
        batch
    }

    fn advance(&mut self) {
        let len = self.colors.len();
        for offset in &mut self.offsets {
            *offset = (*offset + 1) % len;
        }
    }
}

impl Scene for GroupedCycleScene {
    fn kind(&self) -> SceneKind {
        SceneKind::GroupedCycle
    }

    async fn tick<C: BulbClient>(&mut self, ctx: &SceneContext<C>) {
        let batch = self.frame(ctx);
        ctx.dispatch(batch).await;
        tracing::debug!(offsets = ?self.offsets, "Grouped cycle step");
        self.advance();
        ctx.wait(self.wait_time).await;
    }
}

/// Returns a bulb name that appears in two different groups.
fn find_duplicate(groups: &[Vec<Toggle>]) -> Option<String> {
    let mut owner: HashMap<&str, usize> = HashMap::new();
    for (index, group) in groups.iter().enumerate() {
        for toggle in group {
            match owner.get(toggle.name.as_str()) {
                Some(&first) if first != index => return Some(toggle.name.clone()),
                Some(_) => {}
                None => {
                    owner.insert(&toggle.name, index);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::device::mock::{self, Call};
    use crate::scheduler::{SceneInfo, SceneToken};

    fn two_groups() -> Vec<Vec<Toggle>> {
        vec![
            vec![Toggle::new("Den Light", 1.0)],
            vec![Toggle::new("White Lamp", 1.0)],
        ]
    }

    #[test]
    fn duplicate_across_groups_is_rejected() {
        let groups = vec![
            vec![Toggle::new("Den Light", 1.0)],
            vec![Toggle::new("White Lamp", 1.0), Toggle::new("Den Light", 2.0)],
        ];
        let err = GroupedCycleScene::new(groups, vec![palette::RED], Duration::ZERO).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateBulb("Den Light".to_string()));
        assert_eq!(err.to_string(), "Den Light appears on multiple lists");
    }

    #[test]
    fn repeat_within_one_group_is_allowed() {
        let groups = vec![vec![Toggle::new("Den Light", 1.0), Toggle::new("Den Light", 2.0)]];
        assert!(GroupedCycleScene::new(groups, vec![palette::RED], Duration::ZERO).is_ok());
    }

    #[test]
    fn short_color_list_is_padded_with_white() {
        let scene =
            GroupedCycleScene::new(two_groups(), vec![palette::RED], Duration::ZERO).unwrap();
        assert_eq!(scene.colors(), [palette::RED, palette::WHITE]);
    }

    #[tokio::test(start_paused = true)]
    async fn groups_rotate_through_colors() {
        let (registry, journal) = mock::registry(&["Den Light", "White Lamp"]);
        let token = SceneToken::new();
        let (_tx, rx) =
            tokio::sync::watch::channel(Some(SceneInfo::new(token, SceneKind::GroupedCycle)));
        let ctx = SceneContext::new(token, rx, Arc::new(registry), Duration::from_millis(100));

        let colors = vec![palette::RED, palette::GREEN, palette::BLUE];
        let mut scene = GroupedCycleScene::new(two_groups(), colors, Duration::from_secs(1)).unwrap();
        for _ in 0..3 {
            scene.tick(&ctx).await;
        }

        assert_eq!(
            journal.calls_to("Den Light"),
            vec![
                Call::Color(palette::RED),
                Call::Color(palette::GREEN),
                Call::Color(palette::BLUE)
            ]
        );
        assert_eq!(
            journal.calls_to("White Lamp"),
            vec![
                Call::Color(palette::GREEN),
                Call::Color(palette::BLUE),
                Call::Color(palette::RED)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_toggles_are_skipped() {
        let (registry, journal) = mock::registry(&["Den Light", "White Lamp"]);
        let token = SceneToken::new();
        let (_tx, rx) =
            tokio::sync::watch::channel(Some(SceneInfo::new(token, SceneKind::GroupedCycle)));
        let ctx = SceneContext::new(token, rx, Arc::new(registry), Duration::from_millis(100));

        let groups = vec![
            vec![Toggle::new("Den Light", 1.0)],
            vec![Toggle::new("White Lamp", 1.0).disabled()],
        ];
        let mut scene =
            GroupedCycleScene::new(groups, vec![palette::RED], Duration::from_secs(1)).unwrap();
        scene.tick(&ctx).await;

        assert_eq!(journal.calls_to("Den Light"), vec![Call::Color(palette::RED)]);
        assert!(journal.calls_to("White Lamp").is_empty());
    }
}
