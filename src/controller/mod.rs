// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command dispatch.
//!
//! The [`Controller`] is the entry point a transport calls into. Every
//! operation validates its request and builds everything that can fail
//! before it touches the scheduler, so a rejected request leaves the running
//! scene alone. Immediate commands then stop the running scene and write to
//! the bulbs on the caller's task; scene requests hand a validated
//! [`SceneDescriptor`] to the scheduler, which preempts the running scene.
//!
//! Replies are short human-readable strings.

mod request;

use std::sync::Arc;

use crate::command::BulbCommand;
use crate::device::BulbClient;
use crate::error::{ConfigurationError, Result};
use crate::registry::{Batch, DeviceRegistry, DispatchReport};
use crate::scaler;
use crate::scene::{LightningScene, SceneDescriptor};
use crate::scheduler::{SceneInfo, SceneScheduler, SchedulerConfig};
use crate::types::RgbColor;

/// Fixed per-bulb colors written by [`Controller::set_holiday_colors`].
/// Bulbs not listed here are left untouched.
pub const HOLIDAY_COLORS: [(&str, RgbColor); 6] = [
    ("White Lamp", RgbColor::new(0, 200, 0)),
    ("Wood Lamp", RgbColor::new(0, 70, 0)),
    ("Black Lamp", RgbColor::new(0, 50, 0)),
    ("Chair Light", RgbColor::new(255, 0, 0)),
    ("Sofa Light", RgbColor::new(255, 0, 0)),
    ("Den Light", RgbColor::new(100, 0, 0)),
];

pub use request::{
    AlternatingRequest, BrightnessRequest, ColorRequest, DEFAULT_WAIT_TIME, GroupedCycleRequest,
    LightningRequest, MultiColorRequest, PowerRequest, RandomCycleRequest, seconds,
};

/// Front door for bulb commands and scenes.
///
/// # Examples
///
/// ```no_run
/// use tuya_scenes::controller::{ColorRequest, Controller, GroupedCycleRequest};
/// use tuya_scenes::device::BulbClient;
/// use tuya_scenes::registry::DeviceRegistry;
/// use tuya_scenes::types::RgbColor;
///
/// # async fn example<C: BulbClient>(registry: DeviceRegistry<C>) -> tuya_scenes::Result<()> {
/// let controller = Controller::new(registry);
///
/// let reply = controller.set_color(ColorRequest::all(RgbColor::new(128, 64, 0))).await?;
/// assert_eq!(reply, "Color changed to (128, 64, 0)");
///
/// controller.start_grouped_cycle_scene(GroupedCycleRequest::default()).await?;
/// assert_eq!(controller.list_active_scenes().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Controller<C: BulbClient> {
    registry: Arc<DeviceRegistry<C>>,
    scheduler: SceneScheduler<C>,
}

impl<C: BulbClient> Controller<C> {
    /// Creates a controller with the default scheduler configuration.
    #[must_use]
    pub fn new(registry: DeviceRegistry<C>) -> Self {
        Self::with_config(registry, SchedulerConfig::default())
    }

    /// Creates a controller with a custom scheduler configuration.
    #[must_use]
    pub fn with_config(registry: DeviceRegistry<C>, config: SchedulerConfig) -> Self {
        let registry = Arc::new(registry);
        let scheduler = SceneScheduler::new(Arc::clone(&registry), config);
        Self {
            registry,
            scheduler,
        }
    }

    /// Returns the shared registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<DeviceRegistry<C>> {
        &self.registry
    }

    /// Returns the scene scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &SceneScheduler<C> {
        &self.scheduler
    }

    // =========================================================================
    // Immediate commands
    // =========================================================================

    /// Switches the selected bulbs on or off.
    ///
    /// # Errors
    ///
    /// Does not fail today; the `Result` keeps every command uniform.
    pub async fn set_power(&self, request: PowerRequest) -> Result<String> {
        let toggles = request
            .toggles
            .unwrap_or_else(|| self.registry.toggles().commands.clone());
        let batch = self
            .registry
            .resolve(&toggles)
            .into_iter()
            .map(|(bulb, _)| (bulb, BulbCommand::Power(request.power)))
            .collect();

        self.run_now(batch).await;
        Ok(if request.power { "Power On" } else { "Power Off" }.to_string())
    }

    /// Sends one color to the selected bulbs, scaled per toggle.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if the color cannot be scaled for one of
    /// the bulbs. Nothing is sent and the running scene keeps running.
    pub async fn set_color(&self, request: ColorRequest) -> Result<String> {
        let color = request.color;
        let toggles = request
            .toggles
            .unwrap_or_else(|| self.registry.toggles().commands.clone());
        let batch = self
            .registry
            .resolve(&toggles)
            .into_iter()
            .map(|(bulb, toggle)| {
                let scaled = scaler::scale(color, toggle.multiplier)?;
                Ok((bulb, BulbCommand::Color(scaled)))
            })
            .collect::<std::result::Result<Batch<C>, ConfigurationError>>()?;

        self.run_now(batch).await;
        Ok(format!("Color changed to {color}"))
    }

    /// Sends each toggle's own color to its bulb, unscaled.
    ///
    /// # Errors
    ///
    /// Does not fail today; the `Result` keeps every command uniform.
    pub async fn set_multi_color(&self, request: MultiColorRequest) -> Result<String> {
        let toggles = request
            .toggles
            .unwrap_or_else(|| self.registry.toggles().multi_color.clone());
        let batch = self
            .registry
            .resolve_by(&toggles, |item| &item.toggle)
            .into_iter()
            .map(|(bulb, item)| (bulb, BulbCommand::Color(item.color)))
            .collect();

        self.run_now(batch).await;
        Ok("Multi colors changed".to_string())
    }

    /// Sets the white-channel brightness on the selected bulbs.
    ///
    /// # Errors
    ///
    /// Does not fail today; the range is checked when the request is built.
    pub async fn set_brightness(&self, request: BrightnessRequest) -> Result<String> {
        let toggles = request
            .toggles
            .unwrap_or_else(|| self.registry.toggles().commands.clone());
        let batch = self
            .registry
            .resolve(&toggles)
            .into_iter()
            .map(|(bulb, _)| (bulb, BulbCommand::Brightness(request.brightness)))
            .collect();

        self.run_now(batch).await;
        Ok(format!("Brightness changed to {}", request.brightness))
    }

    /// Writes the fixed [`HOLIDAY_COLORS`] table. Colors are sent as listed,
    /// without brightness scaling.
    ///
    /// # Errors
    ///
    /// Does not fail today; the `Result` keeps every command uniform.
    pub async fn set_holiday_colors(&self) -> Result<String> {
        let batch: Batch<C> = HOLIDAY_COLORS
            .iter()
            .filter_map(|&(name, color)| {
                let bulb = self.registry.find(name).ok()?;
                Some((Arc::clone(bulb), BulbCommand::Color(color)))
            })
            .collect();
        self.run_now(batch).await;
        Ok("Holiday colors set".to_string())
    }

    // =========================================================================
    // Scenes
    // =========================================================================

    /// Starts the red/green alternating scene.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidDuration` for a bad wait time.
    pub async fn start_alternating_scene(&self, request: AlternatingRequest) -> Result<String> {
        let scene = request.into_scene()?;
        Ok(self.start(scene.into()).await)
    }

    /// Starts the grouped color cycle.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::DuplicateBulb` if a bulb is listed in two
    /// groups, or a scaling error. The running scene is left alone.
    pub async fn start_grouped_cycle_scene(&self, request: GroupedCycleRequest) -> Result<String> {
        let scene = request.into_scene(self.registry.toggles())?;
        Ok(self.start(scene.into()).await)
    }

    /// Starts the per-bulb random color cycle.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::EmptyColorList` or a scaling error.
    pub async fn start_random_scene(&self, request: RandomCycleRequest) -> Result<String> {
        let scene = request.into_scene(self.registry.toggles())?;
        Ok(self.start(scene.into()).await)
    }

    /// Starts the lightning storm.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::NoBulbs` if none of the storm bulbs are
    /// registered, or the parameter validation error.
    pub async fn start_lightning_scene(&self, request: LightningRequest) -> Result<String> {
        let params = request.params()?;
        let bulbs: Vec<String> = request
            .bulb_names(self.registry.toggles())
            .into_iter()
            .filter(|name| self.registry.find(name).is_ok())
            .collect();
        let scene = LightningScene::new(bulbs, params)?;
        Ok(self.start(scene.into()).await)
    }

    /// Returns the running scene, if any, as a list.
    #[must_use]
    pub fn list_active_scenes(&self) -> Vec<SceneInfo> {
        self.scheduler.current().into_iter().collect()
    }

    /// Stops the running scene.
    ///
    /// Returns `false` if nothing was running.
    pub async fn stop_scenes(&self) -> bool {
        self.scheduler.stop().await
    }

    async fn start(&self, descriptor: SceneDescriptor) -> String {
        let kind = descriptor.kind();
        self.scheduler.start(descriptor).await;
        format!("{} scene started", kind.label())
    }

    async fn run_now(&self, batch: Batch<C>) -> DispatchReport {
        self.stop_scenes().await;
        let report = self.registry.dispatch(batch).await;
        if !report.is_complete() {
            tracing::warn!(failed = ?report.failed, "Some bulbs missed the command");
        }
        report
    }
}
