use glam::Vec2;
use noneuclid_common::{Pose, Sheet};
use std::time::Duration;

use crate::config::{ConfigError, FlightConfig};
use crate::controller;
use crate::geodesic::StepReport;

/// The moving observer: sole owner of the camera pose.
///
/// Every mutation goes through `&mut self`; renderers only ever see
/// `&Pose`. The sheet tag is carried alongside the pose and refreshed from
/// the stepper's report.
#[derive(Debug, Clone)]
pub struct Flight {
    pose: Pose,
    sheet: Sheet,
    config: FlightConfig,
    ticks: u64,
}

impl Flight {
    /// Start at the sphere's reference point.
    pub fn new(config: FlightConfig) -> Result<Self, ConfigError> {
        Self::with_pose(Pose::INITIAL, config)
    }

    pub fn with_pose(pose: Pose, config: FlightConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sheet: Sheet::of(&pose),
            pose,
            config,
            ticks: 0,
        })
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn sheet(&self) -> Sheet {
        self.sheet
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    /// Number of motion ticks applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Replace the look sensitivity, e.g. after the window is resized.
    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) -> Result<(), ConfigError> {
        let config = FlightConfig {
            mouse_sensitivity: sensitivity,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Apply a pointer-motion delta.
    pub fn look(&mut self, dx: f32, dy: f32) {
        controller::look(&mut self.pose, self.config.mouse_sensitivity, dx, dy);
    }

    /// Move for `elapsed` at the configured speed in the direction of
    /// `intent`. Returns `None` when the intent is zero.
    pub fn advance(&mut self, intent: Vec2, elapsed: Duration) -> Option<StepReport> {
        let arc = self.config.move_speed * elapsed.as_secs_f32();
        let report =
            controller::move_along(&mut self.pose, intent, arc, self.config.max_crossings)?;
        if report.sheet != self.sheet {
            tracing::debug!(from = %self.sheet, to = %report.sheet, "observer changed sheet");
        }
        self.sheet = report.sheet;
        Some(report)
    }

    /// One fixed tick of motion.
    pub fn tick(&mut self, intent: Vec2) -> Option<StepReport> {
        self.ticks += 1;
        self.advance(intent, self.config.tick_interval)
    }
}
