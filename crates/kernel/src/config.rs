use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::geodesic::DEFAULT_MAX_CROSSINGS;

/// Mouse sensitivity used when the pointer reports raw device counts whose
/// scale is unknown (radians per count).
pub const RAW_MOUSE_SENSITIVITY: f32 = 0.000_25;

/// Errors from validating a [`FlightConfig`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
    #[error("max_crossings must be at least 1")]
    NoCrossings,
}

/// Tunables consumed by the look and motion controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightConfig {
    /// Radians of rotation per unit of pointer motion.
    pub mouse_sensitivity: f32,
    /// Arc-length per second while a movement key is held.
    pub move_speed: f32,
    /// Fixed simulation tick.
    pub tick_interval: Duration,
    /// Cap on sheet hand-offs inside one motion step.
    pub max_crossings: u32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: RAW_MOUSE_SENSITIVITY,
            move_speed: 10.0,
            tick_interval: Duration::from_millis(20),
            max_crossings: DEFAULT_MAX_CROSSINGS,
        }
    }
}

impl FlightConfig {
    /// Sensitivity that maps a pointer sweep of a quarter of the window
    /// height to one radian.
    pub fn sensitivity_for_height(height: u32) -> f32 {
        4.0 / height.max(1) as f32
    }

    /// Arc-length covered in one tick at full speed.
    pub fn arc_per_tick(&self) -> f32 {
        self.move_speed * self.tick_interval.as_secs_f32()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("mouse_sensitivity", self.mouse_sensitivity),
            ("move_speed", self.move_speed),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.max_crossings == 0 {
            return Err(ConfigError::NoCrossings);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = FlightConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert!((cfg.arc_per_tick() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = FlightConfig {
            move_speed: f32::NAN,
            ..FlightConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotPositive {
                field: "move_speed",
                ..
            })
        ));

        let cfg = FlightConfig {
            mouse_sensitivity: -1.0,
            ..FlightConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = FlightConfig {
            tick_interval: Duration::ZERO,
            ..FlightConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroTickInterval));

        let cfg = FlightConfig {
            max_crossings: 0,
            ..FlightConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoCrossings));
    }

    #[test]
    fn sensitivity_scales_with_window() {
        assert_eq!(FlightConfig::sensitivity_for_height(800), 0.005);
        assert!(FlightConfig::sensitivity_for_height(0).is_finite());
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ConfigError::NotPositive {
            field: "move_speed",
            value: 0.0,
        };
        assert_eq!(err.to_string(), "move_speed must be finite and positive, got 0");
    }
}
