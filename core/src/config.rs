//! Tunable thresholds, distances and delays of the controller.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Controller configuration. Every field falls back to the calibrated default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Averaged line reading above which a line is under the robot.
    pub line_high_threshold: u16,
    /// Averaged line reading below which the robot has cleared a line.
    pub line_low_threshold: u16,
    /// Proximity reading below which a side counts as open.
    pub proximity_threshold: u16,
    /// Ambient light reading below which a cell is a nesting area.
    pub darkness_threshold: u16,
    /// Diagonal proximity reading above which the heading is nudged away.
    pub drift_threshold: u16,
    /// Front proximity reading above which the robot backs off.
    pub brake_threshold: u16,
    /// Distance driven after a crossing to reach the next cell, in millimetres.
    pub cell_distance_mm: u16,
    /// Distance reversed when braking, in millimetres.
    pub back_off_mm: u16,
    /// Arc used for quarter turns, in degrees.
    pub turn_degrees: u16,
    /// Arc used to reverse at dead ends, in degrees.
    pub reversal_degrees: u16,
    /// Arc used for drift corrections, in degrees.
    pub nudge_degrees: u16,
    /// Left wheel cruise speed.
    pub left_speed: i8,
    /// Right wheel cruise speed.
    pub right_speed: i8,
    /// Pause before scanning a freshly entered cell, in milliseconds.
    pub settle_delay_ms: u64,
    /// Pause after each steering decision, in milliseconds.
    pub post_turn_delay_ms: u64,
    /// How long indicators stay lit for a nesting area, in milliseconds.
    pub indicator_hold_ms: u64,
    /// Pause after the telemetry link connects, in milliseconds.
    pub link_settle_ms: u64,
    /// Pause after the final map is drawn, in milliseconds.
    pub final_pause_ms: u64,
    /// Crossings without a new cell before frontier guidance takes over. Zero disables it.
    pub stall_limit: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            line_high_threshold: 150,
            line_low_threshold: 10,
            proximity_threshold: 100,
            darkness_threshold: 450,
            drift_threshold: 200,
            brake_threshold: 300,
            cell_distance_mm: 100,
            back_off_mm: 10,
            turn_degrees: 93,
            reversal_degrees: 192,
            nudge_degrees: 5,
            left_speed: 30,
            right_speed: 25,
            settle_delay_ms: 350,
            post_turn_delay_ms: 50,
            indicator_hold_ms: 1_000,
            link_settle_ms: 1_000,
            final_pause_ms: 10_000,
            stall_limit: 4,
        }
    }
}

impl ControllerConfig {
    /// Parses a TOML document and validates the result.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the thresholds and motion parameters are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.line_low_threshold >= self.line_high_threshold {
            return Err(ConfigError::LineThresholdsInverted {
                low: self.line_low_threshold,
                high: self.line_high_threshold,
            });
        }

        let nonzero = [
            ("cell_distance_mm", self.cell_distance_mm),
            ("turn_degrees", self.turn_degrees),
            ("reversal_degrees", self.reversal_degrees),
            ("proximity_threshold", self.proximity_threshold),
        ];
        if let Some((field, _)) = nonzero.into_iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::MustBePositive { field });
        }

        if self.left_speed <= 0 && self.right_speed <= 0 {
            return Err(ConfigError::Stationary);
        }

        Ok(())
    }

    /// Pause before scanning a freshly entered cell.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Pause after each steering decision.
    #[must_use]
    pub const fn post_turn_delay(&self) -> Duration {
        Duration::from_millis(self.post_turn_delay_ms)
    }

    /// How long indicators stay lit for a nesting area.
    #[must_use]
    pub const fn indicator_hold(&self) -> Duration {
        Duration::from_millis(self.indicator_hold_ms)
    }

    /// Pause after the telemetry link connects.
    #[must_use]
    pub const fn link_settle(&self) -> Duration {
        Duration::from_millis(self.link_settle_ms)
    }

    /// Pause after the final map is drawn.
    #[must_use]
    pub const fn final_pause(&self) -> Duration {
        Duration::from_millis(self.final_pause_ms)
    }
}

/// Reasons a configuration is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML for [`ControllerConfig`].
    #[error("failed to parse controller configuration")]
    Parse(#[from] toml::de::Error),
    /// The line thresholds leave no hysteresis band.
    #[error("line low threshold {low} must be below the high threshold {high}")]
    LineThresholdsInverted {
        /// Configured low threshold.
        low: u16,
        /// Configured high threshold.
        high: u16,
    },
    /// A distance, angle or threshold is zero.
    #[error("`{field}` must be greater than zero")]
    MustBePositive {
        /// Name of the offending field.
        field: &'static str,
    },
    /// Neither wheel drives forward.
    #[error("at least one wheel must have a positive cruise speed")]
    Stationary,
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ControllerConfig};

    #[test]
    fn empty_document_yields_defaults() {
        let config = ControllerConfig::from_toml_str("").expect("defaults are valid");
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn partial_document_overrides_selected_fields() {
        let config = ControllerConfig::from_toml_str("stall_limit = 0\nturn_degrees = 90\n")
            .expect("valid overrides");
        assert_eq!(config.stall_limit, 0);
        assert_eq!(config.turn_degrees, 90);
        assert_eq!(config.reversal_degrees, 192);
    }

    #[test]
    fn inverted_line_thresholds_are_rejected() {
        let error = ControllerConfig::from_toml_str("line_low_threshold = 200\n")
            .expect_err("low above high");
        assert!(matches!(
            error,
            ConfigError::LineThresholdsInverted {
                low: 200,
                high: 150
            }
        ));
    }

    #[test]
    fn zero_cell_distance_is_rejected() {
        let error =
            ControllerConfig::from_toml_str("cell_distance_mm = 0\n").expect_err("zero distance");
        assert!(matches!(
            error,
            ConfigError::MustBePositive {
                field: "cell_distance_mm"
            }
        ));
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let error = ControllerConfig::from_toml_str("warp_speed = 9\n").expect_err("unknown key");
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}
