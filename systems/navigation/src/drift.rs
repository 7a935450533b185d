//! Stateless drift correction from the angled and front proximity sensors.

use maze_mapper_core::ControllerConfig;

/// Readings consumed by the drift correction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriftReadings {
    /// Forward-left diagonal sensor.
    pub front_left: u16,
    /// Forward-right diagonal sensor.
    pub front_right: u16,
    /// Front sensor.
    pub front: u16,
}

/// Corrective manoeuvre requested by [`DriftCorrection::correct`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriftAction {
    /// Rotate clockwise away from a wall on the left.
    NudgeRight {
        /// Arc to rotate, in degrees.
        degrees: u16,
    },
    /// Rotate counter-clockwise away from a wall on the right.
    NudgeLeft {
        /// Arc to rotate, in degrees.
        degrees: u16,
    },
    /// Reverse away from a wall ahead.
    BackOff {
        /// Distance to reverse, in millimetres.
        millimetres: u16,
    },
}

/// Keeps the robot centred between walls while it drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriftCorrection {
    drift_threshold: u16,
    brake_threshold: u16,
    nudge_degrees: u16,
    back_off_mm: u16,
}

impl DriftCorrection {
    /// Creates a correction with explicit thresholds and manoeuvre sizes.
    #[must_use]
    pub const fn new(
        drift_threshold: u16,
        brake_threshold: u16,
        nudge_degrees: u16,
        back_off_mm: u16,
    ) -> Self {
        Self {
            drift_threshold,
            brake_threshold,
            nudge_degrees,
            back_off_mm,
        }
    }

    /// Creates a correction from the controller configuration.
    #[must_use]
    pub const fn from_config(config: &ControllerConfig) -> Self {
        Self::new(
            config.drift_threshold,
            config.brake_threshold,
            config.nudge_degrees,
            config.back_off_mm,
        )
    }

    /// First matching correction for the readings, if any.
    #[must_use]
    pub const fn correct(&self, readings: DriftReadings) -> Option<DriftAction> {
        if readings.front_left > self.drift_threshold {
            Some(DriftAction::NudgeRight {
                degrees: self.nudge_degrees,
            })
        } else if readings.front_right > self.drift_threshold {
            Some(DriftAction::NudgeLeft {
                degrees: self.nudge_degrees,
            })
        } else if readings.front > self.brake_threshold {
            Some(DriftAction::BackOff {
                millimetres: self.back_off_mm,
            })
        } else {
            None
        }
    }
}

impl Default for DriftCorrection {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}
