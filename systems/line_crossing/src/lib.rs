#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns the floor line signal into discrete crossing commands.
//!
//! A grid boundary is marked by a raised-signal region followed by a gap and a
//! second raised region. The detector walks `Idle -> OnLine -> Cleared` and only
//! the return to a raised signal from `Cleared` counts, so the leading and
//! trailing edges of one marking never register twice.

use maze_mapper_core::{Command, ControllerConfig};

/// Pair of simultaneous line sensor readings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSample {
    /// Reading of the left channel.
    pub left: u16,
    /// Reading of the right channel.
    pub right: u16,
}

impl LineSample {
    /// Creates a sample from both channels.
    #[must_use]
    pub const fn new(left: u16, right: u16) -> Self {
        Self { left, right }
    }

    /// Integer mean of both channels.
    #[must_use]
    pub const fn average(&self) -> u16 {
        ((self.left as u32 + self.right as u32) / 2) as u16
    }
}

/// Phase of the crossing state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinePhase {
    /// Waiting for the first raised signal.
    Idle,
    /// A line is under the robot.
    OnLine,
    /// The robot has driven off the line and awaits the next one.
    Cleared,
}

/// Stateful detector that emits one crossing per boundary marking.
#[derive(Clone, Debug)]
pub struct LineCrossingDetector {
    phase: LinePhase,
    high_threshold: u16,
    low_threshold: u16,
}

impl LineCrossingDetector {
    /// Creates a detector in the idle phase.
    #[must_use]
    pub const fn new(high_threshold: u16, low_threshold: u16) -> Self {
        Self {
            phase: LinePhase::Idle,
            high_threshold,
            low_threshold,
        }
    }

    /// Creates a detector using the configured line thresholds.
    #[must_use]
    pub const fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.line_high_threshold, config.line_low_threshold)
    }

    /// Current phase of the state machine.
    #[must_use]
    pub const fn phase(&self) -> LinePhase {
        self.phase
    }

    /// Feeds one sample and emits [`Command::RegisterLineCrossing`] on a crossing.
    ///
    /// Returns `true` when a crossing was emitted.
    pub fn handle(&mut self, sample: LineSample, out: &mut Vec<Command>) -> bool {
        let average = sample.average();
        let raised = average > self.high_threshold;

        match self.phase {
            LinePhase::Idle if raised => self.phase = LinePhase::OnLine,
            LinePhase::OnLine if average < self.low_threshold => self.phase = LinePhase::Cleared,
            LinePhase::Cleared if raised => {
                self.phase = LinePhase::Idle;
                out.push(Command::RegisterLineCrossing);
                return true;
            }
            _ => {}
        }

        false
    }
}

impl Default for LineCrossingDetector {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}
