#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that flags dark cells as nesting areas.

use maze_mapper_core::{Cell, Command, ControllerConfig};

/// One-shot ambient light check performed after each wall scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NestingAreaDetector {
    darkness_threshold: u16,
}

impl NestingAreaDetector {
    /// Creates a detector that treats readings below `darkness_threshold` as dark.
    #[must_use]
    pub const fn new(darkness_threshold: u16) -> Self {
        Self { darkness_threshold }
    }

    /// Creates a detector using the configured darkness threshold.
    #[must_use]
    pub const fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.darkness_threshold)
    }

    /// Reports whether the reading is dark enough for a nesting area.
    #[must_use]
    pub const fn is_dark(&self, light: u16) -> bool {
        light < self.darkness_threshold
    }

    /// Emits [`Command::FlagNestingArea`] for a dark cell that is not flagged yet.
    ///
    /// Returns `true` when a command was emitted.
    pub fn handle(&self, light: u16, cell: Cell, out: &mut Vec<Command>) -> bool {
        if cell.is_nesting_area() || !self.is_dark(light) {
            return false;
        }

        out.push(Command::FlagNestingArea);
        true
    }
}

impl Default for NestingAreaDetector {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}
