#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Steering decisions for the maze mapping controller.
//!
//! The primary policy is a greedy left-hand wall follower driven by live
//! proximity readings. A left-hand follower alone circles forever around any
//! free-standing block of cells, so the [`Navigator`] also counts crossings
//! that discover nothing new. Once that count reaches the stall limit it
//! steers along the [`FrontierField`] towards the closest unexplored cell
//! until a new cell is found.

mod drift;
mod frontier;

pub use drift::{DriftAction, DriftCorrection, DriftReadings};
pub use frontier::{FrontierField, UNREACHABLE};

use maze_mapper_core::{Command, ControllerConfig, Event, GridView, Pose, Turn, WallState};

/// Live readings of the three forward-facing scan sensors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrontalProximity {
    /// Left sensor reading.
    pub left: u16,
    /// Front sensor reading.
    pub front: u16,
    /// Right sensor reading.
    pub right: u16,
}

/// Greedy left-hand-priority wall follower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallFollower {
    proximity_threshold: u16,
}

impl WallFollower {
    /// Creates a follower that treats readings below `proximity_threshold` as clear.
    #[must_use]
    pub const fn new(proximity_threshold: u16) -> Self {
        Self {
            proximity_threshold,
        }
    }

    /// Picks left, then straight, then right, and reverses when all three are blocked.
    #[must_use]
    pub const fn decide(&self, readings: FrontalProximity) -> Turn {
        if self.is_clear(readings.left) {
            Turn::Left
        } else if self.is_clear(readings.front) {
            Turn::Straight
        } else if self.is_clear(readings.right) {
            Turn::Right
        } else {
            Turn::Reverse
        }
    }

    const fn is_clear(&self, reading: u16) -> bool {
        WallState::classify(reading, self.proximity_threshold).is_open()
    }
}

impl Default for WallFollower {
    fn default() -> Self {
        Self::new(ControllerConfig::default().proximity_threshold)
    }
}

/// Policy that produced a steering decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Guidance {
    /// Live readings through the left-hand wall follower.
    WallFollowing,
    /// Recorded walls through the frontier distance field.
    Frontier,
}

/// Steering decision together with the policy that made it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Turn to execute.
    pub turn: Turn,
    /// Policy responsible for the turn.
    pub guidance: Guidance,
}

/// Stateful navigator combining wall following with stall recovery.
#[derive(Clone, Debug)]
pub struct Navigator {
    follower: WallFollower,
    stall_limit: u32,
    stalled_for: u32,
    field: FrontierField,
}

impl Navigator {
    /// Creates a navigator. A `stall_limit` of zero disables stall recovery.
    #[must_use]
    pub fn new(follower: WallFollower, stall_limit: u32) -> Self {
        Self {
            follower,
            stall_limit,
            stalled_for: 0,
            field: FrontierField::default(),
        }
    }

    /// Creates a navigator from the controller configuration.
    #[must_use]
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(
            WallFollower::new(config.proximity_threshold),
            config.stall_limit,
        )
    }

    /// Crossings registered since the last newly visited cell.
    #[must_use]
    pub const fn stalled_for(&self) -> u32 {
        self.stalled_for
    }

    /// Reports whether the next decision will consult the frontier field.
    #[must_use]
    pub const fn is_stalled(&self) -> bool {
        self.stall_limit > 0 && self.stalled_for >= self.stall_limit
    }

    /// Updates the stall counter from world events.
    pub fn handle_events(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::LineCrossed { .. } => {
                    self.stalled_for = self.stalled_for.saturating_add(1);
                }
                Event::CellMapped {
                    first_visit: true, ..
                } => self.stalled_for = 0,
                _ => {}
            }
        }
    }

    /// Decides how to leave the current cell and emits [`Command::Turn`].
    pub fn handle(
        &mut self,
        readings: FrontalProximity,
        pose: Pose,
        view: &GridView<'_>,
        out: &mut Vec<Command>,
    ) -> Decision {
        let decision = self
            .frontier_turn(pose, view)
            .map(|turn| Decision {
                turn,
                guidance: Guidance::Frontier,
            })
            .unwrap_or_else(|| Decision {
                turn: self.follower.decide(readings),
                guidance: Guidance::WallFollowing,
            });

        out.push(Command::Turn {
            turn: decision.turn,
        });
        decision
    }

    fn frontier_turn(&mut self, pose: Pose, view: &GridView<'_>) -> Option<Turn> {
        if !self.is_stalled() {
            return None;
        }
        let cell = view.cell(pose.cell).filter(|cell| cell.is_visited())?;
        self.field.rebuild(view);
        self.field.steer(pose, cell.walls())
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}
