#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round-robin wall scanner that assembles heading-independent cell walls.
//!
//! Each step samples one of the four scan sensors and files the result under
//! the absolute direction that sensor faces for the current heading. A full
//! round front, right, rear, left produces a [`Command::RecordWalls`].

use maze_mapper_core::{CellWalls, Command, Compass, ControllerConfig, ProximitySensor, WallState};

/// Position of the scan cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanSlot {
    /// Next sample reads the front sensor.
    Front,
    /// Next sample reads the right sensor.
    Right,
    /// Next sample reads the rear sensor.
    Rear,
    /// Next sample reads the left sensor.
    Left,
}

impl ScanSlot {
    /// Sensor sampled in this slot.
    #[must_use]
    pub const fn sensor(self) -> ProximitySensor {
        match self {
            Self::Front => ProximitySensor::Front,
            Self::Right => ProximitySensor::Right,
            Self::Rear => ProximitySensor::Rear,
            Self::Left => ProximitySensor::Left,
        }
    }

    /// Clockwise quarter turns between the heading and the sampled direction.
    #[must_use]
    pub const fn offset(self) -> i32 {
        match self {
            Self::Front => 0,
            Self::Right => 1,
            Self::Rear => 2,
            Self::Left => 3,
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::Front => Self::Right,
            Self::Right => Self::Rear,
            Self::Rear => Self::Left,
            Self::Left => Self::Front,
        }
    }
}

/// Stateful scanner; the cursor and partial results survive between calls.
#[derive(Clone, Debug)]
pub struct WallScanner {
    cursor: ScanSlot,
    pending: CellWalls,
    heading: Compass,
    proximity_threshold: u16,
}

impl WallScanner {
    /// Creates a scanner with its cursor on the front sensor.
    #[must_use]
    pub const fn new(proximity_threshold: u16) -> Self {
        Self {
            cursor: ScanSlot::Front,
            pending: CellWalls::new(
                WallState::Blocked,
                WallState::Blocked,
                WallState::Blocked,
                WallState::Blocked,
            ),
            heading: Compass::North,
            proximity_threshold,
        }
    }

    /// Creates a scanner using the configured proximity threshold.
    #[must_use]
    pub const fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.proximity_threshold)
    }

    /// Slot sampled by the next step.
    #[must_use]
    pub const fn cursor(&self) -> ScanSlot {
        self.cursor
    }

    /// Samples the sensor under the cursor and advances it.
    ///
    /// Returns the assembled walls once the cursor wraps back to the front.
    /// A round belongs to one heading. Stepping at a new heading mid-round
    /// discards the partial round and restarts at the front sensor.
    pub fn step<R>(&mut self, heading: Compass, mut read: R) -> Option<CellWalls>
    where
        R: FnMut(ProximitySensor) -> u16,
    {
        if self.cursor != ScanSlot::Front && heading != self.heading {
            self.cursor = ScanSlot::Front;
        }
        self.heading = heading;

        let slot = self.cursor;
        let state = WallState::classify(read(slot.sensor()), self.proximity_threshold);
        self.pending = self.pending.with(heading.rotate(slot.offset()), state);
        self.cursor = slot.next();

        (self.cursor == ScanSlot::Front).then_some(self.pending)
    }

    /// Completes the current round and emits [`Command::RecordWalls`].
    pub fn scan<R>(&mut self, heading: Compass, mut read: R, out: &mut Vec<Command>)
    where
        R: FnMut(ProximitySensor) -> u16,
    {
        loop {
            if let Some(walls) = self.step(heading, &mut read) {
                out.push(Command::RecordWalls { walls });
                return;
            }
        }
    }
}

impl Default for WallScanner {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}
