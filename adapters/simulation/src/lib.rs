#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic simulated robot for exercising the controller on a host.
//!
//! The robot lives in a 5x5 arena of 200 mm cells and always travels along
//! the centre line of its heading. Its position is tracked as the current cell
//! plus a signed offset from the cell centre along the heading. Every interior
//! boundary carries a double stripe on the floor, centred 20 mm either side of
//! the boundary, which the line sensors pick up.
//!
//! Each [`Locomotion::set_drive_speeds`] call is treated as one control period
//! of motion at the requested speeds.

mod arena;

pub use arena::{Arena, ArenaError, ArenaLayout, WallSpec};

use std::time::Duration;

use maze_mapper_core::{
    hardware::{
        AmbientLightSensor, Clock, Indicators, LineSensors, Locomotion, ProximitySensors, Telemetry,
    },
    CellCoord, Compass, LineChannel, ProximitySensor, START_CELL,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const CELL_SIZE_MM: i32 = 200;
const HALF_CELL_MM: i32 = CELL_SIZE_MM / 2;
/// Closest the robot's reference point gets to a wall.
const WALL_CLEARANCE_MM: i32 = 20;
const STRIPE_OFFSET_MM: i32 = 20;
const STRIPE_HALF_WIDTH_MM: i32 = 5;

const LINE_ON_STRIPE: u16 = 200;
const LINE_ON_FLOOR: u16 = 5;
const PROXIMITY_WALL: u16 = 250;
const PROXIMITY_WALL_CLOSE: u16 = 350;
const PROXIMITY_CLEAR: u16 = 20;
const LIGHT_DARK: u16 = 300;
const LIGHT_BRIGHT: u16 = 700;

const LINE_STRIPE_JITTER: u16 = 10;
const LINE_FLOOR_JITTER: u16 = 3;
const PROXIMITY_CLEAR_JITTER: u16 = 5;
const PROXIMITY_WALL_JITTER: u16 = 20;
const LIGHT_JITTER: u16 = 20;

const INDICATOR_COUNT: u8 = 8;
const CONTROL_PERIOD: Duration = Duration::from_millis(10);

/// Knobs of a simulated run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationOptions {
    /// Seed of the sensor noise generator.
    pub seed: u64,
    /// Whether sensor readings carry bounded jitter.
    pub noise: bool,
    /// Number of link polls answered with "disconnected" before the link comes up.
    pub link_delay_polls: u32,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            noise: false,
            link_delay_polls: 3,
        }
    }
}

/// Fragment sent over the simulated telemetry link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelemetryFrame {
    /// Text fragment.
    Text(String),
    /// Numeric fragment.
    Number(i64),
}

/// Simulated robot implementing every controller capability.
#[derive(Clone, Debug)]
pub struct SimulatedRobot {
    arena: Arena,
    cell: CellCoord,
    heading: Compass,
    offset_mm: i32,
    speeds: (i8, i8),
    noise: bool,
    rng: ChaCha8Rng,
    link_polls_remaining: u32,
    indicators: [bool; INDICATOR_COUNT as usize],
    indicator_activations: u32,
    telemetry: Vec<TelemetryFrame>,
    control_periods: u64,
    elapsed: Duration,
}

impl SimulatedRobot {
    /// Places a robot at the centre of the start cell facing north.
    #[must_use]
    pub fn new(arena: Arena, options: SimulationOptions) -> Self {
        Self {
            arena,
            cell: START_CELL,
            heading: Compass::North,
            offset_mm: 0,
            speeds: (0, 0),
            noise: options.noise,
            rng: ChaCha8Rng::seed_from_u64(options.seed),
            link_polls_remaining: options.link_delay_polls,
            indicators: [false; INDICATOR_COUNT as usize],
            indicator_activations: 0,
            telemetry: Vec::new(),
            control_periods: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Physical cell the robot occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Physical heading of the robot.
    #[must_use]
    pub const fn heading(&self) -> Compass {
        self.heading
    }

    /// Signed distance from the cell centre along the heading, in millimetres.
    #[must_use]
    pub const fn offset_mm(&self) -> i32 {
        self.offset_mm
    }

    /// Most recent wheel speeds.
    #[must_use]
    pub const fn drive_speeds(&self) -> (i8, i8) {
        self.speeds
    }

    /// Number of control periods simulated so far.
    #[must_use]
    pub const fn control_periods(&self) -> u64 {
        self.control_periods
    }

    /// Simulated time spent in control periods and pauses.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of times any indicator was switched on.
    #[must_use]
    pub const fn indicator_activations(&self) -> u32 {
        self.indicator_activations
    }

    /// Number of indicators currently lit.
    #[must_use]
    pub fn lit_indicators(&self) -> usize {
        self.indicators.iter().filter(|lit| **lit).count()
    }

    /// Every fragment sent over the telemetry link, in order.
    #[must_use]
    pub fn telemetry(&self) -> &[TelemetryFrame] {
        &self.telemetry
    }

    /// Telemetry fragments concatenated into text.
    #[must_use]
    pub fn transcript(&self) -> String {
        self.telemetry
            .iter()
            .map(|frame| match frame {
                TelemetryFrame::Text(text) => text.clone(),
                TelemetryFrame::Number(value) => value.to_string(),
            })
            .collect()
    }

    fn travel(&mut self, distance_mm: i32) {
        let mut offset = self.offset_mm.saturating_add(distance_mm);
        let behind = self.heading.opposite();

        loop {
            if self.arena.is_walled(self.cell, self.heading) {
                offset = offset.min(HALF_CELL_MM - WALL_CLEARANCE_MM);
            }
            if self.arena.is_walled(self.cell, behind) {
                offset = offset.max(WALL_CLEARANCE_MM - HALF_CELL_MM);
            }

            let next = if offset > HALF_CELL_MM {
                self.cell
                    .step(self.heading)
                    .map(|cell| (cell, offset - CELL_SIZE_MM))
            } else if offset < -HALF_CELL_MM {
                self.cell.step(behind).map(|cell| (cell, offset + CELL_SIZE_MM))
            } else {
                None
            };

            match next {
                Some((cell, remaining)) => {
                    self.cell = cell;
                    offset = remaining;
                }
                None => break,
            }
        }

        self.offset_mm = offset;
        tracing::trace!(
            x = self.cell.x(),
            y = self.cell.y(),
            offset_mm = self.offset_mm,
            "robot moved"
        );
    }

    fn rotate(&mut self, quarter_turns: i32) {
        if quarter_turns.rem_euclid(4) == 0 {
            return;
        }
        self.heading = self.heading.rotate(quarter_turns);
        self.offset_mm = 0;
        tracing::trace!(heading = ?self.heading, "robot turned");
    }

    fn on_stripe(&self) -> bool {
        let stripe = |distance: i32| {
            (STRIPE_OFFSET_MM - STRIPE_HALF_WIDTH_MM..=STRIPE_OFFSET_MM + STRIPE_HALF_WIDTH_MM)
                .contains(&distance)
        };
        let interior = |direction: Compass| self.cell.step(direction).is_some();

        (interior(self.heading) && stripe(HALF_CELL_MM - self.offset_mm))
            || (interior(self.heading.opposite()) && stripe(HALF_CELL_MM + self.offset_mm))
    }

    fn jitter(&mut self, value: u16, amplitude: u16) -> u16 {
        if !self.noise || amplitude == 0 {
            return value;
        }
        let delta = self.rng.gen_range(-i32::from(amplitude)..=i32::from(amplitude));
        let noisy = (i32::from(value) + delta).clamp(0, i32::from(u16::MAX));
        u16::try_from(noisy).unwrap_or(value)
    }
}

/// Quarter turns closest to the requested arc.
fn quarter_turns(degrees: u16) -> i32 {
    (i32::from(degrees) + 45) / 90
}

impl ProximitySensors for SimulatedRobot {
    fn read_proximity(&mut self, sensor: ProximitySensor) -> u16 {
        let Some(direction) = sensor.facing(self.heading) else {
            return self.jitter(PROXIMITY_CLEAR, PROXIMITY_CLEAR_JITTER);
        };

        if !self.arena.is_walled(self.cell, direction) {
            return self.jitter(PROXIMITY_CLEAR, PROXIMITY_CLEAR_JITTER);
        }

        let close = sensor == ProximitySensor::Front
            && HALF_CELL_MM - self.offset_mm <= WALL_CLEARANCE_MM;
        let reading = if close {
            PROXIMITY_WALL_CLOSE
        } else {
            PROXIMITY_WALL
        };
        self.jitter(reading, PROXIMITY_WALL_JITTER)
    }
}

impl LineSensors for SimulatedRobot {
    fn read_line(&mut self, _channel: LineChannel) -> u16 {
        if self.on_stripe() {
            self.jitter(LINE_ON_STRIPE, LINE_STRIPE_JITTER)
        } else {
            self.jitter(LINE_ON_FLOOR, LINE_FLOOR_JITTER)
        }
    }
}

impl AmbientLightSensor for SimulatedRobot {
    fn read_ambient_light(&mut self) -> u16 {
        let reading = if self.arena.is_dark(self.cell) {
            LIGHT_DARK
        } else {
            LIGHT_BRIGHT
        };
        self.jitter(reading, LIGHT_JITTER)
    }
}

impl Locomotion for SimulatedRobot {
    fn set_drive_speeds(&mut self, left: i8, right: i8) {
        self.speeds = (left, right);
        self.control_periods = self.control_periods.saturating_add(1);
        self.elapsed += CONTROL_PERIOD;

        let advance = (i32::from(left) + i32::from(right)) / 2 / 5;
        if advance != 0 {
            self.travel(advance);
        }
    }

    fn turn_left(&mut self, degrees: u16) {
        self.rotate(-quarter_turns(degrees));
    }

    fn turn_right(&mut self, degrees: u16) {
        self.rotate(quarter_turns(degrees));
    }

    fn move_forward(&mut self, millimetres: u16) {
        self.travel(i32::from(millimetres));
    }

    fn move_backward(&mut self, millimetres: u16) {
        self.travel(-i32::from(millimetres));
    }
}

impl Indicators for SimulatedRobot {
    fn indicator_count(&self) -> u8 {
        INDICATOR_COUNT
    }

    fn set_indicator(&mut self, index: u8, on: bool) {
        let Some(slot) = self.indicators.get_mut(usize::from(index)) else {
            return;
        };
        if on && !*slot {
            self.indicator_activations = self.indicator_activations.saturating_add(1);
        }
        *slot = on;
    }
}

impl Clock for SimulatedRobot {
    fn pause(&mut self, duration: Duration) {
        self.elapsed += duration;
    }
}

impl Telemetry for SimulatedRobot {
    fn send_text(&mut self, text: &str) {
        self.telemetry.push(TelemetryFrame::Text(text.to_owned()));
    }

    fn send_number(&mut self, value: i64) {
        self.telemetry.push(TelemetryFrame::Number(value));
    }

    fn is_link_connected(&mut self) -> bool {
        if self.link_polls_remaining == 0 {
            return true;
        }
        self.link_polls_remaining -= 1;
        false
    }
}
