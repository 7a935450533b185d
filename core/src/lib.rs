#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze mapping controller.
//!
//! This crate defines the message surface that connects the control loop, the
//! authoritative world and the pure mapping systems. Systems observe sensor
//! snapshots and immutable views, respond with [`Command`] values, the world
//! executes those commands via its `apply` entry point and then broadcasts
//! [`Event`] values describing what changed. Hardware is reached only through
//! the capability traits in [`hardware`].

use serde::{Deserialize, Serialize};

pub mod config;
pub mod hardware;

pub use config::{ConfigError, ControllerConfig};

/// Number of cells along each edge of the square arena.
pub const GRID_SIDE: u32 = 5;

/// Cell the robot occupies when exploration starts.
pub const START_CELL: CellCoord = CellCoord::new(2, 0);

/// Cardinal orientation of the robot or of a wall.
///
/// The enumeration order matters: rotating by `+1` is a right turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compass {
    /// Facing towards increasing `x`.
    North,
    /// Facing towards decreasing `y`.
    East,
    /// Facing towards decreasing `x`.
    South,
    /// Facing towards increasing `y`.
    West,
}

impl Compass {
    /// Every orientation in clockwise order starting at north.
    pub const ALL: [Compass; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Position of the orientation within the clockwise cycle.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Orientation at the provided cycle position, wrapping modulo four.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            _ => Self::West,
        }
    }

    /// Rotates by `delta` quarter turns; positive values turn clockwise.
    ///
    /// Total for every `delta`, so `rotate(rotate(c, a), b) == rotate(c, a + b)`.
    #[must_use]
    pub const fn rotate(self, delta: i32) -> Self {
        let wrapped = (self.index() as i32 + delta).rem_euclid(4);
        Self::from_index(wrapped as u8)
    }

    /// Orientation facing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        self.rotate(2)
    }
}

/// Discrete steering decision taken at a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    /// Quarter turn counter-clockwise.
    Left,
    /// Keep the current heading.
    Straight,
    /// Quarter turn clockwise.
    Right,
    /// Half turn back towards the previous cell.
    Reverse,
}

impl Turn {
    /// Compass rotation applied by the turn, in quarter turns.
    #[must_use]
    pub const fn quarter_turns(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Straight => 0,
            Self::Right => 1,
            Self::Reverse => 2,
        }
    }
}

/// Whether a side of a cell can be driven through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallState {
    /// Nothing blocks the side.
    Open,
    /// A wall closes the side.
    #[default]
    Blocked,
}

impl WallState {
    /// Classifies an infrared proximity reading.
    ///
    /// Readings grow as obstacles get closer, so anything below `threshold`
    /// counts as open.
    #[must_use]
    pub const fn classify(reading: u16, threshold: u16) -> Self {
        if reading < threshold {
            Self::Open
        } else {
            Self::Blocked
        }
    }

    /// Reports whether the side is open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Wall states of a single cell keyed by absolute direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CellWalls {
    north: WallState,
    east: WallState,
    south: WallState,
    west: WallState,
}

impl CellWalls {
    /// Creates a wall set from explicit absolute sides.
    #[must_use]
    pub const fn new(north: WallState, east: WallState, south: WallState, west: WallState) -> Self {
        Self {
            north,
            east,
            south,
            west,
        }
    }

    /// Wall set with every side open.
    #[must_use]
    pub const fn open() -> Self {
        Self::new(
            WallState::Open,
            WallState::Open,
            WallState::Open,
            WallState::Open,
        )
    }

    /// State of the side facing `direction`.
    #[must_use]
    pub const fn get(&self, direction: Compass) -> WallState {
        match direction {
            Compass::North => self.north,
            Compass::East => self.east,
            Compass::South => self.south,
            Compass::West => self.west,
        }
    }

    /// Returns a copy with the side facing `direction` replaced.
    #[must_use]
    pub const fn with(mut self, direction: Compass, state: WallState) -> Self {
        match direction {
            Compass::North => self.north = state,
            Compass::East => self.east = state,
            Compass::South => self.south = state,
            Compass::West => self.west = state,
        }
        self
    }

    /// Iterator over the directions whose side is open, clockwise from north.
    pub fn open_sides(&self) -> impl Iterator<Item = Compass> + '_ {
        Compass::ALL
            .into_iter()
            .filter(|direction| self.get(*direction).is_open())
    }
}

/// Location of a grid cell.
///
/// Coordinates follow the controller's axis convention: heading north
/// increases `x`, heading west increases `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Coordinate along the north/south axis.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Coordinate along the east/west axis.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Reports whether the coordinate lies inside the arena.
    #[must_use]
    pub const fn in_bounds(&self) -> bool {
        self.x < GRID_SIDE && self.y < GRID_SIDE
    }

    /// Neighbouring cell one step along `heading`.
    ///
    /// North: +x, East: -y, South: -x, West: +y. Returns `None` when the
    /// step would leave the arena.
    #[must_use]
    pub fn step(self, heading: Compass) -> Option<CellCoord> {
        let next = match heading {
            Compass::North => CellCoord::new(self.x.checked_add(1)?, self.y),
            Compass::East => CellCoord::new(self.x, self.y.checked_sub(1)?),
            Compass::South => CellCoord::new(self.x.checked_sub(1)?, self.y),
            Compass::West => CellCoord::new(self.x, self.y.checked_add(1)?),
        };
        next.in_bounds().then_some(next)
    }
}

/// Mapped state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    walls: CellWalls,
    visited: bool,
    nesting_area: bool,
}

impl Cell {
    /// Cell that has never been scanned.
    pub const UNVISITED: Cell = Cell {
        walls: CellWalls::new(
            WallState::Blocked,
            WallState::Blocked,
            WallState::Blocked,
            WallState::Blocked,
        ),
        visited: false,
        nesting_area: false,
    };

    /// Absolute wall states. Meaningless until [`Cell::is_visited`] holds.
    #[must_use]
    pub const fn walls(&self) -> CellWalls {
        self.walls
    }

    /// Reports whether the cell has been scanned at least once.
    #[must_use]
    pub const fn is_visited(&self) -> bool {
        self.visited
    }

    /// Reports whether the cell was flagged as a nesting area.
    #[must_use]
    pub const fn is_nesting_area(&self) -> bool {
        self.nesting_area
    }

    /// Copy of the cell after a completed wall scan.
    ///
    /// The first scan starts the nesting flag cleared; later scans refresh the
    /// walls and keep whatever flag the cell already carries.
    #[must_use]
    pub const fn mapped(self, walls: CellWalls) -> Self {
        Self {
            walls,
            visited: true,
            nesting_area: self.visited && self.nesting_area,
        }
    }

    /// Copy of the cell flagged as a nesting area.
    #[must_use]
    pub const fn with_nesting_area(self) -> Self {
        Self {
            nesting_area: true,
            ..self
        }
    }
}

/// Position and heading of the robot inside the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pose {
    /// Cell the robot is believed to occupy.
    pub cell: CellCoord,
    /// Direction the robot faces.
    pub heading: Compass,
}

impl Pose {
    /// Pose at the start of every run.
    pub const START: Pose = Pose {
        cell: START_CELL,
        heading: Compass::North,
    };
}

/// Infrared proximity sensors mounted around the chassis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProximitySensor {
    /// Facing straight ahead.
    Front,
    /// Facing the right-hand side.
    Right,
    /// Facing backwards.
    Rear,
    /// Facing the left-hand side.
    Left,
    /// Angled forward-left, used for drift correction.
    FrontLeft,
    /// Angled forward-right, used for drift correction.
    FrontRight,
}

impl ProximitySensor {
    /// Clockwise quarter-turn offset from the heading for the four scan sensors.
    #[must_use]
    pub const fn heading_offset(self) -> Option<i32> {
        match self {
            Self::Front => Some(0),
            Self::Right => Some(1),
            Self::Rear => Some(2),
            Self::Left => Some(3),
            Self::FrontLeft | Self::FrontRight => None,
        }
    }

    /// Absolute direction the sensor looks at for the provided heading.
    #[must_use]
    pub fn facing(self, heading: Compass) -> Option<Compass> {
        self.heading_offset().map(|offset| heading.rotate(offset))
    }
}

/// Floor-facing line sensor channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineChannel {
    /// Sensor under the left edge of the chassis.
    Left,
    /// Sensor under the right edge of the chassis.
    Right,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Counts a confirmed grid-line crossing and advances the pose along its heading.
    RegisterLineCrossing,
    /// Stores a completed wall scan in the current cell and marks it visited.
    RecordWalls {
        /// Absolute wall states observed in the current cell.
        walls: CellWalls,
    },
    /// Flags the current cell as a nesting area once it is mapped and unflagged.
    FlagNestingArea,
    /// Rotates the heading according to a steering decision.
    Turn {
        /// Decision taken by the navigation system.
        turn: Turn,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a grid line was crossed.
    LineCrossed {
        /// Number of crossings registered since start.
        total: u32,
    },
    /// Confirms that the pose moved to the adjacent cell.
    PositionAdvanced {
        /// Cell occupied before the crossing.
        from: CellCoord,
        /// Cell occupied after the crossing.
        to: CellCoord,
        /// Heading used to advance.
        heading: Compass,
    },
    /// Reports a crossing that would have left the arena; the pose stays put.
    CrossingOutOfBounds {
        /// Cell the pose still occupies.
        cell: CellCoord,
        /// Heading that pointed outside the arena.
        heading: Compass,
    },
    /// Confirms that a wall scan was stored.
    CellMapped {
        /// Cell that received the scan.
        cell: CellCoord,
        /// Absolute walls written to the cell.
        walls: CellWalls,
        /// Whether this scan marked the cell visited for the first time.
        first_visit: bool,
    },
    /// Confirms that a cell was flagged as a nesting area for the first time.
    NestingAreaFlagged {
        /// Cell that was flagged.
        cell: CellCoord,
        /// Number of nesting areas found since start.
        total: u32,
    },
    /// Confirms that the heading changed.
    HeadingChanged {
        /// Heading before the turn.
        from: Compass,
        /// Heading after the turn.
        to: Compass,
        /// Decision that caused the change.
        turn: Turn,
    },
}

/// Read-only view into the dense cell store.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [Cell],
    side: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by `side * side` cells stored x-major.
    #[must_use]
    pub fn new(cells: &'a [Cell], side: u32) -> Self {
        Self { cells, side }
    }

    /// Number of cells along each edge of the grid.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Returns the cell stored at `coord`, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<Cell> {
        self.index(coord)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Iterates over every cell together with its coordinate.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + 'a {
        let side = self.side.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index / side, index % side), *cell)
        })
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if coord.x() < self.side && coord.y() < self.side {
            let x = usize::try_from(coord.x()).ok()?;
            let y = usize::try_from(coord.y()).ok()?;
            let side = usize::try_from(self.side).ok()?;
            Some(x * side + y)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, CellCoord, CellWalls, Compass, GridView, Turn, WallState, GRID_SIDE};

    #[test]
    fn rotate_composes_additively() {
        for compass in Compass::ALL {
            for first in -8..=8 {
                for second in -8..=8 {
                    assert_eq!(
                        compass.rotate(first).rotate(second),
                        compass.rotate(first + second),
                        "{compass:?} rotated by {first} then {second}",
                    );
                }
            }
        }
    }

    #[test]
    fn rotate_is_a_bijection() {
        for delta in -5..=5 {
            let mut images: Vec<_> = Compass::ALL
                .iter()
                .map(|compass| compass.rotate(delta).index())
                .collect();
            images.sort_unstable();
            assert_eq!(images, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn turns_map_to_expected_rotations() {
        assert_eq!(Compass::North.rotate(Turn::Left.quarter_turns()), Compass::West);
        assert_eq!(Compass::West.rotate(Turn::Right.quarter_turns()), Compass::North);
        assert_eq!(Compass::East.rotate(Turn::Reverse.quarter_turns()), Compass::West);
        assert_eq!(Compass::South.rotate(Turn::Straight.quarter_turns()), Compass::South);
    }

    #[test]
    fn step_follows_axis_convention() {
        let origin = CellCoord::new(2, 2);
        assert_eq!(origin.step(Compass::North), Some(CellCoord::new(3, 2)));
        assert_eq!(origin.step(Compass::East), Some(CellCoord::new(2, 1)));
        assert_eq!(origin.step(Compass::South), Some(CellCoord::new(1, 2)));
        assert_eq!(origin.step(Compass::West), Some(CellCoord::new(2, 3)));
    }

    #[test]
    fn step_refuses_to_leave_the_arena() {
        assert_eq!(CellCoord::new(2, 0).step(Compass::East), None);
        assert_eq!(CellCoord::new(0, 3).step(Compass::South), None);
        assert_eq!(CellCoord::new(GRID_SIDE - 1, 1).step(Compass::North), None);
        assert_eq!(CellCoord::new(1, GRID_SIDE - 1).step(Compass::West), None);
    }

    #[test]
    fn proximity_classification_treats_low_readings_as_open() {
        assert_eq!(WallState::classify(99, 100), WallState::Open);
        assert_eq!(WallState::classify(100, 100), WallState::Blocked);
        assert_eq!(WallState::classify(400, 100), WallState::Blocked);
    }

    #[test]
    fn rescans_keep_the_nesting_flag() {
        let flagged = Cell::UNVISITED
            .mapped(CellWalls::open())
            .with_nesting_area();
        let rescanned = flagged.mapped(CellWalls::default());
        assert!(rescanned.is_nesting_area());
        assert_eq!(rescanned.walls(), CellWalls::default());
    }

    #[test]
    fn first_scan_starts_with_cleared_nesting_flag() {
        let mapped = Cell::UNVISITED.mapped(CellWalls::open());
        assert!(mapped.is_visited());
        assert!(!mapped.is_nesting_area());
    }

    #[test]
    fn grid_view_iterates_x_major() {
        let mut cells = vec![Cell::UNVISITED; 4];
        cells[1] = cells[1].mapped(CellWalls::open());
        let view = GridView::new(&cells, 2);

        let visited: Vec<_> = view
            .iter()
            .filter(|(_, cell)| cell.is_visited())
            .map(|(coord, _)| coord)
            .collect();
        assert_eq!(visited, vec![CellCoord::new(0, 1)]);
        assert!(view.cell(CellCoord::new(0, 1)).is_some_and(|cell| cell.is_visited()));
        assert!(view.cell(CellCoord::new(2, 0)).is_none());
    }
}
