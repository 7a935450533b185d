//! Arena layouts loaded from TOML and validated against the grid.

use std::collections::HashSet;

use maze_mapper_core::{CellCoord, Compass, START_CELL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interior wall on one side of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WallSpec {
    /// Cell the wall belongs to.
    pub cell: CellCoord,
    /// Side of the cell closed by the wall.
    pub side: Compass,
}

/// Declarative arena description.
///
/// ```toml
/// dark_cells = [{ x = 4, y = 4 }]
///
/// [[walls]]
/// cell = { x = 2, y = 1 }
/// side = "north"
/// ```
///
/// The perimeter is always walled; only interior walls are listed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArenaLayout {
    /// Interior walls.
    pub walls: Vec<WallSpec>,
    /// Cells whose ambient light reads as dark.
    pub dark_cells: Vec<CellCoord>,
}

impl ArenaLayout {
    /// Layout with no interior walls and no dark cells.
    #[must_use]
    pub fn open() -> Self {
        Self::default()
    }

    /// Parses a TOML layout.
    pub fn from_toml_str(contents: &str) -> Result<Self, ArenaError> {
        Ok(toml::from_str(contents)?)
    }
}

/// Validated arena consulted by the simulated robot.
#[derive(Clone, Debug, Default)]
pub struct Arena {
    walls: HashSet<(CellCoord, Compass)>,
    dark_cells: HashSet<CellCoord>,
}

impl Arena {
    /// Open arena with perimeter walls only.
    #[must_use]
    pub fn open() -> Self {
        Self::default()
    }

    /// Validates a layout and normalises every wall onto both adjoining cells.
    pub fn from_layout(layout: &ArenaLayout) -> Result<Self, ArenaError> {
        let mut walls = HashSet::new();
        for wall in &layout.walls {
            ensure_in_bounds(wall.cell)?;
            let _ = walls.insert((wall.cell, wall.side));
            if let Some(neighbor) = wall.cell.step(wall.side) {
                let _ = walls.insert((neighbor, wall.side.opposite()));
            }
        }

        let mut dark_cells = HashSet::new();
        for cell in &layout.dark_cells {
            ensure_in_bounds(*cell)?;
            let _ = dark_cells.insert(*cell);
        }

        let arena = Self { walls, dark_cells };
        if arena.is_walled(START_CELL, Compass::North) {
            return Err(ArenaError::StartBlocked { cell: START_CELL });
        }
        Ok(arena)
    }

    /// Parses and validates a TOML layout in one step.
    pub fn from_toml_str(contents: &str) -> Result<Self, ArenaError> {
        Self::from_layout(&ArenaLayout::from_toml_str(contents)?)
    }

    /// Reports whether the side of `cell` facing `direction` is closed.
    #[must_use]
    pub fn is_walled(&self, cell: CellCoord, direction: Compass) -> bool {
        cell.step(direction).is_none() || self.walls.contains(&(cell, direction))
    }

    /// Reports whether `cell` is dark.
    #[must_use]
    pub fn is_dark(&self, cell: CellCoord) -> bool {
        self.dark_cells.contains(&cell)
    }
}

fn ensure_in_bounds(cell: CellCoord) -> Result<(), ArenaError> {
    if cell.in_bounds() {
        Ok(())
    } else {
        Err(ArenaError::CellOutOfBounds { cell })
    }
}

/// Reasons an arena layout is rejected.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// The document is not a valid arena layout.
    #[error("failed to parse arena layout")]
    Parse(#[from] toml::de::Error),
    /// A wall or dark cell lies outside the grid.
    #[error("cell ({}, {}) lies outside the arena", .cell.x(), .cell.y())]
    CellOutOfBounds {
        /// Offending cell.
        cell: CellCoord,
    },
    /// The robot would face a wall when it starts.
    #[error("start cell ({}, {}) must be open to the north", .cell.x(), .cell.y())]
    StartBlocked {
        /// Start cell of every run.
        cell: CellCoord,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perimeter_is_always_walled() {
        let arena = Arena::open();

        assert!(arena.is_walled(CellCoord::new(0, 2), Compass::South));
        assert!(arena.is_walled(CellCoord::new(2, 0), Compass::East));
        assert!(arena.is_walled(CellCoord::new(4, 4), Compass::North));
        assert!(arena.is_walled(CellCoord::new(4, 4), Compass::West));
        assert!(!arena.is_walled(CellCoord::new(2, 2), Compass::North));
    }

    #[test]
    fn walls_close_both_adjoining_cells() {
        let layout = ArenaLayout::from_toml_str(
            r#"
                [[walls]]
                cell = { x = 1, y = 3 }
                side = "west"
            "#,
        )
        .expect("valid layout");
        let arena = Arena::from_layout(&layout).expect("valid arena");

        assert!(arena.is_walled(CellCoord::new(1, 3), Compass::West));
        assert!(arena.is_walled(CellCoord::new(1, 4), Compass::East));
        assert!(!arena.is_walled(CellCoord::new(1, 3), Compass::North));
    }

    #[test]
    fn dark_cells_are_parsed() {
        let arena = Arena::from_toml_str("dark_cells = [{ x = 4, y = 1 }]").expect("valid arena");

        assert!(arena.is_dark(CellCoord::new(4, 1)));
        assert!(!arena.is_dark(CellCoord::new(1, 4)));
    }

    #[test]
    fn out_of_bounds_cells_are_rejected() {
        let error = Arena::from_toml_str("dark_cells = [{ x = 5, y = 0 }]")
            .expect_err("cell outside the grid");

        assert!(matches!(error, ArenaError::CellOutOfBounds { .. }));
    }

    #[test]
    fn blocked_start_is_rejected() {
        let error = Arena::from_toml_str(
            r#"
                [[walls]]
                cell = { x = 3, y = 0 }
                side = "south"
            "#,
        )
        .expect_err("start cell faces a wall");

        assert!(matches!(
            error,
            ArenaError::StartBlocked { cell } if cell == START_CELL
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = ArenaLayout::from_toml_str("doors = []").expect_err("unknown key");

        assert!(matches!(error, ArenaError::Parse(_)));
    }
}
