use anyhow::{Context, Result as AnyResult};
use maze_mapper_core::{hardware::MapDisplay, Cell, CellCoord, Compass, WallState};
use std::io::Write;

use crate::{MapPresentation, RenderingError, ScreenSlot};

const CELL_WIDTH: usize = 4;
const CELL_HEIGHT: usize = 2;

/// Character map with `+---+` walls, `.` for visited cells and `N` for nesting areas.
#[derive(Clone, Debug)]
pub struct AsciiMap {
    side: u32,
    rows: Vec<Vec<char>>,
}

impl AsciiMap {
    /// Creates a blank map for a `side` x `side` grid.
    pub fn new(side: u32) -> Result<Self, RenderingError> {
        if side == 0 {
            return Err(RenderingError::EmptyGrid);
        }
        Ok(Self {
            side,
            rows: blank(side),
        })
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.side
    }

    /// Lines of the map from top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.rows.iter().map(|row| row.iter().collect())
    }

    fn put(&mut self, row: usize, column: usize, glyph: char) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|line| line.get_mut(column)) {
            *slot = glyph;
        }
    }

    fn draw_side(&mut self, slot: ScreenSlot, side: Compass) {
        let top = slot.row as usize * CELL_HEIGHT;
        let left = slot.column as usize * CELL_WIDTH;
        match side {
            Compass::North | Compass::South => {
                let row = if side == Compass::North {
                    top
                } else {
                    top + CELL_HEIGHT
                };
                for column in left + 1..left + CELL_WIDTH {
                    self.put(row, column, '-');
                }
            }
            Compass::East | Compass::West => {
                let column = if side == Compass::West {
                    left
                } else {
                    left + CELL_WIDTH
                };
                self.put(top + 1, column, '|');
            }
        }
    }
}

fn blank(side: u32) -> Vec<Vec<char>> {
    let side = side as usize;
    let width = side * CELL_WIDTH + 1;
    (0..=side * CELL_HEIGHT)
        .map(|row| {
            (0..width)
                .map(|column| {
                    if row % CELL_HEIGHT == 0 && column % CELL_WIDTH == 0 {
                        '+'
                    } else {
                        ' '
                    }
                })
                .collect()
        })
        .collect()
}

impl MapDisplay for AsciiMap {
    fn draw_grid_outline(&mut self, side: u32) {
        if side == 0 {
            return;
        }
        self.side = side;
        self.rows = blank(side);

        for index in 0..side {
            let edges = [
                (ScreenSlot { column: index, row: 0 }, Compass::North),
                (ScreenSlot { column: index, row: side - 1 }, Compass::South),
                (ScreenSlot { column: 0, row: index }, Compass::West),
                (ScreenSlot { column: side - 1, row: index }, Compass::East),
            ];
            for (slot, edge) in edges {
                self.draw_side(slot, edge);
            }
        }
    }

    fn draw_cell_walls(&mut self, coord: CellCoord, cell: Cell) {
        let Some(slot) = ScreenSlot::locate(coord, self.side) else {
            return;
        };
        if !cell.is_visited() {
            return;
        }

        for side in Compass::ALL {
            if cell.walls().get(side) == WallState::Blocked {
                self.draw_side(slot, side);
            }
        }

        let glyph = if cell.is_nesting_area() { 'N' } else { '.' };
        self.put(
            slot.row as usize * CELL_HEIGHT + 1,
            slot.column as usize * CELL_WIDTH + CELL_WIDTH / 2,
            glyph,
        );
    }
}

impl MapPresentation for AsciiMap {
    fn present(&self, writer: &mut dyn Write) -> AnyResult<()> {
        for line in self.lines() {
            writeln!(writer, "{line}").context("failed to write ascii map")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_map_only_has_corners() {
        let map = AsciiMap::new(2).expect("valid side");
        let lines: Vec<_> = map.lines().collect();

        assert_eq!(lines, vec!["+   +   +", "         ", "+   +   +", "         ", "+   +   +"]);
    }

    #[test]
    fn zero_side_is_rejected() {
        assert!(matches!(AsciiMap::new(0), Err(RenderingError::EmptyGrid)));
    }

    #[test]
    fn unvisited_cells_draw_nothing() {
        let mut map = AsciiMap::new(2).expect("valid side");
        map.draw_cell_walls(CellCoord::new(0, 0), Cell::UNVISITED);

        assert!(map.lines().all(|line| !line.contains('-') && !line.contains('|')));
    }
}
