use anyhow::{Context, Result as AnyResult};
use glam::Vec2;
use maze_mapper_core::{hardware::MapDisplay, Cell, CellCoord, Compass, WallState};
use std::io::Write;

use crate::{MapPresentation, RenderingError, ScreenSlot};

/// Smallest cell edge that still leaves room for the nesting marker.
const MIN_CELL_PX: u32 = 3;

/// Kind of line drawn on the LCD. Later variants take precedence when rasterised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stroke {
    /// Faint grid drawn before exploration starts.
    Outline,
    /// Cross marking a nesting area.
    Nesting,
    /// Wall recorded by a scan.
    Wall,
}

/// Straight line in LCD pixel space, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LcdSegment {
    /// Start point.
    pub from: Vec2,
    /// End point.
    pub to: Vec2,
    /// Kind of line.
    pub stroke: Stroke,
}

/// Records the line primitives the robot's LCD would draw.
#[derive(Clone, Debug)]
pub struct LcdCanvas {
    side: u32,
    cell_px: u32,
    segments: Vec<LcdSegment>,
}

impl LcdCanvas {
    /// Default cell edge in pixels.
    pub const DEFAULT_CELL_PX: u32 = 6;

    /// Creates an empty canvas for a `side` x `side` grid.
    pub fn new(side: u32, cell_px: u32) -> Result<Self, RenderingError> {
        if side == 0 {
            return Err(RenderingError::EmptyGrid);
        }
        if cell_px < MIN_CELL_PX {
            return Err(RenderingError::CellTooSmall { cell_px });
        }
        Ok(Self {
            side,
            cell_px,
            segments: Vec::new(),
        })
    }

    /// Segments drawn so far in drawing order.
    #[must_use]
    pub fn segments(&self) -> &[LcdSegment] {
        &self.segments
    }

    /// Edge length of the square drawing area in pixels.
    #[must_use]
    pub const fn size_px(&self) -> u32 {
        self.side * self.cell_px + 1
    }

    /// Rasterises every segment into a pixel grid, rows top to bottom.
    #[must_use]
    pub fn rasterize(&self) -> Vec<Vec<Option<Stroke>>> {
        let size = self.size_px() as usize;
        let mut pixels = vec![vec![None; size]; size];

        for segment in &self.segments {
            let delta = segment.to - segment.from;
            let steps = delta.abs().max_element().round().max(1.0);
            for step in 0..=steps as u32 {
                let point = (segment.from + delta * (step as f32 / steps)).round();
                let (column, row) = (point.x as usize, point.y as usize);
                if let Some(pixel) = pixels.get_mut(row).and_then(|line| line.get_mut(column)) {
                    *pixel = (*pixel).max(Some(segment.stroke));
                }
            }
        }

        pixels
    }

    fn cell_origin(&self, slot: ScreenSlot) -> Vec2 {
        Vec2::new(
            (slot.column * self.cell_px) as f32,
            (slot.row * self.cell_px) as f32,
        )
    }

    fn side_segment(&self, slot: ScreenSlot, side: Compass, stroke: Stroke) -> LcdSegment {
        let size = self.cell_px as f32;
        let top_left = self.cell_origin(slot);
        let top_right = top_left + Vec2::new(size, 0.0);
        let bottom_left = top_left + Vec2::new(0.0, size);
        let bottom_right = top_left + Vec2::splat(size);

        let (from, to) = match side {
            Compass::North => (top_left, top_right),
            Compass::East => (top_right, bottom_right),
            Compass::South => (bottom_left, bottom_right),
            Compass::West => (top_left, bottom_left),
        };
        LcdSegment { from, to, stroke }
    }
}

impl Default for LcdCanvas {
    fn default() -> Self {
        Self {
            side: maze_mapper_core::GRID_SIDE,
            cell_px: Self::DEFAULT_CELL_PX,
            segments: Vec::new(),
        }
    }
}

impl MapDisplay for LcdCanvas {
    fn draw_grid_outline(&mut self, side: u32) {
        if side == 0 {
            return;
        }
        self.side = side;
        self.segments.clear();

        for row in 0..side {
            for column in 0..side {
                let slot = ScreenSlot { column, row };
                for edge in Compass::ALL {
                    let segment = self.side_segment(slot, edge, Stroke::Outline);
                    self.segments.push(segment);
                }
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
                let segment = self.side_segment(slot, side, Stroke::Wall);
                self.segments.push(segment);
            }
        }

        if cell.is_nesting_area() {
            let inset = Vec2::ONE;
            let far = Vec2::splat(self.cell_px as f32) - inset;
            let origin = self.cell_origin(slot);
            self.segments.push(LcdSegment {
                from: origin + inset,
                to: origin + far,
                stroke: Stroke::Nesting,
            });
            self.segments.push(LcdSegment {
                from: origin + Vec2::new(far.x, inset.y),
                to: origin + Vec2::new(inset.x, far.y),
                stroke: Stroke::Nesting,
            });
        }
    }
}

impl MapPresentation for LcdCanvas {
    fn present(&self, writer: &mut dyn Write) -> AnyResult<()> {
        for row in self.rasterize() {
            let line: String = row
                .into_iter()
                .map(|pixel| match pixel {
                    None => ' ',
                    Some(Stroke::Outline) => '.',
                    Some(Stroke::Nesting) => 'x',
                    Some(Stroke::Wall) => '#',
                })
                .collect();
            writeln!(writer, "{}", line.trim_end()).context("failed to write lcd canvas")?;
        }
        Ok(())
    }
}
