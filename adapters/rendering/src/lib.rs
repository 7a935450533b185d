#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Map displays for the maze mapping controller.
//!
//! Both displays orient the map with North up and East right. Because the
//! controller's `x` axis grows northwards and its `y` axis grows westwards,
//! cell `(x, y)` lands on screen row `side - 1 - x` and column `side - 1 - y`.

mod ascii;
mod lcd;

pub use ascii::AsciiMap;
pub use lcd::{LcdCanvas, LcdSegment, Stroke};

use anyhow::Result as AnyResult;
use maze_mapper_core::CellCoord;
use std::{error::Error, fmt, io::Write};

/// Display that can present what it has drawn so far.
pub trait MapPresentation {
    /// Writes the current picture to `writer`.
    fn present(&self, writer: &mut dyn Write) -> AnyResult<()>;
}

/// Screen slot of a grid cell, counted from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScreenSlot {
    /// Zero-based column, growing eastwards.
    pub column: u32,
    /// Zero-based row, growing southwards.
    pub row: u32,
}

impl ScreenSlot {
    /// Places `coord` on a `side` x `side` screen grid.
    #[must_use]
    pub fn locate(coord: CellCoord, side: u32) -> Option<Self> {
        if coord.x() >= side || coord.y() >= side {
            return None;
        }
        Some(Self {
            column: side - 1 - coord.y(),
            row: side - 1 - coord.x(),
        })
    }
}

/// Errors that can occur when constructing map displays.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The grid must contain at least one cell.
    EmptyGrid,
    /// LCD cells must be large enough to hold a nesting marker.
    CellTooSmall {
        /// Provided cell edge that failed validation.
        cell_px: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid side must be positive"),
            Self::CellTooSmall { cell_px } => {
                write!(f, "cell edge must be at least 3 pixels (received {cell_px})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn north_is_up_and_east_is_right() {
        assert_eq!(
            ScreenSlot::locate(CellCoord::new(4, 4), 5),
            Some(ScreenSlot { column: 0, row: 0 })
        );
        assert_eq!(
            ScreenSlot::locate(CellCoord::new(2, 0), 5),
            Some(ScreenSlot { column: 4, row: 2 })
        );
        assert_eq!(ScreenSlot::locate(CellCoord::new(5, 0), 5), None);
    }

    #[test]
    fn errors_render_readable_messages() {
        assert_eq!(
            RenderingError::CellTooSmall { cell_px: 1 }.to_string(),
            "cell edge must be at least 3 pixels (received 1)"
        );
    }
}
