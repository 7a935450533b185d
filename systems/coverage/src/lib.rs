#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Visitation tracking over the mapped grid.

use maze_mapper_core::GridView;

/// Snapshot of how much of the grid has been scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Coverage {
    visited: usize,
    total: usize,
}

impl Coverage {
    /// Counts visited cells in the provided view.
    #[must_use]
    pub fn measure(view: &GridView<'_>) -> Self {
        let (visited, total) = view.iter().fold((0, 0), |(visited, total), (_, cell)| {
            (visited + usize::from(cell.is_visited()), total + 1)
        });
        Self { visited, total }
    }

    /// Number of visited cells.
    #[must_use]
    pub const fn visited(&self) -> usize {
        self.visited
    }

    /// Number of cells in the grid.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Reports whether every cell has been visited.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.visited == self.total
    }
}

/// Reports whether every cell in the view has been visited.
#[must_use]
pub fn all_visited(view: &GridView<'_>) -> bool {
    view.iter().all(|(_, cell)| cell.is_visited())
}

/// Number of visited cells in the view.
#[must_use]
pub fn visited_count(view: &GridView<'_>) -> usize {
    Coverage::measure(view).visited()
}
