#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative map, pose and counters of the maze mapping controller.

use maze_mapper_core::{Cell, CellCoord, Command, Event, Pose, GRID_SIDE};

/// Represents the authoritative world state owned by the control loop.
#[derive(Debug)]
pub struct World {
    cells: Vec<Cell>,
    pose: Pose,
    lines_crossed: u32,
    nesting_area_count: u32,
}

impl World {
    /// Creates a world with every cell unvisited and the robot at the start pose.
    #[must_use]
    pub fn new() -> Self {
        let side = usize::try_from(GRID_SIDE).unwrap_or(0);
        Self {
            cells: vec![Cell::UNVISITED; side * side],
            pose: Pose::START,
            lines_crossed: 0,
            nesting_area_count: 0,
        }
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if !coord.in_bounds() {
            return None;
        }
        let x = usize::try_from(coord.x()).ok()?;
        let y = usize::try_from(coord.y()).ok()?;
        let side = usize::try_from(GRID_SIDE).ok()?;
        Some(x * side + y)
    }

    fn current_cell_mut(&mut self) -> Option<&mut Cell> {
        let index = self.index(self.pose.cell)?;
        self.cells.get_mut(index)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::RegisterLineCrossing => {
            world.lines_crossed = world.lines_crossed.saturating_add(1);
            out_events.push(Event::LineCrossed {
                total: world.lines_crossed,
            });

            let from = world.pose.cell;
            let heading = world.pose.heading;
            match from.step(heading) {
                Some(to) => {
                    world.pose.cell = to;
                    out_events.push(Event::PositionAdvanced { from, to, heading });
                }
                None => out_events.push(Event::CrossingOutOfBounds {
                    cell: from,
                    heading,
                }),
            }
        }
        Command::RecordWalls { walls } => {
            let cell = world.pose.cell;
            if let Some(slot) = world.current_cell_mut() {
                let first_visit = !slot.is_visited();
                *slot = slot.mapped(walls);
                out_events.push(Event::CellMapped {
                    cell,
                    walls,
                    first_visit,
                });
            }
        }
        Command::FlagNestingArea => {
            let cell = world.pose.cell;
            let Some(slot) = world.current_cell_mut() else {
                return;
            };
            if !slot.is_visited() || slot.is_nesting_area() {
                return;
            }
            *slot = slot.with_nesting_area();
            world.nesting_area_count = world.nesting_area_count.saturating_add(1);
            out_events.push(Event::NestingAreaFlagged {
                cell,
                total: world.nesting_area_count,
            });
        }
        Command::Turn { turn } => {
            let from = world.pose.heading;
            let to = from.rotate(turn.quarter_turns());
            world.pose.heading = to;
            if from != to {
                out_events.push(Event::HeadingChanged { from, to, turn });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_mapper_core::{Cell, CellCoord, GridView, Pose, GRID_SIDE};

    use super::World;

    /// Current pose estimate of the robot.
    #[must_use]
    pub fn pose(world: &World) -> Pose {
        world.pose
    }

    /// Exposes a read-only view of the cell store.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView::new(&world.cells, GRID_SIDE)
    }

    /// Returns the cell stored at `coord`, if it lies inside the arena.
    #[must_use]
    pub fn cell(world: &World, coord: CellCoord) -> Option<Cell> {
        world
            .index(coord)
            .and_then(|index| world.cells.get(index).copied())
    }

    /// Returns the cell the robot currently occupies.
    #[must_use]
    pub fn current_cell(world: &World) -> Option<Cell> {
        cell(world, world.pose.cell)
    }

    /// Number of grid-line crossings registered so far.
    #[must_use]
    pub fn lines_crossed(world: &World) -> u32 {
        world.lines_crossed
    }

    /// Number of distinct nesting areas found so far.
    #[must_use]
    pub fn nesting_area_count(world: &World) -> u32 {
        world.nesting_area_count
    }
}
