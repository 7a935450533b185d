//! Distance field towards the unexplored part of the mapped grid.

use std::collections::VecDeque;

use maze_mapper_core::{CellCoord, CellWalls, Compass, GridView, Pose, Turn};

/// Distance stored for cells that cannot reach the frontier.
pub const UNREACHABLE: u16 = u16::MAX;

/// Order in which equally close directions are preferred.
const PREFERENCE: [Turn; 4] = [Turn::Left, Turn::Straight, Turn::Right, Turn::Reverse];

/// Dense crossing-count grid seeded from the frontier.
///
/// Frontier cells are unvisited cells that a visited neighbour reports as
/// reachable through an open wall. They sit at distance zero; visited cells
/// carry the number of crossings needed to reach the closest frontier cell
/// using only walls recorded as open. Everything else is [`UNREACHABLE`].
#[derive(Clone, Debug, Default)]
pub struct FrontierField {
    side: u32,
    distances: Vec<u16>,
}

impl FrontierField {
    /// Rebuilds the distances from the mapped grid using a reverse breadth-first search.
    pub fn rebuild(&mut self, view: &GridView<'_>) {
        let side = view.side();
        let side_usize = usize::try_from(side).unwrap_or(0);
        let cell_count = side_usize.checked_mul(side_usize).unwrap_or(0);

        self.side = side;
        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHABLE; cell_count];
        } else {
            self.distances.fill(UNREACHABLE);
        }

        let mut queue = VecDeque::new();

        for (coord, cell) in view.iter().filter(|(_, cell)| cell.is_visited()) {
            for direction in cell.walls().open_sides() {
                let Some(neighbor) = coord.step(direction) else {
                    continue;
                };
                if view.cell(neighbor).map_or(true, |cell| cell.is_visited()) {
                    continue;
                }
                let Some(index) = index(side, neighbor) else {
                    continue;
                };
                if self.distances[index] == 0 {
                    continue;
                }
                self.distances[index] = 0;
                queue.push_back(neighbor);
            }
        }

        while let Some(coord) = queue.pop_front() {
            let Some(current_index) = index(side, coord) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);
            if next_distance == UNREACHABLE {
                continue;
            }

            for direction in Compass::ALL {
                let Some(neighbor) = coord.step(direction) else {
                    continue;
                };
                let Some(cell) = view.cell(neighbor) else {
                    continue;
                };
                // The neighbour must have seen the wall facing back at us open.
                if !cell.is_visited() || !cell.walls().get(direction.opposite()).is_open() {
                    continue;
                }
                let Some(neighbor_index) = index(side, neighbor) else {
                    continue;
                };
                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }
                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided cell, if it lies within the field.
    #[must_use]
    pub fn distance(&self, coord: CellCoord) -> Option<u16> {
        index(self.side, coord).and_then(|index| self.distances.get(index).copied())
    }

    /// Reports whether any frontier cell exists.
    #[must_use]
    pub fn has_frontier(&self) -> bool {
        self.distances.contains(&0)
    }

    /// Picks the open direction of the current cell that leads closest to the frontier.
    ///
    /// Ties prefer left, straight, right and finally reverse. Returns `None`
    /// when no open side leads towards the frontier.
    #[must_use]
    pub fn steer(&self, pose: Pose, walls: CellWalls) -> Option<Turn> {
        PREFERENCE
            .into_iter()
            .filter_map(|turn| {
                let direction = pose.heading.rotate(turn.quarter_turns());
                if !walls.get(direction).is_open() {
                    return None;
                }
                let distance = self.distance(pose.cell.step(direction)?)?;
                (distance != UNREACHABLE).then_some((distance, turn))
            })
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, turn)| turn)
    }
}

fn index(side: u32, coord: CellCoord) -> Option<usize> {
    if coord.x() >= side || coord.y() >= side {
        return None;
    }
    let x = usize::try_from(coord.x()).ok()?;
    let y = usize::try_from(coord.y()).ok()?;
    let side = usize::try_from(side).ok()?;
    x.checked_mul(side)?.checked_add(y)
}
