//! Right-hand wall following.
//!
//! Keeping a hand on the right wall means preferring, relative to the current
//! facing: turn right, then straight ahead, then turn left, then turn back.
//! On a perfect maze this walks every branch it meets and always reaches the
//! exit, though rarely by the shortest route, and it revisits cells on the
//! way back out of dead ends.

use std::collections::HashSet;

use crate::direction::Direction;
use crate::grid::Grid;
use crate::solver::Solver;
use crate::Position;

#[derive(Debug, Clone)]
pub struct WallFollowingSolver {
    current_position: Option<Position>,
    facing: Direction,
    path_taken: Vec<Position>,
    visited_positions: HashSet<Position>,
    complete: bool,
    reached_exit: bool,
}

impl Default for WallFollowingSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl WallFollowingSolver {
    pub fn new() -> Self {
        Self {
            current_position: None,
            facing: Direction::East,
            path_taken: Vec::new(),
            visited_positions: HashSet::new(),
            complete: false,
            reached_exit: false,
        }
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Display label of the facing ("up", "right", "down", "left").
    pub fn current_direction_name(&self) -> &'static str {
        self.facing.label()
    }

    /// Every cell stepped on, in order, revisits included.
    pub fn path_taken(&self) -> &[Position] {
        &self.path_taken
    }

    pub fn visited_positions(&self) -> &HashSet<Position> {
        &self.visited_positions
    }

    pub fn unique_cells_visited(&self) -> usize {
        self.visited_positions.len()
    }

    /// False when the walk stopped without finding the exit.
    pub fn reached_exit(&self) -> bool {
        self.reached_exit
    }

    fn move_to(&mut self, position: Position) {
        self.current_position = Some(position);
        self.path_taken.push(position);
        self.visited_positions.insert(position);
    }

    /// First open cell in right, straight, left, back order.
    fn next_move(&self, grid: &Grid, from: Position) -> Option<(Position, Direction)> {
        let candidates = [
            self.facing.turn_right(),
            self.facing,
            self.facing.turn_left(),
            self.facing.reverse(),
        ];

        candidates.into_iter().find_map(|dir| {
            grid.neighbor(from, dir)
                .filter(|&(row, col)| grid.is_path(row, col))
                .map(|pos| (pos, dir))
        })
    }

    fn is_exit_adjacent(grid: &Grid, from: Position) -> bool {
        let end = grid.end();
        let distance = from.0.abs_diff(end.0) + from.1.abs_diff(end.1);
        distance == 1 && grid.is_path(end.0, end.1)
    }
}

impl Solver for WallFollowingSolver {
    fn start(&mut self, grid: &Grid) {
        let start = grid.start();
        self.current_position = Some(start);
        self.facing = Direction::East;
        self.path_taken = vec![start];
        self.visited_positions = HashSet::from([start]);
        self.complete = false;
        self.reached_exit = false;
    }

    fn step(&mut self, grid: &Grid) -> bool {
        if self.complete {
            return false;
        }
        let Some(current) = self.current_position else {
            // Never started
            return false;
        };

        if current == grid.end() {
            self.complete = true;
            self.reached_exit = true;
            return false;
        }

        // Shortcut for the last junction: step straight onto an adjacent exit
        // Heading is left as it was.
        if Self::is_exit_adjacent(grid, current) {
            self.move_to(grid.end());
            self.complete = true;
            self.reached_exit = true;
            return false;
        }

        match self.next_move(grid, current) {
            Some((next, dir)) => {
                self.facing = dir;
                self.move_to(next);
                true
            }
            None => {
                tracing::warn!(
                    "Wall follower boxed in at {:?} after {} moves, stopping short of the exit",
                    current,
                    self.path_taken.len() - 1
                );
                self.complete = true;
                false
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn current_position(&self) -> Option<Position> {
        self.current_position
    }

    fn current_path(&self) -> &[Position] {
        &self.path_taken
    }
}
