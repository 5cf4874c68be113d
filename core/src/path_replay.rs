//! Replays a path captured during generation, one cell per step.
//!
//! No searching happens here: the replay is a pure function of the stored
//! path, so two replays of the same path visit the same cells in the same
//! order.

use crate::grid::Grid;
use crate::solver::Solver;
use crate::Position;

#[derive(Debug, Clone, Default)]
pub struct PathReplaySolver {
    path: Vec<Position>,
    cursor: usize,
    current_position: Option<Position>,
    complete: bool,
}

impl PathReplaySolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the path to replay and rewinds to its beginning.
    pub fn set_path(&mut self, path: Vec<Position>) {
        self.path = path;
        self.cursor = 0;
        self.complete = false;
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Prefix of the path walked so far.
    pub fn current_path_so_far(&self) -> &[Position] {
        &self.path[..self.cursor]
    }

    /// Empties the visible trail. The stored path is kept.
    pub fn clear_trail(&mut self) {
        self.cursor = 0;
    }
}

impl Solver for PathReplaySolver {
    fn start(&mut self, grid: &Grid) {
        self.cursor = 0;
        self.complete = false;
        self.current_position = Some(grid.start());
    }

    fn step(&mut self, _grid: &Grid) -> bool {
        let Some(&next) = self.path.get(self.cursor) else {
            self.complete = true;
            return false;
        };

        self.current_position = Some(next);
        self.cursor += 1;
        true
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn current_position(&self) -> Option<Position> {
        self.current_position
    }

    fn current_path(&self) -> &[Position] {
        self.current_path_so_far()
    }
}
