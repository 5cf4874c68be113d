//! Shared stepping surface of the maze solvers.

use crate::grid::Grid;
use crate::Position;

/// A resumable solving process over a finished grid.
///
/// Solvers only ever read the grid. `step` does one bounded unit of work and
/// returns true while there is more to do.
pub trait Solver {
    fn start(&mut self, grid: &Grid);

    fn step(&mut self, grid: &Grid) -> bool;

    fn is_complete(&self) -> bool;

    fn current_position(&self) -> Option<Position>;

    /// Cells walked so far, for trail rendering.
    fn current_path(&self) -> &[Position];

    /// Steps until the solver reports completion; returns the number of
    /// steps that made progress. Safe to call on a finished solver.
    fn run_to_completion(&mut self, grid: &Grid) -> usize {
        let mut steps = 0;
        while self.step(grid) {
            steps += 1;
        }
        steps
    }
}
