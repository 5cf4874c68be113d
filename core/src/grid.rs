//! The maze grid: a `rows × cols` matrix of wall and path cells plus the
//! entrance and exit markers.
//!
//! All coordinate access is bounds-checked. Reads outside the grid report
//! [`Cell::Wall`] and writes outside the grid are ignored, so callers probing
//! neighbours never need their own guards.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
    start: Position,
    end: Position,
}

impl Grid {
    /// An all-wall grid with both markers at `(0, 0)`.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows >= 1 && cols >= 1, "Grid dimensions must be at least 1x1");

        Self {
            cells: vec![Cell::Wall; rows * cols],
            rows,
            cols,
            start: (0, 0),
            end: (0, 0),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Moves the entrance marker. Does not carve.
    pub fn set_start(&mut self, position: Position) {
        self.start = position;
    }

    /// Moves the exit marker. Does not carve.
    pub fn set_end(&mut self, position: Position) {
        self.end = position;
    }

    pub fn is_valid_position(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        if self.is_valid_position(row, col) {
            self.cells[row * self.cols + col]
        } else {
            Cell::Wall
        }
    }

    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) == Cell::Wall
    }

    pub fn is_path(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) == Cell::Path
    }

    /// Turns a cell into path. Out-of-bounds positions are ignored and path
    /// cells never turn back into walls.
    pub fn carve(&mut self, row: usize, col: usize) {
        if self.is_valid_position(row, col) {
            self.cells[row * self.cols + col] = Cell::Path;
        }
    }

    /// In-bounds orthogonal neighbours, ordered North, East, South, West.
    pub fn neighbors4(&self, row: usize, col: usize) -> Vec<Position> {
        Direction::ALL
            .iter()
            .filter_map(|dir| self.neighbor((row, col), *dir))
            .collect()
    }

    /// The neighbour one step in `dir`, if it lies inside the grid.
    pub fn neighbor(&self, position: Position, dir: Direction) -> Option<Position> {
        dir.step_from(position)
            .filter(|&(row, col)| self.is_valid_position(row, col))
    }

    pub fn path_cell_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == Cell::Path).count()
    }

    /// Cells reachable from `from` through path cells (breadth-first).
    ///
    /// Returns an empty list when `from` itself is a wall.
    pub fn reachable_from(&self, from: Position) -> Vec<Position> {
        if !self.is_path(from.0, from.1) {
            return Vec::new();
        }

        let mut seen = vec![false; self.rows * self.cols];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([from]);
        seen[from.0 * self.cols + from.1] = true;

        while let Some(pos) = queue.pop_front() {
            order.push(pos);
            for next in self.neighbors4(pos.0, pos.1) {
                let idx = next.0 * self.cols + next.1;
                if !seen[idx] && self.is_path(next.0, next.1) {
                    seen[idx] = true;
                    queue.push_back(next);
                }
            }
        }

        order
    }

    /// True when `end` can be reached from `start` over path cells.
    pub fn is_solvable(&self) -> bool {
        self.reachable_from(self.start).contains(&self.end)
    }

    /// Binary rows: 0 = wall, 1 = path.
    pub fn to_binary_grid(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| {
                row.iter()
                    .map(|&cell| match cell {
                        Cell::Wall => 0,
                        Cell::Path => 1,
                    })
                    .collect()
            })
            .collect()
    }
}
