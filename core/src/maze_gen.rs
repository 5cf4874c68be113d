//! Maze generation using an incremental Recursive Backtracker
//!
//! Rooms live on the odd-indexed lattice strictly inside the border; the cells
//! between two rooms are walls until the search carves through them. Every
//! call to [`Generator::step`] performs exactly one push or one pop so a
//! driver can animate the carving.
//!
//! Algorithm: Recursive Backtracker (DFS with backtracking)
//! 1. Place the entrance on the left border and the exit on the right border,
//!    seed the search at the room next to the entrance
//! 2. Each step, with the head of the stack:
//!    - If the exit is immediately to the right, capture the stack as the
//!      solution path (first time only)
//!    - Try the four lattice moves in shuffled order; on the first unvisited
//!      room, carve the wall between, carve the room, push it
//!    - Else: backtrack (pop)
//! 3. When a step finds the stack empty, connect the markers to the carved
//!    corridors if they are not already touching one, and report completion

use std::collections::{HashMap, VecDeque};

use crate::grid::Grid;
use crate::rng::RandomSource;
use crate::Position;

/// Moves between neighbouring rooms: two cells along one axis.
const LATTICE_MOVES: [(isize, isize); 4] = [(0, 2), (2, 0), (0, -2), (-2, 0)];

/// Neighbour order used when searching for the nearest corridor.
const CONNECT_ORDER: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    Carving,
    Done,
}

/// Step-driven maze generator.
///
/// The grid is borrowed mutably per call rather than owned, so that the same
/// grid can be handed read-only to the solvers once carving is done.
#[derive(Debug, Clone)]
pub struct Generator<R> {
    rng: R,
    visited: Vec<bool>,
    cols: usize,
    stack: Vec<Position>,
    current_position: Option<Position>,
    phase: GenerationPhase,
    captured_path: Vec<Position>,
    exit_found: bool,
    started: bool,
}

impl<R: RandomSource> Generator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            visited: Vec::new(),
            cols: 0,
            stack: Vec::new(),
            current_position: None,
            phase: GenerationPhase::Carving,
            captured_path: Vec::new(),
            exit_found: false,
            started: false,
        }
    }

    /// Places the entrance and exit and seeds the search.
    ///
    /// Calling this a second time has no effect: visitation state is one-shot.
    pub fn start_generation(&mut self, grid: &mut Grid) {
        if self.started {
            tracing::debug!("Generation already started, ignoring restart");
            return;
        }
        self.started = true;

        let rows = grid.rows();
        let cols = grid.cols();
        self.visited = vec![false; rows * cols];
        self.cols = cols;

        let start = (self.rand_edge_row(rows), 0);
        let end = (self.rand_edge_row(rows), cols - 1);
        grid.set_start(start);
        grid.set_end(end);
        grid.carve(start.0, start.1);
        grid.carve(end.0, end.1);

        let seed = if rows >= 3 && cols >= 3 {
            // The room next to the entrance: odd row, column 1. Carving it is
            // what connects the entrance to the lattice.
            (start.0, 1)
        } else {
            (0, 0)
        };

        grid.carve(seed.0, seed.1);
        self.mark_visited(seed);
        self.current_position = Some(seed);

        // Degenerate grids have no room to explore from, so the stack stays
        // empty and the first step completes generation.
        if rows >= 3 && cols >= 3 {
            self.stack.push(seed);
        }

        tracing::debug!(
            "Generation started on {}x{} grid: seed {:?}, entrance {:?}, exit {:?}",
            rows,
            cols,
            seed,
            start,
            end
        );
    }

    /// Performs one unit of generation. Returns true while generation continues.
    pub fn step(&mut self, grid: &mut Grid) -> bool {
        if !self.started || self.phase == GenerationPhase::Done {
            return false;
        }

        let Some(&(x, y)) = self.stack.last() else {
            self.finish(grid);
            return false;
        };

        // The exit always sits on the right border, so only the right
        // neighbour is checked.
        if !self.exit_found && (x, y + 1) == grid.end() {
            self.exit_found = true;
            let mut path = materialize(&self.stack);
            path.push(grid.end());
            tracing::debug!(
                "Exit reached from {:?}, captured a {}-cell path",
                (x, y),
                path.len()
            );
            self.captured_path = path;
        }

        let mut moves = LATTICE_MOVES;
        self.rng.shuffle(&mut moves);

        let rows = grid.rows() as isize;
        let cols = grid.cols() as isize;

        for (dx, dy) in moves {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if !(0 < nx && nx < rows - 1 && 0 < ny && ny < cols - 1) {
                continue;
            }

            let next = (nx as usize, ny as usize);
            if self.is_visited(next) {
                continue;
            }

            let wall = (
                (x as isize + dx / 2) as usize,
                (y as isize + dy / 2) as usize,
            );
            grid.carve(wall.0, wall.1);
            grid.carve(next.0, next.1);
            self.mark_visited(next);
            self.stack.push(next);
            self.current_position = Some(next);
            return true;
        }

        // Dead end: backtrack. Completion is detected on the next call.
        self.stack.pop();
        if let Some(&top) = self.stack.last() {
            self.current_position = Some(top);
        }

        true
    }

    /// Runs generation to the end, starting it first if needed.
    ///
    /// Returns the number of steps that reported progress.
    pub fn run_to_completion(&mut self, grid: &mut Grid) -> usize {
        if !self.started {
            self.start_generation(grid);
        }

        let mut steps = 0;
        while self.step(grid) {
            steps += 1;
        }
        steps
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_complete(&self) -> bool {
        self.phase == GenerationPhase::Done
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn current_position(&self) -> Option<Position> {
        self.current_position
    }

    /// Solution path captured when the search passed next to the exit; empty
    /// if it never did.
    pub fn captured_path(&self) -> &[Position] {
        &self.captured_path
    }

    pub fn into_captured_path(self) -> Vec<Position> {
        self.captured_path
    }

    pub fn exit_found(&self) -> bool {
        self.exit_found
    }

    pub fn stack(&self) -> &[Position] {
        &self.stack
    }

    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }

    fn finish(&mut self, grid: &mut Grid) {
        self.phase = GenerationPhase::Done;

        let start = grid.start();
        let end = grid.end();
        connect_to_corridor(grid, start);
        connect_to_corridor(grid, end);

        tracing::info!(
            "Generation complete: {} rooms visited, {} path cells, exit path {}",
            self.visited_count(),
            grid.path_cell_count(),
            if self.exit_found { "captured" } else { "not captured" }
        );
    }

    /// Odd interior row when the grid has one, so the markers line up with
    /// the lattice corridors; any row otherwise.
    fn rand_edge_row(&mut self, rows: usize) -> usize {
        if rows <= 2 {
            return self.rng.randint(0, rows - 1);
        }
        let odd_rows = (rows - 1) / 2;
        1 + 2 * self.rng.choice_index(odd_rows)
    }

    fn mark_visited(&mut self, (row, col): Position) {
        self.visited[row * self.cols + col] = true;
    }

    fn is_visited(&self, (row, col): Position) -> bool {
        self.visited[row * self.cols + col]
    }
}

/// Fills the gap between consecutive lattice waypoints with the wall cell
/// lying between them, giving a path whose cells are all orthogonally
/// adjacent.
pub fn materialize(path: &[Position]) -> Vec<Position> {
    let Some(&first) = path.first() else {
        return Vec::new();
    };

    let mut complete = Vec::with_capacity(path.len() * 2);
    complete.push(first);

    for pair in path.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let mid = ((prev.0 + curr.0) / 2, (prev.1 + curr.1) / 2);
        if mid != prev {
            complete.push(mid);
        }
        complete.push(curr);
    }

    complete
}

/// Carves the shortest chain from `pos` to the nearest path cell, unless
/// `pos` already touches one.
fn connect_to_corridor(grid: &mut Grid, pos: Position) {
    if grid
        .neighbors4(pos.0, pos.1)
        .iter()
        .any(|&(r, c)| grid.is_path(r, c))
    {
        return;
    }

    let mut parents: HashMap<Position, Option<Position>> = HashMap::from([(pos, None)]);
    let mut queue = VecDeque::from([pos]);

    while let Some(cur) = queue.pop_front() {
        if cur != pos && grid.is_path(cur.0, cur.1) {
            let mut link = Some(cur);
            while let Some(cell) = link {
                grid.carve(cell.0, cell.1);
                link = parents.get(&cell).copied().flatten();
            }
            tracing::debug!("Connected {:?} to corridor at {:?}", pos, cur);
            return;
        }

        for (dr, dc) in CONNECT_ORDER {
            let (Some(r), Some(c)) = (cur.0.checked_add_signed(dr), cur.1.checked_add_signed(dc))
            else {
                continue;
            };
            if grid.is_valid_position(r, c) && !parents.contains_key(&(r, c)) {
                parents.insert((r, c), Some(cur));
                queue.push_back((r, c));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleLCG;

    fn generate(rows: usize, cols: usize, seed: u32) -> (Grid, Generator<SimpleLCG>) {
        let mut grid = Grid::new(rows, cols);
        let mut generator = Generator::new(SimpleLCG::new(seed));
        generator.run_to_completion(&mut grid);
        (grid, generator)
    }

    fn is_adjacent(a: Position, b: Position) -> bool {
        a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
    }

    /// Number of orthogonally adjacent path-cell pairs.
    fn path_edges(grid: &Grid) -> usize {
        let mut edges = 0;
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                if !grid.is_path(row, col) {
                    continue;
                }
                if grid.is_path(row, col + 1) {
                    edges += 1;
                }
                if grid.is_path(row + 1, col) {
                    edges += 1;
                }
            }
        }
        edges
    }

    #[test]
    fn test_5x5_scenario() {
        for seed in 1..50 {
            let (grid, generator) = generate(5, 5, seed);

            assert_eq!(grid.start().1, 0);
            assert_eq!(grid.end().1, 4);
            assert!(grid.start().0 == 1 || grid.start().0 == 3);
            assert!(grid.is_solvable(), "seed {} not solvable", seed);
            assert!(generator.is_complete());
        }
    }

    #[test]
    fn test_seed_room_is_next_to_entrance() {
        let mut grid = Grid::new(9, 11);
        let mut generator = Generator::new(SimpleLCG::new(99999));
        generator.start_generation(&mut grid);

        let start = grid.start();
        assert_eq!(generator.current_position(), Some((start.0, 1)));
        assert_eq!(generator.stack(), &[(start.0, 1)]);
        assert!(grid.is_path(start.0, 0));
        assert!(grid.is_path(start.0, 1));
        assert!(grid.is_path(grid.end().0, 10));
        assert_eq!(start.0 % 2, 1);
        assert_eq!(grid.end().0 % 2, 1);
    }

    #[test]
    fn test_1x1_completes_on_first_step() {
        let mut grid = Grid::new(1, 1);
        let mut generator = Generator::new(SimpleLCG::new(7));
        generator.start_generation(&mut grid);
        assert_eq!(generator.phase(), GenerationPhase::Carving);

        assert!(!generator.step(&mut grid));
        assert!(generator.is_complete());
        assert_eq!(generator.phase(), GenerationPhase::Done);
        assert_eq!(grid.start(), (0, 0));
        assert_eq!(grid.end(), (0, 0));
        assert!(grid.is_path(0, 0));
        assert!(generator.captured_path().is_empty());
    }

    #[test]
    fn test_degenerate_grids_complete_in_one_step_and_are_solvable() {
        for rows in 1..=6 {
            for cols in 1..=6 {
                if rows >= 3 && cols >= 3 {
                    continue;
                }
                for seed in 1..10 {
                    let mut grid = Grid::new(rows, cols);
                    let mut generator = Generator::new(SimpleLCG::new(seed));
                    generator.start_generation(&mut grid);

                    assert!(!generator.step(&mut grid), "{}x{} kept going", rows, cols);
                    assert!(grid.is_solvable(), "{}x{} seed {} unsolvable", rows, cols, seed);
                }
            }
        }
    }

    #[test]
    fn test_step_before_start_is_noop() {
        let mut grid = Grid::new(5, 5);
        let mut generator = Generator::new(SimpleLCG::new(1));

        assert!(!generator.step(&mut grid));
        assert!(!generator.is_complete());
        assert_eq!(grid.path_cell_count(), 0);
    }

    #[test]
    fn test_generation_terminates_within_cell_count() {
        for rows in 1..=12 {
            for cols in 1..=12 {
                let mut grid = Grid::new(rows, cols);
                let mut generator = Generator::new(SimpleLCG::new((rows * 31 + cols) as u32));
                generator.start_generation(&mut grid);

                let mut calls = 0;
                loop {
                    calls += 1;
                    if !generator.step(&mut grid) {
                        break;
                    }
                    assert!(calls <= rows * cols, "{}x{} did not terminate", rows, cols);
                }
                assert!(calls <= rows * cols);
            }
        }
    }

    #[test]
    fn test_carving_is_monotonic() {
        let mut grid = Grid::new(11, 15);
        let mut generator = Generator::new(SimpleLCG::new(2024));
        generator.start_generation(&mut grid);

        let mut before = grid.to_binary_grid();
        loop {
            let continuing = generator.step(&mut grid);
            let after = grid.to_binary_grid();
            for (row_before, row_after) in before.iter().zip(&after) {
                for (&b, &a) in row_before.iter().zip(row_after) {
                    assert!(a >= b, "a path cell turned back into wall");
                }
            }
            before = after;
            if !continuing {
                break;
            }
        }
    }

    #[test]
    fn test_border_invariant() {
        for rows in 3..=13 {
            for cols in 3..=13 {
                for seed in [1, 12345, 2918957128] {
                    let (grid, _) = generate(rows, cols, seed);
                    for row in 0..rows {
                        for col in 0..cols {
                            let on_border =
                                row == 0 || col == 0 || row == rows - 1 || col == cols - 1;
                            let is_marker = (row, col) == grid.start() || (row, col) == grid.end();
                            if on_border && !is_marker {
                                assert!(
                                    grid.is_wall(row, col),
                                    "{}x{} seed {}: border cell {:?} carved",
                                    rows,
                                    cols,
                                    seed,
                                    (row, col)
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_connectivity_invariant() {
        for rows in 1..=14 {
            for cols in 1..=14 {
                for seed in [3, 4242, 99999] {
                    let (grid, _) = generate(rows, cols, seed);
                    assert!(
                        grid.is_solvable(),
                        "{}x{} seed {} is not solvable",
                        rows,
                        cols,
                        seed
                    );
                }
            }
        }
    }

    #[test]
    fn test_maze_is_perfect() {
        for rows in 3..=15 {
            for cols in 3..=15 {
                let (grid, _) = generate(rows, cols, (rows * cols) as u32);
                let cells = grid.path_cell_count();

                // Connected with exactly cells - 1 adjacencies: a tree
                assert_eq!(grid.reachable_from(grid.start()).len(), cells);
                assert_eq!(path_edges(&grid), cells - 1, "{}x{} has a loop", rows, cols);
            }
        }
    }

    #[test]
    fn test_every_room_visited() {
        let (grid, generator) = generate(21, 31, 5);
        assert_eq!(generator.visited_count(), 10 * 15);
        for row in (1..20).step_by(2) {
            for col in (1..30).step_by(2) {
                assert!(grid.is_path(row, col));
            }
        }
    }

    #[test]
    fn test_captured_path_on_odd_width() {
        for seed in 1..30 {
            let (grid, generator) = generate(15, 21, seed);
            let path = generator.captured_path();

            assert!(generator.exit_found());
            assert_eq!(path.first(), Some(&(grid.start().0, 1)));
            assert_eq!(path.last(), Some(&grid.end()));
            for pair in path.windows(2) {
                assert!(is_adjacent(pair[0], pair[1]), "gap between {:?}", pair);
            }
            for &(row, col) in path {
                assert!(grid.is_path(row, col));
            }
        }
    }

    #[test]
    fn test_even_width_connects_exit_without_capturing() {
        let (grid, generator) = generate(9, 10, 31337);
        let end = grid.end();

        assert_eq!(end.1, 9);
        assert!(grid.is_path(end.0, 8));
        assert!(!generator.exit_found());
        assert!(generator.captured_path().is_empty());
        assert!(grid.is_solvable());
    }

    #[test]
    fn test_determinism() {
        let (grid1, gen1) = generate(21, 21, 2918957128);
        let (grid2, gen2) = generate(21, 21, 2918957128);

        assert_eq!(grid1, grid2);
        assert_eq!(gen1.captured_path(), gen2.captured_path());
    }

    #[test]
    fn test_different_seeds() {
        let (grid1, _) = generate(21, 21, 11111);
        let (grid2, _) = generate(21, 21, 22222);

        // Different seeds should (almost certainly) produce different mazes
        assert_ne!(grid1.to_binary_grid(), grid2.to_binary_grid());
    }

    #[test]
    fn test_run_to_completion_matches_stepping() {
        let (skipped_grid, skipped) = generate(17, 23, 8080);

        let mut grid = Grid::new(17, 23);
        let mut stepped = Generator::new(SimpleLCG::new(8080));
        stepped.start_generation(&mut grid);
        while stepped.step(&mut grid) {}

        assert_eq!(grid, skipped_grid);
        assert_eq!(stepped.captured_path(), skipped.captured_path());
        assert_eq!(stepped.current_position(), skipped.current_position());
    }

    #[test]
    fn test_run_to_completion_on_finished_generator() {
        let mut grid = Grid::new(7, 7);
        let mut generator = Generator::new(SimpleLCG::new(3));
        assert!(generator.run_to_completion(&mut grid) > 0);

        let snapshot = grid.clone();
        assert_eq!(generator.run_to_completion(&mut grid), 0);
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn test_restart_is_ignored() {
        let mut grid = Grid::new(7, 9);
        let mut generator = Generator::new(SimpleLCG::new(10));
        generator.start_generation(&mut grid);
        let (start, end) = (grid.start(), grid.end());

        generator.start_generation(&mut grid);
        assert_eq!((grid.start(), grid.end()), (start, end));
        assert_eq!(generator.stack().len(), 1);
    }

    #[test]
    fn test_materialize_fills_gaps() {
        let path = [(1, 1), (1, 3), (3, 3), (3, 1)];
        assert_eq!(
            materialize(&path),
            vec![(1, 1), (1, 2), (1, 3), (2, 3), (3, 3), (3, 2), (3, 1)]
        );
    }

    #[test]
    fn test_materialize_short_paths() {
        assert!(materialize(&[]).is_empty());
        assert_eq!(materialize(&[(1, 1)]), vec![(1, 1)]);
        // Already adjacent waypoints gain nothing
        assert_eq!(materialize(&[(1, 0), (1, 1)]), vec![(1, 0), (1, 1)]);
    }
}
