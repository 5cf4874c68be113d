//! Core types and step-driven algorithms for the maze runner
//!
//! This crate generates a maze incrementally with a recursive backtracker,
//! replays the solution path captured during generation, and solves the maze
//! again with a right-hand wall follower. The [`PhaseCoordinator`] sequences
//! the three phases and exposes everything a display needs to draw a frame.
//!
//! Nothing here reads a clock or sleeps: callers drive every step and supply
//! the current time, so runs are deterministic for a given seed.

pub mod coordinator;
pub mod direction;
pub mod grid;
pub mod maze_gen;
pub mod path_replay;
pub mod rng;
pub mod solver;
pub mod wall_follower;

// Re-export commonly used types for convenience
pub use coordinator::{FasterSolver, Phase, PhaseCoordinator, PhaseKind, PhaseTimings, StepCounts};
pub use direction::Direction;
pub use grid::{Cell, Grid};
pub use maze_gen::{GenerationPhase, Generator};
pub use path_replay::PathReplaySolver;
pub use rng::{RandomSource, SimpleLCG};
pub use solver::Solver;
pub use wall_follower::WallFollowingSolver;

/// A grid coordinate as `(row, col)`, with `(0, 0)` at the top-left.
pub type Position = (usize, usize);
