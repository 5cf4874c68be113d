//! Sequences the three phases of a maze run: generation, path replay and
//! wall following.
//!
//! The coordinator owns the grid. The generator borrows it mutably while it
//! carves, the solvers borrow it read-only afterwards. Time is never read
//! from a clock here: every entry point takes the caller's monotonic `now`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::grid::Grid;
use crate::maze_gen::Generator;
use crate::path_replay::PathReplaySolver;
use crate::rng::RandomSource;
use crate::solver::Solver;
use crate::wall_follower::WallFollowingSolver;
use crate::Position;

/// The active component, holding the state only that phase needs.
#[derive(Debug, Clone)]
pub enum Phase<R> {
    Generation(Generator<R>),
    PathReplay(PathReplaySolver),
    /// Wall following. The finished replay rides along with its trail cleared.
    WallFollowing {
        solver: WallFollowingSolver,
        replay: PathReplaySolver,
    },
    Complete,
}

impl<R> Phase<R> {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Generation(_) => PhaseKind::Generation,
            Phase::PathReplay(_) => PhaseKind::PathReplay,
            Phase::WallFollowing { .. } => PhaseKind::WallFollowing,
            Phase::Complete => PhaseKind::Complete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseKind {
    Generation,
    PathReplay,
    WallFollowing,
    Complete,
}

impl PhaseKind {
    pub fn label(self) -> &'static str {
        match self {
            PhaseKind::Generation => "Generating Maze",
            PhaseKind::PathReplay => "Path Replay",
            PhaseKind::WallFollowing => "Wall Following",
            PhaseKind::Complete => "Complete",
        }
    }
}

impl std::str::FromStr for PhaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generation" => Ok(PhaseKind::Generation),
            "path-replay" | "replay" => Ok(PhaseKind::PathReplay),
            "wall-following" | "wall" => Ok(PhaseKind::WallFollowing),
            _ => Err(format!(
                "Invalid phase: '{}'. Must be 'generation', 'path-replay', or 'wall-following'",
                s
            )),
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseKind::Generation => write!(f, "generation"),
            PhaseKind::PathReplay => write!(f, "path-replay"),
            PhaseKind::WallFollowing => write!(f, "wall-following"),
            PhaseKind::Complete => write!(f, "complete"),
        }
    }
}

/// Which solver finished sooner, counting generation time for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FasterSolver {
    Replay,
    WallFollowing,
    Tie,
}

/// Time spent in each phase. Phases that have not ended yet read zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimings {
    pub generation: Duration,
    pub path_replay: Duration,
    pub wall_following: Duration,
}

impl PhaseTimings {
    pub fn replay_total(&self) -> Duration {
        self.generation + self.path_replay
    }

    pub fn wall_total(&self) -> Duration {
        self.generation + self.wall_following
    }

    pub fn faster_solver(&self) -> FasterSolver {
        match self.path_replay.cmp(&self.wall_following) {
            std::cmp::Ordering::Less => FasterSolver::Replay,
            std::cmp::Ordering::Greater => FasterSolver::WallFollowing,
            std::cmp::Ordering::Equal => FasterSolver::Tie,
        }
    }
}

/// Progressing steps taken in each phase. The final step of a phase, the one
/// that reports completion, is not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCounts {
    pub generation: usize,
    pub path_replay: usize,
    pub wall_following: usize,
}

impl StepCounts {
    pub fn total(&self) -> usize {
        self.generation + self.path_replay + self.wall_following
    }
}

/// Drives a maze run one step at a time and tracks what a display needs: the
/// robot's position and heading, the visible trails and phase timings.
#[derive(Debug, Clone)]
pub struct PhaseCoordinator<R> {
    grid: Grid,
    phase: Phase<R>,
    started: bool,
    robot_position: Option<Position>,
    robot_direction: Direction,
    phase_started_at: Duration,
    timings: PhaseTimings,
    steps: StepCounts,
    replay_path: Vec<Position>,
    wall_path: Vec<Position>,
    wall_follow_reached_exit: bool,
}

impl<R: RandomSource> PhaseCoordinator<R> {
    /// An all-wall `rows × cols` grid waiting for [`start`](Self::start).
    pub fn new(rows: usize, cols: usize, rng: R) -> Self {
        Self {
            grid: Grid::new(rows, cols),
            phase: Phase::Generation(Generator::new(rng)),
            started: false,
            robot_position: None,
            robot_direction: Direction::South,
            phase_started_at: Duration::ZERO,
            timings: PhaseTimings::default(),
            steps: StepCounts::default(),
            replay_path: Vec::new(),
            wall_path: Vec::new(),
            wall_follow_reached_exit: false,
        }
    }

    /// Begins generation. The robot appears at the generator's seed cell,
    /// facing down. Later calls do nothing.
    pub fn start(&mut self, now: Duration) {
        if self.started {
            return;
        }
        self.started = true;

        if let Phase::Generation(generator) = &mut self.phase {
            generator.start_generation(&mut self.grid);
            self.robot_position = generator.current_position();
        }
        self.robot_direction = Direction::South;
        self.phase_started_at = now;

        tracing::info!(
            "Maze run started on {}x{} grid",
            self.grid.rows(),
            self.grid.cols()
        );
    }

    /// Forwards exactly one step to the active component and returns the
    /// robot position from before the step.
    pub fn advance_one_step(&mut self, now: Duration) -> Option<Position> {
        if !self.started {
            self.start(now);
        }

        let previous = self.robot_position;
        let kind = self.phase.kind();

        let (progressed, position, facing) = match &mut self.phase {
            Phase::Generation(generator) => {
                let progressed = generator.step(&mut self.grid);
                (progressed, generator.current_position(), None)
            }
            Phase::PathReplay(solver) => {
                let progressed = solver.step(&self.grid);
                (progressed, solver.current_position(), None)
            }
            Phase::WallFollowing { solver, .. } => {
                let progressed = solver.step(&self.grid);
                (progressed, solver.current_position(), Some(solver.facing()))
            }
            Phase::Complete => return previous,
        };

        if position.is_some() {
            self.robot_position = position;
        }

        match facing {
            Some(direction) => self.robot_direction = direction,
            None => self.face_along_move(previous),
        }

        if progressed {
            match kind {
                PhaseKind::Generation => self.steps.generation += 1,
                PhaseKind::PathReplay => self.steps.path_replay += 1,
                PhaseKind::WallFollowing => self.steps.wall_following += 1,
                PhaseKind::Complete => {}
            }
        } else {
            self.end_phase(now);
        }

        previous
    }

    /// Fast-forwards the active phase and performs its transition, leaving
    /// the run exactly where stepping through the phase would have.
    pub fn skip_current_phase(&mut self, now: Duration) {
        if !self.started {
            self.start(now);
        }

        let kind = self.phase.kind();
        if kind == PhaseKind::Complete {
            return;
        }

        tracing::debug!("Skipping {} phase", kind);
        while self.phase.kind() == kind {
            self.advance_one_step(now);
        }
    }

    /// Skips every remaining phase.
    pub fn run_to_completion(&mut self, now: Duration) {
        while !self.is_complete() {
            self.skip_current_phase(now);
        }
    }

    pub fn current_phase(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Complete)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn robot_position(&self) -> Option<Position> {
        self.robot_position
    }

    pub fn robot_direction(&self) -> Direction {
        self.robot_direction
    }

    /// Visible trails as `(replay, wall following)`.
    ///
    /// The replay trail disappears once wall following starts; after the run
    /// the full wall-following trace stays on display.
    pub fn current_paths(&self) -> (&[Position], &[Position]) {
        match &self.phase {
            Phase::Generation(_) => (&[], &[]),
            Phase::PathReplay(solver) => (solver.current_path_so_far(), &[]),
            Phase::WallFollowing { solver, replay } => {
                (replay.current_path_so_far(), solver.path_taken())
            }
            Phase::Complete => (&[], &self.wall_path),
        }
    }

    /// The full replayed path, recorded when replay ends.
    pub fn replay_path(&self) -> &[Position] {
        &self.replay_path
    }

    /// The full wall-following trace, recorded when wall following ends.
    pub fn wall_path(&self) -> &[Position] {
        &self.wall_path
    }

    pub fn timings(&self) -> PhaseTimings {
        self.timings
    }

    pub fn steps(&self) -> StepCounts {
        self.steps
    }

    pub fn wall_follow_reached_exit(&self) -> bool {
        self.wall_follow_reached_exit
    }

    /// Time spent in the active phase so far; zero before start and after
    /// completion.
    pub fn elapsed_in_phase(&self, now: Duration) -> Duration {
        if !self.started || self.is_complete() {
            return Duration::ZERO;
        }
        now.saturating_sub(self.phase_started_at)
    }

    /// Heading follows the movement delta. Standing still keeps the heading
    /// and arriving on the exit always faces right.
    fn face_along_move(&mut self, previous: Option<Position>) {
        let (Some(from), Some(to)) = (previous, self.robot_position) else {
            return;
        };

        if to == self.grid.end() && from != to {
            self.robot_direction = Direction::East;
        } else if let Some(direction) = Direction::between(from, to) {
            self.robot_direction = direction;
        }
    }

    fn end_phase(&mut self, now: Duration) {
        let elapsed = now.saturating_sub(self.phase_started_at);
        self.phase_started_at = now;

        let finished = std::mem::replace(&mut self.phase, Phase::Complete);
        self.phase = match finished {
            Phase::Generation(generator) => {
                self.timings.generation = elapsed;
                let path = generator.into_captured_path();
                tracing::info!(
                    "Generation finished in {:?} after {} steps, replaying {}-cell path",
                    elapsed,
                    self.steps.generation,
                    path.len()
                );

                let mut solver = PathReplaySolver::new();
                solver.set_path(path);
                solver.start(&self.grid);
                let from = self.robot_position;
                self.robot_position = solver.current_position();
                // Stepping back from the seed onto the entrance
                self.face_along_move(from);
                Phase::PathReplay(solver)
            }
            Phase::PathReplay(mut replay) => {
                self.timings.path_replay = elapsed;
                self.replay_path = replay.path().to_vec();
                replay.clear_trail();
                tracing::info!(
                    "Path replay finished in {:?} after {} steps",
                    elapsed,
                    self.steps.path_replay
                );

                let mut solver = WallFollowingSolver::new();
                solver.start(&self.grid);
                self.robot_position = solver.current_position();
                Phase::WallFollowing { solver, replay }
            }
            Phase::WallFollowing { solver, .. } => {
                self.timings.wall_following = elapsed;
                self.wall_path = solver.path_taken().to_vec();
                self.wall_follow_reached_exit = solver.reached_exit();
                self.robot_position = Some(self.grid.end());
                self.robot_direction = Direction::East;
                tracing::info!(
                    "Wall following finished in {:?} after {} steps ({} unique cells), exit {}",
                    elapsed,
                    self.steps.wall_following,
                    solver.unique_cells_visited(),
                    if self.wall_follow_reached_exit { "reached" } else { "not reached" }
                );
                Phase::Complete
            }
            Phase::Complete => Phase::Complete,
        };
    }
}
