use maze_core::{
    Direction, FasterSolver, PhaseCoordinator, PhaseKind, PhaseTimings, Position, RandomSource,
    SimpleLCG, StepCounts,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::time::{Duration, Instant};

/// Display quality preset: grid size and animation pace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Largest grid, 37x67
    UltraHd,
    /// 33x61 at the fastest pace
    HighQuality,
    /// 25x45
    Standard,
    /// Smallest grid, 19x35, slowest pace
    Performance,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::UltraHd,
        Preset::HighQuality,
        Preset::Standard,
        Preset::Performance,
    ];

    pub fn rows(self) -> usize {
        match self {
            Preset::UltraHd => 37,
            Preset::HighQuality => 33,
            Preset::Standard => 25,
            Preset::Performance => 19,
        }
    }

    pub fn cols(self) -> usize {
        match self {
            Preset::UltraHd => 67,
            Preset::HighQuality => 61,
            Preset::Standard => 45,
            Preset::Performance => 35,
        }
    }

    /// Delay between animation frames.
    pub fn interval_ms(self) -> u64 {
        match self {
            Preset::UltraHd => 50,
            Preset::HighQuality => 25,
            Preset::Standard => 50,
            Preset::Performance => 75,
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Preset::HighQuality
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ultra-hd" => Ok(Preset::UltraHd),
            "high-quality" => Ok(Preset::HighQuality),
            "standard" => Ok(Preset::Standard),
            "performance" => Ok(Preset::Performance),
            _ => Err(format!(
                "Invalid preset: '{}'. Must be 'ultra-hd', 'high-quality', 'standard', or 'performance'",
                s
            )),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Preset::UltraHd => write!(f, "ultra-hd"),
            Preset::HighQuality => write!(f, "high-quality"),
            Preset::Standard => write!(f, "standard"),
            Preset::Performance => write!(f, "performance"),
        }
    }
}

/// Largest grid a run will allocate, in cells
pub const MAX_CELLS: usize = 1_000_000;

/// Everything needed to reproduce a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    /// Seed for the maze's random source
    pub seed: u32,
    pub rows: usize,
    pub cols: usize,
    /// Delay between animation frames in milliseconds
    pub interval_ms: u64,
}

impl RunConfig {
    pub fn from_preset(preset: Preset, seed: u32) -> Self {
        Self {
            seed,
            rows: preset.rows(),
            cols: preset.cols(),
            interval_ms: preset.interval_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.rows == 0 || self.cols == 0 {
            return Err(format!(
                "Invalid grid size {}x{}: rows and cols must be at least 1",
                self.rows, self.cols
            )
            .into());
        }

        match self.rows.checked_mul(self.cols) {
            Some(cells) if cells <= MAX_CELLS => {}
            _ => {
                return Err(format!(
                    "Grid size {}x{} is too large (max {} cells)",
                    self.rows, self.cols, MAX_CELLS
                )
                .into());
            }
        }

        if self.interval_ms == 0 {
            return Err("Frame interval must be at least 1 ms".into());
        }

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Outcome of a finished run
///
/// The grid is stored as binary rows (0=wall, 1=path) so a report can be
/// inspected or redrawn without regenerating the maze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u32,
    pub rows: usize,
    pub cols: usize,
    pub start: Position,
    pub end: Position,
    pub grid_data: Vec<Vec<u8>>,

    /// Path captured during generation and replayed; empty when the search
    /// never passed next to the exit
    pub replay_path: Vec<Position>,

    /// Every cell the wall follower stood on, in order
    pub wall_path: Vec<Position>,
    pub wall_follow_reached_exit: bool,
    pub wall_unique_cells: usize,

    pub steps: StepCounts,
    pub timings: PhaseTimings,
    pub faster_solver: FasterSolver,
}

impl RunReport {
    pub fn from_run<R: RandomSource>(seed: u32, run: &PhaseCoordinator<R>) -> Self {
        let grid = run.grid();
        let timings = run.timings();
        let wall_unique_cells = run.wall_path().iter().collect::<HashSet<_>>().len();

        Self {
            seed,
            rows: grid.rows(),
            cols: grid.cols(),
            start: grid.start(),
            end: grid.end(),
            grid_data: grid.to_binary_grid(),
            replay_path: run.replay_path().to_vec(),
            wall_path: run.wall_path().to_vec(),
            wall_follow_reached_exit: run.wall_follow_reached_exit(),
            wall_unique_cells,
            steps: run.steps(),
            timings,
            faster_solver: timings.faster_solver(),
        }
    }
}

/// Run every phase to completion as fast as possible.
///
/// Phase timings are measured against a wall clock started here, so they
/// reflect how long each algorithm took to compute.
///
/// # Example
/// ```no_run
/// use runner::{run_maze, Preset, RunConfig};
///
/// let report = run_maze(&RunConfig::from_preset(Preset::Standard, 2918957128)).unwrap();
/// println!("Wall follower visited {} cells", report.wall_unique_cells);
/// ```
pub fn run_maze(config: &RunConfig) -> Result<RunReport, Box<dyn std::error::Error>> {
    config.validate()?;
    tracing::info!(
        "Running {}x{} maze with seed {}",
        config.rows,
        config.cols,
        config.seed
    );

    let clock = Instant::now();
    let mut run = PhaseCoordinator::new(config.rows, config.cols, SimpleLCG::new(config.seed));
    run.start(clock.elapsed());
    while !run.is_complete() {
        run.skip_current_phase(clock.elapsed());
    }

    Ok(RunReport::from_run(config.seed, &run))
}

/// Animate a run frame by frame into `out`.
///
/// One step is taken per frame, with `config.interval()` between frames.
/// Phases listed in `skip` are fast-forwarded as soon as they become active.
pub fn animate_maze<W: Write>(
    config: &RunConfig,
    skip: &[PhaseKind],
    out: &mut W,
) -> Result<RunReport, Box<dyn std::error::Error>> {
    config.validate()?;
    tracing::info!(
        "Animating {}x{} maze with seed {} every {} ms",
        config.rows,
        config.cols,
        config.seed,
        config.interval_ms
    );

    let clock = Instant::now();
    let mut run = PhaseCoordinator::new(config.rows, config.cols, SimpleLCG::new(config.seed));
    run.start(clock.elapsed());
    write_frame(out, &run, clock.elapsed())?;

    while !run.is_complete() {
        if skip.contains(&run.current_phase()) {
            run.skip_current_phase(clock.elapsed());
        } else {
            run.advance_one_step(clock.elapsed());
        }

        write_frame(out, &run, clock.elapsed())?;
        std::thread::sleep(config.interval());
    }

    Ok(RunReport::from_run(config.seed, &run))
}

fn write_frame<W: Write, R: RandomSource>(
    out: &mut W,
    run: &PhaseCoordinator<R>,
    now: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    // Clear screen and home the cursor
    write!(out, "\x1b[2J\x1b[H")?;
    writeln!(out, "{}", render_frame(run))?;
    writeln!(
        out,
        "{:.1}s in phase, {} steps",
        run.elapsed_in_phase(now).as_secs_f64(),
        run.steps().total()
    )?;
    out.flush()?;
    Ok(())
}

fn robot_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::North => "/\\",
        Direction::East => "=>",
        Direction::South => "\\/",
        Direction::West => "<=",
    }
}

/// Draw the current state of a run as text.
///
/// Two characters per cell: `██` wall, blank path, `::` replay trail, `..`
/// wall-following trail, `S`/`E` markers and an arrow for the robot.
pub fn render_frame<R: RandomSource>(run: &PhaseCoordinator<R>) -> String {
    let grid = run.grid();
    let (replay, wall) = run.current_paths();
    let replay: HashSet<&Position> = replay.iter().collect();
    let wall: HashSet<&Position> = wall.iter().collect();
    let robot = run.robot_position();

    let mut frame = format!(
        "{} | robot facing {}\n",
        run.current_phase().label(),
        run.robot_direction().label()
    );

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let pos = (row, col);
            let glyph = if robot == Some(pos) {
                robot_glyph(run.robot_direction())
            } else if pos == grid.start() {
                "S "
            } else if pos == grid.end() {
                "E "
            } else if wall.contains(&pos) {
                ".."
            } else if replay.contains(&pos) {
                "::"
            } else if grid.is_wall(row, col) {
                "██"
            } else {
                "  "
            };
            frame.push_str(glyph);
        }
        frame.push('\n');
    }

    frame
}

pub fn save_report(report: &RunReport, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_report(path: &str) -> Result<RunReport, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;

    // A full-size report is well under a megabyte
    if json.len() > 10_000_000 {
        return Err("Report file is too large (max 10MB)".into());
    }

    let report: RunReport = serde_json::from_str(&json)?;
    Ok(report)
}
