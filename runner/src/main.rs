use clap::{Args, Parser, Subcommand};
use maze_core::PhaseKind;
use runner::{animate_maze, run_maze, save_report, Preset, RunConfig, RunReport};
use std::time::Instant;

/// Generate a maze step by step, then solve it twice: once by replaying the
/// path found while carving, once with a right-hand wall follower.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log debug events from generation and the solvers
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every phase to completion and save a JSON report
    Run {
        #[command(flatten)]
        maze: MazeArgs,

        /// File to save the report to. Defaults to <seed>_maze_run.json
        #[arg(short, long, value_name = "FILE")]
        output: Option<String>,
    },

    /// Draw the run in the terminal one step at a time
    Animate {
        #[command(flatten)]
        maze: MazeArgs,

        /// Milliseconds between frames, overriding the preset
        #[arg(short, long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..=60_000))]
        interval_ms: Option<u64>,

        /// Fast-forward a phase (generation|path-replay|wall-following); repeatable
        #[arg(long, value_name = "PHASE")]
        skip: Vec<PhaseKind>,
    },

    /// List the available presets
    Presets,
}

#[derive(Args)]
struct MazeArgs {
    /// Grid size and pace (ultra-hd|high-quality|standard|performance)
    #[arg(short, long, default_value_t = Preset::default())]
    preset: Preset,

    /// Grid rows, overriding the preset
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns, overriding the preset
    #[arg(long)]
    cols: Option<usize>,

    /// Maze seed. Random when omitted
    #[arg(short, long)]
    seed: Option<u32>,
}

impl MazeArgs {
    fn into_config(self) -> RunConfig {
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut config = RunConfig::from_preset(self.preset, seed);
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Command::Run { maze, output } => run_command(maze.into_config(), output.as_deref()),
        Command::Animate {
            maze,
            interval_ms,
            skip,
        } => {
            let mut config = maze.into_config();
            if let Some(interval_ms) = interval_ms {
                config.interval_ms = interval_ms;
            }
            animate_command(config, &skip);
        }
        Command::Presets => presets_command(),
    }
}

fn run_command(config: RunConfig, output_file: Option<&str>) {
    println!("🧭 Maze Runner");
    println!("{}", "=".repeat(70));
    println!("  Seed: {}", config.seed);
    println!("  Grid size: {}x{} cells", config.rows, config.cols);
    println!();

    let start = Instant::now();

    match run_maze(&config) {
        Ok(report) => {
            println!("  Run time: {:.3}s", start.elapsed().as_secs_f64());
            println!();
            print_summary(&report);

            // Use default filename pattern if no output file specified
            let default_filename = format!("{}_maze_run.json", report.seed);
            let file_to_save = output_file.unwrap_or(&default_filename);

            match save_report(&report, file_to_save) {
                Ok(()) => println!("💾 Report saved to: {}", file_to_save),
                Err(e) => {
                    eprintln!("❌ Error saving report: {}", e);
                    std::process::exit(1);
                }
            }

            println!("{}", "=".repeat(70));
        }
        Err(e) => {
            eprintln!();
            eprintln!("❌ Error: {}", e);
            eprintln!("{}", "=".repeat(70));
            std::process::exit(1);
        }
    }
}

fn animate_command(config: RunConfig, skip: &[PhaseKind]) {
    let mut stdout = std::io::stdout();

    match animate_maze(&config, skip, &mut stdout) {
        Ok(report) => {
            println!();
            print_summary(&report);
            println!("{}", "=".repeat(70));
        }
        Err(e) => {
            eprintln!();
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn presets_command() {
    println!("Available presets:");
    for preset in Preset::ALL {
        let marker = if preset == Preset::default() { " (default)" } else { "" };
        println!(
            "  {:<14} {}x{} cells, {} ms per frame{}",
            preset.to_string(),
            preset.rows(),
            preset.cols(),
            preset.interval_ms(),
            marker
        );
    }
}

fn print_summary(report: &RunReport) {
    let timings = &report.timings;

    println!("✅ Run complete (seed {})", report.seed);
    println!("  Entrance: {:?}  Exit: {:?}", report.start, report.end);
    println!(
        "  Generation:     {:>8.3}s  {} steps",
        timings.generation.as_secs_f64(),
        report.steps.generation
    );
    println!(
        "  Path replay:    {:>8.3}s  {} cells (total {:.3}s)",
        timings.path_replay.as_secs_f64(),
        report.replay_path.len(),
        timings.replay_total().as_secs_f64()
    );
    println!(
        "  Wall following: {:>8.3}s  {} moves, {} unique cells (total {:.3}s)",
        timings.wall_following.as_secs_f64(),
        report.wall_path.len().saturating_sub(1),
        report.wall_unique_cells,
        timings.wall_total().as_secs_f64()
    );

    if report.replay_path.is_empty() {
        println!("  ⚠️  No path was captured during generation");
    }
    println!(
        "  Wall follower {} the exit",
        if report.wall_follow_reached_exit { "reached" } else { "did NOT reach" }
    );

    let verdict = match report.faster_solver {
        maze_core::FasterSolver::Replay => "path replay was faster",
        maze_core::FasterSolver::WallFollowing => "wall following was faster",
        maze_core::FasterSolver::Tie => "both solvers took the same time",
    };
    println!("  Result: {}", verdict);
    println!();
}
