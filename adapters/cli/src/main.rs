#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the maze mapping controller against the simulated robot.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use maze_mapper_core::{hardware::MapDisplay, ControllerConfig, GRID_SIDE};
use maze_mapper_rendering::{AsciiMap, LcdCanvas, MapPresentation};
use maze_mapper_simulation::{Arena, SimulatedRobot, SimulationOptions};
use maze_mapper_system_exploration::{ExplorationReport, Explorer, Phase};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map display used for the final picture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DisplayKind {
    /// Character map with ASCII walls.
    Ascii,
    /// Rasterised LCD line drawing.
    Lcd,
}

/// Maps a simulated 5x5 arena and prints the discovered maze.
#[derive(Debug, Parser)]
#[command(name = "maze-mapper", version)]
struct CliArgs {
    /// Controller configuration in TOML; defaults apply to omitted keys.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Arena layout in TOML; the open arena is used when omitted.
    #[arg(long, value_name = "PATH")]
    arena: Option<PathBuf>,
    /// Seed of the simulated sensor noise.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Adds bounded jitter to every simulated sensor reading.
    #[arg(long)]
    noise: bool,
    /// Display used to render the final map.
    #[arg(long, value_enum, default_value_t = DisplayKind::Ascii)]
    display: DisplayKind,
    /// Control ticks the simulated run may take before it is abandoned.
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,
}

/// Entry point for the maze mapper command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let config = load_config(args.config.as_deref())?;
    let arena = load_arena(args.arena.as_deref())?;
    let options = SimulationOptions {
        seed: args.seed,
        noise: args.noise,
        ..SimulationOptions::default()
    };
    let mut robot = SimulatedRobot::new(arena, options);
    let mut explorer = Explorer::new(config);
    let mut stdout = io::stdout().lock();

    let report = match args.display {
        DisplayKind::Ascii => {
            let mut map = AsciiMap::new(GRID_SIDE)?;
            let report = simulate(&mut explorer, &mut robot, &mut map, args.max_ticks)?;
            map.present(&mut stdout)?;
            report
        }
        DisplayKind::Lcd => {
            let mut canvas = LcdCanvas::default();
            let report = simulate(&mut explorer, &mut robot, &mut canvas, args.max_ticks)?;
            canvas.present(&mut stdout)?;
            report
        }
    };

    debug!(transcript = %robot.transcript(), "telemetry transcript");
    write_summary(&mut stdout, &report, &robot)?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ControllerConfig> {
    let Some(path) = path else {
        return Ok(ControllerConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read controller config {}", path.display()))?;
    ControllerConfig::from_toml_str(&contents)
        .with_context(|| format!("invalid controller config {}", path.display()))
}

fn load_arena(path: Option<&Path>) -> Result<Arena> {
    let Some(path) = path else {
        return Ok(Arena::open());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read arena layout {}", path.display()))?;
    Arena::from_toml_str(&contents)
        .with_context(|| format!("invalid arena layout {}", path.display()))
}

fn simulate<D: MapDisplay>(
    explorer: &mut Explorer,
    robot: &mut SimulatedRobot,
    display: &mut D,
    max_ticks: u64,
) -> Result<ExplorationReport> {
    explorer.connect(robot);
    explorer.begin(display);

    while explorer.tick(robot, display) == Phase::Exploring {
        if explorer.ticks() >= max_ticks {
            let report = explorer.report();
            bail!(
                "exploration did not finish within {max_ticks} ticks ({} of 25 cells visited)",
                report.visited
            );
        }
    }

    Ok(explorer.report())
}

fn write_summary(
    writer: &mut dyn Write,
    report: &ExplorationReport,
    robot: &SimulatedRobot,
) -> Result<()> {
    writeln!(writer, "lines crossed: {}", report.lines_crossed)?;
    writeln!(writer, "nesting areas: {}", report.nesting_area_count)?;
    writeln!(writer, "ticks: {}", report.ticks)?;
    writeln!(
        writer,
        "simulated time: {:.1}s",
        robot.elapsed().as_secs_f64()
    )?;
    Ok(())
}
