use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wrap_snake::config::{self, Config, Rules, TickMode};
use wrap_snake::error::Error;
use wrap_snake::game::GameState;
use wrap_snake::renderer;
use wrap_snake::terminal_runtime::{TerminalSession, install_panic_hook, poll_inputs};

#[derive(Debug, Parser)]
#[command(version, about = "Snake on a wrapping grid")]
struct Cli {
    /// Config file to load instead of the per-user default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid columns.
    #[arg(long)]
    cols: Option<u16>,

    /// Grid rows.
    #[arg(long)]
    rows: Option<u16>,

    /// Target frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Base tick interval in seconds.
    #[arg(long = "tick-secs")]
    tick_secs: Option<f64>,

    /// Keep the tick interval constant instead of speeding up with length.
    #[arg(long = "fixed-tick")]
    fixed_tick: bool,

    /// Chance in [0, 1] that a cell starts as an obstacle.
    #[arg(long)]
    obstacles: Option<f64>,

    /// Seed for board, food and obstacle placement.
    #[arg(long)]
    seed: Option<u64>,

    /// End the game on collisions and keep food off the snake and obstacles.
    #[arg(long)]
    strict: bool,

    /// Double the tile size reported for high-DPI displays.
    #[arg(long = "high-dpi")]
    high_dpi: bool,

    /// Log file location.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("wrap-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let log_file = cli.log_file.clone().unwrap_or_else(config::log_path);
    init_logging(&log_file)?;

    let config = resolve_config(&cli)?;
    let (tile_width, tile_height) = config.tile_size();
    info!(
        cols = config.grid_cols,
        rows = config.grid_rows,
        fps = config.target_fps,
        tick_mode = ?config.tick_mode,
        tile_width,
        tile_height,
        rules = ?config.rules,
        "starting"
    );

    let frame_interval = config.frame_interval();
    let mut state = match cli.seed {
        Some(seed) => GameState::new_with_seed(config, seed)?,
        None => GameState::new(config)?,
    };

    install_panic_hook();
    let mut session = TerminalSession::enter()?;
    let mut last_frame = Instant::now();

    while state.is_running() {
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &state))?;

        for input in poll_inputs(frame_interval)? {
            state.apply_input(input);
        }

        let now = Instant::now();
        state.update(now.duration_since(last_frame));
        last_frame = now;
    }

    info!(ticks = state.tick_count(), length = state.snake().len(), "exiting");
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<Config, Error> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default_location()?,
    };

    if let Some(cols) = cli.cols {
        config.grid_cols = cols;
    }
    if let Some(rows) = cli.rows {
        config.grid_rows = rows;
    }
    if let Some(fps) = cli.fps {
        config.target_fps = fps;
    }
    if let Some(tick_secs) = cli.tick_secs {
        config.base_tick_secs = tick_secs;
    }
    if let Some(obstacles) = cli.obstacles {
        config.obstacle_probability = obstacles;
    }
    if cli.fixed_tick {
        config.tick_mode = TickMode::Fixed;
    }
    if cli.strict {
        config.rules = Rules::strict();
    }
    if cli.high_dpi {
        config.high_dpi = true;
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(path: &Path) -> Result<(), Error> {
    let file = config::open_log_file(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| Error::Logging(error.to_string()))
}
