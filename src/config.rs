use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error};

const APP_DIR_NAME: &str = "wrap-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default grid columns.
pub const DEFAULT_GRID_COLS: u16 = 16;

/// Default grid rows.
pub const DEFAULT_GRID_ROWS: u16 = 12;

/// Base tick interval in seconds.
pub const DEFAULT_TICK_SECS: f64 = 0.2;

/// Fastest allowed tick interval in seconds.
pub const MIN_TICK_SECS: f64 = 0.1;

/// Tick interval reduction per snake segment in seconds.
pub const SPEEDUP_PER_SEGMENT_SECS: f64 = 0.01;

/// Longest tick interval a config may ask for, in seconds.
pub const MAX_TICK_SECS: f64 = 3600.0;

/// Chance that any single cell is generated as an obstacle.
pub const DEFAULT_OBSTACLE_PROBABILITY: f64 = 0.04;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// How the tick interval responds to snake length.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    /// Interval shrinks with every segment down to the configured floor.
    #[default]
    SpeedUp,
    /// Interval stays at the base value.
    Fixed,
}

/// Optional gameplay rules. All off by default, which keeps the permissive
/// behaviour: food may land anywhere and nothing ends the game.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub food_avoids_obstacles: bool,
    pub food_avoids_snake: bool,
    pub self_collision_ends_game: bool,
    pub obstacle_collision_ends_game: bool,
}

impl Rules {
    /// Every rule enabled.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            food_avoids_obstacles: true,
            food_avoids_snake: true,
            self_collision_ends_game: true,
            obstacle_collision_ends_game: true,
        }
    }
}

/// Static parameters fixed at process start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Nominal window width in pixels.
    pub window_width: u32,
    /// Nominal window height in pixels.
    pub window_height: u32,
    pub target_fps: u32,
    pub grid_cols: u16,
    pub grid_rows: u16,
    pub base_tick_secs: f64,
    pub min_tick_secs: f64,
    pub speedup_per_segment_secs: f64,
    pub tick_mode: TickMode,
    pub obstacle_probability: f64,
    pub high_dpi: bool,
    pub rules: Rules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            target_fps: 60,
            grid_cols: DEFAULT_GRID_COLS,
            grid_rows: DEFAULT_GRID_ROWS,
            base_tick_secs: DEFAULT_TICK_SECS,
            min_tick_secs: MIN_TICK_SECS,
            speedup_per_segment_secs: SPEEDUP_PER_SEGMENT_SECS,
            tick_mode: TickMode::SpeedUp,
            obstacle_probability: DEFAULT_OBSTACLE_PROBABILITY,
            high_dpi: false,
            rules: Rules::default(),
        }
    }
}

impl Config {
    /// Returns the grid dimensions.
    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        GridSize {
            width: self.grid_cols,
            height: self.grid_rows,
        }
    }

    /// Pixel size of one tile as `(width, height)`, doubled on high-DPI displays.
    #[must_use]
    pub fn tile_size(&self) -> (u32, u32) {
        let scale = if self.high_dpi { 2 } else { 1 };
        let cols = u32::from(self.grid_cols.max(1));
        let rows = u32::from(self.grid_rows.max(1));
        (
            self.window_width / cols * scale,
            self.window_height / rows * scale,
        )
    }

    /// Wall-clock budget for one rendered frame.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }

    /// Rejects configurations the game cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_cols == 0 || self.grid_rows == 0 {
            return Err(ConfigError::EmptyGrid {
                cols: self.grid_cols,
                rows: self.grid_rows,
            });
        }

        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::EmptyWindow {
                width: self.window_width,
                height: self.window_height,
            });
        }

        if self.target_fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }

        for (name, value) in [
            ("base_tick_secs", self.base_tick_secs),
            ("min_tick_secs", self.min_tick_secs),
        ] {
            if !value.is_finite() || value <= 0.0 || value > MAX_TICK_SECS {
                return Err(ConfigError::InvalidTick { name, value });
            }
        }

        if !self.speedup_per_segment_secs.is_finite() || self.speedup_per_segment_secs < 0.0 {
            return Err(ConfigError::InvalidTick {
                name: "speedup_per_segment_secs",
                value: self.speedup_per_segment_secs,
            });
        }

        if !(0.0..=1.0).contains(&self.obstacle_probability) {
            return Err(ConfigError::InvalidProbability(self.obstacle_probability));
        }

        Ok(())
    }

    /// Loads and validates a config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &raw)
    }

    /// Loads the per-user config file, falling back to defaults when it does
    /// not exist yet.
    pub fn load_default_location() -> Result<Self, ConfigError> {
        let path = config_path();
        match fs::read_to_string(&path) {
            Ok(raw) => Self::from_json(&path, &raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    fn from_json(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<Self>(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Returns the default log file path.
#[must_use]
pub fn log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push("wrap-snake.log");
    base
}

/// Opens `path` for appending, creating it and its parent directories.
pub fn open_log_file(path: &Path) -> Result<File, Error> {
    let log_file_error = |source| Error::LogFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(log_file_error)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(log_file_error)
}

/// Colors applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub obstacle: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_text: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// The only palette the game ships with.
pub const THEME: Theme = Theme {
    snake_head: Color::White,
    snake_body: Color::Green,
    food: Color::Red,
    obstacle: Color::DarkGray,
    play_bg: Color::Black,
    border_fg: Color::Gray,
    hud_text: Color::White,
    menu_title: Color::Green,
    menu_footer: Color::DarkGray,
};

pub const GLYPH_SNAKE_HEAD_UP: &str = "▲";
pub const GLYPH_SNAKE_HEAD_DOWN: &str = "▼";
pub const GLYPH_SNAKE_HEAD_LEFT: &str = "◀";
pub const GLYPH_SNAKE_HEAD_RIGHT: &str = "▶";
pub const GLYPH_SNAKE_BODY: &str = "█";
pub const GLYPH_FOOD: &str = "●";
pub const GLYPH_OBSTACLE: &str = "▒";
pub const GLYPH_EMPTY: &str = "·";
