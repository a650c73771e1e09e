use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a configuration is rejected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must have at least one column and one row (got {cols}x{rows})")]
    EmptyGrid { cols: u16, rows: u16 },

    #[error("window must be at least one pixel in each axis (got {width}x{height})")]
    EmptyWindow { width: u32, height: u32 },

    #[error("target frame rate must be positive")]
    ZeroFrameRate,

    #[error("{name} must be a positive number of seconds no larger than one hour (got {value})")]
    InvalidTick { name: &'static str, value: f64 },

    #[error("obstacle probability must lie in [0, 1] (got {0})")]
    InvalidProbability(f64),

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A replacement board whose size differs from the configured grid.
#[derive(Debug, Error)]
#[error("board is {cols}x{rows} but the game is configured for {expected_cols}x{expected_rows}")]
pub struct GridSizeMismatch {
    pub expected_cols: u16,
    pub expected_rows: u16,
    pub cols: u16,
    pub rows: u16,
}

/// Top-level failure for the binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to set up logging: {0}")]
    Logging(String),
}
