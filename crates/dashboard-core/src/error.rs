use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the dashboard crates.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected a row (bad quoting, missing column, wrong type).
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A date-time column held a value that is not a recognised timestamp.
    #[error("Invalid timestamp in {path} line {line}, column {column}: {value:?}")]
    TimestampParse {
        path: PathBuf,
        line: u64,
        column: &'static str,
        value: String,
    },

    /// A row lacks the latitude/longitude needed to build a point geometry.
    #[error("Missing coordinates for {entity} at row {row_index}")]
    MissingCoordinates { entity: String, row_index: usize },

    /// A date supplied on the command line is not `YYYY-MM-DD`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    /// `true` for errors that must abort startup (load-time parse failures).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DashboardError::MissingCoordinates { .. })
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
