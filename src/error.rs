use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for loading, profiling, reporting and staging.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// The dataset file does not exist.
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no header row.
    #[error("Empty file or no header row")]
    EmptyData,

    /// A record that does not fit the header width.
    #[error("Record {record} has {found} fields, expected {expected}")]
    RaggedRow {
        record: usize,
        expected: usize,
        found: usize,
    },

    /// A batch in which no dataset could be profiled.
    #[error("No dataset could be profiled")]
    NothingProfiled,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Load date is not a valid `YYYY-MM-DD` date.
    #[error("Invalid load date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl From<toml::de::Error> for ProfileError {
    fn from(err: toml::de::Error) -> Self {
        ProfileError::Config(err.to_string())
    }
}

/// Result type alias for profiling operations.
pub type Result<T> = std::result::Result<T, ProfileError>;
