//! Error types for the store_ingest crate

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, merging or persisting store data
#[derive(Debug, Error)]
pub enum IngestError {
    /// Error from IO operations that are not tied to a single input file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source or output file could not be opened
    #[error("Failed to open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited text (bad quoting, ragged rows, write failures)
    #[error("CSV error in '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required header is absent
    #[error("Missing column '{column}' in '{}'", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// A `date` cell that none of the accepted formats can parse
    #[error("Invalid date '{value}' at {}:{line}", .path.display())]
    InvalidDate {
        path: PathBuf,
        line: usize,
        value: String,
    },

    /// A metric cell that is neither empty nor numeric
    #[error("Invalid value '{value}' for '{column}' at {}:{line}", .path.display())]
    InvalidValue {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },

    /// A required key cell is empty
    #[error("Missing '{column}' at {}:{line}", .path.display())]
    MissingField {
        path: PathBuf,
        line: usize,
        column: String,
    },

    /// An env file that is missing or malformed
    #[error("Env file error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Synthetic data parameters out of range
    #[error("Invalid sample parameters: {0}")]
    Sample(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, IngestError>;

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        IngestError::PolarsError(err.to_string())
    }
}
