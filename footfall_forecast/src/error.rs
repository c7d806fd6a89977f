//! Error types for the footfall_forecast crate

use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a forecast cannot be produced
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Too few observations to fit the model
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Non-finite input values
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The differenced series carries no variation to model
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    /// The optimizer stopped without meeting its tolerance
    #[error("Optimizer did not converge after {iterations} iterations")]
    NonConvergence { iterations: usize },

    /// Forecast dates run past the representable calendar
    #[error("Forecast dates overflow the calendar after {0}")]
    DateOverflow(NaiveDate),

    /// Error from the interval quantile
    #[error("Distribution error: {0}")]
    Distribution(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<statrs::StatsError> for ForecastError {
    fn from(err: statrs::StatsError) -> Self {
        ForecastError::Distribution(err.to_string())
    }
}
