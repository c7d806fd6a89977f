//! Forecast settings

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Horizon and fitting settings for [`crate::forecast_footfall_with`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of future days to predict
    pub horizon: usize,
    /// Coverage of the prediction interval attached to each point
    pub confidence_level: f64,
    /// Optimizer iteration cap
    pub max_iterations: usize,
    /// Optimizer convergence tolerance
    pub tolerance: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 7,
            confidence_level: 0.95,
            max_iterations: 2000,
            tolerance: 1e-10,
        }
    }
}

impl ForecastConfig {
    /// Defaults with the given horizon
    pub fn with_horizon(horizon: usize) -> Self {
        Self {
            horizon,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be at least one day".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence level must be between 0 and 1, got {}",
                self.confidence_level
            )));
        }
        if self.max_iterations == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_iterations must be greater than zero".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
