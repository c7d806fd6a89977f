//! Univariate models behind the footfall forecaster.
//!
//! Fitting and forecasting are split: [`ForecastModel::train`] consumes a
//! history and hands back a [`TrainedForecastModel`] that can be asked for
//! any horizon.

use std::fmt::Debug;

use crate::error::{ForecastError, Result};

/// Point forecasts for consecutive future steps, with optional bounds
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    values: Vec<f64>,
    /// `(lower, upper)` per step
    intervals: Option<Vec<(f64, f64)>>,
}

impl ForecastResult {
    /// Point forecasts only
    pub fn point(values: Vec<f64>) -> Self {
        Self {
            values,
            intervals: None,
        }
    }

    /// Point forecasts with one interval per step
    pub fn with_intervals(values: Vec<f64>, intervals: Vec<(f64, f64)>) -> Result<Self> {
        if values.len() != intervals.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "{} forecast values but {} intervals",
                values.len(),
                intervals.len()
            )));
        }
        Ok(Self {
            values,
            intervals: Some(intervals),
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of forecast steps
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }
}

/// A fitted model, ready to extrapolate
pub trait TrainedForecastModel: Debug {
    /// Forecast `horizon` steps past the end of the history, with intervals
    /// covering `confidence_level` of the predictive distribution
    fn forecast(&self, horizon: usize, confidence_level: f64) -> Result<ForecastResult>;

    fn name(&self) -> &str;
}

/// An unfitted model specification
pub trait ForecastModel: Debug + Clone {
    type Trained: TrainedForecastModel;

    /// Fit to observations given oldest first
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    fn name(&self) -> &str;
}

pub mod arima;
