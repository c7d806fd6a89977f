//! Store-level footfall forecasting

use chrono::{Days, NaiveDate};
use store_ingest::UnifiedDataset;
use tracing::{debug, info, warn};

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaModel;
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::series::{FootfallSeries, ForecastPoint, ForecastSeries};

/// Forecast daily footfall `horizon` days past the last observed date with
/// an ARIMA(1,1,1) model.
///
/// `store_id` selects one store; `None` (or `Some("")`) forecasts the total
/// across stores. Fitting problems are logged and give an empty series,
/// never an error.
pub fn forecast_footfall(
    dataset: &UnifiedDataset,
    store_id: Option<&str>,
    horizon: usize,
) -> ForecastSeries {
    forecast_footfall_with(dataset, store_id, &ForecastConfig::with_horizon(horizon))
}

/// [`forecast_footfall`] with explicit settings
pub fn forecast_footfall_with(
    dataset: &UnifiedDataset,
    store_id: Option<&str>,
    config: &ForecastConfig,
) -> ForecastSeries {
    match try_forecast_footfall(dataset, store_id, config) {
        Ok(series) => series,
        Err(err) => {
            warn!(
                store = store_id.unwrap_or("all"),
                horizon = config.horizon,
                error = %err,
                "footfall forecast unavailable"
            );
            ForecastSeries::empty()
        }
    }
}

/// Like [`forecast_footfall_with`], but reports why a forecast failed
pub fn try_forecast_footfall(
    dataset: &UnifiedDataset,
    store_id: Option<&str>,
    config: &ForecastConfig,
) -> Result<ForecastSeries> {
    config.validate()?;
    let series = FootfallSeries::from_dataset(dataset, store_id);
    debug!(
        store = store_id.unwrap_or("all"),
        observations = series.len(),
        "selected footfall history"
    );

    let model = ArimaModel::new(1, 1, 1)?.with_optimizer(config.max_iterations, config.tolerance)?;
    forecast_series(&model, &series, config)
}

/// Train `model` on `series` and attach a date to each forecast step
pub fn forecast_series<M: ForecastModel>(
    model: &M,
    series: &FootfallSeries,
    config: &ForecastConfig,
) -> Result<ForecastSeries> {
    config.validate()?;
    let trained = model.train(series.values())?;
    let last = series.last_date().ok_or(ForecastError::InsufficientData {
        required: 1,
        actual: 0,
    })?;
    let result = trained.forecast(config.horizon, config.confidence_level)?;
    let dates = future_dates(last, config.horizon)?;

    let points = match result.intervals() {
        Some(intervals) => dates
            .into_iter()
            .zip(result.values())
            .zip(intervals)
            .map(|((date, &value), &(lower, upper))| ForecastPoint {
                date,
                value,
                lower,
                upper,
            })
            .collect(),
        None => dates
            .into_iter()
            .zip(result.values())
            .map(|(date, &value)| ForecastPoint {
                date,
                value,
                lower: value,
                upper: value,
            })
            .collect(),
    };

    info!(
        model = trained.name(),
        observations = series.len(),
        horizon = config.horizon,
        "footfall forecast fitted"
    );
    Ok(ForecastSeries::new(points))
}

/// `horizon` consecutive days following `last`
fn future_dates(last: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|offset| {
            last.checked_add_days(Days::new(offset))
                .ok_or(ForecastError::DateOverflow(last))
        })
        .collect()
}
