//! # Footfall Forecast
//!
//! Short-horizon forecasts of daily store footfall from the unified
//! dataset, using an ARIMA(1,1,1) model fitted by conditional sum of
//! squares.
//!
//! ```no_run
//! use footfall_forecast::forecast_footfall;
//! use store_ingest::UnifiedDataset;
//!
//! # fn run(dataset: &UnifiedDataset) {
//! let forecast = forecast_footfall(dataset, Some("S1"), 7);
//! for point in &forecast {
//!     println!("{} {:.0}", point.date, point.value);
//! }
//! # }
//! ```

pub mod config;
pub mod error;
pub mod forecaster;
pub mod models;
pub mod optim;
pub mod series;

pub use config::ForecastConfig;
pub use error::{ForecastError, Result};
pub use forecaster::{
    forecast_footfall, forecast_footfall_with, forecast_series, try_forecast_footfall,
};
pub use models::arima::{ArimaModel, TrainedArimaModel};
pub use models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use series::{FootfallSeries, ForecastPoint, ForecastSeries, FORECAST_SERIES_NAME};
