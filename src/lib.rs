//! # Store Insights
//!
//! Daily per-store retail analytics: merge the footfall, sales and loyalty
//! sign-up files into one dataset, derive conversion and loyalty KPIs, and
//! forecast footfall a few days ahead.
//!
//! ## Example
//!
//! ```no_run
//! use store_insights::{add_kpi_columns, forecast_footfall, get_summary_kpis, run_ingestion};
//!
//! let dataset = run_ingestion("data/raw", "data/processed")?;
//! let kpis = add_kpi_columns(dataset.clone());
//! println!("{}", get_summary_kpis(&kpis.for_store("S1")));
//!
//! let forecast = forecast_footfall(&dataset, Some("S1"), 7);
//! if !forecast.is_available() {
//!     println!("forecast unavailable");
//! }
//! # Ok::<(), store_insights::IngestError>(())
//! ```

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use footfall_forecast::{
    forecast_footfall, forecast_footfall_with, try_forecast_footfall, ForecastConfig,
    ForecastError, ForecastPoint, ForecastSeries,
};
pub use store_ingest::{
    run_ingestion, run_ingestion_with, IngestError, IngestionConfig, Observation, UnifiedDataset,
};
pub use store_kpi::{
    add_kpi_columns, get_summary_kpis, summarize, KpiDataset, KpiRow, SummaryKpis,
};

/// Install a global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` wins when set. Otherwise `level` is mapped to a filter
/// directive (`DEBUG`, `info`, `warning`, ...), falling back to `info` for
/// names that are not recognised. Fails if a subscriber is already set.
pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
}

fn directive(level: &str) -> &'static str {
    match level.to_ascii_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" | "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        "OFF" => "off",
        _ => "info",
    }
}
