//! # Store KPI
//!
//! Key performance indicators derived from the unified store dataset:
//! - Row-level conversion and loyalty rates ([`add_kpi_columns`])
//! - Aggregate summaries over any row subset ([`summarize`])
//!
//! Every rate is a percentage of footfall and is exactly `0.0` when footfall
//! is not positive, so no operation here can fail or produce NaN.

pub mod rows;
pub mod summary;

pub use crate::rows::{add_kpi_columns, KpiDataset, KpiRow};
pub use crate::summary::{get_summary_kpis, summarize, SummaryKpis};

/// `part / whole * 100`, or `0.0` when `whole <= 0`
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}
