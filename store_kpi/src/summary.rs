//! Aggregate KPIs over a row subset

use std::fmt;

use serde::{Deserialize, Serialize};
use store_ingest::Observation;

use crate::percentage;

/// Totals and overall rates for a set of rows.
///
/// The rates come from the summed totals, not from averaging row-level
/// rates: a quiet day weighs less than a busy one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryKpis {
    pub total_footfall: i64,
    pub total_sales: i64,
    pub total_loyalty_signups: i64,
    pub conversion_rate: f64,
    pub loyalty_rate: f64,
}

impl SummaryKpis {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for SummaryKpis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary Metrics:")?;
        writeln!(f, "  Total Footfall:      {}", self.total_footfall)?;
        writeln!(f, "  Total Sales:         {}", self.total_sales)?;
        writeln!(f, "  Conversion Rate:     {:.1}%", self.conversion_rate)?;
        writeln!(f, "  Loyalty Signup Rate: {:.2}%", self.loyalty_rate)?;
        Ok(())
    }
}

/// Summarize any row subset: a whole dataset, one store, a date window.
/// Filtering is the caller's job. Totals saturate at the `i64` bounds.
///
/// Accepts unified rows as well as KPI rows.
pub fn summarize<'a, I, R>(rows: I) -> SummaryKpis
where
    I: IntoIterator<Item = &'a R>,
    R: AsRef<Observation> + 'a,
{
    let (total_footfall, total_sales, total_loyalty_signups) =
        rows.into_iter().fold((0i64, 0i64, 0i64), |(f, s, l), row| {
            let row: &Observation = row.as_ref();
            (
                f.saturating_add(row.footfall),
                s.saturating_add(row.sales),
                l.saturating_add(row.loyalty_signups),
            )
        });

    SummaryKpis {
        total_footfall,
        total_sales,
        total_loyalty_signups,
        conversion_rate: percentage(total_sales, total_footfall),
        loyalty_rate: percentage(total_loyalty_signups, total_footfall),
    }
}

/// Same as [`summarize`]
pub fn get_summary_kpis<'a, I, R>(rows: I) -> SummaryKpis
where
    I: IntoIterator<Item = &'a R>,
    R: AsRef<Observation> + 'a,
{
    summarize(rows)
}
