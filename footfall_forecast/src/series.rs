//! Footfall history in, dated forecast out

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use store_ingest::UnifiedDataset;

/// Name carried by every forecast series
pub const FORECAST_SERIES_NAME: &str = "forecast_footfall";

/// Daily footfall for one store, or summed over all stores, ordered by date.
///
/// Dates missing from the data stay missing: the model sees the
/// observations in order, not a calendar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FootfallSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl FootfallSeries {
    /// Build from `(date, footfall)` points in any order (stable by date)
    pub fn new(mut points: Vec<(NaiveDate, f64)>) -> Self {
        points.sort_by_key(|(date, _)| *date);
        let (dates, values) = points.into_iter().unzip();
        Self { dates, values }
    }

    /// Select footfall for `store_id`, or the per-date total across stores
    /// when no store (or an empty id) is given
    pub fn from_dataset(dataset: &UnifiedDataset, store_id: Option<&str>) -> Self {
        match store_id.filter(|id| !id.is_empty()) {
            Some(store_id) => Self::new(
                dataset
                    .iter()
                    .filter(|row| row.store_id == store_id)
                    .map(|row| (row.date, row.footfall as f64))
                    .collect(),
            ),
            None => {
                let mut totals: BTreeMap<NaiveDate, i64> = BTreeMap::new();
                for row in dataset {
                    let total = totals.entry(row.date).or_insert(0);
                    *total = total.saturating_add(row.footfall);
                }
                Self::new(
                    totals
                        .into_iter()
                        .map(|(date, total)| (date, total as f64))
                        .collect(),
                )
            }
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Latest observed date
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// One forecast day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Predicted footfall
    pub value: f64,
    /// Lower prediction bound
    pub lower: f64,
    /// Upper prediction bound
    pub upper: f64,
}

/// Predicted footfall for consecutive days after the last observation.
/// Empty when no model could be fitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    name: String,
    points: Vec<ForecastPoint>,
}

impl Default for ForecastSeries {
    fn default() -> Self {
        Self::empty()
    }
}

impl ForecastSeries {
    pub(crate) fn new(points: Vec<ForecastPoint>) -> Self {
        Self {
            name: FORECAST_SERIES_NAME.to_string(),
            points,
        }
    }

    /// The "forecast unavailable" value
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `false` when fitting failed and there is nothing to show
    pub fn is_available(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

impl<'a> IntoIterator for &'a ForecastSeries {
    type Item = &'a ForecastPoint;
    type IntoIter = std::slice::Iter<'a, ForecastPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_ingest::Observation;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset() -> UnifiedDataset {
        UnifiedDataset::from_rows(vec![
            Observation::new(ymd(2024, 1, 1), "S1", 100, 0, 0),
            Observation::new(ymd(2024, 1, 1), "S2", 40, 0, 0),
            Observation::new(ymd(2024, 1, 2), "S2", 60, 0, 0),
            Observation::new(ymd(2024, 1, 4), "S1", 90, 0, 0),
        ])
    }

    #[test]
    fn test_store_series() {
        let series = FootfallSeries::from_dataset(&dataset(), Some("S1"));
        assert_eq!(series.dates(), &[ymd(2024, 1, 1), ymd(2024, 1, 4)]);
        assert_eq!(series.values(), &[100.0, 90.0]);
    }

    #[test]
    fn test_aggregate_series_sums_per_date() {
        let series = FootfallSeries::from_dataset(&dataset(), None);
        assert_eq!(
            series.dates(),
            &[ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 4)]
        );
        assert_eq!(series.values(), &[140.0, 60.0, 90.0]);
        assert_eq!(series.last_date(), Some(ymd(2024, 1, 4)));
    }

    #[test]
    fn test_aggregate_saturates() {
        let dataset = UnifiedDataset::from_rows(vec![
            Observation::new(ymd(2024, 1, 1), "S1", i64::MAX, 0, 0),
            Observation::new(ymd(2024, 1, 1), "S2", 5, 0, 0),
        ]);
        let series = FootfallSeries::from_dataset(&dataset, None);
        assert_eq!(series.values(), &[i64::MAX as f64]);
    }

    #[test]
    fn test_empty_store_id_means_all_stores() {
        let all = FootfallSeries::from_dataset(&dataset(), None);
        assert_eq!(FootfallSeries::from_dataset(&dataset(), Some("")), all);
    }

    #[test]
    fn test_unknown_store_is_empty() {
        let series = FootfallSeries::from_dataset(&dataset(), Some("S9"));
        assert!(series.is_empty());
        assert_eq!(series.last_date(), None);
    }

    #[test]
    fn test_empty_forecast_series() {
        let series = ForecastSeries::empty();
        assert_eq!(series.name(), FORECAST_SERIES_NAME);
        assert!(!series.is_available());
        assert!(series.dates().is_empty());
    }
}
