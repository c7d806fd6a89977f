use chrono::{Days, NaiveDate};
use footfall_forecast::{
    forecast_footfall, forecast_footfall_with, try_forecast_footfall, ForecastConfig,
    ForecastError, FORECAST_SERIES_NAME,
};
use rstest::rstest;
use store_ingest::{Observation, UnifiedDataset};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

/// Deterministic, non-constant daily footfall
fn footfall(day: u64) -> i64 {
    500 + ((day * 37) % 23) as i64 * 3 + (day as i64 % 7) * 10
}

fn store_history(store: &str, days: u64, scale: i64) -> Vec<Observation> {
    (0..days)
        .map(|day| {
            Observation::new(
                start() + Days::new(day),
                store,
                footfall(day) * scale,
                footfall(day) / 10,
                3,
            )
        })
        .collect()
}

fn two_stores() -> UnifiedDataset {
    let mut rows = store_history("S1", 30, 1);
    rows.extend(store_history("S2", 30, 2));
    UnifiedDataset::from_rows(rows)
}

#[test]
fn test_forecast_has_horizon_consecutive_days() {
    let forecast = forecast_footfall(&two_stores(), Some("S1"), 7);

    assert!(forecast.is_available());
    assert_eq!(forecast.len(), 7);
    assert_eq!(forecast.name(), FORECAST_SERIES_NAME);

    let last = start() + Days::new(29);
    let expected: Vec<NaiveDate> = (1..=7).map(|i| last + Days::new(i)).collect();
    assert_eq!(forecast.dates(), expected);
    assert!(forecast.values().iter().all(|v| v.is_finite()));
    for point in &forecast {
        assert!(point.lower <= point.value && point.value <= point.upper);
    }
}

#[test]
fn test_forecast_starts_after_latest_date_with_gaps() {
    let rows: Vec<Observation> = store_history("S1", 20, 1)
        .into_iter()
        .filter(|row| row.date != start() + Days::new(5) && row.date != start() + Days::new(12))
        .collect();
    let forecast = forecast_footfall(&UnifiedDataset::from_rows(rows), Some("S1"), 3);

    let first = start() + Days::new(20);
    assert_eq!(
        forecast.dates(),
        vec![first, first + Days::new(1), first + Days::new(2)]
    );
}

#[test]
fn test_aggregate_forecast_uses_daily_totals() {
    let combined = forecast_footfall(&two_stores(), None, 5);

    // A single store carrying the summed footfall must forecast the same
    let totals = UnifiedDataset::from_rows(store_history("ALL", 30, 3));
    let single = forecast_footfall(&totals, Some("ALL"), 5);

    assert!(combined.is_available());
    assert_eq!(combined.values(), single.values());
    assert_eq!(combined.dates(), single.dates());
}

#[test]
fn test_empty_store_id_aggregates() {
    let dataset = two_stores();
    assert_eq!(
        forecast_footfall(&dataset, Some(""), 4),
        forecast_footfall(&dataset, None, 4)
    );
}

#[rstest]
#[case::unknown_store(Some("S9"), 7)]
#[case::zero_horizon(Some("S1"), 0)]
fn test_unavailable_forecasts_are_empty(#[case] store: Option<&str>, #[case] horizon: usize) {
    let forecast = forecast_footfall(&two_stores(), store, horizon);
    assert!(forecast.is_empty());
    assert!(!forecast.is_available());
    assert_eq!(forecast.name(), FORECAST_SERIES_NAME);
}

#[test]
fn test_single_observation_is_empty() {
    let dataset = UnifiedDataset::from_rows(store_history("S1", 1, 1));
    assert!(forecast_footfall(&dataset, Some("S1"), 7).is_empty());

    let err = try_forecast_footfall(&dataset, Some("S1"), &ForecastConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ForecastError::InsufficientData {
            required: 4,
            actual: 1
        }
    ));
}

#[test]
fn test_constant_footfall_is_empty() {
    let rows = (0..15)
        .map(|day| Observation::new(start() + Days::new(day), "S1", 250, 20, 1))
        .collect();
    let dataset = UnifiedDataset::from_rows(rows);
    assert!(forecast_footfall(&dataset, Some("S1"), 7).is_empty());

    let err = try_forecast_footfall(&dataset, Some("S1"), &ForecastConfig::default()).unwrap_err();
    assert!(matches!(err, ForecastError::DegenerateSeries(_)));
}

#[test]
fn test_empty_dataset_is_empty() {
    let dataset = UnifiedDataset::from_rows(Vec::new());
    assert!(forecast_footfall(&dataset, None, 7).is_empty());
}

#[test]
fn test_custom_config() {
    let config = ForecastConfig {
        horizon: 2,
        confidence_level: 0.8,
        ..ForecastConfig::default()
    };
    let narrow = forecast_footfall_with(&two_stores(), Some("S2"), &config);
    let wide = forecast_footfall(&two_stores(), Some("S2"), 2);

    assert_eq!(narrow.len(), 2);
    let narrow_width = narrow.points()[0].upper - narrow.points()[0].lower;
    let wide_width = wide.points()[0].upper - wide.points()[0].lower;
    assert!(narrow_width < wide_width);
}

#[test]
fn test_invalid_config_reported() {
    let config = ForecastConfig {
        confidence_level: 1.5,
        ..ForecastConfig::default()
    };
    let err = try_forecast_footfall(&two_stores(), Some("S1"), &config).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidParameter(_)));
}
