use approx::assert_relative_eq;
use footfall_forecast::{ArimaModel, ForecastError, ForecastModel, TrainedForecastModel};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Level series whose first differences follow `d[t] = phi * d[t-1]` exactly
fn ar_levels(phi: f64, start: f64, first_step: f64, n: usize) -> Vec<f64> {
    let mut levels = vec![start];
    let mut step = first_step;
    for _ in 1..n {
        let next = levels[levels.len() - 1] + step;
        levels.push(next);
        step *= phi;
    }
    levels
}

#[test]
fn test_arima_recovers_exact_ar_coefficient() {
    let values = ar_levels(0.6, 100.0, 10.0, 12);
    let model = ArimaModel::new(1, 1, 0).unwrap();
    let trained = model.train(&values).unwrap();

    assert_relative_eq!(trained.ar_coefficients()[0], 0.6, epsilon = 1e-3);
    assert!(trained.ma_coefficients().is_empty());
    assert!(trained.sigma2() < 1e-6);
}

#[test]
fn test_random_walk_forecast_is_flat() {
    let model = ArimaModel::new(0, 1, 0).unwrap();
    let trained = model.train(&[10.0, 12.0, 11.0, 15.0]).unwrap();
    let forecast = trained.forecast(3, 0.95).unwrap();

    assert_eq!(forecast.values(), &[15.0, 15.0, 15.0]);
    // Differences 2, -1, 4 give sigma2 = 21 / 3
    assert_relative_eq!(trained.sigma2(), 7.0);
}

#[test]
fn test_second_difference_extends_trend() {
    let model = ArimaModel::new(0, 2, 0).unwrap();
    let trained = model.train(&[1.0, 3.0, 5.0, 8.0]).unwrap();
    let forecast = trained.forecast(3, 0.95).unwrap();

    assert_eq!(forecast.values(), &[11.0, 14.0, 17.0]);
    assert_eq!(forecast.len(), 3);
}

#[test]
fn test_arima_111_short_series() {
    let model = ArimaModel::new(1, 1, 1).unwrap();
    assert_eq!(model.min_observations(), 4);
    assert_eq!(model.name(), "ARIMA(1,1,1)");

    let trained = model.train(&[100.0, 102.0, 104.0, 103.0, 105.0]).unwrap();
    let forecast = trained.forecast(3, 0.95).unwrap();

    assert_eq!(forecast.values().len(), 3);
    assert!(forecast.values().iter().all(|v| v.is_finite()));
    assert!(trained.ar_coefficients()[0].abs() <= 1.0);
    assert!(trained.ma_coefficients()[0].abs() <= 1.0);
}

#[test]
fn test_arima_111_estimates_simulated_process() {
    let (phi, theta) = (0.5, 0.3);
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 1.0).unwrap();

    let mut level = 1000.0;
    let mut previous_step = 0.0;
    let mut previous_shock = 0.0;
    let mut values = vec![level];
    for _ in 0..500 {
        let shock = noise.sample(&mut rng);
        let step = phi * previous_step + shock + theta * previous_shock;
        level += step;
        values.push(level);
        previous_step = step;
        previous_shock = shock;
    }

    let trained = ArimaModel::new(1, 1, 1).unwrap().train(&values).unwrap();
    assert!((trained.ar_coefficients()[0] - phi).abs() < 0.25);
    assert!((trained.ma_coefficients()[0] - theta).abs() < 0.25);
    assert!((trained.sigma2() - 1.0).abs() < 0.3);
}

#[test]
fn test_intervals_widen_with_horizon() {
    let model = ArimaModel::new(0, 1, 0).unwrap();
    let trained = model.train(&[10.0, 12.0, 11.0, 15.0, 14.0]).unwrap();
    let forecast = trained.forecast(5, 0.95).unwrap();
    let intervals = forecast.intervals().unwrap();

    let widths: Vec<f64> = intervals.iter().map(|(lo, hi)| hi - lo).collect();
    assert!(widths.windows(2).all(|w| w[1] > w[0]));
    for ((lo, hi), value) in intervals.iter().zip(forecast.values()) {
        assert!(lo < value && value < hi);
    }
}

#[test]
fn test_insufficient_data() {
    let model = ArimaModel::new(1, 1, 1).unwrap();
    let result = model.train(&[1.0, 2.0, 3.0]);
    assert!(matches!(
        result,
        Err(ForecastError::InsufficientData {
            required: 4,
            actual: 3
        })
    ));
}

#[test]
fn test_constant_series_is_degenerate() {
    let model = ArimaModel::new(1, 1, 1).unwrap();
    let result = model.train(&[50.0; 10]);
    assert!(matches!(result, Err(ForecastError::DegenerateSeries(_))));
}

#[test]
fn test_linear_trend_reports_constant_differences() {
    let model = ArimaModel::new(1, 1, 1).unwrap();
    let trend: Vec<f64> = (0..12).map(|t| 200.0 + 15.0 * t as f64).collect();
    match model.train(&trend) {
        Err(err @ ForecastError::DegenerateSeries(_)) => {
            assert!(err.to_string().contains("constant first differences"));
        }
        other => panic!("Expected DegenerateSeries, got {other:?}"),
    }
}

#[test]
fn test_non_finite_values_rejected() {
    let model = ArimaModel::new(1, 1, 1).unwrap();
    let result = model.train(&[1.0, 2.0, f64::NAN, 4.0, 5.0]);
    assert!(matches!(result, Err(ForecastError::InvalidData(_))));
}

#[test]
fn test_bad_confidence_level() {
    let model = ArimaModel::new(0, 1, 0).unwrap();
    let trained = model.train(&[1.0, 2.0, 4.0]).unwrap();
    assert!(trained.forecast(2, 1.0).is_err());
    assert!(trained.forecast(2, 0.0).is_err());
}

#[test]
fn test_stationary_model_adds_mean_back() {
    let model = ArimaModel::new(0, 0, 0).unwrap();
    let trained = model.train(&[9.0, 11.0, 10.0, 10.0]).unwrap();
    let forecast = trained.forecast(2, 0.9).unwrap();
    assert_relative_eq!(forecast.values()[0], 10.0);
    assert_relative_eq!(forecast.values()[1], 10.0);
}
