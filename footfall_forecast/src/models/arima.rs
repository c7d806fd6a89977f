//! ARIMA models for time series forecasting
//!
//! Estimation is by conditional sum of squares (CSS) on the `d`-times
//! differenced series: the first `p` residuals are conditioned away and
//! pre-sample innovations are taken as zero. The optimizer works on an
//! unconstrained vector mapped through partial autocorrelations, so every
//! candidate AR polynomial is stationary and every MA polynomial invertible.
//!
//! There is no constant term when `d > 0`; with `d == 0` the series mean is
//! removed before fitting and added back to the forecast.

use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::optim::NelderMead;

/// Largest combined AR + MA order accepted
const MAX_ORDER: usize = 10;

/// Differenced-series variance below which there is nothing to model
const DEGENERATE_VARIANCE: f64 = 1e-10;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
    optimizer: NelderMead,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    /// Differencing order (d)
    d: usize,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Mean removed before fitting (zero when differenced)
    mean: f64,
    /// Innovation variance estimate
    sigma2: f64,
    /// Last value of the series after each differencing step, outermost first
    tails: Vec<f64>,
    /// Differenced, demeaned series the ARMA part was fitted to
    differenced: Vec<f64>,
    /// Residuals from fitting
    residuals: Vec<f64>,
}

impl ArimaModel {
    /// Create a new ARIMA(p, d, q) model
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p + q > MAX_ORDER {
            return Err(ForecastError::InvalidParameter(format!(
                "p + q must not exceed {MAX_ORDER}, got {}",
                p + q
            )));
        }

        Ok(Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            p,
            d,
            q,
            optimizer: NelderMead::default(),
        })
    }

    /// Replace the optimizer settings
    pub fn with_optimizer(mut self, max_iterations: usize, tolerance: f64) -> Result<Self> {
        self.optimizer = NelderMead::new(max_iterations, tolerance)?;
        Ok(self)
    }

    /// Fewest observations [`ForecastModel::train`] accepts
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 1
    }

    fn split(&self, params: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let phi = constrain_stationary(&params[..self.p]);
        let theta = constrain_stationary(&params[self.p..])
            .into_iter()
            .map(|c| -c)
            .collect();
        (phi, theta)
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, values: &[f64]) -> Result<TrainedArimaModel> {
        let required = self.min_observations();
        if values.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidData(
                "series contains non-finite values".to_string(),
            ));
        }

        let mut series = values.to_vec();
        let mut tails = Vec::with_capacity(self.d);
        for _ in 0..self.d {
            tails.push(series[series.len() - 1]);
            series = difference(&series);
        }

        let offset = if self.d == 0 { mean(&series) } else { 0.0 };
        let centered: Vec<f64> = series.iter().map(|v| v - offset).collect();

        let spread = variance(&series);
        if spread < DEGENERATE_VARIANCE {
            let what = match self.d {
                0 => "constant series".to_string(),
                1 => "constant first differences".to_string(),
                d => format!("constant differences of order {d}"),
            };
            return Err(ForecastError::DegenerateSeries(format!(
                "{what} (variance {spread:.3e})"
            )));
        }

        let objective = |params: &[f64]| {
            let (phi, theta) = self.split(params);
            sum_of_squares(&css_residuals(&centered, &phi, &theta), self.p)
        };
        let minimum = self
            .optimizer
            .minimize(objective, &vec![0.0; self.p + self.q])?;

        debug!(
            model = %self.name,
            iterations = minimum.iterations,
            sum_of_squares = minimum.value,
            "CSS fit converged"
        );

        let (ar_coefficients, ma_coefficients) = self.split(&minimum.point);
        let residuals = css_residuals(&centered, &ar_coefficients, &ma_coefficients);
        let effective = centered.len() - self.p;
        let sigma2 = sum_of_squares(&residuals, self.p) / effective as f64;

        if !sigma2.is_finite()
            || ar_coefficients
                .iter()
                .chain(&ma_coefficients)
                .any(|c| !c.is_finite())
        {
            return Err(ForecastError::NonConvergence {
                iterations: minimum.iterations,
            });
        }

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            d: self.d,
            ar_coefficients,
            ma_coefficients,
            mean: offset,
            sigma2,
            tails,
            differenced: centered,
            residuals,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    /// Fitted AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    /// Fitted MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Innovation variance estimate
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Point forecasts of the differenced series
    fn forecast_differenced(&self, horizon: usize) -> Vec<f64> {
        let mut history = self.differenced.clone();
        let mut shocks = self.residuals.clone();
        let mut forecasts = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let t = history.len();
            let ar: f64 = self
                .ar_coefficients
                .iter()
                .enumerate()
                .filter(|(i, _)| *i < t)
                .map(|(i, phi)| phi * history[t - 1 - i])
                .sum();
            let ma: f64 = self
                .ma_coefficients
                .iter()
                .enumerate()
                .filter(|(j, _)| *j < t)
                .map(|(j, theta)| theta * shocks[t - 1 - j])
                .sum();

            let forecast = ar + ma;
            history.push(forecast);
            // Future innovations have zero expectation
            shocks.push(0.0);
            forecasts.push(forecast);
        }

        forecasts
    }

    /// Undo differencing, innermost level first
    fn integrate(&self, mut levels: Vec<f64>) -> Vec<f64> {
        for &tail in self.tails.iter().rev() {
            let mut last = tail;
            for value in levels.iter_mut() {
                last += *value;
                *value = last;
            }
        }
        levels
    }

    /// Psi weights of the integrated process, `psi[0] == 1`
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        let mut psi = vec![0.0; horizon];
        if horizon == 0 {
            return psi;
        }
        psi[0] = 1.0;
        for j in 1..horizon {
            let mut value = self.ma_coefficients.get(j - 1).copied().unwrap_or(0.0);
            for (i, phi) in self.ar_coefficients.iter().enumerate() {
                if i < j {
                    value += phi * psi[j - 1 - i];
                }
            }
            psi[j] = value;
        }
        for _ in 0..self.d {
            let mut running = 0.0;
            for value in psi.iter_mut() {
                running += *value;
                *value = running;
            }
        }
        psi
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize, confidence_level: f64) -> Result<ForecastResult> {
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence level must be between 0 and 1, got {confidence_level}"
            )));
        }

        let differenced: Vec<f64> = self
            .forecast_differenced(horizon)
            .into_iter()
            .map(|v| v + self.mean)
            .collect();
        let values = self.integrate(differenced);

        let z = Normal::new(0.0, 1.0)?.inverse_cdf(0.5 + confidence_level / 2.0);
        let mut cumulative = 0.0;
        let intervals = self
            .psi_weights(horizon)
            .iter()
            .zip(&values)
            .map(|(psi, value)| {
                cumulative += psi * psi;
                let margin = z * (self.sigma2 * cumulative).sqrt();
                (value - margin, value + margin)
            })
            .collect();

        ForecastResult::with_intervals(values, intervals)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// First differences
fn difference(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

fn variance(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let m = mean(series);
    series.iter().map(|v| (v - m).powi(2)).sum::<f64>() / series.len() as f64
}

/// Map unconstrained values to the coefficients of a stationary AR
/// polynomial: `tanh` gives partial autocorrelations in (-1, 1), and the
/// Durbin–Levinson recursion turns them into AR coefficients.
fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let mut coefficients: Vec<f64> = Vec::with_capacity(unconstrained.len());
    for (k, x) in unconstrained.iter().enumerate() {
        let partial = x.tanh();
        let previous = coefficients.clone();
        for j in 0..k {
            coefficients[j] = previous[j] - partial * previous[k - 1 - j];
        }
        coefficients.push(partial);
    }
    coefficients
}

/// One-step residuals of an ARMA(p, q) with zero pre-sample innovations.
/// Entries before `p` are zero.
fn css_residuals(series: &[f64], phi: &[f64], theta: &[f64]) -> Vec<f64> {
    let p = phi.len();
    let mut residuals = vec![0.0; series.len()];
    for t in p..series.len() {
        let mut prediction = 0.0;
        for (i, coefficient) in phi.iter().enumerate() {
            prediction += coefficient * series[t - 1 - i];
        }
        for (j, coefficient) in theta.iter().enumerate() {
            if j < t {
                prediction += coefficient * residuals[t - 1 - j];
            }
        }
        residuals[t] = series[t] - prediction;
    }
    residuals
}

fn sum_of_squares(residuals: &[f64], skip: usize) -> f64 {
    residuals.iter().skip(skip).map(|e| e * e).sum()
}
