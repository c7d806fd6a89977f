//! Derivative-free minimization (Nelder–Mead simplex)

use crate::error::{ForecastError, Result};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Nelder–Mead minimizer
#[derive(Debug, Clone)]
pub struct NelderMead {
    max_iterations: usize,
    tolerance: f64,
    initial_step: f64,
}

/// Best point found
#[derive(Debug, Clone)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            tolerance: 1e-10,
            initial_step: 0.5,
        }
    }
}

impl NelderMead {
    pub fn new(max_iterations: usize, tolerance: f64) -> Result<Self> {
        if max_iterations == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_iterations must be greater than zero".to_string(),
            ));
        }
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "tolerance must be a positive number, got {tolerance}"
            )));
        }
        Ok(Self {
            max_iterations,
            tolerance,
            ..Self::default()
        })
    }

    /// Minimize `objective` starting from `start`.
    ///
    /// Non-finite objective values are treated as `+inf`, which pushes the
    /// simplex away from them. Converged once the spread of objective values
    /// across the simplex falls below `tolerance * (1 + |best|)`.
    pub fn minimize<F>(&self, objective: F, start: &[f64]) -> Result<Minimum>
    where
        F: Fn(&[f64]) -> f64,
    {
        let eval = |x: &[f64]| {
            let value = objective(x);
            if value.is_finite() {
                value
            } else {
                f64::INFINITY
            }
        };

        let n = start.len();
        if n == 0 {
            let value = eval(start);
            if !value.is_finite() {
                return Err(ForecastError::NonConvergence { iterations: 0 });
            }
            return Ok(Minimum {
                point: Vec::new(),
                value,
                iterations: 0,
            });
        }

        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
        simplex.push((start.to_vec(), eval(start)));
        for i in 0..n {
            let mut vertex = start.to_vec();
            vertex[i] += self.initial_step;
            let value = eval(&vertex);
            simplex.push((vertex, value));
        }

        for iteration in 0..self.max_iterations {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

            let best = simplex[0].1;
            let worst = simplex[n].1;
            if best.is_finite() && (worst - best).abs() <= self.tolerance * (1.0 + best.abs()) {
                let (point, value) = simplex.swap_remove(0);
                return Ok(Minimum {
                    point,
                    value,
                    iterations: iteration,
                });
            }

            let centroid = centroid(&simplex[..n]);
            let worst_point = simplex[n].0.clone();

            let reflected = along(&centroid, &worst_point, -REFLECTION);
            let reflected_value = eval(&reflected);

            if reflected_value < simplex[0].1 {
                let expanded = along(&centroid, &worst_point, -EXPANSION);
                let expanded_value = eval(&expanded);
                simplex[n] = if expanded_value < reflected_value {
                    (expanded, expanded_value)
                } else {
                    (reflected, reflected_value)
                };
                continue;
            }

            if reflected_value < simplex[n - 1].1 {
                simplex[n] = (reflected, reflected_value);
                continue;
            }

            // Contract toward the better of the worst and reflected points
            let (target, target_value) = if reflected_value < simplex[n].1 {
                (reflected, reflected_value)
            } else {
                (worst_point, simplex[n].1)
            };
            let contracted = along(&centroid, &target, CONTRACTION);
            let contracted_value = eval(&contracted);
            if contracted_value < target_value {
                simplex[n] = (contracted, contracted_value);
                continue;
            }

            let best_point = simplex[0].0.clone();
            for vertex in simplex.iter_mut().skip(1) {
                vertex.0 = along(&best_point, &vertex.0, SHRINK);
                vertex.1 = eval(&vertex.0);
            }
        }

        Err(ForecastError::NonConvergence {
            iterations: self.max_iterations,
        })
    }
}

fn centroid(vertices: &[(Vec<f64>, f64)]) -> Vec<f64> {
    let dim = vertices[0].0.len();
    let mut center = vec![0.0; dim];
    for (point, _) in vertices {
        for (c, x) in center.iter_mut().zip(point) {
            *c += x;
        }
    }
    let count = vertices.len() as f64;
    center.iter_mut().for_each(|c| *c /= count);
    center
}

/// `origin + t * (toward - origin)`
fn along(origin: &[f64], toward: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(toward)
        .map(|(o, x)| o + t * (x - o))
        .collect()
}
