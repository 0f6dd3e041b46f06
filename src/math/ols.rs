//! Least squares for the one-regressor problems the calibration fit needs.
//!
//! Both candidate models are linear in their coefficients:
//!
//! ```text
//! minimize Σ (y_i - (β0 + β1 g(x_i)))^2
//! ```
//!
//! with `g(x) = x` (linear) or `g(x) = ln x` (logarithmic).
//!
//! Implementation choices:
//! - The common case uses the closed-form centered regression. Constant inputs
//!   reproduce exactly (slope 0), which keeps model ties deterministic.
//! - When the regressor has no spread the closed form is undefined. We then
//!   fall back to the minimum-norm SVD solution of the full design matrix.

use nalgebra::{DMatrix, DVector};

/// Relative threshold below which the regressor is treated as constant.
const SPREAD_EPS: f64 = 1e-20;

/// Intercept and slope of a fitted line `y = intercept + slope * g`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub intercept: f64,
    pub slope: f64,
}

impl Line {
    pub fn eval(&self, g: f64) -> f64 {
        self.intercept + self.slope * g
    }
}

/// Fit `y = β0 + β1 g` by ordinary least squares.
///
/// Returns `None` if the inputs are empty, of different lengths, or the
/// solution is not finite.
pub fn fit_line(g: &[f64], y: &[f64]) -> Option<Line> {
    if g.is_empty() || g.len() != y.len() {
        return None;
    }
    let gv = DVector::from_column_slice(g);
    let yv = DVector::from_column_slice(y);

    let line = centered_regression(&gv, &yv).or_else(|| {
        let design = DMatrix::from_fn(g.len(), 2, |r, c| if c == 0 { 1.0 } else { g[r] });
        let beta = solve_least_squares(&design, &yv)?;
        Some(Line {
            intercept: beta[0],
            slope: beta[1],
        })
    })?;

    (line.intercept.is_finite() && line.slope.is_finite()).then_some(line)
}

fn centered_regression(g: &DVector<f64>, y: &DVector<f64>) -> Option<Line> {
    let g_mean = g.mean();
    let y_mean = y.mean();
    let gc = g.add_scalar(-g_mean);
    let yc = y.add_scalar(-y_mean);

    let sgg = gc.dot(&gc);
    if !(sgg > SPREAD_EPS * g.norm_squared().max(1.0)) {
        return None;
    }
    let slope = gc.dot(&yc) / sgg;
    Some(Line {
        intercept: y_mean - slope * g_mean,
        slope,
    })
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if a strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Sum of squared errors between observed and predicted values.
pub fn sum_squared_error(observed: &[f64], predicted: &[f64]) -> f64 {
    observed
        .iter()
        .zip(predicted)
        .map(|(o, p)| (o - p) * (o - p))
        .sum()
}
