//! The two candidate flow-curve fits.
//!
//! Each fit is an independent pure function over `(x, rate)` pairs:
//!
//! - `fit_linear`: `rate = slope * x + intercept`
//! - `fit_logarithmic`: `rate = a + b * ln(x)`, requires every `x > 0`
//!
//! Both return the fitted coefficients, the prediction at every sample `x`,
//! and the SSE against the observed rates.

use thiserror::Error;
use tracing::debug;

use crate::domain::{Coefficients, FitResult, ModelKind};
use crate::math::{fit_line, regressor, sum_squared_error};

/// Minimum number of samples needed to fit a curve.
pub const MIN_SAMPLES: usize = 2;

/// Failures reported by the calibration fit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("insufficient data: need at least {MIN_SAMPLES} samples with positive durations, got {samples} usable")]
    InsufficientData { samples: usize },
    #[error("x={x} is outside the logarithmic model's domain (x must be > 0)")]
    InvalidDomain { x: u32 },
    #[error("reference volume {volume} must be a finite positive number")]
    InvalidReferenceVolume { volume: f64 },
    #[error("{model} fit produced a non-finite solution")]
    Numerical { model: &'static str },
}

/// Ordinary least squares on `(x, rate)`.
pub fn fit_linear(xs: &[u32], rates: &[f64]) -> Result<FitResult, FitError> {
    check_lengths(xs, rates)?;
    let g: Vec<f64> = xs.iter().map(|&x| f64::from(x)).collect();
    fit_on_regressor(ModelKind::Linear, &g, rates)
}

/// Ordinary least squares on `(ln x, rate)`.
pub fn fit_logarithmic(xs: &[u32], rates: &[f64]) -> Result<FitResult, FitError> {
    check_lengths(xs, rates)?;
    let g = xs
        .iter()
        .map(|&x| regressor(ModelKind::Logarithmic, f64::from(x)).ok_or(FitError::InvalidDomain { x }))
        .collect::<Result<Vec<f64>, FitError>>()?;
    fit_on_regressor(ModelKind::Logarithmic, &g, rates)
}

fn check_lengths(xs: &[u32], rates: &[f64]) -> Result<(), FitError> {
    let usable = xs.len().min(rates.len());
    if usable < MIN_SAMPLES || xs.len() != rates.len() {
        return Err(FitError::InsufficientData { samples: usable });
    }
    Ok(())
}

fn fit_on_regressor(model: ModelKind, g: &[f64], rates: &[f64]) -> Result<FitResult, FitError> {
    let name = match model {
        ModelKind::Linear => "linear",
        ModelKind::Logarithmic => "logarithmic",
    };
    let line = fit_line(g, rates).ok_or(FitError::Numerical { model: name })?;

    let predicted_y: Vec<f64> = g.iter().map(|&v| line.eval(v)).collect();
    let sse = sum_squared_error(rates, &predicted_y);
    if !sse.is_finite() {
        return Err(FitError::Numerical { model: name });
    }

    let coefficients = match model {
        ModelKind::Linear => Coefficients::Linear {
            slope: line.slope,
            intercept: line.intercept,
        },
        ModelKind::Logarithmic => Coefficients::Logarithmic {
            a: line.intercept,
            b: line.slope,
        },
    };
    debug!(model = name, sse, "fitted candidate");

    Ok(FitResult {
        model,
        coefficients,
        predicted_y,
        sse,
    })
}
