//! Flow-curve model selection (linear vs. logarithmic).
//!
//! The fitter converts calibration samples into flow rates, fits both
//! candidate models, and keeps the one with the lower SSE.
//!
//! Selection rules:
//! 1. Require at least two samples, every duration finite and positive.
//! 2. Fit both models (the logarithmic fit needs every `x > 0`).
//! 3. Pick the model with strictly lower SSE; ties go to the linear model.

use tracing::debug;

use crate::domain::{FitResult, FitSelection, ModelKind, Sample};
use crate::fit::fitter::{FitError, MIN_SAMPLES, fit_linear, fit_logarithmic};

/// Flow rate for one sample: reference volume per second.
pub fn flow_rate(sample: &Sample, reference_volume: f64) -> f64 {
    reference_volume / (sample.elapsed_ms / 1000.0)
}

/// Fit both models and return the selected one.
pub fn fit(samples: &[Sample], reference_volume: f64) -> Result<FitResult, FitError> {
    fit_and_select(samples, reference_volume).map(|selection| selection.best)
}

/// Fit both models and keep both candidates alongside the selected one.
pub fn fit_and_select(samples: &[Sample], reference_volume: f64) -> Result<FitSelection, FitError> {
    let usable = samples
        .iter()
        .filter(|s| s.elapsed_ms.is_finite() && s.elapsed_ms > 0.0)
        .count();
    if samples.len() < MIN_SAMPLES || usable != samples.len() {
        return Err(FitError::InsufficientData { samples: usable });
    }
    if !(reference_volume.is_finite() && reference_volume > 0.0) {
        return Err(FitError::InvalidReferenceVolume {
            volume: reference_volume,
        });
    }
    if let Some(bad) = samples.iter().find(|s| s.x == 0) {
        return Err(FitError::InvalidDomain { x: bad.x });
    }

    let xs: Vec<u32> = samples.iter().map(|s| s.x).collect();
    let rates: Vec<f64> = samples.iter().map(|s| flow_rate(s, reference_volume)).collect();

    let linear = fit_linear(&xs, &rates)?;
    let logarithmic = fit_logarithmic(&xs, &rates)?;
    let best = select(&linear, &logarithmic).clone();
    debug!(
        sse_linear = linear.sse,
        sse_log = logarithmic.sse,
        chosen = ?best.model,
        "selected flow model"
    );

    Ok(FitSelection {
        best,
        linear,
        logarithmic,
        xs,
        rates,
    })
}

/// Relative SSE difference below which the two fits count as tied.
pub const SSE_TIE_TOLERANCE: f64 = 1e-12;

/// Pick the lower-SSE fit; ties (and incomparable SSEs) favor the linear model.
///
/// SSEs within `SSE_TIE_TOLERANCE` of the data's scale are a tie, so two
/// fits that both reproduce the samples exactly never split on rounding.
pub fn select<'a>(linear: &'a FitResult, logarithmic: &'a FitResult) -> &'a FitResult {
    debug_assert_eq!(linear.model, ModelKind::Linear);
    debug_assert_eq!(logarithmic.model, ModelKind::Logarithmic);
    let scale: f64 = linear.predicted_y.iter().map(|y| y * y).sum();
    let margin = SSE_TIE_TOLERANCE * scale.max(linear.sse).max(f64::MIN_POSITIVE);
    if logarithmic.sse < linear.sse - margin {
        logarithmic
    } else {
        linear
    }
}

/// Evaluate the selected curve on an evenly spaced grid across `[x_min, x_max]`.
pub fn fitted_grid(fit: &FitResult, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            (x, fit.predict(x))
        })
        .collect()
}
