//! Seeded synthetic calibration runs.
//!
//! A simulated run times how long `x` open valves take to fill the reference
//! volume, for `x = 1..=steps`. The underlying flow saturates as valves are
//! added (`rate = base + gain * ln x`), and each stopwatch reading carries
//! multiplicative Gaussian jitter from the operator pressing Start/Stop.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{CALIBRATION_STEPS, Sample};
use crate::error::AppError;

/// Shortest duration a simulated reading can report.
const MIN_ELAPSED_MS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub steps: u32,
    pub seed: u64,
    /// Flow with one valve open (volume units per second).
    pub base_rate: f64,
    /// Extra flow per unit of `ln x`.
    pub gain: f64,
    /// Relative standard deviation of the timing jitter.
    pub jitter: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: CALIBRATION_STEPS,
            seed: 42,
            base_rate: 0.06,
            gain: 0.045,
            jitter: 0.03,
        }
    }
}

/// Simulate one calibration run against `reference_volume`.
pub fn simulate_samples(config: &SimulationConfig, reference_volume: f64) -> Result<Vec<Sample>, AppError> {
    if config.steps == 0 {
        return Err(AppError::new(2, "Simulation needs at least one step."));
    }
    if !(config.base_rate.is_finite() && config.base_rate > 0.0 && config.gain.is_finite() && config.gain >= 0.0) {
        return Err(AppError::new(2, "Invalid simulated flow curve."));
    }
    if !(config.jitter.is_finite() && config.jitter >= 0.0) {
        return Err(AppError::new(2, "Invalid simulation jitter."));
    }
    if !(reference_volume.is_finite() && reference_volume > 0.0) {
        return Err(AppError::new(2, "Reference volume must be positive."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.jitter)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let samples = (1..=config.steps)
        .map(|x| {
            let rate = config.base_rate + config.gain * f64::from(x).ln();
            let ideal_ms = 1000.0 * reference_volume / rate;
            let z: f64 = normal.sample(&mut rng);
            Sample::new(x, (ideal_ms * z.exp()).max(MIN_ELAPSED_MS))
        })
        .collect();

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CUP_VOLUME_LITERS, ModelKind};
    use crate::fit::fit;

    #[test]
    fn same_seed_same_run() {
        let cfg = SimulationConfig::default();
        let a = simulate_samples(&cfg, CUP_VOLUME_LITERS).unwrap();
        let b = simulate_samples(&cfg, CUP_VOLUME_LITERS).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), CALIBRATION_STEPS as usize);
        assert!(a.iter().all(|s| s.elapsed_ms > 0.0));
    }

    #[test]
    fn noiseless_run_reproduces_log_curve() {
        let cfg = SimulationConfig {
            jitter: 0.0,
            ..SimulationConfig::default()
        };
        let samples = simulate_samples(&cfg, CUP_VOLUME_LITERS).unwrap();
        let best = fit(&samples, CUP_VOLUME_LITERS).unwrap();
        assert_eq!(best.model, ModelKind::Logarithmic);
        assert!((best.predict(1.0) - cfg.base_rate).abs() < 1e-9);
    }

    #[test]
    fn zero_steps_is_rejected() {
        let cfg = SimulationConfig {
            steps: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(simulate_samples(&cfg, 1.0).unwrap_err().exit_code(), 2);
    }
}
