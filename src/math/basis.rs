//! Regressor transforms for the two flow-curve models.
//!
//! - linear: `g(x) = x`
//! - logarithmic: `g(x) = ln x`, defined only for `x > 0`

use crate::domain::ModelKind;

/// Transform `x` into the regressor used by `model`.
///
/// Returns `None` when `x` is outside the model's domain.
pub fn regressor(model: ModelKind, x: f64) -> Option<f64> {
    match model {
        ModelKind::Linear => Some(x),
        ModelKind::Logarithmic => (x > 0.0).then(|| x.ln()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_regressor_rejects_non_positive() {
        assert_eq!(regressor(ModelKind::Logarithmic, 0.0), None);
        assert_eq!(regressor(ModelKind::Logarithmic, -1.0), None);
        assert_eq!(regressor(ModelKind::Logarithmic, 1.0), Some(0.0));
        assert_eq!(regressor(ModelKind::Linear, -3.0), Some(-3.0));
    }
}
