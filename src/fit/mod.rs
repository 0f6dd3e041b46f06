//! Flow-curve fitting.
//!
//! Responsibilities:
//!
//! - convert calibration samples into flow rates
//! - fit the linear and logarithmic candidates
//! - select the lower-error model

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
