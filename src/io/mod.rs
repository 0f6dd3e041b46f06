//! Input/output helpers.
//!
//! - drink/ingredient catalog JSON ingest (`catalog`)
//! - calibration sample CSV ingest (`samples`)
//! - book and fit JSON exports (`export`)

pub mod catalog;
pub mod export;
pub mod samples;

pub use catalog::*;
pub use export::*;
pub use samples::*;
