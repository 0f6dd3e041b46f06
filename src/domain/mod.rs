//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - catalog inputs (`Item`) and partition outputs (`Book`, `Partition`)
//! - calibration inputs (`Sample`) and fit outputs (`FitResult`, `FitSelection`)
//! - run configuration (`PartitionConfig`, `CalibrationConfig`)

pub mod types;

pub use types::*;
