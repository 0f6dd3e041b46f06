//! External data sources: the remote menu catalog and simulated calibration runs.

pub mod remote;
pub mod synthetic;

pub use remote::*;
pub use synthetic::*;
