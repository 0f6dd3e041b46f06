//! Reporting: plain-text summaries of recipe books and calibration fits.

pub mod format;

pub use format::*;
