//! `barkit` library crate.
//!
//! Two independent cores plus the plumbing around them:
//!
//! - `partition`: greedy grouping of a drink catalog into ingredient-bounded recipe books
//! - `fit`: linear vs. logarithmic flow-curve fitting for dispenser calibration
//!
//! The binary (`bk`) is a thin wrapper so the cores are testable without
//! spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod partition;
pub mod plot;
pub mod report;
