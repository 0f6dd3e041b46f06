//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - built from the catalog/calibration inputs
//! - consumed by the partitioner and the fitter
//! - exported to JSON for later inspection

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default maximum number of distinct ingredients a book may reference.
pub const DEFAULT_CAPACITY: usize = 15;

/// Default minimum number of drinks for a group to stand as its own book.
pub const DEFAULT_MIN_GROUP_SIZE: usize = 3;

/// Category assigned to drinks with a blank or missing category.
pub const MISC_CATEGORY: &str = "Misc";

/// One US cup in liters; the default calibration reference volume.
pub const CUP_VOLUME_LITERS: f64 = 0.236588;

/// Number of calibration steps (1..=5 open valves).
pub const CALIBRATION_STEPS: u32 = 5;

/// A drink as stored in the catalog JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Compact `id:amount:priority,...` encoding.
    #[serde(default)]
    pub ingredients: Option<String>,
}

/// An ingredient as stored in the catalog JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Ingredient {
    pub fn is_spirit(&self) -> bool {
        self.kind.trim().eq_ignore_ascii_case("spirit")
    }
}

/// Partitioner input: a catalog entry with its category and required resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub category: String,
    pub resource_ids: BTreeSet<i64>,
    /// Display name, carried for reports only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Item {
    pub fn new(id: i64, category: impl Into<String>, resource_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            id,
            category: category.into(),
            resource_ids: resource_ids.into_iter().collect(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A capacity-bounded group of items from one category.
///
/// `resource_ids` is always the union of the items' resource ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub label: String,
    pub description: String,
    pub items: Vec<Item>,
    pub resource_ids: BTreeSet<i64>,
}

impl Book {
    pub fn item_ids(&self) -> Vec<i64> {
        self.items.iter().map(|i| i.id).collect()
    }
}

/// Partitioner output with item accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Books per category, ordered by category key.
    pub books: BTreeMap<String, Vec<Book>>,
    /// Items dropped by the undersized-leftover rule, in category order.
    pub dropped: Vec<Item>,
}

impl Partition {
    pub fn book_count(&self) -> usize {
        self.books.values().map(Vec::len).sum()
    }

    pub fn placed_item_count(&self) -> usize {
        self.books
            .values()
            .flat_map(|books| books.iter())
            .map(|b| b.items.len())
            .sum()
    }
}

/// Run configuration for the partitioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionConfig {
    pub capacity: usize,
    pub min_group_size: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
        }
    }
}

/// One calibration measurement: `x` open valves took `elapsed_ms` to fill the reference volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: u32,
    pub elapsed_ms: f64,
}

impl Sample {
    pub fn new(x: u32, elapsed_ms: f64) -> Self {
        Self { x, elapsed_ms }
    }
}

/// Candidate regression models for the flow curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Linear,
    Logarithmic,
}

impl ModelKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear Fit",
            ModelKind::Logarithmic => "Logarithmic Fit",
        }
    }
}

/// Fitted coefficients for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Coefficients {
    /// `y = slope * x + intercept`
    Linear { slope: f64, intercept: f64 },
    /// `y = a + b * ln(x)`
    Logarithmic { a: f64, b: f64 },
}

impl Coefficients {
    pub fn model(&self) -> ModelKind {
        match self {
            Coefficients::Linear { .. } => ModelKind::Linear,
            Coefficients::Logarithmic { .. } => ModelKind::Logarithmic,
        }
    }

    /// Evaluate the curve at `x`. Logarithmic curves are NaN for `x <= 0`.
    pub fn evaluate(&self, x: f64) -> f64 {
        match *self {
            Coefficients::Linear { slope, intercept } => slope * x + intercept,
            Coefficients::Logarithmic { a, b } => {
                if x > 0.0 {
                    a + b * x.ln()
                } else {
                    f64::NAN
                }
            }
        }
    }

    pub fn equation(&self) -> String {
        match *self {
            Coefficients::Linear { slope, intercept } => {
                format!("y = {slope:.3}x + {intercept:.3}")
            }
            Coefficients::Logarithmic { a, b } => format!("y = {a:.3} + {b:.3}·ln(x)"),
        }
    }
}

/// A fitted flow curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: ModelKind,
    pub coefficients: Coefficients,
    /// Predicted rate at each sample `x`, in sample order.
    pub predicted_y: Vec<f64>,
    pub sse: f64,
}

impl FitResult {
    pub fn predict(&self, x: f64) -> f64 {
        self.coefficients.evaluate(x)
    }

    pub fn equation(&self) -> String {
        self.coefficients.equation()
    }

    pub fn rmse(&self) -> f64 {
        let n = self.predicted_y.len();
        if n == 0 {
            return f64::NAN;
        }
        (self.sse / n as f64).sqrt()
    }
}

/// Both candidate fits plus the selected one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSelection {
    pub best: FitResult,
    pub linear: FitResult,
    pub logarithmic: FitResult,
    pub xs: Vec<u32>,
    /// Observed rates (reference volume per second), in sample order.
    pub rates: Vec<f64>,
}

/// Run configuration for a calibration fit.
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    pub reference_volume: f64,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    /// Extra `x` values to extrapolate the selected curve at.
    pub predict_at: Vec<u32>,
    pub export: Option<PathBuf>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            reference_volume: CUP_VOLUME_LITERS,
            plot: true,
            plot_width: 60,
            plot_height: 15,
            predict_at: Vec::new(),
            export: None,
        }
    }
}
