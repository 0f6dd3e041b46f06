//! JSON exports for books and calibration fits.
//!
//! The fit file is the portable representation of a calibration:
//! - both candidate fits and the selected model
//! - observed rates
//! - a precomputed curve grid for re-plotting with `bk plot`

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Book, FitSelection, Partition, PartitionConfig};
use crate::error::AppError;
use crate::fit::fitted_grid;

const TOOL: &str = "bk";
const GRID_POINTS: usize = 101;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooksFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub capacity: usize,
    pub min_group_size: usize,
    pub categories: Vec<CategoryEntry>,
    /// Ids of items that did not land in any book.
    pub dropped: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: String,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub reference_volume: f64,
    pub selection: FitSelection,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl CurveGrid {
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }
}

pub fn books_file(partition: &Partition, config: &PartitionConfig) -> BooksFile {
    BooksFile {
        tool: TOOL.to_string(),
        generated_at: Utc::now(),
        capacity: config.capacity,
        min_group_size: config.min_group_size,
        categories: partition
            .books
            .iter()
            .map(|(category, books)| CategoryEntry {
                category: category.clone(),
                books: books.clone(),
            })
            .collect(),
        dropped: partition.dropped.iter().map(|i| i.id).collect(),
    }
}

pub fn fit_file(selection: &FitSelection, reference_volume: f64) -> FitFile {
    let x_min = selection.xs.iter().copied().min().unwrap_or(1);
    let x_max = selection.xs.iter().copied().max().unwrap_or(x_min);
    let (x_min, x_max) = (f64::from(x_min), f64::from(x_max));
    let (x, y) = fitted_grid(&selection.best, x_min, x_max, GRID_POINTS)
        .into_iter()
        .unzip();

    FitFile {
        tool: TOOL.to_string(),
        generated_at: Utc::now(),
        reference_volume,
        selection: selection.clone(),
        grid: CurveGrid { x, y },
    }
}

pub fn write_json<T: Serialize, W: Write>(writer: W, value: &T) -> Result<(), AppError> {
    serde_json::to_writer_pretty(writer, value).map_err(|e| AppError::new(2, format!("Failed to write JSON: {e}")))
}

pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
    write_json(file, value)
}

pub fn read_fit_json<R: Read>(reader: R) -> Result<FitFile, AppError> {
    serde_json::from_reader(reader).map_err(|e| AppError::new(2, format!("Invalid fit JSON: {e}")))
}

pub fn read_fit_file(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    read_fit_json(file)
}
