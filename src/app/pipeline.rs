//! Shared pipelines behind the CLI commands.
//!
//! - books: catalog load -> items -> partition
//! - calibration: sample load -> rates -> fit both models -> selection
//!
//! The CLI layer only handles presentation (printing, plotting, exports).

use std::path::PathBuf;

use tracing::{info, info_span, warn};

use crate::data::{CatalogClient, SimulationConfig, simulate_samples};
use crate::domain::{CalibrationConfig, FitSelection, Partition, PartitionConfig, Sample};
use crate::error::AppError;
use crate::fit::fit_and_select;
use crate::io::{Catalog, RowError, load_catalog, load_samples_csv, samples_from_durations};
use crate::partition::partition_with_report;

/// Where the drink catalog comes from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    Files { drinks: PathBuf, ingredients: PathBuf },
    Remote,
}

/// Where calibration samples come from.
#[derive(Debug, Clone)]
pub enum SampleSource {
    Csv(PathBuf),
    Durations(Vec<f64>),
    Simulated(SimulationConfig),
}

/// All computed outputs of a `bk books` run.
#[derive(Debug, Clone)]
pub struct BooksRun {
    pub catalog: Catalog,
    pub partition: Partition,
}

/// All computed outputs of a `bk calibrate` run.
#[derive(Debug, Clone)]
pub struct CalibrationRun {
    pub samples: Vec<Sample>,
    pub row_errors: Vec<RowError>,
    pub selection: FitSelection,
}

pub fn run_books(source: &CatalogSource, config: &PartitionConfig) -> Result<BooksRun, AppError> {
    let catalog = match source {
        CatalogSource::Files { drinks, ingredients } => load_catalog(drinks, ingredients)?,
        CatalogSource::Remote => CatalogClient::from_env()?.fetch_catalog()?,
    };
    Ok(run_books_with_catalog(catalog, config))
}

/// Partition an already-loaded catalog.
pub fn run_books_with_catalog(catalog: Catalog, config: &PartitionConfig) -> BooksRun {
    let _span = info_span!("books", capacity = config.capacity, min_group_size = config.min_group_size).entered();
    info!(
        drinks = catalog.drinks.len(),
        ingredients = catalog.ingredients.len(),
        "loaded catalog"
    );

    let items = catalog.items();
    let partition = partition_with_report(&items, config);
    for (category, books) in &partition.books {
        info!(%category, books = books.len(), "built books");
    }
    if !partition.dropped.is_empty() {
        info!(dropped = partition.dropped.len(), "drinks left out of every book");
    }

    BooksRun { catalog, partition }
}

pub fn run_calibration(source: &SampleSource, config: &CalibrationConfig) -> Result<CalibrationRun, AppError> {
    let (samples, row_errors) = match source {
        SampleSource::Csv(path) => {
            let ingest = load_samples_csv(path)?;
            for err in &ingest.row_errors {
                warn!(line = err.line, message = %err.message, "skipped sample row");
            }
            (ingest.samples, ingest.row_errors)
        }
        SampleSource::Durations(elapsed) => (samples_from_durations(elapsed), Vec::new()),
        SampleSource::Simulated(sim) => (simulate_samples(sim, config.reference_volume)?, Vec::new()),
    };

    let selection = run_calibration_with_samples(&samples, config)?;
    Ok(CalibrationRun {
        samples,
        row_errors,
        selection,
    })
}

/// Fit an already-loaded set of samples.
pub fn run_calibration_with_samples(samples: &[Sample], config: &CalibrationConfig) -> Result<FitSelection, AppError> {
    let _span = info_span!("calibrate", samples = samples.len()).entered();
    let selection = fit_and_select(samples, config.reference_volume)?;
    info!(
        model = ?selection.best.model,
        sse = selection.best.sse,
        equation = %selection.best.equation(),
        "calibration fitted"
    );
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Drink, Ingredient, ModelKind};

    fn drink(id: i64, category: &str, ingredients: &str) -> Drink {
        Drink {
            id,
            name: format!("Drink {id}"),
            category: Some(category.to_string()),
            description: None,
            image: None,
            ingredients: Some(ingredients.to_string()),
        }
    }

    #[test]
    fn books_pipeline_partitions_catalog() {
        let drinks = vec![
            drink(1, "Sour", "1:2:1,2:1:2"),
            drink(2, "Sour", "1:2:1,3:1:2"),
            drink(3, "Sour", "2:1:1,3:1:1"),
            drink(4, "", "9:1:1"),
        ];
        let ingredients = vec![Ingredient {
            id: 1,
            name: "Gin".to_string(),
            kind: "spirit".to_string(),
        }];
        let run = run_books_with_catalog(Catalog::new(drinks, ingredients), &PartitionConfig::default());

        assert_eq!(run.partition.books.len(), 1);
        assert_eq!(run.partition.books["Sour"][0].item_ids(), vec![1, 2, 3]);
        assert_eq!(run.partition.dropped.len(), 1);
    }

    #[test]
    fn calibration_pipeline_reports_insufficient_data() {
        let err = run_calibration(&SampleSource::Durations(vec![1000.0]), &CalibrationConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn simulated_calibration_fits() {
        let run = run_calibration(
            &SampleSource::Simulated(SimulationConfig::default()),
            &CalibrationConfig::default(),
        )
        .unwrap();
        assert_eq!(run.samples.len(), 5);
        assert!(matches!(
            run.selection.best.model,
            ModelKind::Linear | ModelKind::Logarithmic
        ));
    }
}
