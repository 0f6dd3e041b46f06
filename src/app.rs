//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads catalogs / calibration samples
//! - runs the partitioner or the fitter
//! - prints reports/plots and writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{BooksArgs, CalibrateArgs, Command, PlotArgs};
use crate::data::SimulationConfig;
use crate::domain::{CalibrationConfig, PartitionConfig};
use crate::error::AppError;

pub mod pipeline;

use pipeline::{CatalogSource, SampleSource};

/// Entry point for the `bk` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init(cli.verbose);

    match cli.command {
        Command::Books(args) => handle_books(args),
        Command::Calibrate(args) => handle_calibrate(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_books(args: BooksArgs) -> Result<(), AppError> {
    let config = partition_config_from_args(&args);
    let source = catalog_source_from_args(&args)?;
    let run = pipeline::run_books(&source, &config)?;

    println!(
        "{}",
        crate::report::format_books_summary(&run.partition, &run.catalog.ingredients, &config)
    );

    if let Some(path) = &args.export {
        let file = crate::io::books_file(&run.partition, &config);
        crate::io::write_json_file(path, &file)?;
        info!(path = %path.display(), "exported books");
    }

    Ok(())
}

fn handle_calibrate(args: CalibrateArgs) -> Result<(), AppError> {
    let config = calibration_config_from_args(&args);
    let source = sample_source_from_args(&args);
    let run = pipeline::run_calibration(&source, &config)?;

    if !run.row_errors.is_empty() {
        eprintln!("Skipped {} unreadable sample row(s).", run.row_errors.len());
    }
    println!(
        "{}",
        crate::report::format_calibration_summary(&run.selection, &config)
    );

    if config.plot {
        let plot = crate::plot::render_calibration_plot(&run.selection, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    if let Some(path) = &config.export {
        let file = crate::io::fit_file(&run.selection, config.reference_volume);
        crate::io::write_json_file(path, &file)?;
        info!(path = %path.display(), "exported fit");
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::read_fit_file(&args.fit)?;
    println!("{}", file.selection.best.equation());
    println!("{}", crate::plot::render_fit_file_plot(&file, args.width, args.height));
    Ok(())
}

pub fn partition_config_from_args(args: &BooksArgs) -> PartitionConfig {
    PartitionConfig {
        capacity: args.capacity,
        min_group_size: args.min_group_size,
    }
}

pub fn calibration_config_from_args(args: &CalibrateArgs) -> CalibrationConfig {
    CalibrationConfig {
        reference_volume: args.volume,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        predict_at: args.predict.clone(),
        export: args.export.clone(),
    }
}

fn catalog_source_from_args(args: &BooksArgs) -> Result<CatalogSource, AppError> {
    if args.remote {
        return Ok(CatalogSource::Remote);
    }
    match (&args.drinks, &args.ingredients) {
        (Some(drinks), Some(ingredients)) => Ok(CatalogSource::Files {
            drinks: drinks.clone(),
            ingredients: ingredients.clone(),
        }),
        _ => Err(AppError::new(2, "Pass --drinks and --ingredients, or --remote.")),
    }
}

fn sample_source_from_args(args: &CalibrateArgs) -> SampleSource {
    if let Some(path) = &args.samples {
        SampleSource::Csv(path.clone())
    } else if args.simulate {
        SampleSource::Simulated(SimulationConfig {
            seed: args.seed,
            ..SimulationConfig::default()
        })
    } else {
        SampleSource::Durations(args.elapsed.clone())
    }
}
