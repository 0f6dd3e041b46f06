//! Command-line parsing for the recipe-book and flow-calibration tools.
//!
//! Argument parsing and command dispatch stay separate from the
//! partitioning and fitting code.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

use crate::domain::{CUP_VOLUME_LITERS, DEFAULT_CAPACITY, DEFAULT_MIN_GROUP_SIZE};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bk", version, about = "Recipe-book builder and flow calibration")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Group the drink catalog into ingredient-bounded recipe books.
    Books(BooksArgs),
    /// Fit a flow curve to calibration timings and pick the better model.
    Calibrate(CalibrateArgs),
    /// Plot a previously exported calibration fit.
    Plot(PlotArgs),
}

#[derive(Debug, Parser, Clone)]
#[command(group(ArgGroup::new("catalog").required(true).args(["drinks", "remote"])))]
pub struct BooksArgs {
    /// Drink catalog JSON.
    #[arg(long, value_name = "JSON", requires = "ingredients")]
    pub drinks: Option<PathBuf>,

    /// Ingredient catalog JSON.
    #[arg(long, value_name = "JSON")]
    pub ingredients: Option<PathBuf>,

    /// Fetch both catalogs from `BARKIT_CATALOG_URL` instead of local files.
    #[arg(long)]
    pub remote: bool,

    /// Maximum distinct ingredients per book.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Minimum drinks for a group to stand as its own book.
    #[arg(long, default_value_t = DEFAULT_MIN_GROUP_SIZE)]
    pub min_group_size: usize,

    /// Export books to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["samples", "elapsed", "simulate"])))]
pub struct CalibrateArgs {
    /// CSV with `x,elapsed_ms` columns.
    #[arg(long, value_name = "CSV")]
    pub samples: Option<PathBuf>,

    /// Comma-separated fill durations in ms for x = 1, 2, ...
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub elapsed: Vec<f64>,

    /// Use a simulated calibration run.
    #[arg(long)]
    pub simulate: bool,

    /// Seed for `--simulate`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Reference volume filled at each step (liters; default one US cup).
    #[arg(long, default_value_t = CUP_VOLUME_LITERS)]
    pub volume: f64,

    /// Extrapolate the chosen curve at these x values (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub predict: Vec<u32>,

    /// Render an ASCII plot (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,

    /// Export the fit (both models, rates, curve grid) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for plotting a saved fit.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Fit JSON produced by `bk calibrate --export`.
    #[arg(long, value_name = "JSON")]
    pub fit: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn books_requires_a_catalog_source() {
        assert!(Cli::try_parse_from(["bk", "books"]).is_err());
        assert!(Cli::try_parse_from(["bk", "books", "--drinks", "d.json"]).is_err());

        let cli = Cli::try_parse_from(["bk", "books", "--drinks", "d.json", "--ingredients", "i.json"]).unwrap();
        let Command::Books(args) = cli.command else {
            panic!("expected books");
        };
        assert_eq!(args.capacity, DEFAULT_CAPACITY);
        assert_eq!(args.min_group_size, DEFAULT_MIN_GROUP_SIZE);
    }

    #[test]
    fn calibrate_parses_inline_durations() {
        let cli = Cli::try_parse_from(["bk", "-vv", "calibrate", "--elapsed", "4100,2300,1700", "--predict", "6,8"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Calibrate(args) = cli.command else {
            panic!("expected calibrate");
        };
        assert_eq!(args.elapsed, vec![4100.0, 2300.0, 1700.0]);
        assert_eq!(args.predict, vec![6, 8]);
        assert_eq!(args.volume, CUP_VOLUME_LITERS);
    }

    #[test]
    fn calibrate_rejects_two_sources() {
        assert!(Cli::try_parse_from(["bk", "calibrate", "--simulate", "--elapsed", "1000,900"]).is_err());
    }
}
