//! Tracing setup for the `bk` binary.
//!
//! Logs go to stderr so report output on stdout stays clean for piping.
//! `RUST_LOG` takes precedence over the `-v` count:
//!
//! ```bash
//! bk books --drinks drinks.json --ingredients ingredients.json -vv
//! RUST_LOG=barkit::partition=debug bk books ...
//! ```

use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
