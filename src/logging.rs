//! Tracing setup.
//!
//! Log lines go to `planner.log` in the planner directory so they never
//! interleave with the terminal UI. `PLANNER_LOG` takes an `EnvFilter`
//! directive and overrides the default level.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "planner.log";
pub const LOG_ENV: &str = "PLANNER_LOG";

/// Install the global subscriber. Failing to open the log file is reported
/// but not fatal.
pub fn init_logging(dir: &Path, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let path = dir.join(LOG_FILE);
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
