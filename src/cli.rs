use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Weekly activity planner.
/// Storage defaults to ~/.planner/store.json or a path passed via --db.
/// Runs the interactive week grid when no command is given.
#[derive(Parser)]
#[command(name = "planner", version, about = "Weekly activity planner")]
pub struct Cli {
    /// Path to the JSON store file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log at debug level (the log file lives next to the store).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
