//! # Planner - Weekly Activity Planner
//!
//! A terminal planner that lays the week out as a grid of days against
//! hours. Each activity is pinned to one weekday and one hour slot.
//!
//! ## Key Features
//!
//! - **Week Grid**: 7 days x 24 hours, with activities drawn in their cells
//! - **Forms**: add, edit and delete activities from modal forms
//! - **Stable Identity**: every activity keeps its ID across edits and deletes
//! - **Local Storage**: one JSON key-value file, rewritten atomically on every change
//! - **Scriptable CLI**: the same operations from the shell
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the week grid
//! planner
//!
//! # Add an activity from the shell
//! planner add "Study" --desc "Math" --day tuesday --time 09:00
//!
//! # Print the week, skipping empty hours
//! planner week --compact
//! ```
//!
//! Data is stored in `~/.planner/store.json` unless `--db` says otherwise.
//! The log file `planner.log` sits next to the store.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod error;
pub mod fields;
pub mod logging;
pub mod planner;
pub mod store;
pub mod task;
pub mod week;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use planner::Planner;
use store::FileStore;

fn main() {
    let cli = Cli::parse();

    // Determine the store file and the directory it lives in
    let db_path = cli.db.clone().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".planner").join("store.json")
    });
    let planner_dir = db_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."))
        .to_path_buf();
    if let Err(e) = std::fs::create_dir_all(&planner_dir) {
        eprintln!("Failed to create planner directory {}: {}", planner_dir.display(), e);
        std::process::exit(1);
    }

    logging::init_logging(&planner_dir, cli.verbose);

    // Commands that don't need the task list loaded
    let command = match cli.command {
        None | Some(Commands::Ui) => {
            cmd_ui(&db_path);
            return;
        }
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
            return;
        }
        Some(Commands::Backup) => {
            cmd_backup(&db_path);
            return;
        }
        Some(command) => command,
    };

    let store = match FileStore::open(&db_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open store {}: {}", db_path.display(), e);
            std::process::exit(1);
        }
    };
    let mut planner = Planner::load(store);

    match command {
        Commands::Ui | Commands::Completions { .. } | Commands::Backup => {
            unreachable!("handled above")
        }
        Commands::Add { title, desc, day, time } => cmd_add(&mut planner, title, desc, day, time),
        Commands::List { day } => cmd_list(&planner, day),
        Commands::View { id } => cmd_view(&planner, id),
        Commands::Update { id, title, desc, day, time } => {
            cmd_update(&mut planner, id, title, desc, day, time)
        }
        Commands::Delete { id } => cmd_delete(&mut planner, id),
        Commands::Week { compact } => cmd_week(&planner, compact),
    }
}
