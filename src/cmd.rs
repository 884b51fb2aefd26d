//! Command implementations for the CLI interface.
//!
//! Every mutating command goes through the same open/edit/submit cycle as
//! the interactive grid, so the CLI and the TUI share one code path into the
//! store.

use std::fs;
use std::path::Path;

use chrono::Local;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::fields::{Day, FormField, Hour};
use crate::planner::Planner;
use crate::store::FileStore;
use crate::task::{Task, TaskId};
use crate::tui::run::run_tui;
use crate::week::{truncate, week_order, week_table};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive week grid (the default).
    Ui,

    /// Add a new activity.
    Add {
        /// Short title for the activity.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Day of the week.
        #[arg(long, value_enum, ignore_case = true, default_value_t = Day::Monday)]
        day: Day,
        /// Hour of the day: HH:00 or a bare hour (0-23).
        #[arg(long, default_value = "00:00")]
        time: Hour,
    },

    /// List activities in week order.
    List {
        /// Only show one day.
        #[arg(long, value_enum, ignore_case = true)]
        day: Option<Day>,
    },

    /// Show every field of one activity.
    View {
        /// Activity ID.
        id: u64,
    },

    /// Change fields of an activity.
    Update {
        /// Activity ID.
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum, ignore_case = true)]
        day: Option<Day>,
        #[arg(long)]
        time: Option<Hour>,
    },

    /// Delete an activity.
    Delete {
        /// Activity ID.
        id: u64,
    },

    /// Print the week grid.
    Week {
        /// Hide hours with no activities.
        #[arg(long)]
        compact: bool,
    },

    /// Copy the store file into a timestamped backup.
    Backup,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(db_path: &Path) {
    if let Err(e) = run_tui(db_path) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new activity through the create form.
pub fn cmd_add(planner: &mut Planner<FileStore>, title: String, desc: Option<String>, day: Day, time: Hour) {
    planner.open_create_form();
    let fields = [
        (FormField::Title, title),
        (FormField::Description, desc.unwrap_or_default()),
        (FormField::Day, day.label().to_string()),
        (FormField::Time, time.label()),
    ];
    for (field, value) in fields {
        if let Err(e) = planner.update_draft_field(field, &value) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
    match planner.submit_create() {
        Ok(Some(id)) => println!("Added activity {id}."),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Failed to save: {e}");
            std::process::exit(1);
        }
    }
}

/// Print activities in a table, ordered by day then hour.
pub fn cmd_list(planner: &Planner<FileStore>, day: Option<Day>) {
    let tasks: Vec<&Task> = week_order(planner.tasks())
        .into_iter()
        .filter(|t| day.map_or(true, |d| t.day == d))
        .collect();
    if tasks.is_empty() {
        println!("No activities.");
        return;
    }
    println!("{:<5} {:<10} {:<6} {}", "ID", "Day", "Time", "Title");
    for t in tasks {
        println!(
            "{:<5} {:<10} {:<6} {}",
            t.id,
            t.day,
            t.time,
            truncate(&t.title, 60)
        );
    }
}

/// Show a single activity.
pub fn cmd_view(planner: &Planner<FileStore>, id: u64) {
    let Some(task) = planner.get(TaskId(id)) else {
        eprintln!("Activity {id} not found.");
        std::process::exit(1);
    };
    println!("ID:          {}", task.id);
    println!("Title:       {}", task.title);
    println!("Day:         {}", task.day);
    println!("Time:        {}", task.time);
    if task.description.is_empty() {
        println!("Description: -");
    } else {
        println!("Description:");
        for line in task.description.lines() {
            println!("  {line}");
        }
    }
    let slot = planner.tasks_in_slot(task.day, task.time);
    if slot.len() > 1 {
        let others: Vec<String> = slot
            .iter()
            .filter(|t| t.id != task.id)
            .map(|t| format!("{} ({})", t.title, t.id))
            .collect();
        println!("Shares slot:  {}", others.join(", "));
    }
}

/// Update fields of an activity through the edit form.
pub fn cmd_update(
    planner: &mut Planner<FileStore>,
    id: u64,
    title: Option<String>,
    desc: Option<String>,
    day: Option<Day>,
    time: Option<Hour>,
) {
    if let Err(e) = planner.open_edit_form(TaskId(id)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    let changes = [
        (FormField::Title, title),
        (FormField::Description, desc),
        (FormField::Day, day.map(|d| d.label().to_string())),
        (FormField::Time, time.map(Hour::label)),
    ];
    let mut changed = false;
    for (field, value) in changes {
        if let Some(value) = value {
            if let Err(e) = planner.update_draft_field(field, &value) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            changed = true;
        }
    }
    if !changed {
        planner.close_edit_form();
        println!("Nothing to update.");
        return;
    }
    match planner.submit_edit() {
        Ok(_) => println!("Updated activity {id}."),
        Err(e) => {
            eprintln!("Failed to save: {e}");
            std::process::exit(1);
        }
    }
}

/// Delete an activity through the edit form.
pub fn cmd_delete(planner: &mut Planner<FileStore>, id: u64) {
    if let Err(e) = planner.open_edit_form(TaskId(id)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    match planner.delete_current() {
        Ok(Some(task)) => println!("Deleted '{}'.", task.title),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Failed to save: {e}");
            std::process::exit(1);
        }
    }
}

/// Print the week grid as text.
pub fn cmd_week(planner: &Planner<FileStore>, compact: bool) {
    print!("{}", week_table(planner.tasks(), compact, 14));
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Copy the store file to `backup/<timestamp>_<file>` next to it.
pub fn create_backup(db_path: &Path) -> Result<String, std::io::Error> {
    if !db_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Store file does not exist"
        ));
    }

    let parent_dir = db_path.parent().unwrap_or_else(|| Path::new("."));
    let backup_dir = parent_dir.join("backup");
    fs::create_dir_all(&backup_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let db_filename = db_path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("store.json");

    let backup_path = backup_dir.join(format!("{}_{}", timestamp, db_filename));
    fs::copy(db_path, &backup_path)?;

    Ok(backup_path.to_string_lossy().to_string())
}

/// Back up the store file.
pub fn cmd_backup(db_path: &Path) {
    match create_backup(db_path) {
        Ok(backup_path) => println!("Backup created: {}", backup_path),
        Err(e) => {
            eprintln!("Failed to create backup: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;
    use clap::Parser;

    #[test]
    fn test_backup_copies_store() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("store.json");
        fs::write(&db_path, r#"{"tasks":"[]"}"#).unwrap();

        let backup = create_backup(&db_path).unwrap();
        assert!(backup.ends_with("_store.json"));
        assert!(Path::new(&backup).starts_with(dir.path().join("backup")));
        assert_eq!(fs::read_to_string(&backup).unwrap(), r#"{"tasks":"[]"}"#);
    }

    #[test]
    fn test_backup_requires_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        assert!(create_backup(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_cli_flows_persist_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("store.json");

        let mut planner = Planner::load(FileStore::open(&db_path).unwrap());
        cmd_add(&mut planner, "Study".into(), Some("Math".into()), Day::Tuesday, Hour::new(9).unwrap());
        cmd_add(&mut planner, "Gym".into(), None, Day::Friday, Hour::new(18).unwrap());
        cmd_update(&mut planner, 1, Some("Study hard".into()), None, None, Some(Hour::new(10).unwrap()));
        cmd_delete(&mut planner, 2);

        let reloaded = Planner::load(FileStore::open(&db_path).unwrap());
        assert_eq!(reloaded.tasks().len(), 1);
        let task = &reloaded.tasks()[0];
        assert_eq!(task.title, "Study hard");
        assert_eq!(task.description, "Math");
        assert_eq!(task.day, Day::Tuesday);
        assert_eq!(task.time.label(), "10:00");
    }

    #[test]
    fn test_add_without_slot_uses_form_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("store.json");
        let cli = crate::cli::Cli::try_parse_from(["planner", "add", "Read"]).unwrap();
        let Some(Commands::Add { title, desc, day, time }) = cli.command else {
            panic!("expected add");
        };

        let mut planner = Planner::load(FileStore::open(&db_path).unwrap());
        cmd_add(&mut planner, title, desc, day, time);

        let task = &planner.tasks()[0];
        let defaults = TaskDraft::default();
        assert_eq!((task.day, task.time), (defaults.day, defaults.time));
        assert_eq!((task.title.as_str(), task.description.as_str()), ("Read", ""));
    }
}
