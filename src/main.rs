use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;

use todo_tui::store::{HistoryStore, Task};
use todo_tui::tui::view::age_label;
use todo_tui::{config, logging, tui};

#[derive(Parser)]
#[command(
    name = "todo",
    about = "A terminal todo list with vim-style navigation",
    version = env!("TODO_VERSION")
)]
struct Cli {
    /// Directory holding tasks.json and history.json (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive list view (default)
    View,
    /// Create a new task
    Create {
        /// Task title; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// List all tasks (non-interactive)
    List,
    /// Move completed tasks to history
    Clear,
    /// Show archived tasks
    History {
        /// Empty the archive instead of listing it
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = config::load()?;
    let override_dir = cli.data_dir.as_deref();
    config::ensure_dir(&cfg.data_dir(override_dir)?)?;
    logging::init(&cfg.log, &cfg.log_path(override_dir)?);

    let store = cfg.store_paths(override_dir)?.open();

    match cli.command.unwrap_or(Commands::View) {
        Commands::View => {
            tracing::info!("starting interactive view on {}", store.path().display());
            tui::run(store, cfg.theme.build())
        }
        Commands::Create { title } => {
            let title = title.join(" ");
            match store.create(&title)? {
                Some(task) => {
                    tracing::info!(id = task.id, "created task from cli");
                    println!("{} Created task #{}: {}", "✓".green(), task.id, task.title);
                }
                None => println!("{}", "Task title cannot be empty".yellow()),
            }
            Ok(())
        }
        Commands::List => {
            print_tasks(&store.list());
            Ok(())
        }
        Commands::Clear => {
            let count = store.clear_completed()?;
            if count > 0 {
                tracing::info!(count, "cleared completed tasks");
                println!("{} Cleared {count} completed task(s)", "✓".green());
            } else {
                println!("{}", "No completed tasks to clear".yellow());
            }
            Ok(())
        }
        Commands::History { clear } => {
            if clear {
                let count = store.history().clear()?;
                println!("{} Removed {count} archived task(s)", "✓".green());
            } else {
                print_history(store.history());
            }
            Ok(())
        }
    }
}

/// Left-align `s` in a column of `width` characters.
fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

fn title_width(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .map(|t| t.title.chars().count())
        .max()
        .unwrap_or(0)
        .max(30)
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!(
            "{}",
            "No tasks yet. Use 'todo create' or 'todo view' to add tasks.".dim()
        );
        return;
    }

    let now = Local::now();
    let width = title_width(tasks);
    println!(
        "{}",
        format!(
            "{}  {}  {}  {}  {}",
            pad("✓", 3),
            pad("ID", 4),
            pad("Title", width),
            pad("Status", 10),
            "Created"
        )
        .bold()
    );

    for task in tasks {
        let (checkbox, title, status) = if task.is_completed() {
            (
                pad("[x]", 3).green(),
                pad(&task.title, width).dim().crossed_out(),
                pad(task.status.label(), 10).green(),
            )
        } else {
            (
                pad("[ ]", 3).stylize(),
                pad(&task.title, width).stylize(),
                pad(task.status.label(), 10).yellow(),
            )
        };
        println!(
            "{checkbox}  {}  {title}  {status}  {}",
            pad(&task.id.to_string(), 4),
            age_label(task.created_at, now).dark_grey()
        );
    }
}

fn print_history(history: &HistoryStore) {
    let tasks = history.list();
    if tasks.is_empty() {
        println!("{}", "History is empty.".dim());
        return;
    }

    let now = Local::now();
    let width = title_width(&tasks);
    println!(
        "{}",
        format!("{}  {}  {}", pad("ID", 4), pad("Title", width), "Done").bold()
    );
    for task in &tasks {
        let done = task.completed_at.unwrap_or(task.created_at);
        println!(
            "{}  {}  {}",
            pad(&task.id.to_string(), 4),
            pad(&task.title, width),
            age_label(done, now).dark_grey()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_tui::store::TaskStore;

    #[test]
    fn cli_parses_multi_word_title() {
        let cli = Cli::try_parse_from(["todo", "create", "Buy", "milk"]).unwrap();
        match cli.command {
            Some(Commands::Create { title }) => assert_eq!(title.join(" "), "Buy milk"),
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn cli_defaults_to_view_and_accepts_data_dir() {
        let cli = Cli::try_parse_from(["todo", "--data-dir", "/tmp/x"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));

        let cli = Cli::try_parse_from(["todo", "history", "--clear"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::History { clear: true })));
    }

    #[test]
    fn create_requires_title() {
        assert!(Cli::try_parse_from(["todo", "create"]).is_err());
    }

    #[test]
    fn title_column_has_minimum_width() {
        assert_eq!(title_width(&[Task::new(1, "short")]), 30);
        let long = "x".repeat(42);
        assert_eq!(title_width(&[Task::new(1, long)]), 42);
        assert_eq!(pad("ab", 4), "ab  ");
    }

    #[test]
    fn stores_resolve_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config::Config::default();
        let store: TaskStore = cfg.store_paths(Some(dir.path())).unwrap().open();
        assert_eq!(store.path(), dir.path().join("tasks.json"));
        assert_eq!(store.history().path(), dir.path().join("history.json"));
    }
}
