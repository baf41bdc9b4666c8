mod history;
mod models;
mod tasks;

pub use history::HistoryStore;
pub use models::*;
pub use tasks::TaskStore;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Locations of the two backing files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub tasks: PathBuf,
    pub history: PathBuf,
}

impl StorePaths {
    /// Standard file names inside a data directory.
    pub fn in_dir(dir: &Path) -> Self {
        StorePaths {
            tasks: dir.join("tasks.json"),
            history: dir.join("history.json"),
        }
    }

    /// Open both stores, wiring the history into the task store.
    pub fn open(&self) -> TaskStore {
        TaskStore::new(&self.tasks, HistoryStore::new(&self.history))
    }
}

/// Read a task list from `path`.
///
/// A missing file is an empty list. Unreadable files, malformed JSON and
/// structurally invalid entries degrade to an empty list as well; the next
/// save overwrites the bad file.
pub(crate) fn load_list(path: &Path) -> Vec<Task> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!("could not read {}, starting empty: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut tasks: Vec<Task> = match serde_json::from_str(&content) {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::warn!("could not parse {}, starting empty: {}", path.display(), e);
            return Vec::new();
        }
    };

    if let Some(bad) = tasks.iter().find(|t| !t.is_well_formed()) {
        tracing::warn!(
            "invalid task entry (id {}, title {:?}) in {}, starting empty",
            bad.id,
            bad.title,
            path.display()
        );
        return Vec::new();
    }

    for task in &mut tasks {
        task.normalize();
    }
    tasks
}

/// Write a task list to `path` as pretty JSON via a temp file + rename,
/// so a failed write never leaves a half-written file behind.
pub(crate) fn save_list(path: &Path, tasks: &[Task]) -> Result<()> {
    let json = serde_json::to_string_pretty(tasks).context("failed to serialize tasks")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
