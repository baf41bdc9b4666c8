use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{Task, load_list, save_list};

/// Append-only archive of completed tasks swept out of the active list.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        HistoryStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Vec<Task> {
        load_list(&self.path)
    }

    /// Concatenate `tasks` onto the archive, preserving their order.
    pub fn append_all(&self, tasks: &[Task]) -> Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }
        let mut history = self.list();
        history.extend_from_slice(tasks);
        save_list(&self.path, &history)?;
        tracing::debug!("archived {} task(s) to {}", tasks.len(), self.path.display());
        Ok(())
    }

    /// Empty the archive, returning how many entries it held.
    pub fn clear(&self) -> Result<usize> {
        let count = self.list().len();
        if count > 0 {
            save_list(&self.path, &[])?;
            tracing::debug!("cleared {count} archived task(s)");
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_all_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let history = HistoryStore::new(dir.path().join("history.json"));

        history.append_all(&[Task::new(1, "a")]).unwrap();
        history
            .append_all(&[Task::new(2, "b"), Task::new(3, "c")])
            .unwrap();

        let titles: Vec<String> = history.list().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[test]
    fn append_nothing_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let history = HistoryStore::new(dir.path().join("history.json"));
        history.append_all(&[]).unwrap();
        assert!(!history.path().exists());
    }

    #[test]
    fn clear_returns_prior_size() {
        let dir = tempfile::tempdir().unwrap();
        let history = HistoryStore::new(dir.path().join("history.json"));
        history
            .append_all(&[Task::new(1, "a"), Task::new(2, "b")])
            .unwrap();

        assert_eq!(history.clear().unwrap(), 2);
        assert!(history.list().is_empty());
        assert_eq!(history.clear().unwrap(), 0);
    }
}
