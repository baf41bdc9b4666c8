use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{HistoryStore, Task, load_list, save_list};

/// The active task list, backed by one JSON file.
///
/// Every operation is a whole-file load → mutate → save cycle. "Not found"
/// is reported through the return value (`false` / `None` / `0`); only a
/// failed write is an error.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
    history: HistoryStore,
}

impl TaskStore {
    pub fn new(path: impl AsRef<Path>, history: HistoryStore) -> Self {
        TaskStore {
            path: path.as_ref().to_path_buf(),
            history,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Full snapshot in storage order.
    pub fn list(&self) -> Vec<Task> {
        let tasks = load_list(&self.path);
        let mut seen = HashSet::with_capacity(tasks.len());
        if let Some(dup) = tasks.iter().find(|t| !seen.insert(t.id)) {
            tracing::warn!(
                "duplicate task id {} in {}, starting empty",
                dup.id,
                self.path.display()
            );
            return Vec::new();
        }
        tasks
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        save_list(&self.path, tasks)
    }

    /// Append a new pending task. A blank title is rejected with `None`
    /// and nothing is written.
    pub fn create(&self, title: &str) -> Result<Option<Task>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }
        let mut tasks = self.list();
        let id = next_id(&tasks).context("task ids exhausted")?;
        let task = Task::new(id, title);
        tasks.push(task.clone());
        self.save(&tasks)?;
        tracing::debug!("created task #{}: {}", task.id, task.title);
        Ok(Some(task))
    }

    pub fn delete(&self, id: u64) -> Result<bool> {
        let mut tasks = self.list();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.save(&tasks)?;
        tracing::debug!("deleted task #{id}");
        Ok(true)
    }

    pub fn toggle(&self, id: u64) -> Result<bool> {
        self.update(id, Task::toggle)
    }

    /// Replace a task's title. A blank title is rejected with `false`.
    pub fn rename(&self, id: u64, title: &str) -> Result<bool> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(false);
        }
        self.update(id, |t| t.title = title.to_string())
    }

    pub fn cycle_priority(&self, id: u64) -> Result<bool> {
        self.update(id, |t| t.priority = t.priority.next())
    }

    pub fn move_up(&self, id: u64) -> Result<bool> {
        let mut tasks = self.list();
        match position(&tasks, id) {
            Some(idx) if idx > 0 => {
                tasks.swap(idx, idx - 1);
                self.save(&tasks)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn move_down(&self, id: u64) -> Result<bool> {
        let mut tasks = self.list();
        match position(&tasks, id) {
            Some(idx) if idx + 1 < tasks.len() => {
                tasks.swap(idx, idx + 1);
                self.save(&tasks)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Sweep completed tasks into the history, keeping the rest in order.
    ///
    /// History is written first; if the active list then fails to save, the
    /// history is rolled back so both files stay as they were.
    pub fn clear_completed(&self) -> Result<usize> {
        let (completed, remaining): (Vec<Task>, Vec<Task>) =
            self.list().into_iter().partition(Task::is_completed);
        if completed.is_empty() {
            return Ok(0);
        }
        let archived = self.history.list();
        self.history.append_all(&completed)?;
        if let Err(e) = self.save(&remaining) {
            if let Err(restore) = save_list(self.history.path(), &archived) {
                tracing::error!(
                    "could not roll back {}: {restore:#}",
                    self.history.path().display()
                );
            }
            return Err(e);
        }
        tracing::debug!("archived {} completed task(s)", completed.len());
        Ok(completed.len())
    }

    fn update(&self, id: u64, f: impl FnOnce(&mut Task)) -> Result<bool> {
        let mut tasks = self.list();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        f(task);
        self.save(&tasks)?;
        Ok(true)
    }
}

/// `max(existing) + 1`, or 1 for an empty list. `None` once ids are exhausted.
pub fn next_id(tasks: &[Task]) -> Option<u64> {
    tasks.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1)
}

fn position(tasks: &[Task], id: u64) -> Option<usize> {
    tasks.iter().position(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Priority, StorePaths, TaskStatus};

    fn open(dir: &tempfile::TempDir) -> TaskStore {
        StorePaths::in_dir(dir.path()).open()
    }

    fn ids(store: &TaskStore) -> Vec<u64> {
        store.list().iter().map(|t| t.id).collect()
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_create_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        let task = store.create("Buy milk").unwrap().unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.status, TaskStatus::Pending);

        let tasks = store.list();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0], task);
    }

    #[test]
    fn test_create_trims_title() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        let task = store.create("  Walk dog \n").unwrap().unwrap();
        assert_eq!(task.title, "Walk dog");
    }

    #[test]
    fn test_create_blank_title_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        assert!(store.create("   ").unwrap().is_none());
        assert!(store.list().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_ids_follow_max_plus_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        for title in ["a", "b", "c"] {
            store.create(title).unwrap();
        }
        assert_eq!(ids(&store), [1, 2, 3]);

        assert!(store.delete(2).unwrap());
        assert_eq!(store.create("d").unwrap().unwrap().id, 4);

        assert!(store.delete(4).unwrap());
        assert!(store.delete(3).unwrap());
        assert_eq!(store.create("e").unwrap().unwrap().id, 2);

        assert!(store.delete(1).unwrap());
        assert!(store.delete(2).unwrap());
        assert_eq!(store.create("f").unwrap().unwrap().id, 1);
    }

    #[test]
    fn test_ids_stay_unique_under_mixed_operations() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        for round in 0..5u64 {
            store.create("x").unwrap();
            store.create("y").unwrap();
            store.delete(round + 1).unwrap();
        }
        let ids = ids(&store);
        let unique: HashSet<u64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(next_id(&store.list()), Some(ids.iter().max().unwrap() + 1));
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.create("a").unwrap();
        assert!(!store.delete(42).unwrap());
        assert_eq!(ids(&store), [1]);
    }

    #[test]
    fn test_toggle_twice_restores_status() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.create("a").unwrap();

        assert!(store.toggle(1).unwrap());
        let done = &store.list()[0];
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed_at.is_some());

        assert!(store.toggle(1).unwrap());
        let pending = &store.list()[0];
        assert_eq!(pending.status, TaskStatus::Pending);
        assert!(pending.completed_at.is_none());

        assert!(!store.toggle(9).unwrap());
    }

    #[test]
    fn test_rename() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.create("old").unwrap();
        assert!(store.rename(1, "new").unwrap());
        assert_eq!(store.list()[0].title, "new");
        assert!(!store.rename(1, "  ").unwrap());
        assert_eq!(store.list()[0].title, "new");
        assert!(!store.rename(2, "other").unwrap());
    }

    #[test]
    fn test_cycle_priority_four_times_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.create("a").unwrap();
        assert!(store.cycle_priority(1).unwrap());
        assert_eq!(store.list()[0].priority, Priority::Low);
        for _ in 0..4 {
            store.cycle_priority(1).unwrap();
        }
        assert_eq!(store.list()[0].priority, Priority::Low);
        assert!(!store.cycle_priority(7).unwrap());
    }

    #[test]
    fn test_move_boundaries_are_noops() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        for title in ["a", "b", "c"] {
            store.create(title).unwrap();
        }
        assert!(!store.move_up(1).unwrap());
        assert!(!store.move_down(3).unwrap());
        assert!(!store.move_up(99).unwrap());
        assert_eq!(ids(&store), [1, 2, 3]);
    }

    #[test]
    fn test_opposite_moves_restore_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        for title in ["a", "b", "c"] {
            store.create(title).unwrap();
        }
        assert!(store.move_down(2).unwrap());
        assert_eq!(ids(&store), [1, 3, 2]);
        assert!(store.move_up(2).unwrap());
        assert_eq!(ids(&store), [1, 2, 3]);

        assert!(store.move_up(2).unwrap());
        assert_eq!(ids(&store), [2, 1, 3]);
        assert!(store.move_down(2).unwrap());
        assert_eq!(ids(&store), [1, 2, 3]);
    }

    #[test]
    fn test_clear_completed_partitions_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        for title in ["a", "b", "c", "d", "e"] {
            store.create(title).unwrap();
        }
        store.toggle(2).unwrap();
        store.toggle(4).unwrap();
        store.toggle(5).unwrap();

        assert_eq!(store.clear_completed().unwrap(), 3);
        assert_eq!(titles(&store.list()), ["a", "c"]);
        let history = store.history().list();
        assert_eq!(titles(&history), ["b", "d", "e"]);
        assert!(history.iter().all(Task::is_completed));

        assert_eq!(store.clear_completed().unwrap(), 0);
        assert_eq!(titles(&store.list()), ["a", "c"]);
        assert_eq!(store.history().list().len(), 3);
    }

    #[test]
    fn test_clear_completed_keeps_history_with_reused_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        for _ in 0..2 {
            store.create("again").unwrap();
            store.toggle(1).unwrap();
            assert_eq!(store.clear_completed().unwrap(), 1);
        }
        assert_eq!(store.history().list().len(), 2);
    }

    #[test]
    fn test_duplicate_ids_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        std::fs::write(
            store.path(),
            r#"[{"id": 1, "title": "a"}, {"id": 1, "title": "b"}]"#,
        )
        .unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_failed_save_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.create("keep me").unwrap();

        // A directory squatting on the temp path makes the write fail.
        std::fs::create_dir(store.path().with_extension("json.tmp")).unwrap();
        assert!(store.create("lost").is_err());
        assert_eq!(titles(&store.list()), ["keep me"]);
    }

    #[test]
    fn test_failed_clear_does_not_archive() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.create("done").unwrap();
        store.toggle(1).unwrap();

        let blocker = store.path().with_extension("json.tmp");
        std::fs::create_dir(&blocker).unwrap();
        assert!(store.clear_completed().is_err());
        assert_eq!(titles(&store.list()), ["done"]);
        assert!(store.history().list().is_empty());

        std::fs::remove_dir(&blocker).unwrap();
        assert_eq!(store.clear_completed().unwrap(), 1);
        assert!(store.list().is_empty());
        assert_eq!(store.history().list().len(), 1);
    }

    #[test]
    fn test_next_id_stops_at_ceiling() {
        assert_eq!(next_id(&[]), Some(1));
        assert_eq!(next_id(&[Task::new(7, "a"), Task::new(3, "b")]), Some(8));
        assert_eq!(next_id(&[Task::new(u64::MAX, "last")]), None);
    }

    #[test]
    fn test_create_with_max_id_on_disk_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        std::fs::write(
            store.path(),
            r#"[{"id": 18446744073709551615, "title": "huge"}]"#,
        )
        .unwrap();
        // The out-of-range entry invalidates the file, so allocation restarts.
        assert!(store.list().is_empty());
        assert_eq!(store.create("fresh").unwrap().unwrap().id, 1);
    }

    #[test]
    fn test_end_to_end_archive() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);

        let task = store.create("Buy milk").unwrap().unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.status, TaskStatus::Pending);

        assert!(store.toggle(1).unwrap());
        let toggled = &store.list()[0];
        assert_eq!(toggled.status, TaskStatus::Completed);
        assert!(toggled.completed_at.is_some());

        assert_eq!(store.clear_completed().unwrap(), 1);
        assert!(store.list().is_empty());
        let history = store.history().list();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title, "Buy milk");
    }
}
