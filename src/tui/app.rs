use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::DefaultTerminal;

use crate::store::{Task, TaskStore};

use super::controller::{Controller, Effect};
use super::event::{self, AppEvent};
use super::keymap::KeyMap;
use super::theme::Theme;
use super::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastStyle {
    Info,
    Error,
}

/// One-line message in the footer; cleared by the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub style: ToastStyle,
}

pub struct App {
    pub store: TaskStore,
    pub theme: Theme,
    pub controller: Controller,
    pub should_quit: bool,
    pub toast: Option<Toast>,

    // Snapshot of the store, reloaded after every mutation
    pub tasks: Vec<Task>,
}

impl App {
    pub fn new(store: TaskStore, theme: Theme) -> Self {
        let tasks = store.list();
        let controller = Controller::new(KeyMap::default(), &tasks);
        App {
            store,
            theme,
            controller,
            should_quit: false,
            toast: None,
            tasks,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            match event::next()? {
                AppEvent::Key(key) => self.handle_key(key),
                AppEvent::Resize => {}
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Feed one key through the controller and carry out whatever it asks for.
    ///
    /// A failed save is reported in the footer; the snapshot is reloaded from
    /// disk so the view never shows state that was not persisted.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.toast = None;

        let Some(effect) = self.controller.handle(key, &self.tasks) else {
            return;
        };
        if effect == Effect::Quit {
            self.should_quit = true;
            return;
        }

        let focus = match self.apply(&effect) {
            Ok(focus) => focus,
            Err(e) => {
                tracing::error!("{effect:?} failed: {e:#}");
                self.toast = Some(Toast {
                    message: format!("Save failed: {e:#}"),
                    style: ToastStyle::Error,
                });
                None
            }
        };

        self.refresh();
        if let Some(id) = focus {
            self.controller.select_task(id, &self.tasks);
        }
    }

    /// Run one effect against the store. Returns the id the selection should
    /// follow afterwards, if any.
    fn apply(&mut self, effect: &Effect) -> Result<Option<u64>> {
        match effect {
            Effect::Create(title) => {
                if let Some(task) = self.store.create(title)? {
                    self.info(format!("Added \"{}\"", task.title));
                    return Ok(Some(task.id));
                }
            }
            Effect::Rename { id, title } => {
                if self.store.rename(*id, title)? {
                    self.info(format!("Renamed to \"{title}\""));
                }
            }
            Effect::Delete(id) => {
                let title = self.title_of(*id);
                if self.store.delete(*id)? {
                    self.info(format!("Deleted \"{title}\""));
                }
            }
            Effect::Toggle(id) => {
                self.store.toggle(*id)?;
            }
            Effect::CyclePriority(id) => {
                self.store.cycle_priority(*id)?;
            }
            Effect::MoveUp(id) => {
                if self.store.move_up(*id)? {
                    return Ok(Some(*id));
                }
            }
            Effect::MoveDown(id) => {
                if self.store.move_down(*id)? {
                    return Ok(Some(*id));
                }
            }
            Effect::Quit => {}
        }
        Ok(None)
    }

    pub fn refresh(&mut self) {
        self.tasks = self.store.list();
        self.controller.reconcile(&self.tasks);
    }

    fn title_of(&self, id: u64) -> String {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.title.clone())
            .unwrap_or_default()
    }

    fn info(&mut self, message: String) {
        self.toast = Some(Toast {
            message,
            style: ToastStyle::Info,
        });
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_completed()).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.len() - self.pending_count()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::store::{Priority, StorePaths, TaskStatus};

    fn app_with(dir: &tempfile::TempDir, titles: &[&str]) -> App {
        let store = StorePaths::in_dir(dir.path()).open();
        for title in titles {
            store.create(title).unwrap();
        }
        App::new(store, Theme::default())
    }

    fn press(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn press_code(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn titles(app: &App) -> Vec<String> {
        app.tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn add_task_through_overlay_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&dir, &["first"]);

        press(&mut app, "aBuy milk");
        press_code(&mut app, KeyCode::Enter);

        assert_eq!(titles(&app), ["first", "Buy milk"]);
        assert_eq!(app.store.list().len(), 2);
        assert_eq!(app.controller.state().selected, Some(1));
        assert_eq!(app.toast.as_ref().unwrap().style, ToastStyle::Info);
    }

    #[test]
    fn dd_deletes_and_clamps_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&dir, &["a", "b", "c"]);

        press(&mut app, "Gdd");
        assert_eq!(titles(&app), ["a", "b"]);
        assert_eq!(app.controller.state().selected, Some(1));
        assert_eq!(app.toast.as_ref().unwrap().message, "Deleted \"c\"");
    }

    #[test]
    fn interrupted_chord_deletes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&dir, &["a", "b", "c"]);

        press(&mut app, "djd");
        assert_eq!(titles(&app), ["a", "b", "c"]);
        press(&mut app, "d");
        assert_eq!(titles(&app), ["a", "c"]);
    }

    #[test]
    fn toggle_priority_and_edit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&dir, &["draft"]);

        press(&mut app, "xpp");
        let task = &app.store.list()[0];
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.priority, Priority::Medium);

        press(&mut app, "e");
        app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        press(&mut app, "final");
        press_code(&mut app, KeyCode::Enter);
        assert_eq!(titles(&app), ["final"]);
    }

    #[test]
    fn reorder_moves_selection_with_task() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&dir, &["a", "b", "c"]);

        press(&mut app, "J");
        assert_eq!(titles(&app), ["b", "a", "c"]);
        assert_eq!(app.controller.state().selected, Some(1));

        press(&mut app, "JJ");
        assert_eq!(titles(&app), ["b", "c", "a"]);
        assert_eq!(app.controller.state().selected, Some(2));

        press(&mut app, "K");
        assert_eq!(titles(&app), ["b", "a", "c"]);
        assert_eq!(app.controller.state().selected, Some(1));
    }

    #[test]
    fn save_failure_is_reported_and_session_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&dir, &["keep"]);
        std::fs::create_dir(app.store.path().with_extension("json.tmp")).unwrap();

        press(&mut app, "x");
        let toast = app.toast.clone().unwrap();
        assert_eq!(toast.style, ToastStyle::Error);
        assert!(toast.message.starts_with("Save failed"));
        assert!(!app.should_quit);
        assert_eq!(app.tasks[0].status, TaskStatus::Pending);

        // The next key clears the message.
        press(&mut app, "j");
        assert!(app.toast.is_none());
    }

    #[test]
    fn escape_quits_only_without_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&dir, &[]);

        press(&mut app, "aq");
        assert!(!app.should_quit);
        press_code(&mut app, KeyCode::Esc);
        assert!(!app.should_quit);
        assert!(app.tasks.is_empty());
        press_code(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn counts() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&dir, &["a", "b", "c"]);
        press(&mut app, "x");
        assert_eq!(app.pending_count(), 2);
        assert_eq!(app.completed_count(), 1);
    }
}
