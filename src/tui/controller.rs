//! Key-driven state machine for the list view.
//!
//! `Controller::handle` is the single transition: it takes one key event and
//! the current task snapshot, updates selection / chord / overlay state, and
//! returns the store mutation (if any) the caller must perform. It never
//! touches the store or the terminal itself.

use crossterm::event::{KeyCode, KeyEvent};

use crate::store::Task;

use super::form;
use super::keymap::{Action, KeyMap};

/// An armed two-key sequence waiting for its second press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chord {
    /// `d` pressed once; a second `d` deletes.
    Delete,
    /// `g` pressed once; a second `g` jumps to the top.
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    Add,
    Edit(u64),
}

/// Single-line text entry shown while adding or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub mode: OverlayMode,
    pub buffer: String,
    pub cursor: usize,
}

impl Overlay {
    fn new(mode: OverlayMode, initial: &str) -> Self {
        Overlay {
            mode,
            buffer: initial.to_string(),
            cursor: initial.len(),
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self.mode {
            OverlayMode::Add => "New task: ",
            OverlayMode::Edit(_) => "Edit task: ",
        }
    }
}

/// A store mutation (or exit request) produced by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Create(String),
    Rename { id: u64, title: String },
    Toggle(u64),
    CyclePriority(u64),
    Delete(u64),
    MoveUp(u64),
    MoveDown(u64),
    Quit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    pub selected: Option<usize>,
    pub pending: Option<Chord>,
    pub overlay: Option<Overlay>,
}

pub struct Controller {
    state: ControllerState,
    keymap: KeyMap,
}

impl Controller {
    pub fn new(keymap: KeyMap, tasks: &[Task]) -> Self {
        let mut controller = Controller {
            state: ControllerState::default(),
            keymap,
        };
        controller.reconcile(tasks);
        controller
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn selected_task<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        self.state.selected.and_then(|i| tasks.get(i))
    }

    /// Process one key event against the current snapshot.
    pub fn handle(&mut self, key: KeyEvent, tasks: &[Task]) -> Option<Effect> {
        if self.state.overlay.is_some() {
            return self.handle_overlay_key(key);
        }

        // Any key disarms a pending chord; a non-matching key is then
        // evaluated on its own (so `d` followed by `k` still moves up).
        let pending = self.state.pending.take();
        let action = self.keymap.lookup(key.code, key.modifiers)?;

        match action {
            Action::Delete => {
                if pending == Some(Chord::Delete) {
                    return self.selected_id(tasks).map(Effect::Delete);
                }
                self.state.pending = Some(Chord::Delete);
                None
            }
            Action::JumpTop => {
                if pending == Some(Chord::Top) {
                    if !tasks.is_empty() {
                        self.state.selected = Some(0);
                    }
                } else {
                    self.state.pending = Some(Chord::Top);
                }
                None
            }
            Action::JumpBottom => {
                if !tasks.is_empty() {
                    self.state.selected = Some(tasks.len() - 1);
                }
                None
            }
            Action::MoveDown => {
                if !tasks.is_empty() {
                    let next = self.state.selected.map_or(0, |i| i + 1);
                    self.state.selected = Some(next.min(tasks.len() - 1));
                }
                None
            }
            Action::MoveUp => {
                if !tasks.is_empty() {
                    let prev = self.state.selected.map_or(0, |i| i.saturating_sub(1));
                    self.state.selected = Some(prev);
                }
                None
            }
            Action::Toggle => self.selected_id(tasks).map(Effect::Toggle),
            Action::CyclePriority => self.selected_id(tasks).map(Effect::CyclePriority),
            Action::ReorderDown => self.selected_id(tasks).map(Effect::MoveDown),
            Action::ReorderUp => self.selected_id(tasks).map(Effect::MoveUp),
            Action::AddTask => {
                self.state.overlay = Some(Overlay::new(OverlayMode::Add, ""));
                None
            }
            Action::EditTask => {
                if let Some(task) = self.selected_task(tasks) {
                    self.state.overlay = Some(Overlay::new(OverlayMode::Edit(task.id), &task.title));
                }
                None
            }
            Action::Quit | Action::Cancel => Some(Effect::Quit),
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> Option<Effect> {
        match key.code {
            KeyCode::Enter => {
                let overlay = self.state.overlay.take()?;
                let title = overlay.buffer.trim();
                if title.is_empty() {
                    return None;
                }
                Some(match overlay.mode {
                    OverlayMode::Add => Effect::Create(title.to_string()),
                    OverlayMode::Edit(id) => Effect::Rename {
                        id,
                        title: title.to_string(),
                    },
                })
            }
            KeyCode::Esc => {
                self.state.overlay = None;
                None
            }
            _ => {
                if let Some(overlay) = self.state.overlay.as_mut() {
                    form::apply_text_edit(
                        &mut overlay.buffer,
                        &mut overlay.cursor,
                        key.code,
                        key.modifiers,
                    );
                }
                None
            }
        }
    }

    /// Keep the selection valid after the list changed underneath it.
    pub fn reconcile(&mut self, tasks: &[Task]) {
        self.state.selected = match (self.state.selected, tasks.len()) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.min(len - 1)),
        };
    }

    /// Move the selection onto the task with `id`, if it is present.
    pub fn select_task(&mut self, id: u64, tasks: &[Task]) {
        if let Some(idx) = tasks.iter().position(|t| t.id == id) {
            self.state.selected = Some(idx);
        }
    }

    fn selected_id(&self, tasks: &[Task]) -> Option<u64> {
        self.selected_task(tasks).map(|t| t.id)
    }
}
