use crossterm::event::{KeyCode, KeyModifiers};

// ── Actions ──────────────────────────────────────────────────────────

/// Every discrete action the list view can perform in response to a key press.
///
/// Actions are context-free identifiers; the controller decides what they
/// mean given the current selection and chord state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Global
    Quit,
    /// Esc: closes the overlay when one is open, otherwise quits.
    Cancel,

    // Navigation
    MoveDown,
    MoveUp,
    JumpBottom,
    /// First half of `gg`.
    JumpTop,

    // Task actions
    Toggle,
    CyclePriority,
    AddTask,
    EditTask,
    /// First half of `dd`.
    Delete,
    ReorderDown,
    ReorderUp,
}

// ── Help categories ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpCategory {
    Navigation,
    Tasks,
}

// ── Keybinding ───────────────────────────────────────────────────────

/// A single key → action mapping with metadata for the help bar.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: Action,
    /// Key label shown in the help bar (e.g. `"j/k"`). Empty for aliases.
    pub label: &'static str,
    pub description: &'static str,
    pub category: HelpCategory,
}

// ── KeyMap ────────────────────────────────────────────────────────────

/// Declarative registry of every list-view key binding.
pub struct KeyMap {
    pub bindings: Vec<KeyBinding>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            bindings: default_bindings(),
        }
    }
}

impl KeyMap {
    /// Look up the action for a key event. Shift is ignored for character
    /// keys since the character itself already carries the case.
    pub fn lookup(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        let modifiers = if matches!(code, KeyCode::Char(_)) {
            modifiers.difference(KeyModifiers::SHIFT)
        } else {
            modifiers
        };
        self.bindings
            .iter()
            .find(|kb| kb.code == code && kb.modifiers == modifiers)
            .map(|kb| kb.action)
    }

    /// `(label, description)` pairs for the help bar, navigation first.
    pub fn hints(&self) -> Vec<(&'static str, &'static str)> {
        let mut out = Vec::new();
        for cat in [HelpCategory::Navigation, HelpCategory::Tasks] {
            for kb in &self.bindings {
                if kb.category == cat
                    && !kb.label.is_empty()
                    && !out.iter().any(|(l, _)| *l == kb.label)
                {
                    out.push((kb.label, kb.description));
                }
            }
        }
        out
    }
}

fn bind(
    code: KeyCode,
    action: Action,
    label: &'static str,
    description: &'static str,
    category: HelpCategory,
) -> KeyBinding {
    KeyBinding {
        code,
        modifiers: KeyModifiers::NONE,
        action,
        label,
        description,
        category,
    }
}

#[allow(clippy::enum_glob_use)]
fn default_bindings() -> Vec<KeyBinding> {
    use Action::*;
    use HelpCategory::*;

    vec![
        // ── Navigation ───────────────────────────────────────────
        bind(KeyCode::Char('j'), MoveDown, "j/k", "navigate", Navigation),
        bind(KeyCode::Down, MoveDown, "", "", Navigation),
        bind(KeyCode::Char('k'), MoveUp, "", "", Navigation),
        bind(KeyCode::Up, MoveUp, "", "", Navigation),
        bind(KeyCode::Char('g'), JumpTop, "gg/G", "top/bottom", Navigation),
        bind(KeyCode::Char('G'), JumpBottom, "", "", Navigation),
        bind(KeyCode::Char('q'), Quit, "q", "quit", Navigation),
        bind(KeyCode::Esc, Cancel, "", "", Navigation),
        KeyBinding {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            action: Quit,
            label: "",
            description: "",
            category: Navigation,
        },
        // ── Tasks ────────────────────────────────────────────────
        bind(KeyCode::Char('J'), ReorderDown, "J/K", "move", Tasks),
        bind(KeyCode::Char('K'), ReorderUp, "", "", Tasks),
        bind(KeyCode::Char('x'), Toggle, "x", "toggle", Tasks),
        bind(KeyCode::Char(' '), Toggle, "", "", Tasks),
        bind(KeyCode::Char('p'), CyclePriority, "p", "priority", Tasks),
        bind(KeyCode::Char('a'), AddTask, "a", "add", Tasks),
        bind(KeyCode::Char('e'), EditTask, "e", "edit", Tasks),
        bind(KeyCode::Char('d'), Delete, "dd", "delete", Tasks),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────
