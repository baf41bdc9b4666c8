//! Table view model.
//!
//! Turns a task snapshot into renderable rows. Nothing here knows about
//! the terminal: emphasis is a semantic tier that the theme later maps to
//! a concrete style.

use chrono::{DateTime, Local};

use crate::store::{Priority, Task, TaskStatus};

/// Semantic emphasis tier for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Plain,
    /// Completed titles: struck through and dimmed.
    Struck,
    Alert,
    Warning,
    Success,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub checkbox: &'static str,
    pub checkbox_emphasis: Emphasis,
    pub title: String,
    pub title_emphasis: Emphasis,
    pub priority_label: &'static str,
    pub priority_emphasis: Emphasis,
    pub status_label: &'static str,
    pub status_emphasis: Emphasis,
    pub age: String,
    pub selected: bool,
}

pub fn render(tasks: &[Task], selected: Option<usize>, now: DateTime<Local>) -> Vec<RenderedRow> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| render_row(task, selected == Some(i), now))
        .collect()
}

fn render_row(task: &Task, selected: bool, now: DateTime<Local>) -> RenderedRow {
    let completed = task.is_completed();
    RenderedRow {
        checkbox: if completed { "[x]" } else { "[ ]" },
        checkbox_emphasis: if completed {
            Emphasis::Success
        } else {
            Emphasis::Muted
        },
        title: task.title.clone(),
        title_emphasis: if completed {
            Emphasis::Struck
        } else {
            Emphasis::Plain
        },
        priority_label: task.priority.label(),
        priority_emphasis: priority_emphasis(task.priority),
        status_label: task.status.label(),
        status_emphasis: status_emphasis(task.status),
        age: age_label(task.created_at, now),
        selected,
    }
}

pub fn priority_emphasis(priority: Priority) -> Emphasis {
    match priority {
        Priority::High => Emphasis::Alert,
        Priority::Medium => Emphasis::Warning,
        Priority::Low | Priority::None => Emphasis::Muted,
    }
}

pub fn status_emphasis(status: TaskStatus) -> Emphasis {
    match status {
        TaskStatus::Completed => Emphasis::Success,
        TaskStatus::Pending => Emphasis::Warning,
    }
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Compact relative age: `now`, `{m}m`, `{h}h`, `{d}d`, `{w}w`.
pub fn age_label(created: DateTime<Local>, now: DateTime<Local>) -> String {
    let secs = now.signed_duration_since(created).num_seconds();
    if secs < MINUTE {
        "now".to_string()
    } else if secs < HOUR {
        format!("{}m", secs / MINUTE)
    } else if secs < DAY {
        format!("{}h", secs / HOUR)
    } else if secs < WEEK {
        format!("{}d", secs / DAY)
    } else {
        format!("{}w", secs / WEEK)
    }
}
