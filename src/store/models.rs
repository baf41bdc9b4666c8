use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    /// Capitalised label used by both the table view and `todo list`.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    /// Next step in the fixed cycle `none → low → medium → high → none`.
    pub fn next(self) -> Self {
        match self {
            Priority::None => Priority::Low,
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::None => "-",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default = "Local::now", deserialize_with = "lenient_time")]
    pub created_at: DateTime<Local>,
    #[serde(default, deserialize_with = "lenient_time_opt")]
    pub completed_at: Option<DateTime<Local>>,
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Task {
            id,
            title: title.into(),
            status: TaskStatus::Pending,
            created_at: Local::now(),
            completed_at: None,
            priority: Priority::None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Flip between pending and completed, stamping or clearing `completed_at`.
    pub fn toggle(&mut self) {
        match self.status {
            TaskStatus::Pending => {
                self.status = TaskStatus::Completed;
                self.completed_at = Some(Local::now());
            }
            TaskStatus::Completed => {
                self.status = TaskStatus::Pending;
                self.completed_at = None;
            }
        }
    }

    /// Positive id below the allocation ceiling and a non-blank title.
    pub(crate) fn is_well_formed(&self) -> bool {
        self.id != 0 && self.id != u64::MAX && !self.title.trim().is_empty()
    }

    /// Restore `completed_at ⇔ completed` for records written by older versions.
    pub(crate) fn normalize(&mut self) {
        match self.status {
            TaskStatus::Pending => self.completed_at = None,
            TaskStatus::Completed => {
                if self.completed_at.is_none() {
                    self.completed_at = Some(self.created_at);
                }
            }
        }
    }
}

// ── Timestamp parsing ────────────────────────────────────────────────

/// Parse either an RFC 3339 timestamp or a naive ISO-8601 one (taken as local time).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local.from_local_datetime(&naive).earliest()
}

fn lenient_time<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn lenient_time_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Local>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
    }
}
