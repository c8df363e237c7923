//! Task entity and status vocabulary.
//!
//! A task lives in exactly one board slot at a time: the uncategorized inbox,
//! one of the four Eisenhower quadrants, or the completed pile. The backend
//! owns the status vocabulary, so statuses outside the known set are carried
//! through unchanged rather than rejected on decode; local mutations are
//! restricted to the known set.

pub mod wire;

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum accepted title length, in characters. Matches the backend's
/// sanitizer so oversized input is rejected before it leaves the client.
pub const MAX_TITLE_LEN: usize = 100;

/// Board slot a task currently occupies.
///
/// `Completed` is terminal. `Other` carries a server-supplied status outside
/// the known set; it never originates locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Uncategorized,
    UrgentImportant,
    NotUrgentImportant,
    UrgentNotImportant,
    NotUrgentNotImportant,
    Completed,
    Other(String),
}

impl TaskStatus {
    /// The six statuses the client may write.
    pub const KNOWN: [TaskStatus; 6] = [
        TaskStatus::Uncategorized,
        TaskStatus::UrgentImportant,
        TaskStatus::NotUrgentImportant,
        TaskStatus::UrgentNotImportant,
        TaskStatus::NotUrgentNotImportant,
        TaskStatus::Completed,
    ];

    /// The four Eisenhower quadrants, in board order.
    pub const QUADRANTS: [TaskStatus; 4] = [
        TaskStatus::UrgentImportant,
        TaskStatus::NotUrgentImportant,
        TaskStatus::UrgentNotImportant,
        TaskStatus::NotUrgentNotImportant,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Uncategorized => "uncategorized",
            TaskStatus::UrgentImportant => "urgent_important",
            TaskStatus::NotUrgentImportant => "not_urgent_important",
            TaskStatus::UrgentNotImportant => "urgent_not_important",
            TaskStatus::NotUrgentNotImportant => "not_urgent_not_important",
            TaskStatus::Completed => "completed",
            TaskStatus::Other(raw) => raw,
        }
    }

    /// Parse a wire string. Unknown values are preserved as [`TaskStatus::Other`].
    pub fn parse(raw: &str) -> TaskStatus {
        match raw {
            "uncategorized" => TaskStatus::Uncategorized,
            "urgent_important" => TaskStatus::UrgentImportant,
            "not_urgent_important" => TaskStatus::NotUrgentImportant,
            "urgent_not_important" => TaskStatus::UrgentNotImportant,
            "not_urgent_not_important" => TaskStatus::NotUrgentNotImportant,
            "completed" => TaskStatus::Completed,
            other => TaskStatus::Other(other.to_string()),
        }
    }

    /// Whether this is one of the six statuses the client may write.
    pub fn is_known(&self) -> bool {
        !matches!(self, TaskStatus::Other(_))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Human-readable board label.
    pub fn label(&self) -> &str {
        match self {
            TaskStatus::Uncategorized => "Uncategorized",
            TaskStatus::UrgentImportant => "Urgent & Important",
            TaskStatus::NotUrgentImportant => "Important, Not Urgent",
            TaskStatus::UrgentNotImportant => "Urgent, Not Important",
            TaskStatus::NotUrgentNotImportant => "Neither Urgent Nor Important",
            TaskStatus::Completed => "Completed",
            TaskStatus::Other(raw) => raw,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Uncategorized
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TaskStatus::parse(&raw))
    }
}

/// One task on the board.
///
/// `parent_task_id`/`parent_task_title` back-reference the task an AI
/// breakdown produced this one from; it is a lookup relation, not ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub parent_task_id: Option<String>,
    pub parent_task_title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Construct a new local task with a client-generated id and fresh
    /// timestamps. The id is replaced by the server-assigned one once the
    /// task is persisted.
    pub fn new(title: &str, status: TaskStatus) -> Result<Self, ValidationError> {
        let title = validate_title(title)?;
        let now = Utc::now();
        Ok(Self {
            id: generate_id(),
            title: title.to_string(),
            status,
            parent_task_id: None,
            parent_task_title: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        })
    }

    /// Whether this task was produced by breaking down `parent_id`.
    pub fn is_subtask_of(&self, parent_id: &str) -> bool {
        self.parent_task_id.as_deref() == Some(parent_id)
    }
}

/// Client-side task id: `task-<millis>-<8 hex>`.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();
    format!("task-{millis}-{}", &random[..8])
}

/// Trim and validate a title, returning the trimmed slice.
pub fn validate_title(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong {
            max: MAX_TITLE_LEN,
            len,
        });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_task_trims_title_and_generates_id() {
        let task = Task::new("  Buy milk  ", TaskStatus::Uncategorized).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert!(task.id.starts_with("task-"));
        assert_eq!(task.created_at, task.updated_at);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn new_task_rejects_blank_title() {
        assert_eq!(
            Task::new("   ", TaskStatus::Uncategorized).unwrap_err(),
            ValidationError::EmptyTitle
        );
    }

    #[test]
    fn validate_title_boundary() {
        let exact = "x".repeat(MAX_TITLE_LEN);
        assert_eq!(validate_title(&exact).unwrap(), exact.as_str());

        let over = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(matches!(
            validate_title(&over),
            Err(ValidationError::TitleTooLong { max: 100, len: 101 })
        ));
    }

    #[test]
    fn validate_title_counts_chars_not_bytes() {
        let title = "\u{6f22}".repeat(MAX_TITLE_LEN);
        assert!(validate_title(&title).is_ok());
    }

    #[test]
    fn status_parse_known_values() {
        assert_eq!(
            TaskStatus::parse("urgent_important"),
            TaskStatus::UrgentImportant
        );
        assert_eq!(TaskStatus::parse("completed"), TaskStatus::Completed);
        assert!(TaskStatus::parse("completed").is_completed());
    }

    #[test]
    fn status_preserves_unknown_values() {
        let status = TaskStatus::parse("triaged_by_robot");
        assert_eq!(status, TaskStatus::Other("triaged_by_robot".into()));
        assert!(!status.is_known());
        assert_eq!(status.as_str(), "triaged_by_robot");
    }

    #[test]
    fn status_serde_uses_wire_strings() {
        let json = serde_json::to_string(&TaskStatus::NotUrgentImportant).unwrap();
        assert_eq!(json, "\"not_urgent_important\"");

        let back: TaskStatus = serde_json::from_str("\"urgent_not_important\"").unwrap();
        assert_eq!(back, TaskStatus::UrgentNotImportant);
    }

    proptest! {
        #[test]
        fn status_roundtrips_any_string(raw in "[a-z_]{1,24}") {
            let status = TaskStatus::parse(&raw);
            prop_assert_eq!(status.as_str(), raw.as_str());
        }

        #[test]
        fn titles_within_limit_validate(title in "[a-zA-Z0-9 ]{0,98}[a-zA-Z0-9]") {
            prop_assert!(validate_title(&title).is_ok());
        }
    }
}
