//! Application state store.
//!
//! One [`Store`] per board, created empty at startup and populated by the
//! initial full reload. Task fields are written only by the sync engine; the
//! connection field is also written by the connection monitor. The store is
//! shared as `Arc<Mutex<_>>` and guards are released before any await point.

use crate::stats::WeeklyStats;
use crate::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Backend connectivity as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        ConnectionStatus::Disconnected
    }
}

/// Rotating CSRF session token, shared between the store and the gateway.
///
/// The protocol is attach-if-present, rotate-on-receipt: any server response
/// carrying a fresh token overwrites the stored one wholesale.
#[derive(Debug, Clone, Default)]
pub struct SessionTokens {
    inner: Arc<Mutex<Option<String>>>,
}

impl SessionTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token to attach to the next mutating request, if any.
    pub fn current(&self) -> Option<String> {
        self.inner.lock().unwrap().clone()
    }

    /// Replace the stored token with a fresh one from a server response.
    pub fn rotate(&self, token: &str) {
        *self.inner.lock().unwrap() = Some(token.to_string());
    }
}

/// Shared handle to the application state.
pub type SharedStore = Arc<Mutex<Store>>;

/// In-memory application state. Never persisted across sessions.
#[derive(Debug, Default)]
pub struct Store {
    /// Ordered task collection, unique by id.
    pub tasks: Vec<Task>,
    /// At most one selected task; always references an existing task.
    pub selected_task_id: Option<String>,
    pub connection: ConnectionStatus,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub weekly_stats: Option<WeeklyStats>,
    /// CSRF session token cell; the gateway holds a clone of this handle.
    pub session: SessionTokens,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub fn task_index(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task_id
            .as_deref()
            .and_then(|id| self.task(id))
    }

    /// Subtasks produced by breaking down `parent_id`, in board order.
    pub fn subtasks_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a Task> {
        self.tasks
            .iter()
            .filter(move |task| task.is_subtask_of(parent_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    #[test]
    fn session_tokens_rotate_monotonically() {
        let tokens = SessionTokens::new();
        assert_eq!(tokens.current(), None);

        tokens.rotate("tok-1");
        assert_eq!(tokens.current().as_deref(), Some("tok-1"));

        tokens.rotate("tok-2");
        assert_eq!(tokens.current().as_deref(), Some("tok-2"));
    }

    #[test]
    fn session_token_handle_is_shared() {
        let tokens = SessionTokens::new();
        let clone = tokens.clone();
        clone.rotate("tok-9");
        assert_eq!(tokens.current().as_deref(), Some("tok-9"));
    }

    #[test]
    fn store_lookups_by_id() {
        let mut store = Store::new();
        store
            .tasks
            .push(Task::new("alpha", TaskStatus::Uncategorized).unwrap());
        store
            .tasks
            .push(Task::new("beta", TaskStatus::UrgentImportant).unwrap());

        let beta_id = store.tasks[1].id.clone();
        assert_eq!(store.task_index(&beta_id), Some(1));
        assert_eq!(store.task(&beta_id).unwrap().title, "beta");
        assert!(store.task("missing").is_none());
    }

    #[test]
    fn subtasks_filter_by_parent() {
        let mut store = Store::new();
        let mut child = Task::new("child", TaskStatus::Uncategorized).unwrap();
        child.parent_task_id = Some("p-1".into());
        store.tasks.push(child);
        store
            .tasks
            .push(Task::new("stranger", TaskStatus::Uncategorized).unwrap());

        assert_eq!(store.subtasks_of("p-1").count(), 1);
        assert_eq!(store.subtasks_of("p-2").count(), 0);
    }
}
