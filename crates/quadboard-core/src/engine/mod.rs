//! Task synchronization engine.
//!
//! The only component that mutates task state. Every mutating operation
//! follows the same shape: precondition check (no network on local
//! rejection), snapshot, optimistic apply + repaint, gateway call, reconcile
//! on success, rollback on failure. Failures surface as a tracing log plus a
//! short user-facing notification; no error escapes an operation boundary.
//!
//! Full reload replaces the task list wholesale -- the server is
//! authoritative and the client holds no durable state to merge against.


use crate::gateway::{Gateway, NewTaskRequest};
use crate::render::{FeedbackKind, Renderer};
use crate::state::{ConnectionStatus, SharedStore};
use crate::task::{validate_title, Task, TaskStatus};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

const MSG_NOT_CONFIGURED: &str = "API base URL is not configured";
const MSG_CONFIGURE_HINT: &str = "set api.base_url in config.toml";
const MSG_SYNCING: &str = "Syncing...";
const MSG_CONNECTED: &str = "Connected to backend";
const MSG_SYNC_FAILED: &str = "Sync failed, please try again";
const MSG_RELOAD_FAILED: &str = "Sync failed, check the backend service";
const MSG_REVERTED: &str = "Sync failed, change reverted";
const MSG_CREATED: &str = "Task created";
const MSG_COMPLETED: &str = "Task completed";
const MSG_DELETED: &str = "Task deleted";
const MSG_STATS_FAILED: &str = "Could not load weekly stats";
const MSG_BREAKDOWN_RUNNING: &str = "Breaking the task down...";
const MSG_BREAKDOWN_DONE: &str = "Task breakdown complete";
const MSG_BREAKDOWN_FAILED: &str = "Breakdown is temporarily unavailable, try again later";

/// Bounded-retry poll for subtasks after a breakdown request. The backend
/// may finish decomposition after the HTTP response, so a single immediate
/// reload can miss the subtasks.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_millis(2000),
        }
    }
}

/// Orchestrates create/update/complete/delete/reload against the gateway,
/// applying optimistic updates to the shared store and rolling back on
/// failure. `gateway` is `None` when the backend is unconfigured; every
/// mutating operation short-circuits locally in that mode.
pub struct SyncEngine<G> {
    gateway: Option<G>,
    store: SharedStore,
    renderer: Arc<dyn Renderer>,
    breakdown_poll: PollSettings,
}

impl<G: Gateway> SyncEngine<G> {
    pub fn new(gateway: Option<G>, store: SharedStore, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            gateway,
            store,
            renderer,
            breakdown_poll: PollSettings::default(),
        }
    }

    pub fn with_breakdown_poll(mut self, poll: PollSettings) -> Self {
        self.breakdown_poll = poll;
        self
    }

    /// Whether a backend endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Initial load: full reload with the loader indicator, then a first
    /// stats fetch when the backend is configured.
    pub async fn initialize(&self) {
        self.reload_tasks(true).await;
        if self.is_configured() {
            self.refresh_stats().await;
        }
    }

    /// Fetch the complete task collection and replace local state wholesale.
    /// Clears the selection when the selected task is absent from the new
    /// set. Returns whether the reload succeeded.
    pub async fn reload_tasks(&self, show_loader: bool) -> bool {
        let Some(gateway) = &self.gateway else {
            {
                let mut store = self.store.lock().unwrap();
                store.connection = ConnectionStatus::Disconnected;
                store.tasks.clear();
                store.selected_task_id = None;
            }
            self.renderer
                .connection_changed(ConnectionStatus::Disconnected, MSG_CONFIGURE_HINT);
            self.repaint();
            return false;
        };

        if show_loader {
            self.set_connection(ConnectionStatus::Connecting, MSG_SYNCING);
        }

        match gateway.load_tasks().await {
            Ok(remote) => {
                let now = Utc::now();
                {
                    let mut store = self.store.lock().unwrap();
                    let selection_survives = store
                        .selected_task_id
                        .as_deref()
                        .is_some_and(|id| remote.iter().any(|task| task.id == id));
                    if !selection_survives {
                        store.selected_task_id = None;
                    }
                    store.tasks = remote;
                    store.connection = ConnectionStatus::Connected;
                    store.last_sync_at = Some(now);
                }
                self.repaint();
                self.renderer
                    .connection_changed(ConnectionStatus::Connected, MSG_CONNECTED);
                self.renderer.last_sync_changed(now);
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "task reload failed");
                self.set_connection(ConnectionStatus::Disconnected, MSG_RELOAD_FAILED);
                false
            }
        }
    }

    /// Create a task from a raw title. No optimistic insert: the result set
    /// cannot be predicted locally, so the full reload afterwards is the
    /// reconciliation baseline.
    pub async fn create_task(&self, title: &str) {
        let Some(gateway) = &self.gateway else {
            self.feedback(FeedbackKind::Error, MSG_NOT_CONFIGURED);
            return;
        };
        let trimmed = match validate_title(title) {
            Ok(trimmed) => trimmed,
            Err(err) => {
                self.feedback(FeedbackKind::Error, &err.to_string());
                return;
            }
        };

        self.feedback(FeedbackKind::Info, MSG_SYNCING);
        if let Err(err) = gateway.create_task(NewTaskRequest::titled(trimmed)).await {
            tracing::error!(error = %err, "task creation failed");
            self.feedback(FeedbackKind::Error, MSG_SYNC_FAILED);
            return;
        }
        if !self.reload_tasks(false).await {
            self.feedback(FeedbackKind::Error, MSG_SYNC_FAILED);
            return;
        }
        self.feedback(FeedbackKind::Success, MSG_CREATED);
        self.refresh_stats().await;
    }

    /// Move a task to another status. Silently a no-op when the task is
    /// missing or already carries the target status; a target outside the
    /// known set is rejected locally.
    pub async fn update_task_status(&self, task_id: &str, next: TaskStatus) {
        enum Pre {
            Skip,
            Invalid(String),
            Apply(Task),
        }

        let Some(gateway) = &self.gateway else {
            self.feedback(FeedbackKind::Error, MSG_NOT_CONFIGURED);
            return;
        };

        let pre = {
            let mut store = self.store.lock().unwrap();
            match store.task_mut(task_id) {
                None => Pre::Skip,
                Some(task) if task.status == next => Pre::Skip,
                Some(_) if !next.is_known() => Pre::Invalid(next.as_str().to_string()),
                Some(task) => {
                    let snapshot = task.clone();
                    task.status = next.clone();
                    task.updated_at = Utc::now();
                    Pre::Apply(snapshot)
                }
            }
        };
        let snapshot = match pre {
            Pre::Skip => return,
            Pre::Invalid(raw) => {
                self.feedback(
                    FeedbackKind::Error,
                    &crate::error::ValidationError::UnknownStatus(raw).to_string(),
                );
                return;
            }
            Pre::Apply(snapshot) => snapshot,
        };
        self.repaint();

        match gateway.update_status(task_id, &next).await {
            Ok(updated) => self.reconcile(task_id, updated),
            Err(err) => {
                tracing::error!(error = %err, task = task_id, "status update failed");
                self.rollback_fields(task_id, snapshot);
                self.feedback(FeedbackKind::Error, MSG_REVERTED);
            }
        }
    }

    /// Mark a task completed. No-op when missing or already completed;
    /// `completed` is terminal.
    pub async fn complete_task(&self, task_id: &str) {
        let Some(gateway) = &self.gateway else {
            self.feedback(FeedbackKind::Error, MSG_NOT_CONFIGURED);
            return;
        };

        let snapshot = {
            let mut store = self.store.lock().unwrap();
            match store.task_mut(task_id) {
                None => None,
                Some(task) if task.status.is_completed() => None,
                Some(task) => {
                    let snapshot = task.clone();
                    let now = Utc::now();
                    task.status = TaskStatus::Completed;
                    task.updated_at = now;
                    task.completed_at = Some(now);
                    Some(snapshot)
                }
            }
        };
        let Some(snapshot) = snapshot else { return };
        self.repaint();

        match gateway.complete_task(task_id).await {
            Ok(updated) => {
                self.reconcile(task_id, updated);
                self.feedback(FeedbackKind::Success, MSG_COMPLETED);
                self.refresh_stats().await;
            }
            Err(err) => {
                tracing::error!(error = %err, task = task_id, "task completion failed");
                self.rollback_fields(task_id, snapshot);
                self.feedback(FeedbackKind::Error, MSG_SYNC_FAILED);
            }
        }
    }

    /// Delete a task. The snapshot covers list membership (task plus index)
    /// and the prior selection, so rollback re-inserts rather than restoring
    /// fields.
    pub async fn delete_task(&self, task_id: &str) {
        let Some(gateway) = &self.gateway else {
            self.feedback(FeedbackKind::Error, MSG_NOT_CONFIGURED);
            return;
        };

        let removed = {
            let mut store = self.store.lock().unwrap();
            let Some(index) = store.task_index(task_id) else {
                return;
            };
            let task = store.tasks.remove(index);
            let prior_selection = store.selected_task_id.clone();
            if store.selected_task_id.as_deref() == Some(task_id) {
                store.selected_task_id = None;
            }
            (task, index, prior_selection)
        };
        self.repaint();

        match gateway.delete_task(task_id).await {
            Ok(_) => {
                self.bump_last_sync();
                self.feedback(FeedbackKind::Success, MSG_DELETED);
                self.refresh_stats().await;
            }
            Err(err) => {
                tracing::error!(error = %err, task = task_id, "task deletion failed");
                let (task, index, prior_selection) = removed;
                {
                    let mut store = self.store.lock().unwrap();
                    let index = index.min(store.tasks.len());
                    store.tasks.insert(index, task);
                    store.selected_task_id = prior_selection;
                }
                self.repaint();
                self.feedback(FeedbackKind::Error, MSG_SYNC_FAILED);
            }
        }
    }

    /// Fetch weekly stats into the store. Failures store `None`; the stats
    /// panel is repainted either way.
    pub async fn refresh_stats(&self) {
        let Some(gateway) = &self.gateway else { return };

        let stats = match gateway.fetch_weekly_stats().await {
            Ok(stats) => stats,
            Err(err) => {
                tracing::error!(error = %err, "weekly stats fetch failed");
                self.feedback(FeedbackKind::Error, MSG_STATS_FAILED);
                None
            }
        };
        let snapshot = {
            let mut store = self.store.lock().unwrap();
            store.weekly_stats = stats;
            store.weekly_stats.clone()
        };
        self.renderer.render_stats(snapshot.as_ref());
    }

    /// Ask the backend to decompose a task into subtasks, then poll the task
    /// list until they appear (bounded) and select the first non-completed
    /// one. Nothing is mutated optimistically, so failure rolls back nothing.
    pub async fn request_breakdown(&self, task_id: &str) {
        let Some(gateway) = &self.gateway else {
            self.feedback(FeedbackKind::Error, MSG_NOT_CONFIGURED);
            return;
        };
        if self.store.lock().unwrap().task(task_id).is_none() {
            return;
        }

        self.feedback(FeedbackKind::Info, MSG_BREAKDOWN_RUNNING);
        if let Err(err) = gateway.request_breakdown(task_id).await {
            tracing::error!(error = %err, task = task_id, "breakdown request failed");
            self.feedback(FeedbackKind::Error, MSG_BREAKDOWN_FAILED);
            return;
        }

        let attempts = self.breakdown_poll.attempts.max(1);
        for attempt in 1..=attempts {
            if !self.reload_tasks(false).await {
                self.feedback(FeedbackKind::Error, MSG_SYNC_FAILED);
                return;
            }
            let has_subtasks = {
                let store = self.store.lock().unwrap();
                let exists = store.subtasks_of(task_id).next().is_some();
                exists
            };
            if has_subtasks || attempt == attempts {
                break;
            }
            tokio::time::sleep(self.breakdown_poll.delay).await;
        }

        {
            let mut store = self.store.lock().unwrap();
            let next_selected = store
                .subtasks_of(task_id)
                .find(|task| !task.status.is_completed())
                .map(|task| task.id.clone());
            store.selected_task_id = next_selected;
        }
        self.repaint();
        self.feedback(FeedbackKind::Success, MSG_BREAKDOWN_DONE);
        self.refresh_stats().await;
    }

    /// Toggle selection: re-selecting the current id (or passing `None` or an
    /// unknown id) clears it. No network effect.
    pub fn select_task(&self, task_id: Option<&str>) {
        {
            let mut store = self.store.lock().unwrap();
            store.selected_task_id = match task_id {
                Some(id)
                    if store.selected_task_id.as_deref() != Some(id)
                        && store.task(id).is_some() =>
                {
                    Some(id.to_string())
                }
                _ => None,
            };
        }
        self.repaint();
    }

    fn reconcile(&self, task_id: &str, updated: Option<Task>) {
        {
            let mut store = self.store.lock().unwrap();
            if let Some(updated) = updated {
                if let Some(task) = store.task_mut(task_id) {
                    *task = updated;
                }
            }
        }
        self.bump_last_sync();
        self.repaint();
    }

    fn rollback_fields(&self, task_id: &str, snapshot: Task) {
        {
            let mut store = self.store.lock().unwrap();
            if let Some(task) = store.task_mut(task_id) {
                *task = snapshot;
            }
        }
        self.repaint();
    }

    fn bump_last_sync(&self) {
        let now = Utc::now();
        self.store.lock().unwrap().last_sync_at = Some(now);
        self.renderer.last_sync_changed(now);
    }

    fn set_connection(&self, status: ConnectionStatus, detail: &str) {
        self.store.lock().unwrap().connection = status;
        self.renderer.connection_changed(status, detail);
    }

    fn repaint(&self) {
        let store = self.store.lock().unwrap();
        self.renderer.repaint(&store);
    }

    fn feedback(&self, kind: FeedbackKind, message: &str) {
        self.renderer.show_feedback(kind, message);
    }
}
