//! Gateway trait seam.
//!
//! The sync engine and connection monitor depend on this trait rather than on
//! the HTTP client, so tests drive them with scripted in-memory gateways.
//! Methods return `impl Future + Send` so a gateway behind `Arc` can be
//! probed from a spawned background task.

use crate::error::GatewayError;
use crate::stats::WeeklyStats;
use crate::task::{Task, TaskStatus};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Fields for a task creation request. Status defaults to uncategorized on
/// the wire when unset.
#[derive(Debug, Clone, Default)]
pub struct NewTaskRequest {
    pub title: String,
    pub status: Option<TaskStatus>,
    pub parent_task_id: Option<String>,
    pub parent_task_title: Option<String>,
}

impl NewTaskRequest {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Remote operations of the task board backend.
pub trait Gateway {
    /// Fetch the complete ordered task collection.
    fn load_tasks(&self) -> impl Future<Output = Result<Vec<Task>, GatewayError>> + Send;

    /// Create a task. Returns the server-assigned task, or `None` when the
    /// response omits a task payload.
    fn create_task(
        &self,
        request: NewTaskRequest,
    ) -> impl Future<Output = Result<Option<Task>, GatewayError>> + Send;

    /// Move a task to another status.
    fn update_status(
        &self,
        task_id: &str,
        status: &TaskStatus,
    ) -> impl Future<Output = Result<Option<Task>, GatewayError>> + Send;

    /// Mark a task completed.
    fn complete_task(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<Option<Task>, GatewayError>> + Send;

    /// Delete a task. The result payload is opaque.
    fn delete_task(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<Value, GatewayError>> + Send;

    /// Fetch weekly statistics, or `None` when the server has none.
    fn fetch_weekly_stats(
        &self,
    ) -> impl Future<Output = Result<Option<WeeklyStats>, GatewayError>> + Send;

    /// Trigger server-side AI decomposition of a task into subtasks. The
    /// response is opaque; callers reload tasks afterwards to observe the
    /// subtasks, since breakdown is asynchronous server work.
    fn request_breakdown(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<Value, GatewayError>> + Send;

    /// Liveness probe.
    fn ping(&self) -> impl Future<Output = Result<bool, GatewayError>> + Send;
}

/// A shared gateway is a gateway, so one client can serve the sync engine
/// and the connection monitor at once.
impl<T: Gateway + Send + Sync> Gateway for Arc<T> {
    fn load_tasks(&self) -> impl Future<Output = Result<Vec<Task>, GatewayError>> + Send {
        T::load_tasks(self)
    }

    fn create_task(
        &self,
        request: NewTaskRequest,
    ) -> impl Future<Output = Result<Option<Task>, GatewayError>> + Send {
        T::create_task(self, request)
    }

    fn update_status(
        &self,
        task_id: &str,
        status: &TaskStatus,
    ) -> impl Future<Output = Result<Option<Task>, GatewayError>> + Send {
        T::update_status(self, task_id, status)
    }

    fn complete_task(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<Option<Task>, GatewayError>> + Send {
        T::complete_task(self, task_id)
    }

    fn delete_task(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<Value, GatewayError>> + Send {
        T::delete_task(self, task_id)
    }

    fn fetch_weekly_stats(
        &self,
    ) -> impl Future<Output = Result<Option<WeeklyStats>, GatewayError>> + Send {
        T::fetch_weekly_stats(self)
    }

    fn request_breakdown(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<Value, GatewayError>> + Send {
        T::request_breakdown(self, task_id)
    }

    fn ping(&self) -> impl Future<Output = Result<bool, GatewayError>> + Send {
        T::ping(self)
    }
}
