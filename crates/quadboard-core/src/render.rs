//! Presentation boundary.
//!
//! The sync engine and connection monitor talk to whatever paints the board
//! through this trait. Every method has a no-op default so a renderer only
//! implements the surfaces it cares about.

use crate::state::{ConnectionStatus, Store};
use crate::stats::WeeklyStats;
use chrono::{DateTime, Utc};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Info,
    Success,
    Error,
}

/// Implemented by the presentation layer. Repaints are invoked synchronously,
/// immediately after the state mutation that triggered them.
pub trait Renderer: Send + Sync {
    /// Full board repaint after a task-list or selection change.
    fn repaint(&self, _store: &Store) {}

    /// Weekly stats panel refresh.
    fn render_stats(&self, _stats: Option<&WeeklyStats>) {}

    /// Connection indicator update.
    fn connection_changed(&self, _status: ConnectionStatus, _detail: &str) {}

    /// Last successful sync timestamp update.
    fn last_sync_changed(&self, _at: DateTime<Utc>) {}

    /// Short user-facing notification.
    fn show_feedback(&self, _kind: FeedbackKind, _message: &str) {}
}

/// Renderer that paints nothing. Useful headless and in tests.
pub struct NullRenderer;

impl Renderer for NullRenderer {}
