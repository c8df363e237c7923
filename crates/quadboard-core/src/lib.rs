//! # Quadboard Core Library
//!
//! This library provides the client-side core for the Quadboard Eisenhower
//! task board. All business logic (persistence, AI task breakdown, weekly
//! statistics) lives in a remote HTTP backend; this crate keeps an in-memory
//! task board consistent with that backend under optimistic UI updates, with
//! the CLI binary being a thin presentation layer over the same core.
//!
//! ## Architecture
//!
//! - **Sync Engine**: Optimistic-update-with-rollback orchestration for every
//!   state-changing user action, plus full-reload reconciliation
//! - **Backend Gateway**: The only component performing network I/O; owns the
//!   wire protocol and the rotating CSRF session token
//! - **Store**: Single in-memory application state (tasks, selection,
//!   connection status, weekly stats)
//! - **Connection Monitor**: Periodic backend liveness probe
//!
//! ## Key Components
//!
//! - [`SyncEngine`]: Optimistic update and rollback orchestration
//! - [`BackendGateway`]: HTTP client for the task board backend
//! - [`Store`]: Shared application state
//! - [`Config`]: Application configuration management

pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod monitor;
pub mod render;
pub mod state;
pub mod stats;
pub mod task;

pub use config::Config;
pub use engine::{PollSettings, SyncEngine};
pub use error::{ConfigError, CoreError, GatewayError, ValidationError};
pub use gateway::{BackendGateway, Gateway, NewTaskRequest};
pub use monitor::ConnectionMonitor;
pub use render::{FeedbackKind, NullRenderer, Renderer};
pub use state::{ConnectionStatus, SessionTokens, SharedStore, Store};
pub use stats::WeeklyStats;
pub use task::{Task, TaskStatus};
