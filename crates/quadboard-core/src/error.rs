//! Core error types for quadboard-core.
//!
//! This module defines the error hierarchy using thiserror. Gateway errors
//! distinguish transport failures from application-level rejections so that
//! callers can treat connectivity problems and validation problems
//! differently.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for quadboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Backend gateway errors
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Backend endpoint is not configured
    #[error("API base URL is not configured")]
    MissingBaseUrl,

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Local validation errors, rejected before any network call.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty after trimming
    #[error("task title must not be empty")]
    EmptyTitle,

    /// Title exceeds the allowed length
    #[error("task title exceeds {max} characters (got {len})")]
    TitleTooLong { max: usize, len: usize },

    /// Status is not one of the known values
    #[error("unknown task status '{0}'")]
    UnknownStatus(String),
}

/// Errors raised by the backend gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport-level failure (DNS, connection refused, TLS)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx transport response; carries the raw body for diagnostics
    #[error("request failed with status {status}")]
    RequestFailed { status: u16, body: String },

    /// 2xx response carrying an explicit failure flag from the backend
    #[error("backend rejected request [{code}]: {message}")]
    Application {
        code: String,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Response payload did not match the expected shape
    #[error("could not decode payload: {0}")]
    Decode(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
