//! Wire-format decoding for task payloads.
//!
//! The documented backend emits snake_case fields, but deployed instances
//! have served camelCase. Decoding therefore reads snake_case first and falls
//! back to the camelCase spelling; an explicit `null` in the preferred
//! spelling also falls through. Outbound payloads always use snake_case.
//!
//! Payloads that do not look like a task at all (not an object, or missing
//! `id`/`title`) are rejected with a decode error instead of being defaulted.

use crate::error::GatewayError;
use crate::task::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Decode one task object.
pub fn decode_task(payload: &Value) -> Result<Task, GatewayError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| GatewayError::Decode("task payload is not an object".into()))?;

    let id = required_str(obj, "id")?;
    let title = required_str(obj, "title")?;

    let status = field(obj, "status", "status")
        .and_then(Value::as_str)
        .map(TaskStatus::parse)
        .unwrap_or_default();

    let created_at = timestamp(obj, "created_at", "createdAt")?.unwrap_or_else(Utc::now);
    let updated_at = timestamp(obj, "updated_at", "updatedAt")?.unwrap_or_else(Utc::now);

    Ok(Task {
        id: id.to_string(),
        title: title.trim().to_string(),
        status,
        parent_task_id: opt_string(obj, "parent_task_id", "parentTaskId"),
        parent_task_title: opt_string(obj, "parent_task_title", "parentTaskTitle"),
        created_at,
        updated_at,
        completed_at: timestamp(obj, "completed_at", "completedAt")?,
    })
}

fn required_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, GatewayError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::Decode(format!("task payload is missing '{key}'")))
}

/// Snake_case first, camelCase fallback; `null` counts as absent.
fn field<'a>(obj: &'a Map<String, Value>, snake: &str, camel: &str) -> Option<&'a Value> {
    match obj.get(snake) {
        None | Some(Value::Null) => match obj.get(camel) {
            Some(Value::Null) => None,
            other => other,
        },
        present => present,
    }
}

fn opt_string(obj: &Map<String, Value>, snake: &str, camel: &str) -> Option<String> {
    field(obj, snake, camel)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn timestamp(
    obj: &Map<String, Value>,
    snake: &str,
    camel: &str,
) -> Result<Option<DateTime<Utc>>, GatewayError> {
    let Some(value) = field(obj, snake, camel) else {
        return Ok(None);
    };
    let raw = value
        .as_str()
        .ok_or_else(|| GatewayError::Decode(format!("'{snake}' is not a timestamp string")))?;
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| GatewayError::Decode(format!("invalid timestamp in '{snake}': {e}")))?;
    Ok(Some(parsed.with_timezone(&Utc)))
}
