//! HTTP client for the task board backend.
//!
//! Wire conventions of the documented backend:
//! - mutating requests carry their body as a single `payload` form field
//!   containing JSON, with `csrf_token` injected into that JSON when a
//!   session token is held; body-less mutating requests carry the token as a
//!   query parameter instead
//! - responses are JSON regardless of declared content type, so the body is
//!   read as text and parsed manually, falling back to the raw text
//! - a 2xx response carrying `success: false` is an application-level
//!   failure, not a success

use crate::config::Config;
use crate::error::{ConfigError, GatewayError};
use crate::gateway::traits::{Gateway, NewTaskRequest};
use crate::state::SessionTokens;
use crate::stats::WeeklyStats;
use crate::task::{wire, Task, TaskStatus};
use reqwest::Method;
use serde_json::{Map, Value};
use url::Url;

/// Backend API client. Clone-free; share behind `Arc` when needed.
pub struct BackendGateway {
    http: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
    session: SessionTokens,
}

impl BackendGateway {
    /// # Errors
    ///
    /// Rejects base URLs that cannot carry path segments (e.g. `data:` URLs).
    pub fn new(
        base_url: Url,
        api_token: Option<String>,
        session: SessionTokens,
    ) -> Result<Self, ConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: "api.base_url".into(),
                message: "URL cannot carry path segments".into(),
            });
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            api_token,
            session,
        })
    }

    pub fn from_config(config: &Config, session: SessionTokens) -> Result<Self, ConfigError> {
        Self::new(config.api_base_url()?, config.api.token.clone(), session)
    }

    pub fn session(&self) -> &SessionTokens {
        &self.session
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn request(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
        parse_json: bool,
    ) -> Result<Option<Value>, GatewayError> {
        let mutating = method != Method::GET;
        let token = self.session.current();

        let mut url = self.endpoint(segments);
        if mutating && body.is_none() {
            if let Some(ref csrf) = token {
                url.query_pairs_mut().append_pair("csrf_token", csrf);
            }
        }

        let mut request = self.http.request(method, url);
        if let Some(ref bearer) = self.api_token {
            request = request.bearer_auth(bearer);
        }
        if let Some(mut payload) = body {
            if mutating {
                if let (Some(csrf), Some(obj)) = (token.as_deref(), payload.as_object_mut()) {
                    obj.insert("csrf_token".into(), Value::String(csrf.to_string()));
                }
            }
            request = request.form(&[("payload", payload.to_string())]);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(%status, path = segments.join("/"), "backend request failed");
            return Err(GatewayError::RequestFailed {
                status: status.as_u16(),
                body: text,
            });
        }
        if !parse_json || status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let payload = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
        if let Some(obj) = payload.as_object() {
            if obj.get("success").and_then(Value::as_bool) == Some(false) {
                return Err(application_error(obj));
            }
            if let Some(fresh) = obj.get("csrf_token").and_then(Value::as_str) {
                self.session.rotate(fresh);
            }
        }
        Ok(Some(payload))
    }
}

impl Gateway for BackendGateway {
    async fn load_tasks(&self) -> Result<Vec<Task>, GatewayError> {
        let data = self
            .request(Method::GET, &["tasks"], None, true)
            .await?
            .unwrap_or(Value::Null);
        let items = data
            .get("tasks")
            .and_then(Value::as_array)
            .cloned()
            .or_else(|| data.as_array().cloned())
            .unwrap_or_default();
        items.iter().map(wire::decode_task).collect()
    }

    async fn create_task(&self, request: NewTaskRequest) -> Result<Option<Task>, GatewayError> {
        let status = request.status.unwrap_or_default();
        let body = serde_json::json!({
            "title": request.title,
            "status": status.as_str(),
            "parent_task_id": request.parent_task_id,
            "parent_task_title": request.parent_task_title,
        });
        let data = self
            .request(Method::POST, &["tasks"], Some(body), true)
            .await?;
        extract_task(data)
    }

    async fn update_status(
        &self,
        task_id: &str,
        status: &TaskStatus,
    ) -> Result<Option<Task>, GatewayError> {
        let body = serde_json::json!({ "id": task_id, "status": status.as_str() });
        let data = self
            .request(Method::POST, &["tasks", "update"], Some(body), true)
            .await?;
        extract_task(data)
    }

    async fn complete_task(&self, task_id: &str) -> Result<Option<Task>, GatewayError> {
        let data = self
            .request(Method::POST, &["tasks", task_id, "complete"], None, true)
            .await?;
        extract_task(data)
    }

    async fn delete_task(&self, task_id: &str) -> Result<Value, GatewayError> {
        let data = self
            .request(Method::POST, &["tasks", task_id, "delete"], None, true)
            .await?
            .unwrap_or(Value::Null);
        let has_result = data.get("result").is_some_and(|r| !r.is_null());
        Ok(if has_result {
            data.get("result").cloned().unwrap_or(Value::Null)
        } else {
            data
        })
    }

    async fn fetch_weekly_stats(&self) -> Result<Option<WeeklyStats>, GatewayError> {
        let data = self
            .request(Method::GET, &["stats", "weekly"], None, true)
            .await?;
        Ok(data.and_then(|payload| WeeklyStats::from_wire(&payload)))
    }

    async fn request_breakdown(&self, task_id: &str) -> Result<Value, GatewayError> {
        let data = self
            .request(Method::POST, &["tasks", task_id, "breakdown"], None, true)
            .await?;
        Ok(data.unwrap_or(Value::Null))
    }

    async fn ping(&self) -> Result<bool, GatewayError> {
        match self.request(Method::GET, &["health"], None, false).await {
            Ok(_) => Ok(true),
            // Not every deployment exposes a health path; probe the task
            // list instead.
            Err(GatewayError::RequestFailed { status: 404, .. }) => {
                self.request(Method::GET, &["tasks"], None, false).await?;
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }
}

fn application_error(obj: &Map<String, Value>) -> GatewayError {
    GatewayError::Application {
        code: obj
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("API_ERROR")
            .to_string(),
        message: obj
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("backend reported a failure")
            .to_string(),
        details: obj.get("details").filter(|d| !d.is_null()).cloned(),
    }
}

/// Pull a task out of `{task: {...}}` or a bare task object. Responses that
/// carry no task-shaped payload (no `id`) yield `None`; payloads that claim
/// to be a task but are malformed yield a decode error.
fn extract_task(payload: Option<Value>) -> Result<Option<Task>, GatewayError> {
    let Some(data) = payload else {
        return Ok(None);
    };
    let has_wrapper = data.get("task").is_some_and(|t| !t.is_null());
    let body = if has_wrapper {
        data.get("task").cloned().unwrap_or(Value::Null)
    } else {
        data
    };
    if !body.get("id").is_some_and(|id| id.is_string()) {
        return Ok(None);
    }
    wire::decode_task(&body).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gateway(base: &str) -> BackendGateway {
        BackendGateway::new(Url::parse(base).unwrap(), None, SessionTokens::new()).unwrap()
    }

    #[test]
    fn endpoint_joins_segments_onto_base_path() {
        let gw = gateway("https://example.test/api/v1");
        assert_eq!(
            gw.endpoint(&["tasks", "update"]).as_str(),
            "https://example.test/api/v1/tasks/update"
        );
    }

    #[test]
    fn endpoint_percent_encodes_task_ids() {
        let gw = gateway("https://example.test");
        let url = gw.endpoint(&["tasks", "task 1/x", "complete"]);
        assert_eq!(
            url.as_str(),
            "https://example.test/tasks/task%201%2Fx/complete"
        );
    }

    #[test]
    fn extract_task_unwraps_wrapper() {
        let task = extract_task(Some(json!({
            "task": { "id": "t-1", "title": "Wrapped" }
        })))
        .unwrap()
        .unwrap();
        assert_eq!(task.id, "t-1");
    }

    #[test]
    fn extract_task_accepts_bare_task() {
        let task = extract_task(Some(json!({ "id": "t-2", "title": "Bare" })))
            .unwrap()
            .unwrap();
        assert_eq!(task.id, "t-2");
    }

    #[test]
    fn extract_task_without_task_shape_is_none() {
        assert!(extract_task(None).unwrap().is_none());
        assert!(extract_task(Some(json!({ "success": true })))
            .unwrap()
            .is_none());
        assert!(extract_task(Some(json!("ok"))).unwrap().is_none());
    }

    #[test]
    fn extract_task_propagates_malformed_task() {
        let err = extract_task(Some(json!({ "task": { "id": "t-3" } }))).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn application_error_carries_server_fields() {
        let obj = json!({
            "success": false,
            "code": "TITLE_TOO_LONG",
            "message": "title exceeds limit",
            "details": { "max": 100 }
        });
        let err = application_error(obj.as_object().unwrap());
        match err {
            GatewayError::Application {
                code,
                message,
                details,
            } => {
                assert_eq!(code, "TITLE_TOO_LONG");
                assert_eq!(message, "title exceeds limit");
                assert_eq!(details.unwrap()["max"], 100);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
