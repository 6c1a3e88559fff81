//! Thin JSON layer over fetch. The backend's routing is inconsistent about
//! trailing slashes, so a 404 on a slashless URL is retried exactly once
//! with the slash appended and the retry's outcome replaces the original.

use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

use crate::session;

#[derive(Debug, Error)]
pub enum RequestError {
    /// Raised synchronously before any request when an authenticated
    /// operation is invoked without a stored token. A caller bug, not a
    /// retryable condition.
    #[error("no token available")]
    NoToken,
    #[error("HTTP {status}")]
    Status { status: u16, body: Option<Value> },
    #[error("email verification failed - all payload formats rejected")]
    VerificationExhausted,
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// One user-facing string for whatever the backend sent back, used by
    /// every page. Best effort over the shapes the backend produces: a bare
    /// string, `{detail}` (string, object or validation array), `{msg}`,
    /// `{message}`, or anything else stringified.
    pub fn message(&self) -> String {
        match self {
            Self::Status { body, .. } => body
                .as_ref()
                .and_then(flatten_error_body)
                .unwrap_or_else(|| "Request failed".to_string()),
            other => other.to_string(),
        }
    }
}

pub(crate) fn flatten_error_body(body: &Value) -> Option<String> {
    match body {
        Value::String(msg) => Some(msg.clone()),
        Value::Array(errors) => Some(join_validation_errors(errors)),
        Value::Object(map) => {
            if let Some(Value::String(msg)) = map.get("msg") {
                return Some(msg.clone());
            }
            if let Some(detail) = map.get("detail") {
                return Some(match detail {
                    Value::String(msg) => msg.clone(),
                    Value::Array(errors) => join_validation_errors(errors),
                    Value::Object(inner) => match inner.get("msg") {
                        Some(Value::String(msg)) => msg.clone(),
                        _ => detail.to_string(),
                    },
                    other => other.to_string(),
                });
            }
            if let Some(Value::String(msg)) = map.get("message") {
                return Some(msg.clone());
            }
            Some(body.to_string())
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn join_validation_errors(errors: &[Value]) -> String {
    errors
        .iter()
        .map(|e| match e.get("msg") {
            Some(Value::String(msg)) => msg.clone(),
            _ => "Validation error".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Success bodies are parsed only when non-empty; malformed JSON in a
/// success body is treated as absent rather than a failure.
pub(crate) fn parse_body(text: &str) -> Option<Value> {
    if text.is_empty() {
        None
    } else {
        serde_json::from_str(text).ok()
    }
}

pub(crate) fn slash_retry_url(status: u16, url: &str) -> Option<String> {
    if status == 404 && !url.ends_with('/') {
        Some(format!("{}/", url))
    } else {
        None
    }
}

async fn send_once(
    method: &Method,
    url: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> Result<(u16, Option<Value>), RequestError> {
    let client = reqwest::Client::new();

    let mut req = client
        .request(method.clone(), url)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {}", token));
    }
    if let Some(body) = body {
        req = req.json(body);
    }

    let res = req.send().await?;
    let status = res.status().as_u16();
    let text = res.text().await?;

    Ok((status, parse_body(&text)))
}

pub async fn request_json(
    method: Method,
    url: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> Result<Option<Value>, RequestError> {
    let (status, data) = send_once(&method, url, token, body).await?;
    if (200..300).contains(&status) {
        return Ok(data);
    }

    if let Some(retry_url) = slash_retry_url(status, url) {
        debug!("404 on {}, retrying as {}", url, retry_url);
        let (retry_status, retry_data) = send_once(&method, &retry_url, token, body).await?;
        if (200..300).contains(&retry_status) {
            return Ok(retry_data);
        }
        return Err(RequestError::Status {
            status: retry_status,
            body: retry_data,
        });
    }

    Err(RequestError::Status { status, body: data })
}

/// Form-encoded POST, used only by the login endpoint.
pub async fn post_form(
    url: &str,
    fields: &[(&str, &str)],
) -> Result<Option<Value>, RequestError> {
    let client = reqwest::Client::new();

    let res = client.post(url).form(&fields).send().await?;
    let status = res.status().as_u16();
    let text = res.text().await?;
    let data = parse_body(&text);

    if (200..300).contains(&status) {
        Ok(data)
    } else {
        Err(RequestError::Status { status, body: data })
    }
}

/// Token for an authenticated operation; absence is a contract violation
/// surfaced before any request goes out.
pub fn require_token() -> Result<String, RequestError> {
    session::token().ok_or(RequestError::NoToken)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slash_retry_only_on_slashless_404() {
        assert_eq!(
            slash_retry_url(404, "/api/v1/jobs").as_deref(),
            Some("/api/v1/jobs/")
        );
        assert_eq!(slash_retry_url(404, "/api/v1/jobs/"), None);
        assert_eq!(slash_retry_url(500, "/api/v1/jobs"), None);
        assert_eq!(slash_retry_url(400, "/api/v1/jobs"), None);
    }

    #[test]
    fn test_parse_body_empty_and_malformed() {
        assert_eq!(parse_body(""), None);
        assert_eq!(parse_body("<html>oops</html>"), None);
        assert_eq!(parse_body("{\"ok\":true}"), Some(json!({"ok": true})));
    }

    #[test]
    fn test_flatten_plain_string_and_message() {
        assert_eq!(
            flatten_error_body(&json!("boom")).as_deref(),
            Some("boom")
        );
        assert_eq!(
            flatten_error_body(&json!({"message": "nope"})).as_deref(),
            Some("nope")
        );
    }

    #[test]
    fn test_flatten_detail_variants() {
        assert_eq!(
            flatten_error_body(&json!({"detail": "invalid otp"})).as_deref(),
            Some("invalid otp")
        );
        assert_eq!(
            flatten_error_body(&json!({"detail": {"msg": "expired"}})).as_deref(),
            Some("expired")
        );
        assert_eq!(
            flatten_error_body(&json!({"detail": [
                {"msg": "field required"},
                {"loc": ["body", "email"]},
            ]}))
            .as_deref(),
            Some("field required, Validation error")
        );
    }

    #[test]
    fn test_flatten_validation_array_at_top_level() {
        assert_eq!(
            flatten_error_body(&json!([{"msg": "a"}, {"msg": "b"}])).as_deref(),
            Some("a, b")
        );
    }

    #[test]
    fn test_message_falls_back_to_generic() {
        let err = RequestError::Status {
            status: 500,
            body: None,
        };
        assert_eq!(err.message(), "Request failed");
    }
}
