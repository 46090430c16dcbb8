//! Typed errors for every client operation.
//!
//! Each variant maps onto a short error code, an HTTP-style status and a
//! JSON details payload so callers can branch on failures programmatically.

use serde_json::{json, Value};
use thiserror::Error;

use crate::resource::filter::FilterShape;

pub type Result<T> = std::result::Result<T, ScmError>;

/// Error body returned by the API on a non-success status.
///
/// The raw body is always kept; the structured fields are filled in
/// when the body follows the `{"_errors": [...], "_request_id": ...}` layout.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: u16,
    pub code: Option<String>,
    pub message: String,
    pub details: Value,
    pub request_id: Option<String>,
    pub body: String,
}

impl ApiError {
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let first = parsed
            .as_ref()
            .and_then(|v| v.get("_errors"))
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first());

        let code = first
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str())
            .map(String::from);
        let message = first
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .unwrap_or_else(|| format!("API request failed with status {}", status));
        let details = first
            .and_then(|e| e.get("details"))
            .cloned()
            .unwrap_or(Value::Null);
        let request_id = parsed
            .as_ref()
            .and_then(|v| v.get("_request_id"))
            .and_then(|v| v.as_str())
            .map(String::from);

        Self {
            status,
            code,
            message,
            details,
            request_id,
            body: body.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ScmError {
    #[error("field '{field}' cannot be empty")]
    MissingParameter { field: &'static str },

    #[error("exactly one of 'folder', 'snippet', or 'device' must be provided (got {provided:?})")]
    InvalidScope { provided: Vec<&'static str> },

    #[error("'{key}' filter must be {expected}")]
    InvalidFilterType { key: String, expected: FilterShape },

    #[error("max_limit must be greater than 0")]
    InvalidLimit,

    #[error("validation: {0}")]
    Validation(String),

    #[error("invalid response format: {0}")]
    InvalidResponseShape(String),

    #[error("failed to decode {kind} record: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} '{name}' not found in specified container")]
    NotFound { kind: &'static str, name: String },

    #[error("{count} {kind} objects named '{name}' found in specified container")]
    Ambiguous {
        kind: &'static str,
        name: String,
        count: usize,
    },

    #[error("API error {}: {}", .0.status, .0.message)]
    Api(ApiError),

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication: {0}")]
    Auth(String),
}

impl ScmError {
    /// Short machine-readable code
    pub fn code(&self) -> String {
        match self {
            ScmError::MissingParameter { .. }
            | ScmError::InvalidScope { .. }
            | ScmError::InvalidFilterType { .. }
            | ScmError::InvalidLimit
            | ScmError::Validation(_)
            | ScmError::InvalidResponseShape(_)
            | ScmError::Decode { .. } => "E003".to_string(),
            ScmError::NotFound { .. } => "E005".to_string(),
            ScmError::Ambiguous { .. } => "E006".to_string(),
            ScmError::Api(api) => api
                .code
                .clone()
                .unwrap_or_else(|| format!("HTTP_{}", api.status)),
            ScmError::Http(_) => "E000".to_string(),
            ScmError::Auth(_) => "E016".to_string(),
        }
    }

    /// HTTP-style status
    pub fn status(&self) -> u16 {
        match self {
            ScmError::MissingParameter { .. }
            | ScmError::InvalidScope { .. }
            | ScmError::InvalidFilterType { .. }
            | ScmError::InvalidLimit
            | ScmError::Validation(_) => 400,
            ScmError::InvalidResponseShape(_) | ScmError::Decode { .. } => 500,
            ScmError::NotFound { .. } => 404,
            ScmError::Ambiguous { .. } => 409,
            ScmError::Api(api) => api.status,
            ScmError::Http(e) => e.status().map(|s| s.as_u16()).unwrap_or(503),
            ScmError::Auth(_) => 401,
        }
    }

    pub fn details(&self) -> Value {
        match self {
            ScmError::MissingParameter { field } => json!({
                "field": field,
                "error": format!("\"{}\" is not allowed to be empty", field),
            }),
            ScmError::InvalidScope { provided } => json!({
                "error": "Invalid container parameters",
                "provided": provided,
            }),
            ScmError::InvalidFilterType { key, expected } => json!({
                "field": key,
                "expected": expected.to_string(),
                "errorType": "Invalid Object",
            }),
            ScmError::InvalidLimit => json!({ "error": "Invalid max_limit value" }),
            ScmError::Validation(msg) => json!({ "error": msg }),
            ScmError::InvalidResponseShape(msg) => json!({ "error": msg }),
            ScmError::Decode { kind, source } => json!({
                "kind": kind,
                "error": source.to_string(),
            }),
            ScmError::NotFound { name, .. } => json!({
                "name": name,
                "errorType": "Object Not Present",
            }),
            ScmError::Ambiguous { name, count, .. } => json!({
                "name": name,
                "count": count,
                "errorType": "Name Not Unique",
            }),
            ScmError::Api(api) => json!({
                "code": api.code,
                "message": api.message,
                "details": api.details,
                "request_id": api.request_id,
            }),
            ScmError::Http(e) => json!({ "error": e.to_string() }),
            ScmError::Auth(msg) => json!({ "error": msg }),
        }
    }

    /// True for failures detected locally before any request was sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ScmError::MissingParameter { .. }
                | ScmError::InvalidScope { .. }
                | ScmError::InvalidFilterType { .. }
                | ScmError::InvalidLimit
                | ScmError::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_parses_structured_body() {
        let body = r#"{"_errors":[{"code":"API_I00013","message":"Your configuration is not valid.","details":{"errorType":"Object Already Exists"}}],"_request_id":"abc-123"}"#;
        let err = ApiError::from_response(409, body);

        assert_eq!(err.status, 409);
        assert_eq!(err.code.as_deref(), Some("API_I00013"));
        assert_eq!(err.message, "Your configuration is not valid.");
        assert_eq!(err.details["errorType"], "Object Already Exists");
        assert_eq!(err.request_id.as_deref(), Some("abc-123"));
        assert_eq!(err.body, body);
    }

    #[test]
    fn test_api_error_keeps_unstructured_body() {
        let err = ApiError::from_response(502, "<html>bad gateway</html>");
        assert!(err.code.is_none());
        assert_eq!(err.body, "<html>bad gateway</html>");

        let wrapped = ScmError::Api(err);
        assert_eq!(wrapped.code(), "HTTP_502");
        assert_eq!(wrapped.status(), 502);
    }

    #[test]
    fn test_local_errors_carry_code_and_status() {
        let err = ScmError::MissingParameter { field: "folder" };
        assert_eq!(err.code(), "E003");
        assert_eq!(err.status(), 400);
        assert_eq!(err.details()["field"], "folder");
        assert!(err.is_local());

        let err = ScmError::NotFound {
            kind: "address",
            name: "web".to_string(),
        };
        assert_eq!(err.code(), "E005");
        assert_eq!(err.status(), 404);
        assert!(!err.is_local());
    }
}
