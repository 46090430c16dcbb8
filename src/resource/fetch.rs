//! Fetch Disambiguator
//!
//! A by-name query answers in one of three layouts depending on the
//! endpoint: the object itself, `{"data": [...]}`, or a bare array. The
//! layout is classified once here and resolved to a single record.

use crate::error::{Result, ScmError};
use serde_json::Value;

/// What to do when a name matches more than one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Use the first record in server order and log a warning
    #[default]
    FirstMatch,
    /// Fail with [`ScmError::Ambiguous`]
    Strict,
}

/// Shape of a fetch-by-name response
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResponse {
    /// Mapping carrying an `id` directly
    Single(Value),
    /// Mapping with a `data` array
    Wrapped(Vec<Value>),
    /// Top-level array
    Bare(Vec<Value>),
}

impl FetchResponse {
    pub fn classify(response: Value) -> Result<Self> {
        match response {
            Value::Object(map) if map.contains_key("id") => Ok(FetchResponse::Single(Value::Object(map))),
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => Ok(FetchResponse::Wrapped(items)),
                _ => Err(ScmError::InvalidResponseShape(
                    "expected either 'id' or 'data' field".to_string(),
                )),
            },
            Value::Array(items) => Ok(FetchResponse::Bare(items)),
            _ => Err(ScmError::InvalidResponseShape(
                "expected dictionary or list".to_string(),
            )),
        }
    }

    /// Pick the one record this response stands for
    pub fn resolve(self, kind: &'static str, name: &str, policy: FetchPolicy) -> Result<Value> {
        let items = match self {
            FetchResponse::Single(record) => return Ok(record),
            FetchResponse::Wrapped(items) | FetchResponse::Bare(items) => items,
        };

        let count = items.len();
        let Some(first) = items.into_iter().next() else {
            return Err(ScmError::NotFound {
                kind,
                name: name.to_string(),
            });
        };

        // Shape errors win over ambiguity
        if first.get("id").is_none() {
            return Err(ScmError::InvalidResponseShape(
                "response data item missing 'id' field".to_string(),
            ));
        }

        if count > 1 {
            match policy {
                FetchPolicy::Strict => {
                    return Err(ScmError::Ambiguous {
                        kind,
                        name: name.to_string(),
                        count,
                    })
                },
                FetchPolicy::FirstMatch => {
                    tracing::warn!(
                        "multiple {} resources found for name '{}' ({}), using the first",
                        kind,
                        name,
                        count
                    );
                },
            }
        }

        Ok(first)
    }
}

/// Classify and resolve in one step
pub fn disambiguate(response: Value, kind: &'static str, name: &str, policy: FetchPolicy) -> Result<Value> {
    FetchResponse::classify(response)?.resolve(kind, name, policy)
}
