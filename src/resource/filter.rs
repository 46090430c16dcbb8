//! Client-Side Filter Engine
//!
//! Narrows an aggregated record list with a typed per-resource filter and
//! the container post-filters (`exact_match`, `exclude_*`). All filters
//! combine with logical AND; the input slice is never mutated.

use super::model::Record;
use super::scope::{ContainerScope, ScopeKind};
use crate::error::{Result, ScmError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Expected JSON shape of one filter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    /// Array of strings
    List,
    Bool,
    /// Single string
    Scalar,
}

impl FilterShape {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            FilterShape::List => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
            FilterShape::Bool => value.is_boolean(),
            FilterShape::Scalar => value.is_string(),
        }
    }
}

impl fmt::Display for FilterShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterShape::List => f.write_str("a list"),
            FilterShape::Bool => f.write_str("a boolean"),
            FilterShape::Scalar => f.write_str("a string"),
        }
    }
}

/// Typed filter for one record type
pub trait RecordFilter<R>: Default + Clone + fmt::Debug + DeserializeOwned {
    /// Every recognized key with its expected shape
    const SHAPES: &'static [(&'static str, FilterShape)];

    fn matches(&self, record: &R) -> bool;
}

/// Decode untyped JSON filters, checking every key's shape first
pub fn parse_filters<R, F: RecordFilter<R>>(raw: &Value) -> Result<F> {
    let map = match raw {
        Value::Null => return Ok(F::default()),
        Value::Object(map) => map,
        _ => {
            return Err(ScmError::Validation(
                "filters must be a JSON object".to_string(),
            ))
        },
    };

    for (key, value) in map {
        let Some((_, shape)) = F::SHAPES.iter().find(|(name, _)| name == key) else {
            return Err(ScmError::Validation(format!("unknown filter '{}'", key)));
        };
        if !shape.accepts(value) {
            return Err(ScmError::InvalidFilterType {
                key: key.clone(),
                expected: *shape,
            });
        }
    }

    serde_json::from_value(raw.clone()).map_err(|e| ScmError::Validation(format!("filters: {}", e)))
}

/// Filters that apply to every resource type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFilter {
    /// Keep only records whose container equals the queried one
    pub exact_match: bool,
    pub exclude_folders: Vec<String>,
    pub exclude_snippets: Vec<String>,
    pub exclude_devices: Vec<String>,
}

impl PostFilter {
    fn keeps<R: Record>(&self, record: &R, scope: &ContainerScope) -> bool {
        let location = record.location();

        if self.exact_match && location.get(scope.kind()) != Some(scope.value()) {
            return false;
        }

        let excluded = [
            (ScopeKind::Folder, &self.exclude_folders),
            (ScopeKind::Snippet, &self.exclude_snippets),
            (ScopeKind::Device, &self.exclude_devices),
        ];
        !excluded.iter().any(|(kind, list)| {
            location
                .get(*kind)
                .map(|value| list.iter().any(|x| x == value))
                .unwrap_or(false)
        })
    }
}

/// Apply the typed filter and post-filters, returning the survivors in order
pub fn apply<R, F>(records: &[R], filter: &F, post: &PostFilter, scope: &ContainerScope) -> Vec<R>
where
    R: Record,
    F: RecordFilter<R>,
{
    records
        .iter()
        .filter(|record| filter.matches(record) && post.keeps(*record, scope))
        .cloned()
        .collect()
}

// =============================================================================
// Matching helpers shared by the per-resource filters
// =============================================================================

/// An unset filter accepts everything
pub fn unset_or<T: ?Sized>(wanted: Option<&T>, pred: impl FnOnce(&T) -> bool) -> bool {
    wanted.map_or(true, pred)
}

/// Scalar field equals any wanted value
pub fn any_eq(field: Option<&str>, wanted: &[String]) -> bool {
    field.map(|f| wanted.iter().any(|w| w == f)).unwrap_or(false)
}

/// Collection field shares at least one value with `wanted`
pub fn intersects(field: &[String], wanted: &[String]) -> bool {
    field.iter().any(|f| wanted.contains(f))
}

/// Boolean field, absent counting as false
pub fn bool_eq(field: Option<bool>, wanted: bool) -> bool {
    field.unwrap_or(false) == wanted
}
