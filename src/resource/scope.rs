//! Container scope validation
//!
//! Every resource lives in exactly one container: a folder, a snippet or a
//! device. Requests name that container through one query parameter.

use crate::error::{Result, ScmError};
use serde::{Deserialize, Serialize};

/// Which of the three container fields a scope refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Folder,
    Snippet,
    Device,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Folder => "folder",
            ScopeKind::Snippet => "snippet",
            ScopeKind::Device => "device",
        }
    }
}

/// Raw container triple, as supplied by a caller or carried on a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Location {
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            folder: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn snippet(name: impl Into<String>) -> Self {
        Self {
            snippet: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn device(name: impl Into<String>) -> Self {
        Self {
            device: Some(name.into()),
            ..Self::default()
        }
    }

    /// Value of one container field
    pub fn get(&self, kind: ScopeKind) -> Option<&str> {
        match kind {
            ScopeKind::Folder => self.folder.as_deref(),
            ScopeKind::Snippet => self.snippet.as_deref(),
            ScopeKind::Device => self.device.as_deref(),
        }
    }
}

/// A validated container: exactly one of folder, snippet or device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerScope {
    Folder(String),
    Snippet(String),
    Device(String),
}

impl ContainerScope {
    /// Resolve the single container named by `location`.
    ///
    /// An empty string is reported as a missing parameter, separately from
    /// the zero-or-many check.
    pub fn resolve(location: &Location) -> Result<Self> {
        let fields = [
            (ScopeKind::Folder, location.folder.as_deref()),
            (ScopeKind::Snippet, location.snippet.as_deref()),
            (ScopeKind::Device, location.device.as_deref()),
        ];

        for (kind, value) in fields {
            if value == Some("") {
                return Err(ScmError::MissingParameter {
                    field: kind.as_str(),
                });
            }
        }

        let provided: Vec<(ScopeKind, &str)> = fields
            .into_iter()
            .filter_map(|(kind, value)| value.map(|v| (kind, v)))
            .collect();

        match provided.as_slice() {
            [(kind, value)] => Ok(Self::new(*kind, value)),
            _ => Err(ScmError::InvalidScope {
                provided: provided.iter().map(|(kind, _)| kind.as_str()).collect(),
            }),
        }
    }

    fn new(kind: ScopeKind, value: &str) -> Self {
        match kind {
            ScopeKind::Folder => ContainerScope::Folder(value.to_string()),
            ScopeKind::Snippet => ContainerScope::Snippet(value.to_string()),
            ScopeKind::Device => ContainerScope::Device(value.to_string()),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        match self {
            ContainerScope::Folder(_) => ScopeKind::Folder,
            ContainerScope::Snippet(_) => ScopeKind::Snippet,
            ContainerScope::Device(_) => ScopeKind::Device,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ContainerScope::Folder(v) | ContainerScope::Snippet(v) | ContainerScope::Device(v) => v,
        }
    }

    /// `(scope_name, scope_value)` query pair
    pub fn query_pair(&self) -> (String, String) {
        (self.kind().as_str().to_string(), self.value().to_string())
    }
}
