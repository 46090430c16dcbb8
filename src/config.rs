//! Configuration Management
//!
//! Settings come from CLI flags, then `SCM_*` environment variables, then
//! `<config_dir>/scm/config.json`, then built-in defaults.

use crate::client::auth::{Credentials, DEFAULT_TOKEN_URL};
use crate::client::DEFAULT_BASE_URL;
use crate::error::{Result, ScmError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token_url: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Tenant service group the OAuth2 scope is issued for
    #[serde(default)]
    pub tsg_id: Option<String>,
    /// Pre-issued token; takes precedence over client credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Page size for list calls
    #[serde(default)]
    pub max_limit: Option<u32>,
    /// Fail instead of picking the first match when a name is ambiguous
    #[serde(default)]
    pub strict_fetch: bool,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scm").join("config.json"))
    }

    /// Load configuration from the default path, defaults when absent
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`, defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ScmError::Validation(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| ScmError::Validation(format!("parse {}: {}", path.display(), e)))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |e: std::io::Error| ScmError::Validation(format!("write {}: {}", path.display(), e));

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ScmError::Validation(format!("serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(io_err)
    }

    /// Overlay values from the process environment
    pub fn merge_env(self) -> Self {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`, ignoring empty strings
    pub fn merge_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("SCM_BASE_URL") {
            self.base_url = Some(v);
        }
        if let Some(v) = get("SCM_TOKEN_URL") {
            self.token_url = Some(v);
        }
        if let Some(v) = get("SCM_CLIENT_ID") {
            self.client_id = Some(v);
        }
        if let Some(v) = get("SCM_CLIENT_SECRET") {
            self.client_secret = Some(v);
        }
        if let Some(v) = get("SCM_TSG_ID") {
            self.tsg_id = Some(v);
        }
        if let Some(v) = get("SCM_ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
        self
    }

    /// Get effective base URL (explicit > default)
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get effective token URL (explicit > default)
    pub fn effective_token_url(&self) -> String {
        self.token_url
            .clone()
            .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string())
    }

    /// Build credentials: access token if present, else client credentials
    pub fn credentials(&self) -> Result<Credentials> {
        if let Some(token) = &self.access_token {
            return Ok(Credentials::Bearer(token.clone()));
        }

        let missing = |field: &'static str| ScmError::Auth(format!("{} is not configured", field));
        Ok(Credentials::ClientCredentials {
            client_id: self.client_id.clone().ok_or_else(|| missing("client_id"))?,
            client_secret: self
                .client_secret
                .clone()
                .ok_or_else(|| missing("client_secret"))?,
            tsg_id: self.tsg_id.clone().ok_or_else(|| missing("tsg_id"))?,
            token_url: self.effective_token_url(),
        })
    }
}
