//! API client
//!
//! Combines authentication and HTTP functionality, and hands out typed
//! resource services.
//!
//! - [`auth`] - static bearer token or OAuth2 client-credentials with token caching
//! - [`http`] - HTTP utilities for REST API calls

pub mod auth;
pub mod http;

use crate::config::Config;
use crate::error::{Result, ScmError};
use crate::models::{Address, AddressGroup, NatRule, SecurityRule, Service, Tag};
use crate::resource::{FetchPolicy, Resource, ResourceService};
use auth::{Credentials, TokenProvider};
use http::HttpClient;
use serde_json::Value;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.strata.paloaltonetworks.com";

/// Main API client
#[derive(Clone)]
pub struct ScmClient {
    pub http: HttpClient,
    tokens: TokenProvider,
    base_url: String,
    max_limit: Option<u32>,
    fetch_policy: FetchPolicy,
}

impl ScmClient {
    /// Create a new client against `base_url`
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| ScmError::Validation(format!("invalid base url '{}': {}", base_url, e)))?;

        let http = HttpClient::new()?;
        let tokens = TokenProvider::new(credentials, http.inner().clone());

        Ok(Self {
            http,
            tokens,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            max_limit: None,
            fetch_policy: FetchPolicy::default(),
        })
    }

    /// Create a client from a resolved configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.credentials()?;
        let mut client = Self::new(&config.effective_base_url(), credentials)?;
        client.max_limit = config.max_limit;
        if config.strict_fetch {
            client.fetch_policy = FetchPolicy::Strict;
        }
        Ok(client)
    }

    /// Page size handed to every service created from this client
    pub fn with_max_limit(mut self, max_limit: Option<u32>) -> Self {
        self.max_limit = max_limit;
        self
    }

    /// Fetch policy handed to every service created from this client
    pub fn with_fetch_policy(mut self, policy: FetchPolicy) -> Self {
        self.fetch_policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String> {
        self.tokens.get_token().await
    }

    /// Force a new access token
    pub async fn refresh_token(&self) -> Result<String> {
        self.tokens.refresh_token().await
    }

    /// GET `path` with query parameters
    pub async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        let token = self.get_token().await?;
        let url = http::with_query(&self.url(path), params);
        self.http.get(&url, &token).await
    }

    /// POST a JSON body to `path`
    pub async fn post(&self, path: &str, params: &[(String, String)], body: &Value) -> Result<Value> {
        let token = self.get_token().await?;
        let url = http::with_query(&self.url(path), params);
        self.http.post(&url, &token, body).await
    }

    /// PUT a JSON body to `path`
    pub async fn put(&self, path: &str, params: &[(String, String)], body: &Value) -> Result<Value> {
        let token = self.get_token().await?;
        let url = http::with_query(&self.url(path), params);
        self.http.put(&url, &token, body).await
    }

    /// DELETE `path`
    pub async fn delete(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        let token = self.get_token().await?;
        let url = http::with_query(&self.url(path), params);
        self.http.delete(&url, &token).await
    }

    // =========================================================================
    // Resource services
    // =========================================================================

    /// Service for any resource type, configured with this client's defaults
    pub fn service<R: Resource>(&self) -> Result<ResourceService<R>> {
        Ok(ResourceService::new(self.clone(), self.max_limit)?.with_fetch_policy(self.fetch_policy))
    }

    pub fn addresses(&self) -> Result<ResourceService<Address>> {
        self.service()
    }

    pub fn address_groups(&self) -> Result<ResourceService<AddressGroup>> {
        self.service()
    }

    pub fn tags(&self) -> Result<ResourceService<Tag>> {
        self.service()
    }

    pub fn services(&self) -> Result<ResourceService<Service>> {
        self.service()
    }

    pub fn security_rules(&self) -> Result<ResourceService<SecurityRule>> {
        self.service()
    }

    pub fn nat_rules(&self) -> Result<ResourceService<NatRule>> {
        self.service()
    }
}
