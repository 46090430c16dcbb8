//! Authentication
//!
//! Supports a static bearer token or the OAuth2 client-credentials grant
//! against the tenant service group (TSG) token endpoint.

use crate::error::{Result, ScmError};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default OAuth2 token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://auth.apps.paloaltonetworks.com/am/oauth2/access_token";

/// Token expiry buffer - refresh tokens this much before they actually expire
/// This prevents using tokens that are about to expire during a request
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if the token endpoint omits `expires_in`
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// How the client authenticates
#[derive(Clone)]
pub enum Credentials {
    /// Pre-issued access token, used as-is
    Bearer(String),
    /// OAuth2 client-credentials grant scoped to a tenant service group
    ClientCredentials {
        client_id: String,
        client_secret: String,
        tsg_id: String,
        token_url: String,
    },
}

impl std::fmt::Debug for Credentials {
    // Secrets never end up in logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Bearer(_) => f.write_str("Bearer(***)"),
            Credentials::ClientCredentials {
                client_id,
                tsg_id,
                token_url,
                ..
            } => f
                .debug_struct("ClientCredentials")
                .field("client_id", client_id)
                .field("tsg_id", tsg_id)
                .field("token_url", token_url)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Credentials holder with token caching
#[derive(Clone)]
pub struct TokenProvider {
    credentials: Credentials,
    http: Client,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenProvider {
    pub fn new(credentials: Credentials, http: Client) -> Self {
        Self {
            credentials,
            http,
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Get an access token for API calls
    pub async fn get_token(&self) -> Result<String> {
        let (client_id, client_secret, tsg_id, token_url) = match &self.credentials {
            Credentials::Bearer(token) => return Ok(token.clone()),
            Credentials::ClientCredentials {
                client_id,
                client_secret,
                tsg_id,
                token_url,
            } => (client_id, client_secret, tsg_id, token_url),
        };

        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let scope = format!("tsg_id:{}", tsg_id);
        let response = self
            .http
            .post(token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials"), ("scope", scope.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScmError::Auth(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ScmError::Auth(format!("malformed token response: {}", e)))?;

        let ttl = token
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL);
        let expires_at = Instant::now() + ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.access_token.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New token cached for tsg {}, expires in ~{}s",
            tsg_id,
            ttl.saturating_sub(TOKEN_EXPIRY_BUFFER).as_secs()
        );

        Ok(token.access_token)
    }

    /// Force refresh the token
    pub async fn refresh_token(&self) -> Result<String> {
        {
            let mut cache = self.token_cache.write().await;
            *cache = None;
        }

        self.get_token().await
    }
}
