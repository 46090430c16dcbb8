//! Page Fetcher
//!
//! Walks a collection endpoint with `limit`/`offset` until the server
//! returns a page shorter than the requested limit.

use super::scope::ContainerScope;
use crate::client::ScmClient;
use crate::error::{Result, ScmError};
use serde_json::Value;

/// One page of raw records
#[derive(Debug)]
pub struct Page {
    pub items: Vec<Value>,
    /// The page held exactly `limit` records, so another one may follow
    pub full: bool,
}

impl Page {
    /// Extract the `data` array from a list response
    pub fn from_response(response: Value, limit: u32) -> Result<Self> {
        let Value::Object(mut map) = response else {
            return Err(ScmError::InvalidResponseShape(
                "expected dictionary".to_string(),
            ));
        };

        let items = match map.remove("data") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ScmError::InvalidResponseShape(
                    "'data' field must be a list".to_string(),
                ))
            },
            None => {
                return Err(ScmError::InvalidResponseShape(
                    "missing 'data' field".to_string(),
                ))
            },
        };

        let full = items.len() >= limit as usize;
        Ok(Self { items, full })
    }
}

/// Fetches every page of a collection for one container
pub struct PageFetcher<'a> {
    client: &'a ScmClient,
    endpoint: &'a str,
    limit: u32,
    extra_params: &'a [(String, String)],
}

impl<'a> PageFetcher<'a> {
    pub fn new(client: &'a ScmClient, endpoint: &'a str, limit: u32) -> Self {
        Self {
            client,
            endpoint,
            limit,
            extra_params: &[],
        }
    }

    /// Query parameters sent with every page request
    pub fn with_params(mut self, params: &'a [(String, String)]) -> Self {
        self.extra_params = params;
        self
    }

    /// Fetch all resources (auto-paginate), preserving server order
    pub async fn fetch_all(&self, scope: &ContainerScope) -> Result<Vec<Value>> {
        let mut all_items = Vec::new();
        let mut offset: u64 = 0;
        let mut requests = 0usize;

        loop {
            let page = self.fetch_page(scope, offset).await?;
            requests += 1;

            let full = page.full;
            all_items.extend(page.items);

            if !full {
                break;
            }
            offset += u64::from(self.limit);
        }

        tracing::debug!(
            "Fetched {} records from {} in {} request(s)",
            all_items.len(),
            self.endpoint,
            requests
        );

        Ok(all_items)
    }

    /// Fetch one page of resources
    pub async fn fetch_page(&self, scope: &ContainerScope, offset: u64) -> Result<Page> {
        let mut params = Vec::with_capacity(self.extra_params.len() + 3);
        params.push(scope.query_pair());
        params.extend(self.extra_params.iter().cloned());
        params.push(("limit".to_string(), self.limit.to_string()));
        params.push(("offset".to_string(), offset.to_string()));

        let response = self.client.get(self.endpoint, &params).await?;
        Page::from_response(response, self.limit)
    }
}
