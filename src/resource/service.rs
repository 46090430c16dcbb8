//! Resource Service
//!
//! One generic service implements create/get/update/delete/list/fetch for
//! every resource type, driven by its [`Resource`] descriptor.

use super::fetch::{disambiguate, FetchPolicy};
use super::filter::{self, parse_filters, PostFilter};
use super::model::{CreatePayload, Resource, UpdatePayload};
use super::pager::PageFetcher;
use super::scope::{ContainerScope, Location};
use crate::client::ScmClient;
use crate::error::{Result, ScmError};
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use uuid::Uuid;

/// Arguments of a list call
#[derive(Debug, Clone, Default)]
pub struct ListQuery<F> {
    pub location: Location,
    pub post: PostFilter,
    pub filter: F,
}

impl<F: Default> ListQuery<F> {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            post: PostFilter::default(),
            filter: F::default(),
        }
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self::new(Location::folder(name))
    }

    pub fn snippet(name: impl Into<String>) -> Self {
        Self::new(Location::snippet(name))
    }

    pub fn device(name: impl Into<String>) -> Self {
        Self::new(Location::device(name))
    }

    pub fn exact_match(mut self) -> Self {
        self.post.exact_match = true;
        self
    }

    pub fn exclude_folders<I, S>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.post.exclude_folders = folders.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_snippets<I, S>(mut self, snippets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.post.exclude_snippets = snippets.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.post.exclude_devices = devices.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(mut self, filter: F) -> Self {
        self.filter = filter;
        self
    }
}

/// Typed CRUD + list + fetch for one resource type
pub struct ResourceService<R: Resource> {
    client: ScmClient,
    max_limit: u32,
    fetch_policy: FetchPolicy,
    params: Vec<(String, String)>,
    _resource: PhantomData<R>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            max_limit: self.max_limit,
            fetch_policy: self.fetch_policy,
            params: self.params.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(client: ScmClient, max_limit: Option<u32>) -> Result<Self> {
        Ok(Self {
            client,
            max_limit: Self::validate_max_limit(max_limit)?,
            fetch_policy: FetchPolicy::default(),
            params: Vec::new(),
            _resource: PhantomData,
        })
    }

    /// Absent means the default; above the absolute maximum is clamped
    fn validate_max_limit(limit: Option<u32>) -> Result<u32> {
        match limit {
            None => Ok(R::DEFAULT_MAX_LIMIT),
            Some(0) => Err(ScmError::InvalidLimit),
            Some(n) if n > R::ABSOLUTE_MAX_LIMIT => {
                tracing::warn!(
                    "max_limit {} for {} exceeds {}, clamping",
                    n,
                    R::KIND,
                    R::ABSOLUTE_MAX_LIMIT
                );
                Ok(R::ABSOLUTE_MAX_LIMIT)
            },
            Some(n) => Ok(n),
        }
    }

    pub fn with_fetch_policy(mut self, policy: FetchPolicy) -> Self {
        self.fetch_policy = policy;
        self
    }

    /// Add a query parameter sent with every request of this service
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.params.retain(|(k, _)| *k != key);
        self.params.push((key, value.into()));
        self
    }

    pub fn max_limit(&self) -> u32 {
        self.max_limit
    }

    /// Change the page size used by subsequent list calls
    pub fn set_max_limit(&mut self, limit: Option<u32>) -> Result<()> {
        self.max_limit = Self::validate_max_limit(limit)?;
        Ok(())
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        self.fetch_policy
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    fn item_path(id: Uuid) -> String {
        format!("{}/{}", R::ENDPOINT, id)
    }

    fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|source| ScmError::Decode {
            kind: R::KIND,
            source,
        })
    }

    /// Serialize a model, omitting unset fields
    fn to_body<T: Serialize>(model: &T) -> Result<Value> {
        serde_json::to_value(model).map_err(|e| ScmError::Validation(format!("serialize {}: {}", R::KIND, e)))
    }

    /// Create a new object
    pub async fn create(&self, data: &R::Create) -> Result<R::Record> {
        ContainerScope::resolve(data.location())?;
        data.validate()?;

        let body = Self::to_body(data)?;
        let response = self.client.post(R::ENDPOINT, &self.params, &body).await?;
        Self::decode(response)
    }

    /// Get an object by id
    pub async fn get(&self, id: Uuid) -> Result<R::Record> {
        let response = self.client.get(&Self::item_path(id), &self.params).await?;
        Self::decode(response)
    }

    /// Update an existing object, sending only the fields that were set
    pub async fn update(&self, data: &R::Update) -> Result<R::Record> {
        if data.id().is_nil() {
            return Err(ScmError::MissingParameter { field: "id" });
        }
        data.validate()?;

        let mut body = Self::to_body(data)?;
        if let Value::Object(ref mut map) = body {
            map.remove("id");
        }

        let response = self
            .client
            .put(&Self::item_path(data.id()), &self.params, &body)
            .await?;
        Self::decode(response)
    }

    /// Delete an object by id
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.client.delete(&Self::item_path(id), &self.params).await?;
        Ok(())
    }

    /// List objects in one container, then apply client-side filters
    pub async fn list(&self, query: &ListQuery<R::Filter>) -> Result<Vec<R::Record>> {
        let scope = ContainerScope::resolve(&query.location)?;

        let raw = PageFetcher::new(&self.client, R::ENDPOINT, self.max_limit)
            .with_params(&self.params)
            .fetch_all(&scope)
            .await?;

        let records = raw
            .into_iter()
            .map(Self::decode::<R::Record>)
            .collect::<Result<Vec<R::Record>>>()?;

        Ok(filter::apply(&records, &query.filter, &query.post, &scope))
    }

    /// List with filters given as untyped JSON, shape-checked before any request
    pub async fn list_with_filters(
        &self,
        mut query: ListQuery<R::Filter>,
        filters: &Value,
    ) -> Result<Vec<R::Record>> {
        query.filter = parse_filters::<R::Record, R::Filter>(filters)?;
        self.list(&query).await
    }

    /// Fetch a single object by name
    pub async fn fetch(&self, name: &str, location: &Location) -> Result<R::Record> {
        if name.is_empty() {
            return Err(ScmError::MissingParameter { field: "name" });
        }
        let scope = ContainerScope::resolve(location)?;

        let mut params = vec![scope.query_pair()];
        params.extend(self.params.iter().cloned());
        params.push(("name".to_string(), name.to_string()));

        let response = self.client.get(R::ENDPOINT, &params).await?;
        let record = disambiguate(response, R::KIND, name, self.fetch_policy)?;
        Self::decode(record)
    }
}
