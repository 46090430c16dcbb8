//! Traits describing one resource type to the generic service

use super::filter::RecordFilter;
use super::scope::Location;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use uuid::Uuid;

/// A record as returned by the server
pub trait Record: DeserializeOwned + Serialize + Clone + Debug {
    fn id(&self) -> Uuid;
    fn name(&self) -> &str;
    fn location(&self) -> &Location;
}

/// Body of a create request
pub trait CreatePayload: Serialize + Debug {
    fn location(&self) -> &Location;

    /// Resource-specific rules, run after the container check
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Body of an update request.
///
/// Fields the caller never set serialize to nothing, so the server keeps
/// its current values for them.
pub trait UpdatePayload: Serialize + Debug {
    fn id(&self) -> Uuid;

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Descriptor tying an endpoint to its model and filter types
pub trait Resource {
    /// Collection endpoint, relative to the API base URL
    const ENDPOINT: &'static str;
    /// Human-readable kind used in messages
    const KIND: &'static str;
    const DEFAULT_MAX_LIMIT: u32 = 2500;
    const ABSOLUTE_MAX_LIMIT: u32 = 5000;

    type Record: Record;
    type Create: CreatePayload;
    type Update: UpdatePayload;
    type Filter: RecordFilter<Self::Record>;
}
