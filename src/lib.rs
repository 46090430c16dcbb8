//! Typed client for the Strata Cloud Manager configuration API.
//!
//! Every resource type (addresses, address groups, tags, services, security
//! rules, NAT rules) is served by one generic [`ResourceService`], which
//! validates the container scope, paginates list calls, applies client-side
//! filters and resolves fetch-by-name responses.
//!
//! ```ignore
//! use scm_client::{Config, ScmClient, resource::ListQuery};
//!
//! #[tokio::main]
//! async fn main() -> scm_client::Result<()> {
//!     let config = Config::load()?.merge_env();
//!     let client = ScmClient::from_config(&config)?;
//!     let tags = client.tags()?.list(&ListQuery::folder("Texas")).await?;
//!     println!("{} tags", tags.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod resource;

pub use client::auth::Credentials;
pub use client::ScmClient;
pub use config::Config;
pub use error::{ApiError, Result, ScmError};
pub use resource::{FetchPolicy, ListQuery, Location, ResourceService};
