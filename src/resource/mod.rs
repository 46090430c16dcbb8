//! Generic resource access
//!
//! Every resource type shares one access pattern, implemented once here and
//! parameterized by a [`Resource`] descriptor.
//!
//! # Architecture
//!
//! - [`scope`] - exactly-one-of folder/snippet/device validation
//! - [`pager`] - `limit`/`offset` pagination until a short page
//! - [`filter`] - typed client-side filters and container post-filters
//! - [`fetch`] - resolves the three by-name response layouts to one record
//! - [`service`] - [`ResourceService`] wiring the above into CRUD, list and fetch
//!
//! # Example
//!
//! ```ignore
//! use scm_client::models::AddressFilter;
//! use scm_client::resource::{ListQuery, Location};
//!
//! async fn web_addresses(client: &scm_client::ScmClient) -> scm_client::Result<()> {
//!     let addresses = client.addresses()?;
//!     let query = ListQuery::folder("Texas")
//!         .exclude_folders(["All"])
//!         .filter(AddressFilter { tags: Some(vec!["web".into()]), ..Default::default() });
//!     for address in addresses.list(&query).await? {
//!         println!("{} {}", address.id, address.name);
//!     }
//!     let one = addresses.fetch("web-01", &Location::folder("Texas")).await?;
//!     println!("{:?}", one);
//!     Ok(())
//! }
//! ```

pub mod fetch;
pub mod filter;
pub mod model;
pub mod pager;
pub mod scope;
pub mod service;

pub use fetch::{disambiguate, FetchPolicy, FetchResponse};
pub use filter::{apply, parse_filters, FilterShape, PostFilter, RecordFilter};
pub use model::{CreatePayload, Record, Resource, UpdatePayload};
pub use pager::{Page, PageFetcher};
pub use scope::{ContainerScope, Location, ScopeKind};
pub use service::{ListQuery, ResourceService};
