//! Address objects (`/config/objects/v1/addresses`)

use super::{at_most_one, exactly_one, validate_name};
use crate::error::Result;
use crate::resource::filter::{any_eq, intersects, unset_or, FilterShape, RecordFilter};
use crate::resource::{CreatePayload, Location, Record, Resource, UpdatePayload};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_netmask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_wildcard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(flatten)]
    pub location: Location,
}

impl Address {
    /// Which address field this object uses
    pub fn address_type(&self) -> Option<AddressType> {
        if self.ip_netmask.is_some() {
            Some(AddressType::Netmask)
        } else if self.ip_range.is_some() {
            Some(AddressType::Range)
        } else if self.ip_wildcard.is_some() {
            Some(AddressType::Wildcard)
        } else if self.fqdn.is_some() {
            Some(AddressType::Fqdn)
        } else {
            None
        }
    }

    /// The address value, whichever field holds it
    pub fn value(&self) -> Option<&str> {
        self.ip_netmask
            .as_deref()
            .or(self.ip_range.as_deref())
            .or(self.ip_wildcard.as_deref())
            .or(self.fqdn.as_deref())
    }

    /// Update body targeting this object with nothing set yet
    pub fn to_update(&self) -> AddressUpdate {
        AddressUpdate::new(self.id)
    }
}

impl Record for Address {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> &Location {
        &self.location
    }
}

impl Resource for Address {
    const ENDPOINT: &'static str = "/config/objects/v1/addresses";
    const KIND: &'static str = "address";

    type Record = Address;
    type Create = AddressCreate;
    type Update = AddressUpdate;
    type Filter = AddressFilter;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_netmask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_wildcard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(flatten)]
    pub location: Location,
}

impl CreatePayload for AddressCreate {
    fn location(&self) -> &Location {
        &self.location
    }

    fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        exactly_one(
            "address",
            &[
                ("ip_netmask", self.ip_netmask.is_some()),
                ("ip_range", self.ip_range.is_some()),
                ("ip_wildcard", self.ip_wildcard.is_some()),
                ("fqdn", self.fqdn.is_some()),
            ],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressUpdate {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_netmask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_wildcard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
}

impl AddressUpdate {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

impl UpdatePayload for AddressUpdate {
    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        at_most_one(
            "address update",
            &[
                ("ip_netmask", self.ip_netmask.is_some()),
                ("ip_range", self.ip_range.is_some()),
                ("ip_wildcard", self.ip_wildcard.is_some()),
                ("fqdn", self.fqdn.is_some()),
            ],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Netmask,
    Range,
    Wildcard,
    Fqdn,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AddressFilter {
    pub types: Option<Vec<AddressType>>,
    /// Matches against whichever address field the object uses
    pub values: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl RecordFilter<Address> for AddressFilter {
    const SHAPES: &'static [(&'static str, FilterShape)] = &[
        ("types", FilterShape::List),
        ("values", FilterShape::List),
        ("tags", FilterShape::List),
    ];

    fn matches(&self, record: &Address) -> bool {
        unset_or(self.types.as_deref(), |types| {
            record.address_type().map(|t| types.contains(&t)).unwrap_or(false)
        }) && unset_or(self.values.as_deref(), |values| any_eq(record.value(), values))
            && unset_or(self.tags.as_deref(), |tags| intersects(&record.tag, tags))
    }
}
