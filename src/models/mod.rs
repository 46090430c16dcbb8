//! Resource models
//!
//! For each resource type: the record the server returns, the create body,
//! the update body (every field optional, unset fields never serialized),
//! and the typed list filter. Each record type doubles as the
//! [`Resource`](crate::resource::Resource) descriptor for its endpoint.

pub mod address;
pub mod address_group;
pub mod nat_rule;
pub mod security_rule;
pub mod service;
pub mod tag;

pub use address::{Address, AddressCreate, AddressFilter, AddressType, AddressUpdate};
pub use address_group::{
    AddressGroup, AddressGroupCreate, AddressGroupFilter, AddressGroupType, AddressGroupUpdate,
    DynamicFilter,
};
pub use nat_rule::{NatRule, NatRuleCreate, NatRuleFilter, NatRuleUpdate, NatType};
pub use security_rule::{
    ProfileSetting, Rulebase, RuleAction, SecurityRule, SecurityRuleCreate, SecurityRuleFilter,
    SecurityRuleUpdate,
};
pub use service::{PortSpec, Protocol, ProtocolKind, Service, ServiceCreate, ServiceFilter, ServiceUpdate};
pub use tag::{Tag, TagCreate, TagFilter, TagUpdate, TAG_COLORS};

use crate::error::{Result, ScmError};

/// Maximum object name length accepted by the API
pub const MAX_NAME_LENGTH: usize = 63;

/// Names are 1-63 characters of letters, digits, space, `-`, `_` and `.`
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScmError::MissingParameter { field: "name" });
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ScmError::Validation(format!(
            "name '{}' is longer than {} characters",
            name, MAX_NAME_LENGTH
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
    {
        return Err(ScmError::Validation(format!(
            "name '{}' may only contain letters, digits, spaces, '-', '_' and '.'",
            name
        )));
    }
    Ok(())
}

/// Names of the fields in `fields` that are set
fn set_fields<'a>(fields: &[(&'a str, bool)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| *name)
        .collect()
}

/// Exactly one of `fields` must be set
pub(crate) fn exactly_one(what: &str, fields: &[(&str, bool)]) -> Result<()> {
    let set = set_fields(fields);
    if set.len() == 1 {
        return Ok(());
    }
    let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    Err(ScmError::Validation(format!(
        "{} requires exactly one of {:?}, got {:?}",
        what, names, set
    )))
}

/// At most one of `fields` may be set
pub(crate) fn at_most_one(what: &str, fields: &[(&str, bool)]) -> Result<()> {
    let set = set_fields(fields);
    if set.len() <= 1 {
        return Ok(());
    }
    Err(ScmError::Validation(format!(
        "{} accepts at most one of {:?}",
        what, set
    )))
}
