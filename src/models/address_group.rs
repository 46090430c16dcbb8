//! Address groups (`/config/objects/v1/address-groups`)

use super::{at_most_one, exactly_one, validate_name};
use crate::error::Result;
use crate::resource::filter::{intersects, unset_or, FilterShape, RecordFilter};
use crate::resource::{CreatePayload, Location, Record, Resource, UpdatePayload};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag-expression membership, e.g. `'web' and 'prod'`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicFilter {
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressGroup {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(rename = "static", default, skip_serializing_if = "Option::is_none")]
    pub static_members: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<DynamicFilter>,
    #[serde(flatten)]
    pub location: Location,
}

impl AddressGroup {
    pub fn group_type(&self) -> Option<AddressGroupType> {
        match (&self.static_members, &self.dynamic) {
            (Some(_), _) => Some(AddressGroupType::Static),
            (None, Some(_)) => Some(AddressGroupType::Dynamic),
            (None, None) => None,
        }
    }

    pub fn to_update(&self) -> AddressGroupUpdate {
        AddressGroupUpdate::new(self.id)
    }
}

impl Record for AddressGroup {
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

impl Resource for AddressGroup {
    const ENDPOINT: &'static str = "/config/objects/v1/address-groups";
    const KIND: &'static str = "address group";

    type Record = AddressGroup;
    type Create = AddressGroupCreate;
    type Update = AddressGroupUpdate;
    type Filter = AddressGroupFilter;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressGroupCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(rename = "static", default, skip_serializing_if = "Option::is_none")]
    pub static_members: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<DynamicFilter>,
    #[serde(flatten)]
    pub location: Location,
}

impl CreatePayload for AddressGroupCreate {
    fn location(&self) -> &Location {
        &self.location
    }

    fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        exactly_one(
            "address group",
            &[
                ("static", self.static_members.is_some()),
                ("dynamic", self.dynamic.is_some()),
            ],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressGroupUpdate {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<String>>,
    #[serde(rename = "static", default, skip_serializing_if = "Option::is_none")]
    pub static_members: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<DynamicFilter>,
}

impl AddressGroupUpdate {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

impl UpdatePayload for AddressGroupUpdate {
    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        at_most_one(
            "address group update",
            &[
                ("static", self.static_members.is_some()),
                ("dynamic", self.dynamic.is_some()),
            ],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressGroupType {
    Static,
    Dynamic,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AddressGroupFilter {
    pub types: Option<Vec<AddressGroupType>>,
    /// Static member names
    pub values: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl RecordFilter<AddressGroup> for AddressGroupFilter {
    const SHAPES: &'static [(&'static str, FilterShape)] = &[
        ("types", FilterShape::List),
        ("values", FilterShape::List),
        ("tags", FilterShape::List),
    ];

    fn matches(&self, record: &AddressGroup) -> bool {
        unset_or(self.types.as_deref(), |types| {
            record.group_type().map(|t| types.contains(&t)).unwrap_or(false)
        }) && unset_or(self.values.as_deref(), |values| {
            record
                .static_members
                .as_deref()
                .map(|members| intersects(members, values))
                .unwrap_or(false)
        }) && unset_or(self.tags.as_deref(), |tags| intersects(&record.tag, tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_static_alias_round_trips_on_the_wire() {
        let create = AddressGroupCreate {
            name: "web-servers".to_string(),
            static_members: Some(vec!["web-01".to_string(), "web-02".to_string()]),
            location: Location::folder("Texas"),
            ..AddressGroupCreate::default()
        };
        assert!(create.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&create).unwrap(),
            json!({"name": "web-servers", "static": ["web-01", "web-02"], "folder": "Texas"})
        );
    }

    #[test]
    fn test_create_requires_static_or_dynamic() {
        let mut create = AddressGroupCreate {
            name: "g".to_string(),
            location: Location::folder("Texas"),
            ..AddressGroupCreate::default()
        };
        assert!(create.validate().is_err());

        create.dynamic = Some(DynamicFilter {
            filter: "'web'".to_string(),
        });
        assert!(create.validate().is_ok());

        create.static_members = Some(vec!["a".to_string()]);
        assert!(create.validate().is_err());
    }

    #[test]
    fn test_filter_by_type_and_member() {
        let group: AddressGroup = serde_json::from_value(json!({
            "id": "123e4567-e89b-12d3-a456-426655440000",
            "name": "g",
            "static": ["web-01"],
            "snippet": "baseline"
        }))
        .unwrap();

        let dynamic_only = AddressGroupFilter {
            types: Some(vec![AddressGroupType::Dynamic]),
            ..AddressGroupFilter::default()
        };
        assert!(!dynamic_only.matches(&group));

        let by_member = AddressGroupFilter {
            values: Some(vec!["web-01".to_string()]),
            ..AddressGroupFilter::default()
        };
        assert!(by_member.matches(&group));
    }
}
