//! NAT rules (`/config/network/v1/nat-rules`)

use super::validate_name;
use crate::error::Result;
use crate::resource::filter::{any_eq, bool_eq, intersects, unset_or, FilterShape, RecordFilter};
use crate::resource::{CreatePayload, Location, Record, Resource, UpdatePayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NatType {
    #[default]
    Ipv4,
    Nat64,
    Nptv6,
}

impl NatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NatType::Ipv4 => "ipv4",
            NatType::Nat64 => "nat64",
            NatType::Nptv6 => "nptv6",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatRule {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_type: Option<NatType>,
    #[serde(rename = "from", default)]
    pub from_zones: Vec<String>,
    #[serde(rename = "to", default)]
    pub to_zones: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default)]
    pub source: Vec<String>,
    #[serde(default)]
    pub destination: Vec<String>,
    /// Kept as sent by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_translation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_translation: Option<Value>,
    #[serde(flatten)]
    pub location: Location,
}

impl NatRule {
    pub fn to_update(&self) -> NatRuleUpdate {
        NatRuleUpdate::new(self.id)
    }
}

impl Record for NatRule {
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

impl Resource for NatRule {
    const ENDPOINT: &'static str = "/config/network/v1/nat-rules";
    const KIND: &'static str = "NAT rule";

    type Record = NatRule;
    type Create = NatRuleCreate;
    type Update = NatRuleUpdate;
    type Filter = NatRuleFilter;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NatRuleCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_type: Option<NatType>,
    #[serde(rename = "from", default, skip_serializing_if = "Vec::is_empty")]
    pub from_zones: Vec<String>,
    #[serde(rename = "to", default, skip_serializing_if = "Vec::is_empty")]
    pub to_zones: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_translation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_translation: Option<Value>,
    #[serde(flatten)]
    pub location: Location,
}

impl CreatePayload for NatRuleCreate {
    fn location(&self) -> &Location {
        &self.location
    }

    fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NatRuleUpdate {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_type: Option<NatType>,
    #[serde(rename = "from", default, skip_serializing_if = "Option::is_none")]
    pub from_zones: Option<Vec<String>>,
    #[serde(rename = "to", default, skip_serializing_if = "Option::is_none")]
    pub to_zones: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_translation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_translation: Option<Value>,
}

impl NatRuleUpdate {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

impl UpdatePayload for NatRuleUpdate {
    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NatRuleFilter {
    pub nat_type: Option<Vec<String>>,
    pub service: Option<Vec<String>>,
    pub destination: Option<Vec<String>>,
    pub source: Option<Vec<String>>,
    pub tag: Option<Vec<String>>,
    pub to_interface: Option<String>,
    pub disabled: Option<bool>,
}

impl RecordFilter<NatRule> for NatRuleFilter {
    const SHAPES: &'static [(&'static str, FilterShape)] = &[
        ("nat_type", FilterShape::List),
        ("service", FilterShape::List),
        ("destination", FilterShape::List),
        ("source", FilterShape::List),
        ("tag", FilterShape::List),
        ("to_interface", FilterShape::Scalar),
        ("disabled", FilterShape::Bool),
    ];

    fn matches(&self, rule: &NatRule) -> bool {
        unset_or(self.nat_type.as_deref(), |types| {
            any_eq(rule.nat_type.map(|t| t.as_str()), types)
        }) && unset_or(self.service.as_deref(), |s| any_eq(rule.service.as_deref(), s))
            && unset_or(self.destination.as_deref(), |d| intersects(&rule.destination, d))
            && unset_or(self.source.as_deref(), |s| intersects(&rule.source, s))
            && unset_or(self.tag.as_deref(), |t| intersects(&rule.tag, t))
            && unset_or(self.to_interface.as_deref(), |i| rule.to_interface.as_deref() == Some(i))
            && unset_or(self.disabled.as_ref(), |d| bool_eq(rule.disabled, *d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(nat_type: &str, service: &str, disabled: Option<bool>) -> NatRule {
        let mut value = json!({
            "id": "123e4567-e89b-12d3-a456-426655440000",
            "name": "outbound",
            "nat_type": nat_type,
            "from": ["trust"],
            "to": ["untrust"],
            "to_interface": "ethernet1/1",
            "service": service,
            "source": ["10.0.0.0/8"],
            "destination": ["any"],
            "source_translation": {"dynamic_ip_and_port": {"interface_address": {"interface": "ethernet1/1"}}},
            "folder": "Texas"
        });
        if let Some(d) = disabled {
            value["disabled"] = json!(d);
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_translation_kept_opaque() {
        let rule = rule("ipv4", "any", None);
        assert!(rule.source_translation.as_ref().unwrap().get("dynamic_ip_and_port").is_some());
        let back = serde_json::to_value(&rule).unwrap();
        assert_eq!(back["from"], json!(["trust"]));
    }

    #[test]
    fn test_filter_by_nat_type_service_and_interface() {
        let rules = [rule("ipv4", "any", None), rule("nat64", "service-http", Some(true))];

        let filter = NatRuleFilter {
            nat_type: Some(vec!["nat64".to_string()]),
            ..NatRuleFilter::default()
        };
        assert!(!filter.matches(&rules[0]));
        assert!(filter.matches(&rules[1]));

        let filter = NatRuleFilter {
            service: Some(vec!["any".to_string()]),
            disabled: Some(false),
            to_interface: Some("ethernet1/1".to_string()),
            ..NatRuleFilter::default()
        };
        assert!(filter.matches(&rules[0]));
        assert!(!filter.matches(&rules[1]));
    }
}
