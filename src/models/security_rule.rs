//! Security rules (`/config/security/v1/security-rules`)
//!
//! Rules live in a pre- or post-rulebase, selected with the `position`
//! query parameter on every request. List-valued match fields default to
//! `["any"]` server-side and are only sent when set.

use super::validate_name;
use crate::error::Result;
use crate::resource::filter::{any_eq, bool_eq, intersects, unset_or, FilterShape, RecordFilter};
use crate::resource::{CreatePayload, Location, Record, Resource, ResourceService, UpdatePayload};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rulebase {
    #[default]
    Pre,
    Post,
}

impl Rulebase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rulebase::Pre => "pre",
            Rulebase::Post => "post",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleAction {
    Allow,
    Deny,
    Drop,
    ResetClient,
    ResetServer,
    ResetBoth,
}

impl RuleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleAction::Allow => "allow",
            RuleAction::Deny => "deny",
            RuleAction::Drop => "drop",
            RuleAction::ResetClient => "reset-client",
            RuleAction::ResetServer => "reset-server",
            RuleAction::ResetBoth => "reset-both",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSetting {
    #[serde(default)]
    pub group: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityRule {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(rename = "from", default)]
    pub from_zones: Vec<String>,
    #[serde(rename = "to", default)]
    pub to_zones: Vec<String>,
    #[serde(default)]
    pub source: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate_source: Option<bool>,
    #[serde(default)]
    pub source_user: Vec<String>,
    #[serde(default)]
    pub destination: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate_destination: Option<bool>,
    #[serde(default)]
    pub application: Vec<String>,
    #[serde(default)]
    pub service: Vec<String>,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_setting: Option<ProfileSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_setting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_end: Option<bool>,
    #[serde(flatten)]
    pub location: Location,
}

impl SecurityRule {
    pub fn to_update(&self) -> SecurityRuleUpdate {
        SecurityRuleUpdate::new(self.id)
    }
}

impl Record for SecurityRule {
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

impl Resource for SecurityRule {
    const ENDPOINT: &'static str = "/config/security/v1/security-rules";
    const KIND: &'static str = "security rule";

    type Record = SecurityRule;
    type Create = SecurityRuleCreate;
    type Update = SecurityRuleUpdate;
    type Filter = SecurityRuleFilter;
}

impl ResourceService<SecurityRule> {
    /// Target the pre- or post-rulebase
    pub fn with_rulebase(self, rulebase: Rulebase) -> Self {
        self.with_param("position", rulebase.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityRuleCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(rename = "from", default, skip_serializing_if = "Vec::is_empty")]
    pub from_zones: Vec<String>,
    #[serde(rename = "to", default, skip_serializing_if = "Vec::is_empty")]
    pub to_zones: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate_source: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_user: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate_destination: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub application: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_setting: Option<ProfileSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_setting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_end: Option<bool>,
    #[serde(flatten)]
    pub location: Location,
}

impl CreatePayload for SecurityRuleCreate {
    fn location(&self) -> &Location {
        &self.location
    }

    fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityRuleUpdate {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<String>>,
    #[serde(rename = "from", default, skip_serializing_if = "Option::is_none")]
    pub from_zones: Option<Vec<String>>,
    #[serde(rename = "to", default, skip_serializing_if = "Option::is_none")]
    pub to_zones: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate_source: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_user: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate_destination: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_setting: Option<ProfileSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_setting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_end: Option<bool>,
}

impl SecurityRuleUpdate {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

impl UpdatePayload for SecurityRuleUpdate {
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
pub struct SecurityRuleFilter {
    pub action: Option<Vec<String>>,
    pub category: Option<Vec<String>>,
    pub service: Option<Vec<String>>,
    pub application: Option<Vec<String>>,
    pub destination: Option<Vec<String>>,
    pub tag: Option<Vec<String>>,
    pub disabled: Option<bool>,
    /// Security profile group names
    pub profile_setting: Option<Vec<String>>,
    pub log_setting: Option<Vec<String>>,
}

impl RecordFilter<SecurityRule> for SecurityRuleFilter {
    const SHAPES: &'static [(&'static str, FilterShape)] = &[
        ("action", FilterShape::List),
        ("category", FilterShape::List),
        ("service", FilterShape::List),
        ("application", FilterShape::List),
        ("destination", FilterShape::List),
        ("tag", FilterShape::List),
        ("disabled", FilterShape::Bool),
        ("profile_setting", FilterShape::List),
        ("log_setting", FilterShape::List),
    ];

    fn matches(&self, rule: &SecurityRule) -> bool {
        unset_or(self.action.as_deref(), |actions| {
            any_eq(rule.action.map(|a| a.as_str()), actions)
        }) && unset_or(self.category.as_deref(), |c| intersects(&rule.category, c))
            && unset_or(self.service.as_deref(), |s| intersects(&rule.service, s))
            && unset_or(self.application.as_deref(), |a| intersects(&rule.application, a))
            && unset_or(self.destination.as_deref(), |d| intersects(&rule.destination, d))
            && unset_or(self.tag.as_deref(), |t| intersects(&rule.tag, t))
            && unset_or(self.disabled.as_ref(), |d| bool_eq(rule.disabled, *d))
            && unset_or(self.profile_setting.as_deref(), |groups| {
                rule.profile_setting
                    .as_ref()
                    .map(|p| intersects(&p.group, groups))
                    .unwrap_or(false)
            })
            && unset_or(self.log_setting.as_deref(), |l| any_eq(rule.log_setting.as_deref(), l))
    }
}
