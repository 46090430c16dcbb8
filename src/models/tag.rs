//! Tags (`/config/objects/v1/tags`)

use crate::error::{Result, ScmError};
use crate::resource::filter::{any_eq, unset_or, FilterShape, RecordFilter};
use crate::resource::{CreatePayload, Location, Record, Resource, UpdatePayload};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Colors the API accepts for a tag
pub const TAG_COLORS: &[&str] = &[
    "Azure Blue",
    "Black",
    "Blue",
    "Blue Gray",
    "Blue Violet",
    "Brown",
    "Burnt Sienna",
    "Cerulean Blue",
    "Chestnut",
    "Cobalt Blue",
    "Copper",
    "Cyan",
    "Forest Green",
    "Gold",
    "Gray",
    "Green",
    "Lavender",
    "Light Gray",
    "Light Green",
    "Lime",
    "Magenta",
    "Mahogany",
    "Maroon",
    "Medium Blue",
    "Medium Rose",
    "Medium Violet",
    "Midnight Blue",
    "Olive",
    "Orange",
    "Orchid",
    "Peach",
    "Purple",
    "Red",
    "Red Violet",
    "Red-Orange",
    "Salmon",
    "Thistle",
    "Turquoise Blue",
    "Violet Blue",
    "Yellow",
    "Yellow-Orange",
];

/// Tag names are free text, longer than object names
const MAX_TAG_NAME_LENGTH: usize = 127;

fn validate_tag_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScmError::MissingParameter { field: "name" });
    }
    if name.chars().count() > MAX_TAG_NAME_LENGTH {
        return Err(ScmError::Validation(format!(
            "tag name is longer than {} characters",
            MAX_TAG_NAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<()> {
    if TAG_COLORS.contains(&color) {
        Ok(())
    } else {
        Err(ScmError::Validation(format!("unknown tag color '{}'", color)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(flatten)]
    pub location: Location,
}

impl Tag {
    pub fn to_update(&self) -> TagUpdate {
        TagUpdate::new(self.id)
    }
}

impl Record for Tag {
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

impl Resource for Tag {
    const ENDPOINT: &'static str = "/config/objects/v1/tags";
    const KIND: &'static str = "tag";

    type Record = Tag;
    type Create = TagCreate;
    type Update = TagUpdate;
    type Filter = TagFilter;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(flatten)]
    pub location: Location,
}

impl CreatePayload for TagCreate {
    fn location(&self) -> &Location {
        &self.location
    }

    fn validate(&self) -> Result<()> {
        validate_tag_name(&self.name)?;
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagUpdate {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl TagUpdate {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

impl UpdatePayload for TagUpdate {
    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_tag_name(name)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TagFilter {
    pub colors: Option<Vec<String>>,
}

impl RecordFilter<Tag> for TagFilter {
    const SHAPES: &'static [(&'static str, FilterShape)] = &[("colors", FilterShape::List)];

    fn matches(&self, record: &Tag) -> bool {
        unset_or(self.colors.as_deref(), |colors| any_eq(record.color.as_deref(), colors))
    }
}
