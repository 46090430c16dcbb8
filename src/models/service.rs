//! Service objects (`/config/objects/v1/services`)

use super::{exactly_one, validate_name};
use crate::error::{Result, ScmError};
use crate::resource::filter::{intersects, unset_or, FilterShape, RecordFilter};
use crate::resource::{CreatePayload, Location, Record, Resource, UpdatePayload};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Comma-separated ports or ranges, e.g. `80,443,8000-8080`
    pub port: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protocol {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp: Option<PortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp: Option<PortSpec>,
}

impl Protocol {
    pub fn tcp(port: impl Into<String>) -> Self {
        Self {
            tcp: Some(PortSpec {
                port: port.into(),
                source_port: None,
            }),
            udp: None,
        }
    }

    pub fn udp(port: impl Into<String>) -> Self {
        Self {
            tcp: None,
            udp: Some(PortSpec {
                port: port.into(),
                source_port: None,
            }),
        }
    }

    pub fn kind(&self) -> Option<ProtocolKind> {
        match (&self.tcp, &self.udp) {
            (Some(_), None) => Some(ProtocolKind::Tcp),
            (None, Some(_)) => Some(ProtocolKind::Udp),
            _ => None,
        }
    }

    fn validate(&self) -> Result<()> {
        exactly_one(
            "service protocol",
            &[("tcp", self.tcp.is_some()), ("udp", self.udp.is_some())],
        )?;
        let spec = self.tcp.as_ref().or(self.udp.as_ref());
        if spec.map(|s| s.port.trim().is_empty()).unwrap_or(true) {
            return Err(ScmError::MissingParameter { field: "port" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolKind {
    Tcp,
    Udp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(flatten)]
    pub location: Location,
}

impl Service {
    pub fn to_update(&self) -> ServiceUpdate {
        ServiceUpdate::new(self.id)
    }
}

impl Record for Service {
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

impl Resource for Service {
    const ENDPOINT: &'static str = "/config/objects/v1/services";
    const KIND: &'static str = "service";

    type Record = Service;
    type Create = ServiceCreate;
    type Update = ServiceUpdate;
    type Filter = ServiceFilter;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub protocol: Protocol,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(flatten)]
    pub location: Location,
}

impl CreatePayload for ServiceCreate {
    fn location(&self) -> &Location {
        &self.location
    }

    fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        self.protocol.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceUpdate {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<String>>,
}

impl ServiceUpdate {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

impl UpdatePayload for ServiceUpdate {
    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        match &self.protocol {
            Some(protocol) => protocol.validate(),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceFilter {
    pub protocols: Option<Vec<ProtocolKind>>,
    pub tags: Option<Vec<String>>,
}

impl RecordFilter<Service> for ServiceFilter {
    const SHAPES: &'static [(&'static str, FilterShape)] = &[
        ("protocols", FilterShape::List),
        ("tags", FilterShape::List),
    ];

    fn matches(&self, record: &Service) -> bool {
        unset_or(self.protocols.as_deref(), |protocols| {
            record
                .protocol
                .kind()
                .map(|k| protocols.contains(&k))
                .unwrap_or(false)
        }) && unset_or(self.tags.as_deref(), |tags| intersects(&record.tag, tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_protocol_requires_exactly_one_port_spec() {
        assert!(Protocol::tcp("443").validate().is_ok());
        assert!(Protocol::default().validate().is_err());

        let both = Protocol {
            tcp: Some(PortSpec {
                port: "80".to_string(),
                source_port: None,
            }),
            udp: Some(PortSpec {
                port: "53".to_string(),
                source_port: None,
            }),
        };
        assert!(both.validate().is_err());

        assert!(matches!(
            Protocol::udp(" ").validate(),
            Err(ScmError::MissingParameter { field: "port" })
        ));
    }

    #[test]
    fn test_record_and_protocol_filter() {
        let service: Service = serde_json::from_value(json!({
            "id": "123e4567-e89b-12d3-a456-426655440000",
            "name": "dns",
            "protocol": {"udp": {"port": "53"}},
            "folder": "Shared"
        }))
        .unwrap();
        assert_eq!(service.protocol.kind(), Some(ProtocolKind::Udp));

        let tcp_only = ServiceFilter {
            protocols: Some(vec![ProtocolKind::Tcp]),
            ..ServiceFilter::default()
        };
        assert!(!tcp_only.matches(&service));

        let udp = ServiceFilter {
            protocols: Some(vec![ProtocolKind::Udp, ProtocolKind::Tcp]),
            ..ServiceFilter::default()
        };
        assert!(udp.matches(&service));
    }
}
