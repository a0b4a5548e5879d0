//! Traffic Director service, its nodes and notifiers

use serde::{Deserialize, Serialize};

use super::{Entity, PublishBlock, Ruleset, null_as_default, require_label};
use crate::codec;

/// Top-level Traffic Director service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(rename = "service_id")]
    pub id: String,

    pub label: String,

    #[serde(with = "codec::presence_bool")]
    pub active: bool,

    /// Default TTL inherited by record sets that do not set their own
    #[serde(with = "codec::stringified_int")]
    pub ttl: u32,

    #[serde(deserialize_with = "null_as_default")]
    pub pending_change: String,

    #[serde(deserialize_with = "null_as_default")]
    pub notifiers: Vec<Notifier>,

    #[serde(deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,

    #[serde(deserialize_with = "null_as_default")]
    pub rulesets: Vec<Ruleset>,
}

impl Entity for Service {
    const KIND: &'static str = "service";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A (zone, FQDN) pair served by a service
///
/// Nodes have no identifier: the node list is always replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub zone: String,
    pub fqdn: String,
}

impl Node {
    pub fn new(zone: impl Into<String>, fqdn: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            fqdn: fqdn.into(),
        }
    }
}

/// Notifier attached to a service (read-only here)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notifier {
    pub notifier_id: i64,
    pub label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub recipients: String,
    #[serde(with = "codec::presence_bool")]
    pub active: bool,
}

/// Caller-supplied service attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceAttrs {
    pub label: String,
    /// `None` lets the server pick (create) or keep (update) the TTL
    pub ttl: Option<u32>,
    /// Desired node set; replaces the server's set on every update
    pub nodes: Vec<Node>,
}

impl ServiceAttrs {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        require_label(Service::KIND, &self.label)?;
        for node in &self.nodes {
            if node.zone.is_empty() || node.fqdn.is_empty() {
                return Err(crate::Error::invalid_input(
                    "service node requires both zone and fqdn",
                ));
            }
        }
        Ok(())
    }
}

/// Body of `POST DSF` / `PUT DSF/<id>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRequest {
    #[serde(flatten)]
    pub publish: PublishBlock,

    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none", with = "codec::stringified_int::option")]
    pub ttl: Option<u32>,
}

impl ServiceRequest {
    pub fn new(attrs: &ServiceAttrs, publish: PublishBlock) -> Self {
        Self {
            publish,
            label: attrs.label.clone(),
            ttl: attrs.ttl,
        }
    }
}

/// Body of `PUT DSFNode/<service>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRequest {
    #[serde(flatten)]
    pub publish: PublishBlock,

    pub nodes: Vec<Node>,
}
