//! Record set failover chains

use serde::{Deserialize, Serialize};

use super::{Entity, PublishBlock, RecordSet, null_as_default, require_label};
use crate::codec;

/// Ordered list of record sets tried in priority order within a pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSetFailoverChain {
    #[serde(rename = "dsf_record_set_failover_chain_id")]
    pub id: String,

    pub label: String,

    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    /// Part of the pool's core set
    #[serde(with = "codec::literal_bool")]
    pub core: bool,

    #[serde(rename = "dsf_response_pool_id", deserialize_with = "null_as_default")]
    pub response_pool_id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub service_id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub pending_change: String,

    #[serde(deserialize_with = "null_as_default")]
    pub record_sets: Vec<RecordSet>,
}

impl Entity for RecordSetFailoverChain {
    const KIND: &'static str = "record set failover chain";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RsfcAttrs {
    pub label: String,
}

impl RsfcAttrs {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        require_label(RecordSetFailoverChain::KIND, &self.label)
    }
}

/// Body of `POST DSFRecordSetFailoverChain/<svc>/<pool>` and its update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsfcRequest {
    #[serde(flatten)]
    pub publish: PublishBlock,

    pub label: String,
}

impl RsfcRequest {
    pub fn new(attrs: &RsfcAttrs, publish: PublishBlock) -> Self {
        Self {
            publish,
            label: attrs.label.clone(),
        }
    }
}
