//! Response pools: one answer-set alternative of a service

use serde::{Deserialize, Serialize};

use super::{
    Automation, Entity, PublishBlock, RecordSetFailoverChain, Ruleset, eligible_for,
    null_as_default, require_automation_for_eligible, require_label,
};
use crate::codec;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsePool {
    #[serde(rename = "dsf_response_pool_id")]
    pub id: String,

    pub label: String,

    #[serde(deserialize_with = "null_as_default")]
    pub automation: Automation,

    #[serde(with = "codec::stringified_int")]
    pub core_set_count: u32,

    #[serde(with = "codec::literal_bool")]
    pub eligible: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub pending_change: String,

    /// Failover chains in priority order
    #[serde(deserialize_with = "null_as_default")]
    pub rs_chains: Vec<RecordSetFailoverChain>,

    /// Rulesets referencing this pool
    #[serde(deserialize_with = "null_as_default")]
    pub rulesets: Vec<Ruleset>,

    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(deserialize_with = "null_as_default")]
    pub last_monitored: String,

    #[serde(deserialize_with = "null_as_default")]
    pub notifier: String,
}

impl Entity for ResponsePool {
    const KIND: &'static str = "response pool";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Caller-supplied response pool attributes
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePoolAttrs {
    pub label: String,
    pub automation: Option<Automation>,
    /// Only sent when automation is manual; requires `automation`
    pub eligible: Option<bool>,
}

impl ResponsePoolAttrs {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            automation: None,
            eligible: None,
        }
    }

    pub fn with_automation(mut self, automation: Automation) -> Self {
        self.automation = Some(automation);
        self
    }

    pub fn with_eligible(mut self, eligible: bool) -> Self {
        self.eligible = Some(eligible);
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        require_label(ResponsePool::KIND, &self.label)?;
        require_automation_for_eligible(ResponsePool::KIND, self.automation, self.eligible)
    }
}

/// Body of `POST DSFResponsePool/<svc>` / `PUT DSFResponsePool/<svc>/<id>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsePoolRequest {
    #[serde(flatten)]
    pub publish: PublishBlock,

    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation: Option<Automation>,

    #[serde(skip_serializing_if = "Option::is_none", with = "codec::literal_bool::option")]
    pub eligible: Option<bool>,
}

impl ResponsePoolRequest {
    pub fn new(attrs: &ResponsePoolAttrs, publish: PublishBlock) -> Self {
        Self {
            publish,
            label: attrs.label.clone(),
            automation: attrs.automation,
            eligible: eligible_for(attrs.automation, attrs.eligible),
        }
    }
}
