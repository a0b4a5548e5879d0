//! Rulesets: ordered response pool selection within a service

use serde::{Deserialize, Serialize};

use super::{Entity, PublishBlock, ResponsePool, null_as_default, require_label};
use crate::codec;

/// Criteria type used when none is given
pub const DEFAULT_CRITERIA_TYPE: &str = "always";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    #[serde(rename = "dsf_ruleset_id")]
    pub id: String,

    pub label: String,

    #[serde(deserialize_with = "null_as_default")]
    pub criteria_type: String,

    /// Opaque criteria document (geo regions and the like)
    pub criteria: serde_json::Value,

    #[serde(deserialize_with = "null_as_default")]
    pub ordering: String,

    #[serde(with = "codec::literal_bool")]
    pub eligible: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub pending_change: String,

    /// Pools in the order they are tried
    #[serde(deserialize_with = "null_as_default")]
    pub response_pools: Vec<ResponsePool>,
}

impl Entity for Ruleset {
    const KIND: &'static str = "ruleset";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Ruleset {
    /// Ids of the referenced response pools, in order
    pub fn response_pool_ids(&self) -> Vec<&str> {
        self.response_pools.iter().map(|p| p.id.as_str()).collect()
    }
}

/// Caller-supplied ruleset attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulesetAttrs {
    pub label: String,
    /// Defaults to `always`
    pub criteria_type: Option<String>,
    /// Ordered response pool ids; every id must already exist
    pub response_pool_ids: Vec<String>,
}

impl RulesetAttrs {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_response_pool(mut self, pool_id: impl Into<String>) -> Self {
        self.response_pool_ids.push(pool_id.into());
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        require_label(Ruleset::KIND, &self.label)?;
        if self.response_pool_ids.iter().any(|id| id.is_empty()) {
            return Err(crate::Error::invalid_input(
                "ruleset response pool id cannot be empty",
            ));
        }
        Ok(())
    }
}

/// `{"dsf_response_pool_id": ...}` reference inside a ruleset request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsePoolRef {
    #[serde(rename = "dsf_response_pool_id")]
    pub id: String,
}

/// Body of `POST DSFRuleset/<svc>` / `PUT DSFRuleset/<svc>/<id>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RulesetRequest {
    #[serde(flatten)]
    pub publish: PublishBlock,

    pub label: String,

    pub criteria_type: String,

    pub response_pools: Vec<ResponsePoolRef>,
}

impl RulesetRequest {
    pub fn new(attrs: &RulesetAttrs, publish: PublishBlock) -> Self {
        Self {
            publish,
            label: attrs.label.clone(),
            criteria_type: attrs
                .criteria_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CRITERIA_TYPE.to_string()),
            response_pools: attrs
                .response_pool_ids
                .iter()
                .map(|id| ResponsePoolRef { id: id.clone() })
                .collect(),
        }
    }
}
