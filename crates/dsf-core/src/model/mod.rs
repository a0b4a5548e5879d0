//! Resource graph model
//!
//! Typed entities of a Traffic Director service and the request shapes used
//! to mutate them:
//!
//! ```text
//! Service ── nodes (replace-all set)
//!    ├── Ruleset ──references──▶ ResponsePool
//!    └── ResponsePool
//!          └── RecordSetFailoverChain
//!                └── RecordSet ──optional──▶ Monitor
//!                      └── Record
//! ```
//!
//! Response types hold native values; the wire encoding of each field is
//! chosen by its `#[serde(with = ...)]` attribute (see [`crate::codec`]).
//!
//! Request types follow the partial-update convention: an `Option` field that
//! is `None` is left out of the JSON body entirely, so the server keeps its
//! current value. Required fields are always sent.

pub mod envelope;
pub mod monitor;
pub mod record;
pub mod record_set;
pub mod response_pool;
pub mod rsfc;
pub mod ruleset;
pub mod service;

pub use envelope::{ApiMessage, Commit, Envelope, PublishBlock, Status};
pub use monitor::{Monitor, MonitorAttrs, MonitorOptions, MonitorRequest, Protocol};
pub use record::{NewRecord, Record, RecordAttrs, RecordRequest};
pub use record_set::{NewRecordSet, RdataClass, RecordSet, RecordSetAttrs, RecordSetRequest};
pub use response_pool::{ResponsePool, ResponsePoolAttrs, ResponsePoolRequest};
pub use rsfc::{RecordSetFailoverChain, RsfcAttrs, RsfcRequest};
pub use ruleset::{ResponsePoolRef, Ruleset, RulesetAttrs, RulesetRequest};
pub use service::{Node, NodeRequest, Notifier, Service, ServiceAttrs, ServiceRequest};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// An entity of the graph with a server-assigned identifier
pub trait Entity {
    /// Human-readable kind, used in logs and errors
    const KIND: &'static str;

    /// Server-assigned identifier (empty when the server returned none)
    fn id(&self) -> &str;
}

/// How monitoring results may change an entity's eligibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Automation {
    /// Monitor & obey
    #[default]
    Auto,
    /// Monitor & remove
    AutoDown,
    /// `eligible` is set by the user
    Manual,
}

impl Automation {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Automation::Auto => "auto",
            Automation::AutoDown => "auto_down",
            Automation::Manual => "manual",
        }
    }
}

impl fmt::Display for Automation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `eligible` is only user-settable under manual automation; under any other
/// mode it is server-computed and must not be sent.
pub(crate) fn eligible_for(automation: Option<Automation>, eligible: Option<bool>) -> Option<bool> {
    match automation {
        Some(Automation::Manual) => eligible,
        _ => None,
    }
}

/// An `eligible` value needs the automation it applies under
///
/// Without one the request would keep the entity's current automation, and
/// the value could neither be sent nor safely dropped.
pub(crate) fn require_automation_for_eligible(
    kind: &str,
    automation: Option<Automation>,
    eligible: Option<bool>,
) -> crate::Result<()> {
    if eligible.is_some() && automation.is_none() {
        return Err(crate::Error::invalid_input(format!(
            "{kind} eligible can only be set together with automation"
        )));
    }
    Ok(())
}

/// Deserialize `null` as the type's default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize `null` and `""` as `None`
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

pub(crate) fn require_label(kind: &str, label: &str) -> crate::Result<()> {
    if label.trim().is_empty() {
        return Err(crate::Error::invalid_input(format!("{kind} label cannot be empty")));
    }
    Ok(())
}
