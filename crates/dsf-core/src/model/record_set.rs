//! Record sets: same-type records sharing a serving policy

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    Automation, Entity, PublishBlock, Record, eligible_for, empty_as_none, null_as_default,
    require_automation_for_eligible, require_label,
};
use crate::codec;

/// Record type served by a record set; fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RdataClass {
    A,
    #[serde(rename = "AAAA")]
    Aaaa,
    #[serde(rename = "CNAME")]
    Cname,
}

impl RdataClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RdataClass::A => "A",
            RdataClass::Aaaa => "AAAA",
            RdataClass::Cname => "CNAME",
        }
    }
}

impl fmt::Display for RdataClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RdataClass {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(RdataClass::A),
            "AAAA" => Ok(RdataClass::Aaaa),
            "CNAME" => Ok(RdataClass::Cname),
            other => Err(crate::Error::invalid_input(format!(
                "unsupported rdata class: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSet {
    #[serde(rename = "dsf_record_set_id")]
    pub id: String,

    pub label: String,

    /// As reported by the server
    #[serde(deserialize_with = "null_as_default")]
    pub rdata_class: String,

    #[serde(with = "codec::stringified_int")]
    pub ttl: u32,

    #[serde(deserialize_with = "null_as_default")]
    pub automation: Automation,

    #[serde(with = "codec::stringified_int")]
    pub serve_count: u32,

    #[serde(with = "codec::stringified_int")]
    pub fail_count: u32,

    #[serde(with = "codec::stringified_int")]
    pub trouble_count: u32,

    #[serde(with = "codec::literal_bool")]
    pub eligible: bool,

    /// Attached monitor, if any
    #[serde(rename = "dsf_monitor_id", deserialize_with = "empty_as_none")]
    pub monitor_id: Option<String>,

    #[serde(with = "codec::stringified_int")]
    pub torpidity_max: u32,

    #[serde(with = "codec::stringified_int")]
    pub ttl_derived: u32,

    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(deserialize_with = "null_as_default")]
    pub last_monitored: String,

    #[serde(rename = "dsf_record_set_failover_chain_id", deserialize_with = "null_as_default")]
    pub rsfc_id: String,

    #[serde(rename = "dsf_response_pool_id", deserialize_with = "null_as_default")]
    pub response_pool_id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub service_id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub pending_change: String,

    #[serde(deserialize_with = "null_as_default")]
    pub records: Vec<Record>,
}

impl Entity for RecordSet {
    const KIND: &'static str = "record set";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Mutable record set attributes
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSetAttrs {
    pub label: String,
    /// `None` inherits the service TTL on create and keeps the current one on update
    pub ttl: Option<u32>,
    pub automation: Option<Automation>,
    pub serve_count: Option<u32>,
    pub fail_count: Option<u32>,
    pub trouble_count: Option<u32>,
    /// Only sent when automation is manual; requires `automation`
    pub eligible: Option<bool>,
    /// `None` detaches any monitor
    pub monitor_id: Option<String>,
}

impl RecordSetAttrs {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ttl: None,
            automation: None,
            serve_count: None,
            fail_count: None,
            trouble_count: None,
            eligible: None,
            monitor_id: None,
        }
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_automation(mut self, automation: Automation) -> Self {
        self.automation = Some(automation);
        self
    }

    pub fn with_eligible(mut self, eligible: bool) -> Self {
        self.eligible = Some(eligible);
        self
    }

    pub fn with_serve_count(mut self, count: u32) -> Self {
        self.serve_count = Some(count);
        self
    }

    pub fn with_monitor(mut self, monitor_id: impl Into<String>) -> Self {
        self.monitor_id = Some(monitor_id.into());
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        require_label(RecordSet::KIND, &self.label)?;
        require_automation_for_eligible(RecordSet::KIND, self.automation, self.eligible)?;
        if matches!(&self.monitor_id, Some(id) if id.is_empty()) {
            return Err(crate::Error::invalid_input("record set monitor id cannot be empty"));
        }
        Ok(())
    }
}

/// Everything needed to create a record set
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecordSet {
    pub response_pool_id: String,
    pub rsfc_id: String,
    pub rdata_class: RdataClass,
    pub attrs: RecordSetAttrs,
}

impl NewRecordSet {
    pub fn new(
        response_pool_id: impl Into<String>,
        rsfc_id: impl Into<String>,
        rdata_class: RdataClass,
        attrs: RecordSetAttrs,
    ) -> Self {
        Self {
            response_pool_id: response_pool_id.into(),
            rsfc_id: rsfc_id.into(),
            rdata_class,
            attrs,
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.response_pool_id.is_empty() || self.rsfc_id.is_empty() {
            return Err(crate::Error::invalid_input(
                "record set requires a response pool id and a failover chain id",
            ));
        }
        self.attrs.validate()
    }
}

/// Body of `POST DSFRecordSet/<svc>` / `PUT DSFRecordSet/<svc>/<id>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSetRequest {
    #[serde(flatten)]
    pub publish: PublishBlock,

    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdata_class: Option<RdataClass>,

    #[serde(skip_serializing_if = "Option::is_none", with = "codec::stringified_int::option")]
    pub ttl: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation: Option<Automation>,

    #[serde(skip_serializing_if = "Option::is_none", with = "codec::stringified_int::option")]
    pub serve_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none", with = "codec::stringified_int::option")]
    pub fail_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none", with = "codec::stringified_int::option")]
    pub trouble_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none", with = "codec::literal_bool::option")]
    pub eligible: Option<bool>,

    /// Always sent; `null` detaches the monitor
    #[serde(rename = "dsf_monitor_id")]
    pub monitor_id: Option<String>,

    #[serde(
        rename = "dsf_record_set_failover_chain_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub rsfc_id: Option<String>,

    #[serde(rename = "dsf_response_pool_id", skip_serializing_if = "Option::is_none")]
    pub response_pool_id: Option<String>,
}

impl RecordSetRequest {
    /// Create body, including the creation-only fields
    pub fn for_create(new: &NewRecordSet, publish: PublishBlock) -> Self {
        Self {
            rdata_class: Some(new.rdata_class),
            rsfc_id: Some(new.rsfc_id.clone()),
            response_pool_id: Some(new.response_pool_id.clone()),
            ..Self::for_update(&new.attrs, publish)
        }
    }

    /// Update body; rdata class and parent ids are never resent
    pub fn for_update(attrs: &RecordSetAttrs, publish: PublishBlock) -> Self {
        Self {
            publish,
            label: attrs.label.clone(),
            rdata_class: None,
            ttl: attrs.ttl,
            automation: attrs.automation,
            serve_count: attrs.serve_count,
            fail_count: attrs.fail_count,
            trouble_count: attrs.trouble_count,
            eligible: eligible_for(attrs.automation, attrs.eligible),
            monitor_id: attrs.monitor_id.clone(),
            rsfc_id: None,
            response_pool_id: None,
        }
    }
}
