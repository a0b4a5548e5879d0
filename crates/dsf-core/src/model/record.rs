//! Records: single DNS answers inside a record set

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Automation, Entity, PublishBlock, eligible_for, null_as_default, require_automation_for_eligible,
};
use crate::codec;

/// Accepted record weight range
pub const WEIGHT_RANGE: std::ops::RangeInclusive<u32> = 1..=255;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(rename = "dsf_record_id")]
    pub id: String,

    pub label: String,

    #[serde(deserialize_with = "null_as_default")]
    pub weight: u32,

    #[serde(deserialize_with = "null_as_default")]
    pub automation: Automation,

    #[serde(with = "codec::literal_bool")]
    pub eligible: bool,

    /// Zone-file style answer, e.g. `192.0.2.1`
    #[serde(deserialize_with = "null_as_default")]
    pub master_line: String,

    #[serde(deserialize_with = "null_as_default")]
    pub rdata_class: String,

    #[serde(deserialize_with = "null_as_default")]
    pub endpoints: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub endpoint_up_count: u32,

    #[serde(deserialize_with = "null_as_default")]
    pub torpidity: u32,

    #[serde(deserialize_with = "null_as_default")]
    pub response_time: u32,

    /// Epoch seconds of the last probe, 0 when never monitored
    #[serde(deserialize_with = "null_as_default")]
    pub last_monitored: i64,

    #[serde(with = "codec::stringified_int")]
    pub ttl: u32,

    #[serde(rename = "dsf_record_set_id", deserialize_with = "null_as_default")]
    pub record_set_id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub service_id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(deserialize_with = "null_as_default")]
    pub pending_change: String,
}

impl Entity for Record {
    const KIND: &'static str = "record";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record {
    pub fn last_monitored_at(&self) -> Option<DateTime<Utc>> {
        if self.last_monitored <= 0 {
            return None;
        }
        DateTime::from_timestamp(self.last_monitored, 0)
    }
}

/// Mutable record attributes
#[derive(Debug, Clone, PartialEq)]
pub struct RecordAttrs {
    pub label: String,
    pub weight: u32,
    pub automation: Option<Automation>,
    /// Only sent when automation is manual; requires `automation`
    pub eligible: Option<bool>,
    pub master_line: String,
}

impl RecordAttrs {
    pub fn new(master_line: impl Into<String>) -> Self {
        Self {
            label: String::new(),
            weight: 1,
            automation: None,
            eligible: None,
            master_line: master_line.into(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
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

    pub fn validate(&self) -> crate::Result<()> {
        require_automation_for_eligible(Record::KIND, self.automation, self.eligible)?;
        if !WEIGHT_RANGE.contains(&self.weight) {
            return Err(crate::Error::invalid_input(format!(
                "record weight must be between 1 and 255, got {}",
                self.weight
            )));
        }
        if self.master_line.trim().is_empty() {
            return Err(crate::Error::invalid_input("record master_line cannot be empty"));
        }
        Ok(())
    }
}

/// Everything needed to create a record
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub record_set_id: String,
    pub attrs: RecordAttrs,
}

impl NewRecord {
    pub fn new(record_set_id: impl Into<String>, attrs: RecordAttrs) -> Self {
        Self {
            record_set_id: record_set_id.into(),
            attrs,
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.record_set_id.is_empty() {
            return Err(crate::Error::invalid_input("record requires a record set id"));
        }
        self.attrs.validate()
    }
}

/// Body of `POST DSFRecord/<svc>/<record_set>` / `PUT DSFRecord/<svc>/<id>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordRequest {
    #[serde(flatten)]
    pub publish: PublishBlock,

    pub label: String,

    pub weight: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation: Option<Automation>,

    #[serde(skip_serializing_if = "Option::is_none", with = "codec::literal_bool::option")]
    pub eligible: Option<bool>,

    pub master_line: String,
}

impl RecordRequest {
    pub fn new(attrs: &RecordAttrs, publish: PublishBlock) -> Self {
        Self {
            publish,
            label: attrs.label.clone(),
            weight: attrs.weight,
            automation: attrs.automation,
            eligible: eligible_for(attrs.automation, attrs.eligible),
            master_line: attrs.master_line.clone(),
        }
    }
}
