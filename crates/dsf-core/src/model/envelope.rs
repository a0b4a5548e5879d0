//! Response envelope and publish block shared by every endpoint

use serde::{Deserialize, Serialize};
use std::fmt;

use super::null_as_default;
use crate::codec;

/// Envelope status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
    /// The request was accepted as a job; poll it by `job_id`
    Incomplete,
}

/// A structured message from the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(rename = "INFO", default, deserialize_with = "null_as_default")]
    pub info: String,

    #[serde(rename = "SOURCE", default, deserialize_with = "null_as_default")]
    pub source: String,

    #[serde(rename = "ERR_CD", default, deserialize_with = "null_as_default")]
    pub err_code: String,

    #[serde(rename = "LVL", default, deserialize_with = "null_as_default")]
    pub level: String,
}

impl ApiMessage {
    /// True when the message reports a missing object
    pub fn is_not_found(&self) -> bool {
        if self.err_code == "NOT_FOUND" {
            return true;
        }
        let info = self.info.to_lowercase();
        info.contains("not found") || info.contains("no such")
    }

    /// True when the message reports an invalid or expired session token
    ///
    /// A busy session is reported under the same `token:` prefix but keeps a
    /// valid token.
    pub fn is_token_error(&self) -> bool {
        (self.info.starts_with("token:") || self.info.starts_with("login:"))
            && !self.is_session_busy()
    }

    /// True when the session still has an earlier job running
    pub fn is_session_busy(&self) -> bool {
        self.info.contains("already has a job running")
    }
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.err_code.is_empty() {
            write!(f, "[{}] {}", self.source, self.info)
        } else {
            write!(f, "[{}/{}] {}", self.source, self.err_code, self.info)
        }
    }
}

/// The envelope wrapping every request's result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<u64>,

    #[serde(rename = "msgs", default, deserialize_with = "null_as_default")]
    pub messages: Vec<ApiMessage>,

    /// Endpoint-specific payload
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// A successful envelope carrying `data`
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            status: Status::Success,
            job_id: None,
            messages: Vec::new(),
            data,
        }
    }
}

/// When mutations become visible
///
/// Every mutation is modelled as two steps: the change itself, then a publish.
/// `Immediate` folds both into one request (`publish: "Y"`); `Deferred` sends
/// `publish: "N"` and leaves the commit to an explicit publish of the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Commit {
    #[default]
    Immediate,
    Deferred,
}

impl Commit {
    /// The publish block carried by every mutating request
    pub fn block(self) -> PublishBlock {
        PublishBlock {
            publish: self == Commit::Immediate,
        }
    }
}

/// `{"publish": "Y"|"N"}`, flattened into mutating requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublishBlock {
    #[serde(with = "codec::presence_bool")]
    pub publish: bool,
}

impl PublishBlock {
    /// The block that commits pending changes
    pub fn now() -> Self {
        Self { publish: true }
    }
}
