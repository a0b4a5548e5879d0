//! Health-check monitors attached to record sets

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Entity, PublishBlock, require_label};
use crate::codec;

/// Probe intervals accepted by the service, in seconds
pub const PROBE_INTERVALS: [u32; 4] = [60, 300, 600, 900];

/// Longest accepted `expected` match string, in bytes
pub const MAX_EXPECTED_LEN: usize = 255;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    #[default]
    Http,
    Https,
    Ping,
    Smtp,
    Tcp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "HTTP",
            Protocol::Https => "HTTPS",
            Protocol::Ping => "PING",
            Protocol::Smtp => "SMTP",
            Protocol::Tcp => "TCP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Protocol {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "HTTP" => Ok(Protocol::Http),
            "HTTPS" => Ok(Protocol::Https),
            "PING" => Ok(Protocol::Ping),
            "SMTP" => Ok(Protocol::Smtp),
            "TCP" => Ok(Protocol::Tcp),
            other => Err(crate::Error::invalid_input(format!("unsupported protocol: {other}"))),
        }
    }
}

/// Protocol-specific probe options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorOptions {
    #[serde(skip_serializing_if = "Option::is_none", with = "codec::stringified_int::option")]
    pub timeout: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none", with = "codec::stringified_int::option")]
    pub port: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Text the probe response must contain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitor {
    #[serde(rename = "dsf_monitor_id")]
    pub id: String,

    pub label: String,

    pub protocol: Protocol,

    #[serde(with = "codec::presence_bool")]
    pub active: bool,

    #[serde(with = "codec::stringified_int")]
    pub response_count: u32,

    #[serde(with = "codec::stringified_int")]
    pub probe_interval: u32,

    #[serde(with = "codec::stringified_int")]
    pub retries: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<MonitorOptions>,
}

impl Entity for Monitor {
    const KIND: &'static str = "monitor";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Monitor {
    /// Fails unless the probe interval is at least twice `ttl`
    pub fn check_ttl(&self, ttl: u32) -> crate::Result<()> {
        if u64::from(self.probe_interval) < 2 * u64::from(ttl) {
            return Err(crate::Error::invalid_input(format!(
                "monitor {} probe_interval {}s must be at least twice the record set ttl {}s",
                self.id, self.probe_interval, ttl
            )));
        }
        Ok(())
    }
}

/// Caller-supplied monitor attributes
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorAttrs {
    pub label: String,
    pub protocol: Protocol,
    pub response_count: u32,
    pub probe_interval: u32,
    pub retries: u32,
    pub active: bool,
    pub options: Option<MonitorOptions>,
}

impl MonitorAttrs {
    pub fn new(label: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            label: label.into(),
            protocol,
            response_count: 1,
            probe_interval: 60,
            retries: 0,
            active: true,
            options: None,
        }
    }

    pub fn with_probe_interval(mut self, seconds: u32) -> Self {
        self.probe_interval = seconds;
        self
    }

    pub fn with_response_count(mut self, count: u32) -> Self {
        self.response_count = count;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_options(mut self, options: MonitorOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn validate(&self) -> crate::Result<()> {
        require_label(Monitor::KIND, &self.label)?;
        if self.response_count > 3 {
            return Err(crate::Error::invalid_input(format!(
                "monitor response_count must be between 0 and 3, got {}",
                self.response_count
            )));
        }
        if !PROBE_INTERVALS.contains(&self.probe_interval) {
            return Err(crate::Error::invalid_input(format!(
                "monitor probe_interval must be one of {:?}, got {}",
                PROBE_INTERVALS, self.probe_interval
            )));
        }
        if self.retries > 2 {
            return Err(crate::Error::invalid_input(format!(
                "monitor retries must be between 0 and 2, got {}",
                self.retries
            )));
        }
        if let Some(expected) = self.options.as_ref().and_then(|o| o.expected.as_ref()) {
            if expected.len() > MAX_EXPECTED_LEN {
                return Err(crate::Error::invalid_input(format!(
                    "monitor expected text is {} bytes, limit is {}",
                    expected.len(),
                    MAX_EXPECTED_LEN
                )));
            }
        }
        Ok(())
    }
}

/// Body of `POST DSFMonitor` / `PUT DSFMonitor/<id>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorRequest {
    #[serde(flatten)]
    pub publish: PublishBlock,

    pub label: String,

    pub protocol: Protocol,

    #[serde(with = "codec::presence_bool")]
    pub active: bool,

    #[serde(with = "codec::stringified_int")]
    pub response_count: u32,

    #[serde(with = "codec::stringified_int")]
    pub probe_interval: u32,

    #[serde(with = "codec::stringified_int")]
    pub retries: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<MonitorOptions>,
}

impl MonitorRequest {
    pub fn new(attrs: &MonitorAttrs, publish: PublishBlock) -> Self {
        Self {
            publish,
            label: attrs.label.clone(),
            protocol: attrs.protocol,
            active: attrs.active,
            response_count: attrs.response_count,
            probe_interval: attrs.probe_interval,
            retries: attrs.retries,
            options: attrs.options.clone(),
        }
    }
}
