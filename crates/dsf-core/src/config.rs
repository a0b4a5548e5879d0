//! Configuration types for the DSF system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Main DSF configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DsfConfig {
    /// Account credentials
    pub credentials: Credentials,

    /// Transport settings
    #[serde(default)]
    pub transport: TransportConfig,

    /// Session pool settings
    #[serde(default)]
    pub pool: PoolConfig,
}

impl DsfConfig {
    /// Create a configuration with default transport and pool settings
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            transport: TransportConfig::default(),
            pool: PoolConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.credentials.validate()?;
        self.transport.validate()?;
        Ok(())
    }
}

/// DynECT account credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub customer_name: String,

    pub username: String,

    /// Never logged
    pub password: String,
}

impl Credentials {
    pub fn new(
        customer_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Validate the credentials
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.customer_name.is_empty() {
            return Err(crate::Error::config("Customer name cannot be empty"));
        }
        if self.username.is_empty() {
            return Err(crate::Error::config("Username cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(crate::Error::config("Password cannot be empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("customer_name", &self.customer_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request HTTP timeout (in seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Delay between job status polls (in milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum time spent polling one job (in seconds)
    ///
    /// When exceeded the operation fails with `OperationTimedOut`; its real
    /// outcome is unknown and must be re-read.
    #[serde(default = "default_job_timeout_secs")]
    pub job_timeout_secs: u64,

    /// Log every request and envelope status at debug level
    #[serde(default)]
    pub verbose: bool,
}

impl TransportConfig {
    /// Validate the transport configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(crate::Error::config(format!(
                "API URL must be http(s), got {}",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(crate::Error::config("Request timeout must be > 0"));
        }
        if self.poll_interval_ms == 0 {
            return Err(crate::Error::config("Job poll interval must be > 0"));
        }
        if self.job_timeout_secs == 0 {
            return Err(crate::Error::config("Job timeout must be > 0"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            job_timeout_secs: default_job_timeout_secs(),
            verbose: false,
        }
    }
}

/// Session pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Idle sessions kept for reuse; extra sessions are logged out on release
    #[serde(default = "default_max_idle")]
    pub max_idle: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle: default_max_idle(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.dynect.net/REST".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_job_timeout_secs() -> u64 {
    300
}

fn default_max_idle() -> usize {
    8
}
