//! Error types for the DSF system
//!
//! This module defines all error types used throughout the crate.

use std::time::Duration;

use thiserror::Error;

use crate::model::ApiMessage;

/// Result type alias for DSF operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DSF system
#[derive(Error, Debug)]
pub enum Error {
    /// Bad credentials or a rejected session token; terminal for the session
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A wire value could not be decoded into its declared semantic type
    #[error("Malformed value: {0}")]
    MalformedValue(String),

    /// The server answered with `status: failure`
    #[error("Rejected by remote API: {}", join_messages(.messages))]
    RemoteRejected {
        /// Server messages, verbatim
        messages: Vec<ApiMessage>,
    },

    /// A referenced ancestor or sibling does not exist server-side
    #[error("Dependency not found: {}", join_messages(.messages))]
    DependencyNotFound {
        /// Server messages, verbatim
        messages: Vec<ApiMessage>,
    },

    /// The entity is absent on the server
    #[error("Not found: {0}")]
    NotFound(String),

    /// Job polling exceeded its deadline; the outcome is unknown
    #[error("Job {job_id} did not complete within {waited:?}")]
    OperationTimedOut {
        /// Server-side job identifier
        job_id: u64,
        /// How long the job was polled
        waited: Duration,
    },

    /// Transport-level failures (connect, timeout, unreadable body)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation attempted on a session in the wrong state
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create a malformed value error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedValue(msg.into())
    }

    /// Create a remote rejection carrying the server messages
    pub fn rejected(messages: Vec<ApiMessage>) -> Self {
        Self::RemoteRejected { messages }
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid session state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Server messages attached to this error, if any
    pub fn messages(&self) -> &[ApiMessage] {
        match self {
            Self::RemoteRejected { messages } | Self::DependencyNotFound { messages } => messages,
            _ => &[],
        }
    }

    /// True when the error invalidates the session it occurred on
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

fn join_messages(messages: &[ApiMessage]) -> String {
    if messages.is_empty() {
        return "no message from server".to_string();
    }
    messages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
