// # Session Trait
//
// Defines the interface for talking to the Traffic Director control plane.
//
// ## Implementations
//
// - DynECT REST: `dsf-dynect` crate
// - Tests: in-memory fake in `dsf-core/tests/common`
//
// ## Usage
//
// ```rust,ignore
// use dsf_core::traits::{ApiRequest, SessionFactory};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let factory = /* SessionFactory implementation */;
//
//     let mut session = factory.connect().await?;
//     let envelope = session.execute(ApiRequest::get("DSF/abc123")).await?;
//     session.close().await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::model::Envelope;

/// HTTP verb of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, e.g. `DSFRecordSet/<svc>/<id>`
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> crate::Result<Self> {
        Self::with_body(Method::Post, path, body)
    }

    pub fn put<B: Serialize>(path: impl Into<String>, body: &B) -> crate::Result<Self> {
        Self::with_body(Method::Put, path, body)
    }

    /// DELETE carries a body too: the publish block
    pub fn delete<B: Serialize>(path: impl Into<String>, body: &B) -> crate::Result<Self> {
        Self::with_body(Method::Delete, path, body)
    }

    fn with_body<B: Serialize>(
        method: Method,
        path: impl Into<String>,
        body: &B,
    ) -> crate::Result<Self> {
        Ok(Self {
            method,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    Closed,
}

/// One logged-in connection to the control plane
///
/// A session is used by one caller at a time (`&mut self`); sharing happens
/// through [`crate::pool::SessionPool`], never by aliasing.
///
/// # Contract
///
/// - `execute` only succeeds with a resolved envelope: long-running jobs have
///   already been polled to completion, so the returned status is `success`
/// - `status: failure` surfaces as [`crate::Error::RemoteRejected`] with the
///   server messages untouched
/// - A rejected or expired token surfaces as
///   [`crate::Error::AuthenticationFailed`]; the session is then unusable and
///   must be discarded, never released back to a pool
/// - Requests on a session that is not `Authenticated` fail with
///   [`crate::Error::InvalidState`] without doing any I/O
/// - No retries besides job polling
#[async_trait]
pub trait Session: Send {
    /// Authenticate with the configured credentials
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The session is now `Authenticated`
    /// - `Err(Error::AuthenticationFailed)`: Credentials were rejected; the
    ///   session stays `Unauthenticated`
    async fn login(&mut self) -> crate::Result<()>;

    /// Send one request and wait for its final outcome
    ///
    /// # Parameters
    ///
    /// - `request`: Method, path and optional JSON body
    ///
    /// # Returns
    ///
    /// - `Ok(Envelope)`: A successful envelope whose `data` holds the payload
    /// - `Err(Error)`: Rejection, auth failure, job timeout or transport error
    async fn execute(&mut self, request: ApiRequest) -> crate::Result<Envelope>;

    /// Log out; the session moves to `Closed`
    async fn close(&mut self) -> crate::Result<()>;

    /// Current lifecycle state
    fn state(&self) -> SessionState;

    /// API version reported at login
    fn api_version(&self) -> Option<&str>;
}

/// Produces freshly logged-in sessions
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Create a session and log it in
    ///
    /// # Returns
    ///
    /// A boxed session in the `Authenticated` state
    async fn connect(&self) -> crate::Result<Box<dyn Session>>;

    /// Backend name (for logging/debugging)
    fn name(&self) -> &'static str;
}
