// # DynECT Session Transport
//
// This crate provides the DynECT REST implementation of the `Session` and
// `SessionFactory` traits from `dsf-core`.
//
// ## Behaviour
//
// - Login: `POST Session {customer_name, user_name, password}` → `{token, version}`
// - Every request carries the token in the `Auth-Token` header
// - `status: incomplete` (or a `307` to `/REST/Job/<id>`) is polled via
//   `GET Job/<id>` every `poll_interval_ms` until it resolves, bounded by
//   `job_timeout_secs`
// - `status: failure` → `RemoteRejected` with the server messages verbatim
// - `401`/`403`, or a failure reported against the token → `AuthenticationFailed`
// - Logout: `DELETE Session`
// - No retries besides job polling
//
// ## Security Requirements
//
// - Password and token NEVER appear in logs
// - Credentials come from configuration only
//
// ## API Reference
//
// - DynECT REST API: https://help.dyn.com/rest/
// - Traffic Director resources: `DSF`, `DSFNode`, `DSFRuleset`, `DSFResponsePool`,
//   `DSFRecordSetFailoverChain`, `DSFRecordSet`, `DSFRecord`, `DSFMonitor`

mod session;

pub use session::{AUTH_HEADER, DynSession};

use async_trait::async_trait;
use dsf_core::traits::{Session, SessionFactory};
use dsf_core::{Credentials, DsfConfig, Orchestrator, Result, SessionPool, TransportConfig};
use std::sync::Arc;

/// Factory for logged-in DynECT sessions
#[derive(Debug, Clone)]
pub struct DynSessionFactory {
    credentials: Credentials,
    transport: TransportConfig,
}

impl DynSessionFactory {
    /// Create a factory from a validated configuration
    ///
    /// # Returns
    ///
    /// - `Ok(DynSessionFactory)`: Ready to log in
    /// - `Err(Error::Config)`: Missing credentials or bad transport settings
    pub fn new(config: &DsfConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            credentials: config.credentials.clone(),
            transport: config.transport.clone(),
        })
    }
}

#[async_trait]
impl SessionFactory for DynSessionFactory {
    async fn connect(&self) -> Result<Box<dyn Session>> {
        let mut session = DynSession::new(self.credentials.clone(), &self.transport)?;
        session.login().await?;
        Ok(Box::new(session))
    }

    fn name(&self) -> &'static str {
        "dynect"
    }
}

/// Build an orchestrator over a DynECT session pool
pub fn orchestrator(config: &DsfConfig) -> Result<Orchestrator> {
    let factory = DynSessionFactory::new(config)?;
    let pool = SessionPool::new(Arc::new(factory), &config.pool);
    Ok(Orchestrator::new(Arc::new(pool)))
}
