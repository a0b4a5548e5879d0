//! Session pool
//!
//! Bounded reuse of authenticated sessions so concurrent callers do not log
//! in once per operation.
//!
//! - `acquire` hands out an idle session or a freshly logged-in one; each
//!   handle is owned by exactly one caller until it is given back
//! - `release` returns a healthy session to the idle set
//! - `discard` drops a session that must not be reused
//!
//! A session leaving the pool while still `Authenticated` is logged out, so
//! its token does not outlive it on the server.
//!
//! The idle set is the only shared mutable state. Its lock is held for
//! bookkeeping only, never across a login or any other I/O.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::PoolConfig;
use crate::error::Result;
use crate::traits::{Session, SessionFactory, SessionState};

pub struct SessionPool {
    factory: Arc<dyn SessionFactory>,
    idle: Mutex<Vec<Box<dyn Session>>>,
    max_idle: usize,
}

impl SessionPool {
    pub fn new(factory: Arc<dyn SessionFactory>, config: &PoolConfig) -> Self {
        Self {
            factory,
            idle: Mutex::new(Vec::new()),
            max_idle: config.max_idle,
        }
    }

    /// Take an idle session, or log in a new one
    ///
    /// # Returns
    ///
    /// - `Ok(session)`: An `Authenticated` session owned by the caller
    /// - `Err(Error::AuthenticationFailed)`: A fresh login was rejected
    pub async fn acquire(&self) -> Result<Box<dyn Session>> {
        let reused = self.idle().pop();
        if let Some(session) = reused {
            debug!("Reusing idle {} session", self.factory.name());
            return Ok(session);
        }

        debug!("No idle session, logging in via {}", self.factory.name());
        self.factory.connect().await
    }

    /// Give a session back for reuse
    ///
    /// Sessions that are no longer `Authenticated` are dropped. Sessions that
    /// would exceed `max_idle` are logged out and dropped.
    pub async fn release(&self, session: Box<dyn Session>) {
        if session.state() != SessionState::Authenticated {
            debug!("Dropping released session in state {:?}", session.state());
            return;
        }

        let overflow = {
            let mut idle = self.idle();
            if idle.len() >= self.max_idle {
                Some(session)
            } else {
                idle.push(session);
                None
            }
        };

        if let Some(session) = overflow {
            debug!("Idle set full ({}), logging out session", self.max_idle);
            self.close(session).await;
        }
    }

    /// Drop a session that must not be reused, logging it out if it still can be
    pub async fn discard(&self, session: Box<dyn Session>) {
        warn!(
            "Discarding {} session in state {:?}",
            self.factory.name(),
            session.state()
        );
        self.close(session).await;
    }

    /// Number of sessions waiting for reuse
    pub fn idle_count(&self) -> usize {
        self.idle().len()
    }

    /// Log out every idle session
    ///
    /// Logout failures are logged and skipped; the sessions are dropped either way.
    pub async fn drain(&self) -> usize {
        let sessions = std::mem::take(&mut *self.idle());
        let count = sessions.len();

        for session in sessions {
            self.close(session).await;
        }

        if count > 0 {
            info!("Closed {} idle session(s)", count);
        }
        count
    }

    async fn close(&self, mut session: Box<dyn Session>) {
        if session.state() != SessionState::Authenticated {
            return;
        }
        if let Err(e) = session.close().await {
            warn!("Failed to close {} session: {}", self.factory.name(), e);
        }
    }

    // A panic while holding the lock cannot leave the Vec half-updated.
    fn idle(&self) -> MutexGuard<'_, Vec<Box<dyn Session>>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
