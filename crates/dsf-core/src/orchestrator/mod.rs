// # Lifecycle Orchestrator
//
// Create / Read / Update / Delete for every entity of a Traffic Director
// service, run over sessions borrowed from a `SessionPool`.
//
// ## Contract
//
// - Parent ids are required and checked before any I/O
// - Every mutation (delete included) carries the publish block
// - A create that references a missing parent fails with `DependencyNotFound`
// - A read, update or delete of a missing entity fails with `NotFound`
// - Nothing is retried; a `Create` mints a new server-side id every time
// - Whole-tree ordering (children before parents on teardown) belongs to the
//   caller
//
// ## Usage
//
// ```rust,ignore
// use dsf_core::{Orchestrator, SessionPool};
// use dsf_core::model::ServiceAttrs;
//
// let orchestrator = Orchestrator::new(pool);
// let service = orchestrator
//     .create_service(&ServiceAttrs::new("svc1").with_ttl(300))
//     .await?;
// ```

mod monitor;
mod record;
mod record_set;
mod response_pool;
mod rsfc;
mod ruleset;
mod service;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Commit, Entity, Envelope, PublishBlock};
use crate::pool::SessionPool;
use crate::traits::ApiRequest;

/// Entry point for all lifecycle operations
///
/// Cheap to clone; clones share the session pool.
#[derive(Clone)]
pub struct Orchestrator {
    pool: Arc<SessionPool>,
    commit: Commit,
}

/// Which kind of call a "no such object" rejection answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    /// The missing object is a referenced parent or sibling
    Create,
    /// The missing object is the target itself
    Existing,
}

impl Orchestrator {
    /// Create an orchestrator that publishes every mutation immediately
    pub fn new(pool: Arc<SessionPool>) -> Self {
        Self {
            pool,
            commit: Commit::Immediate,
        }
    }

    /// Choose when mutations become visible
    ///
    /// With [`Commit::Deferred`] mutations stay pending until
    /// [`Orchestrator::publish`] is called for the service.
    pub fn with_commit(mut self, commit: Commit) -> Self {
        self.commit = commit;
        self
    }

    pub fn commit(&self) -> Commit {
        self.commit
    }

    pub fn pool(&self) -> &Arc<SessionPool> {
        &self.pool
    }

    fn publish_block(&self) -> PublishBlock {
        self.commit.block()
    }

    /// Run one request on a pooled session
    ///
    /// Sessions that fail authentication, or still carry a job that timed
    /// out, are discarded; all others go back to the pool.
    async fn execute(&self, request: ApiRequest) -> Result<Envelope> {
        let mut session = self.pool.acquire().await?;
        debug!("{} {}", request.method, request.path);

        let result = session.execute(request).await;
        match &result {
            Err(e) if e.is_auth_failure() => self.pool.discard(session).await,
            Err(Error::OperationTimedOut { .. }) => self.pool.discard(session).await,
            _ => self.pool.release(session).await,
        }
        result
    }

    async fn fetch<T>(&self, path: String) -> Result<T>
    where
        T: Entity + DeserializeOwned,
    {
        let envelope = self
            .execute(ApiRequest::get(&path))
            .await
            .map_err(|e| classify(e, Lookup::Existing, T::KIND, &path))?;
        decode_entity(envelope.data, &path)
    }

    async fn create_entity<T, B>(&self, path: String, body: &B) -> Result<T>
    where
        T: Entity + DeserializeOwned,
        B: Serialize,
    {
        let envelope = self
            .execute(ApiRequest::post(&path, body)?)
            .await
            .map_err(|e| classify(e, Lookup::Create, T::KIND, &path))?;

        let entity: T = decode(envelope.data)?;
        if entity.id().is_empty() {
            return Err(Error::malformed(format!(
                "created {} at {} has no id",
                T::KIND,
                path
            )));
        }
        Ok(entity)
    }

    async fn update_entity<T, B>(&self, path: String, body: &B) -> Result<T>
    where
        T: Entity + DeserializeOwned,
        B: Serialize,
    {
        let envelope = self
            .execute(ApiRequest::put(&path, body)?)
            .await
            .map_err(|e| classify(e, Lookup::Existing, T::KIND, &path))?;
        decode_entity(envelope.data, &path)
    }

    async fn delete_entity(&self, kind: &str, path: String) -> Result<()> {
        self.execute(ApiRequest::delete(&path, &self.publish_block())?)
            .await
            .map_err(|e| classify(e, Lookup::Existing, kind, &path))?;
        Ok(())
    }
}

/// Join non-empty path segments
fn path(collection: &str, ids: &[&str]) -> Result<String> {
    let mut out = collection.to_string();
    for id in ids {
        require_id(id)?;
        out.push('/');
        out.push_str(id);
    }
    Ok(out)
}

fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::invalid_input("identifier cannot be empty"));
    }
    if id.contains('/') || id.contains('?') {
        return Err(Error::invalid_input(format!("invalid identifier: {id}")));
    }
    Ok(())
}

/// Map a "no such object" rejection to the error the caller can act on
fn classify(err: Error, lookup: Lookup, kind: &str, path: &str) -> Error {
    match err {
        Error::RemoteRejected { messages } if messages.iter().any(|m| m.is_not_found()) => {
            match lookup {
                Lookup::Create => Error::DependencyNotFound { messages },
                Lookup::Existing => Error::not_found(format!("{kind} at {path}")),
            }
        }
        other => other,
    }
}

fn decode<T: DeserializeOwned>(data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| Error::malformed(e.to_string()))
}

/// Decode a read result; an empty payload or id means the entity is gone
fn decode_entity<T>(data: serde_json::Value, path: &str) -> Result<T>
where
    T: Entity + DeserializeOwned,
{
    let empty = match &data {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        return Err(Error::not_found(format!("{} at {}", T::KIND, path)));
    }

    let entity: T = decode(data)?;
    if entity.id().is_empty() {
        return Err(Error::not_found(format!("{} at {}", T::KIND, path)));
    }
    Ok(entity)
}
