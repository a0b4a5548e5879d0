// # dsf-core
//
// Core library for managing DynECT Traffic Director (DSF) services.
//
// ## Architecture Overview
//
// This library provides the pieces every DSF client needs:
// - **codec**: The API's string encodings of integers and booleans
// - **model**: Typed entities of the service graph and their request shapes
// - **Session**: Trait for one authenticated connection to the control plane
// - **SessionPool**: Bounded reuse of authenticated sessions
// - **Orchestrator**: Create/Read/Update/Delete for every entity
//
// ## Design Principles
//
// 1. **Transport-Free Core**: HTTP lives behind the `Session` trait (`dsf-dynect`)
// 2. **Canonical Types**: One semantic type per field; wire encodings stay in serde attributes
// 3. **Explicit Publish**: Every mutation states whether it commits (`Commit`)
// 4. **Explicit Pool**: Sessions are shared through an injected `SessionPool`, never globals
// 5. **No Hidden Retries**: Only job polling repeats a request; everything else surfaces

pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod pool;
pub mod traits;

// Re-export core types for convenience
pub use codec::{LiteralBool, PresenceBool, StringifiedInt};
pub use config::{Credentials, DsfConfig, PoolConfig, TransportConfig};
pub use error::{Error, Result};
pub use model::{Commit, Entity};
pub use orchestrator::Orchestrator;
pub use pool::SessionPool;
pub use traits::{ApiRequest, Method, Session, SessionFactory, SessionState};
