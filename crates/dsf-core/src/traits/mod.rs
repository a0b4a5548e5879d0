//! Core traits for the DSF system
//!
//! This module defines the transport seam the orchestrator runs over.
//!
//! - [`Session`]: One authenticated connection to the control plane
//! - [`SessionFactory`]: Logs in and hands out new sessions

pub mod session;

pub use session::{ApiRequest, Method, Session, SessionFactory, SessionState};
