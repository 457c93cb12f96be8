//! Plinth Core - Optimistic persistence engine and lookup value domain
//!
//! This crate provides the foundational data structures and operations for
//! Plinth, including:
//! - The versioned-entity model with optimistic concurrency semantics
//! - The persistence engine: version checks, no-op detection, constraint
//!   translation and revision logging on every write
//! - The lookup value domain: named, hierarchical, effective-dated lists
//! - Audit trail reconstruction from the revision log
//! - An in-memory session backend for tests and embedding

pub mod audit;
pub mod engine;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use audit::audit_trail;
pub use engine::PersistenceEngine;
pub use errors::{PlinthError, Result, SessionError, SessionResult};
pub use model::{AuditRevision, EntityId, LookupValue, RevisionType, Version};
pub use ops::MemorySession;
pub use session::{EntitySession, LookupIndex};
