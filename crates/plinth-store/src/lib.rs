//! Plinth Store - SQLite-backed session implementation
//!
//! Provides:
//! - SQLite connection management and pragmas
//! - Embedded schema migrations with checksums
//! - The durable session: `SqliteSession`, a transaction-scoped
//!   implementation of the core's `EntitySession` and `LookupIndex` traits
//! - Row hydration back into domain types

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteSession;
