//! Repository layer - the durable session over SQLite

pub mod hydration;
pub mod sqlite_session;

pub use sqlite_session::SqliteSession;
