//! Error handling for plinth-store
//!
//! The store speaks the session vocabulary of plinth-core: every failure
//! is a `SessionError`. The helpers here wrap backend-specific errors;
//! constraint-aware translation of write failures lives with the session
//! itself in `repo::sqlite_session`.

use plinth_core::errors::SessionError;

/// Result type alias using SessionError
pub type Result<T> = std::result::Result<T, SessionError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> SessionError {
    SessionError::Backend {
        message: format!("Migration {} failed: {}", migration_id, reason),
    }
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> SessionError {
    SessionError::Backend {
        message: err.to_string(),
    }
}
