//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use std::path::Path;

use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};

/// Open a SQLite database at the given path.
///
/// Foreign keys are switched on (SQLite defaults them off per
/// connection) and the journal is put into WAL mode.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(from_rusqlite)?;
    configure(&conn, true)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing).
///
/// Foreign keys are on; WAL is skipped, it has no meaning without a file.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
    configure(&conn, false)?;
    Ok(conn)
}

fn configure(conn: &Connection, file_backed: bool) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;

    if file_backed {
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(from_rusqlite)?;
    }

    Ok(())
}
