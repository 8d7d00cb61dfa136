//! Database connection management
//!
//! Opening and configuring SQLite connections

use crate::errors::{from_rusqlite, DriverResult};
use rusqlite::Connection;
use std::path::Path;

/// Path value that selects an in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Open a SQLite database at the given path
///
/// [`IN_MEMORY`] opens a private in-memory database instead of a file.
pub fn open<P: AsRef<Path>>(path: P) -> DriverResult<Connection> {
    let path = path.as_ref();
    if path.as_os_str() == IN_MEMORY {
        return open_in_memory();
    }
    let conn = Connection::open(path).map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database
pub fn open_in_memory() -> DriverResult<Connection> {
    let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
    conn.execute_batch("PRAGMA foreign_keys = ON")
        .map_err(from_rusqlite)?;
    Ok(conn)
}

/// Configure a file-backed connection
pub fn configure(conn: &Connection) -> DriverResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON")
        .map_err(from_rusqlite)?;

    // journal_mode answers with the mode it switched to
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .map_err(from_rusqlite)?;
    tracing::debug!(journal_mode = %mode, "configured sqlite connection");

    Ok(())
}
