//! Error handling for nodestore-store
//!
//! Driver-level errors plus helpers that lift them into the core taxonomy.

use nodestore_core::errors::{MigrationError, StoreError};
use thiserror::Error;

/// Failure reported by a [`Driver`](crate::driver::Driver)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// Uniqueness, not-null or value-shape violation
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for driver calls
pub type DriverResult<T> = std::result::Result<T, DriverError>;

impl From<DriverError> for StoreError {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::Constraint(message) => StoreError::Constraint(message),
            DriverError::Other(message) => StoreError::Driver(message),
        }
    }
}

/// Create a driver error from rusqlite::Error
///
/// SQLite constraint and datatype-mismatch failures become
/// `DriverError::Constraint`; everything else is `Other`.
pub fn from_rusqlite(err: rusqlite::Error) -> DriverError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.code,
                rusqlite::ErrorCode::ConstraintViolation | rusqlite::ErrorCode::TypeMismatch
            ) =>
        {
            DriverError::Constraint(err.to_string())
        }
        _ => DriverError::Other(err.to_string()),
    }
}

/// Create a migration failure from a driver error
pub fn migration_failure(migration_id: &str, err: DriverError) -> MigrationError {
    MigrationError::DriverFailure {
        migration_id: migration_id.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_is_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY NOT NULL)")
            .unwrap();
        conn.execute("INSERT INTO t (id) VALUES ('a')", []).unwrap();
        let err = conn
            .execute("INSERT INTO t (id) VALUES ('a')", [])
            .map_err(from_rusqlite)
            .unwrap_err();
        assert!(matches!(err, DriverError::Constraint(_)));
    }

    #[test]
    fn test_syntax_error_is_other() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .execute_batch("SELEKT 1")
            .map_err(from_rusqlite)
            .unwrap_err();
        assert!(matches!(err, DriverError::Other(_)));
    }

    #[test]
    fn test_lift_into_store_error() {
        assert_eq!(
            StoreError::from(DriverError::Constraint("dup".to_string())),
            StoreError::Constraint("dup".to_string())
        );
        assert_eq!(
            StoreError::from(DriverError::Other("io".to_string())),
            StoreError::Driver("io".to_string())
        );
    }
}
