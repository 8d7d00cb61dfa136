//! Migration runner
//!
//! Applies registered migrations in order, recording each in the
//! `schema_version` ledger with a checksum of its declaration. Recorded
//! migrations are skipped, so rerunning at every process start is safe.

use std::collections::BTreeMap;
use std::time::Instant;

use nodestore_core::{log_op_end, log_op_error, log_op_start, MigrationError, Value};

use crate::driver::Driver;
use crate::errors::migration_failure;
use crate::migrations::checksums::compute_checksum;
use crate::migrations::registry::Migrations;

/// Ledger table name
pub const LEDGER_TABLE: &str = "schema_version";

const LEDGER_ID: &str = "schema_version";

/// Apply all pending migrations, returning how many were newly applied
///
/// # Errors
///
/// - `ChecksumMismatch` if a recorded migration's declaration has changed
/// - whatever the failing migration's `apply` returns; earlier migrations
///   stay applied and recorded
pub fn run_migrations(
    migrations: &Migrations,
    driver: &dyn Driver,
) -> Result<usize, MigrationError> {
    log_op_start!("run_migrations", registered = migrations.len());
    let start = Instant::now();

    let result = run_migrations_impl(migrations, driver).map_err(|e| {
        log_op_error!(
            "run_migrations",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "run_migrations",
        duration_ms = start.elapsed().as_millis() as u64,
        applied = result
    );

    Ok(result)
}

fn run_migrations_impl(
    migrations: &Migrations,
    driver: &dyn Driver,
) -> Result<usize, MigrationError> {
    create_ledger_table(driver)?;
    let recorded = recorded_checksums(driver)?;

    let mut applied = 0;
    for migration in migrations.iter() {
        let checksum = compute_checksum(&migration.declaration());

        match recorded.get(migration.id()) {
            Some(previous) if *previous == checksum => {
                tracing::debug!(migration_id = migration.id(), "already applied");
            }
            Some(previous) => {
                return Err(MigrationError::ChecksumMismatch {
                    migration_id: migration.id().to_string(),
                    recorded: previous.clone(),
                    declared: checksum,
                });
            }
            None => {
                migration.apply(driver)?;
                record_migration(driver, migration.id(), &checksum)?;
                tracing::debug!(migration_id = migration.id(), "applied");
                applied += 1;
            }
        }
    }

    Ok(applied)
}

/// Revert every recorded migration in reverse registration order
///
/// Returns how many were reverted. Unrecorded migrations are left alone.
pub fn revert_migrations(
    migrations: &Migrations,
    driver: &dyn Driver,
) -> Result<usize, MigrationError> {
    log_op_start!("revert_migrations", registered = migrations.len());
    let start = Instant::now();

    let result = revert_migrations_impl(migrations, driver).map_err(|e| {
        log_op_error!(
            "revert_migrations",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "revert_migrations",
        duration_ms = start.elapsed().as_millis() as u64,
        reverted = result
    );

    Ok(result)
}

fn revert_migrations_impl(
    migrations: &Migrations,
    driver: &dyn Driver,
) -> Result<usize, MigrationError> {
    create_ledger_table(driver)?;
    let recorded = recorded_checksums(driver)?;

    let mut reverted = 0;
    for migration in migrations.iter().rev() {
        if !recorded.contains_key(migration.id()) {
            continue;
        }
        migration.revert(driver)?;
        forget_migration(driver, migration.id())?;
        tracing::debug!(migration_id = migration.id(), "reverted");
        reverted += 1;
    }

    Ok(reverted)
}

/// Ids of recorded migrations in the order they were applied
pub fn applied_migrations(driver: &dyn Driver) -> Result<Vec<String>, MigrationError> {
    create_ledger_table(driver)?;
    let rows = driver
        .raw("SELECT migration_id FROM schema_version ORDER BY id")
        .map_err(|e| migration_failure(LEDGER_ID, e))?;

    ledger_rows(&rows)?
        .iter()
        .map(|row| {
            row.extract::<String>("migration_id")
                .map_err(|e| ledger_corrupt(&e.to_string()))
        })
        .collect()
}

/// Create the schema_version table if it doesn't exist
fn create_ledger_table(driver: &dyn Driver) -> Result<(), MigrationError> {
    driver
        .execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                id INTEGER PRIMARY KEY,
                migration_id TEXT NOT NULL UNIQUE,
                applied_at INTEGER NOT NULL,
                checksum TEXT NOT NULL
            )",
            &[],
        )
        .map_err(|e| migration_failure(LEDGER_ID, e))?;
    Ok(())
}

fn recorded_checksums(driver: &dyn Driver) -> Result<BTreeMap<String, String>, MigrationError> {
    let rows = driver
        .raw("SELECT migration_id, checksum FROM schema_version")
        .map_err(|e| migration_failure(LEDGER_ID, e))?;

    let mut recorded = BTreeMap::new();
    for row in ledger_rows(&rows)? {
        let id: String = row
            .extract("migration_id")
            .map_err(|e| ledger_corrupt(&e.to_string()))?;
        let checksum: String = row
            .extract("checksum")
            .map_err(|e| ledger_corrupt(&e.to_string()))?;
        recorded.insert(id, checksum);
    }
    Ok(recorded)
}

fn record_migration(
    driver: &dyn Driver,
    migration_id: &str,
    checksum: &str,
) -> Result<(), MigrationError> {
    let now = chrono::Utc::now().timestamp();
    driver
        .execute(
            "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
            &[
                Value::from(migration_id),
                Value::from(now),
                Value::from(checksum),
            ],
        )
        .map_err(|e| migration_failure(migration_id, e))?;
    Ok(())
}

fn forget_migration(driver: &dyn Driver, migration_id: &str) -> Result<(), MigrationError> {
    driver
        .execute(
            "DELETE FROM schema_version WHERE migration_id = ?1",
            &[Value::from(migration_id)],
        )
        .map_err(|e| migration_failure(migration_id, e))?;
    Ok(())
}

fn ledger_rows(rows: &Value) -> Result<&[Value], MigrationError> {
    rows.as_sequence()
        .ok_or_else(|| ledger_corrupt("ledger query did not return rows"))
}

fn ledger_corrupt(message: &str) -> MigrationError {
    MigrationError::DriverFailure {
        migration_id: LEDGER_ID.to_string(),
        message: message.to_string(),
    }
}
