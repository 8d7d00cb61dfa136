//! NodeStore Store - persistence behind the record contract
//!
//! Provides:
//! - The `Driver` boundary and its SQLite implementation
//! - `StoreGateway` for saving, fetching and raw queries
//! - Migration framework with a checksummed `schema_version` ledger

pub mod db;
pub mod driver;
pub mod errors;
pub mod gateway;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use driver::{Driver, Row};
pub use errors::{DriverError, DriverResult};
pub use gateway::StoreGateway;
pub use migrations::{revert_migrations, run_migrations, Migration, Migrations, TableMigration};
pub use repo::SqliteDriver;
