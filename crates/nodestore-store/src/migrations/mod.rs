//! Migration framework
//!
//! Provides:
//! - `Migration` contract and `TableMigration` derived from a record schema
//! - `Migrations`, the caller-owned ordered registration list
//! - Runner with a checksummed ledger; rerunning skips applied migrations

mod checksums;
mod migration;
mod registry;
mod runner;

pub use checksums::compute_checksum;
pub use migration::{Migration, TableMigration};
pub use registry::Migrations;
pub use runner::{applied_migrations, revert_migrations, run_migrations, LEDGER_TABLE};
