//! Migration contract and the table migration derived from a record schema

use nodestore_core::{verify_contract, MigrationError, Record, Schema, SchemaError};

use crate::driver::Driver;
use crate::errors::migration_failure;

/// One reversible change to the backing store
pub trait Migration {
    /// Stable identifier recorded in the ledger
    fn id(&self) -> &str;

    /// Canonical text of what `apply` creates; its checksum is recorded
    fn declaration(&self) -> String;

    fn apply(&self, driver: &dyn Driver) -> Result<(), MigrationError>;

    /// Exact structural inverse of `apply`
    fn revert(&self, driver: &dyn Driver) -> Result<(), MigrationError>;
}

/// Creates (and on revert drops) the table of one record type
///
/// `apply` does not tolerate an existing table and `revert` does not tolerate
/// a missing one. Skipping already-applied migrations is the runner's job.
#[derive(Debug, Clone)]
pub struct TableMigration {
    id: String,
    schema: Schema,
}

impl TableMigration {
    /// Build the migration for `R`, checking its schema against its encoding
    pub fn for_record<R: Record>() -> Result<Self, SchemaError> {
        let schema = verify_contract::<R>()?;
        Ok(Self {
            id: format!("create_{}", schema.entity()),
            schema,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Migration for TableMigration {
    fn id(&self) -> &str {
        &self.id
    }

    fn declaration(&self) -> String {
        self.schema.to_string()
    }

    fn apply(&self, driver: &dyn Driver) -> Result<(), MigrationError> {
        let entity = self.schema.entity();
        if driver
            .table_exists(entity)
            .map_err(|e| migration_failure(&self.id, e))?
        {
            return Err(MigrationError::AlreadyExists {
                entity: entity.to_string(),
            });
        }
        driver
            .create_table(&self.schema)
            .map_err(|e| migration_failure(&self.id, e))
    }

    fn revert(&self, driver: &dyn Driver) -> Result<(), MigrationError> {
        driver
            .drop_table(self.schema.entity())
            .map_err(|e| migration_failure(&self.id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::SqliteDriver;
    use nodestore_core::{Contact, Post};

    #[test]
    fn test_ids_follow_entity() {
        assert_eq!(
            TableMigration::for_record::<Contact>().unwrap().id(),
            "create_contacts"
        );
        assert_eq!(
            TableMigration::for_record::<Post>().unwrap().id(),
            "create_posts"
        );
    }

    #[test]
    fn test_apply_then_revert_leaves_no_table() {
        let driver = SqliteDriver::open_in_memory().unwrap();
        let migration = TableMigration::for_record::<Contact>().unwrap();

        migration.apply(&driver).unwrap();
        assert!(driver.table_exists("contacts").unwrap());

        migration.revert(&driver).unwrap();
        assert!(!driver.table_exists("contacts").unwrap());
    }

    #[test]
    fn test_apply_twice_is_already_exists() {
        let driver = SqliteDriver::open_in_memory().unwrap();
        let migration = TableMigration::for_record::<Post>().unwrap();

        migration.apply(&driver).unwrap();
        assert_eq!(
            migration.apply(&driver),
            Err(MigrationError::AlreadyExists {
                entity: "posts".to_string()
            })
        );
    }

    #[test]
    fn test_revert_without_apply_is_driver_failure() {
        let driver = SqliteDriver::open_in_memory().unwrap();
        let migration = TableMigration::for_record::<Post>().unwrap();
        assert!(matches!(
            migration.revert(&driver),
            Err(MigrationError::DriverFailure { .. })
        ));
    }
}
