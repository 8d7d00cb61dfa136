//! Ordered migration registration
//!
//! The list is built and owned by the startup routine and handed to the
//! runner; there is no process-wide registry.

use nodestore_core::{Record, SchemaError};

use crate::migrations::migration::{Migration, TableMigration};

/// Migrations in registration order
#[derive(Default)]
pub struct Migrations {
    entries: Vec<Box<dyn Migration>>,
}

impl Migrations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the table migration for a record type
    ///
    /// Fails if the record's declared schema and its encoding disagree, or
    /// if the record type is already registered.
    pub fn register<R: Record>(self) -> Result<Self, SchemaError> {
        self.push(TableMigration::for_record::<R>()?)
    }

    /// Append a hand-written migration
    ///
    /// # Errors
    ///
    /// `DuplicateMigration` if a migration with the same id is registered.
    pub fn push(mut self, migration: impl Migration + 'static) -> Result<Self, SchemaError> {
        if self.entries.iter().any(|m| m.id() == migration.id()) {
            return Err(SchemaError::DuplicateMigration {
                migration_id: migration.id().to_string(),
            });
        }
        tracing::debug!(migration_id = migration.id(), "migration registered");
        self.entries.push(Box::new(migration));
        Ok(self)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Box<dyn Migration>> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|m| m.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodestore_core::{Contact, Post};

    #[test]
    fn test_registration_order_is_kept() {
        let migrations = Migrations::new()
            .register::<Post>()
            .unwrap()
            .register::<Contact>()
            .unwrap();
        assert_eq!(migrations.ids(), vec!["create_posts", "create_contacts"]);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let result = Migrations::new()
            .register::<Contact>()
            .unwrap()
            .register::<Contact>();
        assert!(matches!(
            result,
            Err(SchemaError::DuplicateMigration { ref migration_id }) if migration_id == "create_contacts"
        ));
    }
}
