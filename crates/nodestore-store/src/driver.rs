//! Store driver boundary
//!
//! The gateway and the migration runner talk to the backing store only
//! through this trait, so neither depends on a wire protocol.

use std::collections::BTreeMap;

use nodestore_core::{Identifier, Schema, Value};

use crate::errors::DriverResult;

/// A row of business columns keyed by column name (identifier excluded)
pub type Row = BTreeMap<String, Value>;

/// Handle to a backing store
pub trait Driver {
    /// Run a statement with positional parameters and return every result
    /// row as a `Value::Mapping` inside a `Value::Sequence`
    fn query(&self, sql: &str, params: &[Value]) -> DriverResult<Value>;

    /// Run a statement with positional parameters, returning rows changed
    fn execute(&self, sql: &str, params: &[Value]) -> DriverResult<usize>;

    /// Run a statement verbatim
    fn raw(&self, sql: &str) -> DriverResult<Value> {
        self.query(sql, &[])
    }

    fn table_exists(&self, entity: &str) -> DriverResult<bool>;

    /// Create the table for `schema`, identifier column first
    fn create_table(&self, schema: &Schema) -> DriverResult<()>;

    /// Drop a table; fails if it does not exist
    fn drop_table(&self, entity: &str) -> DriverResult<()>;

    /// Insert a new row and return the identifier it was stored under
    ///
    /// With `id == None` the store assigns one.
    fn insert(&self, schema: &Schema, id: Option<&Identifier>, row: &Row)
        -> DriverResult<Identifier>;

    /// Overwrite the row keyed by `id`, inserting it if it is gone
    fn upsert(&self, schema: &Schema, id: &Identifier, row: &Row) -> DriverResult<()>;

    /// Every row of the schema's table as a mapping including `id`,
    /// ordered by identifier
    fn select_all(&self, schema: &Schema) -> DriverResult<Vec<Value>>;
}
