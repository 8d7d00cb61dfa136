//! Store gateway
//!
//! Moves records between the typed domain layer and a [`Driver`]:
//! `save` encodes and inserts or upserts, `fetch_all` decodes every row of a
//! record type's table, `raw_query` passes text straight to the driver.
//!
//! The gateway is constructed with a driver and handed to whoever needs it;
//! a detached gateway fails every operation with `StoreError::Connection`.

use std::time::Instant;

use nodestore_core::{
    log_op_end, log_op_error, log_op_start, DecodeError, IdPolicy, Identifier, Record, Schema,
    StoreError, Value, ID_COLUMN,
};

use crate::driver::{Driver, Row};

/// Typed entry point to a backing store
pub struct StoreGateway {
    driver: Option<Box<dyn Driver>>,
}

impl StoreGateway {
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self {
            driver: Some(Box::new(driver)),
        }
    }

    /// Gateway with no backing driver
    pub fn detached() -> Self {
        Self { driver: None }
    }

    pub fn is_attached(&self) -> bool {
        self.driver.is_some()
    }

    /// The attached driver
    ///
    /// # Errors
    ///
    /// `StoreError::Connection` when detached.
    pub fn driver(&self) -> Result<&dyn Driver, StoreError> {
        self.driver.as_deref().ok_or(StoreError::Connection)
    }

    /// Persist a record and return it marked as existing
    ///
    /// A transient record is inserted; an existing one is upserted under its
    /// identifier, so saving twice leaves one stored row. A client-generated
    /// record with no identifier gets a fresh token first.
    ///
    /// # Errors
    ///
    /// - `Connection` when detached
    /// - `Constraint` for duplicate identifiers, an identifier whose shape
    ///   does not match the record's id policy, values the table cannot
    ///   hold, or an encoding that disagrees with the schema
    /// - `Driver` for any other store failure
    pub fn save<R: Record>(&self, record: R) -> Result<R, StoreError> {
        let schema = R::schema();
        log_op_start!("save", entity = schema.entity());
        let start = Instant::now();

        let saved = self.save_impl(&schema, record).map_err(|e| {
            log_op_error!(
                "save",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                entity = schema.entity()
            );
            e
        })?;

        log_op_end!(
            "save",
            duration_ms = start.elapsed().as_millis() as u64,
            entity = schema.entity(),
            record_id = %display_id(saved.id())
        );

        Ok(saved)
    }

    fn save_impl<R: Record>(&self, schema: &Schema, mut record: R) -> Result<R, StoreError> {
        let driver = self.driver()?;

        if schema.id_policy() == IdPolicy::ClientGenerated && record.id().is_none() {
            record.state_mut().id = Some(Identifier::generate());
        }
        if let Some(id) = record.id() {
            if !schema.id_policy().accepts(id) {
                return Err(StoreError::Constraint(format!(
                    "identifier {} does not fit the {} policy of {}",
                    id,
                    schema.id_policy().as_str(),
                    schema.entity()
                )));
            }
        }

        let encoded = record.encode();
        schema
            .check_encoded(&encoded)
            .map_err(|e| StoreError::Constraint(e.to_string()))?;
        let mut row: Row = encoded.as_mapping().cloned().unwrap_or_default();
        row.remove(ID_COLUMN);

        let id = if record.exists() {
            let id = record.id().ok_or_else(|| {
                StoreError::Constraint(format!(
                    "existing {} record has no identifier",
                    schema.entity()
                ))
            })?;
            driver.upsert(schema, id, &row)?;
            id.clone()
        } else {
            driver.insert(schema, record.id(), &row)?
        };

        tracing::debug!(entity = schema.entity(), record_id = %id, "row written");
        record.state_mut().mark_existing(id);
        Ok(record)
    }

    /// Every stored record of type `R`, ordered by identifier
    ///
    /// Each returned record is marked existing and carries its identifier.
    ///
    /// # Errors
    ///
    /// - `Connection` when detached
    /// - `Decode { row, .. }` if any row fails to decode; no partial result
    ///   is returned
    /// - `Driver` for store failures, including a missing table
    pub fn fetch_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let schema = R::schema();
        log_op_start!("fetch_all", entity = schema.entity());
        let start = Instant::now();

        let records = self.fetch_all_impl::<R>(&schema).map_err(|e| {
            log_op_error!(
                "fetch_all",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                entity = schema.entity()
            );
            e
        })?;

        log_op_end!(
            "fetch_all",
            duration_ms = start.elapsed().as_millis() as u64,
            entity = schema.entity(),
            row_count = records.len()
        );

        Ok(records)
    }

    fn fetch_all_impl<R: Record>(&self, schema: &Schema) -> Result<Vec<R>, StoreError> {
        let rows = self.driver()?.select_all(schema)?;

        rows.iter()
            .enumerate()
            .map(|(row, value)| {
                let mut record =
                    R::decode(value).map_err(|source| StoreError::Decode { row, source })?;
                let id = record.id().cloned().ok_or_else(|| StoreError::Decode {
                    row,
                    source: DecodeError::MissingField(ID_COLUMN.to_string()),
                })?;
                record.state_mut().mark_existing(id);
                Ok(record)
            })
            .collect()
    }

    /// Run query text verbatim and return the driver's result untouched
    ///
    /// # Errors
    ///
    /// `Connection` when detached; every driver failure is `Driver`.
    pub fn raw_query(&self, text: &str) -> Result<Value, StoreError> {
        log_op_start!("raw_query");
        let start = Instant::now();

        let result = self
            .driver()
            .and_then(|driver| {
                driver
                    .raw(text)
                    .map_err(|e| StoreError::Driver(e.to_string()))
            })
            .map_err(|e| {
                log_op_error!(
                    "raw_query",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!(
            "raw_query",
            duration_ms = start.elapsed().as_millis() as u64
        );

        Ok(result)
    }
}

fn display_id(id: Option<&Identifier>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::SqliteDriver;
    use nodestore_core::Contact;

    #[test]
    fn test_detached_gateway_refuses_everything() {
        let gateway = StoreGateway::detached();
        assert!(!gateway.is_attached());
        assert_eq!(
            gateway.save(Contact::new("Ada", "ada@example.org")).unwrap_err(),
            StoreError::Connection
        );
        assert_eq!(
            gateway.fetch_all::<Contact>().unwrap_err(),
            StoreError::Connection
        );
        assert_eq!(
            gateway.raw_query("SELECT 1").unwrap_err(),
            StoreError::Connection
        );
    }

    #[test]
    fn test_fetch_without_table_is_driver_error() {
        let gateway = StoreGateway::new(SqliteDriver::open_in_memory().unwrap());
        assert!(matches!(
            gateway.fetch_all::<Contact>(),
            Err(StoreError::Driver(_))
        ));
    }

    #[test]
    fn test_display_id() {
        assert_eq!(display_id(None), "");
        assert_eq!(display_id(Some(&Identifier::Integer(4))), "4");
    }
}
