//! NodeStore Core - the record/value persistence contract
//!
//! This crate provides the store-agnostic half of NodeStore:
//! - The `Value` tree records cross the store boundary in
//! - The `Record` contract (schema declaration, decode, encode, state)
//! - `Schema` declarations and the schema/serialization drift check
//! - The `Contact` and `Post` record types
//! - Error taxonomy and the canonical `ExError` facility
//! - Structured logging facility

pub mod errors;
pub mod identifier;
pub mod logging_facility;
pub mod model;
pub mod record;
pub mod schema;
pub mod value;

#[doc(hidden)]
pub use nodestore_core_types as core_types;

// Re-export commonly used types
pub use errors::{DecodeError, ExError, ExErrorKind, MigrationError, SchemaError, StoreError};
pub use identifier::Identifier;
pub use model::{Contact, Post};
pub use record::{verify_contract, Record, RecordState};
pub use schema::{Column, ColumnKind, IdPolicy, Schema, ID_COLUMN};
pub use value::{FromValue, Number, Value, ValueKind};
