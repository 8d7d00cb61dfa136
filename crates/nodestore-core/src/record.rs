//! Record contract
//!
//! The capability set a domain type implements so the store gateway can move
//! it across the typed/untyped boundary: a schema declaration, `decode` from a
//! [`Value`], `encode` to a [`Value`], and the bookkeeping state the gateway
//! flips on persistence.

use crate::errors::{DecodeError, SchemaError};
use crate::identifier::Identifier;
use crate::schema::Schema;
use crate::value::Value;

/// Persistence bookkeeping carried by every record
///
/// Never part of the encoded value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordState {
    pub id: Option<Identifier>,
    pub exists: bool,
}

impl RecordState {
    /// Constructed in memory, no identifier yet
    pub fn transient() -> Self {
        Self::default()
    }

    /// Constructed in memory with a client-generated identifier
    pub fn transient_with_id(id: Identifier) -> Self {
        Self {
            id: Some(id),
            exists: false,
        }
    }

    /// Record the identifier the row was stored under and flip to existing
    pub fn mark_existing(&mut self, id: Identifier) {
        self.id = Some(id);
        self.exists = true;
    }
}

/// A typed domain entity that encodes to and decodes from a [`Value`]
pub trait Record: Sized {
    /// Backing table declaration; must match what `encode` produces
    fn schema() -> Schema;

    /// Reconstruct from a mapping
    ///
    /// Fails on the first required field that is absent or mistyped. Never
    /// marks the record as existing and never generates an identifier.
    fn decode(value: &Value) -> Result<Self, DecodeError>;

    /// Encode business fields, plus `id` when one is set
    fn encode(&self) -> Value;

    fn state(&self) -> &RecordState;

    fn state_mut(&mut self) -> &mut RecordState;

    /// Representative instance used to compare `schema()` with `encode()`
    fn probe() -> Self;

    fn id(&self) -> Option<&Identifier> {
        self.state().id.as_ref()
    }

    fn exists(&self) -> bool {
        self.state().exists
    }
}

/// Check a record type's declared schema against its encoded shape
///
/// Returns the verified schema so callers can register it.
pub fn verify_contract<R: Record>() -> Result<Schema, SchemaError> {
    let schema = R::schema();
    schema.validate()?;
    schema.check_encoded(&R::probe().encode())?;
    Ok(schema)
}
