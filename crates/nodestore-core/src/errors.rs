use thiserror::Error;

use crate::schema::ColumnKind;
use crate::value::ValueKind;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code the caller (HTTP layer, CLI) can match on
/// when turning a failure into a transport response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Decoding
    MissingField,
    TypeMismatch,

    // Declarations
    SchemaDrift,

    // Migrations
    AlreadyExists,
    ChecksumMismatch,

    // Store
    Connection,
    ConstraintViolation,
    Decode,
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::SchemaDrift => "ERR_SCHEMA_DRIFT",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::ChecksumMismatch => "ERR_CHECKSUM_MISMATCH",
            ExErrorKind::Connection => "ERR_CONNECTION",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Decode => "ERR_DECODE",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }

    /// True for failures caused by the caller's input rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExErrorKind::MissingField | ExErrorKind::TypeMismatch | ExErrorKind::ConstraintViolation
        )
    }
}

/// Canonical structured error type
///
/// Every domain error below converts into an `ExError`, which is what the
/// logging macros record and what outer layers classify.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    field: Option<String>,
    row: Option<usize>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            field: None,
            row: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table/entity context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add field/column context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add row index context
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(row) = self.row {
            write!(f, " (row: {})", row)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Failure reconstructing a typed record from a value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// A required key is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// The key is present but holds the wrong variant
    #[error("Type mismatch for field {field}: expected {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: ValueKind,
        actual: ValueKind,
    },
}

impl DecodeError {
    /// The field the failure is about
    pub fn field(&self) -> &str {
        match self {
            DecodeError::MissingField(field) => field,
            DecodeError::TypeMismatch { field, .. } => field,
        }
    }
}

/// A record type's declaration disagrees with itself or with its encoding
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Schema has an empty table name")]
    EmptyEntity,

    /// Business columns may not reuse the identifier column name
    #[error("Column {column} in {entity} is reserved for the identifier")]
    ReservedColumn { entity: String, column: String },

    #[error("Column {column} is declared twice in {entity}")]
    DuplicateColumn { entity: String, column: String },

    /// The record encodes to something other than a mapping
    #[error("Record for {entity} encodes to a {actual}, not a mapping")]
    NotAMapping { entity: String, actual: ValueKind },

    /// Declared in the schema but absent from the encoding
    #[error("Column {column} of {entity} is declared but never encoded")]
    ColumnNotEncoded { entity: String, column: String },

    /// Encoded by the record but absent from the schema
    #[error("Field {field} is encoded but not declared in the {entity} schema")]
    FieldNotDeclared { entity: String, field: String },

    #[error("Column {column} of {entity} is declared {declared} but encodes as {actual}")]
    KindMismatch {
        entity: String,
        column: String,
        declared: ColumnKind,
        actual: ValueKind,
    },

    /// Two registrations produce the same migration id
    #[error("Migration {migration_id} is registered twice")]
    DuplicateMigration { migration_id: String },
}

impl SchemaError {
    pub fn entity(&self) -> Option<&str> {
        match self {
            SchemaError::EmptyEntity | SchemaError::DuplicateMigration { .. } => None,
            SchemaError::ReservedColumn { entity, .. }
            | SchemaError::DuplicateColumn { entity, .. }
            | SchemaError::NotAMapping { entity, .. }
            | SchemaError::ColumnNotEncoded { entity, .. }
            | SchemaError::FieldNotDeclared { entity, .. }
            | SchemaError::KindMismatch { entity, .. } => Some(entity),
        }
    }
}

/// Failure applying or reverting a migration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrationError {
    /// `apply` found the table it was about to create
    #[error("Table already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Migration {migration_id} failed: {message}")]
    DriverFailure {
        migration_id: String,
        message: String,
    },

    /// The ledger recorded a different declaration than the one registered now
    #[error(
        "Checksum mismatch for migration {migration_id}: recorded {recorded}, declared {declared}"
    )]
    ChecksumMismatch {
        migration_id: String,
        recorded: String,
        declared: String,
    },
}

/// Failure of a store gateway operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// No backing driver is attached to the gateway
    #[error("No database connection")]
    Connection,

    /// Uniqueness or shape violation reported by the driver
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A fetched row did not decode; the whole batch fails
    #[error("Failed to decode row {row}: {source}")]
    Decode { row: usize, source: DecodeError },

    #[error("Driver error: {0}")]
    Driver(String),
}

impl From<DecodeError> for ExError {
    fn from(err: DecodeError) -> Self {
        let kind = match err {
            DecodeError::MissingField(_) => ExErrorKind::MissingField,
            DecodeError::TypeMismatch { .. } => ExErrorKind::TypeMismatch,
        };
        ExError::new(kind)
            .with_op("decode")
            .with_field(err.field())
            .with_message(err.to_string())
    }
}

impl From<SchemaError> for ExError {
    fn from(err: SchemaError) -> Self {
        let ex = ExError::new(ExErrorKind::SchemaDrift)
            .with_op("verify_schema")
            .with_message(err.to_string());
        match err.entity() {
            Some(entity) => ex.with_entity(entity),
            None => ex,
        }
    }
}

impl From<MigrationError> for ExError {
    fn from(err: MigrationError) -> Self {
        let message = err.to_string();
        match err {
            MigrationError::AlreadyExists { entity } => ExError::new(ExErrorKind::AlreadyExists)
                .with_op("migration")
                .with_entity(entity)
                .with_message(message),
            MigrationError::DriverFailure { .. } => ExError::new(ExErrorKind::Persistence)
                .with_op("migration")
                .with_message(message),
            MigrationError::ChecksumMismatch { .. } => {
                ExError::new(ExErrorKind::ChecksumMismatch)
                    .with_op("migration_checksum")
                    .with_message(message)
            }
        }
    }
}

impl From<StoreError> for ExError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::Connection => ExError::new(ExErrorKind::Connection).with_message(message),
            StoreError::Constraint(_) => {
                ExError::new(ExErrorKind::ConstraintViolation).with_message(message)
            }
            StoreError::Decode { row, source } => ExError::new(ExErrorKind::Decode)
                .with_row(row)
                .with_field(source.field())
                .with_message(message),
            StoreError::Driver(_) => ExError::new(ExErrorKind::Persistence).with_message(message),
        }
    }
}
