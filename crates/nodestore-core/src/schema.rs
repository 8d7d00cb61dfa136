//! Schema declarations
//!
//! A `Schema` names the backing table of a record type, how its identifier is
//! produced, and the ordered business columns. The identifier column is
//! implicit and always comes first.

use std::collections::BTreeSet;
use std::fmt;

use crate::errors::SchemaError;
use crate::identifier::Identifier;
use crate::value::{Number, Value};

/// Name of the identifier column every table carries
pub const ID_COLUMN: &str = "id";

/// Storage kind of a business column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    String,
    Integer,
    Float,
    Bool,
}

impl ColumnKind {
    /// Whether an encoded value fits this column; `Null` fits any column
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (ColumnKind::String, Value::String(_))
                | (ColumnKind::Integer, Value::Number(Number::Integer(_)))
                | (ColumnKind::Float, Value::Number(_))
                | (ColumnKind::Bool, Value::Bool(_))
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::String => "string",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Bool => "bool",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a record type obtains its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// The store assigns an integer row id on insert
    StoreAssigned,
    /// The client generates an opaque token before the first insert
    ClientGenerated,
}

impl IdPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPolicy::StoreAssigned => "store_assigned",
            IdPolicy::ClientGenerated => "client_generated",
        }
    }

    /// Whether `id` has the shape this policy produces
    ///
    /// Store-assigned ids are integers, client-generated ids are tokens.
    pub fn accepts(&self, id: &Identifier) -> bool {
        match self {
            IdPolicy::StoreAssigned => matches!(id, Identifier::Integer(_)),
            IdPolicy::ClientGenerated => id.is_token(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Table declaration for one record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    entity: String,
    id_policy: IdPolicy,
    columns: Vec<Column>,
}

impl Schema {
    /// Start a declaration for `entity` with no business columns
    pub fn new(entity: impl Into<String>, id_policy: IdPolicy) -> Self {
        Self {
            entity: entity.into(),
            id_policy,
            columns: Vec::new(),
        }
    }

    /// Append a column of the given kind
    pub fn column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(Column {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn string(self, name: impl Into<String>) -> Self {
        self.column(name, ColumnKind::String)
    }

    pub fn integer(self, name: impl Into<String>) -> Self {
        self.column(name, ColumnKind::Integer)
    }

    pub fn float(self, name: impl Into<String>) -> Self {
        self.column(name, ColumnKind::Float)
    }

    pub fn bool(self, name: impl Into<String>) -> Self {
        self.column(name, ColumnKind::Bool)
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// Business columns in declaration order (identifier excluded)
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Check the declaration on its own
    ///
    /// # Errors
    ///
    /// `EmptyEntity`, `ReservedColumn` if a business column is named
    /// [`ID_COLUMN`], `DuplicateColumn`.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.entity.trim().is_empty() {
            return Err(SchemaError::EmptyEntity);
        }

        let mut seen = BTreeSet::new();
        for column in &self.columns {
            if column.name == ID_COLUMN {
                return Err(SchemaError::ReservedColumn {
                    entity: self.entity.clone(),
                    column: column.name.clone(),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    entity: self.entity.clone(),
                    column: column.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Check that an encoded record has exactly the declared columns
    ///
    /// The identifier key is ignored. Every declared column must be encoded,
    /// every encoded key must be declared, and each value must fit its
    /// column kind.
    pub fn check_encoded(&self, encoded: &Value) -> Result<(), SchemaError> {
        let map = encoded.as_mapping().ok_or_else(|| SchemaError::NotAMapping {
            entity: self.entity.clone(),
            actual: encoded.kind(),
        })?;

        for key in map.keys().filter(|k| k.as_str() != ID_COLUMN) {
            if !self.columns.iter().any(|c| &c.name == key) {
                return Err(SchemaError::FieldNotDeclared {
                    entity: self.entity.clone(),
                    field: key.clone(),
                });
            }
        }

        for column in &self.columns {
            let value = map
                .get(&column.name)
                .ok_or_else(|| SchemaError::ColumnNotEncoded {
                    entity: self.entity.clone(),
                    column: column.name.clone(),
                })?;
            if !column.kind.accepts(value) {
                return Err(SchemaError::KindMismatch {
                    entity: self.entity.clone(),
                    column: column.name.clone(),
                    declared: column.kind,
                    actual: value.kind(),
                });
            }
        }

        Ok(())
    }
}

/// Canonical one-line form, e.g. `contacts(id:store_assigned,name:string)`
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}:{}", self.entity, ID_COLUMN, self.id_policy.as_str())?;
        for column in &self.columns {
            write!(f, ",{}:{}", column.name, column.kind)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn contacts() -> Schema {
        Schema::new("contacts", IdPolicy::StoreAssigned)
            .string("name")
            .string("email")
    }

    #[test]
    fn test_id_policy_accepts_matching_identifiers() {
        assert!(IdPolicy::StoreAssigned.accepts(&Identifier::Integer(5)));
        assert!(!IdPolicy::StoreAssigned.accepts(&Identifier::Token("7".to_string())));
        assert!(IdPolicy::ClientGenerated.accepts(&Identifier::generate()));
        assert!(!IdPolicy::ClientGenerated.accepts(&Identifier::Integer(5)));
    }

    #[test]
    fn test_columns_keep_declaration_order() {
        let schema = contacts();
        let names: Vec<&str> = schema.column_names().collect();
        assert_eq!(names, vec!["name", "email"]);
    }

    #[test]
    fn test_canonical_display() {
        assert_eq!(
            contacts().to_string(),
            "contacts(id:store_assigned,name:string,email:string)"
        );
    }

    #[test]
    fn test_validate_rejects_reserved_and_duplicate() {
        let reserved = Schema::new("t", IdPolicy::StoreAssigned).string("id");
        assert!(matches!(
            reserved.validate(),
            Err(SchemaError::ReservedColumn { .. })
        ));

        let dup = Schema::new("t", IdPolicy::StoreAssigned)
            .string("a")
            .integer("a");
        assert!(matches!(
            dup.validate(),
            Err(SchemaError::DuplicateColumn { .. })
        ));

        let empty = Schema::new(" ", IdPolicy::StoreAssigned);
        assert_eq!(empty.validate(), Err(SchemaError::EmptyEntity));
    }

    #[test]
    fn test_check_encoded_detects_missing_column() {
        let encoded = Value::mapping([("name", Value::from("Ada"))]);
        assert_eq!(
            contacts().check_encoded(&encoded),
            Err(SchemaError::ColumnNotEncoded {
                entity: "contacts".to_string(),
                column: "email".to_string(),
            })
        );
    }

    #[test]
    fn test_check_encoded_detects_undeclared_field() {
        let schema = Schema::new("contacts", IdPolicy::StoreAssigned).string("name");
        let encoded = Value::mapping([
            ("id", Value::from(1_i64)),
            ("name", Value::from("Ada")),
            ("email", Value::from("ada@example.org")),
        ]);
        assert_eq!(
            schema.check_encoded(&encoded),
            Err(SchemaError::FieldNotDeclared {
                entity: "contacts".to_string(),
                field: "email".to_string(),
            })
        );
    }

    #[test]
    fn test_check_encoded_detects_kind_mismatch() {
        let encoded = Value::mapping([
            ("name", Value::from("Ada")),
            ("email", Value::from(3_i64)),
        ]);
        assert_eq!(
            contacts().check_encoded(&encoded),
            Err(SchemaError::KindMismatch {
                entity: "contacts".to_string(),
                column: "email".to_string(),
                declared: ColumnKind::String,
                actual: ValueKind::Integer,
            })
        );
    }

    #[test]
    fn test_null_fits_any_column() {
        for kind in [
            ColumnKind::String,
            ColumnKind::Integer,
            ColumnKind::Float,
            ColumnKind::Bool,
        ] {
            assert!(kind.accepts(&Value::Null));
        }
        assert!(ColumnKind::Float.accepts(&Value::from(1_i64)));
        assert!(!ColumnKind::Integer.accepts(&Value::from(1.5)));
    }
}
