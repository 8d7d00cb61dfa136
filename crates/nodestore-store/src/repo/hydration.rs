//! Hydration layer - converts between SQLite cells and `Value`s
//!
//! Writes lower a `Value` into a SQLite value; reads lift a result row back
//! into a `Value::Mapping` keyed by column name.

use std::collections::BTreeMap;

use nodestore_core::{ColumnKind, Identifier, Number, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};

use crate::errors::{from_rusqlite, DriverError, DriverResult};

/// Lower one column value for binding
///
/// Sequences and mappings have no column representation and are rejected as
/// shape violations.
pub fn to_sql(column: &str, value: &Value) -> DriverResult<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
        Value::Number(Number::Integer(i)) => Ok(SqlValue::Integer(*i)),
        Value::Number(Number::Float(f)) => Ok(SqlValue::Real(*f)),
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        other => Err(DriverError::Constraint(format!(
            "column {} cannot store a {}",
            column,
            other.kind()
        ))),
    }
}

pub fn id_to_sql(id: &Identifier) -> SqlValue {
    match id {
        Identifier::Integer(i) => SqlValue::Integer(*i),
        Identifier::Token(t) => SqlValue::Text(t.clone()),
    }
}

/// Lift one cell; integers in a `Bool` column become booleans
pub fn from_sql(cell: ValueRef<'_>, kind: Option<ColumnKind>) -> DriverResult<Value> {
    let value = match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) if kind == Some(ColumnKind::Bool) => Value::Bool(i != 0),
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| DriverError::Other(format!("invalid UTF-8 in text column: {}", e)))?;
            Value::from(text)
        }
        ValueRef::Blob(bytes) => {
            Value::Sequence(bytes.iter().map(|b| Value::from(i64::from(*b))).collect())
        }
    };
    Ok(value)
}

/// Drain a statement's rows into `Value::Mapping`s
///
/// `kinds` is indexed like the result columns; `None` means "no declared kind".
pub fn collect_rows(
    rows: &mut rusqlite::Rows<'_>,
    names: &[String],
    kinds: &[Option<ColumnKind>],
) -> DriverResult<Vec<Value>> {
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(from_rusqlite)? {
        let mut map = BTreeMap::new();
        for (idx, name) in names.iter().enumerate() {
            let cell = row.get_ref(idx).map_err(from_rusqlite)?;
            let kind = kinds.get(idx).copied().flatten();
            map.insert(name.clone(), from_sql(cell, kind)?);
        }
        out.push(Value::Mapping(map));
    }
    Ok(out)
}
