//! SQLite driver implementation
//!
//! Implements the [`Driver`] boundary over a single `rusqlite::Connection`.

use std::path::Path;

use nodestore_core::{ColumnKind, IdPolicy, Identifier, Schema, Value, ID_COLUMN};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OptionalExtension};

use crate::db;
use crate::driver::{Driver, Row};
use crate::errors::{from_rusqlite, DriverResult};
use crate::repo::hydration::{collect_rows, id_to_sql, to_sql};

/// SQLite-backed driver
pub struct SqliteDriver {
    conn: Connection,
}

impl SqliteDriver {
    /// Wrap an already-opened connection
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open (and configure) a database file, or `:memory:`
    pub fn open<P: AsRef<Path>>(path: P) -> DriverResult<Self> {
        Ok(Self::new(db::open(path)?))
    }

    pub fn open_in_memory() -> DriverResult<Self> {
        Ok(Self::new(db::open_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

/// Quote an SQL identifier, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::String => "TEXT",
        ColumnKind::Integer | ColumnKind::Bool => "INTEGER",
        ColumnKind::Float => "REAL",
    }
}

/// `CREATE TABLE` statement for a schema
pub fn create_table_sql(schema: &Schema) -> String {
    let id_column = match schema.id_policy() {
        IdPolicy::StoreAssigned => format!("{} INTEGER PRIMARY KEY", quote_ident(ID_COLUMN)),
        IdPolicy::ClientGenerated => format!("{} TEXT PRIMARY KEY NOT NULL", quote_ident(ID_COLUMN)),
    };
    let mut columns = vec![id_column];
    columns.extend(
        schema
            .columns()
            .iter()
            .map(|c| format!("{} {}", quote_ident(&c.name), column_type(c.kind))),
    );
    format!(
        "CREATE TABLE {} ({})",
        quote_ident(schema.entity()),
        columns.join(", ")
    )
}

/// Column list and bound values for an insert, identifier first when given
fn bind_row(
    schema: &Schema,
    id: Option<&Identifier>,
    row: &Row,
) -> DriverResult<(Vec<String>, Vec<SqlValue>)> {
    let mut names = Vec::with_capacity(schema.columns().len() + 1);
    let mut values = Vec::with_capacity(schema.columns().len() + 1);

    if let Some(id) = id {
        names.push(quote_ident(ID_COLUMN));
        values.push(id_to_sql(id));
    }
    for column in schema.columns() {
        let value = row.get(&column.name).unwrap_or(&Value::Null);
        names.push(quote_ident(&column.name));
        values.push(to_sql(&column.name, value)?);
    }

    Ok((names, values))
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bind_params(params: &[Value]) -> DriverResult<Vec<SqlValue>> {
    params
        .iter()
        .enumerate()
        .map(|(idx, v)| to_sql(&format!("?{}", idx + 1), v))
        .collect()
}

impl Driver for SqliteDriver {
    fn query(&self, sql: &str, params: &[Value]) -> DriverResult<Value> {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
        let bound = bind_params(params)?;
        let mut rows = stmt
            .query(params_from_iter(bound.iter()))
            .map_err(from_rusqlite)?;
        let rows = collect_rows(&mut rows, &names, &[])?;
        Ok(Value::Sequence(rows))
    }

    fn execute(&self, sql: &str, params: &[Value]) -> DriverResult<usize> {
        let bound = bind_params(params)?;
        self.conn
            .execute(sql, params_from_iter(bound.iter()))
            .map_err(from_rusqlite)
    }

    fn table_exists(&self, entity: &str) -> DriverResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [entity],
                |_| Ok(true),
            )
            .optional()
            .map_err(from_rusqlite)?;
        Ok(found.unwrap_or(false))
    }

    fn create_table(&self, schema: &Schema) -> DriverResult<()> {
        let sql = create_table_sql(schema);
        tracing::debug!(entity = schema.entity(), sql = %sql, "creating table");
        self.conn.execute_batch(&sql).map_err(from_rusqlite)
    }

    fn drop_table(&self, entity: &str) -> DriverResult<()> {
        tracing::debug!(entity, "dropping table");
        self.conn
            .execute_batch(&format!("DROP TABLE {}", quote_ident(entity)))
            .map_err(from_rusqlite)
    }

    fn insert(
        &self,
        schema: &Schema,
        id: Option<&Identifier>,
        row: &Row,
    ) -> DriverResult<Identifier> {
        let (names, values) = bind_row(schema, id, row)?;
        let sql = if names.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote_ident(schema.entity()))
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(schema.entity()),
                names.join(", "),
                placeholders(values.len())
            )
        };

        self.conn
            .execute(&sql, params_from_iter(values.iter()))
            .map_err(from_rusqlite)?;

        Ok(match id {
            Some(id) => id.clone(),
            None => Identifier::Integer(self.conn.last_insert_rowid()),
        })
    }

    fn upsert(&self, schema: &Schema, id: &Identifier, row: &Row) -> DriverResult<()> {
        let (names, values) = bind_row(schema, Some(id), row)?;
        let updates: Vec<String> = schema
            .columns()
            .iter()
            .map(|c| {
                let col = quote_ident(&c.name);
                format!("{} = excluded.{}", col, col)
            })
            .collect();
        let on_conflict = if updates.is_empty() {
            "DO NOTHING".to_string()
        } else {
            format!("DO UPDATE SET {}", updates.join(", "))
        };
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) {}",
            quote_ident(schema.entity()),
            names.join(", "),
            placeholders(values.len()),
            quote_ident(ID_COLUMN),
            on_conflict
        );

        self.conn
            .execute(&sql, params_from_iter(values.iter()))
            .map_err(from_rusqlite)?;
        Ok(())
    }

    fn select_all(&self, schema: &Schema) -> DriverResult<Vec<Value>> {
        let mut names = vec![ID_COLUMN.to_string()];
        let mut kinds = vec![None];
        for column in schema.columns() {
            names.push(column.name.clone());
            kinds.push(Some(column.kind));
        }
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            names
                .iter()
                .map(|n| quote_ident(n))
                .collect::<Vec<_>>()
                .join(", "),
            quote_ident(schema.entity()),
            quote_ident(ID_COLUMN)
        );

        let mut stmt = self.conn.prepare(&sql).map_err(from_rusqlite)?;
        let mut rows = stmt.query([]).map_err(from_rusqlite)?;
        collect_rows(&mut rows, &names, &kinds)
    }
}
