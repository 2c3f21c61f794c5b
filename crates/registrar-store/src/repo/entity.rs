//! The seam between a session and the values it persists

use chrono::NaiveDateTime;
use registrar_core::errors::{ExError, ExErrorKind};
use registrar_core::schema::TableSchema;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::fmt;

use crate::errors::{from_rusqlite, Result};
use crate::schema::quote_identifier;

/// Timestamp layout written to SQLite; the same one rusqlite parses back
pub const TIMESTAMP_FORMAT: &str = "%F %T%.f";

/// A value a [`Session`](crate::Session) can insert into its table
pub trait Entity: Clone + fmt::Debug {
    /// Table the entity is stored in
    const TABLE: &'static str;

    /// SQL value for `column`, `None` if the entity has no such column
    fn column_value(&self, column: &str) -> Option<Value>;

    /// Fill columns left unset from the table's client-side defaults
    fn apply_defaults(&mut self, table: &TableSchema, now: NaiveDateTime);
}

/// Encode an optional timestamp as a SQL value
pub fn timestamp_value(ts: Option<NaiveDateTime>) -> Value {
    match ts {
        Some(ts) => Value::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
        None => Value::Null,
    }
}

/// Insert one row for `value` and return its backend-assigned id
///
/// Writes every column except the primary key, in table order.
pub fn insert_row<E: Entity>(conn: &Connection, table: &TableSchema, value: &E) -> Result<i64> {
    let columns = table.insertable_columns();

    let mut params = Vec::with_capacity(columns.len());
    for column in &columns {
        let v = value.column_value(&column.name).ok_or_else(|| {
            ExError::new(ExErrorKind::Schema)
                .with_op("insert")
                .with_table(table.name())
                .with_message(format!("Entity has no value for column {}", column.name))
        })?;
        params.push(v);
    }

    let names: Vec<String> = columns.iter().map(|c| quote_identifier(&c.name)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table.name()),
        names.join(", "),
        placeholders.join(", ")
    );

    conn.execute(&sql, rusqlite::params_from_iter(params))
        .map_err(|e| from_rusqlite(e).with_op("insert").with_table(table.name()))?;

    Ok(conn.last_insert_rowid())
}
