//! Schema materialization
//!
//! Creates tables, constraints and indexes if absent, and records the
//! checksum of each table's DDL in a ledger so that re-running is a no-op and
//! a changed definition is reported instead of silently ignored.

use registrar_core::errors::RegistrarError;
use registrar_core::schema::{SchemaDescription, TableSchema};
use registrar_core::{log_op_end, log_op_error, log_op_start};
use registrar_core_types::events::op;
use rusqlite::{Connection, OptionalExtension};

use super::checksums::compute_checksum;
use super::ddl::render_ddl;
use crate::db::Database;
use crate::errors::{from_rusqlite, schema_error, Result};

/// Bookkeeping table holding one row per materialized table
pub const LEDGER_TABLE: &str = "registrar_schema";

/// Materialize every table of `schema` on `db`
///
/// Idempotent: tables already recorded with the same checksum are skipped.
///
/// ## Errors
///
/// - `ExErrorKind::Schema`: the description is malformed, the backend
///   rejected the DDL, or a table was previously materialized with a
///   different definition
pub fn materialize(schema: &SchemaDescription, db: &mut Database) -> Result<()> {
    log_op_start!(op::MATERIALIZE, tables = schema.tables().len());
    let start = std::time::Instant::now();

    materialize_impl(schema, db).map_err(|e| {
        log_op_error!(
            op::MATERIALIZE,
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        op::MATERIALIZE,
        duration_ms = start.elapsed().as_millis() as u64
    );

    Ok(())
}

fn materialize_impl(schema: &SchemaDescription, db: &mut Database) -> Result<()> {
    // A malformed description must not leave anything behind
    for table in schema.tables() {
        table.validate()?;
    }

    create_ledger_table(db.connection())?;

    for table in schema.tables() {
        let statements = render_ddl(table);
        let checksum = compute_checksum(&statements.join(";\n"));

        match recorded_checksum(db.connection(), table.name())? {
            Some(existing) if existing == checksum => {
                tracing::debug!(table = table.name(), "Table already materialized");
            }
            Some(existing) => {
                return Err(RegistrarError::SchemaChecksumMismatch {
                    table: table.name().to_string(),
                    expected: existing,
                    actual: checksum,
                }
                .into());
            }
            None => apply_table(db.connection_mut(), table, &statements, &checksum)?,
        }

        db.register(table.clone());
    }

    Ok(())
}

/// Create the ledger table if it doesn't exist
fn create_ledger_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (
            table_name TEXT PRIMARY KEY,
            checksum TEXT NOT NULL,
            applied_at INTEGER NOT NULL
        )",
        LEDGER_TABLE
    ))
    .map_err(from_rusqlite)
}

/// Checksum recorded for `table`, if it was materialized before
pub fn recorded_checksum(conn: &Connection, table: &str) -> Result<Option<String>> {
    conn.query_row(
        &format!("SELECT checksum FROM {} WHERE table_name = ?1", LEDGER_TABLE),
        [table],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Run one table's DDL and record it, atomically
fn apply_table(
    conn: &mut Connection,
    table: &TableSchema,
    statements: &[String],
    checksum: &str,
) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;

    for statement in statements {
        tx.execute_batch(statement)
            .map_err(|e| schema_error(table.name(), e))?;
    }

    tx.execute(
        &format!(
            "INSERT INTO {} (table_name, checksum, applied_at) VALUES (?1, ?2, ?3)",
            LEDGER_TABLE
        ),
        rusqlite::params![table.name(), checksum, chrono::Utc::now().timestamp()],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(
        table = table.name(),
        statements = statements.len(),
        "Materialized table"
    );

    Ok(())
}
