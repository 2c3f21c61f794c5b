//! Database connection management
//!
//! `Database` owns the single SQLite connection and remembers which tables
//! have been materialized on it.

use registrar_core::schema::TableSchema;
use rusqlite::Connection;
use std::collections::BTreeMap;

use crate::config::{Backend, StoreConfig};
use crate::errors::{connection_error, from_rusqlite, Result};

/// Owning handle to one backend connection
///
/// The connection is closed when the handle is dropped; use [`Database::close`]
/// to observe close errors.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    tables: BTreeMap<String, TableSchema>,
}

impl Database {
    /// Open the backend described by `config`
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        let conn = match config.backend()? {
            Backend::Memory => Connection::open_in_memory(),
            Backend::File(path) => Connection::open(path),
        }
        .map_err(|e| connection_error(&config.url, e))?;

        configure(&conn, config)?;

        tracing::debug!(url = %config.url, "Opened database");

        Ok(Self {
            conn,
            tables: BTreeMap::new(),
        })
    }

    /// Open a fresh in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::connect(&StoreConfig::memory())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Description of a table materialized through this handle
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub(crate) fn register(&mut self, table: TableSchema) {
        self.tables.insert(table.name().to_string(), table);
    }

    /// Close the connection, surfacing any error from the backend
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| from_rusqlite(e))
    }
}

/// Apply per-connection settings and make sure the file is a database
///
/// Opening is lazy, so the schema is read once here to surface a file that
/// is not a SQLite database at connect time.
fn configure(conn: &Connection, config: &StoreConfig) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", config.foreign_keys)
        .map_err(|e| connection_error(&config.url, e))?;
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })
    .map_err(|e| connection_error(&config.url, e))?;
    Ok(())
}
