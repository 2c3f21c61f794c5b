//! Registrar Store - SQLite persistence for Registrar
//!
//! Provides:
//! - Connection configuration and the owning `Database` handle
//! - DDL rendering and idempotent schema materialization with a checksum ledger
//! - `Session`, a unit of work that stages records and commits them in one transaction
//! - Read-back repository for students

pub mod config;
pub mod db;
pub mod errors;
pub mod repo;
pub mod schema;
pub mod session;

// Re-export key types
pub use config::{Backend, StoreConfig};
pub use db::Database;
pub use errors::Result;
pub use repo::{Entity, StudentRepo};
pub use schema::{materialize, render_ddl};
pub use session::{CommitReport, RecordKey, Session};
