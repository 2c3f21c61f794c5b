//! Schema materialization
//!
//! Provides:
//! - Deterministic DDL rendering for table descriptions
//! - Idempotent materialization with a checksum ledger

mod checksums;
mod ddl;
mod materialize;

pub use checksums::compute_checksum;
pub use ddl::{quote_identifier, render_ddl};
pub use materialize::{materialize, recorded_checksum, LEDGER_TABLE};
