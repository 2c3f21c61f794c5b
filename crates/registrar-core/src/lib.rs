//! Registrar Core - schema descriptions, domain model and shared facilities
//!
//! This crate provides the backend-independent half of Registrar:
//! - Student model and the transient/persisted record lifecycle
//! - Explicit table descriptions (columns, named constraints, indexes) with a builder
//! - The canonical structured error facility
//! - The structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod schema;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, RegistrarError, Result};
pub use model::{Persisted, Record, Student};
pub use schema::{
    define_schema, define_schema_with, EnrolledDatePolicy, SchemaDescription, TableSchema,
};
