//! Schema descriptions
//!
//! Tables are described by plain data ([`TableSchema`]) assembled with a
//! builder. Backends turn these descriptions into DDL; nothing here talks to
//! a database.

pub mod student;
pub mod table;

pub use student::{
    define_schema, define_schema_with, schema_loaded_at, EnrolledDatePolicy, STUDENTS_TABLE,
};
pub use table::{
    ColumnDef, ColumnDefault, IndexDef, SchemaDescription, SqlType, TableConstraint, TableSchema,
    TableSchemaBuilder,
};
