//! Error handling for registrar-store
//!
//! Classifies rusqlite failures into the canonical ExError kinds

use registrar_core::errors::{ExError, ExErrorKind};
use registrar_core_types::events::op;
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
///
/// Constraint failures become `ConstraintViolation` with the backend's
/// description of the failing constraint. Open failures become `Connection`.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let (code, detail) = match &err {
        rusqlite::Error::SqliteFailure(failure, message) => (
            Some(failure.code),
            message.clone().unwrap_or_else(|| err.to_string()),
        ),
        _ => (None, err.to_string()),
    };

    match code {
        Some(ErrorCode::ConstraintViolation) => {
            let mut ex = ExError::new(ExErrorKind::ConstraintViolation).with_op("sqlite");
            // "UNIQUE constraint failed: students.email"
            // "CHECK constraint failed: grade_between_1_and_12"
            if let Some((_, constraint)) = detail.split_once(": ") {
                ex = ex.with_constraint(constraint.trim());
            }
            ex.with_message(detail)
        }
        Some(ErrorCode::CannotOpen) | Some(ErrorCode::NotADatabase) => {
            ExError::new(ExErrorKind::Connection)
                .with_op("sqlite")
                .with_message(detail)
        }
        _ => ExError::new(ExErrorKind::Persistence)
            .with_op("sqlite")
            .with_message(detail),
    }
}

/// Create a schema error for DDL the backend rejected
pub fn schema_error(table: &str, err: rusqlite::Error) -> ExError {
    let source = from_rusqlite(err);
    ExError::new(ExErrorKind::Schema)
        .with_op(op::MATERIALIZE)
        .with_table(table)
        .with_message(format!("Backend rejected schema: {}", source.message()))
        .with_source(source)
}

/// Create a connection error for a backend that could not be opened
pub fn connection_error(url: &str, err: rusqlite::Error) -> ExError {
    let source = from_rusqlite(err);
    ExError::new(ExErrorKind::Connection)
        .with_op("connect")
        .with_message(format!("Cannot open {}: {}", url, source.message()))
        .with_source(source)
}
