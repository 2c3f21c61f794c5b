use registrar_core_types::SessionId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Classification of every failure Registrar returns
///
/// Each kind has a stable code, printed by the CLI and matched in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    NotFound,

    // Backend
    /// The backend rejected a schema definition, or the definition is malformed
    Schema,
    /// A write violated a primary key, unique or check constraint
    ConstraintViolation,
    /// The backend could not be reached or opened
    Connection,
    /// Any other backend failure
    Persistence,
}

impl ExErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Schema => "ERR_SCHEMA",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Connection => "ERR_CONNECTION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Error returned by every fallible Registrar operation
///
/// A kind plus whatever context the failing layer knew: the operation, the
/// table, the violated constraint and the session.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    table: Option<String>,
    constraint: Option<String>,
    session_id: Option<SessionId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            table: None,
            constraint: None,
            session_id: None,
            message: String::new(),
            source: None,
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Id of the record involved
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add the violated constraint, as reported by the backend
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    /// Session whose commit failed
    pub fn with_session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Lower-level error this one wraps
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(constraint) = &self.constraint {
            write!(f, " (constraint: {})", constraint)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Typed failures raised by Registrar before anything reaches the backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistrarError {
    // ===== Schema description =====
    /// Table declares no columns
    #[error("Table {table} declares no columns")]
    EmptyTable { table: String },

    /// Two columns share a name
    #[error("Table {table} declares column {column} more than once")]
    DuplicateColumn { table: String, column: String },

    /// A constraint or index names a column the table does not have
    #[error("{owner} on table {table} references unknown column {column}")]
    UnknownColumn {
        table: String,
        owner: String,
        column: String,
    },

    /// Two constraints or indexes share a name
    #[error("Table {table} declares {name} more than once")]
    DuplicateName { table: String, name: String },

    /// Table has no primary key constraint
    #[error("Table {table} has no primary key")]
    MissingPrimaryKey { table: String },

    /// Table was previously materialized with different DDL
    #[error("Table {table} was materialized with checksum {expected}, definition now has {actual}")]
    SchemaChecksumMismatch {
        table: String,
        expected: String,
        actual: String,
    },

    /// A session tried to write to a table that was never materialized
    #[error("Table {table} has not been materialized on this backend")]
    TableNotMaterialized { table: String },

    // ===== Connection =====
    /// Connection string uses a backend this build does not support
    #[error("Unsupported backend scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    /// Connection string could not be parsed
    #[error("Invalid connection string {url}: {reason}")]
    InvalidConnectionString { url: String, reason: String },

    // ===== Session =====
    /// Record key does not belong to this session
    #[error("Unknown record key: {key}")]
    UnknownRecordKey { key: usize },

    /// Row not found when reading back
    #[error("Student not found: {id}")]
    StudentNotFound { id: i64 },
}

/// Conversion from RegistrarError to ExError
impl From<RegistrarError> for ExError {
    fn from(err: RegistrarError) -> Self {
        let message = err.to_string();
        match err {
            RegistrarError::EmptyTable { table }
            | RegistrarError::DuplicateColumn { table, .. }
            | RegistrarError::UnknownColumn { table, .. }
            | RegistrarError::DuplicateName { table, .. }
            | RegistrarError::MissingPrimaryKey { table }
            | RegistrarError::TableNotMaterialized { table } => ExError::new(ExErrorKind::Schema)
                .with_op("validate_schema")
                .with_table(table)
                .with_message(message),

            RegistrarError::SchemaChecksumMismatch { table, .. } => {
                ExError::new(ExErrorKind::Schema)
                    .with_op("schema_checksum")
                    .with_table(table)
                    .with_message(message)
            }

            RegistrarError::UnsupportedScheme { .. }
            | RegistrarError::InvalidConnectionString { .. } => {
                ExError::new(ExErrorKind::Connection)
                    .with_op("connect")
                    .with_message(message)
            }

            RegistrarError::UnknownRecordKey { key } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(key.to_string())
                .with_message(message),

            RegistrarError::StudentNotFound { id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(id.to_string())
                .with_table("students")
                .with_message(message),
        }
    }
}
