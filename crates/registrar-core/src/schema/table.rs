use chrono::NaiveDateTime;
use std::collections::HashSet;

use crate::errors::RegistrarError;

/// Column storage type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
    /// Length-bounded text. Declared in DDL; enforcement is up to the backend.
    VarChar(u32),
    DateTime,
}

impl SqlType {
    /// Type name as written in DDL
    pub fn sql(&self) -> String {
        match self {
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::Text => "TEXT".to_string(),
            SqlType::VarChar(len) => format!("VARCHAR({})", len),
            SqlType::DateTime => "DATETIME".to_string(),
        }
    }
}

/// Client-side default applied to a column when a record leaves it unset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    /// One timestamp shared by every insert
    Fixed(NaiveDateTime),
    /// The commit's timestamp, evaluated per insert
    InsertTime,
}

impl ColumnDefault {
    pub fn resolve(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            ColumnDefault::Fixed(ts) => *ts,
            ColumnDefault::InsertTime => now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: SqlType,
    pub default: Option<ColumnDefault>,
}

/// Named table-level constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraint {
    PrimaryKey { name: String, columns: Vec<String> },
    Unique { name: String, columns: Vec<String> },
    /// Boolean SQL expression the backend evaluates on every write
    Check { name: String, expression: String },
}

impl TableConstraint {
    pub fn name(&self) -> &str {
        match self {
            TableConstraint::PrimaryKey { name, .. }
            | TableConstraint::Unique { name, .. }
            | TableConstraint::Check { name, .. } => name,
        }
    }

    /// Columns named directly by the constraint (empty for checks)
    pub fn columns(&self) -> &[String] {
        match self {
            TableConstraint::PrimaryKey { columns, .. }
            | TableConstraint::Unique { columns, .. } => columns,
            TableConstraint::Check { .. } => &[],
        }
    }
}

/// Secondary index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// Description of one table: columns, named constraints and indexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnDef>,
    constraints: Vec<TableConstraint>,
    indexes: Vec<IndexDef>,
}

impl TableSchema {
    /// Start describing a table
    pub fn builder(name: impl Into<String>) -> TableSchemaBuilder {
        TableSchemaBuilder {
            table: TableSchema {
                name: name.into(),
                columns: Vec::new(),
                constraints: Vec::new(),
                indexes: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn constraints(&self) -> &[TableConstraint] {
        &self.constraints
    }

    pub fn indexes(&self) -> &[IndexDef] {
        &self.indexes
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns of the primary key constraint, if declared
    pub fn primary_key(&self) -> Option<&[String]> {
        self.constraints.iter().find_map(|c| match c {
            TableConstraint::PrimaryKey { columns, .. } => Some(columns.as_slice()),
            _ => None,
        })
    }

    /// Columns a client writes on insert (everything except the primary key)
    pub fn insertable_columns(&self) -> Vec<&ColumnDef> {
        let pk = self.primary_key().unwrap_or(&[]);
        self.columns
            .iter()
            .filter(|c| !pk.contains(&c.name))
            .collect()
    }

    /// Check the description for structural mistakes
    ///
    /// Expression-level problems (a malformed check) are left to the backend.
    pub fn validate(&self) -> Result<(), RegistrarError> {
        if self.columns.is_empty() {
            return Err(RegistrarError::EmptyTable {
                table: self.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(RegistrarError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        let mut names = HashSet::new();
        let named = self
            .constraints
            .iter()
            .map(|c| (c.name(), format!("constraint {}", c.name()), c.columns()))
            .chain(self.indexes.iter().map(|i| {
                (
                    i.name.as_str(),
                    format!("index {}", i.name),
                    i.columns.as_slice(),
                )
            }));

        for (name, owner, columns) in named {
            if !names.insert(name) {
                return Err(RegistrarError::DuplicateName {
                    table: self.name.clone(),
                    name: name.to_string(),
                });
            }
            if let Some(unknown) = columns.iter().find(|c| !seen.contains(c.as_str())) {
                return Err(RegistrarError::UnknownColumn {
                    table: self.name.clone(),
                    owner,
                    column: unknown.clone(),
                });
            }
        }

        if self.primary_key().is_none() {
            return Err(RegistrarError::MissingPrimaryKey {
                table: self.name.clone(),
            });
        }

        Ok(())
    }
}

/// Builder for [`TableSchema`]
///
/// Building never fails; call [`TableSchema::validate`] (materialization does)
/// to catch structural mistakes.
#[derive(Debug, Clone)]
pub struct TableSchemaBuilder {
    table: TableSchema,
}

impl TableSchemaBuilder {
    pub fn column(mut self, name: impl Into<String>, sql_type: SqlType) -> Self {
        self.table.columns.push(ColumnDef {
            name: name.into(),
            sql_type,
            default: None,
        });
        self
    }

    pub fn column_with_default(
        mut self,
        name: impl Into<String>,
        sql_type: SqlType,
        default: ColumnDefault,
    ) -> Self {
        self.table.columns.push(ColumnDef {
            name: name.into(),
            sql_type,
            default: Some(default),
        });
        self
    }

    pub fn primary_key(mut self, name: impl Into<String>, columns: &[&str]) -> Self {
        self.table.constraints.push(TableConstraint::PrimaryKey {
            name: name.into(),
            columns: to_owned(columns),
        });
        self
    }

    pub fn unique(mut self, name: impl Into<String>, columns: &[&str]) -> Self {
        self.table.constraints.push(TableConstraint::Unique {
            name: name.into(),
            columns: to_owned(columns),
        });
        self
    }

    pub fn check(mut self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.table.constraints.push(TableConstraint::Check {
            name: name.into(),
            expression: expression.into(),
        });
        self
    }

    pub fn index(mut self, name: impl Into<String>, columns: &[&str]) -> Self {
        self.table.indexes.push(IndexDef {
            name: name.into(),
            columns: to_owned(columns),
            unique: false,
        });
        self
    }

    pub fn unique_index(mut self, name: impl Into<String>, columns: &[&str]) -> Self {
        self.table.indexes.push(IndexDef {
            name: name.into(),
            columns: to_owned(columns),
            unique: true,
        });
        self
    }

    pub fn build(self) -> TableSchema {
        self.table
    }
}

fn to_owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

/// A set of tables to materialize together
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaDescription {
    tables: Vec<TableSchema>,
}

impl SchemaDescription {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name() == name)
    }
}
