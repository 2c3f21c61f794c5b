//! SQLite DDL rendering
//!
//! Constraints are emitted as named table constraints so that backend
//! errors report the declared names.

use registrar_core::schema::{TableConstraint, TableSchema};

/// Quote an identifier for SQLite
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the statements that create `table` and its indexes if absent
///
/// The first statement is the `CREATE TABLE`; one `CREATE INDEX` follows per index.
pub fn render_ddl(table: &TableSchema) -> Vec<String> {
    let mut lines: Vec<String> = table
        .columns()
        .iter()
        .map(|c| format!("    {} {}", quote_identifier(&c.name), c.sql_type.sql()))
        .collect();

    for constraint in table.constraints() {
        let body = match constraint {
            TableConstraint::PrimaryKey { columns, .. } => {
                format!("PRIMARY KEY ({})", quote_list(columns))
            }
            TableConstraint::Unique { columns, .. } => format!("UNIQUE ({})", quote_list(columns)),
            TableConstraint::Check { expression, .. } => format!("CHECK ({})", expression),
        };
        lines.push(format!(
            "    CONSTRAINT {} {}",
            quote_identifier(constraint.name()),
            body
        ));
    }

    let mut statements = vec![format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        quote_identifier(table.name()),
        lines.join(",\n")
    )];

    for index in table.indexes() {
        statements.push(format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
            if index.unique { "UNIQUE " } else { "" },
            quote_identifier(&index.name),
            quote_identifier(table.name()),
            quote_list(&index.columns)
        ));
    }

    statements
}
