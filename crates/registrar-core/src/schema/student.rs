//! The `students` table

use chrono::{Local, NaiveDateTime};
use std::sync::OnceLock;

use super::table::{ColumnDefault, SchemaDescription, SqlType, TableSchema};

pub const STUDENTS_TABLE: &str = "students";

/// How `enrolled_date` is filled when a student leaves it unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnrolledDatePolicy {
    /// Every row gets the instant the schema was first loaded in this process.
    ///
    /// This reproduces a default evaluated once at definition time: all rows
    /// share one stale timestamp. Kept as the default for compatibility with
    /// existing data; prefer `InsertTime` for new deployments.
    #[default]
    SchemaLoadTime,
    /// Each commit stamps the rows it inserts with the commit time
    InsertTime,
}

static SCHEMA_LOADED_AT: OnceLock<NaiveDateTime> = OnceLock::new();

/// Instant the student schema was first described in this process
pub fn schema_loaded_at() -> NaiveDateTime {
    *SCHEMA_LOADED_AT.get_or_init(|| Local::now().naive_local())
}

/// Describe the student schema with the default `enrolled_date` policy
pub fn define_schema() -> SchemaDescription {
    define_schema_with(EnrolledDatePolicy::default())
}

/// Describe the student schema with an explicit `enrolled_date` policy
///
/// The DDL is identical for both policies; only the client-side default differs.
pub fn define_schema_with(policy: EnrolledDatePolicy) -> SchemaDescription {
    let enrolled_default = match policy {
        EnrolledDatePolicy::SchemaLoadTime => ColumnDefault::Fixed(schema_loaded_at()),
        EnrolledDatePolicy::InsertTime => ColumnDefault::InsertTime,
    };

    let students = TableSchema::builder(STUDENTS_TABLE)
        .column("id", SqlType::Integer)
        .column("name", SqlType::Text)
        .column("email", SqlType::VarChar(55))
        .column("grade", SqlType::Integer)
        .column("birthday", SqlType::DateTime)
        .column_with_default("enrolled_date", SqlType::DateTime, enrolled_default)
        .primary_key("id_pk", &["id"])
        .unique("unique_email", &["email"])
        .check("grade_between_1_and_12", "grade BETWEEN 1 AND 12")
        .index("index_name", &["name"])
        .build();

    SchemaDescription::new(vec![students])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::table::TableConstraint;

    #[test]
    fn test_student_schema_shape() {
        let schema = define_schema();
        let table = schema.table(STUDENTS_TABLE).unwrap();

        let columns: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            columns,
            vec!["id", "name", "email", "grade", "birthday", "enrolled_date"]
        );
        assert_eq!(table.primary_key(), Some(&["id".to_string()][..]));
        assert_eq!(table.validate(), Ok(()));
    }

    #[test]
    fn test_student_constraints_are_named() {
        let schema = define_schema();
        let table = schema.table(STUDENTS_TABLE).unwrap();

        let names: Vec<&str> = table.constraints().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["id_pk", "unique_email", "grade_between_1_and_12"]);
        assert!(table.constraints().contains(&TableConstraint::Check {
            name: "grade_between_1_and_12".to_string(),
            expression: "grade BETWEEN 1 AND 12".to_string(),
        }));

        let index = &table.indexes()[0];
        assert_eq!(index.name, "index_name");
        assert_eq!(index.columns, vec!["name".to_string()]);
        assert!(!index.unique);
    }

    #[test]
    fn test_email_is_bounded() {
        let schema = define_schema();
        let email = schema.table(STUDENTS_TABLE).unwrap().column("email").unwrap();
        assert_eq!(email.sql_type, SqlType::VarChar(55));
    }

    #[test]
    fn test_load_time_default_is_shared() {
        let first = define_schema();
        let second = define_schema();
        let default_of = |s: &SchemaDescription| {
            s.table(STUDENTS_TABLE)
                .and_then(|t| t.column("enrolled_date"))
                .and_then(|c| c.default)
        };

        assert_eq!(default_of(&first), default_of(&second));
        assert_eq!(
            default_of(&first),
            Some(ColumnDefault::Fixed(schema_loaded_at()))
        );
    }

    #[test]
    fn test_insert_time_policy() {
        let schema = define_schema_with(EnrolledDatePolicy::InsertTime);
        let column = schema
            .table(STUDENTS_TABLE)
            .and_then(|t| t.column("enrolled_date"))
            .unwrap();
        assert_eq!(column.default, Some(ColumnDefault::InsertTime));
    }
}
