//! Student persistence
//!
//! Maps `Student` to the `students` table and reads committed rows back.

use chrono::NaiveDateTime;
use registrar_core::errors::RegistrarError;
use registrar_core::model::{Persisted, Student};
use registrar_core::schema::{TableSchema, STUDENTS_TABLE};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row};

use super::entity::{timestamp_value, Entity};
use crate::errors::{from_rusqlite, Result};

impl Entity for Student {
    const TABLE: &'static str = STUDENTS_TABLE;

    fn column_value(&self, column: &str) -> Option<Value> {
        let value = match column {
            "name" => Value::Text(self.name.clone()),
            "email" => Value::Text(self.email.clone()),
            "grade" => Value::Integer(i64::from(self.grade)),
            "birthday" => timestamp_value(self.birthday),
            "enrolled_date" => timestamp_value(self.enrolled_date),
            _ => return None,
        };
        Some(value)
    }

    fn apply_defaults(&mut self, table: &TableSchema, now: NaiveDateTime) {
        if self.enrolled_date.is_none() {
            self.enrolled_date = table
                .column("enrolled_date")
                .and_then(|c| c.default)
                .map(|d| d.resolve(now));
        }
    }
}

const SELECT_COLUMNS: &str = "id, name, email, grade, birthday, enrolled_date";

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Persisted<Student>> {
    let id: i64 = row.get(0)?;
    let student = Student {
        name: row.get(1)?,
        email: row.get(2)?,
        grade: row.get(3)?,
        birthday: row.get(4)?,
        enrolled_date: row.get(5)?,
    };
    Ok(Persisted::new(id, student))
}

/// Read access to committed students
pub struct StudentRepo;

impl StudentRepo {
    /// Get a student by id
    pub fn get(conn: &Connection, id: i64) -> Result<Option<Persisted<Student>>> {
        conn.query_row(
            &format!("SELECT {} FROM {} WHERE id = ?1", SELECT_COLUMNS, STUDENTS_TABLE),
            [id],
            student_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Get a student by id, failing with NotFound if absent
    pub fn require(conn: &Connection, id: i64) -> Result<Persisted<Student>> {
        Self::get(conn, id)?.ok_or_else(|| RegistrarError::StudentNotFound { id }.into())
    }

    /// All students in id order
    pub fn list(conn: &Connection) -> Result<Vec<Persisted<Student>>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM {} ORDER BY id",
                SELECT_COLUMNS, STUDENTS_TABLE
            ))
            .map_err(from_rusqlite)?;

        let students = stmt
            .query_map([], student_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(students)
    }

    /// Number of stored students
    pub fn count(conn: &Connection) -> Result<i64> {
        conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", STUDENTS_TABLE),
            [],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)
    }
}
