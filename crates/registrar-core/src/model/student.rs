use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Student - the record type persisted to the `students` table
///
/// A `Student` carries only client-owned data. The backend-assigned id lives
/// on [`Persisted`](super::Persisted), never on the value itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Full name (indexed, not unique)
    pub name: String,

    /// Contact email (unique across all students)
    pub email: String,

    /// School grade, 1 through 12 inclusive
    pub grade: i32,

    /// Date of birth
    pub birthday: Option<NaiveDateTime>,

    /// Enrollment timestamp. `None` means "use the column default at insert".
    pub enrolled_date: Option<NaiveDateTime>,
}

impl Student {
    /// Create a new Student with no birthday and a defaulted enrollment date
    pub fn new(name: impl Into<String>, email: impl Into<String>, grade: i32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            grade,
            birthday: None,
            enrolled_date: None,
        }
    }

    /// Set the birthday
    pub fn with_birthday(mut self, birthday: NaiveDateTime) -> Self {
        self.birthday = Some(birthday);
        self
    }

    /// Set an explicit enrollment date, bypassing the column default
    pub fn with_enrolled_date(mut self, enrolled_date: NaiveDateTime) -> Self {
        self.enrolled_date = Some(enrolled_date);
        self
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Grade {}", self.name, self.grade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn einstein_birthday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1879, 3, 14)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_new_student_has_no_dates() {
        let student = Student::new("Albert Einstein", "albert.einstein@zurich.edu", 6);
        assert_eq!(student.grade, 6);
        assert!(student.birthday.is_none());
        assert!(student.enrolled_date.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let student = Student::new("Albert Einstein", "albert.einstein@zurich.edu", 6)
            .with_birthday(einstein_birthday());
        assert_eq!(student.birthday, Some(einstein_birthday()));
    }

    #[test]
    fn test_display() {
        let student = Student::new("Alan Turing", "alan.turing@sherborne.edu", 11);
        assert_eq!(student.to_string(), "Alan Turing, Grade 11");
    }

    #[test]
    fn test_serde_round_trip_keeps_timestamps() {
        let student = Student::new("Albert Einstein", "albert.einstein@zurich.edu", 6)
            .with_birthday(einstein_birthday());
        let json = serde_json::to_string(&student).unwrap();
        let back: Student = serde_json::from_str(&json).unwrap();
        assert_eq!(back, student);
    }
}
