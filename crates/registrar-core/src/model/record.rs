//! Record lifecycle: transient values and persisted rows
//!
//! A record starts `Transient` (no id). A successful commit replaces it with
//! `Persisted`, which carries the backend-assigned id and the value as it was
//! written (defaults applied). There is no path back from `Persisted`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::student::Student;

/// A value together with the id the backend assigned to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persisted<T> {
    id: i64,
    value: T,
}

impl<T> Persisted<T> {
    pub fn new(id: i64, value: T) -> Self {
        Self { id, value }
    }

    /// Backend-assigned primary key
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Lifecycle state of a record tracked by a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Record<T> {
    /// Constructed in memory, never written
    Transient(T),
    /// Written and committed
    Persisted(Persisted<T>),
}

impl<T> Record<T> {
    /// Backend id, absent until the record has been committed
    pub fn id(&self) -> Option<i64> {
        match self {
            Record::Transient(_) => None,
            Record::Persisted(p) => Some(p.id()),
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Record::Persisted(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Record::Transient(value) => value,
            Record::Persisted(p) => p.value(),
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Record::Transient(value) => value,
            Record::Persisted(p) => p.into_inner(),
        }
    }

    pub fn as_persisted(&self) -> Option<&Persisted<T>> {
        match self {
            Record::Transient(_) => None,
            Record::Persisted(p) => Some(p),
        }
    }
}

impl fmt::Display for Persisted<Student> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Student {}: {}", self.id, self.value)
    }
}

impl fmt::Display for Record<Student> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Transient(student) => write!(f, "Student (unsaved): {}", student),
            Record::Persisted(p) => fmt::Display::fmt(p, f),
        }
    }
}
