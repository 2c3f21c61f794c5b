//! Domain models

pub mod record;
pub mod student;

pub use record::{Persisted, Record};
pub use student::Student;
