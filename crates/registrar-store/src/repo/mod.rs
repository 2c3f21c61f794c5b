//! Mapping between domain values and table rows

pub mod entity;
pub mod student_repo;

pub use entity::{insert_row, Entity};
pub use student_repo::StudentRepo;
