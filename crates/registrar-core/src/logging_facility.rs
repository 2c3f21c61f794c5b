//! Structured logging
//!
//! - [`init`] / [`init_with_level`] install the process subscriber once.
//!   Output goes to stderr; stdout belongs to command results.
//! - `log_op_start!`, `log_op_end!` and `log_op_error!` emit the events that
//!   bracket every operation (`materialize`, `session_commit`).
//! - [`init_test_capture`] records events in memory for assertions.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, init_with_level, installed_profile, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
