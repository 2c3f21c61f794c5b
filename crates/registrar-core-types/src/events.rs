//! Names shared by every Registrar log event
//!
//! Operations log a `start` event, then either `end` or `end_error`. The
//! capture layer used in tests keys on the same names.

/// Field keys attached by the `log_op_*` macros and by the store
pub mod field {
    pub const COMPONENT: &str = "component";
    pub const OP: &str = "op";
    pub const EVENT: &str = "event";
    pub const DURATION_MS: &str = "duration_ms";
    pub const SESSION_ID: &str = "session_id";
    pub const TABLE: &str = "table";
    pub const ERR_CODE: &str = "err_code";
}

/// Values of the `event` field
pub mod event {
    pub const START: &str = "start";
    pub const END: &str = "end";
    pub const END_ERROR: &str = "end_error";
}

/// Values of the `op` field
pub mod op {
    /// Creating tables, constraints and indexes on a backend
    pub const MATERIALIZE: &str = "materialize";
    /// Writing a session's pending records
    pub const SESSION_COMMIT: &str = "session_commit";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(event::START, event::END);
        assert_ne!(event::END, event::END_ERROR);
        assert_ne!(event::START, event::END_ERROR);
    }

    #[test]
    fn test_ops_are_snake_case() {
        for name in [op::MATERIALIZE, op::SESSION_COMMIT] {
            assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
