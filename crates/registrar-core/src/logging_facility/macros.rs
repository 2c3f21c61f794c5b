//! Operation logging macros
//!
//! Every operation logs one `start` event and then exactly one of `end` or
//! `end_error`. Expansions name `tracing` and `registrar_core_types`, so
//! calling crates depend on both.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event
            $(, $($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use registrar_core::log_op_start;
/// log_op_start!("materialize");
/// log_op_start!("materialize", tables = 1);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            registrar_core_types::events::event::START
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation; `duration_ms` is required
///
/// ```
/// # use registrar_core::log_op_end;
/// log_op_end!("session_commit", duration_ms = 3, persisted = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            registrar_core_types::events::event::END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log a failed operation with the error's kind and stable code
///
/// `$err` is anything convertible into `ExError`.
///
/// ```
/// # use registrar_core::log_op_error;
/// # use registrar_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::ConstraintViolation);
/// log_op_error!("session_commit", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            registrar_core_types::events::event::END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}
