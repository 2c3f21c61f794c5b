// Integration tests for the operation logging macros
// Each test uses its own op name since the capture is shared across the binary

use registrar_core::errors::{ExError, ExErrorKind, RegistrarError};
use registrar_core::logging_facility::init_test_capture;
use registrar_core::{log_op_end, log_op_error, log_op_start};
use registrar_core_types::events::event::{
    END as EVENT_END, END_ERROR as EVENT_END_ERROR, START as EVENT_START,
};
use registrar_core_types::events::field;
use registrar_core_types::Sensitive;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert!(
        !start_events.is_empty(),
        "Should have captured at least one start event"
    );
}

#[test]
fn test_events_name_their_component() {
    let capture = init_test_capture();
    let op_name = "test_component_unique_7";

    log_op_start!(op_name);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].field(field::COMPONENT),
        Some("logging_facility_tests")
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(
        end_events[0].fields.get(field::DURATION_MS),
        Some(&"42".to_string())
    );
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ExError::new(ExErrorKind::ConstraintViolation).with_constraint("unique_email");
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(
        error_events[0].fields.get(field::ERR_CODE),
        Some(&"ERR_CONSTRAINT_VIOLATION".to_string())
    );
}

#[test]
fn test_log_op_error_accepts_domain_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = RegistrarError::MissingPrimaryKey {
        table: "students".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 1);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].fields.get(field::ERR_CODE),
        Some(&"ERR_SCHEMA".to_string())
    );
}

#[test]
fn test_sensitive_fields_are_redacted() {
    let capture = init_test_capture();
    let op_name = "test_sensitive_unique_5";

    let email = Sensitive::new("albert.einstein@zurich.edu");
    log_op_start!(op_name, email = %email);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("email"), Some("***REDACTED***"));
}

#[test]
fn test_single_start_end_pair() {
    let capture = init_test_capture();
    let op_name = "test_boundary_unique_6";

    log_op_start!(op_name, table = "students");
    log_op_end!(op_name, duration_ms = 5, record_id = 1_i64);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END)
    });

    assert_eq!(starts, 1);
    assert_eq!(ends, 1);
    capture.assert_event_exists(op_name, EVENT_END);
}
