//! In-memory capture of log events for test assertions

use registrar_core_types::events::field;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event with its fields rendered as text
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

#[derive(Default)]
struct FieldRecorder(HashMap<String, String>);

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    // Integers and `%`/`?` values all arrive here
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type Shared = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer(Shared);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        let fields = recorder.0;

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            op: fields.get(field::OP).cloned(),
            event: fields.get(field::EVENT).cloned(),
            fields,
        };
        if let Ok(mut events) = self.0.lock() {
            events.push(captured);
        }
    }
}

/// Handle onto the captured events
///
/// The capture is process-wide and tests in one binary run in parallel, so
/// assertions should filter on a unique op name or session id.
#[derive(Clone)]
pub struct TestCapture(Shared);

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events with the given `op`, in emission order
    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.op.as_deref() == Some(op))
    }

    /// Events tagged with the given `session_id`, in emission order
    pub fn events_for_session(&self, session_id: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.field(field::SESSION_ID) == Some(session_id))
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.filtered(predicate).len()
    }

    /// # Panics
    ///
    /// Panics when no event has this `op` and `event`
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let found = self.count_events(|e| e.is(op, event));
        assert!(found > 0, "no {} event captured for op {}", event, op);
    }

    fn filtered<F>(&self, predicate: F) -> Vec<CapturedEvent>
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().into_iter().filter(|e| predicate(e)).collect()
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber, once per process
///
/// ```
/// use registrar_core::logging_facility::init_test_capture;
/// use registrar_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_example");
/// capture.assert_event_exists("doc_capture_example", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let shared = Shared::default();
            tracing_subscriber::registry()
                .with(CaptureLayer(shared.clone()))
                .init();
            TestCapture(shared)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let mut fields = HashMap::new();
        fields.insert("table".to_string(), "students".to_string());
        let event = CapturedEvent {
            level: Level::INFO,
            op: Some("materialize".to_string()),
            event: Some("start".to_string()),
            fields,
        };

        assert_eq!(event.field("table"), Some("students"));
        assert_eq!(event.field("session_id"), None);
        assert!(event.is("materialize", "start"));
        assert!(!event.is("materialize", "end"));
    }
}
