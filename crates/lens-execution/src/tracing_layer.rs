//! Tracing layer that streams client events to a diagnostics panel.
//!
//! Captures events emitted by the `lens_*` crates, together with the fields of
//! the span they were emitted in (e.g. `request_id` of an analysis request),
//! and forwards them through a tokio channel.

use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

const TARGET_PREFIX: &str = "lens_";

/// Event data sent to the diagnostics panel
#[derive(Debug, Clone, serde::Serialize)]
pub struct DiagnosticEvent {
    /// Event target (e.g., "lens_application::session::controller")
    pub target: String,
    /// Log level (INFO, DEBUG, WARN, ERROR)
    pub level: String,
    /// Human-readable message
    pub message: String,
    /// Structured fields from the event
    pub fields: HashMap<String, Value>,
    /// Fields of the enclosing spans (e.g., request_id)
    pub span: HashMap<String, Value>,
    pub timestamp: String,
}

/// Forwards `lens_*` events to a channel. Everything else is ignored.
pub struct DiagnosticsLayer {
    sender: mpsc::UnboundedSender<DiagnosticEvent>,
}

impl DiagnosticsLayer {
    pub fn new(sender: mpsc::UnboundedSender<DiagnosticEvent>) -> Self {
        Self { sender }
    }

    /// Creates a layer together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DiagnosticEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

/// Span fields stored in the span's extensions on creation.
struct SpanFields(HashMap<String, Value>);

impl<S> Layer<S> for DiagnosticsLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        let mut fields = HashMap::new();
        attrs.record(&mut FieldVisitor(&mut fields));
        span.extensions_mut().insert(SpanFields(fields));
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let target = event.metadata().target();
        if !target.starts_with(TARGET_PREFIX) {
            return;
        }

        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        // Outermost span first so inner spans win on name clashes.
        let mut span_fields = HashMap::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(stored) = span.extensions().get::<SpanFields>() {
                    span_fields.extend(stored.0.clone());
                }
            }
        }

        let message = fields
            .remove("message")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        let diagnostic = DiagnosticEvent {
            target: target.to_string(),
            level: event.metadata().level().to_string(),
            message,
            fields,
            span: span_fields,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        // Receiver gone means nobody is watching.
        let _ = self.sender.send(diagnostic);
    }
}

/// Collects tracing fields into a JSON map.
struct FieldVisitor<'a>(&'a mut HashMap<String, Value>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn capture(emit: impl FnOnce()) -> Vec<DiagnosticEvent> {
        let (layer, mut receiver) = DiagnosticsLayer::channel();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, emit);

        let mut events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn forwards_lens_events_with_span_fields() {
        let events = capture(|| {
            // Default targets resolve to this module's path, which is a `lens_*` target.
            let span = tracing::info_span!("analysis_request", request_id = "req-1");
            let _entered = span.enter();
            tracing::warn!(error.kind = "transport", attempt = 1u64, "[Controller] Analysis failed");
        });

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert!(event.target.starts_with("lens_execution"));
        assert_eq!(event.level, "WARN");
        assert_eq!(event.message, "[Controller] Analysis failed");
        assert_eq!(event.fields["error.kind"], "transport");
        assert_eq!(event.fields["attempt"], 1);
        assert_eq!(event.span["request_id"], "req-1");
    }

    #[test]
    fn ignores_foreign_targets() {
        let events = capture(|| {
            tracing::info!(target: "hyper::client", "connection established");
            tracing::info!(target: "lens_core", "kept");
        });

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target, "lens_core");
    }

    #[test]
    fn dropped_receiver_is_tolerated() {
        let (layer, receiver) = DiagnosticsLayer::channel();
        drop(receiver);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "lens_core", "nobody listening");
        });
    }
}
