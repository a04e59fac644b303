//! Custom tracing layer capturing dialog and pipeline events.
//!
//! Events whose target starts with one of the captured prefixes are recorded
//! into a [`RecentEvents`] log and, optionally, forwarded to a channel so a
//! front-end can stream them live.

use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::event_log::{PipelineEvent, RecentEvents};

/// Targets captured by default.
pub const CAPTURED_TARGETS: &[&str] = &["pathwise::pipeline", "pathwise::dialog"];

/// A tracing layer that records pipeline events.
pub struct PipelineEventLayer {
    events: RecentEvents,
    forward: Option<mpsc::UnboundedSender<PipelineEvent>>,
    max_level: Level,
}

impl PipelineEventLayer {
    /// Captures `INFO` and more severe events into `events`.
    pub fn new(events: RecentEvents) -> Self {
        Self {
            events,
            forward: None,
            max_level: Level::INFO,
        }
    }

    /// Also sends every captured event to `sender`.
    pub fn with_forwarding(mut self, sender: mpsc::UnboundedSender<PipelineEvent>) -> Self {
        self.forward = Some(sender);
        self
    }

    /// Lowers or raises the most verbose level captured.
    pub fn with_max_level(mut self, level: Level) -> Self {
        self.max_level = level;
        self
    }

    fn captures(&self, target: &str, level: &Level) -> bool {
        // Level ordering: TRACE > DEBUG > INFO > WARN > ERROR
        *level <= self.max_level && CAPTURED_TARGETS.iter().any(|t| target.starts_with(t))
    }
}

impl<S> Layer<S> for PipelineEventLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !self.captures(metadata.target(), metadata.level()) {
            return;
        }

        let mut fields = BTreeMap::new();
        let mut visitor = FieldVisitor(&mut fields);
        event.record(&mut visitor);

        let message = match fields.remove("message") {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let pipeline_event = PipelineEvent {
            target: metadata.target().to_string(),
            level: metadata.level().to_string(),
            message,
            fields,
            timestamp: chrono::Utc::now(),
        };

        if let Some(sender) = &self.forward {
            // Non-blocking send - if the receiver is dropped, we just skip
            let _ = sender.send(pipeline_event.clone());
        }
        self.events.push(pipeline_event);
    }
}

/// Field visitor that extracts tracing event fields into a map
struct FieldVisitor<'a>(&'a mut BTreeMap<String, Value>);

impl<'a> tracing::field::Visit for FieldVisitor<'a> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}
