//! Bounded log of recent pipeline events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Default number of events retained.
pub const DEFAULT_EVENT_CAPACITY: usize = 500;

/// One captured tracing event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineEvent {
    /// Event target (e.g., "pathwise::pipeline")
    pub target: String,
    /// Log level (INFO, WARN, ERROR)
    pub level: String,
    pub message: String,
    /// Structured fields of the event, `message` excluded
    pub fields: BTreeMap<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl PipelineEvent {
    pub fn user_id(&self) -> Option<&str> {
        self.fields.get("user_id").and_then(Value::as_str)
    }
}

/// Shared ring buffer of events; the oldest event is dropped when full.
#[derive(Debug, Clone)]
pub struct RecentEvents {
    inner: Arc<Mutex<VecDeque<PipelineEvent>>>,
    capacity: usize,
}

impl RecentEvents {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, event: PipelineEvent) {
        // A poisoned buffer only ever holds complete events
        let mut events = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// The last `limit` events, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<PipelineEvent> {
        let events = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let skip = events.len().saturating_sub(limit);
        events.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RecentEvents {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
