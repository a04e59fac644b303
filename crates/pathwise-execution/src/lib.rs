//! Tracing setup and pipeline event capture.

pub mod event_log;
pub mod telemetry;
pub mod tracing_layer;

pub use event_log::{DEFAULT_EVENT_CAPACITY, PipelineEvent, RecentEvents};
pub use telemetry::{init_tracing, init_with_event_log};
pub use tracing_layer::PipelineEventLayer;
