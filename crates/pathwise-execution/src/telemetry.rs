//! Process-wide tracing setup.

use anyhow::{Context, Result};
use pathwise_core::config::LoggingSettings;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::event_log::RecentEvents;
use crate::tracing_layer::PipelineEventLayer;

/// Installs the global subscriber.
///
/// `settings.level` is an `EnvFilter` directive and applies to the formatted
/// output only; `event_layer`, when given, sees pipeline events regardless of
/// the level.
pub fn init_tracing(settings: &LoggingSettings, event_layer: Option<PipelineEventLayer>) -> Result<()> {
    let filter = EnvFilter::try_new(&settings.level)
        .with_context(|| format!("invalid log filter '{}'", settings.level))?;

    let fmt_layer = if settings.json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .with(event_layer)
        .try_init()
        .context("tracing subscriber already installed")?;

    Ok(())
}

/// Installs the global subscriber with a fresh event log and returns the log.
pub fn init_with_event_log(settings: &LoggingSettings, capacity: usize) -> Result<RecentEvents> {
    let events = RecentEvents::new(capacity);
    init_tracing(settings, Some(PipelineEventLayer::new(events.clone())))?;
    Ok(events)
}
