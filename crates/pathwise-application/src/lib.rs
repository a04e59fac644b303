//! Application layer for Pathwise.
//!
//! This crate provides the session orchestration use case and the wiring
//! that builds it from configuration.

pub mod bootstrap;
pub mod session;

pub use bootstrap::AppServices;
pub use session::{MessageReply, PlanReply, RecommendedAction, SessionOrchestrator};
