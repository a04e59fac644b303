//! Dialog session orchestration.

mod locks;
mod orchestrator;
mod pipeline;
mod reply;

pub use locks::UserLocks;
pub use orchestrator::{Collaborators, EMAIL_IMPORTANCE, GOAL_IMPORTANCE, SessionOrchestrator};
pub use reply::{MessageReply, PlanReply, RecommendedAction, collaborator};
