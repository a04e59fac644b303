//! Replies produced by the session orchestrator.

use pathwise_core::decision::Decision;
use pathwise_core::ethics::ValidationResult;
use pathwise_core::planning::SimulationResult;
use serde::{Deserialize, Serialize};

/// Collaborator names reported in [`PlanReply::unavailable`].
pub mod collaborator {
    pub const MEMORY: &str = "memory";
    pub const SIMULATOR: &str = "simulator";
    pub const RECOMMENDER: &str = "recommender";
    pub const ETHICS: &str = "ethics";
}

/// What a user receives for one message.
///
/// Serializes as a bare string for prompts and as an object for plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageReply {
    Text(String),
    Plan(Box<PlanReply>),
}

impl MessageReply {
    pub fn text(&self) -> Option<&str> {
        match self {
            MessageReply::Text(text) => Some(text),
            MessageReply::Plan(_) => None,
        }
    }

    pub fn plan(&self) -> Option<&PlanReply> {
        match self {
            MessageReply::Text(_) => None,
            MessageReply::Plan(plan) => Some(plan),
        }
    }
}

/// The action forwarded to the user: the recommender's decision when the gate
/// approved it, otherwise the gate's alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendedAction {
    Decision(Decision),
    Alternative(String),
}

impl RecommendedAction {
    pub fn action(&self) -> &str {
        match self {
            RecommendedAction::Decision(decision) => &decision.recommended_action,
            RecommendedAction::Alternative(action) => action,
        }
    }
}

/// Combined result of the full pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReply {
    pub plan: Option<SimulationResult>,
    pub recommended_action: Option<RecommendedAction>,
    pub explanation: String,
    pub validation: Option<ValidationResult>,
    /// Collaborators that failed or timed out while building this reply
    #[serde(default)]
    pub unavailable: Vec<String>,
}

impl PlanReply {
    pub fn is_degraded(&self) -> bool {
        !self.unavailable.is_empty()
    }
}
