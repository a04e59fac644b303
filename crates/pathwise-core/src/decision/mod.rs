//! Decision recommendation.
//!
//! The orchestrator treats a [`Decision`] as opaque: it only forwards the
//! recommended action to the ethics gate and the user.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PathwiseError, Result};
use crate::ethics::StateSnapshot;

/// A recommended next action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub recommended_action: String,
    /// In `[0, 1]`
    pub confidence: f64,
    pub rationale: String,
}

impl Decision {
    /// Rejects decisions whose confidence lies outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(PathwiseError::invalid_input(format!(
                "decision confidence must be within [0, 1], got {}",
                self.confidence
            )));
        }
        Ok(())
    }
}

/// Recommends an action for a user's current state.
#[async_trait]
pub trait DecisionRecommender: Send + Sync {
    async fn recommend(&self, user_id: &str, state: &StateSnapshot) -> Result<Decision>;
}

/// Recommender that always proposes the same policy action.
#[derive(Debug, Clone)]
pub struct FixedPolicyRecommender {
    decision: Decision,
}

impl FixedPolicyRecommender {
    pub fn new(decision: Decision) -> Self {
        Self { decision }
    }
}

impl Default for FixedPolicyRecommender {
    fn default() -> Self {
        Self::new(Decision {
            recommended_action: "study_high_priority_skill".to_string(),
            confidence: 0.85,
            rationale: "Based on your current progress and goals, I recommend focusing on \
                        high-priority skills that align with your career objectives."
                .to_string(),
        })
    }
}

#[async_trait]
impl DecisionRecommender for FixedPolicyRecommender {
    async fn recommend(&self, user_id: &str, _state: &StateSnapshot) -> Result<Decision> {
        tracing::debug!(
            target: "pathwise::decision",
            user_id,
            action = %self.decision.recommended_action,
            "Fixed policy recommendation"
        );
        Ok(self.decision.clone())
    }
}
