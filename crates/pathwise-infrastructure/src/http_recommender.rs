//! Decision recommender backed by a remote `/rl/decide` endpoint.

use async_trait::async_trait;
use pathwise_core::decision::{Decision, DecisionRecommender};
use pathwise_core::error::Result;
use pathwise_core::ethics::StateSnapshot;
use serde::Serialize;
use std::time::Duration;

use crate::http_support::Endpoint;

const COLLABORATOR: &str = "recommender";

#[derive(Debug, Serialize)]
struct DecideRequest<'a> {
    user_id: &'a str,
    current_state: &'a StateSnapshot,
}

#[derive(Debug, Clone)]
pub struct HttpDecisionRecommender {
    endpoint: Endpoint,
}

impl HttpDecisionRecommender {
    pub fn new(base_url: impl Into<String>) -> Self {
        tracing::info!(target: "pathwise::collaborator", "Using remote decision recommender");
        Self {
            endpoint: Endpoint::new(COLLABORATOR, base_url),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint = self.endpoint.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl DecisionRecommender for HttpDecisionRecommender {
    async fn recommend(&self, user_id: &str, state: &StateSnapshot) -> Result<Decision> {
        let request = self
            .endpoint
            .client
            .post(self.endpoint.url("/rl/decide"))
            .json(&DecideRequest {
                user_id,
                current_state: state,
            });
        let decision: Decision = self.endpoint.send_json(request).await?;
        decision.validate()?;
        Ok(decision)
    }
}
