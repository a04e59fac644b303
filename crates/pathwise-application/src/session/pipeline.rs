//! Fan-out / fan-in of the full recommendation pipeline.

use pathwise_core::config::PipelineSettings;
use pathwise_core::decision::Decision;
use pathwise_core::error::{PathwiseError, Result};
use pathwise_core::ethics::REST_AND_RECOVER;
use pathwise_core::planning::{SimulationRequest, SimulationResult};
use pathwise_core::reply::{ReplyContext, ReplyKind};
use std::future::Future;
use std::time::Duration;

use super::orchestrator::Collaborators;
use super::reply::{PlanReply, RecommendedAction, collaborator};

/// Awaits `future` for at most `limit_ms`, reporting expiry as a timeout of
/// `collaborator`.
pub(crate) async fn bounded<T, F>(collaborator: &'static str, limit_ms: u64, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(Duration::from_millis(limit_ms), future).await {
        Ok(result) => result,
        Err(_) => Err(PathwiseError::timeout(collaborator, limit_ms)),
    }
}

pub(crate) struct Pipeline<'a> {
    collaborators: &'a Collaborators,
    settings: &'a PipelineSettings,
}

impl<'a> Pipeline<'a> {
    pub(crate) fn new(collaborators: &'a Collaborators, settings: &'a PipelineSettings) -> Self {
        Self {
            collaborators,
            settings,
        }
    }

    /// Runs simulation and recommendation concurrently, then gates the
    /// recommendation.
    ///
    /// Never fails: a collaborator error or timeout is recorded in
    /// `unavailable` and the reply is built from whatever succeeded.
    pub(crate) async fn run(&self, user_id: &str, mut unavailable: Vec<String>) -> PlanReply {
        let state = self.settings.baseline_state;
        let request = SimulationRequest::new(
            user_id,
            self.settings.horizon_days,
            self.settings.num_simulations,
        );

        tracing::info!(
            target: "pathwise::pipeline",
            user_id,
            stage = "fan_out",
            horizon_days = self.settings.horizon_days,
            "Pipeline started"
        );

        let (plan, decision) = tokio::join!(
            bounded(
                collaborator::SIMULATOR,
                self.settings.simulation_timeout_ms,
                self.collaborators.planner.simulate(request),
            ),
            bounded(
                collaborator::RECOMMENDER,
                self.settings.recommender_timeout_ms,
                self.collaborators.recommender.recommend(user_id, &state),
            ),
        );

        let plan = settle(user_id, collaborator::SIMULATOR, plan, &mut unavailable);
        let decision = settle(user_id, collaborator::RECOMMENDER, decision, &mut unavailable);

        let reply = match decision {
            Some(decision) => self.gate(user_id, plan, decision, unavailable).await,
            None => self.without_recommendation(user_id, plan, unavailable),
        };

        tracing::info!(
            target: "pathwise::pipeline",
            user_id,
            stage = "complete",
            action = reply
                .recommended_action
                .as_ref()
                .map(RecommendedAction::action)
                .unwrap_or("none"),
            degraded = reply.is_degraded(),
            "Pipeline finished"
        );
        reply
    }

    async fn gate(
        &self,
        user_id: &str,
        plan: Option<SimulationResult>,
        decision: Decision,
        mut unavailable: Vec<String>,
    ) -> PlanReply {
        let state = self.settings.baseline_state;
        let validation = match self
            .collaborators
            .ethics
            .validate(&decision.recommended_action, &state)
            .await
        {
            Ok(validation) => validation,
            Err(e) => {
                // An unvalidated decision is never forwarded
                report_failure(user_id, collaborator::ETHICS, &e);
                unavailable.push(collaborator::ETHICS.to_string());
                return self.without_recommendation(user_id, plan, unavailable);
            }
        };

        let recommended_action = if validation.approved {
            RecommendedAction::Decision(decision)
        } else {
            let alternative = validation
                .alternative_suggestion
                .clone()
                .unwrap_or_else(|| REST_AND_RECOVER.to_string());
            tracing::info!(
                target: "pathwise::pipeline",
                user_id,
                stage = "ethics",
                rejected = %decision.recommended_action,
                alternative = %alternative,
                violations = ?validation.violations,
                "Recommendation replaced"
            );
            RecommendedAction::Alternative(alternative)
        };

        PlanReply {
            plan,
            recommended_action: Some(recommended_action),
            explanation: validation.explanation.clone(),
            validation: Some(validation),
            unavailable,
        }
    }

    fn without_recommendation(
        &self,
        user_id: &str,
        plan: Option<SimulationResult>,
        unavailable: Vec<String>,
    ) -> PlanReply {
        let explanation = self.collaborators.replies.render(
            ReplyKind::RecommendationUnavailable,
            &ReplyContext::new(user_id, ""),
        );
        PlanReply {
            plan,
            recommended_action: None,
            explanation,
            validation: None,
            unavailable,
        }
    }
}

fn settle<T>(
    user_id: &str,
    name: &'static str,
    outcome: Result<T>,
    unavailable: &mut Vec<String>,
) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            report_failure(user_id, name, &e);
            unavailable.push(name.to_string());
            None
        }
    }
}

pub(crate) fn report_failure(user_id: &str, name: &str, error: &PathwiseError) {
    if error.is_collaborator_failure() {
        tracing::warn!(
            target: "pathwise::pipeline",
            user_id,
            stage = "collaborator",
            collaborator = name,
            error = %error,
            "Collaborator failed, degrading"
        );
    } else {
        tracing::error!(
            target: "pathwise::pipeline",
            user_id,
            stage = "collaborator",
            collaborator = name,
            error = %error,
            "Collaborator returned an unexpected error, degrading"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let value = bounded("simulator", 50, async { Ok::<_, PathwiseError>(3) }).await;
        assert_eq!(value.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let err = bounded("recommender", 10, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, PathwiseError>(())
        })
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            PathwiseError::Timeout { ref collaborator, after_ms: 10 } if collaborator == "recommender"
        ));
    }
}
