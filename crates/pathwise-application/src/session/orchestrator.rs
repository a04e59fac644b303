//! Session orchestration use case.
//!
//! `SessionOrchestrator` owns the dialog state machine. It classifies each
//! message, moves the user's session along `NEW -> WAITING_EMAIL ->
//! WAITING_GOAL -> DONE`, stores the facts it collects, and runs the full
//! recommendation pipeline once a goal is known.

use pathwise_core::config::PipelineSettings;
use pathwise_core::decision::DecisionRecommender;
use pathwise_core::dialog::{DialogSession, DialogSessionStore, Phase, SLOT_EMAIL, SLOT_GOAL};
use pathwise_core::error::{PathwiseError, Result};
use pathwise_core::ethics::EthicsGate;
use pathwise_core::intent::{Intent, IntentClassifier};
use pathwise_core::memory::{MemoryService, MemoryType, NewMemory};
use pathwise_core::planning::PlanningService;
use pathwise_core::reply::{ReplyContext, ReplyKind, ReplyTemplates};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::locks::UserLocks;
use super::pipeline::{Pipeline, bounded, report_failure};
use super::reply::{MessageReply, collaborator};

/// Importance of a stored email address.
pub const EMAIL_IMPORTANCE: f64 = 1.0;
/// Importance of a stored goal.
pub const GOAL_IMPORTANCE: f64 = 0.9;

/// The collaborators the orchestrator drives.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn DialogSessionStore>,
    pub memory: Arc<dyn MemoryService>,
    pub planner: Arc<dyn PlanningService>,
    pub recommender: Arc<dyn DecisionRecommender>,
    pub ethics: Arc<dyn EthicsGate>,
    pub replies: Arc<dyn ReplyTemplates>,
}

/// Drives the per-user dialog state machine.
///
/// # Thread Safety
///
/// Messages for the same user are serialized through [`UserLocks`]; messages
/// for different users run fully in parallel.
pub struct SessionOrchestrator {
    collaborators: Collaborators,
    classifier: IntentClassifier,
    settings: PipelineSettings,
    locks: UserLocks,
}

impl SessionOrchestrator {
    pub fn new(
        collaborators: Collaborators,
        classifier: IntentClassifier,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            collaborators,
            classifier,
            settings,
            locks: UserLocks::new(),
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Handles one user message and returns the reply.
    ///
    /// Small talk and short input are answered without touching the session.
    /// Collaborator failures degrade the reply; state corruption resets the
    /// session and yields an apology.
    ///
    /// # Errors
    ///
    /// Returns `PathwiseError::InvalidInput` if `user_id` is blank.
    pub async fn handle_message(&self, user_id: &str, text: &str) -> Result<MessageReply> {
        ensure_user_id(user_id)?;
        let context = ReplyContext::new(user_id, text.trim());

        let intent = self.classifier.classify(text);
        tracing::debug!(target: "pathwise::dialog", user_id, %intent, "Message classified");

        match intent {
            Intent::SmallTalk => return Ok(self.say(ReplyKind::Greeting, &context)),
            Intent::ShortInput => return Ok(self.say(ReplyKind::TellMeMore, &context)),
            Intent::Email | Intent::FullRequest => {}
        }

        let _guard = self.locks.acquire(user_id).await;

        match self.advance(user_id, intent, &context).await {
            Ok(reply) => Ok(reply),
            Err(e) if e.is_state_corruption() => {
                tracing::error!(
                    target: "pathwise::dialog",
                    user_id,
                    error = %e,
                    "Dialog state corrupted, resetting session"
                );
                if let Err(clear_err) = self.collaborators.store.clear(user_id).await {
                    tracing::error!(
                        target: "pathwise::dialog",
                        user_id,
                        error = %clear_err,
                        "Failed to clear corrupted session"
                    );
                }
                Ok(self.say(ReplyKind::Apology, &context))
            }
            Err(e) => {
                tracing::error!(
                    target: "pathwise::dialog",
                    user_id,
                    error = %e,
                    "Failed to handle message"
                );
                Ok(self.say(ReplyKind::Apology, &context))
            }
        }
    }

    /// Explicitly resets the user's session to `NEW` and drops the user's
    /// lock entry when no other message is in flight.
    pub async fn reset(&self, user_id: &str) -> Result<()> {
        ensure_user_id(user_id)?;
        let cleared = {
            let _guard = self.locks.acquire(user_id).await;
            self.collaborators.store.clear(user_id).await
        };
        self.locks.release(user_id).await;
        cleared?;
        tracing::info!(target: "pathwise::dialog", user_id, "Session reset");
        Ok(())
    }

    /// Returns the user's current session without modifying it.
    pub async fn session(&self, user_id: &str) -> Result<DialogSession> {
        ensure_user_id(user_id)?;
        self.collaborators.store.get(user_id).await
    }

    /// Returns every stored session, ordered by user id.
    pub async fn sessions(&self) -> Result<Vec<DialogSession>> {
        self.collaborators.store.list().await
    }

    /// Applies one row of the phase table. Must be called under the user's lock.
    async fn advance(
        &self,
        user_id: &str,
        intent: Intent,
        context: &ReplyContext,
    ) -> Result<MessageReply> {
        let session = self.collaborators.store.get(user_id).await?;

        match (session.phase, intent) {
            (Phase::New, _) => {
                self.transition(&session, Phase::WaitingEmail, [SLOT_EMAIL])
                    .await?;
                Ok(self.say(ReplyKind::RequestEmail, context))
            }
            (Phase::WaitingEmail, Intent::Email) => {
                // Storage failures never block the dialog
                if let Err(e) = self
                    .remember(user_id, &context.text, MemoryType::Email, EMAIL_IMPORTANCE)
                    .await
                {
                    report_failure(user_id, collaborator::MEMORY, &e);
                }
                self.transition(&session, Phase::WaitingGoal, [SLOT_GOAL])
                    .await?;
                Ok(self.say(ReplyKind::AskGoal, context))
            }
            (Phase::WaitingEmail, _) => Ok(self.say(ReplyKind::InvalidEmail, context)),
            (Phase::WaitingGoal, _) => {
                let mut unavailable = Vec::new();
                if let Err(e) = self
                    .remember(user_id, &context.text, MemoryType::Goal, GOAL_IMPORTANCE)
                    .await
                {
                    report_failure(user_id, collaborator::MEMORY, &e);
                    unavailable.push(collaborator::MEMORY.to_string());
                }
                let plan = Pipeline::new(&self.collaborators, &self.settings)
                    .run(user_id, unavailable)
                    .await;
                self.transition(&session, Phase::Done, std::iter::empty::<&str>())
                    .await?;
                Ok(MessageReply::Plan(Box::new(plan)))
            }
            (Phase::Done, _) => {
                let plan = Pipeline::new(&self.collaborators, &self.settings)
                    .run(user_id, Vec::new())
                    .await;
                Ok(MessageReply::Plan(Box::new(plan)))
            }
        }
    }

    async fn transition<I, S>(&self, session: &DialogSession, next: Phase, missing: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !session.phase.can_advance_to(next) {
            return Err(PathwiseError::state_corruption(
                &session.user_id,
                format!("illegal transition {} -> {}", session.phase, next),
            ));
        }

        let missing_slots: BTreeSet<String> = DialogSession::slots(missing);
        self.collaborators
            .store
            .set(&session.user_id, next, missing_slots)
            .await?;

        tracing::info!(
            target: "pathwise::dialog",
            user_id = %session.user_id,
            from = %session.phase,
            to = %next,
            "Phase transition"
        );
        Ok(())
    }

    async fn remember(
        &self,
        user_id: &str,
        content: &str,
        memory_type: MemoryType,
        importance: f64,
    ) -> Result<String> {
        let memory = NewMemory::new(user_id, content, memory_type, importance);
        bounded(
            collaborator::MEMORY,
            self.settings.memory_timeout_ms,
            self.collaborators.memory.store(memory),
        )
        .await
    }

    fn say(&self, kind: ReplyKind, context: &ReplyContext) -> MessageReply {
        MessageReply::Text(self.collaborators.replies.render(kind, context))
    }
}

fn ensure_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(PathwiseError::invalid_input("user_id must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::reply::RecommendedAction;
    use async_trait::async_trait;
    use pathwise_core::decision::{Decision, FixedPolicyRecommender};
    use pathwise_core::ethics::{ConstraintEthicsGate, StateSnapshot, VALIDATION_EXPLANATION};
    use pathwise_core::memory::{MemoryRecord, MemoryStats};
    use pathwise_core::planning::MonteCarloSimulator;
    use pathwise_core::reply::DefaultReplies;
    use pathwise_infrastructure::InMemoryDialogSessionStore;
    use std::sync::Mutex;

    /// Records every stored memory.
    #[derive(Default)]
    struct RecordingMemory {
        stored: Mutex<Vec<NewMemory>>,
        fail: bool,
    }

    #[async_trait]
    impl MemoryService for RecordingMemory {
        async fn store(&self, memory: NewMemory) -> Result<String> {
            if self.fail {
                return Err(PathwiseError::unavailable("memory", "down"));
            }
            self.stored.lock().unwrap().push(memory);
            Ok("m-1".to_string())
        }

        async fn retrieve(&self, _user_id: &str, _limit: usize) -> Result<Vec<MemoryRecord>> {
            Ok(vec![])
        }

        async fn stats(&self, _user_id: &str) -> Result<MemoryStats> {
            Ok(MemoryStats::from_records(std::iter::empty()))
        }
    }

    struct FailingRecommender;

    #[async_trait]
    impl DecisionRecommender for FailingRecommender {
        async fn recommend(&self, _user_id: &str, _state: &StateSnapshot) -> Result<Decision> {
            Err(PathwiseError::unavailable("recommender", "connection refused"))
        }
    }

    struct Fixture {
        orchestrator: SessionOrchestrator,
        store: Arc<InMemoryDialogSessionStore>,
        memory: Arc<RecordingMemory>,
    }

    fn fixture_with(
        memory: RecordingMemory,
        recommender: Arc<dyn DecisionRecommender>,
        settings: PipelineSettings,
    ) -> Fixture {
        let store = Arc::new(InMemoryDialogSessionStore::new());
        let memory = Arc::new(memory);
        let collaborators = Collaborators {
            store: store.clone(),
            memory: memory.clone(),
            planner: Arc::new(MonteCarloSimulator::default()),
            recommender,
            ethics: Arc::new(ConstraintEthicsGate::new()),
            replies: Arc::new(DefaultReplies),
        };
        Fixture {
            orchestrator: SessionOrchestrator::new(
                collaborators,
                IntentClassifier::default(),
                settings,
            ),
            store,
            memory,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(
            RecordingMemory::default(),
            Arc::new(FixedPolicyRecommender::default()),
            PipelineSettings::default(),
        )
    }

    async fn phase_of(fixture: &Fixture, user_id: &str) -> Phase {
        fixture.orchestrator.session(user_id).await.unwrap().phase
    }

    #[tokio::test]
    async fn test_full_dialog() {
        let f = fixture();

        let reply = f
            .orchestrator
            .handle_message("ivy", "I want a new job")
            .await
            .unwrap();
        assert_eq!(reply.text(), Some(ReplyKind::RequestEmail.default_text()));
        let session = f.orchestrator.session("ivy").await.unwrap();
        assert_eq!(session.phase, Phase::WaitingEmail);
        assert!(session.missing_slots.contains(SLOT_EMAIL));

        let reply = f
            .orchestrator
            .handle_message("ivy", "ivy@example.com")
            .await
            .unwrap();
        assert_eq!(reply.text(), Some(ReplyKind::AskGoal.default_text()));
        assert_eq!(phase_of(&f, "ivy").await, Phase::WaitingGoal);

        let reply = f
            .orchestrator
            .handle_message("ivy", "become a data engineer this year")
            .await
            .unwrap();
        let plan = reply.plan().unwrap();
        assert!(plan.plan.is_some());
        assert_eq!(
            plan.recommended_action.as_ref().unwrap().action(),
            "study_high_priority_skill"
        );
        assert!(plan.validation.as_ref().unwrap().approved);
        assert!(plan.unavailable.is_empty());
        assert_eq!(phase_of(&f, "ivy").await, Phase::Done);

        let stored = f.memory.stored.lock().unwrap().clone();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].memory_type, MemoryType::Email);
        assert_eq!(stored[0].importance, EMAIL_IMPORTANCE);
        assert_eq!(stored[1].memory_type, MemoryType::Goal);
        assert_eq!(stored[1].importance, GOAL_IMPORTANCE);
        assert_eq!(stored[1].content, "become a data engineer this year");
    }

    #[tokio::test]
    async fn test_small_talk_and_short_input_keep_phase() {
        let f = fixture();

        let reply = f.orchestrator.handle_message("jon", "Hello").await.unwrap();
        assert_eq!(reply.text(), Some(ReplyKind::Greeting.default_text()));
        let reply = f.orchestrator.handle_message("jon", "no").await.unwrap();
        assert_eq!(reply.text(), Some(ReplyKind::TellMeMore.default_text()));
        let reply = f.orchestrator.handle_message("jon", "").await.unwrap();
        assert_eq!(reply.text(), Some(ReplyKind::TellMeMore.default_text()));

        assert_eq!(phase_of(&f, "jon").await, Phase::New);
        assert!(f.store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_email_reprompts() {
        let f = fixture();
        f.orchestrator
            .handle_message("kim", "help me plan my career")
            .await
            .unwrap();

        let reply = f
            .orchestrator
            .handle_message("kim", "my address is kim at example")
            .await
            .unwrap();
        assert_eq!(reply.text(), Some(ReplyKind::InvalidEmail.default_text()));
        assert_eq!(phase_of(&f, "kim").await, Phase::WaitingEmail);
        assert!(f.memory.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_done_reruns_pipeline() {
        let f = fixture();
        f.store
            .set("lea", Phase::Done, BTreeSet::new())
            .await
            .unwrap();

        let reply = f
            .orchestrator
            .handle_message("lea", "what should I do next week")
            .await
            .unwrap();
        assert!(reply.plan().is_some());
        assert_eq!(phase_of(&f, "lea").await, Phase::Done);
        assert!(f.memory.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_low_health_replaces_recommendation() {
        let settings = PipelineSettings {
            baseline_state: StateSnapshot {
                health: 0.2,
                ..StateSnapshot::default()
            },
            ..PipelineSettings::default()
        };
        let f = fixture_with(
            RecordingMemory::default(),
            Arc::new(FixedPolicyRecommender::default()),
            settings,
        );
        f.store.set("max", Phase::Done, BTreeSet::new()).await.unwrap();

        let reply = f
            .orchestrator
            .handle_message("max", "what should I study now")
            .await
            .unwrap();
        let plan = reply.plan().unwrap();
        assert_eq!(
            plan.recommended_action,
            Some(RecommendedAction::Alternative("rest_and_recover".to_string()))
        );
        let validation = plan.validation.as_ref().unwrap();
        assert!(!validation.approved);
        assert_eq!(validation.violations, vec!["health too low".to_string()]);
        assert_eq!(plan.explanation, validation.explanation);
        assert_eq!(plan.explanation, VALIDATION_EXPLANATION);
    }

    #[tokio::test]
    async fn test_approved_plan_carries_gate_explanation() {
        let f = fixture();
        f.store.set("zed", Phase::Done, BTreeSet::new()).await.unwrap();

        let reply = f
            .orchestrator
            .handle_message("zed", "what should I do next")
            .await
            .unwrap();
        let plan = reply.plan().unwrap();
        let validation = plan.validation.as_ref().unwrap();
        assert!(validation.approved);
        assert!(matches!(
            plan.recommended_action,
            Some(RecommendedAction::Decision(_))
        ));
        assert_eq!(plan.explanation, validation.explanation);
        assert_eq!(plan.explanation, VALIDATION_EXPLANATION);
    }

    #[tokio::test]
    async fn test_recommender_failure_degrades() {
        let f = fixture_with(
            RecordingMemory::default(),
            Arc::new(FailingRecommender),
            PipelineSettings::default(),
        );
        f.store
            .set("ned", Phase::WaitingGoal, DialogSession::slots([SLOT_GOAL]))
            .await
            .unwrap();

        let reply = f
            .orchestrator
            .handle_message("ned", "get promoted to staff engineer")
            .await
            .unwrap();
        let plan = reply.plan().unwrap();
        assert!(plan.plan.is_some());
        assert!(plan.recommended_action.is_none());
        assert!(plan.validation.is_none());
        assert_eq!(plan.unavailable, vec!["recommender".to_string()]);
        assert_eq!(
            plan.explanation,
            ReplyKind::RecommendationUnavailable.default_text()
        );
        assert_eq!(phase_of(&f, "ned").await, Phase::Done);
    }

    #[tokio::test]
    async fn test_rejected_simulation_request_degrades() {
        // Beyond the simulator's horizon cap, so it answers InvalidInput
        let settings = PipelineSettings {
            horizon_days: 10_000,
            ..PipelineSettings::default()
        };
        let f = fixture_with(
            RecordingMemory::default(),
            Arc::new(FixedPolicyRecommender::default()),
            settings,
        );
        f.store.set("rae", Phase::Done, BTreeSet::new()).await.unwrap();

        let reply = f
            .orchestrator
            .handle_message("rae", "what should I do next")
            .await
            .unwrap();
        let plan = reply.plan().unwrap();
        assert!(plan.plan.is_none());
        assert_eq!(plan.unavailable, vec!["simulator".to_string()]);
        assert!(plan.validation.as_ref().unwrap().approved);
    }

    #[tokio::test]
    async fn test_memory_failure_does_not_block_transition() {
        let f = fixture_with(
            RecordingMemory {
                fail: true,
                ..RecordingMemory::default()
            },
            Arc::new(FixedPolicyRecommender::default()),
            PipelineSettings::default(),
        );
        f.store
            .set("oli", Phase::WaitingEmail, DialogSession::slots([SLOT_EMAIL]))
            .await
            .unwrap();

        let reply = f
            .orchestrator
            .handle_message("oli", "oli@example.org")
            .await
            .unwrap();
        assert_eq!(reply.text(), Some(ReplyKind::AskGoal.default_text()));
        assert_eq!(phase_of(&f, "oli").await, Phase::WaitingGoal);

        let reply = f
            .orchestrator
            .handle_message("oli", "learn to build compilers")
            .await
            .unwrap();
        assert_eq!(reply.plan().unwrap().unavailable, vec!["memory".to_string()]);
        assert_eq!(phase_of(&f, "oli").await, Phase::Done);
    }

    #[tokio::test]
    async fn test_corrupted_state_resets_with_apology() {
        let f = fixture();
        f.store
            .insert_raw("pat", "HALF_DONE", BTreeSet::new())
            .await;

        let reply = f
            .orchestrator
            .handle_message("pat", "plan my next quarter please")
            .await
            .unwrap();
        assert_eq!(reply.text(), Some(ReplyKind::Apology.default_text()));
        assert_eq!(phase_of(&f, "pat").await, Phase::New);
    }

    #[tokio::test]
    async fn test_sessions_lists_started_dialogs() {
        let f = fixture();
        for user in ["uma", "tia"] {
            f.orchestrator
                .handle_message(user, "I want to change careers")
                .await
                .unwrap();
        }
        f.orchestrator.handle_message("vic", "hi").await.unwrap();

        let sessions = f.orchestrator.sessions().await.unwrap();
        let users: Vec<&str> = sessions.iter().map(|s| s.user_id.as_str()).collect();
        assert_eq!(users, vec!["tia", "uma"]);
        assert!(sessions.iter().all(|s| s.phase == Phase::WaitingEmail));
    }

    #[tokio::test]
    async fn test_reset() {
        let f = fixture();
        f.store.set("quin", Phase::Done, BTreeSet::new()).await.unwrap();
        f.orchestrator
            .handle_message("quin", "what comes after this")
            .await
            .unwrap();
        assert_eq!(f.orchestrator.locks.len().await, 1);

        f.orchestrator.reset("quin").await.unwrap();
        assert_eq!(phase_of(&f, "quin").await, Phase::New);
        assert_eq!(f.orchestrator.locks.len().await, 0);
    }

    #[tokio::test]
    async fn test_blank_user_id_is_invalid() {
        let f = fixture();
        let err = f
            .orchestrator
            .handle_message("  ", "hello there friend")
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(f.orchestrator.reset("").await.unwrap_err().is_invalid_input());
    }
}
