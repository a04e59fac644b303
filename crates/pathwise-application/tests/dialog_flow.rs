//! End-to-end dialog tests against in-process stores and mock collaborators.

use async_trait::async_trait;
use pathwise_application::session::{Collaborators, SessionOrchestrator, collaborator};
use pathwise_core::config::PipelineSettings;
use pathwise_core::decision::{Decision, DecisionRecommender, FixedPolicyRecommender};
use pathwise_core::dialog::{DialogSessionStore, Phase, SLOT_EMAIL};
use pathwise_core::error::Result;
use pathwise_core::ethics::{ConstraintEthicsGate, StateSnapshot};
use pathwise_core::intent::IntentClassifier;
use pathwise_core::memory::{MemoryRecord, MemoryService, MemoryStats, MemoryType, NewMemory};
use pathwise_core::planning::{
    MonteCarloSimulator, PlanningService, SimulationRequest, SimulationResult,
};
use pathwise_core::reply::{DefaultReplies, ReplyKind};
use pathwise_infrastructure::InMemoryDialogSessionStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Counts store calls and keeps what was stored.
#[derive(Default)]
struct CountingMemory {
    calls: Mutex<Vec<NewMemory>>,
}

#[async_trait]
impl MemoryService for CountingMemory {
    async fn store(&self, memory: NewMemory) -> Result<String> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(memory);
        Ok(format!("m-{}", calls.len()))
    }

    async fn retrieve(&self, _user_id: &str, _limit: usize) -> Result<Vec<MemoryRecord>> {
        Ok(vec![])
    }

    async fn stats(&self, _user_id: &str) -> Result<MemoryStats> {
        Ok(MemoryStats::from_records(std::iter::empty()))
    }
}

/// Never answers within any reasonable timeout.
struct StalledPlanner;

#[async_trait]
impl PlanningService for StalledPlanner {
    async fn simulate(&self, request: SimulationRequest) -> Result<SimulationResult> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        MonteCarloSimulator::default().run(&request)
    }
}

/// Records the state it was asked about.
#[derive(Default)]
struct SpyRecommender {
    seen: Mutex<Vec<StateSnapshot>>,
}

#[async_trait]
impl DecisionRecommender for SpyRecommender {
    async fn recommend(&self, user_id: &str, state: &StateSnapshot) -> Result<Decision> {
        self.seen.lock().unwrap().push(*state);
        FixedPolicyRecommender::default().recommend(user_id, state).await
    }
}

struct Harness {
    orchestrator: Arc<SessionOrchestrator>,
    store: Arc<InMemoryDialogSessionStore>,
    memory: Arc<CountingMemory>,
}

fn harness(planner: Arc<dyn PlanningService>, recommender: Arc<dyn DecisionRecommender>) -> Harness {
    let store = Arc::new(InMemoryDialogSessionStore::new());
    let memory = Arc::new(CountingMemory::default());
    let settings = PipelineSettings {
        simulation_timeout_ms: 50,
        recommender_timeout_ms: 50,
        memory_timeout_ms: 50,
        ..PipelineSettings::default()
    };
    let orchestrator = SessionOrchestrator::new(
        Collaborators {
            store: store.clone(),
            memory: memory.clone(),
            planner,
            recommender,
            ethics: Arc::new(ConstraintEthicsGate::new()),
            replies: Arc::new(DefaultReplies),
        },
        IntentClassifier::default(),
        settings,
    );
    Harness {
        orchestrator: Arc::new(orchestrator),
        store,
        memory,
    }
}

fn default_harness() -> Harness {
    harness(
        Arc::new(MonteCarloSimulator::default()),
        Arc::new(FixedPolicyRecommender::default()),
    )
}

#[tokio::test]
async fn new_session_moves_to_waiting_email() {
    let h = default_harness();
    for (user, text) in [
        ("u1", "I want to plan my career"),
        ("u2", "please tell me what to learn"),
        ("u3", "a@b.com"),
    ] {
        h.orchestrator.handle_message(user, text).await.unwrap();
        let session = h.store.get(user).await.unwrap();
        assert_eq!(session.phase, Phase::WaitingEmail, "user {}", user);
        assert!(session.missing_slots.contains(SLOT_EMAIL));
    }
    // An email on a NEW session is not stored
    assert!(h.memory.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_email_while_waiting_email_stores_nothing() {
    let h = default_harness();
    h.orchestrator
        .handle_message("ada", "I want to plan my career")
        .await
        .unwrap();

    let reply = h
        .orchestrator
        .handle_message("ada", "not-an-email")
        .await
        .unwrap();
    assert_eq!(reply.text(), Some(ReplyKind::TellMeMore.default_text()));
    assert_eq!(h.store.get("ada").await.unwrap().phase, Phase::WaitingEmail);
    assert!(h.memory.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn email_while_waiting_email_stores_once() {
    let h = default_harness();
    h.orchestrator
        .handle_message("bea", "I want to plan my career")
        .await
        .unwrap();
    h.orchestrator.handle_message("bea", "a@b.com").await.unwrap();

    assert_eq!(h.store.get("bea").await.unwrap().phase, Phase::WaitingGoal);
    let calls = h.memory.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].memory_type, MemoryType::Email);
    assert_eq!(calls[0].importance, 1.0);
    assert_eq!(calls[0].content, "a@b.com");
}

#[tokio::test(start_paused = true)]
async fn stalled_simulator_degrades_and_still_reaches_done() {
    let recommender = Arc::new(SpyRecommender::default());
    let h = harness(Arc::new(StalledPlanner), recommender.clone());

    h.orchestrator
        .handle_message("cai", "I want to plan my career")
        .await
        .unwrap();
    h.orchestrator.handle_message("cai", "cai@example.com").await.unwrap();
    let reply = h
        .orchestrator
        .handle_message("cai", "become a staff engineer")
        .await
        .unwrap();

    let plan = reply.plan().expect("plan reply");
    assert!(plan.plan.is_none());
    assert_eq!(plan.unavailable, vec![collaborator::SIMULATOR.to_string()]);
    // The recommendation still went through the gate
    assert!(plan.validation.as_ref().unwrap().approved);
    assert_eq!(
        plan.recommended_action.as_ref().unwrap().action(),
        "study_high_priority_skill"
    );
    assert_eq!(h.store.get("cai").await.unwrap().phase, Phase::Done);
    assert_eq!(recommender.seen.lock().unwrap().as_slice(), &[StateSnapshot::default()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_messages_for_one_user_never_skip_a_phase() {
    let h = default_harness();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .handle_message("dev", "I want to plan my career")
                    .await
            })
        })
        .collect();

    let mut request_email = 0;
    let mut invalid_email = 0;
    for handle in handles {
        let reply = handle.await.unwrap().unwrap();
        match reply.text() {
            Some(text) if text == ReplyKind::RequestEmail.default_text() => request_email += 1,
            Some(text) if text == ReplyKind::InvalidEmail.default_text() => invalid_email += 1,
            other => panic!("unexpected reply {:?}", other),
        }
    }

    // Exactly one message performed NEW -> WAITING_EMAIL; the rest re-prompted
    assert_eq!(request_email, 1);
    assert_eq!(invalid_email, 7);
    assert_eq!(h.store.get("dev").await.unwrap().phase, Phase::WaitingEmail);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_users_progress_independently() {
    let h = default_harness();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move {
                let user = format!("user-{}", i);
                orchestrator
                    .handle_message(&user, "I want to plan my career")
                    .await?;
                orchestrator
                    .handle_message(&user, &format!("{}@example.com", user))
                    .await?;
                Ok::<_, pathwise_core::PathwiseError>(user)
            })
        })
        .collect();

    for handle in handles {
        let user = handle.await.unwrap().unwrap();
        assert_eq!(h.store.get(&user).await.unwrap().phase, Phase::WaitingGoal);
    }
    assert_eq!(h.memory.calls.lock().unwrap().len(), 10);
}

#[tokio::test]
async fn reset_then_get_is_fresh() {
    let h = default_harness();
    h.orchestrator
        .handle_message("eve", "I want to plan my career")
        .await
        .unwrap();
    h.orchestrator.reset("eve").await.unwrap();

    let session = h.store.get("eve").await.unwrap();
    assert_eq!(session.phase, Phase::New);
    assert!(session.missing_slots.is_empty());
}
