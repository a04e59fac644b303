//! Wires collaborators from configuration.

use pathwise_core::config::AppConfig;
use pathwise_core::decision::{DecisionRecommender, FixedPolicyRecommender};
use pathwise_core::dialog::DialogSessionStore;
use pathwise_core::error::Result;
use pathwise_core::ethics::ConstraintEthicsGate;
use pathwise_core::intent::IntentClassifier;
use pathwise_core::memory::MemoryService;
use pathwise_core::planning::MonteCarloSimulator;
use pathwise_infrastructure::{
    HttpDecisionRecommender, HttpMemoryService, InMemoryDialogSessionStore,
    InMemoryMemoryService, MiniJinjaReplyTemplates,
};
use std::sync::Arc;
use std::time::Duration;

use crate::session::{Collaborators, SessionOrchestrator};

/// Every service a front-end needs, built once per process.
///
/// The orchestrator shares its collaborators with the direct endpoints, so a
/// memory stored through the dialog is visible through `memory` as well.
#[derive(Clone)]
pub struct AppServices {
    pub orchestrator: Arc<SessionOrchestrator>,
    pub store: Arc<dyn DialogSessionStore>,
    pub memory: Arc<dyn MemoryService>,
    pub simulator: Arc<MonteCarloSimulator>,
    pub recommender: Arc<dyn DecisionRecommender>,
    pub ethics: Arc<ConstraintEthicsGate>,
}

impl AppServices {
    /// Builds the services described by `config`.
    ///
    /// Collaborators with a configured URL are reached over HTTP; the rest run
    /// in-process.
    ///
    /// # Errors
    ///
    /// Returns `PathwiseError::Config` if a reply template override is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let replies = Arc::new(MiniJinjaReplyTemplates::new(&config.replies)?);
        let store: Arc<dyn DialogSessionStore> = Arc::new(InMemoryDialogSessionStore::new());
        let simulator = Arc::new(MonteCarloSimulator::new(config.simulator.clone()));
        let ethics = Arc::new(ConstraintEthicsGate::new());

        let memory: Arc<dyn MemoryService> = match &config.collaborators.memory_url {
            Some(url) => Arc::new(
                HttpMemoryService::new(url.as_str())
                    .with_timeout(Duration::from_millis(config.pipeline.memory_timeout_ms)),
            ),
            None => Arc::new(InMemoryMemoryService::new()),
        };

        let recommender: Arc<dyn DecisionRecommender> = match &config.collaborators.recommender_url
        {
            Some(url) => Arc::new(
                HttpDecisionRecommender::new(url.as_str())
                    .with_timeout(Duration::from_millis(config.pipeline.recommender_timeout_ms)),
            ),
            None => Arc::new(FixedPolicyRecommender::default()),
        };

        let collaborators = Collaborators {
            store: store.clone(),
            memory: memory.clone(),
            planner: simulator.clone(),
            recommender: recommender.clone(),
            ethics: ethics.clone(),
            replies,
        };

        let orchestrator = Arc::new(SessionOrchestrator::new(
            collaborators,
            IntentClassifier::new(&config.dialog.small_talk),
            config.pipeline.clone(),
        ));

        tracing::info!(
            memory = if config.collaborators.memory_url.is_some() { "http" } else { "in_process" },
            recommender = if config.collaborators.recommender_url.is_some() { "http" } else { "in_process" },
            "Services initialized"
        );

        Ok(Self {
            orchestrator,
            store,
            memory,
            simulator,
            recommender,
            ethics,
        })
    }
}
