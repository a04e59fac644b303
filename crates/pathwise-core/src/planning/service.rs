//! Planning collaborator trait.

use async_trait::async_trait;

use super::model::{SimulationRequest, SimulationResult};
use crate::error::Result;

/// Produces simulated trajectories for a planning horizon.
///
/// The in-process implementation is [`super::MonteCarloSimulator`]; a
/// networked planner can be substituted without touching the orchestrator.
#[async_trait]
pub trait PlanningService: Send + Sync {
    async fn simulate(&self, request: SimulationRequest) -> Result<SimulationResult>;
}
