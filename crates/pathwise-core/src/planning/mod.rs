//! Trajectory planning: Monte-Carlo simulation and what-if analysis.

pub mod counterfactual;
pub mod model;
pub mod service;
pub mod simulator;

pub use counterfactual::{CounterfactualReport, Scenario, ScenarioOutcome, counterfactual};
pub use model::{
    ActionDistribution, GainRange, OutcomeStatistics, PlannedAction, SimulationRequest,
    SimulationResult, SkillGainRanges, Trajectory, TrajectoryEvent,
};
pub use service::PlanningService;
pub use simulator::MonteCarloSimulator;
