//! Monte-Carlo trajectory simulator.

use async_trait::async_trait;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::model::{
    DEFAULT_RECOMMENDATION, OutcomeStatistics, PlannedAction, SimulationRequest,
    SimulationResult, Trajectory, TrajectoryEvent,
};
use super::service::PlanningService;
use crate::config::SimulatorSettings;
use crate::error::{PathwiseError, Result};

/// Simulates weekly skill evolution over a planning horizon.
///
/// The number of runs is capped at `max_simulations`; callers learn the
/// effective count from [`SimulationResult::num_simulations`]. Statistics are
/// computed over every run, while only the first `max_returned_trajectories`
/// runs are returned in full.
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    settings: SimulatorSettings,
}

impl MonteCarloSimulator {
    pub fn new(settings: SimulatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SimulatorSettings {
        &self.settings
    }

    /// Runs a simulation batch.
    ///
    /// Each run draws from its own `StdRng`, seeded from a master RNG. The
    /// master is seeded from `request.seed` when present, which makes the
    /// whole batch reproducible.
    ///
    /// # Errors
    ///
    /// Returns `PathwiseError::InvalidInput` if the request fails validation or
    /// the horizon exceeds `max_horizon_days`.
    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationResult> {
        request.validate()?;
        if request.horizon_days > self.settings.max_horizon_days {
            return Err(PathwiseError::invalid_input(format!(
                "horizon_days must be at most {}, got {}",
                self.settings.max_horizon_days, request.horizon_days
            )));
        }

        let effective = request.num_simulations.min(self.settings.max_simulations);
        if effective < request.num_simulations {
            tracing::debug!(
                target: "pathwise::planning",
                requested = request.num_simulations,
                effective,
                "Simulation count capped"
            );
        }

        let chooser = WeightedIndex::new(request.action_distribution.weights())
            .map_err(|e| PathwiseError::invalid_input(format!("action weights: {}", e)))?;

        let mut master = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let runs: Vec<Trajectory> = (0..effective)
            .map(|simulation_id| {
                let mut rng = StdRng::seed_from_u64(master.next_u64());
                self.simulate_run(simulation_id, request, &chooser, &mut rng)
            })
            .collect();

        let finals: Vec<f64> = runs.iter().map(|t| t.final_skill).collect();
        let statistics = OutcomeStatistics::from_samples(&finals)
            .ok_or_else(|| PathwiseError::internal("simulation produced no runs"))?;

        tracing::info!(
            target: "pathwise::planning",
            user_id = %request.user_id,
            horizon_days = request.horizon_days,
            runs = effective,
            mean = statistics.mean,
            "Simulation batch complete"
        );

        let trajectories = runs
            .into_iter()
            .take(self.settings.max_returned_trajectories)
            .collect();

        Ok(SimulationResult {
            user_id: request.user_id.clone(),
            requested_simulations: request.num_simulations,
            num_simulations: effective,
            trajectories,
            statistics,
            recommendation: DEFAULT_RECOMMENDATION.to_string(),
        })
    }

    fn simulate_run(
        &self,
        simulation_id: u32,
        request: &SimulationRequest,
        chooser: &WeightedIndex<f64>,
        rng: &mut StdRng,
    ) -> Trajectory {
        let step = self.settings.step_days.max(1) as usize;
        let mut skill_level = self.settings.initial_skill.clamp(0.0, 1.0);
        let mut events = Vec::with_capacity(request.horizon_days as usize / step + 1);

        for day in (0..request.horizon_days).step_by(step) {
            let action = PlannedAction::ALL[chooser.sample(rng)];
            let range = request.skill_gain_ranges.for_action(action);
            let gain = rng.gen_range(range.min..=range.max);
            skill_level = (skill_level + gain).clamp(0.0, 1.0);

            events.push(TrajectoryEvent {
                day,
                action,
                skill_level,
            });
        }

        Trajectory {
            simulation_id,
            horizon_days: request.horizon_days,
            events,
            final_skill: skill_level,
            success_probability: skill_level,
        }
    }
}

impl Default for MonteCarloSimulator {
    fn default() -> Self {
        Self::new(SimulatorSettings::default())
    }
}

#[async_trait]
impl PlanningService for MonteCarloSimulator {
    async fn simulate(&self, request: SimulationRequest) -> Result<SimulationResult> {
        self.run(&request)
    }
}
