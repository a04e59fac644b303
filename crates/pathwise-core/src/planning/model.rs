//! Planning domain models: requests, trajectories, and aggregate statistics.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{PathwiseError, Result};

/// Default planning horizon used by the dialog pipeline.
pub const DEFAULT_HORIZON_DAYS: u32 = 90;
/// Default number of simulations requested.
pub const DEFAULT_NUM_SIMULATIONS: u32 = 100;
/// Skill level every trajectory starts from.
pub const DEFAULT_INITIAL_SKILL: f64 = 0.5;
/// Fixed advice attached to every simulation result.
pub const DEFAULT_RECOMMENDATION: &str = "Focus on consistent study for best outcomes";

/// An action a simulated week can be spent on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlannedAction {
    Study,
    Project,
    Rest,
}

impl PlannedAction {
    /// Every action, in draw order.
    pub const ALL: [PlannedAction; 3] = [
        PlannedAction::Study,
        PlannedAction::Project,
        PlannedAction::Rest,
    ];
}

/// Inclusive range an action's skill increment is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainRange {
    pub min: f64,
    pub max: f64,
}

impl GainRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, action: PlannedAction) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 || self.min > self.max
        {
            return Err(PathwiseError::invalid_input(format!(
                "gain range for '{}' must satisfy 0 <= min <= max, got [{}, {}]",
                action, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Per-action skill increment ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillGainRanges {
    pub study: GainRange,
    pub project: GainRange,
    pub rest: GainRange,
}

impl SkillGainRanges {
    pub fn for_action(&self, action: PlannedAction) -> GainRange {
        match action {
            PlannedAction::Study => self.study,
            PlannedAction::Project => self.project,
            PlannedAction::Rest => self.rest,
        }
    }

    pub fn validate(&self) -> Result<()> {
        PlannedAction::ALL
            .iter()
            .try_for_each(|action| self.for_action(*action).validate(*action))
    }
}

impl Default for SkillGainRanges {
    fn default() -> Self {
        Self {
            study: GainRange::new(0.01, 0.05),
            project: GainRange::new(0.02, 0.08),
            rest: GainRange::new(0.0, 0.01),
        }
    }
}

/// Relative weights used when drawing an action each step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionDistribution {
    pub study: f64,
    pub project: f64,
    pub rest: f64,
}

impl ActionDistribution {
    /// Equal weight for every action.
    pub const fn uniform() -> Self {
        Self {
            study: 1.0,
            project: 1.0,
            rest: 1.0,
        }
    }

    /// Weights in [`PlannedAction::ALL`] order.
    pub fn weights(&self) -> [f64; 3] {
        [self.study, self.project, self.rest]
    }

    pub fn validate(&self) -> Result<()> {
        let weights = self.weights();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(PathwiseError::invalid_input(
                "action weights must be finite and non-negative",
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(PathwiseError::invalid_input(
                "at least one action weight must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for ActionDistribution {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Parameters of one simulation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub user_id: String,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default = "default_num_simulations")]
    pub num_simulations: u32,
    #[serde(default)]
    pub action_distribution: ActionDistribution,
    #[serde(default)]
    pub skill_gain_ranges: SkillGainRanges,
    /// Seed for the master RNG; omit for entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

fn default_num_simulations() -> u32 {
    DEFAULT_NUM_SIMULATIONS
}

impl SimulationRequest {
    /// A request with default distribution and gain ranges.
    pub fn new(user_id: impl Into<String>, horizon_days: u32, num_simulations: u32) -> Self {
        Self {
            user_id: user_id.into(),
            horizon_days,
            num_simulations,
            action_distribution: ActionDistribution::default(),
            skill_gain_ranges: SkillGainRanges::default(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_simulations == 0 {
            return Err(PathwiseError::invalid_input(
                "num_simulations must be at least 1",
            ));
        }
        self.action_distribution.validate()?;
        self.skill_gain_ranges.validate()
    }
}

/// One simulated week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryEvent {
    pub day: u32,
    pub action: PlannedAction,
    pub skill_level: f64,
}

/// One simulated path of skill evolution over the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub simulation_id: u32,
    pub horizon_days: u32,
    pub events: Vec<TrajectoryEvent>,
    pub final_skill: f64,
    /// Currently the same scalar as `final_skill`
    pub success_probability: f64,
}

/// Aggregates over `final_skill` of every simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeStatistics {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl OutcomeStatistics {
    /// Computes statistics over a non-empty sample.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        Some(Self {
            // Summation error can push the mean a hair outside [min, max].
            mean: mean.clamp(min, max),
            std: variance.sqrt(),
            median,
            min,
            max,
        })
    }
}

/// Output of one simulation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub user_id: String,
    /// What the caller asked for
    pub requested_simulations: u32,
    /// How many runs were actually simulated after the cap
    pub num_simulations: u32,
    /// Bounded prefix of the simulated runs
    pub trajectories: Vec<Trajectory>,
    /// Computed over every run, not just `trajectories`
    pub statistics: OutcomeStatistics,
    pub recommendation: String,
}
