use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ethics::StateSnapshot;
use crate::intent::DEFAULT_SMALL_TALK;
use crate::planning::model::{DEFAULT_HORIZON_DAYS, DEFAULT_INITIAL_SKILL, DEFAULT_NUM_SIMULATIONS};

/// Root of `config.toml`. Every section is optional.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub pipeline: PipelineSettings,
    pub simulator: SimulatorSettings,
    pub collaborators: CollaboratorSettings,
    pub dialog: DialogSettings,
    /// Reply template overrides keyed by reply kind (`ask_goal`, ...)
    pub replies: BTreeMap<String, String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `pathwise=debug,tower_http=info`
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Parameters of the full recommendation pipeline.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    pub horizon_days: u32,
    pub num_simulations: u32,
    pub simulation_timeout_ms: u64,
    pub recommender_timeout_ms: u64,
    pub memory_timeout_ms: u64,
    /// State the recommender and the ethics gate are evaluated against
    pub baseline_state: StateSnapshot,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            num_simulations: DEFAULT_NUM_SIMULATIONS,
            simulation_timeout_ms: 5_000,
            recommender_timeout_ms: 5_000,
            memory_timeout_ms: 2_000,
            baseline_state: StateSnapshot::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulatorSettings {
    pub max_simulations: u32,
    pub max_returned_trajectories: usize,
    pub step_days: u32,
    pub initial_skill: f64,
    pub max_horizon_days: u32,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            max_simulations: 10,
            max_returned_trajectories: 3,
            step_days: 7,
            initial_skill: DEFAULT_INITIAL_SKILL,
            max_horizon_days: 3_650,
        }
    }
}

/// Remote collaborator endpoints. `None` selects the in-process implementation.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CollaboratorSettings {
    pub memory_url: Option<String>,
    pub recommender_url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DialogSettings {
    pub small_talk: Vec<String>,
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            small_talk: DEFAULT_SMALL_TALK.iter().map(|s| s.to_string()).collect(),
        }
    }
}
