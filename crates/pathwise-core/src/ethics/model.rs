//! Ethics gate models.

use serde::{Deserialize, Serialize};

/// Alternative offered whenever a proposed action is rejected.
pub const REST_AND_RECOVER: &str = "rest_and_recover";
/// Explanation attached to every validation.
pub const VALIDATION_EXPLANATION: &str =
    "Action validated against health, burnout, and resource constraints";

/// Snapshot of the user's situation used by the recommender and the gate.
///
/// Missing fields fall back to a healthy, unconstrained baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default = "default_health")]
    pub health: f64,
    #[serde(default = "default_weekly_hours")]
    pub weekly_hours: f64,
    #[serde(default = "default_financial_buffer")]
    pub financial_buffer: f64,
    #[serde(default = "default_available_hours")]
    pub available_hours: f64,
    #[serde(default = "default_energy")]
    pub energy: f64,
    #[serde(default = "default_skills_ready")]
    pub skills_ready: bool,
}

fn default_health() -> f64 {
    0.8
}

fn default_weekly_hours() -> f64 {
    40.0
}

fn default_financial_buffer() -> f64 {
    1000.0
}

fn default_available_hours() -> f64 {
    8.0
}

fn default_energy() -> f64 {
    0.6
}

fn default_skills_ready() -> bool {
    true
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            health: default_health(),
            weekly_hours: default_weekly_hours(),
            financial_buffer: default_financial_buffer(),
            available_hours: default_available_hours(),
            energy: default_energy(),
            skills_ready: default_skills_ready(),
        }
    }
}

/// Outcome of validating a proposed action.
///
/// `approved` is true exactly when `violations` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub action: String,
    pub approved: bool,
    pub violations: Vec<String>,
    pub warnings: Vec<String>,
    /// `1.0 - 0.3 * violations - 0.1 * warnings`, not clamped
    pub safety_score: f64,
    pub explanation: String,
    pub alternative_suggestion: Option<String>,
}

/// One weighted factor in a decision explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationFactor {
    pub factor: String,
    pub weight: f64,
    pub impact: String,
}

/// Human-facing breakdown of why a decision was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionExplanation {
    pub decision: String,
    pub explanation: String,
    pub factors: Vec<ExplanationFactor>,
    pub constraints_satisfied: Vec<String>,
    pub human_readable: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_defaults_from_partial_json() {
        let state: StateSnapshot = serde_json::from_str(r#"{"health": 0.2}"#).unwrap();
        assert_eq!(state.health, 0.2);
        assert_eq!(state.weekly_hours, 40.0);
        assert_eq!(state.financial_buffer, 1000.0);
        assert_eq!(state.available_hours, 8.0);
        assert!(state.skills_ready);
    }
}
