//! Constraint-based ethics gate.

use async_trait::async_trait;

use super::model::{
    DecisionExplanation, ExplanationFactor, REST_AND_RECOVER, StateSnapshot,
    VALIDATION_EXPLANATION, ValidationResult,
};
use crate::error::Result;

const VIOLATION_PENALTY: f64 = 0.3;
const WARNING_PENALTY: f64 = 0.1;

/// Validates proposed actions before they reach the user.
#[async_trait]
pub trait EthicsGate: Send + Sync {
    async fn validate(&self, proposed_action: &str, state: &StateSnapshot)
        -> Result<ValidationResult>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Violation,
    Warning,
}

struct ConstraintRule {
    severity: Severity,
    message: &'static str,
    condition: fn(&StateSnapshot) -> bool,
    /// The action must mention one of these; empty means any action
    keywords: &'static [&'static str],
}

fn health_too_low(state: &StateSnapshot) -> bool {
    state.health < 0.3
}

fn overworked(state: &StateSnapshot) -> bool {
    state.weekly_hours > 60.0
}

fn low_buffer(state: &StateSnapshot) -> bool {
    state.financial_buffer < 500.0
}

fn no_time(state: &StateSnapshot) -> bool {
    state.available_hours < 2.0
}

/// Output lists follow this declaration order.
const RULES: &[ConstraintRule] = &[
    ConstraintRule {
        severity: Severity::Violation,
        message: "health too low",
        condition: health_too_low,
        keywords: &["study", "work"],
    },
    ConstraintRule {
        severity: Severity::Warning,
        message: "burnout risk",
        condition: overworked,
        keywords: &["work", "study"],
    },
    ConstraintRule {
        severity: Severity::Warning,
        message: "low buffer",
        condition: low_buffer,
        keywords: &["explore"],
    },
    ConstraintRule {
        severity: Severity::Violation,
        message: "insufficient time",
        condition: no_time,
        keywords: &[],
    },
];

impl ConstraintRule {
    fn applies(&self, action: &str, state: &StateSnapshot) -> bool {
        (self.condition)(state)
            && (self.keywords.is_empty() || self.keywords.iter().any(|k| action.contains(k)))
    }
}

/// In-process gate evaluating health, burnout, financial and time constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintEthicsGate;

impl ConstraintEthicsGate {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates every rule independently against the action and state.
    ///
    /// Keyword mentions are matched case-insensitively.
    pub fn evaluate(&self, proposed_action: &str, state: &StateSnapshot) -> ValidationResult {
        let action = proposed_action.to_lowercase();
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        for rule in RULES.iter().filter(|rule| rule.applies(&action, state)) {
            match rule.severity {
                Severity::Violation => violations.push(rule.message.to_string()),
                Severity::Warning => warnings.push(rule.message.to_string()),
            }
        }

        let approved = violations.is_empty();
        let safety_score = 1.0
            - (violations.len() as f64 * VIOLATION_PENALTY
                + warnings.len() as f64 * WARNING_PENALTY);

        ValidationResult {
            action: proposed_action.to_string(),
            approved,
            violations,
            warnings,
            safety_score,
            explanation: VALIDATION_EXPLANATION.to_string(),
            alternative_suggestion: (!approved).then(|| REST_AND_RECOVER.to_string()),
        }
    }

    /// Explains a decision in terms of the weighted factors the gate protects.
    pub fn explain(&self, decision: &str) -> DecisionExplanation {
        let factor = |name: &str, weight: f64, impact: &str| ExplanationFactor {
            factor: name.to_string(),
            weight,
            impact: impact.to_string(),
        };

        DecisionExplanation {
            decision: decision.to_string(),
            explanation: format!(
                "The decision '{}' was made to optimize long-term well-being while respecting constraints",
                decision
            ),
            factors: vec![
                factor("Career progress", 0.4, "positive"),
                factor("Health preservation", 0.3, "positive"),
                factor("Financial stability", 0.2, "neutral"),
                factor("Time availability", 0.1, "positive"),
            ],
            constraints_satisfied: vec![
                "health >= 0.3".to_string(),
                "weekly_hours <= 60".to_string(),
            ],
            human_readable: "This decision balances career growth with personal well-being"
                .to_string(),
        }
    }
}

#[async_trait]
impl EthicsGate for ConstraintEthicsGate {
    async fn validate(
        &self,
        proposed_action: &str,
        state: &StateSnapshot,
    ) -> Result<ValidationResult> {
        let result = self.evaluate(proposed_action, state);
        if !result.approved {
            tracing::info!(
                target: "pathwise::ethics",
                action = proposed_action,
                violations = ?result.violations,
                "Proposed action rejected"
            );
        }
        Ok(result)
    }
}
