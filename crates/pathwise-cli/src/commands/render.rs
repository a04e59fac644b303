//! Plain-text rendering of service results.
//!
//! Functions here return uncolored lines; callers decide on styling.

use pathwise_application::PlanReply;
use pathwise_core::ethics::{DecisionExplanation, ValidationResult};
use pathwise_core::planning::{CounterfactualReport, SimulationResult};

pub fn simulation_lines(result: &SimulationResult) -> Vec<String> {
    let stats = &result.statistics;
    let mut lines = vec![
        format!(
            "Simulated {} of {} requested runs for {}",
            result.num_simulations, result.requested_simulations, result.user_id
        ),
        format!(
            "Final skill: mean {:.3}, median {:.3}, std {:.3}, range [{:.3}, {:.3}]",
            stats.mean, stats.median, stats.std, stats.min, stats.max
        ),
    ];
    for trajectory in &result.trajectories {
        lines.push(format!(
            "  run #{}: {} steps, final skill {:.3}",
            trajectory.simulation_id,
            trajectory.events.len(),
            trajectory.final_skill
        ));
    }
    lines.push(result.recommendation.clone());
    lines
}

pub fn validation_lines(result: &ValidationResult) -> Vec<String> {
    let verdict = if result.approved { "approved" } else { "rejected" };
    let mut lines = vec![format!(
        "'{}' {} (safety score {:.2})",
        result.action, verdict, result.safety_score
    )];
    lines.extend(result.violations.iter().map(|v| format!("  violation: {}", v)));
    lines.extend(result.warnings.iter().map(|w| format!("  warning: {}", w)));
    if let Some(alternative) = &result.alternative_suggestion {
        lines.push(format!("Suggested instead: {}", alternative));
    }
    lines
}

pub fn explanation_lines(explanation: &DecisionExplanation) -> Vec<String> {
    let mut lines = vec![explanation.human_readable.clone()];
    for factor in &explanation.factors {
        lines.push(format!(
            "  {:<20} {:.2}  {}",
            factor.factor, factor.weight, factor.impact
        ));
    }
    lines
}

pub fn counterfactual_lines(report: &CounterfactualReport) -> Vec<String> {
    vec![
        format!("Scenario: {}", report.scenario),
        format!(
            "Skill gain {:.2}, time cost {}h, success rate {:.0}%",
            report.outcome.skill_gain,
            report.outcome.time_cost,
            report.outcome.success_rate * 100.0
        ),
        report.comparison.clone(),
    ]
}

pub fn plan_lines(reply: &PlanReply) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(action) = &reply.recommended_action {
        lines.push(format!("Recommended: {}", action.action()));
    }
    lines.push(reply.explanation.clone());
    if let Some(plan) = &reply.plan {
        lines.push(format!(
            "Expected skill after plan: {:.3} (from {} runs)",
            plan.statistics.mean, plan.num_simulations
        ));
    }
    if let Some(validation) = &reply.validation {
        lines.extend(validation.warnings.iter().map(|w| format!("  warning: {}", w)));
    }
    if reply.is_degraded() {
        lines.push(format!("Unavailable: {}", reply.unavailable.join(", ")));
    }
    lines
}
