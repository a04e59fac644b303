use colored::Colorize;
use pathwise_core::ethics::{ConstraintEthicsGate, StateSnapshot};

use super::render;

pub fn snapshot(
    health: f64,
    weekly_hours: f64,
    financial_buffer: f64,
    available_hours: f64,
) -> StateSnapshot {
    StateSnapshot {
        health,
        weekly_hours,
        financial_buffer,
        available_hours,
        ..StateSnapshot::default()
    }
}

pub fn validate(action: &str, state: StateSnapshot) {
    let result = ConstraintEthicsGate::new().evaluate(action, &state);
    let mut lines = render::validation_lines(&result).into_iter();
    if let Some(headline) = lines.next() {
        if result.approved {
            println!("{}", headline.bright_green());
        } else {
            println!("{}", headline.bright_red());
        }
    }
    for line in lines {
        println!("{}", line.yellow());
    }
}

pub fn explain(decision: &str) {
    for line in render::explanation_lines(&ConstraintEthicsGate::new().explain(decision)) {
        println!("{}", line);
    }
}
