use anyhow::{Context, Result};
use colored::Colorize;
use pathwise_core::planning::{MonteCarloSimulator, SimulationRequest, counterfactual as lookup};
use std::path::PathBuf;

use super::render;

pub fn simulate(
    config: Option<PathBuf>,
    user: &str,
    horizon: u32,
    num: u32,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let config = super::load_config(config)?;
    let mut request = SimulationRequest::new(user, horizon, num);
    request.seed = seed;

    let result = MonteCarloSimulator::new(config.simulator)
        .run(&request)
        .context("Simulation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let mut lines = render::simulation_lines(&result).into_iter();
    if let Some(headline) = lines.next() {
        println!("{}", headline.bright_magenta().bold());
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

pub fn counterfactual(scenario: &str) {
    for line in render::counterfactual_lines(&lookup(scenario)) {
        println!("{}", line);
    }
}
