use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "pathwise")]
#[command(about = "Pathwise CLI - conversational career planning", long_about = None)]
struct Cli {
    /// Path to config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive planning dialog
    Chat {
        /// User id the dialog is keyed by
        #[arg(short, long, default_value = "cli-user")]
        user: String,

        /// Print pipeline events as they happen
        #[arg(long)]
        events: bool,
    },
    /// Run a Monte Carlo skill simulation
    Simulate {
        #[arg(short, long, default_value = "cli-user")]
        user: String,

        #[arg(long, default_value_t = 90)]
        horizon: u32,

        #[arg(short, long, default_value_t = 100)]
        num: u32,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },
    /// Check a proposed action against the ethics gate
    Validate {
        action: String,

        #[arg(long, default_value_t = 0.8)]
        health: f64,

        #[arg(long, default_value_t = 40.0)]
        weekly_hours: f64,

        #[arg(long, default_value_t = 1000.0)]
        financial_buffer: f64,

        #[arg(long, default_value_t = 8.0)]
        available_hours: f64,
    },
    /// Explain the factors behind a decision
    Explain { decision: String },
    /// Show the canned outcome of a what-if scenario
    Counterfactual {
        /// study_more, do_projects or balanced
        #[arg(default_value = "balanced")]
        scenario: String,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config;

    match cli.command {
        Commands::Chat { user, events } => commands::chat::run(config, &user, events).await?,
        Commands::Simulate {
            user,
            horizon,
            num,
            seed,
            json,
        } => commands::planning::simulate(config, &user, horizon, num, seed, json)?,
        Commands::Validate {
            action,
            health,
            weekly_hours,
            financial_buffer,
            available_hours,
        } => commands::ethics::validate(
            &action,
            commands::ethics::snapshot(health, weekly_hours, financial_buffer, available_hours),
        ),
        Commands::Explain { decision } => commands::ethics::explain(&decision),
        Commands::Counterfactual { scenario } => commands::planning::counterfactual(&scenario),
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config::path(config)?,
            ConfigAction::Show => commands::config::show(config)?,
        },
    }

    Ok(())
}
