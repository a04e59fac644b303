pub mod chat;
pub mod config;
pub mod ethics;
pub mod planning;
pub mod render;

use anyhow::{Context, Result};
use pathwise_core::config::AppConfig;
use pathwise_infrastructure::ConfigService;
use std::path::PathBuf;

/// Loads configuration from `path`, the environment, or the user config dir.
pub fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    ConfigService::new(path)
        .load()
        .context("Failed to load configuration")
}
