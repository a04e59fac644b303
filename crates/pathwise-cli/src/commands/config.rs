use anyhow::{Context, Result};
use pathwise_infrastructure::ConfigService;
use std::path::PathBuf;

pub fn path(explicit: Option<PathBuf>) -> Result<()> {
    let path = ConfigService::new(explicit)
        .config_path()
        .context("Failed to resolve config path")?;
    let marker = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("{}{}", path.display(), marker);
    Ok(())
}

pub fn show(explicit: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(explicit)?;
    let rendered = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
    print!("{}", rendered);
    Ok(())
}
