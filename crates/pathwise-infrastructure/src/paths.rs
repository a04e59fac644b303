//! Path resolution for pathwise configuration files.
//!
//! ```text
//! ~/.config/pathwise/         # Config directory (platform config dir)
//! └── config.toml             # Application configuration
//! ```

use pathwise_core::error::{PathwiseError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "pathwise";
const CONFIG_FILE: &str = "config.toml";

pub struct PathwisePaths;

impl PathwisePaths {
    /// Returns the pathwise configuration directory (e.g. `~/.config/pathwise/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| PathwiseError::config("Cannot find config directory"))
    }

    /// Returns the default `config.toml` location.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
