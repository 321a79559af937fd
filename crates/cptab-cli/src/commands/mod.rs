//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod output;
pub mod process;

use std::path::Path;

use tracing::debug;

use cptab_core::models::config::CptabConfig;

/// Load configuration from `--config`, else the default file if it exists,
/// else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CptabConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(CptabConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(CptabConfig::from_file(&default_path)?)
    } else {
        Ok(CptabConfig::default())
    }
}
