//! CLI subcommands.

pub mod config;
pub mod format;
pub mod scan;
pub mod schedule;
pub mod template;
pub mod text;

use std::path::Path;

use tracing::debug;

use drawscan_core::DrawscanConfig;

/// Load the configuration from `--config`, else the user config file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DrawscanConfig> {
    if let Some(path) = config_path {
        return Ok(DrawscanConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(DrawscanConfig::from_file(&default_path)?)
    } else {
        Ok(DrawscanConfig::default())
    }
}
