//! CLI command implementations.

pub mod config;
pub mod inspect;
pub mod update;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use cfdi_core::CfdiConfig;

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cfdi")
        .join("config.json")
}

/// Load the configuration named by `-c`, else the user file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CfdiConfig> {
    if let Some(path) = config_path {
        return CfdiConfig::from_file(Path::new(path))
            .with_context(|| format!("Cannot read config file {}", path));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config file {}", path.display());
        CfdiConfig::from_file(&path)
            .with_context(|| format!("Cannot read config file {}", path.display()))
    } else {
        Ok(CfdiConfig::default())
    }
}
