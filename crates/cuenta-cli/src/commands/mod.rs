pub mod batch;
pub mod config;
pub mod output;
pub mod parse;

use std::path::{Path, PathBuf};

use tracing::debug;

use cuenta_core::models::config::CuentaConfig;

/// `<config dir>/cuenta/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cuenta")
        .join("config.json")
}

/// Load the configuration from an explicit path, the default location, or
/// fall back to built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CuentaConfig> {
    if let Some(path) = config_path {
        return Ok(CuentaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(CuentaConfig::from_file(&default_path)?)
    } else {
        Ok(CuentaConfig::default())
    }
}
