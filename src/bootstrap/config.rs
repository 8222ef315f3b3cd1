//! # Configuration Loader
//!
//! Pure data loading: read the TOML file and map it onto [`AppConfig`].
//! No validation and no business rules; missing keys keep their defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ps_core::app_dirs::AppDirs;
use ps_core::config::AppConfig;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
        .with_context(|| format!("Invalid config file: {}", config_path.display()))
}

pub fn default_config_path(dirs: &AppDirs) -> PathBuf {
    dirs.app_config_root.join(CONFIG_FILE_NAME)
}

/// An explicit path must exist; an absent default file means built-in defaults.
pub fn resolve_config(explicit: Option<&Path>, dirs: &AppDirs) -> anyhow::Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let default_path = default_config_path(dirs);
    if default_path.exists() {
        load_config(&default_path)
    } else {
        Ok(AppConfig::default())
    }
}
