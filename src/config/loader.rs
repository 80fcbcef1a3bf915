use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "nearby";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Load the configuration, falling back to defaults when no file exists.
///
/// An explicit `path` must exist; the default location may be absent.
pub fn load(path: Option<&Path>) -> color_eyre::Result<AppConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) if p.exists() => p,
            Some(p) => {
                debug!("Config file not found at {}, using defaults", p.display());
                return Ok(AppConfig::default());
            }
            None => {
                debug!("No config directory found, using defaults");
                return Ok(AppConfig::default());
            }
        },
    };

    let content = fs::read_to_string(&path)?;
    let config = parse(&content)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn parse(content: &str) -> color_eyre::Result<AppConfig> {
    Ok(toml::from_str(content)?)
}
