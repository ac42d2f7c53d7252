//! Config file discovery and loading.

use crate::schema::WabotConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "wabot.yaml";

/// Config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "WABOT_CONFIG";

/// Resolve the wabot config directory.
/// Priority: `WABOT_CONFIG_DIR` env > `~/.wabot/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("WABOT_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".wabot"),
        None => PathBuf::from(".wabot"),
    }
}

/// Resolve the full path to the config file inside `config_dir`.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Pick the config file to load.
///
/// Priority: explicit path > `WABOT_CONFIG` > `./wabot.yaml` > `<config_dir>/config.yaml`.
/// The returned path may not exist; [`load_config`] treats that as an empty config.
pub fn resolve_config_path(explicit: Option<&Path>, env_path: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = env_path.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return local;
    }
    config_file_path(&config_dir())
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist.
pub async fn load_config(path: &Path) -> Result<WabotConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(WabotConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // An empty file parses to YAML null.
    if raw.trim().is_empty() {
        return Ok(WabotConfig::default());
    }

    let config: WabotConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}
