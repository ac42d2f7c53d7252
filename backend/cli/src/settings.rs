//! Effective configuration for a CLI run.
//!
//! Layering: defaults < YAML file < `.env` and process environment < flags.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use wabot_config::schema::{ServerConfig, WhatsAppConfig};
use wabot_config::{CONFIG_PATH_ENV, WabotConfig, load_and_prepare, resolve_config_path};

/// Flag values that win over every other source.
#[derive(Debug, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub dry_run: bool,
}

/// Load `.env`, then the config file, then apply flag overrides.
pub async fn load(explicit: Option<&Path>, overrides: Overrides) -> Result<WabotConfig> {
    // A missing .env is normal; real environment variables still apply.
    let dotenv_path = dotenvy::dotenv().ok();

    let env: HashMap<String, String> = std::env::vars().collect();
    let path = resolve_config_path(explicit, env.get(CONFIG_PATH_ENV).map(String::as_str));
    let config = load_and_prepare(&path, &env)
        .await
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    if let Some(p) = dotenv_path {
        // Logging is not up yet.
        eprintln!("Loaded environment from {}", p.display());
    }

    Ok(apply_overrides(config, overrides))
}

pub fn apply_overrides(mut config: WabotConfig, overrides: Overrides) -> WabotConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    if let Some(port) = overrides.port {
        server.port = Some(port);
    }
    if let Some(bind) = overrides.bind {
        server.bind = Some(bind);
    }
    if overrides.dry_run {
        config
            .whatsapp
            .get_or_insert_with(WhatsAppConfig::default)
            .dry_run = Some(true);
    }
    config
}

/// Base URL of a server started from this config on the local machine.
pub fn local_base_url(config: &WabotConfig) -> String {
    format!("http://localhost:{}", config.port())
}
