//! `wabot-config`: runtime configuration for the webhook bot.
//!
//! Provides:
//! - Typed config schema
//! - YAML file discovery and loading
//! - `${ENV_VAR}` substitution and well-known env overrides
//! - Config redaction for safe display
//! - Default value application
//! - Startup validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, collect_referenced_vars, resolve_env_vars, MissingEnvVarError,
    ENV_OVERRIDES,
};
pub use io::{config_dir, config_file_path, load_config, resolve_config_path, CONFIG_PATH_ENV};
pub use redact::{collect_redacted_paths, redact};
pub use schema::WabotConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Load a config file, substitute `${VAR}` references, apply env overrides
/// and defaults.
///
/// Validation is left to the caller so it can be reported once logging is up.
pub async fn load_and_prepare(path: &Path, env: &HashMap<String, String>) -> Result<WabotConfig> {
    let raw_config = load_config(path).await?;

    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;
    let referenced = collect_referenced_vars(&value);
    if !referenced.is_empty() {
        debug!(vars = ?referenced, "Resolving env references in config");
    }
    let value = resolve_env_vars(&value, env).context("Failed to resolve env vars in config")?;
    let config: WabotConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config, env)?;
    Ok(apply_all_defaults(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_then_env_then_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wabot.yaml");
        std::fs::write(
            &path,
            "whatsapp:\n  accessToken: ${TOKEN_FROM_VAULT}\n  verifyToken: from-file\nserver:\n  port: 4000\n",
        )
        .unwrap();

        let env: HashMap<String, String> = [
            ("TOKEN_FROM_VAULT", "EAAvault"),
            ("VERIFY_TOKEN", "from-env"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let cfg = load_and_prepare(&path, &env).await.unwrap();
        assert_eq!(cfg.access_token(), Some("EAAvault"));
        assert_eq!(cfg.verify_token(), Some("from-env"));
        assert_eq!(cfg.port(), 4000);
        assert_eq!(cfg.queue_capacity(), defaults::DEFAULT_QUEUE_CAPACITY);
    }

    #[tokio::test]
    async fn missing_file_uses_env_only() {
        let dir = tempfile::tempdir().unwrap();
        let env: HashMap<String, String> = [("PORT".to_string(), "5050".to_string())].into();
        let cfg = load_and_prepare(&dir.path().join("absent.yaml"), &env)
            .await
            .unwrap();
        assert_eq!(cfg.port(), 5050);
        assert_eq!(cfg.webhook_path(), "/webhook");
    }
}
