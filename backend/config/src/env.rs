//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside YAML string values, resolved at load
//!   time. Only uppercase `[A-Z_][A-Z0-9_]*` names match; `$${VAR}` escapes
//!   to a literal `${VAR}`.
//! - Well-known variables (`WHATSAPP_TOKEN`, `PORT`, ...) that override the
//!   corresponding config fields outright.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{DispatchConfig, LoggingConfig, ServerConfig, WabotConfig, WhatsAppConfig};

/// `${VAR}` with an optional leading `$` marking an escape.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$?)\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Environment variables that override config fields, with the field each sets.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("WHATSAPP_TOKEN", "whatsapp.accessToken"),
    ("PHONE_NUMBER_ID", "whatsapp.phoneNumberId"),
    ("VERIFY_TOKEN", "whatsapp.verifyToken"),
    ("WHATSAPP_API_BASE", "whatsapp.apiBase"),
    ("WHATSAPP_API_VERSION", "whatsapp.apiVersion"),
    ("PORT", "server.port"),
    ("WABOT_BIND", "server.bind"),
    ("WABOT_LOG_DIR", "logging.dir"),
    ("WABOT_LOG_LEVEL", "logging.level"),
    ("WABOT_QUEUE_CAPACITY", "dispatch.queueCapacity"),
];

/// Substitute `${VAR}` references in a config JSON value tree.
///
/// Only string leaves are processed. Fails on the first referenced variable
/// that is unset or empty.
pub fn resolve_env_vars(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Collect all env var names referenced in a config value tree (for diagnostics).
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_vars_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_vars_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_VAR_PATTERN.captures_iter(s) {
                if caps[1].is_empty() {
                    out.push(caps[2].to_string());
                }
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_vars_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_vars_recursive(v, out)),
        _ => {}
    }
}

/// Apply the [`ENV_OVERRIDES`] variables on top of `config`.
///
/// Unset and empty variables leave the config untouched.
pub fn apply_env_overrides(
    mut config: WabotConfig,
    env: &HashMap<String, String>,
) -> Result<WabotConfig> {
    let get = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

    {
        let wa = config.whatsapp.get_or_insert_with(WhatsAppConfig::default);
        if let Some(v) = get("WHATSAPP_TOKEN") {
            wa.access_token = Some(v);
        }
        if let Some(v) = get("PHONE_NUMBER_ID") {
            wa.phone_number_id = Some(v);
        }
        if let Some(v) = get("VERIFY_TOKEN") {
            wa.verify_token = Some(v);
        }
        if let Some(v) = get("WHATSAPP_API_BASE") {
            wa.api_base = Some(v);
        }
        if let Some(v) = get("WHATSAPP_API_VERSION") {
            wa.api_version = Some(v);
        }
    }

    {
        let server = config.server.get_or_insert_with(ServerConfig::default);
        if let Some(v) = get("PORT") {
            server.port = Some(
                v.trim()
                    .parse()
                    .with_context(|| format!("PORT must be a port number, got \"{v}\""))?,
            );
        }
        if let Some(v) = get("WABOT_BIND") {
            server.bind = Some(v);
        }
    }

    {
        let logging = config.logging.get_or_insert_with(LoggingConfig::default);
        if let Some(v) = get("WABOT_LOG_DIR") {
            logging.dir = Some(v);
        }
        if let Some(v) = get("WABOT_LOG_LEVEL") {
            logging.level = Some(v);
        }
    }

    if let Some(v) = get("WABOT_QUEUE_CAPACITY") {
        let dispatch = config.dispatch.get_or_insert_with(DispatchConfig::default);
        dispatch.queue_capacity = Some(v.trim().parse().with_context(|| {
            format!("WABOT_QUEUE_CAPACITY must be a positive integer, got \"{v}\"")
        })?);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"whatsapp": {"accessToken": "${WHATSAPP_TOKEN}"}});
        let result = resolve_env_vars(&v, &env(&[("WHATSAPP_TOKEN", "EAAabc")])).unwrap();
        assert_eq!(result["whatsapp"]["accessToken"], "EAAabc");
    }

    #[test]
    fn error_on_missing_var() {
        let v = json!({"whatsapp": {"verifyToken": "${MISSING_VAR}"}});
        let err = resolve_env_vars(&v, &HashMap::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("MISSING_VAR"));
        assert!(msg.contains("whatsapp.verifyToken"));
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"k": "$${NOT_EXPANDED}"});
        let result = resolve_env_vars(&v, &HashMap::new()).unwrap();
        assert_eq!(result["k"], "${NOT_EXPANDED}");
    }

    #[test]
    fn substitutes_inside_larger_string() {
        let v = json!({"apiBase": "https://${HOST}/graph"});
        let result = resolve_env_vars(&v, &env(&[("HOST", "proxy.local")])).unwrap();
        assert_eq!(result["apiBase"], "https://proxy.local/graph");
    }

    #[test]
    fn collects_referenced_vars() {
        let v = json!({"a": "${FOO}", "b": {"c": "${BAR} $${SKIP}"}});
        let vars = collect_referenced_vars(&v);
        assert_eq!(vars, vec!["BAR".to_string(), "FOO".to_string()]);
    }

    #[test]
    fn overrides_credentials_and_port() {
        let cfg = apply_env_overrides(
            WabotConfig::default(),
            &env(&[
                ("WHATSAPP_TOKEN", "EAAtoken"),
                ("PHONE_NUMBER_ID", "631189900086971"),
                ("VERIFY_TOKEN", "abcd"),
                ("PORT", "8080"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.access_token(), Some("EAAtoken"));
        assert_eq!(cfg.verify_token(), Some("abcd"));
        assert_eq!(cfg.port(), 8080);
    }

    #[test]
    fn empty_override_is_ignored() {
        let mut cfg = WabotConfig::default();
        cfg.whatsapp = Some(WhatsAppConfig {
            verify_token: Some("from-file".into()),
            ..Default::default()
        });
        let cfg = apply_env_overrides(cfg, &env(&[("VERIFY_TOKEN", "")])).unwrap();
        assert_eq!(cfg.verify_token(), Some("from-file"));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = apply_env_overrides(WabotConfig::default(), &env(&[("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
