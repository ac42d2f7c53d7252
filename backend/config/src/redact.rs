//! Config redaction: safe-to-print config snapshots.
//!
//! Masks the Graph API access token, the webhook verify token and anything
//! that looks like a phone number.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SECRET_KEYS: &[&str] = &[
    "accessToken",
    "access_token",
    "verifyToken",
    "verify_token",
    "token",
    "secret",
];

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").unwrap());

/// Redact a config JSON value.
///
/// Secrets keep their first four characters when longer than eight, so two
/// configs can still be told apart; phone-like values keep their first four
/// digits.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if s.is_empty() {
        return Value::String(String::new());
    }
    if is_secret_key(key) {
        let hint = if s.chars().count() > 8 {
            format!("{}***", s.chars().take(4).collect::<String>())
        } else {
            "***".to_string()
        };
        return Value::String(hint);
    }
    if PHONE_PATTERN.is_match(s) {
        return Value::String(format!("{}***", s.chars().take(4).collect::<String>()));
    }
    Value::String(s.to_string())
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Dotted paths of every value [`redact`] would mask.
pub fn collect_redacted_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths_recursive(value, "", &mut paths);
    paths
}

fn collect_paths_recursive(value: &Value, path: &str, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => {
            let key = path.rsplit('.').next().unwrap_or("");
            if is_secret_key(key) || PHONE_PATTERN.is_match(s) {
                out.push(path.to_string());
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                collect_paths_recursive(v, &child_path, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_access_token() {
        let v = json!({ "whatsapp": { "accessToken": "EAAGm0PX4ZCpsBAKZCx9" } });
        let redacted = redact(&v);
        assert_eq!(redacted["whatsapp"]["accessToken"], "EAAG***");
    }

    #[test]
    fn short_verify_token_fully_masked() {
        let v = json!({ "whatsapp": { "verifyToken": "abcd" } });
        assert_eq!(redact(&v)["whatsapp"]["verifyToken"], "***");
    }

    #[test]
    fn masks_phone_number_id() {
        let v = json!({ "whatsapp": { "phoneNumberId": "631189900086971" } });
        assert_eq!(redact(&v)["whatsapp"]["phoneNumberId"], "6311***");
    }

    #[test]
    fn passthrough_non_sensitive() {
        let v = json!({ "logging": { "level": "debug" }, "server": { "port": 3000 } });
        let redacted = redact(&v);
        assert_eq!(redacted["logging"]["level"], "debug");
        assert_eq!(redacted["server"]["port"], 3000);
    }

    #[test]
    fn lists_redacted_paths() {
        let v = json!({
            "whatsapp": { "accessToken": "EAAtoken123", "apiVersion": "v18.0" }
        });
        assert_eq!(collect_redacted_paths(&v), vec!["whatsapp.accessToken"]);
    }
}
