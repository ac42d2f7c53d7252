//! CLI Config Command
//!
//! Prints the effective configuration with secrets masked, followed by the
//! validation findings.

use anyhow::{Context, Result};
use wabot_config::{collect_redacted_paths, redact, validate, WabotConfig};

use crate::terminal_output::{note_error, note_success, note_warn};

pub fn run(config: &WabotConfig) -> Result<()> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    let rendered = render_redacted(&value)?;
    println!("{rendered}");

    let masked = collect_redacted_paths(&value);
    if !masked.is_empty() {
        println!("# masked: {}", masked.join(", "));
    }

    let report = validate(config);
    for w in &report.warnings {
        note_warn(&format!("{}: {}", w.path, w.message));
    }
    for e in &report.errors {
        note_error(&format!("{}: {}", e.path, e.message));
    }
    if report.is_valid() {
        note_success("Configuration is valid");
    }
    Ok(())
}

fn render_redacted(value: &serde_json::Value) -> Result<String> {
    serde_json::to_string_pretty(&redact(value)).context("Failed to render config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wabot_config::schema::WhatsAppConfig;

    #[test]
    fn rendered_config_hides_token() {
        let config = WabotConfig {
            whatsapp: Some(WhatsAppConfig {
                access_token: Some("EAAGm0PX4ZCpsBAKZCx9".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        let rendered = render_redacted(&value).unwrap();
        assert!(!rendered.contains("EAAGm0PX4ZCpsBAKZCx9"));
        assert!(rendered.contains("EAAG***"));
    }
}
