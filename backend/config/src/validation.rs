//! Config validation: startup checks with user-friendly messages.
//!
//! Missing credentials are warnings; the server still starts and answers the
//! handshake with 403 until they are set.

use crate::schema::WabotConfig;
use thiserror::Error;

/// Prefix of the values shipped in the sample `.env`.
const PLACEHOLDER_PREFIX: &str = "your_";

/// A config validation finding with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation findings from one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &WabotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_credentials(config, &mut report);
    validate_server(config, &mut report);
    validate_graph_api(config, &mut report);
    validate_dispatch(config, &mut report);
    report
}

fn validate_credentials(config: &WabotConfig, report: &mut ValidationReport) {
    let checks = [
        (
            "whatsapp.accessToken",
            "WHATSAPP_TOKEN",
            config.access_token(),
            "replies cannot be sent",
        ),
        (
            "whatsapp.phoneNumberId",
            "PHONE_NUMBER_ID",
            config.phone_number_id(),
            "the button menu cannot be sent",
        ),
        (
            "whatsapp.verifyToken",
            "VERIFY_TOKEN",
            config.verify_token(),
            "webhook verification will be refused",
        ),
    ];

    for (path, var, value, consequence) in checks {
        match value {
            None | Some("") => report.warn(path, format!("{var} is not set; {consequence}")),
            Some(v) if v.starts_with(PLACEHOLDER_PREFIX) => report.warn(
                path,
                format!("{var} still has its placeholder value; {consequence}"),
            ),
            Some(_) => {}
        }
    }
}

fn validate_server(config: &WabotConfig, report: &mut ValidationReport) {
    if config.port() == 0 {
        report.error("server.port", "port must be between 1 and 65535");
    }
    if config.bind().trim().is_empty() {
        report.error("server.bind", "bind address cannot be empty");
    }
    let path = config.webhook_path();
    if !path.starts_with('/') || path.len() < 2 {
        report.error(
            "whatsapp.webhookPath",
            format!("webhook path '{path}' must start with '/' and name a route"),
        );
    }
}

fn validate_graph_api(config: &WabotConfig, report: &mut ValidationReport) {
    let base = config.api_base();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        report.error(
            "whatsapp.apiBase",
            format!("apiBase '{base}' must be an http(s) URL"),
        );
    } else if base.starts_with("http://") {
        report.warn(
            "whatsapp.apiBase",
            "apiBase uses plain http; the access token is sent unencrypted",
        );
    }
    if config.api_version().trim().is_empty() {
        report.error("whatsapp.apiVersion", "apiVersion cannot be empty");
    }
}

fn validate_dispatch(config: &WabotConfig, report: &mut ValidationReport) {
    if config.queue_capacity() == 0 {
        report.error("dispatch.queueCapacity", "queueCapacity must be >= 1");
    }
    if config.send_timeout().is_zero() {
        report.error("dispatch.sendTimeoutSecs", "sendTimeoutSecs must be >= 1");
    }
    if config.dry_run() {
        report.warn("whatsapp.dryRun", "dry run is on; replies are logged, not sent");
    }
}
