//! wabot runtime configuration schema.
//!
//! Every field is optional so a partial YAML file deserializes; defaults are
//! filled in by [`crate::defaults::apply_all_defaults`] and the accessors
//! below fall back to the same constants.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::defaults::{
    DEFAULT_API_BASE, DEFAULT_API_VERSION, DEFAULT_BIND, DEFAULT_LOG_LEVEL, DEFAULT_PORT,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_SEND_TIMEOUT_SECS, DEFAULT_WEBHOOK_PATH,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WabotConfig {
    /// HTTP listener
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// WhatsApp Cloud API credentials and endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<WhatsAppConfig>,

    /// Outbound reply queue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch: Option<DispatchConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppConfig {
    /// Graph API access token (`WHATSAPP_TOKEN`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Business phone number id (`PHONE_NUMBER_ID`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_id: Option<String>,
    /// Webhook verification token (`VERIFY_TOKEN`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_path: Option<String>,
    /// Log replies instead of sending them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_capacity: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling NDJSON log files; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl WabotConfig {
    pub fn bind(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or(DEFAULT_BIND)
    }

    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind(), self.port())
    }

    fn whatsapp_field(&self, f: impl FnOnce(&WhatsAppConfig) -> Option<&String>) -> Option<&str> {
        self.whatsapp.as_ref().and_then(f).map(String::as_str)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.whatsapp_field(|w| w.access_token.as_ref())
    }

    pub fn phone_number_id(&self) -> Option<&str> {
        self.whatsapp_field(|w| w.phone_number_id.as_ref())
    }

    pub fn verify_token(&self) -> Option<&str> {
        self.whatsapp_field(|w| w.verify_token.as_ref())
    }

    pub fn api_base(&self) -> &str {
        self.whatsapp_field(|w| w.api_base.as_ref())
            .unwrap_or(DEFAULT_API_BASE)
    }

    pub fn api_version(&self) -> &str {
        self.whatsapp_field(|w| w.api_version.as_ref())
            .unwrap_or(DEFAULT_API_VERSION)
    }

    pub fn webhook_path(&self) -> &str {
        self.whatsapp_field(|w| w.webhook_path.as_ref())
            .unwrap_or(DEFAULT_WEBHOOK_PATH)
    }

    pub fn dry_run(&self) -> bool {
        self.whatsapp
            .as_ref()
            .and_then(|w| w.dry_run)
            .unwrap_or(false)
    }

    pub fn queue_capacity(&self) -> usize {
        self.dispatch
            .as_ref()
            .and_then(|d| d.queue_capacity)
            .unwrap_or(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn send_timeout(&self) -> Duration {
        let secs = self
            .dispatch
            .as_ref()
            .and_then(|d| d.send_timeout_secs)
            .unwrap_or(DEFAULT_SEND_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn log_json(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.json)
            .unwrap_or(false)
    }
}
