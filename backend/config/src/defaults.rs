//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{DispatchConfig, LoggingConfig, ServerConfig, WabotConfig, WhatsAppConfig};

pub const DEFAULT_BIND: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 3000;

pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com";

pub const DEFAULT_API_VERSION: &str = "v18.0";

pub const DEFAULT_WEBHOOK_PATH: &str = "/webhook";

/// Replies that may wait for the sender before new ones are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Per-request timeout for Graph API sends.
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: WabotConfig) -> WabotConfig {
    let config = apply_server_defaults(config);
    let config = apply_whatsapp_defaults(config);
    let config = apply_dispatch_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: WabotConfig) -> WabotConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    server.bind.get_or_insert_with(|| DEFAULT_BIND.to_string());
    server.port.get_or_insert(DEFAULT_PORT);
    config
}

/// Endpoint defaults only; credentials are never defaulted.
fn apply_whatsapp_defaults(mut config: WabotConfig) -> WabotConfig {
    let wa = config.whatsapp.get_or_insert_with(WhatsAppConfig::default);
    wa.api_base.get_or_insert_with(|| DEFAULT_API_BASE.to_string());
    wa.api_version
        .get_or_insert_with(|| DEFAULT_API_VERSION.to_string());
    wa.webhook_path
        .get_or_insert_with(|| DEFAULT_WEBHOOK_PATH.to_string());
    wa.dry_run.get_or_insert(false);
    config
}

fn apply_dispatch_defaults(mut config: WabotConfig) -> WabotConfig {
    let dispatch = config.dispatch.get_or_insert_with(DispatchConfig::default);
    dispatch.queue_capacity.get_or_insert(DEFAULT_QUEUE_CAPACITY);
    dispatch
        .send_timeout_secs
        .get_or_insert(DEFAULT_SEND_TIMEOUT_SECS);
    config
}

fn apply_logging_defaults(mut config: WabotConfig) -> WabotConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}
