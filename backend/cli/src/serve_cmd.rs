//! `wabot serve`: run the webhook server until SIGINT/SIGTERM.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};
use wabot_channels::{
    reply_queue, ChannelAdapter, DryRunSender, GraphApiConfig, GraphApiSender, WhatsAppAdapter,
    WhatsAppConfig,
};
use wabot_config::{validate, WabotConfig};
use wabot_core::ReplySender;
use wabot_gateway::{bind_listener, build_app, serve, shutdown_signal, GatewayState};

pub async fn run(config: WabotConfig) -> Result<()> {
    let report = validate(&config);
    for warning in &report.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    if !report.is_valid() {
        for e in &report.errors {
            error!(path = %e.path, "{}", e.message);
        }
        bail!(
            "configuration has {} error(s); see the log above",
            report.errors.len()
        );
    }
    log_environment(&config);

    let sender = build_sender(&config)?;
    let (dispatcher, worker) = reply_queue(sender, config.queue_capacity());
    let worker_handle = tokio::spawn(worker.run());

    let adapter = WhatsAppAdapter::new(
        WhatsAppConfig {
            verify_token: config.verify_token().unwrap_or_default().to_string(),
            webhook_path: config.webhook_path().to_string(),
        },
        dispatcher,
    );
    let adapters: Vec<Arc<dyn ChannelAdapter>> = vec![Arc::new(adapter)];
    let state = GatewayState::new(env!("CARGO_PKG_VERSION"), config.webhook_path());
    let app = build_app(state, &adapters);

    let addr = config.listen_addr();
    let listener = bind_listener(&addr).await?;
    info!(
        webhook = %format!("http://localhost:{}{}", config.port(), config.webhook_path()),
        health = %format!("http://localhost:{}/health", config.port()),
        "WhatsApp Business Chatbot server is running"
    );

    serve(listener, app, shutdown_signal()).await?;

    // The router held the last dispatcher; the worker now drains and exits.
    drop(adapters);
    worker_handle
        .await
        .context("reply dispatcher task failed")?;
    info!("Server closed");
    Ok(())
}

fn build_sender(config: &WabotConfig) -> Result<Arc<dyn ReplySender>> {
    if config.dry_run() {
        info!("Dry run: replies will be logged, not sent");
        return Ok(Arc::new(DryRunSender));
    }
    let graph = GraphApiConfig {
        api_base: config.api_base().to_string(),
        api_version: config.api_version().to_string(),
        access_token: config.access_token().unwrap_or_default().to_string(),
        timeout: config.send_timeout(),
    };
    let sender = GraphApiSender::new(graph).context("Failed to build Graph API client")?;
    Ok(Arc::new(sender))
}

/// One line per credential: set or missing, never the value.
fn log_environment(config: &WabotConfig) {
    let status = |v: Option<&str>| match v {
        Some(s) if !s.is_empty() => "set",
        _ => "missing",
    };
    info!(
        whatsapp_token = status(config.access_token()),
        phone_number_id = status(config.phone_number_id()),
        verify_token = status(config.verify_token()),
        api = %format!("{}/{}", config.api_base(), config.api_version()),
        dry_run = config.dry_run(),
        "Environment check"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use wabot_config::schema::{DispatchConfig, WhatsAppConfig as WhatsAppSection};

    #[tokio::test]
    async fn invalid_config_refuses_to_start() {
        let config = WabotConfig {
            dispatch: Some(DispatchConfig {
                queue_capacity: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = run(config).await.unwrap_err();
        assert!(err.to_string().contains("1 error"));
    }

    #[test]
    fn dry_run_selects_logging_sender() {
        let config = WabotConfig {
            whatsapp: Some(WhatsAppSection {
                dry_run: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(build_sender(&config).unwrap().name(), "dry_run");
    }

    #[test]
    fn live_mode_selects_graph_api() {
        let config = WabotConfig::default();
        assert_eq!(build_sender(&config).unwrap().name(), "graph_api");
    }
}
