//! WhatsApp webhook adapter.
//!
//! `GET {webhook_path}` answers the subscription handshake, `POST
//! {webhook_path}` acknowledges events and queues a canned reply for the
//! first inbound message of the call.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    routing::get,
};
use logging::{mask_phone_number, redact_sensitive_data};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use wabot_core::{ChangeValue, OutboundReply, WebhookEnvelope};
use wabot_routing::{ReplyEngine, classify};

use crate::ChannelAdapter;
use crate::dispatch::ReplyDispatcher;
use crate::error::WebhookError;

/// Body of every acknowledged POST.
pub const EVENT_RECEIVED: &str = "EVENT_RECEIVED";

pub const DEFAULT_WEBHOOK_PATH: &str = "/webhook";

const SUBSCRIBE_MODE: &str = "subscribe";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct WhatsAppConfig {
    pub verify_token: String,
    pub webhook_path: String,
}

impl WhatsAppConfig {
    pub fn new(verify_token: impl Into<String>) -> Self {
        Self {
            verify_token: verify_token.into(),
            webhook_path: DEFAULT_WEBHOOK_PATH.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Axum state
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct AppState {
    verify_token: Arc<str>,
    engine: ReplyEngine,
    dispatcher: ReplyDispatcher,
}

/// Query parameters of the verification handshake.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// What a POST led to once it was acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// A reply was queued for delivery.
    ReplyQueued { delivery_id: Uuid },
    /// A reply was computed but the queue refused it.
    ReplyDropped,
    /// A delivery/read status was observed; nothing to answer.
    StatusObserved,
    /// No first change, not a `messages` change, or nothing in it.
    Ignored,
}

// ---------------------------------------------------------------------------
// Adapter struct
// ---------------------------------------------------------------------------

pub struct WhatsAppAdapter {
    config: WhatsAppConfig,
    engine: ReplyEngine,
    dispatcher: ReplyDispatcher,
}

impl WhatsAppAdapter {
    pub fn new(config: WhatsAppConfig, dispatcher: ReplyDispatcher) -> Self {
        Self {
            config,
            engine: ReplyEngine::new(),
            dispatcher,
        }
    }
}

impl ChannelAdapter for WhatsAppAdapter {
    fn name(&self) -> &str {
        "whatsapp"
    }

    fn build_router(&self) -> Router {
        let state = AppState {
            verify_token: Arc::from(self.config.verify_token.as_str()),
            engine: self.engine,
            dispatcher: self.dispatcher.clone(),
        };
        Router::new()
            .route(
                &self.config.webhook_path,
                get(verify_webhook).post(receive_webhook),
            )
            .with_state(state)
    }
}

// ---------------------------------------------------------------------------
// Verification handshake
// ---------------------------------------------------------------------------

/// Check a handshake and return the challenge to echo.
///
/// Both `hub.mode` and `hub.verify_token` must be present and non-empty; a
/// missing challenge echoes an empty body. An unconfigured (empty) expected
/// token matches nothing.
pub fn verify_subscription(
    params: &VerifyParams,
    expected_token: &str,
) -> Result<String, WebhookError> {
    fn present(v: &Option<String>) -> Option<&str> {
        v.as_deref().filter(|s| !s.is_empty())
    }

    let (Some(mode), Some(token)) = (present(&params.mode), present(&params.verify_token)) else {
        return Err(WebhookError::MalformedRequest(
            "missing hub.mode or hub.verify_token".into(),
        ));
    };

    if mode == SUBSCRIBE_MODE && !expected_token.is_empty() && token == expected_token {
        Ok(params.challenge.clone().unwrap_or_default())
    } else {
        Err(WebhookError::AuthMismatch)
    }
}

async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<String, WebhookError> {
    info!(mode = ?params.mode, "[WhatsApp] Webhook verification request");
    match verify_subscription(&params, &state.verify_token) {
        Ok(challenge) => {
            info!("[WhatsApp] Webhook verified successfully");
            Ok(challenge)
        }
        Err(e @ WebhookError::AuthMismatch) => {
            warn!(mode = ?params.mode, "[WhatsApp] Webhook verification failed: token or mode mismatch");
            Err(e)
        }
        Err(e) => {
            warn!(error = %e, "[WhatsApp] Bad verification request");
            Err(e)
        }
    }
}

// ---------------------------------------------------------------------------
// Event handling
// ---------------------------------------------------------------------------

async fn receive_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, WebhookError> {
    let raw: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "[WhatsApp] Webhook body is not JSON");
        WebhookError::MalformedRequest(format!("invalid JSON body: {e}"))
    })?;
    debug!(
        body = %redact_sensitive_data(&raw.to_string()),
        "[WhatsApp] Incoming webhook POST"
    );

    if !WebhookEnvelope::has_object_marker(&raw) {
        info!("[WhatsApp] Not a WhatsApp webhook event");
        return Err(WebhookError::UnrecognizedEnvelope);
    }

    let outcome = serde_json::from_value::<WebhookEnvelope>(raw)
        .map_err(|e| WebhookError::ProcessingFault(e.to_string()))
        .and_then(|envelope| state.route_event(&envelope))
        .map_err(|e| {
            error!(error = %e, "[WhatsApp] Error processing webhook");
            e
        })?;

    debug!(outcome = ?outcome, "[WhatsApp] Webhook event handled");
    Ok(EVENT_RECEIVED)
}

impl AppState {
    /// Route `entry[0].changes[0]`; every other entry and change is skipped
    /// without being decoded.
    fn route_event(&self, envelope: &WebhookEnvelope) -> Result<EventOutcome, WebhookError> {
        let Some(entry) = envelope.first_entry()? else {
            return Ok(EventOutcome::Ignored);
        };
        let Some(change) = entry.first_change()? else {
            return Ok(EventOutcome::Ignored);
        };
        log_skipped_batch(envelope.entries().len(), entry.changes().len(), change.value.as_ref());

        if !change.is_messages() {
            debug!(field = ?change.field, "[WhatsApp] Ignoring non-message change");
            return Ok(EventOutcome::Ignored);
        }
        let value = change.value.as_ref().ok_or_else(|| {
            WebhookError::ProcessingFault("messages change without a value".into())
        })?;

        if let Some(message) = value.first_message()? {
            let phone_number_id = value.phone_number_id().ok_or_else(|| {
                WebhookError::ProcessingFault("message event without metadata.phone_number_id".into())
            })?;

            let content = classify(&message);
            info!(
                from = %mask_phone_number(&message.from),
                kind = content.kind(),
                message_id = ?message.id,
                "[WhatsApp] Message received"
            );

            let body = self.engine.reply_for_content(content);
            let reply = OutboundReply::new(message.from.as_str(), body, phone_number_id);
            return Ok(match self.dispatcher.dispatch(reply) {
                Ok(delivery_id) => EventOutcome::ReplyQueued { delivery_id },
                Err(_) => EventOutcome::ReplyDropped,
            });
        }

        if let Some(status) = value.first_status()? {
            info!(
                status_id = ?status.id,
                status = ?status.status,
                recipient = %status.recipient_id.as_deref().map(mask_phone_number).unwrap_or_default(),
                "[WhatsApp] Message status update"
            );
            return Ok(EventOutcome::StatusObserved);
        }

        Ok(EventOutcome::Ignored)
    }
}

/// Batched deliveries are processed one event per call; make the skipped
/// remainder visible.
fn log_skipped_batch(entries: usize, changes: usize, value: Option<&ChangeValue>) {
    let extra_entries = entries.saturating_sub(1);
    let extra_changes = changes.saturating_sub(1);
    let extra_events = value
        .map(|v| v.messages().len().saturating_sub(1) + v.statuses().len().saturating_sub(1))
        .unwrap_or(0);

    if extra_entries + extra_changes + extra_events > 0 {
        debug!(
            extra_entries,
            extra_changes, extra_events, "[WhatsApp] Only the first event of the batch is processed"
        );
    }
}
