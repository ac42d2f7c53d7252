//! WhatsApp Cloud API (Graph API) outbound messages.
//!
//! `POST {api_base}/{api_version}/{phone_number_id}/messages` with a bearer
//! access token. One attempt per call; the request timeout is the only
//! timeout on the delivery path.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use wabot_core::{DeliveryError, OutboundReply, ReplySender, SendReceipt};

use logging::{mask_phone_number, redact_sensitive_data};

pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com";
pub const DEFAULT_API_VERSION: &str = "v18.0";
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct GraphApiConfig {
    pub api_base: String,
    pub api_version: String,
    pub access_token: String,
    pub timeout: Duration,
}

impl GraphApiConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: access_token.into(),
            timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for GraphApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphApiConfig")
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("access_token", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct TextMessageRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'static str,
    text: TextContent<'a>,
}

#[derive(Serialize)]
struct TextContent<'a> {
    body: &'a str,
}

#[derive(Deserialize, Debug, Default)]
struct SendResponse {
    #[serde(default)]
    messages: Vec<SentMessage>,
}

#[derive(Deserialize, Debug)]
struct SentMessage {
    id: String,
}

/// Button ids offered by the quick-reply menu; each has a canned reply.
pub const MENU_BUTTONS: [(&str, &str); 3] = [
    ("btn_services", "Our Services"),
    ("btn_contact", "Contact Info"),
    ("btn_hours", "Business Hours"),
];

fn button_menu_payload(to: &str) -> serde_json::Value {
    let buttons: Vec<_> = MENU_BUTTONS
        .iter()
        .map(|(id, title)| json!({ "type": "reply", "reply": { "id": id, "title": title } }))
        .collect();
    json!({
        "messaging_product": "whatsapp",
        "to": to,
        "type": "interactive",
        "interactive": {
            "type": "button",
            "header": { "type": "text", "text": "How can we help you?" },
            "body": { "text": "Please select one of the options below:" },
            "action": { "buttons": buttons }
        }
    })
}

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

pub struct GraphApiSender {
    config: GraphApiConfig,
    http_client: Client,
}

impl GraphApiSender {
    pub fn new(config: GraphApiConfig) -> Result<Self, DeliveryError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DeliveryError::Config(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn messages_url(&self, phone_number_id: &str) -> String {
        format!(
            "{}/{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.api_version,
            phone_number_id
        )
    }

    /// Send the three-button quick-reply menu.
    pub async fn send_button_menu(
        &self,
        to: &str,
        phone_number_id: &str,
    ) -> Result<SendReceipt, DeliveryError> {
        let receipt = self
            .post_message(phone_number_id, &button_menu_payload(to))
            .await?;
        info!(to = %mask_phone_number(to), "[WhatsApp] Interactive menu sent");
        Ok(receipt)
    }

    async fn post_message<T: Serialize + ?Sized>(
        &self,
        phone_number_id: &str,
        payload: &T,
    ) -> Result<SendReceipt, DeliveryError> {
        let res = self
            .http_client
            .post(self.messages_url(phone_number_id))
            .bearer_auth(&self.config.access_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(
                status = status.as_u16(),
                body = %redact_sensitive_data(&body),
                "[WhatsApp] Graph API rejected message"
            );
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // A 2xx with an unexpected body still means the platform accepted it.
        let parsed: SendResponse = res.json().await.unwrap_or_default();
        Ok(SendReceipt {
            message_id: parsed.messages.into_iter().next().map(|m| m.id),
        })
    }
}

#[async_trait]
impl ReplySender for GraphApiSender {
    fn name(&self) -> &str {
        "graph_api"
    }

    async fn send(&self, reply: &OutboundReply) -> Result<SendReceipt, DeliveryError> {
        let request = TextMessageRequest {
            messaging_product: "whatsapp",
            to: &reply.to,
            message_type: "text",
            text: TextContent { body: &reply.body },
        };
        self.post_message(&reply.phone_number_id, &request).await
    }
}

/// Logs replies instead of sending them.
pub struct DryRunSender;

#[async_trait]
impl ReplySender for DryRunSender {
    fn name(&self) -> &str {
        "dry_run"
    }

    async fn send(&self, reply: &OutboundReply) -> Result<SendReceipt, DeliveryError> {
        info!(
            to = %mask_phone_number(&reply.to),
            phone_number_id = %reply.phone_number_id,
            body = %reply.body,
            "[WhatsApp] Dry run: reply not sent"
        );
        Ok(SendReceipt::default())
    }
}
