//! Delivery Event Logger
//!
//! Outcome of every outbound reply (sent, failed, dropped) as a structured
//! event under the `deliveries` target. This is where delivery failures end
//! up; they are never reported back to the webhook caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::redact::{mask_phone_number, redact_sensitive_data};

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeliveryEvent {
    Sent {
        recipient: String,
        message_id: Option<String>,
    },
    Failed {
        recipient: String,
        error_msg: String,
    },
    /// The reply never left the process (queue full or closed).
    Dropped {
        recipient: String,
        reason: String,
    },
}

#[derive(Debug, Serialize)]
pub struct DeliveryLogEntry {
    pub delivery_id: String,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
    pub event: DeliveryEvent,
}

pub struct DeliveryLogger;

impl DeliveryLogger {
    /// Redact and emit one delivery outcome.
    pub fn log_event(delivery_id: &str, sender: &str, event: DeliveryEvent) -> DeliveryLogEntry {
        let event = match event {
            DeliveryEvent::Sent {
                recipient,
                message_id,
            } => DeliveryEvent::Sent {
                recipient: mask_phone_number(&recipient),
                message_id,
            },
            DeliveryEvent::Failed {
                recipient,
                error_msg,
            } => DeliveryEvent::Failed {
                recipient: mask_phone_number(&recipient),
                error_msg: redact_sensitive_data(&error_msg),
            },
            DeliveryEvent::Dropped { recipient, reason } => DeliveryEvent::Dropped {
                recipient: mask_phone_number(&recipient),
                reason,
            },
        };

        let entry = DeliveryLogEntry {
            delivery_id: delivery_id.into(),
            sender: sender.into(),
            timestamp: Utc::now(),
            event,
        };

        let json = serde_json::to_string(&entry).unwrap_or_else(|_| format!("{entry:?}"));
        match &entry.event {
            DeliveryEvent::Sent { .. } => {
                info!(target: "deliveries", delivery = %json, "Reply delivered")
            }
            DeliveryEvent::Failed { .. } => {
                error!(target: "deliveries", delivery = %json, "Reply delivery failed")
            }
            DeliveryEvent::Dropped { .. } => {
                warn!(target: "deliveries", delivery = %json, "Reply dropped before sending")
            }
        }
        entry
    }
}
