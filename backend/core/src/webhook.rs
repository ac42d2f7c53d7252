//! WhatsApp Cloud API webhook envelope.
//!
//! Only the first entry, the first change of that entry, and the first message
//! or status of that change are ever acted upon. Containers are kept as raw
//! JSON and items are decoded on demand by the `first_*` accessors, the single
//! place where that narrowing happens, so a malformed item later in a batch
//! never affects the event that is handled.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::InboundMessage;

/// The `field` value carried by message-bearing changes.
pub const MESSAGES_FIELD: &str = "messages";

/// Top-level webhook payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    /// Usually `"whatsapp_business_account"`; only its presence is checked.
    #[serde(default)]
    pub object: Option<Value>,
    #[serde(default)]
    pub entry: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<ChangeValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messaging_product: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub messages: Option<Vec<Value>>,
    #[serde(default)]
    pub statuses: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub display_phone_number: Option<String>,
    #[serde(default)]
    pub phone_number_id: Option<String>,
}

/// Delivery/read receipt for a message previously sent by the business.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Decode the first raw item of a container, if there is one.
fn decode_first<T: DeserializeOwned>(items: &[Value]) -> Result<Option<T>, serde_json::Error> {
    items.first().map(|item| T::deserialize(item)).transpose()
}

impl WebhookEnvelope {
    /// Whether a raw payload carries a usable top-level `object` marker.
    ///
    /// Missing, `null`, `false`, `0` and `""` all count as absent.
    pub fn has_object_marker(raw: &Value) -> bool {
        match raw.get("object") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(_) => true,
        }
    }

    pub fn entries(&self) -> &[Value] {
        self.entry.as_deref().unwrap_or_default()
    }

    /// `entry[0]`, decoded.
    pub fn first_entry(&self) -> Result<Option<Entry>, serde_json::Error> {
        decode_first(self.entries())
    }
}

impl Entry {
    pub fn changes(&self) -> &[Value] {
        self.changes.as_deref().unwrap_or_default()
    }

    /// `changes[0]`, decoded; the only change a webhook call is routed on.
    pub fn first_change(&self) -> Result<Option<Change>, serde_json::Error> {
        decode_first(self.changes())
    }
}

impl Change {
    pub fn is_messages(&self) -> bool {
        self.field.as_deref() == Some(MESSAGES_FIELD)
    }
}

impl ChangeValue {
    pub fn messages(&self) -> &[Value] {
        self.messages.as_deref().unwrap_or_default()
    }

    pub fn statuses(&self) -> &[Value] {
        self.statuses.as_deref().unwrap_or_default()
    }

    pub fn first_message(&self) -> Result<Option<InboundMessage>, serde_json::Error> {
        decode_first(self.messages())
    }

    pub fn first_status(&self) -> Result<Option<StatusUpdate>, serde_json::Error> {
        decode_first(self.statuses())
    }

    /// Business phone number the event was delivered to.
    pub fn phone_number_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()?
            .phone_number_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}
