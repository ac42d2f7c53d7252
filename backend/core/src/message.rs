use serde::{Deserialize, Serialize};

/// A single user message as delivered inside a webhook change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender's WhatsApp id (phone number without `+`).
    pub from: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub text: Option<TextBody>,
    #[serde(default)]
    pub interactive: Option<Interactive>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: Option<String>,
}

/// Reply to an interactive (button or list) message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Interactive {
    #[serde(rename = "type", default)]
    pub interactive_type: Option<String>,
    #[serde(default)]
    pub button_reply: Option<Selection>,
    #[serde(default)]
    pub list_reply: Option<Selection>,
}

/// The option a user picked from a button set or list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl InboundMessage {
    pub fn text_body(&self) -> Option<&str> {
        self.text.as_ref()?.body.as_deref()
    }
}

/// A text reply bound for one recipient through one business number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundReply {
    pub to: String,
    pub body: String,
    pub phone_number_id: String,
}

impl OutboundReply {
    pub fn new(
        to: impl Into<String>,
        body: impl Into<String>,
        phone_number_id: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
            phone_number_id: phone_number_id.into(),
        }
    }
}

/// What the platform returned for an accepted message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendReceipt {
    /// Platform message id (`wamid...`), when the platform reported one.
    pub message_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_button_reply() {
        let msg: InboundMessage = serde_json::from_value(serde_json::json!({
            "from": "15551234567",
            "id": "wamid.btn",
            "type": "interactive",
            "interactive": {
                "type": "button_reply",
                "button_reply": { "id": "btn_hours", "title": "Business Hours" }
            }
        }))
        .unwrap();
        let interactive = msg.interactive.unwrap();
        assert_eq!(interactive.interactive_type.as_deref(), Some("button_reply"));
        assert_eq!(interactive.button_reply.unwrap().id.as_deref(), Some("btn_hours"));
    }

    #[test]
    fn message_without_sender_is_rejected() {
        let result = serde_json::from_value::<InboundMessage>(serde_json::json!({
            "type": "text",
            "text": { "body": "hi" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn text_body_accessor() {
        let msg: InboundMessage = serde_json::from_value(serde_json::json!({
            "from": "1", "type": "text", "text": {}
        }))
        .unwrap();
        assert_eq!(msg.text_body(), None);
    }
}
