//! Message classification: reduce an inbound message to the one piece of
//! content that selects a reply.

use wabot_core::{InboundMessage, Selection};

/// The reply-relevant content of one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageContent<'a> {
    /// Plain text; the raw (not yet lowercased) body.
    Text(&'a str),
    /// Id of the tapped reply button.
    ButtonReply(&'a str),
    /// Id of the picked list row.
    ListReply(&'a str),
    /// An interactive reply of a kind with no lookup table.
    OtherInteractive(Option<&'a str>),
    /// Anything that is neither text nor interactive (image, audio, ...).
    Unsupported(Option<&'a str>),
}

impl<'a> MessageContent<'a> {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::ButtonReply(_) => "button_reply",
            Self::ListReply(_) => "list_reply",
            Self::OtherInteractive(_) => "interactive",
            Self::Unsupported(_) => "unsupported",
        }
    }
}

/// Classify a message by its `type` and, for interactive messages, by the
/// interactive subtype.
///
/// A text message without a body classifies as empty text; an interactive
/// message whose selection object is missing classifies as a selection with
/// an empty id.
pub fn classify(message: &InboundMessage) -> MessageContent<'_> {
    match message.message_type.as_deref() {
        Some("text") => MessageContent::Text(message.text_body().unwrap_or_default()),
        Some("interactive") => {
            let Some(interactive) = message.interactive.as_ref() else {
                return MessageContent::OtherInteractive(None);
            };
            match interactive.interactive_type.as_deref() {
                Some("button_reply") => {
                    MessageContent::ButtonReply(selection_id(interactive.button_reply.as_ref()))
                }
                Some("list_reply") => {
                    MessageContent::ListReply(selection_id(interactive.list_reply.as_ref()))
                }
                other => MessageContent::OtherInteractive(other),
            }
        }
        other => MessageContent::Unsupported(other),
    }
}

fn selection_id(selection: Option<&Selection>) -> &str {
    selection.and_then(|s| s.id.as_deref()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(value: serde_json::Value) -> InboundMessage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn classifies_text() {
        let msg = message(json!({"from": "1", "type": "text", "text": {"body": "Hi"}}));
        assert_eq!(classify(&msg), MessageContent::Text("Hi"));
    }

    #[test]
    fn text_without_body_is_empty_text() {
        let msg = message(json!({"from": "1", "type": "text"}));
        assert_eq!(classify(&msg), MessageContent::Text(""));
    }

    #[test]
    fn classifies_list_reply() {
        let msg = message(json!({
            "from": "1",
            "type": "interactive",
            "interactive": {"type": "list_reply", "list_reply": {"id": "service_1"}}
        }));
        assert_eq!(classify(&msg), MessageContent::ListReply("service_1"));
    }

    #[test]
    fn button_reply_without_selection_has_empty_id() {
        let msg = message(json!({
            "from": "1",
            "type": "interactive",
            "interactive": {"type": "button_reply"}
        }));
        assert_eq!(classify(&msg), MessageContent::ButtonReply(""));
    }

    #[test]
    fn unknown_interactive_subtype() {
        let msg = message(json!({
            "from": "1",
            "type": "interactive",
            "interactive": {"type": "nfm_reply"}
        }));
        assert_eq!(classify(&msg), MessageContent::OtherInteractive(Some("nfm_reply")));
    }

    #[test]
    fn media_is_unsupported() {
        let msg = message(json!({"from": "1", "type": "image"}));
        assert_eq!(classify(&msg), MessageContent::Unsupported(Some("image")));
        let msg = message(json!({"from": "1"}));
        assert_eq!(classify(&msg), MessageContent::Unsupported(None));
    }
}
