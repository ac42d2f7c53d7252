//! Reply engine: map a classified message to its canned reply.

use tracing::debug;
use wabot_core::InboundMessage;

use crate::classify::{MessageContent, classify};
use crate::tables::{
    BUTTON_REPLIES, KEYWORD_REPLIES, LIST_REPLIES, ReplyTable, SELECTION_ACK_REPLY,
    TEXT_ONLY_REPLY, UNRECOGNIZED_TEXT_REPLY,
};

/// Read-only reply lookup over the three canned tables.
///
/// Every input produces a non-empty reply; each lookup has a fixed fallback.
#[derive(Debug, Clone, Copy)]
pub struct ReplyEngine {
    keywords: &'static ReplyTable,
    buttons: &'static ReplyTable,
    lists: &'static ReplyTable,
}

impl Default for ReplyEngine {
    fn default() -> Self {
        Self {
            keywords: &KEYWORD_REPLIES,
            buttons: &BUTTON_REPLIES,
            lists: &LIST_REPLIES,
        }
    }
}

impl ReplyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `message` and produce its reply.
    pub fn reply_for(&self, message: &InboundMessage) -> &'static str {
        self.reply_for_content(classify(message))
    }

    pub fn reply_for_content(&self, content: MessageContent<'_>) -> &'static str {
        match content {
            MessageContent::Text(body) => self.text_reply(body),
            MessageContent::ButtonReply(id) => self.button_reply(id),
            MessageContent::ListReply(id) => self.list_reply(id),
            MessageContent::OtherInteractive(subtype) => {
                debug!(subtype = ?subtype, "No reply table for interactive subtype");
                SELECTION_ACK_REPLY
            }
            MessageContent::Unsupported(message_type) => {
                debug!(message_type = ?message_type, "Unsupported message type");
                TEXT_ONLY_REPLY
            }
        }
    }

    /// First keyword, in table order, found anywhere in the lowercased text.
    pub fn text_reply(&self, text: &str) -> &'static str {
        let lowered = text.to_lowercase();
        match self.keywords.first_contained(&lowered) {
            Some((keyword, reply)) => {
                debug!(keyword, "Keyword matched");
                reply
            }
            None => UNRECOGNIZED_TEXT_REPLY,
        }
    }

    pub fn button_reply(&self, button_id: &str) -> &'static str {
        self.buttons.exact(button_id).unwrap_or(SELECTION_ACK_REPLY)
    }

    pub fn list_reply(&self, list_id: &str) -> &'static str {
        self.lists.exact(list_id).unwrap_or(SELECTION_ACK_REPLY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(value: serde_json::Value) -> InboundMessage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn hi_gets_greeting() {
        let engine = ReplyEngine::new();
        assert_eq!(engine.text_reply("hi"), "Hi there! 👋 How can I assist you?");
    }

    #[test]
    fn unrecognized_text_gets_fallback() {
        let engine = ReplyEngine::new();
        assert_eq!(engine.text_reply("zzz-unrecognized-zzz"), UNRECOGNIZED_TEXT_REPLY);
        assert_eq!(engine.text_reply(""), UNRECOGNIZED_TEXT_REPLY);
    }

    #[test]
    fn matching_is_case_insensitive_first_wins() {
        let engine = ReplyEngine::new();
        let reply = engine.text_reply("Hello there, I need HELP");
        assert_eq!(reply, KEYWORD_REPLIES.exact("hello").unwrap());
        assert_ne!(reply, KEYWORD_REPLIES.exact("help").unwrap());

        assert_eq!(
            engine.text_reply("PRICING please"),
            KEYWORD_REPLIES.exact("pricing").unwrap()
        );
    }

    #[test]
    fn substring_containment_not_whole_word() {
        let engine = ReplyEngine::new();
        // "this" contains "hi", which is declared before "thanks" and "help".
        assert_eq!(
            engine.text_reply("Thanks, this helps"),
            KEYWORD_REPLIES.exact("hi").unwrap()
        );
    }

    #[test]
    fn button_lookup() {
        let engine = ReplyEngine::new();
        assert!(engine.button_reply("btn_hours").starts_with("Our business hours are:"));
        assert_eq!(engine.button_reply("btn_unknown"), SELECTION_ACK_REPLY);
    }

    #[test]
    fn list_lookup() {
        let engine = ReplyEngine::new();
        assert!(engine.list_reply("service_3").starts_with("You selected Service 3."));
        assert_eq!(engine.list_reply("service_9"), SELECTION_ACK_REPLY);
    }

    #[test]
    fn every_message_shape_gets_a_reply() {
        let engine = ReplyEngine::new();
        let shapes = [
            json!({"from": "1", "type": "text", "text": {"body": "bye now"}}),
            json!({"from": "1", "type": "text"}),
            json!({"from": "1", "type": "interactive"}),
            json!({"from": "1", "type": "interactive", "interactive": {"type": "button_reply", "button_reply": {"id": "btn_contact"}}}),
            json!({"from": "1", "type": "interactive", "interactive": {"type": "list_reply"}}),
            json!({"from": "1", "type": "interactive", "interactive": {"type": "nfm_reply"}}),
            json!({"from": "1", "type": "sticker"}),
            json!({"from": "1"}),
        ];
        for shape in shapes {
            let reply = engine.reply_for(&message(shape.clone()));
            assert!(!reply.is_empty(), "empty reply for {shape}");
        }
    }

    #[test]
    fn non_text_types_get_text_only_notice() {
        let engine = ReplyEngine::new();
        let msg = message(json!({"from": "1", "type": "audio"}));
        assert_eq!(engine.reply_for(&msg), TEXT_ONLY_REPLY);
    }

    #[test]
    fn reply_is_deterministic() {
        let engine = ReplyEngine::new();
        let msg = message(json!({"from": "1", "type": "text", "text": {"body": "Where is your LOCATION?"}}));
        assert_eq!(engine.reply_for(&msg), engine.reply_for(&msg));
        assert_eq!(engine.reply_for(&msg), KEYWORD_REPLIES.exact("location").unwrap());
    }
}
