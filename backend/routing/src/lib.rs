//! Keyword-driven reply generation for inbound WhatsApp messages.

pub mod classify;
pub mod engine;
pub mod tables;

pub use classify::{MessageContent, classify};
pub use engine::ReplyEngine;
pub use tables::{ReplyTable, SELECTION_ACK_REPLY, TEXT_ONLY_REPLY, UNRECOGNIZED_TEXT_REPLY};
