//! Shared types for the wabot webhook bridge: the inbound webhook envelope,
//! inbound/outbound message shapes, and the outbound delivery seam.

pub mod error;
pub mod message;
pub mod traits;
pub mod webhook;

pub use error::DeliveryError;
pub use message::{InboundMessage, Interactive, OutboundReply, Selection, SendReceipt, TextBody};
pub use traits::ReplySender;
pub use webhook::{Change, ChangeValue, Entry, Metadata, StatusUpdate, WebhookEnvelope};
