use thiserror::Error;

/// Failure to hand a reply to the messaging platform.
///
/// These never reach the webhook caller: the event has already been
/// acknowledged by the time a delivery is attempted.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("platform rejected message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("dispatch queue is full")]
    QueueFull,

    #[error("dispatch queue is closed")]
    QueueClosed,

    #[error("sender misconfigured: {0}")]
    Config(String),
}
