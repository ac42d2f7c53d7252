pub mod dispatch;
pub mod error;
pub mod wa_send;
pub mod whatsapp;

pub use dispatch::{DeliveryJob, DispatchWorker, ReplyDispatcher, reply_queue};
pub use error::WebhookError;
pub use wa_send::{DryRunSender, GraphApiConfig, GraphApiSender};
pub use whatsapp::{EVENT_RECEIVED, WhatsAppAdapter, WhatsAppConfig};

/// All channel adapters implement this trait.
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Axum sub-router for the adapter's inbound webhook endpoints.
    fn build_router(&self) -> axum::Router {
        axum::Router::new()
    }
}
