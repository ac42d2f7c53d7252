use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::message::{OutboundReply, SendReceipt};

/// Outbound delivery of a reply to the messaging platform.
///
/// Implementations make exactly one attempt per call; callers never retry.
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Sender name for logging (e.g. "graph_api", "dry_run").
    fn name(&self) -> &str;

    /// Deliver one text reply.
    async fn send(&self, reply: &OutboundReply) -> Result<SendReceipt, DeliveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Collecting(Mutex<Vec<OutboundReply>>);

    #[async_trait]
    impl ReplySender for Collecting {
        fn name(&self) -> &str {
            "collecting"
        }

        async fn send(&self, reply: &OutboundReply) -> Result<SendReceipt, DeliveryError> {
            self.0.lock().unwrap().push(reply.clone());
            Ok(SendReceipt::default())
        }
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let sender: Box<dyn ReplySender> = Box::new(Collecting(Mutex::new(Vec::new())));
        let reply = OutboundReply::new("15551234567", "hi", "631189900086971");
        sender.send(&reply).await.unwrap();
        assert_eq!(sender.name(), "collecting");
    }
}
