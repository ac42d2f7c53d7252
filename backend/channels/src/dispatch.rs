//! Fire-and-forget reply dispatch.
//!
//! Webhook handlers push replies into a bounded queue and return at once; a
//! background [`DispatchWorker`] drains the queue and runs each send as its
//! own task, so a slow or failing send never touches the inbound response.

use std::sync::Arc;

use logging::{DeliveryEvent, DeliveryLogger};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use uuid::Uuid;
use wabot_core::{DeliveryError, OutboundReply, ReplySender};

/// A reply waiting to be sent.
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    pub id: Uuid,
    pub reply: OutboundReply,
}

/// Handle used by request handlers to enqueue replies.
#[derive(Clone)]
pub struct ReplyDispatcher {
    tx: mpsc::Sender<DeliveryJob>,
    sender_name: Arc<str>,
}

/// Drains the queue and performs the sends.
pub struct DispatchWorker {
    pub(crate) rx: mpsc::Receiver<DeliveryJob>,
    sender: Arc<dyn ReplySender>,
}

/// Build a dispatcher/worker pair around `sender`.
///
/// The worker stops once every [`ReplyDispatcher`] clone is dropped and all
/// in-flight sends have completed.
pub fn reply_queue(
    sender: Arc<dyn ReplySender>,
    capacity: usize,
) -> (ReplyDispatcher, DispatchWorker) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let dispatcher = ReplyDispatcher {
        tx,
        sender_name: Arc::from(sender.name()),
    };
    (dispatcher, DispatchWorker { rx, sender })
}

impl ReplyDispatcher {
    /// Enqueue a reply without waiting. Returns the delivery id.
    ///
    /// A full or closed queue drops the reply; the drop is recorded in the
    /// delivery log and returned so the caller can note it, but the webhook
    /// acknowledgment is unaffected.
    pub fn dispatch(&self, reply: OutboundReply) -> Result<Uuid, DeliveryError> {
        let job = DeliveryJob {
            id: Uuid::new_v4(),
            reply,
        };
        let id = job.id;

        match self.tx.try_send(job) {
            Ok(()) => {
                debug!(delivery_id = %id, "Reply queued");
                Ok(id)
            }
            Err(err) => {
                let (job, cause) = match err {
                    TrySendError::Full(job) => (job, DeliveryError::QueueFull),
                    TrySendError::Closed(job) => (job, DeliveryError::QueueClosed),
                };
                DeliveryLogger::log_event(
                    &id.to_string(),
                    &self.sender_name,
                    DeliveryEvent::Dropped {
                        recipient: job.reply.to,
                        reason: cause.to_string(),
                    },
                );
                Err(cause)
            }
        }
    }
}

impl DispatchWorker {
    /// Run until the queue closes, then wait for in-flight sends.
    pub async fn run(mut self) {
        info!(sender = self.sender.name(), "Reply dispatcher started");
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                job = self.rx.recv() => match job {
                    Some(job) => {
                        let sender = Arc::clone(&self.sender);
                        in_flight.spawn(deliver(sender, job));
                    }
                    None => break,
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Delivery task panicked");
                    }
                }
            }
        }

        let pending = in_flight.len();
        if pending > 0 {
            info!(pending, "Waiting for in-flight replies");
        }
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Delivery task panicked");
            }
        }
        info!("Reply dispatcher stopped");
    }
}

/// One best-effort send; the outcome goes to the delivery log only.
async fn deliver(sender: Arc<dyn ReplySender>, job: DeliveryJob) {
    let delivery_id = job.id.to_string();
    match sender.send(&job.reply).await {
        Ok(receipt) => {
            DeliveryLogger::log_event(
                &delivery_id,
                sender.name(),
                DeliveryEvent::Sent {
                    recipient: job.reply.to,
                    message_id: receipt.message_id,
                },
            );
        }
        Err(e) => {
            DeliveryLogger::log_event(
                &delivery_id,
                sender.name(),
                DeliveryEvent::Failed {
                    recipient: job.reply.to,
                    error_msg: e.to_string(),
                },
            );
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSender;
    use super::*;
    use std::time::Duration;

    fn reply(to: &str) -> OutboundReply {
        OutboundReply::new(to, "Hi there!", "631189900086971")
    }

    #[tokio::test]
    async fn worker_sends_queued_replies() {
        let (sender, mut sent) = RecordingSender::new(false);
        let (dispatcher, worker) = reply_queue(Arc::new(sender), 4);
        let handle = tokio::spawn(worker.run());

        dispatcher.dispatch(reply("15551234567")).unwrap();
        let delivered = tokio::time::timeout(Duration::from_secs(2), sent.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(delivered.to, "15551234567");

        drop(dispatcher);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn failed_send_does_not_stop_worker() {
        let (sender, mut sent) = RecordingSender::new(true);
        let (dispatcher, worker) = reply_queue(Arc::new(sender), 4);
        tokio::spawn(worker.run());

        dispatcher.dispatch(reply("1")).unwrap();
        dispatcher.dispatch(reply("2")).unwrap();
        for _ in 0..2 {
            tokio::time::timeout(Duration::from_secs(2), sent.recv())
                .await
                .unwrap()
                .unwrap();
        }
    }

    #[tokio::test]
    async fn full_queue_drops_reply() {
        let (sender, _sent) = RecordingSender::new(false);
        let (dispatcher, _worker) = reply_queue(Arc::new(sender), 1);

        assert!(dispatcher.dispatch(reply("1")).is_ok());
        let err = dispatcher.dispatch(reply("2")).unwrap_err();
        assert!(matches!(err, DeliveryError::QueueFull));
    }

    #[tokio::test]
    async fn closed_queue_drops_reply() {
        let (sender, _sent) = RecordingSender::new(false);
        let (dispatcher, worker) = reply_queue(Arc::new(sender), 1);
        drop(worker);

        let err = dispatcher.dispatch(reply("1")).unwrap_err();
        assert!(matches!(err, DeliveryError::QueueClosed));
    }

    #[tokio::test]
    async fn worker_drains_in_flight_on_shutdown() {
        let (sender, mut sent) = RecordingSender::new(false);
        let (dispatcher, worker) = reply_queue(Arc::new(sender), 8);

        for n in 0..3 {
            dispatcher.dispatch(reply(&n.to_string())).unwrap();
        }
        drop(dispatcher);
        worker.run().await;

        let mut count = 0;
        while sent.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 3);
    }
}
