//! Delivery outcome tracking.
//!
//! Broker acknowledgments arrive on the bus client's own scheduling
//! context, decoupled from the HTTP request that enqueued the message.
//! Adapters forward each outcome over an unbounded channel and a single
//! consumer task logs them, so the callback side never blocks and the
//! request path never waits on delivery confirmation.

use tokio::sync::mpsc;
use tracing::{debug, error};

/// Terminal state of one published message.
///
/// Exists for the duration of the callback hop only: logged, then dropped.
/// The gateway performs no retries on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The broker acknowledged the message.
    Delivered {
        /// Destination topic.
        topic: String,
        /// Partition the message landed on.
        partition: i32,
        /// Offset assigned by the broker.
        offset: i64,
    },
    /// Delivery failed; carries the original serialized value.
    Failed {
        /// Client-reported error description.
        error: String,
        /// The serialized message that was lost.
        payload: Vec<u8>,
    },
}

/// Logging consumer for delivery outcomes.
pub struct DeliveryTracker {
    outcomes: mpsc::UnboundedReceiver<DeliveryOutcome>,
}

impl DeliveryTracker {
    /// Create a tracker together with the sender half handed to adapters.
    pub fn channel() -> (mpsc::UnboundedSender<DeliveryOutcome>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { outcomes: rx })
    }

    /// Drain outcomes until every sender is dropped.
    ///
    /// Spawn this once at startup; it ends on its own when the adapters
    /// holding the sender half shut down.
    pub async fn run(mut self) {
        while let Some(outcome) = self.outcomes.recv().await {
            match outcome {
                DeliveryOutcome::Delivered {
                    topic,
                    partition,
                    offset,
                } => {
                    debug!(topic = %topic, partition, offset, "message delivered");
                }
                DeliveryOutcome::Failed { error, payload } => {
                    error!(
                        error = %error,
                        payload = %String::from_utf8_lossy(&payload),
                        "message delivery failed"
                    );
                }
            }
        }
        debug!("delivery tracker stopped");
    }
}
