//! In-memory bus adapter.
//!
//! Keeps published messages in process memory and reports synthetic
//! delivery outcomes through the tracker channel. Suitable for tests and
//! single-process runs; production deployments use the Kafka adapter.
//! Probe failure and hand-off rejection are injectable for exercising the
//! gateway's failure paths.

use crate::ports::outbound::{EventPublisher, ProbeError, PublishError};
use crate::tracker::DeliveryOutcome;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// In-memory implementation of the bus publisher port.
pub struct InMemoryEventBus {
    /// Topic name echoed in delivery outcomes.
    topic: String,
    /// Messages accepted for publish, in hand-off order.
    published: Mutex<Vec<Vec<u8>>>,
    /// Total messages accepted.
    events_published: AtomicU64,
    /// Readiness probe answer.
    healthy: AtomicBool,
    /// When set, `publish` rejects the hand-off.
    reject_handoff: AtomicBool,
    /// Sender half of the tracker channel.
    outcomes: mpsc::UnboundedSender<DeliveryOutcome>,
}

impl InMemoryEventBus {
    /// Create a healthy bus bound to `topic`.
    pub fn new(topic: impl Into<String>, outcomes: mpsc::UnboundedSender<DeliveryOutcome>) -> Self {
        Self {
            topic: topic.into(),
            published: Mutex::new(Vec::new()),
            events_published: AtomicU64::new(0),
            healthy: AtomicBool::new(true),
            reject_handoff: AtomicBool::new(false),
            outcomes,
        }
    }

    /// Snapshot of every message accepted so far.
    pub fn published(&self) -> Vec<Vec<u8>> {
        self.published
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Total messages accepted for publish.
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Set the readiness probe answer.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::Relaxed);
    }

    /// Toggle hand-off rejection (simulates a full outbound queue).
    pub fn set_reject_handoff(&self, reject: bool) {
        self.reject_handoff.store(reject, Ordering::Relaxed);
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, payload: Vec<u8>) -> Result<(), PublishError> {
        if self.reject_handoff.load(Ordering::Relaxed) {
            return Err(PublishError::QueueFull("injected rejection".into()));
        }

        let offset = self.events_published.fetch_add(1, Ordering::Relaxed) as i64;
        if let Ok(mut messages) = self.published.lock() {
            messages.push(payload);
        }

        let _ = self.outcomes.send(DeliveryOutcome::Delivered {
            topic: self.topic.clone(),
            partition: 0,
            offset,
        });

        Ok(())
    }

    async fn probe(&self, _timeout: Duration) -> Result<(), ProbeError> {
        if self.healthy.load(Ordering::Relaxed) {
            Ok(())
        } else {
            Err(ProbeError::Unavailable("injected outage".into()))
        }
    }

    async fn flush(&self, _timeout: Duration) -> Result<(), PublishError> {
        Ok(())
    }
}
