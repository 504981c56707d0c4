//! Outbound ports for the ingestion gateway.
//!
//! The HTTP core reaches the message bus and the clock only through these
//! traits; production adapters live in [`crate::adapters`].

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Hand-off failure at the publish boundary.
///
/// These surface synchronously from the enqueue call; broker-side delivery
/// failures arrive later as [`crate::tracker::DeliveryOutcome`]s instead.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The adapter's local outbound queue rejected the message.
    #[error("outbound queue full: {0}")]
    QueueFull(String),

    /// Any other client-level produce failure.
    #[error("bus client error: {0}")]
    Client(String),
}

/// Readiness probe failure.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The broker did not answer the probe.
    #[error("bus unavailable: {0}")]
    Unavailable(String),

    /// The probe did not complete within its bound.
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
}

/// Publishing side of the message bus.
///
/// `publish` is hand-off only: success means the message was accepted into
/// the adapter's outbound queue, not that the broker acknowledged it.
/// Delivery confirmation arrives out-of-band through the adapter's
/// outcome channel.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Enqueue serialized bytes for the adapter's configured topic.
    async fn publish(&self, payload: Vec<u8>) -> Result<(), PublishError>;

    /// Probe broker readiness, answering within `timeout`.
    async fn probe(&self, timeout: Duration) -> Result<(), ProbeError>;

    /// Drain the outbound queue, waiting up to `timeout` for pending
    /// deliveries to complete. Called once at teardown.
    async fn flush(&self, timeout: Duration) -> Result<(), PublishError>;
}

/// Clock port for receipt timestamps.
pub trait TimeSource: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall-clock implementation
#[derive(Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
