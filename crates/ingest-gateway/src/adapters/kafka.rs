//! Kafka producer adapter.
//!
//! Wraps an rdkafka `BaseProducer` behind the [`EventPublisher`] port.
//! Publishing is a local enqueue; librdkafka delivers in the background
//! and reports each outcome through [`DeliveryContext::delivery`], which
//! forwards it to the tracker channel. Callbacks fire whenever the queue
//! is serviced: the zero-timeout poll after each enqueue, and the flush
//! at teardown.

use crate::domain::config::BusConfig;
use crate::domain::error::GatewayError;
use crate::ports::outbound::{EventPublisher, ProbeError, PublishError};
use crate::tracker::DeliveryOutcome;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaError;
use rdkafka::producer::{BaseProducer, BaseRecord, DeliveryResult, Producer, ProducerContext};
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::{ClientContext, Message};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Producer context whose delivery hook forwards outcomes to the tracker
/// channel. Runs on whichever thread services the producer queue and must
/// never block or panic there.
struct DeliveryContext {
    outcomes: mpsc::UnboundedSender<DeliveryOutcome>,
}

impl ClientContext for DeliveryContext {}

impl ProducerContext for DeliveryContext {
    type DeliveryOpaque = ();

    fn delivery(&self, result: &DeliveryResult<'_>, _: ()) {
        let outcome = match result {
            Ok(message) => DeliveryOutcome::Delivered {
                topic: message.topic().to_string(),
                partition: message.partition(),
                offset: message.offset(),
            },
            Err((err, message)) => DeliveryOutcome::Failed {
                error: err.to_string(),
                payload: message.payload().map(<[u8]>::to_vec).unwrap_or_default(),
            },
        };
        // Tracker gone only during shutdown; the outcome has nowhere left
        // to go.
        let _ = self.outcomes.send(outcome);
    }
}

/// rdkafka-backed bus adapter bound to a single topic.
///
/// librdkafka producers are safe for concurrent produce from multiple
/// threads, so one instance is shared across all request contexts.
pub struct KafkaEventBus {
    producer: Arc<BaseProducer<DeliveryContext>>,
    topic: String,
}

impl KafkaEventBus {
    /// Build a producer from bus configuration.
    pub fn new(
        config: &BusConfig,
        outcomes: mpsc::UnboundedSender<DeliveryOutcome>,
    ) -> Result<Self, GatewayError> {
        let producer = build_client_config(config)
            .create_with_context(DeliveryContext { outcomes })
            .map_err(|e| GatewayError::Bus(e.to_string()))?;

        debug!(
            servers = %config.bootstrap_servers.join(","),
            topic = %config.topic,
            "Kafka producer created"
        );

        Ok(Self {
            producer: Arc::new(producer),
            topic: config.topic.clone(),
        })
    }
}

fn build_client_config(config: &BusConfig) -> ClientConfig {
    let mut client_config = ClientConfig::new();
    client_config.set("bootstrap.servers", config.bootstrap_servers.join(","));

    if let Some(tls) = &config.tls {
        client_config.set("security.protocol", "ssl");
        client_config.set("ssl.ca.location", tls.ca_location.as_str());
        client_config.set("ssl.certificate.location", tls.certificate_location.as_str());
        client_config.set("ssl.key.location", tls.key_location.as_str());
    }

    client_config
}

#[async_trait]
impl EventPublisher for KafkaEventBus {
    async fn publish(&self, payload: Vec<u8>) -> Result<(), PublishError> {
        let record = BaseRecord::<(), [u8]>::to(&self.topic).payload(payload.as_slice());

        self.producer.send(record).map_err(|(err, _)| {
            let detail = err.to_string();
            match err {
                KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull) => {
                    PublishError::QueueFull(detail)
                }
                _ => PublishError::Client(detail),
            }
        })?;

        // Opportunistic drain: fires callbacks for deliveries that have
        // already completed, without waiting on this message.
        self.producer.poll(Duration::ZERO);

        Ok(())
    }

    async fn probe(&self, timeout: Duration) -> Result<(), ProbeError> {
        // Metadata fetch is a blocking librdkafka call; keep it off the
        // request-serving threads.
        let producer = Arc::clone(&self.producer);
        let fetched = tokio::task::spawn_blocking(move || {
            producer.client().fetch_metadata(None, timeout)
        })
        .await
        .map_err(|e| ProbeError::Unavailable(e.to_string()))?;

        fetched
            .map(|_| ())
            .map_err(|e| ProbeError::Unavailable(e.to_string()))
    }

    async fn flush(&self, timeout: Duration) -> Result<(), PublishError> {
        let producer = Arc::clone(&self.producer);
        tokio::task::spawn_blocking(move || producer.flush(timeout))
            .await
            .map_err(|e| PublishError::Client(e.to_string()))?
            .map_err(|e| PublishError::Client(e.to_string()))
    }
}
