//! # Ingest Runtime
//!
//! The main entry point for the ingestion gateway process.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (env-filtered tracing subscriber)
//! 2. Load configuration (defaults + environment overrides)
//! 3. Spawn the delivery tracker consumer
//! 4. Create the Kafka producer adapter
//! 5. Start the HTTP service
//! 6. On Ctrl+C: graceful shutdown, then a final producer flush so
//!    pending deliveries fire their callbacks

use anyhow::{Context, Result};
use ingest_gateway::adapters::KafkaEventBus;
use ingest_gateway::domain::config::{GatewayConfig, TlsConfig};
use ingest_gateway::ports::outbound::EventPublisher;
use ingest_gateway::service::IngestService;
use ingest_gateway::tracker::DeliveryTracker;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// How long the teardown flush waits for the outbound queue to drain.
const SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

fn load_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();

    // Broker list is comma-separated, matching the client's own format
    if let Ok(servers) = std::env::var("KAFKA_BOOTSTRAP_SERVERS") {
        let servers: Vec<String> = servers
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !servers.is_empty() {
            config.bus.bootstrap_servers = servers;
        }
    }

    if let Ok(topic) = std::env::var("KAFKA_TOPIC_INGESTION_RAW") {
        config.bus.topic = topic;
    }

    if let Ok(port) = std::env::var("LISTEN_PORT") {
        match port.parse() {
            Ok(p) => config.http.port = p,
            Err(_) => warn!(
                "LISTEN_PORT is not a valid port number, keeping {}",
                config.http.port
            ),
        }
    }

    let use_ssl = std::env::var("KAFKA_USE_SSL")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_ssl {
        config.bus.tls = Some(TlsConfig {
            ca_location: std::env::var("KAFKA_SSL_CA_LOCATION").unwrap_or_default(),
            certificate_location: std::env::var("KAFKA_SSL_CERTIFICATE_LOCATION")
                .unwrap_or_default(),
            key_location: std::env::var("KAFKA_SSL_KEY_LOCATION").unwrap_or_default(),
        });
    }

    config
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = load_config();
    info!("Application configuration:");
    info!(
        "  KAFKA_BOOTSTRAP_SERVERS: {}",
        config.bus.bootstrap_servers.join(",")
    );
    info!("  KAFKA_TOPIC_INGESTION_RAW: {}", config.bus.topic);
    info!("  LISTEN_PORT: {}", config.http.port);

    // Delivery outcomes flow from the producer's callback path to a
    // dedicated logging consumer, outside any request context.
    let (outcomes, tracker) = DeliveryTracker::channel();
    tokio::spawn(tracker.run());

    let bus = Arc::new(
        KafkaEventBus::new(&config.bus, outcomes).context("Failed to create Kafka producer")?,
    );

    let mut service = IngestService::new(config, Arc::clone(&bus) as Arc<dyn EventPublisher>)?;
    service.start().await?;

    info!("Gateway is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // Graceful shutdown
    service.shutdown().await;

    // Final drain so in-flight deliveries report their outcomes.
    if let Err(e) = bus.flush(SHUTDOWN_FLUSH_TIMEOUT).await {
        warn!(error = %e, "outbound queue did not fully drain");
    }

    Ok(())
}
