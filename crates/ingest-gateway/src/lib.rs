//! Ingestion gateway core - HTTP intake, payload enrichment, and bus publishing.
//!
//! This crate is the single write-path entry point for event producers that
//! should not hold a message-bus client of their own.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      INGESTION GATEWAY                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │   POST /                          GET /                       │
//! │      │                               │                        │
//! │      ▼                               ▼                        │
//! │  parse → validate → enrich      readiness probe               │
//! │      │                               │                        │
//! │      ▼                               │                        │
//! │  serialize → publish (hand-off) ─────┤                        │
//! └──────┬───────────────────────────────┼────────────────────────┘
//!        │                               │
//!        ▼                               ▼
//!   Kafka topic                  cluster metadata
//!        │
//!        ▼ (delivery callback, out-of-band)
//!   DeliveryTracker ── debug/error log
//! ```
//!
//! The HTTP response never waits for broker acknowledgment: `publish` is
//! hand-off only, and delivery outcomes reach the [`tracker::DeliveryTracker`]
//! later over a channel, on the bus client's own schedule.
//!
//! # Usage
//!
//! ```ignore
//! use ingest_gateway::{GatewayConfig, IngestService, KafkaEventBus, DeliveryTracker};
//!
//! let config = GatewayConfig::default();
//! let (outcomes, tracker) = DeliveryTracker::channel();
//! tokio::spawn(tracker.run());
//! let bus = Arc::new(KafkaEventBus::new(&config.bus, outcomes)?);
//! let mut service = IngestService::new(config, bus)?;
//! service.start().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod middleware;
pub mod ports;
pub mod service;
pub mod tracker;

// Re-exports for public API
pub use adapters::{InMemoryEventBus, KafkaEventBus};
pub use domain::config::GatewayConfig;
pub use domain::enrich::{enrich, EnrichedEvent, Enrichment, EventContext};
pub use domain::error::{GatewayError, IngestError};
pub use ports::outbound::{EventPublisher, ProbeError, PublishError, SystemTimeSource, TimeSource};
pub use service::{build_router, AppState, IngestService};
pub use tracker::{DeliveryOutcome, DeliveryTracker};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
