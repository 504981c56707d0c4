//! Error taxonomy for the ingestion pipeline.
//!
//! Every stage boundary (parse, emptiness gate, enrichment, hand-off)
//! returns an explicit variant; the HTTP mapping lives in
//! [`crate::service`].

use thiserror::Error;

/// Request-path failures, one variant per pipeline stage.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Request body was not decodable JSON.
    #[error("no valid JSON received: {0}")]
    MalformedJson(String),

    /// Body decoded to an empty or null-like value.
    #[error("no data received in the request")]
    EmptyPayload,

    /// Decoded value is not a usable JSON object.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// `eventTime` was present but not a parseable ISO-8601 timestamp.
    #[error("invalid eventTime: {0}")]
    InvalidTimestamp(String),

    /// The bus adapter rejected the hand-off.
    #[error("failed to publish message: {0}")]
    PublishFailure(String),
}

/// Gateway-level errors (process lifecycle, not per-request)
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Bus client construction error
    #[error("bus client error: {0}")]
    Bus(String),
}
