//! Payload enrichment - the request-to-message transformation.
//!
//! Pure apart from identifier generation and the caller-supplied receipt
//! timestamp: no I/O, no clock reads. The ingestion handler captures the
//! receipt time once and passes it in, which keeps every property here
//! testable with fixed inputs.

use crate::domain::error::IngestError;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Payload key carrying the message identifier.
pub const MESSAGE_ID_FIELD: &str = "messageId";
/// Payload key carrying the producer-side event timestamp (ISO-8601).
pub const EVENT_TIME_FIELD: &str = "eventTime";
/// Payload key written with the normalized event time (epoch millis).
pub const COLLECTED_EPOCH_FIELD: &str = "collectedEpoch";

/// Server-side context attached to every published event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    /// Milliseconds since the Unix epoch, captured at request receipt.
    #[serde(rename = "receivedEpoch")]
    pub received_epoch: i64,
}

/// The wire envelope published to the bus.
///
/// Constructed fresh per request and handed off by value; nothing mutates
/// it after serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedEvent {
    /// Client payload, augmented with `messageId` and (when the input
    /// carried a parseable `eventTime`) `collectedEpoch`.
    pub payload: Map<String, Value>,
    /// Server-side receipt context.
    pub context: EventContext,
}

/// A successful enrichment: the envelope plus the message identifier it
/// carries, generated here or passed through from the client.
#[derive(Debug, Clone)]
pub struct Enrichment {
    /// The envelope to serialize and publish.
    pub event: EnrichedEvent,
    /// Identifier under `payload.messageId`, for log correlation.
    pub message_id: String,
}

/// Enrich a decoded request body.
///
/// * Inserts a fresh UUID v4 under `messageId` when the client supplied
///   none; a client-supplied value passes through verbatim, whatever its
///   shape. The identifier is generated exactly once per event.
/// * When `eventTime` is present, parses it as RFC 3339 and writes the
///   equivalent epoch milliseconds under `collectedEpoch`. A value that
///   does not parse rejects the whole request.
/// * Records `received_epoch` (epoch millis at request receipt) in the
///   envelope context.
pub fn enrich(raw: Value, received_epoch: i64) -> Result<Enrichment, IngestError> {
    let mut payload = match raw {
        Value::Object(map) if !map.is_empty() => map,
        Value::Object(_) => {
            return Err(IngestError::InvalidPayload("empty JSON object".into()));
        }
        other => {
            return Err(IngestError::InvalidPayload(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )));
        }
    };

    let message_id = match payload.get(MESSAGE_ID_FIELD) {
        Some(Value::String(id)) => id.clone(),
        // Non-string identifiers also pass through untouched; stringified
        // here only for log correlation.
        Some(other) => other.to_string(),
        None => {
            let id = Uuid::new_v4().to_string();
            payload.insert(MESSAGE_ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    };

    if let Some(event_time) = payload.get(EVENT_TIME_FIELD) {
        let text = event_time
            .as_str()
            .ok_or_else(|| IngestError::InvalidTimestamp(event_time.to_string()))?;
        let parsed = DateTime::parse_from_rfc3339(text)
            .map_err(|_| IngestError::InvalidTimestamp(text.to_string()))?;
        payload.insert(
            COLLECTED_EPOCH_FIELD.to_string(),
            Value::from(parsed.timestamp_millis()),
        );
    }

    Ok(Enrichment {
        event: EnrichedEvent {
            payload,
            context: EventContext { received_epoch },
        },
        message_id,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
