//! Ingestion service - HTTP surface and request orchestration.
//!
//! Two handlers share the fixed single route path `/`: `GET` probes the
//! bus and `POST` runs the enrichment-and-publish pipeline. The response
//! to a `POST` acknowledges hand-off only; broker delivery is confirmed
//! later through the delivery tracker, outside any request context.

use crate::domain::config::GatewayConfig;
use crate::domain::enrich::enrich;
use crate::domain::error::{GatewayError, IngestError};
use crate::middleware::create_cors_layer;
use crate::ports::outbound::{EventPublisher, ProbeError, SystemTimeSource, TimeSource};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Bus publisher, constructed once at startup and shared by handle.
    pub publisher: Arc<dyn EventPublisher>,
    /// Clock for receipt timestamps.
    pub time: Arc<dyn TimeSource>,
    /// Bound on the readiness probe.
    pub probe_timeout: Duration,
}

/// Ingestion gateway service
pub struct IngestService {
    config: GatewayConfig,
    state: AppState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<()>>,
}

impl IngestService {
    /// Create a new ingestion service over a bus publisher.
    pub fn new(
        config: GatewayConfig,
        publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let state = AppState {
            publisher,
            time: Arc::new(SystemTimeSource),
            probe_timeout: config.health.probe_timeout(),
        };

        Ok(Self {
            config,
            state,
            shutdown_tx: None,
            server: None,
        })
    }

    /// Router over the fixed single route path.
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Bind the listen address and serve in a background task.
    pub async fn start(&mut self) -> Result<(), GatewayError> {
        let addr = self.config.listen_addr();
        let router = self.router();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        info!(addr = %addr, topic = %self.config.bus.topic, "Starting ingestion gateway");
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(e.to_string()))?;

        self.server = Some(tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                error!(error = %e, "HTTP server error");
            }
        }));

        info!("Ingestion gateway started");
        Ok(())
    }

    /// Signal shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.server.take() {
            let _ = handle.await;
        }
        info!("Ingestion gateway stopped");
    }
}

/// Build the single-route router with the CORS boundary applied.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/", get(handle_health).post(handle_ingest))
        .layer(create_cors_layer(&config.cors))
        .with_state(state)
}

/// `POST /` - parse, validate, enrich, serialize, hand off, respond.
///
/// Returns 202 as soon as the bus adapter accepts the message; broker
/// acknowledgment is never awaited here.
async fn handle_ingest(State(state): State<AppState>, body: Bytes) -> Response {
    debug!(bytes = body.len(), "ingestion request received");

    let data: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            error!(
                error = %e,
                body = %String::from_utf8_lossy(&body),
                "no valid JSON received"
            );
            return error_response(&IngestError::MalformedJson(e.to_string()));
        }
    };

    if is_vacant(&data) {
        error!("no data in the request body");
        return error_response(&IngestError::EmptyPayload);
    }

    let received_epoch = state.time.now_millis();
    let enrichment = match enrich(data, received_epoch) {
        Ok(enrichment) => enrichment,
        Err(e) => {
            error!(error = %e, "enrichment rejected request");
            return error_response(&e);
        }
    };

    let serialized = match serde_json::to_vec(&enrichment.event) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(
                error = %e,
                message_id = %enrichment.message_id,
                "failed to serialize enriched event"
            );
            return error_response(&IngestError::PublishFailure(e.to_string()));
        }
    };

    match state.publisher.publish(serialized).await {
        Ok(()) => {
            debug!(message_id = %enrichment.message_id, "message handed off for publish");
            StatusCode::ACCEPTED.into_response()
        }
        Err(e) => {
            error!(
                error = %e,
                message_id = %enrichment.message_id,
                "error publishing message"
            );
            error_response(&IngestError::PublishFailure(e.to_string()))
        }
    }
}

/// `GET /` - bus readiness probe with a bounded timeout.
///
/// Never lets a probe error escape: any failure becomes a 503.
async fn handle_health(State(state): State<AppState>) -> Response {
    let probed = tokio::time::timeout(
        state.probe_timeout,
        state.publisher.probe(state.probe_timeout),
    )
    .await
    .unwrap_or(Err(ProbeError::Timeout(state.probe_timeout)));

    match probed {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "ok"}))).into_response(),
        Err(e) => {
            error!(error = %e, "healthcheck failure");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unhealthy"})),
            )
                .into_response()
        }
    }
}

/// Emptiness gate: null, false, 0, `""`, `[]` and `{}` all count as
/// "no data".
fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Map a pipeline failure to its HTTP response contract.
///
/// Causes are logged at the call sites, never echoed to the caller.
fn error_response(err: &IngestError) -> Response {
    let (status, message) = match err {
        IngestError::MalformedJson(_) => (StatusCode::BAD_REQUEST, "No valid JSON received."),
        IngestError::EmptyPayload => (
            StatusCode::BAD_REQUEST,
            "No data received in the request.",
        ),
        IngestError::InvalidPayload(_) => (
            StatusCode::BAD_REQUEST,
            "Request body must be a non-empty JSON object.",
        ),
        IngestError::InvalidTimestamp(_) => (
            StatusCode::BAD_REQUEST,
            "Field 'eventTime' is not a valid ISO-8601 timestamp.",
        ),
        IngestError::PublishFailure(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to publish message",
        ),
    };
    (status, Json(json!({"error": message}))).into_response()
}
