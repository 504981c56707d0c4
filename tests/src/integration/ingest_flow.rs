//! # Ingestion Flow Tests
//!
//! Drives `POST /` through the real router against the in-memory bus:
//! request in, enriched message out, with the documented status codes and
//! error bodies on every failure path.

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use ingest_gateway::adapters::InMemoryEventBus;
    use ingest_gateway::ports::outbound::SystemTimeSource;
    use ingest_gateway::service::{build_router, AppState};
    use ingest_gateway::tracker::DeliveryOutcome;
    use ingest_gateway::GatewayConfig;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tower::ServiceExt;
    use uuid::Uuid;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn bus_and_router() -> (Arc<InMemoryEventBus>, Router) {
        let (tx, _rx) = mpsc::unbounded_channel();
        let bus = Arc::new(InMemoryEventBus::new("events-raw", tx));
        (Arc::clone(&bus), router_over(bus))
    }

    fn router_over(bus: Arc<InMemoryEventBus>) -> Router {
        let state = AppState {
            publisher: bus,
            time: Arc::new(SystemTimeSource),
            probe_timeout: Duration::from_millis(200),
        };
        build_router(state, &GatewayConfig::default())
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("JSON body")
    }

    fn single_message(bus: &InMemoryEventBus) -> Value {
        let published = bus.published();
        assert_eq!(published.len(), 1, "exactly one message should be enqueued");
        serde_json::from_slice(&published[0]).expect("published message is JSON")
    }

    // =========================================================================
    // ACCEPTANCE PATH
    // =========================================================================

    #[tokio::test]
    async fn simple_event_is_enriched_and_enqueued() {
        let (bus, router) = bus_and_router();
        let before = now_millis();

        let response = router.oneshot(post("{\"a\": 1}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let message = single_message(&bus);
        assert_eq!(message["payload"]["a"], 1);

        // Generated identifier is a syntactically valid UUID.
        let id = message["payload"]["messageId"].as_str().expect("messageId");
        assert!(Uuid::parse_str(id).is_ok());

        // Receipt time lands within a small delta of the request window.
        let received = message["context"]["receivedEpoch"].as_i64().expect("epoch");
        let after = now_millis();
        assert!(received >= before && received <= after);
    }

    #[tokio::test]
    async fn accepted_response_has_empty_body() {
        let (_bus, router) = bus_and_router();

        let response = router.oneshot(post("{\"a\": 1}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn client_message_id_is_published_verbatim() {
        let (bus, router) = bus_and_router();

        // "abc" is not UUID-shaped; it must still pass through untouched.
        let response = router
            .oneshot(post("{\"messageId\": \"abc\", \"a\": 1}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let message = single_message(&bus);
        assert_eq!(message["payload"]["messageId"], "abc");
    }

    #[tokio::test]
    async fn event_time_is_normalized_to_epoch_millis() {
        let (bus, router) = bus_and_router();

        let response = router
            .oneshot(post("{\"eventTime\": \"2024-01-01T00:00:00Z\"}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let message = single_message(&bus);
        assert_eq!(message["payload"]["collectedEpoch"], 1_704_067_200_000_i64);
    }

    #[tokio::test]
    async fn generated_ids_differ_across_identical_requests() {
        let (bus, router) = bus_and_router();

        for _ in 0..2 {
            let response = router.clone().oneshot(post("{\"a\": 1}")).await.unwrap();
            assert_eq!(response.status(), StatusCode::ACCEPTED);
        }

        let published = bus.published();
        assert_eq!(published.len(), 2);
        let ids: Vec<String> = published
            .iter()
            .map(|bytes| {
                let message: Value = serde_json::from_slice(bytes).unwrap();
                message["payload"]["messageId"].as_str().unwrap().to_string()
            })
            .collect();
        assert_ne!(ids[0], ids[1]);
    }

    // =========================================================================
    // REJECTION PATHS
    // =========================================================================

    #[tokio::test]
    async fn non_json_body_is_rejected_without_side_effects() {
        let (bus, router) = bus_and_router();

        let response = router.oneshot(post("definitely not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "No valid JSON received.");
        assert!(bus.published().is_empty());
    }

    #[tokio::test]
    async fn empty_object_is_rejected() {
        let (bus, router) = bus_and_router();

        let response = router.oneshot(post("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "No data received in the request."
        );
        assert!(bus.published().is_empty());
    }

    #[tokio::test]
    async fn null_body_is_rejected() {
        let (bus, router) = bus_and_router();

        let response = router.oneshot(post("null")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(bus.published().is_empty());
    }

    #[tokio::test]
    async fn malformed_event_time_rejects_whole_request() {
        let (bus, router) = bus_and_router();

        let response = router
            .oneshot(post("{\"a\": 1, \"eventTime\": \"last tuesday\"}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
        assert!(bus.published().is_empty());
    }

    #[tokio::test]
    async fn handoff_failure_maps_to_500_with_generic_body() {
        let (bus, router) = bus_and_router();
        bus.set_reject_handoff(true);

        let response = router.oneshot(post("{\"a\": 1}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["error"],
            "Failed to publish message"
        );
        assert!(bus.published().is_empty());
    }

    // =========================================================================
    // DELIVERY OUTCOMES
    // =========================================================================

    #[tokio::test]
    async fn delivery_outcomes_reach_the_tracker_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bus = Arc::new(InMemoryEventBus::new("events-raw", tx));
        let router = router_over(Arc::clone(&bus));

        for _ in 0..2 {
            let response = router.clone().oneshot(post("{\"a\": 1}")).await.unwrap();
            assert_eq!(response.status(), StatusCode::ACCEPTED);
        }

        for expected_offset in 0..2 {
            match rx.recv().await {
                Some(DeliveryOutcome::Delivered {
                    topic,
                    partition,
                    offset,
                }) => {
                    assert_eq!(topic, "events-raw");
                    assert_eq!(partition, 0);
                    assert_eq!(offset, expected_offset);
                }
                other => panic!("expected a delivered outcome, got {other:?}"),
            }
        }
    }

    fn now_millis() -> i64 {
        use ingest_gateway::ports::outbound::TimeSource;
        SystemTimeSource.now_millis()
    }
}
