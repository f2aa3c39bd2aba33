//! Health, liveness, and readiness endpoint handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::AppState;
use crate::network::HealthState;

/// Returns detailed health information as JSON.
///
/// Always returns 200; the `state` field says whether the server is actually taking
/// work, so monitoring can tell "up but draining" from "down".
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let health = state.shutdown.health_state();

    Json(json!({
        "state": health.as_str(),
        "products": state.products.len(),
        "in_flight": state.shutdown.in_flight_count(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Liveness probe: 200 whenever the process can answer at all.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: 200 only in the `Ready` state, 503 while starting or draining.
pub async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    if state.shutdown.health_state() == HealthState::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::network::handlers::test_state::{empty_state, state_with};
    use crate::service::test_support::ScriptedBackend;
    use crate::service::{Product, ProductRegistry};

    #[tokio::test]
    async fn health_reports_state_and_counts() {
        let mut registry = ProductRegistry::new();
        registry
            .register(Product::new("p", Arc::new(ScriptedBackend::default())))
            .unwrap();
        let state = state_with(registry);
        state.shutdown.set_ready();
        let _guard = state.shutdown.in_flight_guard();

        let Json(body) = health_handler(State(state)).await;

        assert_eq!(body["state"], "ready");
        assert_eq!(body["products"], 1);
        assert_eq!(body["in_flight"], 1);
        assert!(body["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn health_reports_draining() {
        let state = empty_state();
        state.shutdown.set_ready();
        state.shutdown.trigger_shutdown();

        let Json(body) = health_handler(State(state)).await;
        assert_eq!(body["state"], "draining");
    }

    #[tokio::test]
    async fn liveness_always_ok() {
        assert_eq!(liveness_handler().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_health_state() {
        let state = empty_state();
        assert_eq!(
            readiness_handler(State(state.clone())).await,
            StatusCode::SERVICE_UNAVAILABLE
        );

        state.shutdown.set_ready();
        assert_eq!(readiness_handler(State(state.clone())).await, StatusCode::OK);

        state.shutdown.trigger_shutdown();
        assert_eq!(
            readiness_handler(State(state)).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
