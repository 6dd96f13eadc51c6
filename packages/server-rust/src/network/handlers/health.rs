//! Health, liveness, and readiness endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::AppState;
use crate::catalog::CatalogStatus;
use crate::network::HealthState;

/// Detailed health as JSON. Always 200; the body says how healthy.
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let status = state.catalog.status();
    let records = status.catalog().map_or(0, |catalog| catalog.len());
    let error = match &*status {
        CatalogStatus::Failed(message) => Some(message.clone()),
        _ => None,
    };

    Json(json!({
        "state": state.lifecycle.health_state().as_str(),
        "catalog": status.as_str(),
        "records": records,
        "catalog_error": error,
        "in_flight": state.lifecycle.in_flight_count(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Liveness probe: the process answers, nothing else is checked.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: 200 only while serving with a loaded catalog.
pub async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    let serving = state.lifecycle.health_state() == HealthState::Ready;
    if serving && state.catalog.status().catalog().is_some() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use showroom_core::{Catalog, Vehicle};

    use super::*;
    use crate::network::handlers::test_support::state_with;

    #[tokio::test]
    async fn health_reports_catalog_and_lifecycle() {
        let state = state_with(Some(Catalog::new(vec![Vehicle::default(); 3])));
        state.lifecycle.set_ready();

        let json = health_handler(State(state)).await.0;
        assert_eq!(json["state"], "ready");
        assert_eq!(json["catalog"], "ready");
        assert_eq!(json["records"], 3);
        assert!(json["catalog_error"].is_null());
        assert_eq!(json["in_flight"], 0);
        assert!(json["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn health_reports_load_failure() {
        let state = state_with(None);
        let _ = state.catalog.load().await;

        let json = health_handler(State(state)).await.0;
        assert_eq!(json["catalog"], "failed");
        assert_eq!(json["records"], 0);
        assert!(json["catalog_error"].as_str().unwrap().contains("offline"));
    }

    #[tokio::test]
    async fn liveness_always_ok() {
        assert_eq!(liveness_handler().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_needs_catalog_and_ready_state() {
        let state = state_with(None);
        state.lifecycle.set_ready();
        assert_eq!(
            readiness_handler(State(state.clone())).await,
            StatusCode::SERVICE_UNAVAILABLE
        );

        state.catalog.publish(Catalog::new(Vec::new()));
        assert_eq!(readiness_handler(State(state.clone())).await, StatusCode::OK);

        state.lifecycle.begin_drain();
        assert_eq!(
            readiness_handler(State(state)).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
