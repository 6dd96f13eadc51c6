//! Catalog reload endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use super::AppState;

/// Starts a wholesale reload in the background. The current catalog keeps
/// serving until the new one is published.
pub async fn reload_handler(State(state): State<AppState>) -> StatusCode {
    info!("catalog reload requested");
    state.catalog.spawn_load();
    StatusCode::ACCEPTED
}
