//! Inventory page, browser event and vehicle details handlers.

use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::json;
use showroom_core::{BrowserEvent, Catalog};
use tracing::debug;

use super::AppState;
use crate::catalog::CatalogStatus;
use crate::render::format::{condition_segment, details_link};
use crate::render::{render_details, BrowserError, InventoryBrowser};

fn ready_catalog(state: &AppState) -> Result<Arc<Catalog>, BrowserError> {
    match &*state.catalog.status() {
        CatalogStatus::Ready(catalog) => Ok(Arc::clone(catalog)),
        CatalogStatus::Loading => Err(BrowserError::Loading),
        CatalogStatus::Failed(message) => Err(BrowserError::Unavailable(message.clone())),
    }
}

/// `GET /inventory?<state>`: the full browser page seeded from the query.
pub async fn inventory_page_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, BrowserError> {
    let catalog = ready_catalog(&state)?;
    let browser = InventoryBrowser::new(&catalog, query.as_deref().unwrap_or_default());
    Ok(Html(browser.page()?))
}

/// `POST /inventory/events?<state>`: applies one browser event to the state
/// in the query and answers with an `EventOutcome`.
pub async fn inventory_event_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    Json(event): Json<BrowserEvent>,
) -> Response {
    debug!(event = event.name(), "browser event");
    let outcome = ready_catalog(&state).and_then(|catalog| {
        let mut browser = InventoryBrowser::new(&catalog, query.as_deref().unwrap_or_default());
        browser.dispatch(&event)
    });

    match outcome {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => {
            let status = match e {
                BrowserError::Loading => StatusCode::SERVICE_UNAVAILABLE,
                ref other => other.status(),
            };
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// `GET /inventory/{condition}/{id}`: details of one vehicle. A wrong
/// condition segment redirects to the canonical path.
pub async fn vehicle_page_handler(
    State(state): State<AppState>,
    Path((condition, id)): Path<(String, String)>,
) -> Result<Response, BrowserError> {
    let catalog = ready_catalog(&state)?;
    let vehicle = catalog
        .find(&id)
        .ok_or_else(|| BrowserError::NotFound(id.clone()))?;

    if condition != condition_segment(&vehicle.condition) {
        return Ok(Redirect::permanent(&details_link(vehicle)).into_response());
    }
    Ok(Html(render_details(vehicle)?).into_response())
}
