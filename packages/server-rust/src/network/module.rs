//! HTTP server with deferred startup.
//!
//! `new()` allocates shared state, `start()` binds the listener, and
//! `serve()` accepts connections until the shutdown future resolves. The
//! catalog load runs concurrently with serving, so pages answer with a
//! loading placeholder until it lands.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::middleware::from_fn_with_state;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::handlers::{
    health_handler, inventory_event_handler, inventory_page_handler, liveness_handler,
    readiness_handler, reload_handler, vehicle_page_handler, AppState,
};
use super::lifecycle::Lifecycle;
use super::middleware::{apply_http_layers, track_in_flight};
use crate::catalog::CatalogHandle;
use crate::render::INVENTORY_PATH;

pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    catalog: Arc<CatalogHandle>,
    lifecycle: Arc<Lifecycle>,
    start_time: Instant,
}

impl NetworkModule {
    /// Creates the module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, catalog: Arc<CatalogHandle>) -> Self {
        Self {
            config,
            listener: None,
            catalog,
            lifecycle: Arc::new(Lifecycle::new()),
            start_time: Instant::now(),
        }
    }

    #[must_use]
    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        Arc::clone(&self.lifecycle)
    }

    /// Assembles the router.
    ///
    /// Routes:
    /// - `GET /inventory` -- browser page, state in the query string
    /// - `POST /inventory/events` -- browser event, JSON in and out
    /// - `GET /inventory/{condition}/{id}` -- vehicle details
    /// - `POST /catalog/reload` -- background reload
    /// - `GET /health`, `/health/live`, `/health/ready`
    pub fn build_router(&self) -> Router {
        let state = AppState {
            catalog: Arc::clone(&self.catalog),
            lifecycle: Arc::clone(&self.lifecycle),
            config: Arc::new(self.config.clone()),
            start_time: self.start_time,
        };

        let pages = Router::new()
            .route("/", get(|| async { Redirect::to(INVENTORY_PATH) }))
            .route(INVENTORY_PATH, get(inventory_page_handler))
            .route("/inventory/events", post(inventory_event_handler))
            .route("/inventory/{condition}/{id}", get(vehicle_page_handler))
            .route("/catalog/reload", post(reload_handler))
            .route_layer(from_fn_with_state(
                Arc::clone(&self.lifecycle),
                track_in_flight,
            ));

        let router = pages
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler));

        apply_http_layers(router, &self.config).with_state(state)
    }

    /// Binds the listener and returns the bound port (OS-assigned when the
    /// configured port is 0).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        let port = listener.local_addr()?.port();

        info!(host = %self.config.host, port, "listener bound");
        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called or the server hits a
    /// fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .take()
            .context("start() must be called before serve()")?;
        let router = self.build_router();
        let lifecycle = self.lifecycle;

        lifecycle.set_ready();
        info!("serving HTTP");

        let signal_lifecycle = Arc::clone(&lifecycle);
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                signal_lifecycle.begin_drain();
            })
            .await?;

        if lifecycle.wait_for_drain(self.config.drain_timeout).await {
            info!("all requests drained");
        } else {
            warn!(in_flight = lifecycle.in_flight_count(), "drain timeout expired");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use showroom_core::{Catalog, RecordId, Vehicle};
    use tower::ServiceExt;

    use super::*;
    use crate::network::handlers::test_support::OfflineSource;
    use crate::network::HealthState;

    fn module() -> NetworkModule {
        let catalog = Arc::new(CatalogHandle::new(Arc::new(OfflineSource)));
        catalog.publish(Catalog::new(vec![
            Vehicle {
                id: RecordId::from("1"),
                condition: "Used".into(),
                year: "2019".into(),
                make: "Honda".into(),
                model: "Civic".into(),
                price: Some(20_000.0),
                ..Vehicle::default()
            },
            Vehicle {
                id: RecordId::from("2"),
                condition: "Used".into(),
                year: "2018".into(),
                make: "Toyota".into(),
                model: "Camry".into(),
                ..Vehicle::default()
            },
        ]));
        NetworkModule::new(NetworkConfig::default(), catalog)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn inventory_route_renders_filtered_page() {
        let response = module()
            .build_router()
            .oneshot(
                Request::get("/inventory?make=Toyota")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("2018 Toyota Camry"));
        assert!(!html.contains("2019 Honda Civic"));
    }

    #[tokio::test]
    async fn events_route_answers_outcome() {
        let event = json!({
            "type": "inventory-browser/filterOption/add",
            "detail": { "filterKey": "make", "optionValue": "Honda" },
        });
        let response = module()
            .build_router()
            .oneshot(
                Request::post("/inventory/events?sortBy=year%3Basc")
                    .header("content-type", "application/json")
                    .body(Body::from(event.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let outcome: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(outcome["action"], "render");
        assert_eq!(outcome["query"], "make=Honda&sortBy=year%3Basc");
        assert!(outcome["listHtml"].as_str().unwrap().contains("Civic"));
    }

    #[tokio::test]
    async fn malformed_event_is_rejected() {
        let response = module()
            .build_router()
            .oneshot(
                Request::post("/inventory/events")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"type":"inventory-browser/explode"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn details_route_and_unknown_id() {
        let router = module().build_router();
        let response = router
            .clone()
            .oneshot(Request::get("/inventory/used/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::get("/inventory/used/77").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn root_redirects_to_inventory() {
        let response = module()
            .build_router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()["location"], INVENTORY_PATH);
    }

    #[tokio::test]
    async fn health_routes_bypass_drain_refusal() {
        let module = module();
        module.lifecycle().begin_drain();
        let router = module.build_router();

        let response = router
            .clone()
            .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::get("/inventory").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn start_binds_to_os_assigned_port() {
        let mut module = module();
        let port = module.start().await.unwrap();
        assert!(port > 0);
        assert!(module.listener.is_some());
    }

    #[tokio::test]
    async fn serve_without_start_is_an_error() {
        let err = module().serve(std::future::pending::<()>()).await.unwrap_err();
        assert!(err.to_string().contains("start()"));
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown_signal() {
        let mut module = module();
        module.config.host = "127.0.0.1".to_string();
        module.start().await.unwrap();
        let lifecycle = module.lifecycle();

        module.serve(async {}).await.unwrap();
        assert_eq!(lifecycle.health_state(), HealthState::Stopped);
    }
}
