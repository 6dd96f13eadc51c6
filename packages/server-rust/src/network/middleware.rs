//! HTTP middleware for the showroom router.
//!
//! Layer order, outermost first:
//! 1. `SetRequestId` assigns a UUID `x-request-id`
//! 2. `Trace` opens a span per request
//! 3. `Compression` gzips HTML and JSON bodies
//! 4. `CORS` for the event endpoint's cross-origin callers
//! 5. `Timeout` answers 408 past the configured limit
//! 6. `PropagateRequestId` copies the id onto the response
//!
//! Page routes additionally run [`track_in_flight`].

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::HeaderName;
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::config::NetworkConfig;
use super::lifecycle::{HealthState, Lifecycle};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps `router` in the transport-level layers.
pub fn apply_http_layers<S>(router: Router<S>, config: &NetworkConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors_layer(&config.cors_origins))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                config.request_timeout,
            ))
            .layer(PropagateRequestIdLayer::new(request_id)),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Counts the request as in flight; refuses new work once draining.
pub async fn track_in_flight(
    State(lifecycle): State<Arc<Lifecycle>>,
    request: Request,
    next: Next,
) -> Response {
    if lifecycle.health_state() >= HealthState::Draining {
        return (StatusCode::SERVICE_UNAVAILABLE, "shutting down").into_response();
    }
    let _guard = lifecycle.in_flight_guard();
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    fn app(lifecycle: &Arc<Lifecycle>) -> Router {
        let router = Router::new().route("/", get(|| async { "ok" })).layer(
            axum::middleware::from_fn_with_state(Arc::clone(lifecycle), track_in_flight),
        );
        apply_http_layers(router, &NetworkConfig::default())
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let lifecycle = Arc::new(Lifecycle::new());
        let response = app(&lifecycle)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn draining_refuses_requests() {
        let lifecycle = Arc::new(Lifecycle::new());
        lifecycle.begin_drain();
        let response = app(&lifecycle)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    async fn allowed_origin(config: &NetworkConfig, origin: &str) -> Option<String> {
        let router = Router::new().route("/", get(|| async { "ok" }));
        let response = apply_http_layers(router, config)
            .oneshot(
                Request::get("/")
                    .header("origin", origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn cors_allows_only_listed_origins() {
        let config = NetworkConfig {
            cors_origins: vec!["https://dealer.example".to_string(), "not a header\n".to_string()],
            ..NetworkConfig::default()
        };
        assert_eq!(
            allowed_origin(&config, "https://dealer.example").await.as_deref(),
            Some("https://dealer.example")
        );
        assert_eq!(allowed_origin(&config, "https://elsewhere.example").await, None);
    }

    #[tokio::test]
    async fn cors_wildcard_allows_any_origin() {
        assert_eq!(
            allowed_origin(&NetworkConfig::default(), "https://elsewhere.example")
                .await
                .as_deref(),
            Some("*")
        );
    }
}
