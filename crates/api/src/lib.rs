//! HTTP API server for the storefront order service.
//!
//! Exposes the order workflow over REST with bearer authentication,
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
mod state;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: AppState, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/orders",
            get(routes::orders::list).post(routes::orders::create),
        )
        .route(
            "/orders/{id}",
            get(routes::orders::get)
                .patch(routes::orders::update_status)
                .delete(routes::orders::cancel),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
