//! HTTP route handlers for the importer.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /products               - One catalog page with import status per row
//!                                (?cursor=<opaque>&direction=next|previous)
//! POST /products/import        - Import one product by handle from a page
//! ```

pub mod products;

use axum::{
    Router,
    http::Uri,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/import", post(products::import))
}

/// Create all routes for the importer.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
}

/// Build the full application with its middleware stack, minus the Sentry
/// layers which only the binary installs.
pub fn app(state: AppState) -> Router {
    routes()
        .fallback(not_found)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
