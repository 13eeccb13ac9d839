//! REST API module using Axum
//!
//! HTTP surface over the observation catalog and the analytic pipeline:
//! data listing, statistics with risk assessment, per-region features, and
//! the heuristic magnitude forecast. All responses share one envelope.

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::ApiState;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config;

/// Build a CORS layer from the configured origin list.
///
/// An empty list means same-origin only; origins that fail to parse are
/// skipped with a warning.
fn build_cors_layer() -> CorsLayer {
    let configured = &config::get().cors.allowed_origins;
    let allowed: Vec<_> = configured
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "skipping unparsable CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    if allowed.is_empty() {
        layer
    } else {
        layer.allow_origin(allowed)
    }
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    Router::new()
        .merge(routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}
