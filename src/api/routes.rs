//! API route table.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, ApiState};

/// Build the service router.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health))
        // Data
        .route("/api/regions", get(handlers::regions))
        .route("/api/earthquakes", get(handlers::earthquakes))
        .route("/api/statistics", get(handlers::statistics))
        .route("/api/features", get(handlers::features))
        // Forecasting
        .route("/api/predict", post(handlers::predict))
        .route("/api/model-info", get(handlers::model_info))
        .with_state(state)
}
