//! API request handlers
//!
//! Every handler takes a snapshot (or filtered query) from the observation
//! store, runs the pure pipeline over it, and wraps the result in the
//! uniform envelope. Unresolvable client input (unknown region, unparsable
//! date, out-of-range forecast parameters) maps to 400 with a machine
//! readable code; nothing else escapes.

use axum::extract::{Query, State};
use axum::response::Response;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::catalog::{ObservationQuery, ObservationStore};
use crate::features::extract_features;
use crate::forecast::MagnitudeForecaster;
use crate::risk::assess;
use crate::types::{ForecastRequest, Region};

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<ObservationStore>,
    pub started_at: DateTime<Utc>,
}

impl ApiState {
    pub fn new(store: Arc<ObservationStore>) -> Self {
        Self {
            store,
            started_at: Utc::now(),
        }
    }
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub observation_count: usize,
    pub uptime_secs: i64,
}

// ============================================================================
// Query parameter types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegionParam {
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EarthquakeParams {
    pub region: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_magnitude: Option<f64>,
    pub max_magnitude: Option<f64>,
    pub limit: Option<usize>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / service descriptor.
pub async fn service_info() -> Response {
    ApiResponse::ok(ServiceInfo {
        service: "sismo",
        description: "Earthquake observation analytics and forecasting for the Philippines",
        endpoints: vec![
            "/health",
            "/api/regions",
            "/api/earthquakes",
            "/api/statistics",
            "/api/features",
            "/api/predict",
            "/api/model-info",
        ],
    })
}

/// GET /health with liveness and catalog size.
pub async fn health(State(state): State<ApiState>) -> Response {
    ApiResponse::ok(HealthStatus {
        status: "ok",
        observation_count: state.store.len(),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

/// GET /api/regions, one summary per region.
pub async fn regions(State(state): State<ApiState>) -> Response {
    ApiResponse::ok(state.store.region_summaries())
}

/// GET /api/earthquakes, filtered listing, newest first.
pub async fn earthquakes(
    State(state): State<ApiState>,
    Query(params): Query<EarthquakeParams>,
) -> Response {
    let region = match parse_region_param(params.region.as_deref()) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let start = match parse_date_param(params.start_date.as_deref(), "start_date") {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let end = match parse_date_param(params.end_date.as_deref(), "end_date") {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let query = ObservationQuery {
        region,
        start,
        end,
        min_magnitude: params.min_magnitude,
        max_magnitude: params.max_magnitude,
        limit: params.limit,
    };
    ApiResponse::ok(state.store.query(&query))
}

/// GET /api/statistics, the full risk assessment, optionally region-filtered.
pub async fn statistics(
    State(state): State<ApiState>,
    Query(params): Query<RegionParam>,
) -> Response {
    let region = match parse_region_param(params.region.as_deref()) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    let snapshot = state.store.snapshot();
    ApiResponse::ok(assess(&snapshot, region))
}

/// GET /api/features, per-region feature vectors.
///
/// With `?region=` returns the single bin; without it, the full map.
pub async fn features(
    State(state): State<ApiState>,
    Query(params): Query<RegionParam>,
) -> Response {
    let region = match parse_region_param(params.region.as_deref()) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let snapshot = state.store.snapshot();
    let map = match extract_features(&snapshot, &Region::ALL) {
        Ok(map) => map,
        // Cannot fire with the full enumeration declared; treated as a bug
        Err(err) => return ApiErrorResponse::internal(err.to_string()),
    };

    match region {
        Some(r) => match map.get(&r) {
            Some(vector) => ApiResponse::ok(vector.clone()),
            None => ApiErrorResponse::not_found(format!("no feature bin for {r}")),
        },
        None => ApiResponse::ok(map),
    }
}

/// POST /api/predict, the heuristic magnitude forecast.
pub async fn predict(
    State(state): State<ApiState>,
    axum::Json(request): axum::Json<ForecastRequest>,
) -> Response {
    let snapshot = state.store.snapshot();
    match MagnitudeForecaster::forecast(&request, &snapshot) {
        Ok(response) => ApiResponse::ok(response),
        Err(err) => ApiErrorResponse::bad_request("INVALID_FORECAST_REQUEST", err.to_string()),
    }
}

/// GET /api/model-info, the forecasting backend descriptor.
pub async fn model_info() -> Response {
    ApiResponse::ok(MagnitudeForecaster::model_info())
}

// ============================================================================
// Parameter parsing
// ============================================================================

fn parse_region_param(raw: Option<&str>) -> Result<Option<Region>, Response> {
    match raw {
        None | Some("") => Ok(None),
        Some(label) => label.parse().map(Some).map_err(|_| {
            ApiErrorResponse::bad_request("UNKNOWN_REGION", format!("unknown region: {label}"))
        }),
    }
}

/// Accept RFC 3339 instants or bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_date_param(raw: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>, Response> {
    let Some(value) = raw.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(start_of_day) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(start_of_day.and_utc()));
        }
    }
    Err(ApiErrorResponse::bad_request(
        "INVALID_DATE",
        format!("unparsable {field}: {value}"),
    ))
}
