//! Heuristic magnitude forecasting
//!
//! A deterministic baseline standing in for a trained time-series model:
//! the point estimate is the target region's rolling mean magnitude (falling
//! back to the nationwide mean when the bin is empty), wrapped in a
//! normal-approximation confidence interval with a fixed residual scale.
//! Hazard classification and preparedness guidance derive from the estimate.

use chrono::Utc;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;
use uuid::Uuid;

use crate::features::extract_features;
use crate::risk::stats;
use crate::types::forecast_limits::{
    MAX_CONFIDENCE, MAX_HISTORY_DAYS, MAX_HORIZON_DAYS, MIN_CONFIDENCE, MIN_HISTORY_DAYS,
    MIN_HORIZON_DAYS,
};
use crate::types::{
    ForecastRequest, ForecastResponse, HazardClass, ModelInfo, Observation, Region,
};

/// Residual scale for the confidence interval.
/// Fixed until a trained model supplies per-forecast uncertainty.
const RESIDUAL_STD_ERROR: f64 = 0.5;

/// Base quality indicator for the heuristic estimate.
const BASE_CONFIDENCE: f64 = 0.8;
/// Applied when the target bin has no recent activity to draw on.
const SPARSE_BIN_PENALTY: f64 = 0.9;

/// Request-bound violations.
///
/// Raised synchronously before any computation; the forecast itself never
/// fails on well-formed input.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ForecastError {
    #[error("time_horizon_days {0} outside [{MIN_HORIZON_DAYS}, {MAX_HORIZON_DAYS}]")]
    HorizonOutOfRange(u32),
    #[error("historical_window_days {0} outside [{MIN_HISTORY_DAYS}, {MAX_HISTORY_DAYS}]")]
    HistoryOutOfRange(u32),
    #[error("confidence_level {0} outside [{MIN_CONFIDENCE}, {MAX_CONFIDENCE}]")]
    ConfidenceOutOfRange(f64),
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),
    #[error("depth {0} must be non-negative")]
    Depth(f64),
}

/// Deterministic magnitude forecaster.
pub struct MagnitudeForecaster;

impl MagnitudeForecaster {
    /// Produce a forecast for the requested region from the given history.
    pub fn forecast(
        request: &ForecastRequest,
        history: &[Observation],
    ) -> Result<ForecastResponse, ForecastError> {
        validate_request(request)?;

        let (predicted, bin_has_data) = point_estimate(request.region, history);
        let z = two_sided_quantile(request.confidence_level);
        let margin = z * RESIDUAL_STD_ERROR;

        let model_confidence = if bin_has_data {
            BASE_CONFIDENCE
        } else {
            BASE_CONFIDENCE * SPARSE_BIN_PENALTY
        };

        let hazard_class = HazardClass::from_magnitude(predicted);

        Ok(ForecastResponse {
            forecast_id: Uuid::new_v4().to_string(),
            region: request.region,
            latitude: request.latitude,
            longitude: request.longitude,
            depth: request.depth,
            predicted_magnitude: predicted,
            confidence_interval_lower: (predicted - margin).max(0.0),
            confidence_interval_upper: predicted + margin,
            confidence_level: request.confidence_level,
            time_horizon_days: request.time_horizon_days,
            model_confidence,
            hazard_class,
            recommendations: recommendations(predicted, request.region),
            generated_at: Utc::now(),
        })
    }

    /// Descriptor for `/api/model-info`.
    pub fn model_info() -> ModelInfo {
        ModelInfo {
            name: "Regional rolling-window baseline".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            architecture: "Deterministic heuristic (no trained model)".to_string(),
            features: vec![
                "latitude".to_string(),
                "longitude".to_string(),
                "depth".to_string(),
                "magnitude".to_string(),
                "time_since_last_hours".to_string(),
                "frequency_30d".to_string(),
                "frequency_90d".to_string(),
                "avg_magnitude_30d".to_string(),
                "max_magnitude_30d".to_string(),
                "seismic_energy_30d".to_string(),
            ],
            description: "Point estimate from the target region's rolling mean magnitude, \
                          nationwide mean fallback, normal-approximation interval with a \
                          fixed residual scale."
                .to_string(),
        }
    }
}

fn validate_request(request: &ForecastRequest) -> Result<(), ForecastError> {
    if !(MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&request.time_horizon_days) {
        return Err(ForecastError::HorizonOutOfRange(request.time_horizon_days));
    }
    if !(MIN_HISTORY_DAYS..=MAX_HISTORY_DAYS).contains(&request.historical_window_days) {
        return Err(ForecastError::HistoryOutOfRange(request.historical_window_days));
    }
    if !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&request.confidence_level)
        || !request.confidence_level.is_finite()
    {
        return Err(ForecastError::ConfidenceOutOfRange(request.confidence_level));
    }
    if !(-90.0..=90.0).contains(&request.latitude) {
        return Err(ForecastError::Latitude(request.latitude));
    }
    if !(-180.0..=180.0).contains(&request.longitude) {
        return Err(ForecastError::Longitude(request.longitude));
    }
    if request.depth < 0.0 {
        return Err(ForecastError::Depth(request.depth));
    }
    Ok(())
}

/// Point estimate and whether the target bin contributed data.
fn point_estimate(region: Region, history: &[Observation]) -> (f64, bool) {
    if let Ok(features) = extract_features(history, &Region::ALL) {
        if let Some(bin) = features.get(&region) {
            if bin.frequency_30d > 0 {
                return (bin.avg_magnitude_30d, true);
            }
        }
    }

    let magnitudes: Vec<f64> = history.iter().map(|o| o.magnitude).collect();
    (stats::describe(&magnitudes).mean, false)
}

/// Two-sided standard normal quantile for a confidence level.
fn two_sided_quantile(confidence_level: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(standard) => standard.inverse_cdf(0.5 + confidence_level / 2.0),
        // Unreachable with unit parameters; fall back to the 95% quantile
        Err(_) => 1.96,
    }
}

/// Preparedness guidance for the predicted magnitude and target region.
fn recommendations(predicted_magnitude: f64, region: Region) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    if predicted_magnitude >= 6.0 {
        out.extend([
            "Evacuate to designated safe zones immediately".to_string(),
            "Follow emergency protocols for major earthquakes".to_string(),
            "Ensure emergency supplies are readily available".to_string(),
        ]);
    } else if predicted_magnitude >= 5.0 {
        out.extend([
            "Secure heavy objects and furniture".to_string(),
            "Review emergency evacuation plans".to_string(),
            "Monitor local emergency broadcasts".to_string(),
        ]);
    } else if predicted_magnitude >= 4.0 {
        out.extend([
            "Check emergency preparedness kits".to_string(),
            "Review earthquake safety procedures".to_string(),
            "Stay informed about local seismic activity".to_string(),
        ]);
    }

    if matches!(region, Region::Ncr | Region::RegionIII | Region::RegionIVA) {
        out.push("High population density area - ensure evacuation routes are clear".to_string());
    }
    if matches!(region, Region::RegionV | Region::RegionVIII) {
        out.push("Coastal region - be aware of potential tsunami risks".to_string());
    }

    out.extend([
        "Drop, Cover, and Hold On during earthquakes".to_string(),
        "Stay away from windows and heavy objects".to_string(),
        "Have a family emergency communication plan".to_string(),
    ]);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn request(region: Region) -> ForecastRequest {
        ForecastRequest {
            region,
            latitude: 14.6,
            longitude: 121.0,
            depth: 30.0,
            time_horizon_days: 30,
            historical_window_days: 90,
            confidence_level: 0.95,
        }
    }

    fn history(region: Region, magnitudes: &[f64]) -> Vec<Observation> {
        let base = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        magnitudes
            .iter()
            .enumerate()
            .map(|(i, &m)| Observation {
                id: format!("EQ_{i:06}"),
                timestamp: base + Duration::hours(i as i64),
                latitude: 14.6,
                longitude: 121.0,
                depth: 30.0,
                magnitude: m,
                region,
                location: None,
                source: "PHIVOLCS".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_point_estimate_uses_regional_rolling_mean() {
        let observations = history(Region::Ncr, &[4.0, 5.0, 6.0]);
        let response = MagnitudeForecaster::forecast(&request(Region::Ncr), &observations).unwrap();
        assert!((response.predicted_magnitude - 5.0).abs() < 1e-9);
        assert!((response.model_confidence - BASE_CONFIDENCE).abs() < 1e-9);
    }

    #[test]
    fn test_empty_bin_falls_back_to_nationwide_mean() {
        let observations = history(Region::RegionVI, &[4.0, 6.0]);
        let response = MagnitudeForecaster::forecast(&request(Region::Armm), &observations).unwrap();
        assert!((response.predicted_magnitude - 5.0).abs() < 1e-9);
        assert!(response.model_confidence < BASE_CONFIDENCE);
    }

    #[test]
    fn test_interval_is_symmetric_and_floored_at_zero() {
        let observations = history(Region::Ncr, &[0.2]);
        let response = MagnitudeForecaster::forecast(&request(Region::Ncr), &observations).unwrap();
        assert_eq!(response.confidence_interval_lower, 0.0);
        assert!(response.confidence_interval_upper > response.predicted_magnitude);
    }

    #[test]
    fn test_interval_widens_with_confidence_level() {
        let observations = history(Region::Ncr, &[5.0, 5.0, 5.0]);
        let mut req = request(Region::Ncr);

        req.confidence_level = 0.90;
        let narrow = MagnitudeForecaster::forecast(&req, &observations).unwrap();
        req.confidence_level = 0.99;
        let wide = MagnitudeForecaster::forecast(&req, &observations).unwrap();

        let narrow_width = narrow.confidence_interval_upper - narrow.confidence_interval_lower;
        let wide_width = wide.confidence_interval_upper - wide.confidence_interval_lower;
        assert!(wide_width > narrow_width);
    }

    #[test]
    fn test_quantile_matches_tabulated_values() {
        assert!((two_sided_quantile(0.95) - 1.96).abs() < 0.01);
        assert!((two_sided_quantile(0.90) - 1.645).abs() < 0.01);
        assert!((two_sided_quantile(0.99) - 2.576).abs() < 0.01);
    }

    #[test]
    fn test_out_of_range_horizon_rejected() {
        let mut req = request(Region::Ncr);
        req.time_horizon_days = 400;
        let err = MagnitudeForecaster::forecast(&req, &[]).unwrap_err();
        assert_eq!(err, ForecastError::HorizonOutOfRange(400));
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let mut req = request(Region::Ncr);
        req.confidence_level = 0.3;
        assert!(matches!(
            MagnitudeForecaster::forecast(&req, &[]),
            Err(ForecastError::ConfidenceOutOfRange(_))
        ));
    }

    #[test]
    fn test_metro_region_gets_density_guidance() {
        let observations = history(Region::Ncr, &[6.5, 6.5, 6.5]);
        let response = MagnitudeForecaster::forecast(&request(Region::Ncr), &observations).unwrap();
        assert_eq!(response.hazard_class, HazardClass::High);
        assert!(response
            .recommendations
            .iter()
            .any(|r| r.contains("population density")));
        assert!(response
            .recommendations
            .iter()
            .any(|r| r.contains("Evacuate")));
    }

    #[test]
    fn test_coastal_region_gets_tsunami_guidance() {
        let observations = history(Region::RegionVIII, &[4.5]);
        let mut req = request(Region::RegionVIII);
        req.latitude = 11.2;
        req.longitude = 125.0;
        let response = MagnitudeForecaster::forecast(&req, &observations).unwrap();
        assert!(response
            .recommendations
            .iter()
            .any(|r| r.contains("tsunami")));
    }
}
