//! Magnitude forecast request/response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Region;

/// Bounds accepted on forecast requests.
pub mod forecast_limits {
    /// Shortest forecast horizon (days)
    pub const MIN_HORIZON_DAYS: u32 = 1;
    /// Longest forecast horizon (days)
    pub const MAX_HORIZON_DAYS: u32 = 365;
    /// Shortest historical window (days)
    pub const MIN_HISTORY_DAYS: u32 = 30;
    /// Longest historical window (days)
    pub const MAX_HISTORY_DAYS: u32 = 365;
    /// Lowest accepted confidence level
    pub const MIN_CONFIDENCE: f64 = 0.5;
    /// Highest accepted confidence level
    pub const MAX_CONFIDENCE: f64 = 0.99;
}

fn default_confidence_level() -> f64 {
    0.95
}

/// Parameters for a magnitude forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub region: Region,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64,
    pub time_horizon_days: u32,
    pub historical_window_days: u32,
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
}

/// Hazard category from the predicted magnitude band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HazardClass {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl HazardClass {
    /// Band boundaries: <4 minimal, <5 low, <6 medium, <7 high, else critical.
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= 7.0 {
            HazardClass::Critical
        } else if magnitude >= 6.0 {
            HazardClass::High
        } else if magnitude >= 5.0 {
            HazardClass::Medium
        } else if magnitude >= 4.0 {
            HazardClass::Low
        } else {
            HazardClass::Minimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardClass::Minimal => "MINIMAL",
            HazardClass::Low => "LOW",
            HazardClass::Medium => "MEDIUM",
            HazardClass::High => "HIGH",
            HazardClass::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for HazardClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forecast output: point estimate, interval, hazard class, guidance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub forecast_id: String,
    pub region: Region,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64,
    pub predicted_magnitude: f64,
    pub confidence_interval_lower: f64,
    pub confidence_interval_upper: f64,
    pub confidence_level: f64,
    pub time_horizon_days: u32,
    /// Heuristic quality indicator for the estimate, [0.5, 0.95]
    pub model_confidence: f64,
    pub hazard_class: HazardClass,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Descriptor for the forecasting backend served by `/api/model-info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub architecture: String,
    pub features: Vec<String>,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hazard_class_bands() {
        assert_eq!(HazardClass::from_magnitude(3.9), HazardClass::Minimal);
        assert_eq!(HazardClass::from_magnitude(4.0), HazardClass::Low);
        assert_eq!(HazardClass::from_magnitude(5.0), HazardClass::Medium);
        assert_eq!(HazardClass::from_magnitude(6.0), HazardClass::High);
        assert_eq!(HazardClass::from_magnitude(7.0), HazardClass::Critical);
        assert_eq!(HazardClass::from_magnitude(9.5), HazardClass::Critical);
    }

    #[test]
    fn test_request_confidence_defaults() {
        let json = r#"{
            "region": "NCR",
            "latitude": 14.6,
            "longitude": 121.0,
            "depth": 30.0,
            "time_horizon_days": 30,
            "historical_window_days": 90
        }"#;
        let req: ForecastRequest = serde_json::from_str(json).unwrap();
        assert!((req.confidence_level - 0.95).abs() < f64::EPSILON);
    }
}
